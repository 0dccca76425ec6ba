//! Maze Duel - Unified CLI
//!
//! Simulates matches between scripted players, lets a human play against
//! one, and prints generated mazes.

#![warn(missing_docs)]

mod cli;

use anyhow::Result;
use clap::Parser;
use cli::{Cli, Command, MatchArgs};
use maze_duel::{
    CombatantKind, CombatantProfile, GameEvent, HunterAi, LineInput, Match, MatchMode,
    MatchRegistry, Orchestrator, Strategy, WandererAi,
};
use tracing::{info, instrument};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

fn main() -> Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,maze_duel=debug")),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    match cli.command {
        Command::Simulate {
            options,
            max_turns,
            wanderer,
            json,
        } => run_simulation(&options, max_turns, wanderer, json),
        Command::Play { options, name } => run_play(&options, &name),
        Command::Maze { options, json } => run_maze(&options, json),
    }
}

/// Run an AI-versus-AI match
#[instrument(skip(options))]
fn run_simulation(
    options: &MatchArgs,
    max_turns: Option<u32>,
    wanderer: bool,
    json: bool,
) -> Result<()> {
    let config = options.resolve()?;
    let max_turns = max_turns.unwrap_or(*config.simulation().max_turns());
    let settings = config.settings(MatchMode::AiVsAi);

    let registry = MatchRegistry::new();
    let (match_id, _) = registry.create_match(&settings)?;
    let (red, _) = registry.add_combatant(match_id, "red", CombatantKind::Ai)?;
    let (blue, _) = registry.add_combatant(match_id, "blue", CombatantKind::Ai)?;

    let opponent: Box<dyn Strategy> = if wanderer {
        let seed = config.simulation().seed().unwrap_or_else(rand::random);
        Box::new(WandererAi::new("blue", seed))
    } else {
        Box::new(HunterAi::new("blue"))
    };

    let report = Orchestrator::new()
        .seat(red, Box::new(HunterAi::new("red")))
        .seat(blue, opponent)
        .run(&registry, match_id, max_turns)?;
    let state = registry.state(match_id)?;

    if json {
        let out = serde_json::json!({ "report": report, "state": state });
        println!("{}", serde_json::to_string_pretty(&out)?);
        return Ok(());
    }

    println!("{}\n", state.render());
    for record in registry.history(match_id)? {
        println!("{record}");
    }
    match report.winner() {
        Some(winner) => println!(
            "\n{} wins after {} actions",
            winner.name(),
            report.turns_played()
        ),
        None => println!(
            "\nNo winner after {} actions ({})",
            report.turns_played(),
            report.final_status()
        ),
    }
    Ok(())
}

/// Run a human-versus-AI match on stdin/stdout
#[instrument(skip(options))]
fn run_play(options: &MatchArgs, name: &str) -> Result<()> {
    let config = options.resolve()?;
    let settings = config.settings(MatchMode::AiVsUser);

    let registry = MatchRegistry::new();
    let (match_id, _) = registry.create_match(&settings)?;
    let (human, _) = registry.add_combatant_with_profile(
        match_id,
        name,
        CombatantProfile::User { user_id: None },
    )?;
    let (ai, _) = registry.add_combatant(match_id, "hunter", CombatantKind::Ai)?;
    info!(%match_id, "Match ready");

    println!("You are A at the top left. Commands: move|attack north|south|east|west, quit");
    let input = LineInput::new(name, std::io::stdin().lock(), std::io::stdout());
    let report = Orchestrator::new()
        .seat(human, Box::new(input))
        .seat(ai, Box::new(HunterAi::new("hunter")))
        .with_observer(|event| match event {
            GameEvent::ActionResolved {
                player,
                intent,
                result,
            } => println!("{player}: {intent} -> {result}"),
            GameEvent::Forfeited { player } => println!("{player} left the match"),
            GameEvent::GameOver { winner } => {
                println!("Game over, winner: {}", winner.as_deref().unwrap_or("none"))
            }
        })
        .run(&registry, match_id, u32::MAX)?;

    println!("\n{}", registry.state(match_id)?.render());
    info!(status = %report.final_status(), "Play session ended");
    Ok(())
}

/// Print a generated maze
#[instrument(skip(options))]
fn run_maze(options: &MatchArgs, json: bool) -> Result<()> {
    let config = options.resolve()?;
    let game = Match::new(&config.settings(MatchMode::AiVsAi))?;
    let maze = game.maze().snapshot();
    if json {
        println!("{}", serde_json::to_string_pretty(&maze)?);
    } else {
        println!("{}", maze.render());
    }
    Ok(())
}
