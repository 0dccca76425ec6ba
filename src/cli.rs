//! Command-line interface for maze_duel.

use clap::{Args, Parser, Subcommand};
use maze_duel::{AttackReach, EngineConfig, MazeLayout};
use std::path::PathBuf;

/// Maze Duel - turn-based combat in a generated maze
#[derive(Parser, Debug)]
#[command(name = "maze_duel")]
#[command(about = "Turn-based maze combat engine", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Subcommand to run
    #[command(subcommand)]
    pub command: Command,
}

/// Match options shared by the playing commands. Flags override the config file.
#[derive(Args, Debug, Clone)]
pub struct MatchArgs {
    /// Path to an engine config file (TOML)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Maze width, clamped to 5..=30
    #[arg(long)]
    pub width: Option<usize>,

    /// Maze height, clamped to 5..=30
    #[arg(long)]
    pub height: Option<usize>,

    /// Seed for the maze and scripted players
    #[arg(long)]
    pub seed: Option<u64>,

    /// Attack rule: adjacent or line
    #[arg(long)]
    pub attack_reach: Option<AttackReach>,

    /// Maze layout: random or connected
    #[arg(long)]
    pub layout: Option<MazeLayout>,
}

impl MatchArgs {
    /// Loads the config file, if any, and applies flag overrides.
    pub fn resolve(&self) -> anyhow::Result<EngineConfig> {
        let mut config = match &self.config {
            Some(path) => EngineConfig::from_file(path)?,
            None => EngineConfig::default(),
        };
        let width = self.width.unwrap_or(*config.maze().width());
        let height = self.height.unwrap_or(*config.maze().height());
        config = config.with_size(width, height);
        if let Some(seed) = self.seed {
            config = config.with_seed(seed);
        }
        if let Some(attack_reach) = self.attack_reach {
            config = config.with_attack_reach(attack_reach);
        }
        if let Some(layout) = self.layout {
            config = config.with_layout(layout);
        }
        Ok(config)
    }
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run an AI-versus-AI match and print the outcome
    Simulate {
        #[command(flatten)]
        options: MatchArgs,

        /// Stop after this many actions
        #[arg(long)]
        max_turns: Option<u32>,

        /// Use a random wanderer as the second player instead of a hunter
        #[arg(long)]
        wanderer: bool,

        /// Print the report and final state as JSON
        #[arg(long)]
        json: bool,
    },

    /// Play against a hunter AI, typing commands like `move north`
    Play {
        #[command(flatten)]
        options: MatchArgs,

        /// Your combatant name
        #[arg(long, default_value = "player")]
        name: String,
    },

    /// Print a generated maze
    Maze {
        #[command(flatten)]
        options: MatchArgs,

        /// Print the maze as JSON
        #[arg(long)]
        json: bool,
    },
}
