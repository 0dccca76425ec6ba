//! Tests for scripted strategies and match orchestration.

use maze_duel::{
    CellState, CombatantId, CombatantKind, Direction, GameEvent, HunterAi, Intent, LineInput,
    Match, MatchError, MatchId, MatchMode, MatchRegistry, MatchSettings, MatchSnapshot,
    MatchStatus, Maze, MazeLayout, Orchestrator, Position, Strategy, WandererAi,
};
use std::cell::RefCell;
use std::io::Cursor;
use std::rc::Rc;

fn duel(maze: Maze) -> (MatchRegistry, MatchId, CombatantId, CombatantId) {
    let registry = MatchRegistry::new();
    let id = registry.insert(Match::with_maze(MatchMode::AiVsAi, maze)).unwrap();
    let (a, _) = registry.add_combatant(id, "red", CombatantKind::Ai).unwrap();
    let (b, _) = registry.add_combatant(id, "blue", CombatantKind::Ai).unwrap();
    (registry, id, a, b)
}

/// Stops playing immediately.
struct Quitter;

impl Strategy for Quitter {
    fn name(&self) -> &str {
        "quitter"
    }

    fn choose(&mut self, _snapshot: &MatchSnapshot, _me: CombatantId) -> Option<Intent> {
        None
    }
}

#[test]
fn test_hunters_finish_on_open_maze() {
    let (registry, id, a, b) = duel(Maze::open(7, 7));
    let report = Orchestrator::new()
        .seat(a, Box::new(HunterAi::new("red")))
        .seat(b, Box::new(HunterAi::new("blue")))
        .run(&registry, id, 100)
        .unwrap();

    assert_eq!(*report.final_status(), MatchStatus::Finished);
    assert!(report.winner().is_some());
    assert!(*report.turns_played() < 100);
    assert_eq!(
        registry.history(id).unwrap().len(),
        *report.turns_played() as usize
    );
}

#[test]
fn test_hunter_breaks_through_walls() {
    let mut maze = Maze::open(7, 5);
    for y in 1..=3 {
        maze.set_cell(Position::new(3, y), CellState::Wall).unwrap();
    }
    let (registry, id, a, b) = duel(maze);
    let report = Orchestrator::new()
        .seat(a, Box::new(HunterAi::new("red")))
        .seat(b, Box::new(HunterAi::new("blue")))
        .run(&registry, id, 100)
        .unwrap();

    assert_eq!(*report.final_status(), MatchStatus::Finished);
    let state = registry.state(id).unwrap();
    assert!((1..=3).any(|y| state.maze().cell(Position::new(3, y)) != Some(CellState::Wall)));
}

#[test]
fn test_hunters_finish_generated_maze() {
    let registry = MatchRegistry::new();
    let settings = MatchSettings::new(MatchMode::AiVsAi, 15, 15)
        .with_seed(2024)
        .with_layout(MazeLayout::Connected);
    let (id, _) = registry.create_match(&settings).unwrap();
    let (a, _) = registry.add_combatant(id, "red", CombatantKind::Ai).unwrap();
    let (b, _) = registry.add_combatant(id, "blue", CombatantKind::Ai).unwrap();

    let report = Orchestrator::new()
        .seat(a, Box::new(HunterAi::new("red")))
        .seat(b, Box::new(HunterAi::new("blue")))
        .run(&registry, id, 1000)
        .unwrap();
    assert_eq!(*report.final_status(), MatchStatus::Finished);
}

#[test]
fn test_turn_cap_stops_play() {
    let (registry, id, a, b) = duel(Maze::open(9, 9));
    let report = Orchestrator::new()
        .seat(a, Box::new(HunterAi::new("red")))
        .seat(b, Box::new(WandererAi::new("blue", 1)))
        .run(&registry, id, 1)
        .unwrap();

    assert_eq!(*report.turns_played(), 1);
    assert_eq!(*report.final_status(), MatchStatus::Playing);
    assert!(report.winner().is_none());
}

#[test]
fn test_observer_sees_forfeit() {
    let (registry, id, a, b) = duel(Maze::open(5, 5));
    let events = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&events);

    let report = Orchestrator::new()
        .seat(a, Box::new(Quitter))
        .seat(b, Box::new(HunterAi::new("blue")))
        .with_observer(move |event| sink.borrow_mut().push(event.clone()))
        .run(&registry, id, 10)
        .unwrap();

    assert_eq!(*report.turns_played(), 0);
    assert_eq!(
        events.borrow().as_slice(),
        &[GameEvent::Forfeited {
            player: "quitter".to_string()
        }]
    );
}

#[test]
fn test_observer_sees_game_over() {
    let (registry, id, a, b) = duel(Maze::open(5, 5));
    let events = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&events);

    Orchestrator::new()
        .seat(a, Box::new(HunterAi::new("red")))
        .seat(b, Box::new(HunterAi::new("blue")))
        .with_observer(move |event| sink.borrow_mut().push(event.clone()))
        .run(&registry, id, 50)
        .unwrap();

    let events = events.borrow();
    assert!(matches!(events.last(), Some(GameEvent::GameOver { winner: Some(_) })));
    assert!(events.len() >= 2);
}

#[test]
fn test_missing_seat_is_an_error() {
    let (registry, id, _, b) = duel(Maze::open(5, 5));
    let err = Orchestrator::new()
        .seat(b, Box::new(HunterAi::new("blue")))
        .run(&registry, id, 10)
        .unwrap_err();
    assert!(matches!(err, MatchError::Internal(_)));
}

#[test]
fn test_hunter_attacks_adjacent_opponent() {
    let mut game = Match::with_maze(MatchMode::AiVsAi, Maze::open(5, 5));
    let a = maze_duel::Combatant::new(
        "a",
        maze_duel::CombatantProfile::bare(CombatantKind::Ai),
        Position::new(2, 2),
    );
    let a_id = a.id();
    game.add_combatant(a).unwrap();
    game.add_combatant(maze_duel::Combatant::new(
        "b",
        maze_duel::CombatantProfile::bare(CombatantKind::Ai),
        Position::new(2, 3),
    ))
    .unwrap();

    let mut hunter = HunterAi::new("a");
    assert_eq!(
        hunter.choose(&game.snapshot(), a_id),
        Some(Intent::strike(Direction::South))
    );
    let mut wanderer = WandererAi::new("a", 9);
    assert_eq!(
        wanderer.choose(&game.snapshot(), a_id),
        Some(Intent::strike(Direction::South))
    );
}

#[test]
fn test_wanderer_is_deterministic_for_a_seed() {
    let (registry, id, a, _) = duel(Maze::open(9, 9));
    let snapshot = registry.state(id).unwrap();
    let mut first = WandererAi::new("w", 42);
    let mut second = WandererAi::new("w", 42);
    for _ in 0..10 {
        let intent = first.choose(&snapshot, a);
        assert!(intent.is_some());
        assert_eq!(intent, second.choose(&snapshot, a));
    }
}

#[test]
fn test_line_input_reprompts_on_bad_input() {
    let (registry, id, a, _) = duel(Maze::open(5, 5));
    let snapshot = registry.state(id).unwrap();
    let mut output = Vec::new();
    {
        let mut human = LineInput::new("me", Cursor::new("jump north\n\nmove east\n"), &mut output);
        assert_eq!(human.name(), "me");
        assert_eq!(
            human.choose(&snapshot, a),
            Some(Intent::step(Direction::East))
        );
    }
    let printed = String::from_utf8(output).unwrap();
    assert!(printed.contains("#####"));
    assert!(printed.contains("jump"));
    assert_eq!(printed.matches("turn 1 >").count(), 3);
}

#[test]
fn test_line_input_stops_on_quit_or_eof() {
    let (registry, id, a, _) = duel(Maze::open(5, 5));
    let snapshot = registry.state(id).unwrap();

    let mut quitting = LineInput::new("me", Cursor::new("quit\n"), Vec::new());
    assert_eq!(quitting.choose(&snapshot, a), None);

    let mut exhausted = LineInput::new("me", Cursor::new(""), Vec::new());
    assert_eq!(exhausted.choose(&snapshot, a), None);
}
