//! Maze Duel: a turn-based combat engine for two combatants in a grid maze.
//!
//! # Architecture
//!
//! - **Games**: the maze, combatants, and the per-match turn state machine
//! - **Registry**: process-wide store of matches, one writer per match
//! - **Agent**: scripted strategies standing in for external AI workers
//! - **Orchestrator**: plays a match between seated strategies
//! - **Config**: TOML engine configuration
//!
//! # Example
//!
//! ```
//! use maze_duel::{CombatantKind, MatchMode, MatchRegistry, MatchSettings, MatchStatus};
//!
//! # fn example() -> Result<(), maze_duel::MatchError> {
//! let registry = MatchRegistry::new();
//! let settings = MatchSettings::new(MatchMode::AiVsAi, 10, 10).with_seed(7);
//! let (match_id, _) = registry.create_match(&settings)?;
//!
//! registry.add_combatant(match_id, "red", CombatantKind::Ai)?;
//! let (_, status) = registry.add_combatant(match_id, "blue", CombatantKind::Ai)?;
//! assert_eq!(status, MatchStatus::Playing);
//! # Ok(())
//! # }
//! # example().unwrap();
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

// Private module declarations
mod agent;
mod config;
mod error;
mod games;
mod orchestrator;
mod registry;

// Crate-level exports - Errors
pub use error::{ErrorCategory, MatchError};

// Crate-level exports - Configuration
pub use config::{ConfigError, EngineConfig, MazeConfig, RulesConfig, SimulationConfig};

// Crate-level exports - Match registry
pub use registry::MatchRegistry;

// Crate-level exports - Strategies and orchestration
pub use agent::{HunterAi, Intent, LineInput, Strategy, WandererAi};
pub use orchestrator::{GameEvent, Orchestrator, SimulationReport};

// Crate-level exports - Game types
pub use games::maze::{
    Action, ActionOutcome, ActionRecord, ActionResult, AttackReach, CellState, Combatant,
    CombatantId, CombatantKind, CombatantProfile, CombatantSnapshot, DEFAULT_WALL_PROBABILITY,
    Direction, MAX_COMBATANTS, MAX_SIDE, MIN_SIDE, Match, MatchId, MatchMode, MatchSettings,
    MatchSnapshot, MatchStatus, MatchSummary, Maze, MazeLayout, MazeSnapshot, Position,
};
