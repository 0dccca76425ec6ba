mod action;
mod combatant;
mod maze;
mod rules;
mod settings;
mod snapshot;
mod types;

pub use action::{ActionOutcome, ActionRecord};
pub use combatant::{Combatant, CombatantProfile};
pub use maze::{DEFAULT_WALL_PROBABILITY, MAX_SIDE, MIN_SIDE, Maze};
pub use rules::{MAX_COMBATANTS, Match};
pub use settings::MatchSettings;
pub use snapshot::{CombatantSnapshot, MatchSnapshot, MatchSummary, MazeSnapshot};
pub use types::{
    Action, ActionResult, AttackReach, CellState, CombatantId, CombatantKind, Direction, MatchId,
    MatchMode, MatchStatus, MazeLayout, Position,
};
