//! Error types for the match engine and registry.

use crate::games::maze::{CellState, CombatantId, MatchId, MatchStatus, Position};
use serde::Serialize;

/// Broad class of a [`MatchError`], used by callers to pick a response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, strum::Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ErrorCategory {
    /// Malformed or out-of-range input.
    Validation,
    /// Unknown match or combatant.
    NotFound,
    /// Request conflicts with the current match state.
    Conflict,
    /// Unexpected engine state.
    Internal,
}

/// Errors raised by maze queries, match operations, and the registry.
///
/// Every operation that returns one of these leaves the match untouched,
/// except resolution faults, which move the match to [`MatchStatus::Error`].
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display)]
pub enum MatchError {
    /// Position lies outside the grid.
    #[display("Position {} lies outside the {}x{} maze", position, width, height)]
    OutOfBounds {
        /// Offending position.
        position: Position,
        /// Maze width.
        width: usize,
        /// Maze height.
        height: usize,
    },

    /// A combatant cannot be placed on a non-empty cell.
    #[display("Cannot place combatant at {}: cell is {}", position, cell)]
    SpawnUnavailable {
        /// Requested position.
        position: Position,
        /// State found at that position.
        cell: CellState,
    },

    /// Match already holds two combatants.
    #[display("Match already has the maximum of {} combatants", _0)]
    CapacityExceeded(usize),

    /// Turn owner requested before both combatants joined.
    #[display("Turn owner is undefined with {} combatant(s) present", _0)]
    TurnOwnerUndefined(usize),

    /// Action submitted while the match is not playing.
    #[display("Match is not in playing state (status: {})", _0)]
    NotPlaying(MatchStatus),

    /// Action submitted after the match ended.
    #[display("Match is already finished")]
    MatchFinished,

    /// Action submitted by a combatant who does not own the turn.
    #[display("Not your turn: combatant {} acted, {} owns the turn", combatant, expected)]
    NotYourTurn {
        /// Combatant that submitted the action.
        combatant: CombatantId,
        /// Combatant that owns the turn.
        expected: CombatantId,
    },

    /// Combatant is not part of the match.
    #[display("Combatant {} is not part of this match", _0)]
    UnknownCombatant(CombatantId),

    /// Action string not recognised.
    #[display("Invalid action: {:?}", _0)]
    InvalidAction(String),

    /// Direction string not recognised.
    #[display("Invalid direction: {:?}", _0)]
    InvalidDirection(String),

    /// Combatant type string not recognised.
    #[display("Invalid combatant type: {:?}", _0)]
    InvalidCombatantKind(String),

    /// Match mode string not recognised.
    #[display("Invalid game mode: {:?}", _0)]
    InvalidMode(String),

    /// Identifier string is not a valid id.
    #[display("Malformed identifier: {:?}", _0)]
    MalformedId(String),

    /// Settings failed validation.
    #[display("Invalid match settings: {}", _0)]
    InvalidSettings(String),

    /// No match with this id exists.
    #[display("Match {} not found", _0)]
    MatchNotFound(MatchId),

    /// Unexpected state inside the engine.
    #[display("Internal error: {}", _0)]
    Internal(String),
}

impl std::error::Error for MatchError {}

impl MatchError {
    /// Returns the category used to translate this error for callers.
    pub fn category(&self) -> ErrorCategory {
        match self {
            MatchError::OutOfBounds { .. }
            | MatchError::SpawnUnavailable { .. }
            | MatchError::InvalidAction(_)
            | MatchError::InvalidDirection(_)
            | MatchError::InvalidCombatantKind(_)
            | MatchError::InvalidMode(_)
            | MatchError::MalformedId(_)
            | MatchError::InvalidSettings(_) => ErrorCategory::Validation,
            MatchError::UnknownCombatant(_) | MatchError::MatchNotFound(_) => {
                ErrorCategory::NotFound
            }
            MatchError::CapacityExceeded(_)
            | MatchError::TurnOwnerUndefined(_)
            | MatchError::NotPlaying(_)
            | MatchError::MatchFinished
            | MatchError::NotYourTurn { .. } => ErrorCategory::Conflict,
            MatchError::Internal(_) => ErrorCategory::Internal,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn categories_follow_taxonomy() {
        assert_eq!(
            MatchError::InvalidDirection("up".into()).category(),
            ErrorCategory::Validation
        );
        assert_eq!(
            MatchError::MatchNotFound(MatchId::new()).category(),
            ErrorCategory::NotFound
        );
        assert_eq!(MatchError::CapacityExceeded(2).category(), ErrorCategory::Conflict);
        assert_eq!(MatchError::MatchFinished.category(), ErrorCategory::Conflict);
        assert_eq!(
            MatchError::Internal("boom".into()).category(),
            ErrorCategory::Internal
        );
    }

    #[test]
    fn messages_name_the_problem() {
        let err = MatchError::OutOfBounds {
            position: Position::new(-1, 2),
            width: 5,
            height: 5,
        };
        assert_eq!(err.to_string(), "Position (-1, 2) lies outside the 5x5 maze");
        assert_eq!(
            MatchError::NotPlaying(MatchStatus::Waiting).to_string(),
            "Match is not in playing state (status: waiting)"
        );
    }
}
