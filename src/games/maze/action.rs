//! Records of resolved actions.
//!
//! Every action the rules accept is logged as an [`ActionRecord`], blocked
//! moves included. Rejected requests never reach the log.

use super::snapshot::MatchSnapshot;
use super::types::{Action, ActionResult, CombatantId, CombatantKind, Direction};
use chrono::{DateTime, Utc};
use derive_getters::Getters;
use derive_new::new;
use serde::{Deserialize, Serialize};

/// One resolved action in a match's history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters, new)]
pub struct ActionRecord {
    /// Turn number the action was submitted on.
    turn: u32,
    /// Acting combatant.
    combatant_id: CombatantId,
    /// USER or AI.
    kind: CombatantKind,
    /// What was attempted.
    action: Action,
    /// Where it was aimed.
    direction: Direction,
    /// How it resolved.
    result: ActionResult,
    /// When it was resolved.
    at: DateTime<Utc>,
}

impl std::fmt::Display for ActionRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "turn {}: {} {} {} -> {}",
            self.turn, self.kind, self.action, self.direction, self.result
        )
    }
}

/// Result of a submitted action together with the state it produced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters, new)]
pub struct ActionOutcome {
    /// How the action resolved.
    result: ActionResult,
    /// State after resolution.
    snapshot: MatchSnapshot,
}
