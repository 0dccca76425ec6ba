//! Combatants: identity, controller profile, and position.

use super::snapshot::CombatantSnapshot;
use super::types::{CombatantId, CombatantKind, Position};
use serde::{Deserialize, Serialize};
use tracing::instrument;

/// Controller-specific metadata attached to a combatant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CombatantProfile {
    /// Human player.
    User {
        /// Account identifier, when the caller has one.
        user_id: Option<String>,
    },
    /// Scripted player.
    Ai {
        /// Reference to the uploaded script.
        script_id: Option<String>,
        /// External worker currently running the script.
        worker_id: Option<String>,
    },
}

impl CombatantProfile {
    /// Profile with no metadata for the given kind.
    pub fn bare(kind: CombatantKind) -> Self {
        match kind {
            CombatantKind::User => CombatantProfile::User { user_id: None },
            CombatantKind::Ai => CombatantProfile::Ai {
                script_id: None,
                worker_id: None,
            },
        }
    }

    /// The type tag of this profile.
    pub fn kind(&self) -> CombatantKind {
        match self {
            CombatantProfile::User { .. } => CombatantKind::User,
            CombatantProfile::Ai { .. } => CombatantKind::Ai,
        }
    }
}

/// A participant in a match.
///
/// Identity and profile are fixed at creation. The position changes only
/// through [`Combatant::relocate`], which trusts its caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Combatant {
    id: CombatantId,
    name: String,
    profile: CombatantProfile,
    position: Position,
}

impl Combatant {
    /// Creates a combatant with a fresh id.
    #[instrument(skip(name), fields(name = %name.as_ref()))]
    pub fn new(name: impl AsRef<str>, profile: CombatantProfile, position: Position) -> Self {
        Self::with_id(CombatantId::new(), name, profile, position)
    }

    /// Creates a combatant with a caller-supplied id.
    pub fn with_id(
        id: CombatantId,
        name: impl AsRef<str>,
        profile: CombatantProfile,
        position: Position,
    ) -> Self {
        Self {
            id,
            name: name.as_ref().to_string(),
            profile,
            position,
        }
    }

    /// Combatant id.
    pub fn id(&self) -> CombatantId {
        self.id
    }

    /// Display name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Controller metadata.
    pub fn profile(&self) -> &CombatantProfile {
        &self.profile
    }

    /// USER or AI.
    pub fn kind(&self) -> CombatantKind {
        self.profile.kind()
    }

    /// Current cell.
    pub fn position(&self) -> Position {
        self.position
    }

    /// Moves the combatant. No validation.
    pub fn relocate(&mut self, position: Position) {
        self.position = position;
    }

    /// Records the external worker driving an AI combatant.
    /// Returns false for human combatants.
    pub(crate) fn attach_worker(&mut self, worker: String) -> bool {
        match &mut self.profile {
            CombatantProfile::Ai { worker_id, .. } => {
                *worker_id = Some(worker);
                true
            }
            CombatantProfile::User { .. } => false,
        }
    }

    /// Serializable copy of this combatant.
    pub fn snapshot(&self) -> CombatantSnapshot {
        CombatantSnapshot::new(
            self.id,
            self.name.clone(),
            self.kind(),
            self.position,
            self.profile.clone(),
        )
    }
}
