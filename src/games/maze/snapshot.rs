//! Read-only, serializable views of match state.

use super::combatant::CombatantProfile;
use super::types::{
    CellState, CombatantId, CombatantKind, MatchId, MatchMode, MatchStatus, Position,
};
use chrono::{DateTime, Utc};
use derive_getters::Getters;
use derive_new::new;
use serde::{Deserialize, Serialize};

/// Copy of the maze grid. `grid[y][x]` is the cell at `(x, y)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters, new)]
pub struct MazeSnapshot {
    width: usize,
    height: usize,
    grid: Vec<Vec<CellState>>,
}

impl MazeSnapshot {
    /// Cell at `position`, or `None` outside the grid.
    pub fn cell(&self, position: Position) -> Option<CellState> {
        let x = usize::try_from(position.x).ok()?;
        let y = usize::try_from(position.y).ok()?;
        self.grid.get(y)?.get(x).copied()
    }

    /// Text rendering: `#` wall, `.` empty, `@` occupied.
    pub fn render(&self) -> String {
        self.render_with(&[])
    }

    /// Text rendering with combatants drawn as `A`, `B`, … in list order.
    pub fn render_with(&self, combatants: &[CombatantSnapshot]) -> String {
        let mut out = String::with_capacity((self.width + 1) * self.height);
        for (y, row) in self.grid.iter().enumerate() {
            for (x, cell) in row.iter().enumerate() {
                let here = Position::new(x as i32, y as i32);
                let label = combatants
                    .iter()
                    .position(|c| c.position == here)
                    .and_then(|i| char::from_u32('A' as u32 + i as u32));
                out.push(label.unwrap_or_else(|| cell.glyph()));
            }
            if y + 1 < self.grid.len() {
                out.push('\n');
            }
        }
        out
    }
}

/// Copy of one combatant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters, new)]
pub struct CombatantSnapshot {
    id: CombatantId,
    name: String,
    #[serde(rename = "type")]
    kind: CombatantKind,
    position: Position,
    profile: CombatantProfile,
}

/// Full read-only state of a match.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters)]
pub struct MatchSnapshot {
    pub(crate) id: MatchId,
    pub(crate) mode: MatchMode,
    pub(crate) status: MatchStatus,
    pub(crate) turn: u32,
    pub(crate) turn_owner: Option<CombatantId>,
    pub(crate) maze: MazeSnapshot,
    pub(crate) combatants: Vec<CombatantSnapshot>,
    pub(crate) winner: Option<CombatantSnapshot>,
    pub(crate) winner_index: Option<usize>,
    pub(crate) fault: Option<String>,
    pub(crate) created_at: DateTime<Utc>,
    pub(crate) updated_at: DateTime<Utc>,
}

impl MatchSnapshot {
    /// Looks up a combatant by id.
    pub fn combatant(&self, id: CombatantId) -> Option<&CombatantSnapshot> {
        self.combatants.iter().find(|c| c.id == id)
    }

    /// The first combatant whose id differs from `id`.
    pub fn opponent_of(&self, id: CombatantId) -> Option<&CombatantSnapshot> {
        self.combatants.iter().find(|c| c.id != id)
    }

    /// Board drawing with combatant labels.
    pub fn render(&self) -> String {
        self.maze.render_with(&self.combatants)
    }
}

/// Compact listing entry for a stored match.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters, new)]
pub struct MatchSummary {
    id: MatchId,
    mode: MatchMode,
    status: MatchStatus,
    turn: u32,
    combatants: Vec<CombatantSnapshot>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}
