//! Core domain types for maze duels.

use crate::error::MatchError;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};
use uuid::Uuid;

/// Unique identifier of a match.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    derive_more::Display,
)]
#[serde(transparent)]
pub struct MatchId(Uuid);

impl MatchId {
    /// Creates a fresh random identifier.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Parses an identifier from its string form.
    pub fn parse(raw: &str) -> Result<Self, MatchError> {
        Uuid::parse_str(raw.trim())
            .map(Self)
            .map_err(|_| MatchError::MalformedId(raw.to_string()))
    }
}

impl Default for MatchId {
    fn default() -> Self {
        Self::new()
    }
}

/// Unique identifier of a combatant.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    derive_more::Display,
)]
#[serde(transparent)]
pub struct CombatantId(Uuid);

impl CombatantId {
    /// Creates a fresh random identifier.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Parses an identifier from its string form.
    pub fn parse(raw: &str) -> Result<Self, MatchError> {
        Uuid::parse_str(raw.trim())
            .map(Self)
            .map_err(|_| MatchError::MalformedId(raw.to_string()))
    }
}

impl Default for CombatantId {
    fn default() -> Self {
        Self::new()
    }
}

/// A grid coordinate. `x` grows eastward, `y` grows southward.
///
/// Coordinates are signed so that stepping off the grid is representable;
/// bounds are enforced by the maze, never by the position itself.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    derive_more::Display,
    derive_new::new,
)]
#[display("({}, {})", x, y)]
pub struct Position {
    /// Column index.
    pub x: i32,
    /// Row index.
    pub y: i32,
}

impl Position {
    /// Returns the neighbouring coordinate in the given direction.
    pub fn step(self, direction: Direction) -> Self {
        let (dx, dy) = direction.offset();
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }

    /// Manhattan distance to another position.
    pub fn distance(self, other: Position) -> u32 {
        self.x.abs_diff(other.x) + self.y.abs_diff(other.y)
    }
}

/// Cardinal directions. Adjacency is strictly four-neighbourhood.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, EnumIter,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Direction {
    /// Toward decreasing `y`.
    North,
    /// Toward increasing `y`.
    South,
    /// Toward increasing `x`.
    East,
    /// Toward decreasing `x`.
    West,
}

impl Direction {
    /// All directions in a fixed order.
    pub const ALL: [Direction; 4] = [
        Direction::North,
        Direction::South,
        Direction::East,
        Direction::West,
    ];

    /// Coordinate delta `(dx, dy)` for one step.
    pub const fn offset(self) -> (i32, i32) {
        match self {
            Direction::North => (0, -1),
            Direction::South => (0, 1),
            Direction::East => (1, 0),
            Direction::West => (-1, 0),
        }
    }

    /// Parses a direction, reporting `InvalidDirection` on failure.
    pub fn parse(raw: &str) -> Result<Self, MatchError> {
        raw.trim()
            .parse()
            .map_err(|_| MatchError::InvalidDirection(raw.to_string()))
    }
}

/// State of a single maze cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum CellState {
    /// Free to enter.
    Empty,
    /// Blocks movement; destroyed by an attack.
    Wall,
    /// Holds a combatant.
    Occupied,
}

impl CellState {
    /// Single-character glyph used by text renderings.
    pub const fn glyph(self) -> char {
        match self {
            CellState::Empty => '.',
            CellState::Wall => '#',
            CellState::Occupied => '@',
        }
    }
}

/// Kind of action a combatant can take on its turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum Action {
    /// Step one cell.
    Move,
    /// Strike toward a direction.
    Attack,
}

impl Action {
    /// Parses an action, reporting `InvalidAction` on failure.
    pub fn parse(raw: &str) -> Result<Self, MatchError> {
        raw.trim()
            .parse()
            .map_err(|_| MatchError::InvalidAction(raw.to_string()))
    }
}

/// Outcome of a resolved action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ActionResult {
    /// Move completed or wall destroyed.
    Success,
    /// Move target not passable. Does not consume the turn.
    Blocked,
    /// Attack struck the opponent; the match is over.
    Hit,
    /// Attack struck nothing.
    Miss,
}

impl ActionResult {
    /// Whether this result advances the turn counter.
    pub const fn consumes_turn(self) -> bool {
        !matches!(self, ActionResult::Blocked)
    }
}

/// Who plays a match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum MatchMode {
    /// A scripted AI against a human.
    AiVsUser,
    /// Two scripted AIs.
    AiVsAi,
}

impl MatchMode {
    /// Parses a mode, reporting `InvalidMode` on failure.
    pub fn parse(raw: &str) -> Result<Self, MatchError> {
        raw.trim()
            .parse()
            .map_err(|_| MatchError::InvalidMode(raw.to_string()))
    }
}

/// Lifecycle state of a match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum MatchStatus {
    /// Fewer than two combatants present.
    Waiting,
    /// Accepting actions.
    Playing,
    /// Someone was hit.
    Finished,
    /// Resolution hit an internal fault.
    Error,
}

/// Whether a combatant is driven by a person or a script.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum CombatantKind {
    /// Human-controlled.
    User,
    /// Script-controlled.
    Ai,
}

impl CombatantKind {
    /// Parses a kind, reporting `InvalidCombatantKind` on failure.
    pub fn parse(raw: &str) -> Result<Self, MatchError> {
        raw.trim()
            .parse()
            .map_err(|_| MatchError::InvalidCombatantKind(raw.to_string()))
    }
}

/// How far an attack travels.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum AttackReach {
    /// Only the neighbouring cell.
    #[default]
    Adjacent,
    /// Through empty cells until the first wall or combatant.
    Line,
}

/// Maze generation policy.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum MazeLayout {
    /// Independent random walls; the start cells may be mutually unreachable.
    #[default]
    Random,
    /// Random walls, re-rolled or carved until the start cells connect.
    Connected,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn direction_offsets_are_unit_steps() {
        let origin = Position::new(3, 3);
        assert_eq!(origin.step(Direction::North), Position::new(3, 2));
        assert_eq!(origin.step(Direction::South), Position::new(3, 4));
        assert_eq!(origin.step(Direction::East), Position::new(4, 3));
        assert_eq!(origin.step(Direction::West), Position::new(2, 3));
    }

    #[test]
    fn parsing_is_case_insensitive() {
        assert_eq!(Direction::parse("NORTH").unwrap(), Direction::North);
        assert_eq!(Action::parse(" attack ").unwrap(), Action::Attack);
        assert_eq!(MatchMode::parse("ai_vs_user").unwrap(), MatchMode::AiVsUser);
        assert_eq!(CombatantKind::parse("AI").unwrap(), CombatantKind::Ai);
    }

    #[test]
    fn parse_failures_map_to_typed_errors() {
        assert!(matches!(
            Direction::parse("up"),
            Err(MatchError::InvalidDirection(_))
        ));
        assert!(matches!(Action::parse("defend"), Err(MatchError::InvalidAction(_))));
        assert!(matches!(MatchMode::parse("pvp"), Err(MatchError::InvalidMode(_))));
    }

    #[test]
    fn only_blocked_keeps_the_turn() {
        assert!(!ActionResult::Blocked.consumes_turn());
        assert!(ActionResult::Success.consumes_turn());
        assert!(ActionResult::Hit.consumes_turn());
        assert!(ActionResult::Miss.consumes_turn());
    }

    #[test]
    fn enums_serialize_snake_case() {
        assert_eq!(
            serde_json::to_string(&MatchMode::AiVsUser).unwrap(),
            "\"ai_vs_user\""
        );
        assert_eq!(serde_json::to_string(&CellState::Occupied).unwrap(), "\"occupied\"");
        assert_eq!(MatchStatus::Playing.to_string(), "playing");
    }
}
