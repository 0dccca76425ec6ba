//! Scripted players.
//!
//! A [`Strategy`] looks at a match snapshot and picks the next action for
//! the combatant it controls. Strategies never touch the match directly;
//! the [`Orchestrator`](crate::Orchestrator) submits their choices through
//! the registry like any other client.

use crate::error::MatchError;
use crate::games::maze::{
    Action, CellState, CombatantId, Direction, MatchSnapshot, MazeSnapshot, Position,
};
use derive_more::Display;
use derive_new::new;
use rand::SeedableRng;
use rand::seq::SliceRandom;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use std::io::{BufRead, Write};
use std::str::FromStr;
use tracing::{debug, instrument, warn};

/// One action a strategy wants to take.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, new)]
#[display("{} {}", action, direction)]
pub struct Intent {
    /// What to do.
    pub action: Action,
    /// Where to do it.
    pub direction: Direction,
}

impl Intent {
    /// Move one cell.
    pub fn step(direction: Direction) -> Self {
        Self::new(Action::Move, direction)
    }

    /// Attack towards `direction`.
    pub fn strike(direction: Direction) -> Self {
        Self::new(Action::Attack, direction)
    }
}

impl FromStr for Intent {
    type Err = MatchError;

    /// Parses `"<action> <direction>"`, e.g. `"move north"`.
    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let mut words = raw.split_whitespace();
        let action = Action::parse(words.next().unwrap_or_default())?;
        let direction = Direction::parse(words.next().unwrap_or_default())?;
        if let Some(extra) = words.next() {
            return Err(MatchError::InvalidAction(format!("unexpected '{extra}'")));
        }
        Ok(Self::new(action, direction))
    }
}

/// Decision-making for one combatant.
pub trait Strategy {
    /// Display name of this strategy.
    fn name(&self) -> &str;

    /// Chooses the next action for `me`, or `None` to stop playing.
    fn choose(&mut self, snapshot: &MatchSnapshot, me: CombatantId) -> Option<Intent>;
}

fn is_interior(maze: &MazeSnapshot, position: Position) -> bool {
    position.x > 0
        && position.y > 0
        && (position.x as usize) < maze.width() - 1
        && (position.y as usize) < maze.height() - 1
}

fn breakable(maze: &MazeSnapshot, position: Position) -> bool {
    maze.cell(position) == Some(CellState::Wall) && is_interior(maze, position)
}

fn open(maze: &MazeSnapshot, position: Position) -> bool {
    maze.cell(position) == Some(CellState::Empty)
}

/// Direction in which `target` is the neighbour of `from`, if any.
fn adjacent_direction(from: Position, target: Position) -> Option<Direction> {
    Direction::ALL
        .into_iter()
        .find(|&direction| from.step(direction) == target)
}

/// Directions that bring `from` closer to `target`, longest axis first.
fn directions_toward(from: Position, target: Position) -> Vec<Direction> {
    let dx = target.x - from.x;
    let dy = target.y - from.y;
    let horizontal = match dx.signum() {
        1 => Some(Direction::East),
        -1 => Some(Direction::West),
        _ => None,
    };
    let vertical = match dy.signum() {
        1 => Some(Direction::South),
        -1 => Some(Direction::North),
        _ => None,
    };
    let ordered = if dx.abs() >= dy.abs() {
        [horizontal, vertical]
    } else {
        [vertical, horizontal]
    };
    ordered.into_iter().flatten().collect()
}

/// Chases the opponent, breaking walls on the way.
#[derive(Debug, Clone)]
pub struct HunterAi {
    name: String,
}

impl HunterAi {
    /// Creates a hunter.
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

impl Strategy for HunterAi {
    fn name(&self) -> &str {
        &self.name
    }

    #[instrument(skip(self, snapshot), fields(ai = %self.name))]
    fn choose(&mut self, snapshot: &MatchSnapshot, me: CombatantId) -> Option<Intent> {
        let own = *snapshot.combatant(me)?.position();
        let target = *snapshot.opponent_of(me)?.position();
        let maze = snapshot.maze();

        if let Some(direction) = adjacent_direction(own, target) {
            debug!(%direction, "Opponent in reach");
            return Some(Intent::strike(direction));
        }

        let toward = directions_toward(own, target);
        let intent = toward
            .iter()
            .find(|&&d| open(maze, own.step(d)))
            .map(|&d| Intent::step(d))
            .or_else(|| {
                toward
                    .iter()
                    .find(|&&d| breakable(maze, own.step(d)))
                    .map(|&d| Intent::strike(d))
            })
            .or_else(|| {
                Direction::ALL
                    .into_iter()
                    .find(|&d| open(maze, own.step(d)))
                    .map(Intent::step)
            })
            .or_else(|| {
                Direction::ALL
                    .into_iter()
                    .find(|&d| breakable(maze, own.step(d)))
                    .map(Intent::strike)
            });

        match intent {
            Some(intent) => debug!(%intent, "AI chose action"),
            None => warn!("No action available"),
        }
        intent
    }
}

/// Wanders at random, striking the opponent when it is adjacent.
#[derive(Debug, Clone)]
pub struct WandererAi {
    name: String,
    rng: ChaCha8Rng,
}

impl WandererAi {
    /// Creates a wanderer with a fixed seed.
    pub fn new(name: impl Into<String>, seed: u64) -> Self {
        Self {
            name: name.into(),
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }
}

impl Strategy for WandererAi {
    fn name(&self) -> &str {
        &self.name
    }

    #[instrument(skip(self, snapshot), fields(ai = %self.name))]
    fn choose(&mut self, snapshot: &MatchSnapshot, me: CombatantId) -> Option<Intent> {
        let own = *snapshot.combatant(me)?.position();
        let maze = snapshot.maze();

        if let Some(direction) = snapshot
            .opponent_of(me)
            .and_then(|opponent| adjacent_direction(own, *opponent.position()))
        {
            return Some(Intent::strike(direction));
        }

        let options: Vec<Intent> = Direction::ALL
            .into_iter()
            .filter_map(|d| {
                let next = own.step(d);
                if open(maze, next) {
                    Some(Intent::step(d))
                } else if breakable(maze, next) {
                    Some(Intent::strike(d))
                } else {
                    None
                }
            })
            .collect();

        let intent = options.choose(&mut self.rng).copied();
        debug!(options = options.len(), ?intent, "AI chose action");
        intent
    }
}

/// Human player typing `<action> <direction>` lines.
///
/// The board is written to `output` before each prompt. Unparseable lines
/// are reported and the prompt repeats; end of input or `quit` stops play.
pub struct LineInput<R, W> {
    name: String,
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> LineInput<R, W> {
    /// Creates a line-driven player.
    pub fn new(name: impl Into<String>, input: R, output: W) -> Self {
        Self {
            name: name.into(),
            input,
            output,
        }
    }

    fn prompt(&mut self, snapshot: &MatchSnapshot) -> std::io::Result<()> {
        writeln!(self.output, "\n{}\n", snapshot.render())?;
        write!(self.output, "turn {} > ", snapshot.turn())?;
        self.output.flush()
    }
}

impl<R: BufRead, W: Write> Strategy for LineInput<R, W> {
    fn name(&self) -> &str {
        &self.name
    }

    fn choose(&mut self, snapshot: &MatchSnapshot, _me: CombatantId) -> Option<Intent> {
        loop {
            if let Err(e) = self.prompt(snapshot) {
                warn!(error = %e, "Failed to write prompt");
                return None;
            }

            let mut line = String::new();
            match self.input.read_line(&mut line) {
                Ok(0) => return None,
                Ok(_) => {}
                Err(e) => {
                    warn!(error = %e, "Failed to read input");
                    return None;
                }
            }

            let line = line.trim();
            if line.eq_ignore_ascii_case("quit") {
                return None;
            }
            match line.parse::<Intent>() {
                Ok(intent) => return Some(intent),
                Err(e) => {
                    if writeln!(self.output, "{e}").is_err() {
                        return None;
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn intent_parses_two_words() {
        let intent: Intent = "Attack  west".parse().unwrap();
        assert_eq!(intent, Intent::strike(Direction::West));
        assert_eq!(intent.to_string(), "attack west");
    }

    #[test]
    fn intent_rejects_garbage() {
        assert!(matches!(
            "jump north".parse::<Intent>(),
            Err(MatchError::InvalidAction(_))
        ));
        assert!(matches!(
            "move up".parse::<Intent>(),
            Err(MatchError::InvalidDirection(_))
        ));
        assert!("move north now".parse::<Intent>().is_err());
        assert!("".parse::<Intent>().is_err());
    }

    #[test]
    fn toward_prefers_longer_axis() {
        let from = Position::new(1, 1);
        assert_eq!(
            directions_toward(from, Position::new(4, 2)),
            vec![Direction::East, Direction::South]
        );
        assert_eq!(
            directions_toward(from, Position::new(1, 0)),
            vec![Direction::North]
        );
    }
}
