//! Match creation settings.

use super::maze::{DEFAULT_WALL_PROBABILITY, MAX_SIDE, MIN_SIDE};
use super::types::{AttackReach, MatchMode, MazeLayout};
use crate::error::MatchError;
use derive_setters::Setters;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

/// Validated input for creating a match.
///
/// Dimensions are clamped into `[MIN_SIDE, MAX_SIDE]` on construction.
/// The remaining knobs default to the classic rules and can be changed with
/// the `with_*` builders.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Setters)]
#[setters(prefix = "with_")]
pub struct MatchSettings {
    #[setters(skip)]
    mode: MatchMode,
    #[setters(skip)]
    width: usize,
    #[setters(skip)]
    height: usize,
    /// Chance that an interior cell starts as a wall.
    wall_probability: f64,
    /// Generation policy.
    layout: MazeLayout,
    /// Attack travel rule.
    attack_reach: AttackReach,
    /// Seed for deterministic maze generation.
    #[setters(strip_option)]
    seed: Option<u64>,
}

impl MatchSettings {
    /// Creates settings, clamping each dimension into the accepted range.
    #[instrument]
    pub fn new(mode: MatchMode, width: usize, height: usize) -> Self {
        let clamped_width = width.clamp(MIN_SIDE, MAX_SIDE);
        let clamped_height = height.clamp(MIN_SIDE, MAX_SIDE);
        if (clamped_width, clamped_height) != (width, height) {
            debug!(clamped_width, clamped_height, "Maze size clamped");
        }
        Self {
            mode,
            width: clamped_width,
            height: clamped_height,
            wall_probability: DEFAULT_WALL_PROBABILITY,
            layout: MazeLayout::default(),
            attack_reach: AttackReach::default(),
            seed: None,
        }
    }

    /// Checks every field, including dimensions of deserialized settings
    /// that never went through [`MatchSettings::new`].
    pub fn validate(&self) -> Result<(), MatchError> {
        let sides = MIN_SIDE..=MAX_SIDE;
        if !sides.contains(&self.width) || !sides.contains(&self.height) {
            return Err(MatchError::InvalidSettings(format!(
                "maze size must lie in [{MIN_SIDE}, {MAX_SIDE}], got {}x{}",
                self.width, self.height
            )));
        }
        if !(0.0..=1.0).contains(&self.wall_probability) {
            return Err(MatchError::InvalidSettings(format!(
                "wall probability must lie in [0, 1], got {}",
                self.wall_probability
            )));
        }
        Ok(())
    }

    /// Who plays.
    pub fn mode(&self) -> MatchMode {
        self.mode
    }

    /// Maze width after clamping.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Maze height after clamping.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Chance of an interior wall.
    pub fn wall_probability(&self) -> f64 {
        self.wall_probability
    }

    /// Generation policy.
    pub fn layout(&self) -> MazeLayout {
        self.layout
    }

    /// Attack travel rule.
    pub fn attack_reach(&self) -> AttackReach {
        self.attack_reach
    }

    /// Generation seed, if fixed.
    pub fn seed(&self) -> Option<u64> {
        self.seed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dimensions_are_clamped() {
        let settings = MatchSettings::new(MatchMode::AiVsAi, 2, 99);
        assert_eq!(settings.width(), MIN_SIDE);
        assert_eq!(settings.height(), MAX_SIDE);
    }

    #[test]
    fn builders_override_defaults() {
        let settings = MatchSettings::new(MatchMode::AiVsUser, 10, 10)
            .with_seed(42)
            .with_attack_reach(AttackReach::Line)
            .with_wall_probability(0.1);
        assert_eq!(settings.seed(), Some(42));
        assert_eq!(settings.attack_reach(), AttackReach::Line);
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn out_of_range_probability_is_rejected() {
        let settings = MatchSettings::new(MatchMode::AiVsAi, 10, 10).with_wall_probability(1.5);
        assert!(matches!(
            settings.validate(),
            Err(MatchError::InvalidSettings(_))
        ));
        let settings =
            MatchSettings::new(MatchMode::AiVsAi, 10, 10).with_wall_probability(f64::NAN);
        assert!(settings.validate().is_err());
    }

    #[test]
    fn deserialized_dimensions_are_checked() {
        let settings: MatchSettings = serde_json::from_str(
            r#"{"mode":"ai_vs_ai","width":200,"height":2,"wall_probability":0.3,
                "layout":"random","attack_reach":"adjacent","seed":null}"#,
        )
        .unwrap();
        assert!(matches!(
            settings.validate(),
            Err(MatchError::InvalidSettings(_))
        ));
    }
}
