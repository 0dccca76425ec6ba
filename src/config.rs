//! Engine configuration loaded from TOML.
//!
//! ```toml
//! [maze]
//! width = 15
//! height = 15
//! wall_probability = 0.3
//! layout = "random"
//!
//! [rules]
//! attack_reach = "adjacent"
//!
//! [simulation]
//! max_turns = 200
//! seed = 7
//! ```
//!
//! Every key is optional.

use crate::games::maze::{
    AttackReach, DEFAULT_WALL_PROBABILITY, MatchMode, MatchSettings, MazeLayout,
};
use derive_getters::Getters;
use derive_more::{Display, Error};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, info, instrument};

/// Maze generation section.
#[derive(Debug, Clone, PartialEq, Getters, Serialize, Deserialize)]
pub struct MazeConfig {
    /// Grid width before clamping.
    #[serde(default = "default_side")]
    width: usize,

    /// Grid height before clamping.
    #[serde(default = "default_side")]
    height: usize,

    /// Chance that an interior cell starts as a wall.
    #[serde(default = "default_wall_probability")]
    wall_probability: f64,

    /// Generation policy.
    #[serde(default)]
    layout: MazeLayout,
}

/// Rules section.
#[derive(Debug, Clone, PartialEq, Default, Getters, Serialize, Deserialize)]
pub struct RulesConfig {
    /// Attack travel rule.
    #[serde(default)]
    attack_reach: AttackReach,
}

/// Simulation section used by the command-line runner.
#[derive(Debug, Clone, PartialEq, Getters, Serialize, Deserialize)]
pub struct SimulationConfig {
    /// Turn cap for simulated matches.
    #[serde(default = "default_max_turns")]
    max_turns: u32,

    /// Fixed seed for maze generation and scripted play.
    #[serde(default)]
    seed: Option<u64>,
}

/// Top-level engine configuration.
#[derive(Debug, Clone, PartialEq, Default, Getters, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Maze generation.
    #[serde(default)]
    maze: MazeConfig,

    /// Rules.
    #[serde(default)]
    rules: RulesConfig,

    /// Simulation runner.
    #[serde(default)]
    simulation: SimulationConfig,
}

fn default_side() -> usize {
    15
}

fn default_wall_probability() -> f64 {
    DEFAULT_WALL_PROBABILITY
}

fn default_max_turns() -> u32 {
    200
}

impl Default for MazeConfig {
    fn default() -> Self {
        Self {
            width: default_side(),
            height: default_side(),
            wall_probability: default_wall_probability(),
            layout: MazeLayout::default(),
        }
    }
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            max_turns: default_max_turns(),
            seed: None,
        }
    }
}

impl EngineConfig {
    /// Loads configuration from a TOML file.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        debug!("Loading config from file");
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::new(format!("Failed to read config file: {}", e)))?;
        let config = Self::from_toml_str(&content)?;
        info!(
            width = config.maze.width,
            height = config.maze.height,
            layout = %config.maze.layout,
            "Config loaded successfully"
        );
        Ok(config)
    }

    /// Parses configuration from TOML text.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)
            .map_err(|e| ConfigError::new(format!("Failed to parse config: {}", e)))?;
        if !(0.0..=1.0).contains(&config.maze.wall_probability) {
            return Err(ConfigError::new(format!(
                "maze.wall_probability must lie in [0, 1], got {}",
                config.maze.wall_probability
            )));
        }
        Ok(config)
    }

    /// Overrides the maze dimensions.
    pub fn with_size(mut self, width: usize, height: usize) -> Self {
        self.maze.width = width;
        self.maze.height = height;
        self
    }

    /// Overrides the generation policy.
    pub fn with_layout(mut self, layout: MazeLayout) -> Self {
        self.maze.layout = layout;
        self
    }

    /// Overrides the attack rule.
    pub fn with_attack_reach(mut self, attack_reach: AttackReach) -> Self {
        self.rules.attack_reach = attack_reach;
        self
    }

    /// Overrides the simulation turn cap.
    pub fn with_max_turns(mut self, max_turns: u32) -> Self {
        self.simulation.max_turns = max_turns;
        self
    }

    /// Fixes the seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.simulation.seed = Some(seed);
        self
    }

    /// Builds match settings for `mode` from this configuration.
    #[instrument(skip(self))]
    pub fn settings(&self, mode: MatchMode) -> MatchSettings {
        let settings = MatchSettings::new(mode, self.maze.width, self.maze.height)
            .with_wall_probability(self.maze.wall_probability)
            .with_layout(self.maze.layout)
            .with_attack_reach(self.rules.attack_reach);
        match self.simulation.seed {
            Some(seed) => settings.with_seed(seed),
            None => settings,
        }
    }
}

/// Configuration error.
#[derive(Debug, Clone, Display, Error)]
#[display("Config error: {} at {}:{}", message, file, line)]
pub struct ConfigError {
    /// Error message.
    pub message: String,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl ConfigError {
    /// Creates a new configuration error.
    #[track_caller]
    pub fn new(message: String) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            message,
            line: loc.line(),
            file: loc.file(),
        }
    }
}
