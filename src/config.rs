//! Engine configuration.
//!
//! Search depth, evaluator weights, and victory thresholds travel together
//! in an [`EngineConfig`] that is threaded through the evaluator and the
//! search. Configurations load from TOML or JSON and are validated once at
//! load time; nothing is re-checked mid-search.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::board::{Caste, StructureKind};
use crate::eval::table::{TableError, WeightTable};

/// Default lookahead depth.
pub const DEFAULT_MAX_DEPTH: u32 = 2;

/// Errors raised while loading or validating a configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("max_depth must be at least 1")]
    ZeroDepth,

    #[error("weights.scale must be positive and finite, got {0}")]
    InvalidScale(f64),

    #[error("weight '{name}' must be finite, got {value}")]
    NonFiniteWeight { name: &'static str, value: f64 },

    #[error("weight table '{name}': {source}")]
    Table {
        name: &'static str,
        #[source]
        source: TableError,
    },

    #[error("victory.resource_goal must be positive, got {0}")]
    InvalidResourceGoal(i32),

    #[error("failed to read config file {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid TOML config: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("invalid JSON config: {0}")]
    Json(#[from] serde_json::Error),
}

/// Conditions under which a player has won outright.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct VictoryThresholds {
    /// Stored resources that win the game.
    pub resource_goal: i32,
    /// Capture progress at which an occupied enemy home base falls.
    pub capture_threshold: u8,
}

impl Default for VictoryThresholds {
    fn default() -> Self {
        VictoryThresholds {
            resource_goal: 11,
            capture_threshold: StructureKind::HomeBase.capture_health() - 1,
        }
    }
}

/// Count tables for each non-royal caste.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompositionWeights {
    pub worker: WeightTable,
    pub drone: WeightTable,
    pub melee_soldier: WeightTable,
    pub ranged_soldier: WeightTable,
}

impl CompositionWeights {
    /// Table for a caste; the queen is scored separately.
    pub fn table(&self, caste: Caste) -> Option<&WeightTable> {
        match caste {
            Caste::Queen => None,
            Caste::Worker => Some(&self.worker),
            Caste::Drone => Some(&self.drone),
            Caste::MeleeSoldier => Some(&self.melee_soldier),
            Caste::RangedSoldier => Some(&self.ranged_soldier),
        }
    }
}

impl Default for CompositionWeights {
    fn default() -> Self {
        CompositionWeights {
            worker: WeightTable::from_values([0.0, 100_000.0, 100_400.0, 100_600.0]),
            drone: WeightTable::from_values([0.0, 300.0, 450.0]),
            melee_soldier: WeightTable::from_values([0.0, 500.0, 750.0]),
            ranged_soldier: WeightTable::from_values([0.0, 400.0, 600.0]),
        }
    }
}

/// Evaluator weights, one entry per sub-score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Weights {
    /// Raw score that maps to about 0.75 after squashing.
    pub scale: f64,
    /// Share of the opponent's raw score subtracted from ours. Zero scores
    /// the controlled player alone.
    pub opponent_factor: f64,
    pub composition: CompositionWeights,
    /// Stored resources to score.
    pub resources: WeightTable,
    /// Per worker carrying a resource.
    pub carrying: f64,
    /// Per step between a worker and its nearest goal.
    pub distance: f64,
    /// For a worker standing on its goal.
    pub arrival_bonus: f64,
    /// Per step between a military unit and the enemy home base.
    pub advance: f64,
    /// Per military unit in the enemy half of the board.
    pub frontier_bonus: f64,
    /// Queen off (positive) or on (negative) a goal tile.
    pub royal_safety: f64,
    /// Per unit that has acted this turn.
    pub activity: f64,
}

impl Default for Weights {
    fn default() -> Self {
        Weights {
            scale: 10_000.0,
            opponent_factor: 0.0,
            composition: CompositionWeights::default(),
            resources: WeightTable::from_values((0..=11).map(|n| n as f64 * 500.0)),
            carrying: 100.0,
            distance: 5.0,
            arrival_bonus: 5.0,
            advance: 2.0,
            frontier_bonus: 10.0,
            royal_safety: 20_000.0,
            activity: 1.0,
        }
    }
}

impl Weights {
    fn validate(&self) -> Result<(), ConfigError> {
        if !(self.scale.is_finite() && self.scale > 0.0) {
            return Err(ConfigError::InvalidScale(self.scale));
        }
        let scalars = [
            ("opponent_factor", self.opponent_factor),
            ("carrying", self.carrying),
            ("distance", self.distance),
            ("arrival_bonus", self.arrival_bonus),
            ("advance", self.advance),
            ("frontier_bonus", self.frontier_bonus),
            ("royal_safety", self.royal_safety),
            ("activity", self.activity),
        ];
        for (name, value) in scalars {
            if !value.is_finite() {
                return Err(ConfigError::NonFiniteWeight { name, value });
            }
        }
        let tables = [
            ("resources", &self.resources),
            ("composition.worker", &self.composition.worker),
            ("composition.drone", &self.composition.drone),
            ("composition.melee_soldier", &self.composition.melee_soldier),
            ("composition.ranged_soldier", &self.composition.ranged_soldier),
        ];
        for (name, table) in tables {
            table
                .validate()
                .map_err(|source| ConfigError::Table { name, source })?;
        }
        Ok(())
    }
}

/// Everything the evaluator and search read.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub max_depth: u32,
    pub weights: Weights,
    pub victory: VictoryThresholds,
    /// Score root children on the rayon pool. The chosen move is identical
    /// to the sequential search.
    pub parallel_root: bool,
    /// Wall-clock budget for one search, if any.
    pub time_limit_ms: Option<u64>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        EngineConfig {
            max_depth: DEFAULT_MAX_DEPTH,
            weights: Weights::default(),
            victory: VictoryThresholds::default(),
            parallel_root: false,
            time_limit_ms: None,
        }
    }
}

impl EngineConfig {
    /// Default configuration searching to `max_depth`.
    pub fn with_depth(max_depth: u32) -> Self {
        EngineConfig {
            max_depth,
            ..EngineConfig::default()
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_depth == 0 {
            return Err(ConfigError::ZeroDepth);
        }
        if self.victory.resource_goal <= 0 {
            return Err(ConfigError::InvalidResourceGoal(self.victory.resource_goal));
        }
        self.weights.validate()
    }

    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        let config: EngineConfig = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_json_str(s: &str) -> Result<Self, ConfigError> {
        let config: EngineConfig = serde_json::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    /// Loads a configuration file. `.json` files are read as JSON,
    /// everything else as TOML.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = match path.extension().and_then(|e| e.to_str()) {
            Some("json") => Self::from_json_str(&text)?,
            _ => Self::from_toml_str(&text)?,
        };
        tracing::debug!(path = %path.display(), max_depth = config.max_depth, "loaded engine config");
        Ok(config)
    }
}
