//! Configuration loading and typed config structures for the camp-raid
//! environment.
//!
//! The canonical configuration lives in `camp-raid-config.yaml`. This
//! module defines strongly-typed structs that mirror the YAML structure and
//! a loader that reads and validates the file. Every field has a default,
//! so an empty document yields a playable environment.

use std::path::Path;

use raid_agents::{AgentConfig, AgentError};
use raid_ledger::DepositRule;
use raid_world::{ArenaConfig, ArenaLayout, WorldError};
use serde::Deserialize;

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read the configuration file from disk.
    #[error("failed to read config file: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// Failed to parse YAML content.
    #[error("failed to parse config YAML: {source}")]
    Yaml {
        /// The underlying YAML parse error.
        source: serde_yml::Error,
    },

    /// The arena section describes an unusable layout.
    #[error("invalid arena: {source}")]
    Arena {
        /// The underlying layout error.
        #[from]
        source: WorldError,
    },

    /// The agents section is unusable.
    #[error("invalid agent settings: {source}")]
    Agents {
        /// The underlying agent error.
        #[from]
        source: AgentError,
    },

    /// A value is out of its allowed range.
    #[error("invalid configuration: {reason}")]
    Invalid {
        /// Explanation of what is wrong.
        reason: String,
    },
}

impl From<serde_yml::Error> for ConfigError {
    fn from(source: serde_yml::Error) -> Self {
        Self::Yaml { source }
    }
}

/// Top-level environment configuration.
///
/// Mirrors the structure of `camp-raid-config.yaml`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct EnvironmentConfig {
    /// Arena geometry: bounds, zones, spawn points.
    #[serde(default)]
    pub arena: ArenaConfig,

    /// Episode length, win threshold and initial stocks.
    #[serde(default)]
    pub episode: EpisodeConfig,

    /// Shaping and terminal rewards.
    #[serde(default)]
    pub rewards: RewardConfig,

    /// Spatial query and placement parameters.
    #[serde(default)]
    pub spatial: SpatialConfig,

    /// Per-agent mechanics.
    #[serde(default)]
    pub agents: AgentConfig,

    /// Run loop and process settings.
    #[serde(default)]
    pub runtime: RuntimeConfig,
}

impl EnvironmentConfig {
    /// Load configuration from a YAML file at the given path.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read, or
    /// [`ConfigError::Yaml`] if the content is not valid YAML.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::parse(&contents)
    }

    /// Parse configuration from a YAML string.
    ///
    /// An empty or whitespace-only document yields the defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Yaml`] if the string is not valid YAML.
    pub fn parse(yaml: &str) -> Result<Self, ConfigError> {
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yml::from_str(yaml)?)
    }

    /// Check every value the environment cannot run with.
    ///
    /// A density cap of zero is accepted and treated as one.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] describing the first invalid value found.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let _ = ArenaLayout::from_config(&self.arena)?;
        self.agents.validate()?;

        if self.episode.max_steps == 0 {
            return Err(invalid("episode.max_steps must be at least 1"));
        }
        if self.spatial.spawn_grid_cols == 0 {
            return Err(invalid("spatial.spawn_grid_cols must be at least 1"));
        }

        let non_negative = [
            ("spatial.local_density_radius", self.spatial.local_density_radius),
            ("spatial.min_separation", self.spatial.min_separation),
            ("spatial.world_pick_radius", self.spatial.world_pick_radius),
            ("spatial.spawn_grid_step", self.spatial.spawn_grid_step),
            ("spatial.pickup_footprint[0]", self.spatial.pickup_footprint[0]),
            ("spatial.pickup_footprint[1]", self.spatial.pickup_footprint[1]),
        ];
        for (name, value) in non_negative {
            if !value.is_finite() || value < 0.0 {
                return Err(invalid(&format!("{name} must be finite and >= 0, got {value}")));
            }
        }
        if !self.spatial.stock_normalizer.is_finite() || self.spatial.stock_normalizer <= 0.0 {
            return Err(invalid(&format!(
                "spatial.stock_normalizer must be > 0, got {}",
                self.spatial.stock_normalizer
            )));
        }
        if self.spatial.base_heal_per_tick < 0 {
            return Err(invalid("spatial.base_heal_per_tick must be >= 0"));
        }

        let rewards = [
            ("rewards.stock_delta_reward", self.rewards.stock_delta_reward),
            ("rewards.timeout_penalty", self.rewards.timeout_penalty),
            ("rewards.win_reward", self.rewards.win_reward),
            ("rewards.loss_penalty", self.rewards.loss_penalty),
        ];
        for (name, value) in rewards {
            if !value.is_finite() {
                return Err(invalid(&format!("{name} must be finite, got {value}")));
            }
        }
        Ok(())
    }
}

fn invalid(reason: &str) -> ConfigError {
    ConfigError::Invalid {
        reason: reason.to_owned(),
    }
}

/// Episode configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct EpisodeConfig {
    /// Steps before an episode ends in a tie.
    #[serde(default = "default_max_steps")]
    pub max_steps: u64,

    /// Camp total (iron + mana) that wins the episode.
    #[serde(default = "default_win_stock_threshold")]
    pub win_stock_threshold: u32,

    /// Iron in the Red camp at every reset.
    #[serde(default = "default_initial_stock")]
    pub initial_iron_red: u32,

    /// Mana in the Blue camp at every reset.
    #[serde(default = "default_initial_stock")]
    pub initial_mana_blue: u32,

    /// Cosmetic world pickups laid out per camp at every reset (0 = none).
    #[serde(default)]
    pub visible_pickups_per_camp: usize,

    /// Whether camps may hold world pickup tokens at all.
    #[serde(default = "default_true")]
    pub pickup_visuals: bool,

    /// Which carried resource a camp accepts as a deposit.
    #[serde(default)]
    pub deposit_rule: DepositRule,
}

impl Default for EpisodeConfig {
    fn default() -> Self {
        Self {
            max_steps: default_max_steps(),
            win_stock_threshold: default_win_stock_threshold(),
            initial_iron_red: default_initial_stock(),
            initial_mana_blue: default_initial_stock(),
            visible_pickups_per_camp: 0,
            pickup_visuals: true,
            deposit_rule: DepositRule::default(),
        }
    }
}

/// Reward configuration.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct RewardConfig {
    /// Whether per-tick stock shaping rewards are applied.
    #[serde(default)]
    pub use_shaping: bool,

    /// Magnitude of the shaping reward; its sign follows the stock delta.
    #[serde(default = "default_stock_delta_reward")]
    pub stock_delta_reward: f32,

    /// Reward given to both teams on a timeout.
    #[serde(default = "default_timeout_penalty")]
    pub timeout_penalty: f32,

    /// Reward given to the winning team.
    #[serde(default = "default_win_reward")]
    pub win_reward: f32,

    /// Reward given to the losing team.
    #[serde(default = "default_loss_penalty")]
    pub loss_penalty: f32,
}

impl Default for RewardConfig {
    fn default() -> Self {
        Self {
            use_shaping: false,
            stock_delta_reward: default_stock_delta_reward(),
            timeout_penalty: default_timeout_penalty(),
            win_reward: default_win_reward(),
            loss_penalty: default_loss_penalty(),
        }
    }
}

/// Spatial query and placement parameters.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SpatialConfig {
    /// Radius of the ally/enemy density count.
    #[serde(default = "default_local_density_radius")]
    pub local_density_radius: f32,

    /// Count at which the density observation saturates (0 acts as 1).
    #[serde(default = "default_density_normalize_cap")]
    pub density_normalize_cap: u32,

    /// Whether the same-team separation pass runs after movement.
    #[serde(default = "default_true")]
    pub prevent_overlap: bool,

    /// Minimum distance between same-team agents.
    #[serde(default = "default_min_separation")]
    pub min_separation: f32,

    /// Reach of the Pick verb towards world tokens.
    #[serde(default = "default_world_pick_radius")]
    pub world_pick_radius: f32,

    /// Spacing of the spawn grid.
    #[serde(default = "default_spawn_grid_step")]
    pub spawn_grid_step: f32,

    /// Columns of the spawn grid.
    #[serde(default = "default_spawn_grid_cols")]
    pub spawn_grid_cols: usize,

    /// Stock count that maps to 1.0 in observations.
    #[serde(default = "default_stock_normalizer")]
    pub stock_normalizer: f32,

    /// Hit points restored per tick inside the own base.
    #[serde(default = "default_base_heal_per_tick")]
    pub base_heal_per_tick: i32,

    /// Half extents `[x, z]` of the initial pickup grid around a camp.
    #[serde(default = "default_pickup_footprint")]
    pub pickup_footprint: [f32; 2],
}

impl Default for SpatialConfig {
    fn default() -> Self {
        Self {
            local_density_radius: default_local_density_radius(),
            density_normalize_cap: default_density_normalize_cap(),
            prevent_overlap: true,
            min_separation: default_min_separation(),
            world_pick_radius: default_world_pick_radius(),
            spawn_grid_step: default_spawn_grid_step(),
            spawn_grid_cols: default_spawn_grid_cols(),
            stock_normalizer: default_stock_normalizer(),
            base_heal_per_tick: default_base_heal_per_tick(),
            pickup_footprint: default_pickup_footprint(),
        }
    }
}

/// Built-in decision sources selectable from configuration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PolicyKind {
    /// Every agent idles.
    Idle,
    /// Seeded random movement, no verbs.
    RandomWalk,
    /// Scripted raid: steal, carry home, deposit, fight back.
    #[default]
    Raider,
}

/// Run loop and process settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RuntimeConfig {
    /// Seed for every random decision.
    #[serde(default = "default_seed")]
    pub seed: u64,

    /// Real-time milliseconds between ticks (0 = as fast as possible).
    #[serde(default)]
    pub tick_interval_ms: u64,

    /// Stop after this many ticks (0 = unbounded).
    #[serde(default = "default_max_ticks")]
    pub max_ticks: u64,

    /// Stop after this many completed episodes (0 = unbounded).
    #[serde(default)]
    pub max_episodes: u64,

    /// Agents spawned per team by the engine.
    #[serde(default = "default_agents_per_team")]
    pub agents_per_team: usize,

    /// Decision source driving every agent.
    #[serde(default)]
    pub policy: PolicyKind,

    /// Emit logs as JSON lines.
    #[serde(default)]
    pub log_json: bool,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            seed: default_seed(),
            tick_interval_ms: 0,
            max_ticks: default_max_ticks(),
            max_episodes: 0,
            agents_per_team: default_agents_per_team(),
            policy: PolicyKind::default(),
            log_json: false,
        }
    }
}

// ---------------------------------------------------------------------------
// Default value functions for serde
// ---------------------------------------------------------------------------

const fn default_true() -> bool {
    true
}

const fn default_max_steps() -> u64 {
    600
}

const fn default_win_stock_threshold() -> u32 {
    200
}

const fn default_initial_stock() -> u32 {
    100
}

const fn default_stock_delta_reward() -> f32 {
    0.01
}

const fn default_timeout_penalty() -> f32 {
    -0.1
}

const fn default_win_reward() -> f32 {
    1.0
}

const fn default_loss_penalty() -> f32 {
    -1.0
}

const fn default_local_density_radius() -> f32 {
    2.5
}

const fn default_density_normalize_cap() -> u32 {
    5
}

const fn default_min_separation() -> f32 {
    0.4
}

const fn default_world_pick_radius() -> f32 {
    1.2
}

const fn default_spawn_grid_step() -> f32 {
    0.6
}

const fn default_spawn_grid_cols() -> usize {
    3
}

const fn default_stock_normalizer() -> f32 {
    100.0
}

const fn default_base_heal_per_tick() -> i32 {
    1
}

const fn default_pickup_footprint() -> [f32; 2] {
    [1.0, 1.0]
}

const fn default_seed() -> u64 {
    42
}

const fn default_max_ticks() -> u64 {
    6000
}

const fn default_agents_per_team() -> usize {
    6
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_yields_defaults() {
        let config = EnvironmentConfig::parse("").unwrap();
        assert_eq!(config, EnvironmentConfig::default());
        assert_eq!(config.episode.max_steps, 600);
        assert_eq!(config.runtime.policy, PolicyKind::Raider);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn parses_nested_sections() {
        let yaml = r"
episode:
  max_steps: 50
  deposit_rule: either
rewards:
  use_shaping: true
  win_reward: 2.0
spatial:
  pickup_footprint: [0.5, 2.0]
agents:
  damage: 30
  cooldown_on_miss: false
runtime:
  policy: random_walk
  max_episodes: 3
";
        let config = EnvironmentConfig::parse(yaml).unwrap();
        assert_eq!(config.episode.max_steps, 50);
        assert_eq!(config.episode.win_stock_threshold, 200);
        assert_eq!(config.episode.deposit_rule, DepositRule::Either);
        assert!(config.rewards.use_shaping);
        assert!((config.rewards.win_reward - 2.0).abs() < f32::EPSILON);
        assert!((config.rewards.loss_penalty + 1.0).abs() < f32::EPSILON);
        assert!((config.spatial.pickup_footprint[1] - 2.0).abs() < f32::EPSILON);
        assert_eq!(config.agents.damage, 30);
        assert!(!config.agents.cooldown_on_miss);
        assert_eq!(config.runtime.policy, PolicyKind::RandomWalk);
        assert_eq!(config.runtime.max_episodes, 3);
        assert_eq!(config.runtime.seed, 42);
    }

    #[test]
    fn zero_max_steps_is_rejected() {
        let config = EnvironmentConfig::parse("episode: { max_steps: 0 }").unwrap();
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Invalid { .. })
        ));
    }

    #[test]
    fn degenerate_bounds_are_rejected() {
        let yaml = "arena: { bounds: { min_x: 1.0, min_z: 0.0, max_x: 1.0, max_z: 2.0 } }";
        let config = EnvironmentConfig::parse(yaml).unwrap();
        assert!(matches!(config.validate(), Err(ConfigError::Arena { .. })));
    }

    #[test]
    fn zero_grid_columns_are_rejected() {
        let mut config = EnvironmentConfig::default();
        config.spatial.spawn_grid_cols = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn negative_separation_is_rejected() {
        let mut config = EnvironmentConfig::default();
        config.spatial.min_separation = -0.1;
        assert!(config.validate().is_err());
    }

    #[test]
    fn zero_density_cap_is_accepted() {
        let mut config = EnvironmentConfig::default();
        config.spatial.density_normalize_cap = 0;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn unknown_policy_fails_to_parse() {
        assert!(matches!(
            EnvironmentConfig::parse("runtime: { policy: telepathy }"),
            Err(ConfigError::Yaml { .. })
        ));
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let result = EnvironmentConfig::from_file(Path::new("/nonexistent/camp-raid.yaml"));
        assert!(matches!(result, Err(ConfigError::Io { .. })));
    }
}
