//! Tunable per-agent parameters.
//!
//! Mirrors the `agents` section of `camp-raid-config.yaml`. Every field has
//! a default so partial YAML documents deserialize cleanly.

use serde::Deserialize;

use crate::error::AgentError;

/// Per-agent mechanics shared by every agent in an environment.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct AgentConfig {
    /// Maximum (and starting) hit points (default: 100).
    pub max_hp: i32,

    /// Distance covered by one movement step (default: 1.0).
    pub move_step: f32,

    /// Attack reach on the ground plane (default: 1.5).
    pub attack_range: f32,

    /// Hit points removed per successful attack (default: 10).
    pub damage: i32,

    /// Ticks an attacker must wait after attacking (default: 8).
    pub attack_cooldown_ticks: u32,

    /// Whether an attack with no target in range still starts the
    /// cooldown (default: true). When false only hits do.
    pub cooldown_on_miss: bool,

    /// Emit a debug event for every resolved action (default: false).
    pub log_actions: bool,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            max_hp: 100,
            move_step: 1.0,
            attack_range: 1.5,
            damage: 10,
            attack_cooldown_ticks: 8,
            cooldown_on_miss: true,
            log_actions: false,
        }
    }
}

impl AgentConfig {
    /// Reject parameters no agent could act on.
    ///
    /// A non-positive `max_hp` is accepted: such agents are simply never
    /// alive.
    ///
    /// # Errors
    ///
    /// Returns [`AgentError::InvalidConfig`] for a negative or non-finite
    /// step or range, or a negative damage value.
    pub fn validate(&self) -> Result<(), AgentError> {
        if !self.move_step.is_finite() || self.move_step < 0.0 {
            return Err(AgentError::InvalidConfig {
                reason: format!("move_step must be finite and >= 0, got {}", self.move_step),
            });
        }
        if !self.attack_range.is_finite() || self.attack_range < 0.0 {
            return Err(AgentError::InvalidConfig {
                reason: format!(
                    "attack_range must be finite and >= 0, got {}",
                    self.attack_range
                ),
            });
        }
        if self.damage < 0 {
            return Err(AgentError::InvalidConfig {
                reason: format!("damage must be >= 0, got {}", self.damage),
            });
        }
        Ok(())
    }
}
