//! Error types for the raid-agents crate.
//!
//! Gameplay outcomes (a miss, a refused pickup) are never errors. These
//! variants cover agent management only.

use raid_types::AgentId;

/// Errors that can occur while creating or looking up agents.
#[derive(Debug, thiserror::Error)]
pub enum AgentError {
    /// Agent name already exists in the factory.
    #[error("duplicate agent name: {0}")]
    DuplicateName(String),

    /// Agent with the given ID is not known.
    #[error("agent not found: {0}")]
    AgentNotFound(AgentId),

    /// Agent parameters are unusable.
    #[error("invalid agent configuration: {reason}")]
    InvalidConfig {
        /// Explanation of what is wrong with the configuration.
        reason: String,
    },
}
