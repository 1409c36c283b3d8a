//! Shared type definitions for the camp-raid environment.
//!
//! This crate is the single source of truth for the value types that flow
//! between the agent, ledger, world and coordinator crates. Nothing here
//! owns simulation state; everything is plain data.
//!
//! # Modules
//!
//! - [`ids`] -- Type-safe UUID wrappers for agents and pickup tokens
//! - [`enums`] -- Teams, resources, and the per-team [`TeamPair`] container
//! - [`geometry`] -- Ground-plane positions, world bounds and circular zones
//! - [`actions`] -- The discrete (movement, verb) action pair
//! - [`observation`] -- The fixed-length per-agent observation vector
//!
//! [`TeamPair`]: enums::TeamPair

pub mod actions;
pub mod enums;
pub mod geometry;
pub mod ids;
pub mod observation;

// Re-export all public types at crate root for convenience.
pub use actions::{Action, ActionDecodeError, Movement, Verb};
pub use enums::{Resource, Team, TeamPair};
pub use geometry::{Bounds, Position, Zone};
pub use ids::{AgentId, PickupId};
pub use observation::{OBSERVATION_LEN, Observation};
