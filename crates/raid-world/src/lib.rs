//! Arena geometry for the camp-raid environment.
//!
//! The arena is a flat rectangle on the `x`/`z` ground plane with four
//! circular zones: each team's base and camp. This crate answers zone
//! membership, clamps positions to the bounds, places agents on their
//! spawn grid and resolves the light same-team separation pass.
//!
//! # Modules
//!
//! - [`arena`] -- [`ArenaConfig`] (the `arena` config section) and the
//!   validated [`ArenaLayout`] built from it.
//! - [`error`] -- Error types for layout construction.
//! - [`movement`] -- Movement clamping and pairwise separation.
//! - [`spawn`] -- Deterministic spawn-grid placement.

pub mod arena;
pub mod error;
pub mod movement;
pub mod spawn;

pub use arena::{ArenaConfig, ArenaLayout};
pub use error::WorldError;
pub use movement::{separate_pair, step_target};
pub use spawn::{SpawnGrid, spawn_position};
