//! Stock-changed notifications.
//!
//! A camp records one [`StockChanged`] per successful mutation of its
//! counters. Observers drain them after the tick; nothing in the core reads
//! them back.

use raid_types::{Resource, Team};
use serde::Serialize;

/// What caused a stock change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StockChangeKind {
    /// A world token was taken.
    WorldPickup,
    /// A unit was handed over directly from stock.
    DirectPickup,
    /// A carried unit was deposited.
    Deposit,
    /// Counters were reset for a new episode.
    Reseed,
}

/// A snapshot of a camp's counters right after a successful mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StockChanged {
    /// Owning team of the camp.
    pub team: Team,
    /// The cause.
    pub kind: StockChangeKind,
    /// The resource moved, if a single unit moved.
    pub resource: Option<Resource>,
    /// Iron count after the change.
    pub iron: u32,
    /// Mana count after the change.
    pub mana: u32,
}
