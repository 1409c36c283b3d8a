//! Camp economy ledger for the camp-raid environment.
//!
//! Every unit of stock in an episode is counted here. Stock counters are
//! the single source of truth: pickup tokens are bookkeeping for where a
//! unit can be grabbed in the world, never an authority on how many units
//! exist.
//!
//! # Architecture
//!
//! - [`camp`] -- The [`Camp`] struct: counters, pickup registry, pick/drop resolution.
//! - [`pickup`] -- The [`PickupToken`]: a collectible that is taken exactly once.
//! - [`events`] -- [`StockChanged`] notifications for telemetry.
//!
//! # Counter invariant
//!
//! For every camp and every resource R, after every operation:
//!
//! ```text
//! stock(R) >= 0
//! ```
//!
//! Counters are unsigned and only [`Camp`] methods mutate them. A decrement
//! requested at zero is ignored and reported once per episode. The ledger
//! never panics.
//!
//! # Usage
//!
//! ```
//! use raid_agents::{Carry, Health};
//! use raid_ledger::{Camp, DepositRule};
//! use raid_types::{Position, Resource, Team};
//!
//! let mut red = Camp::new(Team::Red, Position::ground(-12.0, 0.0));
//! let mut blue = Camp::new(Team::Blue, Position::ground(12.0, 0.0));
//! red.reseed(100, 0);
//! blue.reseed(0, 100);
//!
//! // A Red raider steals mana from the Blue camp and brings it home.
//! let mut carry = Carry::new();
//! assert!(blue.try_pick_direct(&mut carry));
//! assert_eq!(blue.mana(), 99);
//!
//! assert!(red.try_drop_at_home(&Health::new(100), &mut carry));
//! assert_eq!(red.mana(), 1);
//! assert_eq!(red.deposit_rule(), DepositRule::Stolen);
//! ```

pub mod camp;
pub mod events;
pub mod pickup;

use raid_types::{PickupId, Team};

pub use camp::{Camp, DepositRule, footprint_offsets};
pub use events::{StockChangeKind, StockChanged};
pub use pickup::PickupToken;

/// Errors returned by ledger registry operations.
///
/// Pick and drop outcomes are booleans, not errors; these variants cover
/// misuse of the registry itself.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LedgerError {
    /// A token belonging to another camp was offered to this camp.
    #[error("pickup {token} belongs to the {owner} camp, not the {camp} camp")]
    ForeignToken {
        /// The offending token.
        token: PickupId,
        /// The camp the token belongs to.
        owner: Team,
        /// The camp it was offered to.
        camp: Team,
    },

    /// No token with this id is registered.
    #[error("pickup not registered: {0}")]
    UnknownPickup(PickupId),
}
