//! Single-slot cargo holder.
//!
//! An agent carries at most one unit of one resource. The slot has no
//! economic side effects: stock bookkeeping lives in the camp ledger.

use raid_types::Resource;
use serde::{Deserialize, Serialize};

/// An agent's cargo slot: empty, iron, or mana.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Carry {
    /// The carried resource, if any.
    carried: Option<Resource>,
}

impl Carry {
    /// An empty slot.
    pub const fn new() -> Self {
        Self { carried: None }
    }

    /// The carried resource, if any.
    pub const fn carried(&self) -> Option<Resource> {
        self.carried
    }

    /// Whether the slot is free.
    pub const fn can_pickup(&self) -> bool {
        self.carried.is_none()
    }

    /// Whether something is carried.
    pub const fn has_item(&self) -> bool {
        self.carried.is_some()
    }

    /// Whether the carried resource is `resource`.
    pub fn is_carrying(&self, resource: Resource) -> bool {
        self.carried == Some(resource)
    }

    /// Fill the slot with `resource`. Returns `false` (and changes nothing)
    /// if the slot is already occupied.
    pub const fn pickup(&mut self, resource: Resource) -> bool {
        if self.carried.is_some() {
            return false;
        }
        self.carried = Some(resource);
        true
    }

    /// Empty the slot, returning what it held.
    pub const fn drop_item(&mut self) -> Option<Resource> {
        self.carried.take()
    }
}
