//! Pickup tokens.
//!
//! A token is a single collectible unit of one camp's home resource. It is
//! pure data: position, resource, owning team and a taken flag. Any visual
//! is derived from it and never read back.
//!
//! A token also remembers whether its unit has already left the camp's
//! stock. Only the first take of a unit debits the counter; re-armed
//! tokens and tokens spawned from dropped cargo carry units that were
//! debited earlier.
//!
//! Lifecycle:
//!
//! ```text
//! available --take--> taken --rearm (once)--> available --take--> taken
//! ```
//!
//! Only the death drop may re-arm a token, and only once.

use raid_agents::Carry;
use raid_types::{PickupId, Position, Resource, Team};
use serde::{Deserialize, Serialize};

/// One collectible world pickup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PickupToken {
    /// Unique identifier.
    pub id: PickupId,
    /// Resource granted when taken.
    pub resource: Resource,
    /// Team whose camp accounts for this token.
    pub owner: Team,
    /// World position of the token while available.
    pub position: Position,
    /// Whether the token has been taken.
    taken: bool,
    /// Whether the token has already used its single re-arm.
    rearmed: bool,
    /// Whether the owning camp's stock already accounts for this unit.
    stock_debited: bool,
}

impl PickupToken {
    /// Create an available token.
    pub fn new(resource: Resource, owner: Team, position: Position) -> Self {
        Self {
            id: PickupId::new(),
            resource,
            owner,
            position,
            taken: false,
            rearmed: false,
            stock_debited: false,
        }
    }

    /// Create an available token for a unit that already left the stock,
    /// such as cargo dropped by a dying carrier.
    pub fn dropped(resource: Resource, owner: Team, position: Position) -> Self {
        Self {
            stock_debited: true,
            ..Self::new(resource, owner, position)
        }
    }

    /// Whether the token has been taken.
    pub const fn is_taken(&self) -> bool {
        self.taken
    }

    /// Whether pickup queries may match this token.
    pub const fn is_available(&self) -> bool {
        !self.taken
    }

    /// Whether the single re-arm has been used.
    pub const fn was_rearmed(&self) -> bool {
        self.rearmed
    }

    /// Whether taking this token must leave the stock counters alone.
    pub const fn stock_debited(&self) -> bool {
        self.stock_debited
    }

    /// Hand the token to a carrier.
    ///
    /// Fails (returns `false`) if already taken or if `carry` is occupied.
    /// On success the carrier holds the resource, the token is inert and
    /// its unit counts as debited. The owning camp's counter is adjusted by
    /// [`crate::Camp::take_token`], which is the only caller outside tests.
    pub fn take(&mut self, carry: &mut Carry) -> bool {
        if self.taken || !carry.can_pickup() {
            return false;
        }
        if !carry.pickup(self.resource) {
            return false;
        }
        self.taken = true;
        self.stock_debited = true;
        true
    }

    /// Make a taken token available again at `position`.
    ///
    /// Allowed once per token. Returns `false` if the token is not taken
    /// or was already re-armed.
    pub fn rearm(&mut self, position: Position) -> bool {
        if !self.taken || self.rearmed {
            return false;
        }
        self.taken = false;
        self.rearmed = true;
        self.position = position;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn token() -> PickupToken {
        PickupToken::new(Resource::Iron, Team::Red, Position::ground(-12.0, 0.0))
    }

    #[test]
    fn take_transitions_once() {
        let mut token = token();
        let mut first = Carry::new();
        let mut second = Carry::new();

        assert!(token.take(&mut first));
        assert!(token.is_taken());
        assert_eq!(first.carried(), Some(Resource::Iron));

        assert!(!token.take(&mut second));
        assert!(second.can_pickup());
    }

    #[test]
    fn occupied_carrier_cannot_take() {
        let mut token = token();
        let mut carry = Carry::new();
        let _ = carry.pickup(Resource::Mana);
        assert!(!token.take(&mut carry));
        assert!(token.is_available());
    }

    #[test]
    fn rearm_is_allowed_exactly_once() {
        let mut token = token();
        let mut carry = Carry::new();
        assert!(!token.rearm(Position::default()));

        assert!(token.take(&mut carry));
        assert!(token.rearm(Position::ground(3.0, 1.0)));
        assert!(token.is_available());
        assert_eq!(token.position, Position::ground(3.0, 1.0));

        let mut other = Carry::new();
        assert!(token.take(&mut other));
        assert!(!token.rearm(Position::default()));
        assert!(token.is_taken());
        assert!(token.was_rearmed());
    }

    #[test]
    fn first_take_marks_the_unit_debited() {
        let mut token = token();
        assert!(!token.stock_debited());
        assert!(token.take(&mut Carry::new()));
        assert!(token.stock_debited());
        assert!(token.rearm(Position::default()));
        assert!(token.stock_debited());

        let dropped = PickupToken::dropped(Resource::Mana, Team::Blue, Position::default());
        assert!(dropped.is_available());
        assert!(dropped.stock_debited());
        assert!(!dropped.was_rearmed());
    }
}
