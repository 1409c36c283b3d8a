//! The camp: one team's authoritative stock and its pickup registry.
//!
//! A camp holds two counters (iron and mana) and a registry of pickup
//! tokens for its home resource. Raiders from the other team take units
//! out (world token first, direct hand-over as a fallback); the owning
//! team's carriers deposit units in.
//!
//! Tokens live inside the registry in insertion order. Scans that pick the
//! nearest token select first and mutate after, so the registry is never
//! modified while it is being iterated.

use raid_agents::{Carry, Health};
use raid_types::{PickupId, Position, Resource, Team};
use serde::Deserialize;

use crate::LedgerError;
use crate::events::{StockChangeKind, StockChanged};
use crate::pickup::PickupToken;

/// Which carried resource a camp accepts as a deposit.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DepositRule {
    /// The enemy's home resource: what this team's raiders steal.
    #[default]
    Stolen,
    /// Only this camp's own home resource.
    Home,
    /// Either resource.
    Either,
}

impl DepositRule {
    /// Whether a camp owned by `team` accepts `resource` under this rule.
    pub fn accepts(self, team: Team, resource: Resource) -> bool {
        match self {
            Self::Stolen => resource == team.enemy().home_resource(),
            Self::Home => resource == team.home_resource(),
            Self::Either => true,
        }
    }
}

/// One team's camp.
#[derive(Debug, Clone)]
pub struct Camp {
    /// Owning team.
    team: Team,
    /// Iron stock.
    iron: u32,
    /// Mana stock.
    mana: u32,
    /// Pickup registry in insertion order; ids are unique.
    pickups: Vec<PickupToken>,
    /// Where initial world pickups are laid out.
    anchor: Position,
    /// Half extents `(x, z)` of the initial pickup grid.
    footprint: (f32, f32),
    /// Whether world tokens can exist for this camp.
    pickup_visuals: bool,
    /// Deposit acceptance rule.
    deposit_rule: DepositRule,
    /// Notifications not yet drained.
    events: Vec<StockChanged>,
    /// An invariant violation was already reported this episode.
    violation_reported: bool,
}

impl Camp {
    /// Create an empty camp for `team` with pickups laid out around `anchor`.
    pub const fn new(team: Team, anchor: Position) -> Self {
        Self {
            team,
            iron: 0,
            mana: 0,
            pickups: Vec::new(),
            anchor,
            footprint: (1.0, 1.0),
            pickup_visuals: true,
            deposit_rule: DepositRule::Stolen,
            events: Vec::new(),
            violation_reported: false,
        }
    }

    /// Enable or disable world tokens for this camp.
    #[must_use]
    pub const fn with_pickup_visuals(mut self, enabled: bool) -> Self {
        self.pickup_visuals = enabled;
        self
    }

    /// Set the deposit acceptance rule.
    #[must_use]
    pub const fn with_deposit_rule(mut self, rule: DepositRule) -> Self {
        self.deposit_rule = rule;
        self
    }

    /// Set the half extents of the initial pickup grid.
    #[must_use]
    pub const fn with_footprint(mut self, half_x: f32, half_z: f32) -> Self {
        self.footprint = (half_x, half_z);
        self
    }

    /// Owning team.
    pub const fn team(&self) -> Team {
        self.team
    }

    /// The resource this camp is the source of.
    pub const fn home_resource(&self) -> Resource {
        self.team.home_resource()
    }

    /// Iron stock.
    pub const fn iron(&self) -> u32 {
        self.iron
    }

    /// Mana stock.
    pub const fn mana(&self) -> u32 {
        self.mana
    }

    /// Stock of `resource`.
    pub const fn stock(&self, resource: Resource) -> u32 {
        match resource {
            Resource::Iron => self.iron,
            Resource::Mana => self.mana,
        }
    }

    /// Total stock over both resources.
    pub const fn total(&self) -> u32 {
        self.iron.saturating_add(self.mana)
    }

    /// The deposit acceptance rule.
    pub const fn deposit_rule(&self) -> DepositRule {
        self.deposit_rule
    }

    /// Whether world tokens can exist for this camp.
    pub const fn has_pickup_visuals(&self) -> bool {
        self.pickup_visuals
    }

    /// Anchor of the initial pickup grid.
    pub const fn anchor(&self) -> Position {
        self.anchor
    }

    /// Move the anchor of the initial pickup grid.
    pub const fn set_anchor(&mut self, anchor: Position) {
        self.anchor = anchor;
    }

    /// Registered tokens in registry order.
    pub fn pickups(&self) -> &[PickupToken] {
        &self.pickups
    }

    /// Look up a registered token.
    pub fn pickup(&self, id: PickupId) -> Option<&PickupToken> {
        self.pickups.iter().find(|t| t.id == id)
    }

    /// Number of registered tokens that can still be taken.
    pub fn available_pickups(&self) -> usize {
        self.pickups.iter().filter(|t| t.is_available()).count()
    }

    // ---------------------------------------------------------------------
    // Registry
    // ---------------------------------------------------------------------

    /// Add `token` to the registry.
    ///
    /// Returns `Ok(false)` if a token with the same id is already present.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::ForeignToken`] if the token belongs to the
    /// other team's camp.
    pub fn register_pickup(&mut self, token: PickupToken) -> Result<bool, LedgerError> {
        if token.owner != self.team {
            return Err(LedgerError::ForeignToken {
                token: token.id,
                owner: token.owner,
                camp: self.team,
            });
        }
        if self.pickups.iter().any(|t| t.id == token.id) {
            return Ok(false);
        }
        self.pickups.push(token);
        Ok(true)
    }

    /// Remove a token from the registry, returning it if it was present.
    pub fn unregister_pickup(&mut self, id: PickupId) -> Option<PickupToken> {
        let index = self.pickups.iter().position(|t| t.id == id)?;
        Some(self.pickups.remove(index))
    }

    /// Drop every registered token.
    pub fn clear_pickups(&mut self) {
        self.pickups.clear();
    }

    // ---------------------------------------------------------------------
    // Counters
    // ---------------------------------------------------------------------

    /// Set both counters for a new episode and clear the registry.
    ///
    /// Also re-enables invariant reporting for the new episode.
    pub fn reseed(&mut self, iron: u32, mana: u32) {
        self.iron = iron;
        self.mana = mana;
        self.pickups.clear();
        self.violation_reported = false;
        self.record(StockChangeKind::Reseed, None);
    }

    /// Account for a world token of `resource` having been taken.
    ///
    /// Decrements the matching counter when positive. A decrement at zero
    /// is ignored and reported as an invariant violation.
    pub fn notify_pickup_taken(&mut self, resource: Resource) {
        if self.decrement(resource) {
            self.record(StockChangeKind::WorldPickup, Some(resource));
        } else {
            self.report_violation("pickup taken with zero stock", resource);
        }
    }

    // ---------------------------------------------------------------------
    // Pick and drop
    // ---------------------------------------------------------------------

    /// Take the nearest available home-resource token within `radius` of
    /// `requester`.
    ///
    /// Ties go to the token registered first. Returns the id of the token
    /// taken, or `None` if the carrier is occupied, world tokens are
    /// disabled, or nothing is in range.
    pub fn try_pick_world(
        &mut self,
        requester: Position,
        carry: &mut Carry,
        radius: f32,
    ) -> Option<PickupId> {
        if !carry.can_pickup() || !self.pickup_visuals {
            return None;
        }

        let want = self.home_resource();
        let r2 = radius * radius;
        let mut best: Option<(PickupId, f32)> = None;
        for token in &self.pickups {
            if !token.is_available() || token.resource != want {
                continue;
            }
            let d2 = token.position.ground_distance_sq(requester);
            let closer = best.is_none_or(|(_, best_d2)| d2 < best_d2);
            if d2 <= r2 && closer {
                best = Some((token.id, d2));
            }
        }

        let (id, _) = best?;
        self.take_token(id, carry).then_some(id)
    }

    /// Hand token `id` to `carry` and account for it.
    ///
    /// A token already taken is left alone and the counter is not touched,
    /// so repeated calls decrement at most once. A token whose unit already
    /// left the stock (re-armed or dropped cargo) is handed over without
    /// touching the counter either.
    pub fn take_token(&mut self, id: PickupId, carry: &mut Carry) -> bool {
        let Some(token) = self.pickups.iter_mut().find(|t| t.id == id) else {
            return false;
        };
        if token.is_taken() {
            let resource = token.resource;
            self.report_violation("token taken twice", resource);
            return false;
        }
        let already_debited = token.stock_debited();
        if !token.take(carry) {
            return false;
        }
        let resource = token.resource;
        if already_debited {
            tracing::debug!(
                camp = %self.team,
                %resource,
                token = %id,
                "retaken unit, stock unchanged"
            );
        } else {
            self.notify_pickup_taken(resource);
        }
        true
    }

    /// Hand one unit of the home resource straight from stock.
    ///
    /// Used when no world token is in reach. Fails if the carrier is
    /// occupied or the stock is empty.
    pub fn try_pick_direct(&mut self, carry: &mut Carry) -> bool {
        if !carry.can_pickup() {
            return false;
        }
        let resource = self.home_resource();
        if self.stock(resource) == 0 {
            return false;
        }
        if !carry.pickup(resource) {
            return false;
        }
        let _ = self.decrement(resource);
        self.record(StockChangeKind::DirectPickup, Some(resource));
        true
    }

    /// Deposit the carried unit into this camp.
    ///
    /// Fails if the requester is dead, carries nothing, or carries a
    /// resource the deposit rule rejects. On success the matching counter
    /// grows by one and the carry slot is emptied.
    pub fn try_drop_at_home(&mut self, requester: &Health, carry: &mut Carry) -> bool {
        if !requester.is_alive() {
            return false;
        }
        let Some(resource) = carry.carried() else {
            return false;
        };
        if !self.deposit_rule.accepts(self.team, resource) {
            return false;
        }

        let counter = match resource {
            Resource::Iron => &mut self.iron,
            Resource::Mana => &mut self.mana,
        };
        let Some(next) = counter.checked_add(1) else {
            self.report_violation("deposit would overflow stock", resource);
            return false;
        };
        *counter = next;
        let _ = carry.drop_item();
        self.record(StockChangeKind::Deposit, Some(resource));
        true
    }

    // ---------------------------------------------------------------------
    // Token spawning
    // ---------------------------------------------------------------------

    /// Lay out `count` fresh home-resource tokens on a grid around the
    /// anchor. Counters are untouched.
    ///
    /// Returns how many tokens were registered. Without pickup visuals
    /// nothing is spawned.
    pub fn spawn_initial_world_pickups(&mut self, count: usize) -> usize {
        if count == 0 {
            return 0;
        }
        if !self.pickup_visuals {
            tracing::warn!(
                camp = %self.team,
                count,
                "pickup visuals disabled, no world pickups spawned"
            );
            return 0;
        }

        let resource = self.home_resource();
        let (half_x, half_z) = self.footprint;
        let mut spawned: usize = 0;
        for (dx, dz) in footprint_offsets(count, half_x, half_z) {
            let token = PickupToken::new(resource, self.team, self.anchor.offset(dx, dz));
            if matches!(self.register_pickup(token), Ok(true)) {
                spawned = spawned.saturating_add(1);
            }
        }
        tracing::debug!(camp = %self.team, spawned, %resource, "spawned world pickups");
        spawned
    }

    /// Re-arm a taken token at `position`.
    ///
    /// Returns `Ok(false)` if the token is not taken or already used its
    /// re-arm.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::UnknownPickup`] if no such token is registered.
    pub fn rearm_token(&mut self, id: PickupId, position: Position) -> Result<bool, LedgerError> {
        let token = self
            .pickups
            .iter_mut()
            .find(|t| t.id == id)
            .ok_or(LedgerError::UnknownPickup(id))?;
        if token.rearm(position) {
            return Ok(true);
        }
        let resource = token.resource;
        let what = if token.was_rearmed() {
            "second re-arm of a token"
        } else {
            "re-arm of a token that is not taken"
        };
        self.report_violation(what, resource);
        Ok(false)
    }

    /// Register a fresh available token of the home resource at `position`
    /// for a unit that already left the stock.
    ///
    /// Taking the token later does not decrement the counter again. Returns
    /// `None` without pickup visuals or if `resource` is not this camp's
    /// home resource.
    pub fn spawn_dropped_token(
        &mut self,
        resource: Resource,
        position: Position,
    ) -> Option<PickupId> {
        if !self.pickup_visuals || resource != self.home_resource() {
            return None;
        }
        let token = PickupToken::dropped(resource, self.team, position);
        let id = token.id;
        match self.register_pickup(token) {
            Ok(true) => Some(id),
            Ok(false) | Err(_) => None,
        }
    }

    // ---------------------------------------------------------------------
    // Notifications
    // ---------------------------------------------------------------------

    /// Take every notification recorded since the last drain.
    pub fn drain_events(&mut self) -> Vec<StockChanged> {
        std::mem::take(&mut self.events)
    }

    fn decrement(&mut self, resource: Resource) -> bool {
        let counter = match resource {
            Resource::Iron => &mut self.iron,
            Resource::Mana => &mut self.mana,
        };
        match counter.checked_sub(1) {
            Some(next) => {
                *counter = next;
                true
            }
            None => false,
        }
    }

    fn record(&mut self, kind: StockChangeKind, resource: Option<Resource>) {
        self.events.push(StockChanged {
            team: self.team,
            kind,
            resource,
            iron: self.iron,
            mana: self.mana,
        });
    }

    fn report_violation(&mut self, what: &str, resource: Resource) {
        if self.violation_reported {
            return;
        }
        self.violation_reported = true;
        tracing::warn!(
            camp = %self.team,
            %resource,
            iron = self.iron,
            mana = self.mana,
            "stock invariant violation: {what}"
        );
    }
}

/// Grid offsets for `count` tokens spread over `[-half_x, half_x]` by
/// `[-half_z, half_z]`.
///
/// The grid has `ceil(sqrt(count))` columns and as many rows as needed,
/// filled row by row from the `(-half_x, -half_z)` corner.
#[allow(clippy::cast_precision_loss)]
pub fn footprint_offsets(count: usize, half_x: f32, half_z: f32) -> Vec<(f32, f32)> {
    if count == 0 {
        return Vec::new();
    }
    let mut cols: usize = 1;
    while cols.saturating_mul(cols) < count {
        cols = cols.saturating_add(1);
    }
    let rows = count.div_ceil(cols);
    let step_x = if cols > 1 {
        2.0 * half_x / cols.saturating_sub(1) as f32
    } else {
        0.0
    };
    let step_z = if rows > 1 {
        2.0 * half_z / rows.saturating_sub(1) as f32
    } else {
        0.0
    };

    (0..count)
        .map(|i| {
            let col = i.checked_rem(cols).unwrap_or(0);
            let row = i.checked_div(cols).unwrap_or(0);
            (
                (col as f32).mul_add(step_x, -half_x),
                (row as f32).mul_add(step_z, -half_z),
            )
        })
        .collect()
}
