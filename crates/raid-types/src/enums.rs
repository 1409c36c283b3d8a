//! Enumeration types for the camp-raid environment.
//!
//! Two teams contest two resources. Each team has a home resource that
//! starts stocked in its camp; the other team tries to steal it.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Teams
// ---------------------------------------------------------------------------

/// One of the two competing teams.
///
/// The team fixes an agent's home resource, spawn set and base/camp
/// geometry for the duration of an episode.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum Team {
    /// The team whose home resource is [`Resource::Iron`].
    Red,
    /// The team whose home resource is [`Resource::Mana`].
    Blue,
}

impl Team {
    /// Both teams, in roster order.
    pub const ALL: [Self; 2] = [Self::Red, Self::Blue];

    /// Return the opposing team.
    pub const fn enemy(self) -> Self {
        match self {
            Self::Red => Self::Blue,
            Self::Blue => Self::Red,
        }
    }

    /// Return the resource that starts stocked in this team's camp.
    pub const fn home_resource(self) -> Resource {
        match self {
            Self::Red => Resource::Iron,
            Self::Blue => Resource::Mana,
        }
    }
}

impl core::fmt::Display for Team {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Red => write!(f, "red"),
            Self::Blue => write!(f, "blue"),
        }
    }
}

// ---------------------------------------------------------------------------
// Resources
// ---------------------------------------------------------------------------

/// A stealable resource type.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum Resource {
    /// Red's home resource.
    Iron,
    /// Blue's home resource.
    Mana,
}

impl Resource {
    /// Return the team whose camp this resource belongs to.
    pub const fn home_team(self) -> Team {
        match self {
            Self::Iron => Team::Red,
            Self::Mana => Team::Blue,
        }
    }
}

impl core::fmt::Display for Resource {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Iron => write!(f, "iron"),
            Self::Mana => write!(f, "mana"),
        }
    }
}

// ---------------------------------------------------------------------------
// Per-team container
// ---------------------------------------------------------------------------

/// A value held once per team.
///
/// Used for rosters, camps, spawn sets and per-team totals so that team
/// lookups are exhaustive matches rather than map lookups.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamPair<T> {
    /// Red's value.
    pub red: T,
    /// Blue's value.
    pub blue: T,
}

impl<T> TeamPair<T> {
    /// Build a pair from two values.
    pub const fn new(red: T, blue: T) -> Self {
        Self { red, blue }
    }

    /// Build a pair by calling `f` once per team.
    pub fn from_fn(mut f: impl FnMut(Team) -> T) -> Self {
        Self {
            red: f(Team::Red),
            blue: f(Team::Blue),
        }
    }

    /// Borrow the value for `team`.
    pub const fn get(&self, team: Team) -> &T {
        match team {
            Team::Red => &self.red,
            Team::Blue => &self.blue,
        }
    }

    /// Mutably borrow the value for `team`.
    pub const fn get_mut(&mut self, team: Team) -> &mut T {
        match team {
            Team::Red => &mut self.red,
            Team::Blue => &mut self.blue,
        }
    }

    /// Mutably borrow both values at once, own team first.
    pub const fn split_mut(&mut self, team: Team) -> (&mut T, &mut T) {
        match team {
            Team::Red => (&mut self.red, &mut self.blue),
            Team::Blue => (&mut self.blue, &mut self.red),
        }
    }

    /// Map both values through `f`.
    pub fn map<U>(&self, mut f: impl FnMut(&T) -> U) -> TeamPair<U> {
        TeamPair {
            red: f(&self.red),
            blue: f(&self.blue),
        }
    }

    /// Iterate `(team, value)` in roster order.
    pub fn iter(&self) -> impl Iterator<Item = (Team, &T)> {
        [(Team::Red, &self.red), (Team::Blue, &self.blue)].into_iter()
    }
}
