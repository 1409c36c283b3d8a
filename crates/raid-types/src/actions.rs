//! The discrete per-agent action.
//!
//! A policy answers every observation with two independent discrete
//! choices: a movement direction and a verb. The index encodings are the
//! ones a learned policy sees (`5` movement branches, `4` verb branches).

use serde::{Deserialize, Serialize};

/// Number of movement branches.
pub const MOVEMENT_CHOICES: usize = 5;

/// Number of verb branches.
pub const VERB_CHOICES: usize = 4;

/// Error returned when a raw action index is out of range.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ActionDecodeError {
    /// The movement index is not in `0..5`.
    #[error("movement index {0} out of range (expected 0..{MOVEMENT_CHOICES})")]
    Movement(usize),
    /// The verb index is not in `0..4`.
    #[error("verb index {0} out of range (expected 0..{VERB_CHOICES})")]
    Verb(usize),
}

/// Movement branch of an action.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Movement {
    /// Stay in place.
    #[default]
    Idle,
    /// Step towards `-x`.
    Left,
    /// Step towards `+x`.
    Right,
    /// Step towards `+z`.
    Forward,
    /// Step towards `-z`.
    Back,
}

impl Movement {
    /// All movement choices in index order.
    pub const ALL: [Self; MOVEMENT_CHOICES] =
        [Self::Idle, Self::Left, Self::Right, Self::Forward, Self::Back];

    /// Unit ground-plane direction `(dx, dz)` of this movement.
    pub const fn direction(self) -> (f32, f32) {
        match self {
            Self::Idle => (0.0, 0.0),
            Self::Left => (-1.0, 0.0),
            Self::Right => (1.0, 0.0),
            Self::Forward => (0.0, 1.0),
            Self::Back => (0.0, -1.0),
        }
    }

    /// Decode a raw branch index.
    ///
    /// # Errors
    ///
    /// Returns [`ActionDecodeError::Movement`] for indices outside `0..5`.
    pub fn from_index(index: usize) -> Result<Self, ActionDecodeError> {
        Self::ALL
            .get(index)
            .copied()
            .ok_or(ActionDecodeError::Movement(index))
    }

    /// Encode as a raw branch index.
    pub const fn index(self) -> usize {
        match self {
            Self::Idle => 0,
            Self::Left => 1,
            Self::Right => 2,
            Self::Forward => 3,
            Self::Back => 4,
        }
    }
}

/// Verb branch of an action.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Verb {
    /// Do nothing.
    #[default]
    None,
    /// Strike the nearest living enemy in range.
    Attack,
    /// Take a unit of the enemy's resource (enemy camp zone only).
    Pick,
    /// Deposit the carried unit (own camp zone only).
    Drop,
}

impl Verb {
    /// All verbs in index order.
    pub const ALL: [Self; VERB_CHOICES] = [Self::None, Self::Attack, Self::Pick, Self::Drop];

    /// Decode a raw branch index.
    ///
    /// # Errors
    ///
    /// Returns [`ActionDecodeError::Verb`] for indices outside `0..4`.
    pub fn from_index(index: usize) -> Result<Self, ActionDecodeError> {
        Self::ALL
            .get(index)
            .copied()
            .ok_or(ActionDecodeError::Verb(index))
    }

    /// Encode as a raw branch index.
    pub const fn index(self) -> usize {
        match self {
            Self::None => 0,
            Self::Attack => 1,
            Self::Pick => 2,
            Self::Drop => 3,
        }
    }
}

/// A complete per-agent action for one tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Action {
    /// Where to step.
    pub movement: Movement,
    /// What to do after stepping.
    pub verb: Verb,
}

impl Action {
    /// The do-nothing action.
    pub const IDLE: Self = Self {
        movement: Movement::Idle,
        verb: Verb::None,
    };

    /// Create an action from its two branches.
    pub const fn new(movement: Movement, verb: Verb) -> Self {
        Self { movement, verb }
    }

    /// Decode from raw `(movement, verb)` branch indices.
    ///
    /// # Errors
    ///
    /// Returns [`ActionDecodeError`] if either index is out of range.
    pub fn from_indices(movement: usize, verb: usize) -> Result<Self, ActionDecodeError> {
        Ok(Self {
            movement: Movement::from_index(movement)?,
            verb: Verb::from_index(verb)?,
        })
    }

    /// Encode as raw `(movement, verb)` branch indices.
    pub const fn indices(self) -> (usize, usize) {
        (self.movement.index(), self.verb.index())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn out_of_range_indices_are_rejected() {
        assert_eq!(
            Action::from_indices(5, 0),
            Err(ActionDecodeError::Movement(5))
        );
        assert_eq!(Action::from_indices(0, 4), Err(ActionDecodeError::Verb(4)));
    }

    #[test]
    fn index_encoding_matches_branch_order() {
        for (i, movement) in Movement::ALL.iter().enumerate() {
            assert_eq!(movement.index(), i);
        }
        for (i, verb) in Verb::ALL.iter().enumerate() {
            assert_eq!(verb.index(), i);
        }
        assert_eq!(
            Action::from_indices(3, 2),
            Ok(Action::new(Movement::Forward, Verb::Pick))
        );
    }

    #[test]
    fn idle_has_no_direction() {
        assert_eq!(Movement::Idle.direction(), (0.0, 0.0));
        assert_eq!(Action::default(), Action::IDLE);
    }
}
