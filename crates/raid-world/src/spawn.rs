//! Deterministic spawn-grid placement.
//!
//! Agent `i` of a team of `n` starts at spawn point `i % spawns.len()`
//! (the team's base centre when the spawn set is empty), shifted onto a
//! small grid so agents sharing a spawn point do not overlap:
//!
//! ```text
//! col      = i % cols
//! row      = i / cols
//! half     = (min(cols, n) - 1) * step / 2
//! position = anchor + (col * step - half, row * step)
//! ```
//!
//! The result is clamped to the arena bounds. The vertical axis of the
//! agent's previous position is kept.

use raid_types::{Position, Team};

use crate::arena::ArenaLayout;

/// Spacing parameters of the spawn grid.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpawnGrid {
    /// Distance between neighbouring grid cells.
    pub step: f32,
    /// Columns per row; at least one column is always used.
    pub cols: usize,
}

impl Default for SpawnGrid {
    fn default() -> Self {
        Self { step: 0.6, cols: 3 }
    }
}

impl SpawnGrid {
    /// Ground-plane offset `(dx, dz)` of agent `index` in a team of
    /// `team_size`.
    #[allow(clippy::cast_precision_loss)]
    pub fn offset(&self, index: usize, team_size: usize) -> (f32, f32) {
        let cols = self.cols.max(1);
        let col = index.checked_rem(cols).unwrap_or(0);
        let row = index.checked_div(cols).unwrap_or(0);
        let used = cols.min(team_size).saturating_sub(1);
        let half = used as f32 * 0.5 * self.step;
        ((col as f32).mul_add(self.step, -half), row as f32 * self.step)
    }
}

/// Start position of agent `index` in a team of `team_size`.
///
/// `height` is the agent's current vertical coordinate, carried through.
pub fn spawn_position(
    layout: &ArenaLayout,
    team: Team,
    index: usize,
    team_size: usize,
    grid: SpawnGrid,
    height: f32,
) -> Position {
    let spawns = layout.spawns(team);
    let anchor = spawns
        .get(index.checked_rem(spawns.len()).unwrap_or(0))
        .copied()
        .unwrap_or_else(|| layout.base(team).center);
    let (dx, dz) = grid.offset(index, team_size);
    let mut position = layout.clamp(anchor.offset(dx, dz));
    position.y = height;
    position
}
