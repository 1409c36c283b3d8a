//! Movement targets and the pairwise separation push.

use raid_types::{Bounds, Movement, Position};

/// Where `movement` would take an agent at `from` with a step of `step`,
/// before clamping.
pub fn step_target(from: Position, movement: Movement, step: f32) -> Position {
    let (dx, dz) = movement.direction();
    from.offset(dx * step, dz * step)
}

/// Push `mover` and `other` apart when closer than `min_separation`.
///
/// Each moves half the overlap along the ground-plane line between them,
/// then is clamped to `bounds`. Returns `None` when no push applies:
/// already far enough apart, or exactly coincident (no direction).
pub fn separate_pair(
    mover: Position,
    other: Position,
    min_separation: f32,
    bounds: &Bounds,
) -> Option<(Position, Position)> {
    let dx = mover.x - other.x;
    let dz = mover.z - other.z;
    let dist = dx.hypot(dz);
    if dist <= 0.0 || dist >= min_separation {
        return None;
    }
    let scale = (min_separation - dist) * 0.5 / dist;
    let (px, pz) = (dx * scale, dz * scale);
    Some((
        bounds.clamp(mover.offset(px, pz)),
        bounds.clamp(other.offset(-px, -pz)),
    ))
}
