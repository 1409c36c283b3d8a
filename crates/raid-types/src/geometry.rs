//! Ground-plane geometry.
//!
//! Positions are stored in three dimensions so callers that carry a height
//! (for example a renderer) get it back untouched, but every query here
//! reads only the `x`/`z` ground plane. The vertical axis is preserved by
//! clamping and movement and never compared.

use serde::{Deserialize, Serialize};

/// A world position. Only `x` and `z` take part in any computation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Position {
    /// Ground-plane horizontal axis.
    pub x: f32,
    /// Vertical axis, carried through unchanged.
    #[serde(default)]
    pub y: f32,
    /// Ground-plane depth axis.
    pub z: f32,
}

impl Position {
    /// Create a position from all three coordinates.
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    /// Create a position on the ground plane (`y = 0`).
    pub const fn ground(x: f32, z: f32) -> Self {
        Self { x, y: 0.0, z }
    }

    /// Squared ground-plane distance to `other`.
    pub fn ground_distance_sq(self, other: Self) -> f32 {
        let dx = self.x - other.x;
        let dz = self.z - other.z;
        dx.mul_add(dx, dz * dz)
    }

    /// Ground-plane distance to `other`.
    pub fn ground_distance(self, other: Self) -> f32 {
        self.ground_distance_sq(other).sqrt()
    }

    /// Return this position moved by `(dx, dz)` on the ground plane.
    pub fn offset(self, dx: f32, dz: f32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y,
            z: self.z + dz,
        }
    }
}

/// Axis-aligned ground-plane bounds of the playable area.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    /// Smallest allowed `x`.
    pub min_x: f32,
    /// Smallest allowed `z`.
    pub min_z: f32,
    /// Largest allowed `x`.
    pub max_x: f32,
    /// Largest allowed `z`.
    pub max_z: f32,
}

impl Default for Bounds {
    fn default() -> Self {
        Self {
            min_x: -25.0,
            min_z: -5.0,
            max_x: 25.0,
            max_z: 5.0,
        }
    }
}

impl Bounds {
    /// Create bounds from explicit extents.
    pub const fn new(min_x: f32, min_z: f32, max_x: f32, max_z: f32) -> Self {
        Self {
            min_x,
            min_z,
            max_x,
            max_z,
        }
    }

    /// Whether both axes have a strictly positive extent.
    pub fn is_valid(&self) -> bool {
        self.min_x.is_finite()
            && self.min_z.is_finite()
            && self.max_x.is_finite()
            && self.max_z.is_finite()
            && self.min_x < self.max_x
            && self.min_z < self.max_z
    }

    /// Smallest bounds enclosing every point, grown by `margin` on each side.
    ///
    /// Returns `None` when `points` is empty.
    pub fn enclosing(points: &[Position], margin: f32) -> Option<Self> {
        let first = points.first()?;
        let mut bounds = Self::new(first.x, first.z, first.x, first.z);
        for p in points {
            bounds.min_x = bounds.min_x.min(p.x);
            bounds.max_x = bounds.max_x.max(p.x);
            bounds.min_z = bounds.min_z.min(p.z);
            bounds.max_z = bounds.max_z.max(p.z);
        }
        bounds.min_x -= margin;
        bounds.min_z -= margin;
        bounds.max_x += margin;
        bounds.max_z += margin;
        Some(bounds)
    }

    /// Clamp `p` onto the bounds. The vertical axis is left untouched.
    pub fn clamp(&self, p: Position) -> Position {
        Position {
            x: p.x.clamp(self.min_x, self.max_x),
            y: p.y,
            z: p.z.clamp(self.min_z, self.max_z),
        }
    }

    /// Whether `p` lies inside the bounds (edges included).
    pub fn contains(&self, p: Position) -> bool {
        (self.min_x..=self.max_x).contains(&p.x) && (self.min_z..=self.max_z).contains(&p.z)
    }

    /// Map `p` into `[0, 1]` on each ground axis.
    pub fn normalize(&self, p: Position) -> (f32, f32) {
        (
            inverse_lerp(self.min_x, self.max_x, p.x),
            inverse_lerp(self.min_z, self.max_z, p.z),
        )
    }
}

/// A named circular eligibility region (base or camp).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Zone {
    /// Centre of the zone.
    pub center: Position,
    /// Radius of the zone on the ground plane.
    pub radius: f32,
}

impl Zone {
    /// Create a zone.
    pub const fn new(center: Position, radius: f32) -> Self {
        Self { center, radius }
    }

    /// Whether `p` lies inside the zone (boundary included).
    pub fn contains(&self, p: Position) -> bool {
        self.center.ground_distance_sq(p) <= self.radius * self.radius
    }
}

/// Position of `v` between `a` and `b`, clamped to `[0, 1]`.
///
/// Returns 0 for a degenerate range.
pub fn inverse_lerp(a: f32, b: f32, v: f32) -> f32 {
    let span = b - a;
    if span.abs() <= f32::EPSILON {
        return 0.0;
    }
    ((v - a) / span).clamp(0.0, 1.0)
}
