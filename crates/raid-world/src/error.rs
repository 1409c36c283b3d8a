//! Error types for the `raid-world` crate.

/// Errors that can occur while building an arena layout.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum WorldError {
    /// Bounds are inverted, degenerate or not finite.
    #[error("invalid bounds: x [{min_x}, {max_x}] z [{min_z}, {max_z}]")]
    InvalidBounds {
        /// Smallest `x`.
        min_x: f32,
        /// Smallest `z`.
        min_z: f32,
        /// Largest `x`.
        max_x: f32,
        /// Largest `z`.
        max_z: f32,
    },

    /// A zone radius is negative or not finite.
    #[error("invalid {zone} radius: {radius}")]
    InvalidRadius {
        /// Which radius (`base` or `camp`).
        zone: &'static str,
        /// The rejected value.
        radius: f32,
    },

    /// A spacing or margin parameter is negative or not finite.
    #[error("invalid {parameter}: {value}")]
    InvalidParameter {
        /// Parameter name.
        parameter: &'static str,
        /// The rejected value.
        value: f32,
    },
}
