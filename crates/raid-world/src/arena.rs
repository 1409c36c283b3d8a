//! Arena configuration and the validated layout.
//!
//! [`ArenaConfig`] mirrors the `arena` section of `camp-raid-config.yaml`.
//! [`ArenaLayout`] is what the coordinator queries every tick: bounds,
//! zones per team and spawn points per team.

use raid_types::{Bounds, Position, Team, TeamPair, Zone};
use serde::Deserialize;

use crate::error::WorldError;

/// The `arena` configuration section.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ArenaConfig {
    /// Ground-plane bounds used for clamping and normalization.
    #[serde(default)]
    pub bounds: Bounds,

    /// Radius of each base zone.
    #[serde(default = "default_zone_radius")]
    pub base_radius: f32,

    /// Radius of each camp zone.
    #[serde(default = "default_zone_radius")]
    pub camp_radius: f32,

    /// Centre of the Red base.
    #[serde(default = "default_red_base")]
    pub red_base: Position,

    /// Centre of the Red camp.
    #[serde(default = "default_red_camp")]
    pub red_camp: Position,

    /// Centre of the Blue camp.
    #[serde(default = "default_blue_camp")]
    pub blue_camp: Position,

    /// Centre of the Blue base.
    #[serde(default = "default_blue_base")]
    pub blue_base: Position,

    /// Red spawn points; agents wrap around when there are more agents.
    #[serde(default = "default_red_spawns")]
    pub red_spawns: Vec<Position>,

    /// Blue spawn points.
    #[serde(default = "default_blue_spawns")]
    pub blue_spawns: Vec<Position>,

    /// When set, bounds are derived from the zone centres and spawn points
    /// grown by this margin instead of using `bounds`.
    #[serde(default)]
    pub auto_bounds_margin: Option<f32>,
}

impl Default for ArenaConfig {
    fn default() -> Self {
        Self {
            bounds: Bounds::default(),
            base_radius: default_zone_radius(),
            camp_radius: default_zone_radius(),
            red_base: default_red_base(),
            red_camp: default_red_camp(),
            blue_camp: default_blue_camp(),
            blue_base: default_blue_base(),
            red_spawns: default_red_spawns(),
            blue_spawns: default_blue_spawns(),
            auto_bounds_margin: None,
        }
    }
}

/// Validated arena geometry.
#[derive(Debug, Clone, PartialEq)]
pub struct ArenaLayout {
    bounds: Bounds,
    bases: TeamPair<Zone>,
    camps: TeamPair<Zone>,
    spawns: TeamPair<Vec<Position>>,
}

impl ArenaLayout {
    /// Build a layout from configuration.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::InvalidRadius`] for a negative or non-finite
    /// zone radius, [`WorldError::InvalidParameter`] for a bad
    /// `auto_bounds_margin`, and [`WorldError::InvalidBounds`] when the
    /// resulting bounds are degenerate.
    pub fn from_config(config: &ArenaConfig) -> Result<Self, WorldError> {
        check_radius("base", config.base_radius)?;
        check_radius("camp", config.camp_radius)?;

        let mut layout = Self {
            bounds: config.bounds,
            bases: TeamPair::new(
                Zone::new(config.red_base, config.base_radius),
                Zone::new(config.blue_base, config.base_radius),
            ),
            camps: TeamPair::new(
                Zone::new(config.red_camp, config.camp_radius),
                Zone::new(config.blue_camp, config.camp_radius),
            ),
            spawns: TeamPair::new(config.red_spawns.clone(), config.blue_spawns.clone()),
        };

        if let Some(margin) = config.auto_bounds_margin {
            if !margin.is_finite() || margin < 0.0 {
                return Err(WorldError::InvalidParameter {
                    parameter: "auto_bounds_margin",
                    value: margin,
                });
            }
            let _ = layout.recompute_bounds(margin);
        }

        check_bounds(layout.bounds)?;
        Ok(layout)
    }

    /// Current bounds.
    pub const fn bounds(&self) -> Bounds {
        self.bounds
    }

    /// Replace the bounds.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::InvalidBounds`] if `bounds` is degenerate.
    pub fn set_bounds(&mut self, bounds: Bounds) -> Result<(), WorldError> {
        check_bounds(bounds)?;
        self.bounds = bounds;
        Ok(())
    }

    /// Derive bounds from every base, camp and spawn point grown by
    /// `margin` on each side.
    ///
    /// Returns `false` and keeps the old bounds if the result would be
    /// degenerate.
    pub fn recompute_bounds(&mut self, margin: f32) -> bool {
        let anchors = self.anchors();
        let Some(bounds) = Bounds::enclosing(&anchors, margin) else {
            return false;
        };
        if !bounds.is_valid() {
            tracing::warn!(margin, ?bounds, "recomputed bounds are degenerate, keeping previous");
            return false;
        }
        self.bounds = bounds;
        tracing::info!(
            min_x = bounds.min_x,
            max_x = bounds.max_x,
            min_z = bounds.min_z,
            max_z = bounds.max_z,
            "arena bounds recomputed"
        );
        true
    }

    /// Every zone centre and spawn point.
    pub fn anchors(&self) -> Vec<Position> {
        let mut points = Vec::new();
        for team in Team::ALL {
            points.push(self.bases.get(team).center);
            points.push(self.camps.get(team).center);
        }
        for team in Team::ALL {
            points.extend_from_slice(self.spawns.get(team));
        }
        points
    }

    /// Base zone of `team`.
    pub const fn base(&self, team: Team) -> Zone {
        *self.bases.get(team)
    }

    /// Camp zone of `team`.
    pub const fn camp(&self, team: Team) -> Zone {
        *self.camps.get(team)
    }

    /// Spawn points of `team`, possibly empty.
    pub fn spawns(&self, team: Team) -> &[Position] {
        self.spawns.get(team)
    }

    /// Whether `p` is inside `team`'s own base.
    pub fn in_own_base(&self, team: Team, p: Position) -> bool {
        self.bases.get(team).contains(p)
    }

    /// Whether `p` is inside the enemy base.
    pub fn in_enemy_base(&self, team: Team, p: Position) -> bool {
        self.bases.get(team.enemy()).contains(p)
    }

    /// Whether `p` is inside `team`'s own camp.
    pub fn at_own_camp(&self, team: Team, p: Position) -> bool {
        self.camps.get(team).contains(p)
    }

    /// Whether `p` is inside the enemy camp.
    pub fn at_enemy_camp(&self, team: Team, p: Position) -> bool {
        self.camps.get(team.enemy()).contains(p)
    }

    /// Clamp `p` onto the bounds, keeping its height.
    pub fn clamp(&self, p: Position) -> Position {
        self.bounds.clamp(p)
    }

    /// Map `p` into `[0, 1]` on each ground axis.
    pub fn normalize(&self, p: Position) -> (f32, f32) {
        self.bounds.normalize(p)
    }
}

impl Default for ArenaLayout {
    fn default() -> Self {
        let config = ArenaConfig::default();
        Self {
            bounds: config.bounds,
            bases: TeamPair::new(
                Zone::new(config.red_base, config.base_radius),
                Zone::new(config.blue_base, config.base_radius),
            ),
            camps: TeamPair::new(
                Zone::new(config.red_camp, config.camp_radius),
                Zone::new(config.blue_camp, config.camp_radius),
            ),
            spawns: TeamPair::new(config.red_spawns, config.blue_spawns),
        }
    }
}

fn check_radius(zone: &'static str, radius: f32) -> Result<(), WorldError> {
    if radius.is_finite() && radius >= 0.0 {
        Ok(())
    } else {
        Err(WorldError::InvalidRadius { zone, radius })
    }
}

fn check_bounds(bounds: Bounds) -> Result<(), WorldError> {
    if bounds.is_valid() {
        Ok(())
    } else {
        Err(WorldError::InvalidBounds {
            min_x: bounds.min_x,
            min_z: bounds.min_z,
            max_x: bounds.max_x,
            max_z: bounds.max_z,
        })
    }
}

// ---------------------------------------------------------------------------
// Default value functions for serde
// ---------------------------------------------------------------------------

const fn default_zone_radius() -> f32 {
    3.0
}

const fn default_red_base() -> Position {
    Position::ground(-20.0, 0.0)
}

const fn default_red_camp() -> Position {
    Position::ground(-12.0, 0.0)
}

const fn default_blue_camp() -> Position {
    Position::ground(12.0, 0.0)
}

const fn default_blue_base() -> Position {
    Position::ground(20.0, 0.0)
}

fn default_red_spawns() -> Vec<Position> {
    vec![Position::ground(-20.0, -1.5), Position::ground(-20.0, 1.5)]
}

fn default_blue_spawns() -> Vec<Position> {
    vec![Position::ground(20.0, -1.5), Position::ground(20.0, 1.5)]
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn default_layout_zones() {
        let layout = ArenaLayout::default();
        let red_camp = Position::ground(-12.0, 0.5);
        assert!(layout.at_own_camp(Team::Red, red_camp));
        assert!(layout.at_enemy_camp(Team::Blue, red_camp));
        assert!(!layout.at_own_camp(Team::Blue, red_camp));
        assert!(layout.in_own_base(Team::Blue, Position::ground(21.0, 1.0)));
        assert!(layout.in_enemy_base(Team::Red, Position::ground(21.0, 1.0)));
    }

    #[test]
    fn zone_checks_ignore_height() {
        let layout = ArenaLayout::default();
        assert!(layout.in_own_base(Team::Red, Position::new(-20.0, 50.0, 0.0)));
    }

    #[test]
    fn negative_radius_is_rejected() {
        let config = ArenaConfig {
            camp_radius: -1.0,
            ..ArenaConfig::default()
        };
        assert!(matches!(
            ArenaLayout::from_config(&config),
            Err(WorldError::InvalidRadius { zone: "camp", .. })
        ));
    }

    #[test]
    fn inverted_bounds_are_rejected() {
        let config = ArenaConfig {
            bounds: Bounds::new(5.0, -5.0, -5.0, 5.0),
            ..ArenaConfig::default()
        };
        assert!(matches!(
            ArenaLayout::from_config(&config),
            Err(WorldError::InvalidBounds { .. })
        ));
    }

    #[test]
    fn auto_bounds_enclose_anchors() {
        let config = ArenaConfig {
            auto_bounds_margin: Some(2.0),
            ..ArenaConfig::default()
        };
        let layout = ArenaLayout::from_config(&config).unwrap();
        assert_eq!(layout.bounds(), Bounds::new(-22.0, -3.5, 22.0, 3.5));
    }

    #[test]
    fn recompute_keeps_bounds_when_degenerate() {
        let config = ArenaConfig {
            red_base: Position::ground(0.0, 0.0),
            red_camp: Position::ground(0.0, 0.0),
            blue_camp: Position::ground(0.0, 0.0),
            blue_base: Position::ground(0.0, 0.0),
            red_spawns: Vec::new(),
            blue_spawns: Vec::new(),
            ..ArenaConfig::default()
        };
        let mut layout = ArenaLayout::from_config(&config).unwrap();
        assert!(!layout.recompute_bounds(0.0));
        assert_eq!(layout.bounds(), Bounds::default());
        assert!(layout.recompute_bounds(1.0));
        assert_eq!(layout.bounds(), Bounds::new(-1.0, -1.0, 1.0, 1.0));
    }

    #[test]
    fn parses_partial_yaml() {
        let yaml = "
camp_radius: 4.5
red_spawns:
  - { x: -18.0, z: 0.0 }
";
        let config: ArenaConfig = serde_yml::from_str(yaml).unwrap();
        assert!((config.camp_radius - 4.5).abs() < f32::EPSILON);
        assert!((config.base_radius - 3.0).abs() < f32::EPSILON);
        assert_eq!(config.red_spawns, vec![Position::ground(-18.0, 0.0)]);
        assert_eq!(config.blue_spawns.len(), 2);
    }
}
