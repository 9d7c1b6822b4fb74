//! Swarm configuration.
//!
//! Everything the simulation needs is fixed when the [`Swarm`] is built.
//! The defaults reproduce the reference scene: 100 bodies, five radii,
//! a connection threshold of 2 world units and at most 3 edges per body.
//!
//! Configs can be stored as JSON. Every section is `#[serde(default)]`, so
//! a file only has to mention the values it changes:
//!
//! ```json
//! { "bodies": { "count": 250, "seed": 7 }, "connections": { "min_distance": 1.5 } }
//! ```
//!
//! [`Swarm`]: crate::Swarm

use std::f32::consts::{FRAC_PI_2, PI};
use std::fs;
use std::path::Path;

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Complete swarm configuration.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SwarmConfig {
    pub bodies: BodyConfig,
    pub forces: ForceConfig,
    pub connections: ConnectionConfig,
    pub bounds: BoundsConfig,
    pub repulsor: RepulsorConfig,
    pub timing: TimingConfig,
    pub camera: CameraConfig,
}

/// Body pool settings.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct BodyConfig {
    /// Number of bodies in the pool (N). The proximity pass sees N + 1 points.
    pub count: usize,
    /// Radii a body's size is drawn from.
    pub radii: Vec<f32>,
    /// Mass of every body.
    pub mass: f32,
    /// Fraction of linear velocity lost per second, in [0, 1].
    pub linear_damping: f32,
    /// Fraction of angular velocity lost per second. Rotation is not simulated.
    pub angular_damping: f32,
    /// Collider radius as a multiple of body size.
    pub collider_scale: f32,
    /// Maximum spawn distance from the anchor.
    pub spawn_radius: f32,
    /// Seed for reproducible spawning. `None` seeds from the OS.
    pub seed: Option<u64>,
}

impl Default for BodyConfig {
    fn default() -> Self {
        Self {
            count: 100,
            radii: vec![0.07, 0.04, 0.08, 0.06, 0.12],
            mass: 1.5,
            linear_damping: 0.95,
            angular_damping: 0.2,
            collider_scale: 7.0,
            spawn_radius: 4.0,
            seed: None,
        }
    }
}

/// Radial force settings.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ForceConfig {
    /// Force magnitude per unit of body size, pulling toward the origin.
    pub coefficient: f32,
}

impl Default for ForceConfig {
    fn default() -> Self {
        Self { coefficient: 20.0 }
    }
}

/// Proximity graph settings.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ConnectionConfig {
    /// Pairs closer than this are connected.
    pub min_distance: f32,
    /// Degree cap per body.
    pub max_per_body: u32,
}

impl Default for ConnectionConfig {
    fn default() -> Self {
        Self {
            min_distance: 2.0,
            max_per_body: 3,
        }
    }
}

/// A static wall, given as a position and XYZ Euler rotation.
///
/// An unrotated wall faces +Z.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq)]
pub struct WallConfig {
    pub position: Vec3,
    pub rotation: Vec3,
}

/// Containment volume settings.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct BoundsConfig {
    pub walls: Vec<WallConfig>,
    /// Fraction of normal velocity kept after bouncing off a wall or another body.
    pub restitution: f32,
}

impl Default for BoundsConfig {
    fn default() -> Self {
        Self {
            walls: vec![
                // back
                WallConfig {
                    position: Vec3::ZERO,
                    rotation: Vec3::ZERO,
                },
                // front
                WallConfig {
                    position: Vec3::new(0.0, 0.0, 12.0),
                    rotation: Vec3::new(0.0, -PI, 0.0),
                },
                // floor
                WallConfig {
                    position: Vec3::new(0.0, -6.0, 0.0),
                    rotation: Vec3::new(-FRAC_PI_2, 0.0, 0.0),
                },
                // ceiling
                WallConfig {
                    position: Vec3::new(0.0, 6.0, 0.0),
                    rotation: Vec3::new(FRAC_PI_2, 0.0, 0.0),
                },
            ],
            restitution: 0.3,
        }
    }
}

/// Pointer-driven repulsor settings.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct RepulsorConfig {
    pub radius: f32,
    /// Fixed z coordinate of the repulsor.
    pub depth: f32,
}

impl Default for RepulsorConfig {
    fn default() -> Self {
        Self {
            radius: 2.0,
            depth: 2.5,
        }
    }
}

/// Physics step timing.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct TimingConfig {
    /// Length of one physics step in seconds.
    pub fixed_step: f32,
    /// Most physics steps run to catch up within one frame.
    pub max_substeps: u32,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            fixed_step: 1.0 / 60.0,
            max_substeps: 10,
        }
    }
}

/// Viewer camera settings. Also used to size the repulsor's range.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct CameraConfig {
    pub position: Vec3,
    pub fov_degrees: f32,
    pub near: f32,
    pub far: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            position: Vec3::new(0.0, 0.0, 20.0),
            fov_degrees: 20.0,
            near: 10.0,
            far: 40.0,
        }
    }
}

impl SwarmConfig {
    /// Save as pretty-printed JSON.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }

    /// Load from JSON and validate.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let json = fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&json)?;
        config.validate()?;
        Ok(config)
    }

    /// Number of points seen by the proximity pass: every body plus the anchor.
    pub fn point_count(&self) -> usize {
        self.bodies.count + 1
    }

    /// Check that the simulation can run with these values.
    ///
    /// Every float that feeds the physics must be finite: one non-finite
    /// input turns every body into NaN on the first step.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let invalid = |msg: &str| Err(ConfigError::Invalid(msg.to_string()));
        let finite_positive = |x: f32| x.is_finite() && x > 0.0;

        let bodies = &self.bodies;
        if bodies.count == 0 {
            return invalid("body count must be at least 1");
        }
        if bodies.radii.is_empty() {
            return invalid("at least one body radius is required");
        }
        if !bodies.radii.iter().all(|&r| finite_positive(r)) {
            return invalid("body radii must be positive and finite");
        }
        if !finite_positive(bodies.mass) {
            return invalid("body mass must be positive and finite");
        }
        if !(0.0..=1.0).contains(&bodies.linear_damping)
            || !(0.0..=1.0).contains(&bodies.angular_damping)
        {
            return invalid("damping must lie in [0, 1]");
        }
        if !(bodies.collider_scale.is_finite() && bodies.collider_scale >= 0.0) {
            return invalid("collider_scale must be finite and not negative");
        }
        if !finite_positive(bodies.spawn_radius) {
            return invalid("spawn_radius must be positive and finite");
        }
        if !self.forces.coefficient.is_finite() {
            return invalid("force coefficient must be finite");
        }
        if !finite_positive(self.connections.min_distance) {
            return invalid("connection min_distance must be positive and finite");
        }
        if !finite_positive(self.timing.fixed_step) {
            return invalid("fixed_step must be positive and finite");
        }
        if self.timing.max_substeps == 0 {
            return invalid("max_substeps must be at least 1");
        }
        if !(0.0..=1.0).contains(&self.bounds.restitution) {
            return invalid("restitution must lie in [0, 1]");
        }
        if !self
            .bounds
            .walls
            .iter()
            .all(|w| w.position.is_finite() && w.rotation.is_finite())
        {
            return invalid("wall positions and rotations must be finite");
        }
        // Bodies must start inside the box, so the spawn ball may not reach
        // past the farthest wall.
        let extent = self
            .bounds
            .walls
            .iter()
            .map(|w| w.position.length())
            .fold(0.0, f32::max);
        if !self.bounds.walls.is_empty() && bodies.spawn_radius > extent {
            return invalid("spawn_radius must not exceed the distance to the farthest wall");
        }
        if !(self.repulsor.radius.is_finite() && self.repulsor.radius >= 0.0) {
            return invalid("repulsor radius must be finite and not negative");
        }
        if !self.repulsor.depth.is_finite() {
            return invalid("repulsor depth must be finite");
        }
        let camera = &self.camera;
        if !camera.position.is_finite()
            || !finite_positive(camera.fov_degrees)
            || !finite_positive(camera.near)
            || !(camera.far.is_finite() && camera.far > camera.near)
        {
            return invalid("camera needs a finite position, positive fov and near < far");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_reference_scene() {
        let config = SwarmConfig::default();
        assert_eq!(config.bodies.count, 100);
        assert_eq!(config.point_count(), 101);
        assert_eq!(config.connections.min_distance, 2.0);
        assert_eq!(config.connections.max_per_body, 3);
        assert_eq!(config.forces.coefficient, 20.0);
        assert_eq!(config.bounds.walls.len(), 4);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let config: SwarmConfig =
            serde_json::from_str(r#"{ "bodies": { "count": 12, "seed": 3 } }"#).unwrap();
        assert_eq!(config.bodies.count, 12);
        assert_eq!(config.bodies.seed, Some(3));
        assert_eq!(config.bodies.mass, 1.5);
        assert_eq!(config.connections, ConnectionConfig::default());
    }

    #[test]
    fn test_rejects_empty_pool() {
        let mut config = SwarmConfig::default();
        config.bodies.count = 0;
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_rejects_bad_radii() {
        let mut config = SwarmConfig::default();
        config.bodies.radii = vec![0.1, -0.2];
        assert!(config.validate().is_err());

        config.bodies.radii.clear();
        assert!(config.validate().is_err());

        config.bodies.radii = vec![f32::NAN];
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_non_positive_threshold() {
        let mut config = SwarmConfig::default();
        config.connections.min_distance = 0.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_out_of_range_damping() {
        let mut config = SwarmConfig::default();
        config.bodies.linear_damping = 1.5;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("swarm.json");

        let mut config = SwarmConfig::default();
        config.bodies.count = 42;
        config.bodies.seed = Some(99);
        config.save(&path).unwrap();

        let loaded = SwarmConfig::load(&path).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_load_rejects_invalid_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.json");
        fs::write(&path, r#"{ "timing": { "max_substeps": 0 } }"#).unwrap();

        assert!(matches!(SwarmConfig::load(&path), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_load_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = SwarmConfig::load(dir.path().join("missing.json")).unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }

    #[test]
    fn test_load_rejects_infinite_spawn_radius() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("huge.json");
        // 1e39 overflows f32 and parses as infinity.
        fs::write(&path, r#"{ "bodies": { "spawn_radius": 1e39, "seed": 1 } }"#).unwrap();

        assert!(matches!(SwarmConfig::load(&path), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_rejects_bad_spawn_radius() {
        for radius in [0.0, -1.0, f32::NAN, f32::MAX, 12.5] {
            let mut config = SwarmConfig::default();
            config.bodies.spawn_radius = radius;
            assert!(
                matches!(config.validate(), Err(ConfigError::Invalid(_))),
                "spawn_radius {radius} accepted"
            );
        }

        let mut config = SwarmConfig::default();
        config.bodies.spawn_radius = 12.0;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_rejects_non_finite_physics_values() {
        let cases: [fn(&mut SwarmConfig); 11] = [
            |c| c.forces.coefficient = f32::INFINITY,
            |c| c.forces.coefficient = f32::NAN,
            |c| c.bodies.collider_scale = f32::INFINITY,
            |c| c.bodies.collider_scale = -1.0,
            |c| c.bodies.mass = f32::INFINITY,
            |c| c.repulsor.depth = f32::NAN,
            |c| c.repulsor.radius = f32::INFINITY,
            |c| c.timing.fixed_step = f32::INFINITY,
            |c| c.connections.min_distance = f32::INFINITY,
            |c| c.bounds.walls[1].position.z = f32::INFINITY,
            |c| c.bounds.walls[2].rotation.x = f32::NAN,
        ];
        for (i, apply) in cases.iter().enumerate() {
            let mut config = SwarmConfig::default();
            apply(&mut config);
            assert!(
                matches!(config.validate(), Err(ConfigError::Invalid(_))),
                "case {i} accepted"
            );
        }
    }

    #[test]
    fn test_rejects_bad_camera() {
        let mut config = SwarmConfig::default();
        config.camera.far = config.camera.near;
        assert!(config.validate().is_err());

        let mut config = SwarmConfig::default();
        config.camera.fov_degrees = f32::NAN;
        assert!(config.validate().is_err());
    }
}
