//! # Neuron Swarm
//!
//! A small rigid-body swarm held together by a radial force, with a
//! capped-degree proximity graph drawn between nearby bodies.
//!
//! Every physics tick pulls each body toward the anchor at the origin,
//! integrates it, and keeps it inside four walls and out of the pointer's
//! repulsor sphere. Every render tick connects bodies that are closer than
//! a threshold, at most three connections per body, and packs the result
//! into flat vertex arrays ready for a line-list draw.
//!
//! ## Quick Start
//!
//! ```
//! use neuron_swarm::prelude::*;
//!
//! let mut config = SwarmConfig::default();
//! config.bodies.seed = Some(7);
//!
//! let mut swarm = Swarm::new(config).unwrap();
//! let pointer = Pointer::new();
//!
//! // One 60 Hz frame: physics first, then the proximity pass.
//! swarm.advance(1.0 / 60.0, &pointer, Vec2::new(6.0, 3.5));
//!
//! let buffer = swarm.edge_buffer();
//! assert_eq!(buffer.active_count(), swarm.edges().len() * 2);
//! ```
//!
//! ## Core Concepts
//!
//! ### Bodies and slots
//!
//! Bodies are numbered `0..N`. The position snapshot has `N + 1` entries:
//! slot 0 is the anchor, fixed at the origin, and body `i` lives in slot
//! `i + 1`. The proximity graph works on slots, so the anchor takes part
//! in connections like any body.
//!
//! ### Physics
//!
//! [`integrator::radial_force`] gives each body a force of magnitude
//! `size * coefficient` toward the origin. [`containment`] holds the
//! walls and the pointer repulsor.
//!
//! ### Proximity graph
//!
//! [`ProximityBuilder`] walks unordered pairs `i < j` in order and emits a
//! pair when both ends are under the degree cap and closer than the
//! threshold. Earlier pairs win, so the result is deterministic.
//!
//! ### Edge buffer
//!
//! [`EdgeBuffer`] is allocated once for the largest possible graph. Each
//! write packs the edges into its prefix and sets
//! [`EdgeBuffer::active_count`] to the number of vertices to draw.
//!
//! ## Configuration
//!
//! [`SwarmConfig`] holds every tunable value with defaults matching the
//! reference scene. It round-trips through JSON with
//! [`SwarmConfig::save`] and [`SwarmConfig::load`].
//!
//! ## Viewer
//!
//! With the `viewer` feature, `viewer::run` opens a window and draws the
//! swarm with wgpu.

pub mod body;
pub mod camera;
pub mod config;
pub mod containment;
pub mod edge_buffer;
pub mod error;
pub mod input;
pub mod integrator;
pub mod proximity;
pub mod shader;
pub mod snapshot;
mod swarm;
pub mod time;
#[cfg(feature = "viewer")]
pub mod viewer;

pub use body::{Body, BodyId, Emissive};
pub use camera::Camera;
pub use config::SwarmConfig;
pub use edge_buffer::EdgeBuffer;
pub use error::ConfigError;
#[cfg(feature = "viewer")]
pub use error::ViewerError;
pub use glam::{Vec2, Vec3};
pub use input::Pointer;
pub use proximity::{Edge, ProximityBuilder};
pub use snapshot::{PositionObserver, PositionSnapshot};
pub use swarm::Swarm;
pub use time::StepClock;

/// Convenient re-exports for common usage.
///
/// ```
/// use neuron_swarm::prelude::*;
/// ```
pub mod prelude {
    pub use crate::body::{Body, BodyId, Emissive};
    pub use crate::camera::Camera;
    pub use crate::config::SwarmConfig;
    pub use crate::edge_buffer::EdgeBuffer;
    pub use crate::input::Pointer;
    pub use crate::proximity::{Edge, ProximityBuilder};
    pub use crate::snapshot::{PositionObserver, PositionSnapshot};
    pub use crate::time::StepClock;
    pub use crate::Swarm;
    pub use glam::{Vec2, Vec3};
}
