//! Bodies and the emissive palette.
//!
//! The pool is created once at startup and never grows or shrinks. Each
//! body keeps a stable [`BodyId`] for the whole session.

use glam::Vec3;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::config::BodyConfig;

/// Stable index of a body in the pool, `0..N`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BodyId(pub usize);

impl BodyId {
    /// Slot of this body in a [`PositionSnapshot`]. Slot 0 is the anchor.
    ///
    /// [`PositionSnapshot`]: crate::PositionSnapshot
    #[inline]
    pub fn slot(self) -> usize {
        self.0 + 1
    }
}

/// Glow colour of a body.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Emissive {
    Lavender,
    Sand,
    Copper,
    Peach,
    Umber,
}

impl Emissive {
    /// Every palette entry, in palette order.
    pub const ALL: [Emissive; 5] = [
        Emissive::Lavender,
        Emissive::Sand,
        Emissive::Copper,
        Emissive::Peach,
        Emissive::Umber,
    ];

    /// Hex colour code.
    pub fn hex(self) -> &'static str {
        match self {
            Emissive::Lavender => "#adadd9",
            Emissive::Sand => "#d6a98d",
            Emissive::Copper => "#de9c73",
            Emissive::Peach => "#e8c4ae",
            Emissive::Umber => "#ad917f",
        }
    }

    /// Colour as RGB in 0.0-1.0.
    pub fn rgb(self) -> [f32; 3] {
        let bytes = match self {
            Emissive::Lavender => [0xad, 0xad, 0xd9],
            Emissive::Sand => [0xd6, 0xa9, 0x8d],
            Emissive::Copper => [0xde, 0x9c, 0x73],
            Emissive::Peach => [0xe8, 0xc4, 0xae],
            Emissive::Umber => [0xad, 0x91, 0x7f],
        };
        bytes.map(|b: u8| b as f32 / 255.0)
    }

    /// Pick a palette entry uniformly.
    pub fn random(rng: &mut impl Rng) -> Self {
        Self::ALL[rng.gen_range(0..Self::ALL.len())]
    }
}

/// One simulated body.
#[derive(Clone, Debug, PartialEq)]
pub struct Body {
    pub id: BodyId,
    /// Render radius. Also scales the radial force and the collider.
    pub size: f32,
    pub position: Vec3,
    pub emissive: Emissive,
}

impl Body {
    /// Radius of the sphere used for wall, body and repulsor contacts.
    #[inline]
    pub fn collider_radius(&self, collider_scale: f32) -> f32 {
        self.size * collider_scale
    }
}

/// Create the body pool.
///
/// Sizes are drawn from `config.radii` and colours from the palette. Bodies
/// start inside the `z > 0` half of a ball of `config.spawn_radius` around
/// the anchor, never at the origin itself.
pub fn spawn_bodies(config: &BodyConfig, rng: &mut impl Rng) -> Vec<Body> {
    (0..config.count)
        .map(|i| Body {
            id: BodyId(i),
            size: config.radii[rng.gen_range(0..config.radii.len())],
            position: spawn_position(config.spawn_radius, rng),
            emissive: Emissive::random(rng),
        })
        .collect()
}

fn spawn_position(radius: f32, rng: &mut impl Rng) -> Vec3 {
    let radius = radius.max(0.1);
    let min_len = radius * 0.05;
    loop {
        let p = Vec3::new(
            rng.gen_range(-radius..radius),
            rng.gen_range(-radius..radius),
            rng.gen_range(0.0..radius),
        );
        let len = p.length();
        if p.z > 0.0 && len > min_len && len <= radius {
            return p;
        }
    }
}
