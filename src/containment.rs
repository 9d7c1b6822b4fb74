//! Boundary containment.
//!
//! Static half-space walls keep bodies in a box, and a kinematic sphere
//! (the repulsor) follows the pointer and shoves bodies it touches. Both
//! resolve contacts the same way: push the body out of the collider along
//! the contact normal, then reflect the approaching part of its velocity
//! scaled by the restitution.

use glam::{EulerRot, Quat, Vec2, Vec3};

use crate::config::{BoundsConfig, WallConfig};

/// An infinite plane. Bodies live on the side the normal points to.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Plane {
    pub point: Vec3,
    pub normal: Vec3,
}

impl Plane {
    pub fn new(point: Vec3, normal: Vec3) -> Self {
        Self {
            point,
            normal: normal.normalize_or(Vec3::Z),
        }
    }

    /// Plane from a position and XYZ Euler rotation. An unrotated plane faces +Z.
    pub fn from_wall(wall: &WallConfig) -> Self {
        let r = wall.rotation;
        let rotation = Quat::from_euler(EulerRot::XYZ, r.x, r.y, r.z);
        Self::new(wall.position, rotation * Vec3::Z)
    }

    /// Signed distance from the plane to `p`, positive on the open side.
    #[inline]
    pub fn signed_distance(&self, p: Vec3) -> f32 {
        (p - self.point).dot(self.normal)
    }

    /// Resolve a sphere of `radius` against this plane.
    ///
    /// Returns true if the sphere was touching.
    pub fn resolve(
        &self,
        position: &mut Vec3,
        velocity: &mut Vec3,
        radius: f32,
        restitution: f32,
    ) -> bool {
        let penetration = radius - self.signed_distance(*position);
        if penetration <= 0.0 {
            return false;
        }
        *position += self.normal * penetration;
        bounce(velocity, Vec3::ZERO, self.normal, restitution);
        true
    }
}

/// Remove the approaching normal component of `velocity` relative to a
/// collider moving at `collider_velocity`, bouncing it back by `restitution`.
fn bounce(velocity: &mut Vec3, collider_velocity: Vec3, normal: Vec3, restitution: f32) {
    let approach = (*velocity - collider_velocity).dot(normal);
    if approach < 0.0 {
        *velocity -= normal * approach * (1.0 + restitution);
    }
}

/// The static walls of the containment box.
#[derive(Clone, Debug, PartialEq)]
pub struct Walls {
    planes: Vec<Plane>,
    restitution: f32,
}

impl Walls {
    pub fn new(planes: Vec<Plane>, restitution: f32) -> Self {
        Self { planes, restitution }
    }

    pub fn from_config(config: &BoundsConfig) -> Self {
        Self::new(
            config.walls.iter().map(Plane::from_wall).collect(),
            config.restitution,
        )
    }

    pub fn planes(&self) -> &[Plane] {
        &self.planes
    }

    /// Push a sphere back inside every wall. Returns the number of walls touched.
    pub fn contain(&self, position: &mut Vec3, velocity: &mut Vec3, radius: f32) -> usize {
        self.planes
            .iter()
            .filter(|plane| plane.resolve(position, velocity, radius, self.restitution))
            .count()
    }
}

/// Kinematic sphere that follows the pointer.
///
/// Its only state is the last commanded position and the one before it,
/// which gives the velocity it imparts on contact.
#[derive(Clone, Debug, PartialEq)]
pub struct Repulsor {
    radius: f32,
    depth: f32,
    position: Vec3,
    velocity: Vec3,
}

impl Repulsor {
    pub fn new(radius: f32, depth: f32) -> Self {
        Self {
            radius,
            depth,
            position: Vec3::new(0.0, 0.0, depth),
            velocity: Vec3::ZERO,
        }
    }

    pub fn radius(&self) -> f32 {
        self.radius
    }

    pub fn position(&self) -> Vec3 {
        self.position
    }

    pub fn velocity(&self) -> Vec3 {
        self.velocity
    }

    /// Move to the world point under the pointer.
    ///
    /// `ndc` is the pointer in [-1, 1] on both axes and `half_extents` the
    /// viewport's world-space half width and height. `dt` is the time since
    /// the previous command and only feeds the velocity estimate.
    pub fn command(&mut self, ndc: Vec2, half_extents: Vec2, dt: f32) {
        let target = (ndc * half_extents).extend(self.depth);
        self.velocity = if dt > 0.0 {
            (target - self.position) / dt
        } else {
            Vec3::ZERO
        };
        self.position = target;
    }

    /// Push a sphere out of the repulsor. Returns true on contact.
    pub fn resolve(
        &self,
        position: &mut Vec3,
        velocity: &mut Vec3,
        radius: f32,
        restitution: f32,
    ) -> bool {
        let offset = *position - self.position;
        let dist = offset.length();
        let reach = self.radius + radius;
        // Coincident centres have no contact normal.
        if dist >= reach || dist <= f32::EPSILON {
            return false;
        }
        let normal = offset / dist;
        *position += normal * (reach - dist);
        bounce(velocity, self.velocity, normal, restitution);
        true
    }
}

/// Separate two overlapping spheres of equal mass.
///
/// Each moves half the penetration along the contact normal and the
/// approaching normal component of their relative velocity is reflected.
/// Returns true on contact.
pub fn resolve_pair(
    (pa, va, ra): (&mut Vec3, &mut Vec3, f32),
    (pb, vb, rb): (&mut Vec3, &mut Vec3, f32),
    restitution: f32,
) -> bool {
    let offset = *pb - *pa;
    let dist = offset.length();
    let reach = ra + rb;
    if dist >= reach || dist <= f32::EPSILON {
        return false;
    }
    let normal = offset / dist;
    let half = normal * ((reach - dist) * 0.5);
    *pa -= half;
    *pb += half;

    let approach = (*vb - *va).dot(normal);
    if approach < 0.0 {
        let impulse = normal * approach * (1.0 + restitution) * 0.5;
        *va += impulse;
        *vb -= impulse;
    }
    true
}
