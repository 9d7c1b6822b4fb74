//! Radial force integrator.
//!
//! Every physics step each body is pulled toward the world origin with a
//! force proportional to its size, then velocities are damped, positions
//! advanced, and contacts resolved. Observers hear about every body that
//! actually moved.
//!
//! Step order:
//!
//! 1. accumulate `radial_force` for every body
//! 2. `v += F / m * dt`, then `v *= (1 - linear_damping)^dt`
//! 3. `x += v * dt`
//! 4. body-body contacts, repulsor contact, wall contacts
//! 5. clear forces, notify observers

use glam::{Vec2, Vec3};
use tracing::debug;

use crate::body::Body;
use crate::config::SwarmConfig;
use crate::containment::{resolve_pair, Repulsor, Walls};
use crate::snapshot::PositionObserver;

/// Force pulling a body at `position` toward the origin.
///
/// `direction = normalize(position)`, `force = direction * (-size * coefficient)`.
/// A body exactly at the origin has no direction and gets zero force.
#[inline]
pub fn radial_force(position: Vec3, size: f32, coefficient: f32) -> Vec3 {
    position.normalize_or_zero() * (-size * coefficient)
}

/// Integrator-owned motion state of one body.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Motion {
    pub velocity: Vec3,
    /// Force accumulated for the current step.
    pub force: Vec3,
}

/// Bodies plus everything that moves them.
pub struct PhysicsWorld {
    bodies: Vec<Body>,
    motion: Vec<Motion>,
    /// Positions at the start of the current step, reused between steps.
    previous: Vec<Vec3>,
    walls: Walls,
    repulsor: Repulsor,
    mass: f32,
    linear_damping: f32,
    collider_scale: f32,
    restitution: f32,
    coefficient: f32,
    body_contacts: bool,
}

impl PhysicsWorld {
    pub fn new(bodies: Vec<Body>, config: &SwarmConfig) -> Self {
        debug!(bodies = bodies.len(), "creating physics world");
        let motion = vec![Motion::default(); bodies.len()];
        let previous = Vec::with_capacity(bodies.len());
        Self {
            bodies,
            motion,
            previous,
            walls: Walls::from_config(&config.bounds),
            repulsor: Repulsor::new(config.repulsor.radius, config.repulsor.depth),
            mass: config.bodies.mass,
            linear_damping: config.bodies.linear_damping,
            collider_scale: config.bodies.collider_scale,
            restitution: config.bounds.restitution,
            coefficient: config.forces.coefficient,
            body_contacts: true,
        }
    }

    /// Turn body-body contacts on or off. Walls and the repulsor always collide.
    pub fn with_body_contacts(mut self, enabled: bool) -> Self {
        self.body_contacts = enabled;
        self
    }

    pub fn bodies(&self) -> &[Body] {
        &self.bodies
    }

    pub fn motion(&self) -> &[Motion] {
        &self.motion
    }

    pub fn walls(&self) -> &Walls {
        &self.walls
    }

    pub fn repulsor(&self) -> &Repulsor {
        &self.repulsor
    }

    /// Set a body's velocity directly.
    pub fn set_velocity(&mut self, index: usize, velocity: Vec3) {
        self.motion[index].velocity = velocity;
    }

    /// Add an external force to a body for the next step.
    pub fn apply_force(&mut self, index: usize, force: Vec3) {
        self.motion[index].force += force;
    }

    /// Move the repulsor under the pointer.
    pub fn command_repulsor(&mut self, ndc: Vec2, half_extents: Vec2, dt: f32) {
        self.repulsor.command(ndc, half_extents, dt);
    }

    /// Advance one physics step of `dt` seconds.
    ///
    /// Returns how many bodies moved.
    pub fn step(&mut self, dt: f32, observer: &mut dyn PositionObserver) -> usize {
        self.previous.clear();
        self.previous.extend(self.bodies.iter().map(|b| b.position));

        self.apply_radial_forces();
        self.integrate(dt);
        if self.body_contacts {
            self.resolve_body_contacts();
        }
        self.resolve_static_contacts();

        let mut moved = 0;
        for (body, old) in self.bodies.iter().zip(&self.previous) {
            if body.position != *old {
                observer.on_position_changed(body.id, body.position);
                moved += 1;
            }
        }
        moved
    }

    fn apply_radial_forces(&mut self) {
        for (body, motion) in self.bodies.iter().zip(self.motion.iter_mut()) {
            motion.force += radial_force(body.position, body.size, self.coefficient);
        }
    }

    fn integrate(&mut self, dt: f32) {
        let inv_mass = 1.0 / self.mass;
        let damping = (1.0 - self.linear_damping).powf(dt);
        for (body, motion) in self.bodies.iter_mut().zip(self.motion.iter_mut()) {
            motion.velocity += motion.force * inv_mass * dt;
            motion.velocity *= damping;
            body.position += motion.velocity * dt;
            motion.force = Vec3::ZERO;
        }
    }

    fn resolve_body_contacts(&mut self) {
        let n = self.bodies.len();
        for i in 0..n {
            for j in (i + 1)..n {
                let (left, right) = self.bodies.split_at_mut(j);
                let (left_m, right_m) = self.motion.split_at_mut(j);
                let (a, b) = (&mut left[i], &mut right[0]);
                let ra = a.collider_radius(self.collider_scale);
                let rb = b.collider_radius(self.collider_scale);
                resolve_pair(
                    (&mut a.position, &mut left_m[i].velocity, ra),
                    (&mut b.position, &mut right_m[0].velocity, rb),
                    self.restitution,
                );
            }
        }
    }

    fn resolve_static_contacts(&mut self) {
        for (body, motion) in self.bodies.iter_mut().zip(self.motion.iter_mut()) {
            let radius = body.size * self.collider_scale;
            self.repulsor.resolve(
                &mut body.position,
                &mut motion.velocity,
                radius,
                self.restitution,
            );
            self.walls
                .contain(&mut body.position, &mut motion.velocity, radius);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::body::{BodyId, Emissive};
    use crate::snapshot::PositionSnapshot;

    fn body(i: usize, size: f32, position: Vec3) -> Body {
        Body {
            id: BodyId(i),
            size,
            position,
            emissive: Emissive::Lavender,
        }
    }

    fn world(bodies: Vec<Body>) -> PhysicsWorld {
        let mut config = SwarmConfig::default();
        config.bodies.count = bodies.len();
        // Park the repulsor far away so it never touches the test bodies.
        config.repulsor.depth = 1000.0;
        PhysicsWorld::new(bodies, &config)
    }

    #[test]
    fn test_force_points_to_origin_scaled_by_size() {
        let f = radial_force(Vec3::new(3.0, 0.0, 4.0), 0.1, 20.0);
        assert!((f - Vec3::new(-1.2, 0.0, -1.6)).length() < 1e-5);
        assert!((f.length() - 2.0).abs() < 1e-5);
    }

    #[test]
    fn test_force_at_origin_is_zero() {
        let f = radial_force(Vec3::ZERO, 0.12, 20.0);
        assert_eq!(f, Vec3::ZERO);
        assert!(f.is_finite());
    }

    #[test]
    fn test_body_at_origin_stays_finite() {
        let mut world = world(vec![body(0, 0.07, Vec3::ZERO)]);
        let mut snapshot = PositionSnapshot::new(1);
        for _ in 0..10 {
            world.step(1.0 / 60.0, &mut snapshot);
        }
        assert!(world.bodies()[0].position.is_finite());
        assert!(snapshot.get(1).is_finite());
    }

    #[test]
    fn test_bodies_fall_toward_anchor() {
        let start = Vec3::new(3.0, 2.0, 6.0);
        let mut world = world(vec![body(0, 0.04, start)]).with_body_contacts(false);
        let mut snapshot = PositionSnapshot::new(1);

        world.step(1.0 / 60.0, &mut snapshot);
        let after = world.bodies()[0].position;
        assert!(after.length() < start.length());
        assert_eq!(snapshot.get(1), after);
    }

    #[test]
    fn test_damping_slows_free_body() {
        let mut world = world(vec![body(0, 0.04, Vec3::new(0.0, 0.0, 6.0))]);
        world.set_velocity(0, Vec3::new(5.0, 0.0, 0.0));
        let mut ignore = |_: BodyId, _: Vec3| {};
        world.step(0.5, &mut ignore);

        let vx = world.motion()[0].velocity.x;
        // (1 - 0.95)^0.5 ≈ 0.2236
        assert!((vx - 5.0 * 0.05_f32.powf(0.5)).abs() < 1e-4);
    }

    #[test]
    fn test_walls_keep_bodies_in_box() {
        let mut world = world(vec![body(0, 0.04, Vec3::new(0.0, 5.5, 6.0))]);
        world.set_velocity(0, Vec3::new(0.0, 200.0, 0.0));
        let mut ignore = |_: BodyId, _: Vec3| {};
        for _ in 0..30 {
            world.step(1.0 / 60.0, &mut ignore);
        }

        let p = world.bodies()[0].position;
        let r = 0.04 * 7.0;
        assert!(p.y <= 6.0 - r + 1e-4, "escaped through ceiling: {:?}", p);
        assert!(p.z >= r - 1e-4);
    }

    #[test]
    fn test_overlapping_bodies_separate() {
        let mut world = world(vec![
            body(0, 0.1, Vec3::new(0.0, 0.0, 5.0)),
            body(1, 0.1, Vec3::new(0.5, 0.0, 5.0)),
        ]);
        let mut ignore = |_: BodyId, _: Vec3| {};
        world.step(1.0 / 60.0, &mut ignore);

        let d = world.bodies()[0].position.distance(world.bodies()[1].position);
        assert!(d >= 1.4 - 1e-4, "still overlapping at {}", d);
    }

    #[test]
    fn test_only_moved_bodies_are_reported() {
        let mut world = world(vec![
            body(0, 0.04, Vec3::ZERO),
            body(1, 0.04, Vec3::new(0.0, 0.0, 6.0)),
        ])
        .with_body_contacts(false);
        let mut reported = Vec::new();
        let mut observer = |id: BodyId, _: Vec3| reported.push(id);

        // Body 0 sits at the origin: no force, no velocity. It only moves
        // if the back wall pushes it, which it does since its collider
        // straddles z = 0.
        let moved = world.step(1.0 / 60.0, &mut observer);
        assert_eq!(moved, reported.len());
        assert!(reported.contains(&BodyId(1)));
    }

    #[test]
    fn test_repulsor_shoves_bodies() {
        let mut config = SwarmConfig::default();
        config.bodies.count = 1;
        let mut world = PhysicsWorld::new(vec![body(0, 0.04, Vec3::new(0.5, 0.0, 2.5))], &config)
            .with_body_contacts(false);
        world.command_repulsor(Vec2::ZERO, Vec2::new(4.0, 3.0), 1.0 / 60.0);

        let mut ignore = |_: BodyId, _: Vec3| {};
        world.step(1.0 / 60.0, &mut ignore);

        let p = world.bodies()[0].position;
        let reach = 2.0 + 0.04 * 7.0;
        assert!(p.distance(world.repulsor().position()) >= reach - 1e-4);
    }

    #[test]
    fn test_step_reuses_position_scratch() {
        let mut world = world(vec![
            body(0, 0.04, Vec3::new(1.0, 0.0, 3.0)),
            body(1, 0.06, Vec3::new(-1.0, 1.0, 4.0)),
        ]);
        let mut ignore = |_: BodyId, _: Vec3| {};
        world.step(1.0 / 60.0, &mut ignore);
        let scratch = world.previous.as_ptr();

        for _ in 0..100 {
            world.step(1.0 / 60.0, &mut ignore);
        }
        assert_eq!(world.previous.as_ptr(), scratch);
        assert_eq!(world.previous.len(), 2);
    }
}
