//! Swarm tick driver.
//!
//! [`Swarm`] owns every piece of simulation state and exposes the two
//! periodic callbacks the host loop drives:
//!
//! - [`Swarm::physics_step`]: move the repulsor, apply radial forces,
//!   integrate, resolve contacts, publish positions to the snapshot.
//! - [`Swarm::render_step`]: rebuild the proximity graph from the snapshot
//!   and pack it into the edge buffer.
//!
//! [`Swarm::advance`] runs however many physics steps a frame is owed and
//! then one render step, so the proximity pass always sees the positions
//! integrated in the same frame.

use glam::{Vec2, Vec3};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{debug, trace};

use crate::body::{spawn_bodies, Body, BodyId};
use crate::config::SwarmConfig;
use crate::edge_buffer::EdgeBuffer;
use crate::error::ConfigError;
use crate::input::Pointer;
use crate::integrator::PhysicsWorld;
use crate::proximity::{Edge, ProximityBuilder};
use crate::snapshot::{PositionObserver, PositionSnapshot};
use crate::time::StepClock;

/// The neuron swarm: bodies, their positions, and the edges between them.
pub struct Swarm {
    config: SwarmConfig,
    world: PhysicsWorld,
    snapshot: PositionSnapshot,
    builder: ProximityBuilder,
    buffer: EdgeBuffer,
    clock: StepClock,
    observers: Vec<Box<dyn PositionObserver>>,
}

/// Forwards position changes to the snapshot, then to every subscriber.
struct Fanout<'a> {
    snapshot: &'a mut PositionSnapshot,
    observers: &'a mut [Box<dyn PositionObserver>],
}

impl PositionObserver for Fanout<'_> {
    fn on_position_changed(&mut self, id: BodyId, position: Vec3) {
        self.snapshot.on_position_changed(id, position);
        for observer in self.observers.iter_mut() {
            observer.on_position_changed(id, position);
        }
    }
}

impl Swarm {
    /// Build a swarm with a freshly spawned body pool.
    pub fn new(config: SwarmConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let mut rng = match config.bodies.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let bodies = spawn_bodies(&config.bodies, &mut rng);
        Ok(Self::assemble(bodies, config))
    }

    /// Build a swarm around an existing body pool.
    ///
    /// The pool size overrides `config.bodies.count`. Body ids must be
    /// `0..bodies.len()` in order.
    pub fn from_bodies(bodies: Vec<Body>, mut config: SwarmConfig) -> Result<Self, ConfigError> {
        config.bodies.count = bodies.len();
        config.validate()?;
        if bodies.iter().enumerate().any(|(i, b)| b.id != BodyId(i)) {
            return Err(ConfigError::Invalid(
                "body ids must run 0..N in order".to_string(),
            ));
        }
        Ok(Self::assemble(bodies, config))
    }

    fn assemble(bodies: Vec<Body>, config: SwarmConfig) -> Self {
        let snapshot = PositionSnapshot::from_bodies(&bodies);
        let points = snapshot.len();
        let builder = ProximityBuilder::from_config(&config.connections).with_capacity(points);
        let buffer = EdgeBuffer::for_points(points, config.connections.max_per_body);
        let clock = StepClock::new(config.timing.fixed_step, config.timing.max_substeps);
        let world = PhysicsWorld::new(bodies, &config);

        debug!(
            bodies = points - 1,
            edge_capacity = buffer.edge_capacity(),
            "swarm ready"
        );

        Self {
            config,
            world,
            snapshot,
            builder,
            buffer,
            clock,
            observers: Vec::new(),
        }
    }

    /// Register an extra observer for body position changes.
    pub fn subscribe(&mut self, observer: Box<dyn PositionObserver>) {
        self.observers.push(observer);
    }

    /// Run one fixed physics step with the pointer at `pointer`.
    ///
    /// `half_extents` is the world-space half size of the view, used to
    /// place the repulsor under the pointer. Returns how many bodies moved.
    pub fn physics_step(&mut self, pointer: &Pointer, half_extents: Vec2) -> usize {
        let dt = self.clock.fixed_step();
        self.world.command_repulsor(pointer.ndc(), half_extents, dt);

        let mut fanout = Fanout {
            snapshot: &mut self.snapshot,
            observers: &mut self.observers,
        };
        self.world.step(dt, &mut fanout)
    }

    /// Rebuild the proximity graph and edge buffer. Returns the connected-pair count.
    pub fn render_step(&mut self) -> usize {
        let points = self.snapshot.as_slice();
        let edges = self.builder.build(points);
        self.buffer.write(edges, points);
        trace!(edges = edges.len(), "render step");
        edges.len()
    }

    /// Run the physics steps owed for `frame_delta` seconds, then one render step.
    ///
    /// Returns the connected-pair count.
    pub fn advance(&mut self, frame_delta: f32, pointer: &Pointer, half_extents: Vec2) -> usize {
        for _ in 0..self.clock.advance(frame_delta) {
            self.physics_step(pointer, half_extents);
        }
        self.render_step()
    }

    pub fn config(&self) -> &SwarmConfig {
        &self.config
    }

    pub fn bodies(&self) -> &[Body] {
        self.world.bodies()
    }

    pub fn world(&self) -> &PhysicsWorld {
        &self.world
    }

    pub fn snapshot(&self) -> &PositionSnapshot {
        &self.snapshot
    }

    /// Edges from the last render step.
    pub fn edges(&self) -> &[Edge] {
        self.builder.edges()
    }

    pub fn edge_buffer(&self) -> &EdgeBuffer {
        &self.buffer
    }

    pub fn clock(&self) -> &StepClock {
        &self.clock
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::body::Emissive;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn seeded(count: usize, seed: u64) -> SwarmConfig {
        let mut config = SwarmConfig::default();
        config.bodies.count = count;
        config.bodies.seed = Some(seed);
        config
    }

    #[test]
    fn test_snapshot_has_anchor_plus_bodies() {
        let swarm = Swarm::new(seeded(100, 1)).unwrap();
        assert_eq!(swarm.snapshot().len(), 101);
        assert_eq!(swarm.snapshot().get(0), Vec3::ZERO);
        assert_eq!(swarm.edge_buffer().edge_capacity(), 151);
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        assert!(Swarm::new(seeded(0, 1)).is_err());
    }

    #[test]
    fn test_snapshot_tracks_bodies_after_physics() {
        let mut swarm = Swarm::new(seeded(20, 2)).unwrap();
        let pointer = Pointer::new();
        for _ in 0..10 {
            swarm.physics_step(&pointer, Vec2::new(6.0, 3.5));
        }

        for body in swarm.bodies() {
            assert_eq!(swarm.snapshot().get(body.id.slot()), body.position);
        }
        assert_eq!(swarm.snapshot().len(), 21);
        assert_eq!(swarm.snapshot().get(0), Vec3::ZERO);
    }

    #[test]
    fn test_render_step_fills_edge_buffer() {
        let bodies = vec![
            Body {
                id: BodyId(0),
                size: 0.04,
                position: Vec3::new(1.0, 0.0, 0.0),
                emissive: Emissive::Sand,
            },
            Body {
                id: BodyId(1),
                size: 0.04,
                position: Vec3::new(0.0, 1.0, 0.0),
                emissive: Emissive::Copper,
            },
        ];
        let mut swarm = Swarm::from_bodies(bodies, SwarmConfig::default()).unwrap();

        assert_eq!(swarm.render_step(), 3);
        assert_eq!(swarm.edge_buffer().active_count(), 6);
        let pairs: Vec<(usize, usize)> = swarm.edges().iter().map(|e| (e.a, e.b)).collect();
        assert_eq!(pairs, vec![(0, 1), (0, 2), (1, 2)]);
    }

    #[test]
    fn test_out_of_order_ids_are_rejected() {
        let bodies = vec![Body {
            id: BodyId(3),
            size: 0.04,
            position: Vec3::Z,
            emissive: Emissive::Sand,
        }];
        assert!(Swarm::from_bodies(bodies, SwarmConfig::default()).is_err());
    }

    #[test]
    fn test_subscribers_see_moves() {
        let mut swarm = Swarm::new(seeded(5, 3)).unwrap();
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        swarm.subscribe(Box::new(move |id: BodyId, p: Vec3| sink.borrow_mut().push((id, p))));

        let moved = swarm.physics_step(&Pointer::new(), Vec2::new(6.0, 3.5));
        assert_eq!(seen.borrow().len(), moved);
        for (id, p) in seen.borrow().iter() {
            assert_eq!(swarm.snapshot().get(id.slot()), *p);
        }
    }

    #[test]
    fn test_advance_runs_owed_steps() {
        let mut swarm = Swarm::new(seeded(10, 4)).unwrap();
        swarm.advance(0.05, &Pointer::new(), Vec2::new(6.0, 3.5));
        assert_eq!(swarm.clock().steps(), 3);
    }
}
