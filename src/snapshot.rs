//! Body state store.
//!
//! [`PositionSnapshot`] is the single owned list of positions the proximity
//! pass reads. Slot 0 is the anchor and always holds the origin; slot
//! `id + 1` holds body `id`. The length is fixed at construction.

use glam::Vec3;
use tracing::warn;

use crate::body::{Body, BodyId};

/// Receives a body's new position whenever it moves.
///
/// Called synchronously after each physics step, once per body whose
/// position changed.
pub trait PositionObserver {
    fn on_position_changed(&mut self, id: BodyId, position: Vec3);
}

impl<F> PositionObserver for F
where
    F: FnMut(BodyId, Vec3),
{
    fn on_position_changed(&mut self, id: BodyId, position: Vec3) {
        self(id, position)
    }
}

/// Latest position of the anchor and every body.
#[derive(Clone, Debug, PartialEq)]
pub struct PositionSnapshot {
    positions: Vec<Vec3>,
}

impl PositionSnapshot {
    /// Snapshot for `body_count` bodies, all at the origin.
    pub fn new(body_count: usize) -> Self {
        Self {
            positions: vec![Vec3::ZERO; body_count + 1],
        }
    }

    /// Snapshot seeded from the bodies' current positions.
    pub fn from_bodies(bodies: &[Body]) -> Self {
        let mut snapshot = Self::new(bodies.len());
        for body in bodies {
            snapshot.set(body.id, body.position);
        }
        snapshot
    }

    /// Write one body's slot.
    ///
    /// Non-finite positions are dropped and the slot keeps its previous
    /// value, so a single bad sample cannot poison later distance checks.
    pub fn set(&mut self, id: BodyId, position: Vec3) {
        if !position.is_finite() {
            warn!(body = id.0, ?position, "dropping non-finite position");
            return;
        }
        self.positions[id.slot()] = position;
    }

    /// Position in `slot` (0 is the anchor).
    #[inline]
    pub fn get(&self, slot: usize) -> Vec3 {
        self.positions[slot]
    }

    /// Read-only view of every slot.
    #[inline]
    pub fn as_slice(&self) -> &[Vec3] {
        &self.positions
    }

    /// Number of slots (M = N + 1).
    #[inline]
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    /// Always false: the anchor slot is present even with no bodies.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Number of bodies (N).
    #[inline]
    pub fn body_count(&self) -> usize {
        self.positions.len() - 1
    }
}

impl PositionObserver for PositionSnapshot {
    fn on_position_changed(&mut self, id: BodyId, position: Vec3) {
        self.set(id, position);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::body::Emissive;

    #[test]
    fn test_length_is_bodies_plus_anchor() {
        let snapshot = PositionSnapshot::new(100);
        assert_eq!(snapshot.len(), 101);
        assert_eq!(snapshot.body_count(), 100);
        assert_eq!(snapshot.get(0), Vec3::ZERO);
    }

    #[test]
    fn test_bodies_write_only_their_slot() {
        let mut snapshot = PositionSnapshot::new(3);
        snapshot.set(BodyId(1), Vec3::new(1.0, 2.0, 3.0));

        assert_eq!(snapshot.as_slice()[0], Vec3::ZERO);
        assert_eq!(snapshot.as_slice()[1], Vec3::ZERO);
        assert_eq!(snapshot.as_slice()[2], Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(snapshot.as_slice()[3], Vec3::ZERO);
        assert_eq!(snapshot.len(), 4);
    }

    #[test]
    fn test_non_finite_positions_are_dropped() {
        let mut snapshot = PositionSnapshot::new(1);
        snapshot.set(BodyId(0), Vec3::X);
        snapshot.set(BodyId(0), Vec3::new(f32::NAN, 0.0, 0.0));
        snapshot.set(BodyId(0), Vec3::new(0.0, f32::INFINITY, 0.0));
        assert_eq!(snapshot.get(1), Vec3::X);
    }

    #[test]
    fn test_seeds_from_bodies() {
        let bodies = vec![
            Body {
                id: BodyId(0),
                size: 0.1,
                position: Vec3::Y,
                emissive: Emissive::Umber,
            },
            Body {
                id: BodyId(1),
                size: 0.1,
                position: Vec3::Z,
                emissive: Emissive::Peach,
            },
        ];
        let snapshot = PositionSnapshot::from_bodies(&bodies);
        assert_eq!(snapshot.as_slice(), &[Vec3::ZERO, Vec3::Y, Vec3::Z]);
    }

    #[test]
    fn test_closures_observe_positions() {
        let mut seen = Vec::new();
        {
            let mut observer = |id: BodyId, p: Vec3| seen.push((id, p));
            observer.on_position_changed(BodyId(4), Vec3::ONE);
        }
        assert_eq!(seen, vec![(BodyId(4), Vec3::ONE)]);
    }
}
