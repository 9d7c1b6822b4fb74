//! Draw-ready edge buffers.
//!
//! The buffers are allocated once for the worst case and reused every
//! tick. Each edge becomes two vertices: three position floats per vertex
//! in [`EdgeBuffer::positions`], and the edge intensity repeated on all
//! three colour channels of both vertices in [`EdgeBuffer::colors`].
//! `active_count` is the number of leading vertices that are valid this
//! tick. Slots past it keep whatever an earlier tick wrote there and are
//! simply not drawn.

use glam::Vec3;
use tracing::{debug, warn};

use crate::proximity::{max_edges, Edge};

/// Floats per vertex in both buffers.
pub const FLOATS_PER_VERTEX: usize = 3;
/// Floats per edge in both buffers.
pub const FLOATS_PER_EDGE: usize = FLOATS_PER_VERTEX * 2;

/// Fixed-capacity line-segment buffers with an active length marker.
#[derive(Clone, Debug)]
pub struct EdgeBuffer {
    positions: Vec<f32>,
    colors: Vec<f32>,
    active_count: usize,
}

impl EdgeBuffer {
    /// Buffer holding up to `edge_capacity` edges.
    pub fn with_edge_capacity(edge_capacity: usize) -> Self {
        debug!(edge_capacity, "allocating edge buffer");
        Self {
            positions: vec![0.0; edge_capacity * FLOATS_PER_EDGE],
            colors: vec![0.0; edge_capacity * FLOATS_PER_EDGE],
            active_count: 0,
        }
    }

    /// Buffer sized for the most edges a capped pass over `point_count` points can emit.
    pub fn for_points(point_count: usize, max_per_body: u32) -> Self {
        Self::with_edge_capacity(max_edges(point_count, max_per_body))
    }

    /// Pack `edges`, whose endpoints index into `points`.
    ///
    /// Returns the new active vertex count. Edges beyond capacity are
    /// dropped so the marker never runs past the allocation.
    pub fn write(&mut self, edges: &[Edge], points: &[Vec3]) -> usize {
        let capacity = self.edge_capacity();
        if edges.len() > capacity {
            warn!(
                edges = edges.len(),
                capacity, "edge buffer full, dropping extra edges"
            );
        }
        let written = edges.len().min(capacity);

        let position_chunks = self.positions.chunks_exact_mut(FLOATS_PER_EDGE);
        let color_chunks = self.colors.chunks_exact_mut(FLOATS_PER_EDGE);
        for ((edge, pos), color) in edges.iter().zip(position_chunks).zip(color_chunks) {
            pos[..FLOATS_PER_VERTEX].copy_from_slice(&points[edge.a].to_array());
            pos[FLOATS_PER_VERTEX..].copy_from_slice(&points[edge.b].to_array());
            color.fill(edge.intensity);
        }

        self.active_count = written * 2;
        self.active_count
    }

    /// Number of valid leading vertices.
    #[inline]
    pub fn active_count(&self) -> usize {
        self.active_count
    }

    /// Number of valid leading edges.
    #[inline]
    pub fn active_edges(&self) -> usize {
        self.active_count / 2
    }

    #[inline]
    pub fn edge_capacity(&self) -> usize {
        self.positions.len() / FLOATS_PER_EDGE
    }

    #[inline]
    pub fn vertex_capacity(&self) -> usize {
        self.edge_capacity() * 2
    }

    /// The whole position allocation, including stale slots.
    pub fn positions(&self) -> &[f32] {
        &self.positions
    }

    /// The whole colour allocation, including stale slots.
    pub fn colors(&self) -> &[f32] {
        &self.colors
    }

    /// Positions of the active vertices only.
    pub fn active_positions(&self) -> &[f32] {
        &self.positions[..self.active_count * FLOATS_PER_VERTEX]
    }

    /// Colours of the active vertices only.
    pub fn active_colors(&self) -> &[f32] {
        &self.colors[..self.active_count * FLOATS_PER_VERTEX]
    }

    /// Active positions as raw bytes for a GPU upload.
    pub fn position_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(self.active_positions())
    }

    /// Active colours as raw bytes for a GPU upload.
    pub fn color_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(self.active_colors())
    }
}
