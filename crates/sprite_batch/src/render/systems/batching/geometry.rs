//! Growable host-side geometry
//!
//! Vertices and indices live in two parallel arrays whose *length* is the
//! capacity mirrored on the GPU. The active element counts are tracked
//! separately and reset every flush; the arrays themselves only ever double.

use super::error::{BatchError, BatchResult};
use crate::render::primitives::SpriteVertex;

/// Vertices emitted per quad
pub const VERTICES_PER_QUAD: usize = 4;

/// Indices emitted per quad (two triangles)
pub const INDICES_PER_QUAD: usize = 6;

/// Double `array` until it holds at least `needed` elements
///
/// Returns `Ok(true)` when the array was resized. Existing contents are kept,
/// new slots are filled with `T::default()`. The array never shrinks.
pub fn ensure_size_or_double<T: Clone + Default>(array: &mut Vec<T>, needed: usize) -> BatchResult<bool> {
    let current = array.len();
    if current >= needed {
        return Ok(false);
    }
    if current == 0 {
        return Err(BatchError::ZeroCapacity { needed });
    }

    let mut new_len = current;
    while new_len < needed {
        new_len = new_len
            .checked_mul(2)
            .ok_or(BatchError::CapacityOverflow { current, needed })?;
    }

    array
        .try_reserve_exact(new_len - current)
        .map_err(|_| BatchError::CapacityOverflow { current, needed })?;
    array.resize(new_len, T::default());

    log::debug!("Grew array from {} to {} elements", current, new_len);
    Ok(true)
}

/// Which arrays grew while reserving room for a quad
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct QuadGrowth {
    /// Vertex array was doubled
    pub vertices: bool,
    /// Index array was doubled
    pub indices: bool,
}

impl QuadGrowth {
    /// Either array grew
    pub const fn any(self) -> bool {
        self.vertices || self.indices
    }
}

/// Vertex and index arrays plus the active counts for the current batch
#[derive(Debug, Clone)]
pub struct GeometryBuffers {
    vertices: Vec<SpriteVertex>,
    indices: Vec<u32>,
    vertex_count: usize,
    index_count: usize,
}

impl GeometryBuffers {
    /// Pre-seed both arrays for `initial_quads` quads
    pub fn with_quad_capacity(initial_quads: usize) -> BatchResult<Self> {
        if initial_quads == 0 {
            return Err(BatchError::ZeroCapacity { needed: VERTICES_PER_QUAD });
        }

        let overflow = || BatchError::CapacityOverflow { current: 0, needed: initial_quads };
        let vertex_len = initial_quads.checked_mul(VERTICES_PER_QUAD).ok_or_else(overflow)?;
        let index_len = initial_quads.checked_mul(INDICES_PER_QUAD).ok_or_else(overflow)?;

        Ok(Self {
            vertices: vec![SpriteVertex::default(); vertex_len],
            indices: vec![0; index_len],
            vertex_count: 0,
            index_count: 0,
        })
    }

    /// Make room for one more quad, doubling either array as needed
    ///
    /// Either both arrays end up large enough or neither changes: a failed
    /// index growth undoes the vertex growth that preceded it.
    pub fn reserve_quad(&mut self) -> BatchResult<QuadGrowth> {
        let vertex_len = self.vertices.len();
        let vertices = ensure_size_or_double(&mut self.vertices, self.vertex_count + VERTICES_PER_QUAD)?;
        let indices = match ensure_size_or_double(&mut self.indices, self.index_count + INDICES_PER_QUAD) {
            Ok(grew) => grew,
            Err(e) => {
                self.vertices.truncate(vertex_len);
                return Err(e);
            }
        };
        Ok(QuadGrowth { vertices, indices })
    }

    /// Write a quad at the next free slot
    ///
    /// Callers must have called [`reserve_quad`](Self::reserve_quad) first.
    pub fn push_quad(&mut self, corners: [SpriteVertex; VERTICES_PER_QUAD]) {
        let start = self.vertex_count;
        self.vertices[start..start + VERTICES_PER_QUAD].copy_from_slice(&corners);
        self.vertex_count += VERTICES_PER_QUAD;
        self.index_count += INDICES_PER_QUAD;
    }

    /// Forget the active quads; capacity is kept
    pub fn reset(&mut self) {
        self.vertex_count = 0;
        self.index_count = 0;
    }

    /// Whole vertex array, including slots beyond the active count
    pub fn vertices(&self) -> &[SpriteVertex] {
        &self.vertices
    }

    /// Vertices written since the last reset
    pub fn active_vertices(&self) -> &[SpriteVertex] {
        &self.vertices[..self.vertex_count]
    }

    /// Whole index array
    pub fn indices(&self) -> &[u32] {
        &self.indices
    }

    /// Mutable index array, for pattern generation
    pub fn indices_mut(&mut self) -> &mut [u32] {
        &mut self.indices
    }

    /// Active vertex count
    pub const fn vertex_count(&self) -> usize {
        self.vertex_count
    }

    /// Active index count
    pub const fn index_count(&self) -> usize {
        self.index_count
    }

    /// Vertex array length
    pub fn vertex_capacity(&self) -> usize {
        self.vertices.len()
    }

    /// Index array length
    pub fn index_capacity(&self) -> usize {
        self.indices.len()
    }
}
