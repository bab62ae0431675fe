//! Quad index pattern
//!
//! Every quad slot `k` owns indices `6k..6k+6`, which always reference
//! vertices `4k..4k+4` as two triangles (0-1-3, 1-2-3). The pattern depends
//! only on the slot, so the index array can be filled once per growth and
//! reused for every batch.

use super::error::{BatchError, BatchResult};
use super::geometry::{INDICES_PER_QUAD, VERTICES_PER_QUAD};

/// Indices for a quad whose first vertex is `base_vertex`
pub const fn quad_indices(base_vertex: u32) -> [u32; INDICES_PER_QUAD] {
    [
        base_vertex,
        base_vertex + 1,
        base_vertex + 3,
        base_vertex + 1,
        base_vertex + 2,
        base_vertex + 3,
    ]
}

/// Fills the not-yet-generated tail of an index array
///
/// Keeps a high-water mark of how much of the array already holds the
/// pattern. The matching vertex mark is derived from it, never from the
/// vertex array length.
#[derive(Debug, Clone, Default)]
pub struct QuadIndexGenerator {
    from_index: usize,
}

impl QuadIndexGenerator {
    /// Generator with nothing generated yet
    pub const fn new() -> Self {
        Self { from_index: 0 }
    }

    /// First index slot not yet generated
    pub const fn from_index(&self) -> usize {
        self.from_index
    }

    /// First vertex slot referenced by the next generated quad
    pub const fn from_vertex(&self) -> usize {
        self.from_index / INDICES_PER_QUAD * VERTICES_PER_QUAD
    }

    /// Generate every whole quad between the high-water mark and the end of `indices`
    ///
    /// Returns the number of quads written. Fails without writing anything if
    /// a quad in the tail would reference a vertex beyond `u32::MAX`.
    pub fn generate(&mut self, indices: &mut [u32]) -> BatchResult<usize> {
        let first_quad = self.from_index / INDICES_PER_QUAD;
        let end_quad = indices.len() / INDICES_PER_QUAD;
        if first_quad >= end_quad {
            return Ok(0);
        }

        let last_quad = end_quad - 1;
        let last_vertex = last_quad
            .checked_mul(VERTICES_PER_QUAD)
            .and_then(|base| base.checked_add(VERTICES_PER_QUAD - 1));
        if last_vertex.map_or(true, |vertex| u32::try_from(vertex).is_err()) {
            return Err(BatchError::IndexRangeExceeded { quad: last_quad });
        }

        let tail = &mut indices[first_quad * INDICES_PER_QUAD..end_quad * INDICES_PER_QUAD];
        let mut base_vertex = (first_quad * VERTICES_PER_QUAD) as u32;
        for chunk in tail.chunks_exact_mut(INDICES_PER_QUAD) {
            chunk.copy_from_slice(&quad_indices(base_vertex));
            base_vertex = base_vertex.wrapping_add(VERTICES_PER_QUAD as u32);
        }

        self.from_index = end_quad * INDICES_PER_QUAD;
        log::debug!(
            "Generated quad indices for slots {}..{} (vertex mark {})",
            first_quad,
            end_quad,
            self.from_vertex()
        );

        Ok(end_quad - first_quad)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_pattern(indices: &[u32], quads: usize) {
        for k in 0..quads {
            let base = (4 * k) as u32;
            assert_eq!(
                &indices[6 * k..6 * k + 6],
                &[base, base + 1, base + 3, base + 1, base + 2, base + 3],
                "quad slot {k}"
            );
        }
    }

    #[test]
    fn test_quad_indices() {
        assert_eq!(quad_indices(0), [0, 1, 3, 1, 2, 3]);
        assert_eq!(quad_indices(8), [8, 9, 11, 9, 10, 11]);
    }

    #[test]
    fn test_generate_full_array() {
        let mut indices = vec![0u32; 12];
        let mut generator = QuadIndexGenerator::new();

        assert_eq!(generator.generate(&mut indices).unwrap(), 2);
        assert_pattern(&indices, 2);
        assert_eq!(generator.from_index(), 12);
        assert_eq!(generator.from_vertex(), 8);
    }

    #[test]
    fn test_only_tail_is_written() {
        let mut indices = vec![0u32; 6];
        let mut generator = QuadIndexGenerator::new();
        generator.generate(&mut indices).unwrap();

        // Poison the generated head: a resumed pass must not touch it
        indices[0] = 999;
        indices.resize(24, 0);
        assert_eq!(generator.generate(&mut indices).unwrap(), 3);

        assert_eq!(indices[0], 999);
        assert_eq!(&indices[6..12], &[4, 5, 7, 5, 6, 7]);
        assert_eq!(&indices[18..24], &[12, 13, 15, 13, 14, 15]);
    }

    #[test]
    fn test_idempotent_without_growth() {
        let mut indices = vec![0u32; 18];
        let mut generator = QuadIndexGenerator::new();
        generator.generate(&mut indices).unwrap();
        let before = indices.clone();

        assert_eq!(generator.generate(&mut indices).unwrap(), 0);
        assert_eq!(indices, before);
    }

    #[test]
    fn test_pattern_independent_of_growth_history() {
        let mut stepped = vec![0u32; 6];
        let mut generator = QuadIndexGenerator::new();
        generator.generate(&mut stepped).unwrap();
        for _ in 0..5 {
            let len = stepped.len() * 2;
            stepped.resize(len, 0);
            generator.generate(&mut stepped).unwrap();
        }

        let mut direct = vec![0u32; stepped.len()];
        QuadIndexGenerator::new().generate(&mut direct).unwrap();

        assert_eq!(stepped, direct);
        assert_pattern(&stepped, stepped.len() / 6);
    }

    #[test]
    fn test_partial_quad_tail_is_ignored() {
        let mut indices = vec![u32::MAX; 10];
        let mut generator = QuadIndexGenerator::new();

        assert_eq!(generator.generate(&mut indices).unwrap(), 1);
        assert_eq!(&indices[6..], &[u32::MAX; 4]);
        assert_eq!(generator.from_index(), 6);
    }
}
