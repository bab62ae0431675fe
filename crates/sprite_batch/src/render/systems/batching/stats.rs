//! Batch statistics

/// Counters for batch activity, cumulative since creation or the last reset
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchStats {
    /// `end` calls that closed an active batch, empty or failed ones included
    pub batches_ended: usize,

    /// Indexed draw calls issued to the device
    pub draw_calls: usize,

    /// Sprites accepted by `draw`
    pub sprites_drawn: usize,

    /// Triangles submitted
    pub triangles_drawn: usize,

    /// Times the vertex array doubled
    pub vertex_array_growths: usize,

    /// Times the index array doubled
    pub index_array_growths: usize,

    /// Times the GPU buffers were released and recreated at a larger size
    pub buffer_recreations: usize,
}

impl BatchStats {
    /// Average sprites per draw call
    pub fn avg_sprites_per_draw_call(&self) -> f32 {
        if self.draw_calls == 0 {
            0.0
        } else {
            self.sprites_drawn as f32 / self.draw_calls as f32
        }
    }
}
