//! # Sprite Batch
//!
//! Collects `draw` calls between `begin` and `end` and submits all of them
//! with a single indexed draw.
//!
//! ## Lifecycle
//!
//! - **Idle** → `begin` → **Accumulating** → `end` → **Idle**
//! - `draw` only appends to host arrays; the device is not touched
//! - `end` uploads the active vertices, binds state and issues one draw
//!
//! ## Buffer Growth
//!
//! Host arrays double when a quad does not fit. The GPU buffers are sized to
//! the array length, not the active count, so they are only recreated on the
//! first flush after a growth. The index buffer content is a fixed pattern and
//! is regenerated only for the newly grown tail.
//!
//! ## Render State
//!
//! A flush leaves culling, depth and blend state set for sprites. Set
//! [`SpriteBatchConfig::restore_render_state`] to have the previous state put
//! back after the draw instead.

use log::{debug, trace, warn};

use super::error::{BatchError, BatchResult};
use super::geometry::GeometryBuffers;
use super::index_pattern::QuadIndexGenerator;
use super::stats::BatchStats;
use crate::foundation::math::{Mat4, Mat4Ext, Vec2};
use crate::render::api::{
    BeginParams, GraphicsDevice, IndexBufferHandle, IndexElementSize, SpriteBatchConfig, SpriteEffect,
    VertexBufferHandle, Viewport,
};
use crate::render::primitives::{Color, SpriteVertex, VertexType};
use crate::render::resources::{RenderStateSnapshot, SamplerState, Texture2D};
use crate::render::RenderError;

/// State captured by `begin` for the batch being accumulated
#[derive(Debug, Clone)]
struct ActiveBatch {
    texture: Texture2D,
    view: Mat4,
    projection: Mat4,
    sampler: SamplerState,
}

#[derive(Debug, Clone)]
enum BatchState {
    Idle,
    Accumulating(ActiveBatch),
}

/// Orthographic projection over `viewport` with the origin at its top-left corner
pub fn default_projection(viewport: &Viewport) -> Mat4 {
    let left = viewport.x as f32;
    let top = viewport.y as f32;
    Mat4::orthographic_off_center(
        left,
        left + viewport.width as f32,
        top + viewport.height as f32,
        top,
        0.0,
        1.0,
    )
}

/// Single-texture sprite batcher
///
/// Owns its GPU buffers exclusively and releases them on drop. Not
/// reentrant: only one batch may be accumulating at a time.
pub struct SpriteBatch<D: GraphicsDevice, E: SpriteEffect> {
    device: D,
    effect: E,
    config: SpriteBatchConfig,
    default_texture: Texture2D,

    geometry: GeometryBuffers,
    index_generator: QuadIndexGenerator,
    vertex_buffer: Option<VertexBufferHandle>,
    index_buffer: Option<IndexBufferHandle>,

    /// Set when either host array outgrew its GPU mirror
    buffers_dirty: bool,
    triangle_count: usize,
    state: BatchState,
    stats: BatchStats,
}

impl<D: GraphicsDevice, E: SpriteEffect> SpriteBatch<D, E> {
    /// Create a batcher and its initial GPU buffers
    ///
    /// Both host arrays are pre-seeded for `config.initial_quads` quads, the
    /// whole index pattern is generated and uploaded once.
    pub fn new(device: D, effect: E, default_texture: Texture2D, config: SpriteBatchConfig) -> BatchResult<Self> {
        config.validate()?;
        let geometry = GeometryBuffers::with_quad_capacity(config.initial_quads)?;

        let mut batch = Self {
            device,
            effect,
            config,
            default_texture,
            geometry,
            index_generator: QuadIndexGenerator::new(),
            vertex_buffer: None,
            index_buffer: None,
            buffers_dirty: false,
            triangle_count: 0,
            state: BatchState::Idle,
            stats: BatchStats::default(),
        };
        batch.create_buffers()?;

        debug!(
            "Created sprite batch for {} quads ({} vertices, {} indices)",
            batch.config.initial_quads,
            batch.geometry.vertex_capacity(),
            batch.geometry.index_capacity()
        );
        Ok(batch)
    }

    /// Start a batch
    ///
    /// Unset parameters fall back to identity view, a top-left-origin
    /// orthographic projection over the current viewport, the configured
    /// sampler and the default texture.
    pub fn begin(&mut self, params: BeginParams) -> BatchResult<()> {
        if self.is_active() {
            warn!("begin() called while a sprite batch is already accumulating");
            return Err(BatchError::AlreadyBegun);
        }

        let active = ActiveBatch {
            texture: params.texture.unwrap_or(self.default_texture),
            view: params.view.unwrap_or_else(Mat4::identity),
            projection: params
                .projection
                .unwrap_or_else(|| default_projection(&self.device.viewport())),
            sampler: params.sampler.unwrap_or(self.config.default_sampler),
        };

        trace!("Sprite batch begun with texture {:?}", active.texture.handle());
        self.state = BatchState::Accumulating(active);
        Ok(())
    }

    /// Queue a sprite tinted white with its top-left corner at `position`
    pub fn draw(&mut self, position: Vec2) -> BatchResult<()> {
        self.draw_with_color(position, Color::WHITE)
    }

    /// Queue a sprite with its top-left corner at `position`
    ///
    /// The quad is the size of the batch texture in pixels and spans the
    /// whole texture.
    pub fn draw_with_color(&mut self, position: Vec2, color: Color) -> BatchResult<()> {
        let texture = match &self.state {
            BatchState::Accumulating(active) => active.texture,
            BatchState::Idle => {
                warn!("draw() called without begin()");
                return Err(BatchError::NotBegun);
            }
        };

        let quad = self.geometry.vertex_count() / 4;
        if u32::try_from(self.geometry.vertex_count() + 3).is_err() {
            return Err(BatchError::IndexRangeExceeded { quad });
        }

        let growth = self.geometry.reserve_quad()?;
        if growth.vertices {
            self.stats.vertex_array_growths += 1;
        }
        if growth.indices {
            self.stats.index_array_growths += 1;
        }
        if growth.any() {
            debug!(
                "Sprite arrays grew to {} vertices / {} indices",
                self.geometry.vertex_capacity(),
                self.geometry.index_capacity()
            );
            self.buffers_dirty = true;
        }

        let size = Vec2::new(texture.width() as f32, texture.height() as f32);
        let top_left = position;
        let top_right = position + Vec2::new(size.x, 0.0);
        let bottom_right = position + size;
        let bottom_left = position + Vec2::new(0.0, size.y);

        self.geometry.push_quad([
            SpriteVertex::from_xy(top_left, Vec2::new(0.0, 0.0), color),
            SpriteVertex::from_xy(top_right, Vec2::new(1.0, 0.0), color),
            SpriteVertex::from_xy(bottom_right, Vec2::new(1.0, 1.0), color),
            SpriteVertex::from_xy(bottom_left, Vec2::new(0.0, 1.0), color),
        ]);

        self.triangle_count += 2;
        self.stats.sprites_drawn += 1;
        Ok(())
    }

    /// Finish the batch and submit it
    ///
    /// Does nothing when no sprite was drawn, or when no batch is active.
    /// On error the frame's sprites are discarded and the batch returns to
    /// idle; buffers marked dirty stay dirty and are recreated next time.
    pub fn end(&mut self) -> BatchResult<()> {
        let active = match std::mem::replace(&mut self.state, BatchState::Idle) {
            BatchState::Accumulating(active) => active,
            BatchState::Idle => {
                trace!("end() called with no active sprite batch");
                return Ok(());
            }
        };

        self.stats.batches_ended += 1;
        let result = self.flush(&active);
        self.triangle_count = 0;
        self.geometry.reset();
        result
    }

    fn flush(&mut self, active: &ActiveBatch) -> BatchResult<()> {
        if self.triangle_count == 0 {
            return Ok(());
        }

        if self.buffers_dirty {
            self.recreate_buffers()?;
        }

        let (vertex_buffer, index_buffer) = match (self.vertex_buffer, self.index_buffer) {
            (Some(vertices), Some(indices)) => (vertices, indices),
            _ => return Err(RenderError::InvalidHandle("sprite batch buffers are missing".to_string()).into()),
        };

        self.device
            .set_vertex_data(vertex_buffer, bytemuck::cast_slice(self.geometry.active_vertices()))?;
        self.device.bind_buffers(vertex_buffer, index_buffer)?;

        let view_projection = active.projection * active.view;
        self.effect
            .set_matrix(&self.config.view_projection_parameter, &view_projection)?;

        let previous = self.config.restore_render_state.then(|| self.capture_render_state());
        let submitted = self.submit(active);
        if let Some(previous) = previous {
            self.apply_render_state(previous);
        }
        submitted?;

        self.stats.draw_calls += 1;
        self.stats.triangles_drawn += self.triangle_count;
        trace!(
            "Flushed {} sprites ({} triangles) in one draw call",
            self.triangle_count / 2,
            self.triangle_count
        );
        Ok(())
    }

    fn submit(&mut self, active: &ActiveBatch) -> BatchResult<()> {
        self.apply_render_state(RenderStateSnapshot::SPRITE);
        self.device.set_sampler_state(0, active.sampler);
        self.device.set_texture(0, &active.texture);
        self.effect.apply()?;

        let triangles = u32::try_from(self.triangle_count)
            .map_err(|_| BatchError::IndexRangeExceeded { quad: self.triangle_count / 2 })?;
        self.device.draw_indexed_triangles(0, triangles)?;
        Ok(())
    }

    fn capture_render_state(&self) -> RenderStateSnapshot {
        RenderStateSnapshot {
            rasterizer: self.device.rasterizer_state(),
            depth_stencil: self.device.depth_stencil_state(),
            blend: self.device.blend_state(),
        }
    }

    fn apply_render_state(&mut self, state: RenderStateSnapshot) {
        self.device.set_rasterizer_state(state.rasterizer);
        self.device.set_depth_stencil_state(state.depth_stencil);
        self.device.set_blend_state(state.blend);
    }

    /// Create GPU buffers matching the current array lengths and upload the index pattern
    fn create_buffers(&mut self) -> BatchResult<()> {
        let vertex_buffer = self
            .device
            .create_vertex_buffer(SpriteVertex::vertex_declaration(), self.geometry.vertex_capacity())?;
        self.vertex_buffer = Some(vertex_buffer);

        self.index_generator.generate(self.geometry.indices_mut())?;

        let index_buffer = self
            .device
            .create_index_buffer(IndexElementSize::ThirtyTwoBits, self.geometry.index_capacity())?;
        self.index_buffer = Some(index_buffer);
        self.device
            .set_index_data(index_buffer, bytemuck::cast_slice(self.geometry.indices()))?;

        Ok(())
    }

    fn recreate_buffers(&mut self) -> BatchResult<()> {
        debug!(
            "Recreating sprite GPU buffers: {} vertices, {} indices",
            self.geometry.vertex_capacity(),
            self.geometry.index_capacity()
        );

        self.release_buffers();
        self.create_buffers()?;

        self.buffers_dirty = false;
        self.stats.buffer_recreations += 1;
        Ok(())
    }

    fn release_buffers(&mut self) {
        if let Some(buffer) = self.vertex_buffer.take() {
            self.device.release_vertex_buffer(buffer);
        }
        if let Some(buffer) = self.index_buffer.take() {
            self.device.release_index_buffer(buffer);
        }
    }

    /// Whether a batch is between `begin` and `end`
    pub const fn is_active(&self) -> bool {
        matches!(self.state, BatchState::Accumulating(_))
    }

    /// Triangles queued in the active batch
    pub const fn triangle_count(&self) -> usize {
        self.triangle_count
    }

    /// Vertices queued in the active batch
    pub const fn vertex_count(&self) -> usize {
        self.geometry.vertex_count()
    }

    /// Indices queued in the active batch
    pub const fn index_count(&self) -> usize {
        self.geometry.index_count()
    }

    /// Vertex array length
    pub fn vertex_capacity(&self) -> usize {
        self.geometry.vertex_capacity()
    }

    /// Index array length
    pub fn index_capacity(&self) -> usize {
        self.geometry.index_capacity()
    }

    /// Whole host vertex array, including slots past the active count
    pub fn vertices(&self) -> &[SpriteVertex] {
        self.geometry.vertices()
    }

    /// Whole host index array
    pub fn indices(&self) -> &[u32] {
        self.geometry.indices()
    }

    /// Whether the GPU buffers are waiting to be recreated
    pub const fn buffers_dirty(&self) -> bool {
        self.buffers_dirty
    }

    /// Index pattern high-water mark
    pub const fn index_generator(&self) -> &QuadIndexGenerator {
        &self.index_generator
    }

    /// Current GPU vertex buffer
    pub const fn vertex_buffer(&self) -> Option<VertexBufferHandle> {
        self.vertex_buffer
    }

    /// Current GPU index buffer
    pub const fn index_buffer(&self) -> Option<IndexBufferHandle> {
        self.index_buffer
    }

    /// Texture used when `begin` is given none
    pub const fn default_texture(&self) -> Texture2D {
        self.default_texture
    }

    /// Replace the fallback texture for future batches
    pub fn set_default_texture(&mut self, texture: Texture2D) {
        self.default_texture = texture;
    }

    /// Active configuration
    pub const fn config(&self) -> &SpriteBatchConfig {
        &self.config
    }

    /// Batch statistics
    pub const fn stats(&self) -> &BatchStats {
        &self.stats
    }

    /// Reset statistics
    pub fn reset_stats(&mut self) {
        self.stats = BatchStats::default();
    }

    /// Graphics device
    pub const fn device(&self) -> &D {
        &self.device
    }

    /// Mutable graphics device, for host-side work between batches
    pub fn device_mut(&mut self) -> &mut D {
        &mut self.device
    }

    /// Sprite effect
    pub const fn effect(&self) -> &E {
        &self.effect
    }

    /// Mutable sprite effect
    pub fn effect_mut(&mut self) -> &mut E {
        &mut self.effect
    }
}

impl<D: GraphicsDevice, E: SpriteEffect> Drop for SpriteBatch<D, E> {
    fn drop(&mut self) {
        self.release_buffers();
    }
}
