//! Backend abstraction traits for the sprite batcher
//!
//! These traits describe exactly what the batcher consumes from the host:
//! buffer creation and upload, fixed-function state, texture binding and
//! one indexed draw entry point.

use crate::foundation::math::Mat4;
use crate::render::primitives::VertexDeclaration;
use crate::render::resources::{BlendState, DepthStencilState, RasterizerState, SamplerState, Texture2D};
use crate::render::RenderError;

/// Result type for backend operations
pub type BackendResult<T> = Result<T, RenderError>;

/// Handle to a vertex buffer owned by the device
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct VertexBufferHandle(pub u64);

/// Handle to an index buffer owned by the device
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct IndexBufferHandle(pub u64);

/// Width of a single index
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IndexElementSize {
    /// `u16` indices
    SixteenBits,
    /// `u32` indices
    ThirtyTwoBits,
}

impl IndexElementSize {
    /// Bytes per index
    pub const fn size_in_bytes(self) -> usize {
        match self {
            Self::SixteenBits => 2,
            Self::ThirtyTwoBits => 4,
        }
    }
}

/// Render target rectangle in pixels
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    /// Left edge
    pub x: i32,
    /// Top edge
    pub y: i32,
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
    /// Near depth bound
    pub min_depth: f32,
    /// Far depth bound
    pub max_depth: f32,
}

impl Viewport {
    /// Create a viewport with the full [0, 1] depth range
    pub const fn new(x: i32, y: i32, width: u32, height: u32) -> Self {
        Self { x, y, width, height, min_depth: 0.0, max_depth: 1.0 }
    }
}

/// Graphics device consumed by the batcher
///
/// Buffers are exclusively owned by whoever created them and must be
/// released explicitly; the device does not track lifetimes on the
/// caller's behalf.
pub trait GraphicsDevice {
    /// Current viewport, used for the default projection
    fn viewport(&self) -> Viewport;

    /// Create a vertex buffer able to hold `capacity` vertices of `declaration`
    fn create_vertex_buffer(&mut self, declaration: &VertexDeclaration, capacity: usize) -> BackendResult<VertexBufferHandle>;

    /// Create an index buffer able to hold `capacity` indices
    fn create_index_buffer(&mut self, element_size: IndexElementSize, capacity: usize) -> BackendResult<IndexBufferHandle>;

    /// Release a vertex buffer; the handle is invalid afterwards
    fn release_vertex_buffer(&mut self, buffer: VertexBufferHandle);

    /// Release an index buffer; the handle is invalid afterwards
    fn release_index_buffer(&mut self, buffer: IndexBufferHandle);

    /// Write `data` to the start of a vertex buffer
    fn set_vertex_data(&mut self, buffer: VertexBufferHandle, data: &[u8]) -> BackendResult<()>;

    /// Write `data` to the start of an index buffer
    fn set_index_data(&mut self, buffer: IndexBufferHandle, data: &[u8]) -> BackendResult<()>;

    /// Bind the buffers used by the next draw
    fn bind_buffers(&mut self, vertices: VertexBufferHandle, indices: IndexBufferHandle) -> BackendResult<()>;

    /// Current rasterizer preset
    fn rasterizer_state(&self) -> RasterizerState;

    /// Set the rasterizer preset
    fn set_rasterizer_state(&mut self, state: RasterizerState);

    /// Current depth/stencil preset
    fn depth_stencil_state(&self) -> DepthStencilState;

    /// Set the depth/stencil preset
    fn set_depth_stencil_state(&mut self, state: DepthStencilState);

    /// Current blend preset
    fn blend_state(&self) -> BlendState;

    /// Set the blend preset
    fn set_blend_state(&mut self, state: BlendState);

    /// Set the sampler for a texture slot
    fn set_sampler_state(&mut self, slot: usize, sampler: SamplerState);

    /// Bind a texture to a slot
    fn set_texture(&mut self, slot: usize, texture: &Texture2D);

    /// Draw `triangle_count` indexed triangles starting at `start_index`
    fn draw_indexed_triangles(&mut self, start_index: u32, triangle_count: u32) -> BackendResult<()>;
}

/// Shader/effect used for the sprite draw
pub trait SpriteEffect {
    /// Set a matrix-valued parameter
    fn set_matrix(&mut self, name: &str, value: &Mat4) -> BackendResult<()>;

    /// Activate the effect for the next draw
    fn apply(&mut self) -> BackendResult<()>;
}

impl<T: GraphicsDevice + ?Sized> GraphicsDevice for &mut T {
    fn viewport(&self) -> Viewport {
        (**self).viewport()
    }

    fn create_vertex_buffer(&mut self, declaration: &VertexDeclaration, capacity: usize) -> BackendResult<VertexBufferHandle> {
        (**self).create_vertex_buffer(declaration, capacity)
    }

    fn create_index_buffer(&mut self, element_size: IndexElementSize, capacity: usize) -> BackendResult<IndexBufferHandle> {
        (**self).create_index_buffer(element_size, capacity)
    }

    fn release_vertex_buffer(&mut self, buffer: VertexBufferHandle) {
        (**self).release_vertex_buffer(buffer);
    }

    fn release_index_buffer(&mut self, buffer: IndexBufferHandle) {
        (**self).release_index_buffer(buffer);
    }

    fn set_vertex_data(&mut self, buffer: VertexBufferHandle, data: &[u8]) -> BackendResult<()> {
        (**self).set_vertex_data(buffer, data)
    }

    fn set_index_data(&mut self, buffer: IndexBufferHandle, data: &[u8]) -> BackendResult<()> {
        (**self).set_index_data(buffer, data)
    }

    fn bind_buffers(&mut self, vertices: VertexBufferHandle, indices: IndexBufferHandle) -> BackendResult<()> {
        (**self).bind_buffers(vertices, indices)
    }

    fn rasterizer_state(&self) -> RasterizerState {
        (**self).rasterizer_state()
    }

    fn set_rasterizer_state(&mut self, state: RasterizerState) {
        (**self).set_rasterizer_state(state);
    }

    fn depth_stencil_state(&self) -> DepthStencilState {
        (**self).depth_stencil_state()
    }

    fn set_depth_stencil_state(&mut self, state: DepthStencilState) {
        (**self).set_depth_stencil_state(state);
    }

    fn blend_state(&self) -> BlendState {
        (**self).blend_state()
    }

    fn set_blend_state(&mut self, state: BlendState) {
        (**self).set_blend_state(state);
    }

    fn set_sampler_state(&mut self, slot: usize, sampler: SamplerState) {
        (**self).set_sampler_state(slot, sampler);
    }

    fn set_texture(&mut self, slot: usize, texture: &Texture2D) {
        (**self).set_texture(slot, texture);
    }

    fn draw_indexed_triangles(&mut self, start_index: u32, triangle_count: u32) -> BackendResult<()> {
        (**self).draw_indexed_triangles(start_index, triangle_count)
    }
}

impl<T: SpriteEffect + ?Sized> SpriteEffect for &mut T {
    fn set_matrix(&mut self, name: &str, value: &Mat4) -> BackendResult<()> {
        (**self).set_matrix(name, value)
    }

    fn apply(&mut self) -> BackendResult<()> {
        (**self).apply()
    }
}
