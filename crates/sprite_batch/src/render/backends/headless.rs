//! Headless graphics backend
//!
//! Implements the device and effect contracts in host memory. Buffers keep
//! their bytes, handles are tracked until released, and every state change or
//! draw is recorded as a [`DeviceCommand`]. Useful for tooling that has no GPU
//! and for verifying exactly what a batch submitted.

use std::collections::HashMap;

use crate::foundation::math::Mat4;
use crate::render::api::{
    BackendResult, GraphicsDevice, IndexBufferHandle, IndexElementSize, SpriteEffect, VertexBufferHandle, Viewport,
};
use crate::render::primitives::VertexDeclaration;
use crate::render::resources::{
    BlendState, DepthStencilState, RasterizerState, RenderStateSnapshot, SamplerState, Texture2D, TextureHandle,
};
use crate::render::RenderError;

/// Texture slots the headless device exposes
pub const MAX_TEXTURE_SLOTS: usize = 16;

/// Commands kept by a new [`HeadlessDevice`] before the oldest are discarded
pub const DEFAULT_COMMAND_LIMIT: usize = 1024;

/// Device operation recorded by [`HeadlessDevice`]
#[derive(Debug, Clone, PartialEq)]
pub enum DeviceCommand {
    /// Vertex buffer created
    CreateVertexBuffer {
        /// New handle
        handle: VertexBufferHandle,
        /// Capacity in vertices
        capacity: usize,
    },
    /// Index buffer created
    CreateIndexBuffer {
        /// New handle
        handle: IndexBufferHandle,
        /// Capacity in indices
        capacity: usize,
    },
    /// Vertex buffer released
    ReleaseVertexBuffer(VertexBufferHandle),
    /// Index buffer released
    ReleaseIndexBuffer(IndexBufferHandle),
    /// Bytes written to a vertex buffer
    SetVertexData {
        /// Target buffer
        handle: VertexBufferHandle,
        /// Bytes written
        bytes: usize,
    },
    /// Bytes written to an index buffer
    SetIndexData {
        /// Target buffer
        handle: IndexBufferHandle,
        /// Bytes written
        bytes: usize,
    },
    /// Buffers bound for drawing
    BindBuffers {
        /// Vertex buffer
        vertices: VertexBufferHandle,
        /// Index buffer
        indices: IndexBufferHandle,
    },
    /// Indexed draw issued
    Draw(DrawRecord),
}

/// Everything that was bound when a draw was issued
#[derive(Debug, Clone, PartialEq)]
pub struct DrawRecord {
    /// First index read
    pub start_index: u32,
    /// Triangles drawn
    pub triangle_count: u32,
    /// Bound vertex buffer
    pub vertices: VertexBufferHandle,
    /// Bound index buffer
    pub indices: IndexBufferHandle,
    /// Fixed-function state
    pub state: RenderStateSnapshot,
    /// Sampler in slot 0
    pub sampler: SamplerState,
    /// Texture in slot 0
    pub texture: Option<Texture2D>,
}

#[derive(Debug, Clone)]
struct HeadlessBuffer {
    element_size: usize,
    capacity: usize,
    data: Vec<u8>,
}

impl HeadlessBuffer {
    fn new(element_size: usize, capacity: usize) -> BackendResult<Self> {
        let bytes = element_size
            .checked_mul(capacity)
            .ok_or_else(|| RenderError::BufferCreation(format!("{capacity} elements of {element_size} bytes overflow")))?;
        Ok(Self { element_size, capacity, data: vec![0; bytes] })
    }

    fn write(&mut self, data: &[u8]) -> BackendResult<()> {
        if data.len() > self.data.len() {
            return Err(RenderError::Upload(format!(
                "{} bytes exceed buffer capacity of {} bytes",
                data.len(),
                self.data.len()
            )));
        }
        if data.len() % self.element_size != 0 {
            return Err(RenderError::Upload(format!(
                "{} bytes is not a multiple of the {}-byte element size",
                data.len(),
                self.element_size
            )));
        }
        self.data[..data.len()].copy_from_slice(data);
        Ok(())
    }
}

/// In-memory graphics device
#[derive(Debug)]
pub struct HeadlessDevice {
    viewport: Viewport,
    next_handle: u64,
    vertex_buffers: HashMap<VertexBufferHandle, HeadlessBuffer>,
    index_buffers: HashMap<IndexBufferHandle, HeadlessBuffer>,
    bound: Option<(VertexBufferHandle, IndexBufferHandle)>,
    rasterizer: RasterizerState,
    depth_stencil: DepthStencilState,
    blend: BlendState,
    samplers: [SamplerState; MAX_TEXTURE_SLOTS],
    textures: [Option<Texture2D>; MAX_TEXTURE_SLOTS],
    commands: Vec<DeviceCommand>,
    command_limit: usize,
    dropped_commands: usize,
    fail_buffer_creation: bool,
}

impl HeadlessDevice {
    /// Create a device rendering into `viewport`
    pub fn new(viewport: Viewport) -> Self {
        Self {
            viewport,
            next_handle: 1,
            vertex_buffers: HashMap::new(),
            index_buffers: HashMap::new(),
            bound: None,
            rasterizer: RasterizerState::default(),
            depth_stencil: DepthStencilState::default(),
            blend: BlendState::default(),
            samplers: [SamplerState::default(); MAX_TEXTURE_SLOTS],
            textures: [None; MAX_TEXTURE_SLOTS],
            commands: Vec::new(),
            command_limit: DEFAULT_COMMAND_LIMIT,
            dropped_commands: 0,
            fail_buffer_creation: false,
        }
    }

    /// Keep at most `limit` recorded commands
    ///
    /// When the log is full the older half is discarded, so a long-running
    /// host never accumulates more than `limit` entries. A limit of zero
    /// disables recording.
    pub fn with_command_limit(mut self, limit: usize) -> Self {
        self.command_limit = limit;
        self
    }

    /// Commands discarded to stay within the command limit
    pub const fn dropped_commands(&self) -> usize {
        self.dropped_commands
    }

    fn allocate_handle(&mut self) -> u64 {
        let handle = self.next_handle;
        self.next_handle += 1;
        handle
    }

    /// Register a texture of the given size
    pub fn create_texture(&mut self, width: u32, height: u32) -> Texture2D {
        let handle = TextureHandle(self.allocate_handle());
        Texture2D::new(handle, width, height)
    }

    /// Change the viewport
    pub fn set_viewport(&mut self, viewport: Viewport) {
        self.viewport = viewport;
    }

    /// Make subsequent buffer creation fail, to simulate device exhaustion
    pub fn set_fail_buffer_creation(&mut self, fail: bool) {
        self.fail_buffer_creation = fail;
    }

    /// Recorded commands, oldest first
    ///
    /// Only the most recent entries are kept; see [`with_command_limit`](Self::with_command_limit).
    pub fn commands(&self) -> &[DeviceCommand] {
        &self.commands
    }

    /// Forget recorded commands
    pub fn clear_commands(&mut self) {
        self.commands.clear();
    }

    /// Recorded draw calls, oldest first
    pub fn draws(&self) -> impl Iterator<Item = &DrawRecord> + '_ {
        self.commands.iter().filter_map(|command| match command {
            DeviceCommand::Draw(record) => Some(record),
            _ => None,
        })
    }

    /// Number of vertex buffers not yet released
    pub fn live_vertex_buffers(&self) -> usize {
        self.vertex_buffers.len()
    }

    /// Number of index buffers not yet released
    pub fn live_index_buffers(&self) -> usize {
        self.index_buffers.len()
    }

    /// Capacity of a live vertex buffer, in vertices
    pub fn vertex_buffer_capacity(&self, handle: VertexBufferHandle) -> Option<usize> {
        self.vertex_buffers.get(&handle).map(|buffer| buffer.capacity)
    }

    /// Capacity of a live index buffer, in indices
    pub fn index_buffer_capacity(&self, handle: IndexBufferHandle) -> Option<usize> {
        self.index_buffers.get(&handle).map(|buffer| buffer.capacity)
    }

    /// Contents of a live vertex buffer, decoded as `T`
    pub fn vertex_data<T: bytemuck::Pod>(&self, handle: VertexBufferHandle) -> Option<Vec<T>> {
        self.vertex_buffers
            .get(&handle)
            .map(|buffer| bytemuck::pod_collect_to_vec(&buffer.data))
    }

    /// Contents of a live 32-bit index buffer
    pub fn index_data(&self, handle: IndexBufferHandle) -> Option<Vec<u32>> {
        self.index_buffers
            .get(&handle)
            .map(|buffer| bytemuck::pod_collect_to_vec(&buffer.data))
    }

    /// Currently bound buffers
    pub const fn bound_buffers(&self) -> Option<(VertexBufferHandle, IndexBufferHandle)> {
        self.bound
    }

    /// Sampler in a slot
    pub fn sampler(&self, slot: usize) -> Option<SamplerState> {
        self.samplers.get(slot).copied()
    }

    /// Texture in a slot
    pub fn texture(&self, slot: usize) -> Option<Texture2D> {
        self.textures.get(slot).copied().flatten()
    }

    fn record(&mut self, command: DeviceCommand) {
        log::trace!("headless: {:?}", command);
        if self.command_limit == 0 {
            self.dropped_commands += 1;
            return;
        }
        if self.commands.len() >= self.command_limit {
            let discard = (self.commands.len() / 2).max(1);
            self.commands.drain(..discard);
            self.dropped_commands += discard;
        }
        self.commands.push(command);
    }
}

impl GraphicsDevice for HeadlessDevice {
    fn viewport(&self) -> Viewport {
        self.viewport
    }

    fn create_vertex_buffer(&mut self, declaration: &VertexDeclaration, capacity: usize) -> BackendResult<VertexBufferHandle> {
        if self.fail_buffer_creation {
            return Err(RenderError::BufferCreation("vertex buffer creation disabled".to_string()));
        }
        if declaration.stride() == 0 {
            return Err(RenderError::BufferCreation("vertex declaration has zero stride".to_string()));
        }

        let buffer = HeadlessBuffer::new(declaration.stride() as usize, capacity)?;
        let handle = VertexBufferHandle(self.allocate_handle());
        self.vertex_buffers.insert(handle, buffer);
        self.record(DeviceCommand::CreateVertexBuffer { handle, capacity });
        Ok(handle)
    }

    fn create_index_buffer(&mut self, element_size: IndexElementSize, capacity: usize) -> BackendResult<IndexBufferHandle> {
        if self.fail_buffer_creation {
            return Err(RenderError::BufferCreation("index buffer creation disabled".to_string()));
        }

        let buffer = HeadlessBuffer::new(element_size.size_in_bytes(), capacity)?;
        let handle = IndexBufferHandle(self.allocate_handle());
        self.index_buffers.insert(handle, buffer);
        self.record(DeviceCommand::CreateIndexBuffer { handle, capacity });
        Ok(handle)
    }

    fn release_vertex_buffer(&mut self, buffer: VertexBufferHandle) {
        if self.vertex_buffers.remove(&buffer).is_none() {
            log::warn!("headless: release of unknown vertex buffer {:?}", buffer);
            return;
        }
        if self.bound.is_some_and(|(vertices, _)| vertices == buffer) {
            self.bound = None;
        }
        self.record(DeviceCommand::ReleaseVertexBuffer(buffer));
    }

    fn release_index_buffer(&mut self, buffer: IndexBufferHandle) {
        if self.index_buffers.remove(&buffer).is_none() {
            log::warn!("headless: release of unknown index buffer {:?}", buffer);
            return;
        }
        if self.bound.is_some_and(|(_, indices)| indices == buffer) {
            self.bound = None;
        }
        self.record(DeviceCommand::ReleaseIndexBuffer(buffer));
    }

    fn set_vertex_data(&mut self, buffer: VertexBufferHandle, data: &[u8]) -> BackendResult<()> {
        self.vertex_buffers
            .get_mut(&buffer)
            .ok_or_else(|| RenderError::InvalidHandle(format!("{buffer:?}")))?
            .write(data)?;
        self.record(DeviceCommand::SetVertexData { handle: buffer, bytes: data.len() });
        Ok(())
    }

    fn set_index_data(&mut self, buffer: IndexBufferHandle, data: &[u8]) -> BackendResult<()> {
        self.index_buffers
            .get_mut(&buffer)
            .ok_or_else(|| RenderError::InvalidHandle(format!("{buffer:?}")))?
            .write(data)?;
        self.record(DeviceCommand::SetIndexData { handle: buffer, bytes: data.len() });
        Ok(())
    }

    fn bind_buffers(&mut self, vertices: VertexBufferHandle, indices: IndexBufferHandle) -> BackendResult<()> {
        if !self.vertex_buffers.contains_key(&vertices) {
            return Err(RenderError::InvalidHandle(format!("{vertices:?}")));
        }
        if !self.index_buffers.contains_key(&indices) {
            return Err(RenderError::InvalidHandle(format!("{indices:?}")));
        }
        self.bound = Some((vertices, indices));
        self.record(DeviceCommand::BindBuffers { vertices, indices });
        Ok(())
    }

    fn rasterizer_state(&self) -> RasterizerState {
        self.rasterizer
    }

    fn set_rasterizer_state(&mut self, state: RasterizerState) {
        self.rasterizer = state;
    }

    fn depth_stencil_state(&self) -> DepthStencilState {
        self.depth_stencil
    }

    fn set_depth_stencil_state(&mut self, state: DepthStencilState) {
        self.depth_stencil = state;
    }

    fn blend_state(&self) -> BlendState {
        self.blend
    }

    fn set_blend_state(&mut self, state: BlendState) {
        self.blend = state;
    }

    fn set_sampler_state(&mut self, slot: usize, sampler: SamplerState) {
        match self.samplers.get_mut(slot) {
            Some(current) => *current = sampler,
            None => log::warn!("headless: sampler slot {} out of range", slot),
        }
    }

    fn set_texture(&mut self, slot: usize, texture: &Texture2D) {
        match self.textures.get_mut(slot) {
            Some(current) => *current = Some(*texture),
            None => log::warn!("headless: texture slot {} out of range", slot),
        }
    }

    fn draw_indexed_triangles(&mut self, start_index: u32, triangle_count: u32) -> BackendResult<()> {
        let (vertices, indices) = self
            .bound
            .ok_or_else(|| RenderError::Draw("no buffers bound".to_string()))?;

        let index_capacity = self.index_buffers.get(&indices).map_or(0, |buffer| buffer.capacity);
        let end = u64::from(start_index) + u64::from(triangle_count) * 3;
        if end > index_capacity as u64 {
            return Err(RenderError::Draw(format!(
                "indices {start_index}..{end} exceed index buffer capacity {index_capacity}"
            )));
        }

        self.record(DeviceCommand::Draw(DrawRecord {
            start_index,
            triangle_count,
            vertices,
            indices,
            state: RenderStateSnapshot {
                rasterizer: self.rasterizer,
                depth_stencil: self.depth_stencil,
                blend: self.blend,
            },
            sampler: self.samplers[0],
            texture: self.textures[0],
        }));
        Ok(())
    }
}

/// In-memory effect that stores matrix parameters and counts applications
#[derive(Debug, Clone, Default)]
pub struct HeadlessEffect {
    declared: Option<Vec<String>>,
    matrices: HashMap<String, Mat4>,
    apply_count: usize,
}

impl HeadlessEffect {
    /// Effect accepting any parameter name
    pub fn new() -> Self {
        Self::default()
    }

    /// Effect that rejects parameters not in `names`
    pub fn with_parameters(names: &[&str]) -> Self {
        Self {
            declared: Some(names.iter().map(|name| (*name).to_string()).collect()),
            ..Self::default()
        }
    }

    /// Last value set for a matrix parameter
    pub fn matrix(&self, name: &str) -> Option<&Mat4> {
        self.matrices.get(name)
    }

    /// Times `apply` was called
    pub const fn apply_count(&self) -> usize {
        self.apply_count
    }
}

impl SpriteEffect for HeadlessEffect {
    fn set_matrix(&mut self, name: &str, value: &Mat4) -> BackendResult<()> {
        if let Some(declared) = &self.declared {
            if !declared.iter().any(|declared| declared == name) {
                return Err(RenderError::Effect(format!("unknown parameter '{name}'")));
            }
        }
        self.matrices.insert(name.to_string(), *value);
        Ok(())
    }

    fn apply(&mut self) -> BackendResult<()> {
        self.apply_count += 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::primitives::{SpriteVertex, VertexType};

    fn device() -> HeadlessDevice {
        HeadlessDevice::new(Viewport::new(0, 0, 640, 480))
    }

    #[test]
    fn test_buffer_lifecycle() {
        let mut device = device();
        let vertices = device.create_vertex_buffer(SpriteVertex::vertex_declaration(), 8).unwrap();
        let indices = device.create_index_buffer(IndexElementSize::ThirtyTwoBits, 12).unwrap();

        assert_eq!(device.live_vertex_buffers(), 1);
        assert_eq!(device.vertex_buffer_capacity(vertices), Some(8));
        assert_eq!(device.index_buffer_capacity(indices), Some(12));

        device.release_vertex_buffer(vertices);
        device.release_index_buffer(indices);
        assert_eq!(device.live_vertex_buffers(), 0);
        assert_eq!(device.live_index_buffers(), 0);
        assert!(matches!(device.set_vertex_data(vertices, &[]), Err(RenderError::InvalidHandle(_))));
    }

    #[test]
    fn test_upload_beyond_capacity_fails() {
        let mut device = device();
        let indices = device.create_index_buffer(IndexElementSize::ThirtyTwoBits, 2).unwrap();

        assert!(device.set_index_data(indices, bytemuck::cast_slice(&[1u32, 2])).is_ok());
        assert!(matches!(
            device.set_index_data(indices, bytemuck::cast_slice(&[1u32, 2, 3])),
            Err(RenderError::Upload(_))
        ));
        assert!(matches!(device.set_index_data(indices, &[0u8; 3]), Err(RenderError::Upload(_))));
        assert_eq!(device.index_data(indices), Some(vec![1, 2]));
    }

    #[test]
    fn test_draw_requires_bound_buffers() {
        let mut device = device();
        assert!(matches!(device.draw_indexed_triangles(0, 1), Err(RenderError::Draw(_))));

        let vertices = device.create_vertex_buffer(SpriteVertex::vertex_declaration(), 4).unwrap();
        let indices = device.create_index_buffer(IndexElementSize::ThirtyTwoBits, 6).unwrap();
        device.bind_buffers(vertices, indices).unwrap();

        assert!(device.draw_indexed_triangles(0, 2).is_ok());
        assert!(matches!(device.draw_indexed_triangles(0, 3), Err(RenderError::Draw(_))));
        assert_eq!(device.draws().count(), 1);

        device.release_index_buffer(indices);
        assert_eq!(device.bound_buffers(), None);
    }

    #[test]
    fn test_forced_creation_failure() {
        let mut device = device();
        device.set_fail_buffer_creation(true);
        assert!(matches!(
            device.create_index_buffer(IndexElementSize::SixteenBits, 6),
            Err(RenderError::BufferCreation(_))
        ));
        assert!(device.commands().is_empty());
    }

    #[test]
    fn test_command_log_is_bounded() {
        let mut device = device().with_command_limit(4);
        let mut last = None;
        for _ in 0..10 {
            last = Some(device.create_vertex_buffer(SpriteVertex::vertex_declaration(), 4).unwrap());
        }

        let kept = device.commands().len();
        assert!(kept <= 4);
        assert_eq!(device.dropped_commands() + kept, 10);
        assert!(matches!(
            device.commands().last(),
            Some(DeviceCommand::CreateVertexBuffer { handle, .. }) if Some(*handle) == last
        ));
        assert_eq!(device.live_vertex_buffers(), 10);
    }

    #[test]
    fn test_zero_command_limit_records_nothing() {
        let mut device = device().with_command_limit(0);
        device.create_index_buffer(IndexElementSize::ThirtyTwoBits, 6).unwrap();

        assert!(device.commands().is_empty());
        assert_eq!(device.dropped_commands(), 1);
    }

    #[test]
    fn test_effect_parameter_declarations() {
        let mut effect = HeadlessEffect::with_parameters(&["view_projection"]);
        let identity = Mat4::identity();

        assert!(effect.set_matrix("view_projection", &identity).is_ok());
        assert!(matches!(effect.set_matrix("world", &identity), Err(RenderError::Effect(_))));
        assert_eq!(effect.matrix("view_projection"), Some(&identity));
        assert!(effect.matrix("world").is_none());

        effect.apply().unwrap();
        assert_eq!(effect.apply_count(), 1);
    }
}
