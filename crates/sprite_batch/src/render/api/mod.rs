//! Public rendering API
//!
//! This module contains the contracts the host provides (graphics device,
//! effect) and the configuration types users hand to the batcher.

pub mod graphics_device;
pub mod batch_config;
pub mod begin_params;

// Re-export commonly used types
pub use graphics_device::{
    BackendResult, GraphicsDevice, IndexBufferHandle, IndexElementSize, SpriteEffect,
    VertexBufferHandle, Viewport,
};
pub use batch_config::SpriteBatchConfig;
pub use begin_params::BeginParams;
