//! # Rendering System
//!
//! Sprite batching layered over an abstract graphics device.
//!
//! ## Architecture
//!
//! - **Primitives**: the packed sprite vertex, its color type and vertex declaration
//! - **Resources**: textures and fixed-function render states
//! - **API**: collaborator traits the host implements (device, effect) and batch configuration
//! - **Systems**: the batch accumulator and its growable geometry
//! - **Backends**: concrete device implementations (currently headless)

pub mod api;
pub mod primitives;
pub mod resources;
pub mod systems;

/// Graphics backend implementations
pub mod backends;

pub use api::{
    BackendResult, BeginParams, GraphicsDevice, IndexBufferHandle, IndexElementSize,
    SpriteBatchConfig, SpriteEffect, VertexBufferHandle, Viewport,
};
pub use primitives::{Color, SpriteVertex, VertexDeclaration, VertexElement, VertexElementFormat, VertexElementUsage, VertexType};
pub use resources::{BlendState, DepthStencilState, RasterizerState, SamplerState, Texture2D, TextureHandle};
pub use systems::batching::{BatchError, BatchResult, BatchStats, SpriteBatch};

use thiserror::Error;

/// Errors reported by a graphics device or effect
///
/// All of these are fatal for the current frame; nothing is retried.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RenderError {
    /// Device refused to create a buffer
    #[error("Buffer creation failed: {0}")]
    BufferCreation(String),

    /// Data upload into a buffer failed
    #[error("Buffer upload failed: {0}")]
    Upload(String),

    /// A handle that was never created or has already been released
    #[error("Invalid resource handle: {0}")]
    InvalidHandle(String),

    /// Draw call rejected by the device
    #[error("Draw failed: {0}")]
    Draw(String),

    /// Effect parameter or technique problem
    #[error("Effect error: {0}")]
    Effect(String),
}
