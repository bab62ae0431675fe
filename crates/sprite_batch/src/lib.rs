//! # Sprite Batch
//!
//! A minimal 2D sprite batcher layered over an abstract graphics device.
//!
//! ## Features
//!
//! - **Single Submission**: every `draw` between `begin` and `end` lands in one indexed draw call
//! - **Growable Buffers**: host arrays double on demand, GPU mirrors are recreated only on growth
//! - **Packed Vertices**: 24-byte position / texture coordinate / color layout with no padding
//! - **Headless Backend**: in-memory device for tooling and tests
//!
//! ## Quick Start
//!
//! ```rust
//! use sprite_batch::prelude::*;
//! use sprite_batch::render::backends::headless::{HeadlessDevice, HeadlessEffect};
//!
//! fn main() -> Result<(), BatchError> {
//!     let mut device = HeadlessDevice::new(Viewport::new(0, 0, 800, 600));
//!     let texture = device.create_texture(32, 32);
//!     let mut batch = SpriteBatch::new(
//!         device,
//!         HeadlessEffect::new(),
//!         texture,
//!         SpriteBatchConfig::default(),
//!     )?;
//!
//!     batch.begin(BeginParams::default())?;
//!     batch.draw(Vec2::new(100.0, 100.0))?;
//!     batch.draw(Vec2::new(200.0, 300.0))?;
//!     batch.end()?;
//!
//!     assert_eq!(batch.stats().draw_calls, 1);
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::similar_names)]

pub mod foundation;
pub mod config;
pub mod render;

/// Common imports for batch users
pub mod prelude {
    pub use crate::{
        config::{Config, ConfigError},
        foundation::math::{Vec2, Vec3, Mat4, Mat4Ext},
        render::{
            api::{BeginParams, GraphicsDevice, SpriteBatchConfig, SpriteEffect, Viewport},
            primitives::{Color, SpriteVertex, VertexDeclaration, VertexType},
            resources::{BlendState, DepthStencilState, RasterizerState, SamplerState, Texture2D},
            systems::batching::{BatchError, BatchResult, BatchStats, SpriteBatch},
            RenderError,
        },
    };
}
