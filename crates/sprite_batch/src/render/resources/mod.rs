//! GPU-side resources consumed by the batcher
//!
//! Textures are plain handles with dimensions; render states are
//! fixed-function presets the device maps onto its own pipeline objects.

pub mod states;
pub mod texture;

pub use states::{BlendState, DepthStencilState, RasterizerState, RenderStateSnapshot, SamplerState};
pub use texture::{Texture2D, TextureHandle};
