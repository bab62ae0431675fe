//! Fixed-function render state presets

use serde::{Deserialize, Serialize};

/// Face culling preset
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum RasterizerState {
    /// No culling
    CullNone,
    /// Cull clockwise-wound faces
    CullClockwise,
    /// Cull counter-clockwise-wound faces
    #[default]
    CullCounterClockwise,
}

/// Depth/stencil preset
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum DepthStencilState {
    /// Depth test and write disabled
    None,
    /// Depth test and write enabled
    #[default]
    Default,
    /// Depth test enabled, write disabled
    DepthRead,
}

/// Color blending preset
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum BlendState {
    /// Source replaces destination
    #[default]
    Opaque,
    /// Premultiplied alpha blending
    AlphaBlend,
    /// Source added to destination
    Additive,
    /// Straight (non-premultiplied) alpha blending
    NonPremultiplied,
}

/// Texture sampling preset
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum SamplerState {
    /// Linear filtering, clamped addressing
    #[default]
    LinearClamp,
    /// Linear filtering, wrapped addressing
    LinearWrap,
    /// Nearest filtering, clamped addressing
    PointClamp,
    /// Nearest filtering, wrapped addressing
    PointWrap,
    /// Anisotropic filtering, clamped addressing
    AnisotropicClamp,
}

/// Device state captured before a flush so it can be put back afterwards
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderStateSnapshot {
    /// Rasterizer preset in effect
    pub rasterizer: RasterizerState,
    /// Depth/stencil preset in effect
    pub depth_stencil: DepthStencilState,
    /// Blend preset in effect
    pub blend: BlendState,
}

impl RenderStateSnapshot {
    /// State a sprite flush sets: back faces culled, no depth, alpha blending
    pub const SPRITE: Self = Self {
        rasterizer: RasterizerState::CullCounterClockwise,
        depth_stencil: DepthStencilState::None,
        blend: BlendState::AlphaBlend,
    };
}
