//! Per-batch parameters captured by `begin`

use crate::foundation::math::Mat4;
use crate::render::resources::{SamplerState, Texture2D};

/// Optional overrides for the upcoming batch
///
/// Anything left `None` falls back to the batcher's defaults: identity view,
/// an orthographic projection over the current viewport (origin top-left,
/// depth [0, 1]), the configured sampler and the default texture.
#[derive(Debug, Clone, Default)]
pub struct BeginParams {
    /// Texture every sprite in the batch is drawn with
    pub texture: Option<Texture2D>,
    /// View matrix
    pub view: Option<Mat4>,
    /// Projection matrix
    pub projection: Option<Mat4>,
    /// Sampler for texture slot 0
    pub sampler: Option<SamplerState>,
}

impl BeginParams {
    /// Draw with a specific texture
    pub fn with_texture(mut self, texture: Texture2D) -> Self {
        self.texture = Some(texture);
        self
    }

    /// Use a specific view matrix
    pub fn with_view(mut self, view: Mat4) -> Self {
        self.view = Some(view);
        self
    }

    /// Use a specific projection matrix
    pub fn with_projection(mut self, projection: Mat4) -> Self {
        self.projection = Some(projection);
        self
    }

    /// Use a specific sampler
    pub fn with_sampler(mut self, sampler: SamplerState) -> Self {
        self.sampler = Some(sampler);
        self
    }
}
