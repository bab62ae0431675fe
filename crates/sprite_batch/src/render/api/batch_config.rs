//! Sprite batch configuration
//!
//! Lets applications tune the batcher without hardcoding values in the
//! rendering system itself. Loadable from TOML or RON through [`Config`].

use serde::{Deserialize, Serialize};

use crate::config::{Config, ConfigError};
use crate::render::resources::SamplerState;

/// Default quad reservation made before the first frame
pub const DEFAULT_INITIAL_QUADS: usize = 2048;

/// Configuration for a [`SpriteBatch`](crate::render::SpriteBatch)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpriteBatchConfig {
    /// Quads the host arrays and GPU buffers are sized for up front
    pub initial_quads: usize,
    /// Sampler used when `begin` is not given one
    pub default_sampler: SamplerState,
    /// Name of the effect parameter receiving the view-projection matrix
    pub view_projection_parameter: String,
    /// Put the device's rasterizer/depth/blend state back after each flush
    pub restore_render_state: bool,
}

impl SpriteBatchConfig {
    /// Create the default configuration
    pub fn new() -> Self {
        Self {
            initial_quads: DEFAULT_INITIAL_QUADS,
            default_sampler: SamplerState::LinearClamp,
            view_projection_parameter: "view_projection".to_string(),
            restore_render_state: false,
        }
    }

    /// Set the initial quad reservation
    pub fn with_initial_quads(mut self, quads: usize) -> Self {
        self.initial_quads = quads;
        self
    }

    /// Set the fallback sampler
    pub fn with_default_sampler(mut self, sampler: SamplerState) -> Self {
        self.default_sampler = sampler;
        self
    }

    /// Set the view-projection parameter name
    pub fn with_view_projection_parameter(mut self, name: impl Into<String>) -> Self {
        self.view_projection_parameter = name.into();
        self
    }

    /// Enable or disable render state restoration after a flush
    pub fn with_restore_render_state(mut self, restore: bool) -> Self {
        self.restore_render_state = restore;
        self
    }

    /// Initial vertex array length
    pub const fn initial_vertices(&self) -> usize {
        self.initial_quads * 4
    }

    /// Initial index array length
    pub const fn initial_indices(&self) -> usize {
        self.initial_quads * 6
    }

    /// Check the values can actually drive a batch
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.initial_quads == 0 {
            return Err(ConfigError::Invalid("initial_quads must be greater than zero".to_string()));
        }

        // Every vertex of the reservation must be addressable by a 32-bit index
        let max_quads = (u32::MAX as usize / 4).saturating_add(1);
        if self.initial_quads > max_quads {
            return Err(ConfigError::Invalid(format!(
                "initial_quads {} exceeds the 32-bit index range ({max_quads} quads)",
                self.initial_quads
            )));
        }

        if self.view_projection_parameter.is_empty() {
            return Err(ConfigError::Invalid("view_projection_parameter must not be empty".to_string()));
        }

        Ok(())
    }
}

impl Default for SpriteBatchConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl Config for SpriteBatchConfig {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = SpriteBatchConfig::default();
        assert_eq!(config.initial_quads, 2048);
        assert_eq!(config.initial_vertices(), 8192);
        assert_eq!(config.initial_indices(), 12288);
        assert_eq!(config.default_sampler, SamplerState::LinearClamp);
        assert_eq!(config.view_projection_parameter, "view_projection");
        assert!(!config.restore_render_state);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_rejects_zero_capacity() {
        let config = SpriteBatchConfig::default().with_initial_quads(0);
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_rejects_capacity_beyond_index_range() {
        let config = SpriteBatchConfig::default().with_initial_quads(1 << 31);
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_rejects_empty_parameter_name() {
        let config = SpriteBatchConfig::default().with_view_projection_parameter("");
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config: SpriteBatchConfig = toml::from_str("initial_quads = 16\nrestore_render_state = true\n")
            .expect("valid toml");
        assert_eq!(config.initial_quads, 16);
        assert!(config.restore_render_state);
        assert_eq!(config.default_sampler, SamplerState::LinearClamp);
    }

    #[test]
    fn test_ron_roundtrip_through_file() {
        let path = std::env::temp_dir().join(format!("sprite_batch_config_{}.ron", std::process::id()));
        let config = SpriteBatchConfig::default()
            .with_initial_quads(64)
            .with_default_sampler(SamplerState::PointWrap);

        config.save_to_file(&path).expect("save config");
        let loaded = SpriteBatchConfig::load_from_file(&path).expect("load config");
        let _ = std::fs::remove_file(&path);

        assert_eq!(loaded, config);
    }
}
