//! Batch error types

use crate::config::ConfigError;
use crate::render::RenderError;

/// Result type for batch operations
pub type BatchResult<T> = Result<T, BatchError>;

/// Errors that can occur while batching sprites
#[derive(Debug, thiserror::Error)]
pub enum BatchError {
    /// `draw` called outside a `begin`/`end` pair
    #[error("Sprite batch not begun: call begin() before draw()")]
    NotBegun,

    /// `begin` called while a batch is already accumulating
    #[error("Sprite batch already begun: call end() before begin()")]
    AlreadyBegun,

    /// Doubling an array of zero length can never satisfy a request
    #[error("Cannot grow a zero-length array to {needed} elements")]
    ZeroCapacity {
        /// Requested length
        needed: usize,
    },

    /// Requested length is not representable or could not be allocated
    #[error("Capacity overflow: cannot grow from {current} to at least {needed} elements")]
    CapacityOverflow {
        /// Length before the failed growth
        current: usize,
        /// Requested length
        needed: usize,
    },

    /// A quad slot whose vertices cannot be addressed with 32-bit indices
    #[error("Quad slot {quad} exceeds the 32-bit index range")]
    IndexRangeExceeded {
        /// Offending quad slot
        quad: usize,
    },

    /// Device or effect failure
    #[error("Backend error: {0}")]
    Backend(#[from] RenderError),

    /// Unusable configuration
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}
