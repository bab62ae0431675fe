//! Sprite batching system
//!
//! Accumulates textured quads into growable host arrays and submits them
//! with one indexed draw call per flush.

pub mod error;
pub mod geometry;
pub mod index_pattern;
pub mod sprite_batch;
pub mod stats;


// Re-export all batching types
pub use error::{BatchError, BatchResult};
pub use geometry::{ensure_size_or_double, GeometryBuffers, QuadGrowth, INDICES_PER_QUAD, VERTICES_PER_QUAD};
pub use index_pattern::{quad_indices, QuadIndexGenerator};
pub use sprite_batch::{default_projection, SpriteBatch};
pub use stats::BatchStats;
