//! Core primitive types for sprite rendering
//!
//! The packed sprite vertex, its color channel type, and the vertex
//! declaration describing the bytes to the pipeline.

pub mod color;
pub mod vertex;
pub mod vertex_layout;

pub use color::Color;
pub use vertex::SpriteVertex;
pub use vertex_layout::{VertexDeclaration, VertexElement, VertexElementFormat, VertexElementUsage, VertexType};
