//! Sprite vertex
//!
//! Position, texture coordinate and color, tightly packed in that order
//! (24 bytes). `#[repr(C)]` plus the `Pod` derive guarantee there is no
//! padding; the derive refuses to compile otherwise.

use std::fmt;
use std::hash::{Hash, Hasher};

use once_cell::sync::Lazy;

use super::color::Color;
use super::vertex_layout::{VertexDeclaration, VertexElementFormat, VertexElementUsage, VertexType};
use crate::foundation::math::{Vec2, Vec3};

static SPRITE_VERTEX_DECLARATION: Lazy<VertexDeclaration> = Lazy::new(|| {
    VertexDeclaration::packed(&[
        (VertexElementFormat::Vector3, VertexElementUsage::Position, 0),
        (VertexElementFormat::Vector2, VertexElementUsage::TextureCoordinate, 0),
        (VertexElementFormat::Color, VertexElementUsage::Color, 0),
    ])
});

/// Vertex consumed by the sprite pipeline
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, bytemuck::Pod, bytemuck::Zeroable)]
pub struct SpriteVertex {
    /// Position in world space (z is always 0 for sprites)
    pub position: [f32; 3],

    /// Texture coordinates
    pub tex_coord: [f32; 2],

    /// Tint color
    pub color: Color,
}

impl SpriteVertex {
    /// Create a new vertex
    pub const fn new(position: [f32; 3], tex_coord: [f32; 2], color: Color) -> Self {
        Self { position, tex_coord, color }
    }

    /// Create a vertex on the z = 0 plane
    pub fn from_xy(xy: Vec2, tex_coord: Vec2, color: Color) -> Self {
        Self::new([xy.x, xy.y, 0.0], [tex_coord.x, tex_coord.y], color)
    }

    /// Position as a vector
    pub fn position(&self) -> Vec3 {
        Vec3::from(self.position)
    }

    /// Texture coordinate as a vector
    pub fn tex_coord(&self) -> Vec2 {
        Vec2::from(self.tex_coord)
    }

    /// Float components as raw bits, position first
    fn component_bits(&self) -> [u32; 5] {
        let [x, y, z] = self.position;
        let [u, v] = self.tex_coord;
        [x.to_bits(), y.to_bits(), z.to_bits(), u.to_bits(), v.to_bits()]
    }
}

impl VertexType for SpriteVertex {
    fn vertex_declaration() -> &'static VertexDeclaration {
        &SPRITE_VERTEX_DECLARATION
    }
}

// Equality and hashing both work on bit patterns: -0.0 and 0.0 differ, NaN equals itself
impl PartialEq for SpriteVertex {
    fn eq(&self, other: &Self) -> bool {
        self.component_bits() == other.component_bits() && self.color == other.color
    }
}

impl Eq for SpriteVertex {}

impl Hash for SpriteVertex {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.component_bits().hash(state);
        self.color.hash(state);
    }
}

impl fmt::Display for SpriteVertex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [x, y, z] = self.position;
        let [u, v] = self.tex_coord;
        write!(
            f,
            "{{Position:{{X:{x} Y:{y} Z:{z}}} TextureCoordinate:{{X:{u} Y:{v}}} Color:{}}}",
            self.color
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::hash_map::DefaultHasher;
    use std::collections::HashSet;
    use std::mem::{offset_of, size_of};

    fn hash_of(vertex: &SpriteVertex) -> u64 {
        let mut hasher = DefaultHasher::new();
        vertex.hash(&mut hasher);
        hasher.finish()
    }

    #[test]
    fn test_layout_is_tightly_packed() {
        assert_eq!(size_of::<SpriteVertex>(), 24);
        assert_eq!(offset_of!(SpriteVertex, position), 0);
        assert_eq!(offset_of!(SpriteVertex, tex_coord), 12);
        assert_eq!(offset_of!(SpriteVertex, color), 20);
    }

    #[test]
    fn test_declaration_matches_memory_layout() {
        let declaration = SpriteVertex::vertex_declaration();
        assert_eq!(declaration.stride() as usize, size_of::<SpriteVertex>());

        let position = declaration.find(VertexElementUsage::Position, 0).map(|e| (e.offset, e.format));
        let tex_coord = declaration.find(VertexElementUsage::TextureCoordinate, 0).map(|e| (e.offset, e.format));
        let color = declaration.find(VertexElementUsage::Color, 0).map(|e| (e.offset, e.format));

        assert_eq!(position, Some((offset_of!(SpriteVertex, position) as u32, VertexElementFormat::Vector3)));
        assert_eq!(tex_coord, Some((offset_of!(SpriteVertex, tex_coord) as u32, VertexElementFormat::Vector2)));
        assert_eq!(color, Some((offset_of!(SpriteVertex, color) as u32, VertexElementFormat::Color)));
    }

    #[test]
    fn test_declaration_is_shared() {
        assert!(std::ptr::eq(SpriteVertex::vertex_declaration(), SpriteVertex::vertex_declaration()));
    }

    #[test]
    fn test_equality_and_hash() {
        let a = SpriteVertex::new([1.0, 2.0, 0.0], [0.0, 1.0], Color::WHITE);
        let b = SpriteVertex::new([1.0, 2.0, 0.0], [0.0, 1.0], Color::WHITE);
        let c = SpriteVertex::new([1.0, 2.0, 0.0], [0.0, 1.0], Color::BLACK);

        assert_eq!(a, b);
        assert_eq!(hash_of(&a), hash_of(&b));
        assert_ne!(a, c);
    }

    #[test]
    fn test_equality_agrees_with_hash_for_signed_zero() {
        let positive = SpriteVertex::from_xy(Vec2::new(0.0, 5.0), Vec2::new(0.0, 0.0), Color::WHITE);
        let negative = SpriteVertex::from_xy(Vec2::new(-0.0, 5.0), Vec2::new(0.0, 0.0), Color::WHITE);

        assert_ne!(positive, negative);
        let set: HashSet<SpriteVertex> = [positive, negative, positive].into_iter().collect();
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn test_nan_vertex_equals_itself() {
        let vertex = SpriteVertex::new([f32::NAN, 1.0, 0.0], [0.0, 0.0], Color::WHITE);
        let copy = vertex;

        assert_eq!(vertex, copy);
        assert_eq!(hash_of(&vertex), hash_of(&copy));
    }

    #[test]
    fn test_vector_accessors() {
        let vertex = SpriteVertex::from_xy(Vec2::new(3.0, 4.0), Vec2::new(0.25, 0.75), Color::WHITE);

        assert_eq!(vertex.position(), Vec3::new(3.0, 4.0, 0.0));
        assert_eq!(vertex.tex_coord(), Vec2::new(0.25, 0.75));
    }

    #[test]
    fn test_bytes_follow_field_order() {
        let vertex = SpriteVertex::new([1.0, 2.0, 3.0], [4.0, 5.0], Color::rgba(6, 7, 8, 9));
        let bytes = bytemuck::bytes_of(&vertex);

        assert_eq!(&bytes[0..4], &1.0f32.to_ne_bytes());
        assert_eq!(&bytes[16..20], &5.0f32.to_ne_bytes());
        assert_eq!(&bytes[20..24], &[6, 7, 8, 9]);
    }

    #[test]
    fn test_display() {
        let vertex = SpriteVertex::from_xy(Vec2::new(1.5, 2.0), Vec2::new(0.0, 1.0), Color::WHITE);
        assert_eq!(
            vertex.to_string(),
            "{Position:{X:1.5 Y:2 Z:0} TextureCoordinate:{X:0 Y:1} Color:{R:255 G:255 B:255 A:255}}"
        );
    }
}
