//! Vertex declarations
//!
//! A declaration is the ordered list of elements (byte offset, format,
//! semantic usage, usage index) a pipeline needs to read packed vertex
//! bytes. Offsets are assigned sequentially from each format's byte width,
//! so a declaration never contains alignment padding.

use std::fmt;

/// Storage format of a single vertex element
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VertexElementFormat {
    /// One 32-bit float
    Single,
    /// Two 32-bit floats
    Vector2,
    /// Three 32-bit floats
    Vector3,
    /// Four 32-bit floats
    Vector4,
    /// Four unsigned bytes, normalized to 0..1 by the pipeline
    Color,
}

impl VertexElementFormat {
    /// Width of the element in bytes
    pub const fn size_in_bytes(self) -> u32 {
        match self {
            Self::Single | Self::Color => 4,
            Self::Vector2 => 8,
            Self::Vector3 => 12,
            Self::Vector4 => 16,
        }
    }
}

/// Semantic meaning of a vertex element
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VertexElementUsage {
    /// Vertex position
    Position,
    /// Texture coordinate
    TextureCoordinate,
    /// Vertex color
    Color,
    /// Surface normal
    Normal,
}

/// One element of a vertex declaration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct VertexElement {
    /// Byte offset from the start of the vertex
    pub offset: u32,
    /// Storage format
    pub format: VertexElementFormat,
    /// Semantic usage
    pub usage: VertexElementUsage,
    /// Distinguishes repeated usages (e.g. a second texture coordinate set)
    pub usage_index: u32,
}

/// Ordered element list plus the resulting vertex stride
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct VertexDeclaration {
    elements: Vec<VertexElement>,
    stride: u32,
}

impl VertexDeclaration {
    /// Build a declaration by packing `(format, usage, usage_index)` entries back to back
    pub fn packed(fields: &[(VertexElementFormat, VertexElementUsage, u32)]) -> Self {
        let mut offset = 0;
        let elements = fields
            .iter()
            .map(|&(format, usage, usage_index)| {
                let element = VertexElement { offset, format, usage, usage_index };
                offset += format.size_in_bytes();
                element
            })
            .collect();

        Self { elements, stride: offset }
    }

    /// Elements in declaration order
    pub fn elements(&self) -> &[VertexElement] {
        &self.elements
    }

    /// Bytes between consecutive vertices
    pub const fn stride(&self) -> u32 {
        self.stride
    }

    /// Find the element for a usage/usage index pair
    pub fn find(&self, usage: VertexElementUsage, usage_index: u32) -> Option<&VertexElement> {
        self.elements
            .iter()
            .find(|element| element.usage == usage && element.usage_index == usage_index)
    }
}

impl fmt::Display for VertexDeclaration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "VertexDeclaration(stride={}", self.stride)?;
        for element in &self.elements {
            write!(
                f,
                ", {:?}{}@{}:{:?}",
                element.usage, element.usage_index, element.offset, element.format
            )?;
        }
        write!(f, ")")
    }
}

/// Types that can be uploaded as vertices
///
/// The declaration is computed once per type and shared by every instance.
pub trait VertexType: bytemuck::Pod {
    /// Declaration describing this type's byte layout
    fn vertex_declaration() -> &'static VertexDeclaration;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_packed_offsets_are_sequential() {
        let declaration = VertexDeclaration::packed(&[
            (VertexElementFormat::Vector3, VertexElementUsage::Position, 0),
            (VertexElementFormat::Vector2, VertexElementUsage::TextureCoordinate, 0),
            (VertexElementFormat::Color, VertexElementUsage::Color, 0),
        ]);

        let offsets: Vec<u32> = declaration.elements().iter().map(|e| e.offset).collect();
        assert_eq!(offsets, vec![0, 12, 20]);
        assert_eq!(declaration.stride(), 24);
    }

    #[test]
    fn test_lit_vertex_layout() {
        let declaration = VertexDeclaration::packed(&[
            (VertexElementFormat::Vector4, VertexElementUsage::Position, 0),
            (VertexElementFormat::Vector3, VertexElementUsage::Normal, 0),
            (VertexElementFormat::Single, VertexElementUsage::TextureCoordinate, 0),
        ]);

        let normal = declaration.find(VertexElementUsage::Normal, 0);
        assert_eq!(normal.map(|e| (e.offset, e.format)), Some((16, VertexElementFormat::Vector3)));
        let weight = declaration.find(VertexElementUsage::TextureCoordinate, 0);
        assert_eq!(weight.map(|e| e.offset), Some(28));
        assert_eq!(declaration.stride(), 32);
    }

    #[test]
    fn test_find_by_usage() {
        let declaration = VertexDeclaration::packed(&[
            (VertexElementFormat::Vector2, VertexElementUsage::TextureCoordinate, 0),
            (VertexElementFormat::Vector2, VertexElementUsage::TextureCoordinate, 1),
        ]);

        let second = declaration.find(VertexElementUsage::TextureCoordinate, 1);
        assert_eq!(second.map(|e| e.offset), Some(8));
        assert!(declaration.find(VertexElementUsage::Color, 0).is_none());
    }

    #[test]
    fn test_empty_declaration() {
        let declaration = VertexDeclaration::packed(&[]);
        assert!(declaration.elements().is_empty());
        assert_eq!(declaration.stride(), 0);
    }

    #[test]
    fn test_display() {
        let declaration = VertexDeclaration::packed(&[
            (VertexElementFormat::Vector3, VertexElementUsage::Position, 0),
        ]);
        assert_eq!(declaration.to_string(), "VertexDeclaration(stride=12, Position0@0:Vector3)");
    }
}
