//! Packed 8-bit RGBA color

use std::fmt;

/// Four 8-bit channels, stored in R, G, B, A byte order
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Color {
    /// Red channel
    pub r: u8,
    /// Green channel
    pub g: u8,
    /// Blue channel
    pub b: u8,
    /// Alpha channel
    pub a: u8,
}

impl Color {
    /// Opaque white, the default sprite tint
    pub const WHITE: Self = Self::rgba(255, 255, 255, 255);
    /// Opaque black
    pub const BLACK: Self = Self::rgba(0, 0, 0, 255);
    /// Fully transparent black
    pub const TRANSPARENT: Self = Self::rgba(0, 0, 0, 0);
    /// Classic clear color
    pub const CORNFLOWER_BLUE: Self = Self::rgba(100, 149, 237, 255);

    /// Create a color from its four channels
    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Create an opaque color
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self::rgba(r, g, b, 255)
    }

    /// Channels packed into a little-endian `u32` (red in the low byte)
    pub const fn packed(self) -> u32 {
        u32::from_le_bytes([self.r, self.g, self.b, self.a])
    }

    /// Inverse of [`Color::packed`]
    pub const fn from_packed(value: u32) -> Self {
        let [r, g, b, a] = value.to_le_bytes();
        Self { r, g, b, a }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{R:{} G:{} B:{} A:{}}}", self.r, self.g, self.b, self.a)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_packed_byte_order() {
        let color = Color::rgba(0x11, 0x22, 0x33, 0x44);
        assert_eq!(color.packed(), 0x4433_2211);
        assert_eq!(Color::from_packed(0x4433_2211), color);
        assert_eq!(bytemuck::bytes_of(&color), &[0x11, 0x22, 0x33, 0x44]);
    }

    #[test]
    fn test_white_default_tint() {
        assert_eq!(Color::WHITE.packed(), u32::MAX);
        assert_eq!(Color::rgb(1, 2, 3).a, 255);
        assert_eq!(Color::WHITE.to_string(), "{R:255 G:255 B:255 A:255}");
    }
}
