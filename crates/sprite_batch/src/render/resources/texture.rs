//! Texture handles

/// Opaque handle to a texture owned by the device
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TextureHandle(pub u64);

/// A 2D texture as seen by the batcher: a handle and its pixel size
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Texture2D {
    handle: TextureHandle,
    width: u32,
    height: u32,
}

impl Texture2D {
    /// Wrap a device texture
    pub const fn new(handle: TextureHandle, width: u32, height: u32) -> Self {
        Self { handle, width, height }
    }

    /// Device handle
    pub const fn handle(&self) -> TextureHandle {
        self.handle
    }

    /// Width in pixels
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// Height in pixels
    pub const fn height(&self) -> u32 {
        self.height
    }
}
