//! Texture handles and sub-rectangles

use crate::foundation::math::Vec2;

/// Backend-assigned texture identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TextureId(pub u32);

/// A GPU texture as seen by the engine: an id plus its pixel size
///
/// The pixels themselves live on the backend side; this handle is `Copy` and
/// cheap to hand to every sprite that uses it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Texture {
    id: TextureId,
    width: u32,
    height: u32,
}

impl Texture {
    /// Wrap a backend texture id
    pub fn new(id: TextureId, width: u32, height: u32) -> Self {
        Self { id, width, height }
    }

    /// Backend identifier
    pub fn id(&self) -> TextureId {
        self.id
    }

    /// Width in pixels
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height in pixels
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Size in pixels as a vector
    pub fn size(&self) -> Vec2 {
        Vec2::new(self.width as f32, self.height as f32)
    }
}

/// A rectangle of a texture expressed in UV space
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextureRegion {
    texture: Texture,
    /// Left U
    pub u1: f32,
    /// Top V
    pub v1: f32,
    /// Right U
    pub u2: f32,
    /// Bottom V
    pub v2: f32,
}

impl TextureRegion {
    /// Region from explicit UV coordinates
    pub fn new(texture: Texture, u1: f32, v1: f32, u2: f32, v2: f32) -> Self {
        Self { texture, u1, v1, u2, v2 }
    }

    /// The whole texture
    pub fn full(texture: Texture) -> Self {
        Self::new(texture, 0.0, 0.0, 1.0, 1.0)
    }

    /// Region from a pixel rectangle
    pub fn from_pixels(texture: Texture, x: u32, y: u32, width: u32, height: u32) -> Self {
        let tw = texture.width.max(1) as f32;
        let th = texture.height.max(1) as f32;
        Self::new(
            texture,
            x as f32 / tw,
            y as f32 / th,
            (x + width) as f32 / tw,
            (y + height) as f32 / th,
        )
    }

    /// Texture this region belongs to
    pub fn texture(&self) -> Texture {
        self.texture
    }

    /// `[u1, v1, u2, v2]`
    pub fn uvs(&self) -> [f32; 4] {
        [self.u1, self.v1, self.u2, self.v2]
    }

    /// Width in pixels
    pub fn width(&self) -> f32 {
        (self.u2 - self.u1) * self.texture.width as f32
    }

    /// Height in pixels
    pub fn height(&self) -> f32 {
        (self.v2 - self.v1) * self.texture.height as f32
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_region_from_pixels() {
        let texture = Texture::new(TextureId(1), 128, 64);
        let region = TextureRegion::from_pixels(texture, 32, 16, 32, 16);
        assert_relative_eq!(region.u1, 0.25);
        assert_relative_eq!(region.v1, 0.25);
        assert_relative_eq!(region.u2, 0.5);
        assert_relative_eq!(region.v2, 0.5);
        assert_relative_eq!(region.width(), 32.0);
        assert_relative_eq!(region.height(), 16.0);
    }

    #[test]
    fn test_full_region_covers_texture() {
        let texture = Texture::new(TextureId(2), 10, 20);
        let region = TextureRegion::full(texture);
        assert_eq!(region.uvs(), [0.0, 0.0, 1.0, 1.0]);
        assert_eq!(region.texture(), texture);
    }
}
