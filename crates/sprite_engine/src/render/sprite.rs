//! Sprite description consumed by the batch renderer

use super::texture::{Texture, TextureRegion};
use crate::foundation::math::{Vec2, Vec3, Vec4};

/// A textured, tinted quad
///
/// `position` is the bottom-left corner in world units; `z` only matters to
/// backends that depth-sort. Rotation pivots around the quad's centre.
#[derive(Debug, Clone, PartialEq)]
pub struct Sprite {
    /// Corner position
    pub position: Vec3,
    /// Width and height in world units
    pub size: Vec2,
    /// RGBA tint multiplied with the texture
    pub color: Vec4,
    /// Texture sampled by the quad
    pub texture: Texture,
    /// Optional sub-rectangle; the whole texture when `None`
    pub region: Option<TextureRegion>,
    /// Rotation in radians
    pub rotation: f32,
}

impl Sprite {
    /// Untinted, unrotated sprite showing the whole texture
    pub fn new(texture: Texture, position: Vec3, size: Vec2) -> Self {
        Self {
            position,
            size,
            color: Vec4::new(1.0, 1.0, 1.0, 1.0),
            texture,
            region: None,
            rotation: 0.0,
        }
    }

    /// Show only part of the texture (the region's texture replaces the sprite's)
    pub fn with_region(mut self, region: TextureRegion) -> Self {
        self.texture = region.texture();
        self.region = Some(region);
        self
    }

    /// Apply a tint
    pub fn with_color(mut self, color: Vec4) -> Self {
        self.color = color;
        self
    }

    /// Apply a rotation
    pub fn with_rotation(mut self, rotation: f32) -> Self {
        self.rotation = rotation;
        self
    }

    /// UV rectangle the quad samples
    pub fn uv_rect(&self) -> [f32; 4] {
        self.region.map_or([0.0, 0.0, 1.0, 1.0], |region| region.uvs())
    }
}
