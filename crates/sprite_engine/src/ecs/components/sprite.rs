//! Sprite component

use super::transform::WorldTransform;
use crate::ecs::component::{ComponentState, Lifecycle, Renderable};
use crate::foundation::math::{Vec2, Vec3, Vec4};
use crate::render::{RenderResult, Sprite, SpriteRenderer, Texture, TextureRegion};

/// Draws a sprite at its entity's world transform
///
/// The sprite's position, rotation and size are rewritten from the world
/// transform on every update. Size is always `base_size` times the world
/// scale so repeated updates never compound.
#[derive(Debug, Clone)]
pub struct SpriteComponent {
    state: ComponentState,
    sprite: Sprite,
    base_size: Vec2,
    visible: bool,
    layer: i32,
}

impl SpriteComponent {
    /// Sprite sized to the whole texture
    pub fn new(texture: Texture) -> Self {
        let size = texture.size();
        Self {
            state: ComponentState::default(),
            sprite: Sprite::new(texture, Vec3::zeros(), size),
            base_size: size,
            visible: true,
            layer: 0,
        }
    }

    /// Builder pattern: unscaled size in world units
    pub fn with_size(mut self, size: Vec2) -> Self {
        self.set_base_size(size);
        self
    }

    /// Builder pattern: show part of the texture
    pub fn with_region(mut self, region: TextureRegion) -> Self {
        self.set_region(region);
        self
    }

    /// Builder pattern: tint
    pub fn with_color(mut self, color: Vec4) -> Self {
        self.sprite.color = color;
        self
    }

    /// Builder pattern: render layer
    pub fn with_layer(mut self, layer: i32) -> Self {
        self.layer = layer;
        self
    }

    /// The sprite as it will be drawn
    pub fn sprite(&self) -> &Sprite {
        &self.sprite
    }

    /// Unscaled size
    pub fn base_size(&self) -> Vec2 {
        self.base_size
    }

    /// Change the unscaled size
    pub fn set_base_size(&mut self, size: Vec2) {
        self.base_size = size;
        self.sprite.size = size;
    }

    /// Sub-rectangle currently shown
    pub fn region(&self) -> Option<TextureRegion> {
        self.sprite.region
    }

    /// Show `region`; its texture replaces the current one
    pub fn set_region(&mut self, region: TextureRegion) {
        self.sprite.texture = region.texture();
        self.sprite.region = Some(region);
    }

    /// Swap the texture and show all of it
    pub fn set_texture(&mut self, texture: Texture) {
        self.sprite.texture = texture;
        self.sprite.region = None;
    }

    /// Change the tint
    pub fn set_color(&mut self, color: Vec4) {
        self.sprite.color = color;
    }

    /// Render layer
    pub fn layer(&self) -> i32 {
        self.layer
    }

    /// Change the render layer
    pub fn set_layer(&mut self, layer: i32) {
        self.layer = layer;
    }

    /// Drawn when active and visible
    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// Show or hide without deactivating
    pub fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
    }

    /// Place the sprite at `world`, shifted by the animation frame offset
    pub fn sync(&mut self, world: &WorldTransform, offset: Vec2) {
        self.sprite.position = Vec3::new(
            world.position.x + offset.x,
            world.position.y + offset.y,
            world.position.z,
        );
        self.sprite.rotation = world.rotation;
        self.sprite.size = self.base_size.component_mul(&world.scale);
    }
}

impl Lifecycle for SpriteComponent {
    fn state(&self) -> &ComponentState {
        &self.state
    }

    fn state_mut(&mut self) -> &mut ComponentState {
        &mut self.state
    }
}

impl Renderable for SpriteComponent {
    fn render(&self, _alpha: f32, renderer: &mut dyn SpriteRenderer) -> RenderResult<()> {
        if self.state.is_active() && self.visible {
            renderer.draw(&self.sprite)?;
        }
        Ok(())
    }

    fn layer(&self) -> i32 {
        self.layer
    }
}
