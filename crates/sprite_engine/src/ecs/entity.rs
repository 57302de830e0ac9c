//! Entity: a named node in the world's forest with fixed component slots

use super::component::{Component, ComponentKind, Lifecycle, Renderable};
use super::components::{
    AnimationComponent, ScriptComponent, ScriptContext, SpriteComponent, Transform, WorldTransform,
};
use super::{EcsError, EcsResult, EntityId};
use crate::foundation::math::Vec2;
use crate::render::{RenderResult, SpriteRenderer};

/// A game object
///
/// Always has a [`Transform`]; every other component kind is optional and
/// limited to one per entity. Parent/child links are ids owned by the
/// [`World`](super::World), which keeps them consistent.
#[derive(Debug)]
pub struct Entity {
    id: EntityId,
    name: String,
    active: bool,
    transform: Transform,
    sprite: Option<SpriteComponent>,
    animation: Option<AnimationComponent>,
    script: Option<ScriptComponent>,
    pub(super) parent: Option<EntityId>,
    pub(super) children: Vec<EntityId>,
}

impl Entity {
    pub(super) fn new(id: EntityId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            active: true,
            transform: Transform::default(),
            sprite: None,
            animation: None,
            script: None,
            parent: None,
            children: Vec::new(),
        }
    }

    /// Identity
    pub fn id(&self) -> EntityId {
        self.id
    }

    /// Display name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Rename
    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    /// Inactive entities and their subtrees are not updated
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Enable or disable the entity
    pub fn set_active(&mut self, active: bool) {
        self.active = active;
    }

    /// Local transform
    pub fn transform(&self) -> &Transform {
        &self.transform
    }

    /// Local transform, mutably
    pub fn transform_mut(&mut self) -> &mut Transform {
        &mut self.transform
    }

    /// Sprite slot
    pub fn sprite(&self) -> Option<&SpriteComponent> {
        self.sprite.as_ref()
    }

    /// Sprite slot, mutably
    pub fn sprite_mut(&mut self) -> Option<&mut SpriteComponent> {
        self.sprite.as_mut()
    }

    /// Animation slot
    pub fn animation(&self) -> Option<&AnimationComponent> {
        self.animation.as_ref()
    }

    /// Animation slot, mutably
    pub fn animation_mut(&mut self) -> Option<&mut AnimationComponent> {
        self.animation.as_mut()
    }

    /// Script slot
    pub fn script(&self) -> Option<&ScriptComponent> {
        self.script.as_ref()
    }

    /// Script slot, mutably
    pub fn script_mut(&mut self) -> Option<&mut ScriptComponent> {
        self.script.as_mut()
    }

    /// Parent id, `None` for roots
    pub fn parent(&self) -> Option<EntityId> {
        self.parent
    }

    /// Child ids in attach order
    pub fn children(&self) -> &[EntityId] {
        &self.children
    }

    /// Whether the slot for `kind` is filled
    pub fn has_component(&self, kind: ComponentKind) -> bool {
        match kind {
            ComponentKind::Transform => true,
            ComponentKind::Sprite => self.sprite.is_some(),
            ComponentKind::Animation => self.animation.is_some(),
            ComponentKind::Script => self.script.is_some(),
        }
    }

    /// Kinds present, transform first
    pub fn component_kinds(&self) -> Vec<ComponentKind> {
        [
            ComponentKind::Transform,
            ComponentKind::Sprite,
            ComponentKind::Animation,
            ComponentKind::Script,
        ]
        .into_iter()
        .filter(|&kind| self.has_component(kind))
        .collect()
    }

    /// Whether the entity has something to draw
    pub fn is_renderable(&self) -> bool {
        self.sprite.is_some()
    }

    /// Render layer of the sprite, 0 without one
    pub fn layer(&self) -> i32 {
        self.sprite.as_ref().map_or(0, Renderable::layer)
    }

    pub(super) fn attach(&mut self, component: Component) -> EcsResult<()> {
        let kind = component.kind();
        let exists = EcsError::ComponentExists { entity: self.id, kind };

        match component {
            Component::Transform(_) => return Err(exists),
            Component::Sprite(mut sprite) => {
                if self.sprite.is_some() {
                    return Err(exists);
                }
                sprite.state_mut().attach(self.id);
                if let Some(animation) = self.animation.as_mut() {
                    animation.capture_default(Some(&sprite));
                }
                self.sprite = Some(sprite);
            }
            Component::Animation(mut animation) => {
                if self.animation.is_some() {
                    return Err(exists);
                }
                if animation.state_mut().attach(self.id) {
                    animation.initialize(self.sprite.as_ref());
                }
                self.animation = Some(animation);
            }
            Component::Script(mut script) => {
                if self.script.is_some() {
                    return Err(exists);
                }
                if script.state_mut().attach(self.id) {
                    let mut ctx = ScriptContext {
                        entity: self.id,
                        name: &self.name,
                        transform: &mut self.transform,
                    };
                    script.start(&mut ctx);
                }
                self.script = Some(script);
            }
        }
        Ok(())
    }

    pub(super) fn detach(&mut self, kind: ComponentKind) -> EcsResult<Component> {
        let missing = EcsError::ComponentMissing { entity: self.id, kind };
        let component = match kind {
            ComponentKind::Transform => return Err(EcsError::TransformRequired(self.id)),
            ComponentKind::Sprite => {
                let mut sprite = self.sprite.take().ok_or(missing)?;
                sprite.state_mut().detach();
                if let Some(animation) = self.animation.as_mut() {
                    animation.capture_default(None);
                }
                Component::Sprite(sprite)
            }
            ComponentKind::Animation => {
                let mut animation = self.animation.take().ok_or(missing)?;
                animation.cleanup();
                animation.state_mut().detach();
                Component::Animation(animation)
            }
            ComponentKind::Script => {
                let mut script = self.script.take().ok_or(missing)?;
                self.stop_script(&mut script);
                script.state_mut().detach();
                Component::Script(script)
            }
        };
        Ok(component)
    }

    /// Run every component's cleanup; used when the entity is destroyed
    pub(super) fn cleanup(&mut self) {
        for kind in [ComponentKind::Script, ComponentKind::Animation, ComponentKind::Sprite] {
            if self.has_component(kind) {
                let _ = self.detach(kind);
            }
        }
        self.parent = None;
        self.children.clear();
    }

    fn stop_script(&mut self, script: &mut ScriptComponent) {
        let mut ctx = ScriptContext {
            entity: self.id,
            name: &self.name,
            transform: &mut self.transform,
        };
        script.stop(&mut ctx);
    }

    /// Update components in order script, animation, sprite and return the
    /// entity's world transform for its children
    pub(super) fn update_components(&mut self, dt: f32, parent: &WorldTransform) -> WorldTransform {
        if let Some(script) = self.script.as_mut().filter(|s| s.is_active()) {
            let mut ctx = ScriptContext {
                entity: self.id,
                name: &self.name,
                transform: &mut self.transform,
            };
            script.update(&mut ctx, dt);
        }

        let world = parent.compose(&self.transform);

        let mut offset = Vec2::zeros();
        if let Some(animation) = self.animation.as_mut().filter(|a| a.is_active()) {
            animation.update(dt, self.sprite.as_mut());
            offset = animation.offset();
        }

        if let Some(sprite) = self.sprite.as_mut().filter(|s| s.is_active()) {
            sprite.sync(&world, offset);
        }

        world
    }

    /// Draw this entity's own render-capable components
    pub(super) fn render_components(&self, alpha: f32, renderer: &mut dyn SpriteRenderer) -> RenderResult<()> {
        if let Some(sprite) = &self.sprite {
            sprite.render(alpha, renderer)?;
        }
        Ok(())
    }
}
