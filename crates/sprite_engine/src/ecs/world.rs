//! World: entity arena, hierarchy and traversal

use std::collections::BTreeMap;

use super::component::{Component, ComponentKind};
use super::components::WorldTransform;
use super::entity::Entity;
use super::{EcsError, EcsResult, EntityId};
use crate::foundation::math::{Mat4, Vec2, Vec3};
use crate::render::{RenderResult, SpriteRenderer};

const FIRST_ENTITY_ID: u64 = 1;

/// Owns all entities and the parent/child forest
#[derive(Debug)]
pub struct World {
    entities: BTreeMap<EntityId, Entity>,
    roots: Vec<EntityId>,
    next_id: u64,
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}

impl World {
    /// Empty world
    pub fn new() -> Self {
        Self {
            entities: BTreeMap::new(),
            roots: Vec::new(),
            next_id: FIRST_ENTITY_ID,
        }
    }

    /// Create a root entity with a default transform
    pub fn create_entity(&mut self, name: impl Into<String>) -> EntityId {
        let id = self.allocate_id();
        self.insert(Entity::new(id, name));
        id
    }

    fn allocate_id(&mut self) -> EntityId {
        if let Some(next) = self.next_id.checked_add(1) {
            let id = EntityId(self.next_id);
            self.next_id = next;
            return id;
        }

        // Counter pinned at u64::MAX by an explicit id: reuse the lowest free id
        let mut candidate = FIRST_ENTITY_ID;
        for id in self.entities.keys() {
            if id.0 == candidate {
                candidate += 1;
            } else if id.0 > candidate {
                break;
            }
        }
        log::warn!("Entity id counter exhausted, reusing id {}", candidate);
        EntityId(candidate)
    }

    /// Create a root entity with a caller-chosen id
    pub fn create_entity_with_id(&mut self, id: EntityId, name: impl Into<String>) -> EcsResult<EntityId> {
        if self.entities.contains_key(&id) {
            return Err(EcsError::DuplicateEntity(id));
        }
        self.next_id = self.next_id.max(id.0.saturating_add(1));
        self.insert(Entity::new(id, name));
        Ok(id)
    }

    fn insert(&mut self, entity: Entity) {
        log::debug!("Created entity {} '{}'", entity.id(), entity.name());
        self.roots.push(entity.id());
        self.entities.insert(entity.id(), entity);
    }

    /// Look up an entity
    pub fn entity(&self, id: EntityId) -> Option<&Entity> {
        self.entities.get(&id)
    }

    /// Look up an entity mutably
    pub fn entity_mut(&mut self, id: EntityId) -> Option<&mut Entity> {
        self.entities.get_mut(&id)
    }

    fn get(&self, id: EntityId) -> EcsResult<&Entity> {
        self.entities.get(&id).ok_or(EcsError::EntityNotFound(id))
    }

    fn get_mut(&mut self, id: EntityId) -> EcsResult<&mut Entity> {
        self.entities.get_mut(&id).ok_or(EcsError::EntityNotFound(id))
    }

    /// Lowest-id entity with this name
    pub fn find_entity(&self, name: &str) -> Option<EntityId> {
        self.entities.values().find(|e| e.name() == name).map(Entity::id)
    }

    /// Every entity with this name, in id order
    pub fn find_entities_with_name(&self, name: &str) -> Vec<EntityId> {
        self.entities.values().filter(|e| e.name() == name).map(Entity::id).collect()
    }

    /// Entities whose `kind` slot is filled
    pub fn entities_with_component(&self, kind: ComponentKind) -> Vec<EntityId> {
        self.entities
            .values()
            .filter(|e| e.has_component(kind))
            .map(Entity::id)
            .collect()
    }

    /// Entities whose own active flag is set
    pub fn active_entities(&self) -> Vec<EntityId> {
        self.entities.values().filter(|e| e.is_active()).map(Entity::id).collect()
    }

    /// Entities without a parent, in creation/detach order
    pub fn root_entities(&self) -> &[EntityId] {
        &self.roots
    }

    /// All entities in id order
    pub fn iter(&self) -> impl Iterator<Item = &Entity> {
        self.entities.values()
    }

    /// Number of live entities
    pub fn entity_count(&self) -> usize {
        self.entities.len()
    }

    /// Attach a component; fails if the entity already has one of that kind
    pub fn add_component(&mut self, id: EntityId, component: impl Into<Component>) -> EcsResult<()> {
        self.get_mut(id)?.attach(component.into())
    }

    /// Detach and return a component; the transform cannot be removed
    pub fn remove_component(&mut self, id: EntityId, kind: ComponentKind) -> EcsResult<Component> {
        self.get_mut(id)?.detach(kind)
    }

    /// Re-parent `child` under `parent`, or make it a root with `None`
    pub fn set_parent(&mut self, child: EntityId, parent: Option<EntityId>) -> EcsResult<()> {
        let current = self.get(child)?.parent;
        if let Some(parent) = parent {
            self.get(parent)?;
            if current == Some(parent) {
                return Ok(());
            }
            if self.is_ancestor_or_self(child, parent) {
                return Err(EcsError::HierarchyCycle { child, parent });
            }
        } else if current.is_none() {
            return Ok(());
        }

        self.detach_from_parent(child);

        match parent {
            Some(parent) => {
                if let Some(entity) = self.entities.get_mut(&parent) {
                    if !entity.children.contains(&child) {
                        entity.children.push(child);
                    }
                }
            }
            None => {
                if !self.roots.contains(&child) {
                    self.roots.push(child);
                }
            }
        }
        if let Some(entity) = self.entities.get_mut(&child) {
            entity.parent = parent;
        }
        Ok(())
    }

    /// Walks up from `node`; true if `ancestor` is on the path (or is `node`)
    fn is_ancestor_or_self(&self, ancestor: EntityId, node: EntityId) -> bool {
        let mut cursor = Some(node);
        while let Some(id) = cursor {
            if id == ancestor {
                return true;
            }
            cursor = self.entities.get(&id).and_then(Entity::parent);
        }
        false
    }

    fn detach_from_parent(&mut self, child: EntityId) {
        let parent = self.entities.get_mut(&child).and_then(|e| e.parent.take());
        match parent {
            Some(parent) => {
                if let Some(entity) = self.entities.get_mut(&parent) {
                    entity.children.retain(|&c| c != child);
                }
            }
            None => self.roots.retain(|&r| r != child),
        }
    }

    /// Destroy an entity and its whole subtree
    pub fn destroy_entity(&mut self, id: EntityId) -> EcsResult<()> {
        self.get(id)?;
        self.detach_from_parent(id);
        self.destroy_subtree(id);
        Ok(())
    }

    fn destroy_subtree(&mut self, id: EntityId) {
        let Some(mut entity) = self.entities.remove(&id) else {
            return;
        };
        for child in std::mem::take(&mut entity.children) {
            self.destroy_subtree(child);
        }
        entity.cleanup();
        log::debug!("Destroyed entity {} '{}'", id, entity.name());
    }

    /// Destroy everything and restart id allocation
    pub fn clear(&mut self) {
        for root in std::mem::take(&mut self.roots) {
            self.destroy_subtree(root);
        }
        self.entities.clear();
        self.next_id = FIRST_ENTITY_ID;
    }

    /// Composed world transform of an entity
    pub fn world_transform(&self, id: EntityId) -> EcsResult<WorldTransform> {
        let mut chain = vec![self.get(id)?];
        while let Some(parent) = chain.last().and_then(|e| e.parent()) {
            chain.push(self.get(parent)?);
        }
        Ok(chain
            .iter()
            .rev()
            .fold(WorldTransform::IDENTITY, |world, entity| world.compose(entity.transform())))
    }

    /// World position
    pub fn world_position(&self, id: EntityId) -> EcsResult<Vec3> {
        self.world_transform(id).map(|w| w.position)
    }

    /// World rotation in radians
    pub fn world_rotation(&self, id: EntityId) -> EcsResult<f32> {
        self.world_transform(id).map(|w| w.rotation)
    }

    /// World scale
    pub fn world_scale(&self, id: EntityId) -> EcsResult<Vec2> {
        self.world_transform(id).map(|w| w.scale)
    }

    /// World TRS matrix, built from the composed values
    pub fn world_matrix(&self, id: EntityId) -> EcsResult<Mat4> {
        self.world_transform(id).map(|w| w.matrix())
    }

    /// Update every active root and, recursively, its children
    pub fn update(&mut self, dt: f32) {
        for root in self.roots.clone() {
            self.update_entity(root, dt, &WorldTransform::IDENTITY);
        }
    }

    fn update_entity(&mut self, id: EntityId, dt: f32, parent: &WorldTransform) {
        let Some(entity) = self.entities.get_mut(&id) else {
            return;
        };
        if !entity.is_active() {
            return;
        }
        let world = entity.update_components(dt, parent);
        for child in entity.children.clone() {
            self.update_entity(child, dt, &world);
        }
    }

    /// Draw every active renderable entity, ordered by ascending layer
    ///
    /// The sort is stable, so equal layers draw in id order. Only each
    /// entity's own components are drawn; hierarchy does not affect order.
    pub fn render(&self, alpha: f32, renderer: &mut dyn SpriteRenderer) -> RenderResult<()> {
        let mut drawable: Vec<&Entity> = self
            .entities
            .values()
            .filter(|e| e.is_active() && e.is_renderable())
            .collect();
        drawable.sort_by_key(|e| e.layer());

        for entity in drawable {
            entity.render_components(alpha, renderer)?;
        }
        Ok(())
    }

    /// Draw one entity and its active descendants depth-first
    pub fn render_entity(&self, id: EntityId, alpha: f32, renderer: &mut dyn SpriteRenderer) -> RenderResult<()> {
        let Some(entity) = self.entities.get(&id) else {
            return Ok(());
        };
        if !entity.is_active() {
            return Ok(());
        }
        entity.render_components(alpha, renderer)?;
        for &child in entity.children() {
            self.render_entity(child, alpha, renderer)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ecs::components::{
        AnimationComponent, MovementScript, Script, ScriptComponent, ScriptContext, SpriteComponent, Transform,
    };
    use crate::render::{Sprite, Texture, TextureId, TextureRegion};
    use approx::assert_relative_eq;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[derive(Default)]
    struct CollectingRenderer {
        drawn: Vec<Sprite>,
    }

    impl SpriteRenderer for CollectingRenderer {
        fn draw(&mut self, sprite: &Sprite) -> RenderResult<()> {
            self.drawn.push(sprite.clone());
            Ok(())
        }

        fn set_view_matrix(&mut self, _view: &Mat4) -> RenderResult<()> {
            Ok(())
        }
    }

    struct Recorder {
        log: Rc<RefCell<Vec<String>>>,
    }

    impl Script for Recorder {
        fn start(&mut self, ctx: &mut ScriptContext<'_>) {
            self.log.borrow_mut().push(format!("start {}", ctx.name));
        }

        fn update(&mut self, ctx: &mut ScriptContext<'_>, _dt: f32) {
            self.log.borrow_mut().push(format!("update {}", ctx.name));
        }

        fn stop(&mut self, ctx: &mut ScriptContext<'_>) {
            self.log.borrow_mut().push(format!("stop {}", ctx.name));
        }
    }

    fn texture(id: u32) -> Texture {
        Texture::new(TextureId(id), 8, 8)
    }

    #[test]
    fn test_create_entity_is_root_with_transform() {
        let mut world = World::new();
        let id = world.create_entity("player");
        assert_eq!(id, EntityId(1));
        assert_eq!(world.root_entities(), &[id]);
        let entity = world.entity(id).unwrap();
        assert!(entity.has_component(ComponentKind::Transform));
        assert_eq!(entity.transform(), &Transform::default());
    }

    #[test]
    fn test_transform_cannot_be_removed_or_duplicated() {
        let mut world = World::new();
        let id = world.create_entity("e");
        assert_eq!(
            world.remove_component(id, ComponentKind::Transform).err(),
            Some(EcsError::TransformRequired(id))
        );
        assert!(matches!(
            world.add_component(id, Transform::default()),
            Err(EcsError::ComponentExists { kind: ComponentKind::Transform, .. })
        ));
    }

    #[test]
    fn test_component_added_once_removed_once() {
        let mut world = World::new();
        let id = world.create_entity("e");
        world.add_component(id, SpriteComponent::new(texture(1))).unwrap();
        assert!(world.add_component(id, SpriteComponent::new(texture(2))).is_err());
        // the first sprite survives the failed insert
        assert_eq!(world.entity(id).unwrap().sprite().unwrap().sprite().texture.id(), TextureId(1));

        assert!(world.remove_component(id, ComponentKind::Sprite).is_ok());
        assert!(matches!(
            world.remove_component(id, ComponentKind::Sprite),
            Err(EcsError::ComponentMissing { kind: ComponentKind::Sprite, .. })
        ));
    }

    #[test]
    fn test_every_optional_kind_is_added_once() {
        let mut world = World::new();
        let id = world.create_entity("e");
        let candidates: [(ComponentKind, fn() -> Component); 3] = [
            (ComponentKind::Sprite, || SpriteComponent::new(texture(1)).into()),
            (ComponentKind::Animation, || AnimationComponent::new().into()),
            (ComponentKind::Script, || {
                ScriptComponent::new(MovementScript::new(1.0, Vec2::new(1.0, 0.0))).into()
            }),
        ];

        for (kind, make) in candidates {
            assert!(world.add_component(id, make()).is_ok(), "{kind:?} first insert");
            assert_eq!(
                world.add_component(id, make()).err(),
                Some(EcsError::ComponentExists { entity: id, kind })
            );
            assert!(world.entity(id).unwrap().has_component(kind));
        }

        for (kind, _) in candidates {
            assert!(world.remove_component(id, kind).is_ok());
            assert_eq!(
                world.remove_component(id, kind).err(),
                Some(EcsError::ComponentMissing { entity: id, kind })
            );
        }
    }

    #[test]
    fn test_animation_default_region_ignores_attach_order() {
        let sheet = Texture::new(TextureId(9), 64, 16);
        let idle = TextureRegion::from_pixels(sheet, 48, 0, 16, 16);

        let mut world = World::new();
        let id = world.create_entity("hero");
        world.add_component(id, AnimationComponent::new()).unwrap();
        world.add_component(id, SpriteComponent::new(sheet).with_region(idle)).unwrap();
        assert_eq!(world.entity(id).unwrap().animation().unwrap().default_region(), Some(idle));

        let sprite = world.entity_mut(id).unwrap().sprite_mut().unwrap();
        sprite.set_region(TextureRegion::full(sheet));
        world.update(0.1);
        assert_eq!(world.entity(id).unwrap().sprite().unwrap().region(), Some(idle));

        world.remove_component(id, ComponentKind::Sprite).unwrap();
        assert_eq!(world.entity(id).unwrap().animation().unwrap().default_region(), None);
    }

    #[test]
    fn test_child_world_position_is_additive() {
        let mut world = World::new();
        let parent = world.create_entity("parent");
        let child = world.create_entity("child");
        world.set_parent(child, Some(parent)).unwrap();
        world.entity_mut(child).unwrap().transform_mut().set_position(Vec3::new(10.0, 0.0, 0.0));
        let p = world.entity_mut(parent).unwrap().transform_mut();
        p.set_position(Vec3::new(5.0, 5.0, 0.0));
        p.set_rotation(0.5);
        p.set_scale(Vec2::new(2.0, 2.0));

        assert_relative_eq!(world.world_position(child).unwrap(), Vec3::new(15.0, 5.0, 0.0));
        assert_relative_eq!(world.world_rotation(child).unwrap(), 0.5);
        assert_relative_eq!(world.world_scale(child).unwrap(), Vec2::new(2.0, 2.0));
        let m = world.world_matrix(child).unwrap();
        assert_relative_eq!(m[(0, 3)], 15.0);
        assert_relative_eq!(m[(1, 3)], 5.0);
    }

    #[test]
    fn test_reparenting_keeps_links_consistent() {
        let mut world = World::new();
        let a = world.create_entity("a");
        let b = world.create_entity("b");
        let c = world.create_entity("c");

        world.set_parent(c, Some(a)).unwrap();
        world.set_parent(c, Some(a)).unwrap();
        assert_eq!(world.entity(a).unwrap().children(), &[c]);
        assert_eq!(world.root_entities(), &[a, b]);

        world.set_parent(c, Some(b)).unwrap();
        assert!(world.entity(a).unwrap().children().is_empty());
        assert_eq!(world.entity(b).unwrap().children(), &[c]);
        assert_eq!(world.entity(c).unwrap().parent(), Some(b));

        world.set_parent(c, None).unwrap();
        assert!(world.entity(b).unwrap().children().is_empty());
        assert_eq!(world.root_entities(), &[a, b, c]);
    }

    #[test]
    fn test_cycles_are_rejected() {
        let mut world = World::new();
        let a = world.create_entity("a");
        let b = world.create_entity("b");
        world.set_parent(b, Some(a)).unwrap();
        assert_eq!(
            world.set_parent(a, Some(b)),
            Err(EcsError::HierarchyCycle { child: a, parent: b })
        );
        assert_eq!(world.set_parent(a, Some(a)), Err(EcsError::HierarchyCycle { child: a, parent: a }));
        assert_eq!(world.root_entities(), &[a]);
    }

    #[test]
    fn test_destroy_removes_subtree_and_stops_scripts() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut world = World::new();
        let root = world.create_entity("root");
        let child = world.create_entity("child");
        let grandchild = world.create_entity("grandchild");
        world.set_parent(child, Some(root)).unwrap();
        world.set_parent(grandchild, Some(child)).unwrap();
        world
            .add_component(grandchild, ScriptComponent::new(Recorder { log: Rc::clone(&log) }))
            .unwrap();

        world.destroy_entity(child).unwrap();
        assert_eq!(world.entity_count(), 1);
        assert!(world.entity(root).unwrap().children().is_empty());
        assert_eq!(*log.borrow(), vec!["start grandchild", "stop grandchild"]);
        assert_eq!(world.destroy_entity(child), Err(EcsError::EntityNotFound(child)));
    }

    #[test]
    fn test_update_order_and_inactive_subtrees() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut world = World::new();
        let parent = world.create_entity("parent");
        let child = world.create_entity("child");
        world.set_parent(child, Some(parent)).unwrap();
        for id in [parent, child] {
            world
                .add_component(id, ScriptComponent::new(Recorder { log: Rc::clone(&log) }))
                .unwrap();
        }
        log.borrow_mut().clear();

        world.update(0.016);
        assert_eq!(*log.borrow(), vec!["update parent", "update child"]);

        log.borrow_mut().clear();
        world.entity_mut(parent).unwrap().set_active(false);
        world.update(0.016);
        assert!(log.borrow().is_empty());
    }

    #[test]
    fn test_update_moves_sprite_with_script() {
        let mut world = World::new();
        let id = world.create_entity("ship");
        world.add_component(id, SpriteComponent::new(texture(1))).unwrap();
        world
            .add_component(id, ScriptComponent::new(MovementScript::new(10.0, Vec2::new(1.0, 0.0))))
            .unwrap();
        world.entity_mut(id).unwrap().transform_mut().set_uniform_scale(2.0);

        world.update(0.5);
        world.update(0.5);
        let sprite = world.entity(id).unwrap().sprite().unwrap().sprite();
        assert_relative_eq!(sprite.position.x, 10.0);
        assert_relative_eq!(sprite.size, Vec2::new(16.0, 16.0));
    }

    #[test]
    fn test_render_sorted_by_layer_then_id() {
        let mut world = World::new();
        let mut spawn = |name: &str, tex: u32, layer: i32| {
            let id = world.create_entity(name);
            world
                .add_component(id, SpriteComponent::new(texture(tex)).with_layer(layer))
                .unwrap();
            id
        };
        spawn("front", 1, 2);
        spawn("back", 2, 0);
        let hidden = spawn("hidden", 3, 1);
        spawn("middle", 4, 1);
        world.create_entity("no sprite");
        world.entity_mut(hidden).unwrap().set_active(false);

        let mut renderer = CollectingRenderer::default();
        world.render(1.0, &mut renderer).unwrap();
        let order: Vec<u32> = renderer.drawn.iter().map(|s| s.texture.id().0).collect();
        assert_eq!(order, vec![2, 4, 1]);
    }

    #[test]
    fn test_render_entity_recurses() {
        let mut world = World::new();
        let parent = world.create_entity("parent");
        let child = world.create_entity("child");
        world.set_parent(child, Some(parent)).unwrap();
        world.add_component(parent, SpriteComponent::new(texture(1))).unwrap();
        world.add_component(child, SpriteComponent::new(texture(2))).unwrap();

        let mut renderer = CollectingRenderer::default();
        world.render_entity(parent, 1.0, &mut renderer).unwrap();
        assert_eq!(renderer.drawn.len(), 2);
    }

    #[test]
    fn test_lookup_helpers() {
        let mut world = World::new();
        let a = world.create_entity("enemy");
        let b = world.create_entity("enemy");
        world.add_component(b, SpriteComponent::new(texture(1))).unwrap();

        assert_eq!(world.find_entity("enemy"), Some(a));
        assert_eq!(world.find_entities_with_name("enemy"), vec![a, b]);
        assert_eq!(world.entities_with_component(ComponentKind::Sprite), vec![b]);
        world.entity_mut(a).unwrap().set_active(false);
        assert_eq!(world.active_entities(), vec![b]);
    }

    #[test]
    fn test_explicit_ids_and_clear() {
        let mut world = World::new();
        world.create_entity_with_id(EntityId(10), "fixed").unwrap();
        assert_eq!(
            world.create_entity_with_id(EntityId(10), "again"),
            Err(EcsError::DuplicateEntity(EntityId(10)))
        );
        assert_eq!(world.create_entity("next"), EntityId(11));

        world.clear();
        assert_eq!(world.entity_count(), 0);
        assert!(world.root_entities().is_empty());
        assert_eq!(world.create_entity("fresh"), EntityId(1));
    }

    #[test]
    fn test_max_explicit_id_does_not_overflow_counter() {
        let mut world = World::new();
        world.create_entity("first");
        world.create_entity("second");
        let edge = world.create_entity_with_id(EntityId(u64::MAX), "edge").unwrap();
        assert_eq!(edge, EntityId(u64::MAX));

        // fresh ids keep coming without clobbering existing entities
        let next = world.create_entity("after");
        assert_eq!(next, EntityId(3));
        let again = world.create_entity("again");
        assert_eq!(again, EntityId(4));
        assert_eq!(world.entity_count(), 5);
        assert_eq!(world.entity(edge).unwrap().name(), "edge");
    }
}
