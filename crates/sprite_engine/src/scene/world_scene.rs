//! Scene backed by an entity world and a camera

use super::{Scene, SceneResult, SceneState};
use crate::ecs::World;
use crate::render::{Camera2D, SpriteRenderer};

/// A [`World`] viewed through a [`Camera2D`]
///
/// Updates the world and the camera unless paused, and renders the world
/// with the camera's view matrix. Unloading clears the world.
#[derive(Debug)]
pub struct WorldScene {
    state: SceneState,
    world: World,
    camera: Camera2D,
}

impl WorldScene {
    /// Empty world
    pub fn new(name: impl Into<String>, camera: Camera2D) -> Self {
        Self {
            state: SceneState::new(name),
            world: World::new(),
            camera,
        }
    }

    /// Entities of the scene
    pub fn world(&self) -> &World {
        &self.world
    }

    /// Entities of the scene, mutably
    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }

    /// Camera used for rendering
    pub fn camera(&self) -> &Camera2D {
        &self.camera
    }

    /// Camera used for rendering, mutably
    pub fn camera_mut(&mut self) -> &mut Camera2D {
        &mut self.camera
    }
}

impl Scene for WorldScene {
    fn state(&self) -> &SceneState {
        &self.state
    }

    fn state_mut(&mut self) -> &mut SceneState {
        &mut self.state
    }

    fn unload(&mut self) -> SceneResult<()> {
        self.world.clear();
        Ok(())
    }

    fn update(&mut self, dt: f32) -> SceneResult<()> {
        if self.state.is_paused() {
            return Ok(());
        }
        self.world.update(dt);
        self.camera.update(dt);
        Ok(())
    }

    fn render(&mut self, alpha: f32, renderer: &mut dyn SpriteRenderer) -> SceneResult<()> {
        renderer.set_view_matrix(&self.camera.view_matrix())?;
        self.world.render(alpha, renderer)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ecs::{MovementScript, ScriptComponent, SpriteComponent};
    use crate::foundation::math::{Mat4, Vec2};
    use crate::render::{RenderResult, Sprite, Texture, TextureId};
    use approx::assert_relative_eq;

    #[derive(Default)]
    struct Calls {
        views: usize,
        sprites: usize,
    }

    impl SpriteRenderer for Calls {
        fn draw(&mut self, _sprite: &Sprite) -> RenderResult<()> {
            self.sprites += 1;
            Ok(())
        }

        fn set_view_matrix(&mut self, _view: &Mat4) -> RenderResult<()> {
            self.views += 1;
            Ok(())
        }
    }

    fn scene() -> (WorldScene, crate::ecs::EntityId) {
        let mut scene = WorldScene::new("level", Camera2D::new(320.0, 240.0));
        let world = scene.world_mut();
        let id = world.create_entity("ship");
        world
            .add_component(id, SpriteComponent::new(Texture::new(TextureId(1), 8, 8)))
            .unwrap();
        world
            .add_component(id, ScriptComponent::new(MovementScript::new(2.0, Vec2::new(1.0, 0.0))))
            .unwrap();
        (scene, id)
    }

    #[test]
    fn test_paused_scene_does_not_advance() {
        let (mut scene, id) = scene();
        scene.update(1.0).unwrap();
        scene.pause();
        scene.update(1.0).unwrap();
        assert_relative_eq!(scene.world().world_position(id).unwrap().x, 2.0);
    }

    #[test]
    fn test_render_sets_view_then_draws() {
        let (mut scene, _) = scene();
        let mut calls = Calls::default();
        scene.render(1.0, &mut calls).unwrap();
        assert_eq!(calls.views, 1);
        assert_eq!(calls.sprites, 1);
    }

    #[test]
    fn test_unload_clears_world() {
        let (mut scene, _) = scene();
        scene.unload().unwrap();
        assert_eq!(scene.world().entity_count(), 0);
    }
}
