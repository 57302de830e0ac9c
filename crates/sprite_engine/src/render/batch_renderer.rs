//! # Sprite Batch
//!
//! Accumulates textured quads into one streaming vertex buffer and submits
//! them with as few draw calls as possible.
//!
//! ## Flush rules
//!
//! - Every sprite collected since the last flush shares one texture.
//! - Drawing a sprite with a different texture flushes first.
//! - Reaching the sprite capacity flushes first; that is a scheduled flush,
//!   not an error.
//!
//! Sprites that share a texture and are drawn back-to-back cost a single draw
//! call. Callers that interleave textures pay one flush per switch, so sorting
//! by texture helps, but correctness never depends on draw order.

use bytemuck::{Pod, Zeroable};
use nalgebra::Point3;

use super::backend::RenderBackend;
use super::shader::{uniforms, ShaderProgram};
use super::sprite::Sprite;
use super::texture::Texture;
use super::RenderResult;
use crate::core::config::{BatchConfig, ShaderConfig};
use crate::foundation::math::{rotation_z, scaling, translation, Mat4};

/// Default number of sprites per batch
pub const DEFAULT_MAX_SPRITES: usize = 1000;

/// Vertices emitted per sprite (two triangles)
pub const VERTICES_PER_SPRITE: usize = 6;

/// Unit-quad corners in emission order: BL, BR, TL, BR, TR, TL
const QUAD_CORNERS: [(f32, f32); VERTICES_PER_SPRITE] =
    [(0.0, 0.0), (1.0, 0.0), (0.0, 1.0), (1.0, 0.0), (1.0, 1.0), (0.0, 1.0)];

/// One batched vertex: position, texture coordinate and tint
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct SpriteVertex {
    /// World position
    pub position: [f32; 3],
    /// Texture coordinate
    pub uv: [f32; 2],
    /// RGBA tint
    pub color: [f32; 4],
}

/// Something that can draw sprites under a camera view
///
/// World and scene render traversal is written against this trait so it does
/// not need to know which backend sits behind the batch.
pub trait SpriteRenderer {
    /// Queue a sprite for drawing
    fn draw(&mut self, sprite: &Sprite) -> RenderResult<()>;

    /// Change the view matrix for everything drawn afterwards
    fn set_view_matrix(&mut self, view: &Mat4) -> RenderResult<()>;
}

/// Statistics since the last [`SpriteBatch::begin`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchStats {
    /// Sprites accepted by `draw`
    pub sprites: usize,
    /// Non-empty flushes, i.e. draw calls issued
    pub draw_calls: usize,
    /// Flushes forced by a texture change
    pub texture_switches: usize,
    /// Flushes forced by reaching capacity
    pub capacity_flushes: usize,
}

impl BatchStats {
    /// Average sprites per draw call
    pub fn avg_sprites_per_call(&self) -> f32 {
        if self.draw_calls == 0 {
            0.0
        } else {
            self.sprites as f32 / self.draw_calls as f32
        }
    }
}

/// Texture-coalescing sprite batcher
pub struct SpriteBatch<B: RenderBackend> {
    backend: B,
    shader: ShaderProgram,
    vertices: Vec<SpriteVertex>,
    max_sprites: usize,
    sprite_count: usize,
    current_texture: Option<Texture>,
    stats: BatchStats,
}

impl<B: RenderBackend> SpriteBatch<B> {
    /// Create a batch with the default capacity
    pub fn new(backend: B, shader: ShaderProgram) -> RenderResult<Self> {
        Self::with_capacity(backend, shader, DEFAULT_MAX_SPRITES)
    }

    /// Create a batch that flushes after `max_sprites` sprites
    pub fn with_capacity(mut backend: B, shader: ShaderProgram, max_sprites: usize) -> RenderResult<Self> {
        let max_sprites = max_sprites.max(1);
        shader.bind(&mut backend)?;
        shader.set_int(&mut backend, uniforms::TEXTURE, 0)?;

        Ok(Self {
            backend,
            shader,
            vertices: Vec::with_capacity(max_sprites * VERTICES_PER_SPRITE),
            max_sprites,
            sprite_count: 0,
            current_texture: None,
            stats: BatchStats::default(),
        })
    }

    /// Compile the sprite shader on `backend` and size the batch from config
    pub fn from_config(mut backend: B, shader: &ShaderConfig, batch: &BatchConfig) -> RenderResult<Self> {
        let handle = backend.compile_shader(shader)?;
        Self::with_capacity(backend, ShaderProgram::new(handle), batch.max_sprites)
    }

    /// Start a new frame of drawing
    pub fn begin(&mut self) {
        self.vertices.clear();
        self.sprite_count = 0;
        self.current_texture = None;
        self.stats = BatchStats::default();
    }

    /// Queue one sprite, flushing first if the texture changes or the batch is full
    pub fn draw(&mut self, sprite: &Sprite) -> RenderResult<()> {
        let texture_changed = self
            .current_texture
            .is_some_and(|current| current.id() != sprite.texture.id());
        let full = self.sprite_count >= self.max_sprites;

        if texture_changed || full {
            if texture_changed {
                self.stats.texture_switches += 1;
            } else {
                self.stats.capacity_flushes += 1;
            }
            self.flush()?;
        }
        self.current_texture = Some(sprite.texture);

        let model = Self::model_matrix(sprite);
        let [u1, v1, u2, v2] = sprite.uv_rect();
        let color = [sprite.color.x, sprite.color.y, sprite.color.z, sprite.color.w];

        for (x, y) in QUAD_CORNERS {
            let p = model.transform_point(&Point3::new(x, y, 0.0));
            let u = if x == 0.0 { u1 } else { u2 };
            let v = if y == 0.0 { v1 } else { v2 };
            self.vertices.push(SpriteVertex {
                position: [p.x, p.y, p.z],
                uv: [u, v],
                color,
            });
        }

        self.sprite_count += 1;
        self.stats.sprites += 1;
        Ok(())
    }

    /// Translate, rotate about the quad centre when rotated, then scale to size
    fn model_matrix(sprite: &Sprite) -> Mat4 {
        let mut model = translation(sprite.position.x, sprite.position.y, sprite.position.z);
        if sprite.rotation != 0.0 {
            let half_w = sprite.size.x * 0.5;
            let half_h = sprite.size.y * 0.5;
            model = model
                * translation(half_w, half_h, 0.0)
                * rotation_z(sprite.rotation)
                * translation(-half_w, -half_h, 0.0);
        }
        model * scaling(sprite.size.x, sprite.size.y)
    }

    /// Submit everything queued so far as one draw call
    pub fn flush(&mut self) -> RenderResult<()> {
        if self.sprite_count == 0 {
            return Ok(());
        }

        self.backend.upload_vertices(&self.vertices)?;
        self.shader.bind(&mut self.backend)?;
        if let Some(texture) = self.current_texture {
            self.backend.bind_texture(&texture, 0)?;
        }
        self.backend.draw_triangles(self.sprite_count * VERTICES_PER_SPRITE)?;
        log::trace!("Sprite batch flushed {} sprites", self.sprite_count);

        self.stats.draw_calls += 1;
        self.vertices.clear();
        self.sprite_count = 0;
        Ok(())
    }

    /// Finish the frame; always flushes
    pub fn end(&mut self) -> RenderResult<()> {
        self.flush()
    }

    /// Set the projection matrix (flushes pending sprites first)
    pub fn set_projection(&mut self, projection: &Mat4) -> RenderResult<()> {
        self.flush()?;
        self.shader.bind(&mut self.backend)?;
        self.shader.set_mat4(&mut self.backend, uniforms::PROJECTION, projection)
    }

    /// Sprites waiting for the next flush
    pub fn pending_sprites(&self) -> usize {
        self.sprite_count
    }

    /// Capacity before a forced flush
    pub fn max_sprites(&self) -> usize {
        self.max_sprites
    }

    /// Statistics since `begin`
    pub fn stats(&self) -> BatchStats {
        self.stats
    }

    /// The shader program used for every flush
    pub fn shader(&self) -> ShaderProgram {
        self.shader
    }

    /// Underlying backend
    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Underlying backend, mutably (texture creation and the like)
    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }
}

impl<B: RenderBackend> SpriteRenderer for SpriteBatch<B> {
    fn draw(&mut self, sprite: &Sprite) -> RenderResult<()> {
        SpriteBatch::draw(self, sprite)
    }

    fn set_view_matrix(&mut self, view: &Mat4) -> RenderResult<()> {
        self.flush()?;
        self.shader.bind(&mut self.backend)?;
        self.shader.set_mat4(&mut self.backend, uniforms::VIEW, view)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::math::{constants, Vec2, Vec3, Vec4};
    use crate::render::backend::test_support::{BackendCall, RecordingBackend};
    use crate::render::shader::ShaderHandle;
    use crate::render::texture::{TextureId, TextureRegion};
    use approx::assert_relative_eq;

    fn batch(capacity: usize) -> SpriteBatch<RecordingBackend> {
        SpriteBatch::with_capacity(RecordingBackend::default(), ShaderProgram::new(ShaderHandle(1)), capacity)
            .unwrap()
    }

    fn sprite(texture: u32) -> Sprite {
        Sprite::new(
            Texture::new(TextureId(texture), 16, 16),
            Vec3::zeros(),
            Vec2::new(16.0, 16.0),
        )
    }

    #[test]
    fn test_shared_texture_costs_one_draw_call() {
        let mut batch = batch(100);
        batch.begin();
        for _ in 0..50 {
            batch.draw(&sprite(1)).unwrap();
        }
        assert!(batch.backend().draw_calls().is_empty());
        batch.end().unwrap();

        assert_eq!(batch.backend().draw_calls(), vec![50 * VERTICES_PER_SPRITE]);
        assert_eq!(batch.stats().draw_calls, 1);
        assert_eq!(batch.stats().sprites, 50);
    }

    #[test]
    fn test_interleaved_textures_flush_per_switch() {
        let mut batch = batch(100);
        batch.begin();
        for i in 0..6 {
            batch.draw(&sprite(1 + i % 2)).unwrap();
        }
        batch.end().unwrap();

        // five switches plus the final flush at end
        assert_eq!(batch.stats().texture_switches, 5);
        assert_eq!(batch.stats().draw_calls, 6);
        assert_eq!(
            batch.backend().bound_textures(),
            vec![TextureId(1), TextureId(2), TextureId(1), TextureId(2), TextureId(1), TextureId(2)]
        );
    }

    #[test]
    fn test_grouped_textures_flush_once_per_group() {
        let mut batch = batch(100);
        batch.begin();
        for texture in [1, 1, 1, 2, 2, 3] {
            batch.draw(&sprite(texture)).unwrap();
        }
        batch.end().unwrap();
        assert_eq!(batch.backend().draw_calls(), vec![18, 12, 6]);
    }

    #[test]
    fn test_capacity_forces_flush() {
        let mut batch = batch(4);
        batch.begin();
        for _ in 0..10 {
            batch.draw(&sprite(1)).unwrap();
        }
        batch.end().unwrap();

        assert_eq!(batch.backend().draw_calls(), vec![24, 24, 12]);
        assert_eq!(batch.stats().capacity_flushes, 2);
    }

    #[test]
    fn test_exactly_full_batch_flushes_once_at_end() {
        let mut batch = batch(4);
        batch.begin();
        for _ in 0..4 {
            batch.draw(&sprite(1)).unwrap();
        }
        assert!(batch.backend().draw_calls().is_empty());
        batch.end().unwrap();

        assert_eq!(batch.backend().draw_calls(), vec![4 * VERTICES_PER_SPRITE]);
        assert_eq!(batch.stats().draw_calls, 1);
        assert_eq!(batch.stats().capacity_flushes, 0);
    }

    #[test]
    fn test_from_config_compiles_shader_and_sets_capacity() {
        let config = BatchConfig { max_sprites: 3 };
        let batch =
            SpriteBatch::from_config(RecordingBackend::default(), &ShaderConfig::default(), &config).unwrap();

        assert_eq!(batch.max_sprites(), 3);
        assert_eq!(batch.backend().calls.first(), Some(&BackendCall::CompileShader));
        assert!(batch
            .backend()
            .calls
            .contains(&BackendCall::SetUniform(uniforms::TEXTURE.to_string())));
    }

    #[test]
    fn test_empty_flush_is_noop() {
        let mut batch = batch(10);
        let calls_before = batch.backend().calls.len();
        batch.begin();
        batch.flush().unwrap();
        batch.end().unwrap();
        assert_eq!(batch.backend().calls.len(), calls_before);
    }

    #[test]
    fn test_quad_vertices_and_uvs() {
        let mut batch = batch(10);
        let texture = Texture::new(TextureId(7), 64, 64);
        let region = TextureRegion::from_pixels(texture, 16, 0, 16, 32);
        let quad = Sprite::new(texture, Vec3::new(10.0, 20.0, 0.5), Vec2::new(4.0, 8.0))
            .with_region(region)
            .with_color(Vec4::new(1.0, 0.5, 0.25, 1.0));

        batch.begin();
        batch.draw(&quad).unwrap();
        batch.end().unwrap();

        let v = &batch.backend().uploaded;
        assert_eq!(v.len(), 6);
        assert_eq!(v[0].position, [10.0, 20.0, 0.5]);
        assert_eq!(v[4].position, [14.0, 28.0, 0.5]);
        assert_eq!(v[0].uv, [0.25, 0.0]);
        assert_eq!(v[4].uv, [0.5, 0.5]);
        assert_eq!(v[2].uv, [0.25, 0.5]);
        assert_eq!(v[5].color, [1.0, 0.5, 0.25, 1.0]);
    }

    #[test]
    fn test_rotation_pivots_on_centre() {
        let mut batch = batch(10);
        let quad = sprite(1).with_rotation(constants::PI);
        batch.begin();
        batch.draw(&quad).unwrap();
        batch.end().unwrap();

        // a half turn about the centre swaps opposite corners
        let v = &batch.backend().uploaded;
        assert_relative_eq!(v[0].position[0], 16.0, epsilon = 1e-4);
        assert_relative_eq!(v[0].position[1], 16.0, epsilon = 1e-4);
        assert_relative_eq!(v[4].position[0], 0.0, epsilon = 1e-4);
        assert_relative_eq!(v[4].position[1], 0.0, epsilon = 1e-4);
    }

    #[test]
    fn test_view_change_flushes_pending() {
        let mut batch = batch(10);
        batch.begin();
        batch.draw(&sprite(1)).unwrap();
        SpriteRenderer::set_view_matrix(&mut batch, &Mat4::identity()).unwrap();

        assert_eq!(batch.pending_sprites(), 0);
        assert!(batch
            .backend()
            .calls
            .contains(&BackendCall::SetUniform(uniforms::VIEW.to_string())));
    }
}
