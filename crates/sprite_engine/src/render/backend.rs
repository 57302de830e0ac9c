//! GPU backend boundary
//!
//! Everything that touches a graphics API sits behind [`RenderBackend`]. The
//! engine builds vertex data and decides when to draw; the backend uploads,
//! binds and issues the calls.

use super::batch_renderer::SpriteVertex;
use super::shader::{ShaderHandle, Uniform};
use super::texture::Texture;
use super::RenderResult;
use crate::assets::ImageData;
use crate::core::config::ShaderConfig;

/// Graphics primitives the sprite pipeline consumes
pub trait RenderBackend {
    /// Upload decoded pixels and return a texture handle
    fn create_texture(&mut self, image: &ImageData) -> RenderResult<Texture>;

    /// Compile and link a shader program from source files
    fn compile_shader(&mut self, config: &ShaderConfig) -> RenderResult<ShaderHandle>;

    /// Make a shader program current
    fn use_shader(&mut self, shader: ShaderHandle) -> RenderResult<()>;

    /// Set a named uniform on a program
    fn set_uniform(&mut self, shader: ShaderHandle, name: &str, value: &Uniform) -> RenderResult<()>;

    /// Replace the contents of the streaming vertex buffer
    fn upload_vertices(&mut self, vertices: &[SpriteVertex]) -> RenderResult<()>;

    /// Bind a texture to a sampler unit
    fn bind_texture(&mut self, texture: &Texture, unit: u32) -> RenderResult<()>;

    /// Draw `vertex_count` vertices from the uploaded buffer as a triangle list
    fn draw_triangles(&mut self, vertex_count: usize) -> RenderResult<()>;
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;
    use crate::render::texture::TextureId;

    /// One recorded backend call
    #[derive(Debug, Clone, PartialEq)]
    pub enum BackendCall {
        CreateTexture(TextureId),
        CompileShader,
        UseShader(ShaderHandle),
        SetUniform(String),
        Upload(usize),
        BindTexture(TextureId),
        Draw(usize),
    }

    /// Backend that only remembers what it was asked to do
    #[derive(Debug, Default)]
    pub struct RecordingBackend {
        pub calls: Vec<BackendCall>,
        pub uploaded: Vec<SpriteVertex>,
        next_texture: u32,
    }

    impl RecordingBackend {
        pub fn draw_calls(&self) -> Vec<usize> {
            self.calls
                .iter()
                .filter_map(|call| match call {
                    BackendCall::Draw(count) => Some(*count),
                    _ => None,
                })
                .collect()
        }

        pub fn bound_textures(&self) -> Vec<TextureId> {
            self.calls
                .iter()
                .filter_map(|call| match call {
                    BackendCall::BindTexture(id) => Some(*id),
                    _ => None,
                })
                .collect()
        }
    }

    impl RenderBackend for RecordingBackend {
        fn create_texture(&mut self, image: &ImageData) -> RenderResult<Texture> {
            self.next_texture += 1;
            let id = TextureId(self.next_texture);
            self.calls.push(BackendCall::CreateTexture(id));
            Ok(Texture::new(id, image.width, image.height))
        }

        fn compile_shader(&mut self, _config: &ShaderConfig) -> RenderResult<ShaderHandle> {
            self.calls.push(BackendCall::CompileShader);
            Ok(ShaderHandle(1))
        }

        fn use_shader(&mut self, shader: ShaderHandle) -> RenderResult<()> {
            self.calls.push(BackendCall::UseShader(shader));
            Ok(())
        }

        fn set_uniform(&mut self, _shader: ShaderHandle, name: &str, _value: &Uniform) -> RenderResult<()> {
            self.calls.push(BackendCall::SetUniform(name.to_string()));
            Ok(())
        }

        fn upload_vertices(&mut self, vertices: &[SpriteVertex]) -> RenderResult<()> {
            self.calls.push(BackendCall::Upload(vertices.len()));
            self.uploaded = vertices.to_vec();
            Ok(())
        }

        fn bind_texture(&mut self, texture: &Texture, _unit: u32) -> RenderResult<()> {
            self.calls.push(BackendCall::BindTexture(texture.id()));
            Ok(())
        }

        fn draw_triangles(&mut self, vertex_count: usize) -> RenderResult<()> {
            self.calls.push(BackendCall::Draw(vertex_count));
            Ok(())
        }
    }
}
