//! Shader handles and uniform values
//!
//! Compilation and binding are backend work. The engine only names uniforms
//! and hands typed values across the [`RenderBackend`] boundary.

use super::backend::RenderBackend;
use super::RenderResult;
use crate::foundation::math::{Mat4, Vec2, Vec3, Vec4};

/// Backend-assigned shader program identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ShaderHandle(pub u32);

/// A typed uniform value
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Uniform {
    /// `bool`
    Bool(bool),
    /// `int` / sampler unit
    Int(i32),
    /// `float`
    Float(f32),
    /// `vec2`
    Vec2(Vec2),
    /// `vec3`
    Vec3(Vec3),
    /// `vec4`
    Vec4(Vec4),
    /// `mat4`
    Mat4(Mat4),
}

/// Well-known uniform names used by the sprite pipeline
pub mod uniforms {
    /// Projection matrix
    pub const PROJECTION: &str = "projection";
    /// Camera view matrix
    pub const VIEW: &str = "view";
    /// Sampler bound to texture unit 0
    pub const TEXTURE: &str = "texture1";
}

/// A compiled shader program
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShaderProgram {
    handle: ShaderHandle,
}

impl ShaderProgram {
    /// Wrap a compiled program
    pub fn new(handle: ShaderHandle) -> Self {
        Self { handle }
    }

    /// Backend handle
    pub fn handle(&self) -> ShaderHandle {
        self.handle
    }

    /// Make this program current
    pub fn bind(&self, backend: &mut dyn RenderBackend) -> RenderResult<()> {
        backend.use_shader(self.handle)
    }

    /// Set any uniform by name
    pub fn set(&self, backend: &mut dyn RenderBackend, name: &str, value: Uniform) -> RenderResult<()> {
        backend.set_uniform(self.handle, name, &value)
    }

    /// Set a `bool` uniform
    pub fn set_bool(&self, backend: &mut dyn RenderBackend, name: &str, value: bool) -> RenderResult<()> {
        self.set(backend, name, Uniform::Bool(value))
    }

    /// Set an `int` uniform
    pub fn set_int(&self, backend: &mut dyn RenderBackend, name: &str, value: i32) -> RenderResult<()> {
        self.set(backend, name, Uniform::Int(value))
    }

    /// Set a `float` uniform
    pub fn set_float(&self, backend: &mut dyn RenderBackend, name: &str, value: f32) -> RenderResult<()> {
        self.set(backend, name, Uniform::Float(value))
    }

    /// Set a `vec2` uniform
    pub fn set_vec2(&self, backend: &mut dyn RenderBackend, name: &str, value: Vec2) -> RenderResult<()> {
        self.set(backend, name, Uniform::Vec2(value))
    }

    /// Set a `vec3` uniform
    pub fn set_vec3(&self, backend: &mut dyn RenderBackend, name: &str, value: Vec3) -> RenderResult<()> {
        self.set(backend, name, Uniform::Vec3(value))
    }

    /// Set a `vec4` uniform
    pub fn set_vec4(&self, backend: &mut dyn RenderBackend, name: &str, value: Vec4) -> RenderResult<()> {
        self.set(backend, name, Uniform::Vec4(value))
    }

    /// Set a `mat4` uniform
    pub fn set_mat4(&self, backend: &mut dyn RenderBackend, name: &str, value: &Mat4) -> RenderResult<()> {
        self.set(backend, name, Uniform::Mat4(*value))
    }
}
