//! Math utilities and types
//!
//! Provides the 2D-oriented math vocabulary used by sprites, cameras and
//! transforms. Everything is `f32` and column-major, matching `nalgebra`.

pub use nalgebra::{Matrix4, Vector2, Vector3, Vector4};

/// 2D vector type
pub type Vec2 = Vector2<f32>;

/// 3D vector type
pub type Vec3 = Vector3<f32>;

/// 4D vector type (also used for RGBA colors)
pub type Vec4 = Vector4<f32>;

/// 4x4 matrix type
pub type Mat4 = Matrix4<f32>;

/// Translation matrix
pub fn translation(x: f32, y: f32, z: f32) -> Mat4 {
    Mat4::new_translation(&Vec3::new(x, y, z))
}

/// Rotation about the Z axis (radians, counter-clockwise)
pub fn rotation_z(angle: f32) -> Mat4 {
    Mat4::from_axis_angle(&Vec3::z_axis(), angle)
}

/// Non-uniform scale in X/Y, Z left untouched
pub fn scaling(x: f32, y: f32) -> Mat4 {
    Mat4::new_nonuniform_scaling(&Vec3::new(x, y, 1.0))
}

/// Translation, then optional Z rotation, then scale
///
/// The rotation factor is skipped entirely when `rotation` is zero.
pub fn trs_2d(position: &Vec3, rotation: f32, scale: &Vec2) -> Mat4 {
    let mut model = Mat4::new_translation(position);
    if rotation != 0.0 {
        model *= rotation_z(rotation);
    }
    model * scaling(scale.x, scale.y)
}

/// Orthographic projection for a screen-space coordinate system
///
/// `(0, 0)` is the top-left corner and `(width, height)` the bottom-right,
/// which is the layout sprite and camera math assume.
pub fn screen_orthographic(width: f32, height: f32) -> Mat4 {
    Mat4::new_orthographic(0.0, width, height, 0.0, -1.0, 1.0)
}

/// Rotate a 2D vector counter-clockwise by `angle` radians
pub fn rotate_2d(v: &Vec2, angle: f32) -> Vec2 {
    let (sin, cos) = angle.sin_cos();
    Vec2::new(v.x * cos - v.y * sin, v.x * sin + v.y * cos)
}

/// Math constants
pub mod constants {
    /// Pi constant
    pub const PI: f32 = std::f32::consts::PI;

    /// 2 * Pi
    pub const TAU: f32 = 2.0 * PI;

    /// Pi / 2
    pub const HALF_PI: f32 = PI * 0.5;

    /// Degrees to radians conversion factor
    pub const DEG_TO_RAD: f32 = PI / 180.0;

    /// Radians to degrees conversion factor
    pub const RAD_TO_DEG: f32 = 180.0 / PI;
}

/// Math utility functions
pub mod utils {
    use super::constants;

    /// Convert degrees to radians
    pub fn deg_to_rad(degrees: f32) -> f32 {
        degrees * constants::DEG_TO_RAD
    }

    /// Convert radians to degrees
    pub fn rad_to_deg(radians: f32) -> f32 {
        radians * constants::RAD_TO_DEG
    }

    /// Linear interpolation
    pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
        a + (b - a) * t
    }
}
