//! Transform component
//!
//! Every entity carries exactly one. World-space values are composed down the
//! parent chain additively: positions and rotations add, scales multiply
//! component-wise. Parent rotation does not rotate a child's offset; the
//! render matrix is built from the composed values so both paths agree.

use crate::foundation::math::{trs_2d, Mat4, Vec2, Vec3};

/// Local placement of an entity relative to its parent
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    /// Local position; `z` is only used for layering
    pub position: Vec3,
    /// Local rotation in radians
    pub rotation: f32,
    /// Local non-uniform scale
    pub scale: Vec2,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Vec3::zeros(),
            rotation: 0.0,
            scale: Vec2::new(1.0, 1.0),
        }
    }
}

impl Transform {
    /// Identity transform at `position`
    pub fn from_position(position: Vec3) -> Self {
        Self {
            position,
            ..Default::default()
        }
    }

    /// Set the local position
    pub fn set_position(&mut self, position: Vec3) {
        self.position = position;
    }

    /// Set x/y and keep the layer depth
    pub fn set_position_2d(&mut self, x: f32, y: f32) {
        self.position.x = x;
        self.position.y = y;
    }

    /// Set the local rotation in radians
    pub fn set_rotation(&mut self, rotation: f32) {
        self.rotation = rotation;
    }

    /// Set the local scale
    pub fn set_scale(&mut self, scale: Vec2) {
        self.scale = scale;
    }

    /// Same scale on both axes
    pub fn set_uniform_scale(&mut self, scale: f32) {
        self.scale = Vec2::new(scale, scale);
    }

    /// Move by `offset`
    pub fn translate(&mut self, offset: Vec3) {
        self.position += offset;
    }

    /// Move on the x/y plane
    pub fn translate_2d(&mut self, dx: f32, dy: f32) {
        self.position.x += dx;
        self.position.y += dy;
    }

    /// Rotate by `delta` radians
    pub fn rotate(&mut self, delta: f32) {
        self.rotation += delta;
    }

    /// Local TRS matrix
    pub fn model_matrix(&self) -> Mat4 {
        trs_2d(&self.position, self.rotation, &self.scale)
    }
}

/// Composed world-space placement
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WorldTransform {
    /// World position
    pub position: Vec3,
    /// World rotation in radians
    pub rotation: f32,
    /// World scale
    pub scale: Vec2,
}

impl Default for WorldTransform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl WorldTransform {
    /// Placement of the world origin
    pub const IDENTITY: Self = Self {
        position: Vec3::new(0.0, 0.0, 0.0),
        rotation: 0.0,
        scale: Vec2::new(1.0, 1.0),
    };

    /// Place a child transform under this one
    pub fn compose(&self, local: &Transform) -> Self {
        Self {
            position: self.position + local.position,
            rotation: self.rotation + local.rotation,
            scale: self.scale.component_mul(&local.scale),
        }
    }

    /// TRS matrix of the composed values
    pub fn matrix(&self) -> Mat4 {
        trs_2d(&self.position, self.rotation, &self.scale)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_setters() {
        let mut transform = Transform::default();
        transform.set_position(Vec3::new(1.0, 2.0, 3.0));
        transform.set_position_2d(4.0, 5.0);
        assert_eq!(transform.position, Vec3::new(4.0, 5.0, 3.0));

        transform.translate_2d(1.0, -1.0);
        transform.translate(Vec3::new(0.0, 0.0, 1.0));
        assert_eq!(transform.position, Vec3::new(5.0, 4.0, 4.0));

        transform.set_rotation(0.5);
        transform.rotate(0.25);
        assert_relative_eq!(transform.rotation, 0.75);

        transform.set_uniform_scale(2.0);
        assert_eq!(transform.scale, Vec2::new(2.0, 2.0));
    }

    #[test]
    fn test_composition_is_additive() {
        let parent = WorldTransform::IDENTITY.compose(&Transform {
            position: Vec3::new(5.0, 5.0, 0.0),
            rotation: 1.0,
            scale: Vec2::new(2.0, 3.0),
        });
        let child = parent.compose(&Transform {
            position: Vec3::new(10.0, 0.0, 0.0),
            rotation: 0.5,
            scale: Vec2::new(0.5, 2.0),
        });

        // parent rotation does not swing the child offset
        assert_relative_eq!(child.position, Vec3::new(15.0, 5.0, 0.0));
        assert_relative_eq!(child.rotation, 1.5);
        assert_relative_eq!(child.scale, Vec2::new(1.0, 6.0));
    }

    #[test]
    fn test_matrix_uses_composed_position() {
        let world = WorldTransform::IDENTITY.compose(&Transform::from_position(Vec3::new(3.0, 4.0, 0.0)));
        let m = world.matrix();
        assert_relative_eq!(m[(0, 3)], 3.0);
        assert_relative_eq!(m[(1, 3)], 4.0);
    }
}
