//! 2D camera
//!
//! The camera position is the world point shown at the centre of the
//! viewport. Zoom scales world units to pixels; rotation turns the world
//! around that centre.

use crate::config::ConfigError;
use crate::core::config::CameraConfig;
use crate::foundation::math::{rotate_2d, rotation_z, scaling, translation, Mat4, Vec2};

/// Default zoom limits
pub const DEFAULT_MIN_ZOOM: f32 = 0.1;
/// Default zoom limits
pub const DEFAULT_MAX_ZOOM: f32 = 10.0;

/// Axis-aligned world rectangle the view must stay inside
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraBounds {
    /// Lower-left corner
    pub min: Vec2,
    /// Upper-right corner
    pub max: Vec2,
}

/// 2D camera with zoom, rotation, bounds and a follow target
#[derive(Debug, Clone, PartialEq)]
pub struct Camera2D {
    position: Vec2,
    viewport: Vec2,
    zoom: f32,
    min_zoom: f32,
    max_zoom: f32,
    rotation: f32,
    bounds: Option<CameraBounds>,
    target: Option<Vec2>,
}

impl Camera2D {
    /// Camera over a `width` × `height` viewport, centred on the origin
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            position: Vec2::zeros(),
            viewport: Vec2::new(width, height),
            zoom: 1.0,
            min_zoom: DEFAULT_MIN_ZOOM,
            max_zoom: DEFAULT_MAX_ZOOM,
            rotation: 0.0,
            bounds: None,
            target: None,
        }
    }

    /// Camera built from the viewport, zoom range and optional bounds in `config`
    ///
    /// # Errors
    /// Fails when the viewport, zoom range or bounds are invalid.
    pub fn from_config(config: &CameraConfig) -> Result<Self, ConfigError> {
        config.validate().map_err(ConfigError::Invalid)?;
        let mut camera = Self::new(config.viewport_width, config.viewport_height)
            .with_zoom_range(config.min_zoom, config.max_zoom)?;
        if let Some([min_x, min_y, max_x, max_y]) = config.bounds {
            camera.set_bounds(min_x, min_y, max_x, max_y)?;
        }
        Ok(camera)
    }

    /// Replace the zoom limits
    ///
    /// # Errors
    /// Fails unless `0 < min <= max`.
    pub fn with_zoom_range(mut self, min: f32, max: f32) -> Result<Self, ConfigError> {
        if !(min > 0.0 && min <= max) {
            return Err(ConfigError::Invalid(format!(
                "camera zoom range must satisfy 0 < min <= max, got [{min}, {max}]"
            )));
        }
        self.min_zoom = min;
        self.max_zoom = max;
        self.zoom = self.zoom.clamp(min, max);
        self.clamp_to_bounds();
        Ok(self)
    }

    /// View centre in world space
    pub fn position(&self) -> Vec2 {
        self.position
    }

    /// Move the view centre
    pub fn set_position(&mut self, position: Vec2) {
        self.position = position;
        self.clamp_to_bounds();
    }

    /// Move the view centre by an offset
    pub fn translate(&mut self, offset: Vec2) {
        self.set_position(self.position + offset);
    }

    /// Current zoom
    pub fn zoom(&self) -> f32 {
        self.zoom
    }

    /// Zoom limits as `(min, max)`
    pub fn zoom_range(&self) -> (f32, f32) {
        (self.min_zoom, self.max_zoom)
    }

    /// Set the zoom, clamped into the configured range
    pub fn set_zoom(&mut self, zoom: f32) {
        if zoom.is_nan() {
            return;
        }
        self.zoom = zoom.clamp(self.min_zoom, self.max_zoom);
        self.clamp_to_bounds();
    }

    /// Rotation in radians
    pub fn rotation(&self) -> f32 {
        self.rotation
    }

    /// Set the rotation
    pub fn set_rotation(&mut self, rotation: f32) {
        self.rotation = rotation;
    }

    /// Rotate by a delta
    pub fn rotate(&mut self, delta: f32) {
        self.rotation += delta;
    }

    /// Viewport size in pixels
    pub fn viewport_size(&self) -> Vec2 {
        self.viewport
    }

    /// Resize the viewport (e.g. after a window resize)
    pub fn set_viewport_size(&mut self, width: f32, height: f32) {
        self.viewport = Vec2::new(width, height);
        self.clamp_to_bounds();
    }

    /// Restrict the view to a world rectangle and clamp immediately
    ///
    /// # Errors
    /// Fails when the rectangle is empty or inverted on either axis.
    pub fn set_bounds(&mut self, min_x: f32, min_y: f32, max_x: f32, max_y: f32) -> Result<(), ConfigError> {
        if !(min_x < max_x && min_y < max_y) {
            return Err(ConfigError::Invalid(format!(
                "camera bounds are empty: ({min_x}, {min_y}) .. ({max_x}, {max_y})"
            )));
        }
        self.bounds = Some(CameraBounds {
            min: Vec2::new(min_x, min_y),
            max: Vec2::new(max_x, max_y),
        });
        self.clamp_to_bounds();
        Ok(())
    }

    /// Active bounds, if any
    pub fn bounds(&self) -> Option<CameraBounds> {
        self.bounds
    }

    /// Stop restricting the view
    pub fn disable_bounds(&mut self) {
        self.bounds = None;
    }

    /// Half the visible world extent on each axis
    pub fn visible_half_extents(&self) -> Vec2 {
        self.viewport / self.zoom * 0.5
    }

    /// Keep the visible rectangle inside the bounds
    ///
    /// An axis where the view is at least as large as the bounds is left
    /// alone; clamping there would make the camera jitter between edges.
    pub fn clamp_to_bounds(&mut self) {
        let Some(bounds) = self.bounds else {
            return;
        };
        let half = self.visible_half_extents();

        let lo_x = bounds.min.x + half.x;
        let hi_x = bounds.max.x - half.x;
        if lo_x < hi_x {
            self.position.x = self.position.x.clamp(lo_x, hi_x);
        }

        let lo_y = bounds.min.y + half.y;
        let hi_y = bounds.max.y - half.y;
        if lo_y < hi_y {
            self.position.y = self.position.y.clamp(lo_y, hi_y);
        }
    }

    /// Follow a world position on each `update`
    pub fn set_target(&mut self, target: Vec2) {
        self.target = Some(target);
    }

    /// Stop following
    pub fn clear_target(&mut self) {
        self.target = None;
    }

    /// Current follow target
    pub fn target(&self) -> Option<Vec2> {
        self.target
    }

    /// Snap to the follow target (if any) and re-apply bounds
    pub fn update(&mut self, _dt: f32) {
        if let Some(target) = self.target {
            self.position = target;
        }
        self.clamp_to_bounds();
    }

    /// World → view transform
    ///
    /// Applied right to left: move the camera position to the origin, rotate,
    /// zoom, then shift the origin to the viewport centre.
    pub fn view_matrix(&self) -> Mat4 {
        let mut view = translation(self.viewport.x * 0.5, self.viewport.y * 0.5, 0.0)
            * scaling(self.zoom, self.zoom);
        if self.rotation != 0.0 {
            view *= rotation_z(self.rotation);
        }
        view * translation(-self.position.x, -self.position.y, 0.0)
    }

    /// Project a world point to screen pixels (same mapping as [`Self::view_matrix`])
    pub fn world_to_screen(&self, world: Vec2) -> Vec2 {
        let rotated = rotate_2d(&(world - self.position), self.rotation);
        rotated * self.zoom + self.viewport * 0.5
    }

    /// Inverse of [`Self::world_to_screen`]
    pub fn screen_to_world(&self, screen: Vec2) -> Vec2 {
        let local = (screen - self.viewport * 0.5) / self.zoom;
        self.position + rotate_2d(&local, -self.rotation)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use nalgebra::Point3;

    #[test]
    fn test_clamp_keeps_view_inside_bounds() {
        let mut camera = Camera2D::new(200.0, 100.0);
        camera.set_bounds(0.0, 0.0, 1000.0, 500.0).unwrap();
        camera.set_position(Vec2::new(-50.0, 900.0));
        assert_relative_eq!(camera.position().x, 100.0);
        assert_relative_eq!(camera.position().y, 450.0);

        camera.set_position(Vec2::new(400.0, 200.0));
        assert_relative_eq!(camera.position().x, 400.0);
        assert_relative_eq!(camera.position().y, 200.0);
    }

    #[test]
    fn test_clamp_skips_axis_when_view_exceeds_bounds() {
        let mut camera = Camera2D::new(200.0, 100.0);
        camera.set_position(Vec2::new(-500.0, -500.0));
        // x span 150 < visible 200; y span 1000 > visible 100
        camera.set_bounds(0.0, 0.0, 150.0, 1000.0).unwrap();
        assert_relative_eq!(camera.position().x, -500.0);
        assert_relative_eq!(camera.position().y, 50.0);
    }

    #[test]
    fn test_zoom_changes_visible_extent() {
        let mut camera = Camera2D::new(200.0, 100.0);
        camera.set_bounds(0.0, 0.0, 400.0, 400.0).unwrap();
        camera.set_zoom(2.0);
        camera.set_position(Vec2::zeros());
        assert_relative_eq!(camera.position().x, 50.0);
        assert_relative_eq!(camera.position().y, 25.0);
    }

    #[test]
    fn test_zoom_is_clamped_to_range() {
        let mut camera = Camera2D::new(100.0, 100.0);
        camera.set_zoom(50.0);
        assert_relative_eq!(camera.zoom(), DEFAULT_MAX_ZOOM);
        camera.set_zoom(0.0);
        assert_relative_eq!(camera.zoom(), DEFAULT_MIN_ZOOM);
    }

    #[test]
    fn test_invalid_ranges_are_rejected() {
        assert!(Camera2D::new(10.0, 10.0).with_zoom_range(0.0, 1.0).is_err());
        assert!(Camera2D::new(10.0, 10.0).with_zoom_range(2.0, 1.0).is_err());
        let mut camera = Camera2D::new(10.0, 10.0);
        assert!(camera.set_bounds(5.0, 0.0, 5.0, 10.0).is_err());
        assert!(camera.bounds().is_none());
    }

    #[test]
    fn test_from_config_applies_zoom_range_and_bounds() {
        let config = CameraConfig {
            viewport_width: 200.0,
            viewport_height: 100.0,
            min_zoom: 0.5,
            max_zoom: 2.0,
            bounds: Some([0.0, 0.0, 1000.0, 500.0]),
        };
        let mut camera = Camera2D::from_config(&config).unwrap();
        assert_eq!(camera.zoom_range(), (0.5, 2.0));
        assert_relative_eq!(camera.viewport_size().x, 200.0);

        camera.set_zoom(8.0);
        assert_relative_eq!(camera.zoom(), 2.0);
        camera.set_position(Vec2::new(-100.0, -100.0));
        assert_relative_eq!(camera.position().x, 50.0);
        assert_relative_eq!(camera.position().y, 25.0);

        let inverted = CameraConfig {
            bounds: Some([10.0, 0.0, 0.0, 10.0]),
            ..CameraConfig::default()
        };
        assert!(Camera2D::from_config(&inverted).is_err());
    }

    #[test]
    fn test_screen_world_round_trip() {
        let mut camera = Camera2D::new(800.0, 600.0);
        camera.set_position(Vec2::new(120.0, -40.0));
        camera.set_zoom(2.5);
        camera.set_rotation(0.6);

        let world = Vec2::new(37.0, 81.0);
        let back = camera.screen_to_world(camera.world_to_screen(world));
        assert_relative_eq!(back.x, world.x, epsilon = 1e-3);
        assert_relative_eq!(back.y, world.y, epsilon = 1e-3);

        let screen = Vec2::new(10.0, 590.0);
        let again = camera.world_to_screen(camera.screen_to_world(screen));
        assert_relative_eq!(again.x, screen.x, epsilon = 1e-3);
        assert_relative_eq!(again.y, screen.y, epsilon = 1e-3);
    }

    #[test]
    fn test_world_to_screen_matches_view_matrix() {
        let mut camera = Camera2D::new(640.0, 480.0);
        camera.set_position(Vec2::new(10.0, 20.0));
        camera.set_zoom(1.5);
        camera.set_rotation(-0.3);

        let world = Vec2::new(-12.0, 44.0);
        let via_matrix = camera.view_matrix().transform_point(&Point3::new(world.x, world.y, 0.0));
        let direct = camera.world_to_screen(world);
        assert_relative_eq!(via_matrix.x, direct.x, epsilon = 1e-3);
        assert_relative_eq!(via_matrix.y, direct.y, epsilon = 1e-3);
    }

    #[test]
    fn test_camera_centre_maps_to_viewport_centre() {
        let mut camera = Camera2D::new(640.0, 480.0);
        camera.set_position(Vec2::new(300.0, 300.0));
        let screen = camera.world_to_screen(Vec2::new(300.0, 300.0));
        assert_relative_eq!(screen.x, 320.0);
        assert_relative_eq!(screen.y, 240.0);
    }

    #[test]
    fn test_update_follows_target_within_bounds() {
        let mut camera = Camera2D::new(100.0, 100.0);
        camera.set_bounds(0.0, 0.0, 300.0, 300.0).unwrap();
        camera.set_target(Vec2::new(290.0, 120.0));
        camera.update(0.016);
        assert_relative_eq!(camera.position().x, 250.0);
        assert_relative_eq!(camera.position().y, 120.0);

        camera.clear_target();
        camera.update(0.016);
        assert_relative_eq!(camera.position().x, 250.0);
    }
}
