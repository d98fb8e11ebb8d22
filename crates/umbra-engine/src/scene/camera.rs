use glam::{Mat4, Vec3};

/// Camera parameters. The camera is fixed; only the aspect ratio varies.
#[derive(Debug, Clone, PartialEq)]
pub struct CameraConfig {
    /// Vertical field of view in radians.
    pub fov_y: f32,
    pub near: f32,
    pub far: f32,
    pub eye: Vec3,
    pub target: Vec3,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            fov_y: 60f32.to_radians(),
            near: 0.1,
            far: 1000.0,
            eye: Vec3::new(0.0, 10.0, 20.0),
            target: Vec3::ZERO,
        }
    }
}

/// Camera view-projection for the current drawable size.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct CameraState {
    pub projection: Mat4,
    pub aspect: f32,
}

impl CameraState {
    /// Builds the camera for a drawable of `width x height` physical pixels.
    pub fn new(width: u32, height: u32, config: &CameraConfig) -> Self {
        let aspect = width.max(1) as f32 / height.max(1) as f32;
        let perspective = Mat4::perspective_rh(config.fov_y, aspect, config.near, config.far);
        let view = Mat4::look_at_rh(config.eye, config.target, Vec3::Y);

        Self {
            projection: perspective * view,
            aspect,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn aspect_tracks_size() {
        let cfg = CameraConfig::default();
        assert_eq!(CameraState::new(1600, 800, &cfg).aspect, 2.0);
        assert_eq!(CameraState::new(800, 800, &cfg).aspect, 1.0);
    }

    #[test]
    fn zero_height_does_not_divide_by_zero() {
        let cam = CameraState::new(640, 0, &CameraConfig::default());
        assert!(cam.aspect.is_finite());
        assert!(cam.projection.is_finite());
    }

    #[test]
    fn target_projects_to_screen_center() {
        let cam = CameraState::new(1280, 720, &CameraConfig::default());
        let p = cam.projection.project_point3(Vec3::ZERO);
        assert!(p.x.abs() < 1e-5 && p.y.abs() < 1e-5);
        assert!((0.0..=1.0).contains(&p.z));
    }

    #[test]
    fn resize_changes_projection() {
        let cfg = CameraConfig::default();
        assert_ne!(
            CameraState::new(1280, 720, &cfg).projection,
            CameraState::new(720, 1280, &cfg).projection
        );
    }
}
