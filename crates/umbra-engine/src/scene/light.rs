use glam::{Mat4, Vec3};

/// Light orbit and shadow frustum parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct LightConfig {
    /// Horizontal orbit radius around the origin.
    pub orbit_radius: f32,
    /// Milliseconds per radian of orbit.
    pub orbit_period_ms: f64,
    /// Fixed light height.
    pub height: f32,
    /// Orthographic half extent on x and y.
    pub half_extent: f32,
    pub near: f32,
    pub far: f32,
}

impl Default for LightConfig {
    fn default() -> Self {
        Self {
            orbit_radius: 50.0,
            orbit_period_ms: 1500.0,
            height: 100.0,
            half_extent: 40.0,
            near: -50.0,
            far: 200.0,
        }
    }
}

/// Per-frame light state.
///
/// `view_projection` is the single matrix used both to render the shadow map
/// and to project fragments into it for the depth comparison.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct LightState {
    pub position: Vec3,
    pub view: Mat4,
    pub projection: Mat4,
    pub view_projection: Mat4,
}

impl LightState {
    /// Light state at `elapsed_ms` milliseconds after start.
    pub fn at(elapsed_ms: f64, config: &LightConfig) -> Self {
        let phase = elapsed_ms / config.orbit_period_ms;
        let position = Vec3::new(
            (phase.sin() * config.orbit_radius as f64) as f32,
            config.height,
            (phase.cos() * config.orbit_radius as f64) as f32,
        );

        let view = Mat4::look_at_rh(position, Vec3::ZERO, Vec3::Y);
        let e = config.half_extent;
        let projection = Mat4::orthographic_rh(-e, e, -e, e, config.near, config.far);

        Self {
            position,
            view,
            projection,
            view_projection: projection * view,
        }
    }

    /// Recomputes the state in place for a new timestamp.
    pub fn update(&mut self, elapsed_ms: f64, config: &LightConfig) {
        *self = Self::at(elapsed_ms, config);
    }
}
