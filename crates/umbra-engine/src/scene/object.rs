use glam::{Mat4, Vec3, Vec4};

/// Vertical bounce motion carried by animated spheres.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Bounce {
    /// Displacement applied to `position.y` per step.
    pub velocity: f32,
}

impl Bounce {
    /// One explicit Euler step.
    ///
    /// The position is moved first; the velocity flips once the new height
    /// leaves `[-limit, limit]`. No clamping is applied, so the object may
    /// overshoot the limit by up to one step.
    pub fn step(&mut self, y: &mut f32, limit: f32) {
        *y += self.velocity;
        if *y < -limit || *y > limit {
            self.velocity = -self.velocity;
        }
    }
}

/// One slot of the instance pool.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct SceneObject {
    pub position: Vec3,
    /// Euler angles in radians, applied X then Y then Z.
    pub rotation: Vec3,
    pub scale: Vec3,
    pub color: Vec4,
    /// `None` for static geometry.
    pub bounce: Option<Bounce>,
}

impl SceneObject {
    pub fn fixed(position: Vec3, rotation: Vec3, scale: Vec3, color: Vec4) -> Self {
        Self {
            position,
            rotation,
            scale,
            color,
            bounce: None,
        }
    }

    /// Model matrix: `translation * rotX * rotY * rotZ * scale`.
    pub fn model_matrix(&self) -> Mat4 {
        Mat4::from_translation(self.position)
            * Mat4::from_rotation_x(self.rotation.x)
            * Mat4::from_rotation_y(self.rotation.y)
            * Mat4::from_rotation_z(self.rotation.z)
            * Mat4::from_scale(self.scale)
    }

    /// Advances the bounce integrator, if any.
    pub fn advance(&mut self, limit: f32) {
        if let Some(bounce) = self.bounce.as_mut() {
            bounce.step(&mut self.position.y, limit);
        }
    }
}
