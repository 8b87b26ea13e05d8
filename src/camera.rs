use glam::Vec3;

/// The view the player steers relative to.
///
/// Only its orientation matters to the control schemes: camera-relative
/// movement reads `forward`/`right` flattened onto the ground plane, and
/// strafe rotation turns the agent to match `forward`.
#[derive(Debug, Clone)]
pub struct Camera {
    pub position: Vec3,
    /// Degrees around world up; 90.0 looks down +Z.
    pub yaw: f32,
    /// Degrees above the horizon.
    pub pitch: f32,
}

impl Default for Camera {
    fn default() -> Self {
        Self::new()
    }
}

impl Camera {
    pub fn new() -> Self {
        Self {
            position: Vec3::new(0.0, 6.0, -10.0),
            yaw: 90.0,
            pitch: -20.0,
        }
    }

    pub fn forward(&self) -> Vec3 {
        let yaw_rad = self.yaw.to_radians();
        let pitch_rad = self.pitch.to_radians();
        Vec3::new(
            yaw_rad.cos() * pitch_rad.cos(),
            pitch_rad.sin(),
            yaw_rad.sin() * pitch_rad.cos(),
        )
        .normalize()
    }

    pub fn right(&self) -> Vec3 {
        Vec3::Y.cross(self.forward()).normalize_or_zero()
    }

    /// Keeps the camera behind `target` at `distance`, looking along `forward`.
    pub fn follow(&mut self, target: Vec3, distance: f32, height: f32) {
        let back = crate::math::flatten(self.forward()).normalize_or_zero();
        self.position = target - back * distance + Vec3::Y * height;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn level_camera_axes() {
        let camera = Camera {
            pitch: 0.0,
            ..Camera::new()
        };
        assert!(camera.forward().abs_diff_eq(Vec3::Z, 1e-5));
        assert!(camera.right().abs_diff_eq(Vec3::X, 1e-5));
    }
}
