use glam::{Quat, Vec3};
use serde::{Deserialize, Serialize};

/// World placement of an agent's root: where it is and which way it faces.
///
/// Local axes follow the usual game convention: +X right, +Y up, +Z forward.
/// Control schemes mutate the pose directly; the simulation writes it back
/// to the scene after each agent update.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Pose {
    pub position: Vec3,
    pub rotation: Quat,
}

impl Default for Pose {
    fn default() -> Self {
        Self::new(Vec3::ZERO)
    }
}

impl Pose {
    pub fn new(position: Vec3) -> Self {
        Self {
            position,
            rotation: Quat::IDENTITY,
        }
    }

    pub fn with_rotation(position: Vec3, rotation: Quat) -> Self {
        Self { position, rotation }
    }

    pub fn forward(&self) -> Vec3 {
        self.rotation * Vec3::Z
    }

    pub fn right(&self) -> Vec3 {
        self.rotation * Vec3::X
    }

    pub fn up(&self) -> Vec3 {
        self.rotation * Vec3::Y
    }

    pub fn transform_point(&self, local: Vec3) -> Vec3 {
        self.position + self.rotation * local
    }

    pub fn transform_vector(&self, local: Vec3) -> Vec3 {
        self.rotation * local
    }

    pub fn inverse_transform_point(&self, world: Vec3) -> Vec3 {
        self.rotation.inverse() * (world - self.position)
    }

    pub fn inverse_transform_vector(&self, world: Vec3) -> Vec3 {
        self.rotation.inverse() * world
    }

    /// Rotates the pose by `degrees` around `axis` passing through `pivot`.
    /// A zero axis leaves the pose untouched.
    pub fn rotate_around(&mut self, pivot: Vec3, axis: Vec3, degrees: f32) {
        let Some(axis) = axis.try_normalize() else {
            return;
        };
        let q = Quat::from_axis_angle(axis, degrees.to_radians());
        self.position = pivot + q * (self.position - pivot);
        self.rotation = (q * self.rotation).normalize();
    }
}

/// Axis-aligned bounds in world space (the "scoped bounds" of an agent).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Aabb {
    pub center: Vec3,
    pub extents: Vec3,
}

impl Aabb {
    pub fn from_min_max(min: Vec3, max: Vec3) -> Self {
        Self {
            center: (min + max) * 0.5,
            extents: (max - min) * 0.5,
        }
    }

    pub fn min(&self) -> Vec3 {
        self.center - self.extents
    }

    pub fn max(&self) -> Vec3 {
        self.center + self.extents
    }

    /// Grows the bounds to include `other`.
    pub fn union(&self, other: &Aabb) -> Aabb {
        Aabb::from_min_max(self.min().min(other.min()), self.max().max(other.max()))
    }

    /// Centre of the bottom face, the ground anchor of a body.
    pub fn bottom_center(&self) -> Vec3 {
        Vec3::new(self.center.x, self.min().y, self.center.z)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rotate_around_pivot_moves_position() {
        let mut pose = Pose::new(Vec3::new(1.0, 0.0, 0.0));
        pose.rotate_around(Vec3::ZERO, Vec3::Y, 90.0);
        assert!(pose.position.abs_diff_eq(Vec3::new(0.0, 0.0, -1.0), 1e-5));
        assert!(pose.forward().abs_diff_eq(Vec3::X, 1e-5));
    }

    #[test]
    fn inverse_transform_round_trips_points() {
        let pose = Pose::with_rotation(Vec3::new(2.0, 1.0, -3.0), Quat::from_rotation_y(0.7));
        let local = Vec3::new(0.5, -0.25, 1.5);
        let back = pose.inverse_transform_point(pose.transform_point(local));
        assert!(back.abs_diff_eq(local, 1e-5));
    }

    #[test]
    fn aabb_union_and_bottom() {
        let a = Aabb::from_min_max(Vec3::ZERO, Vec3::ONE);
        let b = Aabb::from_min_max(Vec3::new(-1.0, 0.5, 0.0), Vec3::new(0.0, 2.0, 1.0));
        let u = a.union(&b);
        assert_eq!(u.min(), Vec3::new(-1.0, 0.0, 0.0));
        assert_eq!(u.max(), Vec3::new(1.0, 2.0, 1.0));
        assert_eq!(u.bottom_center(), Vec3::new(0.0, 0.0, 0.5));
    }
}
