use glam::{Quat, Vec3};

use crate::components::Collider;

/// Distance along the unit ray `dir` to the first surface of `collider`
/// placed at `center` with `rotation`.
///
/// Rays that start inside a collider do not hit it, and hits behind the
/// origin are ignored.
pub fn ray_collider(
    origin: Vec3,
    dir: Vec3,
    collider: &Collider,
    center: Vec3,
    rotation: Quat,
) -> Option<f32> {
    match *collider {
        Collider::Sphere { radius } => ray_sphere_intersection(origin, dir, center, radius),
        Collider::Box { half_extents } => {
            // Solve in the box frame, where it is axis aligned at the origin.
            let inv = rotation.inverse();
            ray_aabb_intersection(inv * (origin - center), inv * dir, half_extents)
        }
        Collider::Plane { normal, offset } => ray_plane_intersection(origin, dir, normal, offset),
    }
}

fn ray_sphere_intersection(origin: Vec3, dir: Vec3, center: Vec3, radius: f32) -> Option<f32> {
    let oc = origin - center;
    let c = oc.dot(oc) - radius * radius;
    if c < 0.0 {
        return None;
    }
    let a = dir.dot(dir);
    let b = 2.0 * oc.dot(dir);
    let discriminant = b * b - 4.0 * a * c;

    if discriminant < 0.0 {
        return None;
    }

    let t = (-b - discriminant.sqrt()) / (2.0 * a);
    if t >= 0.0 {
        Some(t)
    } else {
        None
    }
}

fn ray_aabb_intersection(origin: Vec3, dir: Vec3, half: Vec3) -> Option<f32> {
    let mut tmin = f32::NEG_INFINITY;
    let mut tmax = f32::INFINITY;

    for axis in 0..3 {
        let o = origin[axis];
        let d = dir[axis];
        let (lo, hi) = (-half[axis], half[axis]);
        if d.abs() < 1e-8 {
            // Parallel to this slab: must already be between its faces.
            if o < lo || o > hi {
                return None;
            }
            continue;
        }
        let inv = 1.0 / d;
        let t1 = (lo - o) * inv;
        let t2 = (hi - o) * inv;
        tmin = tmin.max(t1.min(t2));
        tmax = tmax.min(t1.max(t2));
    }

    if tmax < 0.0 || tmin > tmax {
        return None;
    }
    // Origin inside the box.
    if tmin < 0.0 {
        return None;
    }
    Some(tmin)
}

fn ray_plane_intersection(origin: Vec3, dir: Vec3, normal: Vec3, offset: f32) -> Option<f32> {
    let denom = dir.dot(normal);
    let height = origin.dot(normal) - offset;
    // Only the front face is solid from outside.
    if denom >= 0.0 || height < 0.0 {
        return None;
    }
    Some(-height / denom)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn downward_ray_hits_floor_plane() {
        let floor = Collider::Plane {
            normal: Vec3::Y,
            offset: 0.0,
        };
        let t = ray_collider(Vec3::new(3.0, 1.5, -2.0), -Vec3::Y, &floor, Vec3::ZERO, Quat::IDENTITY);
        assert_eq!(t, Some(1.5));
    }

    #[test]
    fn ray_hits_box_top_face() {
        let brick = Collider::Box {
            half_extents: Vec3::new(1.0, 0.5, 1.0),
        };
        let t = ray_collider(
            Vec3::new(0.0, 2.0, 0.0),
            -Vec3::Y,
            &brick,
            Vec3::new(0.0, 0.5, 0.0),
            Quat::IDENTITY,
        )
        .unwrap();
        assert!((t - 1.0).abs() < 1e-5);
    }

    #[test]
    fn ray_starting_inside_is_ignored() {
        let ball = Collider::Sphere { radius: 1.0 };
        assert!(ray_collider(Vec3::ZERO, Vec3::X, &ball, Vec3::ZERO, Quat::IDENTITY).is_none());
        let brick = Collider::Box {
            half_extents: Vec3::ONE,
        };
        assert!(ray_collider(Vec3::ZERO, Vec3::X, &brick, Vec3::ZERO, Quat::IDENTITY).is_none());
    }

    #[test]
    fn rotated_box_uses_its_frame() {
        let plank = Collider::Box {
            half_extents: Vec3::new(2.0, 0.1, 0.1),
        };
        // Rotated 90 degrees the plank runs along Z instead of X.
        let rotation = Quat::from_rotation_y(90f32.to_radians());
        let miss = ray_collider(Vec3::new(1.5, 1.0, 0.0), -Vec3::Y, &plank, Vec3::ZERO, rotation);
        assert!(miss.is_none());
        let hit = ray_collider(Vec3::new(0.0, 1.0, 1.5), -Vec3::Y, &plank, Vec3::ZERO, rotation);
        assert!((hit.unwrap() - 0.9).abs() < 1e-5);
    }
}
