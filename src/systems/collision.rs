use glam::{Quat, Vec3};

use crate::components::{Collider, Penetration};

/// A collider resolved to world space.
#[derive(Debug, Clone, Copy)]
pub struct Placed {
    pub collider: Collider,
    pub center: Vec3,
    pub rotation: Quat,
}

impl Placed {
    fn box_axes(&self) -> [Vec3; 3] {
        [
            self.rotation * Vec3::X,
            self.rotation * Vec3::Y,
            self.rotation * Vec3::Z,
        ]
    }

    /// World-space AABB as (min, max). Planes have no finite bounds.
    pub fn aabb(&self) -> Option<(Vec3, Vec3)> {
        match self.collider {
            Collider::Sphere { radius } => {
                Some((self.center - Vec3::splat(radius), self.center + Vec3::splat(radius)))
            }
            Collider::Box { half_extents } => {
                let axes = self.box_axes();
                let reach = Vec3::new(
                    projected_radius(half_extents, &axes, Vec3::X),
                    projected_radius(half_extents, &axes, Vec3::Y),
                    projected_radius(half_extents, &axes, Vec3::Z),
                );
                Some((self.center - reach, self.center + reach))
            }
            Collider::Plane { .. } => None,
        }
    }
}

/// Half-length of an oriented box projected onto `axis`.
fn projected_radius(half: Vec3, axes: &[Vec3; 3], axis: Vec3) -> f32 {
    half.x * axes[0].dot(axis).abs()
        + half.y * axes[1].dot(axis).abs()
        + half.z * axes[2].dot(axis).abs()
}

/// Whether a sphere at `point` with `radius` touches the collider.
pub fn sphere_overlaps(point: Vec3, radius: f32, other: &Placed) -> bool {
    match other.collider {
        Collider::Sphere { radius: r } => point.distance_squared(other.center) <= (radius + r).powi(2),
        Collider::Box { half_extents } => {
            let local = other.rotation.inverse() * (point - other.center);
            let closest = local.clamp(-half_extents, half_extents);
            local.distance_squared(closest) <= radius * radius
        }
        Collider::Plane { normal, offset } => point.dot(normal) - offset <= radius,
    }
}

/// Point on or inside the collider nearest to `point`.
pub fn closest_point(point: Vec3, other: &Placed) -> Vec3 {
    match other.collider {
        Collider::Sphere { radius } => {
            other.center + (point - other.center).clamp_length_max(radius)
        }
        Collider::Box { half_extents } => {
            let local = other.rotation.inverse() * (point - other.center);
            other.center + other.rotation * local.clamp(-half_extents, half_extents)
        }
        Collider::Plane { normal, offset } => {
            let height = point.dot(normal) - offset;
            point - normal * height.max(0.0)
        }
    }
}

/// Minimal translation direction that separates `a` from `b`.
/// The direction always points from `b` towards `a`.
pub fn penetration(a: &Placed, b: &Placed) -> Option<Penetration> {
    match (a.collider, b.collider) {
        (Collider::Sphere { radius: ra }, Collider::Sphere { radius: rb }) => {
            let diff = a.center - b.center;
            let dist = diff.length();
            let depth = ra + rb - dist;
            if depth <= 0.0 {
                return None;
            }
            let direction = if dist > 1e-6 { diff / dist } else { Vec3::Y };
            Some(Penetration { direction, depth })
        }
        (Collider::Sphere { radius }, Collider::Box { half_extents }) => {
            sphere_box(a.center, radius, b, half_extents)
        }
        (Collider::Box { half_extents }, Collider::Sphere { radius }) => {
            sphere_box(b.center, radius, a, half_extents).map(flip)
        }
        (Collider::Sphere { radius }, Collider::Plane { normal, offset }) => {
            let depth = radius - (a.center.dot(normal) - offset);
            (depth > 0.0).then_some(Penetration {
                direction: normal,
                depth,
            })
        }
        (Collider::Box { half_extents }, Collider::Plane { normal, offset }) => {
            let reach = projected_radius(half_extents, &a.box_axes(), normal);
            let depth = reach - (a.center.dot(normal) - offset);
            (depth > 0.0).then_some(Penetration {
                direction: normal,
                depth,
            })
        }
        (Collider::Plane { .. }, Collider::Sphere { .. } | Collider::Box { .. }) => {
            penetration(b, a).map(flip)
        }
        (Collider::Box { half_extents: ha }, Collider::Box { half_extents: hb }) => {
            box_box(a, ha, b, hb)
        }
        (Collider::Plane { .. }, Collider::Plane { .. }) => None,
    }
}

fn flip(p: Penetration) -> Penetration {
    Penetration {
        direction: -p.direction,
        depth: p.depth,
    }
}

/// Direction points from the box towards the sphere.
fn sphere_box(center: Vec3, radius: f32, b: &Placed, half: Vec3) -> Option<Penetration> {
    let local = b.rotation.inverse() * (center - b.center);
    let closest = local.clamp(-half, half);
    let diff = local - closest;
    let dist = diff.length();

    if dist > 1e-6 {
        let depth = radius - dist;
        return (depth > 0.0).then(|| Penetration {
            direction: b.rotation * (diff / dist),
            depth,
        });
    }

    // Centre inside the box: leave through the nearest face.
    let face_gap = half - local.abs();
    let (axis, gap) = if face_gap.x <= face_gap.y && face_gap.x <= face_gap.z {
        (0, face_gap.x)
    } else if face_gap.y <= face_gap.z {
        (1, face_gap.y)
    } else {
        (2, face_gap.z)
    };
    let mut normal = Vec3::ZERO;
    normal[axis] = if local[axis] >= 0.0 { 1.0 } else { -1.0 };
    Some(Penetration {
        direction: b.rotation * normal,
        depth: gap + radius,
    })
}

/// Separating-axis test between two oriented boxes; direction points from b to a.
fn box_box(a: &Placed, ha: Vec3, b: &Placed, hb: Vec3) -> Option<Penetration> {
    let axes_a = a.box_axes();
    let axes_b = b.box_axes();
    let offset = a.center - b.center;

    let mut candidates: Vec<Vec3> = Vec::with_capacity(15);
    candidates.extend_from_slice(&axes_a);
    candidates.extend_from_slice(&axes_b);
    for ea in &axes_a {
        for eb in &axes_b {
            if let Some(axis) = ea.cross(*eb).try_normalize() {
                candidates.push(axis);
            }
        }
    }

    let mut best: Option<Penetration> = None;
    for axis in candidates {
        let ra = projected_radius(ha, &axes_a, axis);
        let rb = projected_radius(hb, &axes_b, axis);
        let along = offset.dot(axis);
        let depth = ra + rb - along.abs();
        if depth <= 0.0 {
            return None;
        }
        if best.map_or(true, |p| depth < p.depth) {
            let direction = if along >= 0.0 { axis } else { -axis };
            best = Some(Penetration { direction, depth });
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cube(center: Vec3, half: f32) -> Placed {
        Placed {
            collider: Collider::Box {
                half_extents: Vec3::splat(half),
            },
            center,
            rotation: Quat::IDENTITY,
        }
    }

    fn ball(center: Vec3, radius: f32) -> Placed {
        Placed {
            collider: Collider::Sphere { radius },
            center,
            rotation: Quat::IDENTITY,
        }
    }

    #[test]
    fn box_pushed_back_from_wall() {
        let body = cube(Vec3::new(0.9, 0.0, 0.0), 0.5);
        let wall = cube(Vec3::new(2.0, 0.0, 0.0), 1.0);
        let p = penetration(&body, &wall).unwrap();
        assert!(p.direction.abs_diff_eq(-Vec3::X, 1e-5));
        assert!((p.depth - 0.4).abs() < 1e-5);
    }

    #[test]
    fn separated_boxes_do_not_penetrate() {
        let a = cube(Vec3::ZERO, 0.5);
        let b = cube(Vec3::new(1.5, 0.0, 0.0), 0.5);
        assert!(penetration(&a, &b).is_none());
    }

    #[test]
    fn box_resting_in_floor_is_pushed_up() {
        let body = cube(Vec3::new(0.0, 0.4, 0.0), 0.5);
        let floor = Placed {
            collider: Collider::Plane {
                normal: Vec3::Y,
                offset: 0.0,
            },
            center: Vec3::ZERO,
            rotation: Quat::IDENTITY,
        };
        let p = penetration(&body, &floor).unwrap();
        assert_eq!(p.direction, Vec3::Y);
        assert!((p.depth - 0.1).abs() < 1e-5);
        let reverse = penetration(&floor, &body).unwrap();
        assert_eq!(reverse.direction, -Vec3::Y);
    }

    #[test]
    fn sphere_against_box_face() {
        let s = ball(Vec3::new(0.0, 1.3, 0.0), 0.5);
        let b = cube(Vec3::ZERO, 1.0);
        let p = penetration(&s, &b).unwrap();
        assert!(p.direction.abs_diff_eq(Vec3::Y, 1e-5));
        let q = penetration(&b, &s).unwrap();
        assert!(q.direction.abs_diff_eq(-Vec3::Y, 1e-5));
    }

    #[test]
    fn sphere_overlap_tests() {
        let b = cube(Vec3::ZERO, 1.0);
        assert!(sphere_overlaps(Vec3::new(1.05, 0.0, 0.0), 0.1, &b));
        assert!(!sphere_overlaps(Vec3::new(1.2, 0.0, 0.0), 0.1, &b));
    }

    #[test]
    fn closest_point_clamps_to_surface() {
        let b = cube(Vec3::ZERO, 1.0);
        let p = closest_point(Vec3::new(3.0, 0.5, 0.0), &b);
        assert!(p.abs_diff_eq(Vec3::new(1.0, 0.5, 0.0), 1e-5));
        let inside = Vec3::new(0.2, -0.3, 0.1);
        assert!(closest_point(inside, &b).abs_diff_eq(inside, 1e-5));
        let s = ball(Vec3::ZERO, 0.5);
        assert!(closest_point(Vec3::new(0.0, 2.0, 0.0), &s).abs_diff_eq(Vec3::new(0.0, 0.5, 0.0), 1e-5));
    }

    #[test]
    fn rotated_box_aabb_grows() {
        let mut b = cube(Vec3::ZERO, 1.0);
        b.rotation = Quat::from_rotation_y(45f32.to_radians());
        let (min, max) = b.aabb().unwrap();
        assert!((max.x - 2f32.sqrt()).abs() < 1e-4);
        assert!((min.y + 1.0).abs() < 1e-5);
    }
}
