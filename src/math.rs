use glam::{Quat, Vec3};

const ANGLE_EPSILON_SQ: f32 = 1e-15;

/// Projects `v` onto the horizontal XZ plane.
#[inline]
pub fn flatten(v: Vec3) -> Vec3 {
    Vec3::new(v.x, 0.0, v.z)
}

/// Unsigned angle between two vectors in degrees, 0.0 when either is zero.
pub fn angle_deg(from: Vec3, to: Vec3) -> f32 {
    let denominator = (from.length_squared() * to.length_squared()).sqrt();
    if denominator < ANGLE_EPSILON_SQ {
        return 0.0;
    }
    let dot = (from.dot(to) / denominator).clamp(-1.0, 1.0);
    dot.acos().to_degrees()
}

/// Angle from `from` to `to` in degrees, signed by the turn around `axis`.
/// A turn that is exactly in the plane of `axis` counts as positive.
pub fn signed_angle_deg(from: Vec3, to: Vec3, axis: Vec3) -> f32 {
    let unsigned = angle_deg(from, to);
    let sign = if axis.dot(from.cross(to)) >= 0.0 { 1.0 } else { -1.0 };
    unsigned * sign
}

/// Steps `current` towards `target` by at most `rate * dt`, snapping once the
/// remaining distance is smaller than one step.
///
/// This is the shared shape of the direction smoothing in `ControlAction`
/// and the collision-velocity decay in `Hovercraft`; it never overshoots.
pub fn approach(current: Vec3, target: Vec3, rate: f32, dt: f32) -> Vec3 {
    let diff = target - current;
    let step = rate * dt;
    let dist_sq = diff.length_squared();
    if dist_sq < step * step {
        target
    } else if dist_sq > 0.0 {
        current + diff / dist_sq.sqrt() * step
    } else {
        current
    }
}

/// Moves `current` in a straight line towards `target` by `max_delta`.
pub fn move_towards(current: Vec3, target: Vec3, max_delta: f32) -> Vec3 {
    let to = target - current;
    let dist_sq = to.length_squared();
    if dist_sq == 0.0 || (max_delta >= 0.0 && dist_sq <= max_delta * max_delta) {
        return target;
    }
    current + to / dist_sq.sqrt() * max_delta
}

/// Mirrors `v` about the plane with normal `n` (`n` is expected unit length).
#[inline]
pub fn reflect(v: Vec3, n: Vec3) -> Vec3 {
    v - 2.0 * v.dot(n) * n
}

/// Removes the component of `v` along `normal`.
pub fn project_on_plane(v: Vec3, normal: Vec3) -> Vec3 {
    let len_sq = normal.length_squared();
    if len_sq < f32::EPSILON {
        return v;
    }
    v - normal * (v.dot(normal) / len_sq)
}

/// Shortest rotation taking direction `from` onto direction `to`.
pub fn from_to_rotation(from: Vec3, to: Vec3) -> Quat {
    match (from.try_normalize(), to.try_normalize()) {
        (Some(a), Some(b)) => Quat::from_rotation_arc(a, b),
        _ => Quat::IDENTITY,
    }
}

/// Rotates `from` towards `to` by at most `max_degrees`.
pub fn rotate_towards(from: Quat, to: Quat, max_degrees: f32) -> Quat {
    let angle = from.angle_between(to).to_degrees();
    if angle <= f32::EPSILON {
        return to;
    }
    from.slerp(to, (max_degrees / angle).min(1.0))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-4
    }

    #[test]
    fn signed_angle_follows_axis() {
        assert!(approx(signed_angle_deg(Vec3::Z, Vec3::X, Vec3::Y), 90.0));
        assert!(approx(signed_angle_deg(Vec3::Z, -Vec3::X, Vec3::Y), -90.0));
        assert!(approx(signed_angle_deg(Vec3::Z, Vec3::Z, Vec3::Y), 0.0));
    }

    #[test]
    fn zero_vectors_give_zero_angle() {
        assert_eq!(angle_deg(Vec3::ZERO, Vec3::X), 0.0);
        assert_eq!(signed_angle_deg(Vec3::X, Vec3::ZERO, Vec3::Y), 0.0);
    }

    #[test]
    fn approach_snaps_within_one_step() {
        let next = approach(Vec3::new(0.9, 0.0, 0.0), Vec3::X, 2.0, 0.1);
        assert_eq!(next, Vec3::X);
    }

    #[test]
    fn approach_steps_along_delta() {
        let next = approach(Vec3::ZERO, Vec3::new(4.0, 0.0, 0.0), 2.0, 0.5);
        assert!(approx(next.x, 1.0));
        assert_eq!(next.y, 0.0);
    }

    #[test]
    fn approach_with_zero_dt_is_still() {
        let start = Vec3::new(1.0, 2.0, 3.0);
        assert_eq!(approach(start, Vec3::ZERO, 25.0, 0.0), start);
    }

    #[test]
    fn reflect_mirrors_about_normal() {
        let v = reflect(Vec3::new(5.0, 0.0, 0.0), Vec3::new(-1.0, 0.0, 0.0));
        assert_eq!(v, Vec3::new(-5.0, 0.0, 0.0));
    }

    #[test]
    fn move_towards_limits_distance() {
        let v = move_towards(Vec3::ZERO, Vec3::new(0.0, 10.0, 0.0), 1.0);
        assert!(approx(v.y, 1.0));
        let v = move_towards(Vec3::ZERO, Vec3::new(0.0, 0.5, 0.0), 1.0);
        assert_eq!(v, Vec3::new(0.0, 0.5, 0.0));
    }

    #[test]
    fn rotate_towards_is_capped() {
        let to = Quat::from_rotation_y(90f32.to_radians());
        let q = rotate_towards(Quat::IDENTITY, to, 30.0);
        assert!(approx(q.angle_between(Quat::IDENTITY).to_degrees(), 30.0));
        assert!(rotate_towards(Quat::IDENTITY, to, 120.0).abs_diff_eq(to, 1e-5));
    }
}
