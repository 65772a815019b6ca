//! Geometry and force-field helpers shared by the phase machines
//!
//! All positions are world-space `DVec2`. Forces are returned as velocity
//! contributions (units per second); callers scale them by `dt`.

use glam::DVec2;

/// Unit vector for an angle in radians.
pub fn angle_to_dir(angle: f64) -> DVec2 {
    DVec2::new(angle.cos(), angle.sin())
}

/// Shortest distance from `point` to the segment `a..b`.
///
/// A degenerate segment (`a == b`) is treated as a point.
pub fn point_segment_distance(point: DVec2, a: DVec2, b: DVec2) -> f64 {
    let ab = b - a;
    let len_sq = ab.length_squared();
    if len_sq <= f64::EPSILON {
        return point.distance(a);
    }
    let t = ((point - a).dot(ab) / len_sq).clamp(0.0, 1.0);
    point.distance(a + ab * t)
}

/// True if a circle at `point` with `radius` touches the thick segment `a..b`.
pub fn circle_hits_segment(point: DVec2, radius: f64, a: DVec2, b: DVec2, half_width: f64) -> bool {
    point_segment_distance(point, a, b) <= radius + half_width
}

/// True if `point` lies inside (or on) the circle.
pub fn point_in_circle(point: DVec2, center: DVec2, radius: f64) -> bool {
    point.distance_squared(center) <= radius * radius
}

/// True if two circles overlap (touching counts).
pub fn circles_overlap(a: DVec2, ra: f64, b: DVec2, rb: f64) -> bool {
    let r = ra + rb;
    a.distance_squared(b) <= r * r
}

/// `strength / (distance + softening)`: strictly decreasing in distance and
/// finite at zero distance as long as `softening > 0`.
///
/// Returns 0.0 for non-positive softening or non-finite inputs.
pub fn inverse_falloff(strength: f64, distance: f64, softening: f64) -> f64 {
    if !(softening > 0.0) || !strength.is_finite() || !distance.is_finite() {
        return 0.0;
    }
    strength / (distance.max(0.0) + softening)
}

/// Pull of `point` toward `center`, active inside `radius`.
///
/// Magnitude is `strength / max(distance, min_distance)`, zero outside the
/// radius and at the exact center (no defined direction).
pub fn attraction(point: DVec2, center: DVec2, strength: f64, radius: f64, min_distance: f64) -> DVec2 {
    let offset = center - point;
    let distance = offset.length();
    if distance > radius || distance <= f64::EPSILON || !(min_distance > 0.0) {
        return DVec2::ZERO;
    }
    offset / distance * (strength / distance.max(min_distance))
}

/// Push of `point` away from `center` at a constant `speed`, active inside `radius`.
pub fn repulsion(point: DVec2, center: DVec2, speed: f64, radius: f64) -> DVec2 {
    let offset = point - center;
    let distance = offset.length();
    if distance > radius {
        return DVec2::ZERO;
    }
    if distance <= f64::EPSILON {
        // Standing on the exact center: push along +x
        return DVec2::X * speed;
    }
    offset / distance * speed
}

/// Move `from` toward `to` by at most `max_step`.
pub fn move_toward(from: DVec2, to: DVec2, max_step: f64) -> DVec2 {
    let offset = to - from;
    let distance = offset.length();
    if distance <= max_step || distance <= f64::EPSILON {
        to
    } else {
        from + offset / distance * max_step
    }
}

/// Rotate `current` toward `target` (radians) by at most `max_delta`, taking
/// the short way around.
pub fn turn_toward(current: f64, target: f64, max_delta: f64) -> f64 {
    let tau = std::f64::consts::TAU;
    let mut diff = (target - current).rem_euclid(tau);
    if diff > std::f64::consts::PI {
        diff -= tau;
    }
    current + diff.clamp(-max_delta, max_delta)
}
