//! Head-and-body chains for the Trojan Wyrm
//!
//! Each chain is a head followed by body segments held at exact spacing:
//! after the head moves, every segment is pulled onto the point `spacing`
//! away from its new leader, along the line toward its own old position.

use glam::DVec2;

use super::{Hazard, HazardId};
use crate::geometry;

#[derive(Debug, Clone)]
pub struct WormChain {
    pub id: HazardId,
    pub head: DVec2,
    /// Radians
    pub heading: f64,
    pub segments: Vec<DVec2>,
    pub spacing: f64,
    pub segment_radius: f64,
    /// Body segment currently intangible, if any
    pub ghost_index: Option<usize>,
    pub lifetime: f64,
}

impl WormChain {
    /// A straight chain trailing behind `head` opposite to `heading`.
    pub fn straight(
        id: HazardId,
        head: DVec2,
        heading: f64,
        segment_count: usize,
        spacing: f64,
        segment_radius: f64,
    ) -> Self {
        let back = -geometry::angle_to_dir(heading);
        let segments = (1..=segment_count)
            .map(|i| head + back * (spacing * i as f64))
            .collect();
        Self {
            id,
            head,
            heading,
            segments,
            spacing,
            segment_radius,
            ghost_index: None,
            lifetime: 0.0,
        }
    }

    /// Steer toward `target` by at most `turn_rate * dt`, then advance the
    /// head by `speed * dt` and let the body follow.
    pub fn steer_toward(&mut self, target: DVec2, speed: f64, turn_rate: f64, dt: f64) {
        let offset = target - self.head;
        if offset.length_squared() > f64::EPSILON {
            let desired = offset.y.atan2(offset.x);
            self.heading = geometry::turn_toward(self.heading, desired, turn_rate * dt);
        }
        let step = geometry::angle_to_dir(self.heading) * speed * dt;
        self.move_head_to(self.head + step);
    }

    /// Move the head along `direction` (unit) without turning.
    pub fn move_along(&mut self, direction: DVec2, distance: f64) {
        if direction.length_squared() > f64::EPSILON {
            self.heading = direction.y.atan2(direction.x);
        }
        self.move_head_to(self.head + direction * distance);
    }

    /// Place the head and run the follow rule down the body.
    pub fn move_head_to(&mut self, head: DVec2) {
        self.head = head;
        let mut leader = head;
        for segment in &mut self.segments {
            let offset = *segment - leader;
            let dir = if offset.length_squared() > f64::EPSILON {
                offset.normalize()
            } else {
                -geometry::angle_to_dir(self.heading)
            };
            *segment = leader + dir * self.spacing;
            leader = *segment;
        }
    }

    /// Keep the head inside an axis-aligned box; the body re-follows.
    pub fn confine(&mut self, min: DVec2, max: DVec2) {
        let clamped = self.head.clamp(min, max);
        if clamped != self.head {
            self.move_head_to(clamped);
        }
    }

    pub fn is_ghost(&self, index: usize) -> bool {
        self.ghost_index == Some(index)
    }

    /// Solid (non-ghost) segments with their indices.
    pub fn solid_segments(&self) -> impl Iterator<Item = (usize, DVec2)> + '_ {
        self.segments
            .iter()
            .copied()
            .enumerate()
            .filter(|(i, _)| !self.is_ghost(*i))
    }

    /// First solid segment touched by a circle at `point`.
    pub fn segment_hit_by(&self, point: DVec2, radius: f64) -> Option<usize> {
        self.solid_segments()
            .find(|(_, pos)| geometry::circles_overlap(*pos, self.segment_radius, point, radius))
            .map(|(i, _)| i)
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }
}

impl Hazard for WormChain {
    fn id(&self) -> HazardId {
        self.id
    }

    fn lifetime(&self) -> f64 {
        self.lifetime
    }

    fn advance(&mut self, dt: f64) {
        self.lifetime += dt;
    }

    fn is_expired(&self) -> bool {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chain() -> WormChain {
        WormChain::straight(1, DVec2::ZERO, 0.0, 5, 10.0, 4.0)
    }

    fn assert_spacing(w: &WormChain) {
        let mut leader = w.head;
        for seg in &w.segments {
            assert!((seg.distance(leader) - w.spacing).abs() < 1e-9);
            leader = *seg;
        }
    }

    #[test]
    fn straight_chain_trails_behind() {
        let w = chain();
        assert_eq!(w.len(), 5);
        assert!((w.segments[0] - DVec2::new(-10.0, 0.0)).length() < 1e-9);
        assert_spacing(&w);
    }

    #[test]
    fn follow_keeps_exact_spacing() {
        let mut w = chain();
        for i in 0..50 {
            let target = DVec2::new((i as f64).cos() * 100.0, (i as f64).sin() * 100.0);
            w.steer_toward(target, 120.0, 3.0, 0.1);
            assert_spacing(&w);
        }
    }

    #[test]
    fn ghost_segment_cannot_be_hit() {
        let mut w = chain();
        let p = w.segments[2];
        assert_eq!(w.segment_hit_by(p, 1.0), Some(2));
        w.ghost_index = Some(2);
        assert_eq!(w.segment_hit_by(p, 1.0), None);
    }
}
