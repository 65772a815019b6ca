//! Void hazards: zones, rifts and gravity wells

use glam::DVec2;

use super::{Hazard, HazardId};
use crate::geometry;

// ═══════════════════════════════════════════════════════════════════════════
// Void zones
// ═══════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ZonePhase {
    Warning,
    Active,
    Expired,
}

/// Circular zone that damages and repels the player once active.
#[derive(Debug, Clone)]
pub struct VoidZone {
    pub id: HazardId,
    pub center: DVec2,
    pub radius: f64,
    pub lifetime: f64,
    pub warning_duration: f64,
    pub max_lifetime: f64,
    pub dps: f64,
    /// Outward push speed applied to a player inside the active zone
    pub push_speed: f64,
}

impl VoidZone {
    pub fn sub_phase(&self) -> ZonePhase {
        if self.lifetime > self.max_lifetime {
            ZonePhase::Expired
        } else if self.lifetime < self.warning_duration {
            ZonePhase::Warning
        } else {
            ZonePhase::Active
        }
    }

    pub fn contains(&self, point: DVec2, radius: f64) -> bool {
        geometry::circles_overlap(self.center, self.radius, point, radius)
    }

    /// Damage dealt over `dt` to a circle at `point`.
    pub fn damage_to(&self, point: DVec2, radius: f64, dt: f64) -> f64 {
        if self.sub_phase() == ZonePhase::Active && self.contains(point, radius) {
            self.dps * dt
        } else {
            0.0
        }
    }

    /// Push velocity on a circle at `point`.
    pub fn push_on(&self, point: DVec2, radius: f64) -> DVec2 {
        if self.sub_phase() != ZonePhase::Active {
            return DVec2::ZERO;
        }
        geometry::repulsion(point, self.center, self.push_speed, self.radius + radius)
    }
}

impl Hazard for VoidZone {
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
        self.sub_phase() == ZonePhase::Expired
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// Void rifts
// ═══════════════════════════════════════════════════════════════════════════

/// A damaging line through the arena center that rotates for as long as
/// the boss stays in its phase.
#[derive(Debug, Clone)]
pub struct VoidRift {
    pub id: HazardId,
    pub center: DVec2,
    pub angle: f64,
    pub angular_speed: f64,
    pub length: f64,
    pub width: f64,
    pub dps: f64,
    pub lifetime: f64,
}

impl VoidRift {
    pub fn endpoints(&self) -> (DVec2, DVec2) {
        let half = geometry::angle_to_dir(self.angle) * (self.length * 0.5);
        (self.center - half, self.center + half)
    }

    pub fn hits(&self, point: DVec2, radius: f64) -> bool {
        let (a, b) = self.endpoints();
        geometry::circle_hits_segment(point, radius, a, b, self.width * 0.5)
    }

    pub fn damage_to(&self, point: DVec2, radius: f64, dt: f64) -> f64 {
        if self.hits(point, radius) { self.dps * dt } else { 0.0 }
    }
}

impl Hazard for VoidRift {
    fn id(&self) -> HazardId {
        self.id
    }

    fn lifetime(&self) -> f64 {
        self.lifetime
    }

    fn advance(&mut self, dt: f64) {
        self.lifetime += dt;
        self.angle = (self.angle + self.angular_speed * dt).rem_euclid(std::f64::consts::TAU);
    }

    fn is_expired(&self) -> bool {
        false
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// Gravity wells
// ═══════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone)]
pub struct GravityWell {
    pub id: HazardId,
    pub center: DVec2,
    pub pull_radius: f64,
    pub strength: f64,
    pub min_distance: f64,
    pub lifetime: f64,
}

impl GravityWell {
    /// Pull velocity on `point`.
    pub fn pull_on(&self, point: DVec2) -> DVec2 {
        geometry::attraction(point, self.center, self.strength, self.pull_radius, self.min_distance)
    }
}

impl Hazard for GravityWell {
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

    fn zone() -> VoidZone {
        VoidZone {
            id: 1,
            center: DVec2::ZERO,
            radius: 50.0,
            lifetime: 0.0,
            warning_duration: 1.0,
            max_lifetime: 3.0,
            dps: 10.0,
            push_speed: 100.0,
        }
    }

    #[test]
    fn zone_is_inert_during_warning() {
        let z = zone();
        let player = DVec2::new(10.0, 0.0);
        assert_eq!(z.damage_to(player, 5.0, 1.0), 0.0);
        assert_eq!(z.push_on(player, 5.0), DVec2::ZERO);
    }

    #[test]
    fn active_zone_pushes_outward() {
        let mut z = zone();
        z.lifetime = 1.5;
        let push = z.push_on(DVec2::new(10.0, 0.0), 5.0);
        assert!(push.x > 0.0);
        assert_eq!(z.damage_to(DVec2::new(10.0, 0.0), 5.0, 0.5), 5.0);
        z.lifetime = 3.5;
        assert!(z.is_expired());
    }

    #[test]
    fn rift_spans_center() {
        let rift = VoidRift {
            id: 1,
            center: DVec2::new(100.0, 100.0),
            angle: 0.0,
            angular_speed: 0.0,
            length: 200.0,
            width: 10.0,
            dps: 1.0,
            lifetime: 0.0,
        };
        let (a, b) = rift.endpoints();
        assert!((a - DVec2::new(0.0, 100.0)).length() < 1e-9);
        assert!((b - DVec2::new(200.0, 100.0)).length() < 1e-9);
        assert!(rift.hits(DVec2::new(20.0, 104.0), 2.0));
        assert!(!rift.hits(DVec2::new(20.0, 130.0), 2.0));
    }

    #[test]
    fn well_pull_is_stronger_closer_in() {
        let well = GravityWell {
            id: 1,
            center: DVec2::ZERO,
            pull_radius: 200.0,
            strength: 1000.0,
            min_distance: 10.0,
            lifetime: 0.0,
        };
        let near = well.pull_on(DVec2::new(50.0, 0.0));
        let far = well.pull_on(DVec2::new(150.0, 0.0));
        assert!(near.x < 0.0 && far.x < 0.0);
        assert!(near.length() > far.length());
        assert_eq!(well.pull_on(DVec2::new(250.0, 0.0)), DVec2::ZERO);
    }
}
