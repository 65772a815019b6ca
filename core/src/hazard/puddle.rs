//! Damage puddles
//!
//! A puddle marks the ground for `warning_duration`, then damages anyone
//! standing in it until `max_lifetime`. The final `expiring_window` seconds
//! are flagged so the renderer can intensify the effect; damage is unchanged.

use glam::DVec2;

use super::{Hazard, HazardId};
use crate::geometry;

/// Lifecycle stage of a puddle, derived from its lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PuddlePhase {
    Warning,
    Active,
    Expiring,
    Expired,
}

#[derive(Debug, Clone)]
pub struct Puddle {
    pub id: HazardId,
    pub center: DVec2,
    pub radius: f64,
    pub lifetime: f64,
    pub warning_duration: f64,
    pub max_lifetime: f64,
    pub expiring_window: f64,
    /// Damage per second while active
    pub dps: f64,
}

impl Puddle {
    pub fn new(id: HazardId, center: DVec2, radius: f64, warning_duration: f64, max_lifetime: f64) -> Self {
        Self {
            id,
            center,
            radius,
            lifetime: 0.0,
            warning_duration,
            max_lifetime,
            expiring_window: 0.0,
            dps: 0.0,
        }
    }

    pub fn with_damage(mut self, dps: f64) -> Self {
        self.dps = dps;
        self
    }

    pub fn with_expiring_window(mut self, window: f64) -> Self {
        self.expiring_window = window.max(0.0);
        self
    }

    pub fn sub_phase(&self) -> PuddlePhase {
        if self.lifetime > self.max_lifetime {
            PuddlePhase::Expired
        } else if self.lifetime < self.warning_duration {
            PuddlePhase::Warning
        } else if self.lifetime >= self.max_lifetime - self.expiring_window {
            PuddlePhase::Expiring
        } else {
            PuddlePhase::Active
        }
    }

    pub fn deals_damage(&self) -> bool {
        matches!(self.sub_phase(), PuddlePhase::Active | PuddlePhase::Expiring)
    }

    /// True if a circle at `point` overlaps this puddle.
    pub fn overlaps(&self, point: DVec2, radius: f64) -> bool {
        geometry::circles_overlap(self.center, self.radius, point, radius)
    }

    /// Damage dealt to a circle at `point` over `dt`.
    pub fn damage_to(&self, point: DVec2, radius: f64, dt: f64) -> f64 {
        if self.deals_damage() && self.overlaps(point, radius) {
            self.dps * dt
        } else {
            0.0
        }
    }
}

impl Hazard for Puddle {
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
        self.sub_phase() == PuddlePhase::Expired
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn puddle_at(lifetime: f64) -> Puddle {
        let mut p = Puddle::new(1, DVec2::ZERO, 50.0, 1.0, 3.0)
            .with_damage(10.0)
            .with_expiring_window(0.5);
        p.lifetime = lifetime;
        p
    }

    #[test]
    fn sub_phase_follows_lifetime() {
        assert_eq!(puddle_at(0.0).sub_phase(), PuddlePhase::Warning);
        assert_eq!(puddle_at(0.99).sub_phase(), PuddlePhase::Warning);
        assert_eq!(puddle_at(1.0).sub_phase(), PuddlePhase::Active);
        assert_eq!(puddle_at(2.6).sub_phase(), PuddlePhase::Expiring);
        assert_eq!(puddle_at(3.0).sub_phase(), PuddlePhase::Expiring);
        assert_eq!(puddle_at(3.01).sub_phase(), PuddlePhase::Expired);
    }

    #[test]
    fn sub_phase_is_pure() {
        let p = puddle_at(1.7);
        assert_eq!(p.sub_phase(), p.sub_phase());
    }

    #[test]
    fn no_damage_during_warning() {
        assert_eq!(puddle_at(0.5).damage_to(DVec2::ZERO, 10.0, 0.1), 0.0);
        assert!((puddle_at(1.5).damage_to(DVec2::ZERO, 10.0, 0.1) - 1.0).abs() < 1e-12);
        assert_eq!(puddle_at(1.5).damage_to(DVec2::new(100.0, 0.0), 10.0, 0.1), 0.0);
    }
}
