//! Destructible shield pylons

use glam::DVec2;

use super::{Hazard, HazardId};
use crate::geometry;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PylonPhase {
    /// Just placed; cannot be damaged yet
    Spawning,
    Damageable,
    Destroyed,
}

#[derive(Debug, Clone)]
pub struct Pylon {
    pub id: HazardId,
    pub position: DVec2,
    pub radius: f64,
    pub health: f64,
    pub max_health: f64,
    pub lifetime: f64,
    pub spawn_duration: f64,
}

impl Pylon {
    pub fn new(id: HazardId, position: DVec2, radius: f64, max_health: f64, spawn_duration: f64) -> Self {
        Self {
            id,
            position,
            radius,
            health: max_health,
            max_health,
            lifetime: 0.0,
            spawn_duration,
        }
    }

    pub fn is_destroyed(&self) -> bool {
        self.health <= 0.0
    }

    pub fn sub_phase(&self) -> PylonPhase {
        if self.is_destroyed() {
            PylonPhase::Destroyed
        } else if self.lifetime < self.spawn_duration {
            PylonPhase::Spawning
        } else {
            PylonPhase::Damageable
        }
    }

    pub fn health_fraction(&self) -> f64 {
        if self.max_health > 0.0 {
            (self.health / self.max_health).clamp(0.0, 1.0)
        } else {
            0.0
        }
    }

    /// Apply damage. Returns true if this hit destroyed the pylon.
    pub fn damage(&mut self, amount: f64) -> bool {
        if self.sub_phase() != PylonPhase::Damageable || !amount.is_finite() || amount <= 0.0 {
            return false;
        }
        self.health = (self.health - amount).max(0.0);
        self.is_destroyed()
    }

    pub fn is_hit_by(&self, point: DVec2, radius: f64) -> bool {
        geometry::circles_overlap(self.position, self.radius, point, radius)
    }
}

impl Hazard for Pylon {
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
        self.is_destroyed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spawning_pylon_ignores_damage() {
        let mut p = Pylon::new(1, DVec2::ZERO, 10.0, 100.0, 0.5);
        assert!(!p.damage(500.0));
        assert_eq!(p.health, 100.0);
        p.advance(0.5);
        assert_eq!(p.sub_phase(), PylonPhase::Damageable);
        assert!(!p.damage(40.0));
        assert!(p.damage(60.0));
        assert_eq!(p.sub_phase(), PylonPhase::Destroyed);
        assert!(p.is_expired());
        // Already destroyed: further hits report nothing
        assert!(!p.damage(10.0));
    }
}
