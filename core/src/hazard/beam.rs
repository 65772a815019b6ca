//! Rotating laser beams
//!
//! A beam is anchored at the boss and sweeps at a constant angular speed.
//! It alternates between a thin, harmless warning line and a thick damaging
//! line on a cycle measured from its own lifetime, and is removed after a
//! fixed number of cycles.

use glam::DVec2;

use super::{Hazard, HazardId};
use crate::geometry;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BeamPhase {
    Warning,
    Active,
    Expired,
}

#[derive(Debug, Clone)]
pub struct LaserBeam {
    pub id: HazardId,
    /// Radians
    pub angle: f64,
    /// Radians per second
    pub angular_speed: f64,
    pub length: f64,
    pub lifetime: f64,
    pub warning_duration: f64,
    pub active_duration: f64,
    pub cycles: u32,
    pub warning_width: f64,
    pub active_width: f64,
    pub dps: f64,
}

impl LaserBeam {
    pub fn cycle_duration(&self) -> f64 {
        self.warning_duration + self.active_duration
    }

    pub fn max_lifetime(&self) -> f64 {
        self.cycle_duration() * self.cycles as f64
    }

    pub fn sub_phase(&self) -> BeamPhase {
        let cycle = self.cycle_duration();
        // A zero-length cycle would divide by zero below; treat it as spent
        if !(cycle > 0.0) || self.lifetime > self.max_lifetime() {
            return BeamPhase::Expired;
        }
        if self.lifetime.rem_euclid(cycle) < self.warning_duration {
            BeamPhase::Warning
        } else {
            BeamPhase::Active
        }
    }

    pub fn is_active(&self) -> bool {
        self.sub_phase() == BeamPhase::Active
    }

    /// Current drawn width.
    pub fn width(&self) -> f64 {
        match self.sub_phase() {
            BeamPhase::Active => self.active_width,
            _ => self.warning_width,
        }
    }

    /// Start and end points for a beam anchored at `origin`.
    pub fn endpoints(&self, origin: DVec2) -> (DVec2, DVec2) {
        (origin, origin + geometry::angle_to_dir(self.angle) * self.length)
    }

    /// Damage dealt over `dt` to a circle at `point`, for a beam anchored at `origin`.
    pub fn damage_to(&self, origin: DVec2, point: DVec2, radius: f64, dt: f64) -> f64 {
        if !self.is_active() {
            return 0.0;
        }
        let (a, b) = self.endpoints(origin);
        if geometry::circle_hits_segment(point, radius, a, b, self.active_width * 0.5) {
            self.dps * dt
        } else {
            0.0
        }
    }
}

impl Hazard for LaserBeam {
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
        self.sub_phase() == BeamPhase::Expired
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn beam() -> LaserBeam {
        LaserBeam {
            id: 1,
            angle: 0.0,
            angular_speed: 0.0,
            length: 100.0,
            lifetime: 0.0,
            warning_duration: 1.0,
            active_duration: 2.0,
            cycles: 2,
            warning_width: 2.0,
            active_width: 10.0,
            dps: 50.0,
        }
    }

    #[test]
    fn toggles_between_warning_and_active() {
        let mut b = beam();
        let samples = [
            (0.5, BeamPhase::Warning),
            (1.5, BeamPhase::Active),
            (3.5, BeamPhase::Warning),
            (4.5, BeamPhase::Active),
            (6.1, BeamPhase::Expired),
        ];
        for (t, expected) in samples {
            b.lifetime = t;
            assert_eq!(b.sub_phase(), expected, "at t={t}");
        }
    }

    #[test]
    fn warning_beam_is_harmless() {
        let mut b = beam();
        b.lifetime = 0.5;
        assert_eq!(b.damage_to(DVec2::ZERO, DVec2::new(50.0, 0.0), 5.0, 1.0), 0.0);
        b.lifetime = 1.5;
        assert_eq!(b.damage_to(DVec2::ZERO, DVec2::new(50.0, 0.0), 5.0, 1.0), 50.0);
        assert_eq!(b.damage_to(DVec2::ZERO, DVec2::new(50.0, 30.0), 5.0, 1.0), 0.0);
    }

    #[test]
    fn zero_cycle_is_expired_not_nan() {
        let mut b = beam();
        b.warning_duration = 0.0;
        b.active_duration = 0.0;
        assert_eq!(b.sub_phase(), BeamPhase::Expired);
    }

    #[test]
    fn advance_rotates() {
        let mut b = beam();
        b.angular_speed = 1.0;
        b.advance(0.5);
        assert!((b.angle - 0.5).abs() < 1e-12);
    }
}
