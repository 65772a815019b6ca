//! Steam trail samples left behind the boss. Purely visual.

use glam::DVec2;

use super::{Hazard, HazardId};

#[derive(Debug, Clone)]
pub struct SteamSample {
    pub id: HazardId,
    pub position: DVec2,
    pub lifetime: f64,
    pub duration: f64,
}

impl SteamSample {
    /// 1.0 when fresh, 0.0 when about to be pruned.
    pub fn opacity(&self) -> f64 {
        if self.duration > 0.0 {
            (1.0 - self.lifetime / self.duration).clamp(0.0, 1.0)
        } else {
            0.0
        }
    }
}

impl Hazard for SteamSample {
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
        self.lifetime > self.duration
    }
}
