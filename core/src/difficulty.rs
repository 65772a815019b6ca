//! Difficulty scaling applied once at boss spawn.

use bossfight_types::{BossStats, DifficultyProfile};

/// Apply a difficulty profile to base stats. `None` leaves stats unchanged.
///
/// Non-finite or negative multipliers are treated as 1.0.
pub fn scale(base: &BossStats, profile: Option<&DifficultyProfile>) -> BossStats {
    let Some(profile) = profile else {
        return base.clone();
    };
    BossStats {
        base_health: base.base_health * sanitize(profile.health_multiplier),
        damage: base.damage * sanitize(profile.damage_multiplier),
        speed: base.speed * sanitize(profile.speed_multiplier),
        ..base.clone()
    }
}

/// Damage multiplier carried on the boss entity and applied to every hazard it owns.
pub fn damage_scale(profile: Option<&DifficultyProfile>) -> f64 {
    profile.map_or(1.0, |p| sanitize(p.damage_multiplier))
}

fn sanitize(multiplier: f64) -> f64 {
    if multiplier.is_finite() && multiplier >= 0.0 {
        multiplier
    } else {
        tracing::warn!(multiplier, "Invalid difficulty multiplier, using 1.0");
        1.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stats() -> BossStats {
        BossStats {
            name: "Test".to_string(),
            base_health: 5000.0,
            damage: 20.0,
            radius: 40.0,
            speed: 100.0,
        }
    }

    #[test]
    fn no_profile_is_identity() {
        assert_eq!(scale(&stats(), None), stats());
        assert_eq!(damage_scale(None), 1.0);
    }

    #[test]
    fn doubles_health() {
        let profile = DifficultyProfile::new(2.0, 1.5);
        let scaled = scale(&stats(), Some(&profile));
        assert_eq!(scaled.base_health, 10000.0);
        assert_eq!(scaled.damage, 30.0);
        assert_eq!(scaled.speed, 100.0);
        assert_eq!(scaled.radius, 40.0);
        assert_eq!(damage_scale(Some(&profile)), 1.5);
    }

    #[test]
    fn bad_multiplier_is_ignored() {
        let profile = DifficultyProfile::new(f64::NAN, -1.0);
        let scaled = scale(&stats(), Some(&profile));
        assert_eq!(scaled.base_health, 5000.0);
        assert_eq!(scaled.damage, 20.0);
    }
}
