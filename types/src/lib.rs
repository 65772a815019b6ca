//! Shared balance configuration types for the boss encounter simulation
//!
//! This crate contains serializable configuration types that are shared between
//! the simulation (bossfight-core) and its tooling (bossfight-cli).
//!
//! Every numeric balance constant used by a phase machine lives here with a
//! serde default, so a TOML file only needs to name the values it overrides.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

// ─────────────────────────────────────────────────────────────────────────────
// Boss Stats & Phase Triggers
// ─────────────────────────────────────────────────────────────────────────────

/// Base stats for a boss, before difficulty scaling.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BossStats {
    /// Display name
    #[serde(default)]
    pub name: String,

    /// Health at spawn (before the difficulty health multiplier)
    #[serde(default = "default_base_health")]
    pub base_health: f64,

    /// Contact damage per second (before the difficulty damage multiplier)
    #[serde(default = "default_damage")]
    pub damage: f64,

    /// Collision radius
    #[serde(default = "default_radius")]
    pub radius: f64,

    /// Movement speed in units per second
    #[serde(default = "default_speed")]
    pub speed: f64,
}

impl Default for BossStats {
    fn default() -> Self {
        Self::fallback()
    }
}

impl BossStats {
    /// Stats used when a boss id has no entry in the config table.
    pub fn fallback() -> Self {
        Self {
            name: "Unknown Boss".to_string(),
            base_health: default_base_health(),
            damage: default_damage(),
            radius: default_radius(),
            speed: default_speed(),
        }
    }
}

fn default_base_health() -> f64 {
    5000.0
}

fn default_damage() -> f64 {
    20.0
}

fn default_radius() -> f64 {
    48.0
}

fn default_speed() -> f64 {
    90.0
}

/// Condition that advances a boss to its next phase.
///
/// A boss with N triggers has N + 1 phases. Trigger `k` (0-based) guards the
/// transition from phase `k + 1` to phase `k + 2`.
///
/// ```toml
/// phases = [
///     { type = "hp_below", fraction = 0.75 },
///     { type = "time_in_phase", secs = 40.0 },
/// ]
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PhaseTrigger {
    /// Boss health fraction (0.0-1.0) crossed downward to or below `fraction`
    HpBelow { fraction: f64 },
    /// Boss has spent at least `secs` seconds in the current phase
    TimeInPhase { secs: f64 },
}

/// A boss entry in the config table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BossDefinition {
    #[serde(default)]
    pub stats: BossStats,

    /// Phase transitions in order (see [`PhaseTrigger`])
    #[serde(default = "default_phase_triggers")]
    pub phases: Vec<PhaseTrigger>,
}

impl Default for BossDefinition {
    fn default() -> Self {
        Self::fallback()
    }
}

impl BossDefinition {
    /// Hardcoded definition for boss ids missing from the config table.
    pub fn fallback() -> Self {
        Self {
            stats: BossStats::fallback(),
            phases: default_phase_triggers(),
        }
    }

    fn named(name: &str, base_health: f64, damage: f64, radius: f64, speed: f64) -> Self {
        Self {
            stats: BossStats {
                name: name.to_string(),
                base_health,
                damage,
                radius,
                speed,
            },
            phases: default_phase_triggers(),
        }
    }

    /// Number of phases this boss moves through.
    pub fn phase_count(&self) -> u8 {
        (self.phases.len() + 1).min(u8::MAX as usize) as u8
    }
}

/// Default thresholds: phase 2 at 75%, phase 3 at 50%, phase 4 at 25% health.
pub fn default_phase_triggers() -> Vec<PhaseTrigger> {
    vec![
        PhaseTrigger::HpBelow { fraction: 0.75 },
        PhaseTrigger::HpBelow { fraction: 0.50 },
        PhaseTrigger::HpBelow { fraction: 0.25 },
    ]
}

// ─────────────────────────────────────────────────────────────────────────────
// Difficulty
// ─────────────────────────────────────────────────────────────────────────────

/// Multipliers applied once to a boss's base stats at spawn.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DifficultyProfile {
    #[serde(default = "one")]
    pub health_multiplier: f64,
    #[serde(default = "one")]
    pub damage_multiplier: f64,
    #[serde(default = "one")]
    pub speed_multiplier: f64,
}

impl Default for DifficultyProfile {
    fn default() -> Self {
        Self {
            health_multiplier: 1.0,
            damage_multiplier: 1.0,
            speed_multiplier: 1.0,
        }
    }
}

impl DifficultyProfile {
    pub fn new(health_multiplier: f64, damage_multiplier: f64) -> Self {
        Self {
            health_multiplier,
            damage_multiplier,
            speed_multiplier: 1.0,
        }
    }

    /// Derive a profile from a threat level: each level adds its scaling step
    /// on top of the 1.0 baseline.
    pub fn from_threat_level(level: u32, scaling: &ThreatScaling) -> Self {
        let level = level as f64;
        Self {
            health_multiplier: 1.0 + level * scaling.health_scaling,
            damage_multiplier: 1.0 + level * scaling.damage_scaling,
            speed_multiplier: 1.0 + level * scaling.speed_scaling,
        }
    }
}

fn one() -> f64 {
    1.0
}

/// Per-level scaling steps for threat-level difficulty.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ThreatScaling {
    #[serde(default = "default_health_scaling")]
    pub health_scaling: f64,
    #[serde(default = "default_speed_scaling")]
    pub speed_scaling: f64,
    #[serde(default = "default_damage_scaling")]
    pub damage_scaling: f64,
}

impl Default for ThreatScaling {
    fn default() -> Self {
        Self {
            health_scaling: default_health_scaling(),
            speed_scaling: default_speed_scaling(),
            damage_scaling: default_damage_scaling(),
        }
    }
}

fn default_health_scaling() -> f64 {
    0.15
}

fn default_speed_scaling() -> f64 {
    0.05
}

fn default_damage_scaling() -> f64 {
    0.10
}

// ─────────────────────────────────────────────────────────────────────────────
// Mechanic Tunings
// ─────────────────────────────────────────────────────────────────────────────

/// Cyberboss: melee/ranged mode switching, damage puddles, rotating lasers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CyberbossTuning {
    /// Seconds between melee and ranged mode switches (phases 1-2)
    pub mode_switch_interval: f64,
    /// Distance the boss tries to keep from the player in ranged mode
    pub preferred_range: f64,
    /// Speed factor applied to base speed while in ranged mode
    pub ranged_speed_factor: f64,

    /// First phase that spawns puddles
    pub puddle_start_phase: u8,
    pub puddle_interval_min: f64,
    pub puddle_interval_max: f64,
    pub puddle_radius: f64,
    pub puddle_warning_duration: f64,
    pub puddle_max_lifetime: f64,
    /// Final seconds of a puddle's life flagged as "about to expire"
    pub puddle_expiring_window: f64,
    pub puddle_dps: f64,
    /// Random offset from the player's position when a puddle is placed
    pub puddle_jitter: f64,

    /// First phase that fires lasers
    pub laser_start_phase: u8,
    pub laser_interval: f64,
    pub laser_count: u32,
    pub phase4_laser_count: u32,
    pub laser_length: f64,
    pub laser_warning_duration: f64,
    pub laser_active_duration: f64,
    /// Number of warning/active cycles before a beam is removed
    pub laser_cycles: u32,
    /// Radians per second
    pub laser_angular_speed: f64,
    pub laser_warning_width: f64,
    pub laser_active_width: f64,
    pub laser_dps: f64,
}

impl Default for CyberbossTuning {
    fn default() -> Self {
        Self {
            mode_switch_interval: 8.0,
            preferred_range: 320.0,
            ranged_speed_factor: 0.6,
            puddle_start_phase: 2,
            puddle_interval_min: 2.0,
            puddle_interval_max: 3.5,
            puddle_radius: 60.0,
            puddle_warning_duration: 1.0,
            puddle_max_lifetime: 5.0,
            puddle_expiring_window: 1.0,
            puddle_dps: 20.0,
            puddle_jitter: 80.0,
            laser_start_phase: 3,
            laser_interval: 6.0,
            laser_count: 3,
            phase4_laser_count: 4,
            laser_length: 600.0,
            laser_warning_duration: 1.0,
            laser_active_duration: 1.5,
            laser_cycles: 2,
            laser_angular_speed: 0.6,
            laser_warning_width: 4.0,
            laser_active_width: 24.0,
            laser_dps: 40.0,
        }
    }
}

/// Void Harbinger: void zones, shielding pylons, rifts, gravity wells, arena shrink.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VoidHarbingerTuning {
    pub speed_factor: f64,

    pub zone_interval: f64,
    pub zone_radius: f64,
    pub zone_warning_duration: f64,
    pub zone_max_lifetime: f64,
    pub zone_dps: f64,
    /// Outward displacement speed applied to a player standing in an active zone
    pub zone_push_speed: f64,

    pub pylon_count: u32,
    pub pylon_health: f64,
    pub pylon_radius: f64,
    /// Seconds after spawning before a pylon can be damaged
    pub pylon_spawn_duration: f64,
    /// Distance from arena center at which pylons are placed
    pub pylon_ring_radius: f64,

    pub rift_count: u32,
    pub rift_length: f64,
    pub rift_width: f64,
    /// Radians per second
    pub rift_angular_speed: f64,
    pub rift_dps: f64,

    pub well_count: u32,
    pub well_pull_radius: f64,
    pub well_strength: f64,
    /// Distances below this are clamped to avoid singular pull near the center
    pub well_min_distance: f64,
    /// Distance from arena center at which wells are placed
    pub well_ring_radius: f64,

    /// Arena radius floor as a fraction of the starting radius
    pub shrink_floor_fraction: f64,
    /// Exponential decay rate of (radius - floor), per second
    pub shrink_rate: f64,
}

impl Default for VoidHarbingerTuning {
    fn default() -> Self {
        Self {
            speed_factor: 0.5,
            zone_interval: 2.5,
            zone_radius: 80.0,
            zone_warning_duration: 1.2,
            zone_max_lifetime: 4.0,
            zone_dps: 15.0,
            zone_push_speed: 220.0,
            pylon_count: 4,
            pylon_health: 500.0,
            pylon_radius: 24.0,
            pylon_spawn_duration: 0.75,
            pylon_ring_radius: 260.0,
            rift_count: 2,
            rift_length: 520.0,
            rift_width: 20.0,
            rift_angular_speed: 0.5,
            rift_dps: 30.0,
            well_count: 2,
            well_pull_radius: 220.0,
            well_strength: 9000.0,
            well_min_distance: 20.0,
            well_ring_radius: 200.0,
            shrink_floor_fraction: 0.4,
            shrink_rate: 0.05,
        }
    }
}

/// Overclocker: orbiting blades, lava tile grid, steam trail, wind and vacuum.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OverclockerTuning {
    pub speed_factor: f64,

    pub blade_count: u32,
    pub blade_length: f64,
    pub blade_width: f64,
    /// Radians per second
    pub blade_angular_speed: f64,
    pub blade_dps: f64,

    pub tile_normal_duration: f64,
    pub tile_warning_duration: f64,
    pub tile_lava_duration: f64,
    pub tile_safe_duration: f64,
    pub lava_dps: f64,

    pub steam_interval: f64,
    pub steam_duration: f64,

    pub wind_strength: f64,
    pub wind_softening: f64,

    pub vacuum_strength: f64,
    pub vacuum_softening: f64,
    pub suction_interval: f64,
    pub suction_duration: f64,
    pub suction_core_radius: f64,
    pub suction_core_dps: f64,
}

impl Default for OverclockerTuning {
    fn default() -> Self {
        Self {
            speed_factor: 1.0,
            blade_count: 3,
            blade_length: 180.0,
            blade_width: 16.0,
            blade_angular_speed: 2.0,
            blade_dps: 35.0,
            tile_normal_duration: 3.0,
            tile_warning_duration: 1.0,
            tile_lava_duration: 2.0,
            tile_safe_duration: 1.5,
            lava_dps: 25.0,
            steam_interval: 0.1,
            steam_duration: 1.5,
            wind_strength: 30000.0,
            wind_softening: 50.0,
            vacuum_strength: 40000.0,
            vacuum_softening: 50.0,
            suction_interval: 6.0,
            suction_duration: 2.5,
            suction_core_radius: 60.0,
            suction_core_dps: 50.0,
        }
    }
}

/// Trojan Wyrm: segmented body, ghost segment, sub-worm split, aim-then-dash.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrojanWyrmTuning {
    pub segment_count: u32,
    pub segment_spacing: f64,
    pub segment_radius: f64,
    /// Maximum head turn rate in radians per second
    pub head_turn_rate: f64,
    pub ghost_toggle_interval: f64,
    pub sub_worm_count: u32,
    pub sub_worm_speed_factor: f64,
    pub contact_dps: f64,
    /// Fraction of projectile damage passed to the boss when a segment is hit
    pub segment_damage_multiplier: f64,

    pub dash_cooldown: f64,
    pub aim_duration: f64,
    pub dash_duration: f64,
    pub dash_speed: f64,
    pub recover_duration: f64,
    /// One-shot damage when the dashing head connects
    pub dash_damage: f64,
}

impl Default for TrojanWyrmTuning {
    fn default() -> Self {
        Self {
            segment_count: 12,
            segment_spacing: 28.0,
            segment_radius: 18.0,
            head_turn_rate: 2.5,
            ghost_toggle_interval: 2.0,
            sub_worm_count: 3,
            sub_worm_speed_factor: 0.8,
            contact_dps: 30.0,
            segment_damage_multiplier: 0.5,
            dash_cooldown: 3.0,
            aim_duration: 1.2,
            dash_duration: 0.6,
            dash_speed: 900.0,
            recover_duration: 1.0,
            dash_damage: 40.0,
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Root Config
// ─────────────────────────────────────────────────────────────────────────────

/// Root balance configuration.
///
/// ```toml
/// [bosses.cyberboss.stats]
/// name = "Cyberboss"
/// base_health = 5000.0
///
/// [threat]
/// health_scaling = 0.15
///
/// [cyberboss]
/// puddle_dps = 25.0
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BalanceConfig {
    /// Boss definitions keyed by boss id (ordered so exports are stable)
    pub bosses: BTreeMap<String, BossDefinition>,
    pub threat: ThreatScaling,
    pub cyberboss: CyberbossTuning,
    pub void_harbinger: VoidHarbingerTuning,
    pub overclocker: OverclockerTuning,
    pub trojan_wyrm: TrojanWyrmTuning,
}

impl Default for BalanceConfig {
    fn default() -> Self {
        let bosses = [
            ("cyberboss", BossDefinition::named("Cyberboss", 5000.0, 25.0, 56.0, 110.0)),
            ("void_harbinger", BossDefinition::named("Void Harbinger", 6000.0, 20.0, 64.0, 70.0)),
            ("overclocker", BossDefinition::named("Overclocker", 5500.0, 30.0, 52.0, 120.0)),
            ("trojan_wyrm", BossDefinition::named("Trojan Wyrm", 7000.0, 25.0, 32.0, 160.0)),
        ]
        .into_iter()
        .map(|(id, def)| (id.to_string(), def))
        .collect();

        Self {
            bosses,
            threat: ThreatScaling::default(),
            cyberboss: CyberbossTuning::default(),
            void_harbinger: VoidHarbingerTuning::default(),
            overclocker: OverclockerTuning::default(),
            trojan_wyrm: TrojanWyrmTuning::default(),
        }
    }
}

impl BalanceConfig {
    /// Look up a boss definition by exact id.
    pub fn boss(&self, boss_id: &str) -> Option<&BossDefinition> {
        self.bosses.get(boss_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn threat_level_zero_is_identity() {
        let profile = DifficultyProfile::from_threat_level(0, &ThreatScaling::default());
        assert_eq!(profile, DifficultyProfile::default());
    }

    #[test]
    fn threat_level_scales_linearly() {
        let scaling = ThreatScaling {
            health_scaling: 0.5,
            speed_scaling: 0.0,
            damage_scaling: 0.25,
        };
        let profile = DifficultyProfile::from_threat_level(2, &scaling);
        assert!((profile.health_multiplier - 2.0).abs() < 1e-12);
        assert!((profile.damage_multiplier - 1.5).abs() < 1e-12);
        assert!((profile.speed_multiplier - 1.0).abs() < 1e-12);
    }

    #[test]
    fn partial_toml_keeps_defaults() {
        let config: BalanceConfig = toml::from_str(
            r#"
            [cyberboss]
            puddle_dps = 99.0

            [bosses.custom.stats]
            name = "Custom"
            base_health = 1234.0
            "#,
        )
        .unwrap();

        assert_eq!(config.cyberboss.puddle_dps, 99.0);
        assert_eq!(config.cyberboss.laser_count, CyberbossTuning::default().laser_count);
        let custom = config.boss("custom").unwrap();
        assert_eq!(custom.stats.base_health, 1234.0);
        assert_eq!(custom.stats.radius, BossStats::fallback().radius);
        assert_eq!(custom.phase_count(), 4);
        // Explicit [bosses] table replaces the built-in defaults
        assert!(config.boss("cyberboss").is_none());
    }

    #[test]
    fn phase_triggers_parse_tagged() {
        let def: BossDefinition = toml::from_str(
            r#"
            phases = [
                { type = "hp_below", fraction = 0.6 },
                { type = "time_in_phase", secs = 30.0 },
            ]
            "#,
        )
        .unwrap();
        assert_eq!(
            def.phases,
            vec![
                PhaseTrigger::HpBelow { fraction: 0.6 },
                PhaseTrigger::TimeInPhase { secs: 30.0 },
            ]
        );
        assert_eq!(def.phase_count(), 3);
    }
}
