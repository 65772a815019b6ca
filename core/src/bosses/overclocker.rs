//! Overclocker
//!
//! - Phase 1: blades orbiting the boss on a shared, ever-increasing angle
//! - Phase 2: a cycling lava tile grid over the arena floor
//! - Phase 3+: steam trail, outward wind force
//! - Phase 4: periodic suction (vacuum toward the boss replaces the wind)

use std::f64::consts::TAU;

use bossfight_types::{OverclockerTuning, PhaseTrigger};
use glam::DVec2;

use super::{BossArchetype, advance_phase, move_boss_toward, scaled};
use crate::geometry;
use crate::hazard::{HazardRegistry, SteamSample, TileDurations, TileGrid};
use crate::phase::PhaseTracker;
use crate::signal::EncounterSignal;
use crate::world::{Entity, Player, WorldState};

const BLADE_PHASE: u8 = 1;
const TILE_PHASE: u8 = 2;
const WIND_PHASE: u8 = 3;
const SUCTION_PHASE: u8 = 4;

#[derive(Debug, Clone)]
pub struct OverclockerState {
    tuning: OverclockerTuning,
    triggers: Vec<PhaseTrigger>,
    pub tracker: PhaseTracker,
    /// Shared blade angle in radians
    pub blade_angle: f64,
    pub tiles: Option<TileGrid>,
    pub steam: HazardRegistry<SteamSample>,
    steam_timer: f64,
    /// Seconds since the suction phase began
    suction_clock: f64,
}

impl OverclockerState {
    pub fn new(tuning: OverclockerTuning, triggers: Vec<PhaseTrigger>) -> Self {
        Self {
            tracker: PhaseTracker::for_triggers(&triggers),
            blade_angle: 0.0,
            tiles: None,
            steam: HazardRegistry::new(),
            steam_timer: 0.0,
            suction_clock: 0.0,
            tuning,
            triggers,
        }
    }

    pub fn phase(&self) -> u8 {
        self.tracker.phase()
    }

    pub fn tuning(&self) -> &OverclockerTuning {
        &self.tuning
    }

    /// Suction runs for the last `suction_duration` seconds of every
    /// `suction_interval` once the final phase starts.
    pub fn is_suction_active(&self) -> bool {
        let t = &self.tuning;
        if self.phase() < SUCTION_PHASE || !(t.suction_interval > 0.0) {
            return false;
        }
        let local = self.suction_clock.rem_euclid(t.suction_interval);
        local >= t.suction_interval - t.suction_duration.min(t.suction_interval)
    }

    /// Segments for each blade, anchored at the boss. Empty outside the blade phase.
    pub fn blade_segments(&self, boss_position: DVec2) -> Vec<(DVec2, DVec2)> {
        if self.phase() != BLADE_PHASE || self.tuning.blade_count == 0 {
            return Vec::new();
        }
        let count = self.tuning.blade_count;
        (0..count)
            .map(|i| {
                let angle = self.blade_angle + i as f64 * (TAU / count as f64);
                (
                    boss_position,
                    boss_position + geometry::angle_to_dir(angle) * self.tuning.blade_length,
                )
            })
            .collect()
    }

    /// Copy of the force parameters for the current tick.
    pub fn force_field(&self) -> ForceField {
        ForceField {
            wind_enabled: self.phase() >= WIND_PHASE && !self.is_suction_active(),
            suction_active: self.is_suction_active(),
            wind_strength: self.tuning.wind_strength,
            wind_softening: self.tuning.wind_softening,
            vacuum_strength: self.tuning.vacuum_strength,
            vacuum_softening: self.tuning.vacuum_softening,
        }
    }

    pub fn update(&mut self, boss: &mut Entity, world: &mut WorldState, dt: f64) -> Vec<EncounterSignal> {
        let mut signals = Vec::new();
        let before = self.phase();
        if let Some(signal) = advance_phase(
            &mut self.tracker,
            &self.triggers,
            boss,
            BossArchetype::Overclocker,
            dt,
            world.elapsed,
        ) {
            signals.push(signal);
            self.enter_phase(before, world);
        }

        if !self.is_suction_active() {
            let speed = boss.speed * self.tuning.speed_factor;
            move_boss_toward(boss, world.player.position, speed, dt, &world.arena);
        }

        if self.phase() == BLADE_PHASE {
            self.blade_angle = (self.blade_angle + self.tuning.blade_angular_speed * dt).rem_euclid(TAU);
        }
        if let Some(tiles) = self.tiles.as_mut() {
            tiles.tick(dt);
        }
        self.steam.tick(dt);
        if self.phase() >= SUCTION_PHASE {
            self.suction_clock += dt;
        }

        let damage = check_mechanics_damage(self, boss, &world.player, dt);
        world.player.apply_damage(damage);

        let velocity = wind_force(world.player.position, boss.position, self)
            + vacuum_force(world.player.position, boss.position, self);
        world.push_player(velocity, dt);

        self.steam.sweep();
        if self.phase() >= WIND_PHASE {
            self.emit_steam(boss.position, dt);
        }
        signals
    }

    fn enter_phase(&mut self, from: u8, world: &mut WorldState) {
        let to = self.phase();
        if from == TILE_PHASE {
            self.tiles = None;
        }
        if to == TILE_PHASE {
            let t = &self.tuning;
            let durations = TileDurations {
                normal: t.tile_normal_duration,
                warning: t.tile_warning_duration,
                lava: t.tile_lava_duration,
                safe: t.tile_safe_duration,
            };
            // Offsets stay inside the normal span so every tile starts harmless
            let normal = t.tile_normal_duration;
            let arena = world.arena;
            self.tiles = Some(TileGrid::new(arena.min, arena.max, durations, t.lava_dps, |_| {
                world.random_range(0.0, normal)
            }));
            tracing::debug!("Spawned tile grid");
        }
        if to == SUCTION_PHASE {
            self.suction_clock = 0.0;
        }
    }

    fn emit_steam(&mut self, position: DVec2, dt: f64) {
        let interval = self.tuning.steam_interval;
        if !(interval > 0.0) {
            return;
        }
        self.steam_timer += dt;
        if self.steam_timer < interval {
            return;
        }
        self.steam_timer = self.steam_timer.rem_euclid(interval);
        let duration = self.tuning.steam_duration;
        self.steam.spawn(|id| SteamSample {
            id,
            position,
            lifetime: 0.0,
            duration,
        });
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// Force fields
// ═══════════════════════════════════════════════════════════════════════════

/// Snapshot of the wind/vacuum parameters, usable for previewing forces at
/// arbitrary positions without touching the live state.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ForceField {
    pub wind_enabled: bool,
    pub suction_active: bool,
    pub wind_strength: f64,
    pub wind_softening: f64,
    pub vacuum_strength: f64,
    pub vacuum_softening: f64,
}

impl ForceField {
    /// Push away from the boss, weaker with distance.
    pub fn wind(&self, player: DVec2, boss: DVec2) -> DVec2 {
        if !self.wind_enabled {
            return DVec2::ZERO;
        }
        let offset = player - boss;
        let distance = offset.length();
        if distance <= f64::EPSILON {
            return DVec2::ZERO;
        }
        offset / distance * geometry::inverse_falloff(self.wind_strength, distance, self.wind_softening)
    }

    /// Pull toward the boss while suction is active, stronger up close.
    pub fn vacuum(&self, player: DVec2, boss: DVec2) -> DVec2 {
        if !self.suction_active {
            return DVec2::ZERO;
        }
        let offset = boss - player;
        let distance = offset.length();
        if distance <= f64::EPSILON {
            return DVec2::ZERO;
        }
        offset / distance * geometry::inverse_falloff(self.vacuum_strength, distance, self.vacuum_softening)
    }
}

/// Wind velocity on a player at `player_pos` from a boss at `boss_pos`.
pub fn wind_force(player_pos: DVec2, boss_pos: DVec2, state: &OverclockerState) -> DVec2 {
    state.force_field().wind(player_pos, boss_pos)
}

/// Vacuum velocity on a player at `player_pos` toward a boss at `boss_pos`.
pub fn vacuum_force(player_pos: DVec2, boss_pos: DVec2, state: &OverclockerState) -> DVec2 {
    state.force_field().vacuum(player_pos, boss_pos)
}

/// Total hazard damage the player takes this tick: blades, lava tiles and
/// the suction core. Pure; the caller applies it.
pub fn check_mechanics_damage(state: &OverclockerState, boss: &Entity, player: &Player, dt: f64) -> f64 {
    let t = &state.tuning;
    let mut dps = 0.0;

    for (a, b) in state.blade_segments(boss.position) {
        if geometry::circle_hits_segment(player.position, player.radius, a, b, t.blade_width * 0.5) {
            dps += t.blade_dps;
        }
    }
    let mut damage = dps * dt;

    if let Some(tiles) = &state.tiles {
        damage += tiles.damage_at(player.position, dt);
    }

    if state.is_suction_active()
        && geometry::circles_overlap(boss.position, t.suction_core_radius, player.position, player.radius)
    {
        damage += t.suction_core_dps * dt;
    }

    scaled(boss, damage)
}
