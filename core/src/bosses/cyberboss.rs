//! Cyberboss: melee/ranged mode switching, damage puddles, rotating lasers.

use bossfight_types::{CyberbossTuning, PhaseTrigger};
use serde::Serialize;

use super::{BossArchetype, advance_phase, move_boss_toward, scaled};
use crate::hazard::{HazardRegistry, LaserBeam, Puddle};
use crate::phase::PhaseTracker;
use crate::signal::EncounterSignal;
use crate::world::{Entity, WorldState};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CombatMode {
    Melee,
    Ranged,
}

#[derive(Debug, Clone)]
pub struct CyberbossState {
    tuning: CyberbossTuning,
    triggers: Vec<PhaseTrigger>,
    pub tracker: PhaseTracker,
    pub mode: CombatMode,
    /// Seconds spent in the current mode
    mode_timer: f64,
    /// Countdown to the next puddle
    puddle_timer: f64,
    /// Countdown to the next laser volley
    laser_timer: f64,
    pub puddles: HazardRegistry<Puddle>,
    pub lasers: HazardRegistry<LaserBeam>,
}

impl CyberbossState {
    pub fn new(tuning: CyberbossTuning, triggers: Vec<PhaseTrigger>, world: &mut WorldState) -> Self {
        let puddle_timer = world.random_range(tuning.puddle_interval_min, tuning.puddle_interval_max);
        Self {
            tracker: PhaseTracker::for_triggers(&triggers),
            mode: CombatMode::Melee,
            mode_timer: 0.0,
            puddle_timer,
            laser_timer: 0.0,
            puddles: HazardRegistry::new(),
            lasers: HazardRegistry::new(),
            tuning,
            triggers,
        }
    }

    pub fn phase(&self) -> u8 {
        self.tracker.phase()
    }

    /// Melee "chainsaw" visual: only in melee mode during the first two phases.
    pub fn is_chainsaw_active(&self) -> bool {
        self.mode == CombatMode::Melee && self.phase() <= 2
    }

    pub fn update(&mut self, boss: &mut Entity, world: &mut WorldState, dt: f64) -> Vec<EncounterSignal> {
        let mut signals = Vec::new();
        if let Some(signal) = advance_phase(
            &mut self.tracker,
            &self.triggers,
            boss,
            BossArchetype::Cyberboss,
            dt,
            world.elapsed,
        ) {
            signals.push(signal);
        }

        self.update_mode(dt);
        self.move_boss(boss, world, dt);

        // Existing hazards: age, hit, sweep
        self.puddles.tick(dt);
        self.lasers.tick(dt);
        let player = &world.player;
        let mut damage = 0.0;
        for puddle in self.puddles.iter() {
            damage += puddle.damage_to(player.position, player.radius, dt);
        }
        for laser in self.lasers.iter() {
            damage += laser.damage_to(boss.position, player.position, player.radius, dt);
        }
        world.player.apply_damage(scaled(boss, damage));
        self.puddles.sweep();
        self.lasers.sweep();

        self.spawn_puddles(world, dt);
        self.spawn_lasers(world, dt);
        signals
    }

    fn update_mode(&mut self, dt: f64) {
        if self.phase() >= 3 {
            self.mode = CombatMode::Ranged;
            return;
        }
        self.mode_timer += dt;
        let interval = self.tuning.mode_switch_interval;
        if interval > 0.0 && self.mode_timer >= interval {
            self.mode_timer = 0.0;
            self.mode = match self.mode {
                CombatMode::Melee => CombatMode::Ranged,
                CombatMode::Ranged => CombatMode::Melee,
            };
            tracing::debug!(mode = ?self.mode, "Cyberboss switched mode");
        }
    }

    fn move_boss(&self, boss: &mut Entity, world: &WorldState, dt: f64) {
        let player = world.player.position;
        match self.mode {
            CombatMode::Melee => move_boss_toward(boss, player, boss.speed, dt, &world.arena),
            CombatMode::Ranged => {
                let speed = boss.speed * self.tuning.ranged_speed_factor;
                let offset = boss.position - player;
                let distance = offset.length();
                if distance > self.tuning.preferred_range {
                    move_boss_toward(boss, player, speed, dt, &world.arena);
                } else if distance > f64::EPSILON {
                    // Back off to the preferred range
                    let retreat = player + offset / distance * self.tuning.preferred_range;
                    move_boss_toward(boss, retreat, speed, dt, &world.arena);
                }
            }
        }
    }

    fn spawn_puddles(&mut self, world: &mut WorldState, dt: f64) {
        if self.phase() < self.tuning.puddle_start_phase {
            return;
        }
        self.puddle_timer -= dt;
        if self.puddle_timer > 0.0 {
            return;
        }
        let t = &self.tuning;
        self.puddle_timer = world
            .random_range(t.puddle_interval_min, t.puddle_interval_max)
            .max(dt.max(f64::EPSILON));
        let center = world.player.position + world.random_offset(t.puddle_jitter);
        let id = self.puddles.spawn(|id| {
            Puddle::new(id, center, t.puddle_radius, t.puddle_warning_duration, t.puddle_max_lifetime)
                .with_damage(t.puddle_dps)
                .with_expiring_window(t.puddle_expiring_window)
        });
        tracing::debug!(id, x = center.x, y = center.y, "Spawned puddle");
    }

    fn spawn_lasers(&mut self, world: &mut WorldState, dt: f64) {
        if self.phase() < self.tuning.laser_start_phase {
            return;
        }
        self.laser_timer -= dt;
        if self.laser_timer > 0.0 || !self.lasers.is_empty() {
            return;
        }
        let t = &self.tuning;
        self.laser_timer = t.laser_interval;
        let count = if self.tracker.is_final() { t.phase4_laser_count } else { t.laser_count };
        if count == 0 {
            return;
        }
        let base = world.random_range(0.0, std::f64::consts::TAU);
        let step = std::f64::consts::TAU / count as f64;
        for i in 0..count {
            let angle = base + step * i as f64;
            self.lasers.spawn(|id| LaserBeam {
                id,
                angle,
                angular_speed: t.laser_angular_speed,
                length: t.laser_length,
                lifetime: 0.0,
                warning_duration: t.laser_warning_duration,
                active_duration: t.laser_active_duration,
                cycles: t.laser_cycles,
                warning_width: t.laser_warning_width,
                active_width: t.laser_active_width,
                dps: t.laser_dps,
            });
        }
        tracing::debug!(count, "Spawned laser volley");
    }
}
