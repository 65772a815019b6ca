//! Void Harbinger
//!
//! - Phase 1: void zones dropped under the player
//! - Phase 2: shield pylons; the boss is invulnerable while any pylon stands
//! - Phase 3+: rotating rifts through the arena center and gravity wells
//! - Phase 4: the safe arena radius decays toward a floor

use std::f64::consts::{FRAC_PI_4, PI, TAU};

use bossfight_types::{PhaseTrigger, VoidHarbingerTuning};
use glam::DVec2;

use super::{BossArchetype, advance_phase, move_boss_toward, scaled};
use crate::geometry;
use crate::hazard::{GravityWell, HazardRegistry, Pylon, VoidRift, VoidZone};
use crate::phase::PhaseTracker;
use crate::signal::EncounterSignal;
use crate::world::{Entity, WorldState};

const PYLON_PHASE: u8 = 2;
const RIFT_PHASE: u8 = 3;
const SHRINK_PHASE: u8 = 4;

#[derive(Debug, Clone)]
pub struct VoidHarbingerState {
    tuning: VoidHarbingerTuning,
    triggers: Vec<PhaseTrigger>,
    pub tracker: PhaseTracker,
    zone_timer: f64,
    pub zones: HazardRegistry<VoidZone>,
    pub pylons: HazardRegistry<Pylon>,
    pub rifts: HazardRegistry<VoidRift>,
    pub wells: HazardRegistry<GravityWell>,
    initial_radius: f64,
    arena_radius: f64,
}

impl VoidHarbingerState {
    pub fn new(tuning: VoidHarbingerTuning, triggers: Vec<PhaseTrigger>, world: &mut WorldState) -> Self {
        let radius = world.arena.inscribed_radius();
        Self {
            tracker: PhaseTracker::for_triggers(&triggers),
            zone_timer: tuning.zone_interval,
            zones: HazardRegistry::new(),
            pylons: HazardRegistry::new(),
            rifts: HazardRegistry::new(),
            wells: HazardRegistry::new(),
            initial_radius: radius,
            arena_radius: radius,
            tuning,
            triggers,
        }
    }

    pub fn phase(&self) -> u8 {
        self.tracker.phase()
    }

    /// True while the boss is in its pylon phase and at least one pylon stands.
    pub fn is_invulnerable(&self) -> bool {
        self.phase() == PYLON_PHASE && self.pylons.iter().any(|p| !p.is_destroyed())
    }

    /// Link endpoints from each standing pylon to the boss. Derived from the
    /// same pylon list as [`Self::is_invulnerable`].
    pub fn energy_links(&self, boss_position: DVec2) -> Vec<(DVec2, DVec2)> {
        if self.phase() != PYLON_PHASE {
            return Vec::new();
        }
        self.pylons
            .iter()
            .filter(|p| !p.is_destroyed())
            .map(|p| (p.position, boss_position))
            .collect()
    }

    /// Current safe radius around the arena center.
    pub fn arena_radius(&self) -> f64 {
        self.arena_radius
    }

    pub fn arena_floor(&self) -> f64 {
        self.initial_radius * self.tuning.shrink_floor_fraction.clamp(0.0, 1.0)
    }

    pub fn update(&mut self, boss: &mut Entity, world: &mut WorldState, dt: f64) -> Vec<EncounterSignal> {
        let mut signals = Vec::new();
        let before = self.phase();
        if self.is_invulnerable() {
            // The pylon phase cannot end while the shield holds
            self.tracker.tick(dt);
        } else if let Some(signal) = advance_phase(
            &mut self.tracker,
            &self.triggers,
            boss,
            BossArchetype::VoidHarbinger,
            dt,
            world.elapsed,
        ) {
            signals.push(signal);
            self.enter_phase(before, world);
        }

        let center = world.arena.center();
        let target = if self.phase() == PYLON_PHASE { center } else { world.player.position };
        move_boss_toward(boss, target, boss.speed * self.tuning.speed_factor, dt, &world.arena);

        self.zones.tick(dt);
        self.pylons.tick(dt);
        self.rifts.tick(dt);
        self.wells.tick(dt);

        self.apply_effects(boss, world, dt);
        self.damage_pylons(world, &mut signals);
        boss.is_invulnerable = self.is_invulnerable();

        self.zones.sweep();
        self.pylons.sweep();

        if self.phase() == 1 {
            self.spawn_zones(world, dt);
        }
        if self.phase() >= SHRINK_PHASE {
            self.shrink_arena(world, dt);
        }
        signals
    }

    fn enter_phase(&mut self, from: u8, world: &mut WorldState) {
        let to = self.phase();
        if from == PYLON_PHASE {
            self.pylons.clear();
        }
        if to == PYLON_PHASE {
            self.spawn_pylons(world);
        }
        if to == RIFT_PHASE {
            self.spawn_rifts_and_wells(world);
        }
    }

    fn apply_effects(&self, boss: &Entity, world: &mut WorldState, dt: f64) {
        let position = world.player.position;
        let radius = world.player.radius;
        let mut damage = 0.0;
        let mut velocity = DVec2::ZERO;

        for zone in self.zones.iter() {
            damage += zone.damage_to(position, radius, dt);
            velocity += zone.push_on(position, radius);
        }
        for rift in self.rifts.iter() {
            damage += rift.damage_to(position, radius, dt);
        }
        for well in self.wells.iter() {
            velocity += well.pull_on(position);
        }

        world.player.apply_damage(scaled(boss, damage));
        world.push_player(velocity, dt);
    }

    /// Each live projectile hits at most one standing pylon.
    fn damage_pylons(&mut self, world: &mut WorldState, signals: &mut Vec<EncounterSignal>) {
        if self.pylons.is_empty() {
            return;
        }
        for projectile in world.projectiles.iter_mut().filter(|p| p.alive) {
            let Some(pylon) = self
                .pylons
                .iter_mut()
                .find(|p| !p.is_destroyed() && p.is_hit_by(projectile.position, projectile.radius))
            else {
                continue;
            };
            let destroyed = pylon.damage(projectile.damage);
            let pylon_id = pylon.id;
            projectile.on_hit();
            if destroyed {
                let remaining = self.pylons.iter().filter(|p| !p.is_destroyed()).count();
                tracing::debug!(pylon_id, remaining, "Pylon destroyed");
                signals.push(EncounterSignal::PylonDestroyed {
                    pylon_id,
                    remaining,
                    elapsed: world.elapsed,
                });
            }
        }
    }

    fn spawn_zones(&mut self, world: &mut WorldState, dt: f64) {
        self.zone_timer -= dt;
        if self.zone_timer > 0.0 {
            return;
        }
        let t = &self.tuning;
        self.zone_timer = t.zone_interval.max(dt.max(f64::EPSILON));
        let center = world.player.position;
        let id = self.zones.spawn(|id| VoidZone {
            id,
            center,
            radius: t.zone_radius,
            lifetime: 0.0,
            warning_duration: t.zone_warning_duration,
            max_lifetime: t.zone_max_lifetime,
            dps: t.zone_dps,
            push_speed: t.zone_push_speed,
        });
        tracing::debug!(id, x = center.x, y = center.y, "Spawned void zone");
    }

    fn spawn_pylons(&mut self, world: &WorldState) {
        let t = &self.tuning;
        let center = world.arena.center();
        let count = t.pylon_count.max(1);
        for i in 0..count {
            let angle = TAU * i as f64 / count as f64;
            let position = world
                .arena
                .clamp(center + geometry::angle_to_dir(angle) * t.pylon_ring_radius, t.pylon_radius);
            self.pylons.spawn(|id| {
                Pylon::new(id, position, t.pylon_radius, t.pylon_health, t.pylon_spawn_duration)
            });
        }
        tracing::debug!(count, "Spawned shield pylons");
    }

    fn spawn_rifts_and_wells(&mut self, world: &WorldState) {
        let t = &self.tuning;
        let center = world.arena.center();
        let rifts = t.rift_count.max(1);
        for i in 0..rifts {
            // Lines are symmetric, so spread them over a half turn
            let angle = PI * i as f64 / rifts as f64;
            self.rifts.spawn(|id| VoidRift {
                id,
                center,
                angle,
                angular_speed: t.rift_angular_speed,
                length: t.rift_length,
                width: t.rift_width,
                dps: t.rift_dps,
                lifetime: 0.0,
            });
        }
        for i in 0..t.well_count {
            let angle = FRAC_PI_4 + TAU * i as f64 / t.well_count as f64;
            let well_center = center + geometry::angle_to_dir(angle) * t.well_ring_radius;
            self.wells.spawn(|id| GravityWell {
                id,
                center: well_center,
                pull_radius: t.well_pull_radius,
                strength: t.well_strength,
                min_distance: t.well_min_distance,
                lifetime: 0.0,
            });
        }
        tracing::debug!(rifts, wells = t.well_count, "Spawned rifts and gravity wells");
    }

    fn shrink_arena(&mut self, world: &mut WorldState, dt: f64) {
        let floor = self.arena_floor();
        let rate = self.tuning.shrink_rate.max(0.0);
        self.arena_radius = floor + (self.arena_radius - floor) * (-rate * dt).exp();
        world.safe_radius = Some(self.arena_radius);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::world::{ArenaBounds, Projectile};
    use bossfight_types::default_phase_triggers;

    fn setup() -> (VoidHarbingerState, Entity, WorldState) {
        let mut world = WorldState::with_seed(ArenaBounds::default(), 3);
        let state = VoidHarbingerState::new(VoidHarbingerTuning::default(), default_phase_triggers(), &mut world);
        let boss = Entity {
            id: 1,
            position: world.arena.boss_spawn_point(),
            radius: 40.0,
            health: 1000.0,
            max_health: 1000.0,
            speed: 80.0,
            damage: 10.0,
            damage_scale: 1.0,
            is_boss: true,
            archetype: Some(BossArchetype::VoidHarbinger),
            is_invulnerable: false,
            is_dead: false,
        };
        (state, boss, world)
    }

    #[test]
    fn zones_only_in_phase_one() {
        let (mut state, mut boss, mut world) = setup();
        for _ in 0..300 {
            state.update(&mut boss, &mut world, 1.0 / 60.0);
        }
        assert!(!state.zones.is_empty());
        assert!(state.pylons.is_empty());
    }

    #[test]
    fn pylons_shield_the_boss_until_destroyed() {
        let (mut state, mut boss, mut world) = setup();
        boss.health = 700.0;
        state.update(&mut boss, &mut world, 0.1);
        assert_eq!(state.phase(), 2);
        assert!(boss.is_invulnerable);
        assert_eq!(state.energy_links(boss.position).len(), state.pylons.len());
        assert_eq!(boss.apply_damage(100.0), 0.0);

        // Let pylons finish spawning, then shoot each one down
        for _ in 0..10 {
            state.update(&mut boss, &mut world, 0.1);
        }
        let targets: Vec<_> = state.pylons.iter().map(|p| p.position).collect();
        for position in targets {
            let mut shot = Projectile::new(position, 4.0, 10_000.0);
            shot.piercing = false;
            world.projectiles.push(shot);
        }
        let signals = state.update(&mut boss, &mut world, 0.1);
        let destroyed = signals
            .iter()
            .filter(|s| matches!(s, EncounterSignal::PylonDestroyed { .. }))
            .count();
        assert_eq!(destroyed, 4);
        assert!(!boss.is_invulnerable);
        assert!(state.energy_links(boss.position).is_empty());
        assert!(world.projectiles.iter().all(|p| !p.alive));
    }

    #[test]
    fn arena_shrinks_toward_floor() {
        let (mut state, mut boss, mut world) = setup();
        boss.health = 100.0;
        for _ in 0..3 {
            state.update(&mut boss, &mut world, 0.1);
        }
        // Pylons hold phase 2; clear them so HP triggers can proceed
        state.pylons.clear();
        for _ in 0..3 {
            state.update(&mut boss, &mut world, 0.1);
        }
        assert_eq!(state.phase(), 4);
        let mut last = state.arena_radius();
        for _ in 0..2000 {
            state.update(&mut boss, &mut world, 0.1);
            let r = state.arena_radius();
            assert!(r <= last);
            assert!(r >= state.arena_floor());
            last = r;
        }
        assert_eq!(world.safe_radius, Some(state.arena_radius()));
        assert!(!state.rifts.is_empty());
    }
}
