//! Trojan Wyrm
//!
//! The boss entity is the head of the main chain (`worms[0]`). Phase 2 flags a
//! ghost segment on a timer, phase 3 splits the body into sub-worms, and
//! phase 4 adds the aim-then-dash cycle on the main head.

use bossfight_types::{PhaseTrigger, TrojanWyrmTuning};
use glam::DVec2;
use serde::Serialize;

use super::{BossArchetype, advance_phase, scaled};
use crate::geometry;
use crate::hazard::{HazardRegistry, WormChain};
use crate::phase::PhaseTracker;
use crate::signal::EncounterSignal;
use crate::world::{Entity, Projectile, WorldState};

const GHOST_PHASE: u8 = 2;
const SPLIT_PHASE: u8 = 3;
const DASH_PHASE: u8 = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase4SubState {
    Chasing,
    Aiming,
    Dashing,
    Recovering,
}

#[derive(Debug, Clone)]
pub struct TrojanWyrmState {
    tuning: TrojanWyrmTuning,
    triggers: Vec<PhaseTrigger>,
    pub tracker: PhaseTracker,
    pub worms: HazardRegistry<WormChain>,
    ghost_timer: f64,
    pub sub_state: Phase4SubState,
    /// Countdown for the current sub-state
    sub_timer: f64,
    /// Last aimed direction (unit vector)
    aim_direction: DVec2,
    /// Player position the head aimed at this tick, while aiming
    aim_target: Option<DVec2>,
    /// Whether the current dash already connected
    dash_hit: bool,
}

impl TrojanWyrmState {
    pub fn new(tuning: TrojanWyrmTuning, triggers: Vec<PhaseTrigger>, boss: &Entity) -> Self {
        let mut worms = HazardRegistry::new();
        let heading = -std::f64::consts::FRAC_PI_2;
        worms.spawn(|id| {
            WormChain::straight(
                id,
                boss.position,
                heading,
                tuning.segment_count as usize,
                tuning.segment_spacing,
                tuning.segment_radius,
            )
        });
        Self {
            tracker: PhaseTracker::for_triggers(&triggers),
            worms,
            ghost_timer: 0.0,
            sub_state: Phase4SubState::Chasing,
            sub_timer: tuning.dash_cooldown,
            aim_direction: geometry::angle_to_dir(heading),
            aim_target: None,
            dash_hit: false,
            tuning,
            triggers,
        }
    }

    pub fn phase(&self) -> u8 {
        self.tracker.phase()
    }

    pub fn main_worm(&self) -> Option<&WormChain> {
        self.worms.iter().next()
    }

    /// Line from the main head to the player's current position, while aiming.
    pub fn aim_line(&self) -> Option<(DVec2, DVec2)> {
        if self.sub_state != Phase4SubState::Aiming {
            return None;
        }
        Some((self.main_worm()?.head, self.aim_target?))
    }

    /// Dash sub-state, only meaningful in the final phase.
    pub fn phase4_sub_state(&self) -> Option<Phase4SubState> {
        (self.phase() >= DASH_PHASE).then_some(self.sub_state)
    }

    pub fn update(&mut self, boss: &mut Entity, world: &mut WorldState, dt: f64) -> Vec<EncounterSignal> {
        let mut signals = Vec::new();
        let before = self.phase();
        if let Some(signal) = advance_phase(
            &mut self.tracker,
            &self.triggers,
            boss,
            BossArchetype::TrojanWyrm,
            dt,
            world.elapsed,
        ) {
            signals.push(signal);
            self.enter_phase(before, world, &mut signals);
        }

        self.worms.tick(dt);
        if self.phase() >= DASH_PHASE {
            self.update_dash(boss, world, dt, &mut signals);
        }
        self.move_worms(boss, world, dt);
        if self.phase() == GHOST_PHASE {
            self.update_ghost(world, dt);
        }

        if let Some(main) = self.main_worm() {
            boss.position = main.head;
        }
        let contact = self.touches_player(world);
        if contact {
            world.player.apply_damage(scaled(boss, self.tuning.contact_dps * dt));
        }
        signals
    }

    fn enter_phase(&mut self, from: u8, world: &mut WorldState, signals: &mut Vec<EncounterSignal>) {
        let to = self.phase();
        if from == GHOST_PHASE {
            for worm in self.worms.iter_mut() {
                worm.ghost_index = None;
            }
        }
        if to == GHOST_PHASE {
            self.ghost_timer = 0.0;
            self.toggle_ghost(world);
        }
        if to == SPLIT_PHASE {
            self.split();
            tracing::debug!(count = self.worms.len(), "Wyrm split into sub-worms");
            signals.push(EncounterSignal::WormSplit {
                count: self.worms.len(),
                elapsed: world.elapsed,
            });
        }
        if to == DASH_PHASE {
            self.sub_state = Phase4SubState::Chasing;
            self.sub_timer = self.tuning.dash_cooldown;
        }
    }

    /// Steer every chain that is free to move this tick.
    fn move_worms(&mut self, boss: &Entity, world: &WorldState, dt: f64) {
        let target = world.player.position;
        let (min, max) = (world.arena.min, world.arena.max);
        let turn_rate = self.tuning.head_turn_rate;
        let sub_speed = boss.speed * self.tuning.sub_worm_speed_factor;
        // Aiming, dashing and recovering hold the main head's steering
        let main_free = self.phase() < DASH_PHASE || self.sub_state == Phase4SubState::Chasing;

        for (i, worm) in self.worms.iter_mut().enumerate() {
            if i == 0 {
                if main_free {
                    worm.steer_toward(target, boss.speed, turn_rate, dt);
                }
            } else {
                worm.steer_toward(target, sub_speed, turn_rate, dt);
            }
            worm.confine(min, max);
        }
    }

    fn update_ghost(&mut self, world: &mut WorldState, dt: f64) {
        let interval = self.tuning.ghost_toggle_interval;
        if !(interval > 0.0) {
            return;
        }
        self.ghost_timer += dt;
        if self.ghost_timer >= interval {
            self.ghost_timer = 0.0;
            self.toggle_ghost(world);
        }
    }

    /// Flip the main chain's ghost flag: off → a random segment, on → off.
    fn toggle_ghost(&mut self, world: &mut WorldState) {
        let Some(worm) = self.worms.iter_mut().next() else {
            return;
        };
        worm.ghost_index = match worm.ghost_index {
            Some(_) => None,
            None if worm.is_empty() => None,
            None => {
                let index = world.random_range(0.0, worm.len() as f64) as usize;
                Some(index.min(worm.len() - 1))
            }
        };
    }

    /// Cut the main chain into `sub_worm_count` chains. `worms[0]` keeps the
    /// original head so the boss position stays continuous.
    fn split(&mut self) {
        let Some(main) = self.main_worm().cloned() else {
            return;
        };
        let mut points = Vec::with_capacity(main.len() + 1);
        points.push(main.head);
        points.extend(main.segments.iter().copied());

        let count = (self.tuning.sub_worm_count.max(1) as usize).min(points.len());
        let chunk = points.len() / count;
        self.worms.clear();
        for k in 0..count {
            let start = k * chunk;
            let end = if k + 1 == count { points.len() } else { start + chunk };
            let chunk_points = &points[start..end];
            let head = chunk_points[0];
            // Keep each sub-worm facing the way its first link pointed
            let heading = if k == 0 {
                main.heading
            } else {
                let dir = points[start - 1] - head;
                dir.y.atan2(dir.x)
            };
            let segments = chunk_points[1..].to_vec();
            self.worms.spawn(|id| WormChain {
                id,
                head,
                heading,
                segments,
                spacing: main.spacing,
                segment_radius: main.segment_radius,
                ghost_index: None,
                lifetime: 0.0,
            });
        }
    }

    fn update_dash(&mut self, boss: &Entity, world: &mut WorldState, dt: f64, signals: &mut Vec<EncounterSignal>) {
        let player = world.player.position;
        let Some(head) = self.main_worm().map(|w| w.head) else {
            return;
        };
        self.sub_timer -= dt;
        let t = self.tuning.clone();

        match self.sub_state {
            Phase4SubState::Chasing => {
                if self.sub_timer <= 0.0 {
                    self.set_sub_state(Phase4SubState::Aiming, t.aim_duration, world.elapsed, signals);
                    self.aim_at(head, player);
                }
            }
            Phase4SubState::Aiming => {
                self.aim_at(head, player);
                if self.sub_timer <= 0.0 {
                    self.dash_hit = false;
                    self.aim_target = None;
                    self.set_sub_state(Phase4SubState::Dashing, t.dash_duration, world.elapsed, signals);
                }
            }
            Phase4SubState::Dashing => {
                let distance = t.dash_speed * dt;
                let direction = self.aim_direction;
                let (min, max) = (world.arena.min, world.arena.max);
                if let Some(worm) = self.worms.iter_mut().next() {
                    worm.move_along(direction, distance);
                    worm.confine(min, max);
                    if !self.dash_hit
                        && geometry::circles_overlap(
                            worm.head,
                            boss.radius,
                            world.player.position,
                            world.player.radius,
                        )
                    {
                        self.dash_hit = true;
                        world.player.apply_damage(scaled(boss, t.dash_damage));
                        tracing::debug!("Wyrm dash connected");
                    }
                }
                if self.sub_timer <= 0.0 {
                    self.set_sub_state(Phase4SubState::Recovering, t.recover_duration, world.elapsed, signals);
                }
            }
            Phase4SubState::Recovering => {
                if self.sub_timer <= 0.0 {
                    self.set_sub_state(Phase4SubState::Chasing, t.dash_cooldown, world.elapsed, signals);
                }
            }
        }
    }

    fn aim_at(&mut self, head: DVec2, player: DVec2) {
        let offset = player - head;
        if offset.length_squared() > f64::EPSILON {
            self.aim_direction = offset.normalize();
        }
        self.aim_target = Some(player);
    }

    fn set_sub_state(&mut self, to: Phase4SubState, duration: f64, elapsed: f64, signals: &mut Vec<EncounterSignal>) {
        let from = self.sub_state;
        self.sub_state = to;
        self.sub_timer = duration;
        tracing::debug!(?from, ?to, "Wyrm dash state changed");
        signals.push(EncounterSignal::DashStateChanged { from, to, elapsed });
    }

    fn touches_player(&self, world: &WorldState) -> bool {
        let player = &world.player;
        self.worms.iter().any(|worm| {
            geometry::circles_overlap(worm.head, worm.segment_radius, player.position, player.radius)
                || worm.segment_hit_by(player.position, player.radius).is_some()
        })
    }

    /// Test live projectiles against solid body segments. Each projectile
    /// hits at most one segment; the boss takes a share of its damage.
    /// Sub-worm heads were body segments before the split and stay hittable;
    /// the main head is the boss entity itself.
    ///
    /// Must run once per tick, after the host's own projectile pass.
    pub fn check_body_segment_collisions(&self, boss: &mut Entity, projectiles: &mut [Projectile]) -> usize {
        let mut hits = 0;
        for projectile in projectiles.iter_mut().filter(|p| p.alive) {
            let hit = self.worms.iter().enumerate().any(|(i, worm)| {
                (i > 0
                    && geometry::circles_overlap(
                        worm.head,
                        worm.segment_radius,
                        projectile.position,
                        projectile.radius,
                    ))
                    || worm.segment_hit_by(projectile.position, projectile.radius).is_some()
            });
            if hit {
                boss.apply_damage(projectile.damage * self.tuning.segment_damage_multiplier);
                projectile.on_hit();
                hits += 1;
            }
        }
        hits
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::world::ArenaBounds;
    use bossfight_types::default_phase_triggers;

    fn setup() -> (TrojanWyrmState, Entity, WorldState) {
        let world = WorldState::with_seed(ArenaBounds::default(), 11);
        let boss = Entity {
            id: 1,
            position: world.arena.boss_spawn_point(),
            radius: 30.0,
            health: 1000.0,
            max_health: 1000.0,
            speed: 150.0,
            damage: 10.0,
            damage_scale: 1.0,
            is_boss: true,
            archetype: Some(BossArchetype::TrojanWyrm),
            is_invulnerable: false,
            is_dead: false,
        };
        let state = TrojanWyrmState::new(TrojanWyrmTuning::default(), default_phase_triggers(), &boss);
        (state, boss, world)
    }

    #[test]
    fn head_is_the_boss() {
        let (mut state, mut boss, mut world) = setup();
        for _ in 0..30 {
            state.update(&mut boss, &mut world, 1.0 / 60.0);
        }
        assert_eq!(Some(boss.position), state.main_worm().map(|w| w.head));
    }

    #[test]
    fn ghost_toggles_in_phase_two() {
        let (mut state, mut boss, mut world) = setup();
        boss.health = 700.0;
        state.update(&mut boss, &mut world, 0.1);
        assert_eq!(state.phase(), 2);
        let first = state.main_worm().and_then(|w| w.ghost_index);
        assert!(first.is_some());
        let interval = state.tuning.ghost_toggle_interval;
        let steps = (interval / 0.1).ceil() as usize + 1;
        for _ in 0..steps {
            state.update(&mut boss, &mut world, 0.1);
        }
        assert_eq!(state.main_worm().and_then(|w| w.ghost_index), None);
    }

    #[test]
    fn split_keeps_every_link() {
        let (mut state, mut boss, mut world) = setup();
        let total = state.main_worm().map_or(0, |w| w.len() + 1);
        boss.health = 450.0;
        let mut split = None;
        for _ in 0..3 {
            for signal in state.update(&mut boss, &mut world, 0.01) {
                if let EncounterSignal::WormSplit { count, .. } = signal {
                    split = Some(count);
                }
            }
        }
        assert_eq!(state.phase(), 3);
        assert_eq!(split, Some(state.tuning.sub_worm_count as usize));
        let links: usize = state.worms.iter().map(|w| w.len() + 1).sum();
        assert_eq!(links, total);
        assert_eq!(Some(boss.position), state.main_worm().map(|w| w.head));
    }

    #[test]
    fn sub_worm_heads_take_hits() {
        let (mut state, mut boss, mut world) = setup();
        boss.health = 450.0;
        for _ in 0..3 {
            state.update(&mut boss, &mut world, 0.01);
        }
        assert!(state.worms.len() > 1);

        let main_head = state.main_worm().map_or(DVec2::ZERO, |w| w.head);
        let far = main_head + DVec2::new(2000.0, 0.0);
        if let Some(sub) = state.worms.iter_mut().nth(1) {
            sub.move_head_to(far);
        }

        let mut shots = vec![Projectile::new(far, 0.5, 10.0)];
        let hits = state.check_body_segment_collisions(&mut boss, &mut shots);
        assert_eq!(hits, 1);
        assert_eq!(boss.health, 450.0 - 10.0 * state.tuning.segment_damage_multiplier);
        assert!(!shots[0].alive);

        // The main head is the boss entity; the host's pass owns that hit
        let mut shots = vec![Projectile::new(main_head, 0.5, 10.0)];
        assert_eq!(state.check_body_segment_collisions(&mut boss, &mut shots), 0);
    }

    #[test]
    fn dash_cycle_runs_in_order() {
        let (mut state, mut boss, mut world) = setup();
        boss.health = 200.0;
        let mut transitions = Vec::new();
        let mut aimed_lines = 0;
        for _ in 0..1000 {
            for signal in state.update(&mut boss, &mut world, 0.02) {
                if let EncounterSignal::DashStateChanged { from, to, .. } = signal {
                    transitions.push((from, to));
                }
            }
            if state.aim_line().is_some() {
                aimed_lines += 1;
            }
        }
        assert_eq!(state.phase(), 4);
        assert!(aimed_lines > 0);
        let expected = [
            (Phase4SubState::Chasing, Phase4SubState::Aiming),
            (Phase4SubState::Aiming, Phase4SubState::Dashing),
            (Phase4SubState::Dashing, Phase4SubState::Recovering),
            (Phase4SubState::Recovering, Phase4SubState::Chasing),
        ];
        assert!(transitions.len() >= 4);
        for (i, pair) in transitions.iter().enumerate() {
            assert_eq!(*pair, expected[i % 4]);
        }
    }

    #[test]
    fn dash_does_not_re_aim() {
        let (mut state, mut boss, mut world) = setup();
        boss.health = 200.0;
        while state.sub_state != Phase4SubState::Dashing {
            state.update(&mut boss, &mut world, 0.02);
        }
        let locked = state.aim_direction;
        world.player.position += DVec2::new(300.0, 0.0);
        state.update(&mut boss, &mut world, 0.02);
        assert_eq!(state.aim_direction, locked);
        assert!(state.aim_line().is_none());
    }

    #[test]
    fn each_projectile_hits_one_segment() {
        let (state, mut boss, _) = setup();
        let worm = state.main_worm().cloned().unwrap();
        // Sits between two adjacent segments, overlapping both
        let between = (worm.segments[3] + worm.segments[4]) * 0.5;
        let mut projectiles = vec![Projectile::new(between, 10.0, 100.0)];
        let hits = state.check_body_segment_collisions(&mut boss, &mut projectiles);
        assert_eq!(hits, 1);
        let expected = 1000.0 - 100.0 * state.tuning.segment_damage_multiplier;
        assert!((boss.health - expected).abs() < 1e-9);
        assert!(!projectiles[0].alive);

        // Consumed projectiles are skipped
        assert_eq!(state.check_body_segment_collisions(&mut boss, &mut projectiles), 0);
    }
}
