//! Headless fight simulation with a scripted player.
//!
//! The autopilot circles the boss at a fixed range, stays inside any
//! published safe radius and fires hitscan shots on a fixed cadence. Shots go
//! to standing pylons first, then alternate between the boss and its body
//! segments. This is a balance probe, not a skilled player.

use std::f64::consts::TAU;

use bossfight_core::hazard::PylonPhase;
use bossfight_core::{BossArchetype, EncounterController, EncounterSnapshot, HazardView, Projectile, SignalHandler, WorldState};
use bossfight_types::{BalanceConfig, DifficultyProfile};
use glam::DVec2;

use crate::fight_log::FightLog;

#[derive(Debug, Clone)]
pub struct SimOptions {
    pub boss_id: String,
    pub seed: u64,
    pub threat_level: u32,
    pub difficulty: Option<DifficultyProfile>,
    /// Simulated seconds before the run is called a timeout
    pub time_limit: f64,
    pub tick_rate: f64,
    /// Player damage per second against the boss
    pub player_dps: f64,
    pub player_speed: f64,
    /// Distance the autopilot keeps from the boss
    pub kite_range: f64,
    pub echo_signals: bool,
}

impl SimOptions {
    pub fn new(boss_id: impl Into<String>) -> Self {
        Self {
            boss_id: boss_id.into(),
            seed: 1,
            threat_level: 0,
            difficulty: None,
            time_limit: 300.0,
            tick_rate: 60.0,
            player_dps: 400.0,
            player_speed: 220.0,
            kite_range: 260.0,
            echo_signals: false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Victory,
    Defeat,
    Timeout,
}

impl std::fmt::Display for Outcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Victory => "victory",
            Self::Defeat => "defeat",
            Self::Timeout => "timeout",
        })
    }
}

#[derive(Debug, Clone)]
pub struct SimOutcome {
    pub boss_id: String,
    pub seed: u64,
    pub threat_level: u32,
    pub outcome: Outcome,
    pub elapsed: f64,
    pub phase_reached: u8,
    pub player_health: f64,
    /// Boss HP fraction left at the end (0 on victory)
    pub boss_hp: f64,
    pub phase_changes: usize,
    pub pylons_destroyed: usize,
    pub dashes: usize,
    pub timeline: Vec<(f64, String)>,
}

const FIRE_INTERVAL: f64 = 0.2;
const SHOT_RADIUS: f64 = 6.0;

/// Run one fight to completion or timeout.
pub fn run_simulation(config: &BalanceConfig, options: &SimOptions) -> SimOutcome {
    let mut world = WorldState::with_seed(Default::default(), options.seed);
    let mut controller = EncounterController::new(config.clone());
    controller.set_difficulty(options.difficulty);
    controller.initialize_encounter(&options.boss_id, &mut world);

    let mut log = FightLog::new(options.echo_signals);
    log.handle_signals(&controller.drain_signals(), None);

    let dt = 1.0 / options.tick_rate.max(1.0);
    let shot_damage = options.player_dps * FIRE_INTERVAL;
    let mut autopilot = Autopilot::new(options);
    let mut snapshot = controller.snapshot(&world);
    let mut phase_reached = snapshot.phase;

    let outcome = loop {
        if world.victory {
            break Outcome::Victory;
        }
        if world.player.is_dead() {
            break Outcome::Defeat;
        }
        if world.elapsed >= options.time_limit {
            break Outcome::Timeout;
        }

        autopilot.steer(&mut world, &snapshot, dt);
        if let Some(target) = autopilot.fire(&snapshot, dt) {
            world.projectiles.push(Projectile::new(target, SHOT_RADIUS, shot_damage));
        }
        host_projectile_pass(&mut world);
        controller.check_body_segment_collisions(&mut world);
        world.prune_projectiles();

        controller.update(&mut world, dt);
        world.prune_projectiles();
        host_body_contact(&mut world, dt);
        apply_safe_radius(&mut world, dt);

        snapshot = controller.snapshot(&world);
        phase_reached = phase_reached.max(snapshot.phase);
        log.handle_signals(&controller.drain_signals(), Some(&snapshot));
    };

    tracing::debug!(
        boss_id = %options.boss_id,
        seed = options.seed,
        %outcome,
        elapsed = world.elapsed,
        "Simulation finished"
    );

    SimOutcome {
        boss_id: options.boss_id.clone(),
        seed: options.seed,
        threat_level: options.threat_level,
        outcome,
        elapsed: world.elapsed,
        phase_reached,
        player_health: world.player.health,
        boss_hp: world.living_boss().map_or(0.0, |b| b.hp_fraction()),
        phase_changes: log.phase_changes,
        pylons_destroyed: log.pylons_destroyed,
        dashes: log.dashes,
        timeline: log.entries,
    }
}

/// The host's own hit test: shots overlapping the boss damage it directly.
fn host_projectile_pass(world: &mut WorldState) {
    let WorldState {
        entities,
        projectiles,
        ..
    } = world;
    let Some(boss) = entities.iter_mut().find(|e| e.is_living_boss()) else {
        return;
    };
    for shot in projectiles.iter_mut().filter(|p| p.alive) {
        if shot.position.distance(boss.position) <= shot.radius + boss.radius {
            boss.apply_damage(shot.damage);
            shot.on_hit();
        }
    }
}

/// World collision against the boss body. The wyrm's chains deal their own
/// contact damage.
fn host_body_contact(world: &mut WorldState, dt: f64) {
    let Some(boss) = world.living_boss() else {
        return;
    };
    if boss.archetype == Some(BossArchetype::TrojanWyrm) {
        return;
    }
    let touching = world.player.position.distance(boss.position) <= world.player.radius + boss.radius;
    if touching {
        let amount = boss.damage * dt;
        world.player.apply_damage(amount);
    }
}

/// World collision for an arena-shrink mechanic: standing outside the safe
/// radius burns.
fn apply_safe_radius(world: &mut WorldState, dt: f64) {
    const OUTSIDE_DPS: f64 = 20.0;
    let Some(radius) = world.safe_radius else {
        return;
    };
    if world.player.position.distance(world.arena.center()) > radius {
        world.player.apply_damage(OUTSIDE_DPS * dt);
    }
}

struct Autopilot {
    speed: f64,
    range: f64,
    orbit: f64,
    fire_timer: f64,
    shots: u64,
}

impl Autopilot {
    fn new(options: &SimOptions) -> Self {
        Self {
            speed: options.player_speed,
            range: options.kite_range,
            orbit: 0.0,
            fire_timer: 0.0,
            shots: 0,
        }
    }

    fn steer(&mut self, world: &mut WorldState, snapshot: &EncounterSnapshot, dt: f64) {
        let Some(boss) = snapshot.boss.as_ref() else {
            return;
        };
        let center = world.arena.center();
        self.orbit = (self.orbit + 0.4 * dt).rem_euclid(TAU);
        let mut goal = boss.position + DVec2::new(self.orbit.cos(), self.orbit.sin()) * self.range;
        if let Some(radius) = snapshot.arena_radius {
            let limit = (radius - world.player.radius * 2.0).max(0.0);
            let offset = goal - center;
            if offset.length() > limit {
                goal = center + offset.normalize_or_zero() * limit;
            }
        }

        let offset = goal - world.player.position;
        let step = self.speed * dt;
        let velocity = if offset.length() <= step {
            offset / dt.max(f64::EPSILON)
        } else {
            offset.normalize() * self.speed
        };
        world.push_player(velocity, dt);
    }

    fn fire(&mut self, snapshot: &EncounterSnapshot, dt: f64) -> Option<DVec2> {
        self.fire_timer -= dt;
        if self.fire_timer > 0.0 {
            return None;
        }
        self.fire_timer += FIRE_INTERVAL;
        self.shots += 1;

        let pylon = snapshot.hazards.iter().find_map(|h| match h {
            HazardView::Pylon {
                position,
                phase: PylonPhase::Damageable,
                ..
            } => Some(*position),
            _ => None,
        });
        if pylon.is_some() {
            return pylon;
        }

        if self.shots % 2 == 0 {
            let segment = snapshot.hazards.iter().find_map(|h| match h {
                HazardView::Segment {
                    position, ghost: false, ..
                } => Some(*position),
                _ => None,
            });
            if segment.is_some() {
                return segment;
            }
        }
        snapshot.boss.as_ref().map(|b| b.position)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn boss_on_player(world: &WorldState, archetype: Option<BossArchetype>) -> bossfight_core::Entity {
        bossfight_core::Entity {
            id: 0,
            position: world.player.position,
            radius: 30.0,
            health: 100.0,
            max_health: 100.0,
            speed: 0.0,
            damage: 20.0,
            damage_scale: 1.0,
            is_boss: true,
            archetype,
            is_invulnerable: false,
            is_dead: false,
        }
    }

    #[test]
    fn touching_the_boss_burns_at_its_contact_rate() {
        let mut world = WorldState::with_seed(Default::default(), 3);
        let boss = boss_on_player(&world, Some(BossArchetype::Cyberboss));
        world.spawn_entity(boss);
        host_body_contact(&mut world, 0.5);
        assert_eq!(world.player.health, 90.0);
    }

    #[test]
    fn wyrm_body_contact_is_left_to_its_chains() {
        let mut world = WorldState::with_seed(Default::default(), 3);
        let boss = boss_on_player(&world, Some(BossArchetype::TrojanWyrm));
        world.spawn_entity(boss);
        host_body_contact(&mut world, 0.5);
        assert_eq!(world.player.health, 100.0);
    }

    #[test]
    fn unknown_boss_still_dies_to_gunfire() {
        let config = BalanceConfig::default();
        let mut options = SimOptions::new("training_dummy");
        options.player_dps = 2000.0;
        let outcome = run_simulation(&config, &options);
        assert_eq!(outcome.outcome, Outcome::Victory);
        assert_eq!(outcome.phase_reached, 0);
        assert_eq!(outcome.boss_hp, 0.0);
    }

    #[test]
    fn same_seed_same_fight() {
        let config = BalanceConfig::default();
        let mut options = SimOptions::new("cyberboss");
        options.time_limit = 20.0;
        let a = run_simulation(&config, &options);
        let b = run_simulation(&config, &options);
        assert_eq!(a.timeline, b.timeline);
        assert_eq!(a.player_health, b.player_health);
    }

    #[test]
    fn timeout_reports_remaining_hp() {
        let config = BalanceConfig::default();
        let mut options = SimOptions::new("trojan_wyrm");
        options.time_limit = 1.0;
        options.player_dps = 1.0;
        let outcome = run_simulation(&config, &options);
        assert_eq!(outcome.outcome, Outcome::Timeout);
        assert!(outcome.boss_hp > 0.9);
    }
}
