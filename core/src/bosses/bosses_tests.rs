//! Properties every phase machine must hold over long runs.

use bossfight_types::{BalanceConfig, BossDefinition};
use glam::DVec2;

use super::{ActiveBoss, BossArchetype};
use crate::hazard::{BeamPhase, PuddlePhase, TileState};
use crate::signal::EncounterSignal;
use crate::world::{ArenaBounds, Entity, Projectile, WorldState};

fn spawn(archetype: BossArchetype, seed: u64) -> (ActiveBoss, Entity, WorldState) {
    let config = BalanceConfig::default();
    let mut world = WorldState::with_seed(ArenaBounds::default(), seed);
    let definition = config
        .boss(archetype.config_key())
        .cloned()
        .unwrap_or_else(BossDefinition::fallback);
    let stats = &definition.stats;
    let boss = Entity {
        id: 1,
        position: world.arena.boss_spawn_point(),
        radius: stats.radius,
        health: stats.base_health,
        max_health: stats.base_health,
        speed: stats.speed,
        damage: stats.damage,
        damage_scale: 1.0,
        is_boss: true,
        archetype: Some(archetype),
        is_invulnerable: false,
        is_dead: false,
    };
    let active = ActiveBoss::new(Some(archetype), &config, &definition, &boss, &mut world);
    (active, boss, world)
}

/// Shoot every standing pylon so the shield phase cannot stall a long run.
fn shoot_pylons(active: &ActiveBoss, world: &mut WorldState) {
    if let ActiveBoss::VoidHarbinger(state) = active {
        for pylon in state.pylons.iter().filter(|p| !p.is_destroyed()) {
            world.projectiles.push(Projectile::new(pylon.position, 4.0, 1.0e6));
        }
    }
}

#[test]
fn phases_only_step_forward() {
    for archetype in BossArchetype::ALL {
        let (mut active, mut boss, mut world) = spawn(archetype, 9);
        let chip = boss.max_health * 0.001;
        let mut last = active.phase();
        let mut transitions = Vec::new();

        for _ in 0..6000 {
            if boss.is_dead {
                break;
            }
            boss.apply_damage(chip);
            shoot_pylons(&active, &mut world);
            for signal in active.update(&mut boss, &mut world, 1.0 / 30.0) {
                if let EncounterSignal::PhaseChanged { old_phase, new_phase, .. } = signal {
                    transitions.push((old_phase, new_phase));
                }
            }
            world.prune_projectiles();

            let phase = active.phase();
            assert!(phase == last || phase == last + 1, "{archetype}: {last} -> {phase}");
            last = phase;
        }

        assert!(boss.is_dead, "{archetype} never died");
        assert_eq!(transitions, vec![(1, 2), (2, 3), (3, 4)], "{archetype}");
    }
}

#[test]
fn hazard_sub_phases_match_their_damage() {
    let (mut active, mut boss, mut world) = spawn(BossArchetype::Cyberboss, 5);
    boss.health = boss.max_health * 0.2;
    let mut seen_puddles = 0;
    let mut seen_lasers = 0;

    for _ in 0..1200 {
        active.update(&mut boss, &mut world, 1.0 / 60.0);
        let ActiveBoss::Cyberboss(state) = &active else {
            panic!("expected cyberboss");
        };
        for puddle in state.puddles.iter() {
            seen_puddles += 1;
            let on_top = puddle.damage_to(puddle.center, 1.0, 1.0);
            match puddle.sub_phase() {
                PuddlePhase::Warning | PuddlePhase::Expired => assert_eq!(on_top, 0.0),
                PuddlePhase::Active | PuddlePhase::Expiring => assert_eq!(on_top, puddle.dps),
            }
            assert_ne!(puddle.sub_phase(), PuddlePhase::Expired, "swept puddle still listed");
        }
        for laser in state.lasers.iter() {
            seen_lasers += 1;
            assert_eq!(laser.is_active(), laser.sub_phase() == BeamPhase::Active);
            assert_ne!(laser.sub_phase(), BeamPhase::Expired);
        }
    }
    assert!(seen_puddles > 0);
    assert!(seen_lasers > 0);
}

#[test]
fn wyrm_links_keep_exact_spacing() {
    let (mut active, mut boss, mut world) = spawn(BossArchetype::TrojanWyrm, 21);
    let spacing = BalanceConfig::default().trojan_wyrm.segment_spacing;

    for tick in 0..4000 {
        // Walk the player around so the chain has to turn
        let t = tick as f64 / 60.0;
        world.player.position = world.arena.center() + DVec2::new(t.cos(), t.sin()) * 400.0;
        if tick % 500 == 0 {
            boss.health = (boss.health - boss.max_health * 0.2).max(1.0);
        }
        active.update(&mut boss, &mut world, 1.0 / 60.0);

        let ActiveBoss::TrojanWyrm(state) = &active else {
            panic!("expected wyrm");
        };
        for worm in state.worms.iter() {
            let mut leader = worm.head;
            for segment in &worm.segments {
                let gap = segment.distance(leader);
                assert!((gap - spacing).abs() < 1e-6, "tick {tick}: gap {gap}");
                leader = *segment;
            }
        }
    }
    assert_eq!(active.phase(), 4);
}

#[test]
fn tiles_only_step_to_their_successor() {
    let (mut active, mut boss, mut world) = spawn(BossArchetype::Overclocker, 13);
    boss.health = boss.max_health * 0.6;
    active.update(&mut boss, &mut world, 0.01);
    assert_eq!(active.phase(), 2);

    let states = |active: &ActiveBoss| -> Vec<TileState> {
        match active {
            ActiveBoss::Overclocker(s) => s
                .tiles
                .as_ref()
                .map(|g| g.tiles().iter().map(|t| t.state()).collect())
                .unwrap_or_default(),
            _ => Vec::new(),
        }
    };

    let mut previous = states(&active);
    assert!(!previous.is_empty());
    assert!(previous.iter().all(|s| matches!(s, TileState::Normal | TileState::Warning)));

    let steps = [0.016, 0.05, 0.3, 1.2, 2.5];
    for i in 0..2000 {
        active.update(&mut boss, &mut world, steps[i % steps.len()]);
        let current = states(&active);
        for (before, after) in previous.iter().zip(&current) {
            assert!(
                after == before || *after == before.next(),
                "illegal tile transition {before:?} -> {after:?}"
            );
        }
        previous = current;
    }
}

#[test]
fn void_invulnerability_tracks_pylons() {
    let (mut active, mut boss, mut world) = spawn(BossArchetype::VoidHarbinger, 4);
    boss.health = boss.max_health * 0.6;

    for _ in 0..200 {
        active.update(&mut boss, &mut world, 0.05);
        let ActiveBoss::VoidHarbinger(state) = &active else {
            panic!("expected void harbinger");
        };
        assert_eq!(boss.is_invulnerable, state.is_invulnerable());
        assert_eq!(
            state.energy_links(boss.position).len(),
            if state.is_invulnerable() { state.pylons.len() } else { 0 }
        );
    }
    // HP alone cannot carry the boss past its shield
    assert_eq!(active.phase(), 2);
}

#[test]
fn empty_slot_ignores_updates() {
    let mut world = WorldState::new(ArenaBounds::default());
    let mut boss = Entity {
        id: 1,
        position: DVec2::new(10.0, 10.0),
        radius: 10.0,
        health: 1.0,
        max_health: 1.0,
        speed: 100.0,
        damage: 1.0,
        damage_scale: 1.0,
        is_boss: true,
        archetype: None,
        is_invulnerable: false,
        is_dead: false,
    };
    let mut active = ActiveBoss::default();
    assert!(active.update(&mut boss, &mut world, 1.0).is_empty());
    assert_eq!(boss.position, DVec2::new(10.0, 10.0));
    assert_eq!(active.phase(), 0);
    assert!(active.tracker().is_none());
}
