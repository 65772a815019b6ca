//! Boss encounter controller
//!
//! The controller owns the AI state of the boss currently in the arena and
//! dispatches each tick to the matching phase machine. The boss entity itself
//! stays in the world's entity list; the controller only remembers its
//! archetype, its last position and whether the encounter has resolved.
//!
//! Per tick:
//! 1. Advance the world clock
//! 2. Find the living boss; if none remains, resolve the encounter once
//! 3. Hand the boss, the world and `dt` to the phase machine
//! 4. Queue the machine's signals for [`EncounterController::drain_signals`]

use bossfight_types::{BalanceConfig, DifficultyProfile};
use glam::DVec2;

use crate::bosses::{ActiveBoss, BossArchetype};
use crate::config::{classify_boss_id, resolve_definition};
use crate::difficulty;
use crate::signal::EncounterSignal;
use crate::snapshot::EncounterSnapshot;
use crate::world::{Entity, EntityId, WorldState};


#[derive(Debug)]
pub struct EncounterController {
    config: BalanceConfig,
    difficulty: Option<DifficultyProfile>,
    active: ActiveBoss,
    boss_id: Option<String>,
    boss_entity: Option<EntityId>,
    archetype: Option<BossArchetype>,
    last_boss_position: DVec2,
    started: bool,
    resolved: bool,
    /// World tick on which body-segment collisions last ran
    last_segment_check: Option<u64>,
    signals: Vec<EncounterSignal>,
}

impl EncounterController {
    pub fn new(config: BalanceConfig) -> Self {
        Self {
            config,
            difficulty: None,
            active: ActiveBoss::None,
            boss_id: None,
            boss_entity: None,
            archetype: None,
            last_boss_position: DVec2::ZERO,
            started: false,
            resolved: false,
            last_segment_check: None,
            signals: Vec::new(),
        }
    }

    /// Difficulty used by the next [`Self::initialize_encounter`]. Has no
    /// effect on a boss already spawned.
    pub fn set_difficulty(&mut self, profile: Option<DifficultyProfile>) {
        self.difficulty = profile;
    }

    pub fn difficulty(&self) -> Option<&DifficultyProfile> {
        self.difficulty.as_ref()
    }

    pub fn config(&self) -> &BalanceConfig {
        &self.config
    }

    /// Spawn the boss for `boss_id` and allocate its phase machine.
    ///
    /// Unknown ids still spawn a boss (with fallback stats) but get no AI.
    /// Any boss left over from a previous encounter is removed first.
    pub fn initialize_encounter(&mut self, boss_id: &str, world: &mut WorldState) -> EntityId {
        if world.entities.iter().any(|e| e.is_boss) {
            tracing::debug!("Removing boss from previous encounter");
            world.entities.retain(|e| !e.is_boss);
        }

        let archetype = classify_boss_id(boss_id);
        if archetype.is_none() {
            tracing::warn!(boss_id, "Unrecognised boss id, spawning without AI");
        }
        let definition = resolve_definition(&self.config, boss_id, archetype);
        let stats = difficulty::scale(&definition.stats, self.difficulty.as_ref());

        let position = world.arena.boss_spawn_point();
        let boss = Entity {
            id: 0,
            position,
            radius: stats.radius,
            health: stats.base_health,
            max_health: stats.base_health,
            speed: stats.speed,
            damage: stats.damage,
            damage_scale: difficulty::damage_scale(self.difficulty.as_ref()),
            is_boss: true,
            archetype,
            is_invulnerable: false,
            is_dead: false,
        };
        self.active = ActiveBoss::new(archetype, &self.config, &definition, &boss, world);
        let entity_id = world.spawn_entity(boss);

        world.game_over = false;
        world.victory = false;
        world.safe_radius = None;

        self.boss_id = Some(boss_id.to_string());
        self.boss_entity = Some(entity_id);
        self.archetype = archetype;
        self.last_boss_position = position;
        self.started = true;
        self.resolved = false;
        self.last_segment_check = None;

        tracing::info!(
            boss_id,
            archetype = ?archetype,
            health = stats.base_health,
            phases = definition.phase_count(),
            "Encounter started"
        );
        self.signals.push(EncounterSignal::EncounterStarted {
            boss_id: boss_id.to_string(),
            entity_id,
            archetype,
            elapsed: world.elapsed,
        });
        entity_id
    }

    /// Run one simulation tick.
    pub fn update(&mut self, world: &mut WorldState, dt: f64) {
        if !dt.is_finite() || dt < 0.0 {
            tracing::warn!(dt, "Ignoring invalid tick delta");
            return;
        }
        world.tick += 1;
        world.elapsed += dt;

        let Some(index) = world.living_boss_index() else {
            if self.started && !self.resolved {
                self.resolve(world);
            }
            return;
        };

        if self.active.is_none() {
            // No machine allocated for this boss: nothing to drive
            self.last_boss_position = world.entities[index].position;
            return;
        }

        // Detach the boss so the machine can borrow it next to the world
        let mut boss = world.entities.remove(index);
        let signals = self.active.update(&mut boss, world, dt);
        self.last_boss_position = boss.position;
        world.entities.insert(index, boss);
        self.signals.extend(signals);
    }

    /// Projectile hits against the wyrm's body segments.
    ///
    /// Call after the host's own projectile pass. Runs at most once per world
    /// tick; repeated calls within a tick hit nothing.
    pub fn check_body_segment_collisions(&mut self, world: &mut WorldState) -> usize {
        if self.last_segment_check == Some(world.tick) {
            return 0;
        }
        self.last_segment_check = Some(world.tick);

        let ActiveBoss::TrojanWyrm(state) = &self.active else {
            return 0;
        };
        let Some(index) = world.living_boss_index() else {
            return 0;
        };
        let WorldState {
            entities,
            projectiles,
            ..
        } = world;
        state.check_body_segment_collisions(&mut entities[index], projectiles)
    }

    /// Take every signal queued since the last call.
    pub fn drain_signals(&mut self) -> Vec<EncounterSignal> {
        std::mem::take(&mut self.signals)
    }

    pub fn snapshot(&self, world: &WorldState) -> EncounterSnapshot {
        EncounterSnapshot::capture(&self.active, world)
    }

    pub fn active_boss(&self) -> &ActiveBoss {
        &self.active
    }

    pub fn archetype(&self) -> Option<BossArchetype> {
        self.archetype
    }

    pub fn boss_id(&self) -> Option<&str> {
        self.boss_id.as_deref()
    }

    pub fn boss_entity(&self) -> Option<EntityId> {
        self.boss_entity
    }

    /// Current phase, or 0 with no machine allocated.
    pub fn phase(&self) -> u8 {
        self.active.phase()
    }

    pub fn is_started(&self) -> bool {
        self.started
    }

    pub fn is_resolved(&self) -> bool {
        self.resolved
    }

    /// The boss is gone: emit death and victory once, then drop all boss state.
    fn resolve(&mut self, world: &mut WorldState) {
        let position = self
            .boss_entity
            .and_then(|id| world.entities.iter().find(|e| e.id == id))
            .map_or(self.last_boss_position, |e| e.position);

        tracing::info!(
            archetype = ?self.archetype,
            x = position.x,
            y = position.y,
            elapsed = world.elapsed,
            "Boss defeated"
        );
        self.signals.push(EncounterSignal::BossDied {
            position,
            archetype: self.archetype,
            elapsed: world.elapsed,
        });
        self.signals.push(EncounterSignal::EncounterResolved {
            victory: true,
            elapsed: world.elapsed,
        });

        world.victory = true;
        world.game_over = true;
        world.safe_radius = None;
        world.remove_dead_bosses();

        self.active = ActiveBoss::None;
        self.resolved = true;
        tracing::info!("Encounter resolved");
    }
}
