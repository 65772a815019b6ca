//! Per-boss phase machines
//!
//! Each archetype owns a private state struct holding its [`PhaseTracker`],
//! its hazard registries and its timers. A state is created with `new` when
//! the encounter starts and driven by `update(boss, world, dt)` once per tick.
//! The controller only ever sees them through [`ActiveBoss`].

mod cyberboss;
mod overclocker;
mod trojan_wyrm;
mod void_harbinger;

#[cfg(test)]
mod bosses_tests;

pub use cyberboss::{CombatMode, CyberbossState};
pub use overclocker::{check_mechanics_damage, vacuum_force, wind_force, ForceField, OverclockerState};
pub use trojan_wyrm::{Phase4SubState, TrojanWyrmState};
pub use void_harbinger::VoidHarbingerState;

use bossfight_types::{BalanceConfig, BossDefinition, PhaseTrigger};
use glam::DVec2;
use serde::{Deserialize, Serialize};

use crate::geometry;
use crate::phase::PhaseTracker;
use crate::signal::EncounterSignal;
use crate::world::{ArenaBounds, Entity, WorldState};

/// Which phase machine drives a boss.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BossArchetype {
    Cyberboss,
    VoidHarbinger,
    Overclocker,
    TrojanWyrm,
}

impl BossArchetype {
    pub const ALL: [BossArchetype; 4] = [
        BossArchetype::Cyberboss,
        BossArchetype::VoidHarbinger,
        BossArchetype::Overclocker,
        BossArchetype::TrojanWyrm,
    ];

    /// Key of this archetype's default entry in the balance table.
    pub fn config_key(self) -> &'static str {
        match self {
            Self::Cyberboss => "cyberboss",
            Self::VoidHarbinger => "void_harbinger",
            Self::Overclocker => "overclocker",
            Self::TrojanWyrm => "trojan_wyrm",
        }
    }
}

impl std::fmt::Display for BossArchetype {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.config_key())
    }
}

/// AI state for the boss currently in the arena.
#[derive(Debug, Clone, Default)]
pub enum ActiveBoss {
    #[default]
    None,
    Cyberboss(CyberbossState),
    VoidHarbinger(VoidHarbingerState),
    Overclocker(OverclockerState),
    TrojanWyrm(TrojanWyrmState),
}

impl ActiveBoss {
    /// Allocate the initial state for `archetype`. `None` yields an inert slot.
    pub fn new(
        archetype: Option<BossArchetype>,
        config: &BalanceConfig,
        definition: &BossDefinition,
        boss: &Entity,
        world: &mut WorldState,
    ) -> Self {
        let triggers = definition.phases.clone();
        match archetype {
            Some(BossArchetype::Cyberboss) => {
                Self::Cyberboss(CyberbossState::new(config.cyberboss.clone(), triggers, world))
            }
            Some(BossArchetype::VoidHarbinger) => Self::VoidHarbinger(VoidHarbingerState::new(
                config.void_harbinger.clone(),
                triggers,
                world,
            )),
            Some(BossArchetype::Overclocker) => {
                Self::Overclocker(OverclockerState::new(config.overclocker.clone(), triggers))
            }
            Some(BossArchetype::TrojanWyrm) => Self::TrojanWyrm(TrojanWyrmState::new(
                config.trojan_wyrm.clone(),
                triggers,
                boss,
            )),
            None => Self::None,
        }
    }

    pub fn archetype(&self) -> Option<BossArchetype> {
        match self {
            Self::None => None,
            Self::Cyberboss(_) => Some(BossArchetype::Cyberboss),
            Self::VoidHarbinger(_) => Some(BossArchetype::VoidHarbinger),
            Self::Overclocker(_) => Some(BossArchetype::Overclocker),
            Self::TrojanWyrm(_) => Some(BossArchetype::TrojanWyrm),
        }
    }

    pub fn is_none(&self) -> bool {
        matches!(self, Self::None)
    }

    pub fn tracker(&self) -> Option<&PhaseTracker> {
        match self {
            Self::None => None,
            Self::Cyberboss(s) => Some(&s.tracker),
            Self::VoidHarbinger(s) => Some(&s.tracker),
            Self::Overclocker(s) => Some(&s.tracker),
            Self::TrojanWyrm(s) => Some(&s.tracker),
        }
    }

    /// Current phase, or 0 when no machine is allocated.
    pub fn phase(&self) -> u8 {
        self.tracker().map_or(0, PhaseTracker::phase)
    }

    /// Run one tick of the owning machine. A `None` slot is a no-op.
    pub fn update(&mut self, boss: &mut Entity, world: &mut WorldState, dt: f64) -> Vec<EncounterSignal> {
        match self {
            Self::None => Vec::new(),
            Self::Cyberboss(s) => s.update(boss, world, dt),
            Self::VoidHarbinger(s) => s.update(boss, world, dt),
            Self::Overclocker(s) => s.update(boss, world, dt),
            Self::TrojanWyrm(s) => s.update(boss, world, dt),
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// Shared machine helpers
// ═══════════════════════════════════════════════════════════════════════════

/// Advance the phase clock and take the next transition if its trigger fired.
pub(crate) fn advance_phase(
    tracker: &mut PhaseTracker,
    triggers: &[PhaseTrigger],
    boss: &Entity,
    archetype: BossArchetype,
    dt: f64,
    elapsed: f64,
) -> Option<EncounterSignal> {
    tracker.tick(dt);
    let change = tracker.evaluate(triggers, boss.hp_fraction())?;
    tracing::info!(
        %archetype,
        old_phase = change.from,
        new_phase = change.to,
        hp = boss.hp_fraction(),
        "Boss phase changed"
    );
    Some(EncounterSignal::PhaseChanged {
        archetype,
        old_phase: change.from,
        new_phase: change.to,
        elapsed,
    })
}

/// Step the boss toward `target` and keep it inside the arena.
pub(crate) fn move_boss_toward(boss: &mut Entity, target: DVec2, speed: f64, dt: f64, arena: &ArenaBounds) {
    if !(speed > 0.0) || !(dt > 0.0) {
        return;
    }
    let next = geometry::move_toward(boss.position, target, speed * dt);
    boss.position = arena.clamp(next, boss.radius);
}

/// Per-tick player damage from a damage-per-second figure, scaled by the
/// boss's difficulty multiplier.
pub(crate) fn scaled(boss: &Entity, amount: f64) -> f64 {
    amount * boss.damage_scale
}
