//! Encounter signals for renderer, audio and logging collaborators.

use glam::DVec2;

use crate::bosses::{BossArchetype, Phase4SubState};
use crate::hazard::HazardId;
use crate::snapshot::EncounterSnapshot;
use crate::world::EntityId;

/// Discrete things that happened during a tick. Continuous state (hazard
/// positions, forces) is read from the snapshot instead.
#[derive(Debug, Clone, PartialEq)]
pub enum EncounterSignal {
    EncounterStarted {
        boss_id: String,
        entity_id: EntityId,
        archetype: Option<BossArchetype>,
        elapsed: f64,
    },
    PhaseChanged {
        archetype: BossArchetype,
        old_phase: u8,
        new_phase: u8,
        elapsed: f64,
    },
    /// Emitted once, carrying the boss's last known position for death effects
    BossDied {
        position: DVec2,
        archetype: Option<BossArchetype>,
        elapsed: f64,
    },
    /// Every boss is dead; the encounter is over
    EncounterResolved {
        victory: bool,
        elapsed: f64,
    },
    PylonDestroyed {
        pylon_id: HazardId,
        remaining: usize,
        elapsed: f64,
    },
    WormSplit {
        count: usize,
        elapsed: f64,
    },
    DashStateChanged {
        from: Phase4SubState,
        to: Phase4SubState,
        elapsed: f64,
    },
}

impl EncounterSignal {
    pub fn elapsed(&self) -> f64 {
        match self {
            Self::EncounterStarted { elapsed, .. }
            | Self::PhaseChanged { elapsed, .. }
            | Self::BossDied { elapsed, .. }
            | Self::EncounterResolved { elapsed, .. }
            | Self::PylonDestroyed { elapsed, .. }
            | Self::WormSplit { elapsed, .. }
            | Self::DashStateChanged { elapsed, .. } => *elapsed,
        }
    }
}

/// Trait for systems that react to encounter signals.
/// Implement this for sound cues, screen shake, fight logs, etc.
pub trait SignalHandler {
    /// Handle a single signal with the post-tick snapshot, when one is available.
    fn handle_signal(&mut self, signal: &EncounterSignal, snapshot: Option<&EncounterSnapshot>);

    /// Handle multiple signals (default implementation calls handle_signal for each)
    fn handle_signals(&mut self, signals: &[EncounterSignal], snapshot: Option<&EncounterSnapshot>) {
        for signal in signals {
            self.handle_signal(signal, snapshot);
        }
    }
}
