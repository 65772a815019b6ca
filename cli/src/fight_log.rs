//! Signal handler that records a readable timeline of the fight.

use bossfight_core::{EncounterSignal, EncounterSnapshot, SignalHandler};

#[derive(Debug, Default)]
pub struct FightLog {
    /// `(elapsed, line)` in arrival order
    pub entries: Vec<(f64, String)>,
    pub phase_changes: usize,
    pub pylons_destroyed: usize,
    pub dashes: usize,
    pub victory: Option<bool>,
    /// Echo each entry through `tracing` as it arrives
    pub echo: bool,
}

impl FightLog {
    pub fn new(echo: bool) -> Self {
        Self {
            echo,
            ..Self::default()
        }
    }

    fn push(&mut self, elapsed: f64, line: String) {
        if self.echo {
            tracing::info!(elapsed, "{line}");
        }
        self.entries.push((elapsed, line));
    }
}

impl SignalHandler for FightLog {
    fn handle_signal(&mut self, signal: &EncounterSignal, snapshot: Option<&EncounterSnapshot>) {
        let elapsed = signal.elapsed();
        let line = match signal {
            EncounterSignal::EncounterStarted { boss_id, archetype, .. } => match archetype {
                Some(a) => format!("{boss_id} engaged ({a})"),
                None => format!("{boss_id} engaged (no mechanics)"),
            },
            EncounterSignal::PhaseChanged {
                archetype,
                old_phase,
                new_phase,
                ..
            } => {
                self.phase_changes += 1;
                let hp = snapshot
                    .and_then(|s| s.boss.as_ref())
                    .map(|b| b.health / b.max_health.max(f64::EPSILON) * 100.0)
                    .unwrap_or_default();
                format!("{archetype} phase {old_phase} -> {new_phase} at {hp:.0}% hp")
            }
            EncounterSignal::PylonDestroyed { pylon_id, remaining, .. } => {
                self.pylons_destroyed += 1;
                format!("pylon {pylon_id} destroyed, {remaining} standing")
            }
            EncounterSignal::WormSplit { count, .. } => format!("wyrm split into {count}"),
            EncounterSignal::DashStateChanged { from, to, .. } => {
                if matches!(to, bossfight_core::Phase4SubState::Dashing) {
                    self.dashes += 1;
                }
                format!("dash {from:?} -> {to:?}")
            }
            EncounterSignal::BossDied { position, .. } => {
                format!("boss died at ({:.0}, {:.0})", position.x, position.y)
            }
            EncounterSignal::EncounterResolved { victory, .. } => {
                self.victory = Some(*victory);
                if *victory { "victory".to_string() } else { "defeat".to_string() }
            }
        };
        self.push(elapsed, line);
    }
}
