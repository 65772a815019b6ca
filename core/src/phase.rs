//! Phase tracking shared by every boss machine.
//!
//! Phases run 1..=N and only ever move forward one step at a time. Each
//! transition is guarded by the phase it expects to leave, so a trigger that
//! keeps evaluating true after it fired can never fire a second time.

use bossfight_types::PhaseTrigger;

/// A completed phase transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PhaseChange {
    pub from: u8,
    pub to: u8,
}

#[derive(Debug, Clone)]
pub struct PhaseTracker {
    phase: u8,
    phase_count: u8,
    time_in_phase: f64,
}

impl PhaseTracker {
    /// Tracker for a boss with `phase_count` phases, starting in phase 1.
    pub fn new(phase_count: u8) -> Self {
        Self {
            phase: 1,
            phase_count: phase_count.max(1),
            time_in_phase: 0.0,
        }
    }

    /// Tracker sized for a trigger list (N triggers give N+1 phases).
    pub fn for_triggers(triggers: &[PhaseTrigger]) -> Self {
        Self::new((triggers.len() + 1).min(u8::MAX as usize) as u8)
    }

    pub fn phase(&self) -> u8 {
        self.phase
    }

    pub fn phase_count(&self) -> u8 {
        self.phase_count
    }

    pub fn time_in_phase(&self) -> f64 {
        self.time_in_phase
    }

    pub fn is_final(&self) -> bool {
        self.phase >= self.phase_count
    }

    pub fn tick(&mut self, dt: f64) {
        if dt.is_finite() && dt > 0.0 {
            self.time_in_phase += dt;
        }
    }

    /// Move to `expected + 1`, but only if the tracker is still in `expected`.
    pub fn advance_from(&mut self, expected: u8) -> Option<PhaseChange> {
        if self.phase != expected || self.is_final() {
            return None;
        }
        self.phase += 1;
        self.time_in_phase = 0.0;
        debug_assert!(self.phase <= self.phase_count);
        Some(PhaseChange {
            from: expected,
            to: self.phase,
        })
    }

    /// Check the trigger guarding the next transition and take it if it fired.
    ///
    /// At most one phase per call; a boss that drops from 80% to 10% in one
    /// tick walks through the remaining phases on the following ticks.
    pub fn evaluate(&mut self, triggers: &[PhaseTrigger], hp_fraction: f64) -> Option<PhaseChange> {
        if self.is_final() {
            return None;
        }
        let trigger = triggers.get(usize::from(self.phase) - 1)?;
        let fired = match *trigger {
            PhaseTrigger::HpBelow { fraction } => hp_fraction <= fraction,
            PhaseTrigger::TimeInPhase { secs } => self.time_in_phase >= secs,
        };
        if fired { self.advance_from(self.phase) } else { None }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bossfight_types::default_phase_triggers;

    #[test]
    fn starts_in_phase_one() {
        let tracker = PhaseTracker::for_triggers(&default_phase_triggers());
        assert_eq!(tracker.phase(), 1);
        assert_eq!(tracker.phase_count(), 4);
    }

    #[test]
    fn hp_trigger_fires_once() {
        let triggers = default_phase_triggers();
        let mut tracker = PhaseTracker::for_triggers(&triggers);
        assert_eq!(tracker.evaluate(&triggers, 0.8), None);
        assert_eq!(tracker.evaluate(&triggers, 0.75), Some(PhaseChange { from: 1, to: 2 }));
        // Still at 75%: phase 2's own trigger is 50%, nothing fires
        assert_eq!(tracker.evaluate(&triggers, 0.75), None);
        assert_eq!(tracker.phase(), 2);
    }

    #[test]
    fn never_skips_phases() {
        let triggers = default_phase_triggers();
        let mut tracker = PhaseTracker::for_triggers(&triggers);
        let mut seen = vec![tracker.phase()];
        for _ in 0..10 {
            if let Some(change) = tracker.evaluate(&triggers, 0.05) {
                assert_eq!(change.to, change.from + 1);
                seen.push(change.to);
            }
        }
        assert_eq!(seen, vec![1, 2, 3, 4]);
        assert!(tracker.is_final());
    }

    #[test]
    fn stale_guard_is_rejected() {
        let mut tracker = PhaseTracker::new(4);
        assert!(tracker.advance_from(1).is_some());
        assert!(tracker.advance_from(1).is_none());
        assert_eq!(tracker.phase(), 2);
    }

    #[test]
    fn time_trigger_resets_per_phase() {
        let triggers = [
            PhaseTrigger::TimeInPhase { secs: 10.0 },
            PhaseTrigger::TimeInPhase { secs: 10.0 },
        ];
        let mut tracker = PhaseTracker::for_triggers(&triggers);
        tracker.tick(9.0);
        assert!(tracker.evaluate(&triggers, 1.0).is_none());
        tracker.tick(1.0);
        assert!(tracker.evaluate(&triggers, 1.0).is_some());
        assert_eq!(tracker.time_in_phase(), 0.0);
        tracker.tick(5.0);
        assert!(tracker.evaluate(&triggers, 1.0).is_none());
    }
}
