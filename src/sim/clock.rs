//! Simulation clock
//!
//! Three fixed-period cadences on a millisecond clock supplied by the caller.
//! The schedule never reads wall time itself, which keeps it deterministic
//! under test and lets the driver thread own the real `Instant`.

use serde::{Deserialize, Serialize};

use super::tick::TickKind;
use crate::consts::{COLLISION_PERIOD_MS, DISPLAY_PERIOD_MS, PATROL_PERIOD_MS};

/// Period of each update stream, in milliseconds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Timing {
    pub patrol_period_ms: u64,
    pub collision_period_ms: u64,
    pub display_period_ms: u64,
}

impl Default for Timing {
    fn default() -> Self {
        Self {
            patrol_period_ms: PATROL_PERIOD_MS,
            collision_period_ms: COLLISION_PERIOD_MS,
            display_period_ms: DISPLAY_PERIOD_MS,
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct Cadence {
    kind: TickKind,
    period_ms: u64,
    next_due_ms: u64,
}

impl Cadence {
    fn new(kind: TickKind, period_ms: u64) -> Self {
        Self {
            kind,
            period_ms: period_ms.max(1),
            next_due_ms: 0,
        }
    }

    /// Fire at most once; a cadence that fell behind skips the missed periods
    fn poll(&mut self, now_ms: u64) -> bool {
        if now_ms < self.next_due_ms {
            return false;
        }
        let missed = (now_ms - self.next_due_ms) / self.period_ms;
        self.next_due_ms += (missed + 1) * self.period_ms;
        true
    }
}

/// The three cadences of one session
#[derive(Debug, Clone)]
pub struct Schedule {
    /// Patrol, Collision, Display: the order ticks run within one pass
    cadences: [Cadence; 3],
    started_at_ms: u64,
    running: bool,
    generation: u64,
}

impl Schedule {
    /// A stopped schedule
    pub fn new(timing: Timing) -> Self {
        Self {
            cadences: [
                Cadence::new(TickKind::Patrol, timing.patrol_period_ms),
                Cadence::new(TickKind::Collision, timing.collision_period_ms),
                Cadence::new(TickKind::Display, timing.display_period_ms),
            ],
            started_at_ms: 0,
            running: false,
            generation: 0,
        }
    }

    /// Start fresh cadences; each first fires one period after `now_ms`
    pub fn start(&mut self, now_ms: u64) {
        self.started_at_ms = now_ms;
        for cadence in &mut self.cadences {
            cadence.next_due_ms = now_ms + cadence.period_ms;
        }
        self.running = true;
        self.generation += 1;
    }

    pub fn stop(&mut self) {
        self.running = false;
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Incremented on every start; identifies the session the ticks belong to
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn elapsed_ms(&self, now_ms: u64) -> u64 {
        now_ms.saturating_sub(self.started_at_ms)
    }

    /// Ticks due at `now_ms`, in pass order
    pub fn due(&mut self, now_ms: u64) -> Vec<TickKind> {
        if !self.running {
            return Vec::new();
        }
        self.cadences
            .iter_mut()
            .filter_map(|c| c.poll(now_ms).then_some(c.kind))
            .collect()
    }

    /// Earliest time anything is due, or `None` while stopped
    pub fn next_deadline(&self) -> Option<u64> {
        if !self.running {
            return None;
        }
        self.cadences.iter().map(|c| c.next_due_ms).min()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn started(now: u64) -> Schedule {
        let mut schedule = Schedule::new(Timing::default());
        schedule.start(now);
        schedule
    }

    #[test]
    fn test_stopped_schedule_is_silent() {
        let mut schedule = Schedule::new(Timing::default());
        assert!(schedule.due(10_000).is_empty());
        assert_eq!(schedule.next_deadline(), None);
    }

    #[test]
    fn test_fast_cadences_fire_before_patrol() {
        let mut schedule = started(0);
        assert!(schedule.due(5).is_empty());
        assert_eq!(
            schedule.due(10),
            vec![TickKind::Collision, TickKind::Display]
        );
        assert_eq!(schedule.next_deadline(), Some(20));
    }

    #[test]
    fn test_pass_order_is_patrol_collision_display() {
        let mut schedule = started(0);
        assert_eq!(
            schedule.due(400),
            vec![TickKind::Patrol, TickKind::Collision, TickKind::Display]
        );
    }

    #[test]
    fn test_late_cadence_fires_once_and_realigns() {
        let mut schedule = started(0);
        assert_eq!(
            schedule.due(1_000),
            vec![TickKind::Patrol, TickKind::Collision, TickKind::Display]
        );
        // Patrol was due at 400 and 800; next slot is 1200
        assert_eq!(schedule.due(1_199), vec![TickKind::Collision, TickKind::Display]);
        assert_eq!(
            schedule.due(1_200),
            vec![TickKind::Patrol, TickKind::Collision, TickKind::Display]
        );
    }

    #[test]
    fn test_stop_then_restart_begins_a_new_generation() {
        let mut schedule = started(0);
        let first = schedule.generation();
        schedule.stop();
        assert!(schedule.due(800).is_empty());

        schedule.start(2_000);
        assert_eq!(schedule.generation(), first + 1);
        assert_eq!(schedule.elapsed_ms(2_250), 250);
        assert!(!schedule.due(2_399).contains(&TickKind::Patrol));
        assert!(schedule.due(2_400).contains(&TickKind::Patrol));
    }

    #[test]
    fn test_zero_period_is_clamped() {
        let mut schedule = Schedule::new(Timing {
            patrol_period_ms: 0,
            collision_period_ms: 0,
            display_period_ms: 0,
        });
        schedule.start(0);
        assert_eq!(schedule.next_deadline(), Some(1));
    }
}
