//! Hysteresis-based uptime alerting.
//!
//! The machine consumes one combined probe outcome per tick ("both
//! endpoints up") and flips its alert status only after a full streak of
//! identical observations, so a single flaky probe never pages anyone.
//!
//! ```text
//! both up:
//!   successes < 3, or already UP      → Ok (streak extends or stays reset)
//!   successes == 3 while status DOWN  → Recovered (flip to UP, notify once)
//!
//! not both up:
//!   failures < 3, or already DOWN     → Failing (streak extends)
//!   failures == 3 while status UP     → WentDown (flip to DOWN, notify once)
//! ```
//!
//! The edge checks use equality, not `>=`: a 4th consecutive failure extends
//! the streak without re-firing the alert.

use serde::{Deserialize, Serialize};

use crate::ProbeStatus;

/// Consecutive identical outcomes required before the alert status flips.
pub const HYSTERESIS_THRESHOLD: u32 = 3;

/// What one tick's observation meant for the alert status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UptimeEvaluation {
    /// Both endpoints up, no transition.
    Ok,

    /// At least one endpoint down, threshold not reached (or already down).
    Failing,

    /// This tick completed the failure streak: fire the DOWN alert.
    WentDown,

    /// This tick completed the success streak: fire the recovery notice.
    Recovered,
}

/// The persisted alerting state. Singleton: loaded once at startup and
/// atomically overwritten after every tick.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlertState {
    pub last_alert_status: ProbeStatus,
    pub consecutive_failures: u32,
    pub consecutive_successes: u32,

    /// Date (YYYY-MM-DD) of the last day a summary was generated for, empty
    /// if none yet.
    #[serde(default)]
    pub last_summary_date: String,
}

impl Default for AlertState {
    fn default() -> Self {
        Self {
            last_alert_status: ProbeStatus::Up,
            consecutive_failures: 0,
            consecutive_successes: 0,
            last_summary_date: String::new(),
        }
    }
}

impl AlertState {
    /// Feed one tick's combined outcome into the machine.
    ///
    /// Exactly one of the two counters is nonzero afterwards. The alert
    /// status changes only on the [`UptimeEvaluation::WentDown`] and
    /// [`UptimeEvaluation::Recovered`] edges.
    pub fn observe(&mut self, both_up: bool) -> UptimeEvaluation {
        if both_up {
            self.consecutive_successes += 1;
            self.consecutive_failures = 0;

            if self.consecutive_successes == HYSTERESIS_THRESHOLD
                && self.last_alert_status == ProbeStatus::Down
            {
                self.last_alert_status = ProbeStatus::Up;
                return UptimeEvaluation::Recovered;
            }

            UptimeEvaluation::Ok
        } else {
            self.consecutive_failures += 1;
            self.consecutive_successes = 0;

            if self.consecutive_failures == HYSTERESIS_THRESHOLD
                && self.last_alert_status == ProbeStatus::Up
            {
                self.last_alert_status = ProbeStatus::Down;
                return UptimeEvaluation::WentDown;
            }

            UptimeEvaluation::Failing
        }
    }
}
