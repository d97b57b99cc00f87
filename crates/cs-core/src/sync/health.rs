use serde::{Deserialize, Serialize};

pub const DEFAULT_FAILURE_THRESHOLD: u32 = 3;

/// Connectivity state of the sync loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConnectionHealth {
    #[default]
    Healthy,
    Degraded,
}

/// What a recorded event did to the state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HealthTransition {
    Unchanged,
    BecameDegraded,
    Recovered,
}

/// Healthy/degraded state machine driven by transport outcomes.
///
/// `threshold` consecutive failures flip the tracker to degraded. A success
/// clears the counter but never leaves the degraded state on its own; only a
/// successful probe does that.
#[derive(Debug, Clone)]
pub struct HealthTracker {
    state: ConnectionHealth,
    consecutive_failures: u32,
    threshold: u32,
}

impl HealthTracker {
    pub fn new(threshold: u32) -> Self {
        Self {
            state: ConnectionHealth::Healthy,
            consecutive_failures: 0,
            threshold: threshold.max(1),
        }
    }

    pub fn state(&self) -> ConnectionHealth {
        self.state
    }

    pub fn consecutive_failures(&self) -> u32 {
        self.consecutive_failures
    }

    pub fn needs_probe(&self) -> bool {
        self.state == ConnectionHealth::Degraded
    }

    pub fn record_failure(&mut self) -> HealthTransition {
        self.consecutive_failures = self.consecutive_failures.saturating_add(1);
        if self.state == ConnectionHealth::Healthy && self.consecutive_failures >= self.threshold {
            self.state = ConnectionHealth::Degraded;
            return HealthTransition::BecameDegraded;
        }
        HealthTransition::Unchanged
    }

    pub fn record_success(&mut self) {
        self.consecutive_failures = 0;
    }

    pub fn on_probe(&mut self, reachable: bool) -> HealthTransition {
        if !reachable {
            return HealthTransition::Unchanged;
        }
        self.consecutive_failures = 0;
        if self.state == ConnectionHealth::Degraded {
            self.state = ConnectionHealth::Healthy;
            return HealthTransition::Recovered;
        }
        HealthTransition::Unchanged
    }
}

impl Default for HealthTracker {
    fn default() -> Self {
        Self::new(DEFAULT_FAILURE_THRESHOLD)
    }
}
