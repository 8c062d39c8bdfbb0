//! Wall-clock accounting for demos and JSON reports.
//!
//! The pipeline never reads these numbers; they exist so a caller can see
//! where a transform spent its time.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Elapsed time of one pipeline phase.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PhaseTiming {
    pub phase: String,
    pub millis: f64,
}

/// Per-phase wall-clock log for a single transform.
///
/// Phases are appended in execution order; the total is derived rather
/// than stored, so the log cannot disagree with itself.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimingBreakdown {
    pub phases: Vec<PhaseTiming>,
}

impl TimingBreakdown {
    /// Append a finished phase.
    pub fn record(&mut self, phase: &str, elapsed: Duration) {
        self.phases.push(PhaseTiming {
            phase: phase.to_string(),
            millis: elapsed.as_secs_f64() * 1000.0,
        });
    }

    /// Total milliseconds across every recorded phase.
    pub fn total_ms(&self) -> f64 {
        self.phases.iter().map(|p| p.millis).sum()
    }
}
