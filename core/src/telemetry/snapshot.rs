// ## src/telemetry/snapshot.rs

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::telemetry::timers::{CallTimer, Stage, StageTimes};

/// Immutable record of one adapter call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CallTelemetry {
    pub bytes_in: u64,
    pub bytes_out: u64,
    pub elapsed: Duration,
    pub stage_times: StageTimes,
}

impl CallTelemetry {
    pub fn from(timer: &CallTimer, bytes_in: usize, bytes_out: usize) -> Self {
        Self {
            bytes_in: bytes_in as u64,
            bytes_out: bytes_out as u64,
            elapsed: timer.elapsed(),
            stage_times: timer.stage_times.clone(),
        }
    }

    /// Time spent outside the user's `predict`.
    pub fn adapter_overhead(&self) -> Duration {
        self.stage_times.total().saturating_sub(self.stage_times.get(Stage::Predict))
    }

    /// One-line summary for logs.
    pub fn summary(&self) -> String {
        format!(
            "in={}B out={}B decode={:.1}us validate={:.1}us predict={:.1}us encode={:.1}us total={:.1}us",
            self.bytes_in,
            self.bytes_out,
            self.stage_times.get_us(Stage::Decode),
            self.stage_times.get_us(Stage::Validate),
            self.stage_times.get_us(Stage::Predict),
            self.stage_times.get_us(Stage::Encode),
            self.elapsed.as_secs_f64() * 1_000_000.0,
        )
    }
}
