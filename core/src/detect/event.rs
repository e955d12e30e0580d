use crate::processing::solve::ArraySolution;
use serde::{Deserialize, Serialize};

/// Outward-facing record of one confirmed detection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DetectionEvent {
    pub volcano: String,
    pub array_id: String,
    /// Epoch seconds of the evaluated window's end.
    pub timestamp: f64,
    pub solution: ArraySolution,
}

impl DetectionEvent {
    /// JSON payload handed to notification collaborators.
    pub fn payload(&self) -> serde_json::Value {
        serde_json::json!({
            "volcano": self.volcano,
            "array": self.array_id,
            "timestamp": self.timestamp,
            "back_azimuth": self.solution.back_azimuth,
            "velocity_kms": self.solution.velocity_kms,
            "pressure_pa": self.solution.peak_pressure,
            "mean_coeff": self.solution.mean_coeff,
        })
    }
}

/// Alert dispatch collaborator. Fire-and-forget: the engine never depends on
/// delivery success or latency.
pub trait Notifier: Send + Sync {
    fn notify(&self, event: &DetectionEvent);
}
