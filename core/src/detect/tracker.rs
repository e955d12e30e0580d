use crate::processing::solve::ArraySolution;
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Mutex;

/// Per-volcano alarm state. One physical arrival re-sampled in overlapping
/// windows must produce exactly one emitted event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum AlarmState {
    Idle,
    Armed,
    Suppressed,
}

/// Snapshot of one volcano's tracked state, for status collaborators.
#[derive(Debug, Clone, Serialize)]
pub struct VolcanoStatus {
    pub state: AlarmState,
    /// Epoch seconds of the most recent detection, if any.
    pub last_detection: Option<f64>,
    pub solution: Option<ArraySolution>,
}

struct TrackedVolcano {
    state: AlarmState,
    last_detection: f64,
    solution: ArraySolution,
}

/// Deduplicates repeated detections of one arrival across consecutive
/// cycles. The only cross-cycle state in the engine; mutex-guarded so a
/// status reader observes arm/suppress transitions atomically.
pub struct DetectionTracker {
    cooldown: f64,
    states: Mutex<HashMap<String, TrackedVolcano>>,
}

impl DetectionTracker {
    /// `cooldown` is the configured cycle duration in seconds.
    pub fn new(cooldown: f64) -> Self {
        Self {
            cooldown,
            states: Mutex::new(HashMap::new()),
        }
    }

    /// Records a detection of `volcano` at `timestamp`. Returns true when
    /// the caller should emit an event: only on the Idle -> Armed edge.
    /// Re-detections inside the cooldown refresh the retained solution and
    /// the cooldown clock without re-emitting.
    pub fn observe(&self, volcano: &str, timestamp: f64, solution: &ArraySolution) -> bool {
        let mut states = match self.states.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        match states.get_mut(volcano) {
            Some(tracked) if tracked.state != AlarmState::Idle => {
                tracked.state = AlarmState::Suppressed;
                tracked.last_detection = timestamp;
                tracked.solution = solution.clone();
                false
            }
            _ => {
                states.insert(
                    volcano.to_string(),
                    TrackedVolcano {
                        state: AlarmState::Armed,
                        last_detection: timestamp,
                        solution: solution.clone(),
                    },
                );
                true
            }
        }
    }

    /// Advances the per-volcano clocks at the end of a cycle. Armed states
    /// age into Suppressed; anything past the cooldown with no repeat
    /// returns to Idle and may alarm again.
    pub fn tick(&self, now: f64) {
        let mut states = match self.states.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        for tracked in states.values_mut() {
            match tracked.state {
                AlarmState::Idle => {}
                _ if now - tracked.last_detection > self.cooldown => {
                    tracked.state = AlarmState::Idle;
                }
                AlarmState::Armed => tracked.state = AlarmState::Suppressed,
                AlarmState::Suppressed => {}
            }
        }
    }

    /// Current state for every volcano with detection history.
    pub fn snapshot(&self) -> HashMap<String, VolcanoStatus> {
        let states = match self.states.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        states
            .iter()
            .map(|(name, tracked)| {
                (
                    name.clone(),
                    VolcanoStatus {
                        state: tracked.state,
                        last_detection: Some(tracked.last_detection),
                        solution: Some(tracked.solution.clone()),
                    },
                )
            })
            .collect()
    }
}
