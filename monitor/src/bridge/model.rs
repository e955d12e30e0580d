use infracore::detect::event::DetectionEvent;
use infracore::detect::tracker::VolcanoStatus;
use infracore::telemetry::heartbeat::CyclePulse;
use serde::Serialize;
use std::collections::HashMap;

/// Read-only snapshot served to the external status collaborator: the most
/// recent cycle pulse, the per-volcano alarm states and the last emitted
/// event.
#[derive(Debug, Clone, Default, Serialize)]
pub struct StatusModel {
    pub alarm_name: String,
    pub pulse: CyclePulse,
    pub volcanoes: HashMap<String, VolcanoStatus>,
    pub last_event: Option<DetectionEvent>,
}
