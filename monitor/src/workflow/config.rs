use anyhow::Context;
use infracore::array::{InfrasoundArray, Station, Volcano};
use infracore::prelude::ArrayParams;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// One array's full configuration surface: stations, monitored volcanoes
/// and processing parameters, as loaded from a per-array YAML file.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct MonitorConfig {
    /// Alarm name used in log lines, heartbeats and emitted events.
    pub alarm_name: String,
    pub array_id: String,
    pub stations: Vec<Station>,
    pub volcanoes: Vec<Volcano>,
    pub params: ArrayParams,
}

impl MonitorConfig {
    pub fn load<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path_ref = path.as_ref();
        let contents = fs::read_to_string(path_ref)
            .with_context(|| format!("reading array config {}", path_ref.display()))?;
        let config: MonitorConfig = serde_yaml::from_str(&contents)
            .with_context(|| format!("parsing array config {}", path_ref.display()))?;
        Ok(config)
    }

    pub fn build_array(&self) -> anyhow::Result<InfrasoundArray> {
        InfrasoundArray::new(&self.array_id, self.stations.clone(), self.params.min_chan)
            .with_context(|| format!("building array {}", self.array_id))
    }
}
