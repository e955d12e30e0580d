use serde::{Deserialize, Serialize};

/// One infrasound pressure channel and its surveyed location.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Station {
    /// Station.Channel.Network.Location identifier, e.g. `AKS.BDF.AV.--`.
    pub scnl: String,
    pub lat: f64,
    pub lon: f64,
}

impl Station {
    pub fn new(scnl: &str, lat: f64, lon: f64) -> Self {
        Self {
            scnl: scnl.to_string(),
            lat,
            lon,
        }
    }
}
