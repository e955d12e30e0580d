use serde::{Deserialize, Serialize};

/// One station's raw counts within an evaluation window.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChannelData {
    pub scnl: String,
    pub samples: Vec<f64>,
}

impl ChannelData {
    pub fn new(scnl: &str, samples: Vec<f64>) -> Self {
        Self {
            scnl: scnl.to_string(),
            samples,
        }
    }
}

/// Raw multi-channel waveform snapshot for one evaluation cycle. Created by
/// the waveform provider, consumed by exactly one cycle and then discarded.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Window {
    pub channels: Vec<ChannelData>,
    pub sample_rate: f64,
    /// Epoch seconds of the first sample.
    pub start: f64,
    /// Epoch seconds of the nominal window end.
    pub end: f64,
}

impl Window {
    pub fn new(channels: Vec<ChannelData>, sample_rate: f64, start: f64, end: f64) -> Self {
        Self {
            channels,
            sample_rate,
            start,
            end,
        }
    }

    pub fn channel(&self, scnl: &str) -> Option<&ChannelData> {
        self.channels.iter().find(|c| c.scnl == scnl)
    }
}
