use serde::Serialize;
use tokio::sync::watch;

/// Per-cycle liveness signal. An external monitor treats silence longer
/// than one cycle period as the engine having stalled.
#[derive(Debug, Clone, Default, Serialize)]
pub struct CyclePulse {
    pub array_id: String,
    /// Epoch seconds of the evaluated window's end; 0 until the first cycle.
    pub timestamp: f64,
    pub stations_used: usize,
    /// False when the cycle was skipped outright (provider failure).
    pub completed: bool,
}

/// Publishes the most recent cycle pulse to any number of observers.
pub struct HeartbeatMonitor {
    tx: watch::Sender<CyclePulse>,
}

impl HeartbeatMonitor {
    pub fn new() -> (Self, watch::Receiver<CyclePulse>) {
        let (tx, rx) = watch::channel(CyclePulse::default());
        (Self { tx }, rx)
    }

    /// Best-effort publish; a departed observer is not an error.
    pub fn beat(&self, pulse: CyclePulse) {
        let _ = self.tx.send(pulse);
    }

    pub fn subscribe(&self) -> watch::Receiver<CyclePulse> {
        self.tx.subscribe()
    }
}
