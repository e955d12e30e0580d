use crate::acquisition::window::Window;

/// Failure modes of the external waveform source. All are cycle-scoped; the
/// schedule itself never stops on a fetch failure.
#[derive(thiserror::Error, Debug)]
pub enum FetchError {
    #[error("no data for {0}")]
    NoData(String),
    #[error("fetch timed out after {0:.1} s")]
    Timeout(f64),
    #[error("provider failure: {0}")]
    Failure(String),
}

/// External waveform source. Implementations must complete or fail within
/// their own bounded timeout; the engine treats a missing station as
/// tolerable while at least `min_chan` remain.
pub trait WaveformProvider: Send + Sync {
    fn fetch(&self, station_ids: &[String], start: f64, end: f64) -> Result<Window, FetchError>;
}
