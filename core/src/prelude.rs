use crate::acquisition::provider::FetchError;
use crate::detect::event::DetectionEvent;
use crate::processing::solve::ArraySolution;
use serde::{Deserialize, Serialize};

/// Per-array processing parameters shared by every stage of a cycle.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArrayParams {
    /// Evaluation window length in seconds.
    pub duration: f64,
    /// Seconds between wall clock and the end of the data window.
    pub latency: f64,
    /// Seconds of cosine taper at each end of a trace.
    pub taper_val: f64,
    /// Lower bandpass corner in Hz.
    pub f1: f64,
    /// Upper bandpass corner in Hz.
    pub f2: f64,
    /// Counts-to-pascal calibration constant.
    pub digouti: f64,
    /// Minimum normalized correlation coefficient for a usable pair.
    pub min_cc: f64,
    /// Minimum number of channels for the engine to run.
    pub min_chan: usize,
    /// Maximum lag searched by the correlator, in samples.
    pub cc_shift_length: usize,
}

impl ArrayParams {
    pub fn validate(&self) -> EngineResult<()> {
        if self.duration <= 0.0 || self.latency < 0.0 || self.duration <= self.latency {
            return Err(EngineError::Config(format!(
                "window duration {}s incompatible with latency {}s",
                self.duration, self.latency
            )));
        }
        if self.f1 <= 0.0 || self.f1 >= self.f2 {
            return Err(EngineError::Config(format!(
                "bandpass corners [{}, {}] Hz are not ordered",
                self.f1, self.f2
            )));
        }
        if self.digouti <= 0.0 {
            return Err(EngineError::Config(
                "calibration constant must be positive".into(),
            ));
        }
        if !(0.0..=1.0).contains(&self.min_cc) {
            return Err(EngineError::Config(format!(
                "min_cc {} outside [0, 1]",
                self.min_cc
            )));
        }
        if self.min_chan < 2 {
            return Err(EngineError::Config("min_chan must be at least 2".into()));
        }
        if self.cc_shift_length == 0 {
            return Err(EngineError::Config("cc_shift_length must be non-zero".into()));
        }
        Ok(())
    }
}

/// Summary of one evaluation cycle, whatever its outcome.
#[derive(Debug, Clone, Default)]
pub struct CycleOutcome {
    pub stations_used: usize,
    pub valid_pairs: usize,
    pub solution: Option<ArraySolution>,
    pub events: Vec<DetectionEvent>,
}

/// Common error type for engine execution.
#[derive(thiserror::Error, Debug)]
pub enum EngineError {
    #[error("insufficient data for {station}: {have} samples of {need}")]
    InsufficientData {
        station: String,
        have: usize,
        need: usize,
    },
    #[error("underdetermined geometry: {pairs} usable pairs")]
    UnderdeterminedGeometry { pairs: usize },
    #[error("no volcano matches the solved wavefront")]
    NoMatch,
    #[error("waveform provider: {0}")]
    Provider(#[from] FetchError),
    #[error("invalid configuration: {0}")]
    Config(String),
}

pub type EngineResult<T> = Result<T, EngineError>;

/// Trait describing schedulable alarm evaluations. An external orchestrator
/// drives every alarm kind through this seam; only the infrasound kind lives
/// in this crate.
pub trait AlarmModule: Send + Sync {
    fn name(&self) -> &str;
    fn evaluate(&self, window_end: f64) -> EngineResult<CycleOutcome>;
}
