//! Infrasound array detection engine for the Rust volcano-alarm platform.
//!
//! The modules mirror the operational alarm pipeline: per-channel signal
//! conditioning, pairwise cross-correlation, a plane-wave azimuth/velocity
//! solve, volcano matching and detection-state tracking, behind well-defined
//! interfaces for waveform acquisition and alert dispatch.

pub mod acquisition;
pub mod array;
pub mod detect;
pub mod engine;
pub mod math;
pub mod prelude;
pub mod processing;
pub mod telemetry;

pub use prelude::{AlarmModule, ArrayParams, CycleOutcome, EngineError, EngineResult};
