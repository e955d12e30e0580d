pub mod fft;
pub mod geo;
pub mod stats;

pub use fft::FftHelper;
pub use geo::GeoHelper;
pub use stats::StatsHelper;
