pub mod plane_wave;

pub use plane_wave::{SyntheticConfig, SyntheticProvider};
