pub mod provider;
pub mod window;

pub use provider::{FetchError, WaveformProvider};
pub use window::{ChannelData, Window};
