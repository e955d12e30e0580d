pub mod event;
pub mod matcher;
pub mod tracker;

pub use event::{DetectionEvent, Notifier};
pub use matcher::VolcanoMatcher;
pub use tracker::{AlarmState, DetectionTracker, VolcanoStatus};
