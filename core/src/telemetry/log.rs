use log::{debug, info, warn};

/// Thin wrapper so engine components log under a stable component prefix.
pub struct LogManager {
    prefix: String,
}

impl LogManager {
    pub fn new(prefix: &str) -> Self {
        Self {
            prefix: prefix.to_string(),
        }
    }

    pub fn record(&self, message: &str) {
        info!("{}: {}", self.prefix, message);
    }

    pub fn verbose(&self, message: &str) {
        debug!("{}: {}", self.prefix, message);
    }

    pub fn alert(&self, message: &str) {
        warn!("{}: {}", self.prefix, message);
    }
}
