use log::{debug, info, warn};

/// Thin wrapper over the `log` facade that tags messages with a scope.
pub struct LogManager {
    scope: &'static str,
}

impl LogManager {
    pub fn new() -> Self {
        Self::scoped("cmtcore")
    }

    pub fn scoped(scope: &'static str) -> Self {
        Self { scope }
    }

    pub fn record(&self, message: &str) {
        info!("[{}] {}", self.scope, message);
    }

    pub fn detail(&self, message: &str) {
        debug!("[{}] {}", self.scope, message);
    }

    pub fn warn(&self, message: &str) {
        warn!("[{}] {}", self.scope, message);
    }
}

impl Default for LogManager {
    fn default() -> Self {
        Self::new()
    }
}
