use std::time::Duration;

const DEFAULT_WRITE_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Clone, Copy)]
pub struct SessionConfig {
    /// Upper bound on a single profile write before the session gives up and
    /// moves to `Error`.
    pub write_timeout: Duration,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            write_timeout: DEFAULT_WRITE_TIMEOUT,
        }
    }
}

impl SessionConfig {
    pub fn with_write_timeout(write_timeout: Duration) -> Self {
        Self { write_timeout }
    }
}
