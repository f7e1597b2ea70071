//! Logging bootstrap.
//!
//! `ext-core` and `ext-runtime` only ever emit `tracing` events — neither
//! installs a global subscriber itself. A host binary (a demo, a test
//! harness, a production process) opts in explicitly by calling
//! [`LoggingBuilder::init`] once, keeping the separation between emitting
//! spans and deciding how they're rendered.

use tracing_subscriber::EnvFilter;

/// Builds and installs the process's global `tracing` subscriber.
pub struct LoggingBuilder {
    default_filter: String,
    ansi: bool,
}

impl Default for LoggingBuilder {
    fn default() -> Self {
        Self { default_filter: "info".to_string(), ansi: true }
    }
}

impl LoggingBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Filter directive used when `RUST_LOG` is unset.
    pub fn with_default_filter(mut self, filter: impl Into<String>) -> Self {
        self.default_filter = filter.into();
        self
    }

    /// Disables ANSI colour codes, for log collectors that don't want them.
    pub fn with_ansi(mut self, ansi: bool) -> Self {
        self.ansi = ansi;
        self
    }

    /// Installs the subscriber globally. Safe to call at most once per
    /// process; a second call returns `Err` rather than panicking.
    pub fn init(self) -> Result<(), tracing_subscriber::util::TryInitError> {
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(self.default_filter));
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_ansi(self.ansi)
            .try_init()
    }
}
