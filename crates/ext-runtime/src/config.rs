//! Classpath configuration.
//!
//! A thin, install-once global listing the directories the Resource Scanner
//! walks for descriptor files. Left unset, every contract relies solely on
//! its compiled-in `linkme` registrations — a host process only needs to
//! call [`ClasspathConfig::install`] if it actually ships descriptor files on
//! disk. There is no mandatory external config format here (no YAML, no
//! environment variables parsed).

use std::path::PathBuf;
use std::sync::OnceLock;

static ROOTS: OnceLock<Vec<PathBuf>> = OnceLock::new();

/// Process-wide descriptor search path, installed at most once.
pub struct ClasspathConfig;

impl ClasspathConfig {
    /// Installs the classpath roots the Resource Scanner will walk for every
    /// contract's descriptor files, in the order given.
    ///
    /// Returns the roots back, unused, if a previous call already installed
    /// a configuration — later callers in the same process lose the race,
    /// the same compare-and-set posture as [`crate::global::loader_for`].
    pub fn install(roots: Vec<PathBuf>) -> Result<(), Vec<PathBuf>> {
        ROOTS.set(roots)
    }
}

/// The currently installed classpath roots, or an empty slice if
/// [`ClasspathConfig::install`] was never called.
pub fn roots() -> &'static [PathBuf] {
    ROOTS.get().map(Vec::as_slice).unwrap_or(&[])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uninstalled_roots_is_empty() {
        // `ROOTS` is process-global and other tests in this binary may have
        // already installed it; only assert the "never installed" shape
        // when we can observe it directly.
        if ROOTS.get().is_none() {
            assert!(roots().is_empty());
        }
    }
}
