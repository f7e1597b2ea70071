//! Per-slot instance cells.
//!
//! Both holders give the registry its at-most-once construction guarantee,
//! using only a per-slot `parking_lot::Mutex` (never a contract-global lock),
//! since nothing here needs to suspend across an await point.
//!
//! [`Holder`] checks outside the lock on the fast path and only takes it to
//! build+publish, so a successful read never blocks on it. [`StickyHolder`]
//! holds its lock for the whole `check → initialise → publish` sequence: a
//! second thread racing an in-flight adaptive build blocks until the first
//! either publishes or fails, rather than starting a redundant build of its
//! own — `invalidate` uses the same lock to reset the slot for `replace`.

use std::sync::{Arc, OnceLock};

use parking_lot::Mutex;

use ext_core::ExtensionError;

/// A slot that is filled at most once and only ever remembers success.
///
/// A failed `init` is not cached: the next caller retries from scratch. This
/// matches ordinary by-name construction ("instances are populated at
/// most once"), where a transient construction failure should not poison the
/// name forever.
pub struct Holder<T: ?Sized> {
    lock: Mutex<()>,
    slot: OnceLock<Arc<T>>,
}

impl<T: ?Sized> Default for Holder<T> {
    fn default() -> Self {
        Self { lock: Mutex::new(()), slot: OnceLock::new() }
    }
}

impl<T: ?Sized> Holder<T> {
    pub fn get_or_try_init<F>(&self, init: F) -> Result<Arc<T>, ExtensionError>
    where
        F: FnOnce() -> Result<Arc<T>, ExtensionError>,
    {
        if let Some(existing) = self.slot.get() {
            return Ok(existing.clone());
        }
        let _guard = self.lock.lock();
        if let Some(existing) = self.slot.get() {
            return Ok(existing.clone());
        }
        let built = init()?;
        // `set` cannot fail: we hold `lock` and already re-checked `slot`.
        let _ = self.slot.set(built.clone());
        Ok(built)
    }

    pub fn get(&self) -> Option<Arc<T>> {
        self.slot.get().cloned()
    }
}

/// A slot that caches both success and failure.
///
/// Used only for the adaptive instance ("if construction fails, the
/// error is cached... and subsequent calls raise the same error without
/// retrying") — a broken adaptive dispatcher is a build-time-shaped problem
/// that will not fix itself on retry, so there is no value in re-attempting
/// it on every call.
pub struct StickyHolder<T: ?Sized> {
    slot: Mutex<Option<Result<Arc<T>, ExtensionError>>>,
}

impl<T: ?Sized> Default for StickyHolder<T> {
    fn default() -> Self {
        Self { slot: Mutex::new(None) }
    }
}

impl<T: ?Sized> StickyHolder<T> {
    pub fn get_or_try_init<F>(&self, init: F) -> Result<Arc<T>, ExtensionError>
    where
        F: FnOnce() -> Result<Arc<T>, ExtensionError>,
    {
        let mut slot = self.slot.lock();
        if let Some(existing) = slot.as_ref() {
            return existing.clone();
        }
        let result = init();
        *slot = Some(result.clone());
        result
    }

    /// Administrative invalidation (used by `replace`) — clears any cached
    /// success or sticky failure so the next call rebuilds from scratch.
    pub fn invalidate(&self) {
        *self.slot.lock() = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn holder_does_not_cache_failure() {
        let holder: Holder<str> = Holder::default();
        let attempts = std::sync::atomic::AtomicUsize::new(0);
        let err = holder.get_or_try_init(|| {
            attempts.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
            Err(ExtensionError::Usage("boom".into()))
        });
        assert!(err.is_err());
        let ok = holder.get_or_try_init(|| {
            attempts.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
            Ok(Arc::from("built"))
        });
        assert_eq!(ok.unwrap().as_ref(), "built");
        assert_eq!(attempts.load(std::sync::atomic::Ordering::SeqCst), 2);
    }

    #[test]
    fn sticky_holder_caches_failure() {
        let holder: StickyHolder<str> = StickyHolder::default();
        let attempts = std::sync::atomic::AtomicUsize::new(0);
        let build = || {
            attempts.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
            Err(ExtensionError::AdaptiveBuild { contract: "Greeter", reason: "bad".into() })
        };
        assert!(holder.get_or_try_init(build).is_err());
        assert!(holder.get_or_try_init(build).is_err());
        assert_eq!(attempts.load(std::sync::atomic::Ordering::SeqCst), 1);

        holder.invalidate();
        let ok = holder.get_or_try_init(|| Ok(Arc::from("fixed")));
        assert_eq!(ok.unwrap().as_ref(), "fixed");
    }
}
