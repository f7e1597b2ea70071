//! Wrapper Composer.
//!
//! Applies every registered decorator around a freshly constructed ordinary
//! instance, in discovery order (wrapper order follows registration order;
//! there is no priority mechanism), injecting each wrapper's own declared
//! dependencies as it goes.

use std::sync::Arc;

use ext_core::{ExtensionError, Injectable, Injector};

use crate::registry::WrapperRecord;

/// Wraps `base` with each of `wrappers` in order, returning the outermost
/// instance. `inject` is applied to every wrapper after construction, the
/// same as it is to the base instance and the adaptive dispatcher.
pub(crate) fn compose<D>(
    mut current: Arc<D>,
    wrappers: &[WrapperRecord<D>],
    injector: &Injector,
) -> Result<Arc<D>, ExtensionError>
where
    D: Injectable + ?Sized + Send + Sync + 'static,
{
    for wrapper in wrappers {
        let mut boxed = (wrapper.ctor)(current.clone());
        boxed.inject(injector);
        current = Arc::from(boxed);
    }
    Ok(current)
}
