//! Default Object Factory.
//!
//! Backs every setter-style [`ext_core::Injectable::inject`] call by
//! delegating to whichever contract's `Loader` has registered itself in the
//! process-wide index (see [`crate::global`]). Kept as its own pluggable
//! [`ObjectFactory`] implementation — rather than wiring the Injector
//! directly to the global index — so a host process can substitute a
//! different Object Factory (e.g. one backed by an external DI container) by
//! constructing its own `Injector` instead of using [`spi_injector`].

use std::any::{Any, TypeId};
use std::sync::Arc;

use ext_core::{Injector, ObjectFactory};

use crate::global;

/// The SPI-backed factory: resolves every dependency request through
/// [`global::resolve`], i.e. through whichever contract's own `Loader` is
/// already active in this process.
pub struct SpiObjectFactory;

impl ObjectFactory for SpiObjectFactory {
    fn get_instance(&self, type_id: TypeId, attribute: &str) -> Option<Arc<dyn Any + Send + Sync>> {
        global::resolve(type_id, attribute)
    }
}

/// Builds an [`Injector`] backed by [`SpiObjectFactory`] — the default
/// collaborator every `Loader` uses unless a host process supplies its own.
pub fn spi_injector() -> Injector {
    Injector::new(Arc::new(SpiObjectFactory))
}
