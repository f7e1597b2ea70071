//! Process-wide Loader index and the resolver table backing the default
//! Object Factory.
//!
//! One global, lazily-initialised map keyed by `TypeId`, guarded by a single
//! `parking_lot::Mutex` rather than sharded per-contract locks, since
//! contention on the index itself only ever happens at first use.

use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::sync::{Arc, LazyLock};

use parking_lot::Mutex;

use ext_core::{ExtensionPoint, Injectable};

use crate::loader::Loader;

type Resolver = Box<dyn Fn(&str) -> Option<Arc<dyn Any + Send + Sync>> + Send + Sync>;

#[derive(Default)]
struct GlobalState {
    loaders: HashMap<TypeId, Box<dyn Any + Send + Sync>>,
    resolvers: HashMap<TypeId, Resolver>,
}

static STATE: LazyLock<Mutex<GlobalState>> = LazyLock::new(|| Mutex::new(GlobalState::default()));

/// Returns the process-wide `Loader<C>`, constructing it (and registering
/// its Object Factory resolver) on first use. Every subsequent call for the
/// same `C` returns a clone of the same `Arc` — one Loader instance per
/// contract type, for the lifetime of the process.
pub fn loader_for<C: ExtensionPoint>() -> Arc<Loader<C>>
where
    C::Dyn: Injectable,
{
    let key = TypeId::of::<C>();
    let mut state = STATE.lock();
    if let Some(existing) = state.loaders.get(&key) {
        return existing
            .downcast_ref::<Arc<Loader<C>>>()
            .expect("loader registry corrupted: TypeId collided across distinct contracts")
            .clone();
    }

    let loader = Arc::new(Loader::<C>::new());
    state.loaders.insert(key, Box::new(loader.clone()));

    let captured = loader.clone();
    state
        .resolvers
        .entry(TypeId::of::<C::Dyn>())
        .or_insert_with(move || {
            Box::new(move |attribute: &str| -> Option<Arc<dyn Any + Send + Sync>> {
                let instance = if captured.has(attribute) {
                    captured.get(attribute).ok()?
                } else {
                    captured.get_default().ok()??
                };
                Some(Arc::new(instance) as Arc<dyn Any + Send + Sync>)
            })
        });

    loader
}

/// Resolves `attribute` for the contract whose trait-object `TypeId` is
/// `type_id`, delegating to whichever contract last registered a resolver
/// via [`loader_for`]. Returns `None` if that contract's Loader has never
/// been touched in this process, or if `attribute` (and its contract's
/// default) are both unavailable.
pub fn resolve(type_id: TypeId, attribute: &str) -> Option<Arc<dyn Any + Send + Sync>> {
    let state = STATE.lock();
    let resolver = state.resolvers.get(&type_id)?;
    resolver(attribute)
}
