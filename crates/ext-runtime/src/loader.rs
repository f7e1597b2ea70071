//! Loader — the public façade tying together the registry, the wrapper
//! composer, the activation selector, and the adaptive dispatcher behind one
//! per-contract handle.
//!
//! Callers never construct a `Loader` directly; [`crate::global::loader_for`]
//! hands out the single process-wide instance per contract, so every caller
//! shares one manager instance instead of racing to build their own.

use std::sync::Arc;

use tracing::{instrument, warn};

use ext_core::{ActivateMeta, ExtensionError, ExtensionPoint, Injectable, Injector, Url};

use crate::activation;
use crate::config;
use crate::holder::StickyHolder;
use crate::object_factory::spi_injector;
use crate::registry::{EntryRecord, Registry};
use crate::wrapper;

/// Per-contract loader: lazily bootstraps its registry from the compiled-in
/// `linkme::distributed_slice` plus any configured descriptor files, then
/// serves ordinary, default, adaptive, and activated lookups against it.
pub struct Loader<C: ExtensionPoint>
where
    C::Dyn: Injectable,
{
    registry: Registry<C>,
    adaptive: StickyHolder<C::Dyn>,
    injector: Injector,
}

impl<C: ExtensionPoint> Loader<C>
where
    C::Dyn: Injectable,
{
    pub(crate) fn new() -> Self {
        Self {
            registry: Registry::default(),
            adaptive: StickyHolder::default(),
            injector: spi_injector(),
        }
    }

    /// Builds a `Loader` with a caller-supplied [`Injector`] instead of the
    /// default SPI-backed one — for tests, or a host process that wires
    /// dependencies through its own [`ext_core::ObjectFactory`].
    pub fn with_injector(injector: Injector) -> Self {
        Self { registry: Registry::default(), adaptive: StickyHolder::default(), injector }
    }

    fn ensure_bootstrapped(&self) {
        self.registry.bootstrap(C::registry(), config::roots());
    }

    fn no_such_extension(&self, name: &str) -> ExtensionError {
        let causes = self.registry.diagnostics().into_iter().map(|d| d.to_string()).collect();
        ExtensionError::NoSuchExtension { contract: C::NAME, name: name.to_string(), causes }
    }

    fn record_for(&self, name: &str) -> Option<Arc<EntryRecord<C::Dyn>>> {
        self.registry.state.read().by_name.get(name).cloned()
    }

    fn construct(&self, record: &EntryRecord<C::Dyn>) -> Result<Arc<C::Dyn>, ExtensionError> {
        let mut boxed = (record.ctor)();
        boxed.inject(&self.injector);
        let base: Arc<C::Dyn> = Arc::from(boxed);
        let state = self.registry.state.read();
        wrapper::compose(base, &state.wrappers, &self.injector)
    }

    /// Resolves the extension registered under `name`.
    ///
    /// `"true"` is treated as a request for the contract's declared default
    /// name, matching the wire-parameter shorthand convention this lookup
    /// descends from.
    #[instrument(level = "debug", skip(self), fields(contract = C::NAME))]
    pub fn get(&self, name: &str) -> Result<Arc<C::Dyn>, ExtensionError> {
        if name.trim().is_empty() {
            return Err(ExtensionError::Usage("extension name must not be blank".to_string()));
        }
        self.ensure_bootstrapped();
        let query: String = if name == "true" {
            self.default_name()?.to_string()
        } else {
            name.to_string()
        };
        let record = self.record_for(&query).ok_or_else(|| self.no_such_extension(&query))?;
        record.holder.get_or_try_init(|| self.construct(&record))
    }

    fn default_name(&self) -> Result<&'static str, ExtensionError> {
        C::DEFAULT_NAME.ok_or_else(|| {
            ExtensionError::Usage(format!("contract '{}' declares no default name", C::NAME))
        })
    }

    /// Resolves the contract's default-named extension, or `Ok(None)` if the
    /// contract declares no default.
    pub fn get_default(&self) -> Result<Option<Arc<C::Dyn>>, ExtensionError> {
        match C::DEFAULT_NAME {
            None => Ok(None),
            Some(name) => self.get(name).map(Some),
        }
    }

    /// Resolves the adaptive dispatcher for this contract, building it at
    /// most once and caching a build failure just as stubbornly as a
    /// success (see [`crate::holder::StickyHolder`]).
    #[instrument(level = "debug", skip(self), fields(contract = C::NAME))]
    pub fn get_adaptive(&self) -> Result<Arc<C::Dyn>, ExtensionError> {
        self.ensure_bootstrapped();
        self.adaptive.get_or_try_init(|| {
            let registered_ctor = self.registry.state.read().adaptive.as_ref().map(|a| a.ctor);
            let mut boxed = match registered_ctor {
                Some(ctor) => ctor(),
                None => {
                    warn!(contract = C::NAME, "no registered adaptive class, using synthesized dispatcher");
                    C::synthesize_adaptive()
                }
            };
            boxed.inject(&self.injector);
            Ok(Arc::from(boxed))
        })
    }

    /// Resolves the group- and `Url`-activated extensions, with `names`
    /// spliced in per [`activation::resolve_order`].
    pub fn get_activated(
        &self,
        url: &Url,
        names: &[String],
        group: &str,
    ) -> Result<Vec<Arc<C::Dyn>>, ExtensionError> {
        self.ensure_bootstrapped();
        let candidates: Vec<(String, ActivateMeta)> = {
            let state = self.registry.state.read();
            state
                .entries
                .iter()
                .filter_map(|entry| entry.activate.map(|meta| (entry.primary_name.clone(), meta)))
                .collect()
        };
        let ordered = activation::resolve_order(&candidates, names, group, url);
        ordered.into_iter().map(|name| self.get(&name)).collect()
    }

    /// All registered names (primary and alias), sorted, after bootstrap.
    pub fn supported_names(&self) -> Vec<String> {
        self.ensure_bootstrapped();
        self.registry.supported_names()
    }

    /// Names whose instance has already been constructed.
    pub fn loaded_names(&self) -> Vec<String> {
        self.ensure_bootstrapped();
        self.registry.loaded_names()
    }

    /// Whether `name` is registered (constructed or not).
    pub fn has(&self, name: &str) -> bool {
        self.ensure_bootstrapped();
        self.registry.has(name)
    }

    /// Whether `name` is registered *and* has already been constructed.
    /// Never triggers construction.
    pub fn loaded(&self, name: &str) -> bool {
        self.ensure_bootstrapped();
        self.registry.loaded(name)
    }

    /// Bootstrap-time diagnostics: unresolved descriptor lines, unreadable
    /// files, and name collisions, accumulated without aborting discovery.
    pub fn diagnostics(&self) -> Vec<String> {
        self.ensure_bootstrapped();
        self.registry.diagnostics().into_iter().map(|d| d.to_string()).collect()
    }

    /// Administrative `add`: registers `name` against a caller-supplied
    /// constructor. Fails if `name` is already registered.
    pub fn add(&self, name: &str, impl_id: &'static str, ctor: fn() -> Box<C::Dyn>) -> Result<(), ExtensionError> {
        self.ensure_bootstrapped();
        self.registry.add(name, impl_id, ctor).map_err(ExtensionError::Usage)
    }

    /// Administrative `replace`: overwrites an already-registered name's
    /// constructor and clears its cached instance. Fails if `name` has never
    /// been registered.
    pub fn replace(&self, name: &str, impl_id: &'static str, ctor: fn() -> Box<C::Dyn>) -> Result<(), ExtensionError> {
        self.ensure_bootstrapped();
        self.registry.replace(name, impl_id, ctor).map_err(ExtensionError::Usage)
    }

    /// Administrative override of the adaptive dispatcher, invalidating any
    /// cached instance or sticky build failure.
    pub fn replace_adaptive(&self, impl_id: &'static str, ctor: fn() -> Box<C::Dyn>) {
        self.ensure_bootstrapped();
        self.registry.replace_adaptive(impl_id, ctor);
        self.adaptive.invalidate();
    }
}
