//! Registry, injector plumbing, wrapper composer, activation selector, and
//! loader façade for the Extension Runtime.
//!
//! `ext-core` defines the *shapes* (contracts, entries, errors); this crate
//! is where those shapes become a working plugin system: bootstrapping a
//! contract's registry from its `linkme::distributed_slice` and optional
//! descriptor files, constructing and wrapping instances on demand, and
//! exposing the whole thing through one [`Loader`] per contract, reachable
//! process-wide via [`global::loader_for`].

mod activation;
mod config;
mod descriptor;
mod global;
mod holder;
mod loader;
mod logging;
mod object_factory;
mod registry;
mod scanner;
mod wrapper;

pub use config::ClasspathConfig;
pub use global::loader_for;
pub use loader::Loader;
pub use logging::LoggingBuilder;
pub use object_factory::{spi_injector, SpiObjectFactory};
pub use registry::Diagnostic;
