//! Foundational types for the Extension Runtime.
//!
//! `ext-core` has no knowledge of the registry, injector, or dispatcher — it
//! only defines the shapes those pieces (in `ext-runtime`) operate on: the
//! [`ExtensionPoint`] marker, the [`ExtensionEntry`] a distributed slice
//! collects, the [`Injectable`]/[`Injector`]/[`ObjectFactory`] dependency
//! surface, the [`Url`] parameter bag, and the [`ExtensionError`] taxonomy.
//!
//! Splitting it out this way lets implementation crates that only need to
//! *register* an extension (via [`extension_impl!`]) depend on `ext-core`
//! alone, without pulling in the loader machinery.

mod error;
mod marker;
mod register;
mod url;

pub use error::{ExtensionError, ExtensionResult};
pub use marker::{
    ActivateMeta, ExtensionEntry, ExtensionKind, ExtensionPoint, Injectable, Injector,
    ObjectFactory,
};
pub use url::Url;

/// Re-exported so `extension_impl!`/`extension_wrapper!`/`extension_adaptive!`
/// can reference `$crate::linkme::distributed_slice` without requiring callers
/// to add a direct `linkme` dependency themselves.
pub use linkme;
