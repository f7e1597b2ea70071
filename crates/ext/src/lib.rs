//! # ext
//!
//! A reflection-free, compile-time SPI and dependency-injection core for
//! Rust — the same capability-contract / ordinary-implementation /
//! decorator / adaptive-dispatcher shape the source ecosystem's
//! `ExtensionLoader` provides, rebuilt around discovery mechanisms Rust
//! actually has.
//!
//! ## Overview
//!
//! Where the source ecosystem scans the classpath at runtime and
//! instantiates classes by reflection, `ext` collects implementations at
//! compile time through a `linkme::distributed_slice` per contract, and
//! resolves optional on-disk descriptor files against that compiled-in
//! table instead of loading arbitrary code:
//!
//! ```text
//! ┌──────────────────┐     ┌────────────────┐     ┌───────────┐
//! │ #[extension_point]│────▶│    Loader<C>   │────▶│ Injector  │──▶ setters
//! │  trait + markers   │     │ (get/adaptive/ │     │(ObjectFactory)
//! └──────────────────┘     │  activated)    │     └───────────┘
//!                          └────────────────┘
//! ```
//!
//! - **Contract**: a trait annotated `#[extension_point]`, generating a
//!   marker type, a distributed slice, and a synthesized adaptive
//!   dispatcher.
//! - **Registrations**: `extension_impl!`/`extension_wrapper!`/
//!   `extension_adaptive!` feed the slice from implementation crates.
//! - **Loader**: one process-wide instance per contract (via
//!   [`ext_runtime::loader_for`]), serving `get`, `get_default`,
//!   `get_adaptive`, and `get_activated`.
//!
//! ## Quick start
//!
//! ```rust,ignore
//! use ext::prelude::*;
//!
//! #[extension_point(name = "greeter", default = "plain")]
//! pub trait Greeter: Send + Sync {
//!     #[adaptive(keys("greeter.type"))]
//!     fn greet(&self, url: &Url, subject: &str) -> GreetResult;
//! }
//!
//! #[derive(Default)]
//! struct PlainGreeter;
//! impl Greeter for PlainGreeter {
//!     fn greet(&self, _url: &Url, subject: &str) -> GreetResult {
//!         Ok(format!("Hello, {subject}!"))
//!     }
//! }
//! extension_impl!(contract = GREETER_REGISTRY, dyn_ty = dyn Greeter,
//!     impl_id = "demo::PlainGreeter", names = ["plain"], ty = PlainGreeter);
//!
//! let loader = loader_for::<GreeterPoint>();
//! let greeting = loader.get("plain")?.greet(&Url::new("test"), "world")?;
//! ```

pub use ext_core::*;
pub use ext_runtime::{loader_for, ClasspathConfig, Diagnostic, Loader, LoggingBuilder, SpiObjectFactory};

#[cfg(feature = "macros")]
pub use ext_macros::extension_point;

/// Convenient glob import for host binaries wiring up extension points.
pub mod prelude {
    pub use crate::{
        extension_adaptive, extension_impl, extension_wrapper, ActivateMeta, ExtensionEntry,
        ExtensionError, ExtensionKind, ExtensionPoint, ExtensionResult, Injectable, Injector,
        Loader, ObjectFactory, Url,
    };
    pub use crate::loader_for;

    #[cfg(feature = "macros")]
    pub use crate::extension_point;
}
