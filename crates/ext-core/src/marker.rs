//! Contract markers, the registry's static entry shape, and dependency injection.

use std::any::{Any, TypeId};
use std::sync::Arc;

// ─── ExtensionPoint ────────────────────────────────────────────────────────

/// Compile-time marker for a capability contract (extension point).
///
/// Generated by `#[extension_point]` as a zero-sized type alongside the
/// contract trait itself — e.g. for `trait Greeter` the macro also emits a
/// `GreeterPoint` implementing this trait with `Dyn = dyn Greeter`.
///
/// This plays the role a `Class<T>` reflection token plays in languages with
/// runtime type introspection: something `'static` and nameable that a
/// generic `Loader<C>` can be parameterised over, standing in for the
/// contract type itself (which, being a trait, cannot be used directly as a
/// type parameter in object-safe form).
pub trait ExtensionPoint: 'static {
    /// The trait-object form of the contract, e.g. `dyn Greeter`.
    type Dyn: ?Sized + Send + Sync + 'static;

    /// The contract's declared name.
    const NAME: &'static str;

    /// The contract's single optional default name, embedded in its declaration.
    const DEFAULT_NAME: Option<&'static str> = None;

    /// Builds the build-time-synthesized adaptive dispatcher for this
    /// contract — used by the Loader when no `extension_adaptive!` entry is
    /// registered.
    ///
    /// `#[extension_point]` always generates an implementation of this: one
    /// that dispatches each `#[adaptive(keys(...))]` method by inspecting a
    /// `Url` argument, and returns an `ExtensionError::Unsupported` from any
    /// method with no adaptive annotation.
    fn synthesize_adaptive() -> Box<Self::Dyn>;

    /// Returns this contract's `linkme::distributed_slice` — the compiled-in
    /// analogue of a classpath scan — so the Loader never needs to name the
    /// static directly.
    fn registry() -> &'static [ExtensionEntry<Self::Dyn>];
}

// ─── Injectable / Injector / ObjectFactory ────────────────────────────────

/// Implemented by every contract trait (as a supertrait, added automatically
/// by `#[extension_point]`) so the Injector can drive setter-style dependency
/// resolution uniformly across ordinary, wrapper, and adaptive instances.
///
/// Each implementation publishes a list of (attribute-name,
/// collaborator-contract) requirements; the injector resolves them through
/// the Object Factory. Implementations that declare `inject: { ... }` in
/// `extension_impl!` get a generated body; implementations with no
/// dependencies may rely on the default no-op body.
pub trait Injectable {
    /// Resolves this instance's declared dependencies via `injector`.
    ///
    /// The default implementation does nothing, matching a plugin with no
    /// setter-style attributes.
    fn inject(&mut self, injector: &Injector) {
        let _ = injector;
    }
}

/// The collaborator contract through which the Injector resolves a setter's
/// required value.
///
/// Kept object-safe (unlike a generic `get_extension<C>` method would be) by
/// keying on [`TypeId`] instead of a type parameter, so `ObjectFactory` itself
/// remains a normal, swappable extension point rather than a concrete
/// singleton.
pub trait ObjectFactory: Send + Sync {
    /// Resolves the instance registered under `attribute` for the contract
    /// whose `dyn` type has `type_id`, or `None` if nothing satisfies it.
    fn get_instance(&self, type_id: TypeId, attribute: &str) -> Option<Arc<dyn Any + Send + Sync>>;
}

/// Thin, cloneable handle the Injector hands to setter-style injection code.
///
/// Wraps whatever [`ObjectFactory`] the host process has installed (normally
/// the runtime's built-in SPI-backed factory) and exposes a typed `get`
/// convenience on top of the type-erased [`ObjectFactory::get_instance`].
#[derive(Clone)]
pub struct Injector {
    factory: Arc<dyn ObjectFactory>,
}

impl Injector {
    /// Wraps an [`ObjectFactory`] implementation.
    pub fn new(factory: Arc<dyn ObjectFactory>) -> Self {
        Self { factory }
    }

    /// Resolves the extension registered under `attribute` for contract `C`.
    ///
    /// Returns `None` (never an error) when nothing satisfies the request —
    /// a setter simply isn't called in that case.
    pub fn get<C: ExtensionPoint>(&self, attribute: &str) -> Option<Arc<C::Dyn>> {
        let any = self
            .factory
            .get_instance(TypeId::of::<C::Dyn>(), attribute)?;
        any.downcast::<Arc<C::Dyn>>().ok().map(|boxed| (*boxed).clone())
    }
}

// ─── Registry entry shape ──────────────────────────────────────────────────

/// What functional role a registered extension plays.
///
/// In languages with runtime reflection this is inferred by inspecting the
/// class (marked adaptive? has a `T`-shaped constructor? nullary
/// constructor?). Rust has no runtime constructor inspection, so the kind is
/// declared explicitly at the `extension_impl!`/`extension_wrapper!`/
/// `extension_adaptive!` call site.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtensionKind {
    /// Ordinary implementation, constructed via a nullary-equivalent factory.
    Ordinary,
    /// Decorator whose sole constructor parameter is the contract itself.
    Wrapper,
    /// Hand-written adaptive dispatcher, used as-is rather than synthesized.
    Adaptive,
}

/// Activation metadata attached to ordinary classes only.
#[derive(Debug, Clone, Copy)]
pub struct ActivateMeta {
    /// Groups this implementation is default-on for.
    pub groups: &'static [&'static str],
    /// URL parameter keys whose presence activates this implementation.
    pub keys: &'static [&'static str],
    /// Sort order, ascending, for activation results.
    pub order: i32,
}

/// One statically-registered implementation of contract `D` (`D` is always a
/// `dyn Trait` type, e.g. `dyn Greeter`).
///
/// Exactly one of `ordinary_ctor`, `wrapper_ctor`, `adaptive_ctor` is `Some`,
/// matching `kind`. Entries are collected into the contract's
/// `linkme::distributed_slice`, replacing runtime classpath/resource
/// scanning as the discovery mechanism.
pub struct ExtensionEntry<D: ?Sized + 'static> {
    /// Fully-qualified implementation id, e.g. `"my_crate::EnGreeter"`.
    ///
    /// This is the value a descriptor file's right-hand side resolves
    /// against — it plays the role a fully-qualified class name plays in
    /// languages with a classpath.
    pub impl_id: &'static str,
    /// Explicit or derived names; the first is primary, the rest are aliases.
    pub names: &'static [&'static str],
    /// Ordinary, wrapper, or adaptive.
    pub kind: ExtensionKind,
    /// Present only for [`ExtensionKind::Ordinary`] entries.
    pub activate: Option<ActivateMeta>,
    /// Factory for an [`ExtensionKind::Ordinary`] entry.
    pub ordinary_ctor: Option<fn() -> Box<D>>,
    /// Factory for an [`ExtensionKind::Wrapper`] entry; takes the wrapped instance.
    pub wrapper_ctor: Option<fn(Arc<D>) -> Box<D>>,
    /// Factory for an [`ExtensionKind::Adaptive`] entry.
    pub adaptive_ctor: Option<fn() -> Box<D>>,
}

impl<D: ?Sized + 'static> Clone for ExtensionEntry<D> {
    fn clone(&self) -> Self {
        Self {
            impl_id: self.impl_id,
            names: self.names,
            kind: self.kind,
            activate: self.activate,
            ordinary_ctor: self.ordinary_ctor,
            wrapper_ctor: self.wrapper_ctor,
            adaptive_ctor: self.adaptive_ctor,
        }
    }
}

impl<D: ?Sized + 'static> Copy for ExtensionEntry<D> {}

impl<D: ?Sized + 'static> ExtensionEntry<D> {
    /// The primary (first) name, if this entry registers any names.
    pub fn primary_name(&self) -> Option<&'static str> {
        self.names.first().copied()
    }
}
