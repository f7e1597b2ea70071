//! Declarative registration macros.
//!
//! These are the compile-time analogue of a descriptor-file line: each
//! invocation contributes one [`crate::ExtensionEntry`] into the contract's
//! `linkme::distributed_slice`, the same way an attribute-driven capability
//! registration feeds its own distributed slice at link time.
//!
//! Each invocation is wrapped in an anonymous `const _: () = { ... };` block
//! so the generated `static` doesn't need a globally-unique name — every
//! macro call site gets its own scope.

/// Registers an ordinary implementation of contract `$dyn_ty`, discovered via
/// `$slice` (the contract's `linkme::distributed_slice`, declared by
/// `#[extension_point]`).
///
/// `ty` must implement `Default` (the nullary-constructor requirement for
/// ordinary implementations) and the contract trait itself.
#[macro_export]
macro_rules! extension_impl {
    (
        contract = $slice:path,
        dyn_ty = $dyn_ty:ty,
        impl_id = $id:literal,
        names = [$($name:literal),+ $(,)?],
        ty = $ty:ty $(,)?
    ) => {
        $crate::extension_impl! {
            contract = $slice, dyn_ty = $dyn_ty, impl_id = $id,
            names = [$($name),+], ty = $ty,
            activate = { groups = [], keys = [], order = 0 },
        }
    };

    (
        contract = $slice:path,
        dyn_ty = $dyn_ty:ty,
        impl_id = $id:literal,
        names = [$($name:literal),+ $(,)?],
        ty = $ty:ty,
        activate = { groups = [$($group:literal),* $(,)?], keys = [$($key:literal),* $(,)?], order = $order:expr $(,)? } $(,)?
    ) => {
        const _: () = {
            #[$crate::linkme::distributed_slice($slice)]
            static __EXT_ENTRY: $crate::ExtensionEntry<$dyn_ty> = $crate::ExtensionEntry {
                impl_id: $id,
                names: &[$($name),+],
                kind: $crate::ExtensionKind::Ordinary,
                activate: ::std::option::Option::Some($crate::ActivateMeta {
                    groups: &[$($group),*],
                    keys: &[$($key),*],
                    order: $order,
                }),
                ordinary_ctor: ::std::option::Option::Some(|| {
                    ::std::boxed::Box::new(<$ty as ::std::default::Default>::default()) as ::std::boxed::Box<$dyn_ty>
                }),
                wrapper_ctor: ::std::option::Option::None,
                adaptive_ctor: ::std::option::Option::None,
            };
        };
    };
}

/// Registers a decorator whose sole constructor parameter is the contract
/// itself.
///
/// `ctor` must be an `fn(Arc<$dyn_ty>) -> $ty` path (a `new`-style associated
/// function, since Rust has no reflection over constructors).
#[macro_export]
macro_rules! extension_wrapper {
    (
        contract = $slice:path,
        dyn_ty = $dyn_ty:ty,
        impl_id = $id:literal,
        ty = $ty:ty,
        ctor = $ctor:path $(,)?
    ) => {
        const _: () = {
            #[$crate::linkme::distributed_slice($slice)]
            static __EXT_ENTRY: $crate::ExtensionEntry<$dyn_ty> = $crate::ExtensionEntry {
                impl_id: $id,
                names: &[],
                kind: $crate::ExtensionKind::Wrapper,
                activate: ::std::option::Option::None,
                ordinary_ctor: ::std::option::Option::None,
                wrapper_ctor: ::std::option::Option::Some(|inner: ::std::sync::Arc<$dyn_ty>| {
                    ::std::boxed::Box::new($ctor(inner)) as ::std::boxed::Box<$dyn_ty>
                }),
                adaptive_ctor: ::std::option::Option::None,
            };
        };
    };
}

/// Registers a hand-written adaptive dispatcher, bypassing build-time
/// synthesis entirely.
#[macro_export]
macro_rules! extension_adaptive {
    (
        contract = $slice:path,
        dyn_ty = $dyn_ty:ty,
        impl_id = $id:literal,
        ty = $ty:ty $(,)?
    ) => {
        const _: () = {
            #[$crate::linkme::distributed_slice($slice)]
            static __EXT_ENTRY: $crate::ExtensionEntry<$dyn_ty> = $crate::ExtensionEntry {
                impl_id: $id,
                names: &[],
                kind: $crate::ExtensionKind::Adaptive,
                activate: ::std::option::Option::None,
                ordinary_ctor: ::std::option::Option::None,
                wrapper_ctor: ::std::option::Option::None,
                adaptive_ctor: ::std::option::Option::Some(|| {
                    ::std::boxed::Box::new(<$ty as ::std::default::Default>::default()) as ::std::boxed::Box<$dyn_ty>
                }),
            };
        };
    };
}
