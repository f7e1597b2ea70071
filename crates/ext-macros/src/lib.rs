//! The `#[extension_point]` attribute macro.
//!
//! Turns a plain trait definition into a fully wired capability contract:
//! adds the [`ext_core::Injectable`] supertrait, emits the zero-sized marker
//! type and its [`ext_core::ExtensionPoint`] impl, declares the contract's
//! `linkme::distributed_slice`, and synthesizes an adaptive dispatcher
//! struct (build-time codegen in place of a runtime adaptive-class
//! compiler) that resolves each `#[adaptive(keys(...))]`-tagged method
//! against a `Url` argument at call-time via `ext_runtime::loader_for`.
//!
//! An adaptive-tagged method's signature must take `&self` then `url: &Url`
//! as its first two parameters; this is the one structural constraint the
//! macro imposes in exchange for not needing full type inference to find
//! "the" URL parameter among a method's arguments the way a
//! reflection-based adaptive compiler could.

use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::{format_ident, quote};
use syn::spanned::Spanned;
use syn::{parse_macro_input, FnArg, ItemTrait, TraitItem, TraitItemFn};

struct ExtensionPointArgs {
    name: Option<String>,
    default: Option<String>,
}

impl syn::parse::Parse for ExtensionPointArgs {
    fn parse(input: syn::parse::ParseStream) -> syn::Result<Self> {
        let mut name = None;
        let mut default = None;
        let pairs = syn::punctuated::Punctuated::<syn::MetaNameValue, syn::Token![,]>::parse_terminated(input)?;
        for pair in pairs {
            let ident = pair
                .path
                .get_ident()
                .map(|i| i.to_string())
                .unwrap_or_default();
            let value = match &pair.value {
                syn::Expr::Lit(syn::ExprLit { lit: syn::Lit::Str(s), .. }) => s.value(),
                other => return Err(syn::Error::new_spanned(other, "expected a string literal")),
            };
            match ident.as_str() {
                "name" => name = Some(value),
                "default" => default = Some(value),
                other => {
                    return Err(syn::Error::new(
                        pair.path.span(),
                        format!("unknown extension_point argument '{other}'"),
                    ))
                }
            }
        }
        Ok(ExtensionPointArgs { name, default })
    }
}

#[proc_macro_attribute]
pub fn extension_point(attr: TokenStream, item: TokenStream) -> TokenStream {
    let args = parse_macro_input!(attr as ExtensionPointArgs);
    let mut item_trait = parse_macro_input!(item as ItemTrait);

    let trait_ident = item_trait.ident.clone();
    let point_ident = format_ident!("{}Point", trait_ident);
    let registry_ident = format_ident!("{}_REGISTRY", to_shouty_snake(&trait_ident.to_string()));
    let adaptive_ident = format_ident!("__{}Adaptive", trait_ident);

    let contract_name = args.name.unwrap_or_else(|| to_snake(&trait_ident.to_string()));
    let default_name_tokens = match &args.default {
        Some(name) => quote! { ::std::option::Option::Some(#name) },
        None => quote! { ::std::option::Option::None },
    };

    let mut adaptive_methods: Vec<(TraitItemFn, Vec<String>)> = Vec::new();
    for member in item_trait.items.iter_mut() {
        if let TraitItem::Fn(method) = member {
            let mut keys: Option<Vec<String>> = None;
            method.attrs.retain(|attr| {
                if attr.path().is_ident("adaptive") {
                    keys = Some(parse_adaptive_keys(attr));
                    false
                } else {
                    true
                }
            });
            if let Some(keys) = keys {
                adaptive_methods.push((method.clone(), keys));
            }
        }
    }

    item_trait
        .supertraits
        .push(syn::parse_quote!(::ext_core::Injectable));

    let adaptive_impls: Vec<TokenStream2> = adaptive_methods
        .iter()
        .map(|(method, keys)| generate_adaptive_method(&point_ident, method, keys))
        .collect();

    let adaptive_names: Vec<syn::Ident> = adaptive_methods
        .iter()
        .map(|(method, _)| method.sig.ident.clone())
        .collect();

    let unsupported_impls: Vec<TokenStream2> = item_trait
        .items
        .iter()
        .filter_map(|member| match member {
            TraitItem::Fn(method) if !adaptive_names.contains(&method.sig.ident) => {
                Some(generate_unsupported_method(method, &contract_name))
            }
            _ => None,
        })
        .collect();

    let dyn_ty: syn::Type = syn::parse_quote!(dyn #trait_ident);

    let expanded = quote! {
        #item_trait

        #[allow(non_camel_case_types)]
        #[derive(Debug, Clone, Copy, Default)]
        pub struct #point_ident;

        impl ::ext_core::ExtensionPoint for #point_ident {
            type Dyn = #dyn_ty;
            const NAME: &'static str = #contract_name;
            const DEFAULT_NAME: ::std::option::Option<&'static str> = #default_name_tokens;

            fn synthesize_adaptive() -> ::std::boxed::Box<Self::Dyn> {
                ::std::boxed::Box::new(#adaptive_ident::default())
            }

            fn registry() -> &'static [::ext_core::ExtensionEntry<Self::Dyn>] {
                &#registry_ident
            }
        }

        #[::ext_core::linkme::distributed_slice]
        pub static #registry_ident: [::ext_core::ExtensionEntry<#dyn_ty>] = [..];

        #[allow(non_camel_case_types)]
        #[derive(Default)]
        pub struct #adaptive_ident;

        impl ::ext_core::Injectable for #adaptive_ident {}

        impl #trait_ident for #adaptive_ident {
            #(#adaptive_impls)*
            #(#unsupported_impls)*
        }
    };

    expanded.into()
}

fn parse_adaptive_keys(attr: &syn::Attribute) -> Vec<String> {
    let mut keys = Vec::new();
    let _ = attr.parse_nested_meta(|meta| {
        if meta.path.is_ident("keys") {
            let content;
            syn::parenthesized!(content in meta.input);
            let list = syn::punctuated::Punctuated::<syn::LitStr, syn::Token![,]>::parse_terminated(&content)?;
            keys = list.into_iter().map(|l| l.value()).collect();
        }
        Ok(())
    });
    keys
}

/// `"protocol"` is a reserved key: it reads the `Url`'s protocol field
/// instead of its parameter bag, so a method can dispatch on scheme as well
/// as on ordinary parameters.
fn generate_adaptive_method(point_ident: &syn::Ident, method: &TraitItemFn, keys: &[String]) -> TokenStream2 {
    let sig = &method.sig;
    let name = &sig.ident;
    let name_str = name.to_string();
    let returns_result = matches!(
        &sig.output,
        syn::ReturnType::Type(_, ty) if is_result_type(ty)
    );

    let forwarded_args: Vec<syn::Ident> = sig
        .inputs
        .iter()
        .skip(2) // &self, url
        .filter_map(|input| match input {
            FnArg::Typed(pat_type) => match &*pat_type.pat {
                syn::Pat::Ident(pat_ident) => Some(pat_ident.ident.clone()),
                _ => None,
            },
            FnArg::Receiver(_) => None,
        })
        .collect();

    // A URL selecting a name nothing is registered under is valid runtime
    // input (spec §7: "everything else is propagated to the caller"), not a
    // build-time-shaped failure — so a `Result`-returning method surfaces
    // the lookup error through its own return type instead of panicking.
    // A method with no `Result` in its signature has nowhere to put that
    // error, so it panics; that mirrors `generate_unsupported_method`'s own
    // split on `returns_result`.
    let resolve_instance = if returns_result {
        quote! {
            let __instance = match ::ext_runtime::loader_for::<#point_ident>().get(__name) {
                ::std::result::Result::Ok(instance) => instance,
                ::std::result::Result::Err(err) => {
                    return ::std::result::Result::Err(::std::convert::From::from(err));
                }
            };
        }
    } else {
        quote! {
            let __instance = ::ext_runtime::loader_for::<#point_ident>()
                .get(__name)
                .unwrap_or_else(|err| panic!("adaptive dispatch for '{}' failed: {err}", #name_str));
        }
    };

    quote! {
        #sig {
            let __name = [#(#keys),*]
                .into_iter()
                .find_map(|key| {
                    if key == "protocol" {
                        let proto = url.protocol();
                        if proto.is_empty() { None } else { Some(proto) }
                    } else {
                        url.parameter(key)
                    }
                })
                .unwrap_or("true");
            #resolve_instance
            __instance.#name(url #(, #forwarded_args)*)
        }
    }
}

fn generate_unsupported_method(method: &TraitItemFn, contract_name: &str) -> TokenStream2 {
    let sig = &method.sig;
    let name_str = sig.ident.to_string();
    let returns_result = matches!(
        &sig.output,
        syn::ReturnType::Type(_, ty) if is_result_type(ty)
    );

    if returns_result {
        quote! {
            #sig {
                ::std::result::Result::Err(::std::convert::From::from(::ext_core::ExtensionError::Unsupported {
                    contract: #contract_name,
                    operation: #name_str,
                }))
            }
        }
    } else {
        quote! {
            #sig {
                panic!(
                    "'{}' carries no #[adaptive(...)] annotation and cannot be dispatched on contract '{}'",
                    #name_str, #contract_name,
                )
            }
        }
    }
}

fn is_result_type(ty: &syn::Type) -> bool {
    match ty {
        syn::Type::Path(type_path) => type_path
            .path
            .segments
            .last()
            .map(|segment| segment.ident == "Result" || segment.ident == "ExtensionResult")
            .unwrap_or(false),
        _ => false,
    }
}

fn to_shouty_snake(input: &str) -> String {
    let mut out = String::new();
    for (i, ch) in input.chars().enumerate() {
        if ch.is_uppercase() && i != 0 {
            out.push('_');
        }
        out.extend(ch.to_uppercase());
    }
    out
}

fn to_snake(input: &str) -> String {
    to_shouty_snake(input).to_lowercase()
}
