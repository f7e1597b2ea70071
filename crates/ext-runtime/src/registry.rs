//! Class Resolver and Classifier plus the by-name/by-class registry they
//! populate.
//!
//! Bootstrap unifies two sources of [`ext_core::ExtensionEntry`] records for a
//! contract: the compiled-in `linkme::distributed_slice` (always present) and
//! on-disk descriptor lines (optional, resolved against the impl-id the
//! compiled entries publish). A descriptor line naming an impl id nothing in
//! the binary registers under is a missing or incompatible class — it cannot
//! be loaded, so it is recorded as a [`Diagnostic`] rather than panicking the
//! process, the same way a manager logs and skips one bad plugin manifest
//! entry instead of aborting startup.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;

use parking_lot::RwLock;

use ext_core::{ActivateMeta, ExtensionEntry, ExtensionKind, ExtensionPoint};

use crate::holder::Holder;
use crate::scanner;

/// A non-fatal problem recorded during bootstrap: an unresolved descriptor
/// line, an unreadable file, or a name collision. Surfaced through
/// `Loader::diagnostics` and folded into `ExtensionError::NoSuchExtension`'s
/// `causes` when a lookup fails.
#[derive(Debug, Clone)]
pub struct Diagnostic {
    pub resource: String,
    pub line: String,
    pub reason: String,
}

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.line.is_empty() {
            write!(f, "{}: {}", self.resource, self.reason)
        } else {
            write!(f, "{} line {}: {}", self.resource, self.line, self.reason)
        }
    }
}

pub(crate) struct EntryRecord<D: ?Sized + 'static> {
    pub impl_id: &'static str,
    pub primary_name: String,
    pub activate: Option<ActivateMeta>,
    pub ctor: fn() -> Box<D>,
    pub holder: Holder<D>,
}

pub(crate) struct WrapperRecord<D: ?Sized + 'static> {
    pub impl_id: &'static str,
    pub ctor: fn(Arc<D>) -> Box<D>,
}

pub(crate) struct AdaptiveRecord<D: ?Sized + 'static> {
    pub impl_id: &'static str,
    pub ctor: fn() -> Box<D>,
}

pub(crate) struct RegistryState<D: ?Sized + 'static> {
    pub entries: Vec<Arc<EntryRecord<D>>>,
    pub by_name: HashMap<String, Arc<EntryRecord<D>>>,
    pub wrappers: Vec<WrapperRecord<D>>,
    pub adaptive: Option<AdaptiveRecord<D>>,
    pub diagnostics: Vec<Diagnostic>,
    pub bootstrapped: bool,
}

impl<D: ?Sized + 'static> Default for RegistryState<D> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
            by_name: HashMap::new(),
            wrappers: Vec::new(),
            adaptive: None,
            diagnostics: Vec::new(),
            bootstrapped: false,
        }
    }
}

pub(crate) struct Registry<C: ExtensionPoint> {
    pub state: RwLock<RegistryState<C::Dyn>>,
    _marker: std::marker::PhantomData<fn() -> C>,
}

impl<C: ExtensionPoint> Default for Registry<C> {
    fn default() -> Self {
        Self { state: RwLock::new(RegistryState::default()), _marker: std::marker::PhantomData }
    }
}

impl<C: ExtensionPoint> Registry<C> {
    /// Populates the registry once from `compiled` (the contract's
    /// `linkme::distributed_slice`) and the descriptor files found under
    /// `roots`. Safe to call more than once; only the first call does work.
    pub fn bootstrap(&self, compiled: &'static [ExtensionEntry<C::Dyn>], roots: &[PathBuf]) {
        {
            let state = self.state.read();
            if state.bootstrapped {
                return;
            }
        }
        let mut state = self.state.write();
        if state.bootstrapped {
            return;
        }

        let mut impl_index: HashMap<&'static str, Arc<EntryRecord<C::Dyn>>> = HashMap::new();

        for entry in compiled {
            match entry.kind {
                ExtensionKind::Ordinary => {
                    let Some(ctor) = entry.ordinary_ctor else { continue };
                    let Some(primary) = entry.primary_name() else { continue };
                    let record = Arc::new(EntryRecord {
                        impl_id: entry.impl_id,
                        primary_name: primary.to_string(),
                        activate: entry.activate,
                        ctor,
                        holder: Holder::default(),
                    });
                    impl_index.insert(entry.impl_id, record.clone());
                    state.entries.push(record.clone());
                    for name in entry.names {
                        insert_name(&mut state.by_name, &mut state.diagnostics, "<compiled-in>", name, record.clone());
                    }
                }
                ExtensionKind::Wrapper => {
                    let Some(ctor) = entry.wrapper_ctor else { continue };
                    state.wrappers.push(WrapperRecord { impl_id: entry.impl_id, ctor });
                }
                ExtensionKind::Adaptive => {
                    let Some(ctor) = entry.adaptive_ctor else { continue };
                    if let Some(existing) = &state.adaptive {
                        state.diagnostics.push(Diagnostic {
                            resource: "<compiled-in>".into(),
                            line: String::new(),
                            reason: format!(
                                "duplicate adaptive registration: keeping '{}', ignoring '{}'",
                                existing.impl_id, entry.impl_id
                            ),
                        });
                    } else {
                        state.adaptive = Some(AdaptiveRecord { impl_id: entry.impl_id, ctor });
                    }
                }
            }
        }

        let (lines, mut diagnostics) = scanner::scan(roots, C::NAME);
        state.diagnostics.append(&mut diagnostics);
        for line in lines {
            let Some(record) = impl_index.get(line.impl_id.as_str()).cloned() else {
                state.diagnostics.push(Diagnostic {
                    resource: line.resource,
                    line: line.impl_id.clone(),
                    reason: format!("no compiled-in implementation registered under id '{}'", line.impl_id),
                });
                continue;
            };
            if line.names.is_empty() {
                let derived = derive_name(&line.impl_id, C::NAME);
                insert_name(&mut state.by_name, &mut state.diagnostics, &record.impl_id, &derived, record.clone());
                continue;
            }
            for name in &line.names {
                insert_name(&mut state.by_name, &mut state.diagnostics, &record.impl_id, name, record.clone());
            }
        }

        state.bootstrapped = true;
    }

    pub fn supported_names(&self) -> Vec<String> {
        let state = self.state.read();
        let mut names: Vec<String> = state.by_name.keys().cloned().collect();
        names.sort();
        names
    }

    pub fn loaded_names(&self) -> Vec<String> {
        let state = self.state.read();
        state
            .by_name
            .iter()
            .filter(|(_, record)| record.holder.get().is_some())
            .map(|(name, _)| name.clone())
            .collect()
    }

    pub fn has(&self, name: &str) -> bool {
        self.state.read().by_name.contains_key(name)
    }

    /// Whether `name` is both registered and already constructed, without
    /// triggering construction itself.
    pub fn loaded(&self, name: &str) -> bool {
        self.state
            .read()
            .by_name
            .get(name)
            .is_some_and(|record| record.holder.get().is_some())
    }

    pub fn diagnostics(&self) -> Vec<Diagnostic> {
        self.state.read().diagnostics.clone()
    }

    /// Administrative `add`: fails if `name` is already registered.
    pub fn add(&self, name: &str, impl_id: &'static str, ctor: fn() -> Box<C::Dyn>) -> Result<(), String> {
        let mut state = self.state.write();
        if state.by_name.contains_key(name) {
            return Err(format!("extension name '{name}' is already registered"));
        }
        let record = Arc::new(EntryRecord {
            impl_id,
            primary_name: name.to_string(),
            activate: None,
            ctor,
            holder: Holder::default(),
        });
        state.entries.push(record.clone());
        state.by_name.insert(name.to_string(), record);
        Ok(())
    }

    /// Administrative `replace`: fails if `name` is not registered.
    pub fn replace(&self, name: &str, impl_id: &'static str, ctor: fn() -> Box<C::Dyn>) -> Result<(), String> {
        let mut state = self.state.write();
        if !state.by_name.contains_key(name) {
            return Err(format!("extension name '{name}' is not registered"));
        }
        let record = Arc::new(EntryRecord {
            impl_id,
            primary_name: name.to_string(),
            activate: None,
            ctor,
            holder: Holder::default(),
        });
        state.by_name.insert(name.to_string(), record);
        Ok(())
    }

    /// Administrative override of the adaptive dispatcher. Unlike `add`/
    /// `replace`, this always succeeds: an adaptive slot is either empty (the
    /// Loader falls back to the build-time-synthesized dispatcher) or filled,
    /// never "absent vs. present" in a way worth rejecting.
    pub fn replace_adaptive(&self, impl_id: &'static str, ctor: fn() -> Box<C::Dyn>) {
        let mut state = self.state.write();
        state.adaptive = Some(AdaptiveRecord { impl_id, ctor });
    }
}

/// Derives a name for a descriptor line that carried no explicit `name =`
/// left-hand side: the implementation id's simple name (the part after its
/// last path separator), minus the contract's name (in either case) as a
/// prefix or suffix, lowercased. E.g. `demo::EnGreeter` under contract
/// `greeter` derives `en`.
fn derive_name(impl_id: &str, contract_name: &str) -> String {
    let simple = impl_id
        .rsplit("::")
        .next()
        .unwrap_or(impl_id)
        .rsplit('.')
        .next()
        .unwrap_or(impl_id);
    let pascal_contract = to_pascal_case(contract_name);
    let stripped = simple
        .strip_suffix(pascal_contract.as_str())
        .or_else(|| simple.strip_prefix(pascal_contract.as_str()))
        .unwrap_or(simple);
    let stripped = if stripped.is_empty() { simple } else { stripped };
    stripped.to_lowercase()
}

fn to_pascal_case(snake: &str) -> String {
    snake
        .split(|c| c == '_' || c == '-')
        .filter(|part| !part.is_empty())
        .map(|part| {
            let mut chars = part.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
                None => String::new(),
            }
        })
        .collect()
}

fn insert_name<D: ?Sized + 'static>(
    by_name: &mut HashMap<String, Arc<EntryRecord<D>>>,
    diagnostics: &mut Vec<Diagnostic>,
    resource: &str,
    name: &str,
    record: Arc<EntryRecord<D>>,
) {
    match by_name.get(name) {
        None => {
            by_name.insert(name.to_string(), record);
        }
        Some(existing) if existing.impl_id == record.impl_id => {
            // Same implementation registered under the same name twice — a
            // no-op, not a conflict (e.g. re-declared as both primary and an
            // alias-file entry).
        }
        Some(existing) => {
            diagnostics.push(Diagnostic {
                resource: resource.to_string(),
                line: name.to_string(),
                reason: format!(
                    "name '{name}' already maps to '{}', ignoring '{}'",
                    existing.impl_id, record.impl_id
                ),
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn derive_name_strips_contract_suffix_and_lowercases() {
        assert_eq!(derive_name("demo::EnGreeter", "greeter"), "en");
        assert_eq!(derive_name("demo::object_factory::DefaultObjectFactory", "object_factory"), "default");
    }

    #[test]
    fn derive_name_falls_back_to_simple_name_without_contract_overlap() {
        assert_eq!(derive_name("demo::Spi", "greeter"), "spi");
    }
}
