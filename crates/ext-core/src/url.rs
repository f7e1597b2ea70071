//! The Parameter Bag (`Url`) collaborator consumed by the Adaptive Dispatcher.
//!
//! A small, owned, cheaply-cloned value type with accessor methods rather
//! than public fields, so construction and lookup can diverge later without
//! breaking callers.

use std::collections::BTreeMap;

/// A request-scoped URL-like bag of parameters.
///
/// `Url` is the only collaborator the Adaptive Dispatcher reads from.
/// It carries a protocol selector and a flat key/value parameter map; method
/// names may additionally qualify a parameter as `method.key` for
/// [`Url::method_parameter`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Url {
    protocol: String,
    parameters: BTreeMap<String, String>,
}

impl Url {
    /// Creates a `Url` with the given protocol and no parameters.
    pub fn new(protocol: impl Into<String>) -> Self {
        Self {
            protocol: protocol.into(),
            parameters: BTreeMap::new(),
        }
    }

    /// Builder-style parameter insertion.
    #[must_use]
    pub fn with_parameter(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.parameters.insert(key.into(), value.into());
        self
    }

    /// The protocol selector (e.g. the scheme of a connection URL).
    pub fn protocol(&self) -> &str {
        &self.protocol
    }

    /// Looks up a parameter by exact key.
    pub fn parameter(&self, key: &str) -> Option<&str> {
        self.parameters.get(key).map(String::as_str)
    }

    /// Looks up a parameter scoped to `method`, falling back to `default`.
    ///
    /// Tries `"{method}.{key}"` first, then the bare `key`, then `default`.
    pub fn method_parameter(&self, method: &str, key: &str, default: &str) -> String {
        let scoped = format!("{method}.{key}");
        self.parameter(&scoped)
            .or_else(|| self.parameter(key))
            .unwrap_or(default)
            .to_string()
    }

    /// Iterates all `(key, value)` pairs.
    pub fn parameters(&self) -> impl Iterator<Item = (&str, &str)> {
        self.parameters
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Returns `true` if `key` is present with a non-empty value, or if any
    /// parameter key **ends with** `"." + key` and is non-empty.
    ///
    /// This mirrors the activation-matching rule: a plain key match, or a
    /// namespaced match like `"greeter.group"` satisfying key `"group"`.
    pub fn has_non_empty(&self, key: &str) -> bool {
        let suffix = format!(".{key}");
        self.parameters.iter().any(|(k, v)| {
            !v.is_empty() && (k == key || k.ends_with(&suffix))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn method_parameter_prefers_scoped_key() {
        let url = Url::new("dubbo")
            .with_parameter("greet.timeout", "5")
            .with_parameter("timeout", "10");
        assert_eq!(url.method_parameter("greet", "timeout", "0"), "5");
        assert_eq!(url.method_parameter("other", "timeout", "0"), "10");
        assert_eq!(url.method_parameter("other", "missing", "0"), "0");
    }

    #[test]
    fn has_non_empty_matches_suffixed_keys() {
        let url = Url::new("dubbo").with_parameter("service.group", "provider");
        assert!(url.has_non_empty("group"));
        assert!(!url.has_non_empty("order"));
    }

    #[test]
    fn has_non_empty_rejects_blank_values() {
        let url = Url::new("dubbo").with_parameter("group", "");
        assert!(!url.has_non_empty("group"));
    }
}
