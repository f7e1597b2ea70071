//! Activation Selector.
//!
//! Resolves a two-phase algorithm — match the default-activated group
//! against a `Url`, then splice in an explicit, caller-supplied name list
//! (with `-name` exclusions and a `"default"` position marker) — down to a
//! flat, ordered list of extension *names*. Deliberately decoupled from
//! construction: the Loader turns each returned name into an instance via
//! its own `get`, so this module stays unit-testable without any contract
//! trait in scope.

use std::collections::HashSet;

use ext_core::{ActivateMeta, Url};

/// Determines which registered names to materialize and in what order, given
/// the default-activated candidates, an explicit request list, the
/// requesting group, and the `Url` carrying key-activation parameters.
///
/// `requested` entries starting with `-` exclude that name from the result
/// (`"-default"` suppresses the whole default-activated group); a bare
/// `"default"` entry marks where the default group should be spliced in
/// relative to the other explicit names. Absent a `"default"` marker, the
/// default group is implicitly placed first.
pub fn resolve_order(
    candidates: &[(String, ActivateMeta)],
    requested: &[String],
    group: &str,
    url: &Url,
) -> Vec<String> {
    let mut excluded: HashSet<&str> = HashSet::new();
    let mut explicit: Vec<&str> = Vec::new();
    let mut has_default_marker = false;

    for raw in requested {
        if let Some(stripped) = raw.strip_prefix('-') {
            excluded.insert(stripped);
        } else if raw == "default" {
            has_default_marker = true;
        } else {
            explicit.push(raw.as_str());
        }
    }

    let mut defaults: Vec<&(String, ActivateMeta)> = candidates
        .iter()
        .filter(|(name, meta)| {
            !excluded.contains(name.as_str())
                && !explicit.contains(&name.as_str())
                && group_matches(meta.groups, group)
                && keys_match(meta.keys, url)
        })
        .collect();
    defaults.sort_by(|a, b| a.1.order.cmp(&b.1.order).then_with(|| a.0.cmp(&b.0)));
    let default_names: Vec<String> = defaults.into_iter().map(|(n, _)| n.clone()).collect();
    let suppress_defaults = excluded.contains("default");

    let mut result = Vec::new();
    if has_default_marker {
        for raw in requested {
            if raw == "default" {
                if !suppress_defaults {
                    result.extend(default_names.iter().cloned());
                }
            } else if raw.starts_with('-') {
                continue;
            } else if !excluded.contains(raw.as_str()) {
                result.push(raw.clone());
            }
        }
    } else {
        if !suppress_defaults {
            result.extend(default_names.iter().cloned());
        }
        result.extend(explicit.into_iter().map(str::to_string));
    }
    result
}

fn group_matches(groups: &[&str], group: &str) -> bool {
    group.is_empty() || groups.contains(&group)
}

fn keys_match(keys: &[&str], url: &Url) -> bool {
    keys.is_empty() || keys.iter().any(|k| url.has_non_empty(k))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn meta(groups: &'static [&'static str], keys: &'static [&'static str], order: i32) -> ActivateMeta {
        ActivateMeta { groups, keys, order }
    }

    #[test]
    fn defaults_come_first_and_sort_by_order() {
        let candidates = vec![
            ("b".to_string(), meta(&[], &[], 10)),
            ("a".to_string(), meta(&[], &[], 1)),
        ];
        let names = Vec::new();
        let url = Url::new("test");
        // An empty caller group matches every entry regardless of its own
        // declared groups (§4.8); a non-empty caller group would require an
        // exact match against a non-empty `groups` list, which neither
        // candidate here declares.
        let resolved = resolve_order(&candidates, &names, "", &url);
        assert_eq!(resolved, vec!["a".to_string(), "b".to_string()]);
    }

    #[test]
    fn groupless_entries_do_not_activate_for_a_named_caller_group() {
        let candidates = vec![("a".to_string(), meta(&[], &[], 0))];
        let url = Url::new("test");
        assert!(resolve_order(&candidates, &[], "consumer", &url).is_empty());
        assert_eq!(resolve_order(&candidates, &[], "", &url), vec!["a".to_string()]);
    }

    #[test]
    fn group_filter_excludes_non_matching_entries() {
        let candidates = vec![
            ("a".to_string(), meta(&["provider"], &[], 0)),
            ("b".to_string(), meta(&["consumer"], &[], 0)),
        ];
        let url = Url::new("test");
        let resolved = resolve_order(&candidates, &[], "consumer", &url);
        assert_eq!(resolved, vec!["b".to_string()]);
    }

    #[test]
    fn key_activation_requires_non_empty_url_parameter() {
        let candidates = vec![("cache".to_string(), meta(&[], &["cache"], 0))];
        let without = Url::new("test");
        assert!(resolve_order(&candidates, &[], "", &without).is_empty());

        let with = Url::new("test").with_parameter("cache", "lru");
        assert_eq!(resolve_order(&candidates, &[], "", &with), vec!["cache".to_string()]);
    }

    #[test]
    fn explicit_names_append_after_defaults_without_marker() {
        let candidates = vec![("a".to_string(), meta(&[], &[], 0))];
        let requested = vec!["custom".to_string()];
        let url = Url::new("test");
        let resolved = resolve_order(&candidates, &requested, "", &url);
        assert_eq!(resolved, vec!["a".to_string(), "custom".to_string()]);
    }

    #[test]
    fn default_marker_controls_splice_position() {
        let candidates = vec![("a".to_string(), meta(&[], &[], 0))];
        let requested = vec!["custom".to_string(), "default".to_string()];
        let url = Url::new("test");
        let resolved = resolve_order(&candidates, &requested, "", &url);
        assert_eq!(resolved, vec!["custom".to_string(), "a".to_string()]);
    }

    #[test]
    fn minus_default_suppresses_default_group_entirely() {
        let candidates = vec![("a".to_string(), meta(&[], &[], 0))];
        let requested = vec!["-default".to_string(), "custom".to_string()];
        let url = Url::new("test");
        let resolved = resolve_order(&candidates, &requested, "", &url);
        assert_eq!(resolved, vec!["custom".to_string()]);
    }

    #[test]
    fn minus_name_excludes_a_specific_default() {
        let candidates = vec![
            ("a".to_string(), meta(&[], &[], 0)),
            ("b".to_string(), meta(&[], &[], 1)),
        ];
        let requested = vec!["-a".to_string()];
        let url = Url::new("test");
        let resolved = resolve_order(&candidates, &requested, "", &url);
        assert_eq!(resolved, vec!["b".to_string()]);
    }
}
