//! Resource Scanner.
//!
//! Walks the configured classpath roots looking for a contract's descriptor
//! file, across the vendor-alias directory variants, and hands each readable
//! file's text to [`crate::descriptor::parse_descriptor`]. Missing files and
//! unreadable files are silent (a contract need not ship a descriptor at
//! all — the compiled-in `linkme` entries already cover it); a file that
//! exists but contains malformed lines produces diagnostics instead of
//! aborting the scan, so one bad manifest never fails the whole directory.

use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::descriptor::parse_descriptor;
use crate::registry::Diagnostic;

/// One line successfully read and parsed from a descriptor file.
pub struct ScannedLine {
    pub resource: String,
    pub names: Vec<String>,
    pub impl_id: String,
}

/// The three `META-INF` roots, in the priority order spec.md §4.2 reads
/// them: internal descriptors first, then the public `dubbo` directory,
/// then the `services`-style fallback.
const META_INF_DIRS: &[&str] = &[
    "META-INF/dubbo/internal",
    "META-INF/dubbo",
    "META-INF/services",
];

/// Vendor alias remap: a root may ship its descriptor under the
/// `org.apache`-flavoured prefix; we fold it onto the canonical `com.alibaba`
/// one rather than supporting two independent search trees.
const VENDOR_ALIASES: &[(&str, &str)] = &[("org.apache", "com.alibaba")];

/// Builds the six candidate descriptor paths for `contract_name` under `root`
/// (three `META-INF` directories, each tried under both the canonical vendor
/// prefix and its alias), in priority order.
pub fn candidate_paths(root: &Path, contract_name: &str) -> Vec<PathBuf> {
    let mut out = Vec::with_capacity(META_INF_DIRS.len() * 2);
    for dir in META_INF_DIRS {
        out.push(root.join(dir).join(contract_name));
        for (canonical, alias) in VENDOR_ALIASES {
            if let Some(rest) = contract_name.strip_prefix(canonical) {
                out.push(root.join(dir).join(format!("{alias}{rest}")));
            }
        }
    }
    out
}

/// Scans every root for `contract_name`'s descriptor, returning the
/// successfully parsed lines (in file-then-line order) and a diagnostic for
/// every unparseable line encountered along the way.
///
/// A root that has no matching file at all (the common case — most
/// contracts rely solely on compiled-in registration) contributes nothing
/// and no diagnostic.
pub fn scan(roots: &[PathBuf], contract_name: &str) -> (Vec<ScannedLine>, Vec<Diagnostic>) {
    let mut lines = Vec::new();
    let mut diagnostics = Vec::new();

    for root in roots {
        for path in candidate_paths(root, contract_name) {
            let text = match std::fs::read_to_string(&path) {
                Ok(text) => text,
                Err(err) if err.kind() == std::io::ErrorKind::NotFound => continue,
                Err(err) => {
                    warn!(path = %path.display(), error = %err, "descriptor file unreadable");
                    diagnostics.push(Diagnostic {
                        resource: path.display().to_string(),
                        line: String::new(),
                        reason: format!("unreadable: {err}"),
                    });
                    continue;
                }
            };
            debug!(path = %path.display(), "scanning descriptor file");
            let resource = path.display().to_string();
            for (lineno, parsed) in parse_descriptor(&text) {
                match parsed {
                    Ok(parsed) => lines.push(ScannedLine {
                        resource: resource.clone(),
                        names: parsed.names,
                        impl_id: parsed.impl_id,
                    }),
                    Err(reason) => diagnostics.push(Diagnostic {
                        resource: resource.clone(),
                        line: lineno.to_string(),
                        reason,
                    }),
                }
            }
        }
    }

    (lines, diagnostics)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn candidate_paths_cover_vendor_alias() {
        let root = Path::new("/classpath");
        let paths = candidate_paths(root, "org.apache.Greeter");
        assert!(paths.contains(&root.join("META-INF/dubbo/internal/org.apache.Greeter")));
        assert!(paths.contains(&root.join("META-INF/dubbo/internal/com.alibaba.Greeter")));
        assert!(paths.contains(&root.join("META-INF/dubbo/org.apache.Greeter")));
        assert!(paths.contains(&root.join("META-INF/services/org.apache.Greeter")));
        assert_eq!(paths.len(), 6);
        // Internal descriptors are consulted before the public `dubbo`
        // directory, which in turn precedes the `services` fallback.
        assert_eq!(
            paths[0],
            root.join("META-INF/dubbo/internal/org.apache.Greeter")
        );
        assert_eq!(paths[4], root.join("META-INF/services/org.apache.Greeter"));
    }

    #[test]
    fn scan_reads_existing_file_and_skips_missing_roots() {
        let dir = tempfile::tempdir().unwrap();
        let ext_dir = dir.path().join("META-INF/dubbo");
        fs::create_dir_all(&ext_dir).unwrap();
        fs::write(ext_dir.join("demo.Greeter"), "en = demo::EnGreeter\nbad =\n").unwrap();

        let missing_root = dir.path().join("does-not-exist");
        let (lines, diagnostics) = scan(&[dir.path().to_path_buf(), missing_root], "demo.Greeter");

        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].impl_id, "demo::EnGreeter");
        assert_eq!(diagnostics.len(), 1);
    }
}
