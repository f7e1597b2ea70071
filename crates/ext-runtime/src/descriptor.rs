//! Descriptor Parser.
//!
//! Parses a single line of a plugin descriptor file into an optional list of
//! names and an implementation id: `#` starts a line-comment, the line is
//! trimmed, and the remainder is either `lhs = rhs` (one or more
//! comma-separated names on the left) or a bare implementation id (names are
//! then derived elsewhere from the impl-id).

/// One parsed, non-empty descriptor line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DescriptorLine {
    /// Explicit names from the left-hand side, in declaration order (first is
    /// primary). Empty when the line had no `name =` part.
    pub names: Vec<String>,
    /// The fully-qualified implementation id from the right-hand side.
    pub impl_id: String,
}

/// Strips a `#`-introduced comment and surrounding whitespace from `raw`.
///
/// Returns `None` for a line that is blank after stripping (nothing to parse).
pub fn strip_comment(raw: &str) -> Option<&str> {
    let without_comment = match raw.find('#') {
        Some(idx) => &raw[..idx],
        None => raw,
    };
    let trimmed = without_comment.trim();
    if trimmed.is_empty() { None } else { Some(trimmed) }
}

/// Parses one trimmed, comment-free descriptor line.
///
/// `name = id` (names comma-separated) or a bare `id`. Returns `Err` with a
/// human-readable reason for a malformed line (e.g. `name =` with nothing
/// after the `=`, or multiple `=` signs).
pub fn parse_line(trimmed: &str) -> Result<DescriptorLine, String> {
    match trimmed.split_once('=') {
        Some((lhs, rhs)) => {
            let impl_id = rhs.trim();
            if impl_id.is_empty() {
                return Err("empty implementation id after '='".to_string());
            }
            let names: Vec<String> = lhs
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect();
            if names.is_empty() {
                return Err("empty name list before '='".to_string());
            }
            Ok(DescriptorLine {
                names,
                impl_id: impl_id.to_string(),
            })
        }
        None => Ok(DescriptorLine {
            names: Vec::new(),
            impl_id: trimmed.to_string(),
        }),
    }
}

/// Parses every non-blank, comment-stripped line of `text`, pairing each
/// result with its 1-based line number for diagnostics.
///
/// Never fails as a whole: a malformed line is reported in the returned `Err`
/// slot for that line's position so the caller (the scanner) can record a
/// per-line diagnostic and keep going instead of aborting the whole file.
pub fn parse_descriptor(text: &str) -> Vec<(usize, Result<DescriptorLine, String>)> {
    text.lines()
        .enumerate()
        .filter_map(|(idx, raw)| strip_comment(raw).map(|line| (idx + 1, parse_line(line))))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_full_line_comments_and_blanks() {
        assert_eq!(strip_comment("# just a comment"), None);
        assert_eq!(strip_comment("   "), None);
        assert_eq!(strip_comment("en=foo::EnGreeter # trailing"), Some("en=foo::EnGreeter"));
    }

    #[test]
    fn parses_named_and_bare_lines() {
        assert_eq!(
            parse_line("en = foo::EnGreeter").unwrap(),
            DescriptorLine { names: vec!["en".into()], impl_id: "foo::EnGreeter".into() }
        );
        assert_eq!(
            parse_line("foo::EnGreeter").unwrap(),
            DescriptorLine { names: vec![], impl_id: "foo::EnGreeter".into() }
        );
    }

    #[test]
    fn parses_comma_separated_aliases_with_primary_first() {
        let parsed = parse_line("en, english = foo::EnGreeter").unwrap();
        assert_eq!(parsed.names, vec!["en".to_string(), "english".to_string()]);
    }

    #[test]
    fn rejects_empty_sides() {
        assert!(parse_line("en =").is_err());
        assert!(parse_line(" = foo::EnGreeter").is_err());
    }

    #[test]
    fn parse_descriptor_recovers_from_bad_lines() {
        let text = "en = foo::EnGreeter\nbroken =\nfr = foo::FrGreeter\n";
        let lines = parse_descriptor(text);
        assert_eq!(lines.len(), 3);
        assert!(lines[0].1.is_ok());
        assert!(lines[1].1.is_err());
        assert!(lines[2].1.is_ok());
    }
}
