//! Error kinds for the Extension Runtime.

use thiserror::Error;

/// Errors surfaced by the core's public operations.
///
/// Variants are ordered by rising severity, matching the taxonomy the runtime
/// is built against: a bad argument is a [`ExtensionError::Usage`] error, a
/// missing name is [`ExtensionError::NoSuchExtension`], and so on up to the
/// sticky [`ExtensionError::AdaptiveBuild`] failure.
///
/// The enum derives `Clone` so an [`ExtensionError::AdaptiveBuild`] can be
/// cached once and handed back verbatim on every subsequent
/// [`get_adaptive`](crate) call without re-running (and re-failing) synthesis.
#[derive(Debug, Clone, Error)]
pub enum ExtensionError {
    /// Bad argument to a public operation: blank name, non-extension contract, etc.
    #[error("usage error: {0}")]
    Usage(String),

    /// The requested name resolves to no registered class.
    #[error("no such extension '{name}' for contract '{contract}'{}", format_causes(causes))]
    NoSuchExtension {
        /// Contract (extension point) name.
        contract: &'static str,
        /// Requested name.
        name: String,
        /// Captured per-line diagnostics that could explain the absence.
        causes: Vec<String>,
    },

    /// Two different classes compete for the contract's single adaptive slot.
    #[error("duplicate adaptive class for contract '{contract}': '{first}' and '{second}'")]
    DuplicateAdaptive {
        /// Contract name.
        contract: &'static str,
        /// impl-id of the class that won the slot first.
        first: &'static str,
        /// impl-id of the conflicting class.
        second: &'static str,
    },

    /// Two different classes compete for the same registered name.
    #[error("name conflict for '{name}' in contract '{contract}': '{first}' and '{second}'")]
    DuplicateName {
        /// Contract name.
        contract: &'static str,
        /// Conflicting name.
        name: String,
        /// impl-id already holding the name.
        first: &'static str,
        /// impl-id attempting to claim the same name.
        second: &'static str,
    },

    /// A single setter's injection failed; logged, never propagated to callers.
    #[error("injection failed for attribute '{attribute}': {reason}")]
    Injection {
        /// Attribute name derived from the setter.
        attribute: String,
        /// Human-readable cause.
        reason: String,
    },

    /// Instantiation, required-collaborator injection, or wrapper application failed.
    #[error("failed to construct '{name}' ({class}) for contract '{contract}': {reason}")]
    Construction {
        /// Contract name.
        contract: &'static str,
        /// Requested name.
        name: String,
        /// impl-id of the class that failed to construct.
        class: &'static str,
        /// Human-readable cause.
        reason: String,
    },

    /// Synthesis of the adaptive proxy failed. Sticky: cached and re-raised.
    #[error("failed to build the adaptive extension for '{contract}': {reason}")]
    AdaptiveBuild {
        /// Contract name.
        contract: &'static str,
        /// Human-readable cause.
        reason: String,
    },

    /// One descriptor line failed to parse or resolve; the scan continues.
    #[error("descriptor error in '{resource}' line {line:?}: {reason}")]
    Descriptor {
        /// Resource path the line came from.
        resource: String,
        /// Raw line content (for diagnostics, not reparsed).
        line: String,
        /// Human-readable cause.
        reason: String,
    },

    /// An adaptive operation has no `#[adaptive]` annotation; always fails at call time.
    #[error("operation '{operation}' on contract '{contract}' is not adaptive")]
    Unsupported {
        /// Contract name.
        contract: &'static str,
        /// Operation name.
        operation: &'static str,
    },
}

fn format_causes(causes: &[String]) -> String {
    if causes.is_empty() {
        String::new()
    } else {
        format!(" (causes: {})", causes.join("; "))
    }
}

/// Convenience alias used throughout the core.
pub type ExtensionResult<T> = Result<T, ExtensionError>;
