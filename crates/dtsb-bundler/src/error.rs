//! Bundling failures.

use dtsb_common::TextEditError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum BundleError {
    #[error("entry point `{path}` is not part of the program")]
    EntryNotFound { path: String },

    #[error("namespace `{namespace}` is referenced without a property access")]
    NamespaceWithoutProperty { namespace: String },

    #[error("`{name}` is an unnamed default export and cannot be referenced by name")]
    UnnamedDefault { name: String },

    #[error("symbol `{name}` does not have any declaration")]
    NoDeclarations { name: String },

    #[error("cannot resolve module `{specifier}`")]
    UnresolvedModule { specifier: String },

    #[error("`{name}` is not an alias and does not come from the expected module")]
    NotAnAlias { name: String },

    #[error("cannot find the import that brings `{name}` into scope")]
    ImportNotFound { name: String },

    #[error("unsupported import kind `{kind}` for `{name}`")]
    UnsupportedImportKind { name: String, kind: &'static str },

    #[error("`{name}` is imported as a whole namespace and cannot be declared")]
    WholeNamespaceExport { name: String },

    #[error("invalid modifiers on `{name}`: {reason}")]
    InvalidModifier { name: String, reason: &'static str },

    #[error("rewriting `{name}` failed: {source}")]
    TextMismatch {
        name: String,
        #[source]
        source: TextEditError,
    },

    #[error("rewriting `{name}` produced overlapping edits: {source}")]
    OverlappingEdits {
        name: String,
        #[source]
        source: TextEditError,
    },
}

impl BundleError {
    /// Attach the declaration name to a failed splice.
    pub(crate) fn from_edit(name: &str, source: TextEditError) -> BundleError {
        let name = name.to_string();
        match source {
            TextEditError::Overlap { .. } => BundleError::OverlappingEdits { name, source },
            TextEditError::Mismatch { .. } | TextEditError::OutOfBounds { .. } => {
                BundleError::TextMismatch { name, source }
            }
        }
    }
}
