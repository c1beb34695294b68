//! Compilation error types.

use thiserror::Error;

/// Errors that can occur while compiling a rule into SQL.
///
/// No partial query is ever produced alongside an error.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CompileError {
    /// The detection's condition string is empty.
    #[error("detection condition is empty")]
    EmptyCondition,

    /// A search value could not be turned into a predicate.
    ///
    /// `key` is the full dotted path of the offending value, e.g.
    /// `selection.Image`.
    #[error("failed to generate conditions for key '{key}': {reason}")]
    PredicateGenerationFailed { key: String, reason: String },
}

/// Convenience result type.
pub type Result<T> = std::result::Result<T, CompileError>;
