use serde::Serialize;

use crate::error::CompileError;

/// A query generated for one rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CompiledQuery {
    /// Title of the rule the query was generated from.
    pub rule_title: String,
    /// ID of the rule (if present).
    pub rule_id: Option<String>,
    /// The generated SQL text. Not escaped; see the crate docs.
    pub sql: String,
}

/// A rule that failed to compile.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleFailure {
    pub rule_title: String,
    pub error: CompileError,
}

/// Outcome of compiling a whole collection: one bad rule never hides the
/// queries of the others.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CompileReport {
    pub queries: Vec<CompiledQuery>,
    pub failures: Vec<RuleFailure>,
}

impl CompileReport {
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }
}
