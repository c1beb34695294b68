//! Batch compilation front end.
//!
//! The `Compiler` holds a set of [`CompilerOptions`] and turns single rules
//! or whole collections into SQL. Collection compilation never stops at the
//! first bad rule: failures are reported next to the queries that did
//! compile, so a periodic caller can log them and carry on.

use coriolis_parser::{SigmaCollection, SigmaRule};

use crate::compiler::{CompilerOptions, compile_rule_with};
use crate::error::Result;
use crate::result::{CompileReport, CompiledQuery, RuleFailure};

/// Rule-to-SQL compiler with fixed options.
///
/// Stateless between calls, so one instance can be shared freely.
///
/// # Example
///
/// ```rust
/// use coriolis_parser::parse_sigma_yaml;
/// use coriolis_sql::Compiler;
///
/// let yaml = r#"
/// title: Test Rule
/// logsource:
///     category: test_category
/// detection:
///     condition: selection
///     selection:
///         EventID: 1234
/// "#;
///
/// let collection = parse_sigma_yaml(yaml).unwrap();
/// let report = Compiler::new().compile_collection(&collection);
/// assert!(report.is_clean());
/// assert_eq!(
///     report.queries[0].sql,
///     "SELECT SourceAddress, COUNT(*) FROM events WHERE (selection.EventID = '1234') \
///      GROUP BY SourceAddress HAVING COUNT(*) > selection"
/// );
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct Compiler {
    options: CompilerOptions,
}

impl Compiler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: CompilerOptions) -> Self {
        Compiler { options }
    }

    pub fn options(&self) -> &CompilerOptions {
        &self.options
    }

    /// Compile a single rule into its SQL text.
    pub fn compile(&self, rule: &SigmaRule) -> Result<String> {
        compile_rule_with(rule, &self.options)
    }

    /// Compile a single rule, keeping its identity next to the SQL.
    pub fn compile_query(&self, rule: &SigmaRule) -> Result<CompiledQuery> {
        Ok(CompiledQuery {
            rule_title: rule.title.clone(),
            rule_id: rule.id.clone(),
            sql: self.compile(rule)?,
        })
    }

    /// Compile every rule of a collection, in collection order.
    pub fn compile_collection(&self, collection: &SigmaCollection) -> CompileReport {
        let mut report = CompileReport::default();
        for rule in &collection.rules {
            match self.compile_query(rule) {
                Ok(query) => report.queries.push(query),
                Err(error) => {
                    log::warn!("failed to compile rule '{}': {error}", rule.title);
                    report.failures.push(RuleFailure {
                        rule_title: rule.title.clone(),
                        error,
                    });
                }
            }
        }
        report
    }
}
