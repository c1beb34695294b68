//! Compile parsed Sigma rules into SQL aggregation queries.
//!
//! A rule becomes a query of one fixed shape:
//!
//! ```text
//! SELECT SourceAddress, COUNT(*) FROM events WHERE <predicate> GROUP BY SourceAddress HAVING COUNT(*) > <threshold>
//! ```
//!
//! The predicate is folded from the detection's named searches:
//! scalars become equality tests, sequences become `OR` groups and mappings
//! become `AND` groups over dotted sub-field paths. Keys are visited in
//! lexicographic order, so the same rule always yields the same text.
//!
//! Values are interpolated verbatim between single quotes. Nothing is
//! escaped or parameterized.

use std::collections::BTreeMap;
use std::convert::Infallible;

use serde::{Deserialize, Serialize};

use coriolis_parser::{Scalar, SearchValue, SigmaRule, TIMEFRAME_KEY};

use crate::condition::build_having;
use crate::error::{CompileError, Result};

// =============================================================================
// Options
// =============================================================================

/// How the reserved `timeframe` detection key is treated.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimeframePolicy {
    /// Only the time-window predicate is emitted for `timeframe`.
    #[default]
    Exclude,
    /// `timeframe` is also translated like an ordinary search, producing a
    /// `timeframe = '<value>'` equality ahead of the time-window predicate.
    /// Matches the output of earlier releases.
    FoldIntoWhere,
}

/// Which leaf values are accepted by the predicate translator.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LeafPolicy {
    /// Every scalar is rendered through its string form (null as `null`).
    #[default]
    Permissive,
    /// Null leaves are rejected with
    /// [`CompileError::PredicateGenerationFailed`].
    Strict,
}

/// Knobs for a compilation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompilerOptions {
    pub timeframe: TimeframePolicy,
    pub leaves: LeafPolicy,
}

// =============================================================================
// Public API
// =============================================================================

/// Compile a rule with default options.
pub fn compile_rule(rule: &SigmaRule) -> Result<String> {
    compile_rule_with(rule, &CompilerOptions::default())
}

/// Compile a rule into its SQL query text.
pub fn compile_rule_with(rule: &SigmaRule, options: &CompilerOptions) -> Result<String> {
    let detection = &rule.detection;

    let mut where_clause = build_where(&detection.searches, options)?;
    if let Some(timeframe) = detection.timeframe() {
        where_clause = append_timeframe(&where_clause, timeframe);
    }

    let having_clause = build_having(&detection.condition)?;

    let sql = assemble_query(&where_clause, &having_clause);
    log::debug!("generated SQL query for rule '{}'", rule.title);
    Ok(sql)
}

/// Fold every named search into one `AND`-joined predicate.
///
/// Errors carry the full dotted path of the value that could not be
/// translated.
pub fn build_where(
    searches: &BTreeMap<String, SearchValue>,
    options: &CompilerOptions,
) -> Result<String> {
    let mut clauses = Vec::with_capacity(searches.len());
    for (key, value) in searches {
        if key == TIMEFRAME_KEY && options.timeframe == TimeframePolicy::Exclude {
            continue;
        }
        clauses.push(try_translate(key, value, options.leaves)?);
    }
    Ok(clauses.join(" AND "))
}

/// Append the relative time-window predicate for `timeframe`.
///
/// The value is not validated; whatever it renders to ends up inside the
/// interval literal.
pub fn append_timeframe(where_clause: &str, timeframe: &SearchValue) -> String {
    let window = format!("timestamp >= now() - interval '{timeframe}'");
    if where_clause.is_empty() {
        window
    } else {
        format!("{where_clause} AND {window}")
    }
}

/// Format the final query. An empty predicate becomes `1 = 1`.
pub fn assemble_query(where_clause: &str, having_clause: &str) -> String {
    let where_clause = if where_clause.is_empty() {
        "1 = 1"
    } else {
        where_clause
    };
    format!(
        "SELECT SourceAddress, COUNT(*) FROM events WHERE {where_clause} GROUP BY SourceAddress HAVING COUNT(*) > {having_clause}"
    )
}

/// Translate one `(key, value)` pair into a predicate, accepting every leaf.
pub fn translate(key: &str, value: &SearchValue) -> String {
    let Ok(sql) = fold_predicate(key, value, &|k, s| Ok::<_, Infallible>(equality(k, s)));
    sql
}

/// Translate one `(key, value)` pair under the given leaf policy.
pub fn try_translate(key: &str, value: &SearchValue, leaves: LeafPolicy) -> Result<String> {
    fold_predicate(key, value, &|k, s| match (leaves, s) {
        (LeafPolicy::Strict, Scalar::Null) => Err(CompileError::PredicateGenerationFailed {
            key: k.to_string(),
            reason: "null is not a permitted value".to_string(),
        }),
        _ => Ok(equality(k, s)),
    })
}

// =============================================================================
// Predicate folding
// =============================================================================

fn fold_predicate<F, E>(key: &str, value: &SearchValue, leaf: &F) -> std::result::Result<String, E>
where
    F: Fn(&str, &Scalar) -> std::result::Result<String, E>,
{
    match value {
        SearchValue::Scalar(s) => leaf(key, s),
        SearchValue::Sequence(items) => {
            let parts = items
                .iter()
                .map(|item| fold_predicate(key, item, leaf))
                .collect::<std::result::Result<Vec<_>, E>>()?;
            Ok(format!("({})", parts.join(" OR ")))
        }
        SearchValue::Mapping(fields) => {
            let parts = fields
                .iter()
                .map(|(sub_key, sub_value)| fold_predicate(&format!("{key}.{sub_key}"), sub_value, leaf))
                .collect::<std::result::Result<Vec<_>, E>>()?;
            Ok(format!("({})", parts.join(" AND ")))
        }
    }
}

fn equality(key: &str, value: &Scalar) -> String {
    format!("{key} = '{value}'")
}

// =============================================================================
// Tests
// =============================================================================


// =============================================================================
// Property-based tests
// =============================================================================
