//! Threshold extraction from a detection's condition string.
//!
//! Only two shapes are recognized:
//! - anything containing `count() by `, whose threshold is the text after
//!   the first occurrence (`count() by SourceAddress > 5` → `SourceAddress > 5`)
//! - anything else, passed through unchanged (`selection` → `selection`)
//!
//! Boolean operators, `1 of`/`all of` selectors and other aggregation
//! functions are not interpreted; they land in the passthrough branch.
//! A bare search name therefore yields `HAVING COUNT(*) > selection`,
//! which is accepted text but not a meaningful threshold.

use std::fmt;

use crate::error::{CompileError, Result};

/// Marker introducing a grouped count in the condition string.
pub const COUNT_BY: &str = "count() by ";

/// The threshold expression derived from a condition string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Threshold<'a> {
    /// Text following `count() by ` (first occurrence, untrimmed).
    CountBy(&'a str),
    /// The whole condition, unchanged.
    Passthrough(&'a str),
}

impl<'a> Threshold<'a> {
    /// Classify a condition string.
    pub fn parse(condition: &'a str) -> Result<Self> {
        if condition.is_empty() {
            return Err(CompileError::EmptyCondition);
        }

        Ok(match condition.split_once(COUNT_BY) {
            Some((_, rest)) => Threshold::CountBy(rest),
            None => Threshold::Passthrough(condition),
        })
    }

    pub fn as_str(&self) -> &'a str {
        match self {
            Threshold::CountBy(s) | Threshold::Passthrough(s) => s,
        }
    }
}

impl fmt::Display for Threshold<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Build the expression placed after `HAVING COUNT(*) > `.
pub fn build_having(condition: &str) -> Result<String> {
    let threshold = Threshold::parse(condition)?;
    if let Threshold::Passthrough(expr) = threshold
        && expr.trim().parse::<f64>().is_err()
    {
        log::debug!("condition '{expr}' is not a numeric threshold; emitting it verbatim");
    }
    Ok(threshold.as_str().to_string())
}
