//! # coriolis-sql
//!
//! Compiles Sigma detection rules into SQL aggregation queries.
//!
//! This crate consumes the rule model produced by [`coriolis_parser`] and
//! emits one query per rule, always of the shape
//!
//! ```text
//! SELECT SourceAddress, COUNT(*) FROM events WHERE <predicate> GROUP BY SourceAddress HAVING COUNT(*) > <threshold>
//! ```
//!
//! ## How a rule is translated
//!
//! - **WHERE**: every named search is translated and the results are joined
//!   with `AND`. Scalars become `key = 'value'`, sequences become
//!   parenthesized `OR` groups, mappings become parenthesized `AND` groups
//!   over `parent.child` paths. Keys are visited in sorted order.
//! - **Time window**: a `timeframe` entry (e.g. `24h`) appends
//!   `AND timestamp >= now() - interval '24h'`. See [`TimeframePolicy`] for
//!   whether it also appears as an ordinary equality.
//! - **HAVING**: derived from the condition string by [`condition`]: the
//!   text after `count() by `, or the whole condition otherwise.
//!
//! ## Security
//!
//! Values are interpolated into the query text **without escaping or
//! parameterization**. A value containing a quote changes the meaning of
//! the query. The output is meant for inspection and logging; do not run
//! it against a live datastore with untrusted rules.
//!
//! ## Quick Start
//!
//! ```rust
//! use coriolis_parser::parse_sigma_rule;
//! use coriolis_sql::compile_rule;
//!
//! let yaml = r#"
//! title: Brute Force
//! logsource:
//!     category: auth
//! detection:
//!     selection:
//!         EventID: 4625
//!     timeframe: 24h
//!     condition: count() by SourceAddress > 5
//! "#;
//!
//! let rule = parse_sigma_rule(yaml).unwrap();
//! let sql = compile_rule(&rule).unwrap();
//! assert_eq!(
//!     sql,
//!     "SELECT SourceAddress, COUNT(*) FROM events \
//!      WHERE (selection.EventID = '4625') AND timestamp >= now() - interval '24h' \
//!      GROUP BY SourceAddress HAVING COUNT(*) > SourceAddress > 5"
//! );
//! ```

pub mod compiler;
pub mod condition;
pub mod engine;
pub mod error;
pub mod result;

pub use compiler::{
    CompilerOptions, LeafPolicy, TimeframePolicy, append_timeframe, assemble_query, build_where,
    compile_rule, compile_rule_with, translate, try_translate,
};
pub use condition::{Threshold, build_having};
pub use engine::Compiler;
pub use error::{CompileError, Result};
pub use result::{CompileReport, CompiledQuery, RuleFailure};
