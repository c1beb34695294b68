#![allow(dead_code)]

use coriolis_parser::{SigmaRule, parse_sigma_rule};
use coriolis_sql::{CompileError, CompilerOptions, compile_rule_with};

pub fn rule_from_yaml(yaml: &str) -> SigmaRule {
    parse_sigma_rule(yaml).unwrap()
}

pub fn compile_yaml(yaml: &str) -> Result<String, CompileError> {
    compile_yaml_with(yaml, CompilerOptions::default())
}

pub fn compile_yaml_with(yaml: &str, options: CompilerOptions) -> Result<String, CompileError> {
    compile_rule_with(&rule_from_yaml(yaml), &options)
}

/// The text between `WHERE ` and ` GROUP BY`.
pub fn where_clause(sql: &str) -> &str {
    let start = sql.find("WHERE ").expect("query has a WHERE clause") + "WHERE ".len();
    let end = sql.find(" GROUP BY").expect("query has a GROUP BY clause");
    &sql[start..end]
}

/// The text after `HAVING COUNT(*) > `.
pub fn having_clause(sql: &str) -> &str {
    let marker = "HAVING COUNT(*) > ";
    let start = sql.find(marker).expect("query has a HAVING clause") + marker.len();
    &sql[start..]
}
