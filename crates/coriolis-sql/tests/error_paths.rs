mod helpers;

use coriolis_parser::parse_sigma_yaml;
use coriolis_sql::{CompileError, Compiler, CompilerOptions, LeafPolicy};
use helpers::*;

#[test]
fn empty_condition_is_reported() {
    let yaml = r#"
title: Empty Condition
detection:
    selection:
        EventID: 1
    condition: ''
"#;
    let err = compile_yaml(yaml).unwrap_err();
    assert_eq!(err, CompileError::EmptyCondition);
    assert_eq!(err.to_string(), "detection condition is empty");
}

#[test]
fn missing_condition_is_reported_as_empty() {
    let yaml = r#"
title: No Condition
detection:
    selection:
        EventID: 1
"#;
    assert_eq!(compile_yaml(yaml).unwrap_err(), CompileError::EmptyCondition);
}

#[test]
fn null_leaf_is_rejected_in_strict_mode() {
    let yaml = r#"
title: Null Leaf
detection:
    selection:
        Parent:
            Image: ~
    condition: selection
"#;
    let strict = CompilerOptions {
        leaves: LeafPolicy::Strict,
        ..Default::default()
    };
    let err = compile_yaml_with(yaml, strict).unwrap_err();
    assert!(
        matches!(err, CompileError::PredicateGenerationFailed { ref key, .. } if key == "selection.Parent.Image"),
        "expected PredicateGenerationFailed for selection.Parent.Image, got: {err}"
    );

    // permissive mode renders it instead
    let sql = compile_yaml(yaml).unwrap();
    assert_eq!(where_clause(&sql), "((selection.Parent.Image = 'null'))");
}

#[test]
fn null_inside_list_is_rejected_in_strict_mode() {
    let yaml = r#"
title: Null In List
detection:
    selection:
        User:
            - admin
            - null
    condition: selection
"#;
    let strict = CompilerOptions {
        leaves: LeafPolicy::Strict,
        ..Default::default()
    };
    let err = compile_yaml_with(yaml, strict).unwrap_err();
    assert!(
        matches!(err, CompileError::PredicateGenerationFailed { ref key, .. } if key == "selection.User"),
        "got: {err}"
    );
}

#[test]
fn empty_list_is_characterized_not_rejected() {
    let yaml = r#"
title: Empty List
detection:
    selection:
        EventID: []
    condition: selection
"#;
    let sql = compile_yaml(yaml).unwrap();
    assert_eq!(where_clause(&sql), "(())");
}

#[test]
fn one_bad_rule_does_not_hide_the_rest() {
    let yaml = r#"
title: Bad
detection:
    selection:
        EventID: 1
    condition: ''
---
title: Good
detection:
    selection:
        EventID: 2
    condition: selection
"#;
    let collection = parse_sigma_yaml(yaml).unwrap();
    let report = Compiler::new().compile_collection(&collection);
    assert_eq!(report.queries.len(), 1);
    assert_eq!(report.queries[0].rule_title, "Good");
    assert_eq!(report.failures.len(), 1);
    assert_eq!(report.failures[0].rule_title, "Bad");
    assert_eq!(report.failures[0].error, CompileError::EmptyCondition);
}
