mod helpers;

use std::collections::BTreeSet;

use coriolis_parser::parse_sigma_yaml;
use coriolis_sql::{Compiler, CompilerOptions, TimeframePolicy};
use helpers::*;

#[test]
fn single_selection_compiles_to_exact_query() {
    let yaml = r#"
title: Test Rule
logsource:
    category: test_category
detection:
    condition: selection
    selection:
        EventID: 1234
"#;
    assert_eq!(
        compile_yaml(yaml).unwrap(),
        "SELECT SourceAddress, COUNT(*) FROM events WHERE (selection.EventID = '1234') GROUP BY SourceAddress HAVING COUNT(*) > selection"
    );
}

#[test]
fn multi_entry_mapping_predicate_is_a_set_of_fragments() {
    let yaml = r#"
title: Process Creation
logsource:
    category: process_creation
    product: windows
detection:
    selection:
        Image: cmd.exe
        ParentImage: explorer.exe
        User: admin
    condition: selection
"#;
    let sql = compile_yaml(yaml).unwrap();
    let predicate = where_clause(&sql);
    let inner = predicate
        .strip_prefix('(')
        .and_then(|p| p.strip_suffix(')'))
        .unwrap();
    let fragments: BTreeSet<&str> = inner.split(" AND ").collect();
    let expected: BTreeSet<&str> = [
        "selection.Image = 'cmd.exe'",
        "selection.ParentImage = 'explorer.exe'",
        "selection.User = 'admin'",
    ]
    .into_iter()
    .collect();
    assert_eq!(fragments, expected);

    // keys are sorted, so the exact text is stable as well
    assert_eq!(
        predicate,
        "(selection.Image = 'cmd.exe' AND selection.ParentImage = 'explorer.exe' AND selection.User = 'admin')"
    );
}

#[test]
fn lists_become_or_groups_inside_and_groups() {
    let yaml = r#"
title: Lists
detection:
    selection:
        EventID:
            - 4624
            - 4625
        LogonType: 3
    condition: selection
"#;
    let sql = compile_yaml(yaml).unwrap();
    assert_eq!(
        where_clause(&sql),
        "((selection.EventID = '4624' OR selection.EventID = '4625') AND selection.LogonType = '3')"
    );
}

#[test]
fn keyword_list_search() {
    let yaml = r#"
title: Keywords
detection:
    keywords:
        - mimikatz
        - sekurlsa
    condition: keywords
"#;
    let sql = compile_yaml(yaml).unwrap();
    assert_eq!(
        where_clause(&sql),
        "(keywords = 'mimikatz' OR keywords = 'sekurlsa')"
    );
}

#[test]
fn several_searches_are_and_joined_in_name_order() {
    let yaml = r#"
title: Selection And Filter
detection:
    selection:
        EventID: 4625
    filter:
        User: SYSTEM
    condition: selection and not filter
"#;
    let sql = compile_yaml(yaml).unwrap();
    assert_eq!(
        where_clause(&sql),
        "(filter.User = 'SYSTEM') AND (selection.EventID = '4625')"
    );
    // unsupported condition syntax passes through untouched
    assert_eq!(having_clause(&sql), "selection and not filter");
}

#[test]
fn count_by_threshold_with_timeframe() {
    let yaml = r#"
title: Brute Force
logsource:
    category: authentication
detection:
    selection:
        EventID: 4625
    timeframe: 24h
    condition: count() by SourceAddress > 5
"#;
    let sql = compile_yaml(yaml).unwrap();
    assert_eq!(
        where_clause(&sql),
        "(selection.EventID = '4625') AND timestamp >= now() - interval '24h'"
    );
    assert_eq!(having_clause(&sql), "SourceAddress > 5");
    assert_eq!(sql.matches("interval '24h'").count(), 1);
}

#[test]
fn timeframe_fold_policy_reproduces_equality_predicate() {
    let yaml = r#"
title: Brute Force
detection:
    selection:
        EventID: 4625
    timeframe: 24h
    condition: count() by SourceAddress > 5
"#;
    let options = CompilerOptions {
        timeframe: TimeframePolicy::FoldIntoWhere,
        ..Default::default()
    };
    let sql = compile_yaml_with(yaml, options).unwrap();
    assert_eq!(
        where_clause(&sql),
        "(selection.EventID = '4625') AND timeframe = '24h' AND timestamp >= now() - interval '24h'"
    );
}

#[test]
fn malformed_timeframe_propagates_verbatim() {
    let yaml = r#"
title: Odd Window
detection:
    selection:
        EventID: 1
    timeframe: sometime
    condition: selection
"#;
    let sql = compile_yaml(yaml).unwrap();
    assert!(sql.contains("timestamp >= now() - interval 'sometime'"));
}

#[test]
fn quotes_in_values_are_not_escaped() {
    let yaml = r#"
title: Quote
detection:
    selection:
        User: "x' OR '1'='1"
    condition: selection
"#;
    let sql = compile_yaml(yaml).unwrap();
    assert_eq!(where_clause(&sql), "(selection.User = 'x' OR '1'='1')");
}

#[test]
fn repeated_compilation_is_identical() {
    let yaml = r#"
title: Many Fields
detection:
    selection:
        Zeta: 1
        Alpha: 2
        Mid:
            Inner: a
            Another: [b, c]
    filter_b:
        X: 1
    filter_a:
        Y: 2
    condition: selection
"#;
    let rule = rule_from_yaml(yaml);
    let compiler = Compiler::new();
    let first = compiler.compile(&rule).unwrap();
    for _ in 0..10 {
        assert_eq!(compiler.compile(&rule).unwrap(), first);
    }
    // decoding again (fresh maps) does not change the output either
    assert_eq!(compile_yaml(yaml).unwrap(), first);
}

#[test]
fn collection_compiles_each_document() {
    let yaml = r#"
title: First
detection:
    selection:
        EventID: 1
    condition: selection
---
title: Second
detection:
    selection:
        EventID: 2
    condition: count() by SourceAddress > 1
"#;
    let collection = parse_sigma_yaml(yaml).unwrap();
    let report = Compiler::new().compile_collection(&collection);
    assert!(report.is_clean());
    let titles: Vec<&str> = report.queries.iter().map(|q| q.rule_title.as_str()).collect();
    assert_eq!(titles, vec!["First", "Second"]);
    assert!(report.queries[1].sql.ends_with("HAVING COUNT(*) > SourceAddress > 1"));
}
