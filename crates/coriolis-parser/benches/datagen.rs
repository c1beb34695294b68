//! Synthetic rule YAML generators for benchmarks.
//!
//! Output is a pure function of the requested size, so runs are comparable.

const FIELD_NAMES: &[&str] = &[
    "CommandLine",
    "ParentCommandLine",
    "Image",
    "ParentImage",
    "TargetFilename",
    "SourceAddress",
    "DestinationPort",
    "User",
    "EventID",
    "ServiceName",
];

const STRING_VALUES: &[&str] = &[
    "whoami",
    "cmd.exe",
    "powershell.exe",
    "net.exe",
    "mimikatz",
    "lsass.exe",
    "rundll32.exe",
    "certutil.exe",
];

/// One rule with a nested selection, a list and a timeframe.
pub fn gen_rule(i: usize) -> String {
    let field_a = FIELD_NAMES[i % FIELD_NAMES.len()];
    let field_b = FIELD_NAMES[(i + 3) % FIELD_NAMES.len()];
    let value_a = STRING_VALUES[i % STRING_VALUES.len()];
    let value_b = STRING_VALUES[(i + 1) % STRING_VALUES.len()];
    let value_c = STRING_VALUES[(i + 2) % STRING_VALUES.len()];
    format!(
        r#"title: Generated Rule {i}
id: rule-{i}
logsource:
    category: process_creation
    product: windows
detection:
    selection:
        {field_a}: {value_a}
        {field_b}:
            - {value_b}
            - {value_c}
    filter:
        User: SYSTEM
    timeframe: {window}m
    condition: count() by SourceAddress > {threshold}
level: medium
"#,
        window = 5 + i % 55,
        threshold = 1 + i % 10,
    )
}

/// `n` rules as a multi-document YAML string.
pub fn gen_n_rules(n: usize) -> String {
    (0..n).map(gen_rule).collect::<Vec<_>>().join("---\n")
}
