//! YAML → rule model decoder.
//!
//! Handles:
//! - Single-document YAML (one rule)
//! - Multi-document YAML (`---` separator), collecting per-document errors
//! - Detection section decoding into condition + named search trees
//! - Directory-based rule collection loading

use std::path::Path;

use serde::Deserialize;
use serde_yaml::Value;

use crate::ast::*;
use crate::error::{Result, SigmaParserError};
use crate::value::{Scalar, SearchValue};

// =============================================================================
// Public API
// =============================================================================

/// Parse a YAML string containing one or more rule documents.
///
/// Documents that fail to decode are skipped and reported in
/// [`SigmaCollection::errors`]; only a failure to split the input into
/// documents at all would be fatal, and that is also collected.
pub fn parse_sigma_yaml(yaml: &str) -> Result<SigmaCollection> {
    let mut collection = SigmaCollection::new();

    for doc in serde_yaml::Deserializer::from_str(yaml) {
        let value: Value = match Value::deserialize(doc) {
            Ok(v) => v,
            Err(e) => {
                collection.errors.push(format!("YAML parse error: {e}"));
                continue;
            }
        };

        // Empty documents, e.g. a trailing `---`
        if value.is_null() {
            continue;
        }

        match parse_detection_rule(&value) {
            Ok(rule) => {
                log::info!("parsed Sigma rule: {}", rule.title);
                collection.rules.push(rule);
            }
            Err(e) => {
                log::warn!("skipping rule document: {e}");
                collection.errors.push(e.to_string());
            }
        }
    }

    Ok(collection)
}

/// Parse exactly one rule from a single-document YAML string.
pub fn parse_sigma_rule(yaml: &str) -> Result<SigmaRule> {
    let value: Value = serde_yaml::from_str(yaml)?;
    let rule = parse_detection_rule(&value)?;
    log::info!("parsed Sigma rule: {}", rule.title);
    Ok(rule)
}

/// Parse a single rule file from a path.
pub fn parse_sigma_file(path: &Path) -> Result<SigmaCollection> {
    let content = std::fs::read_to_string(path)?;
    parse_sigma_yaml(&content)
}

/// Parse all rule files (`.yml` / `.yaml`) from a directory, recursively.
///
/// Files are visited in sorted path order so repeated loads yield rules in
/// the same order.
pub fn parse_sigma_directory(dir: &Path) -> Result<SigmaCollection> {
    let mut collection = SigmaCollection::new();

    fn walk(dir: &Path, collection: &mut SigmaCollection) -> Result<()> {
        let mut entries = std::fs::read_dir(dir)?
            .map(|entry| entry.map(|e| e.path()))
            .collect::<std::io::Result<Vec<_>>>()?;
        entries.sort();

        for path in entries {
            if path.is_dir() {
                walk(&path, collection)?;
            } else if matches!(
                path.extension().and_then(|e| e.to_str()),
                Some("yml" | "yaml")
            ) {
                match parse_sigma_file(&path) {
                    Ok(sub) => {
                        collection.rules.extend(sub.rules);
                        collection
                            .errors
                            .extend(sub.errors.into_iter().map(|e| format!("{}: {e}", path.display())));
                    }
                    Err(e) => {
                        collection.errors.push(format!("{}: {e}", path.display()));
                    }
                }
            }
        }
        Ok(())
    }

    walk(dir, &mut collection)?;
    Ok(collection)
}

// =============================================================================
// Detection Rule Parsing
// =============================================================================

fn parse_detection_rule(value: &Value) -> Result<SigmaRule> {
    let m = value
        .as_mapping()
        .ok_or_else(|| SigmaParserError::InvalidRule("Document is not a YAML mapping".into()))?;

    let title = get_str(m, "title")
        .ok_or_else(|| SigmaParserError::MissingField("title".into()))?
        .to_string();

    let detection_val = m
        .get(val_key("detection"))
        .ok_or_else(|| SigmaParserError::MissingField("detection".into()))?;
    let detection = parse_detection(detection_val)?;

    let logsource = m
        .get(val_key("logsource"))
        .map(parse_logsource)
        .transpose()?
        .unwrap_or_default();

    Ok(SigmaRule {
        title,
        logsource,
        detection,
        id: get_str(m, "id").map(|s| s.to_string()),
        related: parse_related(m.get(val_key("related"))),
        status: get_str(m, "status").and_then(|s| s.parse().ok()),
        description: get_str(m, "description").map(|s| s.to_string()),
        license: get_str(m, "license").map(|s| s.to_string()),
        author: get_str(m, "author").map(|s| s.to_string()),
        references: get_str_list(m, "references"),
        date: get_str(m, "date").map(|s| s.to_string()),
        modified: get_str(m, "modified").map(|s| s.to_string()),
        fields: get_str_list(m, "fields"),
        falsepositives: get_str_or_str_list(m, "falsepositives"),
        level: get_str(m, "level").and_then(|s| s.parse().ok()),
        tags: get_str_list(m, "tags"),
    })
}

// =============================================================================
// Detection Section Parsing
// =============================================================================

/// Parse the `detection:` section of a rule.
///
/// `condition` is taken as a string; every other key becomes a named search.
/// A missing or null condition decodes as the empty string so the compiler
/// can report it as an empty condition.
fn parse_detection(value: &Value) -> Result<Detection> {
    let m = value.as_mapping().ok_or_else(|| {
        SigmaParserError::InvalidDetection("Detection section must be a mapping".into())
    })?;

    let condition = match m.get(val_key("condition")) {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(v @ (Value::Number(_) | Value::Bool(_))) => Scalar::from_yaml(v).to_string(),
        Some(_) => {
            return Err(SigmaParserError::InvalidDetection(
                "condition must be a string".into(),
            ));
        }
    };

    let mut detection = Detection::new(condition);
    for (key, val) in m {
        let name = match key {
            Value::String(s) => s.clone(),
            other => Scalar::from_yaml(other).to_string(),
        };
        if name == "condition" {
            continue;
        }
        detection.searches.insert(name, SearchValue::from_yaml(val));
    }

    Ok(detection)
}

// =============================================================================
// Log Source Parsing
// =============================================================================

fn parse_logsource(value: &Value) -> Result<LogSource> {
    let m = value
        .as_mapping()
        .ok_or_else(|| SigmaParserError::InvalidRule("logsource must be a mapping".into()))?;

    Ok(LogSource {
        category: get_str(m, "category").map(|s| s.to_string()),
        product: get_str(m, "product").map(|s| s.to_string()),
        service: get_str(m, "service").map(|s| s.to_string()),
    })
}

fn parse_related(value: Option<&Value>) -> Vec<Related> {
    let Some(Value::Sequence(seq)) = value else {
        return Vec::new();
    };

    seq.iter()
        .filter_map(|item| {
            let m = item.as_mapping()?;
            let id = get_str(m, "id")?.to_string();
            let relation_type = get_str(m, "type")?.parse().ok()?;
            Some(Related { id, relation_type })
        })
        .collect()
}

// =============================================================================
// Helpers
// =============================================================================

fn val_key(s: &str) -> Value {
    Value::String(s.to_string())
}

fn get_str<'a>(m: &'a serde_yaml::Mapping, key: &str) -> Option<&'a str> {
    m.get(val_key(key)).and_then(|v| v.as_str())
}

fn get_str_list(m: &serde_yaml::Mapping, key: &str) -> Vec<String> {
    match m.get(val_key(key)) {
        Some(Value::Sequence(seq)) => seq
            .iter()
            .filter_map(|v| v.as_str().map(|s| s.to_string()))
            .collect(),
        _ => Vec::new(),
    }
}

fn get_str_or_str_list(m: &serde_yaml::Mapping, key: &str) -> Vec<String> {
    match m.get(val_key(key)) {
        Some(Value::String(s)) => vec![s.clone()],
        _ => get_str_list(m, key),
    }
}

// =============================================================================
// Tests
// =============================================================================
