use std::collections::BTreeMap;
use std::fmt;
use std::time::Duration;

use serde::Serialize;
use serde_yaml::Value;

use crate::error::{Result, SigmaParserError};

// =============================================================================
// Scalar: leaf values in a search tree
// =============================================================================

/// A leaf value from a detection search.
///
/// Rendering through [`fmt::Display`] gives the value's natural string form,
/// which is what ends up between quotes in generated predicates.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Scalar {
    String(String),
    Integer(i64),
    Float(f64),
    Bool(bool),
    Null,
}

impl Scalar {
    /// Create a scalar from a non-collection YAML value.
    pub fn from_yaml(v: &Value) -> Self {
        match v {
            Value::String(s) => Scalar::String(s.clone()),
            Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Scalar::Integer(i)
                } else if let Some(f) = n.as_f64()
                    && n.is_f64()
                {
                    Scalar::Float(f)
                } else {
                    // u64 beyond i64::MAX: keep the exact digits
                    Scalar::String(n.to_string())
                }
            }
            Value::Bool(b) => Scalar::Bool(*b),
            Value::Null => Scalar::Null,
            Value::Tagged(t) => Scalar::from_yaml(&t.value),
            _ => Scalar::String(format!("{v:?}")),
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Scalar::Null)
    }
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scalar::String(s) => write!(f, "{s}"),
            Scalar::Integer(n) => write!(f, "{n}"),
            Scalar::Float(n) => write!(f, "{n}"),
            Scalar::Bool(b) => write!(f, "{b}"),
            Scalar::Null => write!(f, "null"),
        }
    }
}

// =============================================================================
// SearchValue: the recursive value tree under a search name
// =============================================================================

/// A value tree found under a search name in the detection section.
///
/// - `Scalar` is a single equality test.
/// - `Sequence` is a disjunction of its elements.
/// - `Mapping` is a conjunction over sub-fields; each sub-field name is
///   appended to the parent key with a `.` separator.
///
/// Mapping keys are held in a `BTreeMap` so iteration (and therefore every
/// string derived from the tree) is in lexicographic key order.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum SearchValue {
    Scalar(Scalar),
    Sequence(Vec<SearchValue>),
    Mapping(BTreeMap<String, SearchValue>),
}

impl SearchValue {
    /// Decode a YAML value into a search tree.
    pub fn from_yaml(v: &Value) -> Self {
        match v {
            Value::Sequence(seq) => SearchValue::Sequence(seq.iter().map(Self::from_yaml).collect()),
            Value::Mapping(m) => SearchValue::Mapping(
                m.iter()
                    .map(|(k, v)| (mapping_key(k), Self::from_yaml(v)))
                    .collect(),
            ),
            Value::Tagged(t) => Self::from_yaml(&t.value),
            _ => SearchValue::Scalar(Scalar::from_yaml(v)),
        }
    }

    /// Build a mapping node from `(field, value)` pairs.
    pub fn mapping<K, I>(entries: I) -> Self
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, SearchValue)>,
    {
        SearchValue::Mapping(entries.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }

    /// Build a sequence node.
    pub fn sequence<I>(items: I) -> Self
    where
        I: IntoIterator<Item = SearchValue>,
    {
        SearchValue::Sequence(items.into_iter().collect())
    }

    pub fn as_scalar(&self) -> Option<&Scalar> {
        match self {
            SearchValue::Scalar(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            SearchValue::Scalar(Scalar::String(s)) => Some(s),
            _ => None,
        }
    }
}

/// Mapping keys are usually strings, but YAML allows any scalar
/// (`1234: foo`). Non-string keys use their scalar rendering.
fn mapping_key(k: &Value) -> String {
    match k {
        Value::String(s) => s.clone(),
        other => Scalar::from_yaml(other).to_string(),
    }
}

impl fmt::Display for SearchValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SearchValue::Scalar(s) => write!(f, "{s}"),
            SearchValue::Sequence(items) => {
                let parts: Vec<String> = items.iter().map(|i| i.to_string()).collect();
                write!(f, "[{}]", parts.join(", "))
            }
            SearchValue::Mapping(m) => {
                let parts: Vec<String> = m.iter().map(|(k, v)| format!("{k}: {v}")).collect();
                write!(f, "{{{}}}", parts.join(", "))
            }
        }
    }
}

impl From<Scalar> for SearchValue {
    fn from(s: Scalar) -> Self {
        SearchValue::Scalar(s)
    }
}

impl From<&str> for SearchValue {
    fn from(s: &str) -> Self {
        SearchValue::Scalar(Scalar::String(s.to_string()))
    }
}

impl From<String> for SearchValue {
    fn from(s: String) -> Self {
        SearchValue::Scalar(Scalar::String(s))
    }
}

impl From<i32> for SearchValue {
    fn from(n: i32) -> Self {
        SearchValue::Scalar(Scalar::Integer(i64::from(n)))
    }
}

impl From<i64> for SearchValue {
    fn from(n: i64) -> Self {
        SearchValue::Scalar(Scalar::Integer(n))
    }
}

impl From<f64> for SearchValue {
    fn from(n: f64) -> Self {
        SearchValue::Scalar(Scalar::Float(n))
    }
}

impl From<bool> for SearchValue {
    fn from(b: bool) -> Self {
        SearchValue::Scalar(Scalar::Bool(b))
    }
}

// =============================================================================
// Timespan: duration strings like `24h` or `5m`
// =============================================================================

/// Unit suffix of a [`Timespan`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum TimespanUnit {
    Second,
    Minute,
    Hour,
    Day,
    Week,
    Month,
    Year,
}

impl TimespanUnit {
    fn from_suffix(suffix: char) -> Option<Self> {
        Some(match suffix {
            's' => TimespanUnit::Second,
            'm' => TimespanUnit::Minute,
            'h' => TimespanUnit::Hour,
            'd' => TimespanUnit::Day,
            'w' => TimespanUnit::Week,
            'M' => TimespanUnit::Month,
            'y' => TimespanUnit::Year,
            _ => return None,
        })
    }

    /// Length of one unit in seconds. Months and years use average lengths.
    pub fn seconds(self) -> u64 {
        match self {
            TimespanUnit::Second => 1,
            TimespanUnit::Minute => 60,
            TimespanUnit::Hour => 3_600,
            TimespanUnit::Day => 86_400,
            TimespanUnit::Week => 604_800,
            TimespanUnit::Month => 2_629_746,
            TimespanUnit::Year => 31_556_952,
        }
    }
}

/// A count followed by a unit suffix: `30s`, `5m`, `24h`, `7d`.
///
/// Case matters for the suffix: `m` is minutes, `M` is months.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Timespan {
    pub count: u64,
    pub unit: TimespanUnit,
    /// Total length in seconds.
    pub seconds: u64,
    /// Text as written.
    pub original: String,
}

impl Timespan {
    pub fn parse(s: &str) -> Result<Self> {
        let invalid = || SigmaParserError::InvalidTimespan(s.to_string());

        let mut chars = s.chars();
        let unit = chars
            .next_back()
            .and_then(TimespanUnit::from_suffix)
            .ok_or_else(invalid)?;
        let digits = chars.as_str();
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return Err(invalid());
        }
        let count: u64 = digits.parse().map_err(|_| invalid())?;
        let seconds = count.checked_mul(unit.seconds()).ok_or_else(invalid)?;

        Ok(Timespan {
            count,
            unit,
            seconds,
            original: s.to_string(),
        })
    }

    pub fn as_duration(&self) -> Duration {
        Duration::from_secs(self.seconds)
    }
}

impl std::str::FromStr for Timespan {
    type Err = SigmaParserError;

    fn from_str(s: &str) -> Result<Self> {
        Timespan::parse(s)
    }
}

impl fmt::Display for Timespan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.original)
    }
}
