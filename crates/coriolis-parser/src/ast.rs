//! Typed rule model produced by the decoder and consumed by the SQL compiler.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::value::SearchValue;

/// Reserved detection key carrying the aggregation window (e.g. `24h`).
///
/// It lives among the searches in the decoded model; consumers decide
/// whether it is a predicate or a time window.
pub const TIMEFRAME_KEY: &str = "timeframe";

// =============================================================================
// Enumerations
// =============================================================================

/// Rule maturity status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Stable,
    Test,
    Experimental,
    Deprecated,
    Unsupported,
}

impl FromStr for Status {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "stable" => Ok(Status::Stable),
            "test" => Ok(Status::Test),
            "experimental" => Ok(Status::Experimental),
            "deprecated" => Ok(Status::Deprecated),
            "unsupported" => Ok(Status::Unsupported),
            _ => Err(()),
        }
    }
}

/// Severity level of a triggered rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    Informational,
    Low,
    Medium,
    High,
    Critical,
}

impl FromStr for Level {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "informational" => Ok(Level::Informational),
            "low" => Ok(Level::Low),
            "medium" => Ok(Level::Medium),
            "high" => Ok(Level::High),
            "critical" => Ok(Level::Critical),
            _ => Err(()),
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Level::Informational => "informational",
            Level::Low => "low",
            Level::Medium => "medium",
            Level::High => "high",
            Level::Critical => "critical",
        };
        write!(f, "{s}")
    }
}

/// Relationship type for the `related` field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RelationType {
    Derived,
    Obsolete,
    Merged,
    Renamed,
    Similar,
}

impl FromStr for RelationType {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "derived" => Ok(RelationType::Derived),
            "obsolete" => Ok(RelationType::Obsolete),
            "merged" => Ok(RelationType::Merged),
            "renamed" => Ok(RelationType::Renamed),
            "similar" => Ok(RelationType::Similar),
            _ => Err(()),
        }
    }
}

// =============================================================================
// Detection Section
// =============================================================================

/// The detection section of a rule: a condition string plus named searches.
///
/// Every key other than `condition` is kept in `searches`, including the
/// reserved [`TIMEFRAME_KEY`].
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Detection {
    /// Raw condition string, e.g. `selection` or `count() by SourceAddress > 5`.
    pub condition: String,
    /// Search name → value tree.
    pub searches: BTreeMap<String, SearchValue>,
}

impl Detection {
    pub fn new(condition: impl Into<String>) -> Self {
        Detection {
            condition: condition.into(),
            searches: BTreeMap::new(),
        }
    }

    /// Add (or replace) a named search.
    pub fn with_search(mut self, name: impl Into<String>, value: impl Into<SearchValue>) -> Self {
        self.searches.insert(name.into(), value.into());
        self
    }

    /// The `timeframe` modifier, if the rule carries one.
    pub fn timeframe(&self) -> Option<&SearchValue> {
        self.searches.get(TIMEFRAME_KEY)
    }
}

// =============================================================================
// Log Source
// =============================================================================

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LogSource {
    pub category: Option<String>,
    pub product: Option<String>,
    pub service: Option<String>,
}

/// A reference to a related rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Related {
    pub id: String,
    pub relation_type: RelationType,
}

// =============================================================================
// Sigma Detection Rule
// =============================================================================

/// A complete Sigma detection rule.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SigmaRule {
    // Required fields
    pub title: String,
    pub logsource: LogSource,
    pub detection: Detection,

    // Optional metadata
    pub id: Option<String>,
    pub related: Vec<Related>,
    pub status: Option<Status>,
    pub description: Option<String>,
    pub license: Option<String>,
    pub author: Option<String>,
    pub references: Vec<String>,
    pub date: Option<String>,
    pub modified: Option<String>,
    pub fields: Vec<String>,
    pub falsepositives: Vec<String>,
    pub level: Option<Level>,
    pub tags: Vec<String>,
}

// =============================================================================
// Collection
// =============================================================================

/// Rules decoded from one or more YAML documents.
#[derive(Debug, Clone, Default, Serialize)]
pub struct SigmaCollection {
    pub rules: Vec<SigmaRule>,
    /// Per-document decoding errors; the documents themselves were skipped.
    #[serde(skip)]
    pub errors: Vec<String>,
}

impl SigmaCollection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}
