//! # coriolis-parser
//!
//! Decodes Sigma detection rules from YAML into a typed rule model.
//!
//! The model keeps the detection section deliberately raw:
//!
//! - **Condition**: the condition string exactly as written
//! - **Searches**: every other detection key mapped to a [`SearchValue`] tree
//!   of scalars, sequences and mappings, including the reserved `timeframe`
//! - **Metadata**: title, log source, status, level, tags and friends
//!
//! ## Quick Start
//!
//! ```rust
//! use coriolis_parser::{SearchValue, parse_sigma_rule};
//!
//! let yaml = r#"
//! title: Test Rule
//! logsource:
//!     category: test_category
//! detection:
//!     condition: selection
//!     selection:
//!         EventID: 1234
//! "#;
//!
//! let rule = parse_sigma_rule(yaml).unwrap();
//! assert_eq!(rule.title, "Test Rule");
//! assert_eq!(
//!     rule.detection.searches["selection"],
//!     SearchValue::mapping([("EventID", SearchValue::from(1234))]),
//! );
//! ```

pub mod ast;
pub mod error;
pub mod parser;
pub mod value;

pub use ast::{
    Detection, Level, LogSource, Related, RelationType, SigmaCollection, SigmaRule, Status,
    TIMEFRAME_KEY,
};
pub use error::{Result, SigmaParserError};
pub use parser::{parse_sigma_directory, parse_sigma_file, parse_sigma_rule, parse_sigma_yaml};
pub use value::{Scalar, SearchValue, Timespan, TimespanUnit};
