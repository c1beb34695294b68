use thiserror::Error;

/// Errors that can occur while decoding Sigma rules.
#[derive(Debug, Error)]
pub enum SigmaParserError {
    #[error("YAML parsing error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Invalid rule: {0}")]
    InvalidRule(String),

    #[error("Missing required field '{0}'")]
    MissingField(String),

    #[error("Invalid detection: {0}")]
    InvalidDetection(String),

    #[error("Invalid timespan '{0}'")]
    InvalidTimespan(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, SigmaParserError>;
