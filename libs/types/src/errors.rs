//! Error types for the CVSS scoring engine
//!
//! Comprehensive error taxonomy using thiserror

use thiserror::Error;

/// Top-level engine error
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CvssError {
    #[error("Unsupported CVSS version: {version}")]
    UnsupportedVersion { version: String },

    #[error("Parse error: {0}")]
    Parse(#[from] ParseError),

    #[error("Incomplete vector, missing base metrics: {}", missing.join(", "))]
    IncompleteVector { missing: Vec<String> },

    #[error("Version mismatch: cannot compare CVSS {left} with CVSS {right}")]
    VersionMismatch { left: String, right: String },

    #[error("Internal table miss for macrovector {macro_vector}")]
    InternalTableMiss { macro_vector: String },
}

impl CvssError {
    /// Whether the error stems from caller input rather than an engine defect.
    ///
    /// Everything except `InternalTableMiss` is recoverable at the call
    /// boundary: the caller keeps its previous vector and shows the message.
    pub fn is_user_error(&self) -> bool {
        !matches!(self, CvssError::InternalTableMiss { .. })
    }
}

/// Vector string validation errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParseError {
    #[error("Vector string is empty")]
    Empty,

    #[error("Invalid prefix: expected {expected}, found {found}")]
    InvalidPrefix { expected: String, found: String },

    #[error("Malformed token: {token:?}")]
    MalformedToken { token: String },

    #[error("Unknown metric: {code}")]
    UnknownMetric { code: String },

    #[error("Invalid value {value} for metric {code}")]
    InvalidValue { code: String, value: String },

    #[error("Duplicate metric: {code}")]
    DuplicateMetric { code: String },

    #[error("Incomplete vector, missing mandatory metrics: {}", missing.join(", "))]
    Incomplete { missing: Vec<String> },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_error_display() {
        let err = ParseError::InvalidValue {
            code: "AV".to_string(),
            value: "Q".to_string(),
        };
        assert_eq!(err.to_string(), "Invalid value Q for metric AV");
    }

    #[test]
    fn test_incomplete_lists_missing_metrics() {
        let err = ParseError::Incomplete {
            missing: vec!["AT".to_string(), "SC".to_string()],
        };
        assert_eq!(
            err.to_string(),
            "Incomplete vector, missing mandatory metrics: AT, SC"
        );
    }

    #[test]
    fn test_cvss_error_from_parse_error() {
        let parse_err = ParseError::Empty;
        let err: CvssError = parse_err.into();
        assert!(matches!(err, CvssError::Parse(ParseError::Empty)));
        assert!(err.is_user_error());
    }

    #[test]
    fn test_table_miss_is_not_user_error() {
        let err = CvssError::InternalTableMiss {
            macro_vector: "212221".to_string(),
        };
        assert!(!err.is_user_error());
        assert!(err.to_string().contains("212221"));
    }
}
