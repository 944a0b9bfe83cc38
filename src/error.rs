//! Error types for the rule engine core

use thiserror::Error;

/// Main error type for parsing, combining and evaluating rules
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RuleError {
    #[error("Malformed clause: {0}")]
    MalformedClause(String),

    #[error("Unknown operator: {0}")]
    UnknownOperator(String),

    #[error("Missing attribute: {0}")]
    MissingAttribute(String),

    #[error("Invalid rule structure: {reason} ({operands} operands on stack)")]
    StructuralParse {
        reason: &'static str,
        operands: usize,
    },

    #[error("Rule nests deeper than {limit} levels")]
    NestingTooDeep { limit: usize },

    #[error("Cannot combine an empty list of rules")]
    EmptyCombineInput,

    #[error("Unknown connective: {0}")]
    UnknownConnective(String),

    #[error("Invalid attribute value for {0}: expected integer or string")]
    InvalidAttribute(String),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<serde_json::Error> for RuleError {
    fn from(err: serde_json::Error) -> Self {
        RuleError::Serialization(err.to_string())
    }
}

#[cfg(feature = "python")]
impl From<RuleError> for pyo3::PyErr {
    fn from(err: RuleError) -> pyo3::PyErr {
        use pyo3::exceptions::{PyKeyError, PyValueError};

        match err {
            RuleError::MissingAttribute(name) => {
                PyKeyError::new_err(format!("Missing attribute: {}", name))
            }
            other => PyValueError::new_err(other.to_string()),
        }
    }
}

/// Result type alias for the rule engine core
pub type Result<T> = std::result::Result<T, RuleError>;
