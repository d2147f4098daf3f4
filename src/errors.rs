//! Error types for argument resolution and test invocation.
//!
//! Two families live here and they never mix:
//!
//! - [`EngineError`] is raised while a source is being resolved or checked
//!   against a signature. It aborts the whole test case before any body runs.
//! - [`AssertionFailure`] is produced by a test body for one argument set. It is
//!   recorded in that set's `TestResult` and iteration carries on.

use std::any::Any;
use std::fmt;
use std::path::PathBuf;

use miette::Diagnostic;
use serde::Serialize;
use thiserror::Error;

/// Type-safe classification of failures, used by reporting and tests instead
/// of matching on message text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorType {
    /// Invalid or ambiguous source descriptor, including arity and type mismatches.
    Configuration,
    /// A tabular field could not be converted to its declared parameter type.
    ArgumentParse,
    /// A test body rejected one argument set.
    Assertion,
}

impl ErrorType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorType::Configuration => "Configuration",
            ErrorType::ArgumentParse => "ArgumentParse",
            ErrorType::Assertion => "Assertion",
        }
    }
}

impl fmt::Display for ErrorType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Resolution-time failure. Fatal to the test case it belongs to, never to
/// other test cases.
#[derive(Debug, Error, Diagnostic)]
pub enum EngineError {
    #[error("Configuration error: {message}")]
    #[diagnostic(code(argsource::configuration))]
    Configuration {
        message: String,
        #[help]
        help: Option<String>,
    },

    #[error("Argument parse error at row {row}, column {column}: cannot convert {value:?} to {expected}")]
    #[diagnostic(
        code(argsource::argument_parse),
        help("integers accept decimal, 0x-prefixed hexadecimal and _-grouped digits")
    )]
    ArgumentParse {
        row: usize,
        column: usize,
        value: String,
        expected: String,
    },

    #[error("Malformed row {row}: {message}")]
    #[diagnostic(
        code(argsource::malformed_row),
        help("quote fields that contain the delimiter, e.g. 'lemon, lime'")
    )]
    MalformedRow { row: usize, message: String },

    #[error("Arity mismatch in {context}: expected {expected} argument(s), got {actual}")]
    #[diagnostic(code(argsource::arity_mismatch))]
    ArityMismatch {
        context: String,
        expected: usize,
        actual: usize,
    },

    #[error("Type mismatch in argument set {index}, position {position}: expected {expected}, got {actual}")]
    #[diagnostic(code(argsource::type_mismatch))]
    TypeMismatch {
        index: usize,
        position: usize,
        expected: String,
        actual: String,
    },

    #[error("Failed to read '{}'", path.display())]
    #[diagnostic(code(argsource::io))]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl EngineError {
    /// Constructs a configuration error without help text.
    pub fn configuration(message: impl Into<String>) -> Self {
        EngineError::Configuration {
            message: message.into(),
            help: None,
        }
    }

    /// Constructs a configuration error with a help line rendered by miette.
    pub fn configuration_with_help(message: impl Into<String>, help: impl Into<String>) -> Self {
        EngineError::Configuration {
            message: message.into(),
            help: Some(help.into()),
        }
    }

    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        EngineError::Io {
            path: path.into(),
            source,
        }
    }

    /// Returns the classification of this error. Arity and type mismatches
    /// are configuration problems, not parse problems.
    pub fn error_type(&self) -> ErrorType {
        match self {
            EngineError::Configuration { .. }
            | EngineError::ArityMismatch { .. }
            | EngineError::TypeMismatch { .. }
            | EngineError::Io { .. } => ErrorType::Configuration,
            EngineError::ArgumentParse { .. } | EngineError::MalformedRow { .. } => {
                ErrorType::ArgumentParse
            }
        }
    }
}

/// A test body's rejection of one argument set.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[error("{message}")]
pub struct AssertionFailure {
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expected: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub actual: Option<String>,
}

impl AssertionFailure {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            expected: None,
            actual: None,
        }
    }

    /// A failure that carries both sides of a comparison, so reporting can
    /// render a diff.
    pub fn mismatch(
        message: impl Into<String>,
        expected: impl Into<String>,
        actual: impl Into<String>,
    ) -> Self {
        Self {
            message: message.into(),
            expected: Some(expected.into()),
            actual: Some(actual.into()),
        }
    }

    /// Converts a caught panic payload into a failure. Panics raised with a
    /// string message keep it; anything else gets a generic message.
    pub fn from_panic(payload: &(dyn Any + Send)) -> Self {
        let detail = payload
            .downcast_ref::<&str>()
            .map(|s| (*s).to_string())
            .or_else(|| payload.downcast_ref::<String>().cloned())
            .unwrap_or_else(|| "non-string panic payload".to_string());
        Self::new(format!("test body panicked: {}", detail))
    }

    pub fn error_type(&self) -> ErrorType {
        ErrorType::Assertion
    }
}
