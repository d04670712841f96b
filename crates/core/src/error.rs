//! Error types for doctalk.
//!
//! This module defines a unified error enum that covers all error categories
//! in the application: configuration, I/O, the model backend, the knowledge
//! index, tools, and the reasoning loop.

use thiserror::Error;

/// Unified error type for doctalk.
///
/// All fallible functions in the application return `Result<T, AppError>`.
/// We never panic — errors must be represented and propagated.
#[derive(Error, Debug)]
pub enum AppError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// I/O and filesystem errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Rejected caller input (unsupported file type, unreadable document)
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Model backend unreachable or returned an error
    #[error("Backend error: {0}")]
    Backend(String),

    /// Knowledge index and embedding errors
    #[error("Knowledge error: {0}")]
    Knowledge(String),

    /// Prompt rendering errors
    #[error("Prompt error: {0}")]
    Prompt(String),

    /// The reasoning loop ran out of iterations without a final answer
    #[error("Reasoning budget exhausted after {0} iterations without a final answer")]
    BudgetExhausted(usize),

    /// A tool name that is not registered
    #[error("Unknown tool: {0}")]
    UnknownTool(String),

    /// A tool name registered more than once
    #[error("Tool already registered: {0}")]
    DuplicateTool(String),

    /// A registered tool failed while executing
    #[error("Tool '{name}' failed: {message}")]
    Tool { name: String, message: String },

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Serialization(err.to_string())
    }
}

impl From<serde_yaml::Error> for AppError {
    fn from(err: serde_yaml::Error) -> Self {
        AppError::Serialization(err.to_string())
    }
}

/// Convenience type alias for Results with AppError.
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = AppError::Config("missing API key".to_string());
        assert_eq!(err.to_string(), "Configuration error: missing API key");

        let err = AppError::BudgetExhausted(15);
        assert!(err.to_string().contains("15 iterations"));

        let err = AppError::Tool {
            name: "calculator".to_string(),
            message: "division by zero".to_string(),
        };
        assert_eq!(err.to_string(), "Tool 'calculator' failed: division by zero");
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "no such file");
        let err: AppError = io_err.into();
        assert!(matches!(err, AppError::Io(_)));
    }
}
