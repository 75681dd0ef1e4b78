//! Framework-wide error types
//!
//! Every failure the bootstrap, container, configuration or request pipeline
//! can produce is a [`FrameworkError`]. Startup failures bubble out of
//! `Application::run`; request failures convert into HTTP responses.

use thiserror::Error;

/// Configuration errors raised while reading environment variables
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// A required variable is unset or empty
    #[error("environment variable {key} is required but not set")]
    Missing {
        /// Variable name
        key: String,
    },

    /// A variable is present but does not parse as the expected type
    #[error("environment variable {key}={value:?} is not a valid {expected}")]
    Invalid {
        /// Variable name
        key: String,
        /// Raw value as found in the environment
        value: String,
        /// Human readable name of the expected type
        expected: &'static str,
    },
}

impl ConfigError {
    /// Create a Missing error
    pub fn missing(key: impl Into<String>) -> Self {
        Self::Missing { key: key.into() }
    }

    /// Create an Invalid error
    pub fn invalid(key: impl Into<String>, value: impl Into<String>, expected: &'static str) -> Self {
        Self::Invalid {
            key: key.into(),
            value: value.into(),
            expected,
        }
    }

    /// Name of the offending variable
    pub fn key(&self) -> &str {
        match self {
            Self::Missing { key } | Self::Invalid { key, .. } => key,
        }
    }
}

/// Framework-wide error type
///
/// Implements `From<FrameworkError> for HttpResponse` (see `http::response`)
/// so handlers can propagate it with `?`.
#[derive(Debug, Clone, Error)]
pub enum FrameworkError {
    /// Service not found in the dependency injection container
    #[error("Service '{type_name}' not registered in container")]
    ServiceNotFound {
        /// The type name of the service that was not found
        type_name: &'static str,
    },

    /// A provider (transitively) depends on itself
    #[error("Circular dependency detected: {chain}")]
    CircularDependency {
        /// Rendered dependency chain, outermost first
        chain: String,
    },

    /// Invalid or missing configuration
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Parameter extraction failed (missing parameter)
    #[error("Missing required parameter: {param_name}")]
    ParamError {
        /// The name of the parameter that failed extraction
        param_name: String,
    },

    /// Parameter parse error (400 Bad Request)
    #[error("Invalid parameter '{param}': expected {expected_type}")]
    ParamParse {
        /// The parameter value that failed to parse
        param: String,
        /// The expected type (e.g., "i32")
        expected_type: &'static str,
    },

    /// Malformed request body (400 Bad Request)
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Model not found (404 Not Found)
    #[error("{model_name} not found")]
    ModelNotFound {
        /// The name of the model that was not found
        model_name: String,
    },

    /// Request body exceeds the configured limit (413)
    #[error("Request body exceeds {limit} bytes")]
    PayloadTooLarge {
        /// Configured limit in bytes
        limit: usize,
    },

    /// Database error
    #[error("Database error: {0}")]
    Database(String),

    /// Operation refused by a safety guard (e.g. schema sync in production)
    #[error("Refused: {0}")]
    Refused(String),

    /// Server socket or connection error
    #[error("Server error: {0}")]
    Server(String),

    /// Generic internal server error
    #[error("Internal server error: {message}")]
    Internal {
        /// The error message
        message: String,
    },
}

impl FrameworkError {
    /// Create a ServiceNotFound error for a given type
    pub fn service_not_found<T: ?Sized>() -> Self {
        Self::ServiceNotFound {
            type_name: std::any::type_name::<T>(),
        }
    }

    /// Create a ParamError for a missing parameter
    pub fn param(name: impl Into<String>) -> Self {
        Self::ParamError {
            param_name: name.into(),
        }
    }

    /// Create a ParamParse error (400)
    pub fn param_parse(param: impl Into<String>, expected_type: &'static str) -> Self {
        Self::ParamParse {
            param: param.into(),
            expected_type,
        }
    }

    /// Create a BadRequest error (400)
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::BadRequest(message.into())
    }

    /// Create a ModelNotFound error (404)
    pub fn model_not_found(name: impl Into<String>) -> Self {
        Self::ModelNotFound {
            model_name: name.into(),
        }
    }

    /// Create a Database error
    pub fn database(message: impl Into<String>) -> Self {
        Self::Database(message.into())
    }

    /// Create a Refused error
    pub fn refused(message: impl Into<String>) -> Self {
        Self::Refused(message.into())
    }

    /// Create a Server error
    pub fn server(message: impl Into<String>) -> Self {
        Self::Server(message.into())
    }

    /// Create an Internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> u16 {
        match self {
            Self::ParamError { .. } | Self::ParamParse { .. } | Self::BadRequest(_) => 400,
            Self::ModelNotFound { .. } => 404,
            Self::PayloadTooLarge { .. } => 413,
            Self::Database(_) => 503,
            Self::ServiceNotFound { .. }
            | Self::CircularDependency { .. }
            | Self::Config(_)
            | Self::Refused(_)
            | Self::Server(_)
            | Self::Internal { .. } => 500,
        }
    }
}

impl From<sea_orm::DbErr> for FrameworkError {
    fn from(e: sea_orm::DbErr) -> Self {
        Self::Database(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(FrameworkError::param("id").status_code(), 400);
        assert_eq!(FrameworkError::param_parse("abc", "i32").status_code(), 400);
        assert_eq!(FrameworkError::model_not_found("User").status_code(), 404);
        assert_eq!(FrameworkError::service_not_found::<String>().status_code(), 500);
        assert_eq!(FrameworkError::database("down").status_code(), 503);
    }

    #[test]
    fn test_config_error_converts() {
        let err: FrameworkError = ConfigError::missing("DB_NAME").into();
        assert_eq!(
            err.to_string(),
            "Configuration error: environment variable DB_NAME is required but not set"
        );
    }

    #[test]
    fn test_config_error_key() {
        assert_eq!(ConfigError::invalid("DB_PORT", "abc", "u16").key(), "DB_PORT");
    }
}
