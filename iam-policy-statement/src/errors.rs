//! Error types for statement construction.
//!
//! The engine only rejects input it cannot turn into policy syntax at all.
//! Unknown action names, inapplicable resource types and similar semantic
//! mistakes are passed through to the output untouched.

use thiserror::Error;

/// Errors raised while building or rendering a statement
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StatementError {
    /// An action pattern could not be compiled as a regular expression
    #[error("Invalid action pattern '{pattern}': {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    /// A templated resource was requested without a required identifier
    #[error("Missing value for ARN placeholder '{placeholder}' of resource type '{resource_type}'")]
    MissingArnSegment {
        resource_type: String,
        placeholder: String,
    },

    /// The catalog has no ARN template for the requested resource type
    #[error("Resource type '{resource_type}' is not defined for service '{service}'")]
    UnknownResourceType {
        service: String,
        resource_type: String,
    },

    /// Catalog data could not be turned into descriptors
    #[error("Invalid catalog data for service '{service}': {message}")]
    Catalog { service: String, message: String },

    /// JSON parsing or rendering failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// An external principal could not be resolved at the embedding boundary
    #[error("Failed to resolve external principal: {0}")]
    PrincipalResolution(String),
}

impl StatementError {
    pub(crate) fn invalid_pattern(pattern: impl Into<String>, source: regex::Error) -> Self {
        Self::InvalidPattern {
            pattern: pattern.into(),
            source,
        }
    }

    pub(crate) fn missing_arn_segment(
        resource_type: impl Into<String>,
        placeholder: impl Into<String>,
    ) -> Self {
        Self::MissingArnSegment {
            resource_type: resource_type.into(),
            placeholder: placeholder.into(),
        }
    }

    pub(crate) fn unknown_resource_type(
        service: impl Into<String>,
        resource_type: impl Into<String>,
    ) -> Self {
        Self::UnknownResourceType {
            service: service.into(),
            resource_type: resource_type.into(),
        }
    }

    /// Create a catalog data error
    pub fn catalog(service: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Catalog {
            service: service.into(),
            message: message.into(),
        }
    }

    /// Create a principal resolution error
    pub fn principal_resolution(message: impl Into<String>) -> Self {
        Self::PrincipalResolution(message.into())
    }
}

/// Result alias used throughout the crate
pub type Result<T> = std::result::Result<T, StatementError>;
