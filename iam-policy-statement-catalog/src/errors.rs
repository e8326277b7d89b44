//! Error types for loading the bundled catalog.

use iam_policy_statement::StatementError;
use thiserror::Error;

/// Errors raised while reading embedded service reference files
#[derive(Debug, Error)]
pub enum CatalogError {
    /// No embedded file exists for the service
    #[error("No bundled service reference for '{0}'")]
    UnknownService(String),

    /// The embedded file could not be indexed
    #[error("Invalid service reference '{file}': {source}")]
    InvalidReference {
        file: String,
        #[source]
        source: StatementError,
    },
}

impl CatalogError {
    pub(crate) fn invalid_reference(file: impl Into<String>, source: StatementError) -> Self {
        Self::InvalidReference {
            file: file.into(),
            source,
        }
    }
}

/// Result alias for catalog loading
pub type Result<T> = std::result::Result<T, CatalogError>;
