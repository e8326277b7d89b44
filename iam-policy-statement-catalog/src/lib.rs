//! Bundled action catalog for [`iam_policy_statement`].
//!
//! Ships a set of AWS service reference documents inside the binary and
//! exposes them through the engine's [`ActionCatalog`] trait. The shared
//! catalog is parsed once per process.
//!
//! ```
//! use iam_policy_statement::ActionCapable;
//!
//! let mut statement = iam_policy_statement_catalog::statement("sqs");
//! statement.add_action("sendmessage");
//! assert_eq!(Vec::from_iter(statement.actions().actions()), ["sqs:SendMessage"]);
//! ```

use std::sync::{Arc, OnceLock};

use iam_policy_statement::catalog::ServiceReference;
use iam_policy_statement::{InMemoryCatalog, ServiceCatalog, Statement, StatementError};

mod deserialization_tests;
mod embedded_data;
mod errors;

pub use embedded_data::ServiceReferences;
pub use errors::{CatalogError, Result};
pub use iam_policy_statement::ActionCatalog;

/// Parse and index the bundled reference of one service
pub fn load_service(service: &str) -> Result<ServiceCatalog> {
    let data = ServiceReferences::get_service_reference(service)
        .ok_or_else(|| CatalogError::UnknownService(service.to_string()))?;
    let file = format!("{}.json", service);

    let reference: ServiceReference = serde_json::from_slice(&data)
        .map_err(|e| CatalogError::invalid_reference(&file, StatementError::from(e)))?;
    ServiceCatalog::from_reference(reference)
        .map_err(|e| CatalogError::invalid_reference(&file, e))
}

/// Build a catalog from every bundled service, failing on the first bad file
pub fn load() -> Result<InMemoryCatalog> {
    let mut catalog = InMemoryCatalog::new();
    for service in ServiceReferences::service_names() {
        catalog.insert(load_service(&service)?);
    }
    Ok(catalog)
}

fn load_lenient() -> InMemoryCatalog {
    let start_time = std::time::Instant::now();
    let mut catalog = InMemoryCatalog::new();
    for service in ServiceReferences::service_names() {
        match load_service(&service) {
            Ok(service_catalog) => catalog.insert(service_catalog),
            Err(e) => log::warn!("Skipping bundled service reference: {}", e),
        }
    }
    log::debug!(
        "Loaded {} bundled services in {:?}",
        catalog.service_prefixes().len(),
        start_time.elapsed()
    );
    catalog
}

/// Process-wide catalog of all bundled services.
///
/// Invalid files are skipped with a warning; use [`load`] to surface them.
pub fn shared_catalog() -> Arc<InMemoryCatalog> {
    static CATALOG: OnceLock<Arc<InMemoryCatalog>> = OnceLock::new();
    CATALOG.get_or_init(|| Arc::new(load_lenient())).clone()
}

/// A statement for `service` backed by the shared catalog
pub fn statement(service: &str) -> Statement {
    Statement::new(service, shared_catalog())
}
