//! Embedded AWS service reference documents
//!
//! One JSON file per service prefix, compressed into the binary at compile
//! time. Only the fields the statement builder reads are kept.

use std::borrow::Cow;

use rust_embed::RustEmbed;

/// Service reference files, named `<prefix>.json`
#[derive(RustEmbed)]
#[folder = "resources/service-reference"]
#[include = "*.json"]
pub struct ServiceReferences;

impl ServiceReferences {
    /// Raw bytes of a service reference by service prefix
    pub fn get_service_reference(service: &str) -> Option<Cow<'static, [u8]>> {
        let start_time = std::time::Instant::now();

        let path = format!("{}.json", service.to_ascii_lowercase());
        let file = Self::get(&path)?;

        let total_time = start_time.elapsed();
        if total_time.as_millis() > 10 {
            log::debug!(
                "Loaded {}: {}KB in {:?}",
                path,
                file.data.len() / 1024,
                total_time
            );
        }

        Some(file.data)
    }

    /// Service prefixes with an embedded reference, sorted
    pub fn service_names() -> Vec<String> {
        let mut names: Vec<String> = Self::iter()
            .filter_map(|path| path.strip_suffix(".json").map(str::to_string))
            .collect();
        names.sort();
        names
    }
}
