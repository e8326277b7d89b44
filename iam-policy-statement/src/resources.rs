//! Resource accumulation
//!
//! Collects ARN strings for the `Resource` / `NotResource` element, either as
//! raw literals or resolved from catalog ARN templates.

use indexmap::IndexSet;

use crate::arn::{ArnContext, ArnTemplate};
use crate::catalog::ActionCatalog;
use crate::config::{ArnDefaults, WILDCARD};
use crate::errors::{Result, StatementError};

/// Ordered, deduplicated set of resource ARNs plus the negation flag
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResourceBuilder {
    resources: IndexSet<String>,
    negated: bool,
}

impl ResourceBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a literal ARN (or `*`) as-is
    pub fn add_raw_arn(&mut self, arn: impl Into<String>) -> bool {
        self.resources.insert(arn.into())
    }

    /// Resolve a resource-type template from the catalog and append the ARN
    pub fn add_templated(
        &mut self,
        catalog: &dyn ActionCatalog,
        service: &str,
        resource_type: &str,
        identifiers: &[&str],
        context: &ArnContext,
        defaults: &ArnDefaults,
    ) -> Result<String> {
        let template = catalog
            .lookup_resource_type(service, resource_type)
            .ok_or_else(|| StatementError::unknown_resource_type(service, resource_type))?;

        let arn = ArnTemplate::parse(template.arn_template.as_str()).resolve(
            &template.name,
            identifiers,
            context,
            defaults,
        )?;
        log::trace!("Resolved {}:{} to {}", service, resource_type, arn);

        self.resources.insert(arn.clone());
        Ok(arn)
    }

    pub fn set_negated(&mut self, negated: bool) {
        self.negated = negated;
    }

    pub fn is_negated(&self) -> bool {
        self.negated
    }

    /// Accumulated ARNs, without the wildcard default
    pub fn resources(&self) -> &IndexSet<String> {
        &self.resources
    }

    /// ARNs as they are serialized: a lone wildcard when nothing was added
    pub fn resolved(&self) -> Vec<String> {
        if self.resources.is_empty() {
            vec![WILDCARD.to_string()]
        } else {
            self.resources.iter().cloned().collect()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::InMemoryCatalog;

    fn catalog() -> InMemoryCatalog {
        InMemoryCatalog::new()
            .with_service_json(
                r#"{
                    "Name": "s3",
                    "Resources": [
                        {"Name": "bucket", "ARNFormats": ["arn:${Partition}:s3:::${BucketName}"]},
                        {"Name": "object", "ARNFormats": ["arn:${Partition}:s3:::${BucketName}/${ObjectName}"]}
                    ]
                }"#,
            )
            .unwrap()
    }

    #[test]
    fn test_empty_defaults_to_wildcard() {
        let builder = ResourceBuilder::new();
        assert!(builder.resources().is_empty());
        assert_eq!(builder.resolved(), vec!["*"]);
    }

    #[test]
    fn test_raw_arns_are_deduplicated() {
        let mut builder = ResourceBuilder::new();
        assert!(builder.add_raw_arn("arn:aws:s3:::a"));
        assert!(builder.add_raw_arn("arn:aws:s3:::b"));
        assert!(!builder.add_raw_arn("arn:aws:s3:::a"));
        assert_eq!(builder.resolved(), vec!["arn:aws:s3:::a", "arn:aws:s3:::b"]);
    }

    #[test]
    fn test_add_templated() {
        let catalog = catalog();
        let mut builder = ResourceBuilder::new();
        let arn = builder
            .add_templated(
                &catalog,
                "s3",
                "object",
                &["my-bucket", "*"],
                &ArnContext::new(),
                &ArnDefaults::default(),
            )
            .unwrap();
        assert_eq!(arn, "arn:aws:s3:::my-bucket/*");
        assert_eq!(Vec::from_iter(builder.resources()), ["arn:aws:s3:::my-bucket/*"]);
    }

    #[test]
    fn test_add_templated_unknown_type() {
        let catalog = catalog();
        let mut builder = ResourceBuilder::new();
        let err = builder
            .add_templated(
                &catalog,
                "s3",
                "accesspoint",
                &["x"],
                &ArnContext::new(),
                &ArnDefaults::default(),
            )
            .unwrap_err();
        assert!(matches!(err, StatementError::UnknownResourceType { .. }));
        assert!(builder.resources().is_empty());
    }

    #[test]
    fn test_add_templated_missing_segment_leaves_builder_untouched() {
        let catalog = catalog();
        let mut builder = ResourceBuilder::new();
        let result = builder.add_templated(
            &catalog,
            "s3",
            "object",
            &["my-bucket"],
            &ArnContext::new(),
            &ArnDefaults::default(),
        );
        assert!(matches!(result, Err(StatementError::MissingArnSegment { .. })));
        assert!(builder.resources().is_empty());
    }

    #[test]
    fn test_negation_does_not_touch_resources() {
        let mut builder = ResourceBuilder::new();
        builder.add_raw_arn("arn:aws:s3:::a");
        builder.set_negated(true);
        assert!(builder.is_negated());
        assert_eq!(Vec::from_iter(builder.resources()), ["arn:aws:s3:::a"]);
    }
}
