//! Bundled data validation
//!
//! Every embedded service reference must deserialize and index with the same
//! code path used at runtime, so broken data fails CI instead of being
//! skipped silently.

#[cfg(test)]
mod tests {
    use crate::{load, load_service, ServiceReferences};
    use iam_policy_statement::{ActionCatalog, ArnTemplate};

    #[test]
    fn test_validate_all_service_references() {
        let mut errors = Vec::new();
        let names = ServiceReferences::service_names();
        assert!(!names.is_empty(), "no bundled service references found");

        for name in &names {
            match load_service(name) {
                Ok(catalog) => {
                    assert_eq!(
                        catalog.prefix(),
                        name.as_str(),
                        "file name and service name differ for {}",
                        name
                    );
                    assert!(
                        !catalog.actions().is_empty(),
                        "service reference '{}' has no actions",
                        name
                    );
                }
                Err(e) => errors.push(e.to_string()),
            }
        }

        assert!(errors.is_empty(), "invalid service references: {:#?}", errors);
    }

    #[test]
    fn test_referenced_resource_types_exist() {
        let catalog = load().unwrap();
        let mut missing = Vec::new();
        for service in catalog.service_prefixes() {
            for action in catalog.list_actions(service) {
                for resource_type in &action.applicable_resource_types {
                    if catalog.lookup_resource_type(service, resource_type).is_none() {
                        missing.push(format!("{}:{} -> {}", service, action.short_name, resource_type));
                    }
                }
            }
        }
        assert!(missing.is_empty(), "unknown resource types: {:#?}", missing);
    }

    #[test]
    fn test_arn_templates_start_with_partition() {
        let catalog = load().unwrap();
        for service in catalog.service_prefixes() {
            for action in catalog.list_actions(service) {
                for resource_type in &action.applicable_resource_types {
                    let Some(template) = catalog.lookup_resource_type(service, resource_type)
                    else {
                        continue;
                    };
                    assert!(
                        template.arn_template.starts_with("arn:${Partition}:"),
                        "{}",
                        template.arn_template
                    );
                    assert!(
                        !ArnTemplate::parse(template.arn_template.as_str())
                            .identifiers()
                            .is_empty(),
                        "{} has no identifiers",
                        template.arn_template
                    );
                }
            }
        }
    }

    #[test]
    fn test_action_condition_keys_have_types() {
        let catalog = load().unwrap();
        let mut untyped = Vec::new();
        for service in catalog.service_prefixes() {
            for action in catalog.list_actions(service) {
                for key in &action.supported_condition_keys {
                    if catalog.lookup_condition_key(service, key).is_none() {
                        untyped.push(format!("{}:{} -> {}", service, action.short_name, key));
                    }
                }
            }
        }
        assert!(untyped.is_empty(), "condition keys without types: {:#?}", untyped);
    }
}
