//! Service reference data model and the in-memory catalog built from it
//!
//! The JSON shape mirrors the AWS service reference documents: a service
//! `Name`, its `Actions` with annotations and resource references, its
//! `Resources` with `ARNFormats`, and its `ConditionKeys` with value types.
//! Fields the engine does not need (operations, SDK mappings, support
//! matrices) are ignored during deserialization.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::{
    AccessLevel, ActionCatalog, ActionDescriptor, ConditionKeyDescriptor, ConditionKeyType,
    ResourceTypeTemplate,
};
use crate::errors::{Result, StatementError};

/// Raw service reference document
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "PascalCase")]
pub struct ServiceReference {
    pub name: String,
    #[serde(default)]
    pub actions: Vec<ServiceReferenceAction>,
    #[serde(default)]
    pub resources: Vec<ServiceReferenceResource>,
    #[serde(default)]
    pub condition_keys: Vec<ServiceReferenceConditionKey>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "PascalCase")]
pub struct ServiceReferenceAction {
    pub name: String,
    #[serde(default)]
    pub action_condition_keys: Vec<String>,
    #[serde(default)]
    pub annotations: Option<Annotations>,
    #[serde(default)]
    pub resources: Vec<ServiceReferenceResourceRef>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "PascalCase")]
pub struct Annotations {
    #[serde(default)]
    pub properties: AnnotationProperties,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "PascalCase")]
pub struct AnnotationProperties {
    #[serde(default)]
    pub is_list: bool,
    #[serde(default)]
    pub is_permission_management: bool,
    #[serde(default)]
    pub is_tagging_only: bool,
    #[serde(default)]
    pub is_write: bool,
}

impl AnnotationProperties {
    /// Derive the access level; the most privileged flag wins
    pub fn access_level(&self) -> AccessLevel {
        if self.is_permission_management {
            AccessLevel::PermissionsManagement
        } else if self.is_tagging_only {
            AccessLevel::Tagging
        } else if self.is_write {
            AccessLevel::Write
        } else if self.is_list {
            AccessLevel::List
        } else {
            AccessLevel::Read
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "PascalCase")]
pub struct ServiceReferenceResourceRef {
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "PascalCase")]
pub struct ServiceReferenceResource {
    pub name: String,
    #[serde(rename = "ARNFormats", default)]
    pub arn_formats: Vec<String>,
    #[serde(default)]
    pub condition_keys: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "PascalCase")]
pub struct ServiceReferenceConditionKey {
    pub name: String,
    #[serde(default)]
    pub types: Vec<String>,
}

/// Indexed descriptors of a single service
#[derive(Debug, Clone, Default)]
pub struct ServiceCatalog {
    prefix: String,
    actions: Vec<ActionDescriptor>,
    action_index: HashMap<String, usize>,
    resource_types: HashMap<String, ResourceTypeTemplate>,
    condition_keys: HashMap<String, ConditionKeyDescriptor>,
    /// `ec2:resourcetag` -> `ec2:resourcetag/${tagkey}`
    parameterized_keys: HashMap<String, String>,
}

impl ServiceCatalog {
    /// Parse a service reference JSON document
    pub fn from_json(json: &str) -> Result<Self> {
        let reference: ServiceReference = serde_json::from_str(json)?;
        Self::from_reference(reference)
    }

    /// Index a parsed service reference
    pub fn from_reference(reference: ServiceReference) -> Result<Self> {
        let prefix = reference.name.trim().to_ascii_lowercase();
        if prefix.is_empty() {
            return Err(StatementError::catalog(
                reference.name,
                "Service reference has an empty name",
            ));
        }

        let mut catalog = Self {
            prefix: prefix.clone(),
            ..Self::default()
        };

        for action in reference.actions {
            let access_level = action
                .annotations
                .as_ref()
                .map(|annotations| annotations.properties.access_level())
                .unwrap_or(AccessLevel::Read);
            let descriptor = ActionDescriptor {
                service_name: prefix.clone(),
                short_name: action.name,
                access_level,
                applicable_resource_types: action
                    .resources
                    .into_iter()
                    .map(|resource| resource.name)
                    .collect(),
                supported_condition_keys: action.action_condition_keys,
            };
            let lookup_name = descriptor.short_name.to_ascii_lowercase();
            if catalog.action_index.contains_key(&lookup_name) {
                log::warn!(
                    "Duplicate action {}:{} in service reference, keeping the first",
                    prefix,
                    descriptor.short_name
                );
                continue;
            }
            catalog
                .action_index
                .insert(lookup_name, catalog.actions.len());
            catalog.actions.push(descriptor);
        }

        for resource in reference.resources {
            let Some(arn_template) = resource.arn_formats.into_iter().next() else {
                log::warn!(
                    "Resource type {}:{} has no ARN format, skipping",
                    prefix,
                    resource.name
                );
                continue;
            };
            catalog.resource_types.insert(
                resource.name.to_ascii_lowercase(),
                ResourceTypeTemplate {
                    name: resource.name,
                    arn_template,
                    condition_keys: resource.condition_keys,
                },
            );
        }

        for key in reference.condition_keys {
            let types = key
                .types
                .iter()
                .filter_map(|name| {
                    let parsed = ConditionKeyType::parse(name);
                    if parsed.is_none() {
                        log::debug!("Unknown condition key type {} for {}", name, key.name);
                    }
                    parsed
                })
                .collect();
            let lookup_name = key.name.to_ascii_lowercase();
            if let Some((head, tail)) = lookup_name.split_once('/') {
                if tail.is_empty() || tail.starts_with("${") {
                    catalog
                        .parameterized_keys
                        .insert(head.to_string(), lookup_name.clone());
                }
            }
            catalog.condition_keys.insert(
                lookup_name,
                ConditionKeyDescriptor {
                    name: key.name,
                    types,
                },
            );
        }

        log::debug!(
            "Indexed service {}: {} actions, {} resource types, {} condition keys",
            catalog.prefix,
            catalog.actions.len(),
            catalog.resource_types.len(),
            catalog.condition_keys.len()
        );

        Ok(catalog)
    }

    /// Service prefix this catalog describes
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// All actions in document order
    pub fn actions(&self) -> &[ActionDescriptor] {
        &self.actions
    }

    fn action(&self, short_name: &str) -> Option<&ActionDescriptor> {
        self.action_index
            .get(&short_name.to_ascii_lowercase())
            .map(|&index| &self.actions[index])
    }

    fn resource_type(&self, name: &str) -> Option<&ResourceTypeTemplate> {
        self.resource_types.get(&name.to_ascii_lowercase())
    }

    fn condition_key(&self, key: &str) -> Option<&ConditionKeyDescriptor> {
        let lookup_name = key.to_ascii_lowercase();
        if let Some(descriptor) = self.condition_keys.get(&lookup_name) {
            return Some(descriptor);
        }
        let (head, _) = lookup_name.split_once('/')?;
        self.parameterized_keys
            .get(head)
            .and_then(|name| self.condition_keys.get(name))
    }
}

/// Catalog holding indexed services in memory
#[derive(Debug, Clone, Default)]
pub struct InMemoryCatalog {
    services: HashMap<String, ServiceCatalog>,
}

impl InMemoryCatalog {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a catalog from several service reference JSON documents
    pub fn from_json_documents<'a, I>(documents: I) -> Result<Self>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut catalog = Self::new();
        for document in documents {
            catalog.insert(ServiceCatalog::from_json(document)?);
        }
        Ok(catalog)
    }

    /// Add or replace a service
    pub fn insert(&mut self, service: ServiceCatalog) {
        if self
            .services
            .insert(service.prefix.clone(), service)
            .is_some()
        {
            log::debug!("Replaced an existing service in the catalog");
        }
    }

    /// Add a service parsed from JSON, builder style
    pub fn with_service_json(mut self, json: &str) -> Result<Self> {
        self.insert(ServiceCatalog::from_json(json)?);
        Ok(self)
    }

    /// Service prefixes known to the catalog, sorted
    pub fn service_prefixes(&self) -> Vec<&str> {
        let mut prefixes: Vec<&str> = self.services.keys().map(String::as_str).collect();
        prefixes.sort_unstable();
        prefixes
    }

    /// Borrow the indexed data of one service
    pub fn service(&self, prefix: &str) -> Option<&ServiceCatalog> {
        self.services.get(&prefix.to_ascii_lowercase())
    }
}

impl ActionCatalog for InMemoryCatalog {
    fn lookup_action(&self, service: &str, short_name: &str) -> Option<&ActionDescriptor> {
        self.service(service)?.action(short_name)
    }

    fn list_actions(&self, service: &str) -> Vec<&ActionDescriptor> {
        self.service(service)
            .map(|catalog| catalog.actions.iter().collect())
            .unwrap_or_default()
    }

    fn lookup_resource_type(&self, service: &str, name: &str) -> Option<&ResourceTypeTemplate> {
        self.service(service)?.resource_type(name)
    }

    fn lookup_condition_key(&self, service: &str, key: &str) -> Option<&ConditionKeyDescriptor> {
        self.service(service)?.condition_key(key)
    }
}
