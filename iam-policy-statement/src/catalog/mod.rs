//! Action catalog interface
//!
//! The engine never hardcodes service data. Everything it knows about a
//! service (its actions, their access levels, resource-type ARN templates and
//! condition-key types) comes through the [`ActionCatalog`] trait. The
//! [`InMemoryCatalog`] implementation is built from AWS service reference JSON
//! documents.

use std::fmt;

use serde::{Deserialize, Serialize};

pub(crate) mod service_reference;

pub use service_reference::{
    AnnotationProperties, Annotations, InMemoryCatalog, ServiceCatalog, ServiceReference,
    ServiceReferenceAction, ServiceReferenceConditionKey, ServiceReferenceResource,
    ServiceReferenceResourceRef,
};

/// Access level categories assigned to every action
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AccessLevel {
    Read,
    Write,
    List,
    Tagging,
    #[serde(rename = "Permissions management")]
    PermissionsManagement,
}

impl fmt::Display for AccessLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Read => "Read",
            Self::Write => "Write",
            Self::List => "List",
            Self::Tagging => "Tagging",
            Self::PermissionsManagement => "Permissions management",
        };
        f.write_str(label)
    }
}

/// Metadata describing one action of a service
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionDescriptor {
    /// Service prefix, e.g. `ec2`
    pub service_name: String,
    /// Action name without the prefix, e.g. `RunInstances`
    pub short_name: String,
    pub access_level: AccessLevel,
    pub applicable_resource_types: Vec<String>,
    pub supported_condition_keys: Vec<String>,
}

/// ARN template for a resource type
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceTypeTemplate {
    pub name: String,
    /// Template with `${Placeholder}` tokens
    pub arn_template: String,
    pub condition_keys: Vec<String>,
}

/// Scalar kind of a condition key's values
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ConditionValueKind {
    String,
    Arn,
    Numeric,
    Date,
    Bool,
    IpAddress,
    Binary,
}

/// Value type of a condition key as published in the service reference
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ConditionKeyType {
    pub kind: ConditionValueKind,
    /// `ArrayOf...` keys carry several values per request
    pub multivalued: bool,
}

impl ConditionKeyType {
    /// Parse a service reference type name such as `String` or `ArrayOfARN`.
    /// Unknown names yield `None`.
    pub fn parse(name: &str) -> Option<Self> {
        let (multivalued, scalar) = match name.strip_prefix("ArrayOf") {
            Some(rest) => (true, rest),
            None => (false, name),
        };
        let kind = match scalar.to_ascii_lowercase().as_str() {
            "string" => ConditionValueKind::String,
            "arn" => ConditionValueKind::Arn,
            "numeric" | "long" | "integer" => ConditionValueKind::Numeric,
            "date" => ConditionValueKind::Date,
            "bool" | "boolean" => ConditionValueKind::Bool,
            "ipaddress" => ConditionValueKind::IpAddress,
            "binary" => ConditionValueKind::Binary,
            _ => return None,
        };
        Some(Self { kind, multivalued })
    }
}

/// Metadata describing a condition key
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConditionKeyDescriptor {
    /// Key name; parameterized keys keep their `${TagKey}` suffix
    pub name: String,
    pub types: Vec<ConditionKeyType>,
}

/// Read-only lookup of per-service action metadata
pub trait ActionCatalog: fmt::Debug + Send + Sync {
    /// Look up one action by its short name
    fn lookup_action(&self, service: &str, short_name: &str) -> Option<&ActionDescriptor>;

    /// Every action of the service in catalog order
    fn list_actions(&self, service: &str) -> Vec<&ActionDescriptor>;

    /// Look up the ARN template for a resource type
    fn lookup_resource_type(&self, service: &str, name: &str) -> Option<&ResourceTypeTemplate>;

    /// Look up the value types of a condition key.
    ///
    /// Catalogs without condition-key metadata can rely on the default,
    /// which makes the engine fall back to its built-in operator table.
    fn lookup_condition_key(&self, _service: &str, _key: &str) -> Option<&ConditionKeyDescriptor> {
        None
    }
}

/// Catalog with no services, used by statements that are not bound to one
#[derive(Debug, Clone, Copy, Default)]
pub struct EmptyCatalog;

impl ActionCatalog for EmptyCatalog {
    fn lookup_action(&self, _service: &str, _short_name: &str) -> Option<&ActionDescriptor> {
        None
    }

    fn list_actions(&self, _service: &str) -> Vec<&ActionDescriptor> {
        Vec::new()
    }

    fn lookup_resource_type(&self, _service: &str, _name: &str) -> Option<&ResourceTypeTemplate> {
        None
    }
}
