//! Typed form of the policy grammar
//!
//! Field order of [`StatementJson`] is the emission order. Action, resource
//! and principal values collapse to a bare string when there is exactly one;
//! condition values are always arrays.

use indexmap::IndexMap;
use serde::{Serialize, Serializer};

use super::Effect;
use crate::errors::Result;
use crate::principals::PrincipalType;

/// Policy language version emitted in every document
pub const POLICY_VERSION: &str = "2012-10-17";

/// A bare string for one value, an array otherwise
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum OneOrMany {
    One(String),
    Many(Vec<String>),
}

impl OneOrMany {
    pub fn from_values<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut values: Vec<String> = values.into_iter().map(Into::into).collect();
        if values.len() == 1 {
            Self::One(values.remove(0))
        } else {
            Self::Many(values)
        }
    }

    /// Values in order, regardless of shape
    pub fn values(&self) -> &[String] {
        match self {
            Self::One(value) => std::slice::from_ref(value),
            Self::Many(values) => values,
        }
    }
}

/// The `Principal` / `NotPrincipal` element
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PrincipalJson {
    /// `"*"`
    Public,
    Typed(IndexMap<PrincipalType, OneOrMany>),
}

impl Serialize for PrincipalJson {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            Self::Public => serializer.serialize_str("*"),
            Self::Typed(entries) => entries.serialize(serializer),
        }
    }
}

/// The `Condition` element: operator -> key -> values
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ConditionBlock(IndexMap<String, IndexMap<String, Vec<String>>>);

impl ConditionBlock {
    /// Values for one operator/key pair
    pub fn get(&self, operator: &str, key: &str) -> Option<&[String]> {
        self.0
            .get(operator)
            .and_then(|keys| keys.get(key))
            .map(Vec::as_slice)
    }

    /// Operators in emission order
    pub fn operators(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub(crate) fn push(&mut self, operator: String, key: String, values: Vec<String>) {
        self.0.entry(operator).or_default().insert(key, values);
    }
}

/// A fully resolved statement object
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatementJson {
    #[serde(rename = "Sid", skip_serializing_if = "Option::is_none")]
    pub sid: Option<String>,
    #[serde(rename = "Effect")]
    pub effect: Effect,
    #[serde(rename = "Action", skip_serializing_if = "Option::is_none")]
    pub action: Option<OneOrMany>,
    #[serde(rename = "NotAction", skip_serializing_if = "Option::is_none")]
    pub not_action: Option<OneOrMany>,
    #[serde(rename = "Resource", skip_serializing_if = "Option::is_none")]
    pub resource: Option<OneOrMany>,
    #[serde(rename = "NotResource", skip_serializing_if = "Option::is_none")]
    pub not_resource: Option<OneOrMany>,
    #[serde(rename = "Principal", skip_serializing_if = "Option::is_none")]
    pub principal: Option<PrincipalJson>,
    #[serde(rename = "NotPrincipal", skip_serializing_if = "Option::is_none")]
    pub not_principal: Option<PrincipalJson>,
    #[serde(rename = "Condition", skip_serializing_if = "Option::is_none")]
    pub condition: Option<ConditionBlock>,
}

impl StatementJson {
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// `{ "Version": "2012-10-17", "Statement": [...] }`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PolicyDocument {
    #[serde(rename = "Version")]
    version: String,
    #[serde(rename = "Statement")]
    statements: Vec<StatementJson>,
}

impl Default for PolicyDocument {
    fn default() -> Self {
        Self {
            version: POLICY_VERSION.to_string(),
            statements: Vec::new(),
        }
    }
}

impl PolicyDocument {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append the serialized form of a statement, builder style
    #[must_use]
    pub fn with_statement(mut self, statement: &super::Statement) -> Self {
        self.statements.push(statement.to_statement_json());
        self
    }

    /// Append an already resolved statement
    pub fn push(&mut self, statement: StatementJson) {
        self.statements.push(statement);
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn statements(&self) -> &[StatementJson] {
        &self.statements
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
