//! The statement orchestrator
//!
//! A [`Statement`] is bound to one service prefix and a shared catalog
//! handle. It owns one of each sub-builder, the `Sid` and the `Effect`, and
//! exposes its mutation surface through the capability traits in
//! [`capabilities`]. Serialization can happen any number of times.

use std::sync::Arc;

use serde::{Deserialize, Serialize, Serializer};

use crate::actions::ActionSelector;
use crate::catalog::{ActionCatalog, EmptyCatalog};
use crate::conditions::ConditionBuilder;
use crate::config::StatementConfig;
use crate::errors::Result;
use crate::principals::PrincipalBuilder;
use crate::resources::ResourceBuilder;

pub mod capabilities;
pub mod json;

pub use capabilities::{ActionCapable, ConditionCapable, PrincipalCapable, ResourceCapable};
pub use json::{
    ConditionBlock, OneOrMany, PolicyDocument, PrincipalJson, StatementJson,
    POLICY_VERSION,
};

/// Outcome a statement grants
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Effect {
    #[default]
    Allow,
    Deny,
}

/// One policy statement under construction
#[derive(Debug, Clone)]
pub struct Statement {
    service: String,
    catalog: Arc<dyn ActionCatalog>,
    config: StatementConfig,
    sid: Option<String>,
    effect: Effect,
    actions: ActionSelector,
    resources: ResourceBuilder,
    conditions: ConditionBuilder,
    principals: PrincipalBuilder,
}

impl Statement {
    /// Create a statement for `service` backed by `catalog`
    pub fn new(service: impl Into<String>, catalog: Arc<dyn ActionCatalog>) -> Self {
        Self {
            service: service.into().trim().to_ascii_lowercase(),
            catalog,
            config: StatementConfig::default(),
            sid: None,
            effect: Effect::default(),
            actions: ActionSelector::new(),
            resources: ResourceBuilder::new(),
            conditions: ConditionBuilder::new(),
            principals: PrincipalBuilder::new(),
        }
    }

    /// A statement bound to no service.
    ///
    /// Actions and condition keys must carry their own prefixes; catalog
    /// backed operations find nothing.
    pub fn unbound() -> Self {
        Self::new("", Arc::new(EmptyCatalog))
    }

    #[must_use]
    pub fn with_config(mut self, config: StatementConfig) -> Self {
        self.config = config;
        self
    }

    pub fn set_sid(&mut self, sid: impl Into<String>) -> &mut Self {
        self.sid = Some(sid.into());
        self
    }

    /// Overwrite the effect; the last call wins
    pub fn set_effect(&mut self, effect: Effect) -> &mut Self {
        self.effect = effect;
        self
    }

    pub fn allow(&mut self) -> &mut Self {
        self.set_effect(Effect::Allow)
    }

    pub fn deny(&mut self) -> &mut Self {
        self.set_effect(Effect::Deny)
    }

    pub fn service_prefix(&self) -> &str {
        &self.service
    }

    pub fn catalog(&self) -> &dyn ActionCatalog {
        self.catalog.as_ref()
    }

    pub fn config(&self) -> &StatementConfig {
        &self.config
    }

    pub fn sid(&self) -> Option<&str> {
        self.sid.as_deref()
    }

    pub fn effect(&self) -> Effect {
        self.effect
    }

    pub fn actions(&self) -> &ActionSelector {
        &self.actions
    }

    pub fn resources(&self) -> &ResourceBuilder {
        &self.resources
    }

    pub fn conditions(&self) -> &ConditionBuilder {
        &self.conditions
    }

    pub fn principals(&self) -> &PrincipalBuilder {
        &self.principals
    }

    /// Fully resolved form; external principals are left out
    pub fn to_statement_json(&self) -> StatementJson {
        self.render(&self.principals)
    }

    pub fn to_json(&self) -> Result<String> {
        self.to_statement_json().to_json()
    }

    pub fn to_json_pretty(&self) -> Result<String> {
        self.to_statement_json().to_json_pretty()
    }

    /// Render with a substitute principal set
    pub(crate) fn render(&self, principals: &PrincipalBuilder) -> StatementJson {
        let action = OneOrMany::from_values(self.actions.actions());
        let (action, not_action) = if self.actions.is_negated() {
            (None, Some(action))
        } else {
            (Some(action), None)
        };

        let resource = OneOrMany::from_values(self.resources.resolved());
        let (resource, not_resource) = if self.resources.is_negated() {
            (None, Some(resource))
        } else {
            (Some(resource), None)
        };

        let principal = if principals.is_public() {
            Some(PrincipalJson::Public)
        } else if principals.has_principals() {
            Some(PrincipalJson::Typed(
                principals
                    .buckets()
                    .iter()
                    .map(|(principal_type, values)| {
                        (*principal_type, OneOrMany::from_values(values))
                    })
                    .collect(),
            ))
        } else {
            None
        };
        let (principal, not_principal) = if principals.is_negated() {
            (None, principal)
        } else {
            (principal, None)
        };

        let condition = if self.conditions.is_empty() {
            None
        } else {
            let mut block = ConditionBlock::default();
            for (operator, key, values) in self.conditions.entries() {
                block.push(
                    operator.to_string(),
                    key.to_string(),
                    values.iter().cloned().collect(),
                );
            }
            Some(block)
        };

        StatementJson {
            sid: self.sid.clone(),
            effect: self.effect,
            action,
            not_action,
            resource,
            not_resource,
            principal,
            not_principal,
            condition,
        }
    }
}

impl Serialize for Statement {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        self.to_statement_json().serialize(serializer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_empty_statement() {
        let statement = Statement::unbound();
        assert_eq!(
            statement.to_json().unwrap(),
            r#"{"Effect":"Allow","Action":[],"Resource":"*"}"#
        );
    }

    #[test]
    fn test_field_order() {
        let mut statement = Statement::unbound();
        statement.set_sid("Example").deny();
        statement.add_action("s3:GetObject");
        statement.set_public();
        statement.add_condition("aws:SecureTransport", false, None);
        assert_eq!(
            statement.to_json().unwrap(),
            r#"{"Sid":"Example","Effect":"Deny","Action":"s3:GetObject","Resource":"*","Principal":"*","Condition":{"Bool":{"aws:SecureTransport":["false"]}}}"#
        );
    }

    #[test]
    fn test_negation_picks_one_key_of_each_pair() {
        let mut statement = Statement::unbound();
        statement
            .add_action("ec2:RunInstances")
            .set_not_action(true)
            .add_raw_arn("arn:aws:s3:::a")
            .set_not_resource(true)
            .add_principal(crate::principals::PrincipalType::Aws, "111122223333")
            .set_not_principal(true);
        let value = serde_json::to_value(&statement).unwrap();
        assert_eq!(
            value,
            json!({
                "Effect": "Allow",
                "NotAction": "ec2:RunInstances",
                "NotResource": "arn:aws:s3:::a",
                "NotPrincipal": {"AWS": "111122223333"}
            })
        );
    }

    #[test]
    fn test_repeated_serialization_is_stable() {
        let mut statement = Statement::unbound();
        statement.add_action("sqs:SendMessage");
        let first = statement.to_json().unwrap();
        assert_eq!(statement.to_json().unwrap(), first);
        statement.add_action("sqs:ReceiveMessage");
        assert_ne!(statement.to_json().unwrap(), first);
    }

    #[test]
    fn test_service_prefix_is_normalized() {
        let statement = Statement::new(" EC2 ", Arc::new(EmptyCatalog));
        assert_eq!(statement.service_prefix(), "ec2");
    }
}
