//! Capability traits making up the fluent surface of a [`Statement`]
//!
//! Each trait covers one element of the grammar. Required methods are the
//! primitives; provided methods are conveniences built on top of them.

use std::sync::Arc;

use super::Statement;
use crate::arn::ArnContext;
use crate::catalog::AccessLevel;
use crate::conditions::{self, BaseOperator, ConditionValues, Operator};
use crate::errors::Result;
use crate::principals::{self, ExternalPrincipal, PrincipalType};

/// `Action` / `NotAction`
pub trait ActionCapable {
    /// Add one action by short name, or by `prefix:Name`
    fn add_action(&mut self, name: &str) -> &mut Self;

    /// Add every action of the bound service
    fn add_all_actions(&mut self) -> &mut Self;

    /// Add every action of the bound service with the given access level
    fn add_by_access_level(&mut self, level: AccessLevel) -> &mut Self;

    /// Add every action whose short name matches `pattern` case-insensitively
    ///
    /// # Errors
    ///
    /// Returns [`crate::StatementError::InvalidPattern`] when `pattern` does
    /// not compile.
    fn add_matching(&mut self, pattern: &str) -> Result<&mut Self>;

    /// Serialize the actions as `NotAction` instead of `Action`
    fn set_not_action(&mut self, negated: bool) -> &mut Self;

    fn add_actions<'a, I>(&mut self, names: I) -> &mut Self
    where
        I: IntoIterator<Item = &'a str>,
    {
        for name in names {
            self.add_action(name);
        }
        self
    }

    fn all_read_actions(&mut self) -> &mut Self {
        self.add_by_access_level(AccessLevel::Read)
    }

    fn all_write_actions(&mut self) -> &mut Self {
        self.add_by_access_level(AccessLevel::Write)
    }

    fn all_list_actions(&mut self) -> &mut Self {
        self.add_by_access_level(AccessLevel::List)
    }

    fn all_tagging_actions(&mut self) -> &mut Self {
        self.add_by_access_level(AccessLevel::Tagging)
    }

    fn all_permission_management_actions(&mut self) -> &mut Self {
        self.add_by_access_level(AccessLevel::PermissionsManagement)
    }
}

/// `Resource` / `NotResource`
pub trait ResourceCapable {
    /// Add a literal ARN
    fn add_raw_arn(&mut self, arn: impl Into<String>) -> &mut Self;

    /// Resolve a resource-type template of the bound service and add it.
    ///
    /// `identifiers` fill the resource-specific placeholders in template
    /// order. Partition, region and account come from `context`, then from
    /// the statement configuration.
    ///
    /// # Errors
    ///
    /// [`crate::StatementError::UnknownResourceType`] when the catalog has no
    /// such type, [`crate::StatementError::MissingArnSegment`] when an
    /// identifier is missing.
    fn add_templated(
        &mut self,
        resource_type: &str,
        identifiers: &[&str],
        context: &ArnContext,
    ) -> Result<&mut Self>;

    /// Serialize the resources as `NotResource` instead of `Resource`
    fn set_not_resource(&mut self, negated: bool) -> &mut Self;

    fn add_resources<I, S>(&mut self, arns: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for arn in arns {
            self.add_raw_arn(arn);
        }
        self
    }
}

macro_rules! global_condition_helpers {
    ($($(#[$meta:meta])* $name:ident => $key:literal;)*) => {
        $(
            $(#[$meta])*
            fn $name(
                &mut self,
                values: impl Into<ConditionValues>,
                operator: Option<Operator>,
            ) -> &mut Self {
                self.add_condition($key, values, operator)
            }
        )*
    };
}

/// `Condition`
pub trait ConditionCapable {
    /// Union `values` into the `(operator, key)` bucket.
    ///
    /// Keys without a prefix get the bound service prefix. Without an
    /// operator the default for the key's catalog type applies.
    fn add_condition(
        &mut self,
        key: &str,
        values: impl Into<ConditionValues>,
        operator: Option<Operator>,
    ) -> &mut Self;

    global_condition_helpers! {
        /// Services that made requests on the principal's behalf. **Default:** `ForAnyValue:StringEquals`
        if_aws_called_via => "aws:CalledVia";
        if_aws_called_via_first => "aws:CalledViaFirst";
        if_aws_called_via_last => "aws:CalledViaLast";
        /// Date and time of the request. **Default:** `DateLessThanEquals`
        if_aws_current_time => "aws:CurrentTime";
        /// Request time in epoch seconds. **Default:** `DateLessThanEquals`
        if_aws_epoch_time => "aws:EpochTime";
        /// Seconds since MFA authentication. **Default:** `NumericLessThan`
        if_aws_multi_factor_auth_age => "aws:MultiFactorAuthAge";
        if_aws_principal_account => "aws:PrincipalAccount";
        /// **Default:** `ArnLike`
        if_aws_principal_arn => "aws:PrincipalArn";
        if_aws_principal_org_id => "aws:PrincipalOrgID";
        if_aws_principal_org_paths => "aws:PrincipalOrgPaths";
        if_aws_principal_type => "aws:PrincipalType";
        if_aws_referer => "aws:Referer";
        if_aws_requested_region => "aws:RequestedRegion";
        if_aws_source_account => "aws:SourceAccount";
        /// **Default:** `ArnLike`
        if_aws_source_arn => "aws:SourceArn";
        /// **Default:** `IpAddress`
        if_aws_source_ip => "aws:SourceIp";
        if_aws_source_vpc => "aws:SourceVpc";
        if_aws_source_vpce => "aws:SourceVpce";
        if_aws_tag_keys => "aws:TagKeys";
        /// **Default:** `DateGreaterThanEquals`
        if_aws_token_issue_time => "aws:TokenIssueTime";
        if_aws_user_agent => "aws:UserAgent";
        if_aws_userid => "aws:userid";
        if_aws_username => "aws:username";
        /// **Default:** `IpAddress`
        if_aws_vpc_source_ip => "aws:VpcSourceIp";
    }

    /// Tags attached to the requesting principal
    fn if_aws_principal_tag(
        &mut self,
        tag: &str,
        values: impl Into<ConditionValues>,
        operator: Option<Operator>,
    ) -> &mut Self {
        self.add_condition(&format!("aws:PrincipalTag/{}", tag), values, operator)
    }

    /// Tags passed in the request
    fn if_aws_request_tag(
        &mut self,
        tag: &str,
        values: impl Into<ConditionValues>,
        operator: Option<Operator>,
    ) -> &mut Self {
        self.add_condition(&format!("aws:RequestTag/{}", tag), values, operator)
    }

    /// Tags attached to the resource
    fn if_aws_resource_tag(
        &mut self,
        tag: &str,
        values: impl Into<ConditionValues>,
        operator: Option<Operator>,
    ) -> &mut Self {
        self.add_condition(&format!("aws:ResourceTag/{}", tag), values, operator)
    }

    /// Requires MFA unless `value` is `Some(false)`
    fn if_aws_multi_factor_auth_present(&mut self, value: Option<bool>) -> &mut Self {
        self.add_condition(
            "aws:MultiFactorAuthPresent",
            value.unwrap_or(true),
            Some(Operator::new(BaseOperator::Bool)),
        )
    }

    /// Requires TLS unless `value` is `Some(false)`
    fn if_aws_secure_transport(&mut self, value: Option<bool>) -> &mut Self {
        self.add_condition(
            "aws:SecureTransport",
            value.unwrap_or(true),
            Some(Operator::new(BaseOperator::Bool)),
        )
    }

    /// Requires a call made by a service on the principal's behalf unless
    /// `value` is `Some(false)`
    fn if_aws_via_aws_service(&mut self, value: Option<bool>) -> &mut Self {
        self.add_condition(
            "aws:ViaAWSService",
            value.unwrap_or(true),
            Some(Operator::new(BaseOperator::Bool)),
        )
    }
}

/// `Principal` / `NotPrincipal`
pub trait PrincipalCapable {
    fn add_principal(&mut self, principal_type: PrincipalType, value: impl Into<String>)
        -> &mut Self;

    /// Replace all principals with `"*"`
    fn set_public(&mut self) -> &mut Self;

    /// Register a principal only the embedding layer can serialize
    fn add_external_principal(&mut self, principal: Arc<dyn ExternalPrincipal>) -> &mut Self;

    /// Serialize the principals as `NotPrincipal` instead of `Principal`
    fn set_not_principal(&mut self, negated: bool) -> &mut Self;

    /// Partition used for generated principal ARNs
    fn principal_partition(&self) -> &str;

    fn for_public(&mut self) -> &mut Self {
        self.set_public()
    }

    /// The account root, `arn:<partition>:iam::<account>:root`
    fn for_account(&mut self, account: &str) -> &mut Self {
        let arn = principals::account_root_arn(self.principal_partition(), account);
        self.add_principal(PrincipalType::Aws, arn)
    }

    fn for_user(&mut self, account: &str, user: &str) -> &mut Self {
        let arn = principals::iam_entity_arn(self.principal_partition(), account, "user", user);
        self.add_principal(PrincipalType::Aws, arn)
    }

    fn for_role(&mut self, account: &str, role: &str) -> &mut Self {
        let arn = principals::iam_entity_arn(self.principal_partition(), account, "role", role);
        self.add_principal(PrincipalType::Aws, arn)
    }

    fn for_assumed_role_session(&mut self, account: &str, role: &str, session: &str) -> &mut Self {
        let arn = principals::assumed_role_session_arn(
            self.principal_partition(),
            account,
            role,
            session,
        );
        self.add_principal(PrincipalType::Aws, arn)
    }

    /// A service principal such as `lambda.amazonaws.com`
    fn for_service(&mut self, service: &str) -> &mut Self {
        self.add_principal(PrincipalType::Service, service)
    }

    fn for_federated(&mut self, provider: &str) -> &mut Self {
        self.add_principal(PrincipalType::Federated, provider)
    }

    fn for_federated_cognito(&mut self) -> &mut Self {
        self.for_federated("cognito-identity.amazonaws.com")
    }

    fn for_federated_amazon(&mut self) -> &mut Self {
        self.for_federated("www.amazon.com")
    }

    fn for_federated_facebook(&mut self) -> &mut Self {
        self.for_federated("graph.facebook.com")
    }

    fn for_federated_google(&mut self) -> &mut Self {
        self.for_federated("accounts.google.com")
    }

    /// A SAML identity provider of `account`
    fn for_saml(&mut self, account: &str, provider: &str) -> &mut Self {
        let arn = principals::iam_entity_arn(
            self.principal_partition(),
            account,
            "saml-provider",
            provider,
        );
        self.for_federated(&arn)
    }

    fn for_canonical_user(&mut self, id: &str) -> &mut Self {
        self.add_principal(PrincipalType::CanonicalUser, id)
    }
}

impl ActionCapable for Statement {
    fn add_action(&mut self, name: &str) -> &mut Self {
        self.actions.add(self.catalog.as_ref(), &self.service, name);
        self
    }

    fn add_all_actions(&mut self) -> &mut Self {
        let added = self.actions.add_all(self.catalog.as_ref(), &self.service);
        if added == 0 {
            log::debug!("No catalog actions added for '{}'", self.service);
        }
        self
    }

    fn add_by_access_level(&mut self, level: AccessLevel) -> &mut Self {
        self.actions
            .add_by_access_level(self.catalog.as_ref(), &self.service, level);
        self
    }

    fn add_matching(&mut self, pattern: &str) -> Result<&mut Self> {
        self.actions
            .add_matching(self.catalog.as_ref(), &self.service, pattern)?;
        Ok(self)
    }

    fn set_not_action(&mut self, negated: bool) -> &mut Self {
        self.actions.set_negated(negated);
        self
    }
}

impl ResourceCapable for Statement {
    fn add_raw_arn(&mut self, arn: impl Into<String>) -> &mut Self {
        self.resources.add_raw_arn(arn);
        self
    }

    fn add_templated(
        &mut self,
        resource_type: &str,
        identifiers: &[&str],
        context: &ArnContext,
    ) -> Result<&mut Self> {
        self.resources.add_templated(
            self.catalog.as_ref(),
            &self.service,
            resource_type,
            identifiers,
            context,
            &self.config.arn_defaults,
        )?;
        Ok(self)
    }

    fn set_not_resource(&mut self, negated: bool) -> &mut Self {
        self.resources.set_negated(negated);
        self
    }
}

impl ConditionCapable for Statement {
    fn add_condition(
        &mut self,
        key: &str,
        values: impl Into<ConditionValues>,
        operator: Option<Operator>,
    ) -> &mut Self {
        let key = conditions::normalize_key(&self.service, key);
        let operator = operator.unwrap_or_else(|| {
            conditions::default_operator(self.catalog.as_ref(), &self.service, &key)
        });
        self.conditions.add(key, values, operator);
        self
    }
}

impl PrincipalCapable for Statement {
    fn add_principal(
        &mut self,
        principal_type: PrincipalType,
        value: impl Into<String>,
    ) -> &mut Self {
        self.principals.add(principal_type, value);
        self
    }

    fn set_public(&mut self) -> &mut Self {
        self.principals.set_public();
        self
    }

    fn add_external_principal(&mut self, principal: Arc<dyn ExternalPrincipal>) -> &mut Self {
        self.principals.add_external(principal);
        self
    }

    fn set_not_principal(&mut self, negated: bool) -> &mut Self {
        self.principals.set_negated(negated);
        self
    }

    fn principal_partition(&self) -> &str {
        &self.config.arn_defaults.partition
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ArnDefaults, StatementConfig};
    use chrono::{TimeZone, Utc};

    #[test]
    fn test_condition_keys_get_service_prefix() {
        let mut statement = Statement::new("ec2", Arc::new(crate::catalog::EmptyCatalog));
        statement.add_condition("Owner", "alice", None);
        let condition = statement.to_statement_json().condition.unwrap();
        assert_eq!(condition.get("StringLike", "ec2:Owner").unwrap(), ["alice"]);
    }

    #[test]
    fn test_global_helpers_use_default_operators() {
        let mut statement = Statement::unbound();
        statement
            .if_aws_called_via("athena.amazonaws.com", None)
            .if_aws_current_time(Utc.with_ymd_and_hms(2030, 1, 1, 0, 0, 0).unwrap(), None)
            .if_aws_multi_factor_auth_age(3600_u32, None)
            .if_aws_principal_org_id("o-abc", None)
            .if_aws_secure_transport(None)
            .if_aws_multi_factor_auth_present(Some(false))
            .if_aws_resource_tag("Team", ["a", "b"], None);
        let condition = statement.to_statement_json().condition.unwrap();
        assert_eq!(
            condition
                .get("ForAnyValue:StringEquals", "aws:CalledVia")
                .unwrap(),
            ["athena.amazonaws.com"]
        );
        assert_eq!(
            condition.get("DateLessThanEquals", "aws:CurrentTime").unwrap(),
            ["2030-01-01T00:00:00.000Z"]
        );
        assert_eq!(
            condition.get("NumericLessThan", "aws:MultiFactorAuthAge").unwrap(),
            ["3600"]
        );
        assert_eq!(condition.get("StringLike", "aws:PrincipalOrgID").unwrap(), ["o-abc"]);
        assert_eq!(condition.get("Bool", "aws:SecureTransport").unwrap(), ["true"]);
        assert_eq!(
            condition.get("Bool", "aws:MultiFactorAuthPresent").unwrap(),
            ["false"]
        );
        assert_eq!(
            condition.get("StringLike", "aws:ResourceTag/Team").unwrap(),
            ["a", "b"]
        );
    }

    #[test]
    fn test_global_keys_ignore_the_bound_catalog() {
        let catalog = crate::catalog::InMemoryCatalog::new()
            .with_service_json(
                r#"{
                    "Name": "ec2",
                    "ConditionKeys": [
                        {"Name": "aws:TagKeys", "Types": ["ArrayOfString"]},
                        {"Name": "aws:SourceIp", "Types": ["String"]}
                    ]
                }"#,
            )
            .unwrap();
        let mut bound = Statement::new("ec2", Arc::new(catalog));
        let mut unbound = Statement::unbound();
        for statement in [&mut bound, &mut unbound] {
            statement
                .if_aws_tag_keys(["Team"], None)
                .if_aws_source_ip("10.0.0.0/8", None);
        }
        assert_eq!(bound.to_json().unwrap(), unbound.to_json().unwrap());
        assert_eq!(
            bound.to_json().unwrap(),
            r#"{"Effect":"Allow","Action":[],"Resource":"*","Condition":{"StringLike":{"aws:TagKeys":["Team"]},"IpAddress":{"aws:SourceIp":["10.0.0.0/8"]}}}"#
        );
    }

    #[test]
    fn test_explicit_operator_overrides_default() {
        let mut statement = Statement::unbound();
        statement.if_aws_source_ip(
            "10.0.0.0/8",
            Some(Operator::new(BaseOperator::NotIpAddress)),
        );
        let condition = statement.to_statement_json().condition.unwrap();
        assert!(condition.get("IpAddress", "aws:SourceIp").is_none());
        assert_eq!(
            condition.get("NotIpAddress", "aws:SourceIp").unwrap(),
            ["10.0.0.0/8"]
        );
    }

    #[test]
    fn test_principal_helpers_use_configured_partition() {
        let config = StatementConfig {
            arn_defaults: ArnDefaults {
                partition: "aws-cn".to_string(),
                ..ArnDefaults::default()
            },
        };
        let mut statement = Statement::unbound().with_config(config);
        statement
            .for_account("123456789012")
            .for_role("123456789012", "deploy")
            .for_saml("123456789012", "corp")
            .for_service("lambda.amazonaws.com")
            .for_canonical_user("79a59df900b949e55d96a1e698fbaced");
        let principals = statement.principals();
        assert_eq!(
            Vec::from_iter(principals.values(PrincipalType::Aws).unwrap()),
            [
                "arn:aws-cn:iam::123456789012:root",
                "arn:aws-cn:iam::123456789012:role/deploy"
            ]
        );
        assert_eq!(
            Vec::from_iter(principals.values(PrincipalType::Federated).unwrap()),
            ["arn:aws-cn:iam::123456789012:saml-provider/corp"]
        );
        assert_eq!(
            Vec::from_iter(principals.values(PrincipalType::Service).unwrap()),
            ["lambda.amazonaws.com"]
        );
    }

    #[test]
    fn test_add_resources_and_actions_in_bulk() {
        let mut statement = Statement::unbound();
        statement
            .add_actions(["s3:GetObject", "s3:PutObject", "s3:GetObject"])
            .add_resources(["arn:aws:s3:::a/*", "arn:aws:s3:::b/*"]);
        assert_eq!(statement.actions().len(), 2);
        assert_eq!(statement.resources().resources().len(), 2);
    }
}
