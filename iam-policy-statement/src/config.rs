//! Statement configuration
//!
//! Holds the values substituted for the `${Partition}`, `${Region}` and
//! `${Account}` ARN placeholders when a templated resource call does not
//! supply them. Missing region and account always fall back to the wildcard
//! `*`; the partition falls back to `aws`.

use serde::{Deserialize, Serialize};

use crate::errors::Result;

/// Environment variable overriding the default partition
pub const PARTITION_ENV_VAR: &str = "IAM_POLICY_STATEMENT_PARTITION";
/// Environment variable overriding the default region
pub const REGION_ENV_VAR: &str = "IAM_POLICY_STATEMENT_REGION";
/// Environment variable overriding the default account
pub const ACCOUNT_ENV_VAR: &str = "IAM_POLICY_STATEMENT_ACCOUNT";

/// Wildcard used for every unspecified ARN segment
pub const WILDCARD: &str = "*";

/// Default values for the well-known ARN placeholders
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ArnDefaults {
    pub partition: String,
    pub region: String,
    pub account: String,
}

impl Default for ArnDefaults {
    fn default() -> Self {
        Self {
            partition: "aws".to_string(),
            region: WILDCARD.to_string(),
            account: WILDCARD.to_string(),
        }
    }
}

/// Configuration shared by the statements a caller builds
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct StatementConfig {
    pub arn_defaults: ArnDefaults,
}

impl StatementConfig {
    /// Parse a configuration from JSON. Absent fields keep their defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Default configuration with environment overrides applied
    #[must_use]
    pub fn from_env() -> Self {
        Self::default().with_env_overrides()
    }

    /// Apply the `IAM_POLICY_STATEMENT_*` environment overrides on top of `self`
    #[must_use]
    pub fn with_env_overrides(self) -> Self {
        self.with_overrides(|name| std::env::var(name).ok())
    }

    fn with_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        let apply = |name: &str, slot: &mut String| {
            if let Some(value) = lookup(name).filter(|value| !value.is_empty()) {
                log::debug!("Using {}={} for ARN defaults", name, value);
                *slot = value;
            }
        };
        apply(PARTITION_ENV_VAR, &mut self.arn_defaults.partition);
        apply(REGION_ENV_VAR, &mut self.arn_defaults.region);
        apply(ACCOUNT_ENV_VAR, &mut self.arn_defaults.account);
        self
    }
}
