//! ARN template resolution
//!
//! Resource-type templates such as
//! `arn:${Partition}:ec2:${Region}:${Account}:instance/${InstanceId}` carry
//! three well-known placeholders with defaults and any number of
//! resource-specific identifiers that must be supplied by the caller, in the
//! order they first appear in the template.

use std::collections::HashMap;
use std::sync::OnceLock;

use regex::{Captures, Regex};

use crate::config::ArnDefaults;
use crate::errors::{Result, StatementError};

#[allow(clippy::expect_used)]
fn placeholder_regex() -> &'static Regex {
    static PLACEHOLDER: OnceLock<Regex> = OnceLock::new();
    PLACEHOLDER.get_or_init(|| {
        Regex::new(r"\$\{([A-Za-z0-9_\-]+)\}").expect("placeholder pattern is a valid regex")
    })
}

/// A placeholder found in an ARN template
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Placeholder {
    Partition,
    Region,
    Account,
    /// Resource-specific identifier such as `InstanceId`
    Identifier(String),
}

impl Placeholder {
    fn from_name(name: &str) -> Self {
        match name {
            "Partition" => Self::Partition,
            "Region" => Self::Region,
            "Account" | "AccountId" => Self::Account,
            other => Self::Identifier(other.to_string()),
        }
    }
}

/// Overrides for the well-known ARN segments of one templated resource
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ArnContext {
    pub account: Option<String>,
    pub region: Option<String>,
    pub partition: Option<String>,
}

impl ArnContext {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn account(mut self, account: impl Into<String>) -> Self {
        self.account = Some(account.into());
        self
    }

    #[must_use]
    pub fn region(mut self, region: impl Into<String>) -> Self {
        self.region = Some(region.into());
        self
    }

    #[must_use]
    pub fn partition(mut self, partition: impl Into<String>) -> Self {
        self.partition = Some(partition.into());
        self
    }
}

/// A parsed ARN template
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArnTemplate {
    template: String,
    identifiers: Vec<String>,
}

impl ArnTemplate {
    /// Parse a template, collecting its distinct identifier placeholders
    pub fn parse(template: impl Into<String>) -> Self {
        let template = template.into();
        let mut identifiers: Vec<String> = Vec::new();
        for captures in placeholder_regex().captures_iter(&template) {
            if let Placeholder::Identifier(name) = Placeholder::from_name(&captures[1]) {
                if !identifiers.contains(&name) {
                    identifiers.push(name);
                }
            }
        }
        Self {
            template,
            identifiers,
        }
    }

    /// Identifier placeholders in the order values are expected
    pub fn identifiers(&self) -> &[String] {
        &self.identifiers
    }

    /// Substitute every placeholder.
    ///
    /// `resource_type` is only used for error reporting.
    pub fn resolve(
        &self,
        resource_type: &str,
        identifiers: &[&str],
        context: &ArnContext,
        defaults: &ArnDefaults,
    ) -> Result<String> {
        if let Some(missing) = self.identifiers.get(identifiers.len()) {
            return Err(StatementError::missing_arn_segment(resource_type, missing));
        }
        if identifiers.len() > self.identifiers.len() {
            log::debug!(
                "Ignoring {} extra identifier(s) for resource type {}",
                identifiers.len() - self.identifiers.len(),
                resource_type
            );
        }

        let values: HashMap<&str, &str> = self
            .identifiers
            .iter()
            .map(String::as_str)
            .zip(identifiers.iter().copied())
            .collect();

        let resolved = placeholder_regex().replace_all(&self.template, |captures: &Captures<'_>| {
            match Placeholder::from_name(&captures[1]) {
                Placeholder::Partition => context
                    .partition
                    .clone()
                    .unwrap_or_else(|| defaults.partition.clone()),
                Placeholder::Region => context
                    .region
                    .clone()
                    .unwrap_or_else(|| defaults.region.clone()),
                Placeholder::Account => context
                    .account
                    .clone()
                    .unwrap_or_else(|| defaults.account.clone()),
                Placeholder::Identifier(name) => values
                    .get(name.as_str())
                    .map(|value| (*value).to_string())
                    .unwrap_or_default(),
            }
        });

        Ok(resolved.into_owned())
    }
}
