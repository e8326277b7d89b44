//! Action selection
//!
//! Resolves builder calls into canonical `prefix:Action` strings. Single
//! names, whole catalogs, access-level slices and regex matches all feed the
//! same insertion-ordered set, so any combination of calls yields the union
//! of the selected actions in first-insertion order.

use indexmap::IndexSet;
use regex::RegexBuilder;

use crate::catalog::{AccessLevel, ActionCatalog, ActionDescriptor};
use crate::errors::{Result, StatementError};

/// Split `name` into a lowercase service prefix and the short name; bare
/// names take the bound service
fn split_action<'a>(service: &str, name: &'a str) -> (String, &'a str) {
    match name.split_once(':') {
        Some((prefix, short_name)) => (prefix.trim().to_ascii_lowercase(), short_name),
        None => (service.to_string(), name),
    }
}

/// Build the canonical action string.
///
/// Explicit prefixes are lowercased. Names added to a statement that is not
/// bound to a service and carry no prefix are kept as given.
pub fn canonical_action(service: &str, name: &str) -> String {
    let (prefix, short_name) = split_action(service, name);
    if prefix.is_empty() {
        short_name.to_string()
    } else {
        format!("{}:{}", prefix, short_name)
    }
}

/// Ordered, deduplicated set of actions plus the negation flag
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ActionSelector {
    actions: IndexSet<String>,
    negated: bool,
}

impl ActionSelector {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one action by short name or `prefix:Name`.
    ///
    /// The catalog spelling is used when the action is known under its
    /// prefix; unknown names pass through with a lowercased prefix.
    pub fn add(&mut self, catalog: &dyn ActionCatalog, service: &str, name: &str) -> bool {
        let (prefix, short_name) = split_action(service, name);
        let canonical = match catalog.lookup_action(&prefix, short_name) {
            Some(descriptor) => canonical_action(&prefix, &descriptor.short_name),
            None => {
                log::debug!("Action {} is not in the catalog for '{}'", name, prefix);
                canonical_action(&prefix, short_name)
            }
        };
        self.actions.insert(canonical)
    }

    /// Add every action the catalog lists for the service
    pub fn add_all(&mut self, catalog: &dyn ActionCatalog, service: &str) -> usize {
        self.add_descriptors(service, catalog.list_actions(service))
    }

    /// Add every action with the given access level
    pub fn add_by_access_level(
        &mut self,
        catalog: &dyn ActionCatalog,
        service: &str,
        level: AccessLevel,
    ) -> usize {
        let matches: Vec<&ActionDescriptor> = catalog
            .list_actions(service)
            .into_iter()
            .filter(|descriptor| descriptor.access_level == level)
            .collect();
        let added = self.add_descriptors(service, matches);
        log::debug!("Added {} {} action(s) for '{}'", added, level, service);
        added
    }

    /// Add every action whose short name matches `pattern`, case-insensitively.
    ///
    /// No match is not an error; the selection simply stays unchanged.
    pub fn add_matching(
        &mut self,
        catalog: &dyn ActionCatalog,
        service: &str,
        pattern: &str,
    ) -> Result<usize> {
        let regex = RegexBuilder::new(pattern)
            .case_insensitive(true)
            .build()
            .map_err(|e| StatementError::invalid_pattern(pattern, e))?;

        let matches: Vec<&ActionDescriptor> = catalog
            .list_actions(service)
            .into_iter()
            .filter(|descriptor| regex.is_match(&descriptor.short_name))
            .collect();
        if matches.is_empty() {
            log::debug!("Pattern /{}/i matched no '{}' actions", pattern, service);
        }
        Ok(self.add_descriptors(service, matches))
    }

    fn add_descriptors(&mut self, service: &str, descriptors: Vec<&ActionDescriptor>) -> usize {
        let before = self.actions.len();
        self.actions.extend(
            descriptors
                .into_iter()
                .map(|descriptor| canonical_action(service, &descriptor.short_name)),
        );
        self.actions.len() - before
    }

    pub fn set_negated(&mut self, negated: bool) {
        self.negated = negated;
    }

    pub fn is_negated(&self) -> bool {
        self.negated
    }

    /// Canonical actions in first-insertion order
    pub fn actions(&self) -> &IndexSet<String> {
        &self.actions
    }

    pub fn len(&self) -> usize {
        self.actions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }
}
