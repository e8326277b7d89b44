//! Principal accumulation
//!
//! Principals are grouped into typed buckets (`AWS`, `Service`, `Federated`,
//! `CanonicalUser`) in first-insertion order, or collapsed into the public
//! wildcard. Principals whose representation is only known to an embedding
//! layer are kept as opaque handles and resolved by [`crate::embedding`].

use std::any::Any;
use std::fmt;
use std::sync::Arc;

use indexmap::{IndexMap, IndexSet};
use serde::{Serialize, Serializer};

/// Key of a typed principal bucket
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PrincipalType {
    Aws,
    Service,
    Federated,
    CanonicalUser,
}

impl PrincipalType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Aws => "AWS",
            Self::Service => "Service",
            Self::Federated => "Federated",
            Self::CanonicalUser => "CanonicalUser",
        }
    }
}

impl fmt::Display for PrincipalType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for PrincipalType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// A principal object owned by an embedding layer.
///
/// The engine never inspects these; a [`crate::embedding::PrincipalResolver`]
/// downcasts them through [`ExternalPrincipal::as_any`].
pub trait ExternalPrincipal: fmt::Debug + Send + Sync {
    fn as_any(&self) -> &dyn Any;
}

/// `arn:<partition>:iam::<account>:root`
pub fn account_root_arn(partition: &str, account: &str) -> String {
    format!("arn:{}:iam::{}:root", partition, account)
}

/// ARN of an IAM entity such as `user/alice` or `role/admin`
pub fn iam_entity_arn(partition: &str, account: &str, kind: &str, name: &str) -> String {
    format!("arn:{}:iam::{}:{}/{}", partition, account, kind, name)
}

/// `arn:<partition>:sts::<account>:assumed-role/<role>/<session>`
pub fn assumed_role_session_arn(
    partition: &str,
    account: &str,
    role: &str,
    session: &str,
) -> String {
    format!(
        "arn:{}:sts::{}:assumed-role/{}/{}",
        partition, account, role, session
    )
}

/// Typed principal buckets, the public sentinel and the negation flag
#[derive(Debug, Clone, Default)]
pub struct PrincipalBuilder {
    buckets: IndexMap<PrincipalType, IndexSet<String>>,
    public: bool,
    external: Vec<Arc<dyn ExternalPrincipal>>,
    negated: bool,
}

impl PrincipalBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a value to its typed bucket; this leaves the public state
    pub fn add(&mut self, principal_type: PrincipalType, value: impl Into<String>) -> bool {
        if self.public {
            log::debug!("Typed principal replaces the public wildcard");
            self.public = false;
        }
        self.buckets
            .entry(principal_type)
            .or_default()
            .insert(value.into())
    }

    /// Switch to the public wildcard, dropping every typed and external entry
    pub fn set_public(&mut self) {
        self.buckets.clear();
        self.external.clear();
        self.public = true;
    }

    /// Record an opaque principal for the embedding layer
    pub fn add_external(&mut self, principal: Arc<dyn ExternalPrincipal>) {
        self.public = false;
        self.external.push(principal);
    }

    pub fn set_negated(&mut self, negated: bool) {
        self.negated = negated;
    }

    pub fn is_negated(&self) -> bool {
        self.negated
    }

    pub fn is_public(&self) -> bool {
        self.public
    }

    /// Values of one bucket, `None` when the type was never added
    pub fn values(&self, principal_type: PrincipalType) -> Option<&IndexSet<String>> {
        self.buckets.get(&principal_type)
    }

    /// Typed buckets in first-insertion order
    pub fn buckets(&self) -> &IndexMap<PrincipalType, IndexSet<String>> {
        &self.buckets
    }

    pub fn external(&self) -> &[Arc<dyn ExternalPrincipal>] {
        &self.external
    }

    /// Whether anything would be serialized without the embedding layer
    pub fn has_principals(&self) -> bool {
        self.public || !self.buckets.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug)]
    struct Marker;

    impl ExternalPrincipal for Marker {
        fn as_any(&self) -> &dyn Any {
            self
        }
    }

    #[test]
    fn test_buckets_keep_insertion_order() {
        let mut builder = PrincipalBuilder::new();
        builder.add(PrincipalType::Service, "ec2.amazonaws.com");
        builder.add(PrincipalType::Aws, "arn:aws:iam::123456789012:root");
        assert!(!builder.add(PrincipalType::Service, "ec2.amazonaws.com"));
        builder.add(PrincipalType::Service, "lambda.amazonaws.com");

        let types: Vec<PrincipalType> = builder.buckets().keys().copied().collect();
        assert_eq!(types, vec![PrincipalType::Service, PrincipalType::Aws]);
        assert_eq!(
            Vec::from_iter(builder.values(PrincipalType::Service).unwrap()),
            ["ec2.amazonaws.com", "lambda.amazonaws.com"]
        );
        assert!(builder.values(PrincipalType::Federated).is_none());
    }

    #[test]
    fn test_public_and_typed_are_exclusive() {
        let mut builder = PrincipalBuilder::new();
        builder.add(PrincipalType::Aws, "111122223333");
        builder.add_external(Arc::new(Marker));
        builder.set_public();
        assert!(builder.is_public());
        assert!(builder.buckets().is_empty());
        assert!(builder.external().is_empty());

        builder.add(PrincipalType::Aws, "111122223333");
        assert!(!builder.is_public());
        assert!(builder.has_principals());
    }

    #[test]
    fn test_external_only_has_no_serializable_principals() {
        let mut builder = PrincipalBuilder::new();
        assert!(!builder.has_principals());
        builder.add_external(Arc::new(Marker));
        assert!(!builder.has_principals());
        assert!(builder.external()[0].as_any().is::<Marker>());
    }

    #[test]
    fn test_arn_helpers() {
        assert_eq!(
            account_root_arn("aws", "123456789012"),
            "arn:aws:iam::123456789012:root"
        );
        assert_eq!(
            iam_entity_arn("aws-cn", "123456789012", "role", "admin"),
            "arn:aws-cn:iam::123456789012:role/admin"
        );
        assert_eq!(
            assumed_role_session_arn("aws", "123456789012", "admin", "alice"),
            "arn:aws:sts::123456789012:assumed-role/admin/alice"
        );
    }
}
