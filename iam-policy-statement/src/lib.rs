//! Builder for IAM policy statements.
//!
//! A [`Statement`] is bound to a service prefix and an [`ActionCatalog`].
//! Fluent calls in any order accumulate actions, resources, conditions and
//! principals; serialization emits the policy grammar deterministically:
//!
//! - `Sid` when set, then `Effect`
//! - `Action` or `NotAction`, a bare string for one entry, otherwise an array
//! - `Resource` or `NotResource`, defaulting to `"*"`
//! - `Principal` or `NotPrincipal` when any principal was added
//! - `Condition` as `operator -> key -> [values]`
//!
//! The engine assembles syntax; it does not check whether an action applies
//! to a resource type. Unknown names pass through unchanged.
//!
//! ```
//! use std::sync::Arc;
//! use iam_policy_statement::{
//!     ActionCapable, ConditionCapable, InMemoryCatalog, ResourceCapable, Statement,
//! };
//!
//! let catalog = InMemoryCatalog::new()
//!     .with_service_json(r#"{"Name": "sqs", "Actions": [{"Name": "SendMessage"}]}"#)
//!     .unwrap();
//! let mut statement = Statement::new("sqs", Arc::new(catalog));
//! statement
//!     .add_action("SendMessage")
//!     .add_raw_arn("arn:aws:sqs:us-east-1:123456789012:jobs")
//!     .if_aws_secure_transport(None);
//! assert_eq!(
//!     statement.to_json().unwrap(),
//!     r#"{"Effect":"Allow","Action":"sqs:SendMessage","Resource":"arn:aws:sqs:us-east-1:123456789012:jobs","Condition":{"Bool":{"aws:SecureTransport":["true"]}}}"#
//! );
//! ```

pub mod actions;
pub mod arn;
pub mod catalog;
pub mod conditions;
pub mod config;
pub mod embedding;
pub mod errors;
pub mod principals;
pub mod resources;
pub mod statement;

pub use actions::ActionSelector;
pub use arn::{ArnContext, ArnTemplate};
pub use catalog::{
    AccessLevel, ActionCatalog, ActionDescriptor, ConditionKeyDescriptor, ConditionKeyType,
    ConditionValueKind, EmptyCatalog, InMemoryCatalog, ResourceTypeTemplate, ServiceCatalog,
};
pub use conditions::{BaseOperator, ConditionBuilder, ConditionValues, Operator, SetQualifier};
pub use config::{ArnDefaults, StatementConfig};
pub use embedding::{resolve_statement, PrincipalResolver, ResolvedPrincipal};
pub use errors::{Result, StatementError};
pub use principals::{ExternalPrincipal, PrincipalBuilder, PrincipalType};
pub use resources::ResourceBuilder;
pub use statement::{
    ActionCapable, ConditionCapable, Effect, OneOrMany, PolicyDocument, PrincipalCapable,
    PrincipalJson, ResourceCapable, Statement, StatementJson,
};
