//! Adapter for infrastructure-as-code embedding
//!
//! Statements may hold principals that belong to an embedding layer (a
//! role construct, an account reference...). The engine does not serialize
//! those itself. A [`PrincipalResolver`] turns each of them into typed
//! entries or the public wildcard, and [`resolve_statement`] produces the
//! statement JSON with the resolved principals merged in.

use crate::errors::Result;
use crate::principals::{ExternalPrincipal, PrincipalType};
use crate::statement::{Statement, StatementJson};

/// What an external principal stands for
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolvedPrincipal {
    Public,
    Entries(Vec<(PrincipalType, String)>),
}

/// Resolves principals registered with
/// [`crate::PrincipalCapable::add_external_principal`]
pub trait PrincipalResolver {
    /// # Errors
    ///
    /// Implementations return [`crate::StatementError::PrincipalResolution`]
    /// for principals they do not understand.
    fn resolve(&self, principal: &dyn ExternalPrincipal) -> Result<ResolvedPrincipal>;
}

/// Serialize `statement` with every external principal resolved.
///
/// Resolved entries are appended after the typed principals already on the
/// statement. A principal resolving to [`ResolvedPrincipal::Public`] makes the
/// whole element `"*"`.
pub fn resolve_statement(
    statement: &Statement,
    resolver: &dyn PrincipalResolver,
) -> Result<StatementJson> {
    let mut principals = statement.principals().clone();
    let external = principals.external().to_vec();
    if external.is_empty() {
        return Ok(statement.to_statement_json());
    }

    let mut public = false;
    for principal in &external {
        match resolver.resolve(principal.as_ref())? {
            ResolvedPrincipal::Public => public = true,
            ResolvedPrincipal::Entries(entries) => {
                for (principal_type, value) in entries {
                    principals.add(principal_type, value);
                }
            }
        }
    }
    if public {
        principals.set_public();
    }
    log::debug!("Resolved {} external principal(s)", external.len());

    Ok(statement.render(&principals))
}
