//! Capability model and permission guard
//!
//! Capabilities are names of the form `resource:action`. The `self`
//! resource is special: a self-scoped grant only authorizes requests whose
//! path identifier equals the caller's own UUID. Everything else is a
//! global capability and authorizes on plain name equality.
//!
//! Membership checks are explicit string comparisons over the typed
//! capability list. The scan never deny-short-circuits: a self-scoped
//! mismatch keeps looking for another grant that satisfies the check.

use scoop_core::traits::Id;
use scoop_core::types::UserStatus;
use scoop_models::permission::PermissionGrant;
use uuid::Uuid;

/// A parsed capability name
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Capability {
    /// `resource:action`; applies unconditionally on name match
    Global(String),
    /// `self:action`; valid only against the caller's own resources
    SelfScoped(String),
}

impl Capability {
    pub fn parse(name: &str) -> Self {
        match name.split_once(':') {
            Some(("self", _)) => Capability::SelfScoped(name.to_string()),
            _ => Capability::Global(name.to_string()),
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Capability::Global(name) | Capability::SelfScoped(name) => name,
        }
    }

    pub fn is_self_scoped(&self) -> bool {
        matches!(self, Capability::SelfScoped(_))
    }
}

/// Decide whether `held` satisfies `required`.
///
/// `resource_owner` is the raw `:uuid` path parameter, when the route has
/// one. A self-scoped grant satisfies a requirement only when that
/// parameter equals the caller's UUID string; with no path identifier a
/// self-scoped grant can never satisfy anything.
pub fn satisfies(
    held: &[PermissionGrant],
    required: &[&str],
    identity: &Uuid,
    resource_owner: Option<&str>,
) -> bool {
    let identity = identity.to_string();

    for grant in held {
        for name in required {
            if grant.name() != *name {
                continue;
            }
            match Capability::parse(grant.name()) {
                Capability::Global(_) => return true,
                Capability::SelfScoped(_) => {
                    if resource_owner == Some(identity.as_str()) {
                        return true;
                    }
                    // mismatch is not a deny; other combinations may match
                }
            }
        }
    }

    false
}

/// The authenticated identity attached to request state.
///
/// Built by the session middleware from the identity store on every
/// request; `permissions` is the live grant set, not the token snapshot.
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub id: Id,
    pub uuid: Uuid,
    pub status: UserStatus,
    pub permissions: Vec<PermissionGrant>,
}

impl CurrentUser {
    /// Whether this user satisfies the route's required-capability set
    pub fn can(&self, required: &[&str], resource_owner: Option<&str>) -> bool {
        satisfies(&self.permissions, required, &self.uuid, resource_owner)
    }
}
