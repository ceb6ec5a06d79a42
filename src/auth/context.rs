//! Tenant context resolution.
//!
//! A [`TenantContext`] is built exactly once per request from an already
//! authenticated identity and is then threaded explicitly through every
//! service call. Nothing downstream re-derives the tenant on its own.

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use super::role::Role;

/// Tenant identifier. Never the nil UUID.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TenantId(Uuid);

impl TenantId {
    /// Structural validation only: must be a non-nil UUID.
    pub fn parse(raw: &str) -> Result<Self, ContextError> {
        let uuid = Uuid::parse_str(raw.trim())
            .map_err(|_| ContextError::MalformedTenantId(raw.to_string()))?;
        Self::from_uuid(uuid).ok_or(ContextError::NilTenant)
    }

    pub fn from_uuid(uuid: Uuid) -> Option<Self> {
        if uuid.is_nil() {
            None
        } else {
            Some(Self(uuid))
        }
    }

    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl fmt::Display for TenantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ContextError {
    #[error("Tenant claim is required for role '{0}'")]
    MissingTenant(Role),

    #[error("Tenant claim must not be the nil identifier")]
    NilTenant,

    #[error("Unrecognized role '{0}'")]
    UnknownRole(String),

    #[error("Malformed tenant identifier '{0}'")]
    MalformedTenantId(String),
}

/// Which rows a persistence call may touch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TenantScope {
    Tenant(TenantId),
    /// Cross-tenant access; only reachable from a SuperAdmin context.
    Global,
}

impl TenantScope {
    pub fn tenant(&self) -> Option<TenantId> {
        match self {
            TenantScope::Tenant(id) => Some(*id),
            TenantScope::Global => None,
        }
    }

    /// Whether a row owned by `owner` is inside this scope.
    pub fn contains(&self, owner: Option<TenantId>) -> bool {
        match self {
            TenantScope::Global => true,
            TenantScope::Tenant(id) => owner == Some(*id),
        }
    }
}

/// Per-request acting identity. Fields are private so the
/// "tenant present unless SuperAdmin" invariant holds by construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TenantContext {
    actor_id: Uuid,
    role: Role,
    tenant_id: Option<TenantId>,
}

impl TenantContext {
    /// Build the context from identity claims. Fails closed: an unknown role
    /// or a missing tenant claim never falls back to a default tenant.
    pub fn resolve(actor_id: Uuid, role_claim: &str, tenant_claim: Option<&str>) -> Result<Self, ContextError> {
        let role = Role::parse(role_claim).ok_or_else(|| ContextError::UnknownRole(role_claim.to_string()))?;

        let tenant_claim = tenant_claim.map(str::trim).filter(|t| !t.is_empty());
        let tenant_id = match tenant_claim {
            None => None,
            Some(raw) => match TenantId::parse(raw) {
                Ok(id) => Some(id),
                Err(ContextError::NilTenant) if role.is_super_admin() => None,
                Err(e) => return Err(e),
            },
        };

        if tenant_id.is_none() && !role.is_super_admin() {
            return Err(ContextError::MissingTenant(role));
        }

        Ok(Self { actor_id, role, tenant_id })
    }

    pub fn actor_id(&self) -> Uuid {
        self.actor_id
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn tenant_id(&self) -> Option<TenantId> {
        self.tenant_id
    }

    pub fn is_super_admin(&self) -> bool {
        self.role.is_super_admin()
    }

    /// Persistence scope for this actor. SuperAdmin always operates globally.
    pub fn scope(&self) -> TenantScope {
        match (self.role.is_super_admin(), self.tenant_id) {
            (false, Some(id)) => TenantScope::Tenant(id),
            _ => TenantScope::Global,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tenant() -> String {
        Uuid::new_v4().to_string()
    }

    #[test]
    fn tenant_role_requires_claim() {
        let err = TenantContext::resolve(Uuid::new_v4(), "admin", None).unwrap_err();
        assert_eq!(err, ContextError::MissingTenant(Role::Admin));

        let err = TenantContext::resolve(Uuid::new_v4(), "viewer", Some("  ")).unwrap_err();
        assert_eq!(err, ContextError::MissingTenant(Role::Viewer));
    }

    #[test]
    fn nil_tenant_is_rejected_for_tenant_roles() {
        let nil = Uuid::nil().to_string();
        let err = TenantContext::resolve(Uuid::new_v4(), "manager", Some(&nil)).unwrap_err();
        assert_eq!(err, ContextError::NilTenant);
    }

    #[test]
    fn malformed_tenant_is_bad_request_class() {
        let err = TenantContext::resolve(Uuid::new_v4(), "user", Some("tenant-42")).unwrap_err();
        assert!(matches!(err, ContextError::MalformedTenantId(_)));
    }

    #[test]
    fn unknown_role_fails_closed() {
        let err = TenantContext::resolve(Uuid::new_v4(), "owner", Some(&tenant())).unwrap_err();
        assert!(matches!(err, ContextError::UnknownRole(_)));
    }

    #[test]
    fn super_admin_may_omit_tenant() {
        let ctx = TenantContext::resolve(Uuid::new_v4(), "superadmin", None).unwrap();
        assert!(ctx.tenant_id().is_none());
        assert_eq!(ctx.scope(), TenantScope::Global);

        let nil = Uuid::nil().to_string();
        let ctx = TenantContext::resolve(Uuid::new_v4(), "superadmin", Some(&nil)).unwrap();
        assert!(ctx.tenant_id().is_none());
    }

    #[test]
    fn super_admin_scope_is_global_even_with_claim() {
        let ctx = TenantContext::resolve(Uuid::new_v4(), "superadmin", Some(&tenant())).unwrap();
        assert!(ctx.tenant_id().is_some());
        assert_eq!(ctx.scope(), TenantScope::Global);
    }

    #[test]
    fn tenant_scope_contains_only_its_tenant() {
        let raw = tenant();
        let ctx = TenantContext::resolve(Uuid::new_v4(), "admin", Some(&raw)).unwrap();
        let own = TenantId::parse(&raw).unwrap();
        let other = TenantId::parse(&tenant()).unwrap();

        assert!(ctx.scope().contains(Some(own)));
        assert!(!ctx.scope().contains(Some(other)));
        assert!(!ctx.scope().contains(None));
        assert!(TenantScope::Global.contains(None));
    }
}
