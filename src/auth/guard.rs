//! Authorization guard consulted before every threshold and alert operation.

use super::context::{TenantContext, TenantId};
use super::role::Role;

/// Coarse operation classes used by the role table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperationClass {
    /// Tenant-scoped reads, threshold checks and statistics.
    Read,
    /// Create / update / delete / activate / resolve.
    Write,
    /// Cross-tenant superadmin endpoints.
    Global,
}

const PERMISSIONS: &[(OperationClass, &[Role])] = &[
    (
        OperationClass::Read,
        &[Role::SuperAdmin, Role::Admin, Role::Manager, Role::User, Role::Viewer],
    ),
    (OperationClass::Write, &[Role::SuperAdmin, Role::Admin, Role::Manager]),
    (OperationClass::Global, &[Role::SuperAdmin]),
];

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Role '{role}' may not perform {class:?} operations")]
pub struct Forbidden {
    pub role: Role,
    pub class: OperationClass,
}

pub fn allowed_roles(class: OperationClass) -> &'static [Role] {
    PERMISSIONS
        .iter()
        .find(|(c, _)| *c == class)
        .map(|(_, roles)| *roles)
        .unwrap_or(&[])
}

/// Role check against the permission table.
pub fn authorize(ctx: &TenantContext, class: OperationClass) -> Result<(), Forbidden> {
    if allowed_roles(class).contains(&ctx.role()) {
        Ok(())
    } else {
        tracing::warn!(actor = %ctx.actor_id(), role = %ctx.role(), ?class, "operation denied by role table");
        Err(Forbidden { role: ctx.role(), class })
    }
}

/// Tenant boundary check. SuperAdmin is always allowed; everyone else only
/// inside their own tenant. An absent target tenant is denied.
pub fn allow(ctx: &TenantContext, target: Option<TenantId>) -> bool {
    if ctx.is_super_admin() {
        return true;
    }
    match (ctx.tenant_id(), target) {
        (Some(own), Some(target)) => own == target,
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn ctx(role: &str, tenant: Option<&str>) -> TenantContext {
        TenantContext::resolve(Uuid::new_v4(), role, tenant).unwrap()
    }

    #[test]
    fn tenant_roles_allowed_only_for_own_tenant() {
        let own = Uuid::new_v4().to_string();
        let other = TenantId::parse(&Uuid::new_v4().to_string()).unwrap();
        for role in ["admin", "manager", "user", "viewer"] {
            let c = ctx(role, Some(&own));
            assert!(allow(&c, c.tenant_id()), "{role} denied own tenant");
            assert!(!allow(&c, Some(other)), "{role} allowed foreign tenant");
            assert!(!allow(&c, None), "{role} allowed tenantless record");
        }
    }

    #[test]
    fn super_admin_always_allowed() {
        let c = ctx("superadmin", None);
        let any = TenantId::parse(&Uuid::new_v4().to_string()).unwrap();
        assert!(allow(&c, Some(any)));
        assert!(allow(&c, None));
    }

    #[test]
    fn write_restricted_to_admin_and_manager() {
        let tenant = Uuid::new_v4().to_string();
        assert!(authorize(&ctx("admin", Some(&tenant)), OperationClass::Write).is_ok());
        assert!(authorize(&ctx("tenant_admin", Some(&tenant)), OperationClass::Write).is_ok());
        assert!(authorize(&ctx("manager", Some(&tenant)), OperationClass::Write).is_ok());
        assert!(authorize(&ctx("superadmin", None), OperationClass::Write).is_ok());

        let denied = authorize(&ctx("viewer", Some(&tenant)), OperationClass::Write).unwrap_err();
        assert_eq!(denied.role, Role::Viewer);
        assert!(authorize(&ctx("user", Some(&tenant)), OperationClass::Write).is_err());
    }

    #[test]
    fn every_role_may_read_but_only_super_admin_is_global() {
        let tenant = Uuid::new_v4().to_string();
        for role in ["admin", "manager", "user", "viewer"] {
            let c = ctx(role, Some(&tenant));
            assert!(authorize(&c, OperationClass::Read).is_ok());
            assert!(authorize(&c, OperationClass::Global).is_err());
        }
        assert!(authorize(&ctx("superadmin", None), OperationClass::Global).is_ok());
    }
}
