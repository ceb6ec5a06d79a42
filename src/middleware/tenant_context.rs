use axum::{extract::Request, middleware::Next, response::Response};

use super::auth::AuthUser;
use crate::auth::guard::{self, OperationClass};
use crate::auth::TenantContext;
use crate::error::ApiError;

/// Resolves the verified identity into a [`TenantContext`], the only tenant
/// value handlers and services ever see.
pub async fn tenant_context_middleware(mut request: Request, next: Next) -> Result<Response, ApiError> {
    let auth_user = request
        .extensions()
        .get::<AuthUser>()
        .cloned()
        .ok_or_else(|| ApiError::unauthorized("JWT authentication required before tenant resolution"))?;

    let ctx = TenantContext::resolve(auth_user.user_id, &auth_user.role, auth_user.tenant_id.as_deref())
        .map_err(|e| {
            tracing::warn!(actor = %auth_user.user_id, error = %e, "tenant context rejected");
            ApiError::from(e)
        })?;

    tracing::debug!(
        actor = %ctx.actor_id(),
        role = %ctx.role(),
        tenant = ?ctx.tenant_id(),
        "tenant context resolved"
    );

    request.extensions_mut().insert(ctx);
    Ok(next.run(request).await)
}

/// Gate for the cross-tenant route group.
pub async fn require_super_admin(request: Request, next: Next) -> Result<Response, ApiError> {
    let ctx = request
        .extensions()
        .get::<TenantContext>()
        .ok_or_else(|| ApiError::unauthorized("Tenant context missing"))?;

    guard::authorize(ctx, OperationClass::Global).map_err(|e| ApiError::forbidden(e.to_string()))?;
    Ok(next.run(request).await)
}
