pub mod auth;
pub mod response;
pub mod tenant_context;

pub use auth::{jwt_auth_middleware, AuthUser};
pub use response::{ApiResponse, ApiResult};
pub use tenant_context::{require_super_admin, tenant_context_middleware};
