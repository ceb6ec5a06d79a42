use clap::Args;
use serde_json::json;
use uuid::Uuid;

use crate::auth::{generate_jwt, Claims, TenantContext};
use crate::cli::utils::output_success;
use crate::cli::OutputFormat;
use crate::config;

#[derive(Args, Debug)]
pub struct TokenArgs {
    #[arg(long, help = "Role claim (superadmin, admin, manager, user, viewer)")]
    pub role: String,

    #[arg(long, help = "Tenant claim; required for every role except superadmin")]
    pub tenant: Option<String>,

    #[arg(long, help = "Subject user id (random if omitted)")]
    pub user: Option<Uuid>,

    #[arg(long, help = "Token lifetime in hours (defaults to SECURITY_JWT_EXPIRY_HOURS)")]
    pub expiry_hours: Option<u64>,
}

pub fn handle(args: TokenArgs, output_format: OutputFormat) -> anyhow::Result<()> {
    let security = &config::config().security;
    let user_id = args.user.unwrap_or_else(Uuid::new_v4);

    // refuse to mint anything the server would reject
    let ctx = TenantContext::resolve(user_id, &args.role, args.tenant.as_deref())?;

    let claims = Claims::new(
        user_id,
        ctx.role().as_str(),
        ctx.tenant_id().map(|t| t.to_string()),
        args.expiry_hours.unwrap_or(security.jwt_expiry_hours),
    );
    let token = generate_jwt(&claims, &security.jwt_secret)?;

    match output_format {
        OutputFormat::Json => output_success(
            &output_format,
            "Token generated",
            Some(json!({
                "token": token,
                "sub": claims.sub,
                "role": claims.role,
                "tenant_id": claims.tenant_id,
                "exp": claims.exp,
            })),
        ),
        OutputFormat::Text => {
            println!("{}", token);
            Ok(())
        }
    }
}
