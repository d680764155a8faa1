//! Auth Config

use std::time::Duration;

use clap::Args;
use trolley_app::auth::{DEFAULT_OWNER_CLAIM, JwtConfig};

/// Bearer token verification settings.
#[derive(Debug, Args)]
pub struct AuthConfig {
    /// HS256 secret used to verify bearer tokens
    #[arg(long, env = "JWT_SECRET", hide_env_values = true)]
    pub jwt_secret: String,

    /// Claim carrying the owner identifier
    #[arg(long, env = "JWT_OWNER_CLAIM", default_value = DEFAULT_OWNER_CLAIM)]
    pub jwt_owner_claim: String,

    /// Tolerated clock skew on token expiry, in seconds
    #[arg(long, env = "JWT_LEEWAY_SECONDS", default_value_t = 30_u64)]
    pub jwt_leeway_seconds: u64,

    /// Lifetime of tokens issued by `POST /login`, in seconds
    #[arg(long, env = "SESSION_TTL_SECONDS", default_value_t = 3_600_u64)]
    pub session_ttl_seconds: u64,
}

impl AuthConfig {
    #[must_use]
    pub fn jwt_config(&self) -> JwtConfig {
        JwtConfig {
            secret: self.jwt_secret.clone(),
            owner_claim: self.jwt_owner_claim.clone(),
            leeway_seconds: self.jwt_leeway_seconds,
            session_ttl: Duration::from_secs(self.session_ttl_seconds),
        }
    }
}
