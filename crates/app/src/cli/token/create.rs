use std::time::Duration;

use clap::Args;
use trolley_app::{
    auth::{AuthService, DEFAULT_OWNER_CLAIM, JwtAuthService, JwtConfig},
    domain::owners::OwnerId,
};

#[derive(Debug, Args)]
pub(crate) struct CreateTokenArgs {
    /// Owner the token identifies
    #[arg(long)]
    owner: String,

    /// HS256 signing secret
    #[arg(long, env = "JWT_SECRET", hide_env_values = true)]
    jwt_secret: String,

    /// Claim carrying the owner identifier
    #[arg(long, env = "JWT_OWNER_CLAIM", default_value = DEFAULT_OWNER_CLAIM)]
    owner_claim: String,

    /// Token lifetime in seconds
    #[arg(long, default_value_t = 3600)]
    ttl_seconds: u64,
}

pub(crate) fn run(args: CreateTokenArgs) -> Result<(), String> {
    let owner = OwnerId::parse(args.owner).map_err(|error| format!("invalid owner: {error}"))?;

    let service = JwtAuthService::new(JwtConfig {
        owner_claim: args.owner_claim,
        ..JwtConfig::new(args.jwt_secret)
    });

    let token = service
        .issue_token(&owner, Duration::from_secs(args.ttl_seconds))
        .map_err(|error| format!("failed to create token: {error}"))?;

    println!("owner: {owner}");
    println!("expires_in_seconds: {}", args.ttl_seconds);
    println!("token: {token}");

    Ok(())
}
