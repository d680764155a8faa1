//! Auth service.

use std::{
    fmt::{Debug, Formatter, Result as FmtResult},
    time::Duration,
};

use async_trait::async_trait;
use jiff::Timestamp;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use mockall::automock;
use serde_json::{Map, Value};

use crate::{auth::AuthServiceError, domain::owners::OwnerId};

/// Claim carrying the owner identifier unless configured otherwise.
pub const DEFAULT_OWNER_CLAIM: &str = "usuarioId";

/// Lifetime of tokens issued at login unless configured otherwise.
pub const DEFAULT_SESSION_TTL: Duration = Duration::from_secs(60 * 60);

/// JWT verification settings.
#[derive(Clone)]
pub struct JwtConfig {
    /// Shared HS256 secret.
    pub secret: String,

    /// Name of the claim holding the owner identifier.
    pub owner_claim: String,

    /// Clock skew tolerated on `exp`/`nbf`, in seconds.
    pub leeway_seconds: u64,

    /// Lifetime of tokens issued at login.
    pub session_ttl: Duration,
}

impl JwtConfig {
    #[must_use]
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
            owner_claim: DEFAULT_OWNER_CLAIM.to_string(),
            leeway_seconds: 0,
            session_ttl: DEFAULT_SESSION_TTL,
        }
    }
}

impl Debug for JwtConfig {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("JwtConfig")
            .field("secret", &"<redacted>")
            .field("owner_claim", &self.owner_claim)
            .field("leeway_seconds", &self.leeway_seconds)
            .field("session_ttl", &self.session_ttl)
            .finish()
    }
}

#[derive(Clone)]
pub struct JwtAuthService {
    config: JwtConfig,
    decoding_key: DecodingKey,
    encoding_key: EncodingKey,
}

impl Debug for JwtAuthService {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("JwtAuthService")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl JwtAuthService {
    #[must_use]
    pub fn new(config: JwtConfig) -> Self {
        Self {
            decoding_key: DecodingKey::from_secret(config.secret.as_bytes()),
            encoding_key: EncodingKey::from_secret(config.secret.as_bytes()),
            config,
        }
    }

    fn validation(&self) -> Validation {
        let mut validation = Validation::new(Algorithm::HS256);

        validation.leeway = self.config.leeway_seconds;

        validation
    }
}

#[async_trait]
impl AuthService for JwtAuthService {
    async fn authenticate_bearer(&self, bearer_token: &str) -> Result<OwnerId, AuthServiceError> {
        let claims = decode::<Value>(bearer_token, &self.decoding_key, &self.validation())
            .map(|data| data.claims)
            .map_err(AuthServiceError::InvalidToken)?;

        claims
            .get(&self.config.owner_claim)
            .and_then(Value::as_str)
            .and_then(|owner| OwnerId::parse(owner).ok())
            .ok_or(AuthServiceError::MissingOwnerClaim)
    }

    fn issue_token(&self, owner: &OwnerId, ttl: Duration) -> Result<String, AuthServiceError> {
        let issued_at = Timestamp::now().as_second();
        let ttl_seconds = i64::try_from(ttl.as_secs()).unwrap_or(i64::MAX);

        let mut claims = Map::new();

        claims.insert(
            self.config.owner_claim.clone(),
            Value::from(owner.as_str()),
        );
        claims.insert("iat".to_string(), Value::from(issued_at));
        claims.insert(
            "exp".to_string(),
            Value::from(issued_at.saturating_add(ttl_seconds)),
        );

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(AuthServiceError::Signing)
    }
}

#[automock]
#[async_trait]
pub trait AuthService: Send + Sync {
    /// Verify a bearer token and return the owner it was issued to.
    async fn authenticate_bearer(&self, bearer_token: &str) -> Result<OwnerId, AuthServiceError>;

    /// Sign a token identifying `owner`, valid for `ttl`.
    fn issue_token(&self, owner: &OwnerId, ttl: Duration) -> Result<String, AuthServiceError>;
}
