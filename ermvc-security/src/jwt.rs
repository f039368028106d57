use std::time::Duration;

use ermvc_core::config::MvcConfig;
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, warn};

use crate::error::SecurityError;

/// Lifetime of tokens signed with [`TokenService::sign`].
pub const DEFAULT_TOKEN_TTL: Duration = Duration::from_secs(60 * 60);

/// Signs and verifies HS256 tokens with a shared secret.
///
/// ```ignore
/// let tokens = TokenService::from_config(&config)?;
/// let token = tokens.sign(&json!({ "sub": user.id }))?;
/// let claims = tokens.verify(&token)?;
/// ```
#[derive(Clone)]
pub struct TokenService {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
    default_ttl: Duration,
}

impl TokenService {
    pub fn new(secret: impl AsRef<[u8]>) -> Self {
        let secret = secret.as_ref();
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        validation.validate_aud = false;
        validation.leeway = 0;
        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
            validation,
            default_ttl: DEFAULT_TOKEN_TTL,
        }
    }

    /// Secret from `jwt.secret` (`JWT_SECRET` in the environment).
    pub fn from_config(config: &MvcConfig) -> Result<Self, SecurityError> {
        let secret = config
            .get_str("jwt.secret")
            .ok_or(SecurityError::MissingSecret)?;
        let service = Self::new(secret);
        Ok(match config.get::<u64>("jwt.ttl") {
            Ok(secs) => service.with_default_ttl(Duration::from_secs(secs)),
            Err(_) => service,
        })
    }

    pub fn with_default_ttl(mut self, ttl: Duration) -> Self {
        self.default_ttl = ttl;
        self
    }

    pub fn default_ttl(&self) -> Duration {
        self.default_ttl
    }

    /// Sign `claims` with the default lifetime.
    pub fn sign<C: Serialize>(&self, claims: &C) -> Result<String, SecurityError> {
        self.sign_with_ttl(claims, self.default_ttl)
    }

    /// Sign `claims`, setting `iat` and `exp` (overwriting any given values).
    ///
    /// `claims` must serialize to a JSON object.
    pub fn sign_with_ttl<C: Serialize>(
        &self,
        claims: &C,
        ttl: Duration,
    ) -> Result<String, SecurityError> {
        let mut value = serde_json::to_value(claims)
            .map_err(|e| SecurityError::InvalidClaims(e.to_string()))?;
        let object = value
            .as_object_mut()
            .ok_or_else(|| SecurityError::InvalidClaims("claims must be a JSON object".into()))?;

        let now = chrono::Utc::now().timestamp();
        let ttl = i64::try_from(ttl.as_secs()).unwrap_or(i64::MAX - now);
        object.insert("iat".into(), now.into());
        object.insert("exp".into(), now.saturating_add(ttl).into());

        encode(&Header::new(Algorithm::HS256), &value, &self.encoding)
            .map_err(|e| SecurityError::InvalidClaims(e.to_string()))
    }

    /// Verify signature and expiry, returning the claims.
    pub fn verify(&self, token: &str) -> Result<serde_json::Value, SecurityError> {
        self.verify_as(token)
    }

    pub fn verify_as<T: DeserializeOwned>(&self, token: &str) -> Result<T, SecurityError> {
        let data = decode::<T>(token, &self.decoding, &self.validation).map_err(|e| {
            let err = match e.kind() {
                ErrorKind::ExpiredSignature => SecurityError::TokenExpired,
                _ => SecurityError::InvalidToken(e.to_string()),
            };
            warn!(error = %err, "Token verification failed");
            err
        })?;
        debug!("Token verified");
        Ok(data.claims)
    }
}

impl std::fmt::Debug for TokenService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenService")
            .field("default_ttl", &self.default_ttl)
            .finish_non_exhaustive()
    }
}
