//! Bearer token validation.
//!
//! Tokens are HS256 JWTs minted by the identity service. This server never
//! issues them; it checks the signature and expiry and reads the acting user
//! out of [`Claims`].

use backoffice_core::types::DbId;
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};

/// Claims the back office reads from an access token. Other claims are
/// ignored.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// Acting user's id.
    pub sub: DbId,
    /// Role name, e.g. `"admin"`.
    pub role: String,
    /// Expiry as a UTC Unix timestamp.
    pub exp: i64,
}

/// Shared secret used to verify token signatures.
#[derive(Debug, Clone)]
pub struct JwtConfig {
    pub secret: String,
}

impl JwtConfig {
    /// Read `JWT_SECRET`.
    ///
    /// # Panics
    ///
    /// Panics if `JWT_SECRET` is unset or empty.
    pub fn from_env() -> Self {
        let secret =
            std::env::var("JWT_SECRET").expect("JWT_SECRET must be set in the environment");
        assert!(!secret.is_empty(), "JWT_SECRET must not be empty");
        Self { secret }
    }
}

/// Verify `token` and return its claims.
pub fn validate_token(
    token: &str,
    config: &JwtConfig,
) -> Result<Claims, jsonwebtoken::errors::Error> {
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(config.secret.as_bytes()),
        &Validation::new(Algorithm::HS256),
    )
    .map(|data| data.claims)
}
