use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde_json::{Map, Value};

use super::{AuthError, Identity};
use crate::config::JwtConfig;

/// Symmetric-key credential codec.
#[derive(Clone)]
pub struct IdentityCodec {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    expiry: Duration,
}

impl std::fmt::Debug for IdentityCodec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IdentityCodec")
            .field("expiry", &self.expiry)
            .finish_non_exhaustive()
    }
}

impl IdentityCodec {
    pub fn new(secret: &str, expiry_hours: i64) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            expiry: Duration::hours(expiry_hours),
        }
    }

    pub fn from_config(config: &JwtConfig) -> Self {
        Self::new(&config.signing_key, config.expiry_hours)
    }

    /// Signs `claims` with HS256. `exp` and `iat` are always overwritten.
    pub fn encode(&self, mut claims: Map<String, Value>) -> Result<String, AuthError> {
        let now = Utc::now();
        claims.insert("exp".to_string(), Value::from((now + self.expiry).timestamp()));
        claims.insert("iat".to_string(), Value::from(now.timestamp()));

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| AuthError::Signing(e.to_string()))
    }

    pub fn encode_identity(&self, identity: &Identity) -> Result<String, AuthError> {
        self.encode(identity.to_claims())
    }

    /// Verifies signature, algorithm family and expiry, returning the raw claims.
    pub fn decode_claims(&self, token: &str) -> Result<Map<String, Value>, AuthError> {
        decode::<Map<String, Value>>(token, &self.decoding_key, &hmac_validation())
            .map(|data| data.claims)
            .map_err(|e| {
                tracing::debug!(kind = ?e.kind(), "token rejected");
                AuthError::InvalidToken
            })
    }

    /// Verifies the token and maps its claims onto an [`Identity`].
    pub fn decode(&self, token: &str) -> Result<Identity, AuthError> {
        let claims = self.decode_claims(token)?;
        Identity::from_claims(&claims)
    }
}

/// Only the HMAC family is accepted.
fn hmac_validation() -> Validation {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.algorithms = vec![Algorithm::HS256, Algorithm::HS384, Algorithm::HS512];
    validation
}
