use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use std::sync::Arc;
use tracing::{debug, instrument};

use super::types::TokenClaims;
use crate::config::AppConfig;
use crate::shared::AppError;

/// Configuration for JWT token operations
#[derive(Clone)]
pub struct TokenConfig {
    secret: Arc<str>,
    algorithm: Algorithm,
    pub expiration_minutes: i64,
}

impl TokenConfig {
    pub fn new(secret: &str, algorithm: Algorithm, expiration_minutes: i64) -> Self {
        Self {
            secret: Arc::from(secret),
            algorithm,
            expiration_minutes,
        }
    }

    pub fn from_app_config(config: &AppConfig) -> Self {
        Self::new(
            &config.secret_key,
            config.algorithm,
            config.access_token_expire_minutes,
        )
    }

    /// Creates a signed token for `subject`, expiring after the configured lifetime
    pub fn create_token(&self, subject: &str) -> Result<String, AppError> {
        self.create_token_at(subject, Utc::now())
    }

    /// Same as `create_token` with an explicit issue time
    #[instrument(skip(self, subject))]
    pub fn create_token_at(
        &self,
        subject: &str,
        issued_at: DateTime<Utc>,
    ) -> Result<String, AppError> {
        let exp = (issued_at + Duration::minutes(self.expiration_minutes)).timestamp();

        debug!(
            expiration_minutes = self.expiration_minutes,
            exp_timestamp = exp,
            "Creating JWT token with expiration"
        );

        let claims = TokenClaims {
            sub: subject.to_string(),
            exp: exp.max(0) as usize,
            iat: issued_at.timestamp().max(0) as usize,
        };

        encode(
            &Header::new(self.algorithm),
            &claims,
            &EncodingKey::from_secret(self.secret.as_bytes()),
        )
        .map_err(|e| {
            debug!(error = %e, "Failed to encode JWT token");
            AppError::TokenError(e.to_string())
        })
    }

    /// Validates signature, algorithm and expiry, returning the claims if valid
    #[instrument(skip(self, token))]
    pub fn validate_token(&self, token: &str) -> Result<TokenClaims, AppError> {
        debug!("Decoding and validating JWT token");

        let mut validation = Validation::new(self.algorithm);
        validation.leeway = 0;

        decode::<TokenClaims>(
            token,
            &DecodingKey::from_secret(self.secret.as_bytes()),
            &validation,
        )
        .map(|data| {
            debug!(exp = data.claims.exp, "JWT token decoded successfully");
            data.claims
        })
        .map_err(|e| {
            debug!(error = %e, "Failed to decode JWT token");
            AppError::TokenError(e.to_string())
        })
    }
}
