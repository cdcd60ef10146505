//! JWT token validation and claims extraction.

use std::sync::Arc;

use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode};

use audithub_core::config::auth::AuthConfig;
use audithub_core::error::AppError;
use audithub_core::traits::Clock;

use super::claims::{AccessClaims, RefreshClaims};

/// Validates JWT signatures and extracts claims.
///
/// Holds one decoding key per token kind. A token signed with the wrong
/// secret fails signature validation and is rejected. Expiry is checked
/// against the injected [`Clock`], never the wall clock, so token
/// lifetimes follow the same time source as every other session
/// decision.
#[derive(Clone)]
pub struct JwtDecoder {
    access_key: DecodingKey,
    refresh_key: DecodingKey,
    validation: Validation,
    clock: Arc<dyn Clock>,
}

impl std::fmt::Debug for JwtDecoder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtDecoder").finish_non_exhaustive()
    }
}

impl JwtDecoder {
    /// Creates a new decoder from auth configuration.
    pub fn new(config: &AuthConfig, clock: Arc<dyn Clock>) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        // The library would compare `exp` against the wall clock;
        // expiry is checked against the injected clock instead.
        validation.validate_exp = false;

        Self {
            access_key: DecodingKey::from_secret(config.access_secret.as_bytes()),
            refresh_key: DecodingKey::from_secret(config.refresh_secret.as_bytes()),
            validation,
            clock,
        }
    }

    /// Validates an access token and returns its claims.
    pub fn decode_access(&self, token: &str) -> Result<AccessClaims, AppError> {
        let claims = decode::<AccessClaims>(token, &self.access_key, &self.validation)
            .map(|data| data.claims)
            .map_err(map_jwt_error)?;
        self.check_expiry(claims.exp)?;
        Ok(claims)
    }

    /// Validates a refresh token and returns its claims.
    pub fn decode_refresh(&self, token: &str) -> Result<RefreshClaims, AppError> {
        let claims = decode::<RefreshClaims>(token, &self.refresh_key, &self.validation)
            .map(|data| data.claims)
            .map_err(map_jwt_error)?;
        self.check_expiry(claims.exp)?;
        Ok(claims)
    }

    fn check_expiry(&self, exp: i64) -> Result<(), AppError> {
        if exp <= self.clock.now().timestamp() {
            return Err(AppError::invalid_token("Token has expired"));
        }
        Ok(())
    }
}

fn map_jwt_error(err: jsonwebtoken::errors::Error) -> AppError {
    use jsonwebtoken::errors::ErrorKind as JwtErrorKind;

    match err.kind() {
        JwtErrorKind::InvalidSignature => AppError::invalid_token("Invalid token signature"),
        _ => AppError::invalid_token("Invalid or malformed token"),
    }
}
