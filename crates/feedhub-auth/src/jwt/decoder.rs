//! JWT validation.

use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode};
use tracing::debug;

use feedhub_core::config::AuthConfig;
use feedhub_core::error::AppError;

use super::claims::Claims;

/// Validates bearer tokens against the provider's shared secret.
#[derive(Clone)]
pub struct JwtDecoder {
    /// HMAC secret key for verification.
    decoding_key: DecodingKey,
    /// Validation configuration.
    validation: Validation,
}

impl std::fmt::Debug for JwtDecoder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtDecoder")
            .field("validation", &self.validation)
            .finish()
    }
}

impl JwtDecoder {
    /// Creates a new decoder from auth configuration.
    pub fn new(config: &AuthConfig) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        validation.leeway = config.leeway_seconds;
        validation.set_required_spec_claims(&["exp", "sub"]);
        if config.audience.is_empty() {
            validation.validate_aud = false;
        } else {
            validation.set_audience(&[config.audience.as_str()]);
        }

        Self {
            decoding_key: DecodingKey::from_secret(config.jwt_secret.as_bytes()),
            validation,
        }
    }

    /// Decodes and validates an access token string.
    pub fn decode(&self, token: &str) -> Result<Claims, AppError> {
        let token_data = decode::<Claims>(token, &self.decoding_key, &self.validation).map_err(
            |e| {
                debug!(error = %e, "Rejected bearer token");
                match e.kind() {
                    jsonwebtoken::errors::ErrorKind::ExpiredSignature => {
                        AppError::authentication("Token has expired")
                    }
                    jsonwebtoken::errors::ErrorKind::InvalidSignature => {
                        AppError::authentication("Invalid token signature")
                    }
                    jsonwebtoken::errors::ErrorKind::InvalidAudience => {
                        AppError::authentication("Invalid token audience")
                    }
                    _ => AppError::authentication("Invalid token"),
                }
            },
        )?;

        Ok(token_data.claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::jwt::JwtEncoder;
    use feedhub_core::error::ErrorKind;
    use uuid::Uuid;

    fn config(secret: &str, audience: &str) -> AuthConfig {
        AuthConfig {
            jwt_secret: secret.to_string(),
            audience: audience.to_string(),
            ..AuthConfig::default()
        }
    }

    #[test]
    fn test_round_trip() {
        let config = config("secret", "authenticated");
        let user = Uuid::new_v4();
        let (token, _) = JwtEncoder::new(&config)
            .issue(user, Some("buyer@example.com"))
            .unwrap();

        let claims = JwtDecoder::new(&config).decode(&token).unwrap();
        assert_eq!(claims.user_id(), user);
        assert_eq!(claims.email.as_deref(), Some("buyer@example.com"));
        assert!(!claims.is_expired());
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let (token, _) = JwtEncoder::new(&config("one", "authenticated"))
            .issue(Uuid::new_v4(), None)
            .unwrap();
        let err = JwtDecoder::new(&config("two", "authenticated"))
            .decode(&token)
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Authentication);
    }

    #[test]
    fn test_audience_mismatch_rejected() {
        let (token, _) = JwtEncoder::new(&config("secret", "other"))
            .issue(Uuid::new_v4(), None)
            .unwrap();
        assert!(
            JwtDecoder::new(&config("secret", "authenticated"))
                .decode(&token)
                .is_err()
        );
    }

    #[test]
    fn test_expired_rejected() {
        let mut cfg = config("secret", "");
        cfg.dev_token_ttl_minutes = -10;
        let (token, _) = JwtEncoder::new(&cfg).issue(Uuid::new_v4(), None).unwrap();
        let err = JwtDecoder::new(&cfg).decode(&token).unwrap_err();
        assert_eq!(err.message, "Token has expired");
    }

    #[test]
    fn test_garbage_rejected() {
        let err = JwtDecoder::new(&AuthConfig::default())
            .decode("not-a-token")
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Authentication);
    }
}
