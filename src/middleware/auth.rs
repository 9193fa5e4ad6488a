use axum::{extract::FromRequestParts, http::request::Parts};
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};

use crate::error::ApiError;
use crate::models::auth::{AuthenticatedUser, Claims};

impl<S> FromRequestParts<S> for AuthenticatedUser
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get("Authorization")
            .and_then(|v| v.to_str().ok())
            .ok_or(ApiError::Unauthorized)?;

        let token = auth_header
            .strip_prefix("Bearer ")
            .ok_or(ApiError::Unauthorized)?;

        let secret = parts
            .extensions
            .get::<AuthSecret>()
            .ok_or_else(|| ApiError::Internal(anyhow::anyhow!("Auth secret not configured")))?;

        decode_session_token(token, &secret.0).map_err(|e| {
            tracing::debug!("Rejected session token: {}", e);
            ApiError::Unauthorized
        })
    }
}

/// Extension type to carry the session secret through request extensions.
#[derive(Clone)]
pub struct AuthSecret(pub String);

pub fn decode_session_token(token: &str, secret: &str) -> Result<AuthenticatedUser, anyhow::Error> {
    let key = DecodingKey::from_secret(secret.as_bytes());
    let mut validation = Validation::new(Algorithm::HS256);
    validation.validate_exp = true;

    let data = decode::<Claims>(token, &key, &validation)?;
    let email = data.claims.email.trim().to_lowercase();
    if email.is_empty() {
        anyhow::bail!("Session token carries no email");
    }

    Ok(AuthenticatedUser { email })
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsonwebtoken::{encode, EncodingKey, Header};

    fn token(email: &str, exp_offset: i64, secret: &str) -> String {
        let now = chrono::Utc::now().timestamp();
        let claims = Claims {
            sub: "provider-user-1".into(),
            email: email.into(),
            iat: now as usize,
            exp: (now + exp_offset) as usize,
        };
        encode(&Header::new(Algorithm::HS256), &claims, &EncodingKey::from_secret(secret.as_bytes()))
            .unwrap()
    }

    #[test]
    fn test_decode_valid_token() {
        let user = decode_session_token(&token("Cook@Example.com", 600, "s3cret"), "s3cret").unwrap();
        assert_eq!(user.email, "cook@example.com");
    }

    #[test]
    fn test_decode_rejects_wrong_secret() {
        assert!(decode_session_token(&token("cook@example.com", 600, "s3cret"), "other").is_err());
    }

    #[test]
    fn test_decode_rejects_expired() {
        assert!(decode_session_token(&token("cook@example.com", -3600, "s3cret"), "s3cret").is_err());
    }

    #[test]
    fn test_decode_rejects_blank_email() {
        assert!(decode_session_token(&token("  ", 600, "s3cret"), "s3cret").is_err());
    }
}
