use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, TokenData, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config::Config;
use crate::error::{AppError, AppResult};

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// Username.
    pub sub: String,
    pub exp: i64,
    pub iat: i64,
    pub jti: Uuid,
}

#[derive(Debug, Serialize)]
pub struct AccessToken {
    pub access_token: String,
    pub expires_in: i64,
}

pub fn create_access_token(username: &str, config: &Config) -> AppResult<AccessToken> {
    let now = Utc::now();
    let claims = Claims {
        sub: username.to_string(),
        exp: (now + Duration::seconds(config.jwt_ttl_secs)).timestamp(),
        iat: now.timestamp(),
        jti: Uuid::new_v4(),
    };

    let access_token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(config.jwt_secret.as_bytes()),
    )
    .map_err(|e| AppError::Internal(anyhow::anyhow!("Failed to create access token: {}", e)))?;

    Ok(AccessToken {
        access_token,
        expires_in: config.jwt_ttl_secs,
    })
}

pub fn verify_token(token: &str, config: &Config) -> AppResult<TokenData<Claims>> {
    let mut validation = Validation::default();
    validation.validate_exp = true;

    decode::<Claims>(
        token,
        &DecodingKey::from_secret(config.jwt_secret.as_bytes()),
        &validation,
    )
    .map_err(|_| AppError::Unauthorized)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_roundtrip() {
        let config = Config::for_tests("/tmp/unused");
        let token = create_access_token("alice", &config).unwrap();
        let data = verify_token(&token.access_token, &config).unwrap();
        assert_eq!(data.claims.sub, "alice");
        assert_eq!(token.expires_in, 3600);
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let config = Config::for_tests("/tmp/unused");
        let token = create_access_token("alice", &config).unwrap();

        let mut other = config.clone();
        other.jwt_secret = "another-secret".into();
        assert!(matches!(
            verify_token(&token.access_token, &other),
            Err(AppError::Unauthorized)
        ));
    }

    #[test]
    fn test_expired_token_rejected() {
        let mut config = Config::for_tests("/tmp/unused");
        config.jwt_ttl_secs = -600;
        let token = create_access_token("alice", &config).unwrap();
        assert!(verify_token(&token.access_token, &config).is_err());
    }
}
