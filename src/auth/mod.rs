use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config;
use crate::types::Role;

/// Distinguishes the short-lived access credential from the longer-lived
/// refresh credential. Refresh tokens are only accepted by the refresh and
/// logout endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TokenKind {
    Access,
    Refresh,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,
    pub username: String,
    pub role: Role,
    pub kind: TokenKind,
    /// Token id; refresh tokens are tracked by jti in the revocation table.
    pub jti: Uuid,
    pub exp: i64,
    pub iat: i64,
}

impl Claims {
    pub fn access(user_id: Uuid, username: String, role: Role) -> Self {
        let now = Utc::now();
        let ttl_mins = config::config().security.access_token_ttl_mins;
        Self {
            sub: user_id,
            username,
            role,
            kind: TokenKind::Access,
            jti: Uuid::new_v4(),
            exp: (now + Duration::minutes(ttl_mins as i64)).timestamp(),
            iat: now.timestamp(),
        }
    }

    pub fn refresh(user_id: Uuid, username: String, role: Role) -> Self {
        let now = Utc::now();
        let ttl_days = config::config().security.refresh_token_ttl_days;
        Self {
            sub: user_id,
            username,
            role,
            kind: TokenKind::Refresh,
            jti: Uuid::new_v4(),
            exp: (now + Duration::days(ttl_days as i64)).timestamp(),
            iat: now.timestamp(),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum JwtError {
    #[error("JWT generation error: {0}")]
    TokenGeneration(String),
    #[error("Invalid JWT secret")]
    InvalidSecret,
    #[error("Invalid JWT token: {0}")]
    InvalidToken(String),
    #[error("Wrong token kind for this operation")]
    WrongKind,
}

pub fn generate_jwt(claims: &Claims) -> Result<String, JwtError> {
    let secret = &config::config().security.jwt_secret;

    if secret.is_empty() {
        return Err(JwtError::InvalidSecret);
    }

    let encoding_key = EncodingKey::from_secret(secret.as_bytes());
    let header = Header::default();

    encode(&header, claims, &encoding_key).map_err(|e| JwtError::TokenGeneration(e.to_string()))
}

pub fn validate_jwt(token: &str) -> Result<Claims, JwtError> {
    let secret = &config::config().security.jwt_secret;

    if secret.is_empty() {
        return Err(JwtError::InvalidSecret);
    }

    let decoding_key = DecodingKey::from_secret(secret.as_bytes());
    let validation = Validation::default();

    let token_data = decode::<Claims>(token, &decoding_key, &validation)
        .map_err(|e| JwtError::InvalidToken(e.to_string()))?;

    Ok(token_data.claims)
}

/// Validate a token and require it to be of the given kind.
pub fn validate_jwt_kind(token: &str, kind: TokenKind) -> Result<Claims, JwtError> {
    let claims = validate_jwt(token)?;
    if claims.kind != kind {
        return Err(JwtError::WrongKind);
    }
    Ok(claims)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn access_token_round_trips() {
        let user_id = Uuid::new_v4();
        let claims = Claims::access(user_id, "asha".into(), Role::Employee);
        let token = generate_jwt(&claims).unwrap();

        let decoded = validate_jwt_kind(&token, TokenKind::Access).unwrap();
        assert_eq!(decoded.sub, user_id);
        assert_eq!(decoded.username, "asha");
        assert_eq!(decoded.role, Role::Employee);
        assert_eq!(decoded.kind, TokenKind::Access);
    }

    #[test]
    fn refresh_token_rejected_where_access_expected() {
        let claims = Claims::refresh(Uuid::new_v4(), "asha".into(), Role::Hr);
        let token = generate_jwt(&claims).unwrap();

        let err = validate_jwt_kind(&token, TokenKind::Access).unwrap_err();
        assert!(matches!(err, JwtError::WrongKind));
    }

    #[test]
    fn garbage_token_is_invalid() {
        let err = validate_jwt("not-a-token").unwrap_err();
        assert!(matches!(err, JwtError::InvalidToken(_)));
    }

    #[test]
    fn refresh_outlives_access() {
        let access = Claims::access(Uuid::new_v4(), "a".into(), Role::Employee);
        let refresh = Claims::refresh(Uuid::new_v4(), "a".into(), Role::Employee);
        assert!(refresh.exp > access.exp);
    }
}
