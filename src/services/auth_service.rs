use chrono::{Duration, Utc};
use serde::Serialize;
use sqlx::PgPool;
use tracing::{info, warn};

use super::ServiceError;
use crate::auth::{self, Claims, TokenKind};
use crate::config;
use crate::database::models::{RefreshToken, User};
use crate::database::DatabaseManager;
use crate::types::Role;

/// Which accounts a login entry point accepts. The HR entry point
/// additionally requires the HR role; the regular one takes any account.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoginGate {
    HrOnly,
    AnyRole,
}

#[derive(Debug, Serialize)]
pub struct LoginOutcome {
    pub access_token: String,
    pub refresh_token: String,
    pub expires_in: i64,
    pub user: User,
}

#[derive(Debug, Serialize)]
pub struct AccessGrant {
    pub access_token: String,
    pub expires_in: i64,
}

pub struct AuthService {
    pool: PgPool,
}

impl AuthService {
    pub async fn new() -> Result<Self, ServiceError> {
        Ok(Self {
            pool: DatabaseManager::pool().await?,
        })
    }

    /// Verify credentials and issue an access/refresh token pair.
    ///
    /// All failure paths (unknown username, wrong password, role mismatch on
    /// the HR entry point) collapse into AuthenticationFailed so the
    /// response never reveals whether the username exists.
    pub async fn login(
        &self,
        username: &str,
        password: &str,
        gate: LoginGate,
    ) -> Result<LoginOutcome, ServiceError> {
        let user: Option<User> = sqlx::query_as("SELECT * FROM users WHERE username = $1")
            .bind(username)
            .fetch_optional(&self.pool)
            .await?;

        let user = user.ok_or(ServiceError::AuthenticationFailed)?;

        let password_ok = user
            .verify_password(password)
            .map_err(|e| ServiceError::Internal(format!("password verification failed: {e}")))?;
        if !password_ok {
            return Err(ServiceError::AuthenticationFailed);
        }

        if gate == LoginGate::HrOnly && user.role != Role::Hr {
            warn!(username = %user.username, "HR login attempt by non-HR account");
            return Err(ServiceError::AuthenticationFailed);
        }

        self.issue_tokens(user).await
    }

    async fn issue_tokens(&self, user: User) -> Result<LoginOutcome, ServiceError> {
        let security = &config::config().security;
        let now = Utc::now();

        let access = Claims::access(user.id, user.username.clone(), user.role);
        let refresh = Claims::refresh(user.id, user.username.clone(), user.role);

        sqlx::query(
            "INSERT INTO refresh_tokens (jti, user_id, issued_at, expires_at) VALUES ($1, $2, $3, $4)",
        )
        .bind(refresh.jti)
        .bind(user.id)
        .bind(now)
        .bind(now + Duration::days(security.refresh_token_ttl_days as i64))
        .execute(&self.pool)
        .await?;

        let access_token = auth::generate_jwt(&access)?;
        let refresh_token = auth::generate_jwt(&refresh)?;

        info!(user_id = %user.id, username = %user.username, "user logged in");

        Ok(LoginOutcome {
            access_token,
            refresh_token,
            expires_in: security.access_token_ttl_mins as i64 * 60,
            user,
        })
    }

    /// Exchange a live refresh token for a fresh access token. The role is
    /// re-read from the database rather than trusted from the old claims.
    pub async fn refresh(&self, refresh_token: &str) -> Result<AccessGrant, ServiceError> {
        let claims = auth::validate_jwt_kind(refresh_token, TokenKind::Refresh)?;

        let record: Option<RefreshToken> =
            sqlx::query_as("SELECT * FROM refresh_tokens WHERE jti = $1")
                .bind(claims.jti)
                .fetch_optional(&self.pool)
                .await?;

        let record = record.ok_or(ServiceError::AuthenticationFailed)?;
        if !record.is_usable(Utc::now()) {
            warn!(jti = %claims.jti, "refresh attempted with revoked or expired token");
            return Err(ServiceError::AuthenticationFailed);
        }

        let user: Option<User> = sqlx::query_as("SELECT * FROM users WHERE id = $1")
            .bind(record.user_id)
            .fetch_optional(&self.pool)
            .await?;
        let user = user.ok_or(ServiceError::AuthenticationFailed)?;

        let access = Claims::access(user.id, user.username.clone(), user.role);
        Ok(AccessGrant {
            access_token: auth::generate_jwt(&access)?,
            expires_in: config::config().security.access_token_ttl_mins as i64 * 60,
        })
    }

    /// One-way revocation of a refresh token. Reuse after revocation fails.
    pub async fn logout(&self, refresh_token: &str) -> Result<(), ServiceError> {
        let claims = auth::validate_jwt_kind(refresh_token, TokenKind::Refresh)
            .map_err(|_| ServiceError::validation("invalid refresh token"))?;

        let result =
            sqlx::query("UPDATE refresh_tokens SET revoked_at = now() WHERE jti = $1 AND revoked_at IS NULL")
                .bind(claims.jti)
                .execute(&self.pool)
                .await?;

        if result.rows_affected() == 0 {
            return Err(ServiceError::validation("refresh token unknown or already revoked"));
        }

        info!(user_id = %claims.sub, "refresh token revoked");
        Ok(())
    }
}
