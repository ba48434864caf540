use axum::{TypedHeader, async_trait, extract::FromRequestParts, http::request::Parts};
use headers::{Authorization, authorization::Bearer};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::AppState;
use crate::config::AuthConfig;
use crate::error::{AppError, AppResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenKind {
    Access,
    Refresh,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String, // username
    pub id: i32,     // user id
    pub kind: TokenKind,
    pub iat: i64,
    pub exp: i64,
    pub jti: String, // JWT ID
}

#[derive(Clone)]
pub struct AuthService {
    config: AuthConfig,
}

impl AuthService {
    pub fn new(config: AuthConfig) -> Self {
        Self { config }
    }

    pub fn access_expires_in(&self) -> u64 {
        self.config.access_token_expires_in
    }

    pub fn generate_access_token(&self, username: &str, user_id: i32) -> AppResult<String> {
        self.issue(
            username,
            user_id,
            TokenKind::Access,
            self.config.access_token_expires_in,
        )
    }

    pub fn generate_refresh_token(&self, username: &str, user_id: i32) -> AppResult<String> {
        self.issue(
            username,
            user_id,
            TokenKind::Refresh,
            self.config.refresh_token_expires_in,
        )
    }

    fn issue(&self, username: &str, user_id: i32, kind: TokenKind, ttl: u64) -> AppResult<String> {
        let now = chrono::Utc::now().timestamp();

        let claims = Claims {
            sub: username.to_string(),
            id: user_id,
            kind,
            iat: now,
            exp: now + ttl as i64,
            jti: uuid::Uuid::new_v4().to_string(),
        };

        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.config.jwt_secret.as_ref()),
        )?;
        Ok(token)
    }

    /// 验证token并检查类型
    pub fn verify_token(&self, token: &str, expected: TokenKind) -> AppResult<Claims> {
        let token_data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.config.jwt_secret.as_ref()),
            &Validation::default(),
        )?;

        let claims = token_data.claims;
        if claims.kind != expected {
            return Err(AppError::auth("Invalid token type"));
        }
        if claims.sub.is_empty() {
            return Err(AppError::auth("Invalid token: missing user data"));
        }
        Ok(claims)
    }
}

/// 当前登录用户（access token）
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub id: i32,
    pub username: String,
}

/// 持有 refresh token 的用户
#[derive(Debug, Clone)]
pub struct RefreshUser {
    pub id: i32,
    pub username: String,
}

async fn bearer_claims(
    parts: &mut Parts,
    state: &Arc<AppState>,
    expected: TokenKind,
) -> AppResult<Claims> {
    let TypedHeader(Authorization(bearer)) =
        TypedHeader::<Authorization<Bearer>>::from_request_parts(parts, state)
            .await
            .map_err(|_| AppError::auth("Missing bearer token"))?;

    state.auth_service.verify_token(bearer.token(), expected)
}

#[async_trait]
impl FromRequestParts<Arc<AppState>> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let claims = bearer_claims(parts, state, TokenKind::Access).await?;
        Ok(Self {
            id: claims.id,
            username: claims.sub,
        })
    }
}

#[async_trait]
impl FromRequestParts<Arc<AppState>> for RefreshUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let claims = bearer_claims(parts, state, TokenKind::Refresh).await?;
        Ok(Self {
            id: claims.id,
            username: claims.sub,
        })
    }
}
