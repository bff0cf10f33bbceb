//! atrium-auth-core - 认证核心库
//!
//! JWT Claims / Token 服务 / 密码哈希。
//! Token 只携带身份，不携带角色：角色在每次请求时从存储实时读取。

mod password;

pub use password::*;

use atrium_common::UserId;
use atrium_errors::{AppError, AppResult};
use chrono::{Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

const ACCESS_TOKEN_TYPE: &str = "access";

/// JWT Claims
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (user ID)
    pub sub: String,
    /// 用户名（仅用于展示和日志）
    #[serde(default)]
    pub username: String,
    /// Expiration time
    pub exp: i64,
    /// Issued at
    pub iat: i64,
    /// JWT ID
    pub jti: String,
    /// Issuer
    #[serde(default)]
    pub iss: String,
    /// Audience
    #[serde(default)]
    pub aud: String,
    /// Token type
    #[serde(default)]
    pub token_type: String,
}

impl Claims {
    pub fn new(
        user_id: &UserId,
        username: &str,
        expires_in_secs: i64,
        issuer: &str,
        audience: &str,
    ) -> Self {
        let now = Utc::now();
        Self {
            sub: user_id.0.to_string(),
            username: username.to_string(),
            exp: (now + Duration::seconds(expires_in_secs)).timestamp(),
            iat: now.timestamp(),
            jti: Uuid::now_v7().to_string(),
            iss: issuer.to_string(),
            aud: audience.to_string(),
            token_type: ACCESS_TOKEN_TYPE.to_string(),
        }
    }

    pub fn user_id(&self) -> AppResult<UserId> {
        Uuid::parse_str(&self.sub)
            .map(UserId::from_uuid)
            .map_err(|_| AppError::unauthenticated("Invalid user ID in token"))
    }

    pub fn is_access_token(&self) -> bool {
        self.token_type == ACCESS_TOKEN_TYPE
    }
}

/// Token 服务
#[derive(Clone)]
pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    access_token_expires_in: i64,
    issuer: String,
    audience: String,
}

impl TokenService {
    pub fn new(
        secret: &str,
        access_token_expires_in: i64,
        issuer: impl Into<String>,
        audience: impl Into<String>,
    ) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            access_token_expires_in,
            issuer: issuer.into(),
            audience: audience.into(),
        }
    }

    /// 生成访问令牌
    pub fn generate_access_token(&self, user_id: &UserId, username: &str) -> AppResult<String> {
        let claims = Claims::new(
            user_id,
            username,
            self.access_token_expires_in,
            &self.issuer,
            &self.audience,
        );

        encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|e| AppError::internal(format!("Failed to generate token: {}", e)))
    }

    /// 验证访问令牌
    pub fn validate_access_token(&self, token: &str) -> AppResult<Claims> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[&self.issuer]);
        validation.set_audience(&[&self.audience]);
        validation.validate_exp = true;
        validation.validate_nbf = false;
        validation.leeway = 0;

        let claims = decode::<Claims>(token, &self.decoding_key, &validation)
            .map_err(|e| AppError::unauthenticated(format!("Invalid token: {}", e)))?
            .claims;

        if claims.jti.is_empty() {
            return Err(AppError::unauthenticated("Token ID (jti) missing"));
        }

        if !claims.is_access_token() {
            return Err(AppError::unauthenticated("Not an access token"));
        }

        Ok(claims)
    }

    /// 获取访问令牌过期时间（秒）
    pub fn access_token_expires_in(&self) -> i64 {
        self.access_token_expires_in
    }
}
