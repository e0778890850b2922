//! Bearer token 校验
//!
//! 令牌由外部认证服务使用共享密钥（HS256）签发，本服务只负责校验。
//! 签发函数用于启动时的管理员引导令牌和测试。

use crate::config::AppConfig;
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

pub const ACCESS_TOKEN_TYPE: &str = "access";

// JWT Claims 结构体
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,        // Subject (user ID)
    pub role: String,       // 用户角色
    pub token_type: String, // token类型，只接受 "access"
    pub exp: usize,         // Expiration time (时间戳)
    pub iat: usize,         // Issued at (签发时间)
}

impl Claims {
    pub fn user_id(&self) -> Option<i64> {
        self.sub.parse().ok()
    }
}

pub struct JwtUtils;

impl JwtUtils {
    // 获取 JWT 密钥
    fn get_secret() -> String {
        AppConfig::get().jwt.secret.clone()
    }

    // 生成 Access Token
    pub fn generate_access_token(
        user_id: i64,
        role: &str,
    ) -> Result<String, jsonwebtoken::errors::Error> {
        let config = AppConfig::get();
        Self::generate_token_with_secret(
            &Self::get_secret(),
            user_id,
            role,
            chrono::Duration::minutes(config.jwt.access_token_expiry),
        )
    }

    pub fn generate_token_with_secret(
        secret: &str,
        user_id: i64,
        role: &str,
        expiry_duration: chrono::Duration,
    ) -> Result<String, jsonwebtoken::errors::Error> {
        let now = chrono::Utc::now();
        let expiration = now + expiry_duration;

        let claims = Claims {
            sub: user_id.to_string(),
            role: role.to_string(),
            token_type: ACCESS_TOKEN_TYPE.to_string(),
            exp: expiration.timestamp() as usize,
            iat: now.timestamp() as usize,
        };

        let encoding_key = EncodingKey::from_secret(secret.as_ref());
        encode(&Header::default(), &claims, &encoding_key)
    }

    // 验证 Access Token
    pub fn verify_access_token(token: &str) -> Result<Claims, jsonwebtoken::errors::Error> {
        Self::verify_with_secret(&Self::get_secret(), token)
    }

    pub fn verify_with_secret(
        secret: &str,
        token: &str,
    ) -> Result<Claims, jsonwebtoken::errors::Error> {
        let decoding_key = DecodingKey::from_secret(secret.as_ref());
        let validation = Validation::default();

        let claims =
            decode::<Claims>(token, &decoding_key, &validation).map(|token_data| token_data.claims)?;
        if claims.token_type != ACCESS_TOKEN_TYPE {
            return Err(jsonwebtoken::errors::Error::from(
                jsonwebtoken::errors::ErrorKind::InvalidToken,
            ));
        }
        Ok(claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "test-secret-with-enough-length";

    #[test]
    fn test_issue_and_verify() {
        let token =
            JwtUtils::generate_token_with_secret(SECRET, 42, "teacher", chrono::Duration::minutes(5))
                .unwrap();
        let claims = JwtUtils::verify_with_secret(SECRET, &token).unwrap();
        assert_eq!(claims.user_id(), Some(42));
        assert_eq!(claims.role, "teacher");
        assert_eq!(claims.token_type, ACCESS_TOKEN_TYPE);
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let token =
            JwtUtils::generate_token_with_secret(SECRET, 1, "admin", chrono::Duration::minutes(5))
                .unwrap();
        assert!(JwtUtils::verify_with_secret("another-secret", &token).is_err());
    }

    #[test]
    fn test_expired_token_rejected() {
        let token =
            JwtUtils::generate_token_with_secret(SECRET, 1, "admin", chrono::Duration::hours(-2))
                .unwrap();
        assert!(JwtUtils::verify_with_secret(SECRET, &token).is_err());
    }

    #[test]
    fn test_non_access_token_rejected() {
        let now = chrono::Utc::now();
        let claims = Claims {
            sub: "1".into(),
            role: "admin".into(),
            token_type: "refresh".into(),
            exp: (now + chrono::Duration::minutes(5)).timestamp() as usize,
            iat: now.timestamp() as usize,
        };
        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(SECRET.as_ref()),
        )
        .unwrap();
        assert!(JwtUtils::verify_with_secret(SECRET, &token).is_err());
    }
}
