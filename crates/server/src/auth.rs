//! JWT issuance and verification, plus axum extractors for route gating.

use axum::extract::FromRequestParts;
use axum::http::{header, request::Parts};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

use crate::error::ApiError;
use crate::state::AppState;

/// JWT claims - data stored in the token.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// Subject (username).
    pub sub: String,
    pub is_admin: bool,
    /// Expiration timestamp.
    pub exp: i64,
    /// Issued at timestamp.
    pub iat: i64,
}

/// Creates and verifies JWT tokens (HS256).
#[derive(Clone)]
pub struct JwtService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    expire_minutes: i64,
}

impl JwtService {
    pub fn new(secret: &str, expire_minutes: i64) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            expire_minutes,
        }
    }

    /// Create a new token for a user.
    pub fn create_token(&self, username: &str, is_admin: bool) -> Result<String, jsonwebtoken::errors::Error> {
        let now = chrono::Utc::now();
        let exp = now + chrono::Duration::minutes(self.expire_minutes);

        let claims = Claims {
            sub: username.to_string(),
            is_admin,
            exp: exp.timestamp(),
            iat: now.timestamp(),
        };

        encode(&Header::default(), &claims, &self.encoding_key)
    }

    /// Verify and decode a token. Returns claims if valid and not expired.
    pub fn verify_token(&self, token: &str) -> Result<Claims, jsonwebtoken::errors::Error> {
        decode::<Claims>(token, &self.decoding_key, &Validation::default()).map(|data| data.claims)
    }
}

fn bearer_token(parts: &Parts) -> Result<&str, ApiError> {
    parts
        .headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .ok_or_else(|| ApiError::Unauthorized("missing bearer token".into()))
}

/// Any authenticated user.
pub struct AuthUser(pub Claims);

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let token = bearer_token(parts)?;
        let claims = state
            .jwt
            .verify_token(token)
            .map_err(|e| ApiError::Unauthorized(format!("invalid token: {e}")))?;
        Ok(AuthUser(claims))
    }
}

/// An authenticated admin user.
pub struct AdminUser(pub Claims);

impl FromRequestParts<AppState> for AdminUser {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let AuthUser(claims) = AuthUser::from_request_parts(parts, state).await?;
        if !claims.is_admin {
            return Err(ApiError::Forbidden("admin privileges required".into()));
        }
        Ok(AdminUser(claims))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_and_verify_token() {
        let service = JwtService::new("test_secret_key", 60);
        let token = service.create_token("vendas", true).unwrap();

        let claims = service.verify_token(&token).unwrap();
        assert_eq!(claims.sub, "vendas");
        assert!(claims.is_admin);
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn test_invalid_token() {
        let service = JwtService::new("test_secret_key", 60);
        assert!(service.verify_token("invalid_token").is_err());
    }

    #[test]
    fn test_wrong_secret() {
        let service1 = JwtService::new("secret1", 60);
        let service2 = JwtService::new("secret2", 60);

        let token = service1.create_token("vendas", false).unwrap();
        assert!(service2.verify_token(&token).is_err());
    }

    #[test]
    fn test_token_lifetime_matches_config() {
        let service = JwtService::new("test_secret_key", 60 * 24 * 7);
        let token = service.create_token("vendas", false).unwrap();
        let claims = service.verify_token(&token).unwrap();

        let lifetime = claims.exp - claims.iat;
        assert_eq!(lifetime, 7 * 24 * 3600);
    }

    fn request_parts(auth_header: Option<&str>) -> Parts {
        let mut builder = axum::http::Request::builder().uri("/api/v1/admin/stats");
        if let Some(value) = auth_header {
            builder = builder.header(header::AUTHORIZATION, value);
        }
        builder.body(()).unwrap().into_parts().0
    }

    #[tokio::test]
    async fn test_admin_extractor_accepts_admin_token() {
        let db = salescope_core::CacheDb::open_in_memory().await.unwrap();
        let state = crate::test_support::state(db);
        let token = state.jwt.create_token("vendas", true).unwrap();

        let mut parts = request_parts(Some(&format!("Bearer {token}")));
        let AdminUser(claims) = AdminUser::from_request_parts(&mut parts, &state).await.unwrap();
        assert_eq!(claims.sub, "vendas");
    }

    #[tokio::test]
    async fn test_admin_extractor_rejects_non_admin_token() {
        let db = salescope_core::CacheDb::open_in_memory().await.unwrap();
        let state = crate::test_support::state(db);
        let token = state.jwt.create_token("intern", false).unwrap();

        let mut parts = request_parts(Some(&format!("Bearer {token}")));
        let result = AdminUser::from_request_parts(&mut parts, &state).await;
        assert!(matches!(result, Err(ApiError::Forbidden(_))));
    }

    #[tokio::test]
    async fn test_admin_extractor_rejects_missing_token() {
        let db = salescope_core::CacheDb::open_in_memory().await.unwrap();
        let state = crate::test_support::state(db);

        let mut parts = request_parts(None);
        let result = AdminUser::from_request_parts(&mut parts, &state).await;
        assert!(matches!(result, Err(ApiError::Unauthorized(_))));
    }
}
