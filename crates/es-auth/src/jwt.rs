//! JWT token service
//!
//! The identity collaborator: resolves an opaque bearer token to
//! `(user id, role)`. Claims carry the role name so authorization never
//! needs a database round trip.

use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use es_core::traits::Id;
use es_models::role::Role;

use crate::principal::Principal;

/// JWT claims
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (user ID)
    pub sub: String,
    /// Expiration time (Unix timestamp)
    pub exp: usize,
    /// Issued at (Unix timestamp)
    pub iat: usize,
    /// Role name as stored (e.g. "LIDER_PROJETOS")
    pub role: String,
    /// Login name
    #[serde(skip_serializing_if = "Option::is_none")]
    pub login: Option<String>,
}

/// JWT errors
#[derive(Debug, Error)]
pub enum JwtError {
    #[error("Token is expired")]
    Expired,
    #[error("Invalid token: {0}")]
    Invalid(String),
    #[error("Missing token")]
    Missing,
    #[error("Token encoding failed: {0}")]
    EncodingFailed(String),
}

/// Service for minting and validating tokens
pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
}

impl TokenService {
    pub fn new(secret: &[u8]) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
        }
    }

    /// Mint a token for a user
    pub fn issue(
        &self,
        user_id: Id,
        login: &str,
        role: Role,
        expires_in_seconds: u64,
    ) -> Result<String, JwtError> {
        let now = chrono::Utc::now().timestamp() as usize;
        let claims = Claims {
            sub: user_id.to_string(),
            exp: now + expires_in_seconds as usize,
            iat: now,
            role: role.as_str().to_string(),
            login: Some(login.to_string()),
        };

        encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|e| JwtError::EncodingFailed(e.to_string()))
    }

    /// Validate a token and resolve the caller principal
    pub fn resolve(&self, token: &str) -> Result<Principal, JwtError> {
        let data = decode::<Claims>(token, &self.decoding_key, &Validation::default())
            .map_err(|e| match e.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => JwtError::Expired,
                _ => JwtError::Invalid(e.to_string()),
            })?;

        let claims = data.claims;
        let user_id: Id = claims
            .sub
            .parse()
            .map_err(|_| JwtError::Invalid(format!("bad subject: {}", claims.sub)))?;
        let role = Role::parse(&claims.role)
            .ok_or_else(|| JwtError::Invalid(format!("unknown role: {}", claims.role)))?;

        Ok(Principal::new(
            user_id,
            claims.login.unwrap_or_else(|| format!("user_{}", user_id)),
            role,
        ))
    }
}

/// Extract the token from an `Authorization: Bearer ...` header value
pub fn extract_bearer_token(header: &str) -> Option<&str> {
    let (scheme, token) = header.split_once(' ')?;
    if scheme.eq_ignore_ascii_case("bearer") && !token.is_empty() {
        Some(token)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &[u8] = b"test-secret-key-at-least-32-bytes";

    #[test]
    fn test_issue_and_resolve() {
        let service = TokenService::new(SECRET);
        let token = service
            .issue(42, "lead", Role::LiderProjetos, 3600)
            .unwrap();

        let principal = service.resolve(&token).unwrap();
        assert_eq!(principal.id, 42);
        assert_eq!(principal.username, "lead");
        assert_eq!(principal.role, Role::LiderProjetos);
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let service = TokenService::new(SECRET);
        let token = service.issue(1, "u", Role::Admin, 3600).unwrap();

        let other = TokenService::new(b"another-secret-also-32-bytes-long");
        assert!(matches!(other.resolve(&token), Err(JwtError::Invalid(_))));
    }

    #[test]
    fn test_extract_bearer_token() {
        assert_eq!(extract_bearer_token("Bearer abc.def.ghi"), Some("abc.def.ghi"));
        assert_eq!(extract_bearer_token("bearer tok"), Some("tok"));
        assert_eq!(extract_bearer_token("Basic dXNlcg=="), None);
        assert_eq!(extract_bearer_token("Bearer"), None);
    }
}
