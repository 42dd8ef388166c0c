// ABOUTME: Session token issuance and verification
// ABOUTME: HS256 JWTs carrying the account id and role, valid for 24 hours

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use subtle::ConstantTimeEq;
use tracing::debug;

use crate::error::AuthError;
use crate::types::Role;

pub const TOKEN_TTL_HOURS: i64 = 24;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub role: Role,
    pub iat: i64,
    pub exp: i64,
}

/// Signs and checks session tokens with a shared secret.
#[derive(Clone)]
pub struct TokenService {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
}

impl TokenService {
    pub fn new(secret: &[u8]) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        validation.leeway = 0;

        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
            validation,
        }
    }

    pub fn issue(&self, user_id: &str, role: Role) -> Result<String, AuthError> {
        let now = Utc::now();
        let claims = Claims {
            sub: user_id.to_string(),
            role,
            iat: now.timestamp(),
            exp: (now + Duration::hours(TOKEN_TTL_HOURS)).timestamp(),
        };
        Ok(encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)?)
    }

    pub fn verify(&self, token: &str) -> Result<Claims, AuthError> {
        decode::<Claims>(token, &self.decoding, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| {
                debug!("Rejected session token: {}", e);
                AuthError::InvalidToken
            })
    }

    pub fn ttl_seconds(&self) -> i64 {
        Duration::hours(TOKEN_TTL_HOURS).num_seconds()
    }
}

/// Compare two secrets without leaking where they differ.
pub fn constant_time_eq(a: &str, b: &str) -> bool {
    a.as_bytes().ct_eq(b.as_bytes()).into()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_issue_and_verify_round_trip() {
        let tokens = TokenService::new(b"test-secret");
        let token = tokens.issue("dnr-123", Role::Donor).unwrap();

        let claims = tokens.verify(&token).unwrap();
        assert_eq!(claims.sub, "dnr-123");
        assert_eq!(claims.role, Role::Donor);
        assert_eq!(claims.exp - claims.iat, tokens.ttl_seconds());
    }

    #[test]
    fn test_token_from_other_secret_is_rejected() {
        let ours = TokenService::new(b"ours");
        let theirs = TokenService::new(b"theirs");
        let token = theirs.issue("rcv-1", Role::Receiver).unwrap();

        assert!(matches!(ours.verify(&token), Err(AuthError::InvalidToken)));
        assert!(matches!(ours.verify("garbage"), Err(AuthError::InvalidToken)));
    }

    #[test]
    fn test_expired_token_is_rejected() {
        let tokens = TokenService::new(b"secret");
        let past = Utc::now() - Duration::hours(1);
        let claims = Claims {
            sub: "rcv-1".to_string(),
            role: Role::Receiver,
            iat: (past - Duration::hours(1)).timestamp(),
            exp: past.timestamp(),
        };
        let token = encode(&Header::new(Algorithm::HS256), &claims, &tokens.encoding).unwrap();

        assert!(matches!(tokens.verify(&token), Err(AuthError::InvalidToken)));
    }

    #[test]
    fn test_constant_time_eq() {
        assert!(constant_time_eq("admin-token", "admin-token"));
        assert!(!constant_time_eq("admin-token", "admin-tokem"));
        assert!(!constant_time_eq("short", "longer-value"));
    }
}
