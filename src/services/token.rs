// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Session token issuing and verification (HS256 JWT).

use chrono::Utc;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// Lifetime of a session token and of the cookie that carries it.
pub const SESSION_TTL_SECS: i64 = 60 * 60;

/// JWT claims structure.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Claims {
    /// Email of the signed-in user
    pub email: String,
    /// Issued at (Unix timestamp)
    pub iat: i64,
    /// Expiration time (Unix timestamp)
    pub exp: i64,
}

/// Signs and checks session tokens with a single server-held secret.
#[derive(Clone)]
pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
}

impl TokenService {
    pub fn new(signing_key: &[u8]) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_required_spec_claims(&["exp", "iat"]);
        // A token is dead the second it expires.
        validation.leeway = 0;

        Self {
            encoding_key: EncodingKey::from_secret(signing_key),
            decoding_key: DecodingKey::from_secret(signing_key),
            validation,
        }
    }

    /// Issue a token for `email`, valid for [`SESSION_TTL_SECS`].
    pub fn issue(&self, email: &str) -> Result<String, AppError> {
        let now = Utc::now().timestamp();
        let claims = Claims {
            email: email.to_string(),
            iat: now,
            exp: now + SESSION_TTL_SECS,
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| AppError::Internal(anyhow::anyhow!("JWT creation failed: {}", e)))
    }

    /// Verify signature and expiry. Any failure is reported as
    /// [`AppError::InvalidToken`].
    pub fn verify(&self, token: &str) -> Result<Claims, AppError> {
        decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| {
                tracing::debug!(error = %e, "Rejected session token");
                AppError::InvalidToken
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const KEY: &[u8] = b"test_signing_key_32_bytes_long!!";

    fn sign(claims: &Claims, key: &[u8]) -> String {
        encode(
            &Header::new(Algorithm::HS256),
            claims,
            &EncodingKey::from_secret(key),
        )
        .unwrap()
    }

    #[test]
    fn test_issue_then_verify() {
        let tokens = TokenService::new(KEY);
        let token = tokens.issue("a@x.com").unwrap();

        let claims = tokens.verify(&token).unwrap();
        assert_eq!(claims.email, "a@x.com");
        assert_eq!(claims.exp - claims.iat, 3600);
    }

    #[test]
    fn test_wrong_key_rejected() {
        let token = TokenService::new(b"another_key").issue("a@x.com").unwrap();
        assert!(matches!(
            TokenService::new(KEY).verify(&token),
            Err(AppError::InvalidToken)
        ));
    }

    #[test]
    fn test_expired_token_rejected() {
        let now = Utc::now().timestamp();
        let token = sign(
            &Claims {
                email: "a@x.com".to_string(),
                iat: now - 7200,
                exp: now - 3600,
            },
            KEY,
        );

        assert!(matches!(
            TokenService::new(KEY).verify(&token),
            Err(AppError::InvalidToken)
        ));
    }

    #[test]
    fn test_just_expired_token_rejected() {
        let now = Utc::now().timestamp();
        let token = sign(
            &Claims {
                email: "a@x.com".to_string(),
                iat: now - 3630,
                exp: now - 30,
            },
            KEY,
        );

        assert!(matches!(
            TokenService::new(KEY).verify(&token),
            Err(AppError::InvalidToken)
        ));
    }

    #[test]
    fn test_garbage_rejected_without_panic() {
        let tokens = TokenService::new(KEY);
        for input in ["", "abc", "a.b.c", "....", "eyJhbGciOiJub25lIn0.e30."] {
            assert!(matches!(tokens.verify(input), Err(AppError::InvalidToken)));
        }
    }

    #[test]
    fn test_alg_none_rejected() {
        // Header {"alg":"none"} with a valid-looking payload and no signature.
        let token = "eyJhbGciOiJub25lIiwidHlwIjoiSldUIn0.eyJlbWFpbCI6ImFAeC5jb20iLCJpYXQiOjEsImV4cCI6OTk5OTk5OTk5OX0.";
        assert!(TokenService::new(KEY).verify(token).is_err());
    }
}
