//! # Token Codec
//!
//! Encodes and decodes the signed, time-bounded claim sets behind the three
//! token classes: access, refresh, and secret-key. Each class is signed
//! with its own symmetric key, so a leaked key for one class cannot forge
//! another.
//!
//! Parsing accepts HS256 only (a token carrying `none` or an asymmetric
//! algorithm fails as [`TokenError::WrongSignature`]) and re-checks
//! `exp` against the current clock after signature verification, with zero
//! leeway. Expiry is a checked postcondition here, never a library default.

use chrono::Duration;
use jsonwebtoken::{
    decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation,
};
use lib_core::model::Role;
use lib_utils::time::now_unix;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// Lifetime of a secret-key elevation token.
pub const SECRET_KEY_TTL_MINUTES: i64 = 30;

/// Token failure taxonomy. Callers branch on this distinction: an expired
/// token gets a retry-with-refresh path, a wrong one gets a hard reject.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TokenError {
    /// Bad MAC, wrong algorithm, or a corrupt token.
    #[error("token signature is invalid")]
    WrongSignature,

    /// Valid signature, past expiry.
    #[error("token is expired")]
    Expired,

    /// Token could not be created. Never returned from parsing.
    #[error("failed to create token: {0}")]
    Creation(String),
}

/// Claims carried by access and refresh tokens.
///
/// Self-contained: identification needs no store round-trip. The `jti`
/// makes every issued token unique so refresh rotation can distinguish
/// tokens minted within the same second.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IdentityClaims {
    /// Subject (user ID)
    pub sub: i64,
    /// Account role
    pub role: Role,
    /// Issued at time (Unix timestamp)
    pub iat: i64,
    /// Expiration time (Unix timestamp)
    pub exp: i64,
    /// Unique token ID
    pub jti: String,
}

/// Claims carried by a secret-key elevation token, binding exactly one
/// future `(login, email)` pair. Stateless; no server-side record exists.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecretKeyClaims {
    pub login: String,
    pub email: String,
    /// Issued at time (Unix timestamp)
    pub iat: i64,
    /// Expiration time (Unix timestamp)
    pub exp: i64,
}

/// Issue an access or refresh token for a user.
pub fn issue_identity(
    user_id: i64,
    role: Role,
    secret: &str,
    ttl: Duration,
) -> Result<String, TokenError> {
    let now = now_unix();
    let claims = IdentityClaims {
        sub: user_id,
        role,
        iat: now,
        exp: now + ttl.num_seconds(),
        jti: Uuid::new_v4().to_string(),
    };

    encode_claims(&claims, secret)
}

/// Parse and verify an access or refresh token.
pub fn parse_identity(token: &str, secret: &str) -> Result<IdentityClaims, TokenError> {
    let claims: IdentityClaims = decode_claims(token, secret)?;
    check_expiry(claims.exp)?;
    Ok(claims)
}

/// Issue a secret-key elevation token for a `(login, email)` pair.
pub fn issue_secret_key(login: &str, email: &str, secret: &str) -> Result<String, TokenError> {
    let now = now_unix();
    let claims = SecretKeyClaims {
        login: login.to_string(),
        email: email.to_string(),
        iat: now,
        exp: now + Duration::minutes(SECRET_KEY_TTL_MINUTES).num_seconds(),
    };

    encode_claims(&claims, secret)
}

/// Parse and verify a secret-key elevation token.
pub fn parse_secret_key(token: &str, secret: &str) -> Result<SecretKeyClaims, TokenError> {
    let claims: SecretKeyClaims = decode_claims(token, secret)?;
    check_expiry(claims.exp)?;
    Ok(claims)
}

fn encode_claims<T: Serialize>(claims: &T, secret: &str) -> Result<String, TokenError> {
    encode(
        &Header::default(),
        claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| TokenError::Creation(e.to_string()))
}

fn decode_claims<T: DeserializeOwned>(token: &str, secret: &str) -> Result<T, TokenError> {
    // HS256 only, zero leeway. The library's expiry check stays on, and
    // `check_expiry` re-verifies after decoding.
    let mut validation = Validation::new(Algorithm::HS256);
    validation.leeway = 0;

    let token_data = decode::<T>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &validation,
    )
    .map_err(|e| match e.kind() {
        ErrorKind::ExpiredSignature => TokenError::Expired,
        _ => TokenError::WrongSignature,
    })?;

    Ok(token_data.claims)
}

fn check_expiry(exp: i64) -> Result<(), TokenError> {
    if now_unix() >= exp {
        Err(TokenError::Expired)
    } else {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "test-secret-key-must-be-at-least-32-chars-long!";
    const OTHER_SECRET: &str = "another-secret-key-that-is-long-enough-too!";

    #[test]
    fn test_identity_round_trip() {
        let token = issue_identity(42, Role::Moderator, SECRET, Duration::minutes(15))
            .expect("issuing should succeed");
        let claims = parse_identity(&token, SECRET).expect("parsing should succeed");

        assert_eq!(claims.sub, 42);
        assert_eq!(claims.role, Role::Moderator);
        assert_eq!(claims.exp - claims.iat, 15 * 60);
    }

    #[test]
    fn test_issued_tokens_are_unique() {
        let first = issue_identity(1, Role::Customer, SECRET, Duration::days(30)).unwrap();
        let second = issue_identity(1, Role::Customer, SECRET, Duration::days(30)).unwrap();
        assert_ne!(first, second);
    }

    #[test]
    fn test_wrong_key_is_wrong_signature() {
        let token = issue_identity(1, Role::Customer, SECRET, Duration::minutes(15)).unwrap();
        let err = parse_identity(&token, OTHER_SECRET).unwrap_err();
        assert_eq!(err, TokenError::WrongSignature);
    }

    #[test]
    fn test_tampered_token_is_wrong_signature() {
        let token = issue_identity(1, Role::Customer, SECRET, Duration::minutes(15)).unwrap();
        let mut tampered = token.clone();
        // Flip a character in the payload segment.
        let payload_start = token.find('.').unwrap() + 1;
        let original = tampered.remove(payload_start);
        let replacement = if original == 'A' { 'B' } else { 'A' };
        tampered.insert(payload_start, replacement);

        let err = parse_identity(&tampered, SECRET).unwrap_err();
        assert_eq!(err, TokenError::WrongSignature);
    }

    #[test]
    fn test_garbage_token_is_wrong_signature() {
        let err = parse_identity("not.a.token", SECRET).unwrap_err();
        assert_eq!(err, TokenError::WrongSignature);
    }

    #[test]
    fn test_wrong_mac_family_is_rejected() {
        // A token signed with HS384 must not pass HS256-only validation,
        // even with the right key.
        let now = now_unix();
        let claims = IdentityClaims {
            sub: 1,
            role: Role::Customer,
            iat: now,
            exp: now + 600,
            jti: "jti".to_string(),
        };
        let token = encode(
            &Header::new(Algorithm::HS384),
            &claims,
            &EncodingKey::from_secret(SECRET.as_bytes()),
        )
        .unwrap();

        let err = parse_identity(&token, SECRET).unwrap_err();
        assert_eq!(err, TokenError::WrongSignature);
    }

    #[test]
    fn test_expired_token_is_expired_not_wrong() {
        let now = now_unix();
        let claims = IdentityClaims {
            sub: 1,
            role: Role::Customer,
            iat: now - 120,
            exp: now - 60,
            jti: "jti".to_string(),
        };
        let token = encode_claims(&claims, SECRET).unwrap();

        let err = parse_identity(&token, SECRET).unwrap_err();
        assert_eq!(err, TokenError::Expired);
    }

    #[test]
    fn test_token_valid_just_before_expiry() {
        let now = now_unix();
        let claims = IdentityClaims {
            sub: 1,
            role: Role::Customer,
            iat: now - 60,
            exp: now + 5,
            jti: "jti".to_string(),
        };
        let token = encode_claims(&claims, SECRET).unwrap();

        assert!(parse_identity(&token, SECRET).is_ok());
    }

    #[test]
    fn test_secret_key_round_trip_and_ttl() {
        let token = issue_secret_key("bob", "bob@x.com", SECRET).unwrap();
        let claims = parse_secret_key(&token, SECRET).expect("parsing should succeed");

        assert_eq!(claims.login, "bob");
        assert_eq!(claims.email, "bob@x.com");
        assert_eq!(claims.exp - claims.iat, SECRET_KEY_TTL_MINUTES * 60);
    }

    #[test]
    fn test_secret_key_rejects_identity_secret() {
        let token = issue_secret_key("bob", "bob@x.com", SECRET).unwrap();
        let err = parse_secret_key(&token, OTHER_SECRET).unwrap_err();
        assert_eq!(err, TokenError::WrongSignature);
    }
}
