//! # Auth Error Taxonomy
//!
//! All authentication failures as typed values, mapped 1:1 to stable
//! external error codes via [`AuthError::code`]. Nothing here is used for
//! normal control flow; a missing user during login is an expected branch
//! that deliberately collapses into [`AuthError::WrongCredentials`].

use crate::pwd::PwdError;
use crate::token::TokenError;
use lib_core::error::CoreError;
use thiserror::Error;

/// Convenience type alias for `Result<T, AuthError>`.
pub type Result<T> = std::result::Result<T, AuthError>;

#[derive(Debug, Error)]
pub enum AuthError {
    /// Malformed credentials shape, caught before any store access.
    #[error("invalid credentials: {0}")]
    InvalidCredentials(String),

    /// Malformed registration data, caught before any store access.
    #[error("invalid user data: {0}")]
    InvalidUserData(String),

    /// Bad login/password pair. Deliberately indistinguishable from "user
    /// not found" to avoid account enumeration.
    #[error("wrong login or password")]
    WrongCredentials,

    /// Bad signature, wrong algorithm, or a superseded refresh token.
    #[error("wrong token")]
    WrongToken,

    /// Valid signature, past TTL.
    #[error("token is expired")]
    TokenIsExpired,

    /// Refresh attempted for a user with no prior login.
    #[error("session not found")]
    SessionNotFound,

    /// Refresh from an origin that has never completed a login.
    #[error("client ip is not in the session whitelist")]
    IpNotInWhitelist,

    /// Elevation token invalid, expired, or bound to a different identity.
    #[error("wrong secret key")]
    WrongSecretKey,

    /// Collaborator failure, propagated unchanged. No retries happen here;
    /// retry policy belongs to the collaborator or the caller.
    #[error(transparent)]
    Store(#[from] CoreError),

    /// Unexpected internal failure (hashing or token creation).
    #[error("internal error: {0}")]
    Internal(String),
}

impl AuthError {
    /// Stable external error code for transport layers to map onto.
    pub fn code(&self) -> &'static str {
        match self {
            AuthError::InvalidCredentials(_) => "INVALID_CREDENTIALS",
            AuthError::InvalidUserData(_) => "INVALID_USER_DATA",
            AuthError::WrongCredentials => "WRONG_CREDENTIALS",
            AuthError::WrongToken => "WRONG_TOKEN",
            AuthError::TokenIsExpired => "TOKEN_IS_EXPIRED",
            AuthError::SessionNotFound => "SESSION_NOT_FOUND",
            AuthError::IpNotInWhitelist => "IP_NOT_IN_WHITELIST",
            AuthError::WrongSecretKey => "WRONG_SECRET_KEY",
            AuthError::Store(_) | AuthError::Internal(_) => "INTERNAL",
        }
    }
}

impl From<TokenError> for AuthError {
    fn from(err: TokenError) -> Self {
        match err {
            TokenError::WrongSignature => AuthError::WrongToken,
            TokenError::Expired => AuthError::TokenIsExpired,
            TokenError::Creation(msg) => AuthError::Internal(msg),
        }
    }
}

impl From<PwdError> for AuthError {
    fn from(err: PwdError) -> Self {
        AuthError::Internal(err.to_string())
    }
}
