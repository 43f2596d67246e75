//! # Secret-Key Role Elevation
//!
//! Registering a `MODERATOR` or `ADMINISTRATOR` account requires a
//! secret-key token that an administrator minted out-of-band for exactly
//! that `(login, email)` pair. The token is stateless and expires after 30
//! minutes; verification binds the grant to the identity it was issued
//! for, so it cannot be reused across accounts.
//!
//! Elevation-as-a-bearer-secret is deliberately isolated behind this
//! service so a future flow (e.g. an admin-approval queue) can replace it
//! without touching login or refresh.

use lib_core::model::{Role, UserForCreate};
use lib_utils::validation::{validate_email, validate_login};
use tracing::warn;

use crate::error::{AuthError, Result};
use crate::token::{issue_secret_key, parse_secret_key, TokenError};

/// Issues and verifies secret-key elevation tokens.
pub struct SecretKeyService {
    secret: String,
}

impl SecretKeyService {
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
        }
    }

    /// Mint a 30-minute elevation token bound to `(login, email)`.
    pub fn generate(&self, login: &str, email: &str) -> Result<String> {
        validate_login(login).map_err(AuthError::InvalidUserData)?;
        validate_email(email).map_err(AuthError::InvalidUserData)?;

        Ok(issue_secret_key(login, email, &self.secret)?)
    }

    /// Verify the elevation grant for a candidate registration.
    ///
    /// A no-op for `CUSTOMER`. For elevated roles, a missing token, any
    /// parse failure (expiry included), or a login/email mismatch yields
    /// [`AuthError::WrongSecretKey`].
    pub fn verify(&self, candidate: &UserForCreate, presented: Option<&str>) -> Result<()> {
        if candidate.role == Role::Customer {
            return Ok(());
        }

        validate_login(&candidate.login).map_err(AuthError::InvalidUserData)?;
        validate_email(&candidate.email).map_err(AuthError::InvalidUserData)?;

        let token = presented.ok_or(AuthError::WrongSecretKey)?;

        let claims = parse_secret_key(token, &self.secret).map_err(|err: TokenError| {
            warn!(login = %candidate.login, "secret key rejected: {err}");
            AuthError::WrongSecretKey
        })?;

        if claims.login != candidate.login || claims.email != candidate.email {
            warn!(login = %candidate.login, "secret key bound to a different identity");
            return Err(AuthError::WrongSecretKey);
        }

        Ok(())
    }
}

impl std::fmt::Debug for SecretKeyService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SecretKeyService")
            .field("secret", &"***")
            .finish()
    }
}
