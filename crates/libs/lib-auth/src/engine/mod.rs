//! # Auth Engine
//!
//! Orchestrates login, refresh, and identification over the password
//! hasher, the token codec, and the two external collaborators
//! ([`UserDirectory`], [`SessionStore`]).
//!
//! ## Session writes
//!
//! The read-modify-write against the session store (fetch session, extend
//! whitelist, swap refresh token) is guarded by a compare-and-swap keyed on
//! the previously observed refresh token. Two concurrent logins retry until
//! one ordering wins; a refresh that loses the race is rejected as
//! [`AuthError::WrongToken`], matching the superseded-token rule.
//!
//! ## Whitelist
//!
//! The IP whitelist only grows. Whether permanent trust-on-first-use is
//! intentional or a missing revocation feature is an open product question;
//! the engine implements exactly the grow-only semantics.

use std::net::IpAddr;
use std::sync::Arc;

use chrono::Duration;
use lib_core::config::Config;
use lib_core::error::CoreError;
use lib_core::model::store::{SessionStore, UserDirectory};
use lib_core::model::{Credentials, Role, Session};
use lib_utils::validation::validate_not_empty;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::error::{AuthError, Result};
use crate::pwd::verify_password;
use crate::token::{issue_identity, parse_identity};


/// Bounded retries for the login read-modify-write loop. Contention on a
/// single user's session is rare and short-lived.
const SESSION_CAS_RETRIES: u32 = 3;

/// Token pair returned on login and refresh. The refresh token is also
/// mirrored into the session; the access token is never stored.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tokens {
    pub access_token: String,
    pub refresh_token: String,
}

/// Signing keys and lifetimes for the identity token classes.
#[derive(Clone)]
pub struct AuthConfig {
    pub access_secret: String,
    pub refresh_secret: String,
    pub access_ttl: Duration,
    pub refresh_ttl: Duration,
}

impl AuthConfig {
    /// Build the engine configuration from the service configuration.
    pub fn from_core(config: &Config) -> Self {
        Self {
            access_secret: config.access_token_secret.clone(),
            refresh_secret: config.refresh_token_secret.clone(),
            access_ttl: Duration::minutes(config.access_token_ttl_minutes),
            refresh_ttl: Duration::days(config.refresh_token_ttl_days),
        }
    }
}

impl std::fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthConfig")
            .field("access_secret", &"***")
            .field("refresh_secret", &"***")
            .field("access_ttl", &self.access_ttl)
            .field("refresh_ttl", &self.refresh_ttl)
            .finish()
    }
}

/// The authentication engine.
///
/// Stateless apart from the collaborators it holds; safe to share across
/// request handlers.
pub struct AuthEngine {
    users: Arc<dyn UserDirectory>,
    sessions: Arc<dyn SessionStore>,
    config: AuthConfig,
}

impl AuthEngine {
    pub fn new(
        users: Arc<dyn UserDirectory>,
        sessions: Arc<dyn SessionStore>,
        config: AuthConfig,
    ) -> Self {
        Self {
            users,
            sessions,
            config,
        }
    }

    /// Log a user in and return a fresh token pair.
    ///
    /// The client IP joins the session whitelist. Unknown identifier and
    /// wrong password both yield [`AuthError::WrongCredentials`].
    pub async fn get_tokens(&self, credentials: &Credentials, client_ip: IpAddr) -> Result<Tokens> {
        validate_not_empty(&credentials.identifier, "identifier")
            .map_err(AuthError::InvalidCredentials)?;
        validate_not_empty(&credentials.password, "password")
            .map_err(AuthError::InvalidCredentials)?;

        let user = self
            .users
            .find_by_login_or_email(&credentials.identifier)
            .await?
            .ok_or(AuthError::WrongCredentials)?;

        if !verify_password(&credentials.password, &user.password_hash)? {
            warn!(user_id = user.id, "login rejected: password mismatch");
            return Err(AuthError::WrongCredentials);
        }

        let tokens = self.issue_pair(user.id, user.role)?;

        for attempt in 0..SESSION_CAS_RETRIES {
            let (session, expected) = match self.sessions.find(user.id).await? {
                Some(mut existing) => {
                    let expected = existing.refresh_token.clone();
                    existing.refresh_token = tokens.refresh_token.clone();
                    existing.allow(client_ip);
                    (existing, Some(expected))
                }
                None => (
                    Session::new(user.id, tokens.refresh_token.clone(), client_ip),
                    None,
                ),
            };

            if self.sessions.save(&session, expected.as_deref()).await? {
                info!(user_id = user.id, %client_ip, "login succeeded");
                return Ok(tokens);
            }

            debug!(user_id = user.id, attempt, "session write lost a concurrent update, retrying");
        }

        Err(AuthError::Store(CoreError::Conflict(
            "session write kept losing concurrent updates".to_string(),
        )))
    }

    /// Exchange a refresh token for a new token pair, rotating the stored
    /// refresh token.
    ///
    /// Only honored from a whitelisted IP, and only for the exact token the
    /// session currently holds: a superseded refresh token is rejected even
    /// if it has not expired.
    pub async fn refresh_tokens(&self, refresh_token: &str, client_ip: IpAddr) -> Result<Tokens> {
        let claims = parse_identity(refresh_token, &self.config.refresh_secret)?;

        let mut session = match self.sessions.get(claims.sub).await {
            Ok(session) => session,
            Err(CoreError::NotFound(_)) => return Err(AuthError::SessionNotFound),
            Err(err) => return Err(err.into()),
        };

        if !session.is_whitelisted(client_ip) {
            warn!(user_id = claims.sub, %client_ip, "refresh rejected: unknown origin");
            return Err(AuthError::IpNotInWhitelist);
        }

        if session.refresh_token != refresh_token {
            warn!(user_id = claims.sub, "refresh rejected: superseded token");
            return Err(AuthError::WrongToken);
        }

        let tokens = self.issue_pair(claims.sub, claims.role)?;

        session.refresh_token = tokens.refresh_token.clone();
        if !self.sessions.save(&session, Some(refresh_token)).await? {
            // A concurrent rotation replaced the stored token first.
            return Err(AuthError::WrongToken);
        }

        info!(user_id = claims.sub, %client_ip, "refresh rotated session token");
        Ok(tokens)
    }

    /// Identify the caller from an access token.
    ///
    /// Pure parse-and-verify; access tokens are self-contained and no
    /// session lookup happens.
    pub fn identify_user(&self, access_token: &str) -> Result<(i64, Role)> {
        let claims = parse_identity(access_token, &self.config.access_secret)?;
        Ok((claims.sub, claims.role))
    }

    fn issue_pair(&self, user_id: i64, role: Role) -> Result<Tokens> {
        let access_token =
            issue_identity(user_id, role, &self.config.access_secret, self.config.access_ttl)?;
        let refresh_token = issue_identity(
            user_id,
            role,
            &self.config.refresh_secret,
            self.config.refresh_ttl,
        )?;

        Ok(Tokens {
            access_token,
            refresh_token,
        })
    }
}
