//! # Domain Model
//!
//! Identity records, credentials, and session state for the authentication
//! subsystem.

// region: --- Modules
pub mod store;
// endregion: --- Modules

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::fmt;
use std::net::IpAddr;

/// Account role. Non-customer roles require a secret-key elevation token
/// at registration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    Customer,
    Moderator,
    Administrator,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::Customer => write!(f, "CUSTOMER"),
            Role::Moderator => write!(f, "MODERATOR"),
            Role::Administrator => write!(f, "ADMINISTRATOR"),
        }
    }
}

impl std::str::FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "CUSTOMER" => Ok(Role::Customer),
            "MODERATOR" => Ok(Role::Moderator),
            "ADMINISTRATOR" => Ok(Role::Administrator),
            _ => Err(format!("invalid role: {}", s)),
        }
    }
}

impl TryFrom<String> for Role {
    type Error = String;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

/// User entity representing a complete identity record from the directory.
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: i64,
    #[sqlx(try_from = "String")]
    pub role: Role,
    pub login: String,
    pub email: String,
    pub password_hash: String,
    pub name: String,
    pub region: String,
    pub birth_date: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Data for registering a new user.
///
/// The password must already be hashed; plaintext never reaches the
/// directory.
#[derive(Debug, Clone)]
pub struct UserForCreate {
    pub role: Role,
    pub login: String,
    pub email: String,
    pub password_hash: String,
    pub name: String,
    pub region: String,
    pub birth_date: Option<NaiveDate>,
}

/// Transient login input: a login-or-email identifier plus plaintext
/// password. Never persisted; `Debug` redacts the password.
#[derive(Clone)]
pub struct Credentials {
    pub identifier: String,
    pub password: String,
}

impl Credentials {
    pub fn new(identifier: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            identifier: identifier.into(),
            password: password.into(),
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("identifier", &self.identifier)
            .field("password", &"***")
            .finish()
    }
}

/// Per-user session state: the currently valid refresh token and the
/// whitelist of client IPs that have completed a login.
///
/// At most one session exists per user. The whitelist only grows; there is
/// no device revocation path in the current product design.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub user_id: i64,
    pub refresh_token: String,
    pub ip_whitelist: Vec<IpAddr>,
}

impl Session {
    /// Start a session for a first login from `first_ip`.
    pub fn new(user_id: i64, refresh_token: impl Into<String>, first_ip: IpAddr) -> Self {
        Self {
            user_id,
            refresh_token: refresh_token.into(),
            ip_whitelist: vec![first_ip],
        }
    }

    pub fn is_whitelisted(&self, ip: IpAddr) -> bool {
        self.ip_whitelist.contains(&ip)
    }

    /// Append `ip` to the whitelist if it is not already present.
    pub fn allow(&mut self, ip: IpAddr) {
        if !self.is_whitelisted(ip) {
            self.ip_whitelist.push(ip);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ip(s: &str) -> IpAddr {
        s.parse().expect("test IP should parse")
    }

    #[test]
    fn test_role_round_trip() {
        for role in [Role::Customer, Role::Moderator, Role::Administrator] {
            let parsed: Role = role.to_string().parse().expect("role should parse");
            assert_eq!(parsed, role);
        }
        assert!("customer".parse::<Role>().is_err());
    }

    #[test]
    fn test_session_whitelist_grows_without_duplicates() {
        let mut session = Session::new(1, "token", ip("1.1.1.1"));
        assert!(session.is_whitelisted(ip("1.1.1.1")));

        session.allow(ip("2.2.2.2"));
        assert_eq!(session.ip_whitelist, vec![ip("1.1.1.1"), ip("2.2.2.2")]);

        // Re-allowing a known IP keeps the list unchanged.
        session.allow(ip("1.1.1.1"));
        assert_eq!(session.ip_whitelist.len(), 2);

        assert!(!session.is_whitelisted(ip("3.3.3.3")));
    }

    #[test]
    fn test_credentials_debug_redacts_password() {
        let credentials = Credentials::new("alice", "hunter2-plus-more");
        let rendered = format!("{:?}", credentials);
        assert!(rendered.contains("alice"));
        assert!(!rendered.contains("hunter2"));
    }
}
