//! # Store Contracts
//!
//! The session store and user directory are external collaborators of the
//! auth engine. This module defines their contracts plus reference SQLite
//! implementations used by the services and the test suites.

// region: --- Modules
pub mod session_store;
pub mod user_directory;
// endregion: --- Modules

// region: --- Re-exports
pub use session_store::SqliteSessionStore;
pub use user_directory::SqliteUserDirectory;
// endregion: --- Re-exports

use crate::error::Result;
use crate::model::{Session, User, UserForCreate};
use async_trait::async_trait;
use sqlx::{sqlite::SqliteConnectOptions, SqlitePool};

/// Durable mapping of login/email to user records, with uniqueness
/// constraints on both.
#[async_trait]
pub trait UserDirectory: Send + Sync {
    /// Look up a user by login or email; the identifier is ambiguous by
    /// design and the caller does not declare which it is.
    async fn find_by_login_or_email(&self, identifier: &str) -> Result<Option<User>>;

    /// Register a new user. Duplicate login or email yields
    /// [`CoreError::Conflict`](crate::error::CoreError::Conflict).
    async fn create(&self, user: UserForCreate) -> Result<User>;
}

/// Durable mapping of user ID to session state (current refresh token and
/// IP whitelist). At most one session per user.
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Fetch the session if one exists. Absence is not an error; a first
    /// login has no prior session.
    async fn find(&self, user_id: i64) -> Result<Option<Session>>;

    /// Fetch the session, failing with
    /// [`CoreError::NotFound`](crate::error::CoreError::NotFound) when the
    /// user has never logged in.
    async fn get(&self, user_id: i64) -> Result<Session>;

    /// Compare-and-swap write. With `expected_refresh = None` the session
    /// is inserted only if no row exists; with `Some(token)` the row is
    /// updated only while it still holds `token`. Returns `false` when the
    /// guard fails, i.e. a concurrent login or refresh won the race.
    async fn save(&self, session: &Session, expected_refresh: Option<&str>) -> Result<bool>;
}

// region: --- Types and Functions
/// Type alias for SQLite connection pool.
pub type DbPool = SqlitePool;

/// Create a new SQLite connection pool.
pub async fn create_pool(database_url: &str) -> anyhow::Result<DbPool> {
    let options = database_url
        .parse::<SqliteConnectOptions>()?
        .create_if_missing(true);

    let pool = SqlitePool::connect_with(options).await?;

    Ok(pool)
}

/// Create the users and sessions tables if they do not exist.
pub async fn migrate(pool: &DbPool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS users (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            role TEXT NOT NULL,
            login TEXT NOT NULL UNIQUE,
            email TEXT NOT NULL UNIQUE,
            password_hash TEXT NOT NULL,
            name TEXT NOT NULL DEFAULT '',
            region TEXT NOT NULL DEFAULT '',
            birth_date TEXT,
            created_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP,
            updated_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS sessions (
            user_id INTEGER PRIMARY KEY,
            refresh_token TEXT NOT NULL,
            ip_whitelist TEXT NOT NULL,
            updated_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}
// endregion: --- Types and Functions
