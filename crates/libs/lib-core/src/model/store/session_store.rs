//! # Session Store (SQLite)
//!
//! Reference implementation of the [`SessionStore`] contract over SQLite.
//!
//! All writes are compare-and-swap guarded on the previously stored refresh
//! token, so the login/refresh read-modify-write sequence never silently
//! loses a concurrent update. The IP whitelist is stored as a JSON array
//! column.

use super::{DbPool, SessionStore};
use crate::error::{CoreError, Result};
use crate::model::Session;
use async_trait::async_trait;
use sqlx::{query_as, FromRow};
use std::net::IpAddr;
use tracing::debug;

/// SQLite-backed session store.
pub struct SqliteSessionStore {
    pool: DbPool,
}

impl SqliteSessionStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

/// Raw row shape; the whitelist column holds a JSON array of IP strings.
#[derive(FromRow)]
struct SessionRow {
    user_id: i64,
    refresh_token: String,
    ip_whitelist: String,
}

impl TryFrom<SessionRow> for Session {
    type Error = CoreError;

    fn try_from(row: SessionRow) -> Result<Session> {
        let raw: Vec<String> = serde_json::from_str(&row.ip_whitelist)?;
        let ip_whitelist = raw
            .iter()
            .map(|s| s.parse::<IpAddr>())
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(|e| CoreError::Decoding(format!("stored IP is invalid: {}", e)))?;

        Ok(Session {
            user_id: row.user_id,
            refresh_token: row.refresh_token,
            ip_whitelist,
        })
    }
}

fn encode_whitelist(ips: &[IpAddr]) -> Result<String> {
    let raw: Vec<String> = ips.iter().map(|ip| ip.to_string()).collect();
    Ok(serde_json::to_string(&raw)?)
}

#[async_trait]
impl SessionStore for SqliteSessionStore {
    async fn find(&self, user_id: i64) -> Result<Option<Session>> {
        let row = query_as::<_, SessionRow>("SELECT * FROM sessions WHERE user_id = ?")
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await?;

        row.map(Session::try_from).transpose()
    }

    async fn get(&self, user_id: i64) -> Result<Session> {
        self.find(user_id)
            .await?
            .ok_or_else(|| CoreError::NotFound(format!("no session for user {}", user_id)))
    }

    async fn save(&self, session: &Session, expected_refresh: Option<&str>) -> Result<bool> {
        let whitelist = encode_whitelist(&session.ip_whitelist)?;

        let result = match expected_refresh {
            // First login: insert only if no row exists yet.
            None => {
                sqlx::query(
                    r#"
                    INSERT INTO sessions (user_id, refresh_token, ip_whitelist)
                    VALUES (?, ?, ?)
                    ON CONFLICT(user_id) DO NOTHING
                    "#,
                )
                .bind(session.user_id)
                .bind(&session.refresh_token)
                .bind(&whitelist)
                .execute(&self.pool)
                .await?
            }
            // Rotation: update only while the row still holds the token the
            // caller observed.
            Some(expected) => {
                sqlx::query(
                    r#"
                    UPDATE sessions
                    SET refresh_token = ?, ip_whitelist = ?, updated_at = CURRENT_TIMESTAMP
                    WHERE user_id = ? AND refresh_token = ?
                    "#,
                )
                .bind(&session.refresh_token)
                .bind(&whitelist)
                .bind(session.user_id)
                .bind(expected)
                .execute(&self.pool)
                .await?
            }
        };

        let swapped = result.rows_affected() == 1;
        if !swapped {
            debug!(user_id = session.user_id, "session CAS guard failed");
        }
        Ok(swapped)
    }
}
