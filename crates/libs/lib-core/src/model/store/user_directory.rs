//! # User Directory (SQLite)
//!
//! Reference implementation of the [`UserDirectory`] contract over SQLite.
//!
//! Follows the repository pattern: a thin, query-only abstraction with no
//! business logic. Login and email carry UNIQUE constraints; violations
//! surface as `CoreError::Conflict`.

use super::{DbPool, UserDirectory};
use crate::error::Result;
use crate::model::{User, UserForCreate};
use async_trait::async_trait;
use sqlx::query_as;
use tracing::debug;

/// SQLite-backed user directory.
pub struct SqliteUserDirectory {
    pool: DbPool,
}

impl SqliteUserDirectory {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserDirectory for SqliteUserDirectory {
    async fn find_by_login_or_email(&self, identifier: &str) -> Result<Option<User>> {
        let user = query_as::<_, User>("SELECT * FROM users WHERE login = ?1 OR email = ?1")
            .bind(identifier)
            .fetch_optional(&self.pool)
            .await?;

        debug!(found = user.is_some(), "user directory lookup");
        Ok(user)
    }

    async fn create(&self, user: UserForCreate) -> Result<User> {
        let result = sqlx::query(
            r#"
            INSERT INTO users (role, login, email, password_hash, name, region, birth_date)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(user.role.to_string())
        .bind(&user.login)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(&user.name)
        .bind(&user.region)
        .bind(user.birth_date)
        .execute(&self.pool)
        .await?;

        let id = result.last_insert_rowid();

        let created = query_as::<_, User>("SELECT * FROM users WHERE id = ?")
            .bind(id)
            .fetch_one(&self.pool)
            .await?;

        Ok(created)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CoreError;
    use crate::model::store::{create_pool, migrate};
    use crate::model::Role;

    async fn setup_test_db() -> DbPool {
        let pool = create_pool("sqlite::memory:")
            .await
            .expect("Failed to create test database");
        migrate(&pool).await.expect("Failed to run migrations");
        pool
    }

    fn alice() -> UserForCreate {
        UserForCreate {
            role: Role::Customer,
            login: "alice".to_string(),
            email: "alice@x.com".to_string(),
            password_hash: "$argon2id$fake-hash".to_string(),
            name: "Alice".to_string(),
            region: "EU".to_string(),
            birth_date: None,
        }
    }

    #[tokio::test]
    async fn test_create_and_find_by_login() {
        let directory = SqliteUserDirectory::new(setup_test_db().await);

        let created = directory.create(alice()).await.unwrap();
        assert_eq!(created.login, "alice");
        assert_eq!(created.role, Role::Customer);

        let found = directory
            .find_by_login_or_email("alice")
            .await
            .unwrap()
            .expect("user should exist after creation");
        assert_eq!(found.id, created.id);
        assert_eq!(found.email, "alice@x.com");
    }

    #[tokio::test]
    async fn test_find_by_email_uses_same_identifier() {
        let directory = SqliteUserDirectory::new(setup_test_db().await);
        let created = directory.create(alice()).await.unwrap();

        let found = directory
            .find_by_login_or_email("alice@x.com")
            .await
            .unwrap()
            .expect("email lookup should find the user");
        assert_eq!(found.id, created.id);
    }

    #[tokio::test]
    async fn test_find_unknown_identifier_is_none() {
        let directory = SqliteUserDirectory::new(setup_test_db().await);

        let found = directory.find_by_login_or_email("nobody").await.unwrap();
        assert!(found.is_none());
    }

    #[tokio::test]
    async fn test_duplicate_login_conflicts() {
        let directory = SqliteUserDirectory::new(setup_test_db().await);
        directory.create(alice()).await.unwrap();

        let mut duplicate = alice();
        duplicate.email = "other@x.com".to_string();
        let err = directory.create(duplicate).await.unwrap_err();
        assert!(matches!(err, CoreError::Conflict(_)));
    }

    #[tokio::test]
    async fn test_duplicate_email_conflicts() {
        let directory = SqliteUserDirectory::new(setup_test_db().await);
        directory.create(alice()).await.unwrap();

        let mut duplicate = alice();
        duplicate.login = "alice2".to_string();
        let err = directory.create(duplicate).await.unwrap_err();
        assert!(matches!(err, CoreError::Conflict(_)));
    }

    #[tokio::test]
    async fn test_roles_round_trip_through_storage() {
        let directory = SqliteUserDirectory::new(setup_test_db().await);

        let mut admin = alice();
        admin.login = "root".to_string();
        admin.email = "root@x.com".to_string();
        admin.role = Role::Administrator;
        let created = directory.create(admin).await.unwrap();

        let found = directory
            .find_by_login_or_email("root")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(found.role, Role::Administrator);
        assert_eq!(found.id, created.id);
    }
}
