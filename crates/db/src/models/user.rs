use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, SqlitePool};
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum UserError {
    #[error(transparent)]
    Database(#[from] sqlx::Error),
    #[error("User not found")]
    NotFound,
    #[error("A user with this username already exists")]
    AlreadyExists,
}

#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub is_admin: i64,
    pub is_active: i64,
    pub last_login_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateUser {
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub is_admin: bool,
}

#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub id: Uuid,
    pub user_id: Uuid,
    pub token_hash: String,
    pub expires_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub last_used_at: Option<DateTime<Utc>>,
}

impl User {
    pub async fn create(pool: &SqlitePool, data: &CreateUser) -> Result<Self, UserError> {
        let id = Uuid::new_v4();
        let is_admin = if data.is_admin { 1 } else { 0 };

        sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (id, username, email, password_hash, is_admin)
            VALUES (?1, ?2, ?3, ?4, ?5)
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(&data.username)
        .bind(&data.email)
        .bind(&data.password_hash)
        .bind(is_admin)
        .fetch_one(pool)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(db) = &e {
                if db.is_unique_violation() {
                    return UserError::AlreadyExists;
                }
            }
            UserError::Database(e)
        })
    }

    pub async fn find_by_username(
        pool: &SqlitePool,
        username: &str,
    ) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, User>(
            r#"SELECT * FROM users WHERE username = ?1 AND is_active = 1"#,
        )
        .bind(username)
        .fetch_optional(pool)
        .await
    }

    pub async fn count(pool: &SqlitePool) -> Result<i64, sqlx::Error> {
        let (count,): (i64,) = sqlx::query_as(r#"SELECT COUNT(*) FROM users"#)
            .fetch_one(pool)
            .await?;
        Ok(count)
    }

    pub async fn record_login(pool: &SqlitePool, id: Uuid) -> Result<(), sqlx::Error> {
        sqlx::query(
            r#"
            UPDATE users SET
                last_login_at = datetime('now', 'subsec'),
                updated_at = datetime('now', 'subsec')
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .execute(pool)
        .await?;
        Ok(())
    }

    /// Resolve a hashed session token to its (unexpired) owning user.
    pub async fn find_by_session_token_hash(
        pool: &SqlitePool,
        token_hash: &str,
    ) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, User>(
            r#"
            SELECT u.*
            FROM sessions s
            JOIN users u ON s.user_id = u.id
            WHERE s.token_hash = ?1 AND s.expires_at > datetime('now')
            "#,
        )
        .bind(token_hash)
        .fetch_optional(pool)
        .await
    }
}

impl Session {
    pub async fn create(
        pool: &SqlitePool,
        user_id: Uuid,
        token_hash: &str,
        expires_at: DateTime<Utc>,
    ) -> Result<Self, sqlx::Error> {
        let id = Uuid::new_v4();
        // Stored in SQLite's own datetime format so `expires_at > datetime('now')`
        // comparisons in lookups stay lexicographically correct.
        let expires = expires_at.format("%Y-%m-%d %H:%M:%S%.3f").to_string();
        sqlx::query_as::<_, Session>(
            r#"
            INSERT INTO sessions (id, user_id, token_hash, expires_at)
            VALUES (?1, ?2, ?3, ?4)
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(user_id)
        .bind(token_hash)
        .bind(&expires)
        .fetch_one(pool)
        .await
    }

    pub async fn delete_by_token_hash(
        pool: &SqlitePool,
        token_hash: &str,
    ) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(r#"DELETE FROM sessions WHERE token_hash = ?1"#)
            .bind(token_hash)
            .execute(pool)
            .await?;
        Ok(result.rows_affected())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::test_utils::setup_test_pool;
    use chrono::Duration;

    #[tokio::test]
    async fn session_resolves_to_user_until_deleted() {
        let pool = setup_test_pool().await;

        let user = User::create(
            &pool,
            &CreateUser {
                username: "admin".into(),
                email: "admin@example.org".into(),
                password_hash: "not-a-real-hash".into(),
                is_admin: true,
            },
        )
        .await
        .expect("failed to create user");
        assert_eq!(user.is_admin, 1);

        let expires = Utc::now() + Duration::days(30);
        Session::create(&pool, user.id, "tokenhash", expires)
            .await
            .expect("failed to create session");

        let resolved = User::find_by_session_token_hash(&pool, "tokenhash")
            .await
            .unwrap()
            .expect("session should resolve");
        assert_eq!(resolved.id, user.id);

        let deleted = Session::delete_by_token_hash(&pool, "tokenhash").await.unwrap();
        assert_eq!(deleted, 1);

        assert!(
            User::find_by_session_token_hash(&pool, "tokenhash")
                .await
                .unwrap()
                .is_none()
        );
    }

    #[tokio::test]
    async fn expired_session_does_not_resolve() {
        let pool = setup_test_pool().await;

        let user = User::create(
            &pool,
            &CreateUser {
                username: "reviewer".into(),
                email: "reviewer@example.org".into(),
                password_hash: "hash".into(),
                is_admin: false,
            },
        )
        .await
        .unwrap();

        let expires = Utc::now() - Duration::hours(1);
        Session::create(&pool, user.id, "stale", expires).await.unwrap();

        assert!(
            User::find_by_session_token_hash(&pool, "stale")
                .await
                .unwrap()
                .is_none()
        );
    }

    #[tokio::test]
    async fn duplicate_username_is_rejected() {
        let pool = setup_test_pool().await;

        let data = CreateUser {
            username: "ops".into(),
            email: "ops@example.org".into(),
            password_hash: "hash".into(),
            is_admin: true,
        };
        User::create(&pool, &data).await.unwrap();
        let err = User::create(&pool, &data).await.expect_err("should conflict");
        assert!(matches!(err, UserError::AlreadyExists));
    }
}
