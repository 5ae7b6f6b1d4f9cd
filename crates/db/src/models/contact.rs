use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, SqlitePool};
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum ContactError {
    #[error(transparent)]
    Database(#[from] sqlx::Error),
    #[error("Contact not found")]
    NotFound,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ContactStatus {
    New,
    InProgress,
    Resolved,
}

impl Default for ContactStatus {
    fn default() -> Self {
        Self::New
    }
}

impl std::fmt::Display for ContactStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            ContactStatus::New => "new",
            ContactStatus::InProgress => "in_progress",
            ContactStatus::Resolved => "resolved",
        };
        write!(f, "{}", s)
    }
}

impl std::str::FromStr for ContactStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "new" => Ok(ContactStatus::New),
            "in_progress" | "in-progress" => Ok(ContactStatus::InProgress),
            "resolved" => Ok(ContactStatus::Resolved),
            _ => Err(format!("Unknown contact status: {}", s)),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ContactPriority {
    Low,
    Normal,
    High,
    Urgent,
}

impl Default for ContactPriority {
    fn default() -> Self {
        Self::Normal
    }
}

impl std::fmt::Display for ContactPriority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            ContactPriority::Low => "low",
            ContactPriority::Normal => "normal",
            ContactPriority::High => "high",
            ContactPriority::Urgent => "urgent",
        };
        write!(f, "{}", s)
    }
}

impl std::str::FromStr for ContactPriority {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "low" => Ok(ContactPriority::Low),
            "normal" => Ok(ContactPriority::Normal),
            "high" => Ok(ContactPriority::High),
            "urgent" => Ok(ContactPriority::Urgent),
            _ => Err(format!("Unknown contact priority: {}", s)),
        }
    }
}

#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Contact {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub subject: String,
    pub message: String,
    pub status: String,
    pub priority: String,
    pub admin_notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateContact {
    pub name: String,
    pub email: String,
    pub subject: String,
    pub message: String,
    pub priority: Option<ContactPriority>,
}

impl Contact {
    pub async fn create(pool: &SqlitePool, data: &CreateContact) -> Result<Self, ContactError> {
        let id = Uuid::new_v4();
        let status = ContactStatus::default().to_string();
        let priority = data.priority.unwrap_or_default().to_string();

        let contact = sqlx::query_as::<_, Contact>(
            r#"
            INSERT INTO contacts (id, name, email, subject, message, status, priority)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(&data.name)
        .bind(&data.email)
        .bind(&data.subject)
        .bind(&data.message)
        .bind(&status)
        .bind(&priority)
        .fetch_one(pool)
        .await?;

        Ok(contact)
    }

    pub async fn find_by_id(pool: &SqlitePool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Contact>(r#"SELECT * FROM contacts WHERE id = ?1"#)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    pub async fn find_recent(pool: &SqlitePool, limit: i64) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, Contact>(
            r#"SELECT * FROM contacts ORDER BY created_at DESC LIMIT ?1"#,
        )
        .bind(limit)
        .fetch_all(pool)
        .await
    }

    pub async fn update_status(
        pool: &SqlitePool,
        id: Uuid,
        status: ContactStatus,
    ) -> Result<Option<Self>, sqlx::Error> {
        let status = status.to_string();
        sqlx::query_as::<_, Contact>(
            r#"
            UPDATE contacts SET
                status = ?2,
                updated_at = datetime('now', 'subsec')
            WHERE id = ?1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(&status)
        .fetch_optional(pool)
        .await
    }

    /// Set one status across a batch of contacts. Missing ids simply do not
    /// match; the return value is the number of rows actually updated.
    pub async fn bulk_update_status(
        pool: &SqlitePool,
        ids: &[Uuid],
        status: ContactStatus,
    ) -> Result<u64, sqlx::Error> {
        if ids.is_empty() {
            return Ok(0);
        }

        let placeholders = (0..ids.len())
            .map(|i| format!("?{}", i + 2))
            .collect::<Vec<_>>()
            .join(", ");
        let sql = format!(
            "UPDATE contacts SET status = ?1, updated_at = datetime('now', 'subsec') \
             WHERE id IN ({})",
            placeholders
        );

        let mut query = sqlx::query(&sql).bind(status.to_string());
        for id in ids {
            query = query.bind(id);
        }

        let result = query.execute(pool).await?;
        Ok(result.rows_affected())
    }

    pub async fn bulk_delete(pool: &SqlitePool, ids: &[Uuid]) -> Result<u64, sqlx::Error> {
        if ids.is_empty() {
            return Ok(0);
        }

        let placeholders = (0..ids.len())
            .map(|i| format!("?{}", i + 1))
            .collect::<Vec<_>>()
            .join(", ");
        let sql = format!("DELETE FROM contacts WHERE id IN ({})", placeholders);

        let mut query = sqlx::query(&sql);
        for id in ids {
            query = query.bind(id);
        }

        let result = query.execute(pool).await?;
        Ok(result.rows_affected())
    }
}
