use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, SqlitePool};
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum SpeakerError {
    #[error(transparent)]
    Database(#[from] sqlx::Error),
    #[error("Speaker not found")]
    NotFound,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SpeakerStatus {
    Pending,
    Approved,
    Rejected,
}

impl Default for SpeakerStatus {
    fn default() -> Self {
        Self::Pending
    }
}

impl std::fmt::Display for SpeakerStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            SpeakerStatus::Pending => "pending",
            SpeakerStatus::Approved => "approved",
            SpeakerStatus::Rejected => "rejected",
        };
        write!(f, "{}", s)
    }
}

impl std::str::FromStr for SpeakerStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pending" => Ok(SpeakerStatus::Pending),
            "approved" => Ok(SpeakerStatus::Approved),
            "rejected" => Ok(SpeakerStatus::Rejected),
            _ => Err(format!("Unknown speaker status: {}", s)),
        }
    }
}

#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Speaker {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub organization: Option<String>,
    pub bio: Option<String>,
    pub expertise: Option<String>,
    pub session_proposal: Option<String>,
    pub status: String,
    pub admin_notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateSpeaker {
    pub name: String,
    pub email: String,
    pub organization: Option<String>,
    pub bio: Option<String>,
    pub expertise: Option<Vec<String>>,
    pub session_proposal: Option<String>,
}

impl Speaker {
    /// Expertise list parsed back out of its JSON column.
    pub fn expertise_parsed(&self) -> Option<Vec<String>> {
        self.expertise
            .as_deref()
            .and_then(|s| serde_json::from_str(s).ok())
    }

    pub async fn create(pool: &SqlitePool, data: &CreateSpeaker) -> Result<Self, SpeakerError> {
        let id = Uuid::new_v4();
        let status = SpeakerStatus::default().to_string();
        let expertise = data
            .expertise
            .as_ref()
            .map(|v| serde_json::to_string(v).unwrap_or_default());

        let speaker = sqlx::query_as::<_, Speaker>(
            r#"
            INSERT INTO speakers (
                id, name, email, organization, bio, expertise, session_proposal, status
            )
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(&data.name)
        .bind(&data.email)
        .bind(&data.organization)
        .bind(&data.bio)
        .bind(&expertise)
        .bind(&data.session_proposal)
        .bind(&status)
        .fetch_one(pool)
        .await?;

        Ok(speaker)
    }

    pub async fn find_by_id(pool: &SqlitePool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Speaker>(r#"SELECT * FROM speakers WHERE id = ?1"#)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    pub async fn find_recent(pool: &SqlitePool, limit: i64) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, Speaker>(
            r#"SELECT * FROM speakers ORDER BY created_at DESC LIMIT ?1"#,
        )
        .bind(limit)
        .fetch_all(pool)
        .await
    }

    pub async fn update_status(
        pool: &SqlitePool,
        id: Uuid,
        status: SpeakerStatus,
    ) -> Result<Option<Self>, sqlx::Error> {
        let status = status.to_string();
        sqlx::query_as::<_, Speaker>(
            r#"
            UPDATE speakers SET
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
}
