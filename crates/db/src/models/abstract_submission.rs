use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, SqlitePool};
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum AbstractError {
    #[error(transparent)]
    Database(#[from] sqlx::Error),
    #[error("Abstract not found")]
    NotFound,
    #[error("The uploaded document for this abstract is missing from storage")]
    FileMissing,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum AbstractStatus {
    Submitted,
    UnderReview,
    Accepted,
    Rejected,
    RevisionRequired,
}

impl Default for AbstractStatus {
    fn default() -> Self {
        Self::Submitted
    }
}

impl std::fmt::Display for AbstractStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            AbstractStatus::Submitted => "submitted",
            AbstractStatus::UnderReview => "under_review",
            AbstractStatus::Accepted => "accepted",
            AbstractStatus::Rejected => "rejected",
            AbstractStatus::RevisionRequired => "revision_required",
        };
        write!(f, "{}", s)
    }
}

impl std::str::FromStr for AbstractStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "submitted" => Ok(AbstractStatus::Submitted),
            "under_review" => Ok(AbstractStatus::UnderReview),
            "accepted" => Ok(AbstractStatus::Accepted),
            "rejected" => Ok(AbstractStatus::Rejected),
            "revision_required" => Ok(AbstractStatus::RevisionRequired),
            _ => Err(format!("Unknown abstract status: {}", s)),
        }
    }
}

#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AbstractSubmission {
    pub id: Uuid,
    pub title: String,
    pub author_name: String,
    pub author_email: String,
    pub track: String,
    pub file_name: String,
    pub status: String,
    pub review_score: Option<f64>,
    pub review_comments: Option<String>,
    pub admin_notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateAbstract {
    pub title: String,
    pub author_name: String,
    pub author_email: String,
    pub track: String,
    /// Server-generated stored filename, never the uploader's own name.
    pub file_name: String,
}

impl AbstractSubmission {
    pub async fn create(pool: &SqlitePool, data: &CreateAbstract) -> Result<Self, AbstractError> {
        let id = Uuid::new_v4();
        let status = AbstractStatus::default().to_string();

        let submission = sqlx::query_as::<_, AbstractSubmission>(
            r#"
            INSERT INTO abstracts (id, title, author_name, author_email, track, file_name, status)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(&data.title)
        .bind(&data.author_name)
        .bind(&data.author_email)
        .bind(&data.track)
        .bind(&data.file_name)
        .bind(&status)
        .fetch_one(pool)
        .await?;

        Ok(submission)
    }

    pub async fn find_by_id(pool: &SqlitePool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, AbstractSubmission>(r#"SELECT * FROM abstracts WHERE id = ?1"#)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    pub async fn find_by_file_name(
        pool: &SqlitePool,
        file_name: &str,
    ) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, AbstractSubmission>(
            r#"SELECT * FROM abstracts WHERE file_name = ?1"#,
        )
        .bind(file_name)
        .fetch_optional(pool)
        .await
    }

    pub async fn find_recent(pool: &SqlitePool, limit: i64) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, AbstractSubmission>(
            r#"SELECT * FROM abstracts ORDER BY created_at DESC LIMIT ?1"#,
        )
        .bind(limit)
        .fetch_all(pool)
        .await
    }

    pub async fn update_status(
        pool: &SqlitePool,
        id: Uuid,
        status: AbstractStatus,
    ) -> Result<Option<Self>, sqlx::Error> {
        let status = status.to_string();
        sqlx::query_as::<_, AbstractSubmission>(
            r#"
            UPDATE abstracts SET
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

    pub async fn record_review(
        pool: &SqlitePool,
        id: Uuid,
        score: Option<f64>,
        comments: Option<&str>,
    ) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, AbstractSubmission>(
            r#"
            UPDATE abstracts SET
                review_score = COALESCE(?2, review_score),
                review_comments = COALESCE(?3, review_comments),
                updated_at = datetime('now', 'subsec')
            WHERE id = ?1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(score)
        .bind(comments)
        .fetch_optional(pool)
        .await
    }
}
