use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, SqlitePool};
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum SponsorshipError {
    #[error(transparent)]
    Database(#[from] sqlx::Error),
    #[error("Sponsorship not found")]
    NotFound,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SponsorshipStatus {
    Submitted,
    UnderReview,
    Negotiating,
    Approved,
    Rejected,
}

impl Default for SponsorshipStatus {
    fn default() -> Self {
        Self::Submitted
    }
}

impl std::fmt::Display for SponsorshipStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            SponsorshipStatus::Submitted => "submitted",
            SponsorshipStatus::UnderReview => "under_review",
            SponsorshipStatus::Negotiating => "negotiating",
            SponsorshipStatus::Approved => "approved",
            SponsorshipStatus::Rejected => "rejected",
        };
        write!(f, "{}", s)
    }
}

impl std::str::FromStr for SponsorshipStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "submitted" => Ok(SponsorshipStatus::Submitted),
            "under_review" => Ok(SponsorshipStatus::UnderReview),
            "negotiating" => Ok(SponsorshipStatus::Negotiating),
            "approved" => Ok(SponsorshipStatus::Approved),
            "rejected" => Ok(SponsorshipStatus::Rejected),
            _ => Err(format!("Unknown sponsorship status: {}", s)),
        }
    }
}

#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Sponsorship {
    pub id: Uuid,
    pub company_name: String,
    pub contact_name: Option<String>,
    pub email: String,
    pub package: String,
    pub status: String,
    pub admin_notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateSponsorship {
    pub company_name: String,
    pub contact_name: Option<String>,
    pub email: String,
    pub package: String,
}

impl Sponsorship {
    pub async fn create(
        pool: &SqlitePool,
        data: &CreateSponsorship,
    ) -> Result<Self, SponsorshipError> {
        let id = Uuid::new_v4();
        let status = SponsorshipStatus::default().to_string();

        let sponsorship = sqlx::query_as::<_, Sponsorship>(
            r#"
            INSERT INTO sponsorships (id, company_name, contact_name, email, package, status)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(&data.company_name)
        .bind(&data.contact_name)
        .bind(&data.email)
        .bind(&data.package)
        .bind(&status)
        .fetch_one(pool)
        .await?;

        Ok(sponsorship)
    }

    pub async fn find_by_id(pool: &SqlitePool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Sponsorship>(r#"SELECT * FROM sponsorships WHERE id = ?1"#)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    pub async fn find_recent(pool: &SqlitePool, limit: i64) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, Sponsorship>(
            r#"SELECT * FROM sponsorships ORDER BY created_at DESC LIMIT ?1"#,
        )
        .bind(limit)
        .fetch_all(pool)
        .await
    }

    pub async fn update_status(
        pool: &SqlitePool,
        id: Uuid,
        status: SponsorshipStatus,
    ) -> Result<Option<Self>, sqlx::Error> {
        let status = status.to_string();
        sqlx::query_as::<_, Sponsorship>(
            r#"
            UPDATE sponsorships SET
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
