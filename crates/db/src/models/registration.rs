use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, SqlitePool};
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum RegistrationError {
    #[error(transparent)]
    Database(#[from] sqlx::Error),
    #[error("Registration not found")]
    NotFound,
    #[error("A registration with this email already exists")]
    AlreadyExists,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum RegistrationType {
    EarlyBird,
    Regular,
    Student,
    Local,
    International,
}

impl std::fmt::Display for RegistrationType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            RegistrationType::EarlyBird => "early_bird",
            RegistrationType::Regular => "regular",
            RegistrationType::Student => "student",
            RegistrationType::Local => "local",
            RegistrationType::International => "international",
        };
        write!(f, "{}", s)
    }
}

impl std::str::FromStr for RegistrationType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "early_bird" | "early-bird" => Ok(RegistrationType::EarlyBird),
            "regular" => Ok(RegistrationType::Regular),
            "student" => Ok(RegistrationType::Student),
            "local" => Ok(RegistrationType::Local),
            "international" => Ok(RegistrationType::International),
            _ => Err(format!("Unknown registration type: {}", s)),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum RegistrationStatus {
    Pending,
    Approved,
    Rejected,
}

impl Default for RegistrationStatus {
    fn default() -> Self {
        Self::Pending
    }
}

impl std::fmt::Display for RegistrationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            RegistrationStatus::Pending => "pending",
            RegistrationStatus::Approved => "approved",
            RegistrationStatus::Rejected => "rejected",
        };
        write!(f, "{}", s)
    }
}

impl std::str::FromStr for RegistrationStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pending" => Ok(RegistrationStatus::Pending),
            "approved" => Ok(RegistrationStatus::Approved),
            "rejected" => Ok(RegistrationStatus::Rejected),
            _ => Err(format!("Unknown registration status: {}", s)),
        }
    }
}

#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Registration {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub organization: Option<String>,
    pub position: Option<String>,
    pub district: Option<String>,
    pub registration_type: String,
    pub status: String,
    pub payment_status: String,
    pub payment_amount: Option<f64>,
    pub payment_currency: Option<String>,
    pub payment_reference: Option<String>,
    pub payment_verified: i64,
    pub admin_notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateRegistration {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub organization: Option<String>,
    pub position: Option<String>,
    pub district: Option<String>,
    pub registration_type: RegistrationType,
}

impl Registration {
    pub async fn create(
        pool: &SqlitePool,
        data: &CreateRegistration,
    ) -> Result<Self, RegistrationError> {
        if Self::find_by_email(pool, &data.email).await?.is_some() {
            return Err(RegistrationError::AlreadyExists);
        }

        let id = Uuid::new_v4();
        let registration_type = data.registration_type.to_string();
        let status = RegistrationStatus::default().to_string();

        sqlx::query_as::<_, Registration>(
            r#"
            INSERT INTO registrations (
                id, first_name, last_name, email, phone,
                organization, position, district, registration_type, status
            )
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(&data.first_name)
        .bind(&data.last_name)
        .bind(&data.email)
        .bind(&data.phone)
        .bind(&data.organization)
        .bind(&data.position)
        .bind(&data.district)
        .bind(&registration_type)
        .bind(&status)
        .fetch_one(pool)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(db) = &e {
                if db.is_unique_violation() {
                    return RegistrationError::AlreadyExists;
                }
            }
            RegistrationError::Database(e)
        })
    }

    pub async fn find_by_id(pool: &SqlitePool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Registration>(r#"SELECT * FROM registrations WHERE id = ?1"#)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    pub async fn find_by_email(pool: &SqlitePool, email: &str) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Registration>(r#"SELECT * FROM registrations WHERE email = ?1"#)
            .bind(email)
            .fetch_optional(pool)
            .await
    }

    pub async fn find_recent(pool: &SqlitePool, limit: i64) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, Registration>(
            r#"SELECT * FROM registrations ORDER BY created_at DESC LIMIT ?1"#,
        )
        .bind(limit)
        .fetch_all(pool)
        .await
    }

    pub async fn update_status(
        pool: &SqlitePool,
        id: Uuid,
        status: RegistrationStatus,
    ) -> Result<Option<Self>, sqlx::Error> {
        let status = status.to_string();
        sqlx::query_as::<_, Registration>(
            r#"
            UPDATE registrations SET
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

    /// Attach payment details to the registration matching an email; called
    /// when a payment proof referencing it is submitted.
    pub async fn mark_payment(
        pool: &SqlitePool,
        email: &str,
        amount: f64,
        currency: &str,
        reference: &str,
    ) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(
            r#"
            UPDATE registrations SET
                payment_amount = ?2,
                payment_currency = ?3,
                payment_reference = ?4,
                payment_status = 'pending',
                updated_at = datetime('now', 'subsec')
            WHERE email = ?1
            "#,
        )
        .bind(email)
        .bind(amount)
        .bind(currency)
        .bind(reference)
        .execute(pool)
        .await?;

        Ok(result.rows_affected())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::test_utils::setup_test_pool;

    fn sample(email: &str) -> CreateRegistration {
        CreateRegistration {
            first_name: "Ama".into(),
            last_name: "Mensah".into(),
            email: email.into(),
            phone: "+233200000001".into(),
            organization: Some("Ridge Teaching Hospital".into()),
            position: Some("Nurse Manager".into()),
            district: Some("Accra Metro".into()),
            registration_type: RegistrationType::Regular,
        }
    }

    #[tokio::test]
    async fn create_defaults_to_pending() {
        let pool = setup_test_pool().await;

        let reg = Registration::create(&pool, &sample("ama@example.org"))
            .await
            .expect("failed to create registration");

        assert_eq!(reg.status, "pending");
        assert_eq!(reg.registration_type, "regular");
        assert_eq!(reg.payment_status, "pending");
        assert_eq!(reg.payment_verified, 0);
    }

    #[tokio::test]
    async fn duplicate_email_is_rejected() {
        let pool = setup_test_pool().await;

        Registration::create(&pool, &sample("dup@example.org"))
            .await
            .expect("first create failed");

        let err = Registration::create(&pool, &sample("dup@example.org"))
            .await
            .expect_err("duplicate create should fail");
        assert!(matches!(err, RegistrationError::AlreadyExists));

        let recent = Registration::find_recent(&pool, 10).await.unwrap();
        assert_eq!(recent.len(), 1);
    }

    #[tokio::test]
    async fn update_status_on_missing_id_matches_nothing() {
        let pool = setup_test_pool().await;

        let updated =
            Registration::update_status(&pool, Uuid::new_v4(), RegistrationStatus::Approved)
                .await
                .unwrap();
        assert!(updated.is_none());
    }

    #[tokio::test]
    async fn mark_payment_fills_sub_record() {
        let pool = setup_test_pool().await;

        let reg = Registration::create(&pool, &sample("payer@example.org"))
            .await
            .unwrap();

        let touched =
            Registration::mark_payment(&pool, "payer@example.org", 150.0, "GHS", "TXN-001")
                .await
                .unwrap();
        assert_eq!(touched, 1);

        let reloaded = Registration::find_by_id(&pool, reg.id)
            .await
            .unwrap()
            .expect("registration missing");
        assert_eq!(reloaded.payment_amount, Some(150.0));
        assert_eq!(reloaded.payment_currency.as_deref(), Some("GHS"));
        assert_eq!(reloaded.payment_reference.as_deref(), Some("TXN-001"));
    }
}
