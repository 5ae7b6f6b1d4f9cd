use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, SqlitePool};
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum PaymentError {
    #[error(transparent)]
    Database(#[from] sqlx::Error),
    #[error("Payment not found")]
    NotFound,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    Pending,
    Verified,
    Rejected,
}

impl Default for PaymentStatus {
    fn default() -> Self {
        Self::Pending
    }
}

impl std::fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            PaymentStatus::Pending => "pending",
            PaymentStatus::Verified => "verified",
            PaymentStatus::Rejected => "rejected",
        };
        write!(f, "{}", s)
    }
}

impl std::str::FromStr for PaymentStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pending" => Ok(PaymentStatus::Pending),
            "verified" => Ok(PaymentStatus::Verified),
            "rejected" => Ok(PaymentStatus::Rejected),
            _ => Err(format!("Unknown payment status: {}", s)),
        }
    }
}

#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Payment {
    pub id: Uuid,
    pub registration_reference: String,
    pub amount: f64,
    pub currency: String,
    pub method: Option<String>,
    pub transaction_id: Option<String>,
    pub file_name: Option<String>,
    pub status: String,
    pub verified_by: Option<String>,
    pub verified_at: Option<DateTime<Utc>>,
    pub admin_notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePayment {
    pub registration_reference: String,
    pub amount: f64,
    pub currency: String,
    pub method: Option<String>,
    pub transaction_id: Option<String>,
    /// Server-generated stored filename of the uploaded proof, if any.
    pub file_name: Option<String>,
}

impl Payment {
    pub async fn create(pool: &SqlitePool, data: &CreatePayment) -> Result<Self, PaymentError> {
        let id = Uuid::new_v4();
        let status = PaymentStatus::default().to_string();

        let payment = sqlx::query_as::<_, Payment>(
            r#"
            INSERT INTO payments (
                id, registration_reference, amount, currency, method,
                transaction_id, file_name, status
            )
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(&data.registration_reference)
        .bind(data.amount)
        .bind(&data.currency)
        .bind(&data.method)
        .bind(&data.transaction_id)
        .bind(&data.file_name)
        .bind(&status)
        .fetch_one(pool)
        .await?;

        Ok(payment)
    }

    pub async fn find_by_id(pool: &SqlitePool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Payment>(r#"SELECT * FROM payments WHERE id = ?1"#)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    pub async fn find_recent(pool: &SqlitePool, limit: i64) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, Payment>(
            r#"SELECT * FROM payments ORDER BY created_at DESC LIMIT ?1"#,
        )
        .bind(limit)
        .fetch_all(pool)
        .await
    }

    /// Apply a status transition. Moving to `verified` stamps the verifier
    /// identity and verification time alongside the status itself.
    pub async fn update_status(
        pool: &SqlitePool,
        id: Uuid,
        status: PaymentStatus,
        verified_by: Option<&str>,
    ) -> Result<Option<Self>, sqlx::Error> {
        if status == PaymentStatus::Verified {
            let status = status.to_string();
            return sqlx::query_as::<_, Payment>(
                r#"
                UPDATE payments SET
                    status = ?2,
                    verified_by = ?3,
                    verified_at = datetime('now', 'subsec'),
                    updated_at = datetime('now', 'subsec')
                WHERE id = ?1
                RETURNING *
                "#,
            )
            .bind(id)
            .bind(&status)
            .bind(verified_by)
            .fetch_optional(pool)
            .await;
        }

        let status = status.to_string();
        sqlx::query_as::<_, Payment>(
            r#"
            UPDATE payments SET
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::test_utils::setup_test_pool;

    #[tokio::test]
    async fn verification_stamps_verifier_and_time() {
        let pool = setup_test_pool().await;

        let payment = Payment::create(
            &pool,
            &CreatePayment {
                registration_reference: "payer@example.org".into(),
                amount: 250.0,
                currency: "GHS".into(),
                method: Some("bank_transfer".into()),
                transaction_id: Some("TXN-42".into()),
                file_name: Some("proof.pdf".into()),
            },
        )
        .await
        .expect("failed to create payment");

        assert_eq!(payment.status, "pending");
        assert!(payment.verified_by.is_none());
        assert!(payment.verified_at.is_none());

        let verified =
            Payment::update_status(&pool, payment.id, PaymentStatus::Verified, Some("admin"))
                .await
                .unwrap()
                .expect("payment missing");
        assert_eq!(verified.status, "verified");
        assert_eq!(verified.verified_by.as_deref(), Some("admin"));
        assert!(verified.verified_at.is_some());
    }

    #[tokio::test]
    async fn rejection_leaves_verifier_unset() {
        let pool = setup_test_pool().await;

        let payment = Payment::create(
            &pool,
            &CreatePayment {
                registration_reference: "other@example.org".into(),
                amount: 90.0,
                currency: "USD".into(),
                method: None,
                transaction_id: None,
                file_name: None,
            },
        )
        .await
        .unwrap();

        let rejected =
            Payment::update_status(&pool, payment.id, PaymentStatus::Rejected, Some("admin"))
                .await
                .unwrap()
                .expect("payment missing");
        assert_eq!(rejected.status, "rejected");
        assert!(rejected.verified_by.is_none());
        assert!(rejected.verified_at.is_none());
    }
}
