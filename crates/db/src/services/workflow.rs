//! Status workflow layer.
//!
//! All admin-side status transitions go through `update_status`, which
//! checks the requested value against the entity kind's own vocabulary
//! before anything touches storage.

use serde_json::Value;
use sqlx::SqlitePool;
use thiserror::Error;
use uuid::Uuid;

use crate::models::{
    abstract_submission::{AbstractStatus, AbstractSubmission},
    contact::{Contact, ContactStatus},
    entity::EntityKind,
    payment::{Payment, PaymentStatus},
    registration::{Registration, RegistrationStatus},
    speaker::{Speaker, SpeakerStatus},
    sponsorship::{Sponsorship, SponsorshipStatus},
};

#[derive(Debug, Error)]
pub enum WorkflowError {
    #[error(transparent)]
    Database(#[from] sqlx::Error),
    #[error(transparent)]
    Serialize(#[from] serde_json::Error),
    #[error("Record not found")]
    NotFound,
    #[error("{0}")]
    InvalidStatus(String),
}

fn invalid_status(kind: EntityKind, status: &str) -> WorkflowError {
    WorkflowError::InvalidStatus(format!(
        "Invalid status '{}' for {}: expected one of [{}]",
        status,
        kind,
        kind.statuses().join(", ")
    ))
}

/// Fetch one record of any kind as a JSON value.
pub async fn fetch(pool: &SqlitePool, kind: EntityKind, id: Uuid) -> Result<Value, WorkflowError> {
    let record = match kind {
        EntityKind::Registrations => Registration::find_by_id(pool, id)
            .await?
            .map(serde_json::to_value),
        EntityKind::Contacts => Contact::find_by_id(pool, id).await?.map(serde_json::to_value),
        EntityKind::Abstracts => AbstractSubmission::find_by_id(pool, id)
            .await?
            .map(serde_json::to_value),
        EntityKind::Speakers => Speaker::find_by_id(pool, id).await?.map(serde_json::to_value),
        EntityKind::Sponsorships => Sponsorship::find_by_id(pool, id)
            .await?
            .map(serde_json::to_value),
        EntityKind::Payments => Payment::find_by_id(pool, id).await?.map(serde_json::to_value),
    };

    Ok(record.ok_or(WorkflowError::NotFound)??)
}

/// Apply a status transition to one record and return the updated record.
///
/// `actor` is the admin identity performing the change; it is stamped onto
/// payments when they transition to `verified`.
pub async fn update_status(
    pool: &SqlitePool,
    kind: EntityKind,
    id: Uuid,
    status: &str,
    actor: Option<&str>,
) -> Result<Value, WorkflowError> {
    if !kind.is_valid_status(status) {
        return Err(invalid_status(kind, status));
    }

    let updated = match kind {
        EntityKind::Registrations => {
            let status: RegistrationStatus =
                status.parse().map_err(|_| invalid_status(kind, status))?;
            Registration::update_status(pool, id, status)
                .await?
                .map(serde_json::to_value)
        }
        EntityKind::Contacts => {
            let status: ContactStatus =
                status.parse().map_err(|_| invalid_status(kind, status))?;
            Contact::update_status(pool, id, status)
                .await?
                .map(serde_json::to_value)
        }
        EntityKind::Abstracts => {
            let status: AbstractStatus =
                status.parse().map_err(|_| invalid_status(kind, status))?;
            AbstractSubmission::update_status(pool, id, status)
                .await?
                .map(serde_json::to_value)
        }
        EntityKind::Speakers => {
            let status: SpeakerStatus =
                status.parse().map_err(|_| invalid_status(kind, status))?;
            Speaker::update_status(pool, id, status)
                .await?
                .map(serde_json::to_value)
        }
        EntityKind::Sponsorships => {
            let status: SponsorshipStatus =
                status.parse().map_err(|_| invalid_status(kind, status))?;
            Sponsorship::update_status(pool, id, status)
                .await?
                .map(serde_json::to_value)
        }
        EntityKind::Payments => {
            let status: PaymentStatus =
                status.parse().map_err(|_| invalid_status(kind, status))?;
            Payment::update_status(pool, id, status, actor)
                .await?
                .map(serde_json::to_value)
        }
    };

    Ok(updated.ok_or(WorkflowError::NotFound)??)
}
