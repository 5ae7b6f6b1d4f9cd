//! Bulk operation dispatcher.
//!
//! One action applied across a set of record ids for a single entity kind,
//! as one set-based UPDATE. Ids that match nothing are simply not counted;
//! the caller gets back `rows_affected`.

use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;
use thiserror::Error;
use uuid::Uuid;

use crate::models::{contact::ContactPriority, entity::EntityKind};

#[derive(Debug, Error)]
pub enum BulkActionError {
    #[error(transparent)]
    Database(#[from] sqlx::Error),
    #[error("{0}")]
    InvalidRequest(String),
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum BulkAction {
    Approve,
    Reject,
    MarkReviewed,
    AssignPriority,
    AddNotes,
}

impl std::fmt::Display for BulkAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            BulkAction::Approve => "approve",
            BulkAction::Reject => "reject",
            BulkAction::MarkReviewed => "mark_reviewed",
            BulkAction::AssignPriority => "assign_priority",
            BulkAction::AddNotes => "add_notes",
        };
        write!(f, "{}", s)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BulkActionRequest {
    pub action: BulkAction,
    pub entity_type: EntityKind,
    pub ids: Vec<Uuid>,
    /// Required by `assign_priority`.
    pub priority: Option<ContactPriority>,
    /// Required by `add_notes`.
    pub notes: Option<String>,
}

/// Apply one bulk action. Validation happens before any storage statement
/// is issued; the update itself is a single statement against the kind's
/// fixed table handle with every id bound as a placeholder.
pub async fn bulk_apply(pool: &SqlitePool, req: &BulkActionRequest) -> Result<u64, BulkActionError> {
    if req.ids.is_empty() {
        return Err(BulkActionError::InvalidRequest(
            "ids must be a non-empty list".to_string(),
        ));
    }

    let kind = req.entity_type;

    match req.action {
        BulkAction::Approve | BulkAction::Reject | BulkAction::MarkReviewed => {
            let target = match req.action {
                BulkAction::Approve => kind.approve_target(),
                BulkAction::Reject => kind.reject_target(),
                _ => kind.reviewed_target(),
            };
            let Some(target) = target else {
                return Err(BulkActionError::InvalidRequest(format!(
                    "Action '{}' is not applicable to {}",
                    req.action, kind
                )));
            };
            set_column(pool, kind, "status", target, &req.ids).await
        }
        BulkAction::AssignPriority => {
            if kind != EntityKind::Contacts {
                return Err(BulkActionError::InvalidRequest(format!(
                    "Action 'assign_priority' is only applicable to contacts, not {}",
                    kind
                )));
            }
            let Some(priority) = req.priority else {
                return Err(BulkActionError::InvalidRequest(
                    "Action 'assign_priority' requires a 'priority' value".to_string(),
                ));
            };
            set_column(pool, kind, "priority", &priority.to_string(), &req.ids).await
        }
        BulkAction::AddNotes => {
            let Some(notes) = req.notes.as_deref() else {
                return Err(BulkActionError::InvalidRequest(
                    "Action 'add_notes' requires a 'notes' value".to_string(),
                ));
            };
            set_column(pool, kind, "admin_notes", notes, &req.ids).await
        }
    }
}

async fn set_column(
    pool: &SqlitePool,
    kind: EntityKind,
    column: &'static str,
    value: &str,
    ids: &[Uuid],
) -> Result<u64, BulkActionError> {
    let placeholders = (0..ids.len())
        .map(|i| format!("?{}", i + 2))
        .collect::<Vec<_>>()
        .join(", ");
    let sql = format!(
        "UPDATE {} SET {} = ?1, updated_at = datetime('now', 'subsec') WHERE id IN ({})",
        kind.table(),
        column,
        placeholders
    );

    let mut query = sqlx::query(&sql).bind(value);
    for id in ids {
        query = query.bind(id);
    }

    let result = query.execute(pool).await?;
    Ok(result.rows_affected())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::abstract_submission::{AbstractSubmission, CreateAbstract};
    use crate::models::contact::{Contact, ContactPriority};
    use crate::models::test_utils::{create_test_contact, setup_test_pool};

    fn request(action: BulkAction, entity_type: EntityKind, ids: Vec<Uuid>) -> BulkActionRequest {
        BulkActionRequest {
            action,
            entity_type,
            ids,
            priority: None,
            notes: None,
        }
    }

    #[tokio::test]
    async fn empty_id_list_is_rejected_before_storage() {
        let pool = setup_test_pool().await;

        let err = bulk_apply(&pool, &request(BulkAction::Approve, EntityKind::Abstracts, vec![]))
            .await
            .expect_err("empty ids must be rejected");
        assert!(matches!(err, BulkActionError::InvalidRequest(_)));
    }

    #[tokio::test]
    async fn approve_counts_only_matched_rows() {
        let pool = setup_test_pool().await;

        let submission = AbstractSubmission::create(
            &pool,
            &CreateAbstract {
                title: "Cold chain logistics".into(),
                author_name: "K. Addo".into(),
                author_email: "addo@example.org".into(),
                track: "logistics".into(),
                file_name: "cc.pdf".into(),
            },
        )
        .await
        .unwrap();

        let updated = bulk_apply(
            &pool,
            &request(
                BulkAction::Approve,
                EntityKind::Abstracts,
                vec![submission.id, Uuid::new_v4()],
            ),
        )
        .await
        .unwrap();
        assert_eq!(updated, 1);

        let reloaded = AbstractSubmission::find_by_id(&pool, submission.id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(reloaded.status, "accepted");
    }

    #[tokio::test]
    async fn approve_is_not_applicable_to_contacts() {
        let pool = setup_test_pool().await;
        let contact = create_test_contact(&pool, ContactPriority::Normal).await;

        let err = bulk_apply(
            &pool,
            &request(BulkAction::Approve, EntityKind::Contacts, vec![contact.id]),
        )
        .await
        .expect_err("contacts have no approved status");
        assert!(matches!(err, BulkActionError::InvalidRequest(_)));

        let reloaded = Contact::find_by_id(&pool, contact.id).await.unwrap().unwrap();
        assert_eq!(reloaded.status, "new");
    }

    #[tokio::test]
    async fn assign_priority_requires_a_value() {
        let pool = setup_test_pool().await;
        let contact = create_test_contact(&pool, ContactPriority::Normal).await;

        let err = bulk_apply(
            &pool,
            &request(BulkAction::AssignPriority, EntityKind::Contacts, vec![contact.id]),
        )
        .await
        .expect_err("missing priority value");
        assert!(matches!(err, BulkActionError::InvalidRequest(_)));

        let mut req = request(BulkAction::AssignPriority, EntityKind::Contacts, vec![contact.id]);
        req.priority = Some(ContactPriority::Urgent);
        let updated = bulk_apply(&pool, &req).await.unwrap();
        assert_eq!(updated, 1);

        let reloaded = Contact::find_by_id(&pool, contact.id).await.unwrap().unwrap();
        assert_eq!(reloaded.priority, "urgent");
    }

    #[tokio::test]
    async fn add_notes_writes_admin_notes_on_any_kind() {
        let pool = setup_test_pool().await;
        let contact = create_test_contact(&pool, ContactPriority::Low).await;

        let mut req = request(BulkAction::AddNotes, EntityKind::Contacts, vec![contact.id]);
        req.notes = Some("Follow up after the plenary".into());
        let updated = bulk_apply(&pool, &req).await.unwrap();
        assert_eq!(updated, 1);

        let reloaded = Contact::find_by_id(&pool, contact.id).await.unwrap().unwrap();
        assert_eq!(
            reloaded.admin_notes.as_deref(),
            Some("Follow up after the plenary")
        );
    }
}
