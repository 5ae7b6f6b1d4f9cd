//! Aggregation and reporting layer for the admin dashboard.
//!
//! Read-only: every function here issues `SELECT`s and nothing else. The
//! queries run independently, so counts taken moments apart may disagree
//! under concurrent writes; callers accept that point-in-time skew.

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::SqlitePool;
use uuid::Uuid;

use crate::models::{
    abstract_submission::AbstractSubmission, contact::Contact, entity::EntityKind,
    payment::Payment, registration::Registration, speaker::Speaker, sponsorship::Sponsorship,
};

const RECENT_LIMIT: i64 = 10;
const PENDING_LIMIT: i64 = 10;
const ACTIVITY_PER_KIND: i64 = 5;
const ACTIVITY_TOTAL: usize = 20;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EntityCounts {
    pub registrations: i64,
    pub contacts: i64,
    pub abstracts: i64,
    pub speakers: i64,
    pub sponsorships: i64,
    pub payments: i64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentBucket {
    pub status: String,
    pub currency: String,
    pub count: i64,
    pub total_amount: f64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TypeCount {
    pub registration_type: String,
    pub count: i64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecentLists {
    pub registrations: Vec<Registration>,
    pub contacts: Vec<Contact>,
    pub abstracts: Vec<AbstractSubmission>,
    pub speakers: Vec<Speaker>,
    pub sponsorships: Vec<Sponsorship>,
    pub payments: Vec<Payment>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub totals: EntityCounts,
    pub payment_breakdown: Vec<PaymentBucket>,
    pub registration_types: Vec<TypeCount>,
    pub recent: RecentLists,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PendingItems {
    pub registrations: Vec<Registration>,
    pub contacts: Vec<Contact>,
    pub abstracts: Vec<AbstractSubmission>,
    pub speakers: Vec<Speaker>,
    pub sponsorships: Vec<Sponsorship>,
    pub payments: Vec<Payment>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityItem {
    pub entity_type: String,
    pub id: Uuid,
    pub label: String,
    pub status: String,
    pub created_at: DateTime<Utc>,
}

async fn count_table(pool: &SqlitePool, kind: EntityKind) -> Result<i64, sqlx::Error> {
    let sql = format!("SELECT COUNT(*) FROM {}", kind.table());
    let (count,): (i64,) = sqlx::query_as(&sql).fetch_one(pool).await?;
    Ok(count)
}

pub async fn entity_counts(pool: &SqlitePool) -> Result<EntityCounts, sqlx::Error> {
    Ok(EntityCounts {
        registrations: count_table(pool, EntityKind::Registrations).await?,
        contacts: count_table(pool, EntityKind::Contacts).await?,
        abstracts: count_table(pool, EntityKind::Abstracts).await?,
        speakers: count_table(pool, EntityKind::Speakers).await?,
        sponsorships: count_table(pool, EntityKind::Sponsorships).await?,
        payments: count_table(pool, EntityKind::Payments).await?,
    })
}

pub async fn dashboard_stats(pool: &SqlitePool) -> Result<DashboardStats, sqlx::Error> {
    let totals = entity_counts(pool).await?;

    let payment_rows: Vec<(String, String, i64, f64)> = sqlx::query_as(
        r#"
        SELECT status, currency, COUNT(*) as count, COALESCE(SUM(amount), 0) as total_amount
        FROM payments
        GROUP BY status, currency
        ORDER BY count DESC
        "#,
    )
    .fetch_all(pool)
    .await?;
    let payment_breakdown = payment_rows
        .into_iter()
        .map(|(status, currency, count, total_amount)| PaymentBucket {
            status,
            currency,
            count,
            total_amount,
        })
        .collect();

    let type_rows: Vec<(String, i64)> = sqlx::query_as(
        r#"
        SELECT registration_type, COUNT(*) as count
        FROM registrations
        GROUP BY registration_type
        ORDER BY count DESC
        "#,
    )
    .fetch_all(pool)
    .await?;
    let registration_types = type_rows
        .into_iter()
        .map(|(registration_type, count)| TypeCount {
            registration_type,
            count,
        })
        .collect();

    let recent = RecentLists {
        registrations: Registration::find_recent(pool, RECENT_LIMIT).await?,
        contacts: Contact::find_recent(pool, RECENT_LIMIT).await?,
        abstracts: AbstractSubmission::find_recent(pool, RECENT_LIMIT).await?,
        speakers: Speaker::find_recent(pool, RECENT_LIMIT).await?,
        sponsorships: Sponsorship::find_recent(pool, RECENT_LIMIT).await?,
        payments: Payment::find_recent(pool, RECENT_LIMIT).await?,
    };

    Ok(DashboardStats {
        totals,
        payment_breakdown,
        registration_types,
        recent,
    })
}

fn pending_filter(kind: EntityKind) -> String {
    // Status subsets are compile-time constants from the kind registry,
    // never caller input.
    kind.pending_statuses()
        .iter()
        .map(|s| format!("'{}'", s))
        .collect::<Vec<_>>()
        .join(", ")
}

async fn pending_of<T>(pool: &SqlitePool, kind: EntityKind) -> Result<Vec<T>, sqlx::Error>
where
    T: for<'r> sqlx::FromRow<'r, sqlx::sqlite::SqliteRow> + Send + Unpin,
{
    let sql = format!(
        "SELECT * FROM {} WHERE status IN ({}) ORDER BY created_at DESC LIMIT {}",
        kind.table(),
        pending_filter(kind),
        PENDING_LIMIT
    );
    sqlx::query_as::<_, T>(&sql).fetch_all(pool).await
}

pub async fn pending_items(pool: &SqlitePool) -> Result<PendingItems, sqlx::Error> {
    // Contacts jump the queue by priority before recency.
    let contacts_sql = format!(
        "SELECT * FROM contacts WHERE status IN ({}) \
         ORDER BY CASE priority \
             WHEN 'urgent' THEN 0 \
             WHEN 'high' THEN 1 \
             WHEN 'normal' THEN 2 \
             ELSE 3 END, \
         created_at DESC \
         LIMIT {}",
        pending_filter(EntityKind::Contacts),
        PENDING_LIMIT
    );
    let contacts = sqlx::query_as::<_, Contact>(&contacts_sql)
        .fetch_all(pool)
        .await?;

    Ok(PendingItems {
        registrations: pending_of(pool, EntityKind::Registrations).await?,
        contacts,
        abstracts: pending_of(pool, EntityKind::Abstracts).await?,
        speakers: pending_of(pool, EntityKind::Speakers).await?,
        sponsorships: pending_of(pool, EntityKind::Sponsorships).await?,
        payments: pending_of(pool, EntityKind::Payments).await?,
    })
}

/// Merged timeline of the latest records from the four public submission
/// types, newest first, truncated to twenty entries.
pub async fn recent_activity(pool: &SqlitePool) -> Result<Vec<ActivityItem>, sqlx::Error> {
    let mut items = Vec::new();

    let rows: Vec<(Uuid, String, String, DateTime<Utc>)> = sqlx::query_as(
        r#"
        SELECT id, first_name || ' ' || last_name, status, created_at
        FROM registrations ORDER BY created_at DESC LIMIT ?1
        "#,
    )
    .bind(ACTIVITY_PER_KIND)
    .fetch_all(pool)
    .await?;
    items.extend(rows.into_iter().map(|(id, label, status, created_at)| ActivityItem {
        entity_type: "registration".to_string(),
        id,
        label,
        status,
        created_at,
    }));

    let rows: Vec<(Uuid, String, String, DateTime<Utc>)> = sqlx::query_as(
        r#"SELECT id, subject, status, created_at FROM contacts ORDER BY created_at DESC LIMIT ?1"#,
    )
    .bind(ACTIVITY_PER_KIND)
    .fetch_all(pool)
    .await?;
    items.extend(rows.into_iter().map(|(id, label, status, created_at)| ActivityItem {
        entity_type: "contact".to_string(),
        id,
        label,
        status,
        created_at,
    }));

    let rows: Vec<(Uuid, String, String, DateTime<Utc>)> = sqlx::query_as(
        r#"SELECT id, title, status, created_at FROM abstracts ORDER BY created_at DESC LIMIT ?1"#,
    )
    .bind(ACTIVITY_PER_KIND)
    .fetch_all(pool)
    .await?;
    items.extend(rows.into_iter().map(|(id, label, status, created_at)| ActivityItem {
        entity_type: "abstract".to_string(),
        id,
        label,
        status,
        created_at,
    }));

    let rows: Vec<(Uuid, String, String, DateTime<Utc>)> = sqlx::query_as(
        r#"SELECT id, name, status, created_at FROM speakers ORDER BY created_at DESC LIMIT ?1"#,
    )
    .bind(ACTIVITY_PER_KIND)
    .fetch_all(pool)
    .await?;
    items.extend(rows.into_iter().map(|(id, label, status, created_at)| ActivityItem {
        entity_type: "speaker".to_string(),
        id,
        label,
        status,
        created_at,
    }));

    items.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    items.truncate(ACTIVITY_TOTAL);
    Ok(items)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::contact::ContactPriority;
    use crate::models::test_utils::{create_test_contact, create_test_registration, setup_test_pool};

    #[tokio::test]
    async fn empty_store_yields_zero_counts_and_empty_lists() {
        let pool = setup_test_pool().await;

        let stats = dashboard_stats(&pool).await.expect("stats should not fail");
        assert_eq!(stats.totals.registrations, 0);
        assert_eq!(stats.totals.payments, 0);
        assert!(stats.payment_breakdown.is_empty());
        assert!(stats.registration_types.is_empty());
        assert!(stats.recent.registrations.is_empty());

        let pending = pending_items(&pool).await.unwrap();
        assert!(pending.contacts.is_empty());

        let activity = recent_activity(&pool).await.unwrap();
        assert!(activity.is_empty());
    }

    #[tokio::test]
    async fn counts_reflect_inserted_records() {
        let pool = setup_test_pool().await;

        create_test_registration(&pool).await;
        create_test_registration(&pool).await;
        create_test_contact(&pool, ContactPriority::Normal).await;

        let stats = dashboard_stats(&pool).await.unwrap();
        assert_eq!(stats.totals.registrations, 2);
        assert_eq!(stats.totals.contacts, 1);
        assert_eq!(stats.registration_types.len(), 1);
        assert_eq!(stats.registration_types[0].registration_type, "regular");
        assert_eq!(stats.registration_types[0].count, 2);
        assert_eq!(stats.recent.registrations.len(), 2);
    }

    #[tokio::test]
    async fn pending_contacts_are_ordered_by_priority_rank() {
        let pool = setup_test_pool().await;

        let low = create_test_contact(&pool, ContactPriority::Low).await;
        let urgent = create_test_contact(&pool, ContactPriority::Urgent).await;
        let normal = create_test_contact(&pool, ContactPriority::Normal).await;

        let pending = pending_items(&pool).await.unwrap();
        let ids: Vec<_> = pending.contacts.iter().map(|c| c.id).collect();
        assert_eq!(ids, vec![urgent.id, normal.id, low.id]);
    }

    #[tokio::test]
    async fn activity_merges_submission_types_newest_first() {
        let pool = setup_test_pool().await;

        create_test_registration(&pool).await;
        create_test_contact(&pool, ContactPriority::Normal).await;

        let activity = recent_activity(&pool).await.unwrap();
        assert_eq!(activity.len(), 2);
        assert!(activity[0].created_at >= activity[1].created_at);

        let kinds: Vec<_> = activity.iter().map(|a| a.entity_type.as_str()).collect();
        assert!(kinds.contains(&"registration"));
        assert!(kinds.contains(&"contact"));
    }
}
