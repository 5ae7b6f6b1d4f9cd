use std::str::FromStr;

use sqlx::{
    SqlitePool,
    sqlite::{SqliteConnectOptions, SqlitePoolOptions},
};
use uuid::Uuid;

use super::contact::{Contact, ContactPriority, CreateContact};
use super::registration::{CreateRegistration, Registration, RegistrationType};

/// Private in-memory database per test. A single pooled connection keeps
/// the database alive for the duration of the test.
pub(crate) async fn setup_test_pool() -> SqlitePool {
    let options = SqliteConnectOptions::from_str("sqlite::memory:")
        .expect("invalid sqlite config")
        .create_if_missing(true)
        .foreign_keys(true);

    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect_with(options)
        .await
        .expect("failed to open sqlite memory db");

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .expect("failed to run migrations");

    pool
}

pub(crate) async fn create_test_registration(pool: &SqlitePool) -> Registration {
    let tag = Uuid::new_v4();
    Registration::create(
        pool,
        &CreateRegistration {
            first_name: "Test".into(),
            last_name: "Delegate".into(),
            email: format!("delegate-{}@example.org", tag),
            phone: "+233200000000".into(),
            organization: Some("Test Org".into()),
            position: Some("Officer".into()),
            district: Some("Test District".into()),
            registration_type: RegistrationType::Regular,
        },
    )
    .await
    .expect("failed to create test registration")
}

pub(crate) async fn create_test_contact(
    pool: &SqlitePool,
    priority: ContactPriority,
) -> Contact {
    let tag = Uuid::new_v4();
    Contact::create(
        pool,
        &CreateContact {
            name: format!("Enquirer {}", tag),
            email: format!("enquirer-{}@example.org", tag),
            subject: "Question".into(),
            message: "Looking forward to the conference.".into(),
            priority: Some(priority),
        },
    )
    .await
    .expect("failed to create test contact")
}
