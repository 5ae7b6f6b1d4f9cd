//! Dev-only demo data seeding.

use sqlx::SqlitePool;
use thiserror::Error;
use uuid::Uuid;

use crate::models::{
    abstract_submission::{AbstractError, AbstractSubmission, CreateAbstract},
    contact::{Contact, ContactError, ContactPriority, CreateContact},
    payment::{CreatePayment, Payment, PaymentError},
    registration::{CreateRegistration, Registration, RegistrationError, RegistrationType},
    speaker::{CreateSpeaker, Speaker, SpeakerError},
    sponsorship::{CreateSponsorship, Sponsorship, SponsorshipError},
};
use crate::services::reporting::{self, EntityCounts};

#[derive(Debug, Error)]
pub enum SeedError {
    #[error(transparent)]
    Database(#[from] sqlx::Error),
    #[error(transparent)]
    Registration(#[from] RegistrationError),
    #[error(transparent)]
    Contact(#[from] ContactError),
    #[error(transparent)]
    Abstract(#[from] AbstractError),
    #[error(transparent)]
    Speaker(#[from] SpeakerError),
    #[error(transparent)]
    Sponsorship(#[from] SponsorshipError),
    #[error(transparent)]
    Payment(#[from] PaymentError),
}

/// Current per-entity record counts, as shown by the seed status endpoint.
pub async fn seed_counts(pool: &SqlitePool) -> Result<EntityCounts, SeedError> {
    Ok(reporting::entity_counts(pool).await?)
}

/// Insert a small demo dataset across every entity. Emails carry a fresh
/// UUID tag so repeated seeding never trips the unique constraint.
pub async fn seed_demo_data(pool: &SqlitePool) -> Result<EntityCounts, SeedError> {
    let tag = Uuid::new_v4().simple().to_string();
    let tag = &tag[..8];

    let types = [
        RegistrationType::EarlyBird,
        RegistrationType::Regular,
        RegistrationType::Student,
    ];
    for (i, registration_type) in types.into_iter().enumerate() {
        Registration::create(
            pool,
            &CreateRegistration {
                first_name: format!("Demo{}", i + 1),
                last_name: "Delegate".into(),
                email: format!("delegate{}-{}@demo.example", i + 1, tag),
                phone: format!("+23320000{:04}", i),
                organization: Some("Demo Health Service".into()),
                position: Some("Programme Officer".into()),
                district: Some("Demo District".into()),
                registration_type,
            },
        )
        .await?;
    }

    let priorities = [
        ContactPriority::Urgent,
        ContactPriority::Normal,
        ContactPriority::Low,
    ];
    for (i, priority) in priorities.into_iter().enumerate() {
        Contact::create(
            pool,
            &CreateContact {
                name: format!("Demo Enquirer {}", i + 1),
                email: format!("enquirer{}-{}@demo.example", i + 1, tag),
                subject: "Programme question".into(),
                message: "When does the call for posters close?".into(),
                priority: Some(priority),
            },
        )
        .await?;
    }

    for (i, title) in ["Community health worker retention", "Vaccine cold chain audit"]
        .into_iter()
        .enumerate()
    {
        AbstractSubmission::create(
            pool,
            &CreateAbstract {
                title: title.into(),
                author_name: format!("Demo Author {}", i + 1),
                author_email: format!("author{}-{}@demo.example", i + 1, tag),
                track: "public_health".into(),
                file_name: format!("demo-{}-{}.pdf", i + 1, tag),
            },
        )
        .await?;
    }

    for i in 0..2 {
        Speaker::create(
            pool,
            &CreateSpeaker {
                name: format!("Demo Speaker {}", i + 1),
                email: format!("speaker{}-{}@demo.example", i + 1, tag),
                organization: Some("Demo University".into()),
                bio: Some("Keynote-ready.".into()),
                expertise: Some(vec!["health systems".into()]),
                session_proposal: Some("Financing primary care".into()),
            },
        )
        .await?;
    }

    for (i, package) in ["gold", "silver"].into_iter().enumerate() {
        Sponsorship::create(
            pool,
            &CreateSponsorship {
                company_name: format!("Demo Sponsor {}", i + 1),
                contact_name: Some("Partnerships Lead".into()),
                email: format!("sponsor{}-{}@demo.example", i + 1, tag),
                package: package.into(),
            },
        )
        .await?;
    }

    for i in 0..2 {
        Payment::create(
            pool,
            &CreatePayment {
                registration_reference: format!("delegate{}-{}@demo.example", i + 1, tag),
                amount: 150.0 + 100.0 * i as f64,
                currency: "GHS".into(),
                method: Some("mobile_money".into()),
                transaction_id: Some(format!("DEMO-TXN-{}-{}", i + 1, tag)),
                file_name: None,
            },
        )
        .await?;
    }

    seed_counts(pool).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::test_utils::setup_test_pool;

    #[tokio::test]
    async fn seeding_populates_every_entity_and_repeats_cleanly() {
        let pool = setup_test_pool().await;

        let counts = seed_demo_data(&pool).await.expect("seed failed");
        assert_eq!(counts.registrations, 3);
        assert_eq!(counts.contacts, 3);
        assert_eq!(counts.abstracts, 2);
        assert_eq!(counts.speakers, 2);
        assert_eq!(counts.sponsorships, 2);
        assert_eq!(counts.payments, 2);

        // unique email tags make reseeding safe
        let counts = seed_demo_data(&pool).await.expect("reseed failed");
        assert_eq!(counts.registrations, 6);
    }
}
