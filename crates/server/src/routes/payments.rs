//! Payment proof submission.

use axum::{
    Json, Router,
    extract::{Multipart, State},
    http::StatusCode,
    response::IntoResponse,
    routing::post,
};
use db::models::{
    payment::{CreatePayment, Payment},
    registration::Registration,
};
use utils::response::ApiResponse;
use uuid::Uuid;

use crate::{AppState, error::ApiError};

const ALLOWED_EXTENSIONS: [&str; 5] = ["pdf", "doc", "docx", "png", "jpg"];

fn allowed_extension(original_name: &str) -> Option<String> {
    let ext = original_name.rsplit('.').next()?.to_lowercase();
    if ALLOWED_EXTENSIONS.contains(&ext.as_str()) {
        Some(ext)
    } else {
        None
    }
}

async fn submit_payment(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<impl IntoResponse, ApiError> {
    let mut registration_reference = None;
    let mut amount = None;
    let mut currency = None;
    let mut method = None;
    let mut transaction_id = None;
    let mut file: Option<(String, Vec<u8>)> = None;

    while let Some(field) = multipart.next_field().await? {
        let name = field.name().unwrap_or("").to_string();
        match name.as_str() {
            "registrationReference" => registration_reference = Some(field.text().await?),
            "amount" => amount = Some(field.text().await?),
            "currency" => currency = Some(field.text().await?),
            "method" => method = Some(field.text().await?),
            "transactionId" => transaction_id = Some(field.text().await?),
            "file" => {
                let original = field.file_name().unwrap_or("").to_string();
                let data = field.bytes().await?;
                file = Some((original, data.to_vec()));
            }
            _ => {}
        }
    }

    let Some(registration_reference) =
        registration_reference.filter(|s| !s.trim().is_empty())
    else {
        return Err(ApiError::BadRequest("'registrationReference' is required".into()));
    };
    let amount: f64 = amount
        .as_deref()
        .unwrap_or("")
        .parse()
        .map_err(|_| ApiError::BadRequest("'amount' must be a number".into()))?;
    let currency = currency
        .filter(|s| !s.trim().is_empty())
        .unwrap_or_else(|| "USD".to_string());

    let file_name = match file {
        Some((original, data)) => {
            let Some(ext) = allowed_extension(&original) else {
                return Err(ApiError::BadRequest(
                    "the payment proof must be a .pdf, .doc, .docx, .png or .jpg file".into(),
                ));
            };
            let stored_name = format!("{}.{}", Uuid::new_v4(), ext);
            tokio::fs::write(state.uploads_dir().join(&stored_name), &data).await?;
            Some(stored_name)
        }
        None => None,
    };

    let pool = &state.db().pool;
    let payment = Payment::create(
        pool,
        &CreatePayment {
            registration_reference: registration_reference.clone(),
            amount,
            currency: currency.clone(),
            method,
            transaction_id,
            file_name,
        },
    )
    .await?;

    // Reflect the submission onto the owning registration's payment
    // sub-record when the reference is a registration email.
    Registration::mark_payment(
        pool,
        &registration_reference,
        amount,
        &currency,
        &payment.id.to_string(),
    )
    .await?;

    Ok((StatusCode::CREATED, Json(ApiResponse::success(payment))))
}

pub fn router() -> Router<AppState> {
    Router::new().route("/payments", post(submit_payment))
}
