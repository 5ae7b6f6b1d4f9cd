use axum::{
    Json,
    extract::multipart::MultipartError,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use db::models::{
    abstract_submission::AbstractError, contact::ContactError, payment::PaymentError,
    registration::RegistrationError, speaker::SpeakerError, sponsorship::SponsorshipError,
    user::UserError,
};
use db::services::{
    auth_service::AuthError, bulk_actions::BulkActionError, seed::SeedError,
    workflow::WorkflowError,
};
use thiserror::Error;
use utils::response::ApiResponse;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Database(#[from] sqlx::Error),
    #[error("Multipart error: {0}")]
    Multipart(#[from] MultipartError),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Conflict: {0}")]
    Conflict(String),
    #[error("Bad Request: {0}")]
    BadRequest(String),
    #[error("Not Found: {0}")]
    NotFound(String),
    #[error("Unauthorized: {0}")]
    Unauthorized(String),
    #[error("Forbidden: {0}")]
    Forbidden(String),
    #[error("Internal Server Error: {0}")]
    InternalError(String),
}

impl From<RegistrationError> for ApiError {
    fn from(err: RegistrationError) -> Self {
        match err {
            RegistrationError::Database(e) => ApiError::Database(e),
            RegistrationError::NotFound => ApiError::NotFound("Registration not found".into()),
            RegistrationError::AlreadyExists => {
                ApiError::Conflict("A registration with this email already exists".into())
            }
        }
    }
}

impl From<ContactError> for ApiError {
    fn from(err: ContactError) -> Self {
        match err {
            ContactError::Database(e) => ApiError::Database(e),
            ContactError::NotFound => ApiError::NotFound("Contact not found".into()),
        }
    }
}

impl From<AbstractError> for ApiError {
    fn from(err: AbstractError) -> Self {
        match err {
            AbstractError::Database(e) => ApiError::Database(e),
            AbstractError::NotFound => ApiError::NotFound("Abstract not found".into()),
            AbstractError::FileMissing => ApiError::NotFound(
                "The uploaded document for this abstract is missing from storage".into(),
            ),
        }
    }
}

impl From<SpeakerError> for ApiError {
    fn from(err: SpeakerError) -> Self {
        match err {
            SpeakerError::Database(e) => ApiError::Database(e),
            SpeakerError::NotFound => ApiError::NotFound("Speaker not found".into()),
        }
    }
}

impl From<SponsorshipError> for ApiError {
    fn from(err: SponsorshipError) -> Self {
        match err {
            SponsorshipError::Database(e) => ApiError::Database(e),
            SponsorshipError::NotFound => ApiError::NotFound("Sponsorship not found".into()),
        }
    }
}

impl From<PaymentError> for ApiError {
    fn from(err: PaymentError) -> Self {
        match err {
            PaymentError::Database(e) => ApiError::Database(e),
            PaymentError::NotFound => ApiError::NotFound("Payment not found".into()),
        }
    }
}

impl From<UserError> for ApiError {
    fn from(err: UserError) -> Self {
        match err {
            UserError::Database(e) => ApiError::Database(e),
            UserError::NotFound => ApiError::NotFound("User not found".into()),
            UserError::AlreadyExists => {
                ApiError::Conflict("A user with this username already exists".into())
            }
        }
    }
}

impl From<WorkflowError> for ApiError {
    fn from(err: WorkflowError) -> Self {
        match err {
            WorkflowError::Database(e) => ApiError::Database(e),
            WorkflowError::Serialize(e) => ApiError::InternalError(e.to_string()),
            WorkflowError::NotFound => ApiError::NotFound("Record not found".into()),
            WorkflowError::InvalidStatus(msg) => ApiError::BadRequest(msg),
        }
    }
}

impl From<BulkActionError> for ApiError {
    fn from(err: BulkActionError) -> Self {
        match err {
            BulkActionError::Database(e) => ApiError::Database(e),
            BulkActionError::InvalidRequest(msg) => ApiError::BadRequest(msg),
        }
    }
}

impl From<SeedError> for ApiError {
    fn from(err: SeedError) -> Self {
        match err {
            SeedError::Database(e) => ApiError::Database(e),
            SeedError::Registration(e) => e.into(),
            SeedError::Contact(e) => e.into(),
            SeedError::Abstract(e) => e.into(),
            SeedError::Speaker(e) => e.into(),
            SeedError::Sponsorship(e) => e.into(),
            SeedError::Payment(e) => e.into(),
        }
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::Database(e) => ApiError::Database(e),
            AuthError::User(e) => e.into(),
            AuthError::Bcrypt(e) => ApiError::InternalError(e.to_string()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status_code = match &self {
            ApiError::Database(_) | ApiError::Io(_) | ApiError::InternalError(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            ApiError::Multipart(_) | ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden(_) => StatusCode::FORBIDDEN,
        };

        // Internal failures are logged with detail but answered with a
        // generic message; everything else carries its own text.
        let error_message = if status_code == StatusCode::INTERNAL_SERVER_ERROR {
            tracing::error!("internal error serving request: {}", self);
            "Internal server error".to_string()
        } else {
            match &self {
                ApiError::Multipart(_) => {
                    "Failed to process the uploaded form. Please check the file and try again."
                        .to_string()
                }
                ApiError::Conflict(msg)
                | ApiError::BadRequest(msg)
                | ApiError::NotFound(msg)
                | ApiError::Unauthorized(msg)
                | ApiError::Forbidden(msg) => msg.clone(),
                _ => self.to_string(),
            }
        };

        let response = ApiResponse::<()>::error(&error_message);
        (status_code, Json(response)).into_response()
    }
}
