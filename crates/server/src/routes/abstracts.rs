//! Abstract submission and document download.
//!
//! Uploaded documents are stored under the uploads root with a
//! server-generated name; download resolves the owning record first and
//! only ever joins that stored name onto the root, so caller input never
//! becomes a path.

use axum::{
    Json, Router,
    extract::{Multipart, Query, State},
    http::{StatusCode, header},
    response::IntoResponse,
    routing::get,
};
use db::models::abstract_submission::{AbstractError, AbstractSubmission, CreateAbstract};
use serde::Deserialize;
use utils::response::ApiResponse;
use uuid::Uuid;

use crate::{AppState, error::ApiError};

const ALLOWED_EXTENSIONS: [&str; 3] = ["pdf", "doc", "docx"];

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub limit: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub struct DownloadQuery {
    pub id: Option<Uuid>,
    pub filename: Option<String>,
}

fn allowed_extension(original_name: &str) -> Option<String> {
    let ext = original_name.rsplit('.').next()?.to_lowercase();
    if ALLOWED_EXTENSIONS.contains(&ext.as_str()) {
        Some(ext)
    } else {
        None
    }
}

async fn list_abstracts(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<ApiResponse<Vec<AbstractSubmission>>>, ApiError> {
    let pool = &state.db().pool;
    let abstracts = AbstractSubmission::find_recent(pool, query.limit.unwrap_or(100)).await?;
    Ok(Json(ApiResponse::success(abstracts)))
}

async fn submit_abstract(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<impl IntoResponse, ApiError> {
    let mut title = None;
    let mut author_name = None;
    let mut author_email = None;
    let mut track = None;
    let mut file: Option<(String, Vec<u8>)> = None;

    while let Some(field) = multipart.next_field().await? {
        let name = field.name().unwrap_or("").to_string();
        match name.as_str() {
            "title" => title = Some(field.text().await?),
            "authorName" => author_name = Some(field.text().await?),
            "authorEmail" => author_email = Some(field.text().await?),
            "track" => track = Some(field.text().await?),
            "file" => {
                let original = field.file_name().unwrap_or("").to_string();
                let data = field.bytes().await?;
                file = Some((original, data.to_vec()));
            }
            _ => {}
        }
    }

    let title = title.filter(|s| !s.trim().is_empty());
    let author_name = author_name.filter(|s| !s.trim().is_empty());
    let author_email = author_email.filter(|s| !s.trim().is_empty());
    let track = track.filter(|s| !s.trim().is_empty());

    let (Some(title), Some(author_name), Some(author_email), Some(track)) =
        (title, author_name, author_email, track)
    else {
        return Err(ApiError::BadRequest(
            "'title', 'authorName', 'authorEmail' and 'track' are required".into(),
        ));
    };

    let Some((original_name, data)) = file else {
        return Err(ApiError::BadRequest("an abstract document is required".into()));
    };
    let Some(ext) = allowed_extension(&original_name) else {
        return Err(ApiError::BadRequest(
            "the abstract document must be a .pdf, .doc or .docx file".into(),
        ));
    };

    let stored_name = format!("{}.{}", Uuid::new_v4(), ext);
    tokio::fs::write(state.uploads_dir().join(&stored_name), &data).await?;

    let pool = &state.db().pool;
    let submission = AbstractSubmission::create(
        pool,
        &CreateAbstract {
            title,
            author_name,
            author_email,
            track,
            file_name: stored_name,
        },
    )
    .await?;

    Ok((StatusCode::CREATED, Json(ApiResponse::success(submission))))
}

async fn download_abstract(
    State(state): State<AppState>,
    Query(query): Query<DownloadQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let pool = &state.db().pool;

    let record = if let Some(id) = query.id {
        AbstractSubmission::find_by_id(pool, id).await?
    } else if let Some(ref filename) = query.filename {
        AbstractSubmission::find_by_file_name(pool, filename).await?
    } else {
        return Err(ApiError::BadRequest(
            "either 'id' or 'filename' must be provided".into(),
        ));
    };

    let record = record.ok_or(AbstractError::NotFound)?;

    let path = state.uploads_dir().join(&record.file_name);
    let bytes = match tokio::fs::read(&path).await {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            // Stale reference: the record exists but its file is gone.
            return Err(AbstractError::FileMissing.into());
        }
        Err(e) => return Err(e.into()),
    };

    let content_type = mime_guess::from_path(&record.file_name)
        .first_or_octet_stream()
        .to_string();
    let disposition = format!("attachment; filename=\"{}\"", record.file_name);

    Ok((
        [
            (header::CONTENT_TYPE, content_type),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        bytes,
    ))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/abstracts", get(list_abstracts).post(submit_abstract))
        .route("/abstracts/download", get(download_abstract))
}
