//! End-to-end route tests over an injected in-memory database.

use std::str::FromStr;

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
};
use chrono::{Duration, Utc};
use db::{
    DBService,
    models::{
        abstract_submission::{AbstractSubmission, CreateAbstract},
        contact::{Contact, CreateContact},
        user::{CreateUser, Session, User},
    },
    services::AuthService,
};
use serde_json::{Value, json};
use server::{AppState, routes};
use sqlx::{
    SqlitePool,
    sqlite::{SqliteConnectOptions, SqlitePoolOptions},
};
use tempfile::TempDir;
use tower::ServiceExt;
use uuid::Uuid;

async fn spawn_app() -> (Router, SqlitePool, TempDir) {
    let options = SqliteConnectOptions::from_str("sqlite::memory:")
        .expect("invalid sqlite config")
        .create_if_missing(true)
        .foreign_keys(true);
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect_with(options)
        .await
        .expect("failed to open sqlite memory db");

    let db = DBService::from_pool(pool.clone())
        .await
        .expect("failed to run migrations");

    let uploads = TempDir::new().expect("failed to create uploads dir");
    let state = AppState::new(db, uploads.path().to_path_buf());
    (routes::router(state), pool, uploads)
}

async fn admin_cookie(pool: &SqlitePool) -> String {
    let user = User::create(
        pool,
        &CreateUser {
            username: format!("admin-{}", Uuid::new_v4().simple()),
            email: "admin@example.org".into(),
            password_hash: "unused-in-session-tests".into(),
            is_admin: true,
        },
    )
    .await
    .expect("failed to create admin user");

    let token = AuthService::generate_session_token();
    let token_hash = AuthService::hash_session_token(&token);
    Session::create(pool, user.id, &token_hash, Utc::now() + Duration::days(1))
        .await
        .expect("failed to create session");

    format!("session_id={}", token)
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("failed to read body");
    serde_json::from_slice(&bytes).expect("body is not JSON")
}

fn json_request(method: &str, uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .expect("failed to build request")
}

#[tokio::test]
async fn registration_create_returns_201_with_pending_status() {
    let (app, _pool, _uploads) = spawn_app().await;

    let response = app
        .oneshot(json_request(
            "POST",
            "/api/registrations",
            json!({
                "firstName": "A",
                "lastName": "B",
                "email": "a@b.com",
                "phone": "1",
                "organization": "O",
                "position": "P",
                "district": "D",
                "registrationType": "regular"
            }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);
    let body = body_json(response).await;
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["status"], "pending");
    assert_eq!(body["data"]["registrationType"], "regular");
}

#[tokio::test]
async fn duplicate_registration_email_conflicts() {
    let (app, _pool, _uploads) = spawn_app().await;

    let payload = json!({
        "firstName": "A",
        "lastName": "B",
        "email": "dup@b.com",
        "phone": "1",
        "registrationType": "student"
    });

    let first = app
        .clone()
        .oneshot(json_request("POST", "/api/registrations", payload.clone()))
        .await
        .unwrap();
    assert_eq!(first.status(), StatusCode::CREATED);

    let second = app
        .oneshot(json_request("POST", "/api/registrations", payload))
        .await
        .unwrap();
    assert_eq!(second.status(), StatusCode::CONFLICT);
    let body = body_json(second).await;
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn registration_with_missing_fields_is_rejected() {
    let (app, _pool, _uploads) = spawn_app().await;

    let response = app
        .oneshot(json_request(
            "POST",
            "/api/registrations",
            json!({
                "firstName": " ",
                "lastName": "B",
                "email": "a@b.com",
                "phone": "1",
                "registrationType": "regular"
            }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn admin_routes_require_a_session() {
    let (app, _pool, _uploads) = spawn_app().await;

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/admin/dashboard")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn dashboard_on_empty_store_is_all_zeros() {
    let (app, pool, _uploads) = spawn_app().await;
    let cookie = admin_cookie(&pool).await;

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/admin/dashboard")
                .header(header::COOKIE, &cookie)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["data"]["totals"]["registrations"], 0);
    assert_eq!(body["data"]["totals"]["payments"], 0);
    assert_eq!(body["data"]["paymentBreakdown"], json!([]));
    assert_eq!(body["data"]["recent"]["contacts"], json!([]));
}

#[tokio::test]
async fn admin_patch_updates_contact_status() {
    let (app, pool, _uploads) = spawn_app().await;
    let cookie = admin_cookie(&pool).await;

    let contact = Contact::create(
        &pool,
        &CreateContact {
            name: "Kojo".into(),
            email: "kojo@example.org".into(),
            subject: "Badge".into(),
            message: "Name misspelled on badge".into(),
            priority: None,
        },
    )
    .await
    .unwrap();

    let mut request = json_request(
        "PATCH",
        &format!("/api/admin/contacts/{}", contact.id),
        json!({ "status": "resolved" }),
    );
    request
        .headers_mut()
        .insert(header::COOKIE, cookie.parse().unwrap());

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["data"]["status"], "resolved");
}

#[tokio::test]
async fn admin_patch_rejects_status_outside_vocabulary() {
    let (app, pool, _uploads) = spawn_app().await;
    let cookie = admin_cookie(&pool).await;

    let contact = Contact::create(
        &pool,
        &CreateContact {
            name: "Abena".into(),
            email: "abena@example.org".into(),
            subject: "Visa letter".into(),
            message: "Need an invitation letter".into(),
            priority: None,
        },
    )
    .await
    .unwrap();

    let mut request = json_request(
        "PATCH",
        &format!("/api/admin/contacts/{}", contact.id),
        json!({ "status": "approved" }),
    );
    request
        .headers_mut()
        .insert(header::COOKIE, cookie.parse().unwrap());

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let reloaded = Contact::find_by_id(&pool, contact.id).await.unwrap().unwrap();
    assert_eq!(reloaded.status, "new");
}

#[tokio::test]
async fn bulk_action_reports_matched_rows_only() {
    let (app, pool, _uploads) = spawn_app().await;
    let cookie = admin_cookie(&pool).await;

    let submission = AbstractSubmission::create(
        &pool,
        &CreateAbstract {
            title: "Telemedicine uptake".into(),
            author_name: "E. Quartey".into(),
            author_email: "quartey@example.org".into(),
            track: "digital_health".into(),
            file_name: "tm.pdf".into(),
        },
    )
    .await
    .unwrap();

    let mut request = json_request(
        "POST",
        "/api/admin/bulk-action",
        json!({
            "action": "approve",
            "entityType": "abstracts",
            "ids": [submission.id, Uuid::new_v4()]
        }),
    );
    request
        .headers_mut()
        .insert(header::COOKIE, cookie.parse().unwrap());

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["data"]["updatedCount"], 1);
}

#[tokio::test]
async fn bulk_action_with_empty_ids_is_a_bad_request() {
    let (app, pool, _uploads) = spawn_app().await;
    let cookie = admin_cookie(&pool).await;

    let mut request = json_request(
        "POST",
        "/api/admin/bulk-action",
        json!({ "action": "approve", "entityType": "abstracts", "ids": [] }),
    );
    request
        .headers_mut()
        .insert(header::COOKIE, cookie.parse().unwrap());

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn download_distinguishes_missing_record_from_missing_file() {
    let (app, pool, uploads) = spawn_app().await;

    // Unknown record
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri(format!("/api/abstracts/download?id={}", Uuid::new_v4()))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body = body_json(response).await;
    assert_eq!(body["message"], "Abstract not found");

    // Record present, file gone
    let stale = AbstractSubmission::create(
        &pool,
        &CreateAbstract {
            title: "Stale".into(),
            author_name: "Nobody".into(),
            author_email: "nobody@example.org".into(),
            track: "misc".into(),
            file_name: "gone.pdf".into(),
        },
    )
    .await
    .unwrap();

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri(format!("/api/abstracts/download?id={}", stale.id))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body = body_json(response).await;
    assert_eq!(
        body["message"],
        "The uploaded document for this abstract is missing from storage"
    );

    // Record present, file present
    let live = AbstractSubmission::create(
        &pool,
        &CreateAbstract {
            title: "Live".into(),
            author_name: "Somebody".into(),
            author_email: "somebody@example.org".into(),
            track: "misc".into(),
            file_name: "live.pdf".into(),
        },
    )
    .await
    .unwrap();
    std::fs::write(uploads.path().join("live.pdf"), b"%PDF-1.4 demo").unwrap();

    let response = app
        .oneshot(
            Request::builder()
                .uri(format!("/api/abstracts/download?filename={}", live.file_name))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok()),
        Some("application/pdf")
    );
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    assert_eq!(bytes.as_ref(), &b"%PDF-1.4 demo"[..]);
}

#[tokio::test]
async fn contact_bulk_status_update_via_put() {
    let (app, pool, _uploads) = spawn_app().await;

    let contact = Contact::create(
        &pool,
        &CreateContact {
            name: "Esi".into(),
            email: "esi@example.org".into(),
            subject: "Parking".into(),
            message: "Is parking available?".into(),
            priority: None,
        },
    )
    .await
    .unwrap();

    let response = app
        .oneshot(json_request(
            "PUT",
            "/api/contacts",
            json!({ "ids": [contact.id], "status": "in_progress" }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["data"]["updatedCount"], 1);
}

#[tokio::test]
async fn login_issues_a_working_session_cookie() {
    let (app, pool, _uploads) = spawn_app().await;

    let password_hash = AuthService::hash_password("correct horse").unwrap();
    User::create(
        &pool,
        &CreateUser {
            username: "gatekeeper".into(),
            email: "gatekeeper@example.org".into(),
            password_hash,
            is_admin: true,
        },
    )
    .await
    .unwrap();

    let wrong = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/auth/login",
            json!({ "username": "gatekeeper", "password": "wrong" }),
        ))
        .await
        .unwrap();
    assert_eq!(wrong.status(), StatusCode::UNAUTHORIZED);

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/auth/login",
            json!({ "username": "gatekeeper", "password": "correct horse" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let cookie = response
        .headers()
        .get(header::SET_COOKIE)
        .and_then(|v| v.to_str().ok())
        .and_then(|c| c.split(';').next())
        .expect("login must set a session cookie")
        .to_string();

    let me = app
        .oneshot(
            Request::builder()
                .uri("/api/auth/me")
                .header(header::COOKIE, &cookie)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(me.status(), StatusCode::OK);
    let body = body_json(me).await;
    assert_eq!(body["data"]["username"], "gatekeeper");
    assert_eq!(body["data"]["isAdmin"], true);
}
