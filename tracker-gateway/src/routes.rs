//! Axum route handlers for the exercise tracker API.

use std::sync::Arc;

use axum::{
    extract::{rejection::QueryRejection, Query, State},
    http::StatusCode,
    response::{Html, IntoResponse},
    routing::{get, post},
    Json, Router,
};
use chrono::{SubsecRound, Utc};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracker_core::{LogQueryParams, NewExerciseInput, NewUserInput, User, UserLog, UserSummary};
use tracker_store::UserStore;

use crate::{error::GatewayError, extract::Body};

// ── Shared state ─────────────────────────────────────────────────────────────

type Store = Arc<dyn UserStore>;

const INDEX_PAGE: &str = include_str!("../assets/index.html");

// ── Router ────────────────────────────────────────────────────────────────────

/// Build the application router backed by `store`.
pub fn create_router(store: Store) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/health", get(health))
        .route("/api/exercise/new-user", post(new_user))
        .route("/api/exercise/users", get(list_users))
        .route("/api/exercise/add", post(add_exercise))
        .route("/api/exercise/log", get(exercise_log))
        .fallback(not_found)
        .method_not_allowed_fallback(not_found)
        .with_state(store)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}

// ── Handlers ──────────────────────────────────────────────────────────────────

/// `GET /`: HTML page with the input forms.
pub async fn index() -> Html<&'static str> {
    Html(INDEX_PAGE)
}

/// `GET /health`: liveness probe that also touches the store.
///
/// # Errors
/// Returns [`GatewayError::Store`] if the store health check fails.
pub async fn health(State(store): State<Store>) -> Result<impl IntoResponse, GatewayError> {
    store.health_check().await?;
    Ok((StatusCode::OK, Json(serde_json::json!({"status": "ok"}))))
}

/// `POST /api/exercise/new-user`: register a username.
///
/// # Errors
/// Returns [`GatewayError::Core`] if the username is missing, or
/// [`GatewayError::Store`] wrapping `DuplicateUsername` if it is taken.
pub async fn new_user(
    State(store): State<Store>,
    Body(input): Body<NewUserInput>,
) -> Result<Json<UserSummary>, GatewayError> {
    let username = input.validate()?;
    let user = store.create_user(&username).await?;
    Ok(Json(user.summary()))
}

/// `GET /api/exercise/users`: every user's id and username.
///
/// # Errors
/// Returns [`GatewayError::Store`] if the store cannot be read.
pub async fn list_users(
    State(store): State<Store>,
) -> Result<Json<Vec<UserSummary>>, GatewayError> {
    Ok(Json(store.list_users().await?))
}

/// `POST /api/exercise/add`: append an exercise to a user's log.
///
/// # Errors
/// Returns [`GatewayError::Core`] on invalid fields, or
/// [`GatewayError::Store`] wrapping `UserNotFound` for an unknown `userId`.
pub async fn add_exercise(
    State(store): State<Store>,
    Body(input): Body<NewExerciseInput>,
) -> Result<Json<User>, GatewayError> {
    let new = input.validate()?;
    let user_id = new.user_id.clone();
    let exercise = new.into_exercise(Utc::now().trunc_subsecs(3));
    let user = store.append_exercise(&user_id, exercise).await?;
    Ok(Json(user))
}

/// `GET /api/exercise/log`: a user's log filtered by date range and limit.
///
/// # Errors
/// Returns [`GatewayError::Core`] if `userId` is missing or a bound is not a
/// date, or [`GatewayError::Store`] wrapping `UserNotFound`.
pub async fn exercise_log(
    State(store): State<Store>,
    params: Result<Query<LogQueryParams>, QueryRejection>,
) -> Result<Json<UserLog>, GatewayError> {
    let Query(params) = params.map_err(|e| GatewayError::InvalidRequest(e.body_text()))?;
    let (user_id, query) = params.validate()?;
    let user = store.get_user(&user_id).await?;
    Ok(Json(user.log_view(&query)))
}

async fn not_found() -> GatewayError {
    GatewayError::NotFound
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::Body as HttpBody,
        http::{header::CONTENT_TYPE, Request, StatusCode},
        response::Response,
    };
    use tower::ServiceExt;
    use tracker_store::MemoryStore;

    fn test_store() -> Store {
        Arc::new(MemoryStore::new())
    }

    async fn send(app: Router, req: Request<HttpBody>) -> Response {
        match app.oneshot(req).await {
            Ok(r) => r,
            Err(e) => panic!("handler error: {e}"),
        }
    }

    async fn body_bytes(resp: Response) -> Vec<u8> {
        match axum::body::to_bytes(resp.into_body(), 64 * 1024).await {
            Ok(b) => b.to_vec(),
            Err(e) => panic!("failed to read body: {e}"),
        }
    }

    fn get(uri: &str) -> Request<HttpBody> {
        match Request::builder().uri(uri).body(HttpBody::empty()) {
            Ok(r) => r,
            Err(e) => panic!("failed to build request: {e}"),
        }
    }

    fn post_form(uri: &str, form: &str) -> Request<HttpBody> {
        let req = Request::builder()
            .method("POST")
            .uri(uri)
            .header(CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(HttpBody::from(form.to_owned()));
        match req {
            Ok(r) => r,
            Err(e) => panic!("failed to build request: {e}"),
        }
    }

    #[tokio::test]
    async fn health_response_format_returns_ok_with_status_field() {
        let resp = send(create_router(test_store()), get("/health")).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let body: serde_json::Value = match serde_json::from_slice(&body_bytes(resp).await) {
            Ok(v) => v,
            Err(e) => panic!("invalid JSON: {e}"),
        };
        assert_eq!(body["status"], "ok");
    }

    #[tokio::test]
    async fn index_serves_html_forms() {
        let resp = send(create_router(test_store()), get("/")).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let html = String::from_utf8_lossy(&body_bytes(resp).await).into_owned();
        assert!(html.contains("/api/exercise/new-user"), "page must link the new-user form");
    }

    #[tokio::test]
    async fn unknown_route_is_plain_text_not_found() {
        let resp = send(create_router(test_store()), get("/api/nope")).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        assert_eq!(body_bytes(resp).await, b"not found");
    }

    #[tokio::test]
    async fn wrong_method_on_known_path_is_plain_text_not_found() {
        let resp = send(create_router(test_store()), get("/api/exercise/add")).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        assert_eq!(body_bytes(resp).await, b"not found");
    }

    #[tokio::test]
    async fn default_exercise_date_has_millisecond_precision() {
        let store = test_store();
        let user = match store.create_user("gil").await {
            Ok(u) => u,
            Err(e) => panic!("create failed: {e}"),
        };
        let form = format!("userId={}&description=run&duration=10", user.id);
        let resp = send(create_router(store), post_form("/api/exercise/add", &form)).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let body: serde_json::Value = match serde_json::from_slice(&body_bytes(resp).await) {
            Ok(v) => v,
            Err(e) => panic!("invalid JSON: {e}"),
        };
        let Some(raw) = body["log"][0]["date"].as_str() else { panic!("missing date in {body}") };
        let date = match chrono::DateTime::parse_from_rfc3339(raw) {
            Ok(d) => d,
            Err(e) => panic!("bad date {raw}: {e}"),
        };
        assert_eq!(date.timestamp_subsec_nanos() % 1_000_000, 0, "got {raw}");
    }

    #[tokio::test]
    async fn new_user_form_returns_id_and_username() {
        let store = test_store();
        let resp = send(create_router(store.clone()), post_form("/api/exercise/new-user", "username=fay")).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let body: serde_json::Value = match serde_json::from_slice(&body_bytes(resp).await) {
            Ok(v) => v,
            Err(e) => panic!("invalid JSON: {e}"),
        };
        assert_eq!(body["username"], "fay");
        let Some(id) = body["_id"].as_str() else { panic!("missing _id in {body}") };
        let listed = match store.list_users().await {
            Ok(l) => l,
            Err(e) => panic!("list failed: {e}"),
        };
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].id.as_str(), id);
    }

    #[tokio::test]
    async fn new_user_without_username_is_bad_request() {
        let resp = send(create_router(test_store()), post_form("/api/exercise/new-user", "")).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_bytes(resp).await, b"Path `username` is required.");
    }

    #[tokio::test]
    async fn add_exercise_for_unknown_user_is_not_found() {
        let resp = send(
            create_router(test_store()),
            post_form("/api/exercise/add", "userId=ghost123&description=run&duration=10"),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn log_without_user_id_is_bad_request() {
        let resp = send(create_router(test_store()), get("/api/exercise/log")).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_bytes(resp).await, b"Path `userId` is required.");
    }
}
