// src/api/handlers.rs

use crate::api::{cookies, pages, types::*, ApiState};
use crate::core::rules;
use crate::core::session::short_id;
use axum::extract::{Path, State};
use axum::http::header::{CONTENT_TYPE, SET_COOKIE};
use axum::http::{HeaderMap, HeaderValue, StatusCode};
use axum::response::{Html, IntoResponse, Response};
use axum::Json;

pub type ApiError = (StatusCode, Json<ErrorResponse>);

fn api_error(status: StatusCode, error: impl Into<String>) -> ApiError {
    (
        status,
        Json(ErrorResponse {
            error: error.into(),
        }),
    )
}

/// POST /api/chat — Route one message for the caller's session.
pub async fn chat(
    State(state): State<ApiState>,
    headers: HeaderMap,
    Json(body): Json<ChatInput>,
) -> Result<Response, ApiError> {
    let message = body.message.trim();
    if message.is_empty() {
        return Err(api_error(StatusCode::BAD_REQUEST, "message required"));
    }

    let (sid, fresh) = cookies::session_id(&headers);
    let handle = state.store.get_or_create(&sid);

    // Held until the reply is built, so same-session requests run in turn.
    let mut session = handle.lock().await;
    let result = state.router.handle(message, &mut session).await;
    drop(session);

    let mut response = match result {
        Ok(answer) => Json(ChatAnswer { answer }).into_response(),
        Err(e) if e.is_upstream() => {
            api_error(StatusCode::BAD_GATEWAY, format!("AI service error: {e}")).into_response()
        }
        Err(e) => {
            tracing::error!(session = %short_id(&sid), error = %e, "chat failed");
            api_error(StatusCode::INTERNAL_SERVER_ERROR, e.to_string()).into_response()
        }
    };
    // The session exists from here on; a failed first message still hands
    // out its id.
    if fresh {
        if let Ok(value) = HeaderValue::from_str(&cookies::session_cookie(&sid)) {
            response.headers_mut().insert(SET_COOKIE, value);
        }
    }
    Ok(response)
}

/// GET /api/hello — Fixed greeting, no session.
pub async fn hello() -> Json<ChatAnswer> {
    Json(ChatAnswer {
        answer: rules::HELLO.to_string(),
    })
}

/// GET /ping — Liveness check.
pub async fn ping() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "ok": true }))
}

/// GET / — Portal landing page.
pub async fn home() -> Html<&'static str> {
    Html(pages::HOME)
}

/// GET /dashboard — Customer dashboard.
pub async fn dashboard() -> Html<&'static str> {
    Html(pages::DASHBOARD)
}

/// GET /chat — Chat client. Issues the `sid` cookie when the browser has none.
pub async fn chat_page(headers: HeaderMap) -> Response {
    let (sid, _) = cookies::session_id(&headers);
    let mut response = Html(pages::CHAT).into_response();
    if let Ok(value) = HeaderValue::from_str(&cookies::session_cookie(&sid)) {
        response.headers_mut().insert(SET_COOKIE, value);
    }
    response
}

/// GET /manifest.webmanifest — PWA manifest from disk.
pub async fn manifest(State(state): State<ApiState>) -> Result<Response, ApiError> {
    let bytes = tokio::fs::read(&state.manifest)
        .await
        .map_err(|_| api_error(StatusCode::NOT_FOUND, "manifest not found"))?;
    Ok(([(CONTENT_TYPE, "application/manifest+json")], bytes).into_response())
}

/// GET /static/{file} — Flat asset lookup under the static directory.
pub async fn static_file(
    State(state): State<ApiState>,
    Path(file): Path<String>,
) -> Result<Response, ApiError> {
    if !is_safe_asset_name(&file) {
        return Err(api_error(StatusCode::NOT_FOUND, "not found"));
    }
    let bytes = tokio::fs::read(state.static_dir.join(&file))
        .await
        .map_err(|_| api_error(StatusCode::NOT_FOUND, "not found"))?;
    Ok(([(CONTENT_TYPE, content_type_for(&file))], bytes).into_response())
}

/// Only plain file names: no separators, no hidden files, no parent refs.
fn is_safe_asset_name(name: &str) -> bool {
    !name.is_empty()
        && !name.starts_with('.')
        && !name.contains(['/', '\\'])
        && !name.contains("..")
}

fn content_type_for(name: &str) -> &'static str {
    let ext = name.rsplit_once('.').map(|(_, e)| e).unwrap_or("");
    match ext.to_ascii_lowercase().as_str() {
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "svg" => "image/svg+xml",
        "ico" => "image/x-icon",
        "js" => "application/javascript",
        "css" => "text/css",
        "json" => "application/json",
        "webmanifest" => "application/manifest+json",
        "html" => "text/html; charset=utf-8",
        _ => "application/octet-stream",
    }
}
