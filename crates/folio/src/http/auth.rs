//! Admin gate for the HTTP surface.
//!
//! Reads are public. Any other method under `/api` needs an allowlisted
//! identity in the configured header. The dashboard at `/admin` redirects to
//! `/login` instead of returning an error status.

use super::error::{error_body, ApiResult};
use super::AppState;
use axum::extract::{Request, State};
use axum::http::{HeaderMap, Method, StatusCode};
use axum::middleware::Next;
use axum::response::{IntoResponse, Redirect, Response};
use axum::Json;
use folioapp::auth::Access;

fn identity<'a>(state: &AppState, headers: &'a HeaderMap) -> Option<&'a str> {
    headers
        .get(&state.identity_header)
        .and_then(|value| value.to_str().ok())
}

fn is_read(method: &Method) -> bool {
    matches!(*method, Method::GET | Method::HEAD | Method::OPTIONS)
}

pub async fn require_admin_for_writes(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    if is_read(request.method()) {
        return next.run(request).await;
    }

    match state.gate.check(identity(&state, request.headers())) {
        Access::Granted => next.run(request).await,
        Access::Anonymous => {
            tracing::info!(path = %request.uri().path(), "write rejected: no identity");
            error_body(
                StatusCode::UNAUTHORIZED,
                "unauthorized",
                "sign in to edit content",
            )
        }
        Access::Denied => {
            tracing::warn!(path = %request.uri().path(), "write rejected: identity not allowed");
            error_body(
                StatusCode::FORBIDDEN,
                "forbidden",
                "this account may not edit content",
            )
        }
    }
}

/// `GET /admin`: dashboard stats for admins, a redirect for everyone else.
pub async fn admin(State(state): State<AppState>, headers: HeaderMap) -> ApiResult<Response> {
    if state.gate.check(identity(&state, &headers)) != Access::Granted {
        return Ok(Redirect::to("/login").into_response());
    }
    let dashboard = state.api.dashboard().await?;
    Ok(Json(dashboard).into_response())
}

pub async fn login(State(state): State<AppState>) -> String {
    format!(
        "Sign in through the site's identity provider. Requests must carry the `{}` header.\n",
        state.identity_header
    )
}
