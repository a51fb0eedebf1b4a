use axum::{
    extract::{Request, State},
    http::HeaderMap,
    middleware::Next,
    response::Response,
};

use crate::auth::AuthError;
use crate::error::{ApiError, WebError};
use crate::server::AppState;
use crate::session::SessionManager;

/// Authenticated user, inserted into request extensions by the login gates
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CurrentUser {
    pub id: i64,
}

/// Gate for HTML routes: anonymous requests are redirected to `/login`.
pub async fn require_login_web(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, WebError> {
    let user = current_user(&state.sessions, request.headers())?;
    request.extensions_mut().insert(user);

    Ok(next.run(request).await)
}

/// Gate for JSON routes: anonymous requests get `401 {"error":"No autorizado"}`.
pub async fn require_login_api(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let user = current_user(&state.sessions, request.headers())?;
    request.extensions_mut().insert(user);

    Ok(next.run(request).await)
}

fn current_user(sessions: &SessionManager, headers: &HeaderMap) -> Result<CurrentUser, AuthError> {
    sessions
        .load(headers)
        .user_id()
        .map(|id| CurrentUser { id })
        .ok_or(AuthError::Unauthenticated)
}
