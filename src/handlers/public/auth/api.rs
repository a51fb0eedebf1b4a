// handlers/public/auth/api.rs - JSON registration, login and logout
//
// Bodies may be form-urlencoded or JSON: {"username": "...", "password": "..."}

use axum::{extract::State, http::HeaderMap};
use tracing::info;

use crate::auth;
use crate::error::{messages, ApiError};
use crate::handlers::form::{CredentialsForm, Input};
use crate::middleware::{ApiResponse, Message};
use crate::server::AppState;
use crate::session::{Session, SessionCookie};

type AuthResult = Result<(SessionCookie, ApiResponse<Message>), ApiError>;

/// POST /api/register → 201 {message} and a session cookie
pub async fn register(
    State(state): State<AppState>,
    Input(form): Input<CredentialsForm>,
) -> AuthResult {
    let user = auth::register(&state.db, &state.hasher, &form.username, &form.password).await?;

    let mut session = Session::default();
    session.authenticate(user.id);
    let cookie = state.sessions.save(&session)?;

    Ok((
        cookie,
        ApiResponse::created(Message::new(messages::REGISTERED)),
    ))
}

/// POST /api/login → 200 {message} and a session cookie
pub async fn login(
    State(state): State<AppState>,
    Input(form): Input<CredentialsForm>,
) -> AuthResult {
    let user = auth::login(&state.db, &state.hasher, &form.username, &form.password).await?;

    let mut session = Session::default();
    session.authenticate(user.id);
    let cookie = state.sessions.save(&session)?;

    Ok((
        cookie,
        ApiResponse::success(Message::new(messages::LOGGED_IN)),
    ))
}

/// GET /api/logout → 200 {message}; the cookie is expired
pub async fn logout(State(state): State<AppState>, headers: HeaderMap) -> AuthResult {
    let mut session = state.sessions.load(&headers);
    if let Some(user_id) = session.user_id() {
        info!(user_id, "logged out");
    }
    session.clear();

    let cookie = state.sessions.save(&session)?;
    Ok((
        cookie,
        ApiResponse::success(Message::new(messages::LOGGED_OUT)),
    ))
}
