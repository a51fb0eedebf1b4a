// handlers/public/auth/web.rs - HTML registration, login and logout

use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    response::{Html, IntoResponse, Redirect, Response},
    Form,
};
use tracing::info;

use crate::auth::{self, AuthError};
use crate::error::{messages, WebError};
use crate::handlers::form::CredentialsForm;
use crate::handlers::views::{render, LoginPage, RegisterPage};
use crate::server::AppState;
use crate::session::Session;

/// GET /register
pub async fn register_page() -> Result<Html<String>, WebError> {
    render(&RegisterPage::default())
}

/// POST /register - create the account and log it in, or re-render with the error
pub async fn register_submit(
    State(state): State<AppState>,
    Form(form): Form<CredentialsForm>,
) -> Result<Response, WebError> {
    match auth::register(&state.db, &state.hasher, &form.username, &form.password).await {
        Ok(user) => {
            let mut session = Session::default();
            session.authenticate(user.id);
            let cookie = state.sessions.save(&session)?;
            Ok((cookie, Redirect::to("/")).into_response())
        }
        Err(AuthError::DuplicateUsername) => {
            let page = render(&RegisterPage {
                error: Some(messages::DUPLICATE_USERNAME),
            })?;
            Ok((StatusCode::BAD_REQUEST, page).into_response())
        }
        Err(e) => Err(e.into()),
    }
}

/// GET /login
pub async fn login_page() -> Result<Html<String>, WebError> {
    render(&LoginPage::default())
}

/// POST /login
pub async fn login_submit(
    State(state): State<AppState>,
    Form(form): Form<CredentialsForm>,
) -> Result<Response, WebError> {
    match auth::login(&state.db, &state.hasher, &form.username, &form.password).await {
        Ok(user) => {
            let mut session = Session::default();
            session.authenticate(user.id);
            let cookie = state.sessions.save(&session)?;
            Ok((cookie, Redirect::to("/")).into_response())
        }
        Err(AuthError::InvalidCredentials) => {
            let page = render(&LoginPage {
                error: Some(messages::INVALID_CREDENTIALS),
            })?;
            Ok((StatusCode::UNAUTHORIZED, page).into_response())
        }
        Err(e) => Err(e.into()),
    }
}

/// GET /logout - always succeeds, with or without a session
pub async fn logout(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Response, WebError> {
    let mut session = state.sessions.load(&headers);
    if let Some(user_id) = session.user_id() {
        info!(user_id, "logged out");
    }
    session.clear();

    let cookie = state.sessions.save(&session)?;
    Ok((cookie, Redirect::to("/login")).into_response())
}
