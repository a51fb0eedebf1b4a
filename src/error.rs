// HTTP error types for the JSON API and the web UI
use axum::{
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
    Json,
};
use serde_json::{json, Value};

use crate::auth::AuthError;
use crate::database::DatabaseError;
use crate::session::SessionError;

/// User-facing messages shared by both surfaces
pub mod messages {
    pub const UNAUTHORIZED: &str = "No autorizado";
    pub const FORBIDDEN: &str = "No autorizado";
    pub const METHOD_NOT_ALLOWED: &str = "Método no permitido";
    pub const INVALID_ID: &str = "ID inválido";
    pub const INVALID_FORM: &str = "Formulario inválido";
    pub const DUPLICATE_USERNAME: &str = "Usuario ya existe";
    pub const INVALID_CREDENTIALS: &str = "Usuario o contraseña incorrectos";
    pub const DATABASE_ERROR: &str = "Error de base de datos";
    pub const SESSION_ERROR: &str = "Error guardando sesión";
    pub const HASH_ERROR: &str = "Error procesando la contraseña";
    pub const TEMPLATE_ERROR: &str = "Error ejecutando plantilla";
    pub const INSERT_TASK_ERROR: &str = "Error insertando tarea";
    pub const UPDATE_TASK_ERROR: &str = "Error actualizando tarea";
    pub const DELETE_TASK_ERROR: &str = "Error eliminando tarea";
    pub const LIST_TASKS_ERROR: &str = "Error obteniendo tareas";
    pub const DATABASE_UNAVAILABLE: &str = "Base de datos no disponible";

    pub const REGISTERED: &str = "Usuario registrado correctamente";
    pub const LOGGED_IN: &str = "Login correcto";
    pub const LOGGED_OUT: &str = "Logout correcto";
    pub const TASK_CREATED: &str = "Tarea creada";
    pub const TASK_UPDATED: &str = "Tarea actualizada";
    pub const TASK_DELETED: &str = "Tarea eliminada";
}

/// HTTP API error with a status code and a client-safe message
#[derive(Debug)]
pub enum ApiError {
    // 400 Bad Request
    BadRequest(String),

    // 401 Unauthorized
    Unauthorized(String),

    // 403 Forbidden
    Forbidden(String),

    // 405 Method Not Allowed
    MethodNotAllowed(String),

    // 500 Internal Server Error
    InternalServerError(String),

    // 503 Service Unavailable
    ServiceUnavailable(String),
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden(_) => StatusCode::FORBIDDEN,
            ApiError::MethodNotAllowed(_) => StatusCode::METHOD_NOT_ALLOWED,
            ApiError::InternalServerError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::ServiceUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
        }
    }

    /// Get client-safe error message
    pub fn message(&self) -> &str {
        match self {
            ApiError::BadRequest(msg)
            | ApiError::Unauthorized(msg)
            | ApiError::Forbidden(msg)
            | ApiError::MethodNotAllowed(msg)
            | ApiError::InternalServerError(msg)
            | ApiError::ServiceUnavailable(msg) => msg,
        }
    }

    /// Convert to JSON response body
    pub fn to_json(&self) -> Value {
        json!({ "error": self.message() })
    }

    /// Replace the generic 500 message produced by a store failure with one
    /// naming the operation. Other variants pass through unchanged.
    pub fn with_internal_message(self, message: &str) -> Self {
        match self {
            ApiError::InternalServerError(_) => ApiError::internal_server_error(message),
            other => other,
        }
    }
}

impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        ApiError::BadRequest(message.into())
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        ApiError::Unauthorized(message.into())
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        ApiError::Forbidden(message.into())
    }

    pub fn method_not_allowed() -> Self {
        ApiError::MethodNotAllowed(messages::METHOD_NOT_ALLOWED.to_string())
    }

    pub fn internal_server_error(message: impl Into<String>) -> Self {
        ApiError::InternalServerError(message.into())
    }

    pub fn service_unavailable(message: impl Into<String>) -> Self {
        ApiError::ServiceUnavailable(message.into())
    }
}

impl From<DatabaseError> for ApiError {
    fn from(err: DatabaseError) -> Self {
        match err {
            DatabaseError::NotFound(_) => ApiError::forbidden(messages::FORBIDDEN),
            DatabaseError::UniqueViolation(msg) => {
                tracing::error!("Unexpected unique violation: {}", msg);
                ApiError::internal_server_error(messages::DATABASE_ERROR)
            }
            DatabaseError::Sqlx(sqlx_err) => {
                // Log the real error but return generic message
                tracing::error!("SQLx error: {}", sqlx_err);
                ApiError::internal_server_error(messages::DATABASE_ERROR)
            }
        }
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::DuplicateUsername => ApiError::bad_request(messages::DUPLICATE_USERNAME),
            AuthError::InvalidCredentials => ApiError::unauthorized(messages::INVALID_CREDENTIALS),
            AuthError::Unauthenticated => ApiError::unauthorized(messages::UNAUTHORIZED),
            AuthError::Forbidden => ApiError::forbidden(messages::FORBIDDEN),
            AuthError::InvalidId(_) => ApiError::bad_request(messages::INVALID_ID),
            AuthError::PasswordHash => {
                tracing::error!("Password hashing failed");
                ApiError::internal_server_error(messages::HASH_ERROR)
            }
            AuthError::Store(db_err) => db_err.into(),
        }
    }
}

impl From<SessionError> for ApiError {
    fn from(err: SessionError) -> Self {
        tracing::error!("Session error: {}", err);
        ApiError::internal_server_error(messages::SESSION_ERROR)
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message())
    }
}

impl std::error::Error for ApiError {}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status_code(), Json(self.to_json())).into_response()
    }
}

/// Failure on the HTML surface. Renders as a plain-text status page, except
/// unauthenticated requests which are sent to the login form.
#[derive(Debug)]
pub enum WebError {
    LoginRequired,
    Status(StatusCode, String),
}

impl WebError {
    pub fn status(status: StatusCode, message: impl Into<String>) -> Self {
        WebError::Status(status, message.into())
    }

    pub fn method_not_allowed() -> Self {
        Self::status(StatusCode::METHOD_NOT_ALLOWED, messages::METHOD_NOT_ALLOWED)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::status(StatusCode::INTERNAL_SERVER_ERROR, message)
    }

    pub fn with_internal_message(self, message: &str) -> Self {
        match self {
            WebError::Status(status, _) if status == StatusCode::INTERNAL_SERVER_ERROR => {
                Self::internal(message)
            }
            other => other,
        }
    }
}

impl From<ApiError> for WebError {
    fn from(err: ApiError) -> Self {
        match err {
            ApiError::Unauthorized(_) => WebError::LoginRequired,
            other => WebError::Status(other.status_code(), other.message().to_string()),
        }
    }
}

impl From<AuthError> for WebError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::InvalidId(raw) => WebError::status(
                StatusCode::BAD_REQUEST,
                format!("{}: {:?}", messages::INVALID_ID, raw),
            ),
            other => ApiError::from(other).into(),
        }
    }
}

impl From<DatabaseError> for WebError {
    fn from(err: DatabaseError) -> Self {
        ApiError::from(err).into()
    }
}

impl From<SessionError> for WebError {
    fn from(err: SessionError) -> Self {
        ApiError::from(err).into()
    }
}

impl From<askama::Error> for WebError {
    fn from(err: askama::Error) -> Self {
        tracing::error!("Template error: {}", err);
        WebError::internal(messages::TEMPLATE_ERROR)
    }
}

impl IntoResponse for WebError {
    fn into_response(self) -> Response {
        match self {
            WebError::LoginRequired => Redirect::to("/login").into_response(),
            WebError::Status(status, message) => (status, message).into_response(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn auth_errors_map_to_statuses() {
        let cases = [
            (AuthError::DuplicateUsername, StatusCode::BAD_REQUEST, "Usuario ya existe"),
            (
                AuthError::InvalidCredentials,
                StatusCode::UNAUTHORIZED,
                "Usuario o contraseña incorrectos",
            ),
            (AuthError::Unauthenticated, StatusCode::UNAUTHORIZED, "No autorizado"),
            (AuthError::Forbidden, StatusCode::FORBIDDEN, "No autorizado"),
            (AuthError::InvalidId("x".into()), StatusCode::BAD_REQUEST, "ID inválido"),
        ];

        for (err, status, message) in cases {
            let api = ApiError::from(err);
            assert_eq!(api.status_code(), status);
            assert_eq!(api.to_json(), json!({ "error": message }));
        }
    }

    #[test]
    fn store_errors_hide_details() {
        let err = ApiError::from(AuthError::Store(DatabaseError::Sqlx(sqlx::Error::PoolClosed)));
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.message(), messages::DATABASE_ERROR);

        let named = err.with_internal_message(messages::DELETE_TASK_ERROR);
        assert_eq!(named.message(), "Error eliminando tarea");
    }

    #[test]
    fn missing_rows_are_forbidden() {
        let err = ApiError::from(DatabaseError::NotFound("task 9".into()));
        assert_eq!(err.status_code(), StatusCode::FORBIDDEN);
        assert_eq!(err.message(), "No autorizado");
    }

    #[test]
    fn with_internal_message_leaves_client_errors_alone() {
        let err = ApiError::forbidden(messages::FORBIDDEN)
            .with_internal_message(messages::UPDATE_TASK_ERROR);
        assert_eq!(err.status_code(), StatusCode::FORBIDDEN);
        assert_eq!(err.message(), "No autorizado");
    }

    #[test]
    fn web_errors_redirect_when_unauthenticated() {
        let response = WebError::from(AuthError::Unauthenticated).into_response();
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(response.headers()["location"], "/login");
    }

    #[test]
    fn web_invalid_id_names_the_input() {
        match WebError::from(AuthError::InvalidId("abc".into())) {
            WebError::Status(status, message) => {
                assert_eq!(status, StatusCode::BAD_REQUEST);
                assert_eq!(message, "ID inválido: \"abc\"");
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn web_forbidden_is_plain_text() {
        let response = WebError::from(AuthError::Forbidden).into_response();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }
}
