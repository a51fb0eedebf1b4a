//! Router assembly and the HTTP server lifecycle.

use std::sync::Arc;

use anyhow::Context;
use axum::{
    extract::State,
    middleware::from_fn_with_state,
    routing::{get, post, put},
    Json, Router,
};
use serde_json::json;
use tower_http::{services::ServeDir, trace::TraceLayer};
use tracing::info;

use crate::auth::Argon2Hasher;
use crate::config::AppConfig;
use crate::database::Database;
use crate::error::{messages, ApiError};
use crate::handlers::{api_method_not_allowed, protected, public, web_method_not_allowed};
use crate::middleware::{content_security_policy, require_login_api, require_login_web};
use crate::session::SessionManager;

/// Everything a handler can reach. Cheap to clone.
#[derive(Clone, Debug)]
pub struct AppState {
    pub db: Database,
    pub sessions: SessionManager,
    pub hasher: Argon2Hasher,
    pub config: Arc<AppConfig>,
}

impl AppState {
    pub fn new(db: Database, config: AppConfig) -> Self {
        Self {
            db,
            sessions: SessionManager::new(&config.session),
            hasher: Argon2Hasher::from_config(&config.security),
            config: Arc::new(config),
        }
    }
}

pub fn app(state: AppState) -> Router {
    let mut router = Router::new()
        .merge(web_public_routes())
        .merge(web_protected_routes(&state))
        .nest("/api", api_public_routes().merge(api_protected_routes(&state)))
        .route("/health", get(health))
        .nest_service("/static", ServeDir::new(&state.config.server.static_dir))
        .with_state(state.clone());

    // Global middleware
    if let Some(csp) = content_security_policy(&state.config.security.content_security_policy) {
        router = router.layer(csp);
    }
    if state.config.security.enable_request_logging {
        router = router.layer(TraceLayer::new_for_http());
    }

    router
}

fn web_public_routes() -> Router<AppState> {
    use public::auth::web;

    Router::new()
        .route(
            "/register",
            get(web::register_page)
                .post(web::register_submit)
                .fallback(web_method_not_allowed),
        )
        .route(
            "/login",
            get(web::login_page)
                .post(web::login_submit)
                .fallback(web_method_not_allowed),
        )
        .route("/logout", get(web::logout).fallback(web_method_not_allowed))
}

fn web_protected_routes(state: &AppState) -> Router<AppState> {
    use protected::tasks::web;

    Router::new()
        .route("/", get(web::index).fallback(web_method_not_allowed))
        .route(
            "/addTask",
            get(web::add_task_page)
                .post(web::add_task_submit)
                .fallback(web_method_not_allowed),
        )
        .route(
            "/delete",
            get(web::delete)
                .post(web::delete)
                .fallback(web_method_not_allowed),
        )
        .route("/update", post(web::update).fallback(web_method_not_allowed))
        .route_layer(from_fn_with_state(state.clone(), require_login_web))
}

fn api_public_routes() -> Router<AppState> {
    use public::auth::api;

    Router::new()
        .route("/register", post(api::register).fallback(api_method_not_allowed))
        .route("/login", post(api::login).fallback(api_method_not_allowed))
        .route("/logout", get(api::logout).fallback(api_method_not_allowed))
}

fn api_protected_routes(state: &AppState) -> Router<AppState> {
    use protected::tasks::api;

    Router::new()
        .route(
            "/tasks",
            get(api::list)
                .post(api::create)
                .fallback(api_method_not_allowed),
        )
        .route(
            "/tasks/:id",
            put(api::update)
                .delete(api::delete)
                .post(api::delete)
                .fallback(api_method_not_allowed),
        )
        .route_layer(from_fn_with_state(state.clone(), require_login_api))
}

/// GET /health - pings the database
async fn health(State(state): State<AppState>) -> Result<Json<serde_json::Value>, ApiError> {
    state.db.health_check().await.map_err(|e| {
        tracing::error!("Health check failed: {}", e);
        ApiError::service_unavailable(messages::DATABASE_UNAVAILABLE)
    })?;

    Ok(Json(json!({ "status": "ok" })))
}

/// Connect, prepare the schema, and serve until Ctrl-C or SIGTERM.
pub async fn serve(config: AppConfig) -> anyhow::Result<()> {
    config.validate()?;
    info!("Starting todo-list in {:?} mode", config.environment);

    let db = Database::connect(&config.database)
        .await
        .with_context(|| format!("failed to open database {}", config.database.url))?;
    db.ensure_schema().await.context("failed to prepare schema")?;

    let bind_addr = config.bind_addr();
    let state = AppState::new(db.clone(), config);

    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", bind_addr))?;
    info!("Listening on http://{}", bind_addr);

    axum::serve(listener, app(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    db.close().await;
    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    use tokio::signal;

    let ctrl_c = async {
        signal::ctrl_c().await.ok();
    };
    #[cfg(unix)]
    let term = async {
        if let Ok(mut s) = signal::unix::signal(signal::unix::SignalKind::terminate()) {
            s.recv().await;
        }
    };
    #[cfg(not(unix))]
    let term = std::future::pending::<()>();

    tokio::select! { _ = ctrl_c => {}, _ = term => {} }
    info!("Shutdown signal received");
}
