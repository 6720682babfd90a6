//! Browser form UI for work orders.
//!
//! Serves one server-rendered HTML view per operation (add, list, history,
//! close, show). Each request opens its own [`WorkOrderStore`] on a
//! blocking thread and drops it before responding; the server keeps no
//! connection or cache between requests.
//!
//! # Example
//!
//! ```no_run
//! use workorders_web::{ServerConfig, start_server};
//!
//! # async fn run() -> anyhow::Result<()> {
//! start_server(ServerConfig {
//!     bind: "127.0.0.1:8501".into(),
//!     db_path: "workorders.db".into(),
//! })
//! .await
//! # }
//! ```

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use axum::Router;
use axum::http::StatusCode;
use axum::routing::get;
use handlebars::TemplateError;
use thiserror::Error;
use tower_http::trace::TraceLayer;
use tracing::info;
use workorders_core::ValidationError;
use workorders_sqlite::{StoreError, WorkOrderStore};

mod handlers;
pub mod render;

use render::Views;

/// Shared, read-only server state.
#[derive(Debug)]
pub struct AppState {
    /// Database file opened for every request.
    pub db_path: PathBuf,
    /// Page templates, compiled once at startup.
    pub views: Views,
}

impl AppState {
    /// Compiles the page templates for a server backed by `db_path`.
    pub fn new(db_path: impl Into<PathBuf>) -> Result<Self, TemplateError> {
        Ok(Self {
            db_path: db_path.into(),
            views: Views::new()?,
        })
    }
}

/// Configuration for the web server.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub bind: String,
    pub db_path: PathBuf,
}

/// Errors surfaced to the user as inline page messages.
#[derive(Debug, Error)]
pub enum WebError {
    #[error("{0}")]
    Validation(#[from] ValidationError),

    #[error("invalid work order id '{0}'")]
    InvalidId(String),

    #[error("{0}")]
    Store(#[from] StoreError),

    #[error("background task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

impl WebError {
    /// HTTP status for the rendered page. Caller mistakes keep 200 so the
    /// form can be corrected in place.
    pub fn status_code(&self) -> StatusCode {
        match self {
            WebError::Validation(_) | WebError::InvalidId(_) => StatusCode::OK,
            WebError::Store(err) if err.is_user_error() => StatusCode::OK,
            WebError::Store(_) | WebError::Task(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Runs `op` against a freshly opened store on the blocking thread pool.
pub(crate) async fn with_store<T, F>(state: &AppState, op: F) -> Result<T, WebError>
where
    T: Send + 'static,
    F: FnOnce(&WorkOrderStore) -> workorders_sqlite::Result<T> + Send + 'static,
{
    let path = state.db_path.clone();
    let result = tokio::task::spawn_blocking(move || {
        let store = WorkOrderStore::open(&path)?;
        op(&store)
    })
    .await?;
    Ok(result?)
}

/// Builds the application router.
pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(handlers::index))
        .route("/health", get(handlers::health))
        .route("/add", get(handlers::add_page).post(handlers::add_submit))
        .route("/list", get(handlers::list_page))
        .route("/history", get(handlers::history_page))
        .route("/close", get(handlers::close_page).post(handlers::close_submit))
        .route("/show", get(handlers::show_page))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Initializes the database, binds the listener, and serves until Ctrl-C.
pub async fn start_server(config: ServerConfig) -> Result<()> {
    let db_path = config.db_path.clone();
    tokio::task::spawn_blocking(move || WorkOrderStore::open(&db_path).map(drop))
        .await
        .context("Database initialization task failed")?
        .with_context(|| format!("Failed to open database '{}'", config.db_path.display()))?;

    let state = Arc::new(
        AppState::new(config.db_path.clone()).context("Failed to compile page templates")?,
    );
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(&config.bind)
        .await
        .with_context(|| format!("Failed to bind to {}", config.bind))?;
    let local_addr = listener.local_addr()?;
    info!(addr = %local_addr, db = %config.db_path.display(), "work order UI listening");
    println!("Work orders UI running at http://{local_addr}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("server shut down");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %err, "failed to install Ctrl+C handler");
        std::future::pending::<()>().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, header};
    use http_body_util::BodyExt;
    use tempfile::TempDir;
    use tower::ServiceExt;

    fn test_router() -> (Router, TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let state = Arc::new(AppState::new(dir.path().join("workorders.db")).unwrap());
        (build_router(state), dir)
    }

    async fn get_page(app: &Router, uri: &str) -> (StatusCode, String) {
        let req = Request::builder().uri(uri).body(Body::empty()).unwrap();
        let resp = app.clone().oneshot(req).await.unwrap();
        let status = resp.status();
        let bytes = resp.into_body().collect().await.unwrap().to_bytes();
        (status, String::from_utf8(bytes.to_vec()).unwrap())
    }

    async fn post_form(app: &Router, uri: &str, body: &str) -> (StatusCode, String) {
        let req = Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(body.to_string()))
            .unwrap();
        let resp = app.clone().oneshot(req).await.unwrap();
        let status = resp.status();
        let bytes = resp.into_body().collect().await.unwrap().to_bytes();
        (status, String::from_utf8(bytes.to_vec()).unwrap())
    }

    #[tokio::test]
    async fn test_health() {
        let (app, _dir) = test_router();
        let (status, body) = get_page(&app, "/health").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "ok");
    }

    #[tokio::test]
    async fn test_every_view_renders() {
        let (app, _dir) = test_router();
        for uri in ["/", "/add", "/list", "/history", "/close", "/show"] {
            let (status, body) = get_page(&app, uri).await;
            assert_eq!(status, StatusCode::OK, "{uri}");
            assert!(body.starts_with("<!DOCTYPE html>"), "{uri}");
        }
    }

    #[tokio::test]
    async fn test_add_then_list() {
        let (app, _dir) = test_router();
        let (status, body) = post_form(
            &app,
            "/add",
            "machine_id=KMT-102&issue=Hydraulic+leak&priority=med",
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("Added work order #1"));

        let (_, body) = get_page(&app, "/list").await;
        assert!(body.contains("KMT-102"));
        assert!(body.contains("Hydraulic leak"));

        let (_, body) = get_page(&app, "/list?status=closed").await;
        assert!(body.contains("No work orders found."));
        assert!(!body.contains("Hydraulic leak"));
    }

    #[tokio::test]
    async fn test_add_validation_errors_are_inline() {
        let (app, _dir) = test_router();

        let (status, body) = post_form(&app, "/add", "machine_id=&issue=Leak&priority=low").await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("notice error"));
        assert!(body.contains("machine id is required"));

        let (status, body) =
            post_form(&app, "/add", "machine_id=M1&issue=Leak&priority=urgent").await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("invalid priority &#x27;urgent&#x27;"));
        // the submitted values are kept in the form
        assert!(body.contains("value=\"M1\""));

        let (_, body) = get_page(&app, "/").await;
        assert!(body.contains("Open: <strong>0</strong>"));
    }

    #[tokio::test]
    async fn test_user_input_is_escaped() {
        let (app, _dir) = test_router();
        post_form(
            &app,
            "/add",
            "machine_id=M1&issue=%3Cscript%3Ealert(1)%3C%2Fscript%3E&priority=high",
        )
        .await;

        let (_, body) = get_page(&app, "/list").await;
        assert!(!body.contains("<script>"));
        assert!(body.contains("&lt;script&gt;"));
    }

    #[tokio::test]
    async fn test_close_flow() {
        let (app, _dir) = test_router();
        post_form(&app, "/add", "machine_id=M1&issue=Leak&priority=med").await;

        let (status, body) = post_form(&app, "/close", "id=1").await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("Closed work order #1"));
        assert!(body.contains("Closed At: "));

        let (status, body) = post_form(&app, "/close", "id=1").await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("work order #1 is already closed"));

        let (_, body) = post_form(&app, "/close", "id=77").await;
        assert!(body.contains("work order #77 not found"));

        let (_, body) = post_form(&app, "/close", "id=abc").await;
        assert!(body.contains("invalid work order id"));
    }

    #[tokio::test]
    async fn test_history_view() {
        let (app, _dir) = test_router();
        post_form(&app, "/add", "machine_id=KMT-102&issue=Leak&priority=med").await;
        post_form(&app, "/add", "machine_id=KMT-200&issue=Alignment&priority=low").await;

        let (_, body) = get_page(&app, "/history?machine_id=KMT-102&status=").await;
        assert!(body.contains("Leak"));
        assert!(!body.contains("Alignment"));

        let (_, body) = get_page(&app, "/history?machine_id=KMT-102&status=closed").await;
        assert!(body.contains("No work orders found for machine KMT-102."));

        let (_, body) = get_page(&app, "/history?machine_id=+&status=").await;
        assert!(body.contains("machine id is required"));

        let (_, body) = get_page(&app, "/history?machine_id=KMT-102&status=pending").await;
        assert!(body.contains("invalid status"));
    }

    #[tokio::test]
    async fn test_show_view() {
        let (app, _dir) = test_router();
        post_form(&app, "/add", "machine_id=KMT-102&issue=Hydraulic+leak&priority=high").await;

        let (_, body) = get_page(&app, "/show?id=1").await;
        assert!(body.contains("Work Order #1"));
        assert!(body.contains("<dt>Closed</dt><dd>-</dd>"));

        let (status, body) = get_page(&app, "/show?id=9").await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("work order #9 not found"));
    }

    #[tokio::test]
    async fn test_overview_counts() {
        let (app, _dir) = test_router();
        post_form(&app, "/add", "machine_id=M1&issue=a&priority=low").await;
        post_form(&app, "/add", "machine_id=M1&issue=b&priority=low").await;
        post_form(&app, "/close", "id=2").await;

        let (_, body) = get_page(&app, "/").await;
        assert!(body.contains("Open: <strong>1</strong>"));
        assert!(body.contains("Closed: <strong>1</strong>"));
        assert!(body.contains("Total: <strong>2</strong>"));
    }

    #[test]
    fn test_status_codes() {
        assert_eq!(
            WebError::from(ValidationError::EmptyIssue).status_code(),
            StatusCode::OK
        );
        assert_eq!(
            WebError::from(StoreError::NotFound(1)).status_code(),
            StatusCode::OK
        );
        assert_eq!(
            WebError::from(StoreError::Conversion("x".into())).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
