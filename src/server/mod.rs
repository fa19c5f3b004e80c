use crate::config::Config;
use crate::library::LibraryService;
use crate::streaming;
use anyhow::{Context, Result};
use axum::{
    http::{header, Method, StatusCode},
    response::IntoResponse,
    routing::get,
    Router,
};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::signal;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

pub mod error;
pub mod routes_api;
pub mod routes_library;

pub use error::ApiError;

/// Shared application context
#[derive(Clone)]
pub struct AppContext {
    pub service: Arc<LibraryService>,
    pub config: Arc<Config>,
}

impl AppContext {
    pub fn new(service: Arc<LibraryService>, config: Config) -> Self {
        Self {
            service,
            config: Arc::new(config),
        }
    }

    /// Directory crawled by refreshes.
    pub fn library_root(&self) -> PathBuf {
        self.config.library.root_dir()
    }
}

/// Create the Axum router with all routes
pub fn create_router(ctx: AppContext) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([header::CONTENT_TYPE, header::RANGE]);

    Router::new()
        .route("/health", get(health_check))
        .nest("/api", api_routes())
        .nest("/media", streaming::media_router())
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(ctx)
}

fn api_routes() -> Router<AppContext> {
    routes_api::api_routes().merge(routes_library::library_routes())
}

async fn health_check() -> impl IntoResponse {
    StatusCode::OK
}

/// Start the HTTP server and run until a shutdown signal arrives
pub async fn start_server(ctx: AppContext) -> Result<()> {
    let addr: SocketAddr = format!("{}:{}", ctx.config.server.host, ctx.config.server.port)
        .parse()
        .context("Invalid server address")?;

    let app = create_router(ctx);

    tracing::info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        match signal::ctrl_c().await {
            Ok(()) => {}
            Err(e) => {
                tracing::error!("Failed to install Ctrl+C handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
