//! `RollcallServer`: axum HTTP server for student submissions.

use std::future::Future;
use std::sync::Arc;

use anyhow::Context;
use axum::Router;
use axum::http::{HeaderValue, Method, header};
use axum::routing::{get, post};
use rollcall_config::ServerConfig;
use rollcall_core::{LLMProvider, StudentIntake, StudentRepo};
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{error, info};

use crate::handlers;

pub struct RollcallServer<P, R> {
    config: ServerConfig,
    intake: Arc<StudentIntake<P, R>>,
}

impl<P, R> RollcallServer<P, R>
where
    P: LLMProvider + 'static,
    R: StudentRepo + 'static,
{
    pub fn new(config: ServerConfig, intake: StudentIntake<P, R>) -> Self {
        Self {
            config,
            intake: Arc::new(intake),
        }
    }

    pub const fn config(&self) -> &ServerConfig {
        &self.config
    }

    /// Build the router with CORS restricted to the configured client origin.
    pub fn router(&self) -> anyhow::Result<Router> {
        let origin: HeaderValue = self
            .config
            .client_origin
            .parse()
            .with_context(|| format!("Invalid client origin: {}", self.config.client_origin))?;

        let cors = CorsLayer::new()
            .allow_origin(AllowOrigin::list([origin]))
            .allow_methods([Method::GET, Method::POST])
            .allow_headers([header::CONTENT_TYPE]);

        Ok(Router::new()
            .route("/health", get(handlers::health))
            .route("/submit", post(handlers::submit::<P, R>))
            .route("/ai", post(handlers::ai::<P, R>))
            .layer(cors)
            .layer(TraceLayer::new_for_http())
            .with_state(self.intake.clone()))
    }

    /// Bind and serve until Ctrl-C.
    pub async fn serve(self) -> anyhow::Result<()> {
        let app = self.router()?;
        let addr = format!("{}:{}", self.config.host, self.config.port);

        let listener = tokio::net::TcpListener::bind(&addr)
            .await
            .with_context(|| format!("Failed to bind {addr}"))?;
        info!("Server running on http://{addr}");

        axum::serve(listener, app)
            .with_graceful_shutdown(wait_for_shutdown(tokio::signal::ctrl_c()))
            .await?;
        Ok(())
    }
}

/// Resolve once `signal` fires. A signal that cannot be listened for never
/// resolves, so the server keeps running.
async fn wait_for_shutdown<F>(signal: F)
where
    F: Future<Output = std::io::Result<()>>,
{
    if let Err(e) = signal.await {
        error!("Failed to listen for shutdown signal: {e}");
        std::future::pending::<()>().await;
    }
    info!("Shutting down");
}
