//! HTTP surface: the query endpoint and the readiness endpoint.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::Json;
use axum::routing::{get, post};
use axum::Router;
use serde::{Deserialize, Serialize};
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::domain::errors::QueryError;
use crate::domain::models::{HealthStatus, QueryResponse};
use crate::services::QueryService;

/// Configuration for the HTTP server.
#[derive(Debug, Clone)]
pub struct HttpConfig {
    /// Host to bind to.
    pub host: String,
    /// Port to listen on.
    pub port: u16,
    /// Whether to enable CORS.
    pub enable_cors: bool,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8000,
            enable_cors: true,
        }
    }
}

/// Query string parameters for `POST /query`.
#[derive(Debug, Deserialize)]
pub struct QueryParams {
    /// User question. Required; its absence is a client error.
    #[serde(default)]
    pub q: Option<String>,
    /// Return retrieval debug info.
    #[serde(default)]
    pub debug: bool,
    /// Number of passages to retrieve; defaults from config.
    #[serde(default)]
    pub k: Option<usize>,
}

/// Error response body.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: String,
}

struct AppState {
    service: QueryService,
}

/// HTTP server for the query service.
pub struct HttpServer {
    config: HttpConfig,
    service: QueryService,
}

impl HttpServer {
    pub fn new(service: QueryService, config: HttpConfig) -> Self {
        Self { config, service }
    }

    /// Build the router.
    pub fn build_router(self) -> Router {
        let state = Arc::new(AppState {
            service: self.service,
        });

        let app = Router::new()
            .route("/query", post(query_handler))
            .route("/health", get(health_handler))
            .with_state(state);

        if self.config.enable_cors {
            app.layer(
                CorsLayer::new()
                    .allow_origin(Any)
                    .allow_methods(Any)
                    .allow_headers(Any),
            )
            .layer(TraceLayer::new_for_http())
        } else {
            app.layer(TraceLayer::new_for_http())
        }
    }

    /// Start the server.
    pub async fn serve(self) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let addr: SocketAddr = format!("{}:{}", self.config.host, self.config.port).parse()?;
        let router = self.build_router();

        tracing::info!("docqa HTTP server listening on {}", addr);

        let listener = TcpListener::bind(addr).await?;
        axum::serve(listener, router).await?;
        Ok(())
    }

    /// Start the server with a shutdown signal.
    pub async fn serve_with_shutdown<F>(
        self,
        shutdown: F,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>>
    where
        F: std::future::Future<Output = ()> + Send + 'static,
    {
        let addr: SocketAddr = format!("{}:{}", self.config.host, self.config.port).parse()?;
        let router = self.build_router();

        tracing::info!("docqa HTTP server listening on {}", addr);

        let listener = TcpListener::bind(addr).await?;
        axum::serve(listener, router)
            .with_graceful_shutdown(shutdown)
            .await?;
        Ok(())
    }
}

// Handler functions

async fn query_handler(
    State(state): State<Arc<AppState>>,
    Query(params): Query<QueryParams>,
) -> Result<Json<QueryResponse>, (StatusCode, Json<ErrorResponse>)> {
    let q = params.q.unwrap_or_default();

    state
        .service
        .query(&q, params.k, params.debug)
        .await
        .map(Json)
        .map_err(into_error_response)
}

async fn health_handler(State(state): State<Arc<AppState>>) -> (StatusCode, Json<HealthStatus>) {
    let status = state.service.health().await;

    let code = if status.is_healthy() {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (code, Json(status))
}

fn into_error_response(err: QueryError) -> (StatusCode, Json<ErrorResponse>) {
    let (status, code) = match &err {
        QueryError::Validation(_) => (StatusCode::BAD_REQUEST, "INVALID_REQUEST"),
        QueryError::BackendUnavailable(_) => (StatusCode::SERVICE_UNAVAILABLE, "BACKEND_UNAVAILABLE"),
        QueryError::DimensionMismatch { .. } => {
            (StatusCode::INTERNAL_SERVER_ERROR, "DIMENSION_MISMATCH")
        }
        QueryError::Index(_) => (StatusCode::INTERNAL_SERVER_ERROR, "INDEX_ERROR"),
    };

    (
        status,
        Json(ErrorResponse {
            error: err.to_string(),
            code: code.to_string(),
        }),
    )
}
