//! Application startup and lifecycle management.

use crate::config::ClassroomConfig;
use crate::error::AnalysisError;
use crate::handlers;
use crate::services::metrics::{self, http_metrics_middleware};
use crate::services::providers::gemini::{GeminiConfig, GeminiProvider};
use crate::services::providers::VisionProvider;
use crate::services::SlidingWindowLimiter;
use axum::{
    extract::DefaultBodyLimit,
    http::{header, HeaderValue, Method},
    middleware::from_fn,
    routing::{get, post},
    Router,
};
use service_core::error::AppError;
use service_core::middleware::tracing::{request_id_middleware, REQUEST_ID_HEADER};
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::signal;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<ClassroomConfig>,
    /// `None` runs the service in demo mode.
    pub provider: Option<Arc<dyn VisionProvider>>,
    pub limiter: Arc<SlidingWindowLimiter>,
}

impl AppState {
    pub fn new(config: ClassroomConfig, provider: Option<Arc<dyn VisionProvider>>) -> Self {
        let limiter = SlidingWindowLimiter::new(
            config.rate_limit.max_requests,
            config.rate_limit_window(),
        );

        Self {
            config: Arc::new(config),
            provider,
            limiter: Arc::new(limiter),
        }
    }

    /// Build the state, wiring up Gemini when a key is configured.
    pub fn from_config(config: ClassroomConfig) -> Result<Self, AppError> {
        let provider: Option<Arc<dyn VisionProvider>> = match &config.gemini.api_key {
            Some(api_key) => {
                let gemini = GeminiProvider::new(GeminiConfig {
                    api_key: api_key.clone(),
                    model: config.gemini.model.clone(),
                    api_base: config.gemini.api_base.clone(),
                    timeout: config.provider_timeout(),
                })
                .map_err(|e| AppError::ConfigError(anyhow::anyhow!(e)))?;

                tracing::info!(model = %config.gemini.model, "Initialized Gemini provider");
                Some(Arc::new(gemini) as Arc<dyn VisionProvider>)
            }
            None => {
                tracing::warn!("GEMINI_API_KEY not set, running in demo mode");
                None
            }
        };

        Ok(Self::new(config, provider))
    }

    pub fn is_demo_mode(&self) -> bool {
        self.provider.is_none()
    }

    /// Take a model-call slot or fail with the wait until the next one frees up.
    pub fn admit(&self, endpoint: &str) -> Result<(), AnalysisError> {
        if self.limiter.admit() {
            return Ok(());
        }

        let wait = self.limiter.retry_after();
        let retry_after_secs = wait.as_secs() + u64::from(wait.subsec_nanos() > 0);
        metrics::record_rate_limited(endpoint);
        tracing::warn!(
            endpoint,
            limit = self.limiter.max_requests(),
            window_secs = self.limiter.window().as_secs(),
            retry_after_secs,
            "Rate limit reached"
        );

        Err(AnalysisError::Throttled {
            retry_after_secs: retry_after_secs.max(1),
        })
    }
}

fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/analyze-activity", post(handlers::activity::analyze_activity))
        .route("/generate-summary", post(handlers::summary::generate_summary))
        .route(
            "/analyze-screenshot",
            post(handlers::screenshot::analyze_screenshot),
        )
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|o| match o.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(e) => {
                tracing::error!("Invalid CORS origin '{}': {}. Skipping.", o, e);
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(allowed)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([
            header::CONTENT_TYPE,
            header::HeaderName::from_static(REQUEST_ID_HEADER),
        ])
}

/// Build the full HTTP router. The API is served both at the root and under `/api`.
pub fn build_router(state: AppState) -> Router {
    let max_body_bytes = state.config.http.max_body_bytes;
    let cors = cors_layer(&state.config.http.allowed_origins);

    Router::new()
        .route("/health", get(handlers::health::health_check))
        .route("/ready", get(handlers::health::readiness_check))
        .route("/metrics", get(handlers::metrics::metrics_handler))
        .merge(api_routes())
        .nest("/api", api_routes())
        .with_state(state)
        .layer(DefaultBodyLimit::max(max_body_bytes))
        .layer(from_fn(http_metrics_middleware))
        // Add tracing layer
        .layer(
            TraceLayer::new_for_http().make_span_with(|request: &axum::http::Request<_>| {
                let request_id = request
                    .headers()
                    .get(REQUEST_ID_HEADER)
                    .and_then(|value| value.to_str().ok())
                    .unwrap_or("-");

                tracing::info_span!(
                    "http_request",
                    request_id = %request_id,
                    method = %request.method(),
                    uri = %request.uri(),
                    version = ?request.version(),
                )
            }),
        )
        // Add tracing middleware for request_id
        .layer(from_fn(request_id_middleware))
        .layer(cors)
}

/// Application container for managing server lifecycle.
pub struct Application {
    port: u16,
    listener: TcpListener,
    router: Router,
}

impl Application {
    /// Build the application with the given configuration.
    pub async fn build(config: ClassroomConfig) -> Result<Self, AppError> {
        metrics::init_metrics();

        let address = config.common.bind_address();
        let state = AppState::from_config(config)?;

        // Port 0 binds a random port for testing
        let listener = TcpListener::bind(address.as_str()).await.map_err(|e| {
            tracing::error!("Failed to bind listener to {}: {}", address, e);
            AppError::from(e)
        })?;
        let port = listener.local_addr()?.port();

        tracing::info!(
            port,
            demo_mode = state.is_demo_mode(),
            rate_limit = state.limiter.max_requests(),
            rate_window_secs = state.limiter.window().as_secs(),
            "Classroom AI service listening"
        );

        Ok(Self {
            port,
            listener,
            router: build_router(state),
        })
    }

    /// Get the port the server is listening on.
    pub fn port(&self) -> u16 {
        self.port
    }

    /// Run the application until a shutdown signal arrives.
    pub async fn run_until_stopped(self) -> std::io::Result<()> {
        axum::serve(self.listener, self.router)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        tracing::info!("Service shutdown complete");
        Ok(())
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
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
        _ = ctrl_c => {
            tracing::info!("Received SIGINT, starting graceful shutdown");
        },
        _ = terminate => {
            tracing::info!("Received SIGTERM, starting graceful shutdown");
        },
    }
}
