//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create the Axum Router with the API, stylesheet and page handlers
//! - Wire up middleware (request ID, tracing, timeout, CORS, body limit)
//! - Apply config reloads to the shared state
//! - Serve until the shutdown signal fires

use std::sync::Arc;
use std::time::Duration;

use arc_swap::ArcSwap;
use axum::{
    extract::DefaultBodyLimit,
    http::HeaderValue,
    routing::{get, post},
    Router,
};
use tokio::net::TcpListener;
use tokio::sync::{broadcast, mpsc};
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    limit::RequestBodyLimitLayer,
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::ConsoleConfig;
use crate::data::DataStore;
use crate::http::{api, pages};
use crate::lifecycle::shutdown_signal;
use crate::qc::QcEngine;
use crate::routing::Router as PageRouter;
use crate::ui::Layout;

/// Reloadable part of the application state.
#[derive(Debug)]
pub struct AppInner {
    pub config: ConsoleConfig,
    pub engine: QcEngine,
}

impl AppInner {
    pub fn new(config: ConsoleConfig) -> Self {
        let engine = QcEngine::new(config.qc.rules.clone());
        Self { config, engine }
    }
}

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub inner: Arc<ArcSwap<AppInner>>,
    pub router: Arc<PageRouter>,
    pub layout: Arc<Layout>,
    pub store: DataStore,
}

impl AppState {
    pub fn new(config: ConsoleConfig) -> Self {
        let router = Arc::new(PageRouter::default());
        let layout = Arc::new(Layout::new(router.table()));
        Self {
            inner: Arc::new(ArcSwap::from_pointee(AppInner::new(config))),
            router,
            layout,
            store: DataStore::new(),
        }
    }

    /// Swap in a reloaded config. A changed rule set re-checks the loaded dataset.
    pub fn apply_config(&self, config: ConsoleConfig) {
        let next = Arc::new(AppInner::new(config));
        let previous = self.inner.swap(next.clone());
        let rules_changed = previous.config.qc.rules != next.config.qc.rules;
        // Uploads finishing after the swap already use the new engine.
        if rules_changed {
            self.store.recheck(&next.engine);
        }
        tracing::info!(rules_changed, "Configuration applied");
    }
}

/// HTTP server for the QC console.
pub struct HttpServer {
    router: Router,
    config: ConsoleConfig,
    state: AppState,
}

impl HttpServer {
    /// Create a new HTTP server with the given configuration.
    pub fn new(config: ConsoleConfig) -> Self {
        let state = AppState::new(config.clone());
        let router = Self::build_router(&config, state.clone());
        Self {
            router,
            config,
            state,
        }
    }

    /// Build the Axum router with all middleware layers.
    #[allow(deprecated)]
    fn build_router(config: &ConsoleConfig, state: AppState) -> Router {
        let api = Router::new()
            .route("/", get(api::welcome))
            .route("/health", get(api::health))
            .route("/upload", post(api::upload))
            .route("/summary", get(api::summary))
            .route("/data", get(api::data))
            .route("/data/filters", get(api::filters))
            .route("/data/columns", get(api::columns))
            .route("/data/variable", get(api::variable))
            .route("/qc/rules", get(api::rules))
            .route("/qc/findings", get(api::findings))
            .route("/routes", get(api::routes))
            .route("/routes/resolve", get(api::resolve))
            .route("/theme", get(api::theme))
            .fallback(api::not_found);

        Router::new()
            .nest("/api", api)
            .route("/theme.css", get(pages::stylesheet))
            .fallback(pages::page)
            .with_state(state)
            .layer(DefaultBodyLimit::disable())
            .layer(RequestBodyLimitLayer::new(config.listener.max_body_bytes))
            .layer(cors_layer(&config.listener.cors_origins))
            .layer(TimeoutLayer::new(Duration::from_secs(config.timeouts.request_secs)))
            .layer(PropagateRequestIdLayer::x_request_id())
            .layer(TraceLayer::new_for_http())
            .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
    }

    /// Run the server, accepting connections on the given listener.
    pub async fn run(
        self,
        listener: TcpListener,
        mut config_updates: mpsc::UnboundedReceiver<ConsoleConfig>,
        shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        let state = self.state.clone();
        let reload = tokio::spawn(async move {
            while let Some(config) = config_updates.recv().await {
                state.apply_config(config);
            }
        });

        axum::serve(listener, self.router)
            .with_graceful_shutdown(shutdown_signal(shutdown))
            .await?;

        reload.abort();
        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// The assembled router, for in-process requests.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn config(&self) -> &ConsoleConfig {
        &self.config
    }
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(origin = %origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(allowed))
        .allow_methods(Any)
        .allow_headers(Any)
}
