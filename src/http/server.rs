//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with the routing handler
//! - Wire up middleware (request ID, tracing)
//! - Bound each request by the configured timeout
//! - Bind server to listener
//! - Hand every GET path to the active app router
//! - Swap the active router when the configuration changes

use std::sync::Arc;
use std::time::{Duration, Instant};

use arc_swap::ArcSwap;
use axum::{
    body::Body,
    extract::State,
    http::{Request, Uri},
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use tokio::net::TcpListener;
use tokio::sync::{broadcast, mpsc};
use tower_http::{
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};

use crate::config::RouterConfig;
use crate::fetch::{HttpTransport, Transport, TransportError};
use crate::observability::metrics;
use crate::routing::{AppRouter, RouteOptions, RouteResponse, RouterPool, RouterSettings};

const X_REQUEST_ID: &str = "x-request-id";

/// The router and response options currently serving requests.
pub struct ActiveRouter {
    pub router: Arc<AppRouter>,
    pub options: RouteOptions,
    /// Requests still routing after this get the generic 500.
    pub request_timeout: Duration,
}

impl ActiveRouter {
    fn from_config(config: &RouterConfig, pool: &RouterPool) -> Self {
        Self {
            router: pool.get_or_create(&RouterSettings::from(config)),
            options: RouteOptions::from(&config.cache),
            request_timeout: Duration::from_secs(config.timeouts.request_secs),
        }
    }
}

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    active: Arc<ArcSwap<ActiveRouter>>,
}

/// HTTP front end for the app router.
pub struct HttpServer {
    router: Router,
    config: RouterConfig,
    pool: Arc<RouterPool>,
    active: Arc<ArcSwap<ActiveRouter>>,
}

impl HttpServer {
    /// Create a server that fetches upstream resources over HTTP.
    pub fn new(config: RouterConfig) -> Result<Self, TransportError> {
        let transport: Arc<dyn Transport> = Arc::new(HttpTransport::new()?);
        Ok(Self::with_transport(config, transport))
    }

    /// Create a server on top of an existing transport.
    pub fn with_transport(config: RouterConfig, transport: Arc<dyn Transport>) -> Self {
        let pool = Arc::new(RouterPool::new(transport));
        let active = Arc::new(ArcSwap::from_pointee(ActiveRouter::from_config(
            &config, &pool,
        )));

        let state = AppState {
            active: Arc::clone(&active),
        };
        let router = Self::build_router(state);

        Self {
            router,
            config,
            pool,
            active,
        }
    }

    /// Build the Axum router with all middleware layers.
    fn build_router(state: AppState) -> Router {
        Router::new()
            .route("/", get(route_handler))
            .route("/{*path}", get(route_handler))
            .with_state(state)
            .layer(PropagateRequestIdLayer::x_request_id())
            .layer(
                TraceLayer::new_for_http().make_span_with(|request: &Request<Body>| {
                    let request_id = request
                        .headers()
                        .get(X_REQUEST_ID)
                        .and_then(|v| v.to_str().ok())
                        .unwrap_or("unknown");
                    tracing::info_span!(
                        "request",
                        method = %request.method(),
                        path = %request.uri().path(),
                        request_id = %request_id,
                    )
                }),
            )
            .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
    }

    /// The request router, for driving the server without a socket.
    pub fn app(&self) -> Router {
        self.router.clone()
    }

    /// Point request handling at the router for `config`.
    ///
    /// The listener address is fixed at startup; a change to it is logged
    /// and ignored until restart.
    pub fn reload(&self, config: &RouterConfig) {
        apply_config(&self.active, &self.pool, &self.config, config);
    }

    /// Run the server, accepting connections on the given listener.
    ///
    /// Configurations arriving on `config_updates` are applied until the
    /// channel closes or shutdown is signalled.
    pub async fn run(
        self,
        listener: TcpListener,
        mut config_updates: mpsc::UnboundedReceiver<RouterConfig>,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        let active = Arc::clone(&self.active);
        let pool = Arc::clone(&self.pool);
        let initial = self.config.clone();
        let mut reload_shutdown = shutdown.resubscribe();
        tokio::spawn(async move {
            loop {
                tokio::select! {
                    update = config_updates.recv() => match update {
                        Some(config) => apply_config(&active, &pool, &initial, &config),
                        None => break,
                    },
                    _ = reload_shutdown.recv() => break,
                }
            }
            tracing::debug!("Config reload loop stopped");
        });

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("Shutdown signal received, draining connections");
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// Get a reference to the startup config.
    pub fn config(&self) -> &RouterConfig {
        &self.config
    }

    pub fn pool(&self) -> &RouterPool {
        &self.pool
    }
}

fn apply_config(
    active: &ArcSwap<ActiveRouter>,
    pool: &RouterPool,
    startup: &RouterConfig,
    config: &RouterConfig,
) {
    if config.listener.bind_address != startup.listener.bind_address {
        tracing::warn!(
            current = %startup.listener.bind_address,
            requested = %config.listener.bind_address,
            "Listener address change requires a restart"
        );
    }

    active.store(Arc::new(ActiveRouter::from_config(config, pool)));
    tracing::info!(
        assets_url = %config.upstream.assets_url,
        api_url = %config.upstream.api_url,
        routers = pool.len(),
        "Configuration applied"
    );
}

/// Routes every GET path through the active app router.
async fn route_handler(State(state): State<AppState>, uri: Uri) -> Response {
    let start = Instant::now();
    let active = state.active.load_full();

    tracing::debug!(path = %uri.path(), "Routing request");

    let routed = active.router.route(uri.path(), &active.options);
    let response = match tokio::time::timeout(active.request_timeout, routed).await {
        Ok(response) => response,
        Err(_) => {
            tracing::error!(
                path = %uri.path(),
                timeout = ?active.request_timeout,
                "Request timed out"
            );
            RouteResponse::internal_error()
        }
    };
    metrics::record_request(response.status_code, start);
    response.into_response()
}
