use std::net::SocketAddr;

use axum::{
    Router,
    extract::DefaultBodyLimit,
    middleware,
    routing::{get, post},
};
use tower::ServiceBuilder;
use tower_http::{compression::CompressionLayer, cors::CorsLayer, trace::TraceLayer};

use crate::{
    config::AppConfig,
    handlers::{auth, departments, employees, health, leaves},
    middleware as app_middleware,
    rate_limit::rate_limit_middleware,
    state::AppState,
};

pub struct HrmsServer {
    addr: SocketAddr,
    app: Router,
}

/// Assembles the full route table and middleware stack.
///
/// Auth endpoints are public (login cannot require a token); every resource
/// route sits behind the per-user rate limiter, which itself requires a
/// valid bearer token. The middleware stack applies per matched route, so
/// unrouted paths answer 404 without passing through it.
pub fn build_app(state: AppState, cfg: &AppConfig) -> Router {
    let body_limit = cfg.server.body_limit_bytes;

    let public = Router::new()
        .route("/health", get(health::health))
        .route("/metrics", get(health::prometheus_metrics))
        .route("/api/v1/auth/register", post(auth::register))
        .route("/api/v1/auth/login", post(auth::login))
        .route("/api/v1/auth/refresh-token", post(auth::refresh))
        .route("/api/v1/auth/logout", post(auth::logout))
        .route(
            "/api/v1/auth/companies/register",
            post(auth::register_company),
        );

    let resources = Router::new()
        .route(
            "/api/v1/employees",
            get(employees::list).post(employees::create),
        )
        .route("/api/v1/employees/analytics", get(employees::analytics))
        .route(
            "/api/v1/employees/{id}",
            get(employees::detail)
                .put(employees::update)
                .delete(employees::delete),
        )
        .route(
            "/api/v1/departments",
            get(departments::list).post(departments::create),
        )
        .route(
            "/api/v1/departments/{id}",
            get(departments::detail)
                .put(departments::update)
                .delete(departments::delete),
        )
        .route(
            "/api/v1/leave-requests",
            get(leaves::list).post(leaves::create),
        )
        .route(
            "/api/v1/leave-requests/{id}",
            get(leaves::detail).put(leaves::update).delete(leaves::delete),
        )
        .layer(middleware::from_fn_with_state(
            state.clone(),
            rate_limit_middleware,
        ));

    Router::new()
        .merge(public)
        .merge(resources)
        // Stack order (outermost first): body limit -> request id -> metrics
        // -> trace -> compression -> cors -> content negotiation
        .layer(
            ServiceBuilder::new()
                .layer(DefaultBodyLimit::max(body_limit))
                .layer(middleware::from_fn(app_middleware::request_id))
                .layer(middleware::from_fn(app_middleware::track_http_metrics))
                .layer(
                    TraceLayer::new_for_http()
                        .make_span_with(|req: &axum::http::Request<_>| {
                            use tracing::field::Empty;
                            let method = req.method().clone();
                            let uri = req.uri().clone();
                            let req_id = req
                                .extensions()
                                .get::<axum::http::HeaderValue>()
                                .and_then(|v| v.to_str().ok())
                                .unwrap_or("")
                                .to_string();
                            tracing::info_span!(
                                "http.request",
                                http.method = %method,
                                http.target = %uri,
                                http.route = Empty,
                                http.status_code = Empty,
                                request_id = %req_id
                            )
                        })
                        .on_response(
                            |res: &axum::http::Response<_>,
                             latency: std::time::Duration,
                             span: &tracing::Span| {
                                span.record(
                                    "http.status_code",
                                    tracing::field::display(res.status().as_u16()),
                                );
                                tracing::info!(
                                    http.status = %res.status().as_u16(),
                                    elapsed_ms = %latency.as_millis(),
                                    "request handled"
                                );
                            },
                        ),
                )
                .layer(CompressionLayer::new())
                .layer(CorsLayer::permissive())
                .layer(middleware::from_fn(app_middleware::content_negotiation)),
        )
        .with_state(state)
}

pub struct ServerBuilder {
    addr: SocketAddr,
    config: AppConfig,
    state: AppState,
}

impl ServerBuilder {
    pub fn new(state: AppState) -> Self {
        let cfg = AppConfig::default();
        Self {
            addr: cfg.addr(),
            config: cfg,
            state,
        }
    }

    pub fn with_addr(mut self, addr: SocketAddr) -> Self {
        self.addr = addr;
        self
    }

    pub fn with_config(mut self, cfg: AppConfig) -> Self {
        self.addr = cfg.addr();
        self.config = cfg;
        self
    }

    pub fn build(self) -> HrmsServer {
        let app = build_app(self.state, &self.config);

        HrmsServer {
            addr: self.addr,
            app,
        }
    }
}

impl HrmsServer {
    pub async fn run(self) -> anyhow::Result<()> {
        let listener = tokio::net::TcpListener::bind(self.addr).await?;
        tracing::info!("listening on {}", self.addr);
        axum::serve(listener, self.app)
            .with_graceful_shutdown(shutdown_signal())
            .await?;
        Ok(())
    }
}

async fn shutdown_signal() {
    // Wait for Ctrl+C
    let _ = tokio::signal::ctrl_c().await;
    tracing::info!("shutdown signal received");
}
