//! Migration Server
//!
//! HTTP front-end for the legacy-to-Node rule engine. Accepts a code
//! fragment plus an optional rule selection and returns the migrated code
//! with an audit report of applied rules, evidence and warnings.
//!
//! ## Middleware
//!
//! - CORS restricted to one configured origin
//! - `x-request-id` taken from the request or generated, echoed on the response
//! - Request tracing tagged with the request id
//! - JSON body size limit

use std::net::SocketAddr;

use axum::{
    body::Body,
    extract::DefaultBodyLimit,
    http::{HeaderName, HeaderValue, Method, Request},
    routing::{get, post},
    Router,
};
use clap::Parser;
use migrate_engine::RuleCatalog;
use tower::ServiceBuilder;
use tower_http::{
    cors::{AllowHeaders, CorsLayer},
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};
use tracing::{info, info_span, Level};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod api;
mod error;
mod validation;

use api::{handle_health, handle_list_rules, handle_migrate};

/// Correlation header read from and echoed to clients
pub const X_REQUEST_ID: &str = "x-request-id";

/// Command-line arguments for the migration server
#[derive(Parser, Debug)]
#[command(name = "migrate-server")]
#[command(about = "Legacy COBOL to Node migration server")]
struct Args {
    /// Port to listen on
    #[arg(short, long, env = "PORT", default_value = "3000")]
    port: u16,

    /// Host address to bind to
    #[arg(long, default_value = "0.0.0.0")]
    host: String,

    /// Origin allowed by CORS
    #[arg(long, default_value = "http://localhost:4200")]
    cors_origin: String,

    /// Maximum accepted request body in bytes
    #[arg(long, default_value_t = 1024 * 1024)]
    body_limit: usize,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub catalog: &'static RuleCatalog,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            catalog: RuleCatalog::global(),
        }
    }
}

/// HTTP boundary settings
#[derive(Clone, Debug)]
pub struct HttpConfig {
    pub cors_origin: HeaderValue,
    pub body_limit: usize,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            cors_origin: HeaderValue::from_static("http://localhost:4200"),
            body_limit: 1024 * 1024,
        }
    }
}

/// Build the router with all routes and middleware
pub fn app(state: AppState, config: &HttpConfig) -> Router {
    let request_id_header = HeaderName::from_static(X_REQUEST_ID);

    let cors = CorsLayer::new()
        .allow_origin(config.cors_origin.clone())
        .allow_methods([Method::GET, Method::POST])
        .allow_headers(AllowHeaders::mirror_request())
        .expose_headers([request_id_header.clone()]);

    let trace = TraceLayer::new_for_http().make_span_with(|req: &Request<Body>| {
        let request_id = req
            .headers()
            .get(X_REQUEST_ID)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("-");
        info_span!(
            "request",
            method = %req.method(),
            path = %req.uri().path(),
            request_id = %request_id,
        )
    });

    Router::new()
        // Health check
        .route("/health", get(handle_health))
        // API endpoints
        .route("/api/rules", get(handle_list_rules))
        .route("/api/migrate", post(handle_migrate))
        // Apply middleware, outermost first
        .layer(
            ServiceBuilder::new()
                .layer(SetRequestIdLayer::new(
                    request_id_header.clone(),
                    MakeRequestUuid,
                ))
                .layer(trace)
                // Cors must wrap a service returning a plain axum Body
                .layer(cors)
                .layer(PropagateRequestIdLayer::new(request_id_header))
                .layer(DefaultBodyLimit::max(config.body_limit)),
        )
        .with_state(state)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // Initialize logging
    let log_level = if args.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };

    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env().add_directive(log_level.into()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting migration server on {}:{}", args.host, args.port);

    let config = HttpConfig {
        cors_origin: args.cors_origin.parse()?,
        body_limit: args.body_limit,
    };
    let state = AppState::default();

    info!(
        "Loaded {} rules; CORS origin {}; body limit {} bytes",
        state.catalog.len(),
        args.cors_origin,
        config.body_limit
    );

    let app = app(state, &config);

    // Start server
    let addr: SocketAddr = format!("{}:{}", args.host, args.port).parse()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;

    info!("Server listening on http://{}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
