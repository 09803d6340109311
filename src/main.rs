use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};
use tower::ServiceBuilder;
use tower_governor::{
    governor::GovernorConfigBuilder, key_extractor::SmartIpKeyExtractor, GovernorLayer,
};
use tower_http::{cors::CorsLayer, limit::RequestBodyLimitLayer, trace::TraceLayer};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use service_inquiry_api::config::Config;
use service_inquiry_api::db::Database;
use service_inquiry_api::inquiry_handler::{self, AppState};
use service_inquiry_api::mailer::SmtpMailer;
use service_inquiry_api::storage::InquiryStorage;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "service_inquiry_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration; missing SMTP credentials abort startup here
    let config = Config::from_env()?;

    // Mail transport is constructed eagerly so misconfiguration surfaces at
    // startup instead of on the first inquiry
    let mailer = SmtpMailer::from_config(&config).map_err(|e| anyhow::anyhow!(e.to_string()))?;
    tracing::info!("SMTP transport configured for relay {}", config.smtp_relay);

    // Database is optional: without it the service runs email-only
    let storage = match &config.database_url {
        Some(url) => match Database::new(url).await {
            Ok(db) => {
                let storage = InquiryStorage::new(db.pool.clone());
                match storage.init_schema().await {
                    Ok(()) => {
                        tracing::info!("Database connection pool established");
                        Some(storage)
                    }
                    Err(e) => {
                        tracing::error!("Schema init failed, persistence disabled: {}", e);
                        None
                    }
                }
            }
            Err(e) => {
                tracing::error!("Database unavailable, persistence disabled: {}", e);
                None
            }
        },
        None => None,
    };

    // Build application state (dependency-injected, no globals)
    let app_state = Arc::new(AppState {
        config: config.clone(),
        storage,
        mailer: Arc::new(mailer),
    });

    // Rate limiter: 10 requests/second per IP, burst of 20
    let governor_conf = Arc::new(
        GovernorConfigBuilder::default()
            .per_second(10)
            .burst_size(20)
            .key_extractor(SmartIpKeyExtractor)
            .finish()
            .expect("valid governor configuration"),
    );

    // Inquiry route with security layers
    let protected_routes = Router::new()
        .route(
            "/api/send-inquiry",
            post(inquiry_handler::send_inquiry)
                .fallback(inquiry_handler::method_not_allowed),
        )
        .layer(
            ServiceBuilder::new()
                // Request size limit: 1MB max payload
                .layer(RequestBodyLimitLayer::new(1024 * 1024))
                .layer(GovernorLayer {
                    config: governor_conf,
                }),
        );

    // Health and ping bypass rate limiting
    let app = Router::new()
        .route("/health", get(inquiry_handler::health))
        .route("/api/ping", get(inquiry_handler::ping))
        .merge(protected_routes)
        .with_state(app_state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    // Start server
    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
