//! Lockbox checkout server binary.
//!
//! Loads configuration, wires adapters into the application state once at
//! startup, and serves the checkout API with graceful shutdown.

use std::sync::Arc;
use std::time::Duration;

use axum::http::HeaderValue;
use chrono::Utc;
use sqlx::postgres::PgPoolOptions;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use lockbox_checkout::adapters::events::InMemoryWebhookEventStore;
use lockbox_checkout::adapters::http::{checkout_router, CheckoutAppState};
use lockbox_checkout::adapters::postgres::PostgresWebhookEventStore;
use lockbox_checkout::adapters::sms::{
    FortySixElksConfig, FortySixElksSmsSender, VonageConfig, VonageSmsSender,
};
use lockbox_checkout::adapters::stripe::{StripeConfig, StripePaymentAdapter};
use lockbox_checkout::config::{AppConfig, ServerConfig, SmsConfig, SmsProvider};
use lockbox_checkout::ports::{SmsSender, WebhookEventStore};

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        eprintln!("lockbox-checkout failed to start: {e}");
        std::process::exit(1);
    }
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load()?;
    init_tracing(&config.server);
    config.validate()?;

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        production = config.is_production(),
        "Starting lockbox-checkout"
    );

    if config.payment.stripe_secret_key.is_none() {
        tracing::warn!("Stripe secret key not set; payment intent creation will fail");
    } else if config.payment.is_test_mode() {
        tracing::info!("Stripe running in test mode");
    }
    if config.payment.stripe_webhook_secret.is_none() {
        tracing::warn!("Stripe webhook signing secret not set; webhook deliveries will be rejected");
    }

    let payment_provider = Arc::new(StripePaymentAdapter::new(
        StripeConfig::from_payment_config(&config.payment),
    ));
    let sms_sender = build_sms_sender(&config.sms);
    let event_store = build_event_store(&config).await?;

    // One-shot retention sweep at boot; the service runs no background tasks.
    let cutoff = Utc::now() - config.database.retention();
    match event_store.delete_before(cutoff).await {
        Ok(removed) if removed > 0 => tracing::info!(removed, "Pruned old webhook events"),
        Ok(_) => {}
        Err(e) => tracing::warn!(error = %e, "Webhook event pruning failed"),
    }

    let state = CheckoutAppState {
        payment_provider,
        event_store,
        sms_sender,
    };

    let app = checkout_router()
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::new(Duration::from_secs(
            config.server.request_timeout_secs,
        )))
        .layer(cors_layer(&config.server));

    let addr = config.server.socket_addr();
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Server listening on {addr}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server shutdown complete");
    Ok(())
}

/// Initialize the tracing subscriber; JSON output in production.
fn init_tracing(config: &ServerConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.log_level.clone()));

    if config.is_production() {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }
}

/// Build the configured SMS sender, if any.
fn build_sms_sender(config: &SmsConfig) -> Option<Arc<dyn SmsSender>> {
    if config.from.is_none() && config.provider.is_some() {
        tracing::warn!("SMS sender number not set; unlock code sends will be skipped");
    }

    match config.provider {
        Some(SmsProvider::Vonage) => {
            let (Some(key), Some(secret)) = (&config.vonage_api_key, &config.vonage_api_secret)
            else {
                tracing::warn!("Vonage credentials incomplete; SMS delivery disabled");
                return None;
            };
            let mut vonage =
                VonageConfig::new(key.clone(), secret.clone()).with_send_timeout(config.send_timeout());
            if let Some(from) = &config.from {
                vonage = vonage.with_from(from.clone());
            }
            tracing::info!("SMS gateway: Vonage");
            Some(Arc::new(VonageSmsSender::new(vonage)))
        }
        Some(SmsProvider::FortySixElks) => {
            let (Some(username), Some(password)) =
                (&config.elks_api_username, &config.elks_api_password)
            else {
                tracing::warn!("46elks credentials incomplete; SMS delivery disabled");
                return None;
            };
            let mut elks = FortySixElksConfig::new(username.clone(), password.clone())
                .with_send_timeout(config.send_timeout());
            if let Some(from) = &config.from {
                elks = elks.with_from(from.clone());
            }
            tracing::info!("SMS gateway: 46elks");
            Some(Arc::new(FortySixElksSmsSender::new(elks)))
        }
        None => {
            tracing::warn!("No SMS gateway configured; unlock codes will not be delivered");
            None
        }
    }
}

/// Build the webhook dedup store: PostgreSQL when configured, in-memory
/// otherwise.
async fn build_event_store(
    config: &AppConfig,
) -> Result<Arc<dyn WebhookEventStore>, Box<dyn std::error::Error>> {
    match &config.database.url {
        Some(url) => {
            let pool = PgPoolOptions::new().max_connections(5).connect(url).await?;
            sqlx::migrate!("./migrations").run(&pool).await?;
            tracing::info!("Webhook dedup store: PostgreSQL");
            Ok(Arc::new(PostgresWebhookEventStore::new(pool)))
        }
        None => {
            tracing::warn!(
                "No database configured; webhook dedup is in-memory and will not survive restarts"
            );
            Ok(Arc::new(InMemoryWebhookEventStore::new(
                config.database.retention(),
            )))
        }
    }
}

fn cors_layer(config: &ServerConfig) -> CorsLayer {
    let origins: Vec<HeaderValue> = config
        .cors_origins_list()
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    if origins.is_empty() {
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        CorsLayer::new()
            .allow_origin(AllowOrigin::list(origins))
            .allow_methods(Any)
            .allow_headers(Any)
    }
}

/// Completes when SIGTERM or ctrl-c arrives.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install ctrl-c handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => tracing::info!("Received ctrl-c, initiating graceful shutdown"),
        _ = terminate => tracing::info!("Received SIGTERM, initiating graceful shutdown"),
    }
}
