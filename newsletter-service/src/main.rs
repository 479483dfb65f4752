//! Newsletter web service - subscription forms, campaign pushes, and admin
//! settings over one Sendy-compatible upstream.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::{net::TcpListener, signal, sync::mpsc};
use tower_http::trace::TraceLayer;
use tracing::info;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use newsletter::campaign::{CampaignPublisher, JsonCampaignStore};
use newsletter::email::{Branding, EmailRenderer};
use newsletter::sendy::{HttpTransport, SendyClient};
use newsletter::settings::{JsonSettingsStore, SettingsStore};
use newsletter::subscribe::{SubscribedEvent, SubscriptionBridge};
use newsletter::tips::TipGate;
use newsletter::web::{router, AppState};
use newsletter::{Config, IntegrationRegistry};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize structured JSON logging
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().json().flatten_event(true))
        .init();

    info!("newsletter_service_starting");

    // Load configuration from environment
    let config = Arc::new(Config::from_env());
    info!(
        port = config.port,
        sendy_timeout_ms = config.sendy_timeout.as_millis() as u64,
        admin_configured = config.admin_token.is_some(),
        settings_path = %config.settings_path.display(),
        "config_loaded"
    );

    // Wire up the core services
    let registry = Arc::new(IntegrationRegistry::with_defaults());
    info!(integrations = registry.len(), "integration_registry_ready");

    let settings: Arc<dyn SettingsStore> =
        Arc::new(JsonSettingsStore::new(config.settings_path.clone()));
    let transport = Arc::new(HttpTransport::new(config.sendy_timeout));
    let client = SendyClient::new(transport);

    // Subscribed notifications are fire-and-forget; the drain task just logs
    // them where an analytics consumer would hook in.
    let (events_tx, mut events_rx) = mpsc::unbounded_channel::<SubscribedEvent>();
    tokio::spawn(async move {
        while let Some(event) = events_rx.recv().await {
            info!(
                context = %event.context,
                list_id = %event.list_id,
                "subscriber_added"
            );
        }
    });

    let bridge = Arc::new(
        SubscriptionBridge::new(registry.clone(), settings.clone(), client.clone())
            .with_events(events_tx),
    );
    let renderer = Arc::new(EmailRenderer::new(Branding::default()));
    let publisher = Arc::new(CampaignPublisher::new(
        client,
        settings.clone(),
        Arc::new(JsonCampaignStore::new(config.campaigns_path.clone())),
    ));
    let tip_gate = Arc::new(TipGate::new(config.tip_rate_limit));

    let state = AppState {
        config: config.clone(),
        registry,
        settings,
        bridge,
        renderer,
        publisher,
        tip_gate,
    };

    // Build the router
    let app = router(state).layer(TraceLayer::new_for_http());

    // Bind to address
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let listener = TcpListener::bind(addr)
        .await
        .context("Failed to bind to address")?;

    info!(address = %addr, "newsletter_service_listening");

    // Run server with graceful shutdown
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await
    .context("Server error")?;

    info!("newsletter_service_shutdown_complete");

    Ok(())
}

/// Create a future that completes when a shutdown signal is received.
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Received SIGINT"),
        _ = terminate => info!("Received SIGTERM"),
    }

    info!("newsletter_service_shutting_down");
}
