use std::sync::Arc;

use anyhow::Context;
use axum::routing::{get, post};
use axum::Router;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use tablebook::config::AppConfig;
use tablebook::handlers;
use tablebook::services::intents::default_intent_map;
use tablebook::services::sheets::auth::{ServiceAccountAuth, ServiceAccountKey};
use tablebook::services::sheets::google::GoogleSheetsSink;
use tablebook::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();

    let mut config = AppConfig::from_env();

    let default_filter = if config.debug { "info,tablebook=debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| default_filter.into()))
        .init();

    if let Some(path) = config.service_account_file.clone() {
        let key = ServiceAccountKey::from_file(&path)?;
        tracing::info!(path = %path, "loaded service account key file");
        config.service_account_email = key.client_email;
        config.service_account_private_key = key.private_key;
        if let Some(token_uri) = key.token_uri {
            config.token_uri = token_uri;
        }
    }
    config.validate().context("invalid configuration")?;

    tracing::info!(
        time_zone = %config.time_zone,
        time_zone_offset = %config.time_zone_offset,
        "agent locale"
    );

    let client = reqwest::Client::new();
    let auth = ServiceAccountAuth::new(
        config.service_account_email.clone(),
        &config.service_account_private_key,
        config.token_uri.clone(),
        client.clone(),
    )
    .context("failed to build service account credentials")?;
    let sink = GoogleSheetsSink::new(
        auth,
        config.spreadsheet_id.clone(),
        config.sheet_range.clone(),
        &config.sheets_api_base,
        client,
    )
    .context("failed to build Sheets client")?;

    let intents = default_intent_map();
    tracing::info!(intents = ?intents.intents().collect::<Vec<_>>(), "registered intent handlers");

    let state = Arc::new(AppState {
        config: config.clone(),
        sink: Box::new(sink),
        intents,
    });

    let app = Router::new()
        .route("/health", get(handlers::health::health))
        .route(
            "/webhook/fulfillment",
            post(handlers::fulfillment::fulfillment_webhook),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    let addr = format!("0.0.0.0:{}", config.port);
    tracing::info!("starting server on {addr}");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
