mod analyzer;
mod assembler;
mod classify;
mod config;
mod error;
mod model;
mod providers;
mod server;
mod service;
#[cfg(test)]
mod testing;

use std::sync::Arc;

use tracing::info;
use tracing_subscriber::EnvFilter;

use evidence_common::openai::{OpenAiClient, OpenAiClientConfig};
use evidence_common::serper::{SerperClient, SerperClientConfig};

use analyzer::EvidenceAnalyzer;
use config::Config;
use providers::OpenAiChatModel;
use server::AppState;
use service::EvidenceService;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // A missing .env file is fine; the process environment is used as-is.
    dotenv::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into()),
        )
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .init();

    info!("starting evidence-finder API");

    let config = Config::from_env()?;
    info!(
        bind_addr = %config.bind_addr,
        model = %config.model,
        cors_origins = ?config.cors_origins,
        "configuration loaded"
    );

    let openai_config = OpenAiClientConfig::from_env();
    info!(
        base_url = %openai_config.base_url,
        timeout_ms = openai_config.default_timeout.as_millis(),
        max_retries = openai_config.max_retries,
        api_key = openai_config.api_key.is_some(),
        "openai client configured"
    );
    let openai = Arc::new(OpenAiClient::new(openai_config)?);

    let serper_config = SerperClientConfig::from_env();
    info!(
        base_url = %serper_config.base_url,
        timeout_ms = serper_config.timeout.as_millis(),
        api_key = serper_config.api_key.is_some(),
        "serper client configured"
    );
    let serper = Arc::new(SerperClient::new(serper_config)?);

    let chat_model = Arc::new(OpenAiChatModel::new(openai, config.model.clone()));
    let analyzer = EvidenceAnalyzer::new(chat_model);
    let service = Arc::new(EvidenceService::new(serper, analyzer));

    let cors = server::cors_layer(&config.cors_origins)?;
    let app = server::router(AppState::new(service)).layer(cors);

    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    info!(addr = %config.bind_addr, "HTTP server ready");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("HTTP server shut down");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}
