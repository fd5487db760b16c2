mod routes;

use std::sync::Arc;

use cotiza_core::{
    AppConfig, FileCacheStore, QuotationRetriever, QuotationService, ReqwestHttpClient,
};
use thiserror::Error;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

use crate::routes::app_router;

#[derive(Debug, Error)]
enum ServerError {
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

#[tokio::main]
async fn main() {
    if let Err(error) = run().await {
        eprintln!("error: {error}");
        std::process::exit(1);
    }
}

async fn run() -> Result<(), ServerError> {
    let _ = dotenvy::dotenv();
    let config = AppConfig::from_env();

    // The guard flushes buffered log lines on shutdown; it must outlive serve.
    let _log_guard = init_tracing(&config);

    let client = Arc::new(ReqwestHttpClient::insecure_upstream());
    let retriever = QuotationRetriever::new(
        client,
        config.retry,
        config.base_url.clone(),
        config.day_delay,
    );
    let cache = FileCacheStore::new(&config.cache_dir, config.cache_timeout)?;
    let service = Arc::new(QuotationService::new(retriever, cache));

    // One explicit sweep at boot; entries going stale later are simply
    // treated as absent until the next restart.
    let removed = service.sweep_cache();
    tracing::info!(removed, "barrido inicial de caché expirada");

    let router = app_router(service);

    tracing::info!(
        addr = %config.listen_addr,
        environment = ?config.environment,
        cache_timeout_secs = config.cache_timeout.as_secs(),
        "cotiza-server escuchando"
    );

    let listener = tokio::net::TcpListener::bind(&config.listen_addr).await?;
    axum::serve(listener, router).await?;
    Ok(())
}

fn init_tracing(config: &AppConfig) -> tracing_appender::non_blocking::WorkerGuard {
    let file_appender = tracing_appender::rolling::daily(&config.log_dir, "cotiza.log");
    let (file_writer, guard) = tracing_appender::non_blocking(file_appender);

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(true))
        .with(fmt::layer().with_writer(file_writer).with_ansi(false))
        .init();

    guard
}
