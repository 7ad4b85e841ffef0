//! Binary entrypoint for the ExoneraTor web service.
use exonerator_api::{run, AppState};
use exonerator_core::ExoneratorConfig;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // RUST_LOG overrides the default filter
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = ExoneratorConfig::from_env()?;
    let addr = config.listen_addr.clone();
    tracing::info!(
        backend = %config.backend_url,
        languages = ?config.languages,
        "Starting ExoneraTor"
    );

    let state = AppState::from_config(config)?;
    run(&addr, state).await?;
    Ok(())
}
