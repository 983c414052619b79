//! Check command - probes the configured document store

use tracing::info;

/// Connect to the store, ping it and report the record count
pub async fn run() -> anyhow::Result<()> {
    let config = super::bootstrap()?;

    let state = crate::create_app_state_with_config(&config).await?;
    let count = state.registry.find_all_api_keys().await?.len();

    info!(
        backend = state.registry.backend(),
        keys = count,
        "Document store reachable"
    );
    println!("ok: {} store reachable, {} keys", state.registry.backend(), count);

    Ok(())
}
