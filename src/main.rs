use std::sync::Arc;

use asset_responder::assets::AssetRegistry;
use asset_responder::config::{AppState, Config};
use asset_responder::{logger, server};

const DEFAULT_CONFIG_PATH: &str = "config";

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| DEFAULT_CONFIG_PATH.to_string());
    let cfg = Config::load_from(&config_path)?;
    logger::init(&cfg)?;

    // A payload that fails to decode is a packaging defect: refuse to start
    let registry = AssetRegistry::builtin().map_err(|e| {
        logger::log_error(&format!("Failed to load embedded assets: {e}"));
        e
    })?;
    logger::log_registry_loaded(&registry);

    let state = Arc::new(AppState::new(cfg, &registry)?);

    let mut runtime_builder = tokio::runtime::Builder::new_multi_thread();
    runtime_builder.enable_all();
    if let Some(workers) = state.config.server.workers {
        runtime_builder.worker_threads(workers);
    }
    let runtime = runtime_builder.build()?;

    runtime.block_on(async_main(state))
}

async fn async_main(state: Arc<AppState>) -> Result<(), Box<dyn std::error::Error>> {
    let addr = state.config.get_socket_addr()?;
    let listener = server::create_listener(addr)?;

    logger::log_server_start(&addr, &state.config);
    server::run(listener, state).await;
    Ok(())
}
