use std::sync::Arc;

use alicuota_core::AlicuotaService;
use alicuota_data::DatasetLoader;
use alicuota_server::{ServerConfig, logging};
use anyhow::Context;
use clap::Parser;
use tracing::{debug, info};

// ─── entry point ─────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = ServerConfig::parse();

    logging::init(&config.log_level, config.log_file.as_deref())?;
    debug!(?config, "configuration");

    let addr = config.bind_address()?;

    let dataset = DatasetLoader::load_or_empty(&config.data);
    info!("dataset summary\n{}", dataset.summary());

    let service = AlicuotaService::new(Arc::new(dataset));
    alicuota_server::serve(addr, service)
        .await
        .context("alicuota server failed")
}
