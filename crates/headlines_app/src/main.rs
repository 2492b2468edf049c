mod config;
mod console;

use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use headlines_engine::FeedlySearchService;
use headlines_logging::{headlines_info, headlines_warn};
use tokio::runtime::Builder;

use crate::config::{config_path, read_config, AppConfig};

fn main() -> anyhow::Result<()> {
    let path = config_path();
    let (config, config_error) = match read_config(&path) {
        Ok(loaded) => (loaded.unwrap_or_default(), None),
        Err(err) => (AppConfig::default(), Some(err)),
    };

    headlines_logging::initialize(
        config.log_destination,
        config.level_filter(),
        &config.log_file,
    );
    match config_error {
        Some(err) => headlines_warn!("Using default configuration: {}", err),
        None => headlines_info!("Configuration from {:?}", path),
    }

    let background = Builder::new_multi_thread()
        .thread_name("headlines-io")
        .enable_all()
        .build()
        .context("failed to start background runtime")?;
    let ui = Builder::new_current_thread()
        .enable_all()
        .build()
        .context("failed to start UI runtime")?;

    let service = FeedlySearchService::new(config.service.to_settings())
        .context("failed to create search service")?;

    ui.block_on(console::run(
        config.search,
        Arc::new(service),
        background.handle().clone(),
    ));

    background.shutdown_timeout(Duration::from_secs(1));
    headlines_info!("Shut down");
    Ok(())
}
