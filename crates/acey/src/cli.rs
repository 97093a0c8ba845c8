//! Command line interface

use crate::application::SystemStatus;
use crate::infrastructure::logging::init_logging;
use crate::infrastructure::{ConfigLoader, init_app};
use anyhow::Context;
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

/// Command line interface for Acey
#[derive(Parser, Debug, Default)]
#[command(name = "acey")]
#[command(about = "Acey - provider dispatch and autonomous cycle scheduling")]
#[command(version)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Run a single cycle, print the status and exit
    #[arg(long)]
    pub once: bool,
}

/// Load configuration, build the system and run it
///
/// With `--once`, runs one cycle immediately. Otherwise starts the scheduler
/// and blocks until Ctrl-C, then stops it. Returns the final status either
/// way.
pub async fn run(cli: &Cli) -> anyhow::Result<SystemStatus> {
    let mut loader = ConfigLoader::new();
    if let Some(path) = &cli.config {
        loader = loader.with_config_path(path);
    }
    let config = loader.load().context("Failed to load configuration")?;
    init_logging(&config.logging).context("Failed to initialize logging")?;

    let context = init_app(config)
        .await
        .context("Failed to assemble the system")?;
    let control = Arc::clone(context.control());

    if cli.once {
        let record = control.scheduler().run_cycle_now().await;
        info!(
            cycle = record.cycle_number,
            success = record.success,
            health = ?record.health,
            "single cycle finished"
        );
        return Ok(control.get_status());
    }

    control.start().await?;
    info!("scheduler running, press Ctrl-C to stop");
    tokio::signal::ctrl_c()
        .await
        .context("Failed to listen for Ctrl-C")?;
    info!("shutdown requested");
    control.stop().await?;

    Ok(control.get_status())
}
