mod cli;
mod commands;
mod config;
mod error;
mod logging;
mod ui;
mod utils;

use crate::cli::{Cli, Commands};
use crate::error::{CliError, Result};
use crate::ui::{UiEvent, UiManager};
use clap::Parser;
use pesmin::engine::error::EngineError;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    let (ui_manager, ui_sender, shutdown_sender) = UiManager::new();
    let ui_task = tokio::spawn(ui_manager.run());

    let outcome = execute(cli, ui_sender).await;
    stop_ui(shutdown_sender, ui_task).await;

    if let Err(e) = outcome {
        eprintln!("\n❌ Error: {}", e);
        std::process::exit(exit_code(&e));
    }
}

async fn execute(cli: Cli, ui_sender: mpsc::Sender<UiEvent>) -> Result<()> {
    logging::setup_logging(
        cli.verbose,
        cli.quiet,
        cli.log_file.as_deref(),
        ui_sender.clone(),
    )?;
    install_report_hooks()?;

    info!("PESMIN v{}", env!("CARGO_PKG_VERSION"));
    debug!(?cli, "Parsed arguments.");

    if let Some(threads) = cli.threads {
        configure_thread_pool(threads)?;
    }

    let outcome = match cli.command {
        Commands::Minimize(args) => commands::minimize::run(args, ui_sender).await,
        Commands::Inspect(args) => commands::inspect::run(args).await,
    };
    match &outcome {
        Ok(()) => info!("Command finished."),
        Err(e) => error!("Command failed: {}", e),
    }
    outcome
}

/// Panics are logged as color-eyre reports so they reach the log file as well as the terminal.
fn install_report_hooks() -> Result<()> {
    let (panic_hook, eyre_hook) = color_eyre::config::HookBuilder::default().into_hooks();
    eyre_hook.install().map_err(|e| CliError::Other(e.into()))?;
    std::panic::set_hook(Box::new(move |info| {
        error!("{}", panic_hook.panic_report(info));
    }));
    Ok(())
}

fn configure_thread_pool(threads: usize) -> Result<()> {
    debug!(threads, "Sizing the derivative worker pool.");
    rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .build_global()
        .map_err(|e| CliError::Other(anyhow::anyhow!("Cannot size worker pool: {}", e)))
}

async fn stop_ui(shutdown: watch::Sender<bool>, ui_task: JoinHandle<()>) {
    if shutdown.send(true).is_err() {
        warn!("Progress display stopped before shutdown.");
    }
    if let Err(e) = ui_task.await {
        eprintln!("Progress display task failed: {}", e);
    }
}

/// 2 when the iteration cap was hit, 130 after Ctrl-C, 1 for every other failure.
fn exit_code(error: &CliError) -> i32 {
    match error {
        CliError::PesminCore(EngineError::Convergence { .. }) => 2,
        CliError::PesminCore(EngineError::Cancelled { .. }) => 130,
        _ => 1,
    }
}
