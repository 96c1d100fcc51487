use crate::cli::MinimizeArgs;
use crate::config::build_config;
use crate::error::{CliError, Result};
use crate::ui::{CliProgressHandler, UiEvent};
use pesmin::{
    core::io::{
        trace::{TraceRecord, TraceWriter},
        traits::CoordinateFile,
        xyz::{XyzFile, XyzMetadata},
    },
    engine::{cancel::CancellationToken, config::MinimizationConfig, progress::ProgressReporter},
    workflows::{self, minimize::MinimizationResult},
};
use std::fmt::Write as _;
use std::path::Path;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{info, warn};

pub async fn run(args: MinimizeArgs, ui_sender: mpsc::Sender<UiEvent>) -> Result<()> {
    info!("Merging configuration from file and CLI arguments...");
    let app_config = build_config(&args)?;
    let config = &app_config.core_config;

    let cancel = CancellationToken::new();
    let interrupt_listener = spawn_interrupt_listener(cancel.clone());

    let progress_handler = CliProgressHandler::new(ui_sender);
    let reporter = ProgressReporter::with_callback(progress_handler.get_callback());

    println!(
        "Minimizing {} particles on the {} surface...",
        config.particle_count, config.potential
    );
    info!("Invoking the core minimization workflow...");

    let outcome = tokio::task::block_in_place(|| {
        workflows::minimize::run_from_random_start(config, &reporter, &cancel)
    });
    interrupt_listener.abort();
    let result = outcome?;

    info!(
        status = %result.status,
        iterations = result.iterations,
        "Workflow finished."
    );

    if let Some(trace_path) = &app_config.trace_path {
        write_trace(trace_path, &result.checkpoints)?;
        println!("  Trace written to: {}", trace_path.display());
    }

    print!("{}", format_summary(&result, config));

    let result = result.into_converged()?;

    match &app_config.output_path {
        Some(output_path) => {
            let metadata = XyzMetadata::for_run(config.particle_count, &config.potential);
            info!("Writing converged geometry to {:?}", output_path);
            XyzFile::write_to_path(&result.configuration, &metadata, output_path).map_err(
                |e| CliError::FileWriting {
                    path: output_path.clone(),
                    source: e.into(),
                },
            )?;
            println!("✓ Geometry written to: {}", output_path.display());
        }
        None => info!("Output disabled; converged geometry not written."),
    }

    Ok(())
}

fn spawn_interrupt_listener(cancel: CancellationToken) -> JoinHandle<()> {
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                warn!("Interrupt received; stopping after the current iteration.");
                cancel.cancel();
            }
            Err(e) => warn!("Failed to listen for Ctrl-C: {}", e),
        }
    })
}

fn write_trace(path: &Path, records: &[TraceRecord]) -> Result<()> {
    let to_cli_error = |e: pesmin::core::io::trace::TraceError| CliError::FileWriting {
        path: path.to_path_buf(),
        source: e.into(),
    };
    let mut writer = TraceWriter::create(path).map_err(to_cli_error)?;
    for record in records {
        writer.record(record).map_err(to_cli_error)?;
    }
    writer.flush().map_err(to_cli_error)
}

fn format_summary(result: &MinimizationResult, config: &MinimizationConfig) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Status:            {}", result.status);
    let _ = writeln!(out, "Potential:         {}", config.potential);
    let _ = writeln!(out, "Particles:         {}", result.configuration.len());
    let _ = writeln!(out, "Iterations:        {}", result.iterations);
    let _ = writeln!(out, "Initial energy:    {:.12}", result.initial_energy);
    let _ = writeln!(out, "Final energy:      {:.12}", result.energy);
    match (result.last_displacement, result.mean_displacement()) {
        (Some(total), Some(mean)) => {
            let _ = writeln!(
                out,
                "Last displacement: {:e} (per particle {:e})",
                total, mean
            );
        }
        _ => {
            let _ = writeln!(out, "Last displacement: n/a");
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::{Cli, Commands};
    use clap::Parser;
    use nalgebra::Point3;
    use pesmin::engine::error::EngineError;
    use pesmin::core::forcefield::params::PotentialKind;
    use pesmin::core::models::configuration::Configuration;
    use pesmin::engine::config::MinimizationConfigBuilder;
    use pesmin::engine::state::RunStatus;

    fn config() -> MinimizationConfig {
        MinimizationConfigBuilder::new()
            .particle_count(2)
            .potential(PotentialKind::LennardJones)
            .build()
            .unwrap()
    }

    fn result(status: RunStatus, last_displacement: Option<f64>) -> MinimizationResult {
        MinimizationResult {
            status,
            configuration: Configuration::new(vec![
                Point3::new(0.0, 0.0, 0.0),
                Point3::new(1.122462048309373, 0.0, 0.0),
            ]),
            iterations: 3501,
            initial_energy: -0.5,
            energy: -1.0,
            last_displacement,
            checkpoints: vec![],
        }
    }

    #[test]
    fn summary_lists_status_energy_and_displacement() {
        let summary = format_summary(&result(RunStatus::Converged, Some(4e-13)), &config());

        assert!(summary.contains("Status:            converged"));
        assert!(summary.contains("Iterations:        3501"));
        assert!(summary.contains("Final energy:      -1.000000000000"));
        assert!(summary.contains("Last displacement: 4e-13 (per particle 2e-13)"));
    }

    #[test]
    fn summary_without_checks_has_no_displacement() {
        let summary = format_summary(&result(RunStatus::Cancelled, None), &config());
        assert!(summary.contains("Last displacement: n/a"));
    }

    #[test]
    fn trace_file_has_header_and_one_row_per_record() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("trace.csv");
        let records = [
            TraceRecord {
                iteration: 0,
                energy: -0.5,
                displacement: 1e-3,
                mean_displacement: 5e-4,
            },
            TraceRecord {
                iteration: 100,
                energy: -0.75,
                displacement: 1e-4,
                mean_displacement: 5e-5,
            },
        ];

        write_trace(&path, &records).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], "iteration,energy,displacement,mean_displacement");
        assert!(lines[2].starts_with("100,"));
    }

    fn minimize_args(extra: &[&str]) -> MinimizeArgs {
        let argv = ["pesmin", "minimize", "-n", "2", "-p", "LJ", "--seed", "11"]
            .iter()
            .chain(extra);
        match Cli::parse_from(argv).command {
            Commands::Minimize(args) => args,
            other => panic!("Expected the minimize subcommand, got {:?}", other),
        }
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn converged_run_writes_readable_geometry_and_trace() {
        let dir = tempfile::tempdir().unwrap();
        let xyz_path = dir.path().join("pair.xyz");
        let trace_path = dir.path().join("pair.csv");
        let args = minimize_args(&[
            "--learning-rate",
            "1e-3",
            "--threshold",
            "1e-9",
            "--check-interval",
            "10",
            "-o",
            xyz_path.to_str().unwrap(),
            "--trace",
            trace_path.to_str().unwrap(),
        ]);
        let (ui_sender, _ui_receiver) = mpsc::channel(4096);

        run(args, ui_sender).await.unwrap();

        assert!(xyz_path.is_file());
        let (configuration, metadata) = XyzFile::read_from_path(&xyz_path).unwrap();
        assert_eq!(configuration.len(), 2);
        assert_eq!(metadata.declared_count, Some(2));
        let trace = std::fs::read_to_string(&trace_path).unwrap();
        assert!(trace.lines().count() > 1);
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn capped_run_fails_and_writes_no_geometry() {
        let dir = tempfile::tempdir().unwrap();
        let xyz_path = dir.path().join("pair.xyz");
        let args = minimize_args(&[
            "--max-iterations",
            "10",
            "--threshold",
            "1e-200",
            "-o",
            xyz_path.to_str().unwrap(),
        ]);
        let (ui_sender, _ui_receiver) = mpsc::channel(4096);

        let result = run(args, ui_sender).await;

        assert!(matches!(
            result,
            Err(CliError::PesminCore(EngineError::Convergence { .. }))
        ));
        assert!(!xyz_path.exists());
    }

    #[test]
    fn trace_into_missing_directory_is_write_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("trace.csv");
        let result = write_trace(&path, &[]);
        assert!(matches!(result, Err(CliError::FileWriting { .. })));
    }
}
