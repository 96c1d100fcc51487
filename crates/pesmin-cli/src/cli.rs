use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

const HELP_TEMPLATE: &str = "\
{before-help}{name} {version}
{author-with-newline}{about-with-newline}
{usage-heading} {usage}

{all-args}{after-help}
";

#[derive(Parser, Debug)]
#[command(
    author = "The PESMIN Developers",
    version,
    about = "PESMIN - Equilibrium geometries of small particle clusters on Lennard-Jones and Morse potential energy surfaces.",
    help_template = HELP_TEMPLATE,
)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Increase verbosity level (-v for INFO, -vv for DEBUG, -vvv for TRACE)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all log output except for errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Write logs to a specified file in addition to the console output
    #[arg(long, global = true, value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    /// Set the number of threads for parallel gradient estimation.
    /// Defaults to the number of available logical cores.
    #[arg(short = 'j', long, global = true, value_name = "NUM")]
    pub threads: Option<usize>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Minimize the potential energy of a randomly seeded particle cluster.
    Minimize(MinimizeArgs),
    /// Read a restricted XYZ file and summarize its point cloud.
    Inspect(InspectArgs),
}

/// Convergence criterion as accepted on the command line.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum CriterionArg {
    /// Compare the summed displacement of all particles.
    Total,
    /// Compare the summed displacement divided by the particle count.
    PerParticle,
}

/// Arguments for the `minimize` subcommand.
#[derive(Args, Debug)]
pub struct MinimizeArgs {
    // --- System ---
    /// Number of particles in the cluster.
    #[arg(short = 'n', long, value_name = "INT")]
    pub particles: Option<usize>,

    /// Pair potential: 'LJ' or 'Morse'.
    #[arg(short, long, value_name = "NAME")]
    pub potential: Option<String>,

    /// Reference ratio r_e/σ for the Morse potential.
    #[arg(short = 'r', long, value_name = "FLOAT")]
    pub re_over_sigma: Option<f64>,

    /// Seed for the random initial configuration.
    #[arg(long, value_name = "U64")]
    pub seed: Option<u64>,

    /// Path to a configuration file in TOML format.
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    // --- Output ---
    /// Output XYZ file. Defaults to '<N><POTENTIAL>.xyz' in the working directory.
    #[arg(short, long, value_name = "PATH", conflicts_with = "no_output")]
    pub output: Option<PathBuf>,

    /// Do not write the converged geometry to disk.
    #[arg(long)]
    pub no_output: bool,

    /// Write one CSV row per convergence check to this file.
    #[arg(long, value_name = "PATH")]
    pub trace: Option<PathBuf>,

    // --- Descent Overrides ---
    /// Finite-difference offset for the gradient estimate.
    #[arg(long, value_name = "FLOAT")]
    pub step_size: Option<f64>,

    /// Scale applied to the clamped derivative when moving a coordinate.
    #[arg(long, value_name = "FLOAT")]
    pub learning_rate: Option<f64>,

    /// Largest derivative magnitude allowed to move a coordinate.
    #[arg(long, value_name = "FLOAT")]
    pub gradient_limit: Option<f64>,

    // --- Convergence Overrides ---
    /// Displacement threshold below which the run is converged.
    #[arg(long, value_name = "FLOAT")]
    pub threshold: Option<f64>,

    /// Number of descent steps between convergence checks.
    #[arg(long, value_name = "INT")]
    pub check_interval: Option<usize>,

    /// Which displacement value is compared against the threshold.
    #[arg(long, value_enum, value_name = "CRITERION")]
    pub criterion: Option<CriterionArg>,

    /// Stop after this many descent steps if not converged.
    #[arg(long, value_name = "INT", conflicts_with = "unbounded")]
    pub max_iterations: Option<usize>,

    /// Run without an iteration cap, until convergence or Ctrl-C.
    #[arg(long)]
    pub unbounded: bool,

    /// Set a specific configuration value, overriding the config file.
    /// Can be used multiple times. Example: -S convergence.threshold=1e-12
    #[arg(short = 'S', long = "set", value_name = "KEY=VALUE", num_args(0..))]
    pub set_values: Vec<String>,
}

/// Arguments for the `inspect` subcommand.
#[derive(Args, Debug)]
pub struct InspectArgs {
    /// Path to the XYZ file to read.
    #[arg(required = true, value_name = "PATH")]
    pub path: PathBuf,

    /// Also report the total energy under this pair potential ('LJ' or 'Morse').
    #[arg(short, long, value_name = "NAME")]
    pub potential: Option<String>,

    /// Reference ratio r_e/σ for the Morse potential.
    #[arg(short = 'r', long, value_name = "FLOAT")]
    pub re_over_sigma: Option<f64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_definition_is_consistent() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_minimize_with_overrides() {
        let cli = Cli::parse_from([
            "pesmin",
            "-vv",
            "minimize",
            "-n",
            "13",
            "-p",
            "Morse",
            "-r",
            "1.5",
            "--criterion",
            "per-particle",
            "-S",
            "convergence.check-interval=50",
        ]);
        assert_eq!(cli.verbose, 2);
        match cli.command {
            Commands::Minimize(args) => {
                assert_eq!(args.particles, Some(13));
                assert_eq!(args.potential.as_deref(), Some("Morse"));
                assert_eq!(args.re_over_sigma, Some(1.5));
                assert_eq!(args.criterion, Some(CriterionArg::PerParticle));
                assert_eq!(args.set_values, vec!["convergence.check-interval=50"]);
            }
            _ => panic!("Expected 'minimize' subcommand"),
        }
    }

    #[test]
    fn unbounded_conflicts_with_max_iterations() {
        let result = Cli::try_parse_from([
            "pesmin",
            "minimize",
            "--unbounded",
            "--max-iterations",
            "10",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn parses_inspect_with_path() {
        let cli = Cli::parse_from(["pesmin", "inspect", "13LJ.xyz", "-p", "LJ"]);
        match cli.command {
            Commands::Inspect(args) => {
                assert_eq!(args.path, PathBuf::from("13LJ.xyz"));
                assert_eq!(args.potential.as_deref(), Some("LJ"));
            }
            _ => panic!("Expected 'inspect' subcommand"),
        }
    }
}
