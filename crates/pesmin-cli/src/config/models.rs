use pesmin::engine::config::MinimizationConfig;
use std::path::PathBuf;

pub struct AppConfig {
    /// Where the converged geometry goes; `None` when output is disabled.
    pub output_path: Option<PathBuf>,
    pub trace_path: Option<PathBuf>,
    pub core_config: MinimizationConfig,
}
