use crate::error::{CliError, Result};
use pesmin::engine::config::ConvergenceCriterion;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::debug;

#[derive(Deserialize, Debug, Default, Clone)]
#[serde(deny_unknown_fields)]
pub struct FileSystemConfig {
    pub particles: Option<usize>,
}

#[derive(Deserialize, Debug, Default, Clone)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct FilePotentialConfig {
    pub name: Option<String>,
    pub re_over_sigma: Option<f64>,
}

#[derive(Deserialize, Debug, Default, Clone)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct FileDescentConfig {
    pub step_size: Option<f64>,
    pub learning_rate: Option<f64>,
    pub gradient_limit: Option<f64>,
}

#[derive(Deserialize, Debug, Default, Clone)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct FileConvergenceConfig {
    pub threshold: Option<f64>,
    pub check_interval: Option<usize>,
    pub criterion: Option<ConvergenceCriterion>,
    pub max_iterations: Option<usize>,
    pub unbounded: Option<bool>,
}

#[derive(Deserialize, Debug, Default, Clone)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct FileOutputConfig {
    pub path: Option<PathBuf>,
    pub trace: Option<PathBuf>,
}

#[derive(Deserialize, Debug, Default, Clone)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct FileConfig {
    pub seed: Option<u64>,
    pub system: Option<FileSystemConfig>,
    pub potential: Option<FilePotentialConfig>,
    pub descent: Option<FileDescentConfig>,
    pub convergence: Option<FileConvergenceConfig>,
    pub output: Option<FileOutputConfig>,
}

impl FileConfig {
    pub fn from_file(path: &Path) -> Result<Self> {
        debug!("Loading configuration from file: {:?}", path);
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content).map_err(|e| CliError::FileParsing {
            path: path.to_path_buf(),
            source: e.into(),
        })
    }
}
