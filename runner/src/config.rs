use nvbench_analysis::ChartStyle;
use serde::{Deserialize, Serialize};
use std::{
    fs::{self, File},
    io::Error,
    os::unix::fs::MetadataExt,
    path::{Path, PathBuf},
};
use thiserror::Error;
use tracing::{debug, error, warn};

// check if a file is executable
pub fn check_executable(path: &Path) -> Result<bool, ConfigErrors> {
    if !path.is_file() {
        Err(ConfigErrors::FileNotFound)
    } else {
        match File::open(path).map(|file| file.metadata()) {
            Ok(Ok(metadata)) => Ok((metadata.mode() & 0o111) != 0),
            Ok(Err(e)) | Err(e) => Err(ConfigErrors::MetadataNotFound(e)),
        }
    }
}

#[derive(Error, Debug)]
pub enum ConfigErrors {
    #[error("File not found")]
    FileNotFound,
    #[error("Metadata not found")]
    MetadataNotFound(#[from] Error),
    #[error("Failed to read config file {0}")]
    ReadConfig(PathBuf, #[source] Error),
    #[error("Config is not valid YAML for this tool")]
    InvalidConfig(#[from] serde_yaml::Error),
}

#[derive(Deserialize, Serialize, Clone, Debug, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct RunnerConfig {
    // benchmark executable invoked by the generated script
    #[serde(default = "default_binary")]
    pub binary: PathBuf,
    // seconds per benchmark invocation
    #[serde(default = "default_runtime")]
    pub runtime: f64,
    // invocations per sweep point
    #[serde(default = "default_repeats")]
    pub repeats: usize,
    // replacements for runtime and repeats in test-only mode
    #[serde(default = "default_test_runtime")]
    pub test_runtime: f64,
    #[serde(default = "default_test_repeats")]
    pub test_repeats: usize,

    #[serde(default = "default_results_dir")]
    pub results_dir: PathBuf,
    #[serde(default = "default_graphs_dir")]
    pub graphs_dir: PathBuf,
    #[serde(default = "default_script")]
    pub script: PathBuf,

    // command prefixes per memory placement
    #[serde(default = "default_dram_prefix")]
    pub dram_prefix: String,
    #[serde(default = "default_nvram_prefix")]
    pub nvram_prefix: String,
    #[serde(default = "default_numa_prefix")]
    pub numa_prefix: String,

    // seconds until the whole script is killed, unlimited if unset
    #[serde(default)]
    pub timeout: Option<u64>,
    // resolve `persist_hash_cacheline` by position, only for logs of old benchmark builds
    #[serde(default)]
    pub legacy_hash_labels: bool,

    #[serde(default)]
    pub chart: ChartStyle,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            binary: default_binary(),
            runtime: default_runtime(),
            repeats: default_repeats(),
            test_runtime: default_test_runtime(),
            test_repeats: default_test_repeats(),
            results_dir: default_results_dir(),
            graphs_dir: default_graphs_dir(),
            script: default_script(),
            dram_prefix: default_dram_prefix(),
            nvram_prefix: default_nvram_prefix(),
            numa_prefix: default_numa_prefix(),
            timeout: None,
            legacy_hash_labels: false,
            chart: ChartStyle::default(),
        }
    }
}

impl RunnerConfig {
    /// load the config from a YAML file, or fall back to defaults
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigErrors> {
        let Some(path) = path else {
            debug!("No config file given, using defaults");
            return Ok(Self::default());
        };

        let text =
            fs::read_to_string(path).map_err(|e| ConfigErrors::ReadConfig(path.to_path_buf(), e))?;

        Ok(serde_yaml::from_str(&text)?)
    }

    /// (runtime in seconds, repeats) for the selected mode
    pub fn trial_settings(&self, test_only: bool) -> (f64, usize) {
        if test_only {
            (self.test_runtime, self.test_repeats)
        } else {
            (self.runtime, self.repeats)
        }
    }

    /// Check the config for problems, logging all of them instead of stopping at
    /// the first one. Returns whether any error was found.
    pub fn preflight_checks(&self, graphs_only: bool) -> bool {
        let mut contains_error = false;

        if self.repeats == 0 || self.test_repeats == 0 {
            error!("repeats and test_repeats must be at least 1");
            contains_error = true;
        }

        if self.runtime <= 0.0 || self.test_runtime <= 0.0 {
            error!("runtime and test_runtime must be positive");
            contains_error = true;
        }

        if self.timeout == Some(0) {
            error!("timeout cannot be 0, leave it unset to disable it");
            contains_error = true;
        }

        // graphs are drawn from an existing results file, the binary is never invoked
        if graphs_only {
            return contains_error;
        }

        match check_executable(&self.binary) {
            Ok(true) => {}
            Ok(false) => {
                error!(
                    "Benchmark binary {} is not executable",
                    self.binary.to_string_lossy()
                );
                contains_error = true;
            }
            Err(ConfigErrors::FileNotFound) => {
                error!(
                    "Failed to find benchmark binary. Either not a file or not found at {}",
                    self.binary.to_string_lossy()
                );
                contains_error = true;
            }
            Err(e) => {
                error!(
                    "Failed to determine if {} is an executable: {e}",
                    self.binary.to_string_lossy()
                );
                contains_error = true;
            }
        }

        if self.binary.is_relative() {
            warn!(
                "Benchmark binary {} is relative and resolved against the working directory",
                self.binary.to_string_lossy()
            );
        }

        contains_error
    }
}

fn default_binary() -> PathBuf {
    PathBuf::from("build/bench")
}

fn default_runtime() -> f64 {
    5.0
}

fn default_repeats() -> usize {
    5
}

fn default_test_runtime() -> f64 {
    0.1
}

fn default_test_repeats() -> usize {
    1
}

fn default_results_dir() -> PathBuf {
    PathBuf::from("results")
}

fn default_graphs_dir() -> PathBuf {
    PathBuf::from("graphs")
}

fn default_script() -> PathBuf {
    PathBuf::from("exp.sh")
}

fn default_dram_prefix() -> String {
    "LD_PRELOAD=`jemalloc-config --libdir`/libjemalloc.so.`jemalloc-config --revision`".to_owned()
}

fn default_nvram_prefix() -> String {
    "LD_PRELOAD=libvmmalloc.so.1".to_owned()
}

fn default_numa_prefix() -> String {
    "numactl --cpubind=0 --membind=0".to_owned()
}
