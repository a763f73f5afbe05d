//! Benchmark sweeps for persistent data structures.
//!
//! A [`Cli`] invocation is expanded into a [`Sweep`], written out as a bash
//! script and executed with its output captured in a results file. The file is
//! then parsed and charted according to the swept axis.

pub mod cli;
pub mod config;
pub mod executor;
pub mod naming;
pub mod report;
pub mod script;
pub mod sweep;

pub use cli::{Cli, Datastructure};
pub use config::{ConfigErrors, RunnerConfig};
pub use sweep::{ExperimentKind, Sweep, SweepError};

use executor::{ExecutorError, ScriptExecutor};
use nvbench_analysis::ChartError;
use nvbench_ingest::{parse_file, IngestError, ParserOptions};
use report::ReportOptions;
use script::ScriptOptions;
use std::{io, path::PathBuf, time::Duration};
use thiserror::Error;
use tracing::info;

#[derive(Error, Debug)]
pub enum RunnerError {
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Sweep(#[from] SweepError),
    #[error(transparent)]
    Config(#[from] ConfigErrors),
    #[error(transparent)]
    Executor(#[from] ExecutorError),
    #[error(transparent)]
    Ingest(#[from] IngestError),
    #[error(transparent)]
    Chart(#[from] ChartError),
    #[error("NVRAM allocation needs both VMMALLOC_POOL_DIR and VMMALLOC_POOL_SIZE")]
    MissingPool,
    #[error("No measurements found in {0}")]
    NoResults(PathBuf),
}

/// Run the sweep described by `cli` and chart it, returning the written images
pub fn run(cli: &Cli, config: &RunnerConfig) -> Result<Vec<PathBuf>, RunnerError> {
    let sweep = Sweep::from_cli(cli)?;

    info!("datastructure: {}", cli.datastructure.as_str());
    info!("threads: {}", cli.threads);
    info!("sizes: {}", cli.size);
    info!("versions: {}", cli.versions);
    info!("ratios: {}", cli.ratios);
    if cli.flithash {
        info!("Comparing flit hashtable sizes");
    }

    let nvram = match (cli.nvram, &cli.pool_dir, &cli.pool_size) {
        (false, _, _) => {
            info!("allocating memory from DRAM");
            None
        }
        (true, Some(dir), Some(size)) => {
            info!("allocating memory from NVRAM, VMMALLOC_POOL_DIR={dir}, VMMALLOC_POOL_SIZE={size}");
            Some((dir.as_str(), size.as_str()))
        }
        (true, _, _) => return Err(RunnerError::MissingPool),
    };

    let (runtime, repeats) = config.trial_settings(cli.test_only);
    let results = naming::results_file(&config.results_dir, cli);

    if !cli.graphs_only {
        let runs = sweep.runs();
        info!(
            "Running {} configurations x {repeats} repeats at {runtime} s each",
            runs.len()
        );

        let contents = script::render_script(
            &runs,
            &ScriptOptions {
                binary: &config.binary,
                runtime,
                repeats,
                nvram,
                dram_prefix: &config.dram_prefix,
                nvram_prefix: &config.nvram_prefix,
                numa_prefix: &config.numa_prefix,
            },
        );

        ScriptExecutor::new(
            &config.script,
            &results,
            config.timeout.map(Duration::from_secs),
        )
        .execute(&contents)?;
    }

    let options = ParserOptions {
        hash_relabel: config
            .legacy_hash_labels
            .then(|| sweep.legacy_relabel(repeats)),
    };
    let mut report = parse_file(&results, &options)?;

    report::render_report(
        &mut report,
        &ReportOptions {
            kind: sweep.kind,
            results: &results,
            graphs_dir: &config.graphs_dir,
            style: &config.chart,
            repeats,
            flithash: cli.flithash,
            legend: cli.legend,
        },
    )
}
