use clap::Parser;
use nvbench_runner::{run, Cli, RunnerConfig};
use std::process::ExitCode;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

fn setup_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

fn main() -> ExitCode {
    setup_tracing();
    let cli = Cli::parse();

    let config = match RunnerConfig::load(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            error!("{e}");
            return ExitCode::FAILURE;
        }
    };

    if config.preflight_checks(cli.graphs_only) {
        error!("Found errors in the configuration, aborting");
        return ExitCode::FAILURE;
    }

    match run(&cli, &config) {
        Ok(graphs) => {
            info!("Done, wrote {} images", graphs.len());
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("{e}");
            ExitCode::FAILURE
        }
    }
}
