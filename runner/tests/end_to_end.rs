use clap::Parser;
use nvbench_runner::{run, Cli, RunnerConfig, RunnerError, SweepError};
use std::{
    fs::{self, Permissions},
    os::unix::fs::PermissionsExt,
    path::Path,
};

/// Prints the log format of the real benchmark, throughput scales with threads
const FAKE_BENCH: &str = r#"#!/bin/bash
while [ $# -gt 0 ]; do
  case "$1" in
    --ds) ds=$2 ;;
    --version) ver=$2 ;;
    --persist) per=$2 ;;
    --update) up=$2 ;;
    --size) size=$2 ;;
    --threads) th=$2 ;;
    --runtime) rt=$2 ;;
  esac
  shift 2
done
case "$ver" in
  original) name=Original ;;
  auto) name=Auto ;;
  manual) name=Manual ;;
  traverse) name=NvTraverse ;;
esac
if [ "$ver" = original ]; then
  echo "	Datastructure: List $name, CLWB"
else
  echo "	Datastructure: List $name, persist_$per, CLWB"
fi
echo "	Fixed-Size Benchmark: P = $th, size = $size, Updates = $up%, runtime = ${rt}s"
echo "	Throughput = $((th * 10)) Mop/s"
echo "Flushes per operation: 1.25"
"#;

fn setup(dir: &Path) -> RunnerConfig {
    let binary = dir.join("bench");
    fs::write(&binary, FAKE_BENCH).unwrap();
    fs::set_permissions(&binary, Permissions::from_mode(0o755)).unwrap();

    RunnerConfig {
        binary,
        results_dir: dir.join("results"),
        graphs_dir: dir.join("graphs"),
        script: dir.join("exp.sh"),
        dram_prefix: String::new(),
        ..RunnerConfig::default()
    }
}

fn cli(args: &[&str]) -> Cli {
    Cli::try_parse_from(std::iter::once("nvbench").chain(args.iter().copied())).unwrap()
}

#[test]
fn version_sweep_produces_charts() {
    let dir = tempfile::tempdir().unwrap();
    let config = setup(dir.path());
    assert!(!config.preflight_checks(false));

    let cli = cli(&["list", "4", "1000", "[auto,traverse,manual]", "20", "-t", "--legend"]);
    let written = run(&cli, &config).unwrap();

    let results = dir
        .path()
        .join("results/list-4-1000-[auto,traverse,manual]-20-False-False.txt");
    let log = fs::read_to_string(&results).unwrap();
    // baseline plus three versions times four persists, one repeat each
    assert_eq!(log.matches("Throughput =").count(), 1 + 3 * 4);
    assert_eq!(log.matches("running on DRAM").count(), 1 + 3 * 4);

    let script = fs::read_to_string(dir.path().join("exp.sh")).unwrap();
    assert!(script.contains("--version traverse --persist link --update 20 --size 1000 --threads 4 --runtime 0.1"));

    let graphs = dir.path().join("graphs");
    assert_eq!(
        written,
        [
            graphs.join("list-4-1000-[auto,traverse,manual]-20-dram-throughput.png"),
            graphs.join("throughput_compare_versions_legend.png"),
            graphs.join("list-4-1000-[auto,traverse,manual]-20-dram-flushes.png"),
            graphs.join("flushes_compare_versions_legend.png"),
        ]
    );
    assert!(written.iter().all(|path| path.is_file()));
}

#[test]
fn graphs_only_reuses_results() {
    let dir = tempfile::tempdir().unwrap();
    let config = setup(dir.path());

    let written = run(&cli(&["bst", "[1,2]", "1000", "auto", "0", "-t"]), &config).unwrap();
    assert_eq!(written.len(), 2);
    fs::remove_file(dir.path().join("exp.sh")).unwrap();
    written.iter().for_each(|path| fs::remove_file(path).unwrap());

    let again = run(&cli(&["bst", "[1,2]", "1000", "auto", "0", "-g"]), &config).unwrap();

    assert_eq!(again, written);
    assert!(again.iter().all(|path| path.is_file()));
    assert!(!dir.path().join("exp.sh").exists());
}

#[test]
fn graphs_only_without_results_fails() {
    let dir = tempfile::tempdir().unwrap();
    let config = setup(dir.path());

    assert!(matches!(
        run(&cli(&["list", "4", "1000", "auto", "[0,20]", "-g"]), &config),
        Err(RunnerError::Ingest(_))
    ));
}

#[test]
fn unbracketed_sweep_is_rejected_before_running() {
    let dir = tempfile::tempdir().unwrap();
    let config = setup(dir.path());

    assert!(matches!(
        run(&cli(&["list", "4", "1000", "auto", "20", "-t"]), &config),
        Err(RunnerError::Sweep(SweepError::InvalidArgument))
    ));
    assert!(!dir.path().join("exp.sh").exists());
}

#[test]
fn nvram_without_pool_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let config = setup(dir.path());
    let mut cli = cli(&["list", "4", "1000", "[auto,manual]", "20", "-t", "-n"]);
    cli.pool_dir = None;
    cli.pool_size = Some("8G".to_owned());

    assert!(matches!(run(&cli, &config), Err(RunnerError::MissingPool)));
    assert!(!dir.path().join("exp.sh").exists());
}
