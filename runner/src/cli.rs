use clap::{Parser, ValueEnum};
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Datastructure {
    List,
    Bst,
    Hash,
    Skiplist,
}

impl Datastructure {
    /// name understood by the benchmark's `--ds` flag
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::List => "list",
            Self::Bst => "bst",
            Self::Hash => "hash",
            Self::Skiplist => "skiplist",
        }
    }
}

/// Sweep the persistent data structure benchmark and chart the results.
///
/// Exactly one of `threads`, `versions` or `ratios` is swept, written as a
/// bracketed list such as `[1,2,4,8]`.
#[derive(Parser, Debug, Clone)]
#[command(version, about)]
pub struct Cli {
    /// data structure to benchmark
    #[arg(value_enum)]
    pub datastructure: Datastructure,

    /// thread count, or a bracketed list for a scalability sweep
    pub threads: String,

    /// initial number of keys, or a bracketed list
    pub size: String,

    /// persistence transformation (auto, manual, traverse), or a bracketed list
    pub versions: String,

    /// update percentage between 0 and 100, or a bracketed list
    pub ratios: String,

    /// compare FliT hash table sizes instead of persistence strategies
    #[arg(short, long)]
    pub flithash: bool,

    /// allocate memory from NVRAM through libvmmalloc, needs both pool settings
    #[arg(short, long)]
    pub nvram: bool,

    #[arg(short = 'd', long, env = "VMMALLOC_POOL_DIR")]
    pub pool_dir: Option<String>,

    #[arg(short = 's', long, env = "VMMALLOC_POOL_SIZE")]
    pub pool_size: Option<String>,

    /// short runtime and a single repeat
    #[arg(short, long)]
    pub test_only: bool,

    /// only chart an existing results file
    #[arg(short, long)]
    pub graphs_only: bool,

    /// YAML file overriding the runner defaults
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// also render standalone legend images
    #[arg(long)]
    pub legend: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn command_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn positional_arguments() {
        let cli = Cli::try_parse_from(["nvbench", "skiplist", "[1,2,4]", "1000", "auto", "20", "-t"])
            .unwrap();

        assert_eq!(cli.datastructure, Datastructure::Skiplist);
        assert_eq!(cli.threads, "[1,2,4]");
        assert_eq!(cli.size, "1000");
        assert!(cli.test_only);
        assert!(!cli.nvram);
    }

    #[test]
    fn pool_arguments() {
        let cli = Cli::try_parse_from([
            "nvbench", "list", "4", "1000", "[auto,manual]", "20", "-n", "-d", "/mnt/pmem0", "-s",
            "8589934592",
        ])
        .unwrap();

        assert!(cli.nvram);
        assert_eq!(cli.pool_dir.as_deref(), Some("/mnt/pmem0"));
        assert_eq!(cli.pool_size.as_deref(), Some("8589934592"));
    }

    #[test]
    fn unknown_datastructure_is_rejected() {
        assert!(Cli::try_parse_from(["nvbench", "queue", "4", "1000", "auto", "[0,20]"]).is_err());
    }
}
