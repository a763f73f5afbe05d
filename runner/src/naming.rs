use crate::cli::Cli;
use nvbench_analysis::YAxis;
use std::path::{Path, PathBuf};

/// booleans are spelled the way existing results directories spell them
fn flag(value: bool) -> &'static str {
    if value {
        "True"
    } else {
        "False"
    }
}

/// `<ds>-<threads>-<size>-<versions>-<ratios>-<flithash>-<nvram>.txt` with the
/// arguments as given on the command line
pub fn results_file(results_dir: &Path, cli: &Cli) -> PathBuf {
    let name = [
        cli.datastructure.as_str(),
        cli.threads.as_str(),
        cli.size.as_str(),
        cli.versions.as_str(),
        cli.ratios.as_str(),
        flag(cli.flithash),
        flag(cli.nvram),
    ]
    .join("-");

    results_dir.join(format!("{name}.txt"))
}

/// Chart path derived from a results file name
///
/// The trailing flithash and nvram flags become `-nvram`/`-dram` and an
/// optional `-flithash`, followed by the y axis.
pub fn graph_file(graphs_dir: &Path, results: &Path, yaxis: YAxis) -> PathBuf {
    let stem = results
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default();
    let parameters: Vec<&str> = stem.split('-').collect();
    let kept = parameters.len().saturating_sub(2);

    let mut name = parameters[..kept].join("-");
    let is_set = |index: usize| {
        index >= kept
            && parameters
                .get(index)
                .map_or(false, |value| value.contains("True"))
    };

    name.push_str(if is_set(kept + 1) { "-nvram" } else { "-dram" });
    if is_set(kept) {
        name.push_str("-flithash");
    }

    graphs_dir.join(format!("{name}-{yaxis}.png"))
}

/// standalone legend image for a grouped bar chart
pub fn legend_file(graphs_dir: &Path, yaxis: YAxis, compared: &str) -> PathBuf {
    graphs_dir.join(format!("{yaxis}_compare_{compared}_legend.png"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn results_name_keeps_raw_arguments() {
        let cli = Cli::try_parse_from(["nvbench", "list", "4", "1000", "[auto,traverse,manual]", "20"])
            .unwrap();

        assert_eq!(
            results_file(Path::new("results"), &cli),
            PathBuf::from("results/list-4-1000-[auto,traverse,manual]-20-False-False.txt")
        );
    }

    #[test]
    fn graph_name_from_results() {
        let graphs = Path::new("graphs");

        assert_eq!(
            graph_file(
                graphs,
                Path::new("results/list-4-1000-[auto,traverse,manual]-20-False-False.txt"),
                YAxis::Throughput
            ),
            PathBuf::from("graphs/list-4-1000-[auto,traverse,manual]-20-dram-throughput.png")
        );
        assert_eq!(
            graph_file(
                graphs,
                Path::new("results/hash-4-1000-auto-[0,20]-True-True.txt"),
                YAxis::Flushes
            ),
            PathBuf::from("graphs/hash-4-1000-auto-[0,20]-nvram-flithash-flushes.png")
        );
    }

    #[test]
    fn legend_names() {
        assert_eq!(
            legend_file(Path::new("graphs"), YAxis::Flushes, "versions"),
            PathBuf::from("graphs/flushes_compare_versions_legend.png")
        );
    }
}
