use crate::{naming, sweep::ExperimentKind, RunnerError};
use nvbench_analysis::{
    render_chart, render_legend, thread_chart, update_chart, version_chart, Chart, ChartError,
    ChartStyle, Selection, YAxis,
};
use nvbench_ingest::Report;
use std::{fs, path::{Path, PathBuf}};
use tracing::{info, warn};

/// Where and how the charts of one results file are drawn
#[derive(Debug, Clone, Copy)]
pub struct ReportOptions<'a> {
    pub kind: ExperimentKind,
    pub results: &'a Path,
    pub graphs_dir: &'a Path,
    pub style: &'a ChartStyle,
    /// expected trials per configuration
    pub repeats: usize,
    pub flithash: bool,
    pub legend: bool,
}

/// Draw the throughput and flush charts for the swept axis
///
/// Returns the paths of every image written.
pub fn render_report(report: &mut Report, options: &ReportOptions) -> Result<Vec<PathBuf>, RunnerError> {
    report.axes.sort();
    let axes = &report.axes;

    info!("datastructures: {:?}", axes.datastructures);
    info!("versions: {:?}", axes.versions);
    info!("persists: {:?}", axes.persists);
    info!("updates: {:?}", axes.updates);
    info!("threads: {:?}", axes.threads);
    info!("sizes: {:?}", axes.sizes);
    info!("experiment: {}", options.kind);

    info!(
        "aggregated {} throughput and {} flush configurations",
        report.throughput.len(),
        report.flushes.len()
    );
    for (key, trials) in report.irregular_trials(options.repeats) {
        warn!("incorrect number of trials: {key}: {trials}");
    }

    let (Some(datastructure), Some(&update), Some(&threads), Some(version)) = (
        axes.datastructures.first(),
        axes.updates.first(),
        axes.threads.first(),
        axes.primary_version(),
    ) else {
        return Err(RunnerError::NoResults(options.results.to_path_buf()));
    };
    let Some(&size) = axes.sizes_of(datastructure).first() else {
        return Err(RunnerError::NoResults(options.results.to_path_buf()));
    };

    let selection = Selection {
        datastructure,
        version,
        size,
        update,
        threads,
    };

    fs::create_dir_all(options.graphs_dir)?;

    let mut written = Vec::new();
    for yaxis in YAxis::ALL {
        let (chart, compared) = match options.kind {
            ExperimentKind::Scalability => (
                thread_chart(report, &selection, &axes.threads, &axes.persists, yaxis),
                None,
            ),
            ExperimentKind::Version => (
                version_chart(report, &selection, &axes.persists, yaxis),
                Some("versions"),
            ),
            ExperimentKind::Ratio => (
                update_chart(
                    report,
                    &selection,
                    &axes.updates,
                    &axes.persists,
                    yaxis,
                    options.flithash,
                ),
                Some("updates"),
            ),
        };

        if chart.is_empty() {
            warn!("No measurements for '{}', skipping chart", chart.title);
            continue;
        }

        let path = naming::graph_file(options.graphs_dir, options.results, yaxis);
        draw(&chart, options.style, &path)?;
        written.push(path);

        if let (true, Some(compared)) = (options.legend, compared) {
            let persists: Vec<String> = chart.series.iter().map(|s| s.persist.clone()).collect();
            let path = naming::legend_file(options.graphs_dir, yaxis, compared);
            render_legend(&persists, options.style, &path)?;
            written.push(path);
        }
    }

    Ok(written)
}

fn draw(chart: &Chart, style: &ChartStyle, path: &Path) -> Result<(), ChartError> {
    render_chart(chart, style, path)?;
    info!("Wrote {}", path.display());

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use nvbench_ingest::{parse_str, ParserOptions};

    const LOG: &str = "\
\tDatastructure: List Original, CLWB
\tFixed-Size Benchmark: P = 4, size = 1000, Updates = 20%, runtime = 5s
\tThroughput = 20 Mop/s
\tDatastructure: List Auto, persist_counter, CLWB
\tFixed-Size Benchmark: P = 4, size = 1000, Updates = 20%, runtime = 5s
\tThroughput = 10 Mop/s
Flushes per operation: 1.5
\tDatastructure: List Manual, persist_counter, CLWB
\tFixed-Size Benchmark: P = 4, size = 1000, Updates = 20%, runtime = 5s
\tThroughput = 12 Mop/s
Flushes per operation: 1.0
";

    fn options<'a>(
        dir: &'a Path,
        results: &'a Path,
        style: &'a ChartStyle,
        legend: bool,
    ) -> ReportOptions<'a> {
        ReportOptions {
            kind: ExperimentKind::Version,
            results,
            graphs_dir: dir,
            style,
            repeats: 1,
            flithash: false,
            legend,
        }
    }

    #[test]
    fn version_report_writes_both_axes() {
        let dir = tempfile::tempdir().unwrap();
        let results = Path::new("results/list-4-1000-[auto,manual]-20-False-False.txt");
        let style = ChartStyle::default();
        let mut report = parse_str(LOG, &ParserOptions::default());

        let written =
            render_report(&mut report, &options(dir.path(), results, &style, true)).unwrap();

        assert_eq!(
            written,
            [
                dir.path().join("list-4-1000-[auto,manual]-20-dram-throughput.png"),
                dir.path().join("throughput_compare_versions_legend.png"),
                dir.path().join("list-4-1000-[auto,manual]-20-dram-flushes.png"),
                dir.path().join("flushes_compare_versions_legend.png"),
            ]
        );
        assert!(written.iter().all(|path| path.is_file()));
    }

    #[test]
    fn empty_log_has_no_results() {
        let dir = tempfile::tempdir().unwrap();
        let style = ChartStyle::default();
        let mut report = parse_str("nothing to see\n", &ParserOptions::default());

        assert!(matches!(
            render_report(
                &mut report,
                &options(dir.path(), Path::new("results/empty.txt"), &style, false)
            ),
            Err(RunnerError::NoResults(_))
        ));
    }
}
