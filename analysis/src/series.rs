use nvbench_ingest::{Aggregates, ConfigKey, Report};
use std::fmt;
use tracing::{debug, info};

/// persistence strategy whose flush count is not comparable with the others
const UNFILTERED_PERSIST: &str = "persist_simple";
const BASELINE: &str = "Original";

/// versions compared side by side, with their axis labels
pub const COMPARED_VERSIONS: [(&str, &str); 3] = [
    ("Auto", "Automatic"),
    ("NvTraverse", "NvTraverse"),
    ("Manual", "Manual"),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum YAxis {
    Throughput,
    Flushes,
}

impl YAxis {
    pub const ALL: [YAxis; 2] = [YAxis::Throughput, YAxis::Flushes];

    pub fn name(&self) -> &'static str {
        match self {
            Self::Throughput => "throughput",
            Self::Flushes => "flushes",
        }
    }

    pub fn aggregates<'a>(&self, report: &'a Report) -> &'a Aggregates {
        match self {
            Self::Throughput => &report.throughput,
            Self::Flushes => &report.flushes,
        }
    }

    fn label(&self) -> &'static str {
        match self {
            Self::Throughput => "Throughput (Mop/s)",
            Self::Flushes => "Flushes per Operation",
        }
    }

    /// strategies plotted on this axis, in the given order
    fn persists<'a>(&self, persists: &'a [String]) -> impl Iterator<Item = &'a String> + 'a {
        let flushes = *self == Self::Flushes;
        persists
            .iter()
            .filter(move |persist| !(flushes && persist.as_str() == UNFILTERED_PERSIST))
    }
}

impl fmt::Display for YAxis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    /// thread count for numeric axes, category index otherwise
    pub x: f64,
    pub value: f64,
    pub error: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Series {
    /// persistence strategy label, or `Original` for the baseline
    pub persist: String,
    pub points: Vec<Point>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum XAxis {
    Numeric(Vec<u64>),
    Categories(Vec<String>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChartKind {
    /// one line with error bars per series
    Lines,
    /// one bar per series within each category
    Bars,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Chart {
    pub title: String,
    pub kind: ChartKind,
    pub x_label: String,
    pub y_label: String,
    pub x_axis: XAxis,
    pub series: Vec<Series>,
    /// dashed horizontal line, e.g. the baseline throughput
    pub reference_line: Option<f64>,
    /// fixed upper bound of the y axis, derived from the data if unset
    pub y_max: Option<f64>,
}

impl Chart {
    /// largest value including error bars and reference line
    pub fn data_max(&self) -> f64 {
        self.series
            .iter()
            .flat_map(|series| series.points.iter())
            .map(|point| point.value + point.error)
            .chain(self.reference_line)
            .fold(0.0, f64::max)
    }

    pub fn is_empty(&self) -> bool {
        self.series.is_empty()
    }
}

/// Fixed sweep coordinates of a chart. The axis being plotted is ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Selection<'a> {
    pub datastructure: &'a str,
    pub version: &'a str,
    pub size: u64,
    pub update: u64,
    pub threads: u64,
}

impl<'a> Selection<'a> {
    fn key(&self, version: &str, persist: &str, update: u64, threads: u64) -> ConfigKey {
        ConfigKey::new(
            self.datastructure,
            version,
            persist,
            self.size,
            update,
            threads,
        )
    }

    fn original(&self, update: u64, threads: u64) -> ConfigKey {
        ConfigKey::original(self.datastructure, self.size, update, threads)
    }
}

fn point(aggregates: &Aggregates, key: &ConfigKey, x: f64) -> Option<Point> {
    match aggregates.get_key(key) {
        Some(aggregate) => Some(Point {
            x,
            value: aggregate.mean,
            error: aggregate.stddev,
        }),
        None => {
            debug!(key = %key, "No measurements, omitting point");
            None
        }
    }
}

/// push the series unless none of its points had measurements
fn push_series(series: &mut Vec<Series>, persist: &str, points: Vec<Point>) {
    if points.is_empty() {
        debug!(persist, "Dropping empty series");
    } else {
        series.push(Series {
            persist: persist.to_owned(),
            points,
        });
    }
}

/// Metric over thread counts, one line per strategy plus the baseline
pub fn thread_chart(
    report: &Report,
    selection: &Selection,
    threads: &[u64],
    persists: &[String],
    yaxis: YAxis,
) -> Chart {
    let aggregates = yaxis.aggregates(report);
    let mut series = Vec::new();

    for persist in yaxis.persists(persists) {
        let points = threads
            .iter()
            .filter_map(|&th| {
                let key = selection.key(selection.version, persist, selection.update, th);
                point(aggregates, &key, th as f64)
            })
            .collect();
        push_series(&mut series, persist, points);
    }

    let baseline = threads
        .iter()
        .filter_map(|&th| point(aggregates, &selection.original(selection.update, th), th as f64))
        .collect();
    push_series(&mut series, BASELINE, baseline);

    let title = format!(
        "{} - {} keys, {}% updates, {}",
        selection.datastructure, selection.size, selection.update, selection.version
    );
    info!("{title}");

    Chart {
        title,
        kind: ChartKind::Lines,
        x_label: "Number of Threads".to_owned(),
        y_label: yaxis.label().to_owned(),
        x_axis: XAxis::Numeric(threads.to_vec()),
        series,
        reference_line: None,
        y_max: None,
    }
}

/// Metric over update ratios, grouped bars per ratio
///
/// Throughput is normalized by the baseline unless `htsize` is set.
pub fn update_chart(
    report: &Report,
    selection: &Selection,
    updates: &[u64],
    persists: &[String],
    yaxis: YAxis,
    htsize: bool,
) -> Chart {
    let aggregates = yaxis.aggregates(report);
    let normalize = yaxis == YAxis::Throughput && !htsize;
    let mut series = Vec::new();

    for persist in yaxis.persists(persists) {
        let points = updates
            .iter()
            .enumerate()
            .filter_map(|(index, &up)| {
                let original = selection.original(up, selection.threads);
                let key = if persist == BASELINE {
                    original.clone()
                } else {
                    selection.key(selection.version, persist, up, selection.threads)
                };
                let mut bar = point(aggregates, &key, index as f64)?;

                if normalize {
                    let Some(baseline) = aggregates.mean(&original.to_string()) else {
                        debug!(key = %original, "No baseline to normalize against");
                        return None;
                    };
                    bar.value /= baseline;
                    bar.error /= baseline;
                }

                Some(bar)
            })
            .collect();
        push_series(&mut series, persist, points);
    }

    let mut title = format!(
        "{}: {} - {} keys, {} - {} threads",
        yaxis, selection.datastructure, selection.size, selection.version, selection.threads
    );
    if htsize {
        title.insert_str(0, "htsize-");
    }
    info!("{title}");

    let (y_label, reference_line, y_max) = if normalize {
        ("Normalized Throughput", Some(1.0), Some(1.03))
    } else {
        (yaxis.label(), None, None)
    };

    Chart {
        title,
        kind: ChartKind::Bars,
        x_label: "Update Percentage".to_owned(),
        y_label: y_label.to_owned(),
        x_axis: XAxis::Categories(updates.iter().map(u64::to_string).collect()),
        series,
        reference_line,
        y_max,
    }
}

/// Metric over persistence transformations, grouped bars per version
pub fn version_chart(
    report: &Report,
    selection: &Selection,
    persists: &[String],
    yaxis: YAxis,
) -> Chart {
    let aggregates = yaxis.aggregates(report);
    let mut series = Vec::new();

    for persist in yaxis.persists(persists) {
        let points = COMPARED_VERSIONS
            .iter()
            .enumerate()
            .filter_map(|(index, (version, _))| {
                let key = selection.key(version, persist, selection.update, selection.threads);
                point(aggregates, &key, index as f64)
            })
            .collect();
        push_series(&mut series, persist, points);
    }

    let title = format!(
        "{}: {} - {} keys, {}% updates, {} threads",
        yaxis, selection.datastructure, selection.size, selection.update, selection.threads
    );
    info!("{title}");

    let mut chart = Chart {
        title,
        kind: ChartKind::Bars,
        x_label: String::new(),
        y_label: yaxis.label().to_owned(),
        x_axis: XAxis::Categories(
            COMPARED_VERSIONS
                .iter()
                .map(|(_, label)| label.to_string())
                .collect(),
        ),
        series,
        reference_line: None,
        y_max: None,
    };

    if yaxis == YAxis::Throughput {
        let original = selection.original(selection.update, selection.threads);
        chart.reference_line = aggregates.mean(&original.to_string());
        chart.y_max = Some(chart.data_max() * 1.03);
    }

    chart
}
