use crate::{
    key::ConfigKey,
    report::{Report, SampleSeries, SweepAxes},
    IngestError,
};
use serde::{Deserialize, Serialize};
use std::{fs, path::Path};
use tracing::{debug, trace};

const DATASTRUCTURE_MARKER: &str = "Datastructure:";
const BENCHMARK_MARKER: &str = "Benchmark";
const THROUGHPUT_MARKER: &str = "Throughput";
const FLUSHES_MARKER: &str = "Flushes per operation";

/// characters trimmed from numeric tokens, e.g. `4,` or `20%,` or `Mop/s`
const NUMBER_TRIM: &[char] = &[',', 'M', 'o', 'p', '/', 's', ' ', '%', '\n', '\r', '\t'];

/// Positional relabelling of an ambiguous persistence label found in legacy
/// logs, where every hash-table size reported the same name.
///
/// The n-th throughput sample carrying `label` is assigned
/// `variants[(n / block_len) % variants.len()]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct HashRelabel {
    pub label: String,
    pub variants: Vec<String>,
    /// consecutive samples per variant
    pub block_len: usize,
}

impl HashRelabel {
    pub fn legacy(block_len: usize) -> Self {
        Self {
            label: "persist_hash_cacheline".to_owned(),
            variants: ["persist_hash_12", "persist_hash_16", "persist_hash_20"]
                .map(String::from)
                .to_vec(),
            block_len,
        }
    }

    fn variant(&self, occurrence: usize) -> Option<&str> {
        if self.variants.is_empty() {
            return None;
        }

        let block = occurrence / self.block_len.max(1);
        Some(self.variants[block % self.variants.len()].as_str())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParserOptions {
    /// labels are taken verbatim unless set
    pub hash_relabel: Option<HashRelabel>,
}

/// Line-by-line state machine over a results log
///
/// Header lines update the active configuration; measurement lines close out
/// one sample for it.
#[derive(Debug, Default)]
pub struct LogParser {
    options: ParserOptions,
    current: ConfigKey,
    relabel_counter: usize,
    throughput: SampleSeries,
    flushes: SampleSeries,
    axes: SweepAxes,
}

/// Split a `Datastructure:` header into (data structure, version, persist)
///
/// `List Auto, persist_counter, CLWB` -> `("List", "Auto", "persist_counter")`
/// `List Original, CLWB`             -> `("List", "Original", "")`
fn parse_datastructure(line: &str) -> Option<(String, String, String)> {
    let (_, rest) = line.split_once(DATASTRUCTURE_MARKER)?;
    let fields: Vec<&str> = rest.split(',').map(str::trim).collect();

    let mut name = fields.first()?.split_whitespace();
    let datastructure = name.next()?;
    let version = name.next()?;
    let persist = if fields.len() > 2 { fields[1] } else { "" };

    Some((datastructure.to_owned(), version.to_owned(), persist.to_owned()))
}

fn parse_number<T: std::str::FromStr>(token: &str) -> Option<T> {
    token.trim_matches(NUMBER_TRIM).parse().ok()
}

/// Extract (threads, size, update ratio) from a benchmark header such as
/// `Fixed-Size Benchmark: P = 4, size = 1000, Updates = 20%, runtime = 5s`
fn parse_benchmark(line: &str) -> Option<(u64, u64, u64)> {
    let (_, rest) = line.split_once(':')?;
    let mut threads = None;
    let mut size = None;
    let mut update = None;

    for field in rest.split(',') {
        let Some((name, value)) = field.split_once('=') else {
            continue;
        };

        match name.trim() {
            "P" => threads = parse_number(value),
            "size" => size = parse_number(value),
            "Updates" => update = parse_number(value),
            _ => {}
        }
    }

    Some((threads?, size?, update?))
}

/// value after `=`, e.g. `Throughput = 12.5 Mop/s`
fn parse_throughput(line: &str) -> Option<f64> {
    let (_, rest) = line.split_once('=')?;
    parse_number(rest.split_whitespace().next()?)
}

/// value after `:`, e.g. `Flushes per operation: 0.75`
fn parse_flushes(line: &str) -> Option<f64> {
    let (_, rest) = line.split_once(FLUSHES_MARKER)?;
    parse_number(rest.trim_start_matches(':').split_whitespace().next()?)
}

impl LogParser {
    pub fn new(options: ParserOptions) -> Self {
        Self {
            options,
            ..Self::default()
        }
    }

    /// feed a single line, unmatched or malformed lines are ignored
    pub fn feed_line(&mut self, line: &str) {
        if line.contains(DATASTRUCTURE_MARKER) {
            match parse_datastructure(line) {
                Some((datastructure, version, persist)) => {
                    self.current.datastructure = datastructure;
                    self.current.version = version;
                    self.current.persist = persist;
                }
                None => trace!(line, "Ignoring malformed datastructure header"),
            }
        }

        if line.contains(BENCHMARK_MARKER) {
            match parse_benchmark(line) {
                Some((threads, size, update)) => {
                    self.current.threads = threads;
                    self.current.size = size;
                    self.current.update = update;
                }
                None => trace!(line, "Ignoring malformed benchmark header"),
            }
        }

        if line.contains(THROUGHPUT_MARKER) {
            match parse_throughput(line) {
                Some(throughput) => self.close_throughput(throughput),
                None => trace!(line, "Ignoring malformed throughput line"),
            }
        }

        if line.contains(FLUSHES_MARKER) {
            match parse_flushes(line) {
                Some(flushes) => self.flushes.push(&self.current, flushes),
                None => trace!(line, "Ignoring malformed flush line"),
            }
        }
    }

    fn close_throughput(&mut self, throughput: f64) {
        if let Some(relabel) = &self.options.hash_relabel {
            if self.current.persist == relabel.label {
                if let Some(variant) = relabel.variant(self.relabel_counter) {
                    debug!(
                        occurrence = self.relabel_counter,
                        variant, "Relabelled ambiguous hash persist"
                    );
                    self.current.persist = variant.to_owned();
                }
                self.relabel_counter += 1;
            }
        }

        self.axes.record(&self.current);
        self.throughput.push(&self.current, throughput);
    }

    pub fn finish(self) -> Report {
        Report::from_samples(self.throughput, self.flushes, self.axes)
    }
}

/// Parse a complete results log
pub fn parse_str(text: &str, options: &ParserOptions) -> Report {
    let mut parser = LogParser::new(options.clone());
    text.lines().for_each(|line| parser.feed_line(line));

    parser.finish()
}

pub fn parse_file(path: &Path, options: &ParserOptions) -> Result<Report, IngestError> {
    let text = fs::read_to_string(path).map_err(|source| IngestError::ReadResults {
        path: path.to_path_buf(),
        source,
    })?;
    debug!(path = ?path, bytes = text.len(), "Parsing results file");

    Ok(parse_str(&text, options))
}
