//! Parsing and aggregation of benchmark result logs.
//!
//! A results log is the concatenated stdout of many benchmark invocations. Each
//! invocation prints a header naming the data structure and its parameters,
//! followed by a throughput line and (when built with flush statistics) a
//! flushes-per-operation line. [`parse_str`] turns such a log into a [`Report`]
//! holding per-configuration mean and population standard deviation.

pub mod key;
pub mod parser;
pub mod report;
pub mod stats;


pub use key::{ConfigKey, SKIPPED_KEY};
pub use parser::{parse_file, parse_str, HashRelabel, LogParser, ParserOptions};
pub use report::{Aggregate, Aggregates, Report, SampleSeries, SweepAxes};

use thiserror::Error;

#[derive(Error, Debug)]
pub enum IngestError {
    #[error("Failed to read results file {path}")]
    ReadResults {
        path: std::path::PathBuf,
        #[source]
        source: std::io::Error,
    },
}
