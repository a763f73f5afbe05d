//! Comparison charts over aggregated benchmark results.
//!
//! Chart construction is split in two steps. [`series`] selects and normalizes
//! the aggregated values for one chart into a [`Chart`], and [`render`] draws a
//! [`Chart`] with `plotters` into a PNG or SVG file.

pub mod render;
pub mod series;
pub mod style;

pub use render::{render_chart, render_legend};
pub use series::{
    thread_chart, update_chart, version_chart, Chart, ChartKind, Point, Selection, Series, XAxis,
    YAxis,
};
pub use style::{ChartStyle, PersistStyle};

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ChartError {
    #[error("Failed to draw chart: {0}")]
    Drawing(String),
    #[error("Chart '{0}' has no series to draw")]
    Empty(String),
}

/// flatten a backend specific plotters error into a [`ChartError`]
pub(crate) fn drawing_error<E: std::fmt::Display>(error: E) -> ChartError {
    ChartError::Drawing(error.to_string())
}
