use crate::{
    drawing_error,
    series::{Chart, ChartKind, Series, XAxis},
    style::{persist_style, ChartStyle},
    ChartError,
};
use plotters::{
    coord::{types::RangedCoordf64, Shift},
    prelude::*,
};
use std::{ops::Range, path::Path};
use tracing::debug;

/// share of a category slot covered by its group of bars
const BAR_GROUP_WIDTH: f64 = 0.8;
/// segments of a dashed reference line, every other one is drawn
const DASH_SEGMENTS: usize = 60;
const LEGEND_COLUMNS: usize = 7;
/// pixel size of one legend entry
const LEGEND_CELL: (usize, usize) = (260, 36);

/// Render `chart` into `path`, as SVG for a `.svg` extension and PNG otherwise
pub fn render_chart(chart: &Chart, style: &ChartStyle, path: &Path) -> Result<(), ChartError> {
    if chart.is_empty() {
        return Err(ChartError::Empty(chart.title.clone()));
    }

    let size = (style.width, style.height);
    match path.extension().and_then(|ext| ext.to_str()) {
        Some("svg") => draw_chart(SVGBackend::new(path, size), chart, style)?,
        _ => draw_chart(BitMapBackend::new(path, size), chart, style)?,
    }
    debug!(path = ?path, title = chart.title, "Rendered chart");

    Ok(())
}

/// Render a standalone legend with one entry per strategy label
pub fn render_legend(persists: &[String], style: &ChartStyle, path: &Path) -> Result<(), ChartError> {
    if persists.is_empty() {
        return Err(ChartError::Empty(path.display().to_string()));
    }

    let columns = persists.len().min(LEGEND_COLUMNS);
    let rows = (persists.len() + LEGEND_COLUMNS - 1) / LEGEND_COLUMNS;
    let size = (
        (columns * LEGEND_CELL.0 + 20) as u32,
        (rows * LEGEND_CELL.1 + 20) as u32,
    );

    match path.extension().and_then(|ext| ext.to_str()) {
        Some("svg") => draw_legend(SVGBackend::new(path, size).into_drawing_area(), persists, style)?,
        _ => draw_legend(BitMapBackend::new(path, size).into_drawing_area(), persists, style)?,
    }
    debug!(path = ?path, "Rendered legend");

    Ok(())
}

/// x range with categories centered on integer positions
fn x_range(axis: &XAxis) -> Range<f64> {
    match axis {
        XAxis::Numeric(values) if !values.is_empty() => {
            let min = values.iter().copied().min().unwrap_or_default() as f64;
            let max = values.iter().copied().max().unwrap_or_default() as f64;
            let padding = ((max - min) * 0.05).max(0.5);

            (min - padding)..(max + padding)
        }
        XAxis::Numeric(_) => 0.0..1.0,
        XAxis::Categories(labels) => -0.5..(labels.len().max(1) as f64 - 0.5),
    }
}

/// upper bound on tick marks along x
fn x_tick_count(axis: &XAxis) -> usize {
    match axis {
        XAxis::Numeric(_) => 10,
        XAxis::Categories(labels) => labels.len().max(1),
    }
}

/// tick label, only integral positions carry one
fn x_label(axis: &XAxis, x: f64) -> String {
    if (x - x.round()).abs() > 1e-6 || x < -1e-6 {
        return String::new();
    }

    match axis {
        XAxis::Numeric(_) => format!("{x:.0}"),
        XAxis::Categories(labels) => labels
            .get(x.round() as usize)
            .cloned()
            .unwrap_or_default(),
    }
}

/// y axis top when the chart does not fix one
fn headroom(max: f64) -> f64 {
    if max > 0.0 {
        max * 1.1
    } else {
        1.0
    }
}

fn draw_chart<DB: DrawingBackend>(
    backend: DB,
    chart: &Chart,
    style: &ChartStyle,
) -> Result<(), ChartError>
where
    DB::ErrorType: 'static,
{
    let root = backend.into_drawing_area();
    root.fill(&WHITE).map_err(drawing_error)?;

    let range = x_range(&chart.x_axis);
    let (x_start, x_end) = (range.start, range.end);
    let y_top = chart.y_max.unwrap_or_else(|| headroom(chart.data_max()));

    let mut context = ChartBuilder::on(&root)
        .caption(
            &chart.title,
            ("sans-serif", f64::from(style.caption_size)).into_font(),
        )
        .margin(15)
        .x_label_area_size(50)
        .y_label_area_size(70)
        .build_cartesian_2d(range, 0.0..y_top)
        .map_err(drawing_error)?;

    let formatter = |x: &f64| x_label(&chart.x_axis, *x);
    let mut mesh = context.configure_mesh();
    mesh.x_desc(chart.x_label.as_str())
        .y_desc(chart.y_label.as_str())
        .x_labels(x_tick_count(&chart.x_axis))
        .x_label_formatter(&formatter)
        .label_style(("sans-serif", f64::from(style.label_size)).into_font());
    if !style.show_grid {
        mesh.disable_mesh();
    }
    mesh.draw().map_err(drawing_error)?;

    let series_count = chart.series.len();
    for (index, series) in chart.series.iter().enumerate() {
        let (color, name) = persist_style(&series.persist, index);

        match chart.kind {
            ChartKind::Lines => draw_line(&mut context, series, color, name)?,
            ChartKind::Bars => draw_bars(&mut context, series, index, series_count, color, name)?,
        }
    }

    if let Some(level) = chart.reference_line {
        let step = (x_end - x_start) / DASH_SEGMENTS as f64;
        context
            .draw_series((0..DASH_SEGMENTS).step_by(2).map(|segment| {
                let from = x_start + segment as f64 * step;
                PathElement::new(vec![(from, level), (from + step, level)], BLACK.stroke_width(2))
            }))
            .map_err(drawing_error)?;
    }

    context
        .configure_series_labels()
        .position(SeriesLabelPosition::UpperRight)
        .background_style(&WHITE.mix(0.8))
        .border_style(&BLACK)
        .label_font(("sans-serif", f64::from(style.label_size)).into_font())
        .draw()
        .map_err(drawing_error)?;

    root.present().map_err(drawing_error)?;
    Ok(())
}

type Context<'a, DB> = ChartContext<'a, DB, Cartesian2d<RangedCoordf64, RangedCoordf64>>;

/// line with markers and standard deviation error bars
fn draw_line<DB: DrawingBackend>(
    context: &mut Context<'_, DB>,
    series: &Series,
    color: RGBColor,
    name: String,
) -> Result<(), ChartError>
where
    DB::ErrorType: 'static,
{
    context
        .draw_series(LineSeries::new(
            series.points.iter().map(|point| (point.x, point.value)),
            color.stroke_width(2),
        ))
        .map_err(drawing_error)?
        .label(name)
        .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], color.stroke_width(2)));

    context
        .draw_series(
            series
                .points
                .iter()
                .map(|point| Circle::new((point.x, point.value), 4, color.filled())),
        )
        .map_err(drawing_error)?;

    context
        .draw_series(series.points.iter().map(|point| {
            ErrorBar::new_vertical(
                point.x,
                (point.value - point.error).max(0.0),
                point.value,
                point.value + point.error,
                color.stroke_width(1),
                8,
            )
        }))
        .map_err(drawing_error)?;

    Ok(())
}

/// the `index`-th bar of every category group
fn draw_bars<DB: DrawingBackend>(
    context: &mut Context<'_, DB>,
    series: &Series,
    index: usize,
    series_count: usize,
    color: RGBColor,
    name: String,
) -> Result<(), ChartError>
where
    DB::ErrorType: 'static,
{
    let width = BAR_GROUP_WIDTH / series_count as f64;
    let offset = index as f64 * width - BAR_GROUP_WIDTH / 2.0;

    context
        .draw_series(series.points.iter().map(|point| {
            let left = point.x + offset;
            Rectangle::new([(left, 0.0), (left + width, point.value)], color.filled())
        }))
        .map_err(drawing_error)?
        .label(name)
        .legend(move |(x, y)| Rectangle::new([(x, y - 6), (x + 12, y + 6)], color.filled()));

    Ok(())
}

fn draw_legend<DB: DrawingBackend>(
    root: DrawingArea<DB, Shift>,
    persists: &[String],
    style: &ChartStyle,
) -> Result<(), ChartError>
where
    DB::ErrorType: 'static,
{
    root.fill(&WHITE).map_err(drawing_error)?;
    let font = ("sans-serif", f64::from(style.label_size)).into_font();

    for (index, persist) in persists.iter().enumerate() {
        let (color, name) = persist_style(persist, index);
        let x = (10 + (index % LEGEND_COLUMNS) * LEGEND_CELL.0) as i32;
        let y = (10 + (index / LEGEND_COLUMNS) * LEGEND_CELL.1) as i32;

        root.draw(&Rectangle::new([(x, y + 6), (x + 24, y + 26)], color.filled()))
            .map_err(drawing_error)?;
        root.draw(&Text::new(name, (x + 32, y + 6), font.clone()))
            .map_err(drawing_error)?;
    }

    root.present().map_err(drawing_error)?;
    Ok(())
}
