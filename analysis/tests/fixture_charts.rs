use nvbench_analysis::{
    render_chart, update_chart, version_chart, ChartStyle, Selection, XAxis, YAxis,
};
use nvbench_ingest::{parse_str, ParserOptions, Report};

const LOG: &str = include_str!("../../ingest/tests/fixtures/list_versions.log");

fn report() -> Report {
    parse_str(LOG, &ParserOptions::default())
}

fn selection(report: &Report) -> Selection<'_> {
    Selection {
        datastructure: &report.axes.datastructures[0],
        version: report.axes.primary_version().unwrap(),
        size: 1000,
        update: 20,
        threads: 4,
    }
}

#[test]
fn version_chart_from_log() {
    let report = report();
    let chart = version_chart(
        &report,
        &selection(&report),
        &report.axes.persists,
        YAxis::Throughput,
    );

    assert_eq!(
        chart.x_axis,
        XAxis::Categories(vec![
            "Automatic".to_owned(),
            "NvTraverse".to_owned(),
            "Manual".to_owned()
        ])
    );
    assert_eq!(chart.reference_line, Some(20.0));

    let persists: Vec<_> = chart.series.iter().map(|s| s.persist.as_str()).collect();
    assert_eq!(persists, ["persist_counter", "persist_simple"]);

    // auto counter only, NvTraverse was never run
    let counter = &chart.series[0].points;
    assert_eq!(counter.len(), 1);
    assert_eq!((counter[0].x, counter[0].value, counter[0].error), (0.0, 10.0, 2.0));

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("versions.png");
    render_chart(&chart, &ChartStyle::default(), &path).unwrap();
    assert!(path.metadata().unwrap().len() > 0);
}

#[test]
fn flush_chart_drops_simple() {
    let report = report();
    let chart = version_chart(
        &report,
        &selection(&report),
        &report.axes.persists,
        YAxis::Flushes,
    );

    assert_eq!(chart.series.len(), 1);
    assert_eq!(chart.series[0].persist, "persist_counter");
    assert_eq!(chart.series[0].points[0].value, 1.0);
    assert_eq!(chart.reference_line, None);
}

#[test]
fn update_chart_is_normalized() {
    let report = report();
    let chart = update_chart(
        &report,
        &selection(&report),
        &report.axes.updates,
        &report.axes.persists,
        YAxis::Throughput,
        false,
    );

    assert_eq!(chart.y_label, "Normalized Throughput");
    assert_eq!(chart.y_max, Some(1.03));
    assert_eq!(chart.reference_line, Some(1.0));

    // primary version is Auto, so only the counter series has a value
    assert_eq!(chart.series.len(), 1);
    assert_eq!(chart.series[0].points[0].value, 0.5);
    assert_eq!(chart.series[0].points[0].error, 0.1);
}
