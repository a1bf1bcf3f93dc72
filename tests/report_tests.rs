// Report assembly: captions, chart sets per layout, purity

mod common;

use common::start_time;
use usage_charter::config::ReportLayout;
use usage_charter::models::{BaselineEntry, Series, TickAggregate};
use usage_charter::report::{HtmlReport, LineValues, assemble, build_reports};
use usage_charter::series_store::SeriesStore;
use usage_charter::stats::GroupStats;

fn web_series() -> Series {
    let mut s = Series::new(
        Some(BaselineEntry {
            cpu_request: 500,
            mem_request: 200,
        }),
        start_time(),
        30,
    );
    s.cpu_history = vec![200, 300];
    s.mem_history = vec![100, 150];
    s.pod_count_history = vec![2, 2];
    s
}

#[test]
fn split_layout_has_absolute_and_percentage_charts() {
    let series = web_series();
    let stats = GroupStats::compute(&series).unwrap();
    let report = assemble("web", &series, &stats, ReportLayout::Split);

    let titles: Vec<&str> = report.charts.iter().map(|c| c.title.as_str()).collect();
    assert_eq!(
        titles,
        vec![
            "web (CPU per pod [m])",
            "web (CPU per pod [%])",
            "web (Memory per pod [Mi])",
            "web (Memory per pod [%])",
        ]
    );
    let cpu = &report.charts[0];
    assert_eq!(cpu.ticks, vec![0, 1]);
    assert_eq!(cpu.primary.values, LineValues::Integer(vec![200, 300]));
    assert_eq!(
        cpu.secondary.as_ref().unwrap().values,
        LineValues::Integer(vec![2, 2])
    );
    let start = start_time().format("%Y-%m-%dT%H:%M:%S").to_string();
    assert_eq!(
        cpu.subtitle,
        format!("[pods: 2, start time: {start}, tick: 30s] min: 200, max: 300, avg: 250, request per pod: 500")
    );
    assert_eq!(
        report.charts[1].subtitle,
        format!("[pods: 2, start time: {start}, tick: 30s] min: 40.00%, max: 60.00%, avg: 50.00%")
    );
    assert_eq!(report.charts[1].primary.values, LineValues::Float(vec![40.0, 60.0]));
}

#[test]
fn combined_layout_folds_percentages_into_caption() {
    let series = web_series();
    let stats = GroupStats::compute(&series).unwrap();
    let report = assemble("web", &series, &stats, ReportLayout::Combined);
    assert_eq!(report.charts.len(), 2);
    assert!(report.charts[0]
        .subtitle
        .ends_with("| of request: min: 40.00%, max: 60.00%, avg: 50.00%"));
    assert!(report.charts[1]
        .subtitle
        .ends_with("| of request: min: 50.00%, max: 75.00%, avg: 62.50%"));
}

#[test]
fn missing_baseline_omits_percentage_charts() {
    let mut series = web_series();
    series.baseline = None;
    let stats = GroupStats::compute(&series).unwrap();
    assert!(stats.cpu.pct.is_none());
    let report = assemble("web", &series, &stats, ReportLayout::Split);
    assert_eq!(report.charts.len(), 2);
    assert!(report.charts[0].subtitle.ends_with("request per pod: n/a"));
}

#[test]
fn pod_range_shows_min_max_when_count_changes() {
    let mut series = web_series();
    series.pod_count_history = vec![2, 4];
    let stats = GroupStats::compute(&series).unwrap();
    let report = assemble("web", &series, &stats, ReportLayout::Split);
    assert!(report.charts[0].subtitle.starts_with("[pods: 2-4,"));
}

#[test]
fn assemble_is_pure() {
    let series = web_series();
    let stats = GroupStats::compute(&series).unwrap();
    let a = assemble("web", &series, &stats, ReportLayout::Split);
    let b = assemble("web", &series, &stats, ReportLayout::Split);
    assert_eq!(
        serde_json::to_vec(&a).unwrap(),
        serde_json::to_vec(&b).unwrap()
    );
    let html = HtmlReport::new("r.html");
    assert_eq!(html.render(&[a]), html.render(&[b]));
}

#[test]
fn build_reports_follows_given_order_and_skips_unseen_groups() {
    let mut store = SeriesStore::new();
    for group in ["web", "db"] {
        store.ensure(group, None, start_time(), 30);
        store
            .append(
                group,
                &TickAggregate {
                    matched_entity_count: 1,
                    total_cpu: 10,
                    total_mem: 10,
                },
            )
            .unwrap();
    }
    let reports = build_reports(&store, ["db", "ghost", "web"], ReportLayout::Split).unwrap();
    let groups: Vec<&str> = reports.iter().map(|r| r.group.as_str()).collect();
    assert_eq!(groups, vec!["db", "web"]);
}

#[test]
fn scenario_two_ticks_against_half_core_request() {
    let mut store = SeriesStore::new();
    store.ensure(
        "web",
        Some(BaselineEntry {
            cpu_request: 500,
            mem_request: 128,
        }),
        start_time(),
        30,
    );
    for total in [400, 600] {
        store
            .append(
                "web",
                &TickAggregate {
                    matched_entity_count: 2,
                    total_cpu: total,
                    total_mem: 128,
                },
            )
            .unwrap();
    }
    let stats = GroupStats::compute(store.get("web").unwrap()).unwrap();
    assert_eq!((stats.cpu.min, stats.cpu.max, stats.cpu.avg), (200, 300, 250));
    let pct = stats.cpu.pct.unwrap();
    assert!((pct.min - 40.0).abs() < 1e-9);
    assert!((pct.max - 60.0).abs() < 1e-9);
    assert!((pct.avg - 50.0).abs() < 1e-9);
}
