// Turns a group's series and statistics into chart inputs for the renderer.

mod html;

pub use html::HtmlReport;

use crate::config::{DATE_FORMAT, ReportLayout};
use crate::error::Result;
use crate::models::Series;
use crate::series_store::SeriesStore;
use crate::stats::{GroupStats, SummaryStats, percent_of};
use serde::Serialize;

/// All charts for one group, in display order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportInput {
    pub group: String,
    pub charts: Vec<ChartSpec>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartSpec {
    pub title: String,
    pub subtitle: String,
    /// Index of each recorded tick, starting at 0.
    pub ticks: Vec<usize>,
    pub primary: Line,
    /// Drawn against a second y-axis.
    pub secondary: Option<Line>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Line {
    pub name: String,
    pub values: LineValues,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum LineValues {
    Integer(Vec<i64>),
    Float(Vec<f64>),
}

#[derive(Debug, Clone, Copy)]
enum Resource {
    Cpu,
    Memory,
}

impl Resource {
    fn label(self) -> &'static str {
        match self {
            Self::Cpu => "CPU",
            Self::Memory => "Memory",
        }
    }

    fn unit(self) -> &'static str {
        match self {
            Self::Cpu => "m",
            Self::Memory => "Mi",
        }
    }

    fn history(self, series: &Series) -> &[i64] {
        match self {
            Self::Cpu => &series.cpu_history,
            Self::Memory => &series.mem_history,
        }
    }

    fn baseline(self, series: &Series) -> Option<i64> {
        match self {
            Self::Cpu => series.cpu_baseline(),
            Self::Memory => series.mem_baseline(),
        }
    }

    fn stats(self, stats: &GroupStats) -> &SummaryStats {
        match self {
            Self::Cpu => &stats.cpu,
            Self::Memory => &stats.mem,
        }
    }
}

/// Builds the charts for one group. Pure: same inputs give the same output.
pub fn assemble(
    group: &str,
    series: &Series,
    stats: &GroupStats,
    layout: ReportLayout,
) -> ReportInput {
    let ticks: Vec<usize> = (0..series.len()).collect();
    let pods = Line {
        name: "Pods".into(),
        values: LineValues::Integer(
            series
                .pod_count_history
                .iter()
                .map(|&p| i64::from(p))
                .collect(),
        ),
    };
    let header = format!(
        "[pods: {}, start time: {}, tick: {}s]",
        stats.pods,
        series.start_time.format(DATE_FORMAT),
        series.tick_interval_seconds
    );

    let mut charts = Vec::with_capacity(4);
    for resource in [Resource::Cpu, Resource::Memory] {
        let summary = resource.stats(stats);
        let baseline = resource.baseline(series);
        let absolute = absolute_caption(&header, summary, baseline);

        let subtitle = match (layout, summary.pct) {
            (ReportLayout::Combined, Some(pct)) => format!(
                "{absolute} | of request: min: {:.2}%, max: {:.2}%, avg: {:.2}%",
                pct.min, pct.max, pct.avg
            ),
            _ => absolute,
        };
        charts.push(ChartSpec {
            title: format!(
                "{group} ({} per pod [{}])",
                resource.label(),
                resource.unit()
            ),
            subtitle,
            ticks: ticks.clone(),
            primary: Line {
                name: resource.label().into(),
                values: LineValues::Integer(resource.history(series).to_vec()),
            },
            secondary: Some(pods.clone()),
        });

        if layout == ReportLayout::Split
            && let (Some(pct), Some(b)) = (summary.pct, baseline)
        {
            charts.push(ChartSpec {
                title: format!("{group} ({} per pod [%])", resource.label()),
                subtitle: format!(
                    "{header} min: {:.2}%, max: {:.2}%, avg: {:.2}%",
                    pct.min, pct.max, pct.avg
                ),
                ticks: ticks.clone(),
                primary: Line {
                    name: format!("{} %", resource.label()),
                    values: LineValues::Float(
                        resource
                            .history(series)
                            .iter()
                            .map(|&v| percent_of(v, b))
                            .collect(),
                    ),
                },
                secondary: Some(pods.clone()),
            });
        }
    }

    ReportInput {
        group: group.to_string(),
        charts,
    }
}

fn absolute_caption(header: &str, summary: &SummaryStats, baseline: Option<i64>) -> String {
    let request = baseline.map_or_else(|| "n/a".to_string(), |b| b.to_string());
    format!(
        "{header} min: {}, max: {}, avg: {}, request per pod: {request}",
        summary.min, summary.max, summary.avg
    )
}

/// Reports for every group in `order` that has recorded history. Statistics are recomputed
/// from the full history of each group.
pub fn build_reports<'a>(
    store: &SeriesStore,
    order: impl IntoIterator<Item = &'a str>,
    layout: ReportLayout,
) -> Result<Vec<ReportInput>> {
    let mut out = Vec::new();
    for group in order {
        let Some(series) = store.get(group).filter(|s| !s.is_empty()) else {
            continue;
        };
        let stats = GroupStats::compute(series)?;
        out.push(assemble(group, series, &stats, layout));
    }
    Ok(out)
}
