// Single-page HTML report: one ECharts line chart per ChartSpec, two columns.

use super::{ChartSpec, LineValues, ReportInput};
use crate::error::Result;
use crate::series_store::write_whole_file;
use serde_json::{Value, json};
use std::fmt::Write as _;
use std::path::Path;
use tracing::instrument;

const ECHARTS_SRC: &str = "https://cdn.jsdelivr.net/npm/echarts@5/dist/echarts.min.js";
const CHART_HEIGHT_PX: u32 = 420;

#[derive(Debug, Clone)]
pub struct HtmlReport {
    title: String,
}

impl HtmlReport {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
        }
    }

    /// Titles the page after the output file name.
    pub fn for_path(path: &Path) -> Self {
        let title = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        Self::new(title)
    }

    pub fn render(&self, reports: &[ReportInput]) -> String {
        let mut body = String::new();
        let mut index = 0usize;
        for report in reports {
            for chart in &report.charts {
                let option = chart_option(chart).to_string().replace("</", "<\\/");
                let _ = write!(
                    body,
                    r#"<div class="container"><div class="item" id="chart_{index}" style="width:100%;height:{CHART_HEIGHT_PX}px;"></div></div>
<script>echarts.init(document.getElementById("chart_{index}")).setOption({option});</script>
"#
                );
                index += 1;
            }
        }
        format!(
            r#"<!DOCTYPE html>
<html>
<head>
<meta charset="utf-8">
<title>{title}</title>
<script src="{ECHARTS_SRC}"></script>
</head>
<body>
<style> .container {{float: left; width: 50%;}} .item {{margin: auto;}} </style>
{body}</body>
</html>
"#,
            title = escape_html(&self.title)
        )
    }

    /// Overwrites `path` with the rendered page.
    #[instrument(skip(self, reports), fields(operation = "write_report", groups = reports.len()))]
    pub fn write(&self, path: &Path, reports: &[ReportInput]) -> Result<()> {
        write_whole_file(path, self.render(reports).as_bytes())
    }
}

fn values(v: &LineValues) -> Value {
    match v {
        LineValues::Integer(xs) => json!(xs),
        LineValues::Float(xs) => json!(xs),
    }
}

fn y_axis(name: &str) -> Value {
    json!({
        "type": "value",
        "name": name,
        "splitLine": { "show": false },
        "axisLabel": { "inside": true },
    })
}

fn chart_option(chart: &ChartSpec) -> Value {
    let mut series = vec![json!({
        "name": chart.primary.name,
        "type": "line",
        "yAxisIndex": 0,
        "data": values(&chart.primary.values),
    })];
    let mut y_axes = vec![y_axis("")];
    if let Some(secondary) = &chart.secondary {
        series.push(json!({
            "name": secondary.name,
            "type": "line",
            "yAxisIndex": 1,
            "data": values(&secondary.values),
        }));
        y_axes.push(y_axis(&secondary.name));
    }
    json!({
        "title": { "text": chart.title, "subtext": chart.subtitle },
        "tooltip": { "show": true, "trigger": "axis", "triggerOn": "mousemove" },
        "legend": { "bottom": 0 },
        "xAxis": { "type": "category", "name": "tick", "data": chart.ticks },
        "yAxis": y_axes,
        "series": series,
    })
}

fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
