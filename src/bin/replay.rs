// Re-render the visual report from a snapshot file, without contacting the cluster.
//
// Usage: usage-charter-replay SNAPSHOT [OUTPUT] [LAYOUT]
//   OUTPUT  default: SNAPSHOT with an .html extension
//   LAYOUT  split | combined (default: split)

use std::path::PathBuf;
use usage_charter::config::ReportLayout;
use usage_charter::report::{HtmlReport, build_reports};
use usage_charter::series_store::SeriesStore;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let args: Vec<String> = std::env::args().collect();
    let Some(snapshot) = args.get(1).map(PathBuf::from) else {
        anyhow::bail!("usage: usage-charter-replay SNAPSHOT [OUTPUT] [split|combined]");
    };
    let output = args
        .get(2)
        .map(PathBuf::from)
        .unwrap_or_else(|| snapshot.with_extension("html"));
    let layout: ReportLayout = match args.get(3) {
        Some(s) => s.parse()?,
        None => ReportLayout::default(),
    };

    let store = SeriesStore::load_snapshot(&snapshot)?;
    let groups: Vec<&str> = store.groups().collect();
    let reports = build_reports(&store, groups, layout)?;
    HtmlReport::for_path(&output).write(&output, &reports)?;
    tracing::info!(
        groups = reports.len(),
        output = %output.display(),
        "report written"
    );
    Ok(())
}
