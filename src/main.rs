use anyhow::Result;
use std::time::Duration;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::time::FormatTime;
use usage_charter::baseline::BaselineTable;
use usage_charter::config::{AppConfig, resolve_output_path};
use usage_charter::kube_repo::KubeRepo;
use usage_charter::version;
use usage_charter::worker::{Orchestrator, WorkerConfig, WorkerDeps};

struct LocalTimer;

impl FormatTime for LocalTimer {
    fn format_time(&self, w: &mut tracing_subscriber::fmt::format::Writer<'_>) -> std::fmt::Result {
        write!(
            w,
            "{}",
            chrono::Local::now().format("%Y-%m-%dT%H:%M:%S%.3f%:z")
        )
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_timer(LocalTimer)
        .with_env_filter(filter)
        .init();

    tracing::info!("starting {}", version::banner());
    let app_config = AppConfig::load()?;
    let timeout = app_config.sampling.timeout_secs.map(Duration::from_secs);

    let kube_repo = KubeRepo::connect(&app_config.cluster, timeout).await?;
    let baselines = BaselineTable::resolve(&kube_repo, &app_config.sampling.groups).await?;

    let start = chrono::Local::now();
    let html_path = resolve_output_path(&app_config.output.html_path, &start);
    let snapshot_path = resolve_output_path(&app_config.output.snapshot_path, &start);
    tracing::info!(
        html = %html_path.display(),
        snapshot = %snapshot_path.display(),
        "writing reports"
    );

    let (shutdown_tx, shutdown_rx) = tokio::sync::oneshot::channel();
    tokio::spawn(async move {
        #[cfg(unix)]
        {
            match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
                Ok(mut sigterm) => {
                    tokio::select! {
                        _ = tokio::signal::ctrl_c() => {}
                        _ = sigterm.recv() => {}
                    }
                }
                Err(_) => {
                    let _ = tokio::signal::ctrl_c().await;
                }
            }
        }
        #[cfg(not(unix))]
        {
            let _ = tokio::signal::ctrl_c().await;
        }
        tracing::info!("Received shutdown signal");
        let _ = shutdown_tx.send(());
    });

    let orchestrator = Orchestrator::new(
        WorkerDeps {
            source: kube_repo,
            baselines,
        },
        WorkerConfig {
            groups: app_config.sampling.groups.clone(),
            interval: Duration::from_secs(app_config.sampling.interval_secs),
            max_ticks: app_config.sampling.tick_limit(),
            layout: app_config.output.layout,
            html_path,
            snapshot_path,
        },
    );

    if let Err(e) = orchestrator.run(shutdown_rx).await {
        tracing::error!(code = e.code(), error = %e, "run aborted");
        return Err(e.into());
    }
    Ok(())
}
