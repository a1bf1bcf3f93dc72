// Tick orchestrator: sample, reduce into the series store, render both artifacts, sleep.
// Sole mutator of the series store. Any error ends the run; nothing is retried.

use crate::baseline::BaselineTable;
use crate::config::ReportLayout;
use crate::error::Result;
use crate::reducer::reduce;
use crate::report::{HtmlReport, build_reports};
use crate::series_store::SeriesStore;
use crate::source::MetricsSource;
use chrono::Local;
use std::path::PathBuf;
use tokio::sync::oneshot;
use tokio::time::Duration;
use tracing::{debug, info};

/// Collaborators handed to the orchestrator.
pub struct WorkerDeps<M> {
    pub source: M,
    pub baselines: BaselineTable,
}

/// Loop timing and output settings.
#[derive(Debug, Clone)]
pub struct WorkerConfig {
    /// Monitored groups, in report order.
    pub groups: Vec<String>,
    pub interval: Duration,
    /// None runs until shutdown.
    pub max_ticks: Option<u64>,
    pub layout: ReportLayout,
    pub html_path: PathBuf,
    pub snapshot_path: PathBuf,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickState {
    Idle,
    Sampling,
    Reducing,
    Rendering,
    Sleeping,
    Stopped,
}

/// What one tick recorded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TickOutcome {
    /// 1-based tick number.
    pub tick: u64,
    /// Groups with at least one matching entity this tick.
    pub matched_groups: Vec<String>,
    /// Groups drawn in the visual report (all groups with history).
    pub reported_groups: usize,
}

#[derive(Debug)]
pub struct RunSummary {
    pub ticks: u64,
    pub store: SeriesStore,
}

pub struct Orchestrator<M> {
    source: M,
    baselines: BaselineTable,
    store: SeriesStore,
    config: WorkerConfig,
    renderer: HtmlReport,
    state: TickState,
    tick: u64,
}

impl<M: MetricsSource> Orchestrator<M> {
    pub fn new(deps: WorkerDeps<M>, config: WorkerConfig) -> Self {
        let WorkerDeps { source, baselines } = deps;
        Self {
            source,
            baselines,
            store: SeriesStore::new(),
            renderer: HtmlReport::for_path(&config.html_path),
            config,
            state: TickState::Idle,
            tick: 0,
        }
    }

    pub fn state(&self) -> TickState {
        self.state
    }

    pub fn store(&self) -> &SeriesStore {
        &self.store
    }

    pub fn ticks(&self) -> u64 {
        self.tick
    }

    fn transition(&mut self, next: TickState) {
        debug!(from = ?self.state, to = ?next, tick = self.tick, "state");
        self.state = next;
    }

    fn limit_reached(&self) -> bool {
        self.config.max_ticks.is_some_and(|max| self.tick >= max)
    }

    /// One full cycle: Sampling, Reducing, Rendering.
    pub async fn run_tick(&mut self) -> Result<TickOutcome> {
        self.transition(TickState::Sampling);
        let readings = self.source.sample().await?;
        let now = Local::now();

        self.transition(TickState::Reducing);
        let interval_secs = self.config.interval.as_secs();
        let mut matched_groups = Vec::new();
        for group in &self.config.groups {
            let aggregate = reduce(&readings, group);
            if aggregate.is_empty() {
                info!(group = %group, "no matching entities this tick");
                continue;
            }
            for r in readings.iter().filter(|r| &r.group == group) {
                info!(
                    group = %group,
                    entity = %r.entity_name,
                    cpu_m = r.cpu,
                    mem_mi = r.mem,
                    "reading"
                );
            }
            self.store
                .ensure(group, self.baselines.get(group), now, interval_secs);
            self.store.append(group, &aggregate)?;
            matched_groups.push(group.clone());
        }
        if matched_groups.is_empty() {
            info!(tick = self.tick + 1, "no matching entities found for any group");
        }
        let reports = build_reports(
            &self.store,
            self.config.groups.iter().map(String::as_str),
            self.config.layout,
        )?;

        self.transition(TickState::Rendering);
        self.renderer.write(&self.config.html_path, &reports)?;
        self.store.write_snapshot(&self.config.snapshot_path)?;

        self.tick += 1;
        Ok(TickOutcome {
            tick: self.tick,
            matched_groups,
            reported_groups: reports.len(),
        })
    }

    /// Runs until `max_ticks` cycles completed or `shutdown_rx` fires (or its sender is
    /// dropped). Shutdown is only observed while sleeping, so an in-flight tick always
    /// finishes and writes both artifacts.
    pub async fn run(mut self, mut shutdown_rx: oneshot::Receiver<()>) -> Result<RunSummary> {
        let limit = self
            .config
            .max_ticks
            .map_or_else(|| "MAX".to_string(), |n| n.to_string());

        while !self.limit_reached() {
            info!("tick {}/{}", self.tick + 1, limit);
            let outcome = self.run_tick().await?;
            debug!(
                tick = outcome.tick,
                matched = outcome.matched_groups.len(),
                reported = outcome.reported_groups,
                "tick complete"
            );
            if self.limit_reached() {
                break;
            }

            self.transition(TickState::Sleeping);
            tokio::select! {
                _ = tokio::time::sleep(self.config.interval) => {}
                _ = &mut shutdown_rx => {
                    info!(ticks = self.tick, "shutdown requested");
                    break;
                }
            }
        }

        self.transition(TickState::Stopped);
        info!(ticks = self.tick, groups = self.store.len(), "sampling stopped");
        Ok(RunSummary {
            ticks: self.tick,
            store: self.store,
        })
    }
}
