// Per-group series, owned by the tick orchestrator. The snapshot file is its durable copy.

use crate::error::{ChartError, Result};
use crate::models::{BaselineEntry, Series, TickAggregate};
use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use tracing::instrument;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SeriesStore {
    series: BTreeMap<String, Series>,
}

impl SeriesStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates the group's series if absent. First writer wins: later calls are no-ops.
    pub fn ensure(
        &mut self,
        group: &str,
        baseline: Option<BaselineEntry>,
        now: DateTime<Local>,
        interval_secs: u64,
    ) {
        if !self.series.contains_key(group) {
            self.series
                .insert(group.to_string(), Series::new(baseline, now, interval_secs));
        }
    }

    /// Appends the per-entity averages and the entity count of a non-empty aggregate.
    pub fn append(&mut self, group: &str, aggregate: &TickAggregate) -> Result<()> {
        let (Some(cpu), Some(mem)) = (aggregate.cpu_per_entity(), aggregate.mem_per_entity())
        else {
            return Err(ChartError::Precondition(format!(
                "append of empty aggregate for group {group:?}"
            )));
        };
        let series = self.series.get_mut(group).ok_or_else(|| {
            ChartError::Precondition(format!("append before ensure for group {group:?}"))
        })?;
        series.cpu_history.push(cpu);
        series.mem_history.push(mem);
        series.pod_count_history.push(aggregate.matched_entity_count);
        Ok(())
    }

    pub fn get(&self, group: &str) -> Option<&Series> {
        self.series.get(group)
    }

    pub fn groups(&self) -> impl Iterator<Item = &str> {
        self.series.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.series.len()
    }

    pub fn is_empty(&self) -> bool {
        self.series.is_empty()
    }

    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).map_err(|e| ChartError::Snapshot(e.to_string()))
    }

    /// Parses a snapshot, rejecting series whose histories differ in length.
    pub fn from_json(s: &str) -> Result<Self> {
        let store: SeriesStore =
            serde_json::from_str(s).map_err(|e| ChartError::Snapshot(e.to_string()))?;
        if let Some((group, _)) = store.series.iter().find(|(_, s)| !s.is_consistent()) {
            return Err(ChartError::Snapshot(format!(
                "series {group:?} has histories of unequal length"
            )));
        }
        Ok(store)
    }

    /// Overwrites the snapshot at `path` with the whole store (temp file + rename).
    #[instrument(skip(self), fields(operation = "write_snapshot", groups = self.series.len()))]
    pub fn write_snapshot(&self, path: &Path) -> Result<()> {
        let json = self.to_json()?;
        write_whole_file(path, json.as_bytes())
    }

    pub fn load_snapshot(path: &Path) -> Result<Self> {
        let s = std::fs::read_to_string(path).map_err(|e| ChartError::io(path, e))?;
        Self::from_json(&s)
    }
}

/// Replaces `path` in full. Parent directories are created if missing.
pub(crate) fn write_whole_file(path: &Path, contents: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|e| ChartError::io(parent, e))?;
    }
    let mut tmp = path.as_os_str().to_owned();
    tmp.push(".tmp");
    let tmp = std::path::PathBuf::from(tmp);
    std::fs::write(&tmp, contents).map_err(|e| ChartError::io(&tmp, e))?;
    std::fs::rename(&tmp, path).map_err(|e| ChartError::io(path, e))
}
