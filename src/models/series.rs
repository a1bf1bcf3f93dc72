use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

/// Declared per-entity resource request for a group. Fixed for the process lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BaselineEntry {
    /// Milli-cores.
    pub cpu_request: i64,
    /// Mebibytes.
    pub mem_request: i64,
}

impl BaselineEntry {
    /// CPU request usable as a percentage denominator.
    pub fn cpu(&self) -> Option<i64> {
        (self.cpu_request > 0).then_some(self.cpu_request)
    }

    /// Memory request usable as a percentage denominator.
    pub fn mem(&self) -> Option<i64> {
        (self.mem_request > 0).then_some(self.mem_request)
    }
}

/// A group's history since its first non-empty tick.
///
/// `cpu_history`, `mem_history` and `pod_count_history` always have the same length:
/// the number of ticks in which the group had at least one matching entity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Series {
    pub baseline: Option<BaselineEntry>,
    pub start_time: DateTime<Local>,
    pub tick_interval_seconds: u64,
    /// Per-entity CPU (milli-cores) per recorded tick.
    pub cpu_history: Vec<i64>,
    /// Per-entity memory (MiB) per recorded tick.
    pub mem_history: Vec<i64>,
    pub pod_count_history: Vec<u32>,
}

impl Series {
    pub fn new(
        baseline: Option<BaselineEntry>,
        start_time: DateTime<Local>,
        tick_interval_seconds: u64,
    ) -> Self {
        Self {
            baseline,
            start_time,
            tick_interval_seconds,
            cpu_history: Vec::new(),
            mem_history: Vec::new(),
            pod_count_history: Vec::new(),
        }
    }

    /// Number of recorded ticks.
    pub fn len(&self) -> usize {
        self.pod_count_history.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pod_count_history.is_empty()
    }

    pub fn is_consistent(&self) -> bool {
        self.cpu_history.len() == self.pod_count_history.len()
            && self.mem_history.len() == self.pod_count_history.len()
    }

    pub fn cpu_baseline(&self) -> Option<i64> {
        self.baseline.and_then(|b| b.cpu())
    }

    pub fn mem_baseline(&self) -> Option<i64> {
        self.baseline.and_then(|b| b.mem())
    }
}
