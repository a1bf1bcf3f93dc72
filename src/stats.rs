// Summary statistics over a group's full history, recomputed every tick.

use crate::error::{ChartError, Result};
use crate::models::Series;
use std::fmt;

/// Percentages of a baseline for the summarized min/max/avg.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PercentStats {
    pub min: f64,
    pub max: f64,
    pub avg: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SummaryStats {
    pub min: i64,
    pub max: i64,
    /// Integer mean (truncating).
    pub avg: i64,
    /// Present only when a usable baseline was given.
    pub pct: Option<PercentStats>,
}

/// `value / baseline * 100`.
pub fn percent_of(value: i64, baseline: i64) -> f64 {
    value as f64 / baseline as f64 * 100.0
}

/// Single pass min/max/sum over `history`.
///
/// Percentages are taken from the summarized values (percentage of the average),
/// not averaged across per-tick percentages. A zero or negative baseline is treated as absent.
pub fn summarize(history: &[i64], baseline: Option<i64>) -> Result<SummaryStats> {
    let mut values = history.iter().copied();
    let first = values.next().ok_or(ChartError::EmptyHistory)?;

    let mut min = first;
    let mut max = first;
    let mut sum = i128::from(first);
    let mut count: i128 = 1;
    for v in values {
        min = min.min(v);
        max = max.max(v);
        sum += i128::from(v);
        count += 1;
    }
    // mean of i64 values always fits i64
    let avg = (sum / count) as i64;

    let pct = baseline.filter(|b| *b > 0).map(|b| PercentStats {
        min: percent_of(min, b),
        max: percent_of(max, b),
        avg: percent_of(avg, b),
    });

    Ok(SummaryStats { min, max, avg, pct })
}

/// Pod count range over a history. Only min/max are displayed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PodRange {
    pub min: u32,
    pub max: u32,
    pub avg: u32,
}

impl PodRange {
    pub fn from_history(pods: &[u32]) -> Result<Self> {
        let history: Vec<i64> = pods.iter().map(|&p| i64::from(p)).collect();
        let s = summarize(&history, None)?;
        // all values came from u32
        Ok(Self {
            min: s.min as u32,
            max: s.max as u32,
            avg: s.avg as u32,
        })
    }
}

impl fmt::Display for PodRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.min == self.max {
            write!(f, "{}", self.min)
        } else {
            write!(f, "{}-{}", self.min, self.max)
        }
    }
}

/// Everything the report needs for one group, derived from its series.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GroupStats {
    pub cpu: SummaryStats,
    pub mem: SummaryStats,
    pub pods: PodRange,
}

impl GroupStats {
    pub fn compute(series: &Series) -> Result<Self> {
        if !series.is_consistent() {
            return Err(ChartError::Precondition(format!(
                "ragged series: cpu={}, mem={}, pods={}",
                series.cpu_history.len(),
                series.mem_history.len(),
                series.pod_count_history.len()
            )));
        }
        Ok(Self {
            cpu: summarize(&series.cpu_history, series.cpu_baseline())?,
            mem: summarize(&series.mem_history, series.mem_baseline())?,
            pods: PodRange::from_history(&series.pod_count_history)?,
        })
    }
}
