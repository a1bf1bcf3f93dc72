// Shared test helpers: scripted collaborators and fixtures.
#![allow(dead_code)]

use chrono::{DateTime, Local, TimeZone};
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};
use std::sync::atomic::{AtomicUsize, Ordering};
use usage_charter::models::{BaselineEntry, RawReading};
use usage_charter::source::{BaselineSource, MetricsSource};
use usage_charter::{ChartError, Result};

pub fn reading(entity: &str, group: &str, cpu: i64, mem: i64) -> RawReading {
    RawReading {
        entity_name: entity.to_string(),
        group: group.to_string(),
        cpu,
        mem,
    }
}

pub fn start_time() -> DateTime<Local> {
    Local.with_ymd_and_hms(2026, 10, 18, 9, 30, 0).unwrap()
}

/// Replays one batch per call; `None` makes that call fail. Runs dry as empty batches.
pub struct ScriptedSource {
    batches: Mutex<VecDeque<Option<Vec<RawReading>>>>,
    calls: AtomicUsize,
}

impl ScriptedSource {
    pub fn new(batches: Vec<Option<Vec<RawReading>>>) -> Self {
        Self {
            batches: Mutex::new(batches.into()),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl MetricsSource for &ScriptedSource {
    async fn sample(&self) -> Result<Vec<RawReading>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match self.batches.lock().unwrap().pop_front() {
            Some(Some(batch)) => Ok(batch),
            Some(None) => Err(ChartError::Sampling("metrics API unavailable".into())),
            None => Ok(Vec::new()),
        }
    }
}

pub struct FakeInventory {
    pub entries: HashMap<String, BaselineEntry>,
    pub reachable: bool,
}

impl FakeInventory {
    pub fn with(entries: &[(&str, i64, i64)]) -> Self {
        Self {
            entries: entries
                .iter()
                .map(|(g, cpu, mem)| {
                    (
                        g.to_string(),
                        BaselineEntry {
                            cpu_request: *cpu,
                            mem_request: *mem,
                        },
                    )
                })
                .collect(),
            reachable: true,
        }
    }
}

impl BaselineSource for FakeInventory {
    async fn requests(&self, groups: &[String]) -> Result<HashMap<String, BaselineEntry>> {
        if !self.reachable {
            return Err(ChartError::Connection("inventory unreachable".into()));
        }
        Ok(groups
            .iter()
            .filter_map(|g| self.entries.get(g).map(|e| (g.clone(), *e)))
            .collect())
    }
}

/// Collects formatted log output for assertions.
#[derive(Clone, Default)]
pub struct LogBuffer(Arc<Mutex<Vec<u8>>>);

impl LogBuffer {
    /// Installs a thread-local subscriber writing into this buffer.
    pub fn install(&self) -> tracing::subscriber::DefaultGuard {
        let buffer = self.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::INFO)
            .with_ansi(false)
            .with_writer(move || buffer.clone())
            .finish();
        tracing::subscriber::set_default(subscriber)
    }

    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
    }
}

impl std::io::Write for LogBuffer {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}
