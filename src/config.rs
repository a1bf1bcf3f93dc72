use crate::error::{ChartError, Result};
use chrono::{DateTime, Local};
use serde::Deserialize;
use std::collections::HashSet;
use std::path::PathBuf;

/// Placeholder in output paths, replaced once with the run start time.
pub const DATE_TOKEN: &str = "{{date}}";
/// Format used for the run start time in paths and captions.
pub const DATE_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub cluster: ClusterConfig,
    pub sampling: SamplingConfig,
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ClusterConfig {
    /// Empty string means all namespaces.
    #[serde(default)]
    pub namespace: String,
    pub kubeconfig: Option<PathBuf>,
    #[serde(default = "default_kubectl")]
    pub kubectl: String,
    /// Deployment label whose value names a group.
    #[serde(default = "default_group_label")]
    pub group_label: String,
}

impl Default for ClusterConfig {
    fn default() -> Self {
        Self {
            namespace: String::new(),
            kubeconfig: None,
            kubectl: default_kubectl(),
            group_label: default_group_label(),
        }
    }
}

fn default_kubectl() -> String {
    "kubectl".into()
}

fn default_group_label() -> String {
    "app.kubernetes.io/name".into()
}

#[derive(Debug, Clone, Deserialize)]
pub struct SamplingConfig {
    pub interval_secs: u64,
    pub groups: Vec<String>,
    /// Absent or negative runs until interrupted.
    pub max_ticks: Option<i64>,
    /// Upper bound on each collaborator call. None waits indefinitely.
    pub timeout_secs: Option<u64>,
}

impl SamplingConfig {
    pub fn tick_limit(&self) -> Option<u64> {
        self.max_ticks.and_then(|n| u64::try_from(n).ok())
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    pub html_path: String,
    pub snapshot_path: String,
    #[serde(default)]
    pub layout: ReportLayout,
}

/// Which chart views the visual report carries per resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportLayout {
    /// Separate absolute and percentage-of-request charts.
    #[default]
    Split,
    /// One chart per resource; the caption carries both views.
    Combined,
}

impl std::str::FromStr for ReportLayout {
    type Err = ChartError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "split" => Ok(Self::Split),
            "combined" => Ok(Self::Combined),
            other => Err(ChartError::Config(format!(
                "layout must be \"split\" or \"combined\", got {other:?}"
            ))),
        }
    }
}

impl AppConfig {
    pub fn load() -> Result<Self> {
        let path = std::env::var("CONFIG_FILE").unwrap_or_else(|_| "config.toml".into());
        let s = std::fs::read_to_string(&path)
            .map_err(|e| ChartError::Config(format!("cannot read {path}: {e}")))?;
        Self::load_from_str(&s)
    }

    /// Parse and validate config from a string (e.g. for tests).
    pub fn load_from_str(s: &str) -> Result<Self> {
        let config: AppConfig =
            toml::from_str(s).map_err(|e| ChartError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        ensure(
            self.sampling.interval_secs > 0,
            "sampling.interval_secs must be > 0, got 0",
        )?;
        ensure(
            !self.sampling.groups.is_empty(),
            "sampling.groups must list at least one group",
        )?;
        ensure(
            self.sampling.groups.iter().all(|g| !g.trim().is_empty()),
            "sampling.groups must not contain empty names",
        )?;
        let mut seen = HashSet::new();
        for group in &self.sampling.groups {
            ensure(
                seen.insert(group.as_str()),
                &format!("sampling.groups lists {group:?} more than once"),
            )?;
        }
        ensure(
            self.sampling.max_ticks != Some(0),
            "sampling.max_ticks must be positive, or negative/absent for unbounded",
        )?;
        ensure(
            self.sampling.timeout_secs != Some(0),
            "sampling.timeout_secs must be > 0 when set",
        )?;
        ensure(
            !self.output.html_path.is_empty(),
            "output.html_path must be non-empty",
        )?;
        ensure(
            !self.output.snapshot_path.is_empty(),
            "output.snapshot_path must be non-empty",
        )?;
        ensure(
            !self.cluster.kubectl.is_empty(),
            "cluster.kubectl must be non-empty",
        )?;
        ensure(
            !self.cluster.group_label.is_empty(),
            "cluster.group_label must be non-empty",
        )?;
        Ok(())
    }
}

fn ensure(cond: bool, msg: &str) -> Result<()> {
    if cond {
        Ok(())
    } else {
        Err(ChartError::Config(msg.to_string()))
    }
}

/// Substitutes the run start time into an output path template.
pub fn resolve_output_path(template: &str, start: &DateTime<Local>) -> PathBuf {
    let stamp = start.format(DATE_FORMAT).to_string();
    PathBuf::from(template.replace(DATE_TOKEN, &stamp))
}
