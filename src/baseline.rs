// Static group -> declared request table, resolved once before the first tick.

use crate::error::Result;
use crate::models::BaselineEntry;
use crate::source::BaselineSource;
use std::collections::HashMap;
use tracing::{info, warn};

#[derive(Debug, Clone, Default)]
pub struct BaselineTable {
    entries: HashMap<String, BaselineEntry>,
}

impl BaselineTable {
    /// Queries the inventory once. A group without an entry, or whose requests are all
    /// zero, keeps no baseline and its percentages are omitted for the whole run.
    pub async fn resolve<S: BaselineSource>(source: &S, groups: &[String]) -> Result<Self> {
        let found = source.requests(groups).await?;
        let mut entries = HashMap::with_capacity(groups.len());
        for group in groups {
            match found.get(group) {
                Some(entry) if entry.cpu().is_none() && entry.mem().is_none() => {
                    warn!(group = %group, "declared requests are zero; no baseline");
                }
                Some(entry) => {
                    if entry.cpu().is_none() || entry.mem().is_none() {
                        warn!(
                            group = %group,
                            cpu_request = entry.cpu_request,
                            mem_request = entry.mem_request,
                            "request is zero; matching percentages will be omitted"
                        );
                    }
                    info!(
                        group = %group,
                        cpu_request_m = entry.cpu_request,
                        mem_request_mi = entry.mem_request,
                        "baseline resolved"
                    );
                    entries.insert(group.clone(), *entry);
                }
                None => warn!(group = %group, "no baseline found; percentages will be omitted"),
            }
        }
        Ok(Self { entries })
    }

    pub fn from_entries(entries: HashMap<String, BaselineEntry>) -> Self {
        Self { entries }
    }

    pub fn get(&self, group: &str) -> Option<BaselineEntry> {
        self.entries.get(group).copied()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
