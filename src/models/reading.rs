use serde::{Deserialize, Serialize};

/// One entity's usage at the current tick, in fixed-point sub-units.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawReading {
    pub entity_name: String,
    pub group: String,
    /// Milli-cores.
    pub cpu: i64,
    /// Mebibytes.
    pub mem: i64,
}

/// One group's readings for one tick, reduced.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickAggregate {
    pub matched_entity_count: u32,
    pub total_cpu: i64,
    pub total_mem: i64,
}

impl TickAggregate {
    pub fn is_empty(&self) -> bool {
        self.matched_entity_count == 0
    }

    /// Per-entity CPU (truncating). None for an empty aggregate.
    pub fn cpu_per_entity(&self) -> Option<i64> {
        (!self.is_empty()).then(|| self.total_cpu / i64::from(self.matched_entity_count))
    }

    /// Per-entity memory (truncating). None for an empty aggregate.
    pub fn mem_per_entity(&self) -> Option<i64> {
        (!self.is_empty()).then(|| self.total_mem / i64::from(self.matched_entity_count))
    }
}
