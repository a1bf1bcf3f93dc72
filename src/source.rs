// Seams to the cluster: per-tick metrics and the one-off request inventory.

use crate::error::Result;
use crate::models::{BaselineEntry, RawReading};
use std::collections::HashMap;
use std::future::Future;

pub trait MetricsSource {
    /// Current usage of every entity in scope. Failure is fatal to the run.
    fn sample(&self) -> impl Future<Output = Result<Vec<RawReading>>> + Send;
}

pub trait BaselineSource {
    /// Declared requests for the given groups. Groups missing from the inventory are absent.
    fn requests(
        &self,
        groups: &[String],
    ) -> impl Future<Output = Result<HashMap<String, BaselineEntry>>> + Send;
}
