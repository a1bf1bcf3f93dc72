// Domain models: raw per-entity readings, per-tick group aggregates, and accumulated series.

mod reading;
mod series;

pub use reading::{RawReading, TickAggregate};
pub use series::{BaselineEntry, Series};
