// Library for the binaries and tests

pub mod baseline;
pub mod config;
pub mod error;
pub mod kube_repo;
pub mod models;
pub mod reducer;
pub mod report;
pub mod series_store;
pub mod source;
pub mod stats;
pub mod version;
pub mod worker;

pub use error::{ChartError, Result};
