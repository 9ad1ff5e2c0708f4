//! Ingestion and normalization pipeline for historical natural-disaster
//! datasets (volcanic eruptions, tsunamis, earthquakes).
//!
//! Raw per-category CSV text goes in; an ordered, immutable [`domain::RecordSet`]
//! of canonical records comes out, ready for any map or table renderer.

pub mod config;
pub mod constants;
pub mod domain;
pub mod error;
pub mod observability;
pub mod pipeline;
pub mod query;

pub use config::{CategoryProfile, Config, DeploymentProfile, RankingMode, YearWindow};
pub use domain::{Category, DisasterRecord, RecordSet};
pub use error::{HazardError, Result};
pub use pipeline::{normalize, DatasetLoader, Pipeline};
