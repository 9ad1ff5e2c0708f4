// Data processing pipeline: fetch boundary, processing stages and orchestration

pub mod loader;
pub mod orchestrator;
pub mod processing;

// Re-export key types and functions from each stage
pub use loader::{DatasetLoader, DatasetSource, FsDatasetSource, HttpDatasetSource, LoadOutcome};
pub use orchestrator::{normalize, Pipeline};
pub use processing::parser::{self, RawRow};
