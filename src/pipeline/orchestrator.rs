use tracing::{error, info, instrument, warn};

use crate::config::DeploymentProfile;
use crate::domain::{Category, DisasterRecord, RecordSet};
use crate::observability::metrics;
use crate::pipeline::processing::normalize::NormalizationRegistry;
use crate::pipeline::processing::parser::{self, RawRow};
use crate::pipeline::processing::rank;

/// Runs raw rows of one category through normalization, the year window and
/// ranking. Pure with respect to its inputs: the same rows, category and
/// profile always give the same output.
pub struct Pipeline {
    registry: NormalizationRegistry,
    profile: DeploymentProfile,
}

impl Pipeline {
    pub fn new(profile: DeploymentProfile) -> Self {
        Self::with_registry(profile, NormalizationRegistry::new())
    }

    pub fn with_registry(profile: DeploymentProfile, registry: NormalizationRegistry) -> Self {
        Self { registry, profile }
    }

    pub fn profile(&self) -> &DeploymentProfile {
        &self.profile
    }

    /// Normalize rows for a category given by name. Unknown names yield an
    /// empty sequence and a warning.
    #[instrument(skip(self, rows), fields(profile = %self.profile.name, rows = rows.len()))]
    pub fn normalize_rows(&self, rows: &[RawRow], category: &str) -> Vec<DisasterRecord> {
        match category.parse::<Category>() {
            Ok(category) => self.normalize_category(rows, category).records,
            Err(e) => {
                warn!("{}; returning no records", e);
                metrics::normalize::unknown_category();
                Vec::new()
            }
        }
    }

    /// Normalize rows for a known category into a record set
    pub fn normalize_category(&self, rows: &[RawRow], category: Category) -> RecordSet {
        let label = category.as_str();
        let Some(normalizer) = self.registry.get_normalizer(category) else {
            warn!(category = label, "no normalizer registered; returning no records");
            return RecordSet::empty(category);
        };

        metrics::normalize::rows_read(label, rows.len());

        let mut normalized = Vec::with_capacity(rows.len());
        for (index, row) in rows.iter().enumerate() {
            match normalizer.normalize(row) {
                Ok(record) => normalized.push(record),
                Err(rejection) => {
                    warn!(category = label, row = index, "dropping row: {}", rejection);
                    metrics::normalize::row_rejected(label);
                }
            }
        }

        let profile = self.profile.for_category(category);
        let (records, out_of_window) = rank::filter_and_rank(normalized, profile);
        metrics::normalize::rows_out_of_window(label, out_of_window);

        let set = RecordSet::new(category, records);
        let (with_coordinates, total) = set.coordinate_summary();
        metrics::normalize::records_emitted(label, total, with_coordinates);
        info!(
            category = label,
            input_rows = rows.len(),
            out_of_window,
            "{}/{} records with valid coordinates",
            with_coordinates,
            total
        );

        set
    }

    /// Parse delimited text and normalize it. A parse failure is logged and
    /// yields an empty sequence.
    #[instrument(skip(self, text), fields(profile = %self.profile.name, bytes = text.as_ref().len()))]
    pub fn normalize_text(&self, text: impl AsRef<[u8]>, category: &str) -> Vec<DisasterRecord> {
        match category.parse::<Category>() {
            Ok(category) => self.normalize_text_for(text, category).records,
            Err(e) => {
                warn!("{}; returning no records", e);
                metrics::normalize::unknown_category();
                Vec::new()
            }
        }
    }

    pub fn normalize_text_for(&self, text: impl AsRef<[u8]>, category: Category) -> RecordSet {
        match parser::parse_csv(text) {
            Ok(rows) => self.normalize_category(&rows, category),
            Err(e) => {
                error!(category = category.as_str(), "failed to parse dataset: {}", e);
                RecordSet::empty(category)
            }
        }
    }
}

/// One-shot form of [`Pipeline::normalize_rows`]
pub fn normalize(rows: &[RawRow], category: &str, profile: &DeploymentProfile) -> Vec<DisasterRecord> {
    Pipeline::new(profile.clone()).normalize_rows(rows, category)
}
