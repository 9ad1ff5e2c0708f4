//! Metrics for the hazard_map pipeline
//!
//! Everything is recorded through the `metrics` facade. The library installs
//! no recorder, so these calls are no-ops unless the embedding application
//! sets one up.

use std::fmt;

/// Enum representing all metric names used in the system
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MetricName {
    // Parser metrics
    ParserParseSuccess,
    ParserParseError,
    ParserDuration,
    ParserRowsExtracted,

    // Normalize metrics
    NormalizeRowsRead,
    NormalizeRowsRejected,
    NormalizeRowsOutOfWindow,
    NormalizeRecordsEmitted,
    NormalizeRecordsWithCoordinates,
    NormalizeUnknownCategory,

    // Loader metrics
    LoaderFetchError,
    LoaderResultsPublished,
    LoaderResultsStale,
}

impl fmt::Display for MetricName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl MetricName {
    pub fn as_str(&self) -> &'static str {
        match self {
            MetricName::ParserParseSuccess => "hazard_parser_parse_success_total",
            MetricName::ParserParseError => "hazard_parser_parse_error_total",
            MetricName::ParserDuration => "hazard_parser_duration_seconds",
            MetricName::ParserRowsExtracted => "hazard_parser_rows_extracted_total",

            MetricName::NormalizeRowsRead => "hazard_normalize_rows_read_total",
            MetricName::NormalizeRowsRejected => "hazard_normalize_rows_rejected_total",
            MetricName::NormalizeRowsOutOfWindow => "hazard_normalize_rows_out_of_window_total",
            MetricName::NormalizeRecordsEmitted => "hazard_normalize_records_emitted_total",
            MetricName::NormalizeRecordsWithCoordinates => {
                "hazard_normalize_records_with_coordinates_total"
            }
            MetricName::NormalizeUnknownCategory => "hazard_normalize_unknown_category_total",

            MetricName::LoaderFetchError => "hazard_loader_fetch_error_total",
            MetricName::LoaderResultsPublished => "hazard_loader_results_published_total",
            MetricName::LoaderResultsStale => "hazard_loader_results_stale_total",
        }
    }

    /// Get all metric names as an iterator
    pub fn all_metrics() -> impl Iterator<Item = MetricName> {
        use MetricName::*;
        [
            ParserParseSuccess,
            ParserParseError,
            ParserDuration,
            ParserRowsExtracted,
            NormalizeRowsRead,
            NormalizeRowsRejected,
            NormalizeRowsOutOfWindow,
            NormalizeRecordsEmitted,
            NormalizeRecordsWithCoordinates,
            NormalizeUnknownCategory,
            LoaderFetchError,
            LoaderResultsPublished,
            LoaderResultsStale,
        ]
        .into_iter()
    }

    /// Returns (phase, description, unit)
    pub fn metadata(&self) -> (&'static str, &'static str, Option<&'static str>) {
        match self {
            MetricName::ParserParseSuccess => ("parser", "Datasets parsed successfully", None),
            MetricName::ParserParseError => ("parser", "Datasets that failed to parse", None),
            MetricName::ParserDuration => ("parser", "Parse duration in seconds", Some("s")),
            MetricName::ParserRowsExtracted => ("parser", "Raw rows extracted", None),

            MetricName::NormalizeRowsRead => ("normalize", "Raw rows handed to a normalizer", None),
            MetricName::NormalizeRowsRejected => ("normalize", "Rows dropped for an unusable year", None),
            MetricName::NormalizeRowsOutOfWindow => ("normalize", "Rows outside the year window", None),
            MetricName::NormalizeRecordsEmitted => ("normalize", "Canonical records emitted", None),
            MetricName::NormalizeRecordsWithCoordinates => {
                ("normalize", "Emitted records that can be mapped", None)
            }
            MetricName::NormalizeUnknownCategory => ("normalize", "Requests for an unknown category", None),

            MetricName::LoaderFetchError => ("loader", "Dataset fetch or parse failures", None),
            MetricName::LoaderResultsPublished => ("loader", "Record sets handed to the presentation layer", None),
            MetricName::LoaderResultsStale => ("loader", "Superseded loads discarded", None),
        }
    }
}

// ============================================================================
// Parser Metrics
// ============================================================================

pub mod parser {
    use super::MetricName;

    pub fn parse_success() {
        ::metrics::counter!(MetricName::ParserParseSuccess.as_str()).increment(1);
    }

    pub fn parse_error() {
        ::metrics::counter!(MetricName::ParserParseError.as_str()).increment(1);
    }

    pub fn duration(secs: f64) {
        ::metrics::histogram!(MetricName::ParserDuration.as_str()).record(secs);
    }

    pub fn rows_extracted(count: u64) {
        ::metrics::counter!(MetricName::ParserRowsExtracted.as_str()).increment(count);
    }
}

// ============================================================================
// Normalize Metrics
// ============================================================================

pub mod normalize {
    use super::MetricName;

    pub fn rows_read(category: &'static str, count: usize) {
        ::metrics::counter!(MetricName::NormalizeRowsRead.as_str(), "category" => category)
            .increment(count as u64);
    }

    pub fn row_rejected(category: &'static str) {
        ::metrics::counter!(MetricName::NormalizeRowsRejected.as_str(), "category" => category)
            .increment(1);
    }

    pub fn rows_out_of_window(category: &'static str, count: usize) {
        ::metrics::counter!(MetricName::NormalizeRowsOutOfWindow.as_str(), "category" => category)
            .increment(count as u64);
    }

    pub fn records_emitted(category: &'static str, total: usize, with_coordinates: usize) {
        ::metrics::counter!(MetricName::NormalizeRecordsEmitted.as_str(), "category" => category)
            .increment(total as u64);
        ::metrics::counter!(
            MetricName::NormalizeRecordsWithCoordinates.as_str(),
            "category" => category
        )
        .increment(with_coordinates as u64);
    }

    pub fn unknown_category() {
        ::metrics::counter!(MetricName::NormalizeUnknownCategory.as_str()).increment(1);
    }
}

// ============================================================================
// Loader Metrics
// ============================================================================

pub mod loader {
    use super::MetricName;

    pub fn fetch_error(category: &'static str) {
        ::metrics::counter!(MetricName::LoaderFetchError.as_str(), "category" => category)
            .increment(1);
    }

    pub fn published(category: &'static str) {
        ::metrics::counter!(MetricName::LoaderResultsPublished.as_str(), "category" => category)
            .increment(1);
    }

    pub fn stale(category: &'static str) {
        ::metrics::counter!(MetricName::LoaderResultsStale.as_str(), "category" => category)
            .increment(1);
    }
}
