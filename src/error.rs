use thiserror::Error;

#[derive(Error, Debug)]
pub enum HazardError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("CSV parsing failed: {0}")]
    Csv(#[from] csv::Error),

    #[error("TOML deserialization failed: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Unknown dataset category: {0}")]
    UnknownCategory(String),

    #[error("Failed to fetch {category} dataset: {message}")]
    Fetch { category: String, message: String },
}

/// Why a single raw row was dropped during normalization.
///
/// Rejections are logged and counted, never surfaced to the caller.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RowRejection {
    #[error("no year could be derived from the row")]
    MissingYear,

    #[error("unparseable year value '{raw}'")]
    InvalidYear { raw: String },
}

pub type Result<T> = std::result::Result<T, HazardError>;
