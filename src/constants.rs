/// Dataset category constants to ensure consistency across the codebase
/// These are the names used for tabs, dataset files and CLI arguments

pub const VOLCANO: &str = "volcano";
pub const TSUNAMI: &str = "tsunami";
pub const EARTHQUAKE: &str = "earthquake";

/// Suffix appended to the category name to build the dataset file name
pub const DATA_FILE_SUFFIX: &str = "_data.csv";

/// Name of the profile used when neither the CLI nor the config file picks one
pub const DEFAULT_PROFILE: &str = "revised";

/// Records kept per year in Top-K earthquake ranking unless configured otherwise
pub const DEFAULT_TOP_K: usize = 5;

/// Default page size for paged queries
pub const DEFAULT_PAGE_SIZE: usize = 10;

/// Build the conventional dataset file name for a category, e.g. `volcano_data.csv`
pub fn data_file_name(category: &str) -> String {
    format!("{}{}", category, DATA_FILE_SUFFIX)
}

/// Get all supported category names
pub fn get_supported_categories() -> Vec<&'static str> {
    vec![VOLCANO, TSUNAMI, EARTHQUAKE]
}
