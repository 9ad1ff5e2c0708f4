//! Row normalization: one strategy per dataset category, selected through
//! [`registry::NormalizationRegistry`].
//!
//! Each category is described by a [`CategorySchema`]: which header aliases
//! hold the shared fields and how the year is derived. The per-category
//! normalizers only add their descriptive fields on top.

pub mod normalizers;
pub mod registry;

pub use registry::NormalizationRegistry;

use crate::domain::{Category, CommonFields, DisasterRecord};
use crate::error::RowRejection;
use crate::pipeline::processing::coerce::{self, DateFields, ParsedDate};
use crate::pipeline::processing::parser::RawRow;

/// How the year of a row is found
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum YearStrategy {
    /// Integer parse of the year column
    DirectField,
    /// Composite date-time, then a timestamp column, then the year column
    FallbackChain,
}

/// Header aliases for the fields every category shares.
///
/// Lookups go through [`RawRow::first_of`], so aliases are matched after
/// case and punctuation folding.
#[derive(Debug, Clone, Copy)]
pub struct HeaderSchema {
    pub year: &'static [&'static str],
    pub date_time: &'static [&'static str],
    pub timestamp: &'static [&'static str],
    pub month: &'static [&'static str],
    pub day: &'static [&'static str],
    pub latitude: &'static [&'static str],
    pub longitude: &'static [&'static str],
    pub location: &'static [&'static str],
    pub country: &'static [&'static str],
}

#[derive(Debug, Clone, Copy)]
pub struct CategorySchema {
    pub category: Category,
    pub year_strategy: YearStrategy,
    pub headers: HeaderSchema,
}

const VOLCANO_SCHEMA: CategorySchema = CategorySchema {
    category: Category::Volcano,
    year_strategy: YearStrategy::DirectField,
    headers: HeaderSchema {
        year: &["Year"],
        date_time: &[],
        timestamp: &[],
        month: &["Month", "Mo"],
        day: &["Day", "Dy"],
        latitude: &["Latitude"],
        longitude: &["Longitude"],
        location: &["Location", "Location_Name"],
        country: &["Country"],
    },
};

const TSUNAMI_SCHEMA: CategorySchema = CategorySchema {
    category: Category::Tsunami,
    year_strategy: YearStrategy::DirectField,
    headers: HeaderSchema {
        year: &["YEAR"],
        date_time: &[],
        timestamp: &[],
        month: &["MONTH", "MO"],
        day: &["DAY", "DY"],
        latitude: &["LATITUDE"],
        longitude: &["LONGITUDE"],
        location: &["LOCATION_NAME", "LOCATION"],
        country: &["COUNTRY"],
    },
};

const EARTHQUAKE_SCHEMA: CategorySchema = CategorySchema {
    category: Category::Earthquake,
    year_strategy: YearStrategy::FallbackChain,
    headers: HeaderSchema {
        year: &["year"],
        date_time: &["date_time"],
        timestamp: &["time", "date"],
        month: &["month"],
        day: &["day"],
        latitude: &["latitude"],
        longitude: &["longitude"],
        location: &["location", "place", "location_name"],
        country: &["country"],
    },
};

/// The schema table, one entry per category
pub fn schema_for(category: Category) -> &'static CategorySchema {
    match category {
        Category::Volcano => &VOLCANO_SCHEMA,
        Category::Tsunami => &TSUNAMI_SCHEMA,
        Category::Earthquake => &EARTHQUAKE_SCHEMA,
    }
}

/// Trait for turning one raw row of a category into a canonical record
pub trait CategoryNormalizer: Send + Sync {
    /// Normalize a row, or explain why it has to be dropped
    fn normalize(&self, row: &RawRow) -> Result<DisasterRecord, RowRejection>;

    fn category(&self) -> Category;

    fn schema(&self) -> &'static CategorySchema {
        schema_for(self.category())
    }

    fn name(&self) -> &str;
}

/// Shared extraction steps used by every category normalizer
pub struct NormalizerUtils;

impl NormalizerUtils {
    /// Derive the date of a row following the schema's year strategy
    pub fn extract_date(row: &RawRow, schema: &CategorySchema) -> Result<ParsedDate, RowRejection> {
        let h = &schema.headers;
        let year_raw = row.first_of(h.year);

        let parsed = match schema.year_strategy {
            YearStrategy::DirectField => coerce::parse_year_field(year_raw).map(|year| ParsedDate {
                year,
                month: Self::calendar_part(row.first_of(h.month), 12),
                day: Self::calendar_part(row.first_of(h.day), 31),
            }),
            YearStrategy::FallbackChain => {
                let fields = DateFields {
                    date_time: row.first_of(h.date_time),
                    timestamp: row.first_of(h.timestamp),
                    year: year_raw,
                };
                coerce::parse_date(&fields).map(|mut date| {
                    // a bare year column may still come with month/day columns
                    if date.month.is_none() {
                        date.month = Self::calendar_part(row.first_of(h.month), 12);
                        date.day = Self::calendar_part(row.first_of(h.day), 31);
                    }
                    date
                })
            }
        };

        parsed.ok_or_else(|| {
            let raw = row
                .first_of(h.date_time)
                .or_else(|| row.first_of(h.timestamp))
                .or(year_raw);
            match raw {
                Some(raw) => RowRejection::InvalidYear { raw: raw.to_string() },
                None => RowRejection::MissingYear,
            }
        })
    }

    /// Year, coordinates, location and country
    pub fn extract_common(row: &RawRow, schema: &CategorySchema, year: i32) -> CommonFields {
        let h = &schema.headers;
        CommonFields::new(
            year,
            coerce::parse_coordinates(row.first_of(h.latitude), row.first_of(h.longitude)),
            coerce::text_or_null(row.first_of(h.location)),
            coerce::text_or_null(row.first_of(h.country)),
        )
    }

    fn calendar_part(raw: Option<&str>, max: i64) -> Option<u32> {
        coerce::parse_int_or_null(raw)
            .filter(|v| (1..=max).contains(v))
            .map(|v| v as u32)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schema_table_covers_every_category() {
        for category in Category::ALL {
            assert_eq!(schema_for(category).category, category);
        }
        assert_eq!(schema_for(Category::Earthquake).year_strategy, YearStrategy::FallbackChain);
        assert_eq!(schema_for(Category::Volcano).year_strategy, YearStrategy::DirectField);
    }

    #[test]
    fn test_extract_date_direct_field() {
        let row = RawRow::from_pairs([("Year", "1985"), ("Month", "11"), ("Day", "13")]);
        let date = NormalizerUtils::extract_date(&row, schema_for(Category::Volcano)).unwrap();
        assert_eq!(date.year, 1985);
        assert_eq!(date.month, Some(11));
        assert_eq!(date.day, Some(13));

        let bad_month = RawRow::from_pairs([("Year", "1985"), ("Month", "13")]);
        let date = NormalizerUtils::extract_date(&bad_month, schema_for(Category::Volcano)).unwrap();
        assert_eq!(date.month, None);
    }

    #[test]
    fn test_extract_date_rejections() {
        let missing = RawRow::from_pairs([("Latitude", "1.0")]);
        assert_eq!(
            NormalizerUtils::extract_date(&missing, schema_for(Category::Tsunami)),
            Err(RowRejection::MissingYear)
        );

        let garbage = RawRow::from_pairs([("YEAR", "unknown")]);
        assert_eq!(
            NormalizerUtils::extract_date(&garbage, schema_for(Category::Tsunami)),
            Err(RowRejection::InvalidYear { raw: "unknown".to_string() })
        );

        let chain_garbage = RawRow::from_pairs([("date_time", "someday"), ("year", "")]);
        assert_eq!(
            NormalizerUtils::extract_date(&chain_garbage, schema_for(Category::Earthquake)),
            Err(RowRejection::InvalidYear { raw: "someday".to_string() })
        );
    }

    #[test]
    fn test_extract_common_drops_half_coordinates() {
        let row = RawRow::from_pairs([
            ("latitude", "abc"),
            ("longitude", "20.5"),
            ("location", "Off the coast"),
            ("country", ""),
        ]);
        let common = NormalizerUtils::extract_common(&row, schema_for(Category::Earthquake), 2001);
        assert_eq!(common.latitude(), None);
        assert_eq!(common.longitude(), None);
        assert_eq!(common.location.as_deref(), Some("Off the coast"));
        assert_eq!(common.country, None);
    }
}
