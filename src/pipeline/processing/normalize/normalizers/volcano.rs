use crate::domain::{Category, DisasterRecord, HazardDetails, VolcanoDetails};
use crate::error::RowRejection;
use crate::pipeline::processing::coerce;
use crate::pipeline::processing::normalize::{CategoryNormalizer, NormalizerUtils};
use crate::pipeline::processing::parser::RawRow;

/// Normalizer for volcanic eruption rows (`Year`, `Latitude`, `VEI`, ...)
#[derive(Debug, Default)]
pub struct VolcanoNormalizer;

impl VolcanoNormalizer {
    pub fn new() -> Self {
        Self
    }
}

impl CategoryNormalizer for VolcanoNormalizer {
    fn normalize(&self, row: &RawRow) -> Result<DisasterRecord, RowRejection> {
        let schema = self.schema();
        let date = NormalizerUtils::extract_date(row, schema)?;

        let details = VolcanoDetails {
            month: date.month,
            day: date.day,
            name: coerce::text_or_null(row.first_of(&["Name", "Volcano_Name"])),
            volcano_type: coerce::text_or_null(row.first_of(&["Type"])),
            vei: coerce::parse_int_or_null(row.first_of(&["VEI"]))
                .and_then(|v| i32::try_from(v).ok()),
            elevation: coerce::parse_float_or_null(row.first_of(&["Elevation", "Elevation_m"])),
        };

        Ok(DisasterRecord {
            common: NormalizerUtils::extract_common(row, schema, date.year),
            details: HazardDetails::Volcano(details),
        })
    }

    fn category(&self) -> Category {
        Category::Volcano
    }

    fn name(&self) -> &str {
        "Volcano Normalizer"
    }
}
