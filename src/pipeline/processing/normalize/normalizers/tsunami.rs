use crate::domain::{Category, DisasterRecord, HazardDetails, TsunamiDetails};
use crate::error::RowRejection;
use crate::pipeline::processing::coerce;
use crate::pipeline::processing::normalize::{CategoryNormalizer, NormalizerUtils};
use crate::pipeline::processing::parser::RawRow;

/// Normalizer for tsunami rows. Source headers are upper case
/// (`YEAR`, `LATITUDE`, `EQ_MAGNITUDE`, ...).
#[derive(Debug, Default)]
pub struct TsunamiNormalizer;

impl TsunamiNormalizer {
    pub fn new() -> Self {
        Self
    }
}

impl CategoryNormalizer for TsunamiNormalizer {
    fn normalize(&self, row: &RawRow) -> Result<DisasterRecord, RowRejection> {
        let schema = self.schema();
        let date = NormalizerUtils::extract_date(row, schema)?;

        let details = TsunamiDetails {
            month: date.month,
            day: date.day,
            region: coerce::text_or_null(row.first_of(&["REGION"])),
            cause: coerce::text_or_null(row.first_of(&["CAUSE", "CAUSE_CODE"])),
            magnitude: coerce::parse_float_or_null(row.first_of(&["EQ_MAGNITUDE", "MAGNITUDE"])),
            depth: coerce::parse_float_or_null(row.first_of(&["EQ_DEPTH", "DEPTH"])),
            intensity: coerce::parse_float_or_null(row.first_of(&["TS_INTENSITY", "INTENSITY"])),
            damage_description: coerce::text_or_null(
                row.first_of(&["DAMAGE_DESCRIPTION", "DAMAGE_TOTAL_DESCRIPTION"]),
            ),
            deaths_description: coerce::text_or_null(
                row.first_of(&["DEATHS_DESCRIPTION", "DEATHS_TOTAL_DESCRIPTION"]),
            ),
            max_water_height: coerce::parse_float_or_null(
                row.first_of(&["MAXIMUM_WATER_HEIGHT", "MAX_WATER_HEIGHT"]),
            ),
            num_runups: coerce::parse_int_or_null(row.first_of(&["NUMBER_OF_RUNUPS", "NUM_RUNUPS"])),
        };

        Ok(DisasterRecord {
            common: NormalizerUtils::extract_common(row, schema, date.year),
            details: HazardDetails::Tsunami(details),
        })
    }

    fn category(&self) -> Category {
        Category::Tsunami
    }

    fn name(&self) -> &str {
        "Tsunami Normalizer"
    }
}
