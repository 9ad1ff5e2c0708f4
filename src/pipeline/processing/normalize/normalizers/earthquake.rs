use crate::domain::{Category, DisasterRecord, EarthquakeDetails, HazardDetails};
use crate::error::RowRejection;
use crate::pipeline::processing::coerce;
use crate::pipeline::processing::normalize::{CategoryNormalizer, NormalizerUtils};
use crate::pipeline::processing::parser::RawRow;

/// Normalizer for earthquake rows.
///
/// The year comes from the fallback chain (`date_time`, then `time`/`date`,
/// then `year`). The `tsunami` column uses `"1"` as its only truthy value.
#[derive(Debug, Default)]
pub struct EarthquakeNormalizer;

impl EarthquakeNormalizer {
    pub fn new() -> Self {
        Self
    }
}

impl CategoryNormalizer for EarthquakeNormalizer {
    fn normalize(&self, row: &RawRow) -> Result<DisasterRecord, RowRejection> {
        let schema = self.schema();
        let date = NormalizerUtils::extract_date(row, schema)?;

        let details = EarthquakeDetails {
            month: date.month,
            day: date.day,
            magnitude: coerce::parse_float_or_null(row.first_of(&["magnitude", "mag", "eq_magnitude"])),
            depth: coerce::parse_float_or_null(row.first_of(&["depth", "eq_depth"])),
            tsunami_flag: coerce::parse_flag(row.get("tsunami")),
            alert_level: coerce::text_or_null(row.first_of(&["alert", "alert_level"])),
        };

        Ok(DisasterRecord {
            common: NormalizerUtils::extract_common(row, schema, date.year),
            details: HazardDetails::Earthquake(details),
        })
    }

    fn category(&self) -> Category {
        Category::Earthquake
    }

    fn name(&self) -> &str {
        "Earthquake Normalizer"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn details(record: &DisasterRecord) -> &EarthquakeDetails {
        match &record.details {
            HazardDetails::Earthquake(d) => d,
            other => panic!("expected earthquake details, got {:?}", other),
        }
    }

    #[test]
    fn test_normalize_earthquake_row() {
        let row = RawRow::from_pairs([
            ("title", "M 7.0 - 18 km SW of Malango"),
            ("magnitude", "7"),
            ("date_time", "22-11-2022 02:03"),
            ("alert", "green"),
            ("tsunami", "1"),
            ("depth", "14"),
            ("latitude", "-9.7963"),
            ("longitude", "159.596"),
            ("location", "Malango, Solomon Islands"),
            ("country", "Solomon Islands"),
        ]);

        let record = EarthquakeNormalizer::new().normalize(&row).unwrap();
        assert_eq!(record.year(), 2022);
        assert_eq!(record.magnitude(), Some(7.0));
        assert_eq!(record.common.country.as_deref(), Some("Solomon Islands"));

        let d = details(&record);
        assert!(d.tsunami_flag);
        assert_eq!(d.alert_level.as_deref(), Some("green"));
        assert_eq!(d.depth, Some(14.0));
        assert_eq!(d.month, Some(11));
        assert_eq!(d.day, Some(22));
    }

    #[test]
    fn test_year_falls_back_to_time_then_year() {
        let by_time = RawRow::from_pairs([("time", "2011-03-11T05:46:24.120Z"), ("mag", "9.1")]);
        let record = EarthquakeNormalizer::new().normalize(&by_time).unwrap();
        assert_eq!(record.year(), 2011);

        let by_year = RawRow::from_pairs([("date_time", ""), ("year", "1999"), ("tsunami", "0")]);
        let record = EarthquakeNormalizer::new().normalize(&by_year).unwrap();
        assert_eq!(record.year(), 1999);
        assert!(!details(&record).tsunami_flag);
    }

    #[test]
    fn test_half_coordinates_are_dropped() {
        let row = RawRow::from_pairs([
            ("year", "2001"),
            ("latitude", "abc"),
            ("longitude", "20.2"),
        ]);
        let record = EarthquakeNormalizer::new().normalize(&row).unwrap();
        assert_eq!(record.common.latitude(), None);
        assert_eq!(record.common.longitude(), None);
    }

    #[test]
    fn test_no_date_at_all_is_rejected() {
        let row = RawRow::from_pairs([("magnitude", "6.0")]);
        assert_eq!(
            EarthquakeNormalizer::new().normalize(&row),
            Err(RowRejection::MissingYear)
        );
    }
}
