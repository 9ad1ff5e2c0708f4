//! Canonical record shapes shared by the pipeline, the query helpers and any
//! renderer that consumes a normalized dataset.

use chrono::NaiveDate;
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

use crate::constants;
use crate::error::HazardError;

/// The dataset categories the viewer can switch between
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Volcano,
    Tsunami,
    Earthquake,
}

impl Category {
    pub const ALL: [Category; 3] = [Category::Volcano, Category::Tsunami, Category::Earthquake];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Volcano => constants::VOLCANO,
            Category::Tsunami => constants::TSUNAMI,
            Category::Earthquake => constants::EARTHQUAKE,
        }
    }

    /// Conventional dataset file name, e.g. `tsunami_data.csv`
    pub fn data_file_name(&self) -> String {
        constants::data_file_name(self.as_str())
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = HazardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            constants::VOLCANO => Ok(Category::Volcano),
            constants::TSUNAMI => Ok(Category::Tsunami),
            constants::EARTHQUAKE => Ok(Category::Earthquake),
            _ => Err(HazardError::UnknownCategory(s.to_string())),
        }
    }
}

/// A validated map position. Both components are finite and inside the
/// usual WGS84 bounds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoPoint {
    latitude: f64,
    longitude: f64,
}

impl GeoPoint {
    pub fn new(latitude: f64, longitude: f64) -> Option<Self> {
        let lat_ok = latitude.is_finite() && (-90.0..=90.0).contains(&latitude);
        let lon_ok = longitude.is_finite() && (-180.0..=180.0).contains(&longitude);
        if lat_ok && lon_ok {
            Some(Self { latitude, longitude })
        } else {
            None
        }
    }

    pub fn latitude(&self) -> f64 {
        self.latitude
    }

    pub fn longitude(&self) -> f64 {
        self.longitude
    }
}

/// Fields every category carries.
///
/// Coordinates can only be set through a [`GeoPoint`], so a record either has
/// both latitude and longitude or neither.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CommonFields {
    pub year: i32,
    latitude: Option<f64>,
    longitude: Option<f64>,
    pub location: Option<String>,
    pub country: Option<String>,
}

impl CommonFields {
    pub fn new(
        year: i32,
        coordinates: Option<GeoPoint>,
        location: Option<String>,
        country: Option<String>,
    ) -> Self {
        Self {
            year,
            latitude: coordinates.map(|p| p.latitude),
            longitude: coordinates.map(|p| p.longitude),
            location,
            country,
        }
    }

    pub fn latitude(&self) -> Option<f64> {
        self.latitude
    }

    pub fn longitude(&self) -> Option<f64> {
        self.longitude
    }

    pub fn coordinates(&self) -> Option<GeoPoint> {
        match (self.latitude, self.longitude) {
            (Some(lat), Some(lon)) => GeoPoint::new(lat, lon),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VolcanoDetails {
    pub month: Option<u32>,
    pub day: Option<u32>,
    pub name: Option<String>,
    #[serde(rename = "type")]
    pub volcano_type: Option<String>,
    pub vei: Option<i32>,
    pub elevation: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TsunamiDetails {
    pub month: Option<u32>,
    pub day: Option<u32>,
    pub region: Option<String>,
    pub cause: Option<String>,
    pub magnitude: Option<f64>,
    pub depth: Option<f64>,
    pub intensity: Option<f64>,
    pub damage_description: Option<String>,
    pub deaths_description: Option<String>,
    pub max_water_height: Option<f64>,
    pub num_runups: Option<i64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EarthquakeDetails {
    pub month: Option<u32>,
    pub day: Option<u32>,
    pub magnitude: Option<f64>,
    pub depth: Option<f64>,
    pub tsunami_flag: bool,
    pub alert_level: Option<String>,
}

/// Category-specific part of a record
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "category", rename_all = "lowercase")]
pub enum HazardDetails {
    Volcano(VolcanoDetails),
    Tsunami(TsunamiDetails),
    Earthquake(EarthquakeDetails),
}

/// The canonical, category-tagged record handed to renderers
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DisasterRecord {
    #[serde(flatten)]
    pub common: CommonFields,
    #[serde(flatten)]
    pub details: HazardDetails,
}

impl DisasterRecord {
    pub fn category(&self) -> Category {
        match self.details {
            HazardDetails::Volcano(_) => Category::Volcano,
            HazardDetails::Tsunami(_) => Category::Tsunami,
            HazardDetails::Earthquake(_) => Category::Earthquake,
        }
    }

    pub fn year(&self) -> i32 {
        self.common.year
    }

    /// Magnitude for categories that report one
    pub fn magnitude(&self) -> Option<f64> {
        match &self.details {
            HazardDetails::Earthquake(d) => d.magnitude,
            HazardDetails::Tsunami(d) => d.magnitude,
            HazardDetails::Volcano(_) => None,
        }
    }

    /// Magnitude used for ordering; missing counts as 0
    pub fn ranking_magnitude(&self) -> f64 {
        self.magnitude().unwrap_or(0.0)
    }

    pub fn vei(&self) -> Option<i32> {
        match &self.details {
            HazardDetails::Volcano(d) => d.vei,
            _ => None,
        }
    }

    /// Calendar date, when month and day are known and form a real date
    pub fn date(&self) -> Option<NaiveDate> {
        let (month, day) = match &self.details {
            HazardDetails::Volcano(d) => (d.month, d.day),
            HazardDetails::Tsunami(d) => (d.month, d.day),
            HazardDetails::Earthquake(d) => (d.month, d.day),
        };
        NaiveDate::from_ymd_opt(self.common.year, month?, day?)
    }

    pub fn elevation(&self) -> Option<f64> {
        match &self.details {
            HazardDetails::Volcano(d) => d.elevation,
            _ => None,
        }
    }

    pub fn max_water_height(&self) -> Option<f64> {
        match &self.details {
            HazardDetails::Tsunami(d) => d.max_water_height,
            _ => None,
        }
    }

    pub fn num_runups(&self) -> Option<i64> {
        match &self.details {
            HazardDetails::Tsunami(d) => d.num_runups,
            _ => None,
        }
    }

    /// Whether the record can be placed on the map
    pub fn has_coordinates(&self) -> bool {
        self.common.coordinates().is_some()
    }
}

/// One normalized dataset load. Immutable once built; a new load replaces it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecordSet {
    pub category: Category,
    pub records: Vec<DisasterRecord>,
}

impl RecordSet {
    pub fn new(category: Category, records: Vec<DisasterRecord>) -> Self {
        Self { category, records }
    }

    pub fn empty(category: Category) -> Self {
        Self::new(category, Vec::new())
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Records that carry coordinates and can be placed as map markers
    pub fn mappable(&self) -> impl Iterator<Item = &DisasterRecord> {
        self.records.iter().filter(|r| r.has_coordinates())
    }

    /// (records with coordinates, total records)
    pub fn coordinate_summary(&self) -> (usize, usize) {
        (self.mappable().count(), self.records.len())
    }
}
