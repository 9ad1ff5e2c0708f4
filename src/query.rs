//! Read-side helpers over a normalized record set: search criteria, paging
//! and per-year aggregation for charts.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::constants;
use crate::domain::DisasterRecord;

/// Latitude/longitude limits, each optional and inclusive
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub min_latitude: Option<f64>,
    pub min_longitude: Option<f64>,
    pub max_latitude: Option<f64>,
    pub max_longitude: Option<f64>,
}

impl BoundingBox {
    pub fn is_unbounded(&self) -> bool {
        self.min_latitude.is_none()
            && self.min_longitude.is_none()
            && self.max_latitude.is_none()
            && self.max_longitude.is_none()
    }

    /// Records without coordinates never fall inside a bounded box
    pub fn contains(&self, record: &DisasterRecord) -> bool {
        if self.is_unbounded() {
            return true;
        }
        let Some(p) = record.common.coordinates() else {
            return false;
        };
        within(p.latitude(), self.min_latitude, self.max_latitude)
            && within(p.longitude(), self.min_longitude, self.max_longitude)
    }
}

fn within<T: PartialOrd>(value: T, min: Option<T>, max: Option<T>) -> bool {
    min.map_or(true, |min| value >= min) && max.map_or(true, |max| value <= max)
}

/// Minimum-only check where a missing value never passes
fn at_least<T: PartialOrd>(value: Option<T>, min: Option<T>) -> bool {
    match min {
        Some(min) => value.is_some_and(|v| v >= min),
        None => true,
    }
}

/// Optional narrowing applied on top of a normalized dataset.
/// Unset criteria match everything; a set criterion rejects records that lack
/// the field it tests.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchCriteria {
    pub min_year: Option<i32>,
    pub max_year: Option<i32>,
    /// Day-level bounds; records without a full date fail either bound
    pub min_date: Option<NaiveDate>,
    pub max_date: Option<NaiveDate>,
    pub min_magnitude: Option<f64>,
    pub max_magnitude: Option<f64>,
    pub min_vei: Option<i32>,
    pub min_elevation: Option<f64>,
    pub min_max_water_height: Option<f64>,
    pub min_num_runups: Option<i64>,
    pub bounds: Option<BoundingBox>,
}

impl SearchCriteria {
    pub fn matches(&self, record: &DisasterRecord) -> bool {
        if !within(record.year(), self.min_year, self.max_year) {
            return false;
        }

        if self.min_date.is_some() || self.max_date.is_some() {
            match record.date() {
                Some(date) if within(date, self.min_date, self.max_date) => {}
                _ => return false,
            }
        }

        // magnitude bounds exclude records without a magnitude
        if self.min_magnitude.is_some() || self.max_magnitude.is_some() {
            match record.magnitude() {
                Some(m) if within(m, self.min_magnitude, self.max_magnitude) => {}
                _ => return false,
            }
        }

        if !(at_least(record.vei(), self.min_vei)
            && at_least(record.elevation(), self.min_elevation)
            && at_least(record.max_water_height(), self.min_max_water_height)
            && at_least(record.num_runups(), self.min_num_runups))
        {
            return false;
        }

        match &self.bounds {
            Some(bounds) => bounds.contains(record),
            None => true,
        }
    }

    /// Matching records, in input order
    pub fn apply<'a>(&self, records: &'a [DisasterRecord]) -> Vec<&'a DisasterRecord> {
        records.iter().filter(|r| self.matches(r)).collect()
    }
}

/// One page of results
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub items: Vec<T>,
    pub items_per_page: usize,
    /// 1-based
    pub page: usize,
    pub total_items: usize,
    pub total_pages: usize,
}

/// Slice `items` into 1-based pages. Page 0 is treated as page 1 and a page
/// size of 0 falls back to the default size.
pub fn paginate<T: Clone>(items: &[T], page: usize, size: usize) -> Page<T> {
    let size = if size == 0 { constants::DEFAULT_PAGE_SIZE } else { size };
    let page = page.max(1);
    let total_items = items.len();
    let total_pages = total_items.div_ceil(size);

    let start = (page - 1).saturating_mul(size).min(total_items);
    let end = start.saturating_add(size).min(total_items);

    Page {
        items: items[start..end].to_vec(),
        items_per_page: size,
        page,
        total_items,
        total_pages,
    }
}

/// Number of records per year, ascending by year
pub fn year_counts(records: &[DisasterRecord]) -> BTreeMap<i32, usize> {
    let mut counts = BTreeMap::new();
    for record in records {
        *counts.entry(record.year()).or_insert(0) += 1;
    }
    counts
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{CommonFields, EarthquakeDetails, GeoPoint, HazardDetails, TsunamiDetails, VolcanoDetails};

    fn quake(year: i32, magnitude: Option<f64>, coords: Option<(f64, f64)>) -> DisasterRecord {
        DisasterRecord {
            common: CommonFields::new(year, coords.and_then(|(a, b)| GeoPoint::new(a, b)), None, None),
            details: HazardDetails::Earthquake(EarthquakeDetails {
                magnitude,
                ..Default::default()
            }),
        }
    }

    fn volcano(year: i32, vei: Option<i32>) -> DisasterRecord {
        DisasterRecord {
            common: CommonFields::new(year, None, None, None),
            details: HazardDetails::Volcano(VolcanoDetails {
                vei,
                ..Default::default()
            }),
        }
    }

    #[test]
    fn test_empty_criteria_match_everything() {
        let records = vec![quake(2000, None, None), volcano(1990, None)];
        assert_eq!(SearchCriteria::default().apply(&records).len(), 2);
    }

    #[test]
    fn test_magnitude_and_year_criteria() {
        let records = vec![
            quake(2000, Some(6.5), None),
            quake(2001, Some(5.0), None),
            quake(2002, None, None),
            quake(2010, Some(7.2), None),
        ];
        let criteria = SearchCriteria {
            max_year: Some(2005),
            min_magnitude: Some(6.0),
            ..Default::default()
        };
        let hits = criteria.apply(&records);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].year(), 2000);
    }

    #[test]
    fn test_min_vei() {
        let records = vec![volcano(1980, Some(5)), volcano(1981, Some(2)), volcano(1982, None)];
        let criteria = SearchCriteria {
            min_vei: Some(4),
            ..Default::default()
        };
        assert_eq!(criteria.apply(&records).len(), 1);
    }

    #[test]
    fn test_bounding_box_excludes_unmapped_records() {
        let records = vec![
            quake(2000, None, Some((35.0, 139.0))),
            quake(2000, None, Some((-33.0, -70.0))),
            quake(2000, None, None),
        ];
        let criteria = SearchCriteria {
            bounds: Some(BoundingBox {
                min_latitude: Some(20.0),
                min_longitude: Some(120.0),
                max_latitude: Some(50.0),
                max_longitude: Some(150.0),
            }),
            ..Default::default()
        };
        let hits = criteria.apply(&records);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].common.latitude(), Some(35.0));
    }

    #[test]
    fn test_single_sided_bounds() {
        let records = vec![
            quake(2000, None, Some((35.0, 139.0))),
            quake(2000, None, Some((-33.0, -70.0))),
            quake(2000, None, None),
        ];
        let southern = SearchCriteria {
            bounds: Some(BoundingBox {
                max_latitude: Some(0.0),
                ..Default::default()
            }),
            ..Default::default()
        };
        let hits = southern.apply(&records);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].common.longitude(), Some(-70.0));

        let unbounded = SearchCriteria {
            bounds: Some(BoundingBox::default()),
            ..Default::default()
        };
        assert_eq!(unbounded.apply(&records).len(), 3);
    }

    #[test]
    fn test_min_elevation() {
        let with_elevation = |elevation| DisasterRecord {
            common: CommonFields::new(1990, None, None, None),
            details: HazardDetails::Volcano(VolcanoDetails {
                elevation,
                ..Default::default()
            }),
        };
        let records = vec![
            with_elevation(Some(3170.0)),
            with_elevation(Some(114.0)),
            with_elevation(None),
        ];
        let criteria = SearchCriteria {
            min_elevation: Some(1000.0),
            ..Default::default()
        };
        let hits = criteria.apply(&records);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].elevation(), Some(3170.0));
    }

    #[test]
    fn test_tsunami_water_height_and_runups() {
        let tsunami = |max_water_height, num_runups| DisasterRecord {
            common: CommonFields::new(2004, None, None, None),
            details: HazardDetails::Tsunami(TsunamiDetails {
                max_water_height,
                num_runups,
                ..Default::default()
            }),
        };
        let records = vec![
            tsunami(Some(50.9), Some(1400)),
            tsunami(Some(11.3), None),
            tsunami(None, Some(300)),
            tsunami(Some(2.0), Some(10)),
        ];

        let tall = SearchCriteria {
            min_max_water_height: Some(10.0),
            ..Default::default()
        };
        assert_eq!(tall.apply(&records).len(), 2);

        let many_runups = SearchCriteria {
            min_num_runups: Some(100),
            ..Default::default()
        };
        assert_eq!(many_runups.apply(&records).len(), 2);

        let both = SearchCriteria {
            min_max_water_height: Some(10.0),
            min_num_runups: Some(100),
            ..Default::default()
        };
        assert_eq!(both.apply(&records).len(), 1);

        // non-tsunami records carry neither field
        assert!(!tall.matches(&quake(2004, Some(9.1), None)));
    }

    #[test]
    fn test_date_range_excludes_undated_records() {
        let dated = |year, month, day| DisasterRecord {
            common: CommonFields::new(year, None, None, None),
            details: HazardDetails::Earthquake(EarthquakeDetails {
                month,
                day,
                ..Default::default()
            }),
        };
        let records = vec![
            dated(2011, Some(3), Some(11)),
            dated(2011, Some(3), Some(10)),
            dated(2011, None, None),
            dated(2012, Some(1), Some(1)),
        ];
        let criteria = SearchCriteria {
            min_date: NaiveDate::from_ymd_opt(2011, 3, 11),
            max_date: NaiveDate::from_ymd_opt(2011, 12, 31),
            ..Default::default()
        };
        let hits = criteria.apply(&records);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].date(), NaiveDate::from_ymd_opt(2011, 3, 11));

        let open_ended = SearchCriteria {
            min_date: NaiveDate::from_ymd_opt(2011, 3, 11),
            ..Default::default()
        };
        assert_eq!(open_ended.apply(&records).len(), 2);
    }

    #[test]
    fn test_paginate() {
        let items: Vec<u32> = (1..=25).collect();

        let first = paginate(&items, 1, 10);
        assert_eq!(first.items, (1..=10).collect::<Vec<_>>());
        assert_eq!(first.total_pages, 3);
        assert_eq!(first.total_items, 25);

        let last = paginate(&items, 3, 10);
        assert_eq!(last.items, vec![21, 22, 23, 24, 25]);

        let beyond = paginate(&items, 9, 10);
        assert!(beyond.items.is_empty());
        assert_eq!(beyond.page, 9);

        let defaults = paginate(&items, 0, 0);
        assert_eq!(defaults.page, 1);
        assert_eq!(defaults.items_per_page, 10);

        let empty: Page<u32> = paginate(&[], 1, 10);
        assert_eq!(empty.total_pages, 0);
    }

    #[test]
    fn test_year_counts() {
        let records = vec![volcano(1991, None), volcano(1980, None), volcano(1991, None)];
        let counts = year_counts(&records);
        assert_eq!(counts.into_iter().collect::<Vec<_>>(), vec![(1980, 1), (1991, 2)]);
    }
}
