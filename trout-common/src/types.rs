///! Lake data types

use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::error::ParseError;
use crate::parse::{parse_coordinate, parse_fish_count, parse_stocked_date};

/// A stocked-lake row exactly as the scraper stores it (all text)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawLake {
    /// Stocking date, e.g. "Jan 05, 2024"
    pub date: Option<String>,
    pub lake: Option<String>,
    /// Fish count with thousands separators, e.g. "1,234"
    pub stocked_fish: Option<String>,
    pub latitude: Option<String>,
    pub longitude: Option<String>,
    /// Google Maps directions URL
    pub directions: Option<String>,
    #[serde(default)]
    pub derby_participant: bool,
}

/// One stocking event, parsed at the ingestion boundary
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LakeRecord {
    pub lake: String,
    pub date: NaiveDate,
    /// Date text as it appeared in the report (kept for display)
    pub date_text: String,
    pub stocked_fish: u64,
    /// Fish count text as it appeared in the report (kept for display)
    pub stocked_fish_text: String,
    pub latitude: f64,
    pub longitude: f64,
    pub directions: String,
    pub derby_participant: bool,
}

impl LakeRecord {
    /// Parse a raw row. Rows without a usable date, count or position are rejected.
    pub fn from_raw(raw: RawLake) -> Result<Self, ParseError> {
        let lake = raw
            .lake
            .map(|l| l.trim().to_string())
            .filter(|l| !l.is_empty())
            .ok_or(ParseError::Missing("lake name"))?;
        let date_text = raw.date.ok_or(ParseError::Missing("date"))?.trim().to_string();
        let fish_text = raw
            .stocked_fish
            .ok_or(ParseError::Missing("stocked fish count"))?
            .trim()
            .to_string();
        let latitude = raw.latitude.ok_or(ParseError::Missing("latitude"))?;
        let longitude = raw.longitude.ok_or(ParseError::Missing("longitude"))?;

        Ok(Self {
            date: parse_stocked_date(&date_text)?,
            stocked_fish: parse_fish_count(&fish_text)?,
            latitude: parse_coordinate(&latitude, "latitude")?,
            longitude: parse_coordinate(&longitude, "longitude")?,
            directions: raw.directions.unwrap_or_default().trim().to_string(),
            derby_participant: raw.derby_participant,
            lake,
            date_text,
            stocked_fish_text: fish_text,
        })
    }
}

/// Inclusive calendar-date range used to filter stocking events
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateWindow {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateWindow {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }

    /// `[today - days, today]`
    pub fn last_days(today: NaiveDate, days: u32) -> Self {
        let start = today
            .checked_sub_days(Days::new(days as u64))
            .unwrap_or(NaiveDate::MIN);
        Self { start, end: today }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }
}

/// Total fish stocked on one date
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateTotal {
    pub date: NaiveDate,
    pub total: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(lake: &str, date: &str, fish: &str, lat: &str, lon: &str) -> RawLake {
        RawLake {
            date: Some(date.to_string()),
            lake: Some(lake.to_string()),
            stocked_fish: Some(fish.to_string()),
            latitude: Some(lat.to_string()),
            longitude: Some(lon.to_string()),
            directions: Some("https://maps.google.com/?q=47,-121".to_string()),
            derby_participant: false,
        }
    }

    #[test]
    fn test_from_raw_parses_fields() {
        let record = LakeRecord::from_raw(raw("BATTLE GROUND LK", "Jan 05, 2024", "2,500", "45.8", "-122.5")).unwrap();
        assert_eq!(record.lake, "BATTLE GROUND LK");
        assert_eq!(record.date, NaiveDate::from_ymd_opt(2024, 1, 5).unwrap());
        assert_eq!(record.date_text, "Jan 05, 2024");
        assert_eq!(record.stocked_fish, 2500);
        assert_eq!(record.stocked_fish_text, "2,500");
        assert_eq!(record.latitude, 45.8);
        assert_eq!(record.longitude, -122.5);
        assert!(!record.derby_participant);
    }

    #[test]
    fn test_from_raw_rejects_bad_rows() {
        let err = LakeRecord::from_raw(raw("A", "Jan 05, 2024", "lots", "45.8", "-122.5")).unwrap_err();
        assert_eq!(err, ParseError::FishCount("lots".to_string()));

        let err = LakeRecord::from_raw(raw("A", "Jan 05, 2024", "10", "north", "-122.5")).unwrap_err();
        assert!(matches!(err, ParseError::Coordinate { axis: "latitude", .. }));

        let mut missing = raw("A", "Jan 05, 2024", "10", "45.8", "-122.5");
        missing.lake = Some("  ".to_string());
        assert_eq!(LakeRecord::from_raw(missing).unwrap_err(), ParseError::Missing("lake name"));
    }

    #[test]
    fn test_last_days_window() {
        let today = NaiveDate::from_ymd_opt(2024, 1, 31).unwrap();
        let window = DateWindow::last_days(today, 7);
        assert_eq!(window.start, NaiveDate::from_ymd_opt(2024, 1, 24).unwrap());
        assert_eq!(window.end, today);
        assert!(window.contains(window.start));
        assert!(window.contains(today));
        assert!(!window.contains(NaiveDate::from_ymd_opt(2024, 1, 23).unwrap()));
        assert!(!window.contains(NaiveDate::from_ymd_opt(2024, 2, 1).unwrap()));

        let zero = DateWindow::last_days(today, 0);
        assert_eq!(zero.start, today);
    }

    #[test]
    fn test_last_days_saturates() {
        let today = NaiveDate::from_ymd_opt(2024, 1, 31).unwrap();
        let window = DateWindow::last_days(today, u32::MAX);
        assert!(window.contains(NaiveDate::from_ymd_opt(1900, 1, 1).unwrap()));
    }
}
