//! Response data types and date parsing.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::ClimateQueryError;

/// Date format accepted for the `start` and `end` path parameters and used for all date strings
/// in responses.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Parse a user-supplied `YYYY-MM-DD` date string.
///
/// # Arguments
///
/// * `value`: The raw path parameter
pub fn parse_date(value: &str) -> Result<NaiveDate, ClimateQueryError> {
    NaiveDate::parse_from_str(value, DATE_FORMAT).map_err(ClimateQueryError::InvalidDateFormat)
}

/// Minimum, average and maximum temperature observation over a date range.
///
/// Serialises with the upper-case keys expected by API consumers.
#[derive(Debug, Deserialize, PartialEq, Serialize)]
pub struct TemperatureSummary {
    /// Lowest temperature observation in the range
    #[serde(rename = "TMIN")]
    pub tmin: f64,
    /// Mean temperature observation over the range
    #[serde(rename = "TAVG")]
    pub tavg: f64,
    /// Highest temperature observation in the range
    #[serde(rename = "TMAX")]
    pub tmax: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_date_valid() {
        let date = parse_date("2017-08-23").unwrap();
        assert_eq!(NaiveDate::from_ymd_opt(2017, 8, 23).unwrap(), date);
    }

    #[test]
    fn parse_date_rejects_slashes() {
        let result = parse_date("2024/01/01");
        assert!(matches!(
            result,
            Err(ClimateQueryError::InvalidDateFormat(_))
        ));
    }

    #[test]
    fn parse_date_rejects_garbage() {
        let result = parse_date("not-a-date");
        assert!(matches!(
            result,
            Err(ClimateQueryError::InvalidDateFormat(_))
        ));
    }

    #[test]
    fn parse_date_rejects_trailing_characters() {
        let result = parse_date("2017-08-23T00:00:00");
        assert!(matches!(
            result,
            Err(ClimateQueryError::InvalidDateFormat(_))
        ));
    }

    #[test]
    fn parse_date_rejects_invalid_calendar_date() {
        let result = parse_date("2017-02-30");
        assert!(matches!(
            result,
            Err(ClimateQueryError::InvalidDateFormat(_))
        ));
    }

    #[test]
    fn temperature_summary_serialises_with_upper_case_keys() {
        let summary = TemperatureSummary {
            tmin: 65.0,
            tavg: 70.0,
            tmax: 75.0,
        };
        let json = serde_json::to_value(&summary).unwrap();
        assert_eq!(
            serde_json::json!({"TMIN": 65.0, "TAVG": 70.0, "TMAX": 75.0}),
            json
        );
    }
}
