//! Date handling for the wire format.
//!
//! The vendor only understands `YYYY.MM.DD`. Dates enter the crate as
//! `NaiveDate`; `parse_date` accepts the textual forms users actually type.

use chrono::NaiveDate;

use crate::error::{MaconomyError, Result};

/// `strftime` pattern of every date sent to the vendor.
pub const WIRE_DATE_FORMAT: &str = "%Y.%m.%d";

const ACCEPTED_FORMATS: [&str; 3] = [WIRE_DATE_FORMAT, "%Y-%m-%d", "%Y%m%d"];

pub fn format_date(date: NaiveDate) -> String {
    date.format(WIRE_DATE_FORMAT).to_string()
}

/// Parse `YYYY.MM.DD`, `YYYY-MM-DD` or `YYYYMMDD`.
pub fn parse_date(input: &str) -> Result<NaiveDate> {
    let input = input.trim();
    ACCEPTED_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(input, fmt).ok())
        .ok_or_else(|| MaconomyError::InvalidDate(input.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_representations_format_identically() {
        for input in ["2018.02.05", "2018-02-05", "20180205", " 2018-02-05 "] {
            let date = parse_date(input).unwrap();
            assert_eq!(format_date(date), "2018.02.05", "{input}");
        }
    }

    #[test]
    fn format_pads_month_and_day() {
        let date = NaiveDate::from_ymd_opt(2018, 1, 9).unwrap();
        assert_eq!(format_date(date), "2018.01.09");
    }

    #[test]
    fn rejects_garbage() {
        let err = parse_date("next tuesday").unwrap_err();
        assert!(matches!(err, MaconomyError::InvalidDate(ref s) if s == "next tuesday"));
    }

    #[test]
    fn rejects_impossible_dates() {
        assert!(parse_date("2018.02.30").is_err());
    }
}
