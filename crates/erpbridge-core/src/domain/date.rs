use std::fmt::{Display, Formatter};

use serde::de::Error as DeError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use time::format_description::BorrowedFormatItem;
use time::macros::format_description;
use time::{Date, Month};

use crate::{UtcDateTime, ValidationError};

const ISO_DATE: &[BorrowedFormatItem<'_>] = format_description!("[year]-[month]-[day]");
const COMPACT_DATE: &[BorrowedFormatItem<'_>] = format_description!("[year][month][day]");
const DMY_DASH: &[BorrowedFormatItem<'_>] = format_description!("[day]-[month]-[year]");
const DMY_DOT: &[BorrowedFormatItem<'_>] = format_description!("[day].[month].[year]");
const DMY_SLASH: &[BorrowedFormatItem<'_>] = format_description!("[day]/[month]/[year]");

/// Calendar date without time zone, as ERP documents carry them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct BusinessDate(Date);

impl BusinessDate {
    pub fn from_ymd(year: i32, month: u8, day: u8) -> Result<Self, ValidationError> {
        let invalid = || ValidationError::InvalidDate {
            value: format!("{year:04}-{month:02}-{day:02}"),
        };
        let month = Month::try_from(month).map_err(|_| invalid())?;
        Date::from_calendar_date(year, month, day)
            .map(Self)
            .map_err(|_| invalid())
    }

    /// Parses the date spellings ERP payloads use.
    ///
    /// Accepted: `YYYY-MM-DD`, ISO date-time (date part), `DD-MM-YYYY`,
    /// `DD.MM.YYYY`, `DD/MM/YYYY`, `YYYYMMDD`, and `/Date(ms)/`.
    pub fn parse(input: &str) -> Result<Self, ValidationError> {
        let trimmed = input.trim();
        let invalid = || ValidationError::InvalidDate {
            value: input.to_owned(),
        };

        if let Some(millis) = parse_ms_json_date(trimmed) {
            let ts = UtcDateTime::from_unix_millis(millis).ok_or_else(invalid)?;
            return Ok(Self(ts.into_inner().date()));
        }

        let date_part = match trimmed.get(..10) {
            Some(head) if trimmed[10..].starts_with(['T', ' ']) => head,
            _ => trimmed,
        };

        [ISO_DATE, COMPACT_DATE, DMY_DASH, DMY_DOT, DMY_SLASH]
            .into_iter()
            .find_map(|format| Date::parse(date_part, format).ok())
            .map(Self)
            .ok_or_else(invalid)
    }

    /// NAV writes `0001-01-01` where a date is unset.
    pub fn is_placeholder(self) -> bool {
        self.0.year() <= 1
    }

    pub fn into_inner(self) -> Date {
        self.0
    }

    pub fn to_iso_string(self) -> String {
        self.0
            .format(ISO_DATE)
            .unwrap_or_else(|_| self.0.to_string())
    }

    /// `DD-MM-YYYY`, as Visma expects it.
    pub fn to_dmy_string(self) -> String {
        self.0
            .format(DMY_DASH)
            .unwrap_or_else(|_| self.to_iso_string())
    }
}

/// Extracts milliseconds from Microsoft JSON dates: `/Date(1705276800000)/`
/// or `/Date(1705276800000+0100)/`. The millisecond value is already UTC.
pub(crate) fn parse_ms_json_date(input: &str) -> Option<i64> {
    let inner = input.strip_prefix("/Date(")?.strip_suffix(")/")?;
    let end = inner
        .char_indices()
        .skip(1)
        .find(|(_, ch)| *ch == '+' || *ch == '-')
        .map_or(inner.len(), |(index, _)| index);
    inner[..end].parse().ok()
}

impl Display for BusinessDate {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_iso_string())
    }
}

impl Serialize for BusinessDate {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_iso_string())
    }
}

impl<'de> Deserialize<'de> for BusinessDate {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = String::deserialize(deserializer)?;
        Self::parse(&value).map_err(D::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn iso(input: &str) -> String {
        BusinessDate::parse(input)
            .unwrap_or_else(|error| panic!("'{input}' should parse: {error}"))
            .to_iso_string()
    }

    #[test]
    fn parses_all_vendor_spellings() {
        assert_eq!(iso("2024-01-15"), "2024-01-15");
        assert_eq!(iso("2024-01-15T13:45:00Z"), "2024-01-15");
        assert_eq!(iso("15-01-2024"), "2024-01-15");
        assert_eq!(iso("15.01.2024"), "2024-01-15");
        assert_eq!(iso("15/01/2024"), "2024-01-15");
        assert_eq!(iso("20240115"), "2024-01-15");
        assert_eq!(iso("/Date(1705276800000)/"), "2024-01-15");
        assert_eq!(iso("/Date(1705276800000+0100)/"), "2024-01-15");
    }

    #[test]
    fn rejects_garbage_and_impossible_dates() {
        assert!(BusinessDate::parse("yesterday").is_err());
        assert!(BusinessDate::parse("2024-02-30").is_err());
        assert!(BusinessDate::parse("15-01.2024").is_err());
        assert!(BusinessDate::parse("").is_err());
        assert!(BusinessDate::parse("2024-1-5").is_err());
        assert!(BusinessDate::parse("2024011").is_err());
        assert!(BusinessDate::parse("2024-01-15junk").is_err());
    }

    #[test]
    fn flags_nav_null_date() {
        let date = BusinessDate::parse("0001-01-01").expect("parses");
        assert!(date.is_placeholder());
        assert_eq!(date.to_iso_string(), "0001-01-01");
    }

    #[test]
    fn formats_day_month_year() {
        let date = BusinessDate::from_ymd(2024, 3, 7).expect("valid");
        assert_eq!(date.to_dmy_string(), "07-03-2024");
        assert_eq!(date.to_iso_string(), "2024-03-07");
    }

    #[test]
    fn negative_ms_json_date_before_epoch() {
        assert_eq!(parse_ms_json_date("/Date(-86400000)/"), Some(-86_400_000));
    }
}
