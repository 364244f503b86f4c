//! Timestamp codec for the `HH:MM:SS DD.MM.YYYY` text used in exported files.
//!
//! Decoding walks the input with a small cursor: a digit run per component and a
//! literal separator between them. Every mismatch is reported as a typed
//! [`Error::MalformedTimestamp`] naming the component and the text that failed to scan.
//! Components are composed with chrono's proleptic Gregorian calendar and no
//! timezone; out-of-range values are rejected rather than rolled over.
//!
//! Years are limited to four digits. The store orders timestamps as text, which only
//! matches chronological order inside that range.

use crate::errors::{Error, Result};
use chrono::{Datelike, Local, NaiveDate, NaiveDateTime, SubsecRound, Timelike};
use std::{fmt, ops::RangeInclusive, str::FromStr};

/// Years a timestamp may carry.
pub const YEAR_RANGE: RangeInclusive<i32> = 0..=9999;

/// Component of a timestamp, used to locate decode failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimestampField {
    /// Hour of the day
    Hour,
    /// Minute of the hour
    Minute,
    /// Second of the minute
    Second,
    /// Day of the month
    Day,
    /// Month of the year
    Month,
    /// Calendar year
    Year,
}

impl fmt::Display for TimestampField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Hour => "hour",
            Self::Minute => "minute",
            Self::Second => "second",
            Self::Day => "day",
            Self::Month => "month",
            Self::Year => "year",
        };
        f.write_str(name)
    }
}

struct Cursor<'a> {
    rest: &'a str,
}

impl<'a> Cursor<'a> {
    const fn new(text: &'a str) -> Self {
        Self { rest: text }
    }

    fn malformed(&self, field: TimestampField) -> Error {
        Error::MalformedTimestamp {
            field,
            raw: self.rest.to_string(),
        }
    }

    /// Consumes the longest run of ASCII digits and parses it.
    fn number<T: FromStr>(&mut self, field: TimestampField) -> Result<T> {
        let len = self.rest.bytes().take_while(u8::is_ascii_digit).count();
        let (digits, rest) = self.rest.split_at(len);
        let value = digits.parse().map_err(|_| self.malformed(field))?;
        self.rest = rest;
        Ok(value)
    }

    fn literal(&mut self, separator: char, after: TimestampField) -> Result<()> {
        let Some(rest) = self.rest.strip_prefix(separator) else {
            return Err(self.malformed(after));
        };
        self.rest = rest;
        Ok(())
    }

    fn skip_whitespace(&mut self) {
        self.rest = self.rest.trim_start();
    }

    /// Parses everything that is left.
    fn remainder<T: FromStr>(&mut self, field: TimestampField) -> Result<T> {
        let value = self.rest.parse().map_err(|_| self.malformed(field))?;
        self.rest = "";
        Ok(value)
    }
}

/// Decodes `HH:MM:SS DD.MM.YYYY` into a wall-clock timestamp.
///
/// Any amount of whitespace (including none) may separate the time from the date.
/// Digit runs may be shorter or longer than their nominal width.
///
/// # Errors
/// [`Error::MalformedTimestamp`] when a component or separator does not scan,
/// [`Error::InvalidCalendarDate`] when the components do not form a real date and time
/// or the year falls outside [`YEAR_RANGE`].
pub fn parse_timestamp(text: &str) -> Result<NaiveDateTime> {
    use TimestampField::{Day, Hour, Minute, Month, Second, Year};

    let mut cursor = Cursor::new(text);
    let hour: u32 = cursor.number(Hour)?;
    cursor.literal(':', Hour)?;
    let minute: u32 = cursor.number(Minute)?;
    cursor.literal(':', Minute)?;
    let second: u32 = cursor.number(Second)?;
    cursor.skip_whitespace();
    let day: u32 = cursor.number(Day)?;
    cursor.literal('.', Day)?;
    let month: u32 = cursor.number(Month)?;
    cursor.literal('.', Month)?;
    let year: i32 = cursor.remainder(Year)?;

    Some(year)
        .filter(|year| YEAR_RANGE.contains(year))
        .and_then(|year| NaiveDate::from_ymd_opt(year, month, day))
        .and_then(|date| date.and_hms_opt(hour, minute, second))
        .ok_or_else(|| Error::InvalidCalendarDate {
            text: text.to_string(),
        })
}

/// Encodes a timestamp as `HH:MM:SS DD.MM.YYYY`. Sub-second precision is dropped.
#[must_use]
pub fn format_timestamp(timestamp: &NaiveDateTime) -> String {
    format!(
        "{:02}:{:02}:{:02} {:02}.{:02}.{:04}",
        timestamp.hour(),
        timestamp.minute(),
        timestamp.second(),
        timestamp.day(),
        timestamp.month(),
        timestamp.year()
    )
}

/// Current local wall-clock time at one-second resolution.
#[must_use]
pub fn now() -> NaiveDateTime {
    Local::now().naive_local().trunc_subsecs(0)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::test_utils::at;

    #[test]
    fn test_round_trip() {
        let samples = [
            at(0, 0, 0, 1, 1, 1970),
            at(23, 59, 59, 31, 12, 2022),
            at(9, 5, 7, 29, 2, 2024),
            at(12, 30, 0, 15, 6, 5),
            at(0, 0, 0, 1, 1, 0),
            at(23, 59, 59, 31, 12, 9999),
        ];
        for timestamp in samples {
            let text = format_timestamp(&timestamp);
            assert_eq!(parse_timestamp(&text).unwrap(), timestamp, "{text}");
        }
    }

    #[test]
    fn test_format_pads_every_component() {
        assert_eq!(format_timestamp(&at(9, 5, 7, 3, 4, 987)), "09:05:07 03.04.0987");
        assert_eq!(format_timestamp(&at(23, 0, 0, 26, 9, 2022)), "23:00:00 26.09.2022");
    }

    #[test]
    fn test_format_drops_subseconds() {
        let precise = at(10, 0, 0, 1, 10, 2022) + chrono::Duration::milliseconds(750);
        let text = format_timestamp(&precise);
        assert_eq!(text, "10:00:00 01.10.2022");
        assert_eq!(parse_timestamp(&text).unwrap(), at(10, 0, 0, 1, 10, 2022));
    }

    #[test]
    fn test_parse_is_lenient_about_widths_and_spacing() {
        assert_eq!(
            parse_timestamp("1:2:3 4.5.2022").unwrap(),
            at(1, 2, 3, 4, 5, 2022)
        );
        assert_eq!(
            parse_timestamp("10:20:30   01.02.2023").unwrap(),
            at(10, 20, 30, 1, 2, 2023)
        );
    }

    #[test]
    fn test_parse_rejects_missing_separator() {
        let err = parse_timestamp("12-00:00 01.01.2022").unwrap_err();
        assert!(matches!(
            err,
            Error::MalformedTimestamp { field: TimestampField::Hour, ref raw }
                if raw == "-00:00 01.01.2022"
        ));

        let err = parse_timestamp("12:00:00 01/01.2022").unwrap_err();
        assert!(matches!(
            err,
            Error::MalformedTimestamp {
                field: TimestampField::Day,
                ..
            }
        ));
    }

    #[test]
    fn test_parse_rejects_non_numeric_field() {
        let err = parse_timestamp("12:xx:00 01.01.2022").unwrap_err();
        assert!(matches!(
            err,
            Error::MalformedTimestamp { field: TimestampField::Minute, ref raw }
                if raw == "xx:00 01.01.2022"
        ));

        let err = parse_timestamp("garbage").unwrap_err();
        assert!(matches!(
            err,
            Error::MalformedTimestamp {
                field: TimestampField::Hour,
                ..
            }
        ));
    }

    #[test]
    fn test_parse_rejects_trailing_garbage_after_year() {
        let err = parse_timestamp("12:00:00 01.01.2022x").unwrap_err();
        assert!(matches!(
            err,
            Error::MalformedTimestamp { field: TimestampField::Year, ref raw } if raw == "2022x"
        ));

        let err = parse_timestamp("12:00:00 01.01.").unwrap_err();
        assert!(matches!(
            err,
            Error::MalformedTimestamp {
                field: TimestampField::Year,
                ..
            }
        ));
    }

    #[test]
    fn test_parse_rejects_impossible_dates() {
        for text in [
            "00:00:00 31.02.2022",
            "00:00:00 31.04.2022",
            "00:00:00 29.02.2023",
            "24:00:00 01.01.2022",
            "99:00:00 01.01.2022",
            "00:60:00 01.01.2022",
            "00:00:60 01.01.2022",
            "00:00:00 01.13.2022",
            "00:00:00 00.01.2022",
        ] {
            let err = parse_timestamp(text).unwrap_err();
            assert!(
                matches!(err, Error::InvalidCalendarDate { text: ref t } if t == text),
                "{text}: {err}"
            );
        }
    }

    #[test]
    fn test_parse_rejects_years_beyond_four_digits() {
        for text in [
            "00:00:00 01.01.10000",
            "01:02:03 04.05.12345",
            "00:00:00 01.01.-5",
            "00:00:00 01.01.-0001",
        ] {
            let err = parse_timestamp(text).unwrap_err();
            assert!(
                matches!(err, Error::InvalidCalendarDate { text: ref t } if t == text),
                "{text}: {err}"
            );
        }
        assert_eq!(
            parse_timestamp("00:00:00 01.01.0000").unwrap(),
            at(0, 0, 0, 1, 1, 0)
        );
    }

    #[test]
    fn test_parse_rejects_overflowing_component() {
        let err = parse_timestamp("99999999999:00:00 01.01.2022").unwrap_err();
        assert!(matches!(
            err,
            Error::MalformedTimestamp {
                field: TimestampField::Hour,
                ..
            }
        ));
    }

    #[test]
    fn test_now_has_whole_seconds() {
        assert_eq!(now().nanosecond(), 0);
    }
}
