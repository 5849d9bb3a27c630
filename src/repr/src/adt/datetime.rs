// Copyright Materialize, Inc. and contributors. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

//! Output patterns for the temporal types.
//!
//! The server tells the client how each temporal type should be rendered as
//! text using its own pattern language, e.g. `YYYY-MM-DD HH24:MI:SS.FF3
//! TZHTZM`. A [`DateTimeFormat`] is such a pattern compiled once and applied
//! to many values.
//!
//! Recognized elements, matched without regard to case:
//!
//! | Element       | Renders                                          |
//! |---------------|--------------------------------------------------|
//! | `YYYY`, `YY`  | four-digit and two-digit year                    |
//! | `MM`          | two-digit month                                  |
//! | `MON`, `MMMM` | abbreviated and full month name                  |
//! | `DD`          | two-digit day of month                           |
//! | `DY`          | abbreviated day of week                          |
//! | `HH24`        | two-digit hour, 00-23                            |
//! | `HH12`, `HH`  | two-digit hour, 01-12                            |
//! | `AM`, `PM`    | meridiem indicator                               |
//! | `MI`, `SS`    | two-digit minute and second                      |
//! | `FF`, `FF0-9` | fractional seconds at the value's scale, or at n |
//! | `TZH`, `TZM`  | signed hour and minute of the UTC offset         |
//!
//! Text in double quotes is copied verbatim, as is every other character.

use chrono::{Datelike, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime, Timelike};

use crate::adt::date;
use crate::adt::numeric::Scale;
use crate::adt::time::Time;
use crate::adt::timestamp::{Timestamp, TimestampError};

const MONTH_ABBREVS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

const MONTH_NAMES: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

const DAY_ABBREVS: [&str; 7] = ["Mon", "Tue", "Wed", "Thu", "Fri", "Sat", "Sun"];

#[derive(Debug, Clone, PartialEq, Eq)]
enum FormatItem {
    Literal(String),
    Year4,
    Year2,
    Month,
    MonthAbbrev,
    MonthName,
    Day,
    DayAbbrev,
    Hour24,
    Hour12,
    Meridiem,
    Minute,
    Second,
    /// Fractional seconds, at a fixed number of digits or at the value's
    /// scale.
    Fraction(Option<u8>),
    TzHour,
    TzMinute,
}

/// Pattern elements in match order. Longer elements that share a prefix
/// with shorter ones must come first.
const ELEMENTS: &[(&str, FormatItem)] = &[
    ("YYYY", FormatItem::Year4),
    ("YY", FormatItem::Year2),
    ("MMMM", FormatItem::MonthName),
    ("MON", FormatItem::MonthAbbrev),
    ("MM", FormatItem::Month),
    ("MI", FormatItem::Minute),
    ("DD", FormatItem::Day),
    ("DY", FormatItem::DayAbbrev),
    ("HH24", FormatItem::Hour24),
    ("HH12", FormatItem::Hour12),
    ("HH", FormatItem::Hour12),
    ("AM", FormatItem::Meridiem),
    ("PM", FormatItem::Meridiem),
    ("SS", FormatItem::Second),
    ("TZH", FormatItem::TzHour),
    ("TZM", FormatItem::TzMinute),
];

/// An error compiling a [`DateTimeFormat`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid format pattern {pattern:?}: {reason}")]
pub struct InvalidFormatError {
    /// The pattern that failed to compile.
    pub pattern: String,
    /// Why it failed.
    pub reason: &'static str,
}

/// A compiled output pattern for dates, times or timestamps.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DateTimeFormat {
    pattern: String,
    items: Vec<FormatItem>,
}

impl DateTimeFormat {
    /// Compiles `pattern`.
    pub fn compile(pattern: &str) -> Result<DateTimeFormat, InvalidFormatError> {
        let err = |reason| InvalidFormatError {
            pattern: pattern.to_owned(),
            reason,
        };
        let upper = pattern.to_ascii_uppercase();
        let mut items = vec![];
        let mut literal = String::new();
        let mut i = 0;
        'outer: while i < pattern.len() {
            let rest = &upper[i..];
            if rest.starts_with('"') {
                let end = rest[1..].find('"').ok_or_else(|| err("unterminated quote"))?;
                literal.push_str(&pattern[i + 1..i + 1 + end]);
                i += end + 2;
                continue;
            }
            if let Some(after) = rest.strip_prefix("FF") {
                let digits = after
                    .chars()
                    .next()
                    .and_then(|c| c.to_digit(10))
                    .and_then(|d| u8::try_from(d).ok());
                flush(&mut literal, &mut items);
                items.push(FormatItem::Fraction(digits));
                i += if digits.is_some() { 3 } else { 2 };
                continue;
            }
            for (element, item) in ELEMENTS {
                if rest.starts_with(element) {
                    flush(&mut literal, &mut items);
                    items.push(item.clone());
                    i += element.len();
                    continue 'outer;
                }
            }
            // Advance by a whole character so multi-byte text is preserved.
            let c = pattern[i..].chars().next().ok_or_else(|| err("invalid utf-8 boundary"))?;
            literal.push(c);
            i += c.len_utf8();
        }
        flush(&mut literal, &mut items);
        Ok(DateTimeFormat {
            pattern: pattern.to_owned(),
            items,
        })
    }

    /// Returns the pattern this format was compiled from.
    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    /// Renders a wall clock reading. `offset` is the UTC offset rendered by
    /// `TZH`/`TZM`, UTC if absent; `scale` is the precision rendered by `FF`.
    pub fn format_parts(
        &self,
        wall: &NaiveDateTime,
        offset: Option<FixedOffset>,
        scale: Scale,
    ) -> String {
        let mut out = String::new();
        let offset_secs = offset.map(|o| o.local_minus_utc()).unwrap_or(0);
        for item in &self.items {
            match item {
                FormatItem::Literal(s) => out.push_str(s),
                FormatItem::Year4 => {
                    let year = wall.year();
                    if year < 0 {
                        out.push_str(&format!("-{:04}", year.unsigned_abs()));
                    } else {
                        out.push_str(&format!("{year:04}"));
                    }
                }
                FormatItem::Year2 => out.push_str(&format!("{:02}", wall.year().rem_euclid(100))),
                FormatItem::Month => out.push_str(&format!("{:02}", wall.month())),
                FormatItem::MonthAbbrev => out.push_str(MONTH_ABBREVS[month_index(wall)]),
                FormatItem::MonthName => out.push_str(MONTH_NAMES[month_index(wall)]),
                FormatItem::Day => out.push_str(&format!("{:02}", wall.day())),
                FormatItem::DayAbbrev => out.push_str(
                    DAY_ABBREVS[usize::try_from(wall.weekday().num_days_from_monday())
                        .unwrap_or_default()],
                ),
                FormatItem::Hour24 => out.push_str(&format!("{:02}", wall.hour())),
                FormatItem::Hour12 => out.push_str(&format!("{:02}", wall.hour12().1)),
                FormatItem::Meridiem => out.push_str(if wall.hour12().0 { "PM" } else { "AM" }),
                FormatItem::Minute => out.push_str(&format!("{:02}", wall.minute())),
                FormatItem::Second => out.push_str(&format!("{:02}", wall.second())),
                FormatItem::Fraction(digits) => {
                    let digits = usize::from(digits.unwrap_or(scale.into_u8()));
                    let nanos = format!("{:09}", wall.nanosecond() % 1_000_000_000);
                    out.push_str(&nanos[..digits.min(9)]);
                }
                FormatItem::TzHour => {
                    let sign = if offset_secs < 0 { '-' } else { '+' };
                    out.push(sign);
                    out.push_str(&format!("{:02}", offset_secs.unsigned_abs() / 3600));
                }
                FormatItem::TzMinute => {
                    out.push_str(&format!("{:02}", offset_secs.unsigned_abs() % 3600 / 60))
                }
            }
        }
        out
    }

    /// Renders a timestamp in its own zone at its own scale.
    ///
    /// Dates before the 1582 calendar reform are shifted for display; see
    /// [`date::adjust_for_display`].
    pub fn format_timestamp(&self, ts: &Timestamp) -> Result<String, TimestampError> {
        let local = ts.local()?;
        let wall = date::adjust_datetime_for_display(local.naive_local());
        Ok(self.format_parts(&wall, Some(*local.offset()), ts.scale()))
    }

    /// Renders a date, applying the display shift for dates before the 1582
    /// calendar reform.
    pub fn format_date(&self, d: NaiveDate) -> String {
        let wall = date::adjust_for_display(d).and_time(NaiveTime::MIN);
        self.format_parts(&wall, None, Scale::ZERO)
    }

    /// Renders a time of day at its own scale.
    pub fn format_time(&self, t: &Time) -> String {
        let wall = NaiveDateTime::UNIX_EPOCH.date().and_time(t.naive());
        self.format_parts(&wall, None, t.scale())
    }
}

fn flush(literal: &mut String, items: &mut Vec<FormatItem>) {
    if !literal.is_empty() {
        items.push(FormatItem::Literal(std::mem::take(literal)));
    }
}

fn month_index(wall: &NaiveDateTime) -> usize {
    usize::try_from(wall.month0()).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use chrono_tz::Tz;

    use super::*;
    use crate::adt::numeric::FixedPoint;
    use crate::adt::time::decode_time;
    use crate::adt::timestamp::{TimestampKind, TzEncoding, decode_timestamp};
    use crate::adt::timezone::TimestampZone;

    fn fmt(pattern: &str) -> DateTimeFormat {
        DateTimeFormat::compile(pattern).unwrap()
    }

    fn ts(token: &str, kind: TimestampKind, scale: u8) -> Timestamp {
        decode_timestamp(
            token,
            kind,
            Scale::try_from(scale).unwrap(),
            chrono_tz::America::Los_Angeles,
            TzEncoding::Current,
        )
        .unwrap()
    }

    #[test]
    fn formats_timestamps() {
        let f = fmt("YYYY-MM-DD HH24:MI:SS.FF3 TZHTZM");
        assert_eq!(
            f.format_timestamp(&ts("1704110400.123456", TimestampKind::Ntz, 6))
                .unwrap(),
            "2024-01-01 12:00:00.123 +0000"
        );
        assert_eq!(
            f.format_timestamp(&ts("1704110400", TimestampKind::Ltz, 0))
                .unwrap(),
            "2024-01-01 04:00:00.000 -0800"
        );
        assert_eq!(
            f.format_timestamp(&ts("1704110400.5 1770", TimestampKind::Tz, 1))
                .unwrap(),
            "2024-01-01 17:30:00.500 +0530"
        );
    }

    #[test]
    fn fraction_defaults_to_value_scale() {
        let f = fmt("HH24:MI:SS.FF");
        let v = ts("1704110400.123456", TimestampKind::Ntz, 6);
        assert_eq!(f.format_timestamp(&v).unwrap(), "12:00:00.123456");
        let f = fmt("ss.ff9");
        assert_eq!(f.format_timestamp(&v).unwrap(), "00.123456000");
    }

    #[test]
    fn names_and_meridiem() {
        let f = fmt("DY, DD MON YYYY HH12:MI AM (MMMM YY)");
        let v = ts("1704110400", TimestampKind::Ntz, 0);
        assert_eq!(
            f.format_timestamp(&v).unwrap(),
            "Mon, 01 Jan 2024 12:00 PM (January 24)"
        );
    }

    #[test]
    fn quoted_literals() {
        let f = fmt(r#"YYYY-MM-DD"T"HH24:MI:SS"Z""#);
        let v = ts("1704110400", TimestampKind::Ntz, 0);
        assert_eq!(f.format_timestamp(&v).unwrap(), "2024-01-01T12:00:00Z");
        assert_eq!(
            DateTimeFormat::compile("YYYY\"oops"),
            Err(InvalidFormatError {
                pattern: "YYYY\"oops".into(),
                reason: "unterminated quote",
            })
        );
    }

    #[test]
    fn unresolved_zone_cannot_be_formatted() {
        let v = Timestamp::new(
            FixedPoint {
                fractions: 0,
                scale: Scale::ZERO,
            },
            TimestampZone::Unresolved,
        );
        assert_eq!(
            fmt("YYYY").format_timestamp(&v),
            Err(TimestampError::UnresolvedZone)
        );
    }

    #[test]
    fn formats_dates_with_gregorian_shift() {
        let f = fmt("YYYY-MM-DD");
        let d = NaiveDate::from_ymd_opt(2024, 2, 29).unwrap();
        assert_eq!(f.format_date(d), "2024-02-29");
        let d = NaiveDate::from_ymd_opt(1582, 10, 1).unwrap();
        assert_eq!(f.format_date(d), "1582-10-11");
        let d = NaiveDate::from_ymd_opt(-500, 3, 1).unwrap();
        assert_eq!(f.format_date(d), "-0500-02-23");
    }

    #[test]
    fn formats_times() {
        let t = decode_time("45296.789", Scale::MILLIS).unwrap();
        assert_eq!(fmt("HH24:MI:SS.FF").format_time(&t), "12:34:56.789");
        assert_eq!(fmt("HH12:MI PM").format_time(&t), "12:34 PM");
    }

    #[test]
    fn tz_offsets_are_signed() {
        let v = ts("0 1", TimestampKind::Tz, 0);
        assert_eq!(fmt("TZH:TZM").format_timestamp(&v).unwrap(), "-23:59");
        let tz: Tz = "Asia/Kolkata".parse().unwrap();
        let v = Timestamp::new(v.value(), TimestampZone::Named(tz));
        assert_eq!(fmt("TZHTZM").format_timestamp(&v).unwrap(), "+0530");
    }
}
