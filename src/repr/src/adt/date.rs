// Copyright Materialize, Inc. and contributors. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

//! Calendar dates.
//!
//! Dates are transmitted as a signed count of days since 1970-01-01 in the
//! proleptic Gregorian calendar.

use chrono::{DateTime, Datelike, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime, TimeDelta, Utc};
use chrono_tz::Tz;
use tracing::debug;

use crate::DecodeError;
use crate::adt::timezone;

/// The number of milliseconds in a day.
pub const MILLIS_PER_DAY: i64 = 86_400_000;

/// Decodes a date token, a plain integer day count since the Unix epoch.
pub fn decode_date(token: &str) -> Result<NaiveDate, DecodeError> {
    let err = || DecodeError::new("date", token);
    let days = token.parse::<i64>().map_err(|_| err())?;
    let instant = days
        .checked_mul(MILLIS_PER_DAY)
        .and_then(DateTime::<Utc>::from_timestamp_millis)
        .ok_or_else(err)?;
    Ok(instant.date_naive())
}

/// Returns the instant at which `date` begins in `tz`.
///
/// The date's midnight in UTC is moved to `tz` keeping its wall clock, so the
/// result reads `00:00` on the same calendar day in `tz`. Returns `None` if
/// the result is out of range.
pub fn date_in_zone(date: NaiveDate, tz: &Tz) -> Option<DateTime<FixedOffset>> {
    timezone::localize(tz, &date.and_time(NaiveTime::MIN))
}

/// The last day on which the Julian calendar was in effect.
pub fn last_julian_day() -> NaiveDate {
    NaiveDate::from_ymd_opt(1582, 10, 4).unwrap_or(NaiveDate::MIN)
}

/// Returns the number of days by which the Julian calendar lags the
/// Gregorian calendar around `date`, or zero for dates after the 1582
/// calendar reform.
///
/// The lag is `H - H/4 - 2`, where `H` is the number of whole centuries in
/// the (possibly negative) year.
pub fn julian_gregorian_shift(date: &NaiveDate) -> i64 {
    if *date > last_julian_day() {
        return 0;
    }
    let hundreds = i64::from(date.year()) / 100;
    hundreds - hundreds / 4 - 2
}

/// Shifts `date` by [`julian_gregorian_shift`] for display.
///
/// Only the rendering of a value is adjusted; decoded values are never
/// shifted.
pub fn adjust_for_display(date: NaiveDate) -> NaiveDate {
    let shift = julian_gregorian_shift(&date);
    if shift == 0 {
        return date;
    }
    let adjusted = TimeDelta::try_days(shift)
        .and_then(|delta| date.checked_add_signed(delta))
        .unwrap_or(date);
    debug!(%date, %adjusted, shift, "adjusting pre-Gregorian date for display");
    adjusted
}

/// Like [`adjust_for_display`], but for the date part of a wall clock
/// reading.
pub fn adjust_datetime_for_display(dt: NaiveDateTime) -> NaiveDateTime {
    adjust_for_display(dt.date()).and_time(dt.time())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn decodes_day_counts() {
        assert_eq!(decode_date("0"), Ok(ymd(1970, 1, 1)));
        assert_eq!(decode_date("19723"), Ok(ymd(2024, 1, 1)));
        assert_eq!(decode_date("-1"), Ok(ymd(1969, 12, 31)));
        assert_eq!(decode_date("-141441"), Ok(ymd(1582, 10, 1)));
    }

    #[test]
    fn rejects_malformed_day_counts() {
        for token in ["", "1.5", "abc", "99999999999999999"] {
            assert_eq!(decode_date(token), Err(DecodeError::new("date", token)));
        }
    }

    #[test]
    fn gregorian_shift() {
        assert_eq!(julian_gregorian_shift(&ymd(1970, 1, 1)), 0);
        assert_eq!(julian_gregorian_shift(&ymd(1582, 10, 5)), 0);
        assert_eq!(julian_gregorian_shift(&ymd(1582, 10, 4)), 10);
        assert_eq!(julian_gregorian_shift(&ymd(1582, 10, 1)), 10);
        assert_eq!(julian_gregorian_shift(&ymd(1000, 6, 1)), 6);
        assert_eq!(julian_gregorian_shift(&ymd(200, 6, 1)), 0);
        assert_eq!(julian_gregorian_shift(&ymd(100, 6, 1)), -1);
        assert_eq!(julian_gregorian_shift(&ymd(-500, 6, 1)), -6);
    }

    #[test]
    fn display_adjustment() {
        assert_eq!(adjust_for_display(ymd(1970, 1, 1)), ymd(1970, 1, 1));
        assert_eq!(adjust_for_display(ymd(1582, 10, 1)), ymd(1582, 10, 11));
        let dt = ymd(1582, 10, 1).and_hms_opt(8, 30, 0).unwrap();
        assert_eq!(
            adjust_datetime_for_display(dt),
            ymd(1582, 10, 11).and_hms_opt(8, 30, 0).unwrap()
        );
    }

    #[test]
    fn date_moved_to_zone_keeps_calendar_day() {
        let dt = date_in_zone(ymd(2024, 1, 1), &chrono_tz::Asia::Tokyo).unwrap();
        assert_eq!(dt.naive_local(), ymd(2024, 1, 1).and_hms_opt(0, 0, 0).unwrap());
        assert_eq!(dt.timestamp(), 1_704_067_200 - 9 * 3600);
    }
}
