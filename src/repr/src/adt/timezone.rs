// Copyright Materialize, Inc. and contributors. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

//! Time zones attached to temporal values.
//!
//! `TIMESTAMP_TZ` values in the current wire encoding carry a *zone index*:
//! a small integer naming a fixed UTC offset in whole minutes, where index
//! 1440 is UTC and every step of one is one minute east.

use std::fmt;

use chrono::{DateTime, FixedOffset, NaiveDateTime, Offset, TimeDelta, TimeZone};
use chrono_tz::Tz;

/// The zone index of UTC.
pub const ZONE_INDEX_UTC: i64 = 1440;

/// The smallest valid zone index, 23:59 west of UTC.
pub const MIN_ZONE_INDEX: i64 = 1;

/// The largest valid zone index, 23:59 east of UTC.
pub const MAX_ZONE_INDEX: i64 = 2 * ZONE_INDEX_UTC - 1;

/// Maps a zone index to the fixed offset it names, or `None` if the index is
/// outside of [`MIN_ZONE_INDEX`]..=[`MAX_ZONE_INDEX`].
pub fn zone_from_index(index: i64) -> Option<FixedOffset> {
    if !(MIN_ZONE_INDEX..=MAX_ZONE_INDEX).contains(&index) {
        return None;
    }
    let minutes = i32::try_from(index - ZONE_INDEX_UTC).ok()?;
    FixedOffset::east_opt(minutes * 60)
}

/// Maps a fixed offset back to its zone index, or `None` if the offset is
/// not a whole number of minutes.
pub fn index_from_zone(offset: &FixedOffset) -> Option<i64> {
    let secs = offset.local_minus_utc();
    if secs % 60 != 0 {
        return None;
    }
    Some(ZONE_INDEX_UTC + i64::from(secs / 60))
}

/// Interprets `local` as a wall clock reading in `tz`.
///
/// Ambiguous readings (the repeated hour when clocks fall back) resolve to
/// the earlier instant. Readings that do not exist (the skipped hour when
/// clocks spring forward) use the offset in effect at the same UTC reading.
/// Returns `None` only if the result is out of range.
pub fn localize(tz: &Tz, local: &NaiveDateTime) -> Option<DateTime<FixedOffset>> {
    let offset = match tz.offset_from_local_datetime(local).earliest() {
        Some(offset) => offset.fix(),
        None => tz.offset_from_utc_datetime(local).fix(),
    };
    let utc = local.checked_sub_signed(TimeDelta::seconds(i64::from(offset.local_minus_utc())))?;
    Some(DateTime::from_naive_utc_and_offset(utc, offset))
}

/// The time zone associated with a timestamp.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimestampZone {
    /// A named zone from the tz database, e.g. the session time zone.
    Named(Tz),
    /// A fixed offset from UTC, as carried by `TIMESTAMP_TZ` values.
    Fixed(FixedOffset),
    /// The zone could not be determined from the value's text.
    ///
    /// Produced by the legacy `TIMESTAMP_TZ` wire encoding, in which the zone
    /// is folded into the low digits of the binary value. The caller must
    /// resolve it with [`Timestamp::resolve_zone`] before the value can be
    /// converted to an instant or formatted.
    ///
    /// [`Timestamp::resolve_zone`]: crate::adt::timestamp::Timestamp::resolve_zone
    Unresolved,
}

impl TimestampZone {
    /// UTC, the zone of every `TIMESTAMP_NTZ` value.
    pub const UTC: TimestampZone = TimestampZone::Named(Tz::UTC);

    /// Returns the offset from UTC in effect in this zone at the given UTC
    /// wall clock, or `None` if the zone is unresolved.
    pub fn offset_at(&self, utc: &NaiveDateTime) -> Option<FixedOffset> {
        match self {
            TimestampZone::Named(tz) => Some(tz.offset_from_utc_datetime(utc).fix()),
            TimestampZone::Fixed(offset) => Some(*offset),
            TimestampZone::Unresolved => None,
        }
    }
}

impl From<Tz> for TimestampZone {
    fn from(tz: Tz) -> TimestampZone {
        TimestampZone::Named(tz)
    }
}

impl From<FixedOffset> for TimestampZone {
    fn from(offset: FixedOffset) -> TimestampZone {
        TimestampZone::Fixed(offset)
    }
}

impl fmt::Display for TimestampZone {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            TimestampZone::Named(tz) => f.write_str(tz.name()),
            TimestampZone::Fixed(offset) => offset.fmt(f),
            TimestampZone::Unresolved => f.write_str("<unresolved>"),
        }
    }
}
