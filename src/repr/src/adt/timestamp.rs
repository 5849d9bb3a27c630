// Copyright Materialize, Inc. and contributors. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

//! The three flavors of timestamp and their wire encodings.
//!
//! All timestamps are transmitted as fixed-point seconds since the Unix
//! epoch, `SECONDS[.FRACTION]`, and are decoded into a [`Timestamp`]: the
//! exact epoch offset, its scale, and a zone. The zone is only used when the
//! value is displayed or converted to a wall clock; the stored offset is never
//! adjusted for it.

use chrono::{DateTime, FixedOffset, NaiveDateTime, Utc};
use chrono_tz::Tz;
use tracing::trace;

use crate::DecodeError;
use crate::adt::numeric::{FixedPoint, Scale, decode_fixed_point};
use crate::adt::timezone::{self, TimestampZone};

/// The flavor of a timestamp column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TimestampKind {
    /// `TIMESTAMP_NTZ`: a wall clock reading with no zone, carried as UTC.
    Ntz,
    /// `TIMESTAMP_LTZ`: an instant displayed in the session time zone.
    Ltz,
    /// `TIMESTAMP_TZ`: an instant with its own UTC offset.
    Tz,
}

/// The wire encoding used for `TIMESTAMP_TZ` values in a result.
///
/// Selected once per result from the result version the server reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TzEncoding {
    /// `SECONDS[.FRACTION]`, with the zone folded into the binary value and
    /// therefore not recoverable from the text.
    #[default]
    Legacy,
    /// `SECONDS[.FRACTION] ZONEINDEX`.
    Current,
}

impl TzEncoding {
    /// Returns the encoding used by results of the given version.
    pub fn from_result_version(version: i64) -> TzEncoding {
        if version > 0 {
            TzEncoding::Current
        } else {
            TzEncoding::Legacy
        }
    }
}

/// An error converting a [`Timestamp`] to a calendar value.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TimestampError {
    /// The zone of a legacy-encoded value has not been resolved.
    #[error(
        "the time zone of a TIMESTAMP_TZ value in the legacy encoding must be resolved \
         from its binary value"
    )]
    UnresolvedZone,
    /// The value does not fit in the supported calendar range.
    #[error("timestamp out of range: {0}")]
    OutOfRange(FixedPoint),
}

/// A decoded timestamp: an exact offset from the Unix epoch, the scale it was
/// transmitted at, and the zone it should be displayed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timestamp {
    value: FixedPoint,
    zone: TimestampZone,
}

impl Timestamp {
    /// Constructs a timestamp from an epoch offset and a zone.
    pub fn new(value: FixedPoint, zone: TimestampZone) -> Timestamp {
        Timestamp { value, zone }
    }

    /// Returns the epoch offset, in units of `10^-scale` seconds.
    pub fn fractions(&self) -> i128 {
        self.value.fractions
    }

    /// Returns the scale of the epoch offset.
    pub fn scale(&self) -> Scale {
        self.value.scale
    }

    /// Returns the epoch offset as a fixed-point value.
    pub fn value(&self) -> FixedPoint {
        self.value
    }

    /// Returns the zone this timestamp is displayed in.
    pub fn zone(&self) -> TimestampZone {
        self.zone
    }

    /// Returns a copy of this timestamp displayed in `offset`.
    ///
    /// This is how callers complete a legacy-encoded `TIMESTAMP_TZ` value once
    /// they have recovered its zone from the binary value.
    pub fn resolve_zone(self, offset: FixedOffset) -> Timestamp {
        Timestamp {
            value: self.value,
            zone: TimestampZone::Fixed(offset),
        }
    }

    /// Returns the instant this timestamp denotes.
    pub fn instant(&self) -> Result<DateTime<Utc>, TimestampError> {
        if self.zone == TimestampZone::Unresolved {
            return Err(TimestampError::UnresolvedZone);
        }
        let (secs, nanos) = self.value.split();
        i64::try_from(secs)
            .ok()
            .and_then(|secs| DateTime::from_timestamp(secs, nanos))
            .ok_or(TimestampError::OutOfRange(self.value))
    }

    /// Returns the UTC wall clock reading of this timestamp.
    pub fn naive_utc(&self) -> Result<NaiveDateTime, TimestampError> {
        Ok(self.instant()?.naive_utc())
    }

    /// Returns this timestamp as an instant in its own zone.
    pub fn local(&self) -> Result<DateTime<FixedOffset>, TimestampError> {
        let utc = self.naive_utc()?;
        let offset = self
            .zone
            .offset_at(&utc)
            .ok_or(TimestampError::UnresolvedZone)?;
        Ok(DateTime::from_naive_utc_and_offset(utc, offset))
    }

    /// Treats the UTC wall clock reading of this timestamp as a reading in
    /// `tz` and returns the instant that denotes.
    ///
    /// This is how `TIMESTAMP_NTZ` values are surfaced when the client asks
    /// for them to be interpreted in its own zone: `2024-01-01 12:00` stays
    /// `12:00`, but in `tz` rather than in UTC.
    pub fn reinterpret_in(&self, tz: &Tz) -> Result<DateTime<Utc>, TimestampError> {
        let wall = self.naive_utc()?;
        timezone::localize(tz, &wall)
            .map(|dt| dt.with_timezone(&Utc))
            .ok_or(TimestampError::OutOfRange(self.value))
    }

    /// Renders this timestamp in the wire grammar for `kind`, the inverse of
    /// [`decode_timestamp`] in the current encoding.
    ///
    /// Returns `None` for a `TIMESTAMP_TZ` value whose zone is not a whole
    /// number of minutes from UTC.
    pub fn encode(&self, kind: TimestampKind) -> Option<String> {
        match kind {
            TimestampKind::Ntz | TimestampKind::Ltz => Some(self.value.encode()),
            TimestampKind::Tz => {
                let utc = self.naive_utc().ok()?;
                let offset = self.zone.offset_at(&utc)?;
                let index = timezone::index_from_zone(&offset)?;
                Some(format!("{} {}", self.value.encode(), index))
            }
        }
    }
}

/// Decodes a timestamp token of the given kind.
///
/// `session_zone` is the zone `TIMESTAMP_LTZ` values are displayed in;
/// `encoding` selects the grammar of `TIMESTAMP_TZ` tokens.
pub fn decode_timestamp(
    token: &str,
    kind: TimestampKind,
    scale: Scale,
    session_zone: Tz,
    encoding: TzEncoding,
) -> Result<Timestamp, DecodeError> {
    match kind {
        TimestampKind::Ntz => {
            let value = decode_fixed_point("timestamp", token, scale)?;
            Ok(Timestamp::new(value, TimestampZone::UTC))
        }
        TimestampKind::Ltz => {
            let value = decode_fixed_point("timestamp", token, scale)?;
            Ok(Timestamp::new(value, TimestampZone::Named(session_zone)))
        }
        TimestampKind::Tz => match encoding {
            TzEncoding::Current => {
                trace!(token, "decoding TIMESTAMP_TZ in the current encoding");
                let err = || DecodeError::new("timestamp", token);
                let (secs, index) = token.split_once(' ').ok_or_else(err)?;
                let value = decode_fixed_point("timestamp", secs, scale).map_err(|_| err())?;
                let offset = index
                    .parse::<i64>()
                    .ok()
                    .and_then(timezone::zone_from_index)
                    .ok_or_else(err)?;
                Ok(Timestamp::new(value, TimestampZone::Fixed(offset)))
            }
            TzEncoding::Legacy => {
                trace!(token, "decoding TIMESTAMP_TZ in the legacy encoding");
                let value = decode_fixed_point("timestamp", token, scale)?;
                Ok(Timestamp::new(value, TimestampZone::Unresolved))
            }
        },
    }
}
