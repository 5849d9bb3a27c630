// Copyright Materialize, Inc. and contributors. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

//! Times of day.

use chrono::{NaiveTime, Timelike};

use crate::DecodeError;
use crate::adt::numeric::{FixedPoint, Scale, decode_fixed_point};

/// The number of seconds in a day.
const SECONDS_PER_DAY: i128 = 86_400;

/// A decoded time of day, with no associated zone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Time {
    value: FixedPoint,
    time: NaiveTime,
}

impl Time {
    /// Returns the offset from midnight, in units of `10^-scale` seconds.
    pub fn fractions(&self) -> i128 {
        self.value.fractions
    }

    /// Returns the scale of the offset from midnight.
    pub fn scale(&self) -> Scale {
        self.value.scale
    }

    /// Returns the clock value.
    pub fn naive(&self) -> NaiveTime {
        self.time
    }

    /// Returns the offset from midnight truncated to whole milliseconds.
    pub fn millis(&self) -> u32 {
        self.time.num_seconds_from_midnight() * 1000 + self.time.nanosecond() / 1_000_000
    }
}

/// Decodes a time token, fixed-point seconds since midnight at `scale`.
pub fn decode_time(token: &str, scale: Scale) -> Result<Time, DecodeError> {
    let value = decode_fixed_point("time", token, scale)?;
    let err = || DecodeError::new("time", token);
    if !(0..SECONDS_PER_DAY * scale.fractions_per_second()).contains(&value.fractions) {
        return Err(err());
    }
    let (secs, nanos) = value.split();
    let secs = u32::try_from(secs).map_err(|_| err())?;
    let time = NaiveTime::from_num_seconds_from_midnight_opt(secs, nanos).ok_or_else(err)?;
    Ok(Time { value, time })
}
