// Copyright Materialize, Inc. and contributors. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

//! Exact decimal arithmetic, largely a wrapper around [`rust-dec`].
//!
//! Two shapes of decimal flow through a result: `FIXED` column values, which
//! are surfaced to callers as [`Numeric`], and the fixed-point "seconds since
//! epoch" encoding of the temporal types, which is normalized to an integer
//! count of fractions by [`decode_fixed_point`]. Both are parsed with decimal
//! rather than binary floating point arithmetic so that nanosecond values
//! survive intact.
//!
//! [`rust-dec`]: https://github.com/MaterializeInc/rust-dec/

use std::fmt;
use std::sync::LazyLock;

use dec::{Context, Decimal, Rounding};
use serde::{Deserialize, Serialize};

use crate::DecodeError;

/// The number of internal decimal units in a [`Numeric`] value.
pub const NUMERIC_DATUM_WIDTH: u8 = 13;

/// The value of [`NUMERIC_DATUM_WIDTH`] as a [`usize`].
pub const NUMERIC_DATUM_WIDTH_USIZE: usize = 13;

/// The maximum number of digits expressable in a [`Numeric`] value.
pub const NUMERIC_DATUM_MAX_PRECISION: u8 = NUMERIC_DATUM_WIDTH * 3;

/// A numeric value.
pub type Numeric = Decimal<NUMERIC_DATUM_WIDTH_USIZE>;

static CX_DATUM: LazyLock<Context<Numeric>> = LazyLock::new(Context::<Numeric>::default);

/// Returns a new context appropriate for operating on numeric datums.
pub fn cx_datum() -> Context<Numeric> {
    CX_DATUM.clone()
}

/// Parses `s` as an exact decimal.
///
/// Special values (`NaN`, `Infinity`) and values that would need more than
/// [`NUMERIC_DATUM_MAX_PRECISION`] digits are rejected rather than rounded.
pub fn parse_numeric(s: &str) -> Result<Numeric, DecodeError> {
    let mut cx = cx_datum();
    let n = cx
        .parse(s)
        .map_err(|_| DecodeError::new("numeric", s))?;
    if n.is_special() || cx.status().any() {
        return Err(DecodeError::new("numeric", s));
    }
    Ok(n)
}

/// Rescales `n` to exactly `scale` fractional digits, rounding half away from
/// zero when digits are dropped and padding with zeros when they are added.
///
/// Returns `false` if the result does not fit in a [`Numeric`].
pub fn rescale_half_up(n: &mut Numeric, scale: u8) -> bool {
    let mut cx = cx_datum();
    cx.set_rounding(Rounding::HalfUp);
    cx.rescale(n, &Numeric::from(-i32::from(scale)));
    !cx.status().invalid_operation()
}

/// Returns the number of fractional digits in `n`.
pub fn get_scale(n: &Numeric) -> u32 {
    let exp = n.exponent();
    if exp >= 0 { 0 } else { exp.unsigned_abs() }
}

/// The scale of a temporal value: the number of fractional decimal digits of
/// a second that it retains.
///
/// This newtype wrapper ensures that the scale is within `[0, 9]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Scale(u8);

impl Scale {
    /// A scale of zero, i.e. whole seconds.
    pub const ZERO: Scale = Scale(0);
    /// Milliseconds.
    pub const MILLIS: Scale = Scale(3);
    /// The finest scale, nanoseconds.
    pub const MAX: Scale = Scale(9);

    /// Consumes the newtype wrapper, returning the inner `u8`.
    pub fn into_u8(self) -> u8 {
        self.0
    }

    /// Returns `10^scale`, i.e. the number of fractions in one second.
    pub fn fractions_per_second(self) -> i128 {
        10_i128.pow(u32::from(self.0))
    }

    /// Returns the number of nanoseconds in one fraction.
    pub fn nanos_per_fraction(self) -> u32 {
        10_u32.pow(u32::from(Scale::MAX.0 - self.0))
    }
}

impl TryFrom<u8> for Scale {
    type Error = InvalidScaleError;

    fn try_from(scale: u8) -> Result<Self, Self::Error> {
        if scale <= Scale::MAX.0 {
            Ok(Scale(scale))
        } else {
            Err(InvalidScaleError(scale))
        }
    }
}

impl fmt::Display for Scale {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// The error returned when constructing a [`Scale`] outside of `[0, 9]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("scale {0} for temporal type must be between 0 and 9")]
pub struct InvalidScaleError(pub u8);

/// A fixed-point decimal, stored as an integer count of `10^-scale` units.
///
/// The temporal types are transmitted as `SECONDS[.FRACTION]`; a
/// `FixedPoint` is that value multiplied out by `10^scale` so that it can be
/// carried around exactly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FixedPoint {
    /// The value in units of `10^-scale`.
    pub fractions: i128,
    /// The number of fractional digits.
    pub scale: Scale,
}

impl FixedPoint {
    /// Splits this value into whole units and a nonnegative nanosecond
    /// remainder, flooring toward negative infinity so that pre-epoch values
    /// resolve to the correct instant.
    pub fn split(&self) -> (i128, u32) {
        let per = self.scale.fractions_per_second();
        let whole = self.fractions.div_euclid(per);
        let rem = u32::try_from(self.fractions.rem_euclid(per))
            .expect("remainder is smaller than 10^9");
        (whole, rem * self.scale.nanos_per_fraction())
    }

    /// Renders this value in the wire grammar, `SECONDS[.FRACTION]`, with
    /// exactly `scale` fractional digits.
    pub fn encode(&self) -> String {
        let per = self.scale.fractions_per_second();
        let sign = if self.fractions < 0 { "-" } else { "" };
        let abs = self.fractions.unsigned_abs();
        let per = per.unsigned_abs();
        let (whole, frac) = (abs / per, abs % per);
        match self.scale.into_u8() {
            0 => format!("{sign}{whole}"),
            width => format!("{sign}{whole}.{frac:0width$}", width = usize::from(width)),
        }
    }
}

impl fmt::Display for FixedPoint {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(&self.encode())
    }
}

/// Parses a token of the form `SECONDS[.FRACTION]` into a [`FixedPoint`]
/// with the given scale.
///
/// Digits beyond `scale` are truncated toward zero. `what` names the
/// representation being decoded in the error.
pub fn decode_fixed_point(
    what: &'static str,
    token: &str,
    scale: Scale,
) -> Result<FixedPoint, DecodeError> {
    let err = || DecodeError::new(what, token);
    let mut cx = cx_datum();
    let mut d = cx.parse(token).map_err(|_| err())?;
    if d.is_special() || cx.status().any() {
        return Err(err());
    }
    cx.scaleb(&mut d, &Numeric::from(i32::from(scale.into_u8())));
    cx.set_rounding(Rounding::Down);
    cx.rescale(&mut d, &Numeric::zero());
    if cx.status().invalid_operation() {
        return Err(err());
    }
    let fractions = i128::try_from(d).map_err(|_| err())?;
    Ok(FixedPoint { fractions, scale })
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    fn scale(s: u8) -> Scale {
        Scale::try_from(s).unwrap()
    }

    #[test]
    fn decodes_seconds_and_fractions() {
        let fp = decode_fixed_point("timestamp", "1234567890.123456789", Scale::MAX).unwrap();
        assert_eq!(fp.fractions, 1_234_567_890_123_456_789);
        assert_eq!(fp.split(), (1_234_567_890, 123_456_789));

        let fp = decode_fixed_point("timestamp", "-1.5", scale(3)).unwrap();
        assert_eq!(fp.fractions, -1500);
        assert_eq!(fp.split(), (-2, 500_000_000));

        let fp = decode_fixed_point("time", "3600", Scale::ZERO).unwrap();
        assert_eq!(fp.fractions, 3600);
    }

    #[test]
    fn truncates_excess_digits() {
        let fp = decode_fixed_point("time", "1.999", scale(1)).unwrap();
        assert_eq!(fp.fractions, 19);
        let fp = decode_fixed_point("time", "-1.999", scale(1)).unwrap();
        assert_eq!(fp.fractions, -19);
    }

    #[test]
    fn rejects_malformed_tokens() {
        for token in ["", "abc", "1.2.3", "NaN", "Infinity", "12 34", "1,5"] {
            let err = decode_fixed_point("timestamp", token, scale(3)).unwrap_err();
            assert_eq!(err, DecodeError::new("timestamp", token));
        }
    }

    #[test]
    fn scale_bounds() {
        assert_eq!(Scale::try_from(9), Ok(Scale::MAX));
        assert_eq!(Scale::try_from(10), Err(InvalidScaleError(10)));
        assert_eq!(scale(3).fractions_per_second(), 1000);
        assert_eq!(scale(3).nanos_per_fraction(), 1_000_000);
    }

    #[test]
    fn rescale_rounds_half_up() {
        let mut n = parse_numeric("1.2345").unwrap();
        assert!(rescale_half_up(&mut n, 3));
        assert_eq!(n.to_standard_notation_string(), "1.235");

        let mut n = parse_numeric("-2.5").unwrap();
        assert!(rescale_half_up(&mut n, 0));
        assert_eq!(n.to_standard_notation_string(), "-3");

        let mut n = parse_numeric("7").unwrap();
        assert!(rescale_half_up(&mut n, 2));
        assert_eq!(n.to_standard_notation_string(), "7.00");
        assert_eq!(get_scale(&n), 2);
    }

    #[test]
    fn parse_numeric_rejects_specials() {
        assert!(parse_numeric("NaN").is_err());
        assert!(parse_numeric("-Infinity").is_err());
        assert!(parse_numeric("12x").is_err());
        assert_eq!(get_scale(&parse_numeric("10.50").unwrap()), 2);
    }

    fn arb_token() -> impl Strategy<Value = (String, Scale)> {
        (any::<bool>(), 0u64..=99_999_999_999, 0u8..=9, any::<u32>()).prop_map(
            |(neg, whole, s, frac)| {
                let s = scale(s);
                let frac = u128::from(frac) % s.fractions_per_second().unsigned_abs();
                let body = match s.into_u8() {
                    0 => whole.to_string(),
                    w => format!("{whole}.{frac:0w$}", w = usize::from(w)),
                };
                let neg = neg && (whole != 0 || frac != 0);
                (format!("{}{body}", if neg { "-" } else { "" }), s)
            },
        )
    }

    proptest! {
        #[test]
        fn fixed_point_roundtrips((token, s) in arb_token()) {
            let fp = decode_fixed_point("timestamp", &token, s).unwrap();
            prop_assert_eq!(fp.encode(), token);
        }
    }
}
