// Copyright Materialize, Inc. and contributors. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

//! Decoding of raw tokens into typed values.
//!
//! Each `decode_*` function converts one non-null token of a column into one
//! representation. Null tokens never reach these functions; the cursor maps
//! them to the representation's empty value.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveTime, Utc};
use chrono_tz::Tz;
use sf_repr::adt::binary::{BinaryFormat, decode_hex};
use sf_repr::adt::date::{self, decode_date};
use sf_repr::adt::numeric::{Numeric, Scale, parse_numeric, rescale_half_up};
use sf_repr::adt::time::{Time, decode_time};
use sf_repr::adt::timestamp::{Timestamp, decode_timestamp};
use sf_repr::{ColumnType, DecodeError, ScalarType};

use crate::context::DecodingContext;
use crate::error::Error;

/// A decoded column value.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// A string.
    Text(String),
    /// A boolean.
    Bool(bool),
    /// A 16-bit signed integer.
    Int2(i16),
    /// A 32-bit signed integer.
    Int4(i32),
    /// A 64-bit signed integer.
    Int8(i64),
    /// A single precision floating point number.
    Float4(f32),
    /// A double precision floating point number.
    Float8(f64),
    /// An exact decimal.
    Numeric(Numeric),
    /// A byte string.
    Bytes(Vec<u8>),
    /// A calendar date.
    Date(NaiveDate),
    /// A time of day.
    Time(NaiveTime),
    /// An instant.
    Timestamp(DateTime<Utc>),
}

/// A representation that a caller may ask a column to be read as.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Representation {
    String,
    Boolean,
    Short,
    Int,
    Long,
    Float,
    Double,
    Decimal,
    Bytes,
    Date,
    Time,
    Timestamp,
    /// Whatever representation suits the column's type.
    Object,
    Array,
    Struct,
    Ref,
    Blob,
    Clob,
    CharacterStream,
    BinaryStream,
    Url,
    RowId,
    Xml,
}

impl Representation {
    /// Whether any column can be read in this representation.
    pub fn is_supported(&self) -> bool {
        match self {
            Representation::String
            | Representation::Boolean
            | Representation::Short
            | Representation::Int
            | Representation::Long
            | Representation::Float
            | Representation::Double
            | Representation::Decimal
            | Representation::Bytes
            | Representation::Date
            | Representation::Time
            | Representation::Timestamp
            | Representation::Object => true,
            Representation::Array
            | Representation::Struct
            | Representation::Ref
            | Representation::Blob
            | Representation::Clob
            | Representation::CharacterStream
            | Representation::BinaryStream
            | Representation::Url
            | Representation::RowId
            | Representation::Xml => false,
        }
    }
}

impl fmt::Display for Representation {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(match self {
            Representation::String => "string",
            Representation::Boolean => "boolean",
            Representation::Short => "short",
            Representation::Int => "int",
            Representation::Long => "long",
            Representation::Float => "float",
            Representation::Double => "double",
            Representation::Decimal => "decimal",
            Representation::Bytes => "bytes",
            Representation::Date => "date",
            Representation::Time => "time",
            Representation::Timestamp => "timestamp",
            Representation::Object => "object",
            Representation::Array => "array",
            Representation::Struct => "struct",
            Representation::Ref => "ref",
            Representation::Blob => "blob",
            Representation::Clob => "clob",
            Representation::CharacterStream => "character stream",
            Representation::BinaryStream => "binary stream",
            Representation::Url => "url",
            Representation::RowId => "row id",
            Representation::Xml => "xml",
        })
    }
}

fn unsupported(typ: &ColumnType, repr: Representation) -> Error {
    Error::Unsupported(format!("reading a {} column as {repr}", typ.scalar_type))
}

fn column_scale(typ: &ColumnType) -> Result<Scale, Error> {
    Scale::try_from(typ.scale).map_err(|e| Error::Configuration(e.to_string()))
}

/// Whether the token of a `typ` column is plain numeric or boolean text.
fn is_textual_number(typ: &ColumnType) -> bool {
    typ.scalar_type.is_numeric() || matches!(typ.scalar_type, ScalarType::String | ScalarType::Boolean)
}

/// Decodes a token as `repr`.
pub fn decode_as(
    repr: Representation,
    token: &str,
    typ: &ColumnType,
    cx: &DecodingContext,
) -> Result<Value, Error> {
    match repr {
        Representation::String => decode_string(token, typ, cx).map(Value::Text),
        Representation::Boolean => decode_boolean(token, typ).map(Value::Bool),
        Representation::Short => decode_short(token, typ).map(Value::Int2),
        Representation::Int => decode_int(token, typ).map(Value::Int4),
        Representation::Long => decode_long(token, typ).map(Value::Int8),
        Representation::Float => decode_float(token, typ).map(Value::Float4),
        Representation::Double => decode_double(token, typ).map(Value::Float8),
        Representation::Decimal => decode_decimal(token, typ).map(Value::Numeric),
        Representation::Bytes => decode_bytes(token, typ).map(Value::Bytes),
        Representation::Date => decode_date_value(token, typ, cx).map(Value::Date),
        Representation::Time => decode_time_value(token, typ, cx).map(Value::Time),
        Representation::Timestamp => decode_timestamp_value(token, typ, cx).map(Value::Timestamp),
        Representation::Object => decode_object(token, typ, cx),
        _ => Err(unsupported(typ, repr)),
    }
}

/// Renders a token as text.
///
/// Temporal values are rendered with the session's output pattern for their
/// type, which must be configured. Binary values are rendered in the
/// session's binary format. Booleans render as `TRUE` or `FALSE`.
pub fn decode_string(token: &str, typ: &ColumnType, cx: &DecodingContext) -> Result<String, Error> {
    match typ.scalar_type {
        ScalarType::Boolean => Ok(match token {
            "1" => "TRUE".into(),
            "0" => "FALSE".into(),
            other => other.into(),
        }),
        ScalarType::TimestampNtz | ScalarType::TimestampLtz | ScalarType::TimestampTz => {
            let ts = decode_sf_timestamp(token, typ, cx)?;
            let kind = typ
                .scalar_type
                .timestamp_kind()
                .ok_or_else(|| unsupported(typ, Representation::String))?;
            Ok(cx.timestamp_format(kind)?.format_timestamp(&ts)?)
        }
        ScalarType::Date => {
            let format = cx.date_format()?;
            Ok(format.format_date(decode_date(token)?))
        }
        ScalarType::Time => {
            let format = cx.time_format()?;
            Ok(format.format_time(&decode_time(token, column_scale(typ)?)?))
        }
        ScalarType::Binary => match cx.binary_format() {
            BinaryFormat::Hex => Ok(token.into()),
            format => Ok(format.encode(&decode_hex(token)?)),
        },
        ScalarType::String
        | ScalarType::SmallInt
        | ScalarType::Integer
        | ScalarType::BigInt
        | ScalarType::Decimal
        | ScalarType::Double => Ok(token.into()),
    }
}

/// Decodes a token as a boolean.
///
/// Only the token `1` is true. Every other token, including `true`, is false
/// rather than an error, for compatibility with existing clients.
pub fn decode_boolean(token: &str, typ: &ColumnType) -> Result<bool, Error> {
    if !is_textual_number(typ) {
        return Err(unsupported(typ, Representation::Boolean));
    }
    Ok(token == "1")
}

/// Decodes a token as an integer. Fractional digits and exponents are
/// rejected.
fn decode_integer<T>(
    what: &'static str,
    repr: Representation,
    token: &str,
    typ: &ColumnType,
) -> Result<T, Error>
where
    T: FromStr,
{
    if !is_textual_number(typ) {
        return Err(unsupported(typ, repr));
    }
    token
        .parse::<T>()
        .map_err(|_| DecodeError::new(what, token).into())
}

pub fn decode_short(token: &str, typ: &ColumnType) -> Result<i16, Error> {
    decode_integer("short", Representation::Short, token, typ)
}

pub fn decode_int(token: &str, typ: &ColumnType) -> Result<i32, Error> {
    decode_integer("int", Representation::Int, token, typ)
}

pub fn decode_long(token: &str, typ: &ColumnType) -> Result<i64, Error> {
    decode_integer("long", Representation::Long, token, typ)
}

pub fn decode_float(token: &str, typ: &ColumnType) -> Result<f32, Error> {
    if !is_textual_number(typ) {
        return Err(unsupported(typ, Representation::Float));
    }
    token
        .parse()
        .map_err(|_| DecodeError::new("float", token).into())
}

pub fn decode_double(token: &str, typ: &ColumnType) -> Result<f64, Error> {
    if !is_textual_number(typ) {
        return Err(unsupported(typ, Representation::Double));
    }
    token
        .parse()
        .map_err(|_| DecodeError::new("double", token).into())
}

/// Decodes a token as an exact decimal at the token's own scale.
pub fn decode_decimal(token: &str, typ: &ColumnType) -> Result<Numeric, Error> {
    if !is_textual_number(typ) {
        return Err(unsupported(typ, Representation::Decimal));
    }
    Ok(parse_numeric(token)?)
}

/// Decodes a token as an exact decimal with exactly `scale` fractional
/// digits, rounding half away from zero.
pub fn decode_decimal_with_scale(
    token: &str,
    typ: &ColumnType,
    scale: u8,
) -> Result<Numeric, Error> {
    let mut n = decode_decimal(token, typ)?;
    if !rescale_half_up(&mut n, scale) {
        return Err(DecodeError::new("numeric", token).into());
    }
    Ok(n)
}

/// Decodes a hex token as bytes.
pub fn decode_bytes(token: &str, typ: &ColumnType) -> Result<Vec<u8>, Error> {
    match typ.scalar_type {
        ScalarType::Binary | ScalarType::String => Ok(decode_hex(token)?),
        _ => Err(unsupported(typ, Representation::Bytes)),
    }
}

/// Decodes a token as a calendar date.
///
/// Timestamps yield their date in the client's zone.
pub fn decode_date_value(
    token: &str,
    typ: &ColumnType,
    cx: &DecodingContext,
) -> Result<NaiveDate, Error> {
    let zone = cx.client_zone();
    match typ.scalar_type {
        ScalarType::Date => Ok(decode_date(token)?),
        ScalarType::TimestampNtz | ScalarType::TimestampLtz | ScalarType::TimestampTz => {
            let instant = decode_timestamp_in(token, typ, cx, &zone)?;
            Ok(instant.with_timezone(&zone).date_naive())
        }
        _ => Err(unsupported(typ, Representation::Date)),
    }
}

/// Decodes a token as the instant at which its date begins in `zone`.
pub fn decode_date_in(
    token: &str,
    typ: &ColumnType,
    cx: &DecodingContext,
    zone: &Tz,
) -> Result<DateTime<FixedOffset>, Error> {
    let d = match typ.scalar_type {
        ScalarType::Date => decode_date(token)?,
        ScalarType::TimestampNtz | ScalarType::TimestampLtz | ScalarType::TimestampTz => {
            decode_timestamp_in(token, typ, cx, zone)?
                .with_timezone(zone)
                .date_naive()
        }
        _ => return Err(unsupported(typ, Representation::Date)),
    };
    date::date_in_zone(d, zone).ok_or_else(|| DecodeError::new("date", token).into())
}

/// Decodes a `TIME` token, keeping its scale.
pub fn decode_sf_time(token: &str, typ: &ColumnType) -> Result<Time, Error> {
    match typ.scalar_type {
        ScalarType::Time => Ok(decode_time(token, column_scale(typ)?)?),
        _ => Err(unsupported(typ, Representation::Time)),
    }
}

/// Decodes a token as a time of day.
///
/// Timestamps yield their wall clock time in the client's zone.
pub fn decode_time_value(
    token: &str,
    typ: &ColumnType,
    cx: &DecodingContext,
) -> Result<NaiveTime, Error> {
    let zone = cx.client_zone();
    match typ.scalar_type {
        ScalarType::Time => Ok(decode_sf_time(token, typ)?.naive()),
        ScalarType::TimestampNtz | ScalarType::TimestampLtz | ScalarType::TimestampTz => {
            let instant = decode_timestamp_in(token, typ, cx, &zone)?;
            Ok(instant.with_timezone(&zone).time())
        }
        _ => Err(unsupported(typ, Representation::Time)),
    }
}

/// Decodes a timestamp token into its epoch offset, scale and zone, without
/// any adjustment.
pub fn decode_sf_timestamp(
    token: &str,
    typ: &ColumnType,
    cx: &DecodingContext,
) -> Result<Timestamp, Error> {
    let kind = typ
        .scalar_type
        .timestamp_kind()
        .ok_or_else(|| unsupported(typ, Representation::Timestamp))?;
    let scale = column_scale(typ)?;
    Ok(decode_timestamp(
        token,
        kind,
        scale,
        cx.client_zone(),
        cx.tz_encoding(),
    )?)
}

/// Decodes a token as an instant, surfacing `TIMESTAMP_NTZ` wall clock
/// readings in `zone` when the session asks for it.
///
/// Dates yield the instant at which they begin in `zone`.
pub fn decode_timestamp_in(
    token: &str,
    typ: &ColumnType,
    cx: &DecodingContext,
    zone: &Tz,
) -> Result<DateTime<Utc>, Error> {
    match typ.scalar_type {
        ScalarType::TimestampNtz => {
            let ts = decode_sf_timestamp(token, typ, cx)?;
            if cx.honor_client_tz_for_ntz() {
                Ok(ts.reinterpret_in(zone)?)
            } else {
                Ok(ts.instant()?)
            }
        }
        ScalarType::TimestampLtz | ScalarType::TimestampTz => {
            Ok(decode_sf_timestamp(token, typ, cx)?.instant()?)
        }
        ScalarType::Date => Ok(decode_date_in(token, typ, cx, zone)?.with_timezone(&Utc)),
        _ => Err(unsupported(typ, Representation::Timestamp)),
    }
}

/// Like [`decode_timestamp_in`], in the client's zone.
pub fn decode_timestamp_value(
    token: &str,
    typ: &ColumnType,
    cx: &DecodingContext,
) -> Result<DateTime<Utc>, Error> {
    decode_timestamp_in(token, typ, cx, &cx.client_zone())
}

/// Decodes a token into the representation that suits its column's type.
pub fn decode_object(token: &str, typ: &ColumnType, cx: &DecodingContext) -> Result<Value, Error> {
    match typ.scalar_type {
        ScalarType::String => Ok(Value::Text(token.into())),
        ScalarType::Boolean => decode_boolean(token, typ).map(Value::Bool),
        ScalarType::SmallInt | ScalarType::Integer => decode_int(token, typ).map(Value::Int4),
        ScalarType::BigInt => decode_long(token, typ).map(Value::Int8),
        ScalarType::Decimal => decode_decimal(token, typ).map(Value::Numeric),
        ScalarType::Double => decode_double(token, typ).map(Value::Float8),
        ScalarType::Binary => decode_bytes(token, typ).map(Value::Bytes),
        ScalarType::Date => decode_date_value(token, typ, cx).map(Value::Date),
        ScalarType::Time => decode_time_value(token, typ, cx).map(Value::Time),
        ScalarType::TimestampNtz | ScalarType::TimestampLtz | ScalarType::TimestampTz => {
            decode_timestamp_value(token, typ, cx).map(Value::Timestamp)
        }
    }
}

#[cfg(test)]
mod tests {
    use sf_repr::adt::datetime::DateTimeFormat;
    use sf_repr::adt::timestamp::{TimestampKind, TzEncoding};

    use super::*;
    use crate::error::ErrorKind;

    fn col(typ: ScalarType, scale: u8) -> ColumnType {
        typ.column_type(scale, true)
    }

    fn cx() -> DecodingContext {
        DecodingContext::default()
            .with_client_zone(chrono_tz::America::Los_Angeles)
            .with_tz_encoding(TzEncoding::Current)
            .with_timestamp_format(
                TimestampKind::Ntz,
                DateTimeFormat::compile("YYYY-MM-DD HH24:MI:SS.FF").unwrap(),
            )
            .with_timestamp_format(
                TimestampKind::Tz,
                DateTimeFormat::compile("YYYY-MM-DD HH24:MI:SS TZHTZM").unwrap(),
            )
            .with_date_format(DateTimeFormat::compile("YYYY-MM-DD").unwrap())
            .with_time_format(DateTimeFormat::compile("HH24:MI:SS.FF").unwrap())
    }

    #[test]
    fn boolean_text_and_value() {
        let typ = col(ScalarType::Boolean, 0);
        assert_eq!(decode_string("1", &typ, &cx()).unwrap(), "TRUE");
        assert_eq!(decode_string("0", &typ, &cx()).unwrap(), "FALSE");
        assert_eq!(decode_string("yes", &typ, &cx()).unwrap(), "yes");
        assert_eq!(decode_boolean("1", &typ), Ok(true));
        assert_eq!(decode_boolean("0", &typ), Ok(false));
        // Anything but "1" is false, even text that reads as true.
        assert_eq!(decode_boolean("true", &typ), Ok(false));
        assert_eq!(decode_boolean("2", &typ), Ok(false));
    }

    #[test]
    fn integers() {
        let typ = col(ScalarType::BigInt, 0);
        assert_eq!(decode_long("-42", &typ), Ok(-42));
        assert_eq!(decode_int("7", &col(ScalarType::Decimal, 0)), Ok(7));
        assert_eq!(
            decode_int("7.9", &col(ScalarType::Decimal, 1)),
            Err(DecodeError::new("int", "7.9").into())
        );
        assert_eq!(
            decode_short("-7.9", &col(ScalarType::Decimal, 1)),
            Err(DecodeError::new("short", "-7.9").into())
        );
        assert_eq!(
            decode_long("1e3", &typ),
            Err(DecodeError::new("long", "1e3").into())
        );
        assert_eq!(
            decode_short("40000", &typ),
            Err(DecodeError::new("short", "40000").into())
        );
        assert_eq!(
            decode_int("abc", &typ),
            Err(DecodeError::new("int", "abc").into())
        );
        assert_eq!(
            decode_long("1", &col(ScalarType::Date, 0)).unwrap_err().kind(),
            ErrorKind::Unsupported
        );
    }

    #[test]
    fn floats() {
        let typ = col(ScalarType::Double, 0);
        assert_eq!(decode_double("1.5", &typ), Ok(1.5));
        assert_eq!(decode_float("-0.25", &typ), Ok(-0.25));
        assert!(decode_double("inf", &typ).unwrap().is_infinite());
        assert_eq!(
            decode_double("1.2.3", &typ),
            Err(DecodeError::new("double", "1.2.3").into())
        );
    }

    #[test]
    fn decimals() {
        let typ = col(ScalarType::Decimal, 3);
        let n = decode_decimal("12.345", &typ).unwrap();
        assert_eq!(n.to_standard_notation_string(), "12.345");
        let n = decode_decimal_with_scale("12.345", &typ, 2).unwrap();
        assert_eq!(n.to_standard_notation_string(), "12.35");
        let n = decode_decimal_with_scale("-12.345", &typ, 2).unwrap();
        assert_eq!(n.to_standard_notation_string(), "-12.35");
        let n = decode_decimal_with_scale("12.344", &typ, 2).unwrap();
        assert_eq!(n.to_standard_notation_string(), "12.34");
        let n = decode_decimal_with_scale("12", &typ, 2).unwrap();
        assert_eq!(n.to_standard_notation_string(), "12.00");
        assert_eq!(
            decode_decimal("NaN", &typ),
            Err(DecodeError::new("numeric", "NaN").into())
        );
    }

    #[test]
    fn binary() {
        let typ = col(ScalarType::Binary, 0);
        assert_eq!(
            decode_bytes("deadbeef", &typ),
            Ok(vec![0xde, 0xad, 0xbe, 0xef])
        );
        assert_eq!(decode_string("deadbeef", &typ, &cx()).unwrap(), "deadbeef");
        let base64 = cx().with_binary_format(BinaryFormat::Base64);
        assert_eq!(decode_string("deadbeef", &typ, &base64).unwrap(), "3q2+7w==");
        assert_eq!(
            decode_bytes("abc", &typ),
            Err(DecodeError::new("binary", "abc").into())
        );
        assert_eq!(
            decode_string("abc", &typ, &base64),
            Err(DecodeError::new("binary", "abc").into())
        );
    }

    #[test]
    fn dates() {
        let typ = col(ScalarType::Date, 0);
        assert_eq!(decode_string("0", &typ, &cx()).unwrap(), "1970-01-01");
        assert_eq!(decode_string("-141441", &typ, &cx()).unwrap(), "1582-10-11");
        assert_eq!(
            decode_date_value("-141441", &typ, &cx()),
            Ok(NaiveDate::from_ymd_opt(1582, 10, 1).unwrap())
        );
        let midnight = decode_date_in("19723", &typ, &cx(), &chrono_tz::Asia::Tokyo).unwrap();
        assert_eq!(midnight.timestamp(), 1_704_067_200 - 9 * 3600);
        assert_eq!(
            decode_timestamp_value("19723", &typ, &cx()).unwrap().timestamp(),
            1_704_067_200 + 8 * 3600
        );
    }

    #[test]
    fn times() {
        let typ = col(ScalarType::Time, 3);
        assert_eq!(decode_string("45296.789", &typ, &cx()).unwrap(), "12:34:56.789");
        assert_eq!(
            decode_time_value("45296.789", &typ, &cx()),
            Ok(NaiveTime::from_hms_milli_opt(12, 34, 56, 789).unwrap())
        );
        assert_eq!(decode_sf_time("45296.789", &typ).unwrap().fractions(), 45_296_789);
    }

    #[test]
    fn timestamps() {
        let ntz = col(ScalarType::TimestampNtz, 3);
        assert_eq!(
            decode_string("1704110400.123", &ntz, &cx()).unwrap(),
            "2024-01-01 12:00:00.123"
        );
        // The wall clock reading is kept, but in the client's zone.
        let instant = decode_timestamp_value("1704110400.123", &ntz, &cx()).unwrap();
        assert_eq!(instant.timestamp(), 1_704_110_400 + 8 * 3600);
        let utc = cx().with_honor_client_tz_for_ntz(false);
        let instant = decode_timestamp_value("1704110400.123", &ntz, &utc).unwrap();
        assert_eq!(instant.timestamp(), 1_704_110_400);
        assert_eq!(instant.timestamp_subsec_millis(), 123);

        let tz = col(ScalarType::TimestampTz, 0);
        assert_eq!(
            decode_string("1704110400 1770", &tz, &cx()).unwrap(),
            "2024-01-01 17:30:00 +0530"
        );
        assert_eq!(
            decode_timestamp_value("1704110400 1770", &tz, &cx())
                .unwrap()
                .timestamp(),
            1_704_110_400
        );

        let ltz = col(ScalarType::TimestampLtz, 0);
        assert_eq!(
            decode_string("1704110400", &ltz, &cx()),
            Err(Error::Configuration("missing timestamp formatter".into()))
        );
        assert_eq!(
            decode_date_value("1704110400", &ltz, &cx()),
            Ok(NaiveDate::from_ymd_opt(2024, 1, 1).unwrap())
        );
    }

    #[test]
    fn legacy_tz_encoding_is_unsupported_until_resolved() {
        let tz = col(ScalarType::TimestampTz, 0);
        let legacy = cx().with_tz_encoding(TzEncoding::Legacy);
        let ts = decode_sf_timestamp("1704110400", &tz, &legacy).unwrap();
        assert_eq!(ts.fractions(), 1_704_110_400);
        assert_eq!(
            decode_timestamp_value("1704110400", &tz, &legacy)
                .unwrap_err()
                .kind(),
            ErrorKind::Unsupported
        );
        assert_eq!(
            decode_string("1704110400", &tz, &legacy).unwrap_err().kind(),
            ErrorKind::Unsupported
        );
    }

    #[test]
    fn objects() {
        let cx = cx();
        let cases = [
            (ScalarType::String, 0, "abc", Value::Text("abc".into())),
            (ScalarType::Boolean, 0, "1", Value::Bool(true)),
            (ScalarType::SmallInt, 0, "12", Value::Int4(12)),
            (ScalarType::Integer, 0, "-12", Value::Int4(-12)),
            (ScalarType::BigInt, 0, "9000000000", Value::Int8(9_000_000_000)),
            (ScalarType::Double, 0, "2.5", Value::Float8(2.5)),
            (ScalarType::Binary, 0, "00ff", Value::Bytes(vec![0, 255])),
            (
                ScalarType::Date,
                0,
                "19723",
                Value::Date(NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()),
            ),
        ];
        for (scalar_type, scale, token, expected) in cases {
            let typ = col(scalar_type, scale);
            assert_eq!(decode_object(token, &typ, &cx), Ok(expected), "{scalar_type}");
        }
        assert!(matches!(
            decode_object("1.50", &col(ScalarType::Decimal, 2), &cx),
            Ok(Value::Numeric(_))
        ));
    }

    #[test]
    fn unsupported_representations() {
        let typ = col(ScalarType::String, 0);
        for repr in [Representation::Array, Representation::Blob, Representation::Xml] {
            assert!(!repr.is_supported());
            assert_eq!(
                decode_as(repr, "x", &typ, &cx()).unwrap_err().kind(),
                ErrorKind::Unsupported
            );
        }
        assert_eq!(
            decode_as(Representation::Long, "5", &typ, &cx()),
            Ok(Value::Int8(5))
        );
    }
}
