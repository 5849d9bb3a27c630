// Copyright Materialize, Inc. and contributors. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::adt::timestamp::TimestampKind;
use crate::relation::ColumnType;

/// The logical SQL type of a result column.
///
/// This is a closed set: every decode and format path matches on it
/// exhaustively, so adding a type is a single-site change in each codec.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ScalarType {
    /// A variable-length character string.
    String,
    /// A boolean, transmitted as `1` or `0`.
    Boolean,
    /// A 16-bit integer.
    SmallInt,
    /// A 32-bit integer.
    Integer,
    /// A 64-bit integer, i.e. a `FIXED` column with scale zero.
    BigInt,
    /// An exact fixed-point decimal, i.e. a `FIXED` column with a nonzero
    /// scale.
    Decimal,
    /// A double precision floating point number.
    Double,
    /// A byte string, transmitted as lowercase hex.
    Binary,
    /// A calendar date, transmitted as a day count since the Unix epoch.
    Date,
    /// A time of day, transmitted as fractional seconds since midnight.
    Time,
    /// A timestamp without a time zone.
    TimestampNtz,
    /// A timestamp interpreted in the session's time zone.
    TimestampLtz,
    /// A timestamp carrying its own time zone.
    TimestampTz,
}

impl ScalarType {
    /// Maps the engine's type name for a column, as reported in the result
    /// metadata, to a logical type.
    ///
    /// `FIXED` columns map to [`ScalarType::BigInt`] when their scale is zero
    /// and to [`ScalarType::Decimal`] otherwise.
    pub fn from_engine_type(name: &str, scale: u8) -> Result<ScalarType, InvalidTypeNameError> {
        let typ = match name.to_ascii_uppercase().as_str() {
            "TEXT" | "VARCHAR" | "STRING" | "CHAR" | "VARIANT" | "OBJECT" | "ARRAY" => {
                ScalarType::String
            }
            "BOOLEAN" => ScalarType::Boolean,
            "SMALLINT" => ScalarType::SmallInt,
            "INTEGER" | "INT" => ScalarType::Integer,
            "BIGINT" => ScalarType::BigInt,
            "FIXED" | "NUMBER" | "DECIMAL" if scale == 0 => ScalarType::BigInt,
            "FIXED" | "NUMBER" | "DECIMAL" => ScalarType::Decimal,
            "REAL" | "FLOAT" | "DOUBLE" => ScalarType::Double,
            "BINARY" => ScalarType::Binary,
            "DATE" => ScalarType::Date,
            "TIME" => ScalarType::Time,
            "TIMESTAMP_NTZ" | "DATETIME" => ScalarType::TimestampNtz,
            "TIMESTAMP_LTZ" => ScalarType::TimestampLtz,
            "TIMESTAMP_TZ" => ScalarType::TimestampTz,
            _ => return Err(InvalidTypeNameError(name.to_owned())),
        };
        Ok(typ)
    }

    /// Returns the flavor of timestamp this type represents, if it is a
    /// member of the timestamp family.
    pub fn timestamp_kind(&self) -> Option<TimestampKind> {
        match self {
            ScalarType::TimestampNtz => Some(TimestampKind::Ntz),
            ScalarType::TimestampLtz => Some(TimestampKind::Ltz),
            ScalarType::TimestampTz => Some(TimestampKind::Tz),
            _ => None,
        }
    }

    /// Whether values of this type are temporal.
    pub fn is_temporal(&self) -> bool {
        matches!(self, ScalarType::Date | ScalarType::Time) || self.timestamp_kind().is_some()
    }

    /// Whether values of this type are numeric.
    pub fn is_numeric(&self) -> bool {
        matches!(
            self,
            ScalarType::SmallInt
                | ScalarType::Integer
                | ScalarType::BigInt
                | ScalarType::Decimal
                | ScalarType::Double
        )
    }

    /// Constructs a [`ColumnType`] of this type with the given scale and
    /// nullability.
    pub fn column_type(self, scale: u8, nullable: bool) -> ColumnType {
        ColumnType {
            scalar_type: self,
            scale,
            nullable,
        }
    }
}

impl fmt::Display for ScalarType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(match self {
            ScalarType::String => "TEXT",
            ScalarType::Boolean => "BOOLEAN",
            ScalarType::SmallInt => "SMALLINT",
            ScalarType::Integer => "INTEGER",
            ScalarType::BigInt => "BIGINT",
            ScalarType::Decimal => "DECIMAL",
            ScalarType::Double => "DOUBLE",
            ScalarType::Binary => "BINARY",
            ScalarType::Date => "DATE",
            ScalarType::Time => "TIME",
            ScalarType::TimestampNtz => "TIMESTAMP_NTZ",
            ScalarType::TimestampLtz => "TIMESTAMP_LTZ",
            ScalarType::TimestampTz => "TIMESTAMP_TZ",
        })
    }
}

/// The error returned by [`ScalarType::from_engine_type`] for a type name it
/// does not recognize.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unrecognized column type: {0}")]
pub struct InvalidTypeNameError(pub String);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixed_splits_on_scale() {
        assert_eq!(
            ScalarType::from_engine_type("FIXED", 0),
            Ok(ScalarType::BigInt)
        );
        assert_eq!(
            ScalarType::from_engine_type("fixed", 2),
            Ok(ScalarType::Decimal)
        );
        assert_eq!(
            ScalarType::from_engine_type("timestamp_tz", 9),
            Ok(ScalarType::TimestampTz)
        );
        assert_eq!(
            ScalarType::from_engine_type("GEOGRAPHY", 0),
            Err(InvalidTypeNameError("GEOGRAPHY".into()))
        );
    }

    #[test]
    fn timestamp_family() {
        assert_eq!(
            ScalarType::TimestampLtz.timestamp_kind(),
            Some(TimestampKind::Ltz)
        );
        assert_eq!(ScalarType::Date.timestamp_kind(), None);
        assert!(ScalarType::Time.is_temporal());
        assert!(!ScalarType::Binary.is_temporal());
        assert!(ScalarType::Decimal.is_numeric());
    }
}
