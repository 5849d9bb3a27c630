// Copyright Materialize, Inc. and contributors. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

//! Fundamental data representation for Snowflake result values.
//!
//! Every column value arrives from the query engine as text, whatever its
//! logical SQL type. This crate contains the logical type model and the
//! pure codecs that turn that text into exact numeric and temporal values:
//!
//!   * [`ScalarType`] and [`RelationDesc`] describe the columns of a result.
//!   * [`adt`] contains the fixed-point, timestamp, date, time and binary
//!     codecs, the timezone index table and the output pattern formatter.
//!
//! Nothing in here holds state; every function is safe to call from any
//! thread.

#![warn(missing_debug_implementations)]

pub mod adt;
mod relation;
mod scalar;

pub use relation::{ColumnName, ColumnType, RelationDesc};
pub use scalar::{InvalidTypeNameError, ScalarType};

/// An error produced when a raw wire token cannot be parsed as the requested
/// representation.
///
/// The offending token is retained verbatim so that callers can report it.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid {what} value: {token}")]
pub struct DecodeError {
    /// A human readable name for the representation being parsed, e.g.
    /// `"timestamp"`.
    pub what: &'static str,
    /// The raw token that failed to parse.
    pub token: String,
}

impl DecodeError {
    /// Constructs an error for `token`, which failed to parse as `what`.
    pub fn new(what: &'static str, token: &str) -> DecodeError {
        DecodeError {
            what,
            token: token.to_owned(),
        }
    }
}
