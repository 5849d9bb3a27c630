// Copyright Materialize, Inc. and contributors. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

//! Typed access to Snowflake result rows.
//!
//! A [`RowCursor`] walks the rows of a result one at a time, pulling raw
//! rows from a [`RowSupply`]. Its accessors decode the current row's text
//! tokens into typed values according to the column metadata in a
//! [`RelationDesc`](sf_repr::RelationDesc) and the session settings in a
//! [`DecodingContext`].

#![warn(missing_debug_implementations)]

mod context;
mod cursor;
mod error;
pub mod value;

pub use context::{DecodingConfig, DecodingContext};
pub use cursor::{FetchDirection, RawRow, RowCursor, RowSupply};
pub use error::{Error, ErrorKind};
pub use value::{Representation, Value};
