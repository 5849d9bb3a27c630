// Copyright Materialize, Inc. and contributors. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

//! A forward-only cursor over the rows of a result.

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveTime, Utc};
use chrono_tz::Tz;
use sf_repr::adt::numeric::Numeric;
use sf_repr::adt::time::Time;
use sf_repr::adt::timestamp::Timestamp;
use sf_repr::{ColumnType, RelationDesc};
use tracing::{debug, trace};

use crate::context::DecodingContext;
use crate::error::Error;
use crate::value::{self, Representation, Value};

/// One row of a result as delivered by the server: one text token per
/// column, `None` for SQL `NULL`.
pub type RawRow = Vec<Option<String>>;

/// The source of the rows a [`RowCursor`] walks.
pub trait RowSupply {
    /// Returns the next row, or `None` once the result is exhausted.
    fn next_row(&mut self) -> Option<RawRow>;
}

impl<I> RowSupply for I
where
    I: Iterator<Item = RawRow>,
{
    fn next_row(&mut self) -> Option<RawRow> {
        self.next()
    }
}

/// The order in which rows are fetched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FetchDirection {
    Forward,
    Reverse,
    Unknown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CursorState {
    Open,
    Exhausted,
    Closed,
}

/// A forward-only cursor that buffers a single row.
///
/// Every accessor takes a 1-based column index, or a column name in its
/// `*_by_name` form, and decodes the current row's token for that column.
/// Accessors for primitive representations return the representation's
/// empty value for `NULL`; the others return `None`. In both cases
/// [`RowCursor::was_null`] reports whether the column just read was `NULL`,
/// until the next accessor call overwrites it.
///
/// The cursor is not meant to be shared. Callers that do share one across
/// threads must synchronize access themselves.
#[derive(Debug)]
pub struct RowCursor<S> {
    supply: Option<S>,
    desc: RelationDesc,
    cx: DecodingContext,
    state: CursorState,
    row: Option<RawRow>,
    row_number: u64,
    was_null: bool,
    fetch_size: usize,
}

impl<S: RowSupply> RowCursor<S> {
    /// Constructs a cursor over the rows of a result described by `desc`.
    pub fn new(desc: RelationDesc, cx: DecodingContext, supply: S) -> RowCursor<S> {
        RowCursor {
            supply: Some(supply),
            desc,
            cx,
            state: CursorState::Open,
            row: None,
            row_number: 0,
            was_null: false,
            fetch_size: 0,
        }
    }

    /// Moves to the next row, returning whether there is one.
    ///
    /// Once the supply is exhausted every later call returns `false` without
    /// consulting it again.
    pub fn advance(&mut self) -> Result<bool, Error> {
        self.row = None;
        match self.state {
            CursorState::Closed => return Err(Error::closed()),
            CursorState::Exhausted => return Ok(false),
            CursorState::Open => (),
        }
        let Some(row) = self.supply.as_mut().and_then(|s| s.next_row()) else {
            debug!(rows = self.row_number, "result exhausted");
            self.state = CursorState::Exhausted;
            self.supply = None;
            return Ok(false);
        };
        if row.len() != self.desc.arity() {
            return Err(Error::State(format!(
                "row has {} values but the result has {} columns",
                row.len(),
                self.desc.arity()
            )));
        }
        self.row_number += 1;
        trace!(row_number = self.row_number, "advanced to row");
        self.row = Some(row);
        Ok(true)
    }

    /// Releases the current row and the result metadata. Closing a closed
    /// cursor does nothing.
    pub fn close(&mut self) {
        if self.state == CursorState::Closed {
            return;
        }
        debug!(rows = self.row_number, "closing result");
        self.state = CursorState::Closed;
        self.supply = None;
        self.row = None;
        self.desc = RelationDesc::empty();
    }

    pub fn is_closed(&self) -> bool {
        self.state == CursorState::Closed
    }

    /// Returns the metadata of the result's columns.
    pub fn desc(&self) -> Result<&RelationDesc, Error> {
        self.check_open()?;
        Ok(&self.desc)
    }

    pub fn context(&self) -> &DecodingContext {
        &self.cx
    }

    /// Reports whether the column most recently read was `NULL`.
    pub fn was_null(&self) -> bool {
        self.was_null
    }

    /// Returns the 1-based index of the column named `name`.
    ///
    /// An exact match wins over a match that ignores ASCII case.
    pub fn find_column(&self, name: &str) -> Result<usize, Error> {
        self.check_open()?;
        self.desc
            .get_by_name(name)
            .map(|i| i + 1)
            .ok_or_else(|| Error::ColumnNotFound(name.into()))
    }

    fn check_open(&self) -> Result<(), Error> {
        match self.state {
            CursorState::Closed => Err(Error::closed()),
            CursorState::Open | CursorState::Exhausted => Ok(()),
        }
    }

    /// Validates a 1-based column index against the current row, returning
    /// the zero-based position.
    fn position(&self, index: usize) -> Result<usize, Error> {
        self.check_open()?;
        if self.row.is_none() {
            return Err(Error::no_row());
        }
        let arity = self.desc.arity();
        if index == 0 || index > arity {
            return Err(Error::ColumnIndexOutOfRange { index, arity });
        }
        Ok(index - 1)
    }

    /// Returns the raw token of column `index` in the current row.
    pub fn get_raw(&mut self, index: usize) -> Result<Option<&str>, Error> {
        let i = self.position(index)?;
        let token = self.row.as_ref().and_then(|r| r.get(i)).and_then(|t| t.as_deref());
        self.was_null = token.is_none();
        Ok(token)
    }

    /// Decodes column `index` with `f`, recording whether it was `NULL`.
    fn decode<T, F>(&mut self, index: usize, f: F) -> Result<Option<T>, Error>
    where
        F: FnOnce(&str, &ColumnType, &DecodingContext) -> Result<T, Error>,
    {
        let i = self.position(index)?;
        let typ = self
            .desc
            .get_type(i)
            .ok_or(Error::ColumnIndexOutOfRange {
                index,
                arity: self.desc.arity(),
            })?;
        let token = self.row.as_ref().and_then(|r| r.get(i)).and_then(|t| t.as_deref());
        self.was_null = token.is_none();
        match token {
            None => Ok(None),
            Some(token) => f(token, typ, &self.cx)
                .map(Some)
                .map_err(|e| e.in_column(index)),
        }
    }

    /// Reads column `index` in the requested representation. `NULL` reads as
    /// `None` for every supported representation. An unsupported one fails
    /// after the was-null flag has been updated.
    pub fn get_as(&mut self, index: usize, repr: Representation) -> Result<Option<Value>, Error> {
        let value = self.decode(index, |token, typ, cx| value::decode_as(repr, token, typ, cx))?;
        if !repr.is_supported() {
            return Err(Error::Unsupported(format!("reading a column as {repr}")));
        }
        Ok(value)
    }

    pub fn get_string(&mut self, index: usize) -> Result<Option<String>, Error> {
        self.decode(index, value::decode_string)
    }

    /// Reads a boolean. `NULL` reads as `false`, as does every token other
    /// than `1`.
    pub fn get_boolean(&mut self, index: usize) -> Result<bool, Error> {
        Ok(self
            .decode(index, |token, typ, _| value::decode_boolean(token, typ))?
            .unwrap_or_default())
    }

    pub fn get_short(&mut self, index: usize) -> Result<i16, Error> {
        Ok(self
            .decode(index, |token, typ, _| value::decode_short(token, typ))?
            .unwrap_or_default())
    }

    pub fn get_int(&mut self, index: usize) -> Result<i32, Error> {
        Ok(self
            .decode(index, |token, typ, _| value::decode_int(token, typ))?
            .unwrap_or_default())
    }

    pub fn get_long(&mut self, index: usize) -> Result<i64, Error> {
        Ok(self
            .decode(index, |token, typ, _| value::decode_long(token, typ))?
            .unwrap_or_default())
    }

    pub fn get_float(&mut self, index: usize) -> Result<f32, Error> {
        Ok(self
            .decode(index, |token, typ, _| value::decode_float(token, typ))?
            .unwrap_or_default())
    }

    pub fn get_double(&mut self, index: usize) -> Result<f64, Error> {
        Ok(self
            .decode(index, |token, typ, _| value::decode_double(token, typ))?
            .unwrap_or_default())
    }

    /// Reads an exact decimal at the scale it was sent with.
    pub fn get_decimal(&mut self, index: usize) -> Result<Option<Numeric>, Error> {
        self.decode(index, |token, typ, _| value::decode_decimal(token, typ))
    }

    /// Reads an exact decimal with exactly `scale` fractional digits,
    /// rounding half away from zero.
    pub fn get_decimal_with_scale(
        &mut self,
        index: usize,
        scale: u8,
    ) -> Result<Option<Numeric>, Error> {
        self.decode(index, |token, typ, _| {
            value::decode_decimal_with_scale(token, typ, scale)
        })
    }

    pub fn get_bytes(&mut self, index: usize) -> Result<Option<Vec<u8>>, Error> {
        self.decode(index, |token, typ, _| value::decode_bytes(token, typ))
    }

    pub fn get_date(&mut self, index: usize) -> Result<Option<NaiveDate>, Error> {
        self.decode(index, value::decode_date_value)
    }

    /// Reads a date as the instant at which it begins in `zone`.
    pub fn get_date_in(
        &mut self,
        index: usize,
        zone: &Tz,
    ) -> Result<Option<DateTime<FixedOffset>>, Error> {
        self.decode(index, |token, typ, cx| {
            value::decode_date_in(token, typ, cx, zone)
        })
    }

    pub fn get_time(&mut self, index: usize) -> Result<Option<NaiveTime>, Error> {
        self.decode(index, value::decode_time_value)
    }

    /// Reads a `TIME` value with its scale.
    pub fn get_sf_time(&mut self, index: usize) -> Result<Option<Time>, Error> {
        self.decode(index, |token, typ, _| value::decode_sf_time(token, typ))
    }

    /// Reads an instant. `TIMESTAMP_NTZ` readings are placed in the client's
    /// zone if the session asks for it.
    pub fn get_timestamp(&mut self, index: usize) -> Result<Option<DateTime<Utc>>, Error> {
        self.decode(index, value::decode_timestamp_value)
    }

    /// Like [`RowCursor::get_timestamp`], placing `TIMESTAMP_NTZ` readings in
    /// `zone` instead of the client's zone.
    pub fn get_timestamp_in(
        &mut self,
        index: usize,
        zone: &Tz,
    ) -> Result<Option<DateTime<Utc>>, Error> {
        self.decode(index, |token, typ, cx| {
            value::decode_timestamp_in(token, typ, cx, zone)
        })
    }

    /// Reads a timestamp as sent, without adjusting it for any zone.
    pub fn get_sf_timestamp(&mut self, index: usize) -> Result<Option<Timestamp>, Error> {
        self.decode(index, value::decode_sf_timestamp)
    }

    /// Reads a column in the representation that suits its type.
    pub fn get_object(&mut self, index: usize) -> Result<Option<Value>, Error> {
        self.decode(index, value::decode_object)
    }

    pub fn get_decimal_with_scale_by_name(
        &mut self,
        name: &str,
        scale: u8,
    ) -> Result<Option<Numeric>, Error> {
        let index = self.find_column(name)?;
        self.get_decimal_with_scale(index, scale)
    }

    pub fn get_date_in_by_name(
        &mut self,
        name: &str,
        zone: &Tz,
    ) -> Result<Option<DateTime<FixedOffset>>, Error> {
        let index = self.find_column(name)?;
        self.get_date_in(index, zone)
    }

    pub fn get_timestamp_in_by_name(
        &mut self,
        name: &str,
        zone: &Tz,
    ) -> Result<Option<DateTime<Utc>>, Error> {
        let index = self.find_column(name)?;
        self.get_timestamp_in(index, zone)
    }

    pub fn get_as_by_name(
        &mut self,
        name: &str,
        repr: Representation,
    ) -> Result<Option<Value>, Error> {
        let index = self.find_column(name)?;
        self.get_as(index, repr)
    }

    /// Returns the 1-based number of the current row, or 0 if there is none.
    pub fn row_number(&self) -> u64 {
        match self.row {
            Some(_) => self.row_number,
            None => 0,
        }
    }

    pub fn is_first(&self) -> bool {
        self.row_number() == 1
    }

    pub fn fetch_direction(&self) -> FetchDirection {
        FetchDirection::Forward
    }

    /// Sets the fetch direction. Only [`FetchDirection::Forward`] is
    /// accepted.
    pub fn set_fetch_direction(&mut self, direction: FetchDirection) -> Result<(), Error> {
        self.check_open()?;
        match direction {
            FetchDirection::Forward => Ok(()),
            FetchDirection::Reverse | FetchDirection::Unknown => Err(Error::Unsupported(
                format!("fetch direction {direction:?}"),
            )),
        }
    }

    /// Returns the fetch size hint. It has no effect on decoding.
    pub fn fetch_size(&self) -> usize {
        self.fetch_size
    }

    pub fn set_fetch_size(&mut self, rows: usize) -> Result<(), Error> {
        self.check_open()?;
        self.fetch_size = rows;
        Ok(())
    }

    /// Returns the warnings reported for this result. Warnings are not
    /// tracked, so this is always empty.
    pub fn warnings(&self) -> Result<Vec<String>, Error> {
        self.check_open()?;
        Ok(Vec::new())
    }

    pub fn clear_warnings(&mut self) {}
}

macro_rules! by_name {
    ($($name:ident => $by_index:ident -> $ret:ty;)*) => {
        impl<S: RowSupply> RowCursor<S> {
            $(
                #[doc = concat!("Like [`RowCursor::", stringify!($by_index), "`], by column name.")]
                pub fn $name(&mut self, name: &str) -> Result<$ret, Error> {
                    let index = self.find_column(name)?;
                    self.$by_index(index)
                }
            )*
        }
    };
}

by_name! {
    get_raw_by_name => get_raw -> Option<&str>;
    get_string_by_name => get_string -> Option<String>;
    get_boolean_by_name => get_boolean -> bool;
    get_short_by_name => get_short -> i16;
    get_int_by_name => get_int -> i32;
    get_long_by_name => get_long -> i64;
    get_float_by_name => get_float -> f32;
    get_double_by_name => get_double -> f64;
    get_decimal_by_name => get_decimal -> Option<Numeric>;
    get_bytes_by_name => get_bytes -> Option<Vec<u8>>;
    get_date_by_name => get_date -> Option<NaiveDate>;
    get_time_by_name => get_time -> Option<NaiveTime>;
    get_sf_time_by_name => get_sf_time -> Option<Time>;
    get_timestamp_by_name => get_timestamp -> Option<DateTime<Utc>>;
    get_sf_timestamp_by_name => get_sf_timestamp -> Option<Timestamp>;
    get_object_by_name => get_object -> Option<Value>;
}

/// Positioning and update requests. The cursor only moves forward one row
/// at a time and is read-only, so all of these are rejected.
impl<S: RowSupply> RowCursor<S> {
    pub fn absolute(&mut self, _row: i64) -> Result<bool, Error> {
        unsupported("absolute positioning")
    }

    pub fn relative(&mut self, _rows: i64) -> Result<bool, Error> {
        unsupported("relative positioning")
    }

    pub fn previous(&mut self) -> Result<bool, Error> {
        unsupported("moving to the previous row")
    }

    pub fn first(&mut self) -> Result<bool, Error> {
        unsupported("moving to the first row")
    }

    pub fn last(&mut self) -> Result<bool, Error> {
        unsupported("moving to the last row")
    }

    pub fn before_first(&mut self) -> Result<(), Error> {
        unsupported("moving before the first row")
    }

    pub fn after_last(&mut self) -> Result<(), Error> {
        unsupported("moving after the last row")
    }

    pub fn is_before_first(&self) -> Result<bool, Error> {
        unsupported("is_before_first")
    }

    pub fn is_after_last(&self) -> Result<bool, Error> {
        unsupported("is_after_last")
    }

    pub fn is_last(&self) -> Result<bool, Error> {
        unsupported("is_last")
    }

    pub fn cursor_name(&self) -> Result<String, Error> {
        unsupported("naming the cursor")
    }

    pub fn update_value(&mut self, _index: usize, _value: Option<Value>) -> Result<(), Error> {
        unsupported("updating a value")
    }

    pub fn update_row(&mut self) -> Result<(), Error> {
        unsupported("updating a row")
    }

    pub fn insert_row(&mut self) -> Result<(), Error> {
        unsupported("inserting a row")
    }

    pub fn delete_row(&mut self) -> Result<(), Error> {
        unsupported("deleting a row")
    }

    pub fn refresh_row(&mut self) -> Result<(), Error> {
        unsupported("refreshing a row")
    }

    pub fn cancel_row_updates(&mut self) -> Result<(), Error> {
        unsupported("cancelling row updates")
    }

    pub fn move_to_insert_row(&mut self) -> Result<(), Error> {
        unsupported("moving to the insert row")
    }

    pub fn move_to_current_row(&mut self) -> Result<(), Error> {
        unsupported("moving to the current row")
    }

    pub fn row_updated(&self) -> Result<bool, Error> {
        unsupported("row_updated")
    }

    pub fn row_inserted(&self) -> Result<bool, Error> {
        unsupported("row_inserted")
    }

    pub fn row_deleted(&self) -> Result<bool, Error> {
        unsupported("row_deleted")
    }
}

fn unsupported<T>(operation: &str) -> Result<T, Error> {
    Err(Error::Unsupported(operation.into()))
}
