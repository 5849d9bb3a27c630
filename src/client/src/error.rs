// Copyright Materialize, Inc. and contributors. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use std::fmt;

use sf_repr::DecodeError;
use sf_repr::adt::timestamp::TimestampError;

/// The broad classes of [`Error`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// A token could not be parsed as the requested representation.
    Decoding,
    /// The session is missing a setting needed to serve the request.
    Configuration,
    /// The cursor is not in a state that permits the request.
    State,
    /// The request is outside what the cursor or decoder supports.
    Unsupported,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(match self {
            ErrorKind::Decoding => "decoding error",
            ErrorKind::Configuration => "configuration error",
            ErrorKind::State => "state error",
            ErrorKind::Unsupported => "unsupported operation",
        })
    }
}

/// An error reading a result.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// A raw token was malformed for the requested representation.
    #[error("{source}{}", column_suffix(.column))]
    Decoding {
        /// The 1-based index of the column the token was read from, if known.
        column: Option<usize>,
        /// The underlying error, which carries the token.
        source: DecodeError,
    },
    /// A setting required to serve the request was never configured.
    #[error("{0}")]
    Configuration(String),
    /// The cursor has no current row or has been closed.
    #[error("{0}")]
    State(String),
    /// A column index outside of `[1, arity]`.
    #[error("invalid column index {index}: the result has {arity} columns")]
    ColumnIndexOutOfRange {
        /// The requested 1-based index.
        index: usize,
        /// The number of columns in the result.
        arity: usize,
    },
    /// A column name that matches no column of the result.
    #[error("column not found: {0}")]
    ColumnNotFound(String),
    /// The operation or conversion is not supported.
    #[error("{0} is not supported")]
    Unsupported(String),
}

fn column_suffix(column: &Option<usize>) -> String {
    match column {
        Some(column) => format!(" (column {column})"),
        None => String::new(),
    }
}

impl Error {
    /// Reports the class of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Decoding { .. } => ErrorKind::Decoding,
            Error::Configuration(_) => ErrorKind::Configuration,
            Error::State(_) | Error::ColumnIndexOutOfRange { .. } | Error::ColumnNotFound(_) => {
                ErrorKind::State
            }
            Error::Unsupported(_) => ErrorKind::Unsupported,
        }
    }

    /// Reports a hint for the user about how the error could be fixed.
    pub fn hint(&self) -> Option<String> {
        match self {
            Error::Configuration(_) => Some(
                "Set the corresponding *_OUTPUT_FORMAT session parameter, \
                 or read the column with a typed accessor."
                    .into(),
            ),
            Error::ColumnIndexOutOfRange { .. } => {
                Some("Column indexes start at 1.".into())
            }
            _ => None,
        }
    }

    /// Attributes a decoding error to the 1-based column `index`.
    pub(crate) fn in_column(self, index: usize) -> Error {
        match self {
            Error::Decoding {
                column: None,
                source,
            } => Error::Decoding {
                column: Some(index),
                source,
            },
            e => e,
        }
    }

    pub(crate) fn no_row() -> Error {
        Error::State("no row found".into())
    }

    pub(crate) fn closed() -> Error {
        Error::State("result set closed".into())
    }
}

impl From<DecodeError> for Error {
    fn from(source: DecodeError) -> Error {
        Error::Decoding {
            column: None,
            source,
        }
    }
}

impl From<TimestampError> for Error {
    fn from(e: TimestampError) -> Error {
        match e {
            TimestampError::UnresolvedZone => Error::Unsupported(
                "resolving the time zone of a legacy-encoded TIMESTAMP_TZ value".into(),
            ),
            TimestampError::OutOfRange(value) => {
                Error::from(DecodeError::new("timestamp", &value.to_string()))
            }
        }
    }
}
