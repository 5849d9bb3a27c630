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

use crate::ScalarType;

/// The type of a column in a result.
///
/// [`ColumnType`] bundles the logical type of a column with the scale the
/// engine reported for it and its nullability.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct ColumnType {
    /// The logical SQL type of this column.
    pub scalar_type: ScalarType,
    /// The number of fractional decimal digits in values of this column.
    ///
    /// Meaningful for decimals and for the temporal types, where it is
    /// between 0 and 9. Zero for everything else.
    #[serde(default)]
    pub scale: u8,
    /// Whether values of this column can be null.
    #[serde(default = "return_true")]
    pub nullable: bool,
}

fn return_true() -> bool {
    true
}

/// The name of a column in a result.
#[derive(Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
pub struct ColumnName(String);

impl ColumnName {
    /// Returns this column name as a `str`.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ColumnName {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for ColumnName {
    fn from(s: String) -> ColumnName {
        ColumnName(s)
    }
}

impl From<&str> for ColumnName {
    fn from(s: &str) -> ColumnName {
        ColumnName(s.into())
    }
}

/// The names and types of the columns of a result, in order.
///
/// A `RelationDesc` is delivered once per result, before the first row, and
/// does not change for the lifetime of the result.
#[derive(Clone, Debug, Default, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct RelationDesc {
    columns: Vec<(ColumnName, ColumnType)>,
}

impl RelationDesc {
    /// Constructs a new `RelationDesc` with no columns.
    pub fn empty() -> RelationDesc {
        RelationDesc::default()
    }

    /// Appends a column with the specified name and type.
    pub fn with_column<N>(mut self, name: N, column_type: ColumnType) -> RelationDesc
    where
        N: Into<ColumnName>,
    {
        self.columns.push((name.into(), column_type));
        self
    }

    /// Returns the number of columns in this relation.
    pub fn arity(&self) -> usize {
        self.columns.len()
    }

    /// Returns an iterator over the columns in this relation.
    pub fn iter(&self) -> impl Iterator<Item = &(ColumnName, ColumnType)> {
        self.columns.iter()
    }

    /// Returns the name of the column at the zero-based index `i`.
    pub fn get_name(&self, i: usize) -> Option<&ColumnName> {
        self.columns.get(i).map(|(name, _)| name)
    }

    /// Returns the type of the column at the zero-based index `i`.
    pub fn get_type(&self, i: usize) -> Option<&ColumnType> {
        self.columns.get(i).map(|(_, typ)| typ)
    }

    /// Finds the zero-based index of the column named `name`.
    ///
    /// An exact match is preferred. Failing that, the first column whose name
    /// matches ignoring ASCII case is returned, as unquoted identifiers are
    /// reported by the engine in upper case.
    pub fn get_by_name(&self, name: &str) -> Option<usize> {
        self.columns
            .iter()
            .position(|(n, _)| n.as_str() == name)
            .or_else(|| {
                self.columns
                    .iter()
                    .position(|(n, _)| n.as_str().eq_ignore_ascii_case(name))
            })
    }
}
