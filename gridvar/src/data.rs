// Copyright 2025 the GridVar Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Positional data rows and the index that names their fields.

extern crate alloc;

use alloc::string::String;
use alloc::vec::Vec;
use core::slice;

use serde::Deserialize;

use crate::OrderedMap;

/// One field of a data row.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    /// A single string (row key, column key, or a one-value category field).
    Text(String),
    /// A list of category values.
    List(Vec<String>),
}

impl FieldValue {
    /// The field as a key. Lists are not keys.
    pub fn as_key(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            Self::List(_) => None,
        }
    }

    /// The category values in this field. A single string is one value.
    pub fn values(&self) -> &[String] {
        match self {
            Self::Text(s) => slice::from_ref(s),
            Self::List(v) => v,
        }
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        Self::Text(value.into())
    }
}

impl<const N: usize> From<[&str; N]> for FieldValue {
    fn from(value: [&str; N]) -> Self {
        Self::List(value.iter().map(|s| String::from(*s)).collect())
    }
}

/// A positional record: `[rowKey, columnKey, values…]` in the order given by [`DataIndex`].
pub type DataRow = Vec<FieldValue>;

/// Names the positions of a [`DataRow`].
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DataIndex {
    /// Position of the row key.
    pub row_key: usize,
    /// Position of the column key.
    pub column_key: usize,
    /// Dimension name → position of its category values.
    #[serde(flatten)]
    pub dimensions: OrderedMap<String, usize>,
}

impl Default for DataIndex {
    fn default() -> Self {
        Self {
            row_key: 0,
            column_key: 1,
            dimensions: OrderedMap::default(),
        }
    }
}

impl DataIndex {
    /// Adds a dimension at `position`.
    pub fn with_dimension(mut self, name: impl Into<String>, position: usize) -> Self {
        self.dimensions.insert(name.into(), position);
        self
    }

    /// The row key of `row`.
    pub fn row_key<'a>(&self, row: &'a DataRow) -> Option<&'a str> {
        row.get(self.row_key)?.as_key()
    }

    /// The column key of `row`.
    pub fn column_key<'a>(&self, row: &'a DataRow) -> Option<&'a str> {
        row.get(self.column_key)?.as_key()
    }

    /// The category values of `dimension` in `row`; empty when absent.
    pub fn values<'a>(&self, row: &'a DataRow, dimension: &str) -> &'a [String] {
        self.dimensions
            .get(dimension)
            .and_then(|&i| row.get(i))
            .map(FieldValue::values)
            .unwrap_or_default()
    }
}

/// The data to draw.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DataMapping {
    /// Data rows.
    pub data: Vec<DataRow>,
    /// Field positions.
    pub data_index: DataIndex,
}
