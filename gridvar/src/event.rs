// Copyright 2025 the GridVar Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Pointer hits and the events they emit.

extern crate alloc;

use alloc::string::String;
use alloc::sync::Arc;
use alloc::vec::Vec;
use core::fmt;

use crate::data::DataRow;

/// What a point in a panel resolves to.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Hit {
    /// A data row, by index into `dataMapping.data`.
    Cell(usize),
    /// A row label, by row key.
    RowLabel(String),
    /// A column label, by column key.
    ColumnLabel(String),
}

/// An event emitted by [`crate::GridVar::click`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GridEvent {
    /// `cellClicked(datum)`.
    CellClicked(DataRow),
    /// `rowLabelClicked(key)`.
    RowLabelClicked(String),
    /// `columnLabelClicked(key)`.
    ColumnLabelClicked(String),
}

type CellHandler = Arc<dyn Fn(&DataRow)>;
type KeyHandler = Arc<dyn Fn(&str)>;

/// Consumer-supplied event handlers.
#[derive(Clone, Default)]
pub struct EventHandlers {
    cell_clicked: Vec<CellHandler>,
    row_label_clicked: Vec<KeyHandler>,
    column_label_clicked: Vec<KeyHandler>,
}

impl fmt::Debug for EventHandlers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventHandlers")
            .field("cell_clicked", &self.cell_clicked.len())
            .field("row_label_clicked", &self.row_label_clicked.len())
            .field("column_label_clicked", &self.column_label_clicked.len())
            .finish()
    }
}

impl EventHandlers {
    /// Registers a `cellClicked` handler.
    pub fn on_cell_clicked(&mut self, f: impl Fn(&DataRow) + 'static) {
        self.cell_clicked.push(Arc::new(f));
    }

    /// Registers a `rowLabelClicked` handler.
    pub fn on_row_label_clicked(&mut self, f: impl Fn(&str) + 'static) {
        self.row_label_clicked.push(Arc::new(f));
    }

    /// Registers a `columnLabelClicked` handler.
    pub fn on_column_label_clicked(&mut self, f: impl Fn(&str) + 'static) {
        self.column_label_clicked.push(Arc::new(f));
    }

    /// Calls every handler registered for `event`, in registration order.
    pub fn dispatch(&self, event: &GridEvent) {
        match event {
            GridEvent::CellClicked(row) => self.cell_clicked.iter().for_each(|h| h(row)),
            GridEvent::RowLabelClicked(key) => {
                self.row_label_clicked.iter().for_each(|h| h(key.as_str()));
            }
            GridEvent::ColumnLabelClicked(key) => {
                self.column_label_clicked.iter().for_each(|h| h(key.as_str()));
            }
        }
    }
}
