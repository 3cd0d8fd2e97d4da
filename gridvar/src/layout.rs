// Copyright 2025 the GridVar Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Panel sizes and margins.
//!
//! The widget is made of four panels laid out left to right below the legend: histogram,
//! row labels, and the heatmap (which carries the column labels underneath the grid).

use alloc::string::String;

use kurbo::Size;

use crate::OrderedMap;
use crate::measure::TextMeasurer;
use crate::options::GridVarOptions;

/// Gap between row labels and the grid.
pub const Y_AXIS_BUFFER: f64 = 5.0;
/// Padding added after the longest column label.
pub const COLUMN_LABEL_PADDING: f64 = 15.0;
/// Smallest bottom margin, reserved for column labels.
pub const MIN_BOTTOM_MARGIN: f64 = 60.0;
/// Top margin of every panel.
pub const TOP_MARGIN: f64 = 10.0;

/// Outer width of the histogram panel.
pub const HISTOGRAM_OUTER_WIDTH: f64 = 120.0;
/// Left margin inside the histogram panel.
pub const HISTOGRAM_MARGIN_LEFT: f64 = 10.0;
/// Right margin inside the histogram panel, holding the value labels.
pub const HISTOGRAM_MARGIN_RIGHT: f64 = 60.0;

/// Width needed for the labels of `keys`: the widest label plus `padding`.
///
/// A key without an entry in `labels` is its own label. With no keys the result is `padding`.
pub fn label_size<S: AsRef<str>>(
    keys: &[S],
    labels: &OrderedMap<String, String>,
    padding: f64,
    measurer: &dyn TextMeasurer,
) -> f64 {
    let widest = keys
        .iter()
        .map(|k| {
            let k = k.as_ref();
            measurer.text_width(labels.get(k).map_or(k, |l| l.as_str()))
        })
        .fold(0.0, f64::max);
    widest + padding
}

/// Panel margins.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Margins {
    /// Top margin.
    pub top: f64,
    /// Right margin (the row-label panel width).
    pub right: f64,
    /// Bottom margin, reserved for column labels.
    pub bottom: f64,
    /// Left margin.
    pub left: f64,
}

/// Sizes derived from options and label widths.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GridLayout {
    /// Cell width.
    pub cell_width: f64,
    /// Cell height.
    pub cell_height: f64,
    /// Width of the row-label panel.
    pub y_axis_width: f64,
    /// Margins shared by the panels.
    pub margin: Margins,
}

impl GridLayout {
    /// Computes margins and the row-label width for the current orders.
    pub fn compute(options: &GridVarOptions, measurer: &dyn TextMeasurer) -> Self {
        let y_axis_width = Y_AXIS_BUFFER
            + label_size(
                options.row_order.as_slice(),
                &options.row_keys_to_label,
                Y_AXIS_BUFFER,
                measurer,
            );
        let column_labels = label_size(
            options.column_order.as_slice(),
            &options.column_keys_to_label,
            COLUMN_LABEL_PADDING,
            measurer,
        );
        Self {
            cell_width: options.cell_width,
            cell_height: options.cell_height,
            y_axis_width,
            margin: Margins {
                top: TOP_MARGIN,
                right: y_axis_width,
                bottom: column_labels.max(MIN_BOTTOM_MARGIN),
                left: 0.0,
            },
        }
    }

    /// Grid width for `columns` keys.
    pub fn width(&self, columns: usize) -> f64 {
        #[allow(
            clippy::cast_precision_loss,
            reason = "key counts are far below 2^52"
        )]
        let n = columns as f64;
        n * self.cell_width
    }

    /// Grid height for `rows` keys.
    pub fn height(&self, rows: usize) -> f64 {
        #[allow(
            clippy::cast_precision_loss,
            reason = "key counts are far below 2^52"
        )]
        let n = rows as f64;
        n * self.cell_height
    }

    /// Size of the heatmap panel: the grid plus the column-label margin.
    pub fn heatmap_size(&self, rows: usize, columns: usize) -> Size {
        Size::new(self.width(columns), self.height(rows) + self.margin.bottom)
    }

    /// Size of the row-label panel.
    pub fn row_labels_size(&self, rows: usize) -> Size {
        Size::new(self.y_axis_width, self.height(rows) + self.margin.bottom)
    }

    /// Size of the histogram panel.
    pub fn histogram_size(&self, rows: usize) -> Size {
        Size::new(
            HISTOGRAM_OUTER_WIDTH,
            self.height(rows) + self.margin.top + self.margin.bottom,
        )
    }

    /// Width available to histogram bars.
    pub fn histogram_inner_width(&self) -> f64 {
        HISTOGRAM_OUTER_WIDTH - HISTOGRAM_MARGIN_LEFT - HISTOGRAM_MARGIN_RIGHT
    }
}
