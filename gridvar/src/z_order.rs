// Copyright 2025 the GridVar Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Z-order conventions for widget marks.
//!
//! Marks are painted by `(z_index, MarkId)`. Within a cell, shapes share one z-index so that
//! their id order (display-mapping order, then value order) decides what is on top.

/// Panel root groups.
pub const PANEL: i32 = -100;

/// Cell groups and histogram bars.
pub const CELLS: i32 = 0;
/// Shapes inside a cell.
pub const CELL_SHAPES: i32 = 10;

/// Row, column and histogram axis labels.
pub const AXIS_LABELS: i32 = 40;

/// Legend swatch shapes.
pub const LEGEND_SWATCHES: i32 = 60;
/// Legend swatch outlines.
pub const LEGEND_OUTLINES: i32 = 65;
/// Legend labels.
pub const LEGEND_LABELS: i32 = 70;

/// Panel titles (histogram label, legend line titles).
pub const TITLES: i32 = 80;
