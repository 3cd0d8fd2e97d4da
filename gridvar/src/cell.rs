// Copyright 2025 the GridVar Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Cell rendering.
//!
//! Each data row becomes a cell group placed at the current offsets of its row and column
//! keys. Inside the group, every category value with a display style becomes one path
//! shape. Values without a display style are dropped and traced.

extern crate alloc;

use alloc::string::String;
use alloc::vec::Vec;

use gridvar_core::{GroupMark, Mark, MarkId, PathMark};
use kurbo::Point;

use crate::options::css_class;
use crate::panel::{RenderContext, ids};
use crate::style::DisplayStyle;
use crate::z_order;

/// Builds a path shape for `datum` drawn with `style` into a `width × height` box.
///
/// `width` and `height` attributes come first so configured attributes can override them.
pub(crate) fn styled_shape(style: &DisplayStyle, datum: &str, width: f64, height: f64) -> PathMark {
    let mut shape = PathMark::new(style.path.resolve(datum, width, height))
        .with_attr("width", crate::svg::num(width))
        .with_attr("height", crate::svg::num(height));
    for (name, value) in &style.attrs {
        set_attr(&mut shape.attrs, name, value.resolve(datum, width, height));
    }
    for (name, value) in &style.styles {
        set_attr(&mut shape.styles, name, value.resolve(datum, width, height));
    }
    shape
}

/// Sets `name`, replacing an earlier value in place.
pub(crate) fn set_attr(list: &mut gridvar_core::AttrList, name: &str, value: String) {
    match list.iter_mut().find(|(k, _)| k == name) {
        Some(entry) => entry.1 = value,
        None => list.push((name.into(), value)),
    }
}

/// Cell groups and their shapes, parented to `parent`.
pub(crate) fn cell_marks(ctx: &RenderContext<'_>, parent: MarkId) -> Vec<Mark> {
    let index = &ctx.options.data_mapping.data_index;
    let (width, height) = (ctx.layout.cell_width, ctx.layout.cell_height);
    let mut out = Vec::new();
    for (row_index, row) in ctx.options.data_mapping.data.iter().enumerate() {
        let (Some(row_key), Some(column_key)) = (index.row_key(row), index.column_key(row)) else {
            tracing::trace!(row_index, "skipping data row without row/column keys");
            continue;
        };
        let (Some(y), Some(x)) = (ctx.y.offset(row_key), ctx.x.offset(column_key)) else {
            tracing::trace!(row_key, column_key, "skipping data row outside the current order");
            continue;
        };
        let tip = ctx.options.cell_tip.as_ref().map(|f| f(row)).unwrap_or_default();
        let group_id = ids::cell(row_index);
        out.push(
            Mark::new(
                group_id,
                GroupMark::new(Point::new(x, y))
                    .with_attr("class", css_class("cell"))
                    .with_attr("title", tip),
            )
            .with_parent(parent)
            .with_z_index(z_order::CELLS),
        );

        let mut seq = 0_u64;
        'shapes: for (dimension, styles) in ctx.styles.iter() {
            for value in index.values(row, dimension) {
                let Some(style) = styles.get(value) else {
                    tracing::trace!(dimension, value = %value, "dropping value without a display style");
                    continue;
                };
                // Shape ids must stay below the next cell group's id.
                if seq + 1 >= ids::CELL_STRIDE {
                    tracing::warn!(row_index, "cell has too many shapes; dropping the rest");
                    break 'shapes;
                }
                seq += 1;
                out.push(
                    Mark::new(
                        MarkId::from_raw(group_id.raw() + seq),
                        styled_shape(style, value, width, height),
                    )
                    .with_parent(group_id)
                    .with_z_index(z_order::CELL_SHAPES),
                );
            }
        }
    }
    out
}
