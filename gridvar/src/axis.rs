// Copyright 2025 the GridVar Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Row and column label axes.

extern crate alloc;

use alloc::vec::Vec;

use gridvar_core::{GroupMark, Mark, MarkId, TextAnchor, TextMark};
use kurbo::Point;

use crate::options::{WIDGET_CLASS, css_class};
use crate::panel::{RenderContext, ids};
use crate::z_order;

/// Distance between a label and the band it labels.
pub(crate) const LABEL_OFFSET: f64 = 5.0;

/// Column labels under the grid, rotated −90° and end-anchored at their band centre.
///
/// Marks are parented to `parent`, the heatmap root.
pub(crate) fn column_axis_marks(ctx: &RenderContext<'_>, parent: MarkId) -> Vec<Mark> {
    let height = ctx.grid_height();
    let mut out = Vec::with_capacity(ctx.x.len() + 1);
    out.push(
        Mark::new(
            ids::AXIS,
            GroupMark::new(Point::new(0.0, height))
                .with_attr("class", alloc::format!("x {}", css_class("axis"))),
        )
        .with_parent(parent)
        .with_z_index(z_order::AXIS_LABELS),
    );
    for key in ctx.x.keys() {
        let (Some(center), Some(key_id)) = (ctx.x.center(key), ctx.column_ids.get(key)) else {
            continue;
        };
        out.push(
            Mark::new(
                ids::key_label(key_id),
                TextMark::new(
                    Point::new(center - LABEL_OFFSET, 10.0),
                    ctx.options.column_label(key),
                )
                .with_angle(-90.0)
                .with_anchor(TextAnchor::End)
                .with_attr("dy", ".71em")
                .with_attr("class", WIDGET_CLASS),
            )
            .with_parent(ids::AXIS)
            .with_z_index(z_order::AXIS_LABELS),
        );
    }
    out
}

/// The row-label panel: labels end-anchored at the right edge, vertically centred in their
/// band.
pub(crate) fn row_label_marks(ctx: &RenderContext<'_>) -> Vec<Mark> {
    let mut out = Vec::with_capacity(ctx.y.len() + 2);
    out.push(
        Mark::new(
            ids::ROOT,
            GroupMark::new(Point::new(ctx.layout.margin.left, ctx.layout.margin.top))
                .with_attr("class", css_class("grid-label-rows")),
        )
        .with_z_index(z_order::PANEL),
    );
    out.push(
        Mark::new(
            ids::AXIS,
            GroupMark::new(Point::ZERO)
                .with_attr("class", alloc::format!("y {}", css_class("axis"))),
        )
        .with_parent(ids::ROOT)
        .with_z_index(z_order::AXIS_LABELS),
    );
    let x = ctx.layout.y_axis_width - LABEL_OFFSET;
    for key in ctx.y.keys() {
        let (Some(center), Some(key_id)) = (ctx.y.center(key), ctx.row_ids.get(key)) else {
            continue;
        };
        out.push(
            Mark::new(
                ids::key_label(key_id),
                TextMark::new(Point::new(x, center), ctx.options.row_label(key))
                    .with_anchor(TextAnchor::End)
                    .with_attr("dy", ".32em")
                    .with_attr("class", WIDGET_CLASS),
            )
            .with_parent(ids::AXIS)
            .with_z_index(z_order::AXIS_LABELS),
        );
    }
    out
}

/// Ids of the row labels in the current row order, for the fade-in transition.
pub(crate) fn row_label_ids(ctx: &RenderContext<'_>) -> Vec<MarkId> {
    ctx.y
        .keys()
        .iter()
        .filter_map(|k| ctx.row_ids.get(k))
        .map(ids::key_label)
        .collect()
}
