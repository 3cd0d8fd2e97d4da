// Copyright 2025 the GridVar Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The histogram sidebar.
//!
//! Bars grow leftwards from the grid side: the linear scale maps `[scale, 0]` onto
//! `[0, inner_width]`, so a bar spans `x(value)..inner_width`. Rows use the same band scale
//! as the heatmap.

extern crate alloc;

use alloc::format;
use alloc::vec::Vec;

use gridvar_core::{GroupMark, Mark, MarkId, RectMark, TextAnchor, TextMark};
use kurbo::{Point, Rect};
use peniko::Color;

#[cfg(not(feature = "std"))]
use crate::float::FloatExt;
use crate::layout::HISTOGRAM_MARGIN_LEFT;
use crate::options::css_class;
use crate::panel::{RenderContext, ids};
use crate::scale::ScaleLinear;
use crate::z_order;

/// X position of the value labels, just right of the bars.
const VALUE_LABEL_X: f64 = 58.0;
/// Right edge of the histogram label.
const LABEL_X: f64 = 90.0;

/// The x scale for the current mapping.
pub(crate) fn x_scale(ctx: &RenderContext<'_>) -> ScaleLinear {
    let scale = ctx.options.histogram_mapping.resolved_scale();
    ScaleLinear::new((scale, 0.0), (0.0, ctx.layout.histogram_inner_width()))
}

/// Formats an axis tick as a whole percentage.
pub fn tick_label(value: f64) -> alloc::string::String {
    format!("{}%", (value * 100.0).round())
}

/// Formats a row value as a percentage with one decimal.
pub fn value_label(value: f64) -> alloc::string::String {
    format!("{:.1}%", value * 100.0)
}

/// Histogram marks, or nothing when no histogram data is configured.
pub(crate) fn histogram_marks(ctx: &RenderContext<'_>) -> Vec<Mark> {
    let mapping = &ctx.options.histogram_mapping;
    if !mapping.has_data() {
        return Vec::new();
    }
    let x = x_scale(ctx);
    let inner = ctx.layout.histogram_inner_width();
    let height = ctx.grid_height();
    let band = ctx.y.band();
    let mut out = Vec::new();

    out.push(
        Mark::new(
            ids::ROOT,
            GroupMark::new(Point::new(HISTOGRAM_MARGIN_LEFT, ctx.layout.margin.top)),
        )
        .with_z_index(z_order::PANEL),
    );

    for key in ctx.y.keys() {
        let (Some(y), Some(key_id)) = (ctx.y.offset(key), ctx.row_ids.get(key)) else {
            continue;
        };
        // Rows without a value get an empty bar at the grid side.
        let x0 = mapping.value(key).map_or(inner, |v| x.map(v));
        out.push(
            Mark::new(
                ids::bar(key_id),
                RectMark::new(Rect::new(x0, y, inner, y + band))
                    .with_fill(Color::BLACK)
                    .with_attr("class", css_class("bar")),
            )
            .with_parent(ids::ROOT)
            .with_z_index(z_order::CELLS),
        );
    }

    out.push(
        Mark::new(
            ids::AXIS,
            GroupMark::new(Point::new(0.0, height)).with_attr("class", css_class("xaxis")),
        )
        .with_parent(ids::ROOT)
        .with_z_index(z_order::AXIS_LABELS),
    );
    for (i, tick) in mapping.tick_values().into_iter().enumerate() {
        out.push(
            Mark::new(
                MarkId::from_raw(ids::TICK_BASE + i as u64),
                TextMark::new(Point::new(x.map(tick) - 4.0, 15.0), tick_label(tick))
                    .with_angle(-90.0)
                    .with_anchor(TextAnchor::End),
            )
            .with_parent(ids::AXIS)
            .with_z_index(z_order::AXIS_LABELS),
        );
    }

    out.push(
        Mark::new(
            ids::AXIS_Y,
            GroupMark::new(Point::new(inner, 0.0)).with_attr("class", css_class("yaxis")),
        )
        .with_parent(ids::ROOT)
        .with_z_index(z_order::AXIS_LABELS),
    );
    for key in ctx.y.keys() {
        let (Some(center), Some(key_id), Some(value)) =
            (ctx.y.center(key), ctx.row_ids.get(key), mapping.value(key))
        else {
            continue;
        };
        out.push(
            Mark::new(
                ids::key_label(key_id),
                TextMark::new(Point::new(VALUE_LABEL_X - inner, center), value_label(value))
                    .with_attr("dy", ".32em"),
            )
            .with_parent(ids::AXIS_Y)
            .with_z_index(z_order::AXIS_LABELS),
        );
    }

    if let Some(label) = &mapping.label {
        // 20px above the bottom of the panel.
        let pos = Point::new(
            LABEL_X - HISTOGRAM_MARGIN_LEFT,
            height + ctx.layout.margin.bottom - 20.0,
        );
        out.push(
            Mark::new(
                ids::HISTOGRAM_LABEL,
                TextMark::new(pos, label.as_str())
                    .with_anchor(TextAnchor::End)
                    .with_attr("class", css_class("x label")),
            )
            .with_parent(ids::ROOT)
            .with_z_index(z_order::TITLES),
        );
    }
    out
}
