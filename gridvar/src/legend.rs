// Copyright 2025 the GridVar Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Legend layout and marks.
//!
//! Every data dimension contributes one legend group of swatch + outline + label items, in
//! label-mapping order. Groups are either laid out side by side on a single line, or
//! stacked one line per dimension with an optional title in front.

extern crate alloc;

use alloc::string::String;
use alloc::vec::Vec;

use gridvar_core::{GroupMark, Mark, MarkId, RectMark, TextMark};
use kurbo::{Point, Rect, Size};
use peniko::Color;

use crate::cell::{set_attr, styled_shape};
use crate::measure::{FixedAdvanceMeasurer, TextMeasurer};
use crate::options::css_class;
use crate::panel::{RenderContext, ids};
use crate::style::{DimensionStyles, parse_hex_color};
use crate::z_order;

/// Gap between an item's label and the next item's swatch.
const ITEM_PADDING: f64 = 20.0;
/// Gap between a swatch and its label.
const LABEL_GAP: f64 = 5.0;
/// Gap between groups on a single line.
const GROUP_GAP: f64 = 10.0;
/// Leading space of the first group.
const LEADING: f64 = 5.0;

/// X offsets of the items of one legend group.
///
/// With titled multi-line legends, items start after space reserved for the longest title.
pub fn item_positions<S: AsRef<str>>(
    labels: &[S],
    swatch: f64,
    title_reserve: f64,
    measurer: &dyn TextMeasurer,
) -> Vec<f64> {
    let mut x = title_reserve;
    labels
        .iter()
        .map(|label| {
            let at = x;
            x += measurer.text_width(label.as_ref()) + swatch + ITEM_PADDING;
            at
        })
        .collect()
}

/// Legend marks and the panel size.
pub(crate) fn legend_marks(ctx: &RenderContext<'_>) -> (Vec<Mark>, Size) {
    let legend_styles = &ctx.options.legend_styles;
    let swatch = legend_styles.swatch_dimension;
    let line_height = swatch * 2.0 + 5.0;
    let multi = &ctx.options.multiple_legend_lines;
    let item_measurer = FixedAdvanceMeasurer::LEGEND;

    let titles: Vec<&str> = match (&multi.labels, multi.include) {
        (Some(labels), true) => labels.iter().map(String::as_str).collect(),
        _ => Vec::new(),
    };
    let longest_title = titles.iter().map(|t| t.chars().count()).max().unwrap_or(0);
    #[allow(
        clippy::cast_precision_loss,
        reason = "title lengths are far below 2^52"
    )]
    let longest_title = longest_title as f64;
    let title_reserve = if titles.is_empty() {
        0.0
    } else {
        FixedAdvanceMeasurer::LEGEND_TITLE.advance * longest_title
    };

    let mut out =
        alloc::vec![Mark::new(ids::ROOT, GroupMark::new(Point::ZERO)).with_z_index(z_order::PANEL)];
    let mut right: f64 = 0.0;
    let mut line_x = LEADING;
    let mut line_y = 0.0;
    let (swatch_y, text_y) = if multi.include {
        (0.0, 7.5)
    } else {
        (swatch * 0.5, 13.0)
    };
    if multi.include {
        // The swatches offset is the raw title length, not a measured width.
        line_x = LEADING + longest_title;
        line_y = 5.0;
    }

    for (d, (_, styles)) in ctx.styles.iter().enumerate() {
        let group_id = MarkId::from_raw(ids::LEGEND_LINE_BASE + d as u64 * ids::LEGEND_LINE_STRIDE);
        out.push(
            Mark::new(
                group_id,
                GroupMark::new(Point::new(line_x, line_y))
                    .with_attr("class", css_class("renderings")),
            )
            .with_parent(ids::ROOT)
            .with_z_index(z_order::LEGEND_SWATCHES),
        );
        let extent = group_marks(
            &mut out,
            group_id,
            styles,
            ctx,
            &item_measurer,
            title_reserve,
            (swatch_y, text_y),
        );
        right = right.max(line_x + extent.x1);

        if multi.include {
            let title = titles.get(d).copied().unwrap_or("");
            out.push(
                Mark::new(
                    MarkId::from_raw(ids::TITLE_BASE + d as u64),
                    TextMark::new(Point::new(0.0, line_y + 10.0), title)
                        .with_attr("class", css_class("legend-category-label")),
                )
                .with_parent(ids::ROOT)
                .with_z_index(z_order::TITLES),
            );
            line_y += line_height;
        } else {
            line_x += extent.width() + GROUP_GAP;
        }
    }

    #[allow(
        clippy::cast_precision_loss,
        reason = "dimension counts are tiny"
    )]
    let lines = ctx.styles.len() as f64;
    let height = if multi.include {
        line_height * lines
    } else {
        line_height
    };
    (out, Size::new(right, height))
}

/// Pushes the items of one dimension and returns their horizontal extent.
fn group_marks(
    out: &mut Vec<Mark>,
    group_id: MarkId,
    styles: &DimensionStyles,
    ctx: &RenderContext<'_>,
    measurer: &dyn TextMeasurer,
    title_reserve: f64,
    (swatch_y, text_y): (f64, f64),
) -> Rect {
    let legend_styles = &ctx.options.legend_styles;
    let swatch = legend_styles.swatch_dimension;
    let sw = legend_styles.stroke_width;
    let stroke = parse_hex_color(&legend_styles.stroke).unwrap_or(Color::TRANSPARENT);

    let items: Vec<(&String, &String)> = styles
        .labels
        .iter()
        .filter(|(key, _)| {
            let known = styles.get(key).is_some();
            if !known {
                tracing::trace!(key = %key, "legend label without a display style");
            }
            known
        })
        .collect();
    let labels: Vec<&str> = items.iter().map(|(_, l)| l.as_str()).collect();
    let positions = item_positions(&labels, swatch, title_reserve, measurer);

    let mut extent: Option<Rect> = None;
    for (i, ((key, label), x)) in items.iter().zip(positions).enumerate() {
        let Some(style) = styles.get(key) else {
            continue;
        };
        let base = group_id.raw() + 1 + 3 * i as u64;

        let mut shape = styled_shape(style, key, swatch, swatch).at(Point::new(x, swatch_y));
        set_attr(&mut shape.attrs, "class", css_class("legend-glyph"));
        out.push(
            Mark::new(MarkId::from_raw(base), shape)
                .with_parent(group_id)
                .with_z_index(z_order::LEGEND_SWATCHES),
        );

        let outline = Rect::from_origin_size((x - sw, swatch_y - sw), (swatch + sw, swatch + sw));
        let outline_width = if style.is_background() { 2.0 } else { 0.0 };
        out.push(
            Mark::new(
                MarkId::from_raw(base + 1),
                RectMark::new(outline).with_stroke(stroke, outline_width),
            )
            .with_parent(group_id)
            .with_z_index(z_order::LEGEND_OUTLINES),
        );

        let label_x = x + swatch + LABEL_GAP;
        out.push(
            Mark::new(
                MarkId::from_raw(base + 2),
                TextMark::new(Point::new(label_x, text_y), label.as_str())
                    .with_attr("class", css_class("legend-label")),
            )
            .with_parent(group_id)
            .with_z_index(z_order::LEGEND_LABELS),
        );

        let item = Rect::new(
            outline.x0,
            outline.y0,
            label_x + measurer.text_width(label),
            outline.y1,
        );
        extent = Some(extent.map_or(item, |e| e.union(item)));
    }
    extent.unwrap_or(Rect::ZERO)
}
