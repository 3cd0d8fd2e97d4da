// Copyright 2025 the GridVar Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Composition of panel fragments into one standalone SVG document.

use std::fmt::Write as _;

use gridvar::SvgFragments;

/// Gap between the row labels and the heatmap, and below the body.
pub const BUFFER: f64 = 10.0;
/// Horizontal offset of the legend.
pub const LEGEND_OFFSET_X: f64 = 3.0;

const HEADER: &str = concat!(
    r#"<?xml version="1.0" standalone="no"?>"#,
    "\n",
    r#"<!DOCTYPE svg PUBLIC "-//W3C//DTD SVG 1.1//EN" "http://www.w3.org/Graphics/SVG/1.1/DTD/svg11.dtd">"#,
    "\n",
);

/// Overall size of a composed document.
pub fn document_size(fragments: &SvgFragments) -> (f64, f64) {
    let (hist_w, hist_h) = fragments
        .histogram
        .as_ref()
        .map_or((0.0, fragments.heatmap.height), |h| (h.width, h.height));
    let legend = &fragments.legend;
    let heatmap_w = fragments.heatmap.width;
    let right = if heatmap_w > legend.width {
        heatmap_w
    } else {
        legend.width + BUFFER
    };
    (
        hist_w + fragments.row_labels.width + BUFFER + right,
        legend.height + hist_h + BUFFER,
    )
}

/// Composes the panels and `stylesheet` into an SVG 1.1 document.
///
/// The legend sits on top; histogram, row labels and heatmap are laid out left to right
/// below it.
pub fn compose_document(fragments: &SvgFragments, stylesheet: &str) -> String {
    let (width, height) = document_size(fragments);
    let legend_h = fragments.legend.height;
    let hist_w = fragments.histogram.as_ref().map_or(0.0, |h| h.width);
    let labels_w = fragments.row_labels.width;

    let mut out = String::from(HEADER);
    let _ = writeln!(
        out,
        r#"<svg xmlns="http://www.w3.org/2000/svg" version="1.1" width="{width}px" height="{height}px">"#
    );
    let _ = writeln!(
        out,
        "<defs><style type=\"text/css\">\n{stylesheet}</style></defs>"
    );
    let _ = write!(
        out,
        r#"<g transform="translate({LEGEND_OFFSET_X},0)">{}</g>"#,
        fragments.legend.markup
    );
    if let Some(histogram) = &fragments.histogram {
        let _ = write!(
            out,
            r#"<g transform="translate(0,{legend_h})">{}</g>"#,
            histogram.markup
        );
    }
    let _ = write!(
        out,
        r#"<g transform="translate({hist_w},{legend_h})">{}</g>"#,
        fragments.row_labels.markup
    );
    let _ = write!(
        out,
        r#"<g transform="translate({},{legend_h})">{}</g>"#,
        hist_w + labels_w + BUFFER,
        fragments.heatmap.markup
    );
    out.push_str("</svg>");
    out
}
