// Copyright 2025 the GridVar Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! SVG serialization of a panel scene.
//!
//! Each panel serializes to a standalone `<svg>` element. Marks are written in paint order,
//! with children nested inside their group's `<g>`.

extern crate alloc;

use alloc::format;
use alloc::string::{String, ToString};
use core::fmt::Write as _;

use gridvar_core::{
    AttrList, Mark, MarkPayload, PathData, PathMark, RectMark, Scene, TextAnchor, TextBaseline,
    TextMark,
};
use kurbo::{BezPath, PathEl, Point, Size};
use peniko::Brush;

/// One serialized panel.
#[derive(Clone, Debug, PartialEq)]
pub struct PanelSvg {
    /// The `<svg>` element.
    pub markup: String,
    /// Width, rounded up to whole pixels.
    pub width: f64,
    /// Height, rounded up to whole pixels.
    pub height: f64,
}

/// Every panel of a widget, serialized for export.
#[derive(Clone, Debug, PartialEq)]
pub struct SvgFragments {
    /// The legend.
    pub legend: PanelSvg,
    /// The histogram, when histogram data is configured.
    pub histogram: Option<PanelSvg>,
    /// The row labels.
    pub row_labels: PanelSvg,
    /// The grid and its column labels.
    pub heatmap: PanelSvg,
}

/// Serializes `scene` into an `<svg>` element of the given size and class.
pub fn scene_to_svg(scene: &Scene, size: Size, class: &str) -> String {
    let mut out = String::new();
    let _ = write!(
        out,
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{}" height="{}" class="{}">"#,
        num(size.width),
        num(size.height),
        escape_xml(class)
    );
    for mark in scene.roots() {
        write_mark(&mut out, scene, mark);
    }
    out.push_str("</svg>");
    out
}

fn write_mark(out: &mut String, scene: &Scene, mark: &Mark) {
    match &mark.payload {
        MarkPayload::Group(g) => {
            out.push_str("<g");
            if g.origin != Point::ZERO {
                let _ = write!(
                    out,
                    r#" transform="translate({},{})""#,
                    num(g.origin.x),
                    num(g.origin.y)
                );
            }
            write_attrs(out, &g.attrs);
            out.push('>');
            for child in scene.children(mark.id) {
                write_mark(out, scene, child);
            }
            out.push_str("</g>");
        }
        MarkPayload::Path(p) => write_path(out, p),
        MarkPayload::Rect(r) => write_rect(out, r),
        MarkPayload::Text(t) => write_text(out, t),
    }
}

fn write_path(out: &mut String, p: &PathMark) {
    let d = match &p.path {
        PathData::Shape(path) => path_data(path),
        PathData::Svg(s) => s.clone(),
    };
    let _ = write!(out, r#"<path d="{}""#, escape_xml(&d));
    if p.origin != Point::ZERO {
        let _ = write!(
            out,
            r#" transform="translate({},{})""#,
            num(p.origin.x),
            num(p.origin.y)
        );
    }
    write_attrs(out, &p.attrs);
    if !p.styles.is_empty() {
        let style = p
            .styles
            .iter()
            .filter(|(k, _)| valid_name(k, "style property"))
            .map(|(k, v)| format!("{k}: {v};"))
            .collect::<alloc::vec::Vec<_>>()
            .join(" ");
        let _ = write!(out, r#" style="{}""#, escape_xml(&style));
    }
    out.push_str("/>");
}

fn write_rect(out: &mut String, r: &RectMark) {
    let _ = write!(
        out,
        r#"<rect x="{}" y="{}" width="{}" height="{}""#,
        num(r.rect.x0),
        num(r.rect.y0),
        num(r.rect.width()),
        num(r.rect.height()),
    );
    write_paint_attr(out, "fill", &r.fill);
    if r.stroke_width > 0.0 {
        write_paint_attr(out, "stroke", &r.stroke);
        let _ = write!(out, r#" stroke-width="{}""#, num(r.stroke_width));
    }
    write_attrs(out, &r.attrs);
    out.push_str("/>");
}

fn write_text(out: &mut String, t: &TextMark) {
    let _ = write!(out, r#"<text x="{}" y="{}""#, num(t.pos.x), num(t.pos.y));
    if t.angle != 0.0 {
        let _ = write!(
            out,
            r#" transform="rotate({} {} {})""#,
            num(t.angle),
            num(t.pos.x),
            num(t.pos.y)
        );
    }
    out.push_str(match t.anchor {
        TextAnchor::Start => "",
        TextAnchor::Middle => r#" text-anchor="middle""#,
        TextAnchor::End => r#" text-anchor="end""#,
    });
    out.push_str(match t.baseline {
        TextBaseline::Alphabetic => "",
        TextBaseline::Middle => r#" dominant-baseline="middle""#,
        TextBaseline::Hanging => r#" dominant-baseline="hanging""#,
    });
    if t.opacity != 1.0 {
        let _ = write!(out, r#" opacity="{}""#, num(t.opacity));
    }
    write_attrs(out, &t.attrs);
    out.push('>');
    out.push_str(&escape_xml(&t.text));
    out.push_str("</text>");
}

fn write_attrs(out: &mut String, attrs: &AttrList) {
    for (k, v) in attrs {
        if valid_name(k, "attribute") {
            let _ = write!(out, r#" {k}="{}""#, escape_xml(v));
        }
    }
}

/// Whether `name` can be written unescaped as an attribute or CSS property name.
///
/// Names come from user `styles`/`attrs` objects; anything else is dropped.
fn valid_name(name: &str, what: &str) -> bool {
    let mut chars = name.chars();
    let ok = chars
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_' || c == '-')
        && chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | ':' | '.'));
    if !ok {
        tracing::warn!(name, what, "skipping invalid SVG name");
    }
    ok
}

/// Formats a number the way SVG expects: shortest form, no negative zero.
pub(crate) fn num(v: f64) -> String {
    if v == 0.0 {
        return "0".to_string();
    }
    format!("{v}")
}

/// SVG path data for a kurbo path.
pub fn path_data(path: &BezPath) -> String {
    let mut d = String::new();
    for el in path.elements() {
        let _ = match *el {
            PathEl::MoveTo(p) => write!(d, "M{},{}", num(p.x), num(p.y)),
            PathEl::LineTo(p) => write!(d, "L{},{}", num(p.x), num(p.y)),
            PathEl::QuadTo(a, p) => write!(
                d,
                "Q{},{} {},{}",
                num(a.x),
                num(a.y),
                num(p.x),
                num(p.y)
            ),
            PathEl::CurveTo(a, b, p) => write!(
                d,
                "C{},{} {},{} {},{}",
                num(a.x),
                num(a.y),
                num(b.x),
                num(b.y),
                num(p.x),
                num(p.y)
            ),
            PathEl::ClosePath => write!(d, "Z"),
        };
    }
    d
}

fn svg_paint(brush: &Brush) -> (String, Option<f64>) {
    match brush {
        Brush::Solid(color) => {
            let rgba = color.to_rgba8();
            if rgba.a == 0 {
                return ("none".to_string(), None);
            }
            let fill = format!("#{:02x}{:02x}{:02x}", rgba.r, rgba.g, rgba.b);
            let opacity = if rgba.a == 255 {
                None
            } else {
                Some(f64::from(rgba.a) / 255.0)
            };
            (fill, opacity)
        }
        _ => ("none".to_string(), None),
    }
}

fn write_paint_attr(out: &mut String, name: &str, brush: &Brush) {
    let (value, opacity) = svg_paint(brush);
    let _ = write!(out, r#" {name}="{value}""#);
    if let Some(o) = opacity {
        let _ = write!(out, r#" {name}-opacity="{}""#, num(o));
    }
}

/// Escapes XML special characters in text and attribute values.
pub fn escape_xml(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
    out
}
