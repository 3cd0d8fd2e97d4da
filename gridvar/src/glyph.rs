// Copyright 2025 the GridVar Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Built-in glyph shapes.
//!
//! Every glyph is drawn in cell-local coordinates, with `(0, 0)` at the top-left corner of
//! a `width × height` cell.

extern crate alloc;

use alloc::string::String;
use alloc::vec::Vec;

use kurbo::{BezPath, Circle, Shape};

/// A built-in glyph.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Glyph {
    /// A small filled dot (radius 1) at the cell centre.
    Dot,
    /// A horizontal bar.
    Minus,
    /// A plus sign.
    Plus,
    /// A circle a third of the half-cell in radius.
    Circle,
    /// An X.
    X,
    /// The cell outline, inset by one pixel on the right and bottom.
    Rect,
}

impl Glyph {
    /// All built-in glyphs in registration order.
    pub const ALL: [Self; 6] = [
        Self::Dot,
        Self::Minus,
        Self::Plus,
        Self::Circle,
        Self::X,
        Self::Rect,
    ];

    /// Short name, as accepted in renderer strings.
    pub fn name(self) -> &'static str {
        match self {
            Self::Dot => "dot",
            Self::Minus => "minus",
            Self::Plus => "plus",
            Self::Circle => "circle",
            Self::X => "x",
            Self::Rect => "rect",
        }
    }

    /// Resolves `dot` as well as the long form `dotRenderer`.
    pub fn from_name(name: &str) -> Option<Self> {
        let short = name.strip_suffix("Renderer").unwrap_or(name);
        Self::ALL.into_iter().find(|g| g.name() == short)
    }

    /// Builds the glyph path for a `width × height` cell.
    pub fn path(self, width: f64, height: f64) -> BezPath {
        let size = width.min(height);
        let half = size * 0.5;
        let mut p = BezPath::new();
        match self {
            Self::Dot => return circle_path(half, 1.0),
            Self::Circle => return circle_path(half, half / 3.0),
            Self::Minus => {
                let r = half / 3.0;
                p.move_to((r, half));
                p.line_to((size - r, half));
            }
            Self::Plus => {
                // Plus is sized from the width alone.
                let half = width * 0.5;
                let r = half / 3.0;
                p.move_to((half, r));
                p.line_to((half, width - r));
                p.move_to((r, half));
                p.line_to((width - r, half));
            }
            Self::X => {
                let center = (size - 1.0) * 0.5;
                let r = center * 0.5;
                p.move_to((center - r, center - r));
                p.line_to((center + r, center + r));
                p.move_to((center - r, center + r));
                p.line_to((center + r, center - r));
            }
            Self::Rect => {
                p.move_to((0.0, 0.0));
                p.line_to((width - 1.0, 0.0));
                p.line_to((width - 1.0, height - 1.0));
                p.line_to((0.0, height - 1.0));
                p.line_to((0.0, 0.0));
            }
        }
        p
    }
}

fn circle_path(center: f64, r: f64) -> BezPath {
    let tolerance = 0.1;
    Circle::new((center, center), r)
        .path_elements(tolerance)
        .collect()
}

/// The set of named glyphs renderer strings may refer to.
///
/// The table is immutable once built and is passed explicitly to style normalization.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GlyphTable {
    glyphs: Vec<Glyph>,
}

impl GlyphTable {
    /// The six built-in glyphs.
    pub fn builtin() -> Self {
        Self {
            glyphs: Glyph::ALL.to_vec(),
        }
    }

    /// Looks up a glyph by short or long name.
    pub fn lookup(&self, name: &str) -> Option<Glyph> {
        Glyph::from_name(name).filter(|g| self.glyphs.contains(g))
    }

    /// Comma-separated glyph names, for error messages.
    pub fn names(&self) -> String {
        let names: Vec<&str> = self.glyphs.iter().map(|g| g.name()).collect();
        names.join(", ")
    }
}

impl Default for GlyphTable {
    fn default() -> Self {
        Self::builtin()
    }
}
