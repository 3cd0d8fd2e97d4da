// Copyright 2025 the GridVar Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Mark types.

use alloc::string::String;

use kurbo::{BezPath, Point, Rect, Shape, Vec2};
use peniko::{Brush, Color};
use smallvec::SmallVec;

/// Stable identity of a mark across scene ticks.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MarkId(pub u64);

impl MarkId {
    /// Wraps a raw id.
    pub const fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    /// Returns the raw id.
    pub const fn raw(self) -> u64 {
        self.0
    }
}

/// The kind of a mark, independent of its payload values.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MarkKind {
    /// A container that translates its children.
    Group,
    /// An SVG path.
    Path,
    /// An axis-aligned rectangle.
    Rect,
    /// A single line of text.
    Text,
}

/// Horizontal text anchor (SVG `text-anchor`).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TextAnchor {
    /// Text starts at the anchor point.
    Start,
    /// Text is centred on the anchor point.
    Middle,
    /// Text ends at the anchor point.
    End,
}

/// Vertical text baseline (SVG `dominant-baseline`).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TextBaseline {
    /// The renderer's default (alphabetic) baseline.
    Alphabetic,
    /// Vertically centred.
    Middle,
    /// Hanging below the anchor point.
    Hanging,
}

/// Free-form attribute (or CSS property) name/value pairs, in authored order.
///
/// Values are already resolved to their final text; the scene never evaluates callbacks.
pub type AttrList = SmallVec<[(String, String); 4]>;

/// Path geometry for a [`PathMark`].
#[derive(Clone, Debug, PartialEq)]
pub enum PathData {
    /// Geometry built in-process.
    Shape(BezPath),
    /// Pre-formatted SVG path data, passed through untouched.
    Svg(String),
}

impl PathData {
    /// Bounding box in the mark's local coordinates, when it is known.
    pub fn bounds(&self) -> Option<Rect> {
        match self {
            Self::Shape(path) => Some(path.bounding_box()),
            Self::Svg(_) => None,
        }
    }
}

/// A group that translates its children.
#[derive(Clone, Debug, PartialEq)]
pub struct GroupMark {
    /// Translation applied to every child.
    pub origin: Point,
    /// Extra attributes (`class`, `title`, ...).
    pub attrs: AttrList,
}

impl GroupMark {
    /// Creates a group at `origin`.
    pub fn new(origin: Point) -> Self {
        Self {
            origin,
            attrs: AttrList::new(),
        }
    }

    /// Appends an attribute.
    pub fn with_attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attrs.push((name.into(), value.into()));
        self
    }
}

/// A path mark.
#[derive(Clone, Debug, PartialEq)]
pub struct PathMark {
    /// Path geometry, relative to `origin`.
    pub path: PathData,
    /// Translation applied to the path.
    pub origin: Point,
    /// SVG attributes.
    pub attrs: AttrList,
    /// Inline CSS properties.
    pub styles: AttrList,
}

impl PathMark {
    /// Creates an untranslated path mark.
    pub fn new(path: PathData) -> Self {
        Self {
            path,
            origin: Point::ZERO,
            attrs: AttrList::new(),
            styles: AttrList::new(),
        }
    }

    /// Sets the translation.
    pub fn at(mut self, origin: Point) -> Self {
        self.origin = origin;
        self
    }

    /// Appends an attribute.
    pub fn with_attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attrs.push((name.into(), value.into()));
        self
    }

    /// Appends an inline style property.
    pub fn with_style(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.styles.push((name.into(), value.into()));
        self
    }
}

/// A rectangle mark.
#[derive(Clone, Debug, PartialEq)]
pub struct RectMark {
    /// Geometry in the parent's coordinates.
    pub rect: Rect,
    /// Fill paint. Fully transparent solid fills are written as `none`.
    pub fill: Brush,
    /// Stroke paint.
    pub stroke: Brush,
    /// Stroke width; `0` disables the stroke.
    pub stroke_width: f64,
    /// Extra attributes.
    pub attrs: AttrList,
}

impl RectMark {
    /// Creates an unstroked rectangle with a transparent fill.
    pub fn new(rect: Rect) -> Self {
        Self {
            rect,
            fill: Brush::Solid(Color::TRANSPARENT),
            stroke: Brush::Solid(Color::TRANSPARENT),
            stroke_width: 0.0,
            attrs: AttrList::new(),
        }
    }

    /// Sets the fill paint.
    pub fn with_fill(mut self, fill: impl Into<Brush>) -> Self {
        self.fill = fill.into();
        self
    }

    /// Sets stroke paint and width.
    pub fn with_stroke(mut self, stroke: impl Into<Brush>, stroke_width: f64) -> Self {
        self.stroke = stroke.into();
        self.stroke_width = stroke_width;
        self
    }

    /// Appends an attribute.
    pub fn with_attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attrs.push((name.into(), value.into()));
        self
    }
}

/// A text mark.
#[derive(Clone, Debug, PartialEq)]
pub struct TextMark {
    /// Anchor position in the parent's coordinates.
    pub pos: Point,
    /// Unshaped text.
    pub text: String,
    /// Rotation in degrees around `pos`.
    pub angle: f64,
    /// Horizontal anchor.
    pub anchor: TextAnchor,
    /// Vertical baseline.
    pub baseline: TextBaseline,
    /// Opacity in `0..=1`.
    pub opacity: f64,
    /// Extra attributes.
    pub attrs: AttrList,
}

impl TextMark {
    /// Creates start-anchored, fully opaque text.
    pub fn new(pos: Point, text: impl Into<String>) -> Self {
        Self {
            pos,
            text: text.into(),
            angle: 0.0,
            anchor: TextAnchor::Start,
            baseline: TextBaseline::Alphabetic,
            opacity: 1.0,
            attrs: AttrList::new(),
        }
    }

    /// Sets the rotation angle in degrees.
    pub fn with_angle(mut self, angle: f64) -> Self {
        self.angle = angle;
        self
    }

    /// Sets the text anchor.
    pub fn with_anchor(mut self, anchor: TextAnchor) -> Self {
        self.anchor = anchor;
        self
    }

    /// Sets the text baseline.
    pub fn with_baseline(mut self, baseline: TextBaseline) -> Self {
        self.baseline = baseline;
        self
    }

    /// Appends an attribute.
    pub fn with_attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attrs.push((name.into(), value.into()));
        self
    }
}

/// Mark geometry and paint.
#[derive(Clone, Debug, PartialEq)]
pub enum MarkPayload {
    /// See [`GroupMark`].
    Group(GroupMark),
    /// See [`PathMark`].
    Path(PathMark),
    /// See [`RectMark`].
    Rect(RectMark),
    /// See [`TextMark`].
    Text(TextMark),
}

impl MarkPayload {
    /// Returns the payload kind.
    pub fn kind(&self) -> MarkKind {
        match self {
            Self::Group(_) => MarkKind::Group,
            Self::Path(_) => MarkKind::Path,
            Self::Rect(_) => MarkKind::Rect,
            Self::Text(_) => MarkKind::Text,
        }
    }

    /// The point this payload is positioned at.
    ///
    /// For rectangles this is the top-left corner.
    pub fn origin(&self) -> Point {
        match self {
            Self::Group(g) => g.origin,
            Self::Path(p) => p.origin,
            Self::Rect(r) => r.rect.origin(),
            Self::Text(t) => t.pos,
        }
    }

    /// Bounds in the parent's coordinates, if they can be computed without text metrics.
    pub fn bounds(&self) -> Option<Rect> {
        match self {
            Self::Group(g) => Some(Rect::from_origin_size(g.origin, (0.0, 0.0))),
            Self::Path(p) => p.path.bounds().map(|b| b + p.origin.to_vec2()),
            Self::Rect(r) => Some(r.rect),
            Self::Text(_) => None,
        }
    }

    /// Returns a copy of this payload translated by `delta`.
    pub fn translated(&self, delta: Vec2) -> Self {
        let mut out = self.clone();
        match &mut out {
            Self::Group(g) => g.origin += delta,
            Self::Path(p) => p.origin += delta,
            Self::Rect(r) => r.rect = r.rect + delta,
            Self::Text(t) => t.pos += delta,
        }
        out
    }
}

/// A single scene element.
#[derive(Clone, Debug, PartialEq)]
pub struct Mark {
    /// Stable identity.
    pub id: MarkId,
    /// Enclosing group, if any.
    pub parent: Option<MarkId>,
    /// Paint order; ties are broken by id.
    pub z_index: i32,
    /// Geometry and paint.
    pub payload: MarkPayload,
}

impl Mark {
    /// Creates a top-level mark with `z_index = 0`.
    pub fn new(id: MarkId, payload: impl Into<MarkPayload>) -> Self {
        Self {
            id,
            parent: None,
            z_index: 0,
            payload: payload.into(),
        }
    }

    /// Places this mark inside `parent`.
    pub fn with_parent(mut self, parent: MarkId) -> Self {
        self.parent = Some(parent);
        self
    }

    /// Sets the paint order.
    pub fn with_z_index(mut self, z_index: i32) -> Self {
        self.z_index = z_index;
        self
    }

    /// Returns the payload kind.
    pub fn kind(&self) -> MarkKind {
        self.payload.kind()
    }
}

impl From<GroupMark> for MarkPayload {
    fn from(value: GroupMark) -> Self {
        Self::Group(value)
    }
}

impl From<PathMark> for MarkPayload {
    fn from(value: PathMark) -> Self {
        Self::Path(value)
    }
}

impl From<RectMark> for MarkPayload {
    fn from(value: RectMark) -> Self {
        Self::Rect(value)
    }
}

impl From<TextMark> for MarkPayload {
    fn from(value: TextMark) -> Self {
        Self::Text(value)
    }
}
