// Copyright 2025 the GridVar Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Renderer specs and their normalization into display styles.
//!
//! Users describe how each category value is drawn with a [`RendererSpec`]: a background
//! color, the name of a built-in glyph, a path function, or an object of SVG attributes and
//! CSS styles. Specs are resolved once, when the widget is configured, into a
//! [`DisplayStyle`] with the widget defaults merged in. Rendering only ever reads the
//! resulting [`DisplayStyleTable`].

extern crate alloc;

use alloc::format;
use alloc::string::{String, ToString};
use alloc::sync::Arc;
use alloc::vec::Vec;
use core::fmt;

use gridvar_core::PathData;
use peniko::Color;
use serde::{Deserialize, Deserializer};

use crate::OrderedMap;
use crate::data::DataIndex;
use crate::error::ConfigError;
use crate::glyph::{Glyph, GlyphTable};
use crate::options::DisplayMapping;

/// A callback computing an attribute (or path) from `(datum, cell_width, cell_height)`.
///
/// `datum` is the category value being drawn.
pub type AttrFn = Arc<dyn Fn(&str, f64, f64) -> String>;

/// An attribute or style value.
#[derive(Clone)]
pub enum AttrValue {
    /// A number, written in its shortest form.
    Number(f64),
    /// Literal text.
    Text(String),
    /// Computed per shape from the datum and the shape's cell size.
    Computed(AttrFn),
}

impl AttrValue {
    /// Wraps a callback.
    pub fn computed(f: impl Fn(&str, f64, f64) -> String + 'static) -> Self {
        Self::Computed(Arc::new(f))
    }

    /// Resolves the value for one shape.
    pub fn resolve(&self, datum: &str, width: f64, height: f64) -> String {
        match self {
            Self::Number(n) => format!("{n}"),
            Self::Text(s) => s.clone(),
            Self::Computed(f) => f(datum, width, height),
        }
    }
}

impl fmt::Debug for AttrValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) => f.debug_tuple("Number").field(n).finish(),
            Self::Text(s) => f.debug_tuple("Text").field(s).finish(),
            Self::Computed(_) => f.write_str("Computed(..)"),
        }
    }
}

impl PartialEq for AttrValue {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Number(a), Self::Number(b)) => a == b,
            (Self::Text(a), Self::Text(b)) => a == b,
            (Self::Computed(a), Self::Computed(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl From<f64> for AttrValue {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<&str> for AttrValue {
    fn from(value: &str) -> Self {
        Self::Text(value.into())
    }
}

impl From<String> for AttrValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum AttrRepr {
    Number(f64),
    Text(String),
}

impl<'de> Deserialize<'de> for AttrValue {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(match AttrRepr::deserialize(deserializer)? {
            AttrRepr::Number(n) => Self::Number(n),
            AttrRepr::Text(s) => Self::Text(s),
        })
    }
}

/// Attribute or style name → value, in authored order.
pub type StyleMap = OrderedMap<String, AttrValue>;

/// Whether an entry draws over the cell or fills it.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RenderType {
    /// A shape overlaid on the cell.
    #[default]
    Glyph,
    /// A colored fill of the whole cell.
    Background,
}

/// Where a shape's path comes from.
#[derive(Clone)]
pub enum PathSource {
    /// A built-in glyph.
    Glyph(Glyph),
    /// A user callback returning SVG path data.
    Custom(AttrFn),
    /// Literal SVG path data.
    Svg(String),
}

impl PathSource {
    /// Resolves the path for one shape of `width × height`.
    pub fn resolve(&self, datum: &str, width: f64, height: f64) -> PathData {
        match self {
            Self::Glyph(g) => PathData::Shape(g.path(width, height)),
            Self::Custom(f) => PathData::Svg(f(datum, width, height)),
            Self::Svg(s) => PathData::Svg(s.clone()),
        }
    }

    fn from_attr(value: AttrValue, glyphs: &GlyphTable) -> Self {
        match value {
            AttrValue::Text(s) => match glyphs.lookup(&s) {
                Some(g) => Self::Glyph(g),
                None => Self::Svg(s),
            },
            AttrValue::Number(n) => Self::Svg(format!("{n}")),
            AttrValue::Computed(f) => Self::Custom(f),
        }
    }
}

impl fmt::Debug for PathSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Glyph(g) => f.debug_tuple("Glyph").field(g).finish(),
            Self::Custom(_) => f.write_str("Custom(..)"),
            Self::Svg(s) => f.debug_tuple("Svg").field(s).finish(),
        }
    }
}

impl PartialEq for PathSource {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Glyph(a), Self::Glyph(b)) => a == b,
            (Self::Custom(a), Self::Custom(b)) => Arc::ptr_eq(a, b),
            (Self::Svg(a), Self::Svg(b)) => a == b,
            _ => false,
        }
    }
}

/// The object form of a renderer spec.
///
/// An `attrs.d` entry naming a built-in glyph resolves to that glyph; any other `d` text is
/// used as literal path data.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StyleAttrObject {
    /// SVG attributes.
    pub attrs: Option<StyleMap>,
    /// CSS styles.
    pub styles: Option<StyleMap>,
    /// An already resolved path, taking precedence over `attrs.d`.
    #[serde(skip)]
    pub path: Option<PathSource>,
    /// Render type; defaults to [`RenderType::Glyph`].
    pub render_type: Option<RenderType>,
}

impl StyleAttrObject {
    /// Creates an object with empty `attrs` and `styles`.
    pub fn new() -> Self {
        Self {
            attrs: Some(StyleMap::default()),
            styles: Some(StyleMap::default()),
            path: None,
            render_type: None,
        }
    }

    /// Adds an attribute.
    pub fn with_attr(mut self, name: impl Into<String>, value: impl Into<AttrValue>) -> Self {
        self.attrs
            .get_or_insert_with(StyleMap::default)
            .insert(name.into(), value.into());
        self
    }

    /// Adds a style.
    pub fn with_style(mut self, name: impl Into<String>, value: impl Into<AttrValue>) -> Self {
        self.styles
            .get_or_insert_with(StyleMap::default)
            .insert(name.into(), value.into());
        self
    }

    /// Sets the render type.
    pub fn with_render_type(mut self, render_type: RenderType) -> Self {
        self.render_type = Some(render_type);
        self
    }
}

/// How one category value should be drawn, as supplied by the user.
#[derive(Clone)]
pub enum RendererSpec {
    /// A `#`-prefixed background color.
    Color(String),
    /// The name of a built-in glyph.
    Named(String),
    /// A callback producing SVG path data.
    PathFunction(AttrFn),
    /// Explicit attributes and styles.
    Object(StyleAttrObject),
}

impl RendererSpec {
    /// Wraps a path callback.
    pub fn path_fn(f: impl Fn(&str, f64, f64) -> String + 'static) -> Self {
        Self::PathFunction(Arc::new(f))
    }

    /// Classifies a renderer string: `#…` is a color, anything else a glyph name.
    pub fn from_text(text: impl Into<String>) -> Self {
        let text = text.into();
        if text.starts_with('#') {
            Self::Color(text)
        } else {
            Self::Named(text)
        }
    }

    /// Resolves this spec for category `value` into a [`DisplayStyle`].
    ///
    /// Normalizing the [`DisplayStyle::to_spec`] of a result yields an equal result.
    pub fn normalize(
        &self,
        value: &str,
        glyphs: &GlyphTable,
        defaults: &RenderDefaults,
    ) -> Result<DisplayStyle, ConfigError> {
        match self {
            Self::Color(color) => {
                if parse_hex_color(color).is_none() {
                    return Err(ConfigError::InvalidColor {
                        value: color.clone(),
                    });
                }
                let mut supplied = StyleMap::default();
                supplied.insert("stroke-width".into(), AttrValue::Number(0.0));
                supplied.insert("opacity".into(), AttrValue::Number(1.0));
                supplied.insert("fill".into(), AttrValue::Text(color.clone()));
                let mut styles = merged(&defaults.styles, &supplied);
                styles.shift_remove("stroke");
                Ok(DisplayStyle {
                    render_type: RenderType::Background,
                    path: PathSource::Glyph(Glyph::Rect),
                    styles,
                    attrs: defaults.attrs.clone(),
                })
            }
            Self::Named(name) => {
                let glyph = glyphs
                    .lookup(name)
                    .ok_or_else(|| ConfigError::UnknownRenderer {
                        name: name.clone(),
                        available: glyphs.names(),
                    })?;
                Ok(DisplayStyle {
                    render_type: RenderType::Glyph,
                    path: PathSource::Glyph(glyph),
                    styles: defaults.styles.clone(),
                    attrs: defaults.attrs.clone(),
                })
            }
            Self::PathFunction(f) => Ok(DisplayStyle {
                render_type: RenderType::Glyph,
                path: PathSource::Custom(f.clone()),
                styles: defaults.styles.clone(),
                attrs: defaults.attrs.clone(),
            }),
            Self::Object(obj) => {
                if obj.attrs.is_none() && obj.styles.is_none() && obj.path.is_none() {
                    return Err(ConfigError::EmptyRendererObject {
                        value: value.to_string(),
                    });
                }
                let mut attrs = obj.attrs.clone().unwrap_or_default();
                let from_d = attrs
                    .shift_remove("d")
                    .map(|d| PathSource::from_attr(d, glyphs));
                let path = obj
                    .path
                    .clone()
                    .or(from_d)
                    .unwrap_or_else(|| PathSource::Svg(String::new()));
                let supplied_styles = obj.styles.clone().unwrap_or_default();
                let render_type = obj.render_type.unwrap_or_default();
                let mut styles = merged(&defaults.styles, &supplied_styles);
                if render_type == RenderType::Background && !supplied_styles.contains_key("stroke")
                {
                    styles.shift_remove("stroke");
                }
                Ok(DisplayStyle {
                    render_type,
                    path,
                    styles,
                    attrs: merged(&defaults.attrs, &attrs),
                })
            }
        }
    }
}

impl fmt::Debug for RendererSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Color(c) => f.debug_tuple("Color").field(c).finish(),
            Self::Named(n) => f.debug_tuple("Named").field(n).finish(),
            Self::PathFunction(_) => f.write_str("PathFunction(..)"),
            Self::Object(o) => f.debug_tuple("Object").field(o).finish(),
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RendererRepr {
    Text(String),
    Object(StyleAttrObject),
}

impl<'de> Deserialize<'de> for RendererSpec {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(match RendererRepr::deserialize(deserializer)? {
            RendererRepr::Text(s) => Self::from_text(s),
            RendererRepr::Object(o) => Self::Object(o),
        })
    }
}

impl From<&str> for RendererSpec {
    fn from(value: &str) -> Self {
        Self::from_text(value)
    }
}

impl From<StyleAttrObject> for RendererSpec {
    fn from(value: StyleAttrObject) -> Self {
        Self::Object(value)
    }
}

fn merged(defaults: &StyleMap, supplied: &StyleMap) -> StyleMap {
    let mut out = defaults.clone();
    for (k, v) in supplied {
        out.insert(k.clone(), v.clone());
    }
    out
}

/// Parses `#rgb`, `#rgba`, `#rrggbb` or `#rrggbbaa`.
pub fn parse_hex_color(text: &str) -> Option<Color> {
    let hex = text.strip_prefix('#')?;
    if !hex.is_ascii() {
        return None;
    }
    let nibble = |i: usize| u8::from_str_radix(hex.get(i..=i)?, 16).ok();
    let byte = |i: usize| u8::from_str_radix(hex.get(i..i + 2)?, 16).ok();
    let (r, g, b, a) = match hex.len() {
        3 | 4 => {
            let a = if hex.len() == 4 { nibble(3)? * 17 } else { 255 };
            (nibble(0)? * 17, nibble(1)? * 17, nibble(2)? * 17, a)
        }
        6 | 8 => {
            let a = if hex.len() == 8 { byte(6)? } else { 255 };
            (byte(0)?, byte(2)?, byte(4)?, a)
        }
        _ => return None,
    };
    Some(Color::from_rgba8(r, g, b, a))
}

/// Defaults every normalized entry starts from.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RenderDefaults {
    /// Default CSS styles.
    pub styles: StyleMap,
    /// Default SVG attributes (`opacity`, `class`).
    pub attrs: StyleMap,
}

/// A normalized renderer.
#[derive(Clone, Debug, PartialEq)]
pub struct DisplayStyle {
    /// Glyph or background.
    pub render_type: RenderType,
    /// Path geometry.
    pub path: PathSource,
    /// CSS styles, defaults first.
    pub styles: StyleMap,
    /// SVG attributes, defaults first.
    pub attrs: StyleMap,
}

impl DisplayStyle {
    /// Whether this entry fills the whole cell.
    pub fn is_background(&self) -> bool {
        self.render_type == RenderType::Background
    }

    /// Converts back into a spec, for re-normalization.
    pub fn to_spec(&self) -> RendererSpec {
        RendererSpec::Object(StyleAttrObject {
            attrs: Some(self.attrs.clone()),
            styles: Some(self.styles.clone()),
            path: Some(self.path.clone()),
            render_type: Some(self.render_type),
        })
    }
}

/// The display styles of one data dimension.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct DimensionStyles {
    /// Category value → style, in authored order.
    pub entries: OrderedMap<String, DisplayStyle>,
    /// Category value → legend label, in legend order.
    pub labels: OrderedMap<String, String>,
}

impl DimensionStyles {
    /// Looks up the style of a category value.
    pub fn get(&self, value: &str) -> Option<&DisplayStyle> {
        self.entries.get(value)
    }
}

/// Data dimension → display styles.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct DisplayStyleTable {
    dimensions: OrderedMap<String, DimensionStyles>,
}

impl DisplayStyleTable {
    /// Normalizes every renderer of every display mapping.
    ///
    /// Label mappings are copied; when a mapping has none, each category value labels itself.
    pub fn compute(
        mappings: &[DisplayMapping],
        index: &DataIndex,
        glyphs: &GlyphTable,
        defaults: &RenderDefaults,
    ) -> Result<Self, ConfigError> {
        let mut dimensions = OrderedMap::default();
        for mapping in mappings {
            if !index.dimensions.contains_key(&mapping.data_type) {
                return Err(ConfigError::UnknownDimension {
                    dimension: mapping.data_type.clone(),
                });
            }
            let mut entries = OrderedMap::default();
            for (value, spec) in &mapping.mappings {
                entries.insert(value.clone(), spec.normalize(value, glyphs, defaults)?);
            }
            let labels = match &mapping.label_mapping {
                Some(labels) => labels.clone(),
                None => mapping
                    .mappings
                    .keys()
                    .map(|k| (k.clone(), k.clone()))
                    .collect(),
            };
            tracing::debug!(
                dimension = %mapping.data_type,
                entries = entries.len(),
                "computed display styles"
            );
            dimensions.insert(mapping.data_type.clone(), DimensionStyles { entries, labels });
        }
        Ok(Self { dimensions })
    }

    /// Styles for a data dimension.
    pub fn get(&self, dimension: &str) -> Option<&DimensionStyles> {
        self.dimensions.get(dimension)
    }

    /// Dimensions in display-mapping order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &DimensionStyles)> {
        self.dimensions.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Number of dimensions.
    pub fn len(&self) -> usize {
        self.dimensions.len()
    }

    /// Whether no dimension is styled.
    pub fn is_empty(&self) -> bool {
        self.dimensions.is_empty()
    }

    /// Dimension names in order.
    pub fn dimension_names(&self) -> Vec<&str> {
        self.dimensions.keys().map(String::as_str).collect()
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use super::*;

    fn defaults() -> RenderDefaults {
        let mut styles = StyleMap::default();
        styles.insert("fill".into(), "none".into());
        styles.insert("stroke".into(), "#888888".into());
        styles.insert("stroke-width".into(), 2.0.into());
        styles.insert("stroke-opacity".into(), 1.0.into());
        let mut attrs = StyleMap::default();
        attrs.insert("opacity".into(), 0.6.into());
        attrs.insert("class".into(), "nibr-gridVar-glyph".into());
        RenderDefaults { styles, attrs }
    }

    #[test]
    fn color_spec_becomes_unstroked_background() {
        let style = RendererSpec::from("#bb88bb")
            .normalize("Missense", &GlyphTable::builtin(), &defaults())
            .unwrap();
        assert!(style.is_background());
        assert_eq!(style.path, PathSource::Glyph(Glyph::Rect));
        assert_eq!(style.styles.get("fill"), Some(&"#bb88bb".into()));
        assert_eq!(style.styles.get("stroke-width"), Some(&0.0.into()));
        assert_eq!(style.styles.get("opacity"), Some(&1.0.into()));
        assert!(style.styles.get("stroke").is_none());
    }

    #[test]
    fn named_glyph_keeps_defaults() {
        let style = RendererSpec::from("circleRenderer")
            .normalize("x", &GlyphTable::builtin(), &defaults())
            .unwrap();
        assert_eq!(style.render_type, RenderType::Glyph);
        assert_eq!(style.styles, defaults().styles);
        assert_eq!(style.attrs, defaults().attrs);
    }

    #[test]
    fn unknown_name_lists_available_glyphs() {
        let err = RendererSpec::from("star")
            .normalize("x", &GlyphTable::builtin(), &defaults())
            .unwrap_err();
        assert_eq!(
            err,
            ConfigError::UnknownRenderer {
                name: "star".into(),
                available: "dot, minus, plus, circle, x, rect".into(),
            }
        );
    }

    #[test]
    fn malformed_colors_are_rejected() {
        let err = RendererSpec::from("#zz")
            .normalize("x", &GlyphTable::builtin(), &defaults())
            .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidColor { .. }));
    }

    #[test]
    fn empty_object_is_rejected() {
        let err = RendererSpec::Object(StyleAttrObject::default())
            .normalize("Missense", &GlyphTable::builtin(), &defaults())
            .unwrap_err();
        assert_eq!(
            err,
            ConfigError::EmptyRendererObject {
                value: "Missense".into()
            }
        );
    }

    #[test]
    fn object_d_resolves_builtin_names_and_literals() {
        let glyphs = GlyphTable::builtin();
        let named = RendererSpec::from(StyleAttrObject::new().with_attr("d", "plus"))
            .normalize("v", &glyphs, &defaults())
            .unwrap();
        assert_eq!(named.path, PathSource::Glyph(Glyph::Plus));
        assert!(named.attrs.get("d").is_none());

        let literal = RendererSpec::from(StyleAttrObject::new().with_attr("d", "M0,0L5,5"))
            .normalize("v", &glyphs, &defaults())
            .unwrap();
        assert_eq!(literal.path, PathSource::Svg("M0,0L5,5".into()));
    }

    #[test]
    fn normalization_is_idempotent() {
        let glyphs = GlyphTable::builtin();
        let d = defaults();
        let specs = [
            RendererSpec::from("#ADDD8E"),
            RendererSpec::from("dot"),
            RendererSpec::path_fn(|_, w, h| std::format!("M0,0L{w},{h}")),
            RendererSpec::from(
                StyleAttrObject::new()
                    .with_style("fill", "#777777")
                    .with_attr("width", AttrValue::computed(|_, w, _| std::format!("{w}"))),
            ),
        ];
        for spec in specs {
            let once = spec.normalize("v", &glyphs, &d).unwrap();
            let twice = once.to_spec().normalize("v", &glyphs, &d).unwrap();
            assert_eq!(once, twice);
        }
    }

    #[test]
    fn computed_attrs_receive_cell_size() {
        let v = AttrValue::computed(|datum, w, h| std::format!("{datum}:{w}x{h}"));
        assert_eq!(v.resolve("Missense", 12.0, 10.0), "Missense:12x10");
    }

    #[test]
    fn renderer_specs_deserialize_from_strings_and_objects() {
        let color: RendererSpec = serde_json::from_str("\"#bb88bb\"").unwrap();
        assert!(matches!(color, RendererSpec::Color(_)));
        let named: RendererSpec = serde_json::from_str("\"dotRenderer\"").unwrap();
        assert!(matches!(named, RendererSpec::Named(_)));
        let obj: RendererSpec =
            serde_json::from_str(r##"{"styles": {"fill": "#777777", "stroke-width": 0}}"##).unwrap();
        let RendererSpec::Object(obj) = obj else {
            panic!("expected an object spec");
        };
        assert_eq!(
            obj.styles.unwrap().get("stroke-width"),
            Some(&AttrValue::Number(0.0))
        );
    }

    #[test]
    fn hex_colors_parse_in_all_lengths() {
        assert_eq!(parse_hex_color("#fff"), Some(Color::from_rgba8(255, 255, 255, 255)));
        assert_eq!(parse_hex_color("#aaaaaa"), Some(Color::from_rgba8(170, 170, 170, 255)));
        assert_eq!(parse_hex_color("#00000080"), Some(Color::from_rgba8(0, 0, 0, 128)));
        assert_eq!(parse_hex_color("red"), None);
        assert_eq!(parse_hex_color("#12345"), None);
    }
}
