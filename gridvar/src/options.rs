// Copyright 2025 the GridVar Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Construction options.
//!
//! Options deserialize from the same camelCase JSON shape the widget has always accepted.
//! Missing fields take their defaults. Callbacks (`cellTip`, path functions, computed
//! attributes) cannot be expressed in JSON and are set with the builder methods.

extern crate alloc;

use alloc::format;
use alloc::string::String;
use alloc::sync::Arc;
use alloc::vec::Vec;
use core::fmt;

use serde::de::Error as _;
use serde::{Deserialize, Deserializer};

use crate::OrderedMap;
use crate::data::{DataMapping, DataRow};
use crate::error::ConfigError;
use crate::style::{AttrValue, RenderDefaults, RendererSpec, StyleMap};

/// Prefix of every CSS class the widget emits.
pub const WIDGET_CLASS: &str = "nibr-gridVar";

/// Namespaces a CSS class: `css_class("cell") == "nibr-gridVar-cell"`.
pub fn css_class(name: &str) -> String {
    format!("{WIDGET_CLASS}-{name}")
}

/// Produces the tooltip text of a cell from its data row.
pub type CellTipFn = Arc<dyn Fn(&DataRow) -> String>;

/// Legend swatch styling.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct LegendStyles {
    /// Outline stroke width, also used to grow the outline around the swatch.
    #[serde(rename = "stroke-width")]
    pub stroke_width: f64,
    /// Outline stroke color.
    pub stroke: String,
    /// Swatch side length.
    #[serde(rename = "swatchDimension")]
    pub swatch_dimension: f64,
}

impl Default for LegendStyles {
    fn default() -> Self {
        Self {
            stroke_width: 1.0,
            stroke: "#aaaaaa".into(),
            swatch_dimension: 10.0,
        }
    }
}

/// Default glyph CSS styles.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct DefaultStyles {
    /// Styles merged under every renderer.
    pub glyph: StyleMap,
}

impl Default for DefaultStyles {
    fn default() -> Self {
        let mut glyph = StyleMap::default();
        glyph.insert("fill".into(), AttrValue::from("none"));
        glyph.insert("stroke".into(), AttrValue::from("#888888"));
        glyph.insert("stroke-width".into(), AttrValue::Number(2.0));
        glyph.insert("stroke-opacity".into(), AttrValue::Number(1.0));
        Self { glyph }
    }
}

/// Default glyph attributes.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct DefaultAttrs {
    /// Attributes merged under every renderer.
    pub glyph: GlyphAttrs,
}

impl Default for DefaultAttrs {
    fn default() -> Self {
        Self {
            glyph: GlyphAttrs {
                opacity: 0.6,
                css_class: "glyph".into(),
            },
        }
    }
}

/// Opacity and class of glyph shapes.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct GlyphAttrs {
    /// Shape opacity.
    pub opacity: f64,
    /// Un-namespaced CSS class.
    #[serde(rename = "cssClass")]
    pub css_class: String,
}

/// Maximum of the histogram axis.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum HistogramScale {
    /// A fixed maximum.
    Fixed(f64),
    /// The largest histogram value.
    Auto,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ScaleRepr {
    Number(f64),
    Text(String),
}

impl<'de> Deserialize<'de> for HistogramScale {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        match ScaleRepr::deserialize(deserializer)? {
            ScaleRepr::Number(n) => Ok(Self::Fixed(n)),
            ScaleRepr::Text(s) if s == "auto" => Ok(Self::Auto),
            ScaleRepr::Text(s) => Err(D::Error::custom(format!(
                "histogram scale must be a number or \"auto\", got {s:?}"
            ))),
        }
    }
}

/// The optional histogram sidebar.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct HistogramMapping {
    /// Row key → value. The sidebar is drawn only when this is set.
    pub data: Option<OrderedMap<String, f64>>,
    /// Text drawn under the sidebar.
    pub label: Option<String>,
    /// Axis maximum.
    pub scale: HistogramScale,
    /// Number of x-axis ticks.
    pub total_ticks: i64,
}

impl Default for HistogramMapping {
    fn default() -> Self {
        Self {
            data: None,
            label: Some("Histogram".into()),
            scale: HistogramScale::Fixed(1.0),
            total_ticks: 2,
        }
    }
}

impl HistogramMapping {
    /// Creates a mapping over `data` with default label, scale and ticks.
    pub fn new(data: impl IntoIterator<Item = (String, f64)>) -> Self {
        Self {
            data: Some(data.into_iter().collect()),
            ..Self::default()
        }
    }

    /// Sets the axis maximum.
    pub fn with_scale(mut self, scale: HistogramScale) -> Self {
        self.scale = scale;
        self
    }

    /// Sets the tick count.
    pub fn with_total_ticks(mut self, total_ticks: i64) -> Self {
        self.total_ticks = total_ticks;
        self
    }

    /// Sets or clears the label.
    pub fn with_label(mut self, label: Option<String>) -> Self {
        self.label = label;
        self
    }

    /// Whether there is data to draw.
    pub fn has_data(&self) -> bool {
        self.data.is_some()
    }

    /// The value for a row key.
    pub fn value(&self, key: &str) -> Option<f64> {
        self.data.as_ref()?.get(key).copied()
    }

    /// The effective axis maximum. `Auto` over no data is `0`.
    pub fn resolved_scale(&self) -> f64 {
        match self.scale {
            HistogramScale::Fixed(v) => v,
            HistogramScale::Auto => self
                .data
                .iter()
                .flat_map(|d| d.values().copied())
                .reduce(f64::max)
                .unwrap_or(0.0),
        }
    }

    /// Tick values: one tick at the scale, or `total_ticks` values evenly spaced over
    /// `[0, scale]`, or none when `total_ticks <= 0`.
    pub fn tick_values(&self) -> Vec<f64> {
        let scale = self.resolved_scale();
        match self.total_ticks {
            n if n <= 0 => Vec::new(),
            1 => alloc::vec![scale],
            n => {
                #[allow(
                    clippy::cast_precision_loss,
                    reason = "tick counts are tiny"
                )]
                let last = (n - 1) as f64;
                (0..n)
                    .map(|i| {
                        #[allow(
                            clippy::cast_precision_loss,
                            reason = "tick counts are tiny"
                        )]
                        let i = i as f64;
                        scale * (i / last)
                    })
                    .collect()
            }
        }
    }
}

/// Legend layout mode.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct MultipleLegendLines {
    /// One legend line per data dimension instead of a single line.
    pub include: bool,
    /// Optional title per line, in dimension order.
    pub labels: Option<Vec<String>>,
}

/// Renderers of one data dimension.
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DisplayMapping {
    /// Dimension name, as used in [`crate::DataIndex`].
    pub data_type: String,
    /// Category value → renderer, in legend order.
    #[serde(default)]
    pub mappings: OrderedMap<String, RendererSpec>,
    /// Category value → legend label.
    #[serde(default)]
    pub label_mapping: Option<OrderedMap<String, String>>,
}

impl DisplayMapping {
    /// Creates an empty mapping for `data_type`.
    pub fn new(data_type: impl Into<String>) -> Self {
        Self {
            data_type: data_type.into(),
            mappings: OrderedMap::default(),
            label_mapping: None,
        }
    }

    /// Adds a renderer for a category value.
    pub fn with_renderer(mut self, value: impl Into<String>, spec: impl Into<RendererSpec>) -> Self {
        self.mappings.insert(value.into(), spec.into());
        self
    }

    /// Adds a legend label.
    pub fn with_label(mut self, value: impl Into<String>, label: impl Into<String>) -> Self {
        self.label_mapping
            .get_or_insert_with(OrderedMap::default)
            .insert(value.into(), label.into());
        self
    }
}

/// Export endpoints.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ExportOptions {
    /// Stylesheet URL. Enables SVG export.
    pub style: Option<String>,
    /// Rasterization endpoint. Enables PNG export together with `style`.
    pub server: Option<String>,
}

impl ExportOptions {
    /// Whether SVG export is available.
    pub fn svg_enabled(&self) -> bool {
        self.style.is_some()
    }

    /// Whether PNG export is available.
    pub fn png_enabled(&self) -> bool {
        self.style.is_some() && self.server.is_some()
    }
}

/// All widget options.
#[derive(Clone, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GridVarOptions {
    /// Cell width in pixels.
    pub cell_width: f64,
    /// Cell height in pixels.
    pub cell_height: f64,
    /// Order-change animation length in milliseconds.
    pub transition_duration: f64,
    /// Legend swatch styling.
    pub legend_styles: LegendStyles,
    /// Default glyph styles.
    pub styles: DefaultStyles,
    /// Default glyph attributes.
    pub attrs: DefaultAttrs,
    /// Histogram sidebar.
    pub histogram_mapping: HistogramMapping,
    /// Legend layout.
    pub multiple_legend_lines: MultipleLegendLines,
    /// Row keys, top to bottom.
    pub row_order: Vec<String>,
    /// Column keys, left to right.
    pub column_order: Vec<String>,
    /// Row label overrides.
    pub row_keys_to_label: OrderedMap<String, String>,
    /// Column label overrides.
    pub column_keys_to_label: OrderedMap<String, String>,
    /// Data rows.
    pub data_mapping: DataMapping,
    /// Renderers per data dimension.
    pub data_display_mapping: Vec<DisplayMapping>,
    /// Tooltip text of a cell.
    #[serde(skip)]
    pub cell_tip: Option<CellTipFn>,
    /// Export endpoints.
    pub export_options: Option<ExportOptions>,
}

impl fmt::Debug for GridVarOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GridVarOptions")
            .field("cell_width", &self.cell_width)
            .field("cell_height", &self.cell_height)
            .field("transition_duration", &self.transition_duration)
            .field("legend_styles", &self.legend_styles)
            .field("styles", &self.styles)
            .field("attrs", &self.attrs)
            .field("histogram_mapping", &self.histogram_mapping)
            .field("multiple_legend_lines", &self.multiple_legend_lines)
            .field("row_order", &self.row_order)
            .field("column_order", &self.column_order)
            .field("row_keys_to_label", &self.row_keys_to_label)
            .field("column_keys_to_label", &self.column_keys_to_label)
            .field("data_mapping", &self.data_mapping)
            .field("data_display_mapping", &self.data_display_mapping)
            .field("cell_tip", &self.cell_tip.is_some())
            .field("export_options", &self.export_options)
            .finish()
    }
}

impl Default for GridVarOptions {
    fn default() -> Self {
        Self {
            cell_width: 12.0,
            cell_height: 12.0,
            transition_duration: 1500.0,
            legend_styles: LegendStyles::default(),
            styles: DefaultStyles::default(),
            attrs: DefaultAttrs::default(),
            histogram_mapping: HistogramMapping::default(),
            multiple_legend_lines: MultipleLegendLines::default(),
            row_order: Vec::new(),
            column_order: Vec::new(),
            row_keys_to_label: OrderedMap::default(),
            column_keys_to_label: OrderedMap::default(),
            data_mapping: DataMapping::default(),
            data_display_mapping: Vec::new(),
            cell_tip: None,
            export_options: None,
        }
    }
}

impl GridVarOptions {
    /// Parses options from JSON; absent fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Sets the cell size.
    pub fn with_cell_size(mut self, width: f64, height: f64) -> Self {
        self.cell_width = width;
        self.cell_height = height;
        self
    }

    /// Sets the animation length.
    pub fn with_transition_duration(mut self, ms: f64) -> Self {
        self.transition_duration = ms;
        self
    }

    /// Sets the row order.
    pub fn with_row_order<S: Into<String>>(mut self, keys: impl IntoIterator<Item = S>) -> Self {
        self.row_order = keys.into_iter().map(Into::into).collect();
        self
    }

    /// Sets the column order.
    pub fn with_column_order<S: Into<String>>(mut self, keys: impl IntoIterator<Item = S>) -> Self {
        self.column_order = keys.into_iter().map(Into::into).collect();
        self
    }

    /// Adds a row label override.
    pub fn with_row_label(mut self, key: impl Into<String>, label: impl Into<String>) -> Self {
        self.row_keys_to_label.insert(key.into(), label.into());
        self
    }

    /// Adds a column label override.
    pub fn with_column_label(mut self, key: impl Into<String>, label: impl Into<String>) -> Self {
        self.column_keys_to_label.insert(key.into(), label.into());
        self
    }

    /// Sets the data rows and their index.
    pub fn with_data_mapping(mut self, data_mapping: DataMapping) -> Self {
        self.data_mapping = data_mapping;
        self
    }

    /// Appends a display mapping.
    pub fn with_display_mapping(mut self, mapping: DisplayMapping) -> Self {
        self.data_display_mapping.push(mapping);
        self
    }

    /// Sets the histogram sidebar.
    pub fn with_histogram_mapping(mut self, mapping: HistogramMapping) -> Self {
        self.histogram_mapping = mapping;
        self
    }

    /// Sets the legend layout.
    pub fn with_multiple_legend_lines(mut self, lines: MultipleLegendLines) -> Self {
        self.multiple_legend_lines = lines;
        self
    }

    /// Sets the cell tooltip callback.
    pub fn with_cell_tip(mut self, f: impl Fn(&DataRow) -> String + 'static) -> Self {
        self.cell_tip = Some(Arc::new(f));
        self
    }

    /// Sets the export endpoints.
    pub fn with_export_options(mut self, export: ExportOptions) -> Self {
        self.export_options = Some(export);
        self
    }

    /// Styles every renderer starts from.
    pub fn default_styles(&self) -> StyleMap {
        self.styles.glyph.clone()
    }

    /// Attributes every renderer starts from: `opacity` and the namespaced `class`.
    pub fn default_attrs(&self) -> StyleMap {
        let mut attrs = StyleMap::default();
        attrs.insert("opacity".into(), AttrValue::Number(self.attrs.glyph.opacity));
        attrs.insert(
            "class".into(),
            AttrValue::Text(css_class(&self.attrs.glyph.css_class)),
        );
        attrs
    }

    /// Both defaults, for style normalization.
    pub fn render_defaults(&self) -> RenderDefaults {
        RenderDefaults {
            styles: self.default_styles(),
            attrs: self.default_attrs(),
        }
    }

    /// The label of a row key. An empty override shows the key.
    pub fn row_label<'a>(&'a self, key: &'a str) -> &'a str {
        display_label(&self.row_keys_to_label, key)
    }

    /// The label of a column key. An empty override shows the key.
    pub fn column_label<'a>(&'a self, key: &'a str) -> &'a str {
        display_label(&self.column_keys_to_label, key)
    }
}

fn display_label<'a>(labels: &'a OrderedMap<String, String>, key: &'a str) -> &'a str {
    match labels.get(key) {
        Some(label) if !label.is_empty() => label.as_str(),
        _ => key,
    }
}
