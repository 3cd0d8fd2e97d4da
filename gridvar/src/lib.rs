// Copyright 2025 the GridVar Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A grid-variation widget built on `gridvar_core`.
//!
//! The widget draws a grid of rows × columns. Each cell shows zero or more category values
//! (for example mutation types) as a colored background and/or overlaid glyphs, chosen per
//! value by a display mapping. Around the grid it draws a legend, row labels, rotated column
//! labels, and an optional histogram sidebar.
//!
//! - [`GridVarOptions`] holds the configuration and deserializes from camelCase JSON.
//! - [`RendererSpec`]s are normalized once into a [`DisplayStyleTable`]; rendering never
//!   looks at the raw specs again.
//! - Every panel is a retained [`gridvar_core::Scene`]. Order changes re-render the panels
//!   and return [`PanelTransitions`] built from the scene diffs.
//! - [`GridVar::svg_fragments`] serializes the panels for export.
//!
//! Text shaping is out of scope: label widths are estimated by a [`TextMeasurer`].

#![no_std]

extern crate alloc;

mod axis;
mod cell;
mod data;
mod error;
mod event;
#[cfg(not(feature = "std"))]
mod float;
mod glyph;
mod grid_var;
#[cfg(test)]
mod grid_var_tests;
mod histogram;
mod layout;
mod legend;
mod measure;
mod options;
mod panel;
mod scale;
mod style;
mod svg;
mod z_order;

/// A map that iterates in insertion order.
pub type OrderedMap<K, V> = indexmap::IndexMap<K, V, hashbrown::DefaultHashBuilder>;

pub use data::{DataIndex, DataMapping, DataRow, FieldValue};
pub use error::ConfigError;
pub use event::{EventHandlers, GridEvent, Hit};
pub use glyph::{Glyph, GlyphTable};
pub use grid_var::{GridVar, PanelTransitions, STAGGER_MS};
pub use histogram::{tick_label, value_label};
pub use layout::{
    COLUMN_LABEL_PADDING, GridLayout, HISTOGRAM_MARGIN_LEFT, HISTOGRAM_MARGIN_RIGHT,
    HISTOGRAM_OUTER_WIDTH, MIN_BOTTOM_MARGIN, Margins, TOP_MARGIN, Y_AXIS_BUFFER, label_size,
};
pub use legend::item_positions;
pub use measure::{FixedAdvanceMeasurer, TextMeasurer};
pub use options::{
    CellTipFn, DefaultAttrs, DefaultStyles, DisplayMapping, ExportOptions, GlyphAttrs,
    GridVarOptions, HistogramMapping, HistogramScale, LegendStyles, MultipleLegendLines,
    WIDGET_CLASS, css_class,
};
pub use panel::Panel;
pub use scale::{ScaleBand, ScaleLinear};
pub use style::{
    AttrFn, AttrValue, DimensionStyles, DisplayStyle, DisplayStyleTable, PathSource,
    RenderDefaults, RenderType, RendererSpec, StyleAttrObject, StyleMap, parse_hex_color,
};
pub use svg::{PanelSvg, SvgFragments, escape_xml, path_data, scene_to_svg};
pub use z_order::*;
