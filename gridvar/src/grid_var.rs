// Copyright 2025 the GridVar Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The widget.

extern crate alloc;

use alloc::boxed::Box;
use alloc::string::String;
use alloc::vec::Vec;
use core::fmt;

use gridvar_core::{GroupMark, Mark, MarkDiff, Scene, Transition};
use kurbo::{Point, Size, Vec2};

use crate::axis::{column_axis_marks, row_label_ids, row_label_marks};
use crate::cell::cell_marks;
use crate::data::DataRow;
use crate::error::ConfigError;
#[cfg(not(feature = "std"))]
use crate::float::FloatExt;
use crate::event::{EventHandlers, GridEvent, Hit};
use crate::glyph::GlyphTable;
use crate::histogram::histogram_marks;
use crate::layout::{GridLayout, label_size};
use crate::legend::legend_marks;
use crate::measure::{FixedAdvanceMeasurer, TextMeasurer};
use crate::options::{DisplayMapping, GridVarOptions, HistogramMapping, css_class};
use crate::panel::{KeyIds, Panel, RenderContext, ids};
use crate::scale::ScaleBand;
use crate::style::{DisplayStyleTable, StyleMap, parse_hex_color};
use crate::svg::{PanelSvg, SvgFragments, scene_to_svg};
use crate::z_order;
use crate::OrderedMap;

/// Per-mark delay of staggered label and bar animations.
pub const STAGGER_MS: f64 = 4.0;

/// Animations produced by an order or mapping change, one per affected panel.
///
/// Scenes already hold the final state; hosts sample these to animate towards it.
#[derive(Clone, Debug, PartialEq)]
pub struct PanelTransitions {
    /// Cells and column labels moving to their new offsets.
    pub heatmap: Transition,
    /// Row labels fading in.
    pub row_labels: Transition,
    /// Histogram bars moving or growing.
    pub histogram: Transition,
}

impl PanelTransitions {
    fn empty(duration_ms: f64) -> Self {
        Self {
            heatmap: Transition::new(duration_ms),
            row_labels: Transition::new(duration_ms),
            histogram: Transition::new(duration_ms),
        }
    }

    /// The transition of one panel. The legend never animates.
    pub fn get(&self, panel: Panel) -> Option<&Transition> {
        match panel {
            Panel::Heatmap => Some(&self.heatmap),
            Panel::RowLabels => Some(&self.row_labels),
            Panel::Histogram => Some(&self.histogram),
            Panel::Legend => None,
        }
    }
}

/// A grid-variation widget.
///
/// Rows × columns of cells, each drawing a background color and/or glyphs per category
/// value, with a legend, row and column labels, and an optional histogram sidebar.
/// Positions are always derived from the current row and column order.
pub struct GridVar {
    options: GridVarOptions,
    glyphs: GlyphTable,
    measurer: Box<dyn TextMeasurer>,
    styles: DisplayStyleTable,
    layout: GridLayout,
    x: ScaleBand,
    y: ScaleBand,
    row_ids: KeyIds,
    column_ids: KeyIds,
    legend: Scene,
    legend_size: Size,
    histogram: Scene,
    row_labels: Scene,
    heatmap: Scene,
    initial: PanelTransitions,
    handlers: EventHandlers,
}

impl fmt::Debug for GridVar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GridVar")
            .field("options", &self.options)
            .field("styles", &self.styles)
            .field("layout", &self.layout)
            .field("rows", &self.y.keys())
            .field("columns", &self.x.keys())
            .field("handlers", &self.handlers)
            .finish_non_exhaustive()
    }
}

impl GridVar {
    /// Validates `options`, computes the display-style table and renders every panel.
    pub fn new(options: GridVarOptions) -> Result<Self, ConfigError> {
        if parse_hex_color(&options.legend_styles.stroke).is_none() {
            return Err(ConfigError::InvalidColor {
                value: options.legend_styles.stroke.clone(),
            });
        }
        let glyphs = GlyphTable::builtin();
        let styles = DisplayStyleTable::compute(
            &options.data_display_mapping,
            &options.data_mapping.data_index,
            &glyphs,
            &options.render_defaults(),
        )?;
        let measurer: Box<dyn TextMeasurer> = Box::new(FixedAdvanceMeasurer::LABEL);
        let layout = GridLayout::compute(&options, measurer.as_ref());
        let mut widget = Self {
            options,
            glyphs,
            measurer,
            styles,
            layout,
            x: ScaleBand::default(),
            y: ScaleBand::default(),
            row_ids: KeyIds::default(),
            column_ids: KeyIds::default(),
            legend: Scene::new(),
            legend_size: Size::ZERO,
            histogram: Scene::new(),
            row_labels: Scene::new(),
            heatmap: Scene::new(),
            initial: PanelTransitions::empty(0.0),
            handlers: EventHandlers::default(),
        };
        widget.rebuild_scales();
        widget.render_legend();
        widget.render_heatmap();
        widget.render_row_labels();
        let bars = widget.render_histogram();
        widget.initial = widget.entry_transitions(&bars);
        tracing::debug!(
            rows = widget.y.len(),
            columns = widget.x.len(),
            data = widget.options.data_mapping.data.len(),
            "rendered grid"
        );
        Ok(widget)
    }

    /// Parses JSON options and builds the widget.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Self::new(GridVarOptions::from_json(json)?)
    }

    /// Replaces the label measurer and re-renders every panel.
    pub fn with_measurer(mut self, measurer: impl TextMeasurer + 'static) -> Self {
        self.measurer = Box::new(measurer);
        self.rebuild_scales();
        self.render_legend();
        self.render_heatmap();
        self.render_row_labels();
        self.histogram = Scene::new();
        let bars = self.render_histogram();
        self.initial = self.entry_transitions(&bars);
        self
    }

    /// The animations of the first render: row labels fade in and histogram bars grow
    /// out of the grid side, one after another.
    pub fn initial_transitions(&self) -> &PanelTransitions {
        &self.initial
    }

    fn entry_transitions(&self, histogram: &[MarkDiff]) -> PanelTransitions {
        let duration = self.options.transition_duration;
        PanelTransitions {
            row_labels: Transition::fade_in(row_label_ids(&self.context()), duration, STAGGER_MS),
            histogram: Transition::from_diffs(histogram, duration, STAGGER_MS),
            ..PanelTransitions::empty(duration)
        }
    }

    fn rebuild_scales(&mut self) {
        self.layout = GridLayout::compute(&self.options, self.measurer.as_ref());
        self.x = ScaleBand::new(
            self.options.column_order.iter().cloned(),
            self.layout.width(self.options.column_order.len()),
        );
        self.y = ScaleBand::new(
            self.options.row_order.iter().cloned(),
            self.layout.height(self.options.row_order.len()),
        );
        self.row_ids.register(self.options.row_order.as_slice());
        self.column_ids.register(self.options.column_order.as_slice());
    }

    fn context(&self) -> RenderContext<'_> {
        RenderContext {
            options: &self.options,
            styles: &self.styles,
            layout: &self.layout,
            x: &self.x,
            y: &self.y,
            row_ids: &self.row_ids,
            column_ids: &self.column_ids,
        }
    }

    fn render_legend(&mut self) -> Vec<MarkDiff> {
        let (marks, size) = legend_marks(&self.context());
        self.legend_size = size;
        self.legend.tick(marks)
    }

    fn render_histogram(&mut self) -> Vec<MarkDiff> {
        let marks = histogram_marks(&self.context());
        self.histogram.tick(marks)
    }

    fn render_row_labels(&mut self) -> Vec<MarkDiff> {
        let marks = row_label_marks(&self.context());
        self.row_labels.tick(marks)
    }

    fn render_heatmap(&mut self) -> Vec<MarkDiff> {
        let marks = {
            let ctx = self.context();
            let margin = ctx.layout.margin;
            let mut marks = alloc::vec![
                Mark::new(
                    ids::ROOT,
                    GroupMark::new(Point::new(margin.left, margin.top))
                        .with_attr("class", css_class("heatmap")),
                )
                .with_z_index(z_order::PANEL)
            ];
            marks.extend(cell_marks(&ctx, ids::ROOT));
            marks.extend(column_axis_marks(&ctx, ids::ROOT));
            marks
        };
        self.heatmap.tick(marks)
    }

    /// Sets a new row order.
    ///
    /// The row scale is rebuilt; cells move to their new offsets, row labels are redrawn and
    /// fade in one after another, and the histogram follows the new order.
    pub fn set_row_order<S: Into<String>>(
        &mut self,
        keys: impl IntoIterator<Item = S>,
    ) -> PanelTransitions {
        self.options.row_order = keys.into_iter().map(Into::into).collect();
        self.rebuild_scales();
        tracing::debug!(rows = self.y.len(), "row order changed");

        let duration = self.options.transition_duration;
        let heatmap = self.render_heatmap();
        self.render_row_labels();
        let histogram = self.render_histogram();
        PanelTransitions {
            heatmap: Transition::from_diffs(&heatmap, duration, 0.0),
            row_labels: Transition::fade_in(row_label_ids(&self.context()), duration, STAGGER_MS),
            histogram: Transition::from_diffs(&histogram, duration, STAGGER_MS),
        }
    }

    /// Sets a new column order. Cells and column labels move to their new offsets.
    pub fn set_column_order<S: Into<String>>(
        &mut self,
        keys: impl IntoIterator<Item = S>,
    ) -> PanelTransitions {
        self.options.column_order = keys.into_iter().map(Into::into).collect();
        self.rebuild_scales();
        tracing::debug!(columns = self.x.len(), "column order changed");

        let duration = self.options.transition_duration;
        let heatmap = self.render_heatmap();
        // Row labels and histogram only move if the bottom margin changed.
        self.render_row_labels();
        self.render_histogram();
        PanelTransitions {
            heatmap: Transition::from_diffs(&heatmap, duration, 0.0),
            ..PanelTransitions::empty(duration)
        }
    }

    /// Replaces the histogram mapping and refreshes the sidebar.
    pub fn set_histogram_mapping(&mut self, mapping: HistogramMapping) -> Transition {
        self.options.histogram_mapping = mapping;
        tracing::debug!(
            has_data = self.options.histogram_mapping.has_data(),
            scale = self.histogram_scale(),
            "histogram refreshed"
        );
        let diffs = self.render_histogram();
        Transition::from_diffs(&diffs, self.options.transition_duration, STAGGER_MS)
    }

    /// Replaces the display mappings, recomputing the style table and re-rendering cells
    /// and legend.
    ///
    /// On error the widget is left unchanged.
    pub fn set_data_display_mapping(
        &mut self,
        mappings: Vec<DisplayMapping>,
    ) -> Result<(), ConfigError> {
        let styles = DisplayStyleTable::compute(
            &mappings,
            &self.options.data_mapping.data_index,
            &self.glyphs,
            &self.options.render_defaults(),
        )?;
        self.options.data_display_mapping = mappings;
        self.styles = styles;
        self.render_legend();
        self.render_heatmap();
        Ok(())
    }

    /// Registers a `cellClicked` handler.
    pub fn on_cell_clicked(&mut self, f: impl Fn(&DataRow) + 'static) {
        self.handlers.on_cell_clicked(f);
    }

    /// Registers a `rowLabelClicked` handler.
    pub fn on_row_label_clicked(&mut self, f: impl Fn(&str) + 'static) {
        self.handlers.on_row_label_clicked(f);
    }

    /// Registers a `columnLabelClicked` handler.
    pub fn on_column_label_clicked(&mut self, f: impl Fn(&str) + 'static) {
        self.handlers.on_column_label_clicked(f);
    }

    /// Resolves a point in `panel` coordinates.
    ///
    /// In the heatmap, points on the grid resolve to the topmost data row at that cell and
    /// points below it to the column label. In the row-label panel, points resolve to the
    /// row whose band contains them.
    pub fn hit_test(&self, panel: Panel, point: Point) -> Option<Hit> {
        let margin = self.layout.margin;
        let local = point - Vec2::new(margin.left, margin.top);
        match panel {
            Panel::Heatmap => {
                let height = self.layout.height(self.y.len());
                let column = self.x.key_at(local.x)?;
                if local.y >= height {
                    return (local.y < height + margin.bottom)
                        .then(|| Hit::ColumnLabel(column.into()));
                }
                let row = self.y.key_at(local.y)?;
                let index = &self.options.data_mapping.data_index;
                self.options
                    .data_mapping
                    .data
                    .iter()
                    .rposition(|d| {
                        index.row_key(d) == Some(row) && index.column_key(d) == Some(column)
                    })
                    .map(Hit::Cell)
            }
            Panel::RowLabels => {
                if local.x < 0.0 || local.x >= self.layout.y_axis_width {
                    return None;
                }
                self.y.key_at(local.y).map(|k| Hit::RowLabel(k.into()))
            }
            Panel::Legend | Panel::Histogram => None,
        }
    }

    /// Hit-tests `point` and dispatches the resulting event to the registered handlers.
    pub fn click(&self, panel: Panel, point: Point) -> Option<GridEvent> {
        let event = match self.hit_test(panel, point)? {
            Hit::Cell(i) => GridEvent::CellClicked(self.options.data_mapping.data.get(i)?.clone()),
            Hit::RowLabel(k) => GridEvent::RowLabelClicked(k),
            Hit::ColumnLabel(k) => GridEvent::ColumnLabelClicked(k),
        };
        self.handlers.dispatch(&event);
        Some(event)
    }

    /// The tooltip text of a data row; empty without a `cellTip` callback.
    pub fn cell_tip(&self, row_index: usize) -> Option<String> {
        let row = self.options.data_mapping.data.get(row_index)?;
        Some(
            self.options
                .cell_tip
                .as_ref()
                .map(|f| f(row))
                .unwrap_or_default(),
        )
    }

    /// Grid width for `keys`: `cell_width * keys.len()`.
    pub fn width<S: AsRef<str>>(&self, keys: &[S]) -> f64 {
        self.layout.width(keys.len())
    }

    /// Grid height for `keys`: `cell_height * keys.len()`.
    pub fn height<S: AsRef<str>>(&self, keys: &[S]) -> f64 {
        self.layout.height(keys.len())
    }

    /// Width of the widest label of `keys` plus `padding`.
    pub fn calculate_label_size<S: AsRef<str>>(
        &self,
        keys: &[S],
        labels: &OrderedMap<String, String>,
        padding: f64,
    ) -> f64 {
        label_size(keys, labels, padding, self.measurer.as_ref())
    }

    /// The effective histogram maximum.
    pub fn histogram_scale(&self) -> f64 {
        self.options.histogram_mapping.resolved_scale()
    }

    /// Histogram tick values.
    pub fn tick_values(&self) -> Vec<f64> {
        self.options.histogram_mapping.tick_values()
    }

    /// Whether the histogram sidebar is drawn.
    pub fn has_histogram(&self) -> bool {
        self.options.histogram_mapping.has_data()
    }

    /// Namespaces a CSS class.
    pub fn css_class(&self, name: &str) -> String {
        css_class(name)
    }

    /// Styles every renderer starts from.
    pub fn default_styles(&self) -> StyleMap {
        self.options.default_styles()
    }

    /// Attributes every renderer starts from.
    pub fn default_attrs(&self) -> StyleMap {
        self.options.default_attrs()
    }

    /// Current options, including the current row and column order.
    pub fn options(&self) -> &GridVarOptions {
        &self.options
    }

    /// The normalized display styles.
    pub fn display_styles(&self) -> &DisplayStyleTable {
        &self.styles
    }

    /// Current margins and label widths.
    pub fn layout(&self) -> &GridLayout {
        &self.layout
    }

    /// Scale of the current row order.
    pub fn row_scale(&self) -> &ScaleBand {
        &self.y
    }

    /// Scale of the current column order.
    pub fn column_scale(&self) -> &ScaleBand {
        &self.x
    }

    /// The retained scene of one panel.
    pub fn scene(&self, panel: Panel) -> &Scene {
        match panel {
            Panel::Legend => &self.legend,
            Panel::Histogram => &self.histogram,
            Panel::RowLabels => &self.row_labels,
            Panel::Heatmap => &self.heatmap,
        }
    }

    /// Size of one panel, rounded up to whole pixels.
    pub fn panel_size(&self, panel: Panel) -> Size {
        let rows = self.y.len();
        let size = match panel {
            Panel::Legend => self.legend_size,
            Panel::Histogram if !self.has_histogram() => Size::ZERO,
            Panel::Histogram => self.layout.histogram_size(rows),
            Panel::RowLabels => self.layout.row_labels_size(rows),
            Panel::Heatmap => self.layout.heatmap_size(rows, self.x.len()),
        };
        Size::new(size.width.ceil(), size.height.ceil())
    }

    /// Serializes one panel.
    pub fn panel_svg(&self, panel: Panel) -> PanelSvg {
        let size = self.panel_size(panel);
        PanelSvg {
            markup: scene_to_svg(self.scene(panel), size, &css_class(panel.css_name())),
            width: size.width,
            height: size.height,
        }
    }

    /// Serializes every panel, for export.
    pub fn svg_fragments(&self) -> SvgFragments {
        SvgFragments {
            legend: self.panel_svg(Panel::Legend),
            histogram: self
                .has_histogram()
                .then(|| self.panel_svg(Panel::Histogram)),
            row_labels: self.panel_svg(Panel::RowLabels),
            heatmap: self.panel_svg(Panel::Heatmap),
        }
    }
}
