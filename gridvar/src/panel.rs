// Copyright 2025 the GridVar Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Panels, mark id allocation and the shared render context.

extern crate alloc;

use alloc::string::String;

use gridvar_core::MarkId;
use hashbrown::HashMap;

use crate::layout::GridLayout;
use crate::options::GridVarOptions;
use crate::scale::ScaleBand;
use crate::style::DisplayStyleTable;

/// One of the widget's independently rendered panels.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Panel {
    /// Swatches and labels for every display style.
    Legend,
    /// The optional histogram sidebar.
    Histogram,
    /// Row labels, right-aligned next to the grid.
    RowLabels,
    /// The grid of cells with column labels underneath.
    Heatmap,
}

impl Panel {
    /// All panels, in export order.
    pub const ALL: [Self; 4] = [Self::Legend, Self::Histogram, Self::RowLabels, Self::Heatmap];

    /// Un-namespaced CSS class of the panel's root `<svg>`.
    pub fn css_name(self) -> &'static str {
        match self {
            Self::Legend => "legend",
            Self::Histogram => "histogram",
            Self::RowLabels => "gridLabels-canvas",
            Self::Heatmap => "heatmapCanvas",
        }
    }
}

/// Stable numeric ids for keys, assigned on first sight.
///
/// Marks keyed by a row or column key keep their id across reorders, so the scene diff sees
/// them as updates rather than exit + enter.
#[derive(Clone, Debug, Default)]
pub(crate) struct KeyIds {
    ids: HashMap<String, u64>,
    next: u64,
}

impl KeyIds {
    pub(crate) fn register<S: AsRef<str>>(&mut self, keys: &[S]) {
        for key in keys {
            let key = key.as_ref();
            if !self.ids.contains_key(key) {
                self.ids.insert(key.into(), self.next);
                self.next += 1;
            }
        }
    }

    pub(crate) fn get(&self, key: &str) -> Option<u64> {
        self.ids.get(key).copied()
    }
}

/// Mark id layout. Each panel has its own scene, so ranges only need to be unique per panel.
pub(crate) mod ids {
    use super::MarkId;

    /// The translated root group of every panel.
    pub(crate) const ROOT: MarkId = MarkId::from_raw(1);
    /// Axis groups (column axis, row axis, histogram x axis).
    pub(crate) const AXIS: MarkId = MarkId::from_raw(2);
    /// Histogram y axis group.
    pub(crate) const AXIS_Y: MarkId = MarkId::from_raw(3);
    /// Histogram label.
    pub(crate) const HISTOGRAM_LABEL: MarkId = MarkId::from_raw(4);

    /// Labels keyed by row/column key id.
    pub(crate) const KEY_LABEL_BASE: u64 = 1 << 32;
    /// Histogram bars keyed by row key id.
    pub(crate) const BAR_BASE: u64 = 2 << 32;
    /// Histogram tick labels by tick index.
    pub(crate) const TICK_BASE: u64 = 3 << 32;
    /// Legend line titles by line index.
    pub(crate) const TITLE_BASE: u64 = 4 << 32;
    /// Legend line groups; a line's swatches follow its group id.
    pub(crate) const LEGEND_LINE_BASE: u64 = 5 << 32;
    pub(crate) const LEGEND_LINE_STRIDE: u64 = 1 << 20;
    /// Cell groups by data row index; a cell's shapes follow its group id.
    pub(crate) const CELL_BASE: u64 = 1 << 40;
    pub(crate) const CELL_STRIDE: u64 = 1 << 16;

    pub(crate) fn key_label(key_id: u64) -> MarkId {
        MarkId::from_raw(KEY_LABEL_BASE + key_id)
    }

    pub(crate) fn bar(key_id: u64) -> MarkId {
        MarkId::from_raw(BAR_BASE + key_id)
    }

    pub(crate) fn cell(row_index: usize) -> MarkId {
        MarkId::from_raw(CELL_BASE + row_index as u64 * CELL_STRIDE)
    }
}

/// Everything a panel renderer reads.
#[derive(Clone, Copy)]
pub(crate) struct RenderContext<'a> {
    pub(crate) options: &'a GridVarOptions,
    pub(crate) styles: &'a DisplayStyleTable,
    pub(crate) layout: &'a GridLayout,
    pub(crate) x: &'a ScaleBand,
    pub(crate) y: &'a ScaleBand,
    pub(crate) row_ids: &'a KeyIds,
    pub(crate) column_ids: &'a KeyIds,
}

impl RenderContext<'_> {
    /// Grid height for the current row order.
    pub(crate) fn grid_height(&self) -> f64 {
        self.layout.height(self.y.len())
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use super::*;

    #[test]
    fn key_ids_are_stable_across_reorders() {
        let mut k = KeyIds::default();
        k.register(&["a", "b"]);
        let a = k.get("a");
        k.register(&["b", "c", "a"]);
        assert_eq!(k.get("a"), a);
        assert_eq!(k.get("c"), Some(2));
    }

    #[test]
    fn cell_ids_leave_room_for_shapes() {
        let a = ids::cell(0).raw();
        let b = ids::cell(1).raw();
        assert_eq!(b - a, ids::CELL_STRIDE);
        assert!(ids::key_label(u64::from(u32::MAX)).raw() < ids::BAR_BASE);
    }
}
