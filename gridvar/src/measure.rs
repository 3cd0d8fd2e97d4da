// Copyright 2025 the GridVar Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Text measurement hooks for label layout.
//!
//! Margins are sized before any text is drawn, so the widget estimates label widths with a
//! measurer. Hosts with real font metrics can plug in their own.

/// Estimates the rendered width of a single line of text.
pub trait TextMeasurer {
    /// Returns the width of `text` in scene units.
    fn text_width(&self, text: &str) -> f64;
}

/// Every character advances by the same amount.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FixedAdvanceMeasurer {
    /// Advance per character.
    pub advance: f64,
}

impl FixedAdvanceMeasurer {
    /// Advance used for row and column labels.
    pub const LABEL: Self = Self::new(7.0);
    /// Advance used for legend labels.
    pub const LEGEND: Self = Self::new(6.0);
    /// Advance used for legend line titles.
    pub const LEGEND_TITLE: Self = Self::new(5.0);

    /// Creates a measurer with the given per-character advance.
    pub const fn new(advance: f64) -> Self {
        Self { advance }
    }
}

impl Default for FixedAdvanceMeasurer {
    fn default() -> Self {
        Self::LABEL
    }
}

impl TextMeasurer for FixedAdvanceMeasurer {
    fn text_width(&self, text: &str) -> f64 {
        #[allow(
            clippy::cast_precision_loss,
            reason = "label lengths are far below 2^52"
        )]
        let n = text.chars().count() as f64;
        n * self.advance
    }
}
