// Copyright 2025 the GridVar Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Export button state.

use std::sync::atomic::{AtomicBool, Ordering};

use gridvar::ExportOptions;

/// What an export button produces.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ExportKind {
    /// A saved SVG document.
    Svg,
    /// A PNG rendered by the rasterization server.
    Png,
}

impl ExportKind {
    /// Label of an idle button.
    pub fn label(self) -> &'static str {
        match self {
            Self::Svg => "[Export SVG]",
            Self::Png => "[Export PNG]",
        }
    }
}

/// Label of a PNG button while its upload is in flight.
pub const RENDERING_LABEL: &str = "Rendering...";

/// One export button.
///
/// Only the PNG button tracks a pending state; a PNG click while one is rendering is
/// ignored.
#[derive(Debug)]
pub struct ExportButton {
    kind: ExportKind,
    pending: AtomicBool,
}

impl ExportButton {
    /// An idle button.
    pub fn new(kind: ExportKind) -> Self {
        Self {
            kind,
            pending: AtomicBool::new(false),
        }
    }

    /// The buttons `options` enable: SVG when a stylesheet is set, PNG when a server is set
    /// as well.
    pub fn for_options(options: &ExportOptions) -> Vec<Self> {
        let mut out = Vec::with_capacity(2);
        if options.svg_enabled() {
            out.push(Self::new(ExportKind::Svg));
        }
        if options.png_enabled() {
            out.push(Self::new(ExportKind::Png));
        }
        out
    }

    /// What this button exports.
    pub fn kind(&self) -> ExportKind {
        self.kind
    }

    /// The current label.
    pub fn label(&self) -> &'static str {
        if self.is_pending() {
            RENDERING_LABEL
        } else {
            self.kind.label()
        }
    }

    /// Whether an export from this button is in flight.
    pub fn is_pending(&self) -> bool {
        self.pending.load(Ordering::Acquire)
    }

    /// Marks the button pending. Returns `false` if it already was, or if it is not a PNG
    /// button (those are never guarded).
    pub(crate) fn begin(&self) -> bool {
        match self.kind {
            ExportKind::Svg => true,
            ExportKind::Png => self
                .pending
                .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
                .is_ok(),
        }
    }

    /// Restores the idle label.
    pub(crate) fn finish(&self) {
        self.pending.store(false, Ordering::Release);
    }
}
