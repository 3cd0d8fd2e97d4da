// Copyright 2025 the GridVar Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Export for `gridvar` widgets.
//!
//! An export fetches the configured stylesheet, composes the widget's panel fragments into a
//! single SVG 1.1 document, and then either saves it through an [`SvgSink`] or uploads it to
//! a rasterization server that answers with the location of the rendered PNG.
//!
//! HTTP goes through an [`ExportTransport`]; [`ReqwestTransport`] is the blocking
//! `reqwest` implementation.

mod button;
mod compose;
mod error;
mod exporter;
mod sink;
mod transport;

pub use button::{ExportButton, ExportKind, RENDERING_LABEL};
pub use compose::{BUFFER, LEGEND_OFFSET_X, compose_document, document_size};
pub use error::ExportError;
pub use exporter::{Exporter, PngExport, random_filename};
pub use sink::{DirectorySink, SvgSink};
pub use transport::{ExportTransport, ReqwestTransport};
