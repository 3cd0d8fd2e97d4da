// Copyright 2025 the GridVar Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Export errors.

/// An error raised while exporting a widget.
///
/// Export errors never touch the widget; the export button is restored before they are
/// returned.
#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    /// The widget has no `exportOptions.style`, or PNG export was requested without a server.
    #[error("export is not configured")]
    NotConfigured,
    /// A configured endpoint is not a valid URL.
    #[error("invalid export URL `{url}`: {source}")]
    InvalidUrl {
        /// The rejected URL string.
        url: String,
        /// Why it was rejected.
        #[source]
        source: url::ParseError,
    },
    /// The request could not be sent or its response could not be read.
    #[error("request to {url} failed: {message}")]
    Transport {
        /// The requested URL.
        url: String,
        /// Transport message.
        message: String,
    },
    /// The server answered with a non-success status.
    #[error("request to {url} failed: HTTP {status}")]
    Status {
        /// The requested URL.
        url: String,
        /// HTTP status code.
        status: u16,
    },
    /// The exported document could not be written.
    #[error(transparent)]
    Io(#[from] std::io::Error),
    /// A PNG export is already in flight.
    #[error("a PNG export is already rendering")]
    Busy,
}
