// Copyright 2025 the GridVar Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Configuration errors.

use alloc::string::{String, ToString};

/// An error raised while building or reconfiguring a [`crate::GridVar`].
///
/// These are raised synchronously and abort the operation that triggered them; the widget
/// is left as it was before the call.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    /// A renderer string is neither a `#` color nor a built-in glyph name.
    #[error(
        "could not find the built-in renderer `{name}`; available renderers are: {available}. \
         Background colors must start with `#`"
    )]
    UnknownRenderer {
        /// The string that failed to resolve.
        name: String,
        /// Comma-separated list of built-in glyph names.
        available: String,
    },
    /// A renderer object has neither `attrs` nor `styles`.
    #[error(
        "renderer object for `{value}` is of the wrong format; it needs at least an `attrs` or `styles` object"
    )]
    EmptyRendererObject {
        /// The category value the object was configured for.
        value: String,
    },
    /// A color string could not be parsed as a CSS hex color.
    #[error("`{value}` is not a valid hex color")]
    InvalidColor {
        /// The rejected color string.
        value: String,
    },
    /// A display mapping names a data dimension that `dataIndex` does not define.
    #[error("display mapping refers to unknown data dimension `{dimension}`")]
    UnknownDimension {
        /// The unknown dimension name.
        dimension: String,
    },
    /// The JSON configuration could not be parsed.
    #[error("invalid configuration: {message}")]
    Json {
        /// Parser message, including line and column.
        message: String,
    },
}

impl From<serde_json::Error> for ConfigError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json {
            message: err.to_string(),
        }
    }
}
