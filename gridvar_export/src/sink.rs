// Copyright 2025 the GridVar Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Where exported SVG documents go.

use std::fs;
use std::path::{Path, PathBuf};

use crate::ExportError;

/// Receives composed SVG documents.
pub trait SvgSink {
    /// Saves `document` under `filename`.
    fn save(&self, filename: &str, document: &str) -> Result<(), ExportError>;
}

/// Writes documents into a directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectorySink {
    dir: PathBuf,
}

impl DirectorySink {
    /// A sink writing into `dir`, which is created on first save.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// The target directory.
    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl SvgSink for DirectorySink {
    fn save(&self, filename: &str, document: &str) -> Result<(), ExportError> {
        fs::create_dir_all(&self.dir)?;
        let path = self.dir.join(filename);
        fs::write(&path, document)?;
        tracing::info!(path = %path.display(), bytes = document.len(), "saved SVG export");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn saves_into_a_fresh_directory() {
        let tmp = tempfile::tempdir().unwrap();
        let sink = DirectorySink::new(tmp.path().join("exports"));
        sink.save("abc.svg", "<svg/>").unwrap();
        let written = fs::read_to_string(sink.dir().join("abc.svg")).unwrap();
        assert_eq!(written, "<svg/>");
    }
}
