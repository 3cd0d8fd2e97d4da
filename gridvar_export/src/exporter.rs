// Copyright 2025 the GridVar Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The export workflow: fetch the stylesheet, compose, then save or rasterize.

use gridvar::{ExportOptions, GridVar};
use url::Url;
use uuid::Uuid;

use crate::button::{ExportButton, ExportKind};
use crate::compose::compose_document;
use crate::sink::SvgSink;
use crate::transport::ExportTransport;
use crate::ExportError;

/// A finished PNG export.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PngExport {
    /// Name the SVG was uploaded under.
    pub filename: String,
    /// Location of the rendered PNG, as answered by the server. Hosts navigate to it.
    pub location: String,
}

/// Exports widgets through a transport and a sink.
#[derive(Debug)]
pub struct Exporter<T, S> {
    style: Url,
    server: Option<Url>,
    buttons: Vec<ExportButton>,
    transport: T,
    sink: S,
}

fn parse_url(url: &str) -> Result<Url, ExportError> {
    Url::parse(url).map_err(|source| ExportError::InvalidUrl {
        url: url.to_string(),
        source,
    })
}

/// A fresh export filename: eight random lowercase hex characters and `.svg`.
pub fn random_filename() -> String {
    let id = Uuid::new_v4().simple().to_string();
    format!("{}.svg", &id[..8])
}

impl<T: ExportTransport, S: SvgSink> Exporter<T, S> {
    /// Validates the endpoints in `options`.
    ///
    /// Fails with [`ExportError::NotConfigured`] without a stylesheet URL.
    pub fn new(options: &ExportOptions, transport: T, sink: S) -> Result<Self, ExportError> {
        let style = parse_url(options.style.as_deref().ok_or(ExportError::NotConfigured)?)?;
        let server = options.server.as_deref().map(parse_url).transpose()?;
        Ok(Self {
            style,
            server,
            buttons: ExportButton::for_options(options),
            transport,
            sink,
        })
    }

    /// An exporter for the `exportOptions` of `grid`.
    pub fn for_widget(grid: &GridVar, transport: T, sink: S) -> Result<Self, ExportError> {
        let options = grid
            .options()
            .export_options
            .as_ref()
            .ok_or(ExportError::NotConfigured)?;
        Self::new(options, transport, sink)
    }

    /// The enabled buttons, SVG first.
    pub fn buttons(&self) -> &[ExportButton] {
        &self.buttons
    }

    /// The button of one kind, if enabled.
    pub fn button(&self, kind: ExportKind) -> Option<&ExportButton> {
        self.buttons.iter().find(|b| b.kind() == kind)
    }

    /// Fetches the stylesheet and composes the document of `grid`.
    pub fn compose(&self, grid: &GridVar) -> Result<String, ExportError> {
        let stylesheet = self.transport.get_text(&self.style).inspect_err(|e| {
            tracing::warn!(url = %self.style, error = %e, "could not fetch export stylesheet");
        })?;
        tracing::info!(url = %self.style, bytes = stylesheet.len(), "fetched export stylesheet");
        Ok(compose_document(&grid.svg_fragments(), &stylesheet))
    }

    /// Composes `grid` and saves it to the sink. Returns the filename used.
    pub fn export_svg(&self, grid: &GridVar) -> Result<String, ExportError> {
        let filename = random_filename();
        let document = self.compose(grid)?;
        self.sink.save(&filename, &document)?;
        Ok(filename)
    }

    /// Composes `grid` and uploads it for rasterization.
    ///
    /// The PNG button reads "Rendering..." until this returns, on success and on failure.
    /// A call while another is rendering fails with [`ExportError::Busy`].
    pub fn export_png(&self, grid: &GridVar) -> Result<PngExport, ExportError> {
        let (Some(server), Some(button)) = (&self.server, self.button(ExportKind::Png)) else {
            return Err(ExportError::NotConfigured);
        };
        if !button.begin() {
            tracing::warn!("PNG export already rendering; click ignored");
            return Err(ExportError::Busy);
        }
        let result = self.upload(grid, server);
        button.finish();
        result
    }

    fn upload(&self, grid: &GridVar, server: &Url) -> Result<PngExport, ExportError> {
        let filename = random_filename();
        let document = self.compose(grid)?;
        let location = self
            .transport
            .upload_svg(server, &filename, &document)
            .inspect_err(|e| {
                tracing::warn!(url = %server, error = %e, "PNG rasterization failed");
            })?;
        let location = location.trim().to_string();
        tracing::info!(%filename, %location, "PNG rendered");
        Ok(PngExport { filename, location })
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use gridvar::{GridVarOptions, Panel};

    use super::*;

    #[derive(Debug, Default)]
    struct MockTransport {
        stylesheet: Option<String>,
        location: Option<String>,
        uploads: RefCell<Vec<(String, String, String)>>,
    }

    impl ExportTransport for MockTransport {
        fn get_text(&self, url: &Url) -> Result<String, ExportError> {
            self.stylesheet.clone().ok_or_else(|| ExportError::Status {
                url: url.to_string(),
                status: 404,
            })
        }

        fn upload_svg(&self, url: &Url, filename: &str, svg: &str) -> Result<String, ExportError> {
            self.uploads
                .borrow_mut()
                .push((url.to_string(), filename.to_string(), svg.to_string()));
            self.location.clone().ok_or_else(|| ExportError::Transport {
                url: url.to_string(),
                message: "connection reset".into(),
            })
        }
    }

    #[derive(Debug, Default)]
    struct MemorySink {
        saved: RefCell<Vec<(String, String)>>,
    }

    impl SvgSink for MemorySink {
        fn save(&self, filename: &str, document: &str) -> Result<(), ExportError> {
            self.saved
                .borrow_mut()
                .push((filename.to_string(), document.to_string()));
            Ok(())
        }
    }

    fn both() -> ExportOptions {
        ExportOptions {
            style: Some("https://example.com/gridvar.css".into()),
            server: Some("https://example.com/rasterize".into()),
        }
    }

    fn widget() -> GridVar {
        GridVar::new(
            GridVarOptions::default()
                .with_row_order(["TP53", "AKT1"])
                .with_column_order(["transit"]),
        )
        .unwrap()
    }

    fn working_transport() -> MockTransport {
        MockTransport {
            stylesheet: Some(".nibr-gridVar { font-size: 10px; }\n".into()),
            location: Some("https://example.com/out/abc.png\n".into()),
            ..MockTransport::default()
        }
    }

    #[test]
    fn filenames_are_short_and_random() {
        let a = random_filename();
        let b = random_filename();
        assert_eq!(a.len(), 12);
        assert!(a.ends_with(".svg"));
        assert!(a[..8].chars().all(|c| c.is_ascii_hexdigit()));
        assert_ne!(a, b);
    }

    #[test]
    fn missing_or_invalid_endpoints_are_rejected() {
        let err = Exporter::new(
            &ExportOptions::default(),
            MockTransport::default(),
            MemorySink::default(),
        )
        .unwrap_err();
        assert!(matches!(err, ExportError::NotConfigured));

        let bad = ExportOptions {
            style: Some("not a url".into()),
            server: None,
        };
        let err = Exporter::new(&bad, MockTransport::default(), MemorySink::default()).unwrap_err();
        assert!(matches!(err, ExportError::InvalidUrl { ref url, .. } if url == "not a url"));

        let grid = widget();
        assert!(matches!(
            Exporter::for_widget(&grid, MockTransport::default(), MemorySink::default()),
            Err(ExportError::NotConfigured)
        ));
    }

    #[test]
    fn svg_export_embeds_the_stylesheet() {
        let exporter = Exporter::new(&both(), working_transport(), MemorySink::default()).unwrap();
        let grid = widget();
        let filename = exporter.export_svg(&grid).unwrap();
        let saved = exporter.sink.saved.borrow();
        assert_eq!(saved.len(), 1);
        assert_eq!(saved[0].0, filename);
        assert!(saved[0].1.contains(".nibr-gridVar { font-size: 10px; }"));
        assert!(saved[0].1.contains(&grid.panel_svg(Panel::Heatmap).markup));
    }

    #[test]
    fn png_export_uploads_and_restores_the_label() {
        let exporter = Exporter::new(&both(), working_transport(), MemorySink::default()).unwrap();
        let png = exporter.export_png(&widget()).unwrap();
        assert_eq!(png.location, "https://example.com/out/abc.png");
        let uploads = exporter.transport.uploads.borrow();
        assert_eq!(uploads.len(), 1);
        assert_eq!(uploads[0].0, "https://example.com/rasterize");
        assert_eq!(uploads[0].1, png.filename);
        assert!(uploads[0].2.starts_with("<?xml"));
        assert_eq!(
            exporter.button(ExportKind::Png).unwrap().label(),
            "[Export PNG]"
        );
        assert!(exporter.sink.saved.borrow().is_empty());
    }

    #[test]
    fn failed_png_export_restores_the_label() {
        let transport = MockTransport {
            location: None,
            ..working_transport()
        };
        let exporter = Exporter::new(&both(), transport, MemorySink::default()).unwrap();
        let err = exporter.export_png(&widget()).unwrap_err();
        assert!(matches!(err, ExportError::Transport { .. }));
        assert!(!exporter.button(ExportKind::Png).unwrap().is_pending());

        let no_style = Exporter::new(&both(), MockTransport::default(), MemorySink::default())
            .unwrap();
        let err = no_style.export_png(&widget()).unwrap_err();
        assert!(matches!(err, ExportError::Status { status: 404, .. }));
        assert!(no_style.transport.uploads.borrow().is_empty());
        assert_eq!(
            no_style.button(ExportKind::Png).unwrap().label(),
            "[Export PNG]"
        );
    }

    #[test]
    fn png_click_while_rendering_is_ignored() {
        let exporter = Exporter::new(&both(), working_transport(), MemorySink::default()).unwrap();
        let button = exporter.button(ExportKind::Png).unwrap();
        assert!(button.begin());
        assert!(matches!(
            exporter.export_png(&widget()),
            Err(ExportError::Busy)
        ));
        assert!(exporter.transport.uploads.borrow().is_empty());
        assert_eq!(button.label(), "Rendering...");
    }

    #[test]
    fn png_needs_a_server() {
        let svg_only = ExportOptions {
            server: None,
            ..both()
        };
        let exporter =
            Exporter::new(&svg_only, working_transport(), MemorySink::default()).unwrap();
        assert_eq!(exporter.buttons().len(), 1);
        assert!(matches!(
            exporter.export_png(&widget()),
            Err(ExportError::NotConfigured)
        ));
    }
}
