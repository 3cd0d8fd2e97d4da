// Copyright 2025 the GridVar Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Exports a configured widget into a temporary directory.

use std::fs;

use gridvar::{
    DataIndex, DataMapping, DisplayMapping, ExportOptions, GridVar, GridVarOptions,
    HistogramMapping,
};
use gridvar_export::{DirectorySink, ExportError, ExportKind, ExportTransport, Exporter};
use url::Url;

#[derive(Debug)]
struct FixedStylesheet(&'static str);

impl ExportTransport for FixedStylesheet {
    fn get_text(&self, _url: &Url) -> Result<String, ExportError> {
        Ok(self.0.to_string())
    }

    fn upload_svg(&self, url: &Url, _filename: &str, _svg: &str) -> Result<String, ExportError> {
        Err(ExportError::Status {
            url: url.to_string(),
            status: 503,
        })
    }
}

fn widget() -> GridVar {
    let options = GridVarOptions::default()
        .with_row_order(["TP53", "PIK3CA", "AKT1"])
        .with_column_order(["transit", "skateboard"])
        .with_data_mapping(DataMapping {
            data: vec![vec![
                "AKT1".into(),
                "transit".into(),
                ["Missense"].into(),
            ]],
            data_index: DataIndex::default().with_dimension("mutation", 2),
        })
        .with_display_mapping(DisplayMapping::new("mutation").with_renderer("Missense", "#bb88bb"))
        .with_histogram_mapping(HistogramMapping::new([
            ("TP53".to_string(), 0.9),
            ("PIK3CA".to_string(), 0.8),
            ("AKT1".to_string(), 0.78),
        ]))
        .with_export_options(ExportOptions {
            style: Some("https://example.com/gridvar.css".into()),
            server: Some("https://example.com/rasterize".into()),
        });
    GridVar::new(options).unwrap()
}

#[test]
fn svg_export_writes_a_standalone_document() {
    let tmp = tempfile::tempdir().unwrap();
    let grid = widget();
    let exporter = Exporter::for_widget(
        &grid,
        FixedStylesheet(".nibr-gridVar-cell { stroke: none; }\n"),
        DirectorySink::new(tmp.path()),
    )
    .unwrap();
    assert_eq!(exporter.buttons().len(), 2);

    let filename = exporter.export_svg(&grid).unwrap();
    let document = fs::read_to_string(tmp.path().join(&filename)).unwrap();
    assert!(document.starts_with(r#"<?xml version="1.0" standalone="no"?>"#));
    assert!(document.contains(".nibr-gridVar-cell { stroke: none; }"));
    assert!(document.contains(r#"class="nibr-gridVar-heatmapCanvas""#));
    assert!(document.contains(r#"class="nibr-gridVar-histogram""#));
    assert!(document.ends_with("</svg></g></svg>"));
}

#[test]
fn rasterization_errors_are_reported_and_the_button_recovers() {
    let tmp = tempfile::tempdir().unwrap();
    let grid = widget();
    let exporter =
        Exporter::for_widget(&grid, FixedStylesheet(""), DirectorySink::new(tmp.path())).unwrap();
    let err = exporter.export_png(&grid).unwrap_err();
    assert!(matches!(err, ExportError::Status { status: 503, .. }));
    assert_eq!(
        exporter.button(ExportKind::Png).map(|b| b.label()),
        Some("[Export PNG]")
    );
    assert_eq!(fs::read_dir(tmp.path()).unwrap().count(), 0);
}
