// Copyright 2025 the GridVar Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Renders the reference dataset, reorders its rows, and writes both states as SVG.
//!
//! Set `GRIDVAR_STYLE_URL` to fetch the export stylesheet over HTTP instead of using the
//! bundled one. `RUST_LOG=gridvar=trace` shows dropped category values.

use std::error::Error;
use std::path::Path;

use gridvar::{ExportOptions, GridEvent, GridVar, Panel};
use gridvar_export::{DirectorySink, Exporter, ReqwestTransport, SvgSink, compose_document};
use kurbo::Point;
use tracing_subscriber::EnvFilter;

const STYLESHEET: &str = include_str!("../assets/gridvar.css");

const OPTIONS: &str = r##"{
    "rowOrder": ["TP53", "PIK3CA", "AKT1", "CBFB", "GATA3", "MAP3K1"],
    "columnOrder": ["transit", "automobile", "airplane", "skateboard", "bicycle", "tricycle"],
    "dataMapping": {
        "data": [
            ["AKT1", "transit", ["Missense"]],
            ["AKT1", "skateboard", ["Missense"]],
            ["TP53", "transit", ["other non-synonymous"]]
        ],
        "dataIndex": {"rowKey": 0, "columnKey": 1, "mutation": 2}
    },
    "dataDisplayMapping": [{
        "dataType": "mutation",
        "mappings": {
            "Missense": "#bb88bb",
            "other non-synonymous": "#777777"
        }
    }],
    "histogramMapping": {
        "data": {"TP53": 0.9, "PIK3CA": 0.8, "AKT1": 0.78, "CBFB": 0.76, "GATA3": 0.54, "MAP3K1": 0.21},
        "label": "Histogram",
        "scale": 1,
        "totalTicks": 2
    }
}"##;

const REORDERED: [&str; 6] = ["MAP3K1", "TP53", "PIK3CA", "AKT1", "CBFB", "GATA3"];

fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_target(false)
        .init();

    let mut grid = GridVar::from_json(OPTIONS)?;
    grid.on_cell_clicked(|row| tracing::info!(?row, "cell clicked"));
    grid.on_row_label_clicked(|key| tracing::info!(key, "row label clicked"));

    // AKT1 × transit, in heatmap panel coordinates.
    if let Some(GridEvent::CellClicked(row)) = grid.click(Panel::Heatmap, Point::new(6.0, 40.0)) {
        println!("clicked cell {row:?}");
    }

    let out = Path::new("gridvar_demo_out");
    let sink = DirectorySink::new(out);
    write_document(&grid, &sink, "gridvar_demo.svg")?;

    let transitions = grid.set_row_order(REORDERED);
    println!(
        "row reorder: {} cell moves, {} label fades over {} ms",
        transitions.heatmap.tweens.len(),
        transitions.row_labels.tweens.len(),
        transitions.row_labels.end_ms(),
    );
    write_document(&grid, &sink, "gridvar_demo_reordered.svg")?;
    println!("wrote {}", out.display());
    Ok(())
}

fn write_document(
    grid: &GridVar,
    sink: &DirectorySink,
    filename: &str,
) -> Result<(), Box<dyn Error>> {
    match std::env::var("GRIDVAR_STYLE_URL") {
        Ok(style) => {
            let options = ExportOptions {
                style: Some(style),
                server: None,
            };
            let exporter = Exporter::new(&options, ReqwestTransport::new()?, sink.clone())?;
            sink.save(filename, &exporter.compose(grid)?)?;
        }
        Err(_) => {
            sink.save(filename, &compose_document(&grid.svg_fragments(), STYLESHEET))?;
        }
    }
    Ok(())
}
