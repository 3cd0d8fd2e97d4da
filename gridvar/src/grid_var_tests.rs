// Copyright 2025 the GridVar Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

extern crate std;

use alloc::string::String;
use alloc::vec;
use alloc::vec::Vec;
use core::cell::RefCell;
use std::rc::Rc;

use gridvar_core::{Mark, MarkKind, MarkPayload, TweenValue};
use kurbo::{Point, Size};

use crate::{
    ConfigError, DataIndex, DataMapping, DisplayMapping, FieldValue, FixedAdvanceMeasurer,
    GridEvent, GridVar, GridVarOptions, HistogramMapping, HistogramScale, Hit,
    MultipleLegendLines, OrderedMap, Panel, STAGGER_MS,
};

const ROWS: [&str; 6] = ["TP53", "PIK3CA", "AKT1", "CBFB", "GATA3", "MAP3K1"];
const COLUMNS: [&str; 6] = [
    "transit",
    "automobile",
    "airplane",
    "skateboard",
    "bicycle",
    "tricycle",
];
const HISTOGRAM: [(&str, f64); 6] = [
    ("TP53", 0.9),
    ("PIK3CA", 0.8),
    ("AKT1", 0.78),
    ("CBFB", 0.76),
    ("GATA3", 0.54),
    ("MAP3K1", 0.21),
];

fn mutations() -> DisplayMapping {
    DisplayMapping::new("mutation")
        .with_renderer("Missense", "#bb88bb")
        .with_renderer("other non-synonymous", "#777777")
}

fn reference_options() -> GridVarOptions {
    let data = DataMapping {
        data: vec![
            vec!["AKT1".into(), "transit".into(), ["Missense"].into()],
            vec!["AKT1".into(), "skateboard".into(), ["Missense"].into()],
            vec!["TP53".into(), "transit".into(), ["other non-synonymous"].into()],
        ],
        data_index: DataIndex::default().with_dimension("mutation", 2),
    };
    GridVarOptions::default()
        .with_row_order(ROWS)
        .with_column_order(COLUMNS)
        .with_data_mapping(data)
        .with_display_mapping(mutations())
        .with_histogram_mapping(HistogramMapping::new(
            HISTOGRAM.iter().map(|(k, v)| (String::from(*k), *v)),
        ))
        .with_cell_tip(|row| {
            let index = DataIndex::default();
            std::format!(
                "{}|{}",
                index.row_key(row).unwrap_or_default(),
                index.column_key(row).unwrap_or_default()
            )
        })
}

fn attr<'a>(mark: &'a Mark, name: &str) -> Option<&'a str> {
    let attrs = match &mark.payload {
        MarkPayload::Group(g) => &g.attrs,
        MarkPayload::Path(p) => &p.attrs,
        MarkPayload::Rect(r) => &r.attrs,
        MarkPayload::Text(t) => &t.attrs,
    };
    attrs
        .iter()
        .find(|(k, _)| k == name)
        .map(|(_, v)| v.as_str())
}

fn cell_groups(grid: &GridVar) -> Vec<&Mark> {
    grid.scene(Panel::Heatmap)
        .iter()
        .filter(|m| attr(m, "class") == Some("nibr-gridVar-cell"))
        .collect()
}

#[test]
fn grid_size_is_cell_size_times_key_count() {
    let grid = GridVar::new(reference_options()).unwrap();
    assert_eq!(grid.width(&COLUMNS), 72.0);
    let twelve: Vec<&str> = ROWS.iter().chain(ROWS.iter()).copied().collect();
    assert_eq!(grid.height(&twelve), 144.0);
    assert_eq!(grid.width::<&str>(&[]), 0.0);
}

#[test]
fn label_size_of_reference_rows() {
    let grid = GridVar::new(reference_options()).unwrap();
    assert_eq!(
        grid.calculate_label_size(&ROWS, &OrderedMap::default(), 10.0),
        52.0
    );
    assert_eq!(
        grid.calculate_label_size::<&str>(&[], &OrderedMap::default(), 10.0),
        10.0
    );
}

#[test]
fn every_mapped_value_draws_one_shape() {
    let grid = GridVar::new(reference_options()).unwrap();
    let shapes = grid
        .scene(Panel::Heatmap)
        .iter()
        .filter(|m| m.kind() == MarkKind::Path)
        .count();
    assert_eq!(shapes, 3);
    assert_eq!(cell_groups(&grid).len(), 3);
}

#[test]
fn crowded_cells_keep_shapes_inside_their_own_group() {
    let mut options = reference_options();
    options.data_mapping.data = vec![
        vec![
            "AKT1".into(),
            "transit".into(),
            FieldValue::List(vec![String::from("Missense"); 70_000]),
        ],
        vec!["TP53".into(), "transit".into(), ["Missense"].into()],
    ];
    let grid = GridVar::new(options).unwrap();
    let scene = grid.scene(Panel::Heatmap);
    let groups = cell_groups(&grid);
    assert_eq!(groups.len(), 2);
    let mut shapes: Vec<usize> = groups
        .iter()
        .map(|g| scene.iter().filter(|m| m.parent == Some(g.id)).count())
        .collect();
    shapes.sort_unstable();
    assert_eq!(shapes, [1, (1 << 16) - 1]);
}

#[test]
fn unknown_category_values_draw_nothing() {
    let mut options = reference_options();
    options.data_mapping.data = vec![
        vec!["AKT1".into(), "transit".into(), ["Missense", "Bogus"].into()],
        vec!["TP53".into(), "airplane".into(), ["Silent"].into()],
    ];
    let grid = GridVar::new(options).unwrap();
    let shapes: Vec<&Mark> = grid
        .scene(Panel::Heatmap)
        .iter()
        .filter(|m| m.kind() == MarkKind::Path)
        .collect();
    assert_eq!(shapes.len(), 1);
    assert_eq!(cell_groups(&grid).len(), 2);
}

#[test]
fn rows_outside_the_order_are_skipped() {
    let mut options = reference_options();
    options
        .data_mapping
        .data
        .push(vec!["BRCA1".into(), "transit".into(), ["Missense"].into()]);
    let grid = GridVar::new(options).unwrap();
    assert_eq!(cell_groups(&grid).len(), 3);
}

#[test]
fn cells_follow_the_new_row_order() {
    let mut grid = GridVar::new(reference_options()).unwrap();
    let new_order = ["MAP3K1", "TP53", "PIK3CA", "AKT1", "CBFB", "GATA3"];
    let transitions = grid.set_row_order(new_order);

    let y = grid.row_scale();
    let x = grid.column_scale();
    assert_eq!(y.keys(), new_order);
    for group in cell_groups(&grid) {
        let (row, column) = attr(group, "title").unwrap().split_once('|').unwrap();
        let expected = Point::new(x.offset(column).unwrap(), y.offset(row).unwrap());
        assert_eq!(group.payload.origin(), expected, "cell {row}|{column}");
        let end = transitions.heatmap.end_ms();
        let sampled = transitions.heatmap.sample(group.id, end);
        if let Some(origin) = sampled.origin {
            assert_eq!(origin, expected);
        }
    }

    let akt1 = cell_groups(&grid)
        .into_iter()
        .find(|g| attr(g, "title") == Some("AKT1|transit"))
        .unwrap();
    let start = transitions.heatmap.sample(akt1.id, 0.0);
    assert_eq!(start.origin, Some(Point::new(0.0, 24.0)));
    assert_eq!(akt1.payload.origin(), Point::new(0.0, 36.0));
}

#[test]
fn row_labels_fade_in_with_a_stagger() {
    let mut grid = GridVar::new(reference_options()).unwrap();
    let transitions = grid.set_row_order(["MAP3K1", "TP53", "PIK3CA", "AKT1", "CBFB", "GATA3"]);
    let delays: Vec<f64> = transitions
        .row_labels
        .tweens
        .iter()
        .map(|t| t.delay_ms)
        .collect();
    assert_eq!(delays, [0.0, 4.0, 8.0, 12.0, 16.0, 20.0]);
    assert_eq!(transitions.row_labels.duration_ms, 1500.0);
    assert!(!transitions.histogram.is_empty());
}

#[test]
fn column_reorder_moves_cells_and_labels() {
    let mut grid = GridVar::new(reference_options()).unwrap();
    let transitions = grid.set_column_order(["tricycle", "transit", "automobile"]);
    assert!(!transitions.heatmap.is_empty());
    assert!(transitions.row_labels.is_empty());
    // Data in removed columns is no longer drawn.
    assert_eq!(cell_groups(&grid).len(), 2);
    let labels: Vec<&str> = grid
        .scene(Panel::Heatmap)
        .iter()
        .filter_map(|m| match &m.payload {
            MarkPayload::Text(t) => Some(t.text.as_str()),
            _ => None,
        })
        .collect();
    assert_eq!(labels.len(), 3);
}

#[test]
fn clicks_dispatch_to_handlers() {
    let mut grid = GridVar::new(reference_options()).unwrap();
    let seen = Rc::new(RefCell::new(Vec::<String>::new()));
    let cells = seen.clone();
    grid.on_cell_clicked(move |row| {
        let key = row[0].as_key().unwrap_or_default();
        cells.borrow_mut().push(std::format!("cell:{key}"));
    });
    let rows = seen.clone();
    grid.on_row_label_clicked(move |k| rows.borrow_mut().push(std::format!("row:{k}")));
    let columns = seen.clone();
    grid.on_column_label_clicked(move |k| columns.borrow_mut().push(std::format!("column:{k}")));

    // AKT1 is the third row; the grid starts 10px down.
    assert_eq!(
        grid.hit_test(Panel::Heatmap, Point::new(6.0, 40.0)),
        Some(Hit::Cell(0))
    );
    assert!(grid.click(Panel::Heatmap, Point::new(6.0, 40.0)).is_some());
    // PIK3CA × transit has no data.
    assert_eq!(grid.click(Panel::Heatmap, Point::new(6.0, 28.0)), None);
    assert_eq!(
        grid.click(Panel::Heatmap, Point::new(40.0, 102.0)),
        Some(GridEvent::ColumnLabelClicked("skateboard".into()))
    );
    grid.click(Panel::RowLabels, Point::new(20.0, 16.0));
    assert_eq!(grid.click(Panel::Legend, Point::new(20.0, 16.0)), None);

    assert_eq!(
        *seen.borrow(),
        ["cell:AKT1", "column:skateboard", "row:TP53"]
    );
}

#[test]
fn cell_tips_come_from_the_callback() {
    let grid = GridVar::new(reference_options()).unwrap();
    assert_eq!(grid.cell_tip(2).as_deref(), Some("TP53|transit"));
    assert_eq!(grid.cell_tip(9), None);

    let mut options = reference_options();
    options.cell_tip = None;
    let plain = GridVar::new(options).unwrap();
    assert_eq!(plain.cell_tip(0).as_deref(), Some(""));
}

#[test]
fn widget_builds_from_json() {
    let json = r##"{
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
                "other non-synonymous": {"styles": {"fill": "#777777", "stroke-width": 0}}
            },
            "labelMapping": {"Missense": "Missense", "other non-synonymous": "Other"}
        }],
        "histogramMapping": {
            "data": {"TP53": 0.9, "PIK3CA": 0.8, "AKT1": 0.78, "CBFB": 0.76, "GATA3": 0.54, "MAP3K1": 0.21},
            "label": "Histogram",
            "scale": "auto",
            "totalTicks": 2
        }
    }"##;
    let grid = GridVar::from_json(json).unwrap();
    assert!(grid.has_histogram());
    assert_eq!(grid.histogram_scale(), 0.9);
    assert_eq!(grid.tick_values(), [0.0, 0.9]);
    let styles = grid.display_styles().get("mutation").unwrap();
    assert!(styles.get("Missense").unwrap().is_background());
    assert!(!styles.get("other non-synonymous").unwrap().is_background());
    assert_eq!(styles.labels.get("other non-synonymous").map(String::as_str), Some("Other"));
}

#[test]
fn unknown_renderers_abort_construction() {
    let options = reference_options()
        .with_display_mapping(DisplayMapping::new("mutation").with_renderer("Silent", "star"));
    let err = GridVar::new(options).unwrap_err();
    assert!(matches!(err, ConfigError::UnknownRenderer { ref name, .. } if name == "star"));

    let mut bad_stroke = reference_options();
    bad_stroke.legend_styles.stroke = "grey".into();
    assert!(matches!(
        GridVar::new(bad_stroke),
        Err(ConfigError::InvalidColor { .. })
    ));
}

#[test]
fn failed_display_mapping_change_keeps_the_old_table() {
    let mut grid = GridVar::new(reference_options()).unwrap();
    let before = grid.display_styles().clone();
    let err = grid
        .set_data_display_mapping(vec![DisplayMapping::new("cnv").with_renderer("gain", "dot")])
        .unwrap_err();
    assert_eq!(
        err,
        ConfigError::UnknownDimension {
            dimension: "cnv".into()
        }
    );
    assert_eq!(grid.display_styles(), &before);

    grid.set_data_display_mapping(vec![
        DisplayMapping::new("mutation").with_renderer("Missense", "circle"),
    ])
    .unwrap();
    let shapes = grid
        .scene(Panel::Heatmap)
        .iter()
        .filter(|m| m.kind() == MarkKind::Path)
        .count();
    assert_eq!(shapes, 2);
}

#[test]
fn histogram_bars_follow_values() {
    let mut grid = GridVar::new(reference_options()).unwrap();
    let bars = |grid: &GridVar| -> Vec<(f64, f64)> {
        let mut out: Vec<(f64, f64)> = grid
            .scene(Panel::Histogram)
            .iter()
            .filter_map(|m| match &m.payload {
                MarkPayload::Rect(r) => Some((r.rect.y0, r.rect.width())),
                _ => None,
            })
            .collect();
        out.sort_by(|a, b| a.0.total_cmp(&b.0));
        out
    };
    // Fixed scale 1: a bar is value × 50 wide.
    let widths: Vec<f64> = bars(&grid).iter().map(|b| b.1).collect();
    assert_eq!(widths.len(), 6);
    assert!((widths[0] - 45.0).abs() < 1e-9);
    assert!((widths[5] - 10.5).abs() < 1e-9);

    let partial =
        HistogramMapping::new([(String::from("TP53"), 0.5)]).with_scale(HistogramScale::Auto);
    let transition = grid.set_histogram_mapping(partial);
    let widths: Vec<f64> = bars(&grid).iter().map(|b| b.1).collect();
    assert_eq!(widths, [50.0, 0.0, 0.0, 0.0, 0.0, 0.0]);
    assert!(!transition.is_empty());

    grid.set_histogram_mapping(HistogramMapping::default());
    assert!(!grid.has_histogram());
    assert!(grid.scene(Panel::Histogram).is_empty());
    assert!(grid.svg_fragments().histogram.is_none());
}

#[test]
fn histogram_classes_are_namespaced() {
    let grid = GridVar::new(reference_options()).unwrap();
    let scene = grid.scene(Panel::Histogram);
    let classes: Vec<&str> = scene.iter().filter_map(|m| attr(m, "class")).collect();
    assert!(!classes.is_empty());
    assert!(classes.iter().all(|c| c.starts_with("nibr-gridVar-")));
    let count = |class: &str| classes.iter().filter(|c| **c == class).count();
    assert_eq!(count("nibr-gridVar-bar"), 6);
    assert_eq!(count("nibr-gridVar-xaxis"), 1);
    assert_eq!(count("nibr-gridVar-yaxis"), 1);
    assert!(
        grid.panel_svg(Panel::Histogram)
            .markup
            .contains(r#"class="nibr-gridVar-bar""#)
    );
}

#[test]
fn first_render_grows_histogram_bars() {
    let grid = GridVar::new(reference_options()).unwrap();
    let initial = grid.initial_transitions();
    assert!(initial.heatmap.is_empty());
    assert_eq!(initial.row_labels.tweens.len(), 6);
    assert_eq!(initial.row_labels.duration_ms, 1500.0);

    let bars: Vec<_> = initial
        .histogram
        .tweens
        .iter()
        .filter_map(|t| match t.value {
            TweenValue::Rect { from, to } => Some((t.delay_ms, from, to)),
            _ => None,
        })
        .collect();
    assert_eq!(bars.len(), 6);
    for (i, (delay, from, to)) in bars.iter().enumerate() {
        assert_eq!(*delay, i as f64 * STAGGER_MS);
        assert_eq!(from.width(), 0.0);
        assert_eq!(from.x1, to.x1);
    }
    assert!((bars[0].2.width() - 45.0).abs() < 1e-9);
}

#[test]
fn swapping_the_measurer_relayouts_every_panel() {
    let grid = GridVar::new(reference_options())
        .unwrap()
        .with_measurer(FixedAdvanceMeasurer::new(10.0));
    // 5 + 6 × 10 + 5 wide; "automobile" needs 10 × 10 + 15 below the grid.
    assert_eq!(grid.panel_size(Panel::RowLabels), Size::new(70.0, 72.0 + 115.0));
    assert_eq!(grid.panel_size(Panel::Legend), Size::new(218.0, 25.0));
    let bars = grid
        .initial_transitions()
        .histogram
        .tweens
        .iter()
        .filter(|t| matches!(t.value, TweenValue::Rect { .. }))
        .count();
    assert_eq!(bars, 6);
}

#[test]
fn single_line_legend_size() {
    let grid = GridVar::new(reference_options()).unwrap();
    // Items at 0 and 78; the last label ends at 78 + 10 + 5 + 20 × 6.
    assert_eq!(grid.panel_size(Panel::Legend), Size::new(5.0 + 213.0, 25.0));
}

#[test]
fn multiple_legend_lines_stack_dimensions() {
    let mut options = reference_options()
        .with_display_mapping(DisplayMapping::new("cnv").with_renderer("gain", "plus"))
        .with_multiple_legend_lines(MultipleLegendLines {
            include: true,
            labels: Some(vec!["Mutation".into(), "CNV".into()]),
        });
    options.data_mapping.data_index = options.data_mapping.data_index.clone().with_dimension("cnv", 3);
    let grid = GridVar::new(options).unwrap();
    assert_eq!(grid.panel_size(Panel::Legend).height, 50.0);
    let titles: Vec<&str> = grid
        .scene(Panel::Legend)
        .iter()
        .filter(|m| attr(m, "class") == Some("nibr-gridVar-legend-category-label"))
        .filter_map(|m| match &m.payload {
            MarkPayload::Text(t) => Some(t.text.as_str()),
            _ => None,
        })
        .collect();
    assert_eq!(titles.len(), 2);
    assert!(titles.contains(&"CNV"));
}

#[test]
fn fragments_are_sized_panels() {
    let grid = GridVar::new(reference_options()).unwrap();
    let f = grid.svg_fragments();
    assert_eq!((f.heatmap.width, f.heatmap.height), (72.0, 72.0 + 85.0));
    assert_eq!((f.row_labels.width, f.row_labels.height), (52.0, 72.0 + 85.0));
    let histogram = f.histogram.unwrap();
    assert_eq!((histogram.width, histogram.height), (120.0, 72.0 + 10.0 + 85.0));
    assert!(f.heatmap.markup.starts_with("<svg"));
    assert!(f.heatmap.markup.contains(r#"class="nibr-gridVar-heatmapCanvas""#));
    assert!(f.heatmap.markup.contains(r#"class="nibr-gridVar-cell" title="AKT1|transit""#));
    assert!(f.row_labels.markup.contains(">MAP3K1</text>"));
    assert!(histogram.markup.contains(">100%</text>"));
    assert!(histogram.markup.contains(">78.0%</text>"));
    assert!(f.legend.markup.contains(r#"class="nibr-gridVar-legend-label">Missense</text>"#));
}
