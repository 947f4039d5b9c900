#![allow(unused)]
//! Normalizer integration harness.
//!
//! # What this covers
//!
//! - **Shape detection priority**: composite `data` wins over a sibling
//!   top-level `series`; nested values win over legacy series.
//! - **Key resolution**: `name` > `label` > `series_<index>`, first-appearance
//!   order, last write wins on colliding keys.
//! - **Category completeness**: nested and legacy shapes produce one row per
//!   distinct category across all series; sparse series are null-filled.
//! - **Month repair**: legacy month labels are put back in calendar order;
//!   any other labels keep their encounter order.
//! - **Null safety** in the composite shape.
//! - **Flat-row key discovery** from the first row only.
//! - **Graceful fallback**: unrecognized data is an empty table, malformed
//!   data is an `Empty` error on the strict path and an empty table on the
//!   lenient path.
//! - **Properties** (proptest): idempotence and table consistency for any
//!   JSON payload.
//! - **Insta snapshot** of the text table printed by `painel render`.
//!
//! # What this does NOT cover
//!
//! - Render plan decisions (colours, aliases, pie thresholds): unit tests in
//!   `painel-core/src/render.rs`.
//! - Drawing in the terminal viewer.
//!
//! # Running
//!
//! ```sh
//! cargo test --test normalization_harness
//! # Update snapshots after intentional changes:
//! cargo insta review
//! ```

mod common;
use common::*;
use painel_core::config::NormalizerSettings;
use painel_core::normalizer::{detect, AxisSide, SeriesMark};
use painel_core::{normalize, Malformation, NormalizationError, Normalizer, ShapeKind};
use proptest::prelude::*;
use rstest::rstest;
use serde_json::{json, Value};

// ---------------------------------------------------------------------------
// Shape detection
// ---------------------------------------------------------------------------

#[test]
fn composite_data_wins_over_top_level_series() {
    let chart = ChartBuilder::bar("T")
        .data(composite_data(&["A", "B"], vec![json!({"name": "S", "data": [1, 2]})]))
        .series(json!([legacy_series("legacy", &[("Janeiro", 9.0)])]))
        .build();

    let table = normalize(&chart).unwrap();
    assert_eq!(table.shape, ShapeKind::Composite);
    assert_keys!(table, ["S"]);
    assert_labels!(table, ["A", "B"]);
}

#[test]
fn every_fixture_is_detected_as_its_shape() {
    for (expected, chart) in one_of_each_shape() {
        assert_eq!(detect(&chart).kind(), expected, "{}", chart.title);
        assert_eq!(normalize(&chart).unwrap().shape, expected, "{}", chart.title);
    }
}

// ---------------------------------------------------------------------------
// Idempotence and consistency over the fixtures
// ---------------------------------------------------------------------------

#[rstest]
#[case::composite(iptu_composite())]
#[case::nested(vaccination_by_city())]
#[case::legacy(dengue_shuffled_months())]
#[case::flat(school_enrolment())]
fn normalizing_twice_is_identical(#[case] chart: painel_core::ChartConfig) {
    let first = normalize(&chart).unwrap();
    let second = normalize(&chart).unwrap();
    assert_eq!(first, second);
    assert_table_consistent(&first);
}

// ---------------------------------------------------------------------------
// Category completeness
// ---------------------------------------------------------------------------

#[test]
fn nested_rows_cover_every_city_of_every_series() {
    let table = normalize(&vaccination_by_city()).unwrap();

    assert_keys!(table, ["2023", "2024"]);
    assert_labels!(table, ["Centro", "Norte", "Sul"]);
    assert_cell!(table, "Centro", "2024", None);
    assert_cell!(table, "Norte", "2023", Some(74.0));
    assert_cell!(table, "Sul", "2023", None);
    assert_cell!(table, "Sul", "2024", Some(88.0));
}

#[test]
fn sparse_legacy_series_do_not_shrink_the_table() {
    let chart = ChartBuilder::line("Atendimentos")
        .series(json!([
            legacy_series("UBS Centro", &[("Zona A", 1.0)]),
            legacy_series("UBS Norte", &[("Zona B", 2.0), ("Zona C", 3.0)]),
        ]))
        .build();

    let table = normalize(&chart).unwrap();
    assert_eq!(table.rows.len(), 3);
    assert_cell!(table, "Zona A", "UBS Norte", None);
    assert_cell!(table, "Zona C", "UBS Norte", Some(3.0));
    assert_table_consistent(&table);
}

#[test]
fn nested_points_fall_back_to_label_field() {
    let chart = ChartBuilder::bar("T")
        .data(json!([{"name": "S", "values": [{"label": "Leste", "value": 4}]}]))
        .build();
    let table = normalize(&chart).unwrap();
    assert_keys!(table, ["S"]);
    assert_cell!(table, "Leste", "S", Some(4.0));
}

// ---------------------------------------------------------------------------
// Month repair
// ---------------------------------------------------------------------------

#[test]
fn shuffled_months_are_put_back_in_calendar_order() {
    let table = normalize(&dengue_shuffled_months()).unwrap();
    assert_labels!(table, ["Janeiro", "Fevereiro", "Março"]);
    assert_cell!(table, "Março", "Casos", Some(42.0));
}

#[rstest]
#[case::zones(&["Zona B", "Zona A"], &["Zona B", "Zona A"])]
#[case::months_only(&["Abril", "Janeiro"], &["Janeiro", "Abril"])]
#[case::mixed(&["Março", "Total", "Janeiro"], &["Março", "Total", "Janeiro"])]
#[case::wrong_case(&["março", "janeiro"], &["março", "janeiro"])]
fn month_repair_only_applies_to_pure_month_axes(#[case] input: &[&str], #[case] expected: &[&str]) {
    let points: Vec<(&str, f64)> = input.iter().map(|label| (*label, 1.0)).collect();
    let chart = ChartBuilder::bar("T")
        .series(json!([legacy_series("S", &points)]))
        .build();

    let table = normalize(&chart).unwrap();
    let labels: Vec<&str> = table.labels().collect();
    assert_eq!(labels, expected);
}

#[test]
fn month_names_come_from_settings() {
    let settings = NormalizerSettings {
        months: ["January", "February", "March"].iter().map(|m| m.to_string()).collect(),
        ..NormalizerSettings::default()
    };
    let chart = ChartBuilder::bar("T")
        .series(json!([legacy_series("S", &[("March", 3.0), ("January", 1.0)])]))
        .build();

    let table = Normalizer::new(settings).normalize(&chart).unwrap();
    assert_labels!(table, ["January", "March"]);
}

// ---------------------------------------------------------------------------
// Composite shape
// ---------------------------------------------------------------------------

#[test]
fn composite_missing_and_null_points_become_null_cells() {
    let chart = ChartBuilder::bar("T")
        .data(composite_data(
            &["A", "B", "C", "D"],
            vec![json!({"name": "s", "data": [1, null, 3]})],
        ))
        .build();

    let table = normalize(&chart).unwrap();
    assert_eq!(table.column("s"), vec![Some(1.0), None, Some(3.0), None]);
    assert_eq!(
        table.to_json_rows("label")[1],
        json!({"label": "B", "s": null})
    );
}

#[test]
fn composite_metadata_passes_through() {
    let table = normalize(&iptu_composite()).unwrap();
    let meta = table.composite.as_ref().expect("composite metadata");

    assert_eq!(meta.series.len(), 2);
    assert_eq!(meta.series[0].mark, SeriesMark::Bar);
    assert_eq!(meta.series[0].color.as_deref(), Some("#059669"));
    assert_eq!(meta.series[1].mark, SeriesMark::Line);
    assert_eq!(meta.series[1].axis, AxisSide::Right);
    let right = meta.y_axes.right.as_ref().expect("right axis");
    assert_eq!(right.title.as_deref(), Some("Meta"));
}

#[test]
fn composite_skips_null_series_entries() {
    let chart = ChartBuilder::bar("T")
        .data(composite_data(&["A"], vec![Value::Null, json!({"name": "s", "data": [5]})]))
        .build();
    let table = normalize(&chart).unwrap();
    assert_keys!(table, ["s"]);
}

#[test]
fn colliding_keys_last_write_wins() {
    let chart = ChartBuilder::bar("T")
        .data(composite_data(
            &["A"],
            vec![
                json!({"name": "dup", "data": [1]}),
                json!({"name": "dup", "data": [2]}),
            ],
        ))
        .build();
    let table = normalize(&chart).unwrap();
    assert_keys!(table, ["dup"]);
    assert_cell!(table, "A", "dup", Some(2.0));
}

// ---------------------------------------------------------------------------
// Key resolution precedence
// ---------------------------------------------------------------------------

#[rstest]
#[case::name_wins(json!({"name": "N", "label": "L", "data": [1]}), "N")]
#[case::label_second(json!({"label": "L", "data": [1]}), "L")]
#[case::positional(json!({"data": [1]}), "series_0")]
#[case::empty_name(json!({"name": "", "label": "L", "data": [1]}), "L")]
#[case::numeric_name(json!({"name": 2024, "data": [1]}), "2024")]
fn series_key_precedence(#[case] series: Value, #[case] expected: &str) {
    let chart = ChartBuilder::bar("T")
        .data(composite_data(&["A"], vec![series]))
        .build();
    let table = normalize(&chart).unwrap();
    assert_keys!(table, [expected]);
}

#[test]
fn positional_keys_use_the_series_index() {
    let chart = ChartBuilder::bar("T")
        .data(composite_data(
            &["A"],
            vec![json!({"name": "N", "data": [1]}), json!({"data": [2]})],
        ))
        .build();
    assert_keys!(normalize(&chart).unwrap(), ["N", "series_1"]);
}

// ---------------------------------------------------------------------------
// Flat rows
// ---------------------------------------------------------------------------

#[test]
fn flat_rows_discover_keys_from_the_first_row() {
    let chart = ChartBuilder::bar("T")
        .data(json!([{"label": "A", "x": 1, "y": 2}, {"label": "B", "x": 3, "y": 4}]))
        .build();

    let table = normalize(&chart).unwrap();
    assert_keys!(table, ["x", "y"]);
    assert_eq!(table.rows.len(), 2);
    assert_cell!(table, "B", "y", Some(4.0));
    assert_table_consistent(&table);
}

#[test]
fn flat_rows_do_not_backfill_later_keys() {
    let chart = ChartBuilder::bar("T")
        .data(json!([{"label": "A", "x": 1}, {"label": "B", "x": 2, "z": 9}]))
        .build();

    let table = normalize(&chart).unwrap();
    assert_keys!(table, ["x"]);
    assert_table_consistent(&table);
}

#[test]
fn flat_row_labels_fall_back_to_city_then_placeholder() {
    let chart = ChartBuilder::bar("T")
        .data(json!([{"city": "Centro", "n": 1}, {"n": 2}]))
        .build();

    let table = normalize(&chart).unwrap();
    assert_keys!(table, ["n"]);
    assert_labels!(table, ["Centro", "Unknown"]);
}

#[test]
fn numeric_strings_are_accepted() {
    let chart = ChartBuilder::bar("T")
        .data(json!([{"label": "A", "x": "12.5", "y": ""}]))
        .build();
    let table = normalize(&chart).unwrap();
    assert_cell!(table, "A", "x", Some(12.5));
    assert_cell!(table, "A", "y", None);
}

// ---------------------------------------------------------------------------
// Fallback policy
// ---------------------------------------------------------------------------

#[test]
fn string_data_is_an_empty_table_not_an_error() {
    let chart = ChartBuilder::bar("T").data(json!("not-an-array")).build();
    let table = normalize(&chart).unwrap();
    assert_eq!(table.shape, ShapeKind::Unrecognized);
    assert_empty(&table);
}

#[test]
fn unrecognized_data_renders_nothing() {
    for raw in UNRECOGNIZED_DATA {
        let data: Value = serde_json::from_str(raw).unwrap();
        let chart = ChartBuilder::bar("T").data(data).build();
        let table = normalize(&chart).unwrap_or_else(|err| panic!("{raw}: {err}"));
        assert_empty(&table);
    }
}

#[test]
fn malformed_data_is_an_error_on_the_strict_path() {
    for chart in malformed_charts() {
        let err = normalize(&chart).expect_err(&chart.title);
        assert!(matches!(err, NormalizationError::Empty { .. }), "{}", chart.title);
        assert_ne!(err.shape(), ShapeKind::Unrecognized, "{}", chart.title);
    }
}

#[test]
fn malformed_data_is_empty_on_the_lenient_path() {
    let normalizer = Normalizer::default();
    for chart in malformed_charts() {
        assert_empty(&normalizer.normalize_lenient(&chart));
    }
}

#[test]
fn strict_errors_name_the_offending_cell() {
    let chart = ChartBuilder::bar("T")
        .data(json!([{"label": "Centro", "casos": [1, 2]}]))
        .build();
    let err = normalize(&chart).unwrap_err();
    match err.reason() {
        Malformation::NotNumeric { key, category, .. } => {
            assert_eq!(key, "casos");
            assert_eq!(category, "Centro");
        }
        other => panic!("unexpected malformation: {other:?}"),
    }
}

// ---------------------------------------------------------------------------
// Snapshot
// ---------------------------------------------------------------------------

#[test]
fn text_table_snapshot() {
    let table = normalize(&dengue_shuffled_months()).unwrap();
    insta::assert_snapshot!(table.to_string(), @r"
    label     | Casos
    Janeiro   | 6
    Fevereiro | 12
    Março     | 42
    ");
}

// ---------------------------------------------------------------------------
// Properties
// ---------------------------------------------------------------------------

fn arb_json() -> impl Strategy<Value = Value> {
    let leaf = prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::Bool),
        (-1000i64..1000).prop_map(|n| json!(n)),
        "[A-Za-z0-9 ]{0,6}".prop_map(Value::String),
    ];
    leaf.prop_recursive(4, 48, 5, |inner| {
        let field = prop_oneof![
            Just("label".to_string()),
            Just("labels".to_string()),
            Just("series".to_string()),
            Just("values".to_string()),
            Just("data".to_string()),
            Just("name".to_string()),
            Just("value".to_string()),
            Just("city".to_string()),
            "[a-z]{1,3}",
        ];
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..5).prop_map(Value::Array),
            prop::collection::vec((field, inner), 0..5)
                .prop_map(|pairs| Value::Object(pairs.into_iter().collect())),
        ]
    })
}

fn arb_legacy_chart() -> impl Strategy<Value = painel_core::ChartConfig> {
    let months = NormalizerSettings::default().months;
    let label = prop_oneof![prop::sample::select(months), "Zona [A-D]"];
    let point = (label, -500.0f64..500.0);
    let series = prop::collection::vec(point, 0..8);
    prop::collection::vec(series, 1..4).prop_map(|all| {
        let series: Vec<Value> = all
            .iter()
            .enumerate()
            .map(|(i, points)| {
                let points: Vec<(&str, f64)> = points.iter().map(|(l, v)| (l.as_str(), *v)).collect();
                legacy_series(&format!("S{i}"), &points)
            })
            .collect();
        ChartBuilder::line("P").series(Value::Array(series)).build()
    })
}

proptest! {
    #[test]
    fn any_payload_is_idempotent_and_consistent(data in arb_json(), series in arb_json()) {
        let chart = ChartBuilder::bar("P").data(data).series(series).build();
        let normalizer = Normalizer::default();

        let first = normalizer.normalize(&chart);
        let second = normalizer.normalize(&chart);
        prop_assert_eq!(&first, &second);

        let table = normalizer.normalize_lenient(&chart);
        assert_table_consistent(&table);
        if first.is_err() {
            prop_assert!(table.rows.is_empty() && table.keys.is_empty());
        }
    }

    #[test]
    fn legacy_rows_equal_distinct_categories(chart in arb_legacy_chart()) {
        let table = normalize(&chart).unwrap();
        let mut distinct: Vec<&str> = chart
            .series
            .as_ref()
            .and_then(Value::as_array)
            .into_iter()
            .flatten()
            .filter_map(|s| s.get("data").and_then(Value::as_array))
            .flatten()
            .filter_map(|p| p.get("label").and_then(Value::as_str))
            .collect();
        distinct.sort_unstable();
        distinct.dedup();

        prop_assert_eq!(table.rows.len(), distinct.len());
        assert_table_consistent(&table);
    }
}
