//! Chart payloads used across harnesses, one per recognized shape plus the
//! malformed inputs the lenient render path has to survive.

use super::builders::*;
use painel_core::{ChartConfig, ShapeKind};
use serde_json::{json, Value};

/// Legacy month series entered out of order.
pub fn dengue_shuffled_months() -> ChartConfig {
    ChartBuilder::bar("Casos de Dengue")
        .color("#10b981")
        .series(json!([legacy_series(
            "Casos",
            &[("Março", 42.0), ("Janeiro", 6.0), ("Fevereiro", 12.0)]
        )]))
        .build()
}

/// Revenue bars against a target line on the right axis.
pub fn iptu_composite() -> ChartConfig {
    ChartBuilder::bar("Arrecadação IPTU")
        .data(composite_data(
            &["2022", "2023", "2024"],
            vec![
                json!({"name": "Arrecadado", "data": [1.2, 1.5, 1.9], "color": "#059669"}),
                json!({"name": "Meta", "data": [1.0, 1.6, 2.0], "type": "line", "yAxis": "right"}),
            ],
        ))
        .options(json!({"yAxes": {"left": {"title": "R$ mi"}, "right": {"title": "Meta"}}}))
        .build()
}

/// Two vaccination series over partly different cities.
pub fn vaccination_by_city() -> ChartConfig {
    ChartBuilder::bar("Cobertura vacinal")
        .data(json!([
            nested_series("2023", &[("Centro", 81.0), ("Norte", 74.0)]),
            nested_series("2024", &[("Norte", 79.0), ("Sul", 88.0)]),
        ]))
        .build()
}

/// Flat rows, one per school, two implicit series.
pub fn school_enrolment() -> ChartConfig {
    ChartBuilder::bar("Matrículas")
        .data(json!([
            {"label": "EMEF Centro", "manha": 320, "tarde": 290},
            {"label": "EMEF Norte", "manha": 210, "tarde": 240},
            {"label": "EMEF Sul", "manha": 150, "tarde": 170}
        ]))
        .build()
}

/// Every recognized shape with the kind the detector must report.
pub fn one_of_each_shape() -> Vec<(ShapeKind, ChartConfig)> {
    vec![
        (ShapeKind::Composite, iptu_composite()),
        (ShapeKind::NestedValues, vaccination_by_city()),
        (ShapeKind::LegacySeries, dengue_shuffled_months()),
        (ShapeKind::FlatRows, school_enrolment()),
        (ShapeKind::Unrecognized, ChartBuilder::bar("Vazio").data(json!([])).build()),
    ]
}

/// `data` values no converter accepts.
pub const UNRECOGNIZED_DATA: &[&str] = &[
    r#""not-an-array""#,
    "42",
    "true",
    "null",
    "[]",
    "[1, 2, 3]",
    r#"{"title": "no labels or series"}"#,
];

/// Recognized shapes whose contents are broken.
pub fn malformed_charts() -> Vec<ChartConfig> {
    vec![
        ChartBuilder::bar("labels not array").data(json!({"labels": "Jan", "series": []})).build(),
        ChartBuilder::bar("series entry not object").data(json!({"labels": ["A"], "series": [3]})).build(),
        ChartBuilder::bar("text cell").data(json!([{"label": "A", "x": "muitos"}])).build(),
        ChartBuilder::line("legacy data not array").series(json!([{"name": "S", "data": 5}])).build(),
    ]
}

/// The admin form's textarea contents, as typed.
pub fn pasted(chart: ChartConfig) -> Value {
    serde_json::to_value(chart).expect("chart config serializes")
}
