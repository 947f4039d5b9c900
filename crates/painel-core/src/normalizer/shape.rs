//! Shape detection: classifies a [`ChartConfig`] exactly once.
//!
//! Detection order (first match wins):
//!
//! | # | Shape            | Signal |
//! |---|------------------|--------|
//! | 1 | `Composite`      | `data` is an object with `labels` or `series` |
//! | 2 | `NestedValues`   | `data[0].values` is an array |
//! | 3 | `LegacySeries`   | top-level `series` is an array |
//! | 4 | `FlatRows`       | `data` is a non-empty array starting with an object |
//! | 5 | `Unrecognized`   | anything else, including empty arrays |
//!
//! Shapes overlap structurally, so the order matters: the composite object is
//! the most distinctive and is checked first, even when a sibling top-level
//! `series` is also present.

use crate::types::ChartConfig;
use serde_json::{Map, Value};

/// Tag of a detected shape, without the borrowed payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShapeKind {
    Composite,
    NestedValues,
    LegacySeries,
    FlatRows,
    Unrecognized,
}

impl std::fmt::Display for ShapeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ShapeKind::Composite => write!(f, "composite"),
            ShapeKind::NestedValues => write!(f, "nested-values"),
            ShapeKind::LegacySeries => write!(f, "legacy-series"),
            ShapeKind::FlatRows => write!(f, "flat-rows"),
            ShapeKind::Unrecognized => write!(f, "unrecognized"),
        }
    }
}

/// A recognized input shape, borrowing the part of the config it came from.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ChartShape<'a> {
    /// `data = {labels: [...], series: [{name|label, data: [n...]}], yAxes?}`
    Composite(&'a Map<String, Value>),
    /// `data = [{label|name, values: [{city|label, value}]}]`
    NestedValues(&'a [Value]),
    /// `series = [{name, data: [{label, value}]}]`
    LegacySeries(&'a [Value]),
    /// `data = [{label, k1: n, k2: n}]`
    FlatRows(&'a [Value]),
    Unrecognized,
}

impl ChartShape<'_> {
    pub fn kind(&self) -> ShapeKind {
        match self {
            ChartShape::Composite(_) => ShapeKind::Composite,
            ChartShape::NestedValues(_) => ShapeKind::NestedValues,
            ChartShape::LegacySeries(_) => ShapeKind::LegacySeries,
            ChartShape::FlatRows(_) => ShapeKind::FlatRows,
            ChartShape::Unrecognized => ShapeKind::Unrecognized,
        }
    }
}

/// Classify `config` into exactly one [`ChartShape`]. Never fails.
pub fn detect(config: &ChartConfig) -> ChartShape<'_> {
    let data = config.data.as_ref();

    if let Some(Value::Object(obj)) = data {
        if obj.contains_key("labels") || obj.contains_key("series") {
            return ChartShape::Composite(obj);
        }
    }

    if let Some(Value::Array(items)) = data {
        let nested = items
            .first()
            .and_then(|first| first.get("values"))
            .is_some_and(Value::is_array);
        if nested {
            return ChartShape::NestedValues(items);
        }
    }

    if let Some(Value::Array(series)) = config.series.as_ref() {
        return ChartShape::LegacySeries(series);
    }

    if let Some(Value::Array(rows)) = data {
        if rows.first().is_some_and(Value::is_object) {
            return ChartShape::FlatRows(rows);
        }
    }

    ChartShape::Unrecognized
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
