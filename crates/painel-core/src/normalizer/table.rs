//! The normalizer's output: one uniform, row-oriented table.

use super::ShapeKind;
use indexmap::IndexMap;
use serde_json::{Map, Number, Value};
use std::fmt;

/// One category of the table: the axis label plus a cell per series key.
///
/// Every row of a [`NormalizedTable`] holds exactly the table's keys, in the
/// table's key order. A cell is `None` when the series has no value there.
#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    pub label: String,
    pub values: IndexMap<String, Option<f64>>,
}

impl Row {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            values: IndexMap::new(),
        }
    }

    /// Value of `key` in this row, `None` when absent or null.
    pub fn get(&self, key: &str) -> Option<f64> {
        self.values.get(key).copied().flatten()
    }

    /// Flat `{axis_key: label, key: value | null, ...}` object, the form
    /// JavaScript charting libraries consume. The axis label wins if a series
    /// happens to be keyed like the axis.
    pub fn to_json(&self, axis_key: &str) -> Map<String, Value> {
        let mut obj = Map::with_capacity(self.values.len() + 1);
        obj.insert(axis_key.to_string(), Value::String(self.label.clone()));
        for (key, value) in &self.values {
            if key == axis_key {
                continue;
            }
            let cell = value.and_then(json_number).map_or(Value::Null, Value::Number);
            obj.insert(key.clone(), cell);
        }
        obj
    }
}

/// Whole values inside the exactly-representable range come out as JSON
/// integers, so `6` stays `6` rather than `6.0`.
fn json_number(value: f64) -> Option<Number> {
    const EXACT: f64 = 9_007_199_254_740_992.0; // 2^53
    if value.fract() == 0.0 && value.abs() <= EXACT {
        Some(Number::from(value as i64))
    } else {
        Number::from_f64(value)
    }
}

/// Whether a composite series is drawn as bars or as a line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SeriesMark {
    #[default]
    Bar,
    Line,
}

impl SeriesMark {
    pub(super) fn from_value(value: Option<&Value>) -> Self {
        match value.and_then(Value::as_str) {
            Some("line") => SeriesMark::Line,
            _ => SeriesMark::Bar,
        }
    }
}

/// Which value axis a composite series is plotted against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AxisSide {
    #[default]
    Left,
    Right,
}

impl AxisSide {
    pub(super) fn from_value(value: Option<&Value>) -> Self {
        match value.and_then(Value::as_str) {
            Some("right") => AxisSide::Right,
            _ => AxisSide::Left,
        }
    }
}

/// Per-series metadata of the composite shape, passed through untouched.
#[derive(Debug, Clone, PartialEq)]
pub struct SeriesMeta {
    pub key: String,
    pub mark: SeriesMark,
    pub axis: AxisSide,
    pub color: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AxisConfig {
    pub title: Option<String>,
    pub format: Option<String>,
}

impl AxisConfig {
    fn from_value(value: &Value) -> Option<Self> {
        let obj = value.as_object()?;
        let text = |field: &str| obj.get(field).and_then(Value::as_str).map(str::to_string);
        Some(Self {
            title: text("title"),
            format: text("format"),
        })
    }
}

/// Left/right value-axis configuration of a composite chart.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct YAxes {
    pub left: Option<AxisConfig>,
    pub right: Option<AxisConfig>,
}

impl YAxes {
    pub(super) fn from_value(value: &Value) -> Self {
        Self {
            left: value.get("left").and_then(AxisConfig::from_value),
            right: value.get("right").and_then(AxisConfig::from_value),
        }
    }
}

/// Metadata only the composite shape carries.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CompositeMeta {
    /// One entry per declared (non-null) series, in declaration order.
    pub series: Vec<SeriesMeta>,
    pub y_axes: YAxes,
}

/// Uniform tabular form of any recognized chart payload.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedTable {
    pub shape: ShapeKind,
    /// Resolved series keys: deduplicated, in order of first appearance.
    pub keys: Vec<String>,
    /// Rows in the categorical axis's natural or repaired order.
    pub rows: Vec<Row>,
    pub composite: Option<CompositeMeta>,
}

impl NormalizedTable {
    /// A table with no rows and no keys: "nothing to render".
    pub fn empty(shape: ShapeKind) -> Self {
        Self {
            shape,
            keys: Vec::new(),
            rows: Vec::new(),
            composite: None,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty() && self.keys.is_empty()
    }

    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.rows.iter().map(|row| row.label.as_str())
    }

    /// All cells of one series, top to bottom.
    pub fn column(&self, key: &str) -> Vec<Option<f64>> {
        self.rows.iter().map(|row| row.get(key)).collect()
    }

    /// Rows as flat JSON objects (see [`Row::to_json`]).
    pub fn to_json_rows(&self, axis_key: &str) -> Vec<Value> {
        self.rows
            .iter()
            .map(|row| Value::Object(row.to_json(axis_key)))
            .collect()
    }
}

/// Aligned text table, one line per row, `-` for missing cells.
impl fmt::Display for NormalizedTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut header = vec!["label".to_string()];
        header.extend(self.keys.iter().cloned());

        let body: Vec<Vec<String>> = self
            .rows
            .iter()
            .map(|row| {
                let mut cells = vec![row.label.clone()];
                cells.extend(self.keys.iter().map(|key| {
                    row.get(key)
                        .map_or_else(|| "-".to_string(), |v| v.to_string())
                }));
                cells
            })
            .collect();

        let widths: Vec<usize> = (0..header.len())
            .map(|col| {
                std::iter::once(&header)
                    .chain(&body)
                    .map(|line| line[col].chars().count())
                    .max()
                    .unwrap_or(0)
            })
            .collect();

        for line in std::iter::once(&header).chain(&body) {
            let padded: Vec<String> = line
                .iter()
                .zip(&widths)
                .map(|(cell, &width)| format!("{cell:<width$}"))
                .collect();
            writeln!(f, "{}", padded.join(" | ").trim_end())?;
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
