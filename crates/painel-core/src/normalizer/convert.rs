//! Per-shape converters. Each one receives the payload [`detect`] already
//! classified and produces a table, or the first malformation it hits.
//!
//! [`detect`]: super::detect

use super::calendar::MonthCalendar;
use super::table::{AxisSide, CompositeMeta, SeriesMark, SeriesMeta, YAxes};
use super::{Malformation, NormalizedTable, Row, ShapeKind};
use crate::config::NormalizerSettings;
use indexmap::{IndexMap, IndexSet};
use serde_json::{Map, Value};
use std::collections::HashSet;
use tracing::debug;

// ---------------------------------------------------------------------------
// Composite: {labels: [...], series: [{name|label, data: [...], type, yAxis, color}]}
// ---------------------------------------------------------------------------

pub(super) fn composite(
    data: &Map<String, Value>,
    options: Option<&Value>,
) -> Result<NormalizedTable, Malformation> {
    let labels = optional_array(data.get("labels"), "data.labels")?;
    let series = optional_array(data.get("series"), "data.series")?;

    let labels = labels
        .iter()
        .enumerate()
        .map(|(index, value)| {
            scalar_text(value).ok_or_else(|| Malformation::InvalidLabel {
                index,
                value: value.clone(),
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    let mut keys = IndexSet::new();
    let mut meta = Vec::new();
    let mut columns: Vec<(String, &[Value])> = Vec::new();

    for (index, entry) in series.iter().enumerate() {
        let entry = match entry {
            Value::Null => continue,
            Value::Object(obj) => obj,
            _ => return Err(Malformation::InvalidSeriesEntry { index }),
        };
        let key = series_key(entry, index);
        let points = optional_array(entry.get("data"), &format!("data.series[{index}].data"))?;

        keys.insert(key.clone());
        meta.push(SeriesMeta {
            key: key.clone(),
            mark: SeriesMark::from_value(entry.get("type")),
            axis: AxisSide::from_value(entry.get("yAxis")),
            color: entry.get("color").and_then(Value::as_str).map(str::to_string),
        });
        columns.push((key, points));
    }

    let mut rows = Vec::with_capacity(labels.len());
    for (i, label) in labels.into_iter().enumerate() {
        let mut row = Row::new(label);
        for key in &keys {
            row.values.insert(key.clone(), None);
        }
        // Later series with a colliding key overwrite earlier ones.
        for (key, points) in &columns {
            let cell = numeric_cell(points.get(i), key, &row.label)?;
            row.values.insert(key.clone(), cell);
        }
        rows.push(row);
    }

    let y_axes = data
        .get("yAxes")
        .or_else(|| options.and_then(|o| o.get("yAxes")))
        .map(YAxes::from_value)
        .unwrap_or_default();

    debug!(rows = rows.len(), series = meta.len(), "normalized composite chart");

    Ok(NormalizedTable {
        shape: ShapeKind::Composite,
        keys: keys.into_iter().collect(),
        rows,
        composite: Some(CompositeMeta { series: meta, y_axes }),
    })
}

// ---------------------------------------------------------------------------
// Nested values: [{label|name, values: [{city|label, value}]}]
// ---------------------------------------------------------------------------

pub(super) fn nested_values(
    items: &[Value],
    settings: &NormalizerSettings,
) -> Result<NormalizedTable, Malformation> {
    let mut pivot = Pivot::default();

    for (index, item) in items.iter().enumerate() {
        let item = match item {
            Value::Null => continue,
            Value::Object(obj) => obj,
            _ => return Err(Malformation::InvalidSeriesEntry { index }),
        };
        let key = series_key(item, index);
        let points = optional_array(item.get("values"), &format!("data[{index}].values"))?;
        pivot.add_series(key, points, &settings.point_label_fields)?;
    }

    let table = pivot.into_table(ShapeKind::NestedValues);
    debug!(rows = table.rows.len(), keys = table.keys.len(), "normalized nested-values chart");
    Ok(table)
}

// ---------------------------------------------------------------------------
// Legacy series: [{name, data: [{label, value}]}]
// ---------------------------------------------------------------------------

pub(super) fn legacy_series(
    series: &[Value],
    calendar: &MonthCalendar,
) -> Result<NormalizedTable, Malformation> {
    let mut pivot = Pivot::default();
    let label_field = ["label".to_string()];

    for (index, entry) in series.iter().enumerate() {
        let entry = match entry {
            Value::Null => continue,
            Value::Object(obj) => obj,
            _ => return Err(Malformation::InvalidSeriesEntry { index }),
        };
        let key = series_key(entry, index);
        let points = optional_array(entry.get("data"), &format!("series[{index}].data"))?;
        pivot.add_series(key, points, &label_field)?;
    }

    let mut table = pivot.into_table(ShapeKind::LegacySeries);
    let reordered = calendar.reorder(&mut table.rows);
    debug!(
        rows = table.rows.len(),
        keys = table.keys.len(),
        reordered,
        "normalized legacy-series chart"
    );
    Ok(table)
}

// ---------------------------------------------------------------------------
// Flat rows: [{label, k1: n, k2: n}]
// ---------------------------------------------------------------------------

pub(super) fn flat_rows(
    items: &[Value],
    settings: &NormalizerSettings,
) -> Result<NormalizedTable, Malformation> {
    let label_fields = &settings.row_label_fields;

    // The first row's fields are authoritative; later rows are not unioned in.
    let keys: Vec<String> = items
        .first()
        .and_then(Value::as_object)
        .map(|first| {
            first
                .keys()
                .filter(|k| !label_fields.iter().any(|f| f == *k))
                .cloned()
                .collect()
        })
        .unwrap_or_default();

    let mut rows = Vec::with_capacity(items.len());
    for (index, item) in items.iter().enumerate() {
        let Some(obj) = item.as_object() else {
            debug!(index, "skipping non-object flat row");
            continue;
        };
        let label = first_label(obj, label_fields).unwrap_or_else(|| settings.unknown_label.clone());
        let mut row = Row::new(label);
        for key in &keys {
            let cell = numeric_cell(obj.get(key), key, &row.label)?;
            row.values.insert(key.clone(), cell);
        }
        rows.push(row);
    }

    debug!(rows = rows.len(), keys = keys.len(), "normalized flat-rows chart");

    Ok(NormalizedTable {
        shape: ShapeKind::FlatRows,
        keys,
        rows,
        composite: None,
    })
}

// ---------------------------------------------------------------------------
// Pivot shared by the nested-values and legacy-series shapes
// ---------------------------------------------------------------------------

/// Merges sparse series onto the union of their categories.
#[derive(Default)]
struct Pivot {
    keys: IndexSet<String>,
    /// category → (key → value), categories in first-seen order.
    cells: IndexMap<String, IndexMap<String, Option<f64>>>,
}

impl Pivot {
    fn add_series(
        &mut self,
        key: String,
        points: &[Value],
        category_fields: &[String],
    ) -> Result<(), Malformation> {
        self.keys.insert(key.clone());
        let mut seen = HashSet::new();

        for point in points {
            let Some(obj) = point.as_object() else {
                continue;
            };
            let Some(category) = first_label(obj, category_fields) else {
                continue;
            };
            // Within one series the first point for a category wins.
            if !seen.insert(category.clone()) {
                continue;
            }
            let cell = numeric_cell(obj.get("value"), &key, &category)?;
            self.cells.entry(category).or_default().insert(key.clone(), cell);
        }
        Ok(())
    }

    fn into_table(self, shape: ShapeKind) -> NormalizedTable {
        let keys: Vec<String> = self.keys.into_iter().collect();
        let rows = self
            .cells
            .into_iter()
            .map(|(label, mut found)| {
                let mut row = Row::new(label);
                for key in &keys {
                    row.values.insert(key.clone(), found.swap_remove(key).flatten());
                }
                row
            })
            .collect();

        NormalizedTable {
            shape,
            keys,
            rows,
            composite: None,
        }
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// `None` and `null` read as an empty array; anything else must be an array.
fn optional_array<'a>(value: Option<&'a Value>, field: &str) -> Result<&'a [Value], Malformation> {
    match value {
        None | Some(Value::Null) => Ok(&[]),
        Some(Value::Array(items)) => Ok(items),
        Some(_) => Err(Malformation::NotAnArray {
            field: field.to_string(),
        }),
    }
}

/// Strings and numbers are usable as labels; everything else is not.
fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn first_label(obj: &Map<String, Value>, fields: &[String]) -> Option<String> {
    fields
        .iter()
        .find_map(|field| obj.get(field).and_then(scalar_text))
}

/// `name`, then `label`, then `series_<index>`. Empty strings do not count.
fn series_key(entry: &Map<String, Value>, index: usize) -> String {
    ["name", "label"]
        .iter()
        .find_map(|field| entry.get(*field).and_then(scalar_text).filter(|s| !s.is_empty()))
        .unwrap_or_else(|| format!("series_{index}"))
}

fn numeric_cell(value: Option<&Value>, key: &str, category: &str) -> Result<Option<f64>, Malformation> {
    let not_numeric = |value: &Value| Malformation::NotNumeric {
        key: key.to_string(),
        category: category.to_string(),
        value: value.clone(),
    };
    let Some(value) = value else {
        return Ok(None);
    };
    match value {
        Value::Null => Ok(None),
        Value::Number(n) => Ok(n.as_f64()),
        Value::String(s) if s.trim().is_empty() => Ok(None),
        Value::String(s) => match s.trim().parse::<f64>() {
            Ok(n) if n.is_finite() => Ok(Some(n)),
            _ => Err(not_numeric(value)),
        },
        other => Err(not_numeric(other)),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
