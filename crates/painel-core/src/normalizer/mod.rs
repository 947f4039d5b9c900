//! Normalizer: reduces any supported chart payload to one [`NormalizedTable`].
//!
//! The pipeline is `detect` (classify once into a [`ChartShape`]) followed by
//! exactly one converter. Conversion is pure and synchronous; normalizing the
//! same config twice yields equal tables.
//!
//! Two entry points exist:
//!
//! - [`Normalizer::normalize`] returns `Err(NormalizationError::Empty)` for
//!   malformed data inside a recognized shape, so callers can tell "no data"
//!   from "bad data". Unrecognized shapes are `Ok` with an empty table.
//! - [`Normalizer::normalize_lenient`] is what render surfaces call: failures
//!   are logged and degrade to an empty table, so one broken chart never takes
//!   the page down with it.

mod calendar;
mod convert;
mod shape;
mod table;

pub use calendar::MonthCalendar;
pub use shape::{detect, ChartShape, ShapeKind};
pub use table::{AxisConfig, AxisSide, CompositeMeta, NormalizedTable, Row, SeriesMark, SeriesMeta, YAxes};

use crate::config::NormalizerSettings;
use crate::types::ChartConfig;
use serde_json::Value;
use tracing::{debug, warn};

/// What was wrong with a recognized payload.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum Malformation {
    #[error("`{field}` must be an array")]
    NotAnArray { field: String },

    #[error("value of series `{key}` at `{category}` is not a number: {value}")]
    NotNumeric {
        key: String,
        category: String,
        value: Value,
    },

    #[error("category label #{index} must be a string or a number, got {value}")]
    InvalidLabel { index: usize, value: Value },

    #[error("series entry #{index} must be an object")]
    InvalidSeriesEntry { index: usize },
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum NormalizationError {
    /// The payload matched `shape` but could not be converted; the chart
    /// renders as empty.
    #[error("malformed {shape} chart data: {reason}")]
    Empty { shape: ShapeKind, reason: Malformation },
}

impl NormalizationError {
    pub fn shape(&self) -> ShapeKind {
        match self {
            NormalizationError::Empty { shape, .. } => *shape,
        }
    }

    pub fn reason(&self) -> &Malformation {
        match self {
            NormalizationError::Empty { reason, .. } => reason,
        }
    }
}

/// Normalizer bound to a set of [`NormalizerSettings`].
#[derive(Debug, Clone)]
pub struct Normalizer {
    settings: NormalizerSettings,
    calendar: MonthCalendar,
}

impl Default for Normalizer {
    fn default() -> Self {
        Self::new(NormalizerSettings::default())
    }
}

impl Normalizer {
    pub fn new(settings: NormalizerSettings) -> Self {
        let calendar = MonthCalendar::new(&settings.months);
        Self { settings, calendar }
    }

    pub fn settings(&self) -> &NormalizerSettings {
        &self.settings
    }

    pub fn normalize(&self, config: &ChartConfig) -> Result<NormalizedTable, NormalizationError> {
        let shape = detect(config);
        let kind = shape.kind();

        let converted = match shape {
            ChartShape::Composite(data) => convert::composite(data, config.options.as_ref()),
            ChartShape::NestedValues(items) => convert::nested_values(items, &self.settings),
            ChartShape::LegacySeries(series) => convert::legacy_series(series, &self.calendar),
            ChartShape::FlatRows(rows) => convert::flat_rows(rows, &self.settings),
            ChartShape::Unrecognized => {
                debug!(title = %config.title, "no recognized chart shape; nothing to render");
                return Ok(NormalizedTable::empty(kind));
            }
        };

        converted.map_err(|reason| NormalizationError::Empty { shape: kind, reason })
    }

    /// Like [`normalize`](Self::normalize), but malformed data is logged and
    /// rendered as an empty table instead of being returned.
    pub fn normalize_lenient(&self, config: &ChartConfig) -> NormalizedTable {
        self.normalize(config).unwrap_or_else(|err| {
            warn!(title = %config.title, shape = %err.shape(), error = %err.reason(), "chart data is malformed; rendering empty chart");
            NormalizedTable::empty(err.shape())
        })
    }
}

/// Normalize with the default settings.
pub fn normalize(config: &ChartConfig) -> Result<NormalizedTable, NormalizationError> {
    Normalizer::default().normalize(config)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
