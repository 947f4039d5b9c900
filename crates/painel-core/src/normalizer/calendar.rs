//! Month-order repair for legacy series.
//!
//! Operators routinely type monthly series out of order. When every category
//! label of a legacy-series table is a month name, rows are put back into
//! calendar order; any other table keeps its encounter order.

use super::Row;

/// The twelve month names of the configured locale, January first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonthCalendar {
    names: Vec<String>,
}

impl MonthCalendar {
    pub fn new(names: &[String]) -> Self {
        Self {
            names: names.to_vec(),
        }
    }

    /// Zero-based calendar position of `label`, matched exactly.
    pub fn position(&self, label: &str) -> Option<usize> {
        self.names.iter().position(|name| name == label)
    }

    /// Stable-sort `rows` into calendar order if every label is a month.
    /// Returns `true` when the rows were reordered.
    pub fn reorder(&self, rows: &mut [Row]) -> bool {
        if rows.is_empty() || !rows.iter().all(|row| self.position(&row.label).is_some()) {
            return false;
        }
        rows.sort_by_cached_key(|row| self.position(&row.label));
        true
    }
}

impl Default for MonthCalendar {
    fn default() -> Self {
        Self::new(&crate::config::NormalizerSettings::default().months)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
