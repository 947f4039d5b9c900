//! Domain assertion helpers for painel harnesses.
//!
//! The macros wrap `pretty_assertions` and name the table property that was
//! violated, so a failing harness reads like the invariant it checks.

use painel_core::NormalizedTable;

// ---------------------------------------------------------------------------
// Keys and labels
// ---------------------------------------------------------------------------

/// Assert the resolved series keys, in order.
///
/// ```rust
/// assert_keys!(table, ["x", "y"]);
/// ```
#[macro_export]
macro_rules! assert_keys {
    ($table:expr, [$($key:expr),* $(,)?]) => {{
        let table: &painel_core::NormalizedTable = &$table;
        let expected: Vec<&str> = vec![$($key),*];
        let actual: Vec<&str> = table.keys.iter().map(String::as_str).collect();
        pretty_assertions::assert_eq!(actual, expected, "assert_keys! failed: resolved series keys");
    }};
}

/// Assert the category labels of the rows, top to bottom.
#[macro_export]
macro_rules! assert_labels {
    ($table:expr, [$($label:expr),* $(,)?]) => {{
        let table: &painel_core::NormalizedTable = &$table;
        let expected: Vec<&str> = vec![$($label),*];
        let actual: Vec<&str> = table.labels().collect();
        pretty_assertions::assert_eq!(actual, expected, "assert_labels! failed: row order");
    }};
}

/// Assert one cell, addressed by row label and series key.
///
/// ```rust
/// assert_cell!(table, "Janeiro", "Casos", Some(6.0));
/// ```
#[macro_export]
macro_rules! assert_cell {
    ($table:expr, $label:expr, $key:expr, $expected:expr) => {{
        let table: &painel_core::NormalizedTable = &$table;
        let label: &str = $label;
        let key: &str = $key;
        let expected: Option<f64> = $expected;
        let Some(row) = table.rows.iter().find(|row| row.label == label) else {
            panic!(
                "assert_cell! failed: no row labelled {:?}.\n  Rows: {:?}",
                label,
                table.labels().collect::<Vec<_>>()
            );
        };
        if !row.values.contains_key(key) {
            panic!("assert_cell! failed: row {:?} has no key {:?}", label, key);
        }
        pretty_assertions::assert_eq!(row.get(key), expected, "cell [{:?}][{:?}]", label, key);
    }};
}

// ---------------------------------------------------------------------------
// Table invariants
// ---------------------------------------------------------------------------

/// Every row carries exactly the table's keys, in the table's key order, and
/// the key list has no duplicates.
pub fn assert_table_consistent(table: &NormalizedTable) {
    let mut seen = std::collections::HashSet::new();
    for key in &table.keys {
        assert!(seen.insert(key), "duplicate resolved key {key:?} in {:?}", table.keys);
    }
    for row in &table.rows {
        let row_keys: Vec<&String> = row.values.keys().collect();
        let table_keys: Vec<&String> = table.keys.iter().collect();
        pretty_assertions::assert_eq!(
            row_keys,
            table_keys,
            "row {:?} does not carry exactly the table keys",
            row.label
        );
    }
}

/// Nothing to render: no rows and no keys.
pub fn assert_empty(table: &NormalizedTable) {
    assert!(
        table.rows.is_empty() && table.keys.is_empty(),
        "expected an empty table, got {} rows and keys {:?}",
        table.rows.len(),
        table.keys
    );
}
