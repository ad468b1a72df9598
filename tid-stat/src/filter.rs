//! Record filters used by the presentation layer.
//!
//! All comparisons are case-insensitive over Unicode lowercase and keep the
//! rows' own order unless stated otherwise.

use crate::dimensions::{WHOLE_COUNTRY_CODE, WHOLE_COUNTRY_NAME};

pub fn eq_ignore_case(a: &str, b: &str) -> bool {
    a.eq_ignore_ascii_case(b) || a.to_lowercase() == b.to_lowercase()
}

/// Non-empty, trimmed tokens of a comma-separated selection.
pub fn split_selection(selection: &str) -> impl Iterator<Item = &str> {
    selection.split(',').map(str::trim).filter(|t| !t.is_empty())
}

/// Rows whose field equals `wanted`.
pub fn filter_eq<T, F>(rows: &[T], field: F, wanted: &str) -> Vec<T>
where
    T: Clone,
    F: Fn(&T) -> &str,
{
    rows.iter()
        .filter(|&row| eq_ignore_case(field(row), wanted))
        .cloned()
        .collect()
}

/// Rows whose field matches any code of the comma-separated `selection`. Output
/// follows the order of the codes in `selection`, then row order.
pub fn filter_any_of<T, F>(rows: &[T], field: F, selection: &str) -> Vec<T>
where
    T: Clone,
    F: Fn(&T) -> &str,
{
    let mut out = Vec::new();
    for token in split_selection(selection) {
        out.extend(
            rows.iter()
                .filter(|&row| eq_ignore_case(field(row), token))
                .cloned(),
        );
    }
    out
}

/// Whole-country rows first, then rows labelled `selected` unless the
/// selection is absent or is the whole country itself.
pub fn filter_region<T, C, L>(rows: &[T], code: C, label: L, selected: Option<&str>) -> Vec<T>
where
    T: Clone,
    C: Fn(&T) -> &str,
    L: Fn(&T) -> &str,
{
    let mut out: Vec<T> = rows
        .iter()
        .filter(|&row| eq_ignore_case(code(row), WHOLE_COUNTRY_CODE))
        .cloned()
        .collect();
    if let Some(selected) = selected.filter(|s| !eq_ignore_case(s, WHOLE_COUNTRY_NAME)) {
        out.extend(
            rows.iter()
                .filter(|&row| eq_ignore_case(label(row), selected))
                .cloned(),
        );
    }
    out
}
