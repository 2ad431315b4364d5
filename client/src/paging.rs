//! Client-side search, sort, and page-slicing over a fetched collection.
//! Pure functions; the list page owns the query/page state and calls
//! these on every render.

use crate::record::CanonicalRecord;
use rust_decimal::Decimal;
use serde_json::Value;
use std::cmp::Ordering;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Ascending,
    Descending,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Page {
    pub items: Vec<CanonicalRecord>,
    pub total_pages: usize,
}

/// Case-insensitive substring match across the given display fields.
pub fn filter_by(
    records: &[CanonicalRecord],
    query: &str,
    fields: &[&str],
) -> Vec<CanonicalRecord> {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return records.to_vec();
    }
    records
        .iter()
        .filter(|record| {
            fields.iter().any(|field| match record.get(field) {
                Some(Value::String(s)) => {
                    s.to_lowercase().contains(&needle)
                }
                Some(Value::Number(n)) => n.to_string().contains(&needle),
                _ => false,
            })
        })
        .cloned()
        .collect()
}

/// Stable sort on one canonical field. Values that both parse as
/// decimals compare numerically; otherwise case-insensitive text, with
/// null/missing sorting as the empty string. Never panics on mixed or
/// absent values.
pub fn sort_by(
    records: &[CanonicalRecord],
    key: &str,
    direction: SortDirection,
) -> Vec<CanonicalRecord> {
    let mut sorted = records.to_vec();
    sorted.sort_by(|a, b| {
        let ordering = compare(a.get(key), b.get(key));
        match direction {
            SortDirection::Ascending => ordering,
            SortDirection::Descending => ordering.reverse(),
        }
    });
    sorted
}

fn compare(a: Option<&Value>, b: Option<&Value>) -> Ordering {
    if let (Some(x), Some(y)) = (as_decimal(a), as_decimal(b)) {
        return x.cmp(&y);
    }
    as_text(a).cmp(&as_text(b))
}

fn as_decimal(value: Option<&Value>) -> Option<Decimal> {
    match value? {
        Value::Number(n) => Decimal::from_str(&n.to_string()).ok(),
        Value::String(s) => Decimal::from_str(s).ok(),
        _ => None,
    }
}

fn as_text(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.to_lowercase(),
        Some(Value::Number(n)) => n.to_string(),
        Some(Value::Bool(b)) => b.to_string(),
        Some(other) => other.to_string(),
    }
}

/// Slice out one 1-based page. `total_pages` is at least 1 even for an
/// empty collection; a page past the end yields an empty page rather
/// than clamping (the caller disables "Next" at the boundary).
pub fn paginate(
    records: &[CanonicalRecord],
    page: usize,
    page_size: usize,
) -> Page {
    let total_pages = if page_size == 0 {
        1
    } else {
        records.len().div_ceil(page_size).max(1)
    };
    if page == 0 || page_size == 0 {
        return Page {
            items: Vec::new(),
            total_pages,
        };
    }
    let items = records
        .iter()
        .skip((page - 1) * page_size)
        .take(page_size)
        .cloned()
        .collect();
    Page { items, total_pages }
}
