//! Common types and helpers shared across models.

use serde::Deserialize;

/// `?q=` search parameter used by every list endpoint
#[derive(Debug, Default, Deserialize)]
pub struct SearchQuery {
    pub q: Option<String>,
}

impl SearchQuery {
    pub fn matches(&self, fields: &[&str]) -> bool {
        matches_query(self.q.as_deref(), fields)
    }
}

/// Case-insensitive substring match of a trimmed query against any field.
///
/// An absent or blank query matches everything.
pub fn matches_query(query: Option<&str>, fields: &[&str]) -> bool {
    let q = match query.map(|q| q.trim().to_lowercase()) {
        Some(q) if !q.is_empty() => q,
        _ => return true,
    };
    fields.iter().any(|field| field.to_lowercase().contains(&q))
}

/// Next id for collections with numeric ids: one past the largest, or 1.
pub fn next_numeric_id(existing: impl IntoIterator<Item = i64>) -> i64 {
    existing.into_iter().max().map_or(1, |max| max + 1)
}

/// Replace `target` with `value` when a value was submitted.
pub(crate) fn patch<T: Clone>(target: &mut T, value: &Option<T>) {
    if let Some(v) = value {
        *target = v.clone();
    }
}
