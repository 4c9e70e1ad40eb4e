//! Priority-ordered lookup over free-form order metadata.
//!
//! Different checkout paths write the same logical field under different
//! keys (`Horario de entrega` vs `_orddd_time_slot`), and a key may appear
//! more than once. The index keeps the first entry per key; callers then ask
//! for a field by listing candidate keys in priority order.

use std::collections::HashMap;

use serde_json::Value;

use crate::types::MetaEntry;

/// Read-only index over an order's metadata list.
#[derive(Debug, Clone)]
pub struct MetadataIndex<'a> {
    first_by_key: HashMap<&'a str, &'a Value>,
}

impl<'a> MetadataIndex<'a> {
    /// Index `entries`, keeping the first occurrence of every key.
    #[must_use]
    pub fn new(entries: &'a [MetaEntry]) -> Self {
        let mut first_by_key = HashMap::with_capacity(entries.len());
        for entry in entries {
            first_by_key.entry(entry.key.as_str()).or_insert(&entry.value);
        }
        Self { first_by_key }
    }

    /// The value of the first entry with exactly this key.
    #[must_use]
    pub fn first(&self, key: &str) -> Option<&'a Value> {
        self.first_by_key.get(key).copied()
    }

    /// Resolve a field from candidate keys given in priority order.
    ///
    /// Returns the trimmed text of the first candidate whose first entry has a
    /// non-null value, or an empty string when no candidate matches. Priority
    /// follows `candidates`, not the order of the metadata list.
    #[must_use]
    pub fn lookup(&self, candidates: &[&str]) -> String {
        candidates
            .iter()
            .find_map(|key| self.first(key).and_then(value_text))
            .map(|text| text.trim().to_string())
            .unwrap_or_default()
    }
}

/// Text form of a metadata value; `null` counts as absent.
fn value_text(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Number(n) => Some(n.to_string()),
        other => Some(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn entry(key: &str, value: Value) -> MetaEntry {
        MetaEntry {
            id: None,
            key: key.to_string(),
            value,
        }
    }

    #[test]
    fn test_candidate_priority_beats_list_order() {
        let meta = vec![MetaEntry::text("A", "x"), MetaEntry::text("B", "y")];
        let index = MetadataIndex::new(&meta);
        assert_eq!(index.lookup(&["B", "A"]), "y");
        assert_eq!(index.lookup(&["A", "B"]), "x");
    }

    #[test]
    fn test_falls_back_to_later_candidate() {
        let meta = vec![MetaEntry::text("_orddd_time_slot", " 15:00 - 18:00 ")];
        let index = MetadataIndex::new(&meta);
        assert_eq!(
            index.lookup(&["Horario de entrega", "_orddd_time_slot"]),
            "15:00 - 18:00"
        );
    }

    #[test]
    fn test_no_match_is_empty() {
        let meta = vec![MetaEntry::text("other", "value")];
        let index = MetadataIndex::new(&meta);
        assert_eq!(index.lookup(&["missing", "also_missing"]), "");
        assert_eq!(MetadataIndex::new(&[]).lookup(&["any"]), "");
    }

    #[test]
    fn test_duplicate_keys_first_entry_wins() {
        let meta = vec![MetaEntry::text("A", "first"), MetaEntry::text("A", "second")];
        assert_eq!(MetadataIndex::new(&meta).lookup(&["A"]), "first");
    }

    #[test]
    fn test_null_value_moves_to_next_candidate() {
        let meta = vec![entry("A", Value::Null), MetaEntry::text("B", "y")];
        assert_eq!(MetadataIndex::new(&meta).lookup(&["A", "B"]), "y");
    }

    #[test]
    fn test_non_string_values_are_coerced() {
        let meta = vec![
            entry("n", json!(1_705_276_800)),
            entry("b", json!(true)),
            entry("o", json!({"k": 1})),
        ];
        let index = MetadataIndex::new(&meta);
        assert_eq!(index.lookup(&["n"]), "1705276800");
        assert_eq!(index.lookup(&["b"]), "true");
        assert_eq!(index.lookup(&["o"]), r#"{"k":1}"#);
    }
}
