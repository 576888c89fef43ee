use rustc_hash::FxHashMap;
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
use std::collections::BTreeMap;

/// One publication line of the listing.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Publication {
    #[serde(rename = "type")]
    pub publication_type: String,
    pub author: String,
    /// `0` when the source year was missing or not numeric
    pub year: i32,
    pub title: String,
}

impl Publication {
    pub fn new(
        publication_type: impl Into<String>,
        author: impl Into<String>,
        year: i32,
        title: impl Into<String>,
    ) -> Self {
        Self {
            publication_type: publication_type.into(),
            author: author.into(),
            year,
            title: title.into(),
        }
    }

    pub fn has_known_year(&self) -> bool {
        self.year > 0
    }
}

/// String-keyed map that iterates in first-insertion order.
///
/// Grouping output keeps authors and types in the order they first appear in
/// the listing, so a plain hash map is not enough. Serializes as a JSON object.
#[derive(Debug, Clone)]
pub struct Keyed<V> {
    entries: Vec<(String, V)>,
    index: FxHashMap<String, usize>,
}

impl<V> Default for Keyed<V> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
            index: FxHashMap::default(),
        }
    }
}

impl<V> Keyed<V> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.index.contains_key(key)
    }

    pub fn get(&self, key: &str) -> Option<&V> {
        self.index.get(key).map(|&i| &self.entries[i].1)
    }

    pub fn get_mut(&mut self, key: &str) -> Option<&mut V> {
        match self.index.get(key) {
            Some(&i) => Some(&mut self.entries[i].1),
            None => None,
        }
    }

    /// Inserts or replaces a value. A replaced key keeps its original position.
    pub fn insert(&mut self, key: impl Into<String>, value: V) {
        let key = key.into();
        match self.index.get(&key).copied() {
            Some(i) => self.entries[i].1 = value,
            None => {
                self.index.insert(key.clone(), self.entries.len());
                self.entries.push((key, value));
            }
        }
    }

    /// Returns the value for `key`, creating it with `make` the first time the key is seen.
    pub fn get_or_insert_with(&mut self, key: &str, make: impl FnOnce() -> V) -> &mut V {
        let i = match self.index.get(key).copied() {
            Some(i) => i,
            None => {
                let i = self.entries.len();
                self.index.insert(key.to_string(), i);
                self.entries.push((key.to_string(), make()));
                i
            }
        };
        &mut self.entries[i].1
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &V)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    pub fn values(&self) -> impl Iterator<Item = &V> {
        self.entries.iter().map(|(_, v)| v)
    }

    pub fn into_entries(self) -> Vec<(String, V)> {
        self.entries
    }
}

impl Keyed<usize> {
    pub fn increment(&mut self, key: &str) {
        *self.get_or_insert_with(key, || 0) += 1;
    }

    /// Count for `key`, `0` if it was never seen.
    pub fn count(&self, key: &str) -> usize {
        self.get(key).copied().unwrap_or(0)
    }

    pub fn total(&self) -> usize {
        self.values().sum()
    }
}

impl<K: Into<String>, V> FromIterator<(K, V)> for Keyed<V> {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut keyed = Self::new();
        for (k, v) in iter {
            keyed.insert(k, v);
        }
        keyed
    }
}

impl<V: PartialEq> PartialEq for Keyed<V> {
    fn eq(&self, other: &Self) -> bool {
        self.entries == other.entries
    }
}

impl<V: Serialize> Serialize for Keyed<V> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (k, v) in &self.entries {
            map.serialize_entry(k, v)?;
        }
        map.end()
    }
}

/// Per-label counts in first-seen order
pub type Counts = Keyed<usize>;

/// Inclusive year bounds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct YearRange {
    pub min: i32,
    pub max: i32,
}

impl YearRange {
    pub fn new(min: i32, max: i32) -> Self {
        Self { min, max }
    }

    pub fn contains(&self, year: i32) -> bool {
        year >= self.min && year <= self.max
    }
}

/// Tracks min/max over known years; collapses to `{0, 0}` when nothing was observed.
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct YearSpan {
    bounds: Option<(i32, i32)>,
}

impl YearSpan {
    pub(crate) fn observe(&mut self, year: i32) {
        if year <= 0 {
            return;
        }
        self.bounds = Some(match self.bounds {
            Some((min, max)) => (min.min(year), max.max(year)),
            None => (year, year),
        });
    }

    pub(crate) fn finish(self) -> YearRange {
        match self.bounds {
            Some((min, max)) => YearRange { min, max },
            None => YearRange::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthorSummary {
    pub name: String,
    pub publications: Vec<Publication>,
    pub total_publications: usize,
    pub publications_by_type: Counts,
    pub publications_by_year: BTreeMap<i32, usize>,
    /// Distinct years with at least one publication, ascending
    pub years_active: Vec<i32>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TypeSummary {
    #[serde(rename = "type")]
    pub publication_type: String,
    pub publications: Vec<Publication>,
    pub total_count: usize,
    /// Distinct authors in first-seen order
    pub authors: Vec<String>,
    /// Bounds over known years only; `{0, 0}` when none are known
    pub year_range: YearRange,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct YearSummary {
    pub year: i32,
    pub publications: Vec<Publication>,
    pub total_count: usize,
    pub authors: Vec<String>,
    pub publication_types: Counts,
}

/// Read-only summary over a whole listing.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicationStats {
    pub total_publications: usize,
    pub unique_authors: usize,
    pub publication_types: Counts,
    pub year_range: YearRange,
    /// At most ten authors, highest count first, ties in first-seen order
    pub top_authors: Counts,
    pub recent_years: BTreeMap<i32, usize>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keyed_preserves_insertion_order() {
        let mut keyed = Keyed::new();
        keyed.insert("b", 1);
        keyed.insert("a", 2);
        keyed.insert("c", 3);
        assert_eq!(keyed.keys().collect::<Vec<_>>(), vec!["b", "a", "c"]);
    }

    #[test]
    fn keyed_replace_keeps_position() {
        let mut keyed = Keyed::new();
        keyed.insert("x", 1);
        keyed.insert("y", 2);
        keyed.insert("x", 10);
        assert_eq!(keyed.len(), 2);
        assert_eq!(keyed.get("x"), Some(&10));
        assert_eq!(keyed.keys().next(), Some("x"));
    }

    #[test]
    fn counts_increment_lazily() {
        let mut counts = Counts::new();
        assert_eq!(counts.count("article"), 0);
        counts.increment("article");
        counts.increment("book");
        counts.increment("article");
        assert_eq!(counts.count("article"), 2);
        assert_eq!(counts.count("book"), 1);
        assert_eq!(counts.total(), 3);
    }

    #[test]
    fn keyed_serializes_as_ordered_object() {
        let counts: Counts = vec![("z", 1), ("a", 2)].into_iter().collect();
        let json = serde_json::to_string(&counts).unwrap();
        assert_eq!(json, r#"{"z":1,"a":2}"#);
    }

    #[test]
    fn year_span_ignores_unknown_years() {
        let mut span = YearSpan::default();
        span.observe(0);
        assert_eq!(span.finish(), YearRange::new(0, 0));

        span.observe(2019);
        span.observe(0);
        span.observe(2003);
        span.observe(2021);
        assert_eq!(span.finish(), YearRange::new(2003, 2021));
    }

    #[test]
    fn publication_serializes_type_field() {
        let p = Publication::new("artigo", "A. One", 2020, "Foo");
        let json = serde_json::to_value(&p).unwrap();
        assert_eq!(json["type"], "artigo");
        assert_eq!(json["year"], 2020);
    }

    #[test]
    fn year_range_is_inclusive() {
        let range = YearRange::new(2020, 2023);
        assert!(range.contains(2020));
        assert!(range.contains(2023));
        assert!(!range.contains(2019));
        assert!(!range.contains(2024));
    }
}
