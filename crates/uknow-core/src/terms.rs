//! Insertion-ordered term → context mapping produced by extractors.

use std::collections::HashMap;

/// Term → context mapping.
///
/// Keys keep the position at which they were first inserted. Inserting an
/// existing key replaces its context (last write wins) without moving it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TermMap {
    entries: Vec<(String, String)>,
    index: HashMap<String, usize>,
}

impl TermMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or overwrite. Returns the previous context, if any.
    pub fn insert(&mut self, term: impl Into<String>, context: impl Into<String>) -> Option<String> {
        let term = term.into();
        let context = context.into();
        match self.index.get(&term) {
            Some(&pos) => Some(std::mem::replace(&mut self.entries[pos].1, context)),
            None => {
                self.index.insert(term.clone(), self.entries.len());
                self.entries.push((term, context));
                None
            }
        }
    }

    pub fn get(&self, term: &str) -> Option<&str> {
        self.index
            .get(term)
            .map(|&pos| self.entries[pos].1.as_str())
    }

    pub fn contains(&self, term: &str) -> bool {
        self.index.contains_key(term)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate `(term, context)` pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(t, c)| (t.as_str(), c.as_str()))
    }

    /// Iterate the terms in insertion order.
    pub fn terms(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(t, _)| t.as_str())
    }
}

impl IntoIterator for TermMap {
    type Item = (String, String);
    type IntoIter = std::vec::IntoIter<(String, String)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for TermMap {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = TermMap::new();
        for (k, v) in iter {
            map.insert(k, v);
        }
        map
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn overwrite_keeps_first_position() {
        let mut map = TermMap::new();
        assert!(map.insert("Darwin", "first sentence here").is_none());
        map.insert("Mendel", "another sentence here");
        let prev = map.insert("Darwin", "second sentence here");

        assert_eq!(prev.as_deref(), Some("first sentence here"));
        assert_eq!(map.len(), 2);
        assert_eq!(map.get("Darwin"), Some("second sentence here"));
        assert_eq!(map.terms().collect::<Vec<_>>(), vec!["Darwin", "Mendel"]);
    }

    #[test]
    fn collect_from_pairs() {
        let map: TermMap = vec![("a", "x"), ("b", "y"), ("a", "z")].into_iter().collect();
        assert_eq!(
            map.iter().collect::<Vec<_>>(),
            vec![("a", "z"), ("b", "y")]
        );
        assert!(map.contains("b"));
        assert!(!map.contains("c"));
    }
}
