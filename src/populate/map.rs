use std::collections::HashMap;

use super::source::{Resolve, ResolveError, Values};

/// In-memory multi-map of raw values, shaped like a query string or a set
/// of headers: a key may appear several times and keeps every value in
/// insertion order.
#[derive(Debug, Clone, Default)]
pub struct MapSource {
    entries: HashMap<String, Vec<String>>,
}

impl MapSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.entries.entry(key.into()).or_default().push(value.into());
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(key, value);
        self
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for MapSource {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut source = Self::new();
        for (key, value) in iter {
            source.insert(key, value);
        }
        source
    }
}

impl Resolve for MapSource {
    fn resolve(&self, key: &str) -> Result<Values, ResolveError> {
        Ok(self
            .entries
            .get(key)
            .map(|values| Values::from(values.clone()))
            .unwrap_or_default())
    }
}
