//! Tagged document values

use serde::ser::{SerializeMap, SerializeSeq};
use serde::{Serialize, Serializer};

/// A node of the output document
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DocValue {
    Scalar(String),
    List(Vec<DocValue>),
    Map(DocMap),
}

/// Insertion-ordered mapping; inserting an existing key replaces its value
/// in place.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DocMap {
    entries: Vec<(String, DocValue)>,
}

impl DocValue {
    pub fn empty_map() -> Self {
        DocValue::Map(DocMap::new())
    }

    pub fn empty_list() -> Self {
        DocValue::List(Vec::new())
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            DocValue::Scalar(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&DocMap> {
        match self {
            DocValue::Map(map) => Some(map),
            _ => None,
        }
    }

    pub fn as_map_mut(&mut self) -> Option<&mut DocMap> {
        match self {
            DocValue::Map(map) => Some(map),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[DocValue]> {
        match self {
            DocValue::List(items) => Some(items),
            _ => None,
        }
    }

    /// Empty maps, lists and strings
    pub fn is_empty(&self) -> bool {
        match self {
            DocValue::Scalar(s) => s.is_empty(),
            DocValue::List(items) => items.is_empty(),
            DocValue::Map(map) => map.is_empty(),
        }
    }

    /// Follow a dotted path through nested maps (`build.env.VERSION`)
    pub fn pointer(&self, path: &str) -> Option<&DocValue> {
        path.split('.').try_fold(self, |current, key| current.as_map()?.get(key))
    }
}

impl DocMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<DocValue>) {
        let key = key.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some((_, existing)) => *existing = value,
            None => self.entries.push((key, value)),
        }
    }

    pub fn get(&self, key: &str) -> Option<&DocValue> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    pub fn get_mut(&mut self, key: &str) -> Option<&mut DocValue> {
        self.entries
            .iter_mut()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v)
    }

    pub fn remove(&mut self, key: &str) -> Option<DocValue> {
        let index = self.entries.iter().position(|(k, _)| k == key)?;
        Some(self.entries.remove(index).1)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &DocValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }
}

impl From<&str> for DocValue {
    fn from(value: &str) -> Self {
        DocValue::Scalar(value.to_string())
    }
}

impl From<String> for DocValue {
    fn from(value: String) -> Self {
        DocValue::Scalar(value)
    }
}

impl From<&String> for DocValue {
    fn from(value: &String) -> Self {
        DocValue::Scalar(value.clone())
    }
}

impl From<DocMap> for DocValue {
    fn from(map: DocMap) -> Self {
        DocValue::Map(map)
    }
}

impl From<Vec<DocValue>> for DocValue {
    fn from(items: Vec<DocValue>) -> Self {
        DocValue::List(items)
    }
}

impl<K: Into<String>, V: Into<DocValue>> FromIterator<(K, V)> for DocMap {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = DocMap::new();
        for (key, value) in iter {
            map.insert(key, value);
        }
        map
    }
}

impl Serialize for DocValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            DocValue::Scalar(s) => serializer.serialize_str(s),
            DocValue::List(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
            DocValue::Map(map) => map.serialize(serializer),
        }
    }
}

impl Serialize for DocMap {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (key, value) in &self.entries {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}
