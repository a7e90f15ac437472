use std::collections::BTreeMap;

use crate::record::{Identified, Record, Value};

/// A schemaless record: field names mapped to dynamic values.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub content: BTreeMap<String, Value>,
    id: u64,
}

impl Document {
    pub fn new(id: u64) -> Self {
        Document {
            content: BTreeMap::new(),
            id,
        }
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    /// Sets `key`, returning the value it replaced.
    pub fn insert(&mut self, key: &str, value: impl Into<Value>) -> Option<Value> {
        self.content.insert(key.to_string(), value.into())
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.content.get(key)
    }

    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.content.remove(key)
    }
}

impl Identified for Document {
    fn id(&self) -> u64 {
        self.id
    }
}

// Fields enumerate in key order.
impl Record for Document {
    fn field_names(&self) -> Vec<&str> {
        self.content.keys().map(String::as_str).collect()
    }

    fn value(&self, field: &str) -> Option<Value> {
        self.content.get(field).cloned()
    }
}
