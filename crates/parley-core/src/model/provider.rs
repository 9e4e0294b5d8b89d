use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// The acting party of a request (a user, a bot, ...)
///
/// `relations` holds eagerly loaded related data. Events carry the
/// provider with relations stripped so listeners never re-serialize
/// large graphs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Provider {
    pub id: String,
    pub alias: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub relations: BTreeMap<String, serde_json::Value>,
}

impl Provider {
    pub fn new(id: impl Into<String>, alias: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            alias: alias.into(),
            name: name.into(),
            relations: BTreeMap::new(),
        }
    }

    pub fn with_relation(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.relations.insert(key.into(), value);
        self
    }

    pub fn without_relations(&self) -> Self {
        Self {
            id: self.id.clone(),
            alias: self.alias.clone(),
            name: self.name.clone(),
            relations: BTreeMap::new(),
        }
    }
}
