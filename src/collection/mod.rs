use std::collections::BTreeMap;

use log::{debug, warn};

use crate::query::Query;

pub use self::document::Document;

pub mod document;

/// In-memory documents keyed by id.
#[derive(Debug, Default)]
pub struct Collection {
    documents: BTreeMap<u64, Document>,
}

impl Collection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    /// An empty document with the next free id. Nothing is stored until
    /// it is written back.
    pub fn doc(&self) -> Document {
        let id = self.documents.keys().next_back().map_or(1, |last| last + 1);
        Document::new(id)
    }

    /// Inserts `document`, replacing any stored document with the same id.
    pub fn write_document(&mut self, document: Document) {
        let id = document.id();
        if self.documents.insert(id, document).is_some() {
            debug!("Replaced document {id}");
        } else {
            debug!("Wrote document {id}");
        }
    }

    pub fn read_document(&self, id: u64) -> anyhow::Result<&Document> {
        self.documents
            .get(&id)
            .ok_or_else(|| anyhow::anyhow!("No document with id {id}"))
    }

    pub fn remove_document(&mut self, id: u64) -> Option<Document> {
        let removed = self.documents.remove(&id);
        if removed.is_none() {
            warn!("Tried to remove non-existent document {id}");
        }
        removed
    }

    pub fn documents(&self) -> impl Iterator<Item = &Document> {
        self.documents.values()
    }

    /// Documents matched by `query`, in id order.
    pub fn query<'c>(&'c self, query: &Query<'_, Document>) -> Vec<&'c Document> {
        let matched: Vec<&Document> = self
            .documents
            .values()
            .filter(|doc| query.matches(doc))
            .collect();

        debug!(
            "Query matched {} of {} documents",
            matched.len(),
            self.documents.len()
        );
        matched
    }
}
