use crate::analyzer::Analyzer;
use crate::error::{Error, Result};
use crate::keys;
use crate::query::Query;
use crate::store::{OrderedStore, WriteOp};
use crate::DocId;
use std::collections::HashSet;
use std::sync::Arc;
use tokio::task;
use tracing::debug;

/// Phonetic inverted index over an ordered store, scoped to one namespace.
///
/// Cloning is cheap; clones share the store.
#[derive(Clone)]
pub struct Index {
    pub(crate) store: Arc<dyn OrderedStore>,
    pub(crate) namespace: Arc<str>,
    pub(crate) analyzer: Analyzer,
}

#[derive(Default)]
pub struct IndexBuilder {
    store: Option<Arc<dyn OrderedStore>>,
    namespace: Option<String>,
    analyzer: Option<Analyzer>,
}

impl IndexBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn store<S: OrderedStore>(mut self, store: Arc<S>) -> Self {
        self.store = Some(store);
        self
    }

    pub fn namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = Some(namespace.into());
        self
    }

    pub fn analyzer(mut self, analyzer: Analyzer) -> Self {
        self.analyzer = Some(analyzer);
        self
    }

    pub fn build(self) -> Result<Index> {
        let store = self
            .store
            .ok_or_else(|| Error::Configuration("an index requires a store".into()))?;
        let namespace = self
            .namespace
            .ok_or_else(|| Error::Configuration("an index requires a namespace".into()))?;
        keys::validate_namespace(&namespace).map_err(Error::Configuration)?;
        Ok(Index { store, namespace: namespace.into(), analyzer: self.analyzer.unwrap_or_default() })
    }
}

/// Index over `store` under `namespace`, with the default English analyzer.
pub fn create_index<S: OrderedStore>(store: Arc<S>, namespace: &str) -> Result<Index> {
    IndexBuilder::new().store(store).namespace(namespace).build()
}

impl Index {
    pub fn builder() -> IndexBuilder {
        IndexBuilder::new()
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    pub fn analyzer(&self) -> &Analyzer {
        &self.analyzer
    }

    /// Add postings for every phonetic code of `text` under `id`.
    ///
    /// Forward and reverse entries are written in one batch. Earlier postings
    /// for `id` are kept; call `remove` first to replace a document.
    pub async fn index(&self, text: &str, id: DocId) -> Result<()> {
        let tokens = self.analyzer.tokenize(text);
        let table = self.analyzer.code_table(&tokens);

        let mut seen = HashSet::new();
        let mut ops = Vec::with_capacity(table.len() * 2);
        for code in table.values() {
            if !seen.insert(code.as_str()) {
                continue;
            }
            ops.push(WriteOp::Put { key: keys::word_key(&self.namespace, code, id), value: keys::encode_id(id) });
            ops.push(WriteOp::Put { key: keys::object_key(&self.namespace, id, code), value: code.as_bytes().to_vec() });
        }
        debug!(namespace = %self.namespace, id, tokens = tokens.len(), codes = seen.len(), "index");
        if ops.is_empty() {
            return Ok(());
        }

        let store = Arc::clone(&self.store);
        task::spawn_blocking(move || store.batch_write(ops)).await??;
        Ok(())
    }

    /// Delete every posting of `id`, in one batch.
    ///
    /// Only the (code, `id`) forward entries are touched; other documents
    /// sharing a code keep theirs.
    pub async fn remove(&self, id: DocId) -> Result<()> {
        let store = Arc::clone(&self.store);
        let namespace = Arc::clone(&self.namespace);
        let removed = task::spawn_blocking(move || -> Result<usize> {
            let codes = object_codes(store.as_ref(), &namespace, id)?;
            let mut ops = Vec::with_capacity(codes.len() * 2);
            for code in &codes {
                ops.push(WriteOp::Delete { key: keys::word_key(&namespace, code, id) });
                ops.push(WriteOp::Delete { key: keys::object_key(&namespace, id, code) });
            }
            if !ops.is_empty() {
                store.batch_write(ops)?;
            }
            Ok(codes.len())
        })
        .await??;
        debug!(namespace = %self.namespace, id, codes = removed, "remove");
        Ok(())
    }

    /// Phonetic codes currently stored for `id`, in code order.
    pub async fn document_codes(&self, id: DocId) -> Result<Vec<String>> {
        let store = Arc::clone(&self.store);
        let namespace = Arc::clone(&self.namespace);
        task::spawn_blocking(move || object_codes(store.as_ref(), &namespace, id)).await?
    }

    /// Start a query; defaults to intersection of all terms.
    pub fn query(&self, text: impl Into<String>) -> Query {
        Query::new(self.clone(), text.into())
    }
}

fn object_codes(store: &dyn OrderedStore, namespace: &str, id: DocId) -> Result<Vec<String>> {
    let prefix = keys::object_prefix(namespace, id);
    let end = keys::prefix_end(&prefix);
    let mut codes = Vec::new();
    for entry in store.range_scan(&prefix, &end)? {
        let (key, value) = entry?;
        let code = String::from_utf8(value).map_err(|_| Error::Corrupt { key })?;
        codes.push(code);
    }
    Ok(codes)
}

impl std::fmt::Debug for Index {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Index").field("namespace", &self.namespace).finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    #[test]
    fn builder_requires_store_and_namespace() {
        let no_store = IndexBuilder::new().namespace("levels").build();
        assert!(matches!(no_store, Err(Error::Configuration(_))));

        let no_ns = IndexBuilder::new().store(Arc::new(MemoryStore::new())).build();
        assert!(matches!(no_ns, Err(Error::Configuration(_))));

        let empty_ns = create_index(Arc::new(MemoryStore::new()), "");
        assert!(matches!(empty_ns, Err(Error::Configuration(_))));

        let ok = create_index(Arc::new(MemoryStore::new()), "levels").unwrap();
        assert_eq!(ok.namespace(), "levels");
    }

    #[tokio::test]
    async fn writes_one_forward_and_one_reverse_entry_per_code() {
        let store = Arc::new(MemoryStore::new());
        let index = create_index(Arc::clone(&store), "levels").unwrap();
        // Tobi and tobi collapse to one code
        index.index("Tobi tobi wants", 7).await.unwrap();
        let codes = index.document_codes(7).await.unwrap();
        assert_eq!(codes.len(), 2);
        assert_eq!(store.len(), 4);
    }

    #[tokio::test]
    async fn empty_text_writes_nothing() {
        let store = Arc::new(MemoryStore::new());
        let index = create_index(Arc::clone(&store), "levels").unwrap();
        index.index("", 1).await.unwrap();
        index.index("is a the", 1).await.unwrap();
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn remove_clears_both_families() {
        let store = Arc::new(MemoryStore::new());
        let index = create_index(Arc::clone(&store), "levels").unwrap();
        index.index("keyboard cat", 6).await.unwrap();
        index.remove(6).await.unwrap();
        assert!(store.is_empty());
        assert!(index.document_codes(6).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn remove_unknown_id_is_a_no_op() {
        let store = Arc::new(MemoryStore::new());
        let index = create_index(Arc::clone(&store), "levels").unwrap();
        index.index("keyboard cat", 6).await.unwrap();
        index.remove(99).await.unwrap();
        assert_eq!(store.len(), 4);
    }

    #[tokio::test]
    async fn store_failures_surface() {
        let store = Arc::new(MemoryStore::new());
        let index = create_index(Arc::clone(&store), "levels").unwrap();
        store.close();
        assert!(matches!(index.index("keyboard cat", 6).await, Err(Error::Store(_))));
        assert!(matches!(index.remove(6).await, Err(Error::Store(_))));
    }
}
