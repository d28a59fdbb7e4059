use crate::error::StoreError;
use parking_lot::RwLock;
use std::collections::BTreeMap;
use std::ops::Bound;
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};

pub type KeyValue = (Vec<u8>, Vec<u8>);
pub type StoreResult<T> = std::result::Result<T, StoreError>;
pub type ScanIter<'a> = Box<dyn Iterator<Item = StoreResult<KeyValue>> + 'a>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WriteOp {
    Put { key: Vec<u8>, value: Vec<u8> },
    Delete { key: Vec<u8> },
}

/// Ordered key-value store the index is layered on.
///
/// Keys compare as raw bytes. `batch_write` must apply all ops or none.
pub trait OrderedStore: Send + Sync + 'static {
    fn batch_write(&self, ops: Vec<WriteOp>) -> StoreResult<()>;

    /// Entries with `start <= key < end`, in key order. An empty `end` means unbounded.
    fn range_scan<'a>(&'a self, start: &[u8], end: &[u8]) -> StoreResult<ScanIter<'a>>;

    fn delete(&self, key: &[u8]) -> StoreResult<()>;
}

fn upper(end: &[u8]) -> Bound<Vec<u8>> {
    if end.is_empty() {
        Bound::Unbounded
    } else {
        Bound::Excluded(end.to_vec())
    }
}

/// Store backed by a sled tree.
#[derive(Clone)]
pub struct SledStore {
    tree: sled::Tree,
}

impl SledStore {
    pub fn new(tree: sled::Tree) -> Self {
        Self { tree }
    }

    /// Open (or create) a database at `path` and use its default tree.
    pub fn open<P: AsRef<Path>>(path: P) -> StoreResult<Self> {
        let db = sled::open(path)?;
        Ok(Self::new((*db).clone()))
    }

    /// Database removed when the last handle drops.
    pub fn temporary() -> StoreResult<Self> {
        let db = sled::Config::new().temporary(true).open()?;
        Ok(Self::new((*db).clone()))
    }

    pub fn flush(&self) -> StoreResult<usize> {
        Ok(self.tree.flush()?)
    }
}

impl OrderedStore for SledStore {
    fn batch_write(&self, ops: Vec<WriteOp>) -> StoreResult<()> {
        let mut batch = sled::Batch::default();
        for op in ops {
            match op {
                WriteOp::Put { key, value } => batch.insert(key, value),
                WriteOp::Delete { key } => batch.remove(key),
            }
        }
        self.tree.apply_batch(batch)?;
        Ok(())
    }

    fn range_scan<'a>(&'a self, start: &[u8], end: &[u8]) -> StoreResult<ScanIter<'a>> {
        let range = (Bound::Included(start.to_vec()), upper(end));
        let iter = self
            .tree
            .range::<Vec<u8>, _>(range)
            .map(|r| r.map(|(k, v)| (k.to_vec(), v.to_vec())).map_err(StoreError::from));
        Ok(Box::new(iter))
    }

    fn delete(&self, key: &[u8]) -> StoreResult<()> {
        self.tree.remove(key)?;
        Ok(())
    }
}

/// In-process store over a `BTreeMap`.
///
/// After `close`, every operation fails with `StoreError::Closed`.
#[derive(Default)]
pub struct MemoryStore {
    map: RwLock<BTreeMap<Vec<u8>, Vec<u8>>>,
    closed: AtomicBool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn close(&self) {
        self.closed.store(true, Ordering::SeqCst);
    }

    pub fn len(&self) -> usize {
        self.map.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.read().is_empty()
    }

    fn check_open(&self) -> StoreResult<()> {
        if self.closed.load(Ordering::SeqCst) {
            Err(StoreError::Closed)
        } else {
            Ok(())
        }
    }
}

impl OrderedStore for MemoryStore {
    fn batch_write(&self, ops: Vec<WriteOp>) -> StoreResult<()> {
        self.check_open()?;
        let mut map = self.map.write();
        for op in ops {
            match op {
                WriteOp::Put { key, value } => {
                    map.insert(key, value);
                }
                WriteOp::Delete { key } => {
                    map.remove(&key);
                }
            }
        }
        Ok(())
    }

    fn range_scan<'a>(&'a self, start: &[u8], end: &[u8]) -> StoreResult<ScanIter<'a>> {
        self.check_open()?;
        let range = (Bound::Included(start.to_vec()), upper(end));
        // snapshot so the lock is not held while the caller iterates
        let entries: Vec<KeyValue> = self
            .map
            .read()
            .range::<Vec<u8>, _>(range)
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();
        Ok(Box::new(entries.into_iter().map(Ok)))
    }

    fn delete(&self, key: &[u8]) -> StoreResult<()> {
        self.check_open()?;
        self.map.write().remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn put(k: &[u8], v: &[u8]) -> WriteOp {
        WriteOp::Put { key: k.to_vec(), value: v.to_vec() }
    }

    fn exercise(store: &dyn OrderedStore) {
        store
            .batch_write(vec![put(b"a1", b"1"), put(b"a2", b"2"), put(b"b1", b"3"), put(b"a3", b"4")])
            .unwrap();
        let keys: Vec<Vec<u8>> = store.range_scan(b"a", b"b").unwrap().map(|r| r.unwrap().0).collect();
        assert_eq!(keys, vec![b"a1".to_vec(), b"a2".to_vec(), b"a3".to_vec()]);

        store.delete(b"a2").unwrap();
        store.batch_write(vec![WriteOp::Delete { key: b"a3".to_vec() }]).unwrap();
        let keys: Vec<Vec<u8>> = store.range_scan(b"a", b"").unwrap().map(|r| r.unwrap().0).collect();
        assert_eq!(keys, vec![b"a1".to_vec(), b"b1".to_vec()]);
    }

    #[test]
    fn memory_store_scans_in_order() {
        exercise(&MemoryStore::new());
    }

    #[test]
    fn sled_store_scans_in_order() {
        exercise(&SledStore::temporary().unwrap());
    }

    #[test]
    fn closed_memory_store_fails() {
        let store = MemoryStore::new();
        store.close();
        assert!(matches!(store.batch_write(vec![put(b"k", b"v")]), Err(StoreError::Closed)));
        assert!(matches!(store.range_scan(b"a", b"b"), Err(StoreError::Closed)));
        assert!(matches!(store.delete(b"k"), Err(StoreError::Closed)));
        assert!(store.is_empty());
    }
}
