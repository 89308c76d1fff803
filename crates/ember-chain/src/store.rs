//! Byte-keyed storage backends
//!
//! The chain persists through a flat byte-keyed map with atomic batches.
//! The in-memory and RocksDB implementations satisfy the same contract:
//! all writes in one batch become visible together or not at all.

use crate::error::StoreError;
use parking_lot::RwLock;
use std::collections::BTreeMap;
use std::path::Path;

/// Byte-keyed, byte-valued store with atomic batch writes.
pub trait Store: Send + Sync {
    /// Read the value at `key`
    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>, StoreError>;

    /// Write a single value
    fn put(&self, key: &[u8], value: &[u8]) -> Result<(), StoreError>;

    /// Delete a single key
    fn delete(&self, key: &[u8]) -> Result<(), StoreError>;

    /// Apply every operation in `batch` atomically
    fn write(&self, batch: WriteBatch) -> Result<(), StoreError>;
}

/// Batch operation
enum BatchOp {
    Put { key: Vec<u8>, value: Vec<u8> },
    Delete { key: Vec<u8> },
}

/// A collected list of put/delete operations committed in one shot.
#[derive(Default)]
pub struct WriteBatch {
    ops: Vec<BatchOp>,
}

impl WriteBatch {
    /// Create an empty batch
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a put
    pub fn put(&mut self, key: &[u8], value: &[u8]) {
        self.ops.push(BatchOp::Put {
            key: key.to_vec(),
            value: value.to_vec(),
        });
    }

    /// Queue a delete
    pub fn delete(&mut self, key: &[u8]) {
        self.ops.push(BatchOp::Delete { key: key.to_vec() });
    }

    /// Number of queued operations
    pub fn len(&self) -> usize {
        self.ops.len()
    }

    /// Check if the batch is empty
    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }
}

/// In-memory store over an ordered map.
#[derive(Default)]
pub struct MemoryStore {
    map: RwLock<BTreeMap<Vec<u8>, Vec<u8>>>,
}

impl MemoryStore {
    /// Create an empty in-memory store
    pub fn new() -> Self {
        Self::default()
    }
}

impl Store for MemoryStore {
    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>, StoreError> {
        Ok(self.map.read().get(key).cloned())
    }

    fn put(&self, key: &[u8], value: &[u8]) -> Result<(), StoreError> {
        self.map.write().insert(key.to_vec(), value.to_vec());
        Ok(())
    }

    fn delete(&self, key: &[u8]) -> Result<(), StoreError> {
        self.map.write().remove(key);
        Ok(())
    }

    fn write(&self, batch: WriteBatch) -> Result<(), StoreError> {
        // One guard across the whole batch gives all-or-nothing
        // visibility to readers.
        let mut map = self.map.write();
        for op in batch.ops {
            match op {
                BatchOp::Put { key, value } => {
                    map.insert(key, value);
                }
                BatchOp::Delete { key } => {
                    map.remove(&key);
                }
            }
        }
        Ok(())
    }
}

/// Persistent store backed by RocksDB.
pub struct RocksStore {
    db: rocksdb::DB,
}

impl RocksStore {
    /// Open (or create) a database at `path`
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let mut opts = rocksdb::Options::default();
        opts.create_if_missing(true);
        let db = rocksdb::DB::open(&opts, path)?;
        Ok(Self { db })
    }
}

impl Store for RocksStore {
    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>, StoreError> {
        Ok(self.db.get(key)?)
    }

    fn put(&self, key: &[u8], value: &[u8]) -> Result<(), StoreError> {
        Ok(self.db.put(key, value)?)
    }

    fn delete(&self, key: &[u8]) -> Result<(), StoreError> {
        Ok(self.db.delete(key)?)
    }

    fn write(&self, batch: WriteBatch) -> Result<(), StoreError> {
        let mut rocks_batch = rocksdb::WriteBatch::default();
        for op in batch.ops {
            match op {
                BatchOp::Put { key, value } => rocks_batch.put(&key, &value),
                BatchOp::Delete { key } => rocks_batch.delete(&key),
            }
        }
        Ok(self.db.write(rocks_batch)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn temp_db_path() -> String {
        use std::sync::atomic::{AtomicU64, Ordering};
        static COUNTER: AtomicU64 = AtomicU64::new(0);
        let id = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap()
            .as_nanos();
        let cnt = COUNTER.fetch_add(1, Ordering::SeqCst);
        format!("/tmp/ember_store_test_{}_{}", id, cnt)
    }

    fn cleanup(path: &str) {
        let _ = fs::remove_dir_all(path);
    }

    fn exercise(store: &dyn Store) {
        assert_eq!(store.get(b"missing").unwrap(), None);

        store.put(b"key1", b"value1").unwrap();
        assert_eq!(store.get(b"key1").unwrap(), Some(b"value1".to_vec()));

        store.put(b"key1", b"value2").unwrap();
        assert_eq!(store.get(b"key1").unwrap(), Some(b"value2".to_vec()));

        store.delete(b"key1").unwrap();
        assert_eq!(store.get(b"key1").unwrap(), None);

        // Deleting a missing key is not an error
        store.delete(b"never-there").unwrap();

        let mut batch = WriteBatch::new();
        batch.put(b"a", b"1");
        batch.put(b"b", b"2");
        batch.delete(b"a");
        assert_eq!(batch.len(), 3);
        store.write(batch).unwrap();

        assert_eq!(store.get(b"a").unwrap(), None);
        assert_eq!(store.get(b"b").unwrap(), Some(b"2".to_vec()));
    }

    #[test]
    fn test_memory_store_contract() {
        exercise(&MemoryStore::new());
    }

    #[test]
    fn test_rocks_store_contract() {
        let path = temp_db_path();
        {
            let store = RocksStore::open(&path).unwrap();
            exercise(&store);
        }
        cleanup(&path);
    }

    #[test]
    fn test_rocks_store_persists_across_reopen() {
        let path = temp_db_path();
        {
            let store = RocksStore::open(&path).unwrap();
            store.put(b"key", b"persisted").unwrap();
        }
        {
            let store = RocksStore::open(&path).unwrap();
            assert_eq!(store.get(b"key").unwrap(), Some(b"persisted".to_vec()));
        }
        cleanup(&path);
    }

    #[test]
    fn test_empty_batch() {
        let batch = WriteBatch::new();
        assert!(batch.is_empty());
        MemoryStore::new().write(batch).unwrap();
    }

    #[test]
    fn test_empty_key_and_value() {
        let store = MemoryStore::new();
        store.put(b"", b"empty-key").unwrap();
        assert_eq!(store.get(b"").unwrap(), Some(b"empty-key".to_vec()));
        store.put(b"empty-value", b"").unwrap();
        assert_eq!(store.get(b"empty-value").unwrap(), Some(Vec::new()));
    }
}
