//! RocksDB-backed persistent storage for the mint module.
//!
//! The module's private state (the remaining supply counter) and its
//! parameter subspace live in separate column families. Each column family is
//! exposed as a [`ColumnStore`] implementing [`KvStore`], so the scheduler and
//! the parameter store never see RocksDB directly. Batches are committed with
//! a single [`WriteBatch`] for crash safety.

use std::path::Path;

use rocksdb::{ColumnFamilyDescriptor, Options, WriteBatch, DB};

use mintage_core::{KvStore, StoreError};

// --- Column family names ---

const CF_STATE: &str = "mint_state";
const CF_PARAMS: &str = "mint_params";

/// All column family names.
const ALL_CFS: &[&str] = &[CF_STATE, CF_PARAMS];

/// RocksDB database holding the mint module's column families.
pub struct RocksStore {
    db: DB,
}

impl RocksStore {
    /// Open or create a RocksDB database at the given path.
    ///
    /// Creates all column families if they don't exist.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let mut db_opts = Options::default();
        db_opts.create_if_missing(true);
        db_opts.create_missing_column_families(true);

        let cf_descriptors: Vec<ColumnFamilyDescriptor> = ALL_CFS
            .iter()
            .map(|name| ColumnFamilyDescriptor::new(*name, Options::default()))
            .collect();

        let db = DB::open_cf_descriptors(&db_opts, path.as_ref(), cf_descriptors)
            .map_err(|e| StoreError::Backend(e.to_string()))?;

        Ok(Self { db })
    }

    /// The module's private state namespace.
    pub fn state(&self) -> ColumnStore<'_> {
        ColumnStore {
            db: &self.db,
            cf: CF_STATE,
        }
    }

    /// The module's parameter subspace.
    pub fn params(&self) -> ColumnStore<'_> {
        ColumnStore {
            db: &self.db,
            cf: CF_PARAMS,
        }
    }

    /// Flush all in-memory buffers to disk.
    pub fn flush(&self) -> Result<(), StoreError> {
        self.db
            .flush()
            .map_err(|e| StoreError::Backend(e.to_string()))
    }
}

/// One column family viewed as a key-value store.
pub struct ColumnStore<'a> {
    db: &'a DB,
    cf: &'static str,
}

impl ColumnStore<'_> {
    /// Get the column family handle.
    fn cf_handle(&self) -> Result<&rocksdb::ColumnFamily, StoreError> {
        self.db
            .cf_handle(self.cf)
            .ok_or_else(|| StoreError::Backend(format!("missing column family: {}", self.cf)))
    }
}

impl KvStore for ColumnStore<'_> {
    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>, StoreError> {
        let cf = self.cf_handle()?;
        self.db
            .get_cf(cf, key)
            .map_err(|e| StoreError::Backend(e.to_string()))
    }

    fn set(&mut self, key: &[u8], value: &[u8]) -> Result<(), StoreError> {
        let cf = self.cf_handle()?;
        self.db
            .put_cf(cf, key, value)
            .map_err(|e| StoreError::Backend(e.to_string()))
    }

    fn write_batch(&mut self, entries: &[(&[u8], &[u8])]) -> Result<(), StoreError> {
        let cf = self.cf_handle()?;
        let mut batch = WriteBatch::default();
        for (key, value) in entries {
            batch.put_cf(cf, key, value);
        }
        self.db
            .write(batch)
            .map_err(|e| StoreError::Backend(e.to_string()))
    }
}
