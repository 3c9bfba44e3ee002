//! Parsed-table memoization keyed by file content.
//!
//! Re-running the pipeline with unchanged input must not reparse the CSV, so
//! the cache maps a 64-bit content hash to the parsed table. Entries are pure
//! given their key; invalidation is explicit (`invalidate`/`clear`), never
//! implicit.

use std::collections::HashMap;
use std::collections::hash_map::DefaultHasher;
use std::hash::Hasher;
use std::sync::Arc;

use tracing::debug;

use crate::domain::SalesTable;
use crate::error::AppError;
use crate::io::ingest::parse_sales_csv;

/// Hash of a file's raw bytes, used as the cache key.
pub fn content_hash(bytes: &[u8]) -> u64 {
    let mut hasher = DefaultHasher::new();
    hasher.write(bytes);
    hasher.finish()
}

/// Memoization map from content hash to parsed table.
#[derive(Debug, Default)]
pub struct TableCache {
    entries: HashMap<u64, Arc<SalesTable>>,
}

impl TableCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse the bytes, or return the previously parsed table for identical
    /// content. Parse failures are not cached.
    pub fn load(&mut self, bytes: &[u8]) -> Result<Arc<SalesTable>, AppError> {
        let key = content_hash(bytes);
        if let Some(table) = self.entries.get(&key) {
            debug!(key, "table cache hit");
            return Ok(Arc::clone(table));
        }
        let table = Arc::new(parse_sales_csv(bytes)?);
        debug!(key, rows = table.records.len(), "table cache miss, parsed");
        self.entries.insert(key, Arc::clone(&table));
        Ok(table)
    }

    /// Drop one entry (e.g. after the user replaces the file in place).
    pub fn invalidate(&mut self, key: u64) -> bool {
        self.entries.remove(&key).is_some()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CSV: &[u8] = b"data,item,quantita\n2024-01-01,A,5\n";

    #[test]
    fn identical_content_is_parsed_once() {
        let mut cache = TableCache::new();
        let a = cache.load(CSV).unwrap();
        let b = cache.load(CSV).unwrap();
        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn different_content_gets_its_own_entry() {
        let mut cache = TableCache::new();
        cache.load(CSV).unwrap();
        cache
            .load(b"data,item,quantita\n2024-02-01,B,7\n")
            .unwrap();
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn invalidate_forces_reparse() {
        let mut cache = TableCache::new();
        let a = cache.load(CSV).unwrap();
        assert!(cache.invalidate(content_hash(CSV)));
        let b = cache.load(CSV).unwrap();
        assert!(!Arc::ptr_eq(&a, &b));
    }

    #[test]
    fn parse_failure_is_not_cached() {
        let mut cache = TableCache::new();
        assert!(cache.load(b"nope").is_err());
        assert!(cache.is_empty());
    }
}
