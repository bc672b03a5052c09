use std::path::Path;
use std::sync::Mutex;

use chrono::Utc;
use domain::dedup::entity::DedupRecord;
use domain::dedup::error::StoreError;
use ports::secondary::record_store::RecordStore;
use redb::{Database, ReadableDatabase, ReadableTable, TableDefinition};

/// redb table: key = event identifier, value = JSON-serialized `DedupRecord`.
const RECORD_TABLE: TableDefinition<&str, &[u8]> = TableDefinition::new("dedup_records");

/// Dedup record store backed by redb.
///
/// redb has no native TTL, so expiry is enforced two ways: `get` treats an
/// expired-but-unswept record as absent, and `sweep_expired` physically
/// removes expired keys (run on open and before each poll pass).
pub struct RedbRecordStore {
    db: Database,
    /// Serialize writers; the single-invocation model makes contention
    /// unlikely, but sweep + put must not interleave.
    write_lock: Mutex<()>,
}

impl RedbRecordStore {
    /// Open (or create) a redb database at `path` and sweep anything that
    /// expired since the last invocation.
    pub fn open(path: &Path) -> Result<Self, StoreError> {
        let db = Database::create(path)
            .map_err(|e| StoreError::Unavailable(format!("redb open failed: {e}")))?;

        // Ensure the table exists.
        let txn = db
            .begin_write()
            .map_err(|e| StoreError::Unavailable(format!("redb txn begin: {e}")))?;
        {
            let _table = txn
                .open_table(RECORD_TABLE)
                .map_err(|e| StoreError::Unavailable(format!("redb table create: {e}")))?;
        }
        txn.commit()
            .map_err(|e| StoreError::Unavailable(format!("redb commit: {e}")))?;

        let store = Self {
            db,
            write_lock: Mutex::new(()),
        };
        store.sweep_expired(Utc::now().timestamp())?;
        Ok(store)
    }
}

impl RecordStore for RedbRecordStore {
    fn get(&self, arn: &str) -> Result<Option<DedupRecord>, StoreError> {
        let txn = self
            .db
            .begin_read()
            .map_err(|e| StoreError::Unavailable(format!("redb read txn: {e}")))?;
        let table = txn
            .open_table(RECORD_TABLE)
            .map_err(|e| StoreError::Unavailable(format!("redb read table: {e}")))?;

        let result = table
            .get(arn)
            .map_err(|e| StoreError::Unavailable(format!("redb get: {e}")))?;

        match result {
            Some(guard) => {
                let record: DedupRecord = serde_json::from_slice(guard.value())
                    .map_err(|e| StoreError::Corrupt(format!("deserialize: {e}")))?;
                // Lazy expiry: a record past its TTL no longer exists as
                // far as the pipeline is concerned.
                if record.is_expired(Utc::now().timestamp()) {
                    return Ok(None);
                }
                Ok(Some(record))
            }
            None => Ok(None),
        }
    }

    fn put(&self, record: &DedupRecord) -> Result<(), StoreError> {
        let _lock = self
            .write_lock
            .lock()
            .map_err(|e| StoreError::Unavailable(format!("lock poisoned: {e}")))?;

        let value = serde_json::to_vec(record)
            .map_err(|e| StoreError::Unavailable(format!("serialize: {e}")))?;

        let txn = self
            .db
            .begin_write()
            .map_err(|e| StoreError::Unavailable(format!("redb write txn: {e}")))?;
        {
            let mut table = txn
                .open_table(RECORD_TABLE)
                .map_err(|e| StoreError::Unavailable(format!("redb write table: {e}")))?;
            table
                .insert(record.arn.as_str(), value.as_slice())
                .map_err(|e| StoreError::Unavailable(format!("redb insert: {e}")))?;
        }
        txn.commit()
            .map_err(|e| StoreError::Unavailable(format!("redb write commit: {e}")))?;

        Ok(())
    }

    fn sweep_expired(&self, now_epoch: i64) -> Result<usize, StoreError> {
        let _lock = self
            .write_lock
            .lock()
            .map_err(|e| StoreError::Unavailable(format!("lock poisoned: {e}")))?;

        let txn = self
            .db
            .begin_read()
            .map_err(|e| StoreError::Unavailable(format!("redb sweep read: {e}")))?;
        let table = txn
            .open_table(RECORD_TABLE)
            .map_err(|e| StoreError::Unavailable(format!("redb sweep table: {e}")))?;

        // Records that fail to deserialize are swept too; they can never
        // participate in a dedup decision again.
        let expired: Vec<String> = table
            .iter()
            .map_err(|e| StoreError::Unavailable(format!("redb sweep iter: {e}")))?
            .filter_map(Result::ok)
            .filter_map(|(k, v)| {
                match serde_json::from_slice::<DedupRecord>(v.value()) {
                    Ok(record) if record.is_expired(now_epoch) => Some(k.value().to_string()),
                    Ok(_) => None,
                    Err(_) => Some(k.value().to_string()),
                }
            })
            .collect();
        drop(table);
        drop(txn);

        if expired.is_empty() {
            return Ok(0);
        }

        let wtxn = self
            .db
            .begin_write()
            .map_err(|e| StoreError::Unavailable(format!("redb sweep write: {e}")))?;
        {
            let mut table = wtxn
                .open_table(RECORD_TABLE)
                .map_err(|e| StoreError::Unavailable(format!("redb sweep table: {e}")))?;
            for key in &expired {
                table
                    .remove(key.as_str())
                    .map_err(|e| StoreError::Unavailable(format!("redb sweep remove: {e}")))?;
            }
        }
        wtxn.commit()
            .map_err(|e| StoreError::Unavailable(format!("redb sweep commit: {e}")))?;

        Ok(expired.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::NamedTempFile;

    fn make_store() -> (RedbRecordStore, NamedTempFile) {
        let tmp = NamedTempFile::new().unwrap();
        let store = RedbRecordStore::open(tmp.path()).unwrap();
        (store, tmp)
    }

    fn record(arn: &str, last_updated: &str, expiry: i64) -> DedupRecord {
        DedupRecord {
            arn: arn.to_string(),
            last_updated_time: last_updated.to_string(),
            first_seen: "1700000000".to_string(),
            expiry,
        }
    }

    fn live_expiry() -> i64 {
        Utc::now().timestamp() + 90_000
    }

    #[test]
    fn put_then_get_roundtrips() {
        let (store, _tmp) = make_store();
        let r = record("arn:e/1", "1700000000", live_expiry());
        store.put(&r).unwrap();

        let got = store.get("arn:e/1").unwrap().unwrap();
        assert_eq!(got, r);
    }

    #[test]
    fn get_missing_is_none() {
        let (store, _tmp) = make_store();
        assert!(store.get("arn:e/absent").unwrap().is_none());
    }

    #[test]
    fn put_replaces_existing_record() {
        let (store, _tmp) = make_store();
        store
            .put(&record("arn:e/1", "1700000000", live_expiry()))
            .unwrap();
        store
            .put(&record("arn:e/1", "1700000600", live_expiry()))
            .unwrap();

        let got = store.get("arn:e/1").unwrap().unwrap();
        assert_eq!(got.last_updated_time, "1700000600");
    }

    #[test]
    fn expired_record_reads_as_absent() {
        let (store, _tmp) = make_store();
        let expired = Utc::now().timestamp() - 10;
        store.put(&record("arn:e/1", "1700000000", expired)).unwrap();

        assert!(store.get("arn:e/1").unwrap().is_none());
    }

    #[test]
    fn sweep_removes_only_expired_records() {
        let (store, _tmp) = make_store();
        let now = Utc::now().timestamp();
        store.put(&record("arn:e/dead", "1", now - 10)).unwrap();
        store.put(&record("arn:e/live", "2", now + 90_000)).unwrap();

        let removed = store.sweep_expired(now).unwrap();

        assert_eq!(removed, 1);
        assert!(store.get("arn:e/live").unwrap().is_some());
        assert!(store.get("arn:e/dead").unwrap().is_none());
    }

    #[test]
    fn sweep_with_nothing_expired_is_noop() {
        let (store, _tmp) = make_store();
        store
            .put(&record("arn:e/1", "1700000000", live_expiry()))
            .unwrap();
        assert_eq!(store.sweep_expired(Utc::now().timestamp()).unwrap(), 0);
    }

    #[test]
    fn records_survive_reopen() {
        let tmp = NamedTempFile::new().unwrap();
        {
            let store = RedbRecordStore::open(tmp.path()).unwrap();
            store
                .put(&record("arn:e/1", "1700000000", live_expiry()))
                .unwrap();
        }
        let store = RedbRecordStore::open(tmp.path()).unwrap();
        assert!(store.get("arn:e/1").unwrap().is_some());
    }

    #[test]
    fn reopen_sweeps_expired_records() {
        let tmp = NamedTempFile::new().unwrap();
        {
            let store = RedbRecordStore::open(tmp.path()).unwrap();
            store
                .put(&record("arn:e/1", "1700000000", Utc::now().timestamp() - 10))
                .unwrap();
        }
        let store = RedbRecordStore::open(tmp.path()).unwrap();
        assert!(store.get("arn:e/1").unwrap().is_none());
    }
}
