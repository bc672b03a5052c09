use domain::dedup::entity::DedupRecord;
use domain::dedup::error::StoreError;

/// Pluggable dedup record store.
///
/// The store exclusively owns `DedupRecord`s: the pipeline reads and
/// proposes writes, and record removal happens only through TTL expiry
/// enforced here. Single-writer model — overlapping invocations are
/// unsupported, so no read-modify-write discipline is defined.
pub trait RecordStore: Send + Sync {
    /// Look up the record for an event identifier.
    /// `StoreError::Unavailable` is skip-worthy for that event, not fatal.
    fn get(&self, arn: &str) -> Result<Option<DedupRecord>, StoreError>;

    /// Idempotent upsert keyed by the record's identifier. The expiry is
    /// set atomically with the write.
    fn put(&self, record: &DedupRecord) -> Result<(), StoreError>;

    /// Remove records whose expiry has passed. Returns how many were
    /// removed. Implementations without a background reaper run this at
    /// the start of each poll pass.
    fn sweep_expired(&self, now_epoch: i64) -> Result<usize, StoreError>;
}
