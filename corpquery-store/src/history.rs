//! Record keys and query history.

use corpquery_core::CompanyRecord;
use tracing::{debug, warn};

use crate::error::StoreError;
use crate::store::RecordStore;

/// Prefix of every record key.
pub const KEY_PREFIX: &str = "query_";

/// Default number of history entries returned.
pub const DEFAULT_HISTORY_LIMIT: usize = 50;

/// Builds the store key `query_{epochMillis}_{regNumber}` for a record.
pub fn record_key(record: &CompanyRecord) -> String {
    format!("{KEY_PREFIX}{}_{}", record.epoch_millis(), record.reg_number)
}

/// Serializes and stores a record, returning its key.
pub async fn save_record(
    store: &dyn RecordStore,
    record: &CompanyRecord,
) -> Result<String, StoreError> {
    let key = record_key(record);
    let value = serde_json::to_string(record)?;
    store.put(&key, value).await?;
    debug!(key = %key, "Saved record");
    Ok(key)
}

/// Returns up to `limit` stored records, newest first.
///
/// Keys listed but not yet readable are skipped. A value that does not
/// parse as a record fails the whole listing.
pub async fn recent_history(
    store: &dyn RecordStore,
    limit: usize,
) -> Result<Vec<CompanyRecord>, StoreError> {
    let keys = store.list().await?;
    let mut records = Vec::with_capacity(keys.len());

    for key in keys {
        let Some(value) = store.get(&key).await? else {
            warn!(key = %key, "Listed key has no value yet, skipping");
            continue;
        };

        let record = CompanyRecord::from_json(&value).map_err(|e| StoreError::CorruptEntry {
            key: key.clone(),
            reason: e.to_string(),
        })?;
        records.push(record);
    }

    records.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
    records.truncate(limit);
    Ok(records)
}
