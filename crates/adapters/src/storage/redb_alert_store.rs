use std::path::Path;
use std::sync::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};

use domain::alert::entity::{Alert, NewAlert};
use domain::alert::error::AlertError;
use domain::alert::query::{AlertQuery, sort_snapshot};
use domain::common::entity::AlertStatus;
use ports::secondary::alert_store::AlertStore;
use redb::{Database, ReadableDatabase, ReadableTable, ReadableTableMetadata, TableDefinition};

/// redb table: key = store-assigned alert id, value = JSON `Alert`.
const ALERT_TABLE: TableDefinition<u64, &[u8]> = TableDefinition::new("alerts");

/// Persistent alert snapshot backed by redb.
///
/// `replace_all` swaps the whole table inside a single write
/// transaction, so readers see either the previous snapshot or the new
/// one, never a mix. Ids are assigned here and nowhere else, and keep
/// increasing across snapshot generations.
pub struct RedbAlertStore {
    db: Database,
    next_id: AtomicU64,
    /// Serialize writers so id assignment and the table swap stay in step.
    write_lock: Mutex<()>,
}

impl RedbAlertStore {
    /// Open (or create) a redb database at `path`.
    pub fn open(path: &Path) -> Result<Self, AlertError> {
        let db = Database::create(path)
            .map_err(|e| AlertError::StoreFailed(format!("redb open failed: {e}")))?;

        // Ensure the table exists so first reads do not error.
        let txn = db
            .begin_write()
            .map_err(|e| AlertError::StoreFailed(format!("redb txn begin: {e}")))?;
        {
            let _table = txn
                .open_table(ALERT_TABLE)
                .map_err(|e| AlertError::StoreFailed(format!("redb table create: {e}")))?;
        }
        txn.commit()
            .map_err(|e| AlertError::StoreFailed(format!("redb commit: {e}")))?;

        // Resume id assignment after the highest id already on disk.
        let rtxn = db
            .begin_read()
            .map_err(|e| AlertError::StoreFailed(format!("redb read txn: {e}")))?;
        let table = rtxn
            .open_table(ALERT_TABLE)
            .map_err(|e| AlertError::StoreFailed(format!("redb read table: {e}")))?;
        let last_id = table
            .last()
            .map_err(|e| AlertError::StoreFailed(format!("redb last key: {e}")))?
            .map(|(key, _value)| key.value())
            .unwrap_or(0);

        Ok(Self {
            db,
            next_id: AtomicU64::new(last_id + 1),
            write_lock: Mutex::new(()),
        })
    }
}

impl AlertStore for RedbAlertStore {
    fn replace_all(&self, alerts: Vec<NewAlert>) -> Result<Vec<Alert>, AlertError> {
        let _lock = self
            .write_lock
            .lock()
            .map_err(|e| AlertError::StoreFailed(format!("lock poisoned: {e}")))?;

        let stored: Vec<Alert> = alerts
            .into_iter()
            .map(|new| Alert::from_new(self.next_id.fetch_add(1, Ordering::Relaxed), new))
            .collect();

        let txn = self
            .db
            .begin_write()
            .map_err(|e| AlertError::StoreFailed(format!("redb write txn: {e}")))?;
        txn.delete_table(ALERT_TABLE)
            .map_err(|e| AlertError::StoreFailed(format!("redb table drop: {e}")))?;
        {
            let mut table = txn
                .open_table(ALERT_TABLE)
                .map_err(|e| AlertError::StoreFailed(format!("redb write table: {e}")))?;
            for alert in &stored {
                let value = serde_json::to_vec(alert)
                    .map_err(|e| AlertError::StoreFailed(format!("serialize: {e}")))?;
                table
                    .insert(alert.id, value.as_slice())
                    .map_err(|e| AlertError::StoreFailed(format!("redb insert: {e}")))?;
            }
        }
        txn.commit()
            .map_err(|e| AlertError::StoreFailed(format!("redb write commit: {e}")))?;

        Ok(stored)
    }

    fn query_alerts(&self, query: &AlertQuery) -> Result<Vec<Alert>, AlertError> {
        let txn = self
            .db
            .begin_read()
            .map_err(|e| AlertError::QueryFailed(format!("redb read txn: {e}")))?;
        let table = txn
            .open_table(ALERT_TABLE)
            .map_err(|e| AlertError::QueryFailed(format!("redb read table: {e}")))?;

        let mut alerts: Vec<Alert> = table
            .iter()
            .map_err(|e| AlertError::QueryFailed(format!("redb iter: {e}")))?
            .filter_map(Result::ok)
            .filter_map(|(_key, value)| serde_json::from_slice::<Alert>(value.value()).ok())
            .filter(|alert| query.matches(alert))
            .collect();

        sort_snapshot(&mut alerts);
        Ok(alerts)
    }

    fn update_status(&self, id: u64, status: AlertStatus) -> Result<Alert, AlertError> {
        let _lock = self
            .write_lock
            .lock()
            .map_err(|e| AlertError::StoreFailed(format!("lock poisoned: {e}")))?;

        let txn = self
            .db
            .begin_write()
            .map_err(|e| AlertError::StoreFailed(format!("redb write txn: {e}")))?;
        let updated = {
            let mut table = txn
                .open_table(ALERT_TABLE)
                .map_err(|e| AlertError::StoreFailed(format!("redb write table: {e}")))?;

            let existing = table
                .get(id)
                .map_err(|e| AlertError::QueryFailed(format!("redb get: {e}")))?
                .map(|guard| serde_json::from_slice::<Alert>(guard.value()));
            let mut alert = match existing {
                Some(Ok(alert)) => alert,
                Some(Err(e)) => {
                    return Err(AlertError::QueryFailed(format!("deserialize: {e}")));
                }
                None => return Err(AlertError::NotFound(id)),
            };

            alert.status = status;
            let value = serde_json::to_vec(&alert)
                .map_err(|e| AlertError::StoreFailed(format!("serialize: {e}")))?;
            table
                .insert(id, value.as_slice())
                .map_err(|e| AlertError::StoreFailed(format!("redb insert: {e}")))?;
            alert
        };
        txn.commit()
            .map_err(|e| AlertError::StoreFailed(format!("redb write commit: {e}")))?;

        Ok(updated)
    }

    fn alert_count(&self) -> Result<usize, AlertError> {
        let txn = self
            .db
            .begin_read()
            .map_err(|e| AlertError::QueryFailed(format!("redb count txn: {e}")))?;
        let table = txn
            .open_table(ALERT_TABLE)
            .map_err(|e| AlertError::QueryFailed(format!("redb count table: {e}")))?;
        let count = table
            .len()
            .map_err(|e| AlertError::QueryFailed(format!("redb count: {e}")))?;
        #[allow(clippy::cast_possible_truncation)]
        Ok(count as usize)
    }
}
