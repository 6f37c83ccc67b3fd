pub mod redb_alert_store;

pub use redb_alert_store::RedbAlertStore;
