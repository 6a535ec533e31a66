//! Remote backup seam
//!
//! The store propagates every local write to a remote backup,
//! fire-and-forget. Failures are surfaced as notices, never retried
//! here and never rolled back locally.

use crate::error::BackupError;
use async_trait::async_trait;
use shared::order::Order;

/// Best-effort remote persistence for orders.
#[async_trait]
pub trait BackupService: Send + Sync {
    async fn save(&self, order: &Order) -> Result<(), BackupError>;
}

/// Backup that accepts everything. Useful when no remote is configured.
#[derive(Debug, Default)]
pub struct NoopBackup;

#[async_trait]
impl BackupService for NoopBackup {
    async fn save(&self, _order: &Order) -> Result<(), BackupError> {
        Ok(())
    }
}

/// Non-fatal notice raised when a backup attempt fails.
/// Local state remains authoritative.
#[derive(Debug, Clone, PartialEq)]
pub struct BackupNotice {
    pub order_id: String,
    pub error: BackupError,
    pub at: i64,
}
