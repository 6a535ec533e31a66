//! Order store
//!
//! The canonical, shared collection of orders. Writes are synchronous
//! and local-first behind a single writer lock; subscribers get a
//! payload-free tick and re-read the whole collection. Each write is
//! followed by a best-effort async push to the remote backup.
//!
//! There is deliberately no version or sequence check across
//! concurrent writers: the last write wins. Multiple open views and a
//! voice command firing near-simultaneously reconcile through the
//! notification channel, not through locking discipline.

mod backup;

pub use backup::{BackupNotice, BackupService, NoopBackup};

use crate::error::OrderError;
use parking_lot::RwLock;
use shared::order::{Order, OrderItem};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::broadcast;

/// Change notification capacity. Ticks are tiny; a lagging consumer
/// just re-reads once after catching up.
const CHANGE_CHANNEL_CAPACITY: usize = 1024;
const NOTICE_CHANNEL_CAPACITY: usize = 256;

/// Payload-free change tick. Subscribers re-read the full collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StoreChanged;

/// Canonical in-memory order collection.
pub struct OrderStore {
    orders: RwLock<HashMap<String, Order>>,
    change_tx: broadcast::Sender<StoreChanged>,
    notice_tx: broadcast::Sender<BackupNotice>,
    backup: Arc<dyn BackupService>,
}

impl std::fmt::Debug for OrderStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OrderStore")
            .field("orders", &self.orders.read().len())
            .finish()
    }
}

impl OrderStore {
    pub fn new() -> Self {
        Self::with_backup(Arc::new(NoopBackup))
    }

    pub fn with_backup(backup: Arc<dyn BackupService>) -> Self {
        let (change_tx, _) = broadcast::channel(CHANGE_CHANNEL_CAPACITY);
        let (notice_tx, _) = broadcast::channel(NOTICE_CHANNEL_CAPACITY);
        Self {
            orders: RwLock::new(HashMap::new()),
            change_tx,
            notice_tx,
            backup,
        }
    }

    /// Subscribe to change ticks.
    pub fn subscribe(&self) -> broadcast::Receiver<StoreChanged> {
        self.change_tx.subscribe()
    }

    /// Subscribe to backup failure notices.
    pub fn backup_notices(&self) -> broadcast::Receiver<BackupNotice> {
        self.notice_tx.subscribe()
    }

    /// Full snapshot, oldest first. Orders are never physically
    /// deleted; Delivered ones stay for historical reporting.
    pub fn read_all(&self) -> Vec<Order> {
        let mut orders: Vec<Order> = self.orders.read().values().cloned().collect();
        orders.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
        orders
    }

    pub fn get(&self, id: &str) -> Option<Order> {
        self.orders.read().get(id).cloned()
    }

    /// Snapshot of non-Delivered orders, oldest first.
    pub fn active_orders(&self) -> Vec<Order> {
        self.read_all().into_iter().filter(Order::is_active).collect()
    }

    /// Upsert by id. Local-first and synchronous; the remote backup
    /// push happens afterwards and never blocks or rolls back.
    pub fn write(&self, order: Order) {
        {
            let mut orders = self.orders.write();
            orders.insert(order.id.clone(), order.clone());
        }
        if self.change_tx.send(StoreChanged).is_err() {
            tracing::debug!("store change tick dropped: no active subscribers");
        }
        self.push_backup(order);
    }

    /// Submit a non-empty cart against a table. Merges into the first
    /// active order for that table if one exists, otherwise opens a
    /// new Pending order. Merged-in items are flagged `is_added_later`.
    pub fn submit_cart(
        &self,
        table: &str,
        waiter: &str,
        items: Vec<OrderItem>,
    ) -> Result<Order, OrderError> {
        if items.is_empty() {
            return Err(OrderError::EmptyCart(table.to_string()));
        }

        let existing = self
            .active_orders()
            .into_iter()
            .find(|order| order.table == table);

        let order = match existing {
            Some(mut order) => {
                for mut line in items {
                    line.is_added_later = true;
                    order.items.push(line);
                }
                order.touch();
                tracing::info!(order_id = %order.id, table = %table, "cart merged into active order");
                order
            }
            None => {
                let order = Order::new(table, waiter, items);
                tracing::info!(order_id = %order.id, table = %table, "order created");
                order
            }
        };

        self.write(order.clone());
        Ok(order)
    }

    fn push_backup(&self, order: Order) {
        // Fire-and-forget: the local write has already committed.
        let Ok(handle) = tokio::runtime::Handle::try_current() else {
            tracing::debug!(order_id = %order.id, "no async runtime, backup skipped");
            return;
        };
        let backup = Arc::clone(&self.backup);
        let notice_tx = self.notice_tx.clone();
        handle.spawn(async move {
            if let Err(error) = backup.save(&order).await {
                tracing::warn!(order_id = %order.id, error = %error, "remote backup failed");
                let _ = notice_tx.send(BackupNotice {
                    order_id: order.id,
                    error,
                    at: chrono::Utc::now().timestamp_millis(),
                });
            }
        });
    }
}

impl Default for OrderStore {
    fn default() -> Self {
        Self::new()
    }
}
