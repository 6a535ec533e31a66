//! Order record and lifecycle status

use super::item::OrderItem;
use serde::{Deserialize, Serialize};

/// Pseudo-table prefixes. Delivery, takeaway and history rows share the
/// table keyspace with real tables, distinguished only by prefix.
pub const DELIVERY_PREFIX: &str = "DELIVERY-";
pub const TAKEAWAY_PREFIX: &str = "TAKEAWAY-";

/// Order lifecycle status. Monotonic under normal operation:
/// Pending → Cooking → Ready → Delivered. No path regresses.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStatus {
    #[default]
    Pending,
    Cooking,
    Ready,
    Delivered,
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OrderStatus::Pending => write!(f, "PENDING"),
            OrderStatus::Cooking => write!(f, "COOKING"),
            OrderStatus::Ready => write!(f, "READY"),
            OrderStatus::Delivered => write!(f, "DELIVERED"),
        }
    }
}

/// Delivery/platform metadata for non-table orders.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DeliveryInfo {
    /// Platform name (e.g. the aggregator the order came from)
    pub platform: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

/// A restaurant order.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Order {
    /// Order ID (uuid v4)
    pub id: String,
    /// Table identifier; pseudo-tables use string prefixes
    pub table: String,
    /// Line items in submit order
    pub items: Vec<OrderItem>,
    /// Lifecycle status
    pub status: OrderStatus,
    /// Creation time (Unix ms). Immutable after creation.
    pub created_at: i64,
    /// Last-mutation time (Unix ms). Doubles as exit time once Delivered.
    pub timestamp: i64,
    /// Waiter who opened the order
    pub waiter: String,
    /// Delivery metadata, when the table is a delivery pseudo-table
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delivery: Option<DeliveryInfo>,
}

impl Order {
    pub fn new(table: impl Into<String>, waiter: impl Into<String>, items: Vec<OrderItem>) -> Self {
        let now = chrono::Utc::now().timestamp_millis();
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            table: table.into(),
            items,
            status: OrderStatus::Pending,
            created_at: now,
            timestamp: now,
            waiter: waiter.into(),
            delivery: None,
        }
    }

    /// Still being worked somewhere (not yet Delivered).
    pub fn is_active(&self) -> bool {
        self.status != OrderStatus::Delivered
    }

    pub fn is_delivery(&self) -> bool {
        self.table.starts_with(DELIVERY_PREFIX)
    }

    pub fn is_takeaway(&self) -> bool {
        self.table.starts_with(TAKEAWAY_PREFIX)
    }

    /// Bump the last-mutation timestamp, keeping `created_at` fixed.
    pub fn touch(&mut self) {
        let now = chrono::Utc::now().timestamp_millis();
        // Clocks can step backwards; never violate created_at <= timestamp.
        self.timestamp = now.max(self.created_at);
    }
}
