//! Engine error types

use shared::order::OrderStatus;
use thiserror::Error;

/// Errors from order mutation paths.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum OrderError {
    #[error("order not found: {0}")]
    OrderNotFound(String),

    #[error("item index {index} out of range for order {order_id}")]
    ItemNotFound { order_id: String, index: usize },

    #[error("invalid transition {from} -> {to}")]
    InvalidTransition { from: OrderStatus, to: OrderStatus },

    #[error("item is not completable: {0}")]
    NotCompletable(String),

    #[error("cannot submit an empty cart for table {0}")]
    EmptyCart(String),

    #[error("sub-item {sub_item_id} does not belong to combo {combo_id}")]
    UnknownComboPart { combo_id: String, sub_item_id: String },
}

/// Remote backup failure. Non-fatal: the local write is authoritative
/// and is never rolled back.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum BackupError {
    #[error("backup unreachable: {0}")]
    Unreachable(String),

    #[error("backup rejected order {order_id}: {reason}")]
    Rejected { order_id: String, reason: String },
}

/// Speech source failure classification. Drives the supervisor's
/// restart decision: transient errors restart, permanent ones stop.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ListenError {
    /// Network hiccup, no-speech timeout and similar. Restartable.
    #[error("transient listen error: {0}")]
    Transient(String),

    /// Microphone permission denied. Never restart.
    #[error("speech permission denied")]
    PermissionDenied,

    /// Explicit user-initiated stop. Never restart.
    #[error("listener stopped by user")]
    Stopped,
}

impl ListenError {
    /// Whether the supervisor may restart the source after this error.
    pub fn is_transient(&self) -> bool {
        matches!(self, ListenError::Transient(_))
    }
}
