//! Sync and notification event vocabulary
//!
//! The store transports no event metadata, only state snapshots;
//! consumers derive these events by diffing the previous snapshot
//! against the new one, filtered by the department they represent.

use crate::menu::Department;
use serde::{Deserialize, Serialize};

/// Side-effect event derived from a snapshot diff.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SyncEvent {
    /// Order appeared that was not in the previous snapshot
    NewOrder { order_id: String, table: String },
    /// An item (or combo sub-part) flipped to done for this department
    ItemDone {
        order_id: String,
        table: String,
        item_name: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        sub_item_id: Option<String>,
    },
    /// Order status crossed Cooking → Ready
    OrderReady { order_id: String, table: String },
    /// Order status reached Delivered
    OrderDelivered { order_id: String, table: String },
    /// Every item relevant to this department just became done
    DeptCleared { order_id: String, table: String },
}

impl SyncEvent {
    pub fn order_id(&self) -> &str {
        match self {
            SyncEvent::NewOrder { order_id, .. }
            | SyncEvent::ItemDone { order_id, .. }
            | SyncEvent::OrderReady { order_id, .. }
            | SyncEvent::OrderDelivered { order_id, .. }
            | SyncEvent::DeptCleared { order_id, .. } => order_id,
        }
    }
}

/// Discrete notice kinds consumed by the alert sink.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NoticeKind {
    NewOrder,
    ItemReady,
    OrderReady,
    OrderDelivered,
    DelayWarning,
    DelayCritical,
    VoiceAck,
    VoiceFail,
}

/// A notice for the external alert sink. Rendering and audio playback
/// are the sink's responsibility.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Notice {
    pub kind: NoticeKind,
    pub department: Department,
    pub message: String,
}

impl Notice {
    pub fn new(kind: NoticeKind, department: Department, message: impl Into<String>) -> Self {
        Self {
            kind,
            department,
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sync_event_serializes_with_type_tag() {
        let event = SyncEvent::OrderReady {
            order_id: "o1".into(),
            table: "3".into(),
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], "ORDER_READY");
        assert_eq!(event.order_id(), "o1");
    }
}
