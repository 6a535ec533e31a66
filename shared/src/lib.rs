//! Shared types for the Comanda engine
//!
//! Common types used across the engine and its consumer views:
//! menu catalog definitions, department settings, order state,
//! and the sync/notification event vocabulary.

pub mod event;
pub mod menu;
pub mod order;
pub mod settings;

// Re-exports
pub use event::{Notice, NoticeKind, SyncEvent};
pub use menu::{Category, Department, MenuItem};
pub use order::{DeliveryInfo, Order, OrderItem, OrderStatus};
pub use serde::{Deserialize, Serialize};
pub use settings::DepartmentSettings;
