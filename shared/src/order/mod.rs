//! Order state types
//!
//! An order is a mutable value written whole into the store on every
//! change. Items embed their `MenuItem` snapshot; completion is tracked
//! per item (and per combo sub-part) so departments can finish their
//! share independently of the order-level status.

pub mod item;
pub mod record;

// Re-exports
pub use item::OrderItem;
pub use record::{DeliveryInfo, Order, OrderStatus};
