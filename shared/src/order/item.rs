//! Order line item - embedded menu snapshot plus fulfillment flags

use crate::menu::MenuItem;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// A line on an order.
///
/// For combo items the `completed` flag is meaningless; doneness is
/// tracked per sub-part in `combo_completed_parts`. Separators mark a
/// course break: relevant to every department, never completable.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OrderItem {
    /// Menu snapshot taken at submit time
    pub item: MenuItem,
    /// Quantity (>= 1)
    pub quantity: i32,
    /// Free-text annotations, each independent
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub notes: Vec<String>,
    /// Kitchen finished cooking (non-combo items only)
    #[serde(default)]
    pub completed: bool,
    /// Waiter delivered to the table
    #[serde(default)]
    pub served: bool,
    /// Completed sub-item ids (combo items only)
    #[serde(default, skip_serializing_if = "BTreeSet::is_empty")]
    pub combo_completed_parts: BTreeSet<String>,
    /// Served sub-item ids (combo items only)
    #[serde(default, skip_serializing_if = "BTreeSet::is_empty")]
    pub combo_served_parts: BTreeSet<String>,
    /// Course-break marker, not a dish
    #[serde(default)]
    pub is_separator: bool,
    /// Appended after the initial send
    #[serde(default)]
    pub is_added_later: bool,
}

impl OrderItem {
    pub fn new(item: MenuItem, quantity: i32) -> Self {
        Self {
            item,
            quantity: quantity.max(1),
            notes: Vec::new(),
            completed: false,
            served: false,
            combo_completed_parts: BTreeSet::new(),
            combo_served_parts: BTreeSet::new(),
            is_separator: false,
            is_added_later: false,
        }
    }

    /// Course-break marker. Carries a throwaway menu snapshot so the
    /// item list stays homogeneous.
    pub fn separator() -> Self {
        let marker = MenuItem::new("", "--- a seguire ---", 0.0, crate::menu::Category::Antipasto);
        Self {
            is_separator: true,
            ..Self::new(marker, 1)
        }
    }

    pub fn with_notes(mut self, notes: Vec<String>) -> Self {
        self.notes = notes;
        self
    }
}
