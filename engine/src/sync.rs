//! Snapshot diffing and lingering visibility
//!
//! The store carries no event metadata, only state. Every consumer
//! view re-reads the collection on each tick and derives its side
//! effects by comparing the previous snapshot with the new one. The
//! diff is a pure function so it is testable without timers or I/O.

use crate::routing::Router;
use shared::event::SyncEvent;
use shared::menu::Department;
use shared::order::{Order, OrderStatus};
use std::collections::HashMap;

/// Derive department-scoped side-effect events from two snapshots.
///
/// O(orders × items) per call, which is the accepted cost of keeping
/// the transport payload-free.
pub fn diff_snapshots(
    prev: &[Order],
    next: &[Order],
    department: Department,
    router: &Router<'_>,
) -> Vec<SyncEvent> {
    let previous: HashMap<&str, &Order> = prev.iter().map(|o| (o.id.as_str(), o)).collect();
    let mut events = Vec::new();

    for order in next {
        // Orders with nothing routed here stay invisible to this view,
        // status transitions included.
        let relevant = has_relevant_dishes(order, department, router);

        let Some(old) = previous.get(order.id.as_str()) else {
            if relevant {
                events.push(SyncEvent::NewOrder {
                    order_id: order.id.clone(),
                    table: order.table.clone(),
                });
            }
            continue;
        };

        diff_items(old, order, department, router, &mut events);

        if !relevant {
            continue;
        }

        if old.status == OrderStatus::Cooking && order.status == OrderStatus::Ready {
            events.push(SyncEvent::OrderReady {
                order_id: order.id.clone(),
                table: order.table.clone(),
            });
        }
        if old.status != OrderStatus::Delivered && order.status == OrderStatus::Delivered {
            events.push(SyncEvent::OrderDelivered {
                order_id: order.id.clone(),
                table: order.table.clone(),
            });
        }

        // Edge-triggered: fires only on the snapshot where the last
        // relevant item flipped done.
        if !router.order_done_for(old, department) && router.order_done_for(order, department) {
            events.push(SyncEvent::DeptCleared {
                order_id: order.id.clone(),
                table: order.table.clone(),
            });
        }
    }

    events
}

fn has_relevant_dishes(order: &Order, department: Department, router: &Router<'_>) -> bool {
    order
        .items
        .iter()
        .any(|line| !line.is_separator && router.is_relevant(line, department))
}

fn diff_items(
    old: &Order,
    new: &Order,
    department: Department,
    router: &Router<'_>,
    events: &mut Vec<SyncEvent>,
) {
    // Items are append-only, so index pairing is stable. Items present
    // only in the new snapshot arrived incomplete and produce nothing.
    for (old_line, new_line) in old.items.iter().zip(new.items.iter()) {
        if new_line.is_separator {
            continue;
        }

        if new_line.item.is_combo() {
            for sub_id in new_line
                .combo_completed_parts
                .difference(&old_line.combo_completed_parts)
            {
                let routes_here = router
                    .catalog
                    .get(sub_id)
                    .map(|sub| router.resolve_department(sub) == department)
                    .unwrap_or(false);
                if routes_here {
                    events.push(SyncEvent::ItemDone {
                        order_id: new.id.clone(),
                        table: new.table.clone(),
                        item_name: new_line.item.name.clone(),
                        sub_item_id: Some(sub_id.clone()),
                    });
                }
            }
        } else if !old_line.completed
            && new_line.completed
            && router.resolve_department(&new_line.item) == department
        {
            events.push(SyncEvent::ItemDone {
                order_id: new.id.clone(),
                table: new.table.clone(),
                item_name: new_line.item.name.clone(),
                sub_item_id: None,
            });
        }
    }
}

/// Orders that finished for a view but stay visible for a bounded
/// window so staff can see them go.
#[derive(Debug, Clone)]
pub struct LingeringSet {
    window_millis: i64,
    deadlines: HashMap<String, i64>,
}

impl LingeringSet {
    pub fn new(window_millis: i64) -> Self {
        Self {
            window_millis,
            deadlines: HashMap::new(),
        }
    }

    /// Start (or restart) the lingering window for an order.
    pub fn insert(&mut self, order_id: &str, now: i64) {
        self.deadlines
            .insert(order_id.to_string(), now + self.window_millis);
    }

    pub fn contains(&self, order_id: &str) -> bool {
        self.deadlines.contains_key(order_id)
    }

    /// Drop expired entries, returning the ids that just disappeared.
    pub fn purge(&mut self, now: i64) -> Vec<String> {
        let expired: Vec<String> = self
            .deadlines
            .iter()
            .filter(|(_, deadline)| now >= **deadline)
            .map(|(id, _)| id.clone())
            .collect();
        for id in &expired {
            self.deadlines.remove(id);
        }
        expired
    }

    pub fn len(&self) -> usize {
        self.deadlines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.deadlines.is_empty()
    }
}
