//! Order state machine
//!
//! Named transitions over the Pending → Cooking → Ready → Delivered
//! lifecycle. Every function returns a new order value or an explicit
//! error; nothing mutates in place. Item-level toggling never advances
//! the order status: a department finishing its share only hides the
//! ticket from that queue, promotion to Ready stays an explicit step.

use crate::error::OrderError;
use shared::order::{Order, OrderItem, OrderStatus};

/// Pending → Cooking. No side effects beyond the status flip.
pub fn start(order: &Order) -> Result<Order, OrderError> {
    transition(order, OrderStatus::Pending, OrderStatus::Cooking)
}

/// Cooking → Ready, marking EVERY dish completed regardless of
/// department. This is the manual "I'm done, skip the rest" override,
/// deliberately a different path from department-scoped toggling.
pub fn force_ready(order: &Order) -> Result<Order, OrderError> {
    let mut next = transition(order, OrderStatus::Cooking, OrderStatus::Ready)?;
    for line in next.items.iter_mut() {
        complete_line(line);
    }
    Ok(next)
}

/// Ready → Delivered. The caller releases the table.
pub fn deliver(order: &Order) -> Result<Order, OrderError> {
    transition(order, OrderStatus::Ready, OrderStatus::Delivered)
}

/// Toggle an item's completion flag, or a combo sub-part's membership
/// in the completed set. Never touches `order.status`.
pub fn toggle_item(
    order: &Order,
    item_index: usize,
    sub_item_id: Option<&str>,
) -> Result<Order, OrderError> {
    toggle(order, item_index, sub_item_id, |line, sub| match sub {
        Some(id) => {
            if !line.combo_completed_parts.remove(id) {
                line.combo_completed_parts.insert(id.to_string());
            }
        }
        None => line.completed = !line.completed,
    })
}

/// Toggle an item's served flag, or a combo sub-part's membership in
/// the served set. Same rules as [`toggle_item`].
pub fn mark_served(
    order: &Order,
    item_index: usize,
    sub_item_id: Option<&str>,
) -> Result<Order, OrderError> {
    toggle(order, item_index, sub_item_id, |line, sub| match sub {
        Some(id) => {
            if !line.combo_served_parts.remove(id) {
                line.combo_served_parts.insert(id.to_string());
            }
        }
        None => line.served = !line.served,
    })
}

fn transition(order: &Order, from: OrderStatus, to: OrderStatus) -> Result<Order, OrderError> {
    if order.status != from {
        return Err(OrderError::InvalidTransition {
            from: order.status,
            to,
        });
    }
    let mut next = order.clone();
    next.status = to;
    next.touch();
    Ok(next)
}

fn toggle(
    order: &Order,
    item_index: usize,
    sub_item_id: Option<&str>,
    apply: impl FnOnce(&mut OrderItem, Option<&str>),
) -> Result<Order, OrderError> {
    let mut next = order.clone();
    let line = next
        .items
        .get_mut(item_index)
        .ok_or_else(|| OrderError::ItemNotFound {
            order_id: order.id.clone(),
            index: item_index,
        })?;

    if line.is_separator {
        return Err(OrderError::NotCompletable(line.item.name.clone()));
    }
    match sub_item_id {
        Some(id) => {
            if !line.item.sub_item_ids.iter().any(|s| s == id) {
                return Err(OrderError::UnknownComboPart {
                    combo_id: line.item.id.clone(),
                    sub_item_id: id.to_string(),
                });
            }
        }
        None => {
            if line.item.is_combo() {
                // Combos are only completable part by part.
                return Err(OrderError::NotCompletable(line.item.name.clone()));
            }
        }
    }

    apply(line, sub_item_id);
    next.touch();
    Ok(next)
}

fn complete_line(line: &mut OrderItem) {
    if line.is_separator {
        return;
    }
    line.completed = true;
    for sub_id in &line.item.sub_item_ids {
        line.combo_completed_parts.insert(sub_id.clone());
    }
}
