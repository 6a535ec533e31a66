//! Delay monitor
//!
//! Per-order elapsed-time classifier with edge-triggered escalation.
//! Each periodic tick recomputes the band per order and compares it
//! with the band seen on the previous tick; an event fires only on
//! band entry, never on re-checks inside the same band.

use shared::order::Order;
use std::collections::HashMap;

/// Elapsed-time classification bands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum DelayBand {
    Normal,
    Warning,
    Critical,
}

/// Escalation fired when an order enters a band.
#[derive(Debug, Clone, PartialEq)]
pub struct DelayEvent {
    pub order_id: String,
    pub table: String,
    pub band: DelayBand,
    pub elapsed_minutes: i64,
}

/// Tracks the last-seen band per order.
#[derive(Debug, Clone)]
pub struct DelayMonitor {
    warning_minutes: i64,
    critical_minutes: i64,
    bands: HashMap<String, DelayBand>,
}

impl DelayMonitor {
    pub fn new(warning_minutes: i64, critical_minutes: i64) -> Self {
        Self {
            warning_minutes,
            critical_minutes,
            bands: HashMap::new(),
        }
    }

    pub fn classify(&self, elapsed_minutes: i64) -> DelayBand {
        if elapsed_minutes >= self.critical_minutes {
            DelayBand::Critical
        } else if elapsed_minutes >= self.warning_minutes {
            DelayBand::Warning
        } else {
            DelayBand::Normal
        }
    }

    /// Re-check every order against its reference time and emit one
    /// event per band entry (Warning or Critical). Orders absent from
    /// the input are evicted so a reused table starts fresh.
    ///
    /// `reference` picks the comparison time: the order's own
    /// `timestamp` for ticket views, or the oldest active order's
    /// `created_at` for table views (see [`table_reference`]).
    pub fn tick(
        &mut self,
        orders: &[Order],
        now: i64,
        reference: impl Fn(&Order) -> i64,
    ) -> Vec<DelayEvent> {
        let mut events = Vec::new();
        let mut seen = HashMap::new();

        for order in orders {
            let elapsed_minutes = (now - reference(order)) / 60_000;
            let band = self.classify(elapsed_minutes);
            seen.insert(order.id.clone(), band);

            let previous = self.bands.get(&order.id).copied().unwrap_or(DelayBand::Normal);
            if band > previous && band != DelayBand::Normal {
                events.push(DelayEvent {
                    order_id: order.id.clone(),
                    table: order.table.clone(),
                    band,
                    elapsed_minutes,
                });
            }
        }

        self.bands = seen;
        events
    }
}

/// Table-view reference time: `created_at` of the oldest still-active
/// order for the table.
pub fn table_reference(orders: &[Order], table: &str) -> Option<i64> {
    orders
        .iter()
        .filter(|o| o.is_active() && o.table == table)
        .map(|o| o.created_at)
        .min()
}
