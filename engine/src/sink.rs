//! External collaborator seams: alert sink and print trigger
//!
//! Both are best-effort. A sink that fails to play a sound or a
//! printer that jams must never block or roll back the store mutation
//! that triggered it, so neither trait returns an error to propagate.

use shared::event::Notice;
use shared::menu::Department;
use shared::order::OrderItem;

/// Consumes discrete notices. Rendering and audio are its business.
pub trait NotificationSink: Send + Sync {
    fn notify(&self, notice: Notice);
}

/// Produces a department ticket. Content formatting is out of scope;
/// the engine only triggers it with the relevant item subset.
pub trait TicketPrinter: Send + Sync {
    fn print_ticket(&self, department: Department, table: &str, waiter: &str, items: &[OrderItem]);
}

/// Sink that logs notices through tracing. Default when no UI sink is
/// attached.
#[derive(Debug, Default)]
pub struct LogSink;

impl NotificationSink for LogSink {
    fn notify(&self, notice: Notice) {
        tracing::info!(
            kind = ?notice.kind,
            department = %notice.department,
            message = %notice.message,
            "notice"
        );
    }
}

/// Printer that logs the trigger instead of driving hardware.
#[derive(Debug, Default)]
pub struct LogPrinter;

impl TicketPrinter for LogPrinter {
    fn print_ticket(&self, department: Department, table: &str, waiter: &str, items: &[OrderItem]) {
        tracing::info!(
            department = %department,
            table = %table,
            waiter = %waiter,
            items = items.len(),
            "ticket print triggered"
        );
    }
}
