//! Comanda Engine - order lifecycle and department routing
//!
//! The engine owns the shared order store and everything that hangs
//! off it:
//!
//! - **catalog**: menu and settings provider seams
//! - **routing**: combo expansion, department resolution, relevance and
//!   per-department doneness
//! - **lifecycle**: the Pending → Cooking → Ready → Delivered state
//!   machine and item-level toggling
//! - **store**: canonical in-memory order collection with payload-free
//!   change notification and fire-and-forget remote backup
//! - **sync**: snapshot diffing into side-effect events, plus the
//!   lingering set that keeps finished orders visible for a while
//! - **voice**: utterance resolution and the speech source supervisor
//! - **delay**: elapsed-time bands with edge-triggered escalation
//! - **queue_sort**: manual ticket ordering merged with live orders
//!
//! # Data Flow
//!
//! ```text
//! waiter / kitchen / voice ──write──▶ OrderStore ──notify──▶ views
//!                                        │                    │
//!                                  backup (async)      diff old/new
//!                                                            │
//!                                                  Notice / print / linger
//! ```

pub mod catalog;
pub mod config;
pub mod delay;
pub mod engine;
pub mod error;
pub mod lifecycle;
pub mod logger;
pub mod queue_sort;
pub mod routing;
pub mod sink;
pub mod store;
pub mod sync;
pub mod tasks;
pub mod voice;

// Re-exports
pub use catalog::{MenuCatalog, MenuProvider, SettingsProvider, StaticSettings};
pub use config::Config;
pub use engine::{DepartmentView, Engine, SpeechSupervisorHandle};
pub use error::{BackupError, ListenError, OrderError};
pub use logger::init_logger;
pub use sink::{LogSink, NotificationSink, TicketPrinter};
pub use store::{BackupNotice, BackupService, NoopBackup, OrderStore, StoreChanged};
pub use tasks::{BackgroundTasks, TaskKind};
pub use voice::{ListenerState, SpeechSource, SpeechSupervisor, VoiceOutcome};
