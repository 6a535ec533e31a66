//! Engine facade
//!
//! Wires the store, catalog, settings and collaborators together and
//! exposes the operations the waiter pad, ticket boards and voice
//! channel invoke. Each open view is a [`DepartmentView`] driven by
//! two background tasks: a listener on the store's change channel and
//! a periodic tick for lingering expiry and delay escalation.

use crate::catalog::{MenuCatalog, MenuProvider, SettingsProvider};
use crate::config::Config;
use crate::delay::{DelayBand, DelayMonitor, table_reference};
use crate::error::OrderError;
use crate::lifecycle;
use crate::queue_sort::{SortStore, merge_sorted};
use crate::routing::Router;
use crate::sink::{NotificationSink, TicketPrinter};
use crate::store::OrderStore;
use crate::sync::{LingeringSet, diff_snapshots};
use crate::tasks::{BackgroundTasks, TaskKind};
use crate::voice::{self, SpeechSource, SpeechSupervisor, VoiceOutcome};
use parking_lot::{Mutex, RwLock};
use shared::event::{Notice, NoticeKind, SyncEvent};
use shared::menu::Department;
use shared::order::{Order, OrderItem};
use shared::settings::DepartmentSettings;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;

/// How often views re-check timers.
const TICK_INTERVAL: Duration = Duration::from_secs(5);

/// Shared engine state.
pub struct Engine {
    config: Config,
    store: Arc<OrderStore>,
    catalog: RwLock<MenuCatalog>,
    settings: Arc<dyn SettingsProvider>,
}

impl Engine {
    pub fn new(
        config: Config,
        store: Arc<OrderStore>,
        catalog: MenuCatalog,
        settings: Arc<dyn SettingsProvider>,
    ) -> Self {
        Self {
            config,
            store,
            catalog: RwLock::new(catalog),
            settings,
        }
    }

    pub fn store(&self) -> &Arc<OrderStore> {
        &self.store
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Re-pull the menu from its provider.
    pub fn refresh_menu(&self, provider: &dyn MenuProvider) {
        let catalog = MenuCatalog::from_provider(provider);
        tracing::info!(items = catalog.len(), "menu catalog refreshed");
        *self.catalog.write() = catalog;
    }

    /// Snapshot of the routing inputs. Settings may change between
    /// calls; each evaluation takes a consistent pair.
    pub fn routing_parts(&self) -> (MenuCatalog, DepartmentSettings) {
        (self.catalog.read().clone(), self.settings.settings())
    }

    /// Submit a waiter cart: merge into the table's active order or
    /// open a new Pending one.
    pub fn submit_cart(
        &self,
        table: &str,
        waiter: &str,
        items: Vec<OrderItem>,
    ) -> Result<Order, OrderError> {
        self.store.submit_cart(table, waiter, items)
    }

    pub fn start(&self, order_id: &str) -> Result<Order, OrderError> {
        self.mutate(order_id, lifecycle::start)
    }

    pub fn force_ready(&self, order_id: &str) -> Result<Order, OrderError> {
        self.mutate(order_id, lifecycle::force_ready)
    }

    /// Ready → Delivered. Table release is the caller's business.
    pub fn deliver(&self, order_id: &str) -> Result<Order, OrderError> {
        self.mutate(order_id, lifecycle::deliver)
    }

    pub fn toggle_item(
        &self,
        order_id: &str,
        item_index: usize,
        sub_item_id: Option<&str>,
    ) -> Result<Order, OrderError> {
        self.mutate(order_id, |order| {
            lifecycle::toggle_item(order, item_index, sub_item_id)
        })
    }

    pub fn mark_served(
        &self,
        order_id: &str,
        item_index: usize,
        sub_item_id: Option<&str>,
    ) -> Result<Order, OrderError> {
        self.mutate(order_id, |order| {
            lifecycle::mark_served(order, item_index, sub_item_id)
        })
    }

    fn mutate(
        &self,
        order_id: &str,
        f: impl FnOnce(&Order) -> Result<Order, OrderError>,
    ) -> Result<Order, OrderError> {
        let order = self
            .store
            .get(order_id)
            .ok_or_else(|| OrderError::OrderNotFound(order_id.to_string()))?;
        let next = f(&order)?;
        self.store.write(next.clone());
        Ok(next)
    }

    /// Table-view wait: elapsed minutes and band measured from the
    /// oldest still-active order on the table. `None` for tables with
    /// no active orders.
    pub fn table_delay(&self, table: &str, now: i64) -> Option<(i64, DelayBand)> {
        let orders = self.store.active_orders();
        let reference = table_reference(&orders, table)?;
        let elapsed_minutes = (now - reference) / 60_000;
        let monitor = DelayMonitor::new(
            self.config.delay_warning_minutes,
            self.config.delay_critical_minutes,
        );
        Some((elapsed_minutes, monitor.classify(elapsed_minutes)))
    }

    /// Resolve one utterance and apply at most one action. Soft
    /// failures come back as voice-fail notices; nothing raises.
    pub fn apply_voice(&self, utterance: &str, department: Department, sink: &dyn NotificationSink) {
        let (catalog, settings) = self.routing_parts();
        let router = Router::new(&catalog, &settings);
        let orders = self.store.active_orders();

        match voice::interpret(utterance, &orders, department, &router) {
            VoiceOutcome::CompleteItem {
                order_id,
                item_index,
                sub_item_id,
                item_name,
            } => match self.toggle_item(&order_id, item_index, sub_item_id.as_deref()) {
                Ok(order) => sink.notify(Notice::new(
                    NoticeKind::VoiceAck,
                    department,
                    format!("{} pronto (tavolo {})", item_name, order.table),
                )),
                Err(error) => {
                    tracing::warn!(order_id = %order_id, error = %error, "voice toggle failed");
                    sink.notify(Notice::new(NoticeKind::VoiceFail, department, error.to_string()));
                }
            },
            VoiceOutcome::ForceReady { order_id } => match self.force_ready(&order_id) {
                Ok(order) => sink.notify(Notice::new(
                    NoticeKind::VoiceAck,
                    department,
                    format!("Ordine tavolo {} pronto", order.table),
                )),
                Err(error) => sink.notify(Notice::new(
                    NoticeKind::VoiceFail,
                    department,
                    error.to_string(),
                )),
            },
            VoiceOutcome::NoPattern => sink.notify(Notice::new(
                NoticeKind::VoiceFail,
                department,
                "comando non riconosciuto",
            )),
            VoiceOutcome::NoMatch { table_token } => sink.notify(Notice::new(
                NoticeKind::VoiceFail,
                department,
                format!("nessun ordine per il tavolo {table_token}"),
            )),
        }
    }

    /// Mount a department view: a listener on the change channel plus
    /// a periodic timer, both cancelled by the task manager on
    /// teardown.
    pub fn attach_view(
        self: &Arc<Self>,
        department: Department,
        sink: Arc<dyn NotificationSink>,
        printer: Arc<dyn TicketPrinter>,
        sort_store: Arc<dyn SortStore>,
        tasks: &mut BackgroundTasks,
    ) -> Arc<Mutex<DepartmentView>> {
        let view = Arc::new(Mutex::new(DepartmentView::new(
            department,
            &self.config,
            sink,
            printer,
            Arc::clone(&sort_store),
        )));

        // Prime the baseline so mounting does not replay history.
        view.lock().previous = self.store.read_all();
        view.lock().sort_sequence = sort_store.load(department);

        let engine = Arc::clone(self);
        let listener_view = Arc::clone(&view);
        let mut changes = self.store.subscribe();
        let token = tasks.shutdown_token();
        tasks.spawn("view_listener", TaskKind::Listener, async move {
            loop {
                tokio::select! {
                    _ = token.cancelled() => return,
                    changed = changes.recv() => {
                        if changed.is_err() && !matches!(changed, Err(tokio::sync::broadcast::error::RecvError::Lagged(_))) {
                            return;
                        }
                        let (catalog, settings) = engine.routing_parts();
                        let router = Router::new(&catalog, &settings);
                        let current = engine.store.read_all();
                        let now = chrono::Utc::now().timestamp_millis();
                        listener_view.lock().handle_change(current, &router, now);
                    }
                }
            }
        });

        let tick_view = Arc::clone(&view);
        let token = tasks.shutdown_token();
        tasks.spawn("view_tick", TaskKind::Periodic, async move {
            let mut interval = tokio::time::interval(TICK_INTERVAL);
            loop {
                tokio::select! {
                    _ = token.cancelled() => return,
                    _ = interval.tick() => {
                        let now = chrono::Utc::now().timestamp_millis();
                        tick_view.lock().handle_tick(now);
                    }
                }
            }
        });

        view
    }

    /// Mount the voice channel for a department: the supervised speech
    /// source feeds transcripts into `apply_voice`.
    pub fn attach_voice<S>(
        self: &Arc<Self>,
        department: Department,
        source: S,
        sink: Arc<dyn NotificationSink>,
        tasks: &mut BackgroundTasks,
    ) -> SpeechSupervisorHandle
    where
        S: SpeechSource + 'static,
    {
        let supervisor = SpeechSupervisor::new(source);
        let handle = SpeechSupervisorHandle {
            enabled: supervisor.enabled_flag(),
            state: supervisor.state(),
        };

        let (tx, mut rx) = mpsc::channel::<String>(32);
        let token = tasks.shutdown_token();
        tasks.spawn("speech_supervisor", TaskKind::Listener, async move {
            supervisor.run(tx, token).await;
        });

        let engine = Arc::clone(self);
        let token = tasks.shutdown_token();
        tasks.spawn("voice_worker", TaskKind::Worker, async move {
            loop {
                tokio::select! {
                    _ = token.cancelled() => return,
                    transcript = rx.recv() => {
                        let Some(transcript) = transcript else { return };
                        engine.apply_voice(&transcript, department, sink.as_ref());
                    }
                }
            }
        });

        handle
    }
}

impl std::fmt::Debug for Engine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Engine")
            .field("orders", &self.store.read_all().len())
            .finish()
    }
}

/// Control handle for a mounted voice channel.
pub struct SpeechSupervisorHandle {
    pub enabled: Arc<std::sync::atomic::AtomicBool>,
    pub state: tokio::sync::watch::Receiver<crate::voice::ListenerState>,
}

impl SpeechSupervisorHandle {
    /// User-initiated stop. The source is never restarted afterwards.
    pub fn stop(&self) {
        self.enabled.store(false, std::sync::atomic::Ordering::SeqCst);
    }
}

/// One open consumer view, scoped to a department.
///
/// Owns the previous snapshot, the lingering set, the delay monitor
/// and the manual sort sequence. All derived state is local; the view
/// never writes to the store.
pub struct DepartmentView {
    department: Department,
    sink: Arc<dyn NotificationSink>,
    printer: Arc<dyn TicketPrinter>,
    sort_store: Arc<dyn SortStore>,
    previous: Vec<Order>,
    lingering: LingeringSet,
    delay: DelayMonitor,
    sort_sequence: Vec<String>,
}

impl DepartmentView {
    pub fn new(
        department: Department,
        config: &Config,
        sink: Arc<dyn NotificationSink>,
        printer: Arc<dyn TicketPrinter>,
        sort_store: Arc<dyn SortStore>,
    ) -> Self {
        Self {
            department,
            sink,
            printer,
            sort_store,
            previous: Vec::new(),
            lingering: LingeringSet::new(config.lingering_millis()),
            delay: DelayMonitor::new(config.delay_warning_minutes, config.delay_critical_minutes),
            sort_sequence: Vec::new(),
        }
    }

    pub fn department(&self) -> Department {
        self.department
    }

    /// React to a store change: diff against the previous snapshot,
    /// fan side effects out to the collaborators, update lingering.
    pub fn handle_change(&mut self, current: Vec<Order>, router: &Router<'_>, now: i64) {
        let events = diff_snapshots(&self.previous, &current, self.department, router);

        for event in &events {
            match event {
                SyncEvent::NewOrder { order_id, table } => {
                    self.sink.notify(Notice::new(
                        NoticeKind::NewOrder,
                        self.department,
                        format!("Nuovo ordine tavolo {table}"),
                    ));
                    // Print gating follows the live settings snapshot,
                    // not a copy taken at mount time.
                    if router.settings.print_enabled
                        && let Some(order) = current.iter().find(|o| &o.id == order_id)
                    {
                        let items: Vec<_> = router
                            .ticket_items(order, self.department)
                            .into_iter()
                            .cloned()
                            .collect();
                        self.printer
                            .print_ticket(self.department, table, &order.waiter, &items);
                    }
                }
                SyncEvent::ItemDone { item_name, table, .. } => {
                    self.sink.notify(Notice::new(
                        NoticeKind::ItemReady,
                        self.department,
                        format!("{item_name} pronto (tavolo {table})"),
                    ));
                }
                SyncEvent::OrderReady { table, .. } => {
                    self.sink.notify(Notice::new(
                        NoticeKind::OrderReady,
                        self.department,
                        format!("Ordine tavolo {table} pronto"),
                    ));
                }
                SyncEvent::OrderDelivered { order_id, table } => {
                    self.sink.notify(Notice::new(
                        NoticeKind::OrderDelivered,
                        self.department,
                        format!("Ordine tavolo {table} consegnato"),
                    ));
                    self.lingering.insert(order_id, now);
                }
                SyncEvent::DeptCleared { order_id, .. } => {
                    self.lingering.insert(order_id, now);
                }
            }
        }

        self.previous = current;
    }

    /// Periodic re-check: purge expired lingering entries and run the
    /// delay classifier over the visible queue.
    pub fn handle_tick(&mut self, now: i64) {
        for order_id in self.lingering.purge(now) {
            tracing::debug!(order_id = %order_id, "lingering window elapsed");
        }

        let watched: Vec<Order> = self
            .previous
            .iter()
            .filter(|o| o.is_active())
            .cloned()
            .collect();
        for event in self.delay.tick(&watched, now, |o| o.timestamp) {
            let kind = match event.band {
                DelayBand::Critical => NoticeKind::DelayCritical,
                _ => NoticeKind::DelayWarning,
            };
            self.sink.notify(Notice::new(
                kind,
                self.department,
                format!(
                    "Tavolo {} in attesa da {} minuti",
                    event.table, event.elapsed_minutes
                ),
            ));
        }
    }

    /// The tickets this department should display right now: active
    /// orders with unfinished relevant work, plus lingering ones, in
    /// the manually adjusted sequence.
    pub fn visible_tickets(&self, router: &Router<'_>) -> Vec<Order> {
        let candidates: Vec<Order> = self
            .previous
            .iter()
            .filter(|order| {
                let workable = order.is_active()
                    && router
                        .ticket_items(order, self.department)
                        .iter()
                        .any(|line| !line.is_separator)
                    && !router.order_done_for(order, self.department);
                workable || self.lingering.contains(&order.id)
            })
            .cloned()
            .collect();

        let sequence = merge_sorted(&self.sort_sequence, &candidates);
        let mut by_id: std::collections::HashMap<String, Order> = candidates
            .into_iter()
            .map(|o| (o.id.clone(), o))
            .collect();
        sequence.into_iter().filter_map(|id| by_id.remove(&id)).collect()
    }

    /// Manual drag-reorder: persist the full resulting sequence.
    pub fn reorder(&mut self, order_ids: Vec<String>) {
        self.sort_store.save(self.department, &order_ids);
        self.sort_sequence = order_ids;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::StaticSettings;
    use crate::queue_sort::MemorySortStore;
    use shared::menu::{Category, MenuItem};
    use shared::order::OrderStatus;

    #[derive(Default)]
    struct RecordingSink {
        notices: Mutex<Vec<Notice>>,
    }

    impl NotificationSink for RecordingSink {
        fn notify(&self, notice: Notice) {
            self.notices.lock().push(notice);
        }
    }

    #[derive(Default)]
    struct RecordingPrinter {
        tickets: Mutex<Vec<(Department, String, usize)>>,
    }

    impl TicketPrinter for RecordingPrinter {
        fn print_ticket(
            &self,
            department: Department,
            table: &str,
            _waiter: &str,
            items: &[OrderItem],
        ) {
            self.tickets
                .lock()
                .push((department, table.to_string(), items.len()));
        }
    }

    fn catalog() -> MenuCatalog {
        MenuCatalog::new(vec![
            MenuItem::new("p1", "Margherita", 7.0, Category::Pizza),
            MenuItem::new("b1", "Acqua", 1.5, Category::Bevanda),
        ])
    }

    fn test_engine(print_enabled: bool) -> Arc<Engine> {
        test_engine_with_settings(print_enabled).0
    }

    fn test_engine_with_settings(print_enabled: bool) -> (Arc<Engine>, Arc<StaticSettings>) {
        let settings = Arc::new(StaticSettings::new(DepartmentSettings {
            print_enabled,
            ..DepartmentSettings::default()
        }));
        let engine = Arc::new(Engine::new(
            Config::default(),
            Arc::new(OrderStore::new()),
            catalog(),
            Arc::clone(&settings) as Arc<dyn SettingsProvider>,
        ));
        (engine, settings)
    }

    fn cart(catalog: &MenuCatalog, ids: &[&str]) -> Vec<OrderItem> {
        ids.iter()
            .map(|id| OrderItem::new(catalog.get(id).unwrap().clone(), 1))
            .collect()
    }

    #[test]
    fn lifecycle_operations_write_through_the_store() {
        let engine = test_engine(false);
        let (catalog, _) = engine.routing_parts();
        let order = engine.submit_cart("3", "Anna", cart(&catalog, &["p1"])).unwrap();

        engine.start(&order.id).unwrap();
        assert_eq!(engine.store().get(&order.id).unwrap().status, OrderStatus::Cooking);

        engine.force_ready(&order.id).unwrap();
        let ready = engine.store().get(&order.id).unwrap();
        assert_eq!(ready.status, OrderStatus::Ready);
        assert!(ready.items[0].completed);

        engine.deliver(&order.id).unwrap();
        assert_eq!(engine.store().get(&order.id).unwrap().status, OrderStatus::Delivered);

        assert!(matches!(
            engine.start("missing"),
            Err(OrderError::OrderNotFound(_))
        ));
    }

    #[test]
    fn table_delay_tracks_oldest_active_order() {
        let engine = test_engine(false);
        let (catalog, _) = engine.routing_parts();
        let mut order = engine.submit_cart("3", "Anna", cart(&catalog, &["p1"])).unwrap();
        order.created_at = 0;
        order.timestamp = 0;
        engine.store().write(order.clone());

        let (elapsed, band) = engine.table_delay("3", 30 * 60_000).unwrap();
        assert_eq!(elapsed, 30);
        assert_eq!(band, DelayBand::Critical);
        assert!(engine.table_delay("9", 30 * 60_000).is_none());

        // Delivered orders stop counting against the table.
        engine.start(&order.id).unwrap();
        engine.force_ready(&order.id).unwrap();
        engine.deliver(&order.id).unwrap();
        assert!(engine.table_delay("3", 30 * 60_000).is_none());
    }

    #[test]
    fn voice_applies_one_action_and_acknowledges() {
        let engine = test_engine(false);
        let sink = RecordingSink::default();
        let (catalog, _) = engine.routing_parts();
        let order = engine
            .submit_cart("3", "Anna", cart(&catalog, &["p1", "b1"]))
            .unwrap();
        engine.start(&order.id).unwrap();

        engine.apply_voice("tavolo 3 pronto", Department::Pizzeria, &sink);

        let stored = engine.store().get(&order.id).unwrap();
        assert!(stored.items[0].completed);
        assert!(!stored.items[1].completed);
        assert_eq!(sink.notices.lock()[0].kind, NoticeKind::VoiceAck);

        // Pizzeria work is gone; next utterance promotes the order.
        engine.apply_voice("tavolo 3 pronto", Department::Pizzeria, &sink);
        assert_eq!(
            engine.store().get(&order.id).unwrap().status,
            OrderStatus::Ready
        );

        engine.apply_voice("tavolo 9 pronto", Department::Pizzeria, &sink);
        assert_eq!(sink.notices.lock().last().unwrap().kind, NoticeKind::VoiceFail);
    }

    #[test]
    fn view_diffs_print_and_linger() {
        let engine = test_engine(true);
        let sink = Arc::new(RecordingSink::default());
        let printer = Arc::new(RecordingPrinter::default());
        let sort_store = Arc::new(MemorySortStore::default());
        let mut view = DepartmentView::new(
            Department::Pizzeria,
            engine.config(),
            Arc::clone(&sink) as Arc<dyn NotificationSink>,
            Arc::clone(&printer) as Arc<dyn TicketPrinter>,
            sort_store,
        );

        let (catalog, settings) = engine.routing_parts();
        let router = Router::new(&catalog, &settings);

        let order = engine.submit_cart("3", "Anna", cart(&catalog, &["p1"])).unwrap();
        view.handle_change(engine.store().read_all(), &router, 0);

        // New order: notice + auto-print with the relevant subset only.
        assert_eq!(sink.notices.lock()[0].kind, NoticeKind::NewOrder);
        assert_eq!(printer.tickets.lock().as_slice(), &[(Department::Pizzeria, "3".to_string(), 1)]);
        assert_eq!(view.visible_tickets(&router).len(), 1);

        // Finish the pizzeria item: the ticket hides but lingers.
        engine.start(&order.id).unwrap();
        engine.toggle_item(&order.id, 0, None).unwrap();
        view.handle_change(engine.store().read_all(), &router, 1_000);
        assert!(view.lingering.contains(&order.id));
        assert_eq!(view.visible_tickets(&router).len(), 1);

        // After the lingering window the ticket disappears.
        view.handle_tick(1_000 + engine.config().lingering_millis());
        assert_eq!(view.visible_tickets(&router).len(), 0);
    }

    #[test]
    fn print_gating_follows_settings_changes() {
        let (engine, settings) = test_engine_with_settings(false);
        let printer = Arc::new(RecordingPrinter::default());
        let mut view = DepartmentView::new(
            Department::Pizzeria,
            engine.config(),
            Arc::new(RecordingSink::default()),
            Arc::clone(&printer) as Arc<dyn TicketPrinter>,
            Arc::new(MemorySortStore::default()),
        );

        let (catalog, current) = engine.routing_parts();
        engine.submit_cart("1", "Anna", cart(&catalog, &["p1"])).unwrap();
        view.handle_change(engine.store().read_all(), &Router::new(&catalog, &current), 0);
        assert!(printer.tickets.lock().is_empty());

        // Printing switched on elsewhere; the next notification sees it
        // without remounting the view.
        settings.replace(DepartmentSettings {
            print_enabled: true,
            ..DepartmentSettings::default()
        });
        let (catalog, current) = engine.routing_parts();
        engine.submit_cart("2", "Anna", cart(&catalog, &["p1"])).unwrap();
        view.handle_change(engine.store().read_all(), &Router::new(&catalog, &current), 0);
        assert_eq!(printer.tickets.lock().as_slice(), &[(Department::Pizzeria, "2".to_string(), 1)]);
    }

    #[test]
    fn delivered_orders_linger_in_active_views() {
        let engine = test_engine(false);
        let sink = Arc::new(RecordingSink::default());
        let printer = Arc::new(RecordingPrinter::default());
        let mut view = DepartmentView::new(
            Department::Pizzeria,
            engine.config(),
            Arc::clone(&sink) as Arc<dyn NotificationSink>,
            printer,
            Arc::new(MemorySortStore::default()),
        );

        let (catalog, settings) = engine.routing_parts();
        let router = Router::new(&catalog, &settings);

        let order = engine.submit_cart("3", "Anna", cart(&catalog, &["p1"])).unwrap();
        view.handle_change(engine.store().read_all(), &router, 0);

        engine.start(&order.id).unwrap();
        engine.force_ready(&order.id).unwrap();
        engine.deliver(&order.id).unwrap();
        view.handle_change(engine.store().read_all(), &router, 10_000);

        let kinds: Vec<NoticeKind> = sink.notices.lock().iter().map(|n| n.kind).collect();
        assert!(kinds.contains(&NoticeKind::OrderReady));
        assert!(kinds.contains(&NoticeKind::OrderDelivered));

        // Visible for exactly the lingering window after Delivered.
        assert_eq!(view.visible_tickets(&router).len(), 1);
        view.handle_tick(10_000 + engine.config().lingering_millis() - 1);
        assert_eq!(view.visible_tickets(&router).len(), 1);
        view.handle_tick(10_000 + engine.config().lingering_millis());
        assert!(view.visible_tickets(&router).is_empty());
    }

    #[test]
    fn foreign_orders_never_surface_or_linger() {
        let engine = test_engine(false);
        let sink = Arc::new(RecordingSink::default());
        let mut view = DepartmentView::new(
            Department::Pizzeria,
            engine.config(),
            Arc::clone(&sink) as Arc<dyn NotificationSink>,
            Arc::new(RecordingPrinter::default()),
            Arc::new(MemorySortStore::default()),
        );

        let (catalog, settings) = engine.routing_parts();
        let router = Router::new(&catalog, &settings);

        // Bar-only order runs its whole lifecycle; the pizzeria view
        // stays silent and shows nothing, lingering included.
        let order = engine.submit_cart("3", "Anna", cart(&catalog, &["b1"])).unwrap();
        view.handle_change(engine.store().read_all(), &router, 0);
        engine.start(&order.id).unwrap();
        engine.force_ready(&order.id).unwrap();
        engine.deliver(&order.id).unwrap();
        view.handle_change(engine.store().read_all(), &router, 1_000);

        assert!(sink.notices.lock().is_empty());
        assert!(!view.lingering.contains(&order.id));
        assert!(view.visible_tickets(&router).is_empty());
    }

    #[test]
    fn manual_reorder_is_persisted_and_applied() {
        let engine = test_engine(false);
        let sort_store = Arc::new(MemorySortStore::default());
        let mut view = DepartmentView::new(
            Department::Pizzeria,
            engine.config(),
            Arc::new(RecordingSink::default()),
            Arc::new(RecordingPrinter::default()),
            Arc::clone(&sort_store) as Arc<dyn SortStore>,
        );

        let (catalog, settings) = engine.routing_parts();
        let router = Router::new(&catalog, &settings);
        let a = engine.submit_cart("1", "Anna", cart(&catalog, &["p1"])).unwrap();
        let b = engine.submit_cart("2", "Anna", cart(&catalog, &["p1"])).unwrap();
        view.handle_change(engine.store().read_all(), &router, 0);

        view.reorder(vec![b.id.clone(), a.id.clone()]);
        let visible: Vec<String> = view
            .visible_tickets(&router)
            .into_iter()
            .map(|o| o.id)
            .collect();
        assert_eq!(visible, vec![b.id.clone(), a.id.clone()]);
        assert_eq!(sort_store.load(Department::Pizzeria), vec![b.id, a.id]);
    }

    #[tokio::test]
    async fn attached_views_react_to_writes_and_shut_down_cleanly() {
        let engine = test_engine(false);
        let sink = Arc::new(RecordingSink::default());
        let mut tasks = BackgroundTasks::new();

        let view = engine.attach_view(
            Department::Pizzeria,
            Arc::clone(&sink) as Arc<dyn NotificationSink>,
            Arc::new(RecordingPrinter::default()),
            Arc::new(MemorySortStore::default()),
            &mut tasks,
        );
        assert_eq!(tasks.len(), 2);

        let (catalog, _) = engine.routing_parts();
        engine.submit_cart("3", "Anna", cart(&catalog, &["p1"])).unwrap();

        // Let the listener drain the change tick.
        tokio::time::sleep(Duration::from_millis(50)).await;
        assert_eq!(view.lock().previous.len(), 1);
        assert_eq!(sink.notices.lock()[0].kind, NoticeKind::NewOrder);

        tasks.shutdown().await;
    }
}
