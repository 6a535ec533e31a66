use anyhow::Result;
use comanda_engine::queue_sort::MemorySortStore;
use comanda_engine::sink::{LogPrinter, LogSink};
use comanda_engine::{
    BackgroundTasks, Config, Engine, MenuCatalog, OrderStore, StaticSettings,
    logger::init_logger_with_file,
};
use shared::menu::{Category, Department, MenuItem};
use std::sync::Arc;

#[tokio::main]
async fn main() -> Result<()> {
    // 1. Configuration and logging
    let config = Config::from_env();
    init_logger_with_file(Some(&config.log_level), config.log_dir.as_deref());

    tracing::info!("Comanda engine starting...");

    // 2. Store, catalog, settings
    let store = Arc::new(OrderStore::new());
    let catalog = MenuCatalog::new(sample_menu());
    let settings = Arc::new(StaticSettings::new(config.department_settings()));
    let engine = Arc::new(Engine::new(config, store, catalog, settings));

    // 3. One view per department, torn down together
    let mut tasks = BackgroundTasks::new();
    for department in [Department::Kitchen, Department::Pizzeria, Department::Bar] {
        engine.attach_view(
            department,
            Arc::new(LogSink),
            Arc::new(LogPrinter),
            Arc::new(MemorySortStore::default()),
            &mut tasks,
        );
    }

    tokio::signal::ctrl_c().await?;
    tracing::info!("Shutting down");
    tasks.shutdown().await;
    Ok(())
}

fn sample_menu() -> Vec<MenuItem> {
    let mut combo = MenuItem::new("combo-pranzo", "Menu Pranzo", 12.5, Category::Combo);
    combo.sub_item_ids = vec!["pizza-margherita".into(), "acqua".into()];
    vec![
        MenuItem::new("pizza-margherita", "Margherita", 7.0, Category::Pizza),
        MenuItem::new("primo-carbonara", "Carbonara", 9.0, Category::Primo),
        MenuItem::new("acqua", "Acqua Naturale", 1.5, Category::Bevanda),
        combo,
    ]
}
