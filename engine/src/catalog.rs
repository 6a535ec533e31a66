//! Menu catalog and settings provider seams
//!
//! The engine never owns dish definitions or routing settings; it
//! reads them through these traits and keeps an indexed copy of the
//! menu for id lookups during combo expansion.

use parking_lot::RwLock;
use shared::menu::MenuItem;
use shared::settings::DepartmentSettings;
use std::collections::HashMap;
use std::sync::Arc;

/// Read-only menu source, refreshed on demand.
pub trait MenuProvider: Send + Sync {
    fn menu_items(&self) -> Vec<MenuItem>;
}

/// Read-only settings source. Mutated elsewhere; observed here.
pub trait SettingsProvider: Send + Sync {
    fn settings(&self) -> DepartmentSettings;
}

/// Indexed menu lookup for combo expansion and routing.
#[derive(Debug, Clone, Default)]
pub struct MenuCatalog {
    by_id: HashMap<String, MenuItem>,
}

impl MenuCatalog {
    pub fn new(items: Vec<MenuItem>) -> Self {
        let by_id = items.into_iter().map(|i| (i.id.clone(), i)).collect();
        Self { by_id }
    }

    pub fn from_provider(provider: &dyn MenuProvider) -> Self {
        Self::new(provider.menu_items())
    }

    pub fn get(&self, id: &str) -> Option<&MenuItem> {
        self.by_id.get(id)
    }

    pub fn len(&self) -> usize {
        self.by_id.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }
}

/// Settings provider backed by a shared value, swappable at runtime.
#[derive(Debug, Clone, Default)]
pub struct StaticSettings {
    inner: Arc<RwLock<DepartmentSettings>>,
}

impl StaticSettings {
    pub fn new(settings: DepartmentSettings) -> Self {
        Self {
            inner: Arc::new(RwLock::new(settings)),
        }
    }

    /// Replace the settings value (observed by the next read).
    pub fn replace(&self, settings: DepartmentSettings) {
        *self.inner.write() = settings;
    }
}

impl SettingsProvider for StaticSettings {
    fn settings(&self) -> DepartmentSettings {
        self.inner.read().clone()
    }
}
