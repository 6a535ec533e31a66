//! Queue sort persistence
//!
//! Departments drag tickets into a manual order. The saved sequence is
//! merged with whatever is live: saved ids keep their relative
//! position (filtered to orders still present), newcomers are appended
//! in timestamp order. A manual reorder replaces the whole sequence.

use shared::menu::Department;
use shared::order::Order;
use std::collections::HashSet;

/// Abstract keyed store for per-department display sequences.
pub trait SortStore: Send + Sync {
    fn load(&self, department: Department) -> Vec<String>;
    fn save(&self, department: Department, order_ids: &[String]);
}

/// Merge the saved manual sequence with the live queue.
pub fn merge_sorted(saved_ids: &[String], live: &[Order]) -> Vec<String> {
    let live_ids: HashSet<&str> = live.iter().map(|o| o.id.as_str()).collect();

    let mut merged: Vec<String> = saved_ids
        .iter()
        .filter(|id| live_ids.contains(id.as_str()))
        .cloned()
        .collect();

    let placed: HashSet<&str> = merged.iter().map(String::as_str).collect();
    let mut newcomers: Vec<&Order> = live
        .iter()
        .filter(|o| !placed.contains(o.id.as_str()))
        .collect();
    newcomers.sort_by_key(|o| (o.timestamp, o.id.clone()));
    merged.extend(newcomers.into_iter().map(|o| o.id.clone()));

    merged
}

/// In-memory sort store, for tests and single-process deployments.
#[derive(Debug, Default)]
pub struct MemorySortStore {
    sequences: parking_lot::RwLock<std::collections::HashMap<Department, Vec<String>>>,
}

impl SortStore for MemorySortStore {
    fn load(&self, department: Department) -> Vec<String> {
        self.sequences
            .read()
            .get(&department)
            .cloned()
            .unwrap_or_default()
    }

    fn save(&self, department: Department, order_ids: &[String]) {
        self.sequences
            .write()
            .insert(department, order_ids.to_vec());
    }
}
