//! Department settings
//!
//! Typed configuration for category-to-department routing. Mutated
//! outside the engine; the engine only reads it through the
//! `SettingsProvider` seam.

use crate::menu::{Category, Department};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Routing configuration for a venue.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DepartmentSettings {
    /// Category → department destinations
    pub category_destinations: HashMap<Category, Department>,
    /// Destination for categories with no explicit mapping
    pub default_department: Department,
    /// Whether new tickets trigger the print collaborator
    #[serde(default)]
    pub print_enabled: bool,
}

impl DepartmentSettings {
    /// Destination for a category, falling back to the default.
    pub fn destination(&self, category: Category) -> Department {
        self.category_destinations
            .get(&category)
            .copied()
            .unwrap_or(self.default_department)
    }
}

impl Default for DepartmentSettings {
    fn default() -> Self {
        let mut category_destinations = HashMap::new();
        category_destinations.insert(Category::Antipasto, Department::Kitchen);
        category_destinations.insert(Category::Primo, Department::Kitchen);
        category_destinations.insert(Category::Secondo, Department::Kitchen);
        category_destinations.insert(Category::Contorno, Department::Kitchen);
        category_destinations.insert(Category::Pizza, Department::Pizzeria);
        category_destinations.insert(Category::Bevanda, Department::Bar);
        category_destinations.insert(Category::Dessert, Department::Kitchen);
        Self {
            category_destinations,
            default_department: Department::Kitchen,
            print_enabled: false,
        }
    }
}
