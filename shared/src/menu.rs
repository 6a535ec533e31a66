//! Menu catalog types
//!
//! `MenuItem` is the catalog-side definition of a dish. Orders embed a
//! copy of the item at submit time, never a live reference, so later
//! catalog edits do not rewrite history.

use serde::{Deserialize, Serialize};

/// A physical preparation station that owns a subset of the menu.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Department {
    #[default]
    Kitchen,
    Pizzeria,
    Bar,
}

impl std::fmt::Display for Department {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Department::Kitchen => write!(f, "KITCHEN"),
            Department::Pizzeria => write!(f, "PIZZERIA"),
            Department::Bar => write!(f, "BAR"),
        }
    }
}

/// Dish category. Fixed set; department routing maps categories to
/// departments via [`crate::settings::DepartmentSettings`].
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Category {
    Antipasto,
    Primo,
    Secondo,
    Contorno,
    Pizza,
    Dessert,
    Bevanda,
    /// Composite item whose `sub_item_ids` reference other catalog entries.
    Combo,
}

/// Catalog entry for a dish.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MenuItem {
    /// Catalog ID
    pub id: String,
    /// Display name
    pub name: String,
    /// Unit price
    pub price: f64,
    /// Category
    pub category: Category,
    /// Sub-item catalog IDs (non-empty only for `Category::Combo`)
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub sub_item_ids: Vec<String>,
    /// Per-item routing override, takes precedence over the category mapping
    #[serde(skip_serializing_if = "Option::is_none")]
    pub department_override: Option<Department>,
}

impl MenuItem {
    pub fn new(id: impl Into<String>, name: impl Into<String>, price: f64, category: Category) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            price,
            category,
            sub_item_ids: Vec::new(),
            department_override: None,
        }
    }

    /// Whether this entry is a combo with trackable sub-parts.
    pub fn is_combo(&self) -> bool {
        self.category == Category::Combo && !self.sub_item_ids.is_empty()
    }
}
