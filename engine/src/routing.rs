//! Department routing
//!
//! Decides which preparation station a line item belongs to and
//! whether a department is finished with it. Combo items are routed
//! through their expanded sub-items, never through the wrapper.

use crate::catalog::MenuCatalog;
use shared::menu::{Department, MenuItem};
use shared::order::{Order, OrderItem};
use shared::settings::DepartmentSettings;

/// Expand a combo into its constituent catalog entries.
///
/// Sub-item ids that no longer resolve (catalog entry deleted) are
/// dropped silently; the combo is routed as having one fewer part.
/// The result is used only for routing and visibility, never written
/// back onto the order.
pub fn expand_combo(combo: &MenuItem, catalog: &MenuCatalog) -> Vec<MenuItem> {
    combo
        .sub_item_ids
        .iter()
        .filter_map(|id| catalog.get(id).cloned())
        .collect()
}

/// Routing view over the catalog and current settings.
#[derive(Debug, Clone, Copy)]
pub struct Router<'a> {
    pub catalog: &'a MenuCatalog,
    pub settings: &'a DepartmentSettings,
}

impl<'a> Router<'a> {
    pub fn new(catalog: &'a MenuCatalog, settings: &'a DepartmentSettings) -> Self {
        Self { catalog, settings }
    }

    /// Destination for a single (non-combo-wrapper) menu item:
    /// per-item override first, then the category mapping, then the
    /// configured default.
    pub fn resolve_department(&self, item: &MenuItem) -> Department {
        item.department_override
            .unwrap_or_else(|| self.settings.destination(item.category))
    }

    /// Whether a line item concerns the given department at all.
    /// Separators are relevant everywhere; combos are relevant if any
    /// sub-item routes to the target.
    pub fn is_relevant(&self, line: &OrderItem, department: Department) -> bool {
        if line.is_separator {
            return true;
        }
        if line.item.is_combo() {
            return expand_combo(&line.item, self.catalog)
                .iter()
                .any(|sub| self.resolve_department(sub) == department);
        }
        self.resolve_department(&line.item) == department
    }

    /// Whether the department is finished with this line item.
    ///
    /// Plain items: the `completed` flag, provided the item routes to
    /// the department. Combos: every sub-item routing to the
    /// department is in `combo_completed_parts` (vacuously true when
    /// none do). Separators are never completable and never block a
    /// queue, so they count as done.
    pub fn is_fully_done_for(&self, line: &OrderItem, department: Department) -> bool {
        self.part_state(line, department, line.completed, &line.combo_completed_parts)
    }

    /// Same shape as [`Self::is_fully_done_for`] over the served flags.
    pub fn is_fully_served_for(&self, line: &OrderItem, department: Department) -> bool {
        self.part_state(line, department, line.served, &line.combo_served_parts)
    }

    fn part_state(
        &self,
        line: &OrderItem,
        department: Department,
        flag: bool,
        done_parts: &std::collections::BTreeSet<String>,
    ) -> bool {
        if line.is_separator {
            return true;
        }
        if line.item.is_combo() {
            return expand_combo(&line.item, self.catalog)
                .iter()
                .filter(|sub| self.resolve_department(sub) == department)
                .all(|sub| done_parts.contains(&sub.id));
        }
        if self.resolve_department(&line.item) != department {
            // Not this department's concern.
            return true;
        }
        flag
    }

    /// Department-scoped ticket projection: the items this station
    /// actually works, separators included. An order with no relevant
    /// dishes yields only separators and is treated as inert by views.
    pub fn ticket_items<'b>(&self, order: &'b Order, department: Department) -> Vec<&'b OrderItem> {
        order
            .items
            .iter()
            .filter(|line| self.is_relevant(line, department))
            .collect()
    }

    /// Whether every relevant item of the order is done for the
    /// department. Drives ticket hiding and the department-cleared
    /// edge in the snapshot diff.
    pub fn order_done_for(&self, order: &Order, department: Department) -> bool {
        order
            .items
            .iter()
            .filter(|line| !line.is_separator)
            .filter(|line| self.is_relevant(line, department))
            .all(|line| self.is_fully_done_for(line, department))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::menu::Category;

    fn catalog() -> MenuCatalog {
        let mut combo = MenuItem::new("c1", "Menu Pranzo", 12.5, Category::Combo);
        combo.sub_item_ids = vec!["p1".into(), "b1".into(), "ghost".into()];
        MenuCatalog::new(vec![
            MenuItem::new("p1", "Margherita", 7.0, Category::Pizza),
            MenuItem::new("b1", "Acqua", 1.5, Category::Bevanda),
            MenuItem::new("k1", "Carbonara", 9.0, Category::Primo),
            combo,
        ])
    }

    fn line(catalog: &MenuCatalog, id: &str) -> OrderItem {
        OrderItem::new(catalog.get(id).unwrap().clone(), 1)
    }

    #[test]
    fn expand_drops_unresolvable_ids() {
        let catalog = catalog();
        let expanded = expand_combo(catalog.get("c1").unwrap(), &catalog);
        let names: Vec<_> = expanded.iter().map(|i| i.id.as_str()).collect();
        assert_eq!(names, vec!["p1", "b1"]);
    }

    #[test]
    fn override_beats_category_mapping() {
        let catalog = catalog();
        let settings = DepartmentSettings::default();
        let router = Router::new(&catalog, &settings);

        let mut item = catalog.get("p1").unwrap().clone();
        assert_eq!(router.resolve_department(&item), Department::Pizzeria);
        item.department_override = Some(Department::Bar);
        assert_eq!(router.resolve_department(&item), Department::Bar);
    }

    #[test]
    fn combo_relevance_follows_sub_items() {
        let catalog = catalog();
        let settings = DepartmentSettings::default();
        let router = Router::new(&catalog, &settings);
        let combo = line(&catalog, "c1");

        assert!(router.is_relevant(&combo, Department::Pizzeria));
        assert!(router.is_relevant(&combo, Department::Bar));
        assert!(!router.is_relevant(&combo, Department::Kitchen));
    }

    #[test]
    fn separator_is_relevant_everywhere_and_always_done() {
        let catalog = catalog();
        let settings = DepartmentSettings::default();
        let router = Router::new(&catalog, &settings);
        let sep = OrderItem::separator();

        for dept in [Department::Kitchen, Department::Pizzeria, Department::Bar] {
            assert!(router.is_relevant(&sep, dept));
            assert!(router.is_fully_done_for(&sep, dept));
        }
    }

    #[test]
    fn combo_done_per_department() {
        let catalog = catalog();
        let settings = DepartmentSettings::default();
        let router = Router::new(&catalog, &settings);
        let mut combo = line(&catalog, "c1");

        // Nothing routes to Kitchen: vacuously done.
        assert!(router.is_fully_done_for(&combo, Department::Kitchen));
        assert!(!router.is_fully_done_for(&combo, Department::Pizzeria));
        assert!(!router.is_fully_done_for(&combo, Department::Bar));

        combo.combo_completed_parts.insert("p1".into());
        assert!(router.is_fully_done_for(&combo, Department::Pizzeria));
        assert!(!router.is_fully_done_for(&combo, Department::Bar));

        combo.combo_completed_parts.insert("b1".into());
        assert!(router.is_fully_done_for(&combo, Department::Bar));
    }

    #[test]
    fn served_tracking_mirrors_completion() {
        let catalog = catalog();
        let settings = DepartmentSettings::default();
        let router = Router::new(&catalog, &settings);
        let mut plain = line(&catalog, "k1");

        assert!(!router.is_fully_served_for(&plain, Department::Kitchen));
        plain.served = true;
        assert!(router.is_fully_served_for(&plain, Department::Kitchen));
        // Other departments are unconcerned.
        assert!(router.is_fully_served_for(&plain, Department::Bar));
    }

    #[test]
    fn order_done_ignores_foreign_items() {
        let catalog = catalog();
        let settings = DepartmentSettings::default();
        let router = Router::new(&catalog, &settings);

        let mut pizza = line(&catalog, "p1");
        let drink = line(&catalog, "b1");
        let order = Order::new("4", "Anna", vec![pizza.clone(), drink]);
        assert!(!router.order_done_for(&order, Department::Pizzeria));

        pizza.completed = true;
        let order = Order::new("4", "Anna", vec![pizza, line(&catalog, "b1")]);
        assert!(router.order_done_for(&order, Department::Pizzeria));
        assert!(!router.order_done_for(&order, Department::Bar));
    }

    #[test]
    fn empty_order_is_inert_for_every_department() {
        let catalog = catalog();
        let settings = DepartmentSettings::default();
        let router = Router::new(&catalog, &settings);
        let order = Order::new("9", "Anna", vec![]);

        assert!(router.ticket_items(&order, Department::Kitchen).is_empty());
        assert!(router.order_done_for(&order, Department::Kitchen));
    }
}
