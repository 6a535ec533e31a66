//! Voice command interpreter
//!
//! Consumes normalized transcripts from the external speech-to-text
//! collaborator and resolves them to a table, an order and exactly one
//! item. One utterance completes one dish, never a whole order, so
//! sequential "next dish" workflows fall out naturally: each mutation
//! advances the first-incomplete search target, which also makes a
//! repeated final utterance harmless.

pub mod supervisor;

pub use supervisor::{ListenerState, SpeechSource, SpeechSupervisor};

use crate::routing::{Router, expand_combo};
use shared::menu::Department;
use shared::order::Order;

/// Spoken number words (operating language) replaced by digit tokens
/// before extraction.
const NUMBER_WORDS: [(&str, &str); 10] = [
    ("uno", "1"),
    ("due", "2"),
    ("tre", "3"),
    ("quattro", "4"),
    ("cinque", "5"),
    ("sei", "6"),
    ("sette", "7"),
    ("otto", "8"),
    ("nove", "9"),
    ("dieci", "10"),
];

/// Completion keywords. Fixed small set; any one of them arms the
/// utterance.
const COMPLETION_KEYWORDS: [&str; 5] = ["pronto", "pronta", "pronti", "fatto", "finito"];

/// Resolution result. Pure; applying it is the caller's business.
#[derive(Debug, Clone, PartialEq)]
pub enum VoiceOutcome {
    /// Mark exactly this item (or combo sub-part) done.
    CompleteItem {
        order_id: String,
        item_index: usize,
        sub_item_id: Option<String>,
        item_name: String,
    },
    /// No incomplete relevant item remains: promote the whole order.
    ForceReady { order_id: String },
    /// Numeric token + keyword pattern absent. No mutation.
    NoPattern,
    /// Pattern present but no active order matched the table token.
    NoMatch { table_token: String },
}

/// Resolve an utterance against a snapshot of active orders, scoped to
/// the interpreter's department.
pub fn interpret(
    utterance: &str,
    orders: &[Order],
    department: Department,
    router: &Router<'_>,
) -> VoiceOutcome {
    let tokens = normalize(utterance);

    let Some(table_token) = tokens.iter().find(|t| t.chars().all(|c| c.is_ascii_digit())) else {
        return VoiceOutcome::NoPattern;
    };
    if !tokens.iter().any(|t| COMPLETION_KEYWORDS.contains(&t.as_str())) {
        return VoiceOutcome::NoPattern;
    }

    let Some(order) = match_table(orders, table_token) else {
        return VoiceOutcome::NoMatch {
            table_token: table_token.clone(),
        };
    };

    match first_incomplete(order, department, router) {
        Some((item_index, sub_item_id, item_name)) => VoiceOutcome::CompleteItem {
            order_id: order.id.clone(),
            item_index,
            sub_item_id,
            item_name,
        },
        None => VoiceOutcome::ForceReady {
            order_id: order.id.clone(),
        },
    }
}

/// Lowercase, split on whitespace, replace spoken number words with
/// digit tokens and strip trailing punctuation.
fn normalize(utterance: &str) -> Vec<String> {
    utterance
        .split_whitespace()
        .map(|raw| {
            let token = raw
                .trim_matches(|c: char| !c.is_alphanumeric())
                .to_lowercase();
            NUMBER_WORDS
                .iter()
                .find(|(word, _)| *word == token)
                .map(|(_, digit)| digit.to_string())
                .unwrap_or(token)
        })
        .filter(|t| !t.is_empty())
        .collect()
}

/// Table resolution, in order of preference: exact match,
/// case-insensitive match, suffix-with-separator match, then a literal
/// "tavolo N" table name. First active match wins.
fn match_table<'a>(orders: &'a [Order], token: &str) -> Option<&'a Order> {
    let active: Vec<&Order> = orders.iter().filter(|o| o.is_active()).collect();

    let strategies: [&dyn Fn(&str) -> bool; 4] = [
        &|table| table == token,
        &|table| table.eq_ignore_ascii_case(token),
        &|table| {
            table
                .strip_suffix(token)
                .and_then(|head| head.chars().last())
                .map(|sep| matches!(sep, '-' | '_' | ' '))
                .unwrap_or(false)
        },
        &|table| table.to_lowercase() == format!("tavolo {token}"),
    ];

    for matches in strategies {
        if let Some(order) = active.iter().find(|o| matches(&o.table)) {
            return Some(order);
        }
    }
    None
}

/// First item relevant to the department and not yet done for it. For
/// combos this is the first missing sub-part routed here.
fn first_incomplete(
    order: &Order,
    department: Department,
    router: &Router<'_>,
) -> Option<(usize, Option<String>, String)> {
    for (index, line) in order.items.iter().enumerate() {
        if line.is_separator || !router.is_relevant(line, department) {
            continue;
        }
        if line.item.is_combo() {
            let missing = expand_combo(&line.item, router.catalog)
                .into_iter()
                .find(|sub| {
                    router.resolve_department(sub) == department
                        && !line.combo_completed_parts.contains(&sub.id)
                });
            if let Some(sub) = missing {
                return Some((index, Some(sub.id), sub.name));
            }
        } else if !line.completed {
            return Some((index, None, line.item.name.clone()));
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::MenuCatalog;
    use crate::lifecycle;
    use shared::menu::{Category, MenuItem};
    use shared::order::{OrderItem, OrderStatus};
    use shared::settings::DepartmentSettings;

    fn catalog() -> MenuCatalog {
        MenuCatalog::new(vec![
            MenuItem::new("p1", "Margherita", 7.0, Category::Pizza),
            MenuItem::new("p2", "Diavola", 8.0, Category::Pizza),
            MenuItem::new("b1", "Acqua", 1.5, Category::Bevanda),
        ])
    }

    fn order_on(catalog: &MenuCatalog, table: &str, ids: &[&str]) -> Order {
        let items = ids
            .iter()
            .map(|id| OrderItem::new(catalog.get(id).unwrap().clone(), 1))
            .collect();
        let mut order = Order::new(table, "Anna", items);
        order.status = OrderStatus::Cooking;
        order
    }

    #[test]
    fn number_words_and_punctuation_are_normalized() {
        let catalog = catalog();
        let settings = DepartmentSettings::default();
        let router = Router::new(&catalog, &settings);
        let orders = vec![order_on(&catalog, "3", &["p1"])];

        let outcome = interpret("Tavolo tre, pronto!", &orders, Department::Pizzeria, &router);
        assert!(matches!(outcome, VoiceOutcome::CompleteItem { .. }));
    }

    #[test]
    fn one_utterance_completes_exactly_one_dish_then_falls_back() {
        let catalog = catalog();
        let settings = DepartmentSettings::default();
        let router = Router::new(&catalog, &settings);
        let mut order = order_on(&catalog, "3", &["p1", "p2"]);

        // First invocation: item A only.
        let outcome = interpret("tavolo 3 pronto", &[order.clone()], Department::Pizzeria, &router);
        let VoiceOutcome::CompleteItem { item_index, item_name, .. } = outcome else {
            panic!("expected CompleteItem, got {outcome:?}");
        };
        assert_eq!((item_index, item_name.as_str()), (0, "Margherita"));
        order = lifecycle::toggle_item(&order, 0, None).unwrap();

        // Second invocation: item B.
        let outcome = interpret("tavolo 3 pronto", &[order.clone()], Department::Pizzeria, &router);
        let VoiceOutcome::CompleteItem { item_index, .. } = outcome else {
            panic!("expected CompleteItem, got {outcome:?}");
        };
        assert_eq!(item_index, 1);
        order = lifecycle::toggle_item(&order, 1, None).unwrap();

        // Third invocation: nothing left, fall back to force-ready.
        let outcome = interpret("tavolo 3 pronto", &[order.clone()], Department::Pizzeria, &router);
        assert_eq!(
            outcome,
            VoiceOutcome::ForceReady {
                order_id: order.id.clone()
            }
        );
    }

    #[test]
    fn missing_pattern_or_table_is_a_soft_failure() {
        let catalog = catalog();
        let settings = DepartmentSettings::default();
        let router = Router::new(&catalog, &settings);
        let orders = vec![order_on(&catalog, "3", &["p1"])];

        assert_eq!(
            interpret("tavolo 3", &orders, Department::Pizzeria, &router),
            VoiceOutcome::NoPattern
        );
        assert_eq!(
            interpret("pronto subito", &orders, Department::Pizzeria, &router),
            VoiceOutcome::NoPattern
        );
        assert_eq!(
            interpret("tavolo 7 pronto", &orders, Department::Pizzeria, &router),
            VoiceOutcome::NoMatch {
                table_token: "7".into()
            }
        );
    }

    #[test]
    fn table_match_preference_order() {
        let catalog = catalog();
        let settings = DepartmentSettings::default();
        let router = Router::new(&catalog, &settings);

        let suffixed = order_on(&catalog, "SALA-3", &["p1"]);
        let exact = order_on(&catalog, "3", &["p2"]);
        let orders = vec![suffixed.clone(), exact.clone()];

        // Exact beats suffix even though the suffixed order comes first.
        let outcome = interpret("tavolo 3 pronto", &orders, Department::Pizzeria, &router);
        assert!(matches!(
            outcome,
            VoiceOutcome::CompleteItem { ref order_id, .. } if *order_id == exact.id
        ));

        // Without an exact match the suffixed table is found.
        let orders = vec![suffixed.clone()];
        let outcome = interpret("tavolo 3 pronto", &orders, Department::Pizzeria, &router);
        assert!(matches!(
            outcome,
            VoiceOutcome::CompleteItem { ref order_id, .. } if *order_id == suffixed.id
        ));

        // Literal "tavolo N" table names match last.
        let named = order_on(&catalog, "Tavolo 3", &["p1"]);
        let orders = vec![named.clone()];
        let outcome = interpret("3 pronto", &orders, Department::Pizzeria, &router);
        assert!(matches!(
            outcome,
            VoiceOutcome::CompleteItem { ref order_id, .. } if *order_id == named.id
        ));
    }

    #[test]
    fn delivered_orders_are_ignored() {
        let catalog = catalog();
        let settings = DepartmentSettings::default();
        let router = Router::new(&catalog, &settings);
        let mut order = order_on(&catalog, "3", &["p1"]);
        order.status = OrderStatus::Delivered;

        assert_eq!(
            interpret("tavolo 3 pronto", &[order], Department::Pizzeria, &router),
            VoiceOutcome::NoMatch {
                table_token: "3".into()
            }
        );
    }

    #[test]
    fn foreign_department_items_are_skipped() {
        let catalog = catalog();
        let settings = DepartmentSettings::default();
        let router = Router::new(&catalog, &settings);
        let order = order_on(&catalog, "3", &["b1", "p1"]);

        let outcome = interpret("tavolo 3 pronto", &[order], Department::Pizzeria, &router);
        let VoiceOutcome::CompleteItem { item_index, .. } = outcome else {
            panic!("expected CompleteItem, got {outcome:?}");
        };
        assert_eq!(item_index, 1);
    }
}
