//! Decide command: run the packaging and box rule engines over orders.

use std::path::Path;

use thiserror::Error;
use tracing::info;

use picklist_core::{OrderRecord, Rule, RuleType, box_color, select_result};

/// Errors that can occur while applying rules.
#[derive(Debug, Error)]
pub enum DecideError {
    /// An input file could not be read.
    #[error("Cannot read input file: {0}")]
    Io(#[from] std::io::Error),

    /// An input file is not valid JSON for its expected shape.
    #[error("Cannot parse input file: {0}")]
    Json(#[from] serde_json::Error),
}

/// Apply the rule set to each order and report both decisions.
///
/// The engine runs once per order for packaging rules and once for box
/// rules, exactly as the picking screen does per displayed order.
///
/// # Errors
///
/// Returns [`DecideError`] when either input file cannot be read or parsed.
pub fn run(orders_path: &Path, rules_path: &Path) -> Result<(), DecideError> {
    let orders: Vec<OrderRecord> = serde_json::from_str(&std::fs::read_to_string(orders_path)?)?;
    let rules: Vec<Rule> = serde_json::from_str(&std::fs::read_to_string(rules_path)?)?;

    info!(orders = orders.len(), rules = rules.len(), "applying rules");

    for order in &orders {
        let packaging = select_result(order, &rules, Some(RuleType::Packaging));
        let shipping_box = select_result(order, &rules, Some(RuleType::Box));
        let color = shipping_box
            .as_deref()
            .map(|name| box_color(&rules, name).to_string());

        info!(
            order = %order.order_number,
            sku = %order.sku,
            packaging = packaging.as_deref().unwrap_or("-"),
            shipping_box = shipping_box.as_deref().unwrap_or("-"),
            box_color = color.as_deref().unwrap_or("-"),
            "decision"
        );
    }
    Ok(())
}
