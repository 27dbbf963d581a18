//! Rule selection: first matching rule by ascending priority.
//!
//! The rule list is re-sorted on every call rather than kept sorted. Rule
//! sets are tens of entries, so the O(n log n) per-display cost is noise next
//! to keeping a sorted invariant correct across every save path.

use tracing::debug;

use crate::rules::evaluator::evaluate_rule;
use crate::types::order::OrderRecord;
use crate::types::rule::{Rule, RuleType};

/// Color used when a matched box name has no enabled rule carrying a color.
pub const DEFAULT_BOX_COLOR: &str = "#3B82F6";

/// Pick the result of the highest-precedence matching rule.
///
/// Rules are filtered to `enabled` (and to `rule_type` when one is given),
/// stably sorted ascending by priority, and evaluated in order; the first
/// match wins. Ties on priority keep their original relative order, so which
/// of two equal-priority matching rules wins is deterministic. Returns `None`
/// when nothing matches.
#[must_use]
pub fn select_result(
    order: &OrderRecord,
    rules: &[Rule],
    rule_type: Option<RuleType>,
) -> Option<String> {
    let mut candidates: Vec<&Rule> = rules
        .iter()
        .filter(|rule| rule.enabled && rule_type.is_none_or(|t| rule.rule_type == t))
        .collect();
    // Stable sort: equal priorities keep list order, which decides ties.
    candidates.sort_by_key(|rule| rule.priority);

    for rule in candidates {
        if evaluate_rule(order, rule) {
            debug!(
                rule = %rule.name,
                priority = rule.priority,
                result = %rule.result_value,
                "rule matched"
            );
            return Some(rule.result_value.clone());
        }
    }
    None
}

/// Resolve the display color for a matched box name.
///
/// Deliberately looks up the first *enabled* box rule whose `result_value`
/// equals the matched name, not the rule that actually matched: when several
/// box rules share a result value, the first one's color wins. Downstream UI
/// behavior depends on this lookup, so it is preserved as-is.
#[must_use]
pub fn box_color<'a>(rules: &'a [Rule], matched_name: &str) -> &'a str {
    rules
        .iter()
        .filter(|rule| rule.enabled && rule.rule_type == RuleType::Box)
        .find(|rule| rule.result_value == matched_name)
        .and_then(|rule| rule.color.as_deref())
        .unwrap_or(DEFAULT_BOX_COLOR)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::rule::{Condition, ConditionValue, RuleField, RuleOperator};

    fn order(quantity: u32) -> OrderRecord {
        OrderRecord {
            order_number: "100".to_string(),
            customer_name: "J Smith".to_string(),
            sku: "X".to_string(),
            quantity,
            location: String::new(),
            buyer_postcode: String::new(),
            image_url: None,
            item_name: None,
            remaining_stock: None,
            order_value: None,
            file_date: None,
            channel_type: None,
            channel: None,
            width: None,
            weight: None,
            ship_from_location: None,
            package_dimension: None,
            notes: None,
            completed: false,
        }
    }

    fn quantity_rule(
        id: &str,
        operator: RuleOperator,
        value: f64,
        priority: i32,
        result: &str,
    ) -> Rule {
        Rule {
            id: id.to_string(),
            name: id.to_string(),
            description: None,
            conditions: vec![Condition {
                field: RuleField::Quantity,
                operator,
                value: ConditionValue::Number(value),
            }],
            rule_type: RuleType::Packaging,
            result_value: result.to_string(),
            priority,
            enabled: true,
            color: None,
        }
    }

    #[test]
    fn test_lower_priority_value_wins() {
        // Both rules match a quantity of 1; B has the lower priority value.
        let a = quantity_rule("a", RuleOperator::LessEqual, 5.0, 10, "Box");
        let b = quantity_rule("b", RuleOperator::LessEqual, 1.0, 5, "Letter");
        let result = select_result(&order(1), &[a, b], Some(RuleType::Packaging));
        assert_eq!(result.as_deref(), Some("Letter"));
    }

    #[test]
    fn test_first_match_wins_letter_vs_box_scenario() {
        let a = quantity_rule("a", RuleOperator::GreaterThan, 1.0, 10, "Box");
        let b = quantity_rule("b", RuleOperator::LessEqual, 1.0, 5, "Letter");
        let rules = vec![a, b];

        assert_eq!(
            select_result(&order(1), &rules, Some(RuleType::Packaging)).as_deref(),
            Some("Letter")
        );
        assert_eq!(
            select_result(&order(5), &rules, Some(RuleType::Packaging)).as_deref(),
            Some("Box")
        );
    }

    #[test]
    fn test_equal_priority_keeps_list_order() {
        let first = quantity_rule("first", RuleOperator::GreaterEqual, 0.0, 5, "First");
        let second = quantity_rule("second", RuleOperator::GreaterEqual, 0.0, 5, "Second");
        let result = select_result(&order(2), &[first, second], None);
        assert_eq!(result.as_deref(), Some("First"));
    }

    #[test]
    fn test_disabled_and_wrong_type_rules_are_skipped() {
        let mut disabled = quantity_rule("d", RuleOperator::GreaterEqual, 0.0, 1, "Disabled");
        disabled.enabled = false;
        let mut box_rule = quantity_rule("box", RuleOperator::GreaterEqual, 0.0, 2, "BoxOnly");
        box_rule.rule_type = RuleType::Box;
        let packaging = quantity_rule("p", RuleOperator::GreaterEqual, 0.0, 3, "Packaging");

        let result = select_result(
            &order(1),
            &[disabled, box_rule, packaging],
            Some(RuleType::Packaging),
        );
        assert_eq!(result.as_deref(), Some("Packaging"));
    }

    #[test]
    fn test_empty_conditions_rule_cannot_win() {
        let mut empty = quantity_rule("empty", RuleOperator::GreaterEqual, 0.0, 1, "Empty");
        empty.conditions.clear();
        let fallback = quantity_rule("f", RuleOperator::GreaterEqual, 0.0, 2, "Fallback");

        let result = select_result(&order(1), &[empty, fallback], None);
        assert_eq!(result.as_deref(), Some("Fallback"));
    }

    #[test]
    fn test_no_match_returns_none() {
        let a = quantity_rule("a", RuleOperator::GreaterThan, 100.0, 1, "Never");
        assert_eq!(select_result(&order(1), &[a], None), None);
        assert_eq!(select_result(&order(1), &[], None), None);
    }

    #[test]
    fn test_box_color_first_enabled_rule_with_name_wins() {
        let mut shared_a = quantity_rule("a", RuleOperator::GreaterThan, 50.0, 1, "Big Box");
        shared_a.rule_type = RuleType::Box;
        shared_a.color = Some("#111111".to_string());
        let mut shared_b = quantity_rule("b", RuleOperator::GreaterThan, 0.0, 2, "Big Box");
        shared_b.rule_type = RuleType::Box;
        shared_b.color = Some("#222222".to_string());
        let rules = vec![shared_a, shared_b];

        // Rule b is the one that actually matches a quantity of 1, but rule
        // a's color is returned because it appears first with that name.
        assert_eq!(
            select_result(&order(1), &rules, Some(RuleType::Box)).as_deref(),
            Some("Big Box")
        );
        assert_eq!(box_color(&rules, "Big Box"), "#111111");
    }

    #[test]
    fn test_box_color_defaults_when_unknown() {
        assert_eq!(box_color(&[], "Nowhere"), DEFAULT_BOX_COLOR);
    }
}
