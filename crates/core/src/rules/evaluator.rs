//! Condition and rule evaluation.
//!
//! Evaluation is total and fail-closed: a missing field, an unparseable
//! number, or an empty condition list all resolve to "no match". Nothing in
//! this module can fail or panic, which keeps rule display recomputation safe
//! to run on every order change.

use rust_decimal::prelude::ToPrimitive;

use crate::types::order::OrderRecord;
use crate::types::rule::{Condition, Rule, RuleField, RuleOperator};

/// Typed view of one order field, as seen by the evaluator.
#[derive(Debug, Clone, PartialEq)]
enum FieldValue<'a> {
    Text(&'a str),
    Number(f64),
    /// The order has no value for this field; every operator fails.
    Missing,
}

/// Look up the condition field on an order.
///
/// Fields the record models as `Option` report [`FieldValue::Missing`] when
/// unset. The accessor is exhaustive over [`RuleField`], so a new field
/// variant forces a decision here rather than silently reading nothing.
fn field_value<'a>(order: &'a OrderRecord, field: RuleField) -> FieldValue<'a> {
    match field {
        RuleField::Sku => FieldValue::Text(&order.sku),
        RuleField::Quantity => FieldValue::Number(f64::from(order.quantity)),
        RuleField::Width => order.width.map_or(FieldValue::Missing, FieldValue::Number),
        RuleField::Weight => order.weight.map_or(FieldValue::Missing, FieldValue::Number),
        RuleField::Location => FieldValue::Text(&order.location),
        RuleField::OrderValue => order
            .order_value
            .as_ref()
            .and_then(ToPrimitive::to_f64)
            .map_or(FieldValue::Missing, FieldValue::Number),
        RuleField::Channel => order
            .channel
            .as_deref()
            .map_or(FieldValue::Missing, FieldValue::Text),
        RuleField::ShipFromLocation => order
            .ship_from_location
            .as_deref()
            .map_or(FieldValue::Missing, FieldValue::Text),
        RuleField::PackageDimension => order
            .package_dimension
            .as_deref()
            .map_or(FieldValue::Missing, FieldValue::Text),
        RuleField::ChannelType => order
            .channel_type
            .as_deref()
            .map_or(FieldValue::Missing, FieldValue::Text),
    }
}

impl FieldValue<'_> {
    fn as_number(&self) -> Option<f64> {
        match self {
            Self::Number(n) => Some(*n),
            Self::Text(s) => s.trim().parse::<f64>().ok(),
            Self::Missing => None,
        }
    }

    fn as_text(&self) -> Option<String> {
        match self {
            Self::Text(s) => Some((*s).to_string()),
            Self::Number(n) => Some(n.to_string()),
            Self::Missing => None,
        }
    }
}

/// Evaluate a single condition against an order. Never fails.
#[must_use]
pub fn evaluate_condition(order: &OrderRecord, condition: &Condition) -> bool {
    let value = field_value(order, condition.field);
    if matches!(value, FieldValue::Missing) {
        return false;
    }

    match condition.operator {
        RuleOperator::Contains => string_test(&value, condition, |hay, needle| hay.contains(needle)),
        RuleOperator::StartsWith => {
            string_test(&value, condition, |hay, needle| hay.starts_with(needle))
        }
        RuleOperator::EndsWith => {
            string_test(&value, condition, |hay, needle| hay.ends_with(needle))
        }
        RuleOperator::Equals => match (value.as_number(), condition.value.as_number()) {
            // Both sides numeric: numeric equality.
            #[allow(clippy::float_cmp)]
            (Some(a), Some(b)) => a == b,
            _ => string_test(&value, condition, |a, b| a == b),
        },
        RuleOperator::GreaterThan => numeric_test(&value, condition, |a, b| a > b),
        RuleOperator::LessThan => numeric_test(&value, condition, |a, b| a < b),
        RuleOperator::GreaterEqual => numeric_test(&value, condition, |a, b| a >= b),
        RuleOperator::LessEqual => numeric_test(&value, condition, |a, b| a <= b),
    }
}

/// Case-insensitive string comparison; both sides coerced to lowercased text.
fn string_test(
    value: &FieldValue<'_>,
    condition: &Condition,
    test: impl Fn(&str, &str) -> bool,
) -> bool {
    value.as_text().is_some_and(|actual| {
        test(
            &actual.to_lowercase(),
            &condition.value.as_text().to_lowercase(),
        )
    })
}

/// Numeric comparison; either side failing to coerce means no match.
fn numeric_test(
    value: &FieldValue<'_>,
    condition: &Condition,
    test: impl Fn(f64, f64) -> bool,
) -> bool {
    match (value.as_number(), condition.value.as_number()) {
        (Some(a), Some(b)) if !a.is_nan() && !b.is_nan() => test(a, b),
        _ => false,
    }
}

/// Evaluate a whole rule: disabled rules and rules with no conditions never
/// match; otherwise every condition must hold.
#[must_use]
pub fn evaluate_rule(order: &OrderRecord, rule: &Rule) -> bool {
    if !rule.enabled || rule.conditions.is_empty() {
        return false;
    }
    rule.conditions
        .iter()
        .all(|condition| evaluate_condition(order, condition))
}
