//! Packaging and shipping-box rule types.
//!
//! The serde names here are a closed contract: rule sets persisted by earlier
//! versions of the assistant must deserialize against these exact field and
//! operator vocabularies. Do not rename without a migration.

use serde::{Deserialize, Serialize};

/// Which decision a rule feeds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RuleType {
    /// Packaging-type classification (e.g. "Letter", "Large Letter").
    Packaging,
    /// Shipping-box selection.
    Box,
}

/// Order fields a condition may inspect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RuleField {
    Sku,
    Quantity,
    Width,
    Weight,
    Location,
    OrderValue,
    Channel,
    ShipFromLocation,
    PackageDimension,
    ChannelType,
}

/// Comparison operators for conditions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleOperator {
    Contains,
    Equals,
    GreaterThan,
    LessThan,
    GreaterEqual,
    LessEqual,
    StartsWith,
    EndsWith,
}

/// A condition's right-hand operand: persisted as either a JSON string or a
/// JSON number, depending on how the rule was authored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ConditionValue {
    Number(f64),
    Text(String),
}

impl ConditionValue {
    /// Numeric view of the operand, when it has one. Text operands are
    /// parsed; unparseable text yields `None`.
    #[must_use]
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Self::Number(n) => Some(*n),
            Self::Text(s) => s.trim().parse::<f64>().ok(),
        }
    }

    /// String view of the operand (numbers rendered back to text).
    #[must_use]
    pub fn as_text(&self) -> String {
        match self {
            Self::Number(n) => n.to_string(),
            Self::Text(s) => s.clone(),
        }
    }
}

/// One conjunctive clause of a rule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Condition {
    pub field: RuleField,
    pub operator: RuleOperator,
    pub value: ConditionValue,
}

/// A named, prioritized decision unit.
///
/// All conditions must hold for the rule to match (logical AND). A rule with
/// zero conditions never matches, regardless of `enabled`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Rule {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub conditions: Vec<Condition>,
    pub rule_type: RuleType,
    /// Packaging type name or box name emitted on match.
    pub result_value: String,
    /// Lower value is evaluated first and wins ties.
    pub priority: i32,
    pub enabled: bool,
    /// Box rules only: hex color for the UI. Opaque to evaluation.
    #[serde(default)]
    pub color: Option<String>,
}
