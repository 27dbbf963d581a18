//! Core types for Picklist.
//!
//! Shared row/record shapes, structural identity keys, and the persisted
//! rule vocabulary.

pub mod key;
pub mod order;
pub mod rule;

pub use key::{ArchiveKey, GroupKey};
pub use order::{OrderRecord, RawRow, normalize_postcode};
pub use rule::{Condition, ConditionValue, Rule, RuleField, RuleOperator, RuleType};
