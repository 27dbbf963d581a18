//! Picklist Core - rule evaluation, order grouping, and shared types.
//!
//! This crate is the decision-logic heart of the picking assistant:
//! - `rules` - packaging/box rule evaluation (fail-closed, priority ordered)
//! - `grouping` - merging parsed rows into logical orders
//! - `ingest` - row validation before grouping
//! - `types` - order records, rules, and structural identity keys
//!
//! # Architecture
//!
//! The core crate contains only types and pure logic - no I/O, no database
//! access. Archiving lives in `picklist-archive`; the CLI wires both.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod grouping;
pub mod ingest;
pub mod rules;
pub mod types;

pub use grouping::{OrderKind, group_rows, order_kind};
pub use ingest::{IngestError, validate_rows};
pub use rules::{
    DEFAULT_BOX_COLOR, box_color, evaluate_condition, evaluate_rule, select_result,
};
pub use types::*;
