//! Packaging and box rule evaluation.

pub mod engine;
pub mod evaluator;

pub use engine::{DEFAULT_BOX_COLOR, box_color, select_result};
pub use evaluator::{evaluate_condition, evaluate_rule};
