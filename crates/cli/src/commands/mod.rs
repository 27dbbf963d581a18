//! CLI command implementations.

pub mod archive;
pub mod decide;
pub mod load;
