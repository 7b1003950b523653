//! Foundational data structures, error types, palettes and the notebook tree.

pub mod error;
pub mod models;
pub mod notebook;
pub mod palette;
