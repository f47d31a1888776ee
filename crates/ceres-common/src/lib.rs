//! Shared utilities for ceres crates.
//!
//! This crate provides the cell-value helpers used across the ceres
//! workspace, mostly `AnyValue` rendering and column presence checks.

pub mod cells;

// Re-export commonly used functions at crate root for convenience
pub use cells::{
    any_to_string, cell_text, column_texts, column_values, format_numeric, has_column,
    missing_columns, parse_i64,
};
