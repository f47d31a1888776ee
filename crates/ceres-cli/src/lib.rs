//! CLI library components for ceres.

pub mod logging;
pub mod pipeline;
