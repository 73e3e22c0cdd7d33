//! Pattern storage and planning utilities.

mod plan;

pub use plan::PatternPlan;
