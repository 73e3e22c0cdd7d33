//! Low-level building blocks for custom scans.
//!
//! These expose the pattern plan, the kernels and candidate helpers for use
//! beyond the high-level `Matcher` API.

pub use crate::candidate::nms::nms_2d;
pub use crate::candidate::topk::{Candidate, TopK};
pub use crate::kernel::scalar::{NccKernel, ReferenceKernel};
pub use crate::kernel::{Kernel, ScanParams};
pub use crate::pattern::PatternPlan;
pub use crate::search::scan::OffsetGrid;
pub use crate::stats::{mean, spread, SpreadMode, WindowStats};
