//! Candidate selection and pruning utilities.
//!
//! Includes best-of and Top-K collection plus spatial non-maximum
//! suppression.

pub(crate) mod nms;
pub(crate) mod topk;
