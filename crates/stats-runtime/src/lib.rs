//! Runtime services for the gaming statistics workspace.
//!
//! Dataset location and the memoizing [`PipelineContext`](context::PipelineContext).

pub mod context;
pub mod dataset;
