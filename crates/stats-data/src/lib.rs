//! Data layer for the gaming statistics workspace.
//!
//! Reads the per-platform CSV exports, resolves their divergent column
//! names, merges prices onto games, cleans the union and computes the
//! summary tables behind each dashboard question.

pub mod aggregator;
pub mod columns;
pub mod pipeline;
pub mod reader;
pub mod tables;

pub use stats_core as core;
