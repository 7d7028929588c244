//! Terminal dashboard for the gaming statistics summaries.
//!
//! One tab per analytical question, rendered with ratatui on a crossterm
//! backend.

pub mod app;
pub mod charts;
pub mod components;
pub mod themes;

pub use stats_core as core;
