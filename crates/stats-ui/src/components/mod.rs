//! Small line-oriented widgets shared by the question views.

pub mod bar;
pub mod header;
