//! Shared utilities

pub mod color;
pub mod time;
