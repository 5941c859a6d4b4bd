//! Utilities shared across Hayaoshi packages.

pub mod logger;
pub mod time;
