//! Utility functions for presenting token facts.

pub mod format;

pub use format::{format_age, format_expiry};
