//! Reporting utilities: formatted terminal output for each utility.

pub mod format;

pub use format::*;
