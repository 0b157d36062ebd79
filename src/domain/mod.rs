//! Domain types used throughout the utilities.
//!
//! This module defines:
//!
//! - decoded store records (`ListingRecord`, `BatchStatus`)
//! - verification outcomes (`ValidationResult`, `Issue`)

pub mod types;

pub use types::*;
