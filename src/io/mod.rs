//! Local file output.
//!
//! - verification results as JSON (`export`)

pub mod export;

pub use export::*;
