//! `listing-ops` library crate.
//!
//! The binary is a thin wrapper around this library so that:
//!
//! - verification rules are testable without a live document store
//! - each utility (audit, verify, cleanup, monitor) stays a small module

pub mod app;
pub mod audit;
pub mod cleanup;
pub mod cli;
pub mod config;
pub mod domain;
pub mod error;
pub mod io;
pub mod monitor;
pub mod report;
pub mod store;
pub mod telemetry;
pub mod verify;
