//! CLI command handlers

pub mod commands;

pub use commands::{analyze, digest, report_card, summary, watch};
