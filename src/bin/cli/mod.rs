//! CLI Module Organization
//!
//! - args: CLI argument structures
//! - commands: command execution over scene documents
//! - config_layer: configuration discovery and CLI overrides
//! - output: report formatting

pub mod args;
pub mod commands;
pub mod config_layer;
pub mod output;

pub use args::*;
pub use commands::*;
