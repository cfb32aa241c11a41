//! Operator CLI support
//!
//! Command implementations for the `training-docs-cli` binary. Every
//! maintenance command prints one structured JSON report to stdout so runs
//! can be archived and diffed.

pub mod commands;
pub mod error;
