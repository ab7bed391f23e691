//! Floor navigation CLI library.
//!
//! Command handlers, logging setup, terminal styling and output formatting
//! for the `floornav-cli` binary.

pub mod commands;
pub mod logging;
pub mod output;
pub mod terminal;
