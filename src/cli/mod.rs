//! CLI module for moonbench - command-line interface.
//!
//! A flat argument surface: positional printer address plus flags selecting
//! the test type, iteration count, and output handling.

pub mod commands;

pub use commands::Cli;
