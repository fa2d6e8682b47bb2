//! moonbench - repeated-measurement test harness for Klipper printers
//!
//! Runs a G-code test N times through the Moonraker API, fences each
//! iteration in the cached console log with a marker command, extracts one
//! scalar per iteration from the post-marker tail, and summarizes the
//! collected values.

pub mod cli;
pub mod config;
pub mod domain;
pub mod error;
pub mod moonraker;
pub mod runner;

pub use error::{MoonbenchError, Result};
