//! Moonraker API access: command submission and the cached G-code log.
//!
//! The two remote surfaces the harness depends on are expressed as traits so
//! the runner can be exercised against a scripted in-memory printer.

pub mod client;
pub mod http;
pub mod mock;

pub use client::{CommandPort, GcodeStore};
pub use http::MoonrakerClient;
pub use mock::MockPrinter;
