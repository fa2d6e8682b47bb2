//! Iteration orchestration: marker placement and the per-iteration
//! place -> dispatch -> read -> locate -> slice -> extract cycle.

pub mod harness;
pub mod marker;

pub use harness::{TestRun, TestRunner};
