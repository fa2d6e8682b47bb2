//! Core domain types: log entries, test types, and result summaries.

pub mod entry;
pub mod extract;
pub mod summary;
pub mod test_type;

pub use entry::{EntryKind, GcodeEntry};
pub use summary::{Summary, summarize, write_values};
pub use test_type::TestType;
