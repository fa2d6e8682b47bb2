//! Cached G-code console entries as Moonraker returns them.
//!
//! The `gcode_store` endpoint hands back the most recent console lines in
//! insertion order, commands and responses interleaved. Entries are compared
//! by the full (time, kind, message) tuple: the same message text recurs
//! across iterations, so text alone cannot identify the marker placed in
//! *this* iteration.

use serde::{Deserialize, Serialize};

/// One entry from Moonraker's cached G-code console log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GcodeEntry {
    /// Server-side timestamp, seconds since the epoch
    pub time: f64,

    /// Whether the entry is a submitted command or printer output
    #[serde(rename = "type")]
    pub kind: EntryKind,

    /// Raw console text
    pub message: String,
}

/// Origin of a console entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    /// A G-code line submitted to the printer
    Command,
    /// A line the printer wrote back
    Response,
}

impl GcodeEntry {
    /// True if this entry is the submitted command `script`.
    ///
    /// Matches message text and kind only; used when verifying marker
    /// placement, where the timestamp is not yet known.
    pub fn is_command(&self, script: &str) -> bool {
        self.kind == EntryKind::Command && self.message == script
    }
}
