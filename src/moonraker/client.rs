//! Trait seams over the two Moonraker surfaces the harness uses.

use crate::domain::entry::GcodeEntry;
use crate::error::Result;

/// Submits a single G-code script and returns once the control plane
/// acknowledges receipt.
///
/// Acknowledgement does not mean the physical effect has completed; commands
/// are fire-and-forget with respect to hardware state. A timed-out submit is
/// fatal to the run - retrying an unacknowledged motion command could repeat
/// an unsafe physical effect.
pub trait CommandPort {
    fn run_gcode(&self, script: &str) -> Result<()>;
}

/// Read access to the append-only cached console log.
///
/// The log offers no cursor and no since-marker query: the only read is
/// "give me the last N entries", in insertion order. Other producers may
/// append concurrently; the harness never assumes exclusive access.
pub trait GcodeStore {
    /// Return up to `count` most recent entries, oldest first.
    fn recent_entries(&self, count: usize) -> Result<Vec<GcodeEntry>>;
}
