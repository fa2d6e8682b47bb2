//! Marker placement and location in the console log.
//!
//! The cached G-code log carries no request-correlation mechanism, so the
//! only reliable fence between "before this iteration" and "after" is a
//! uniquely recognizable no-op command injected into the log. Location uses
//! full structural equality (time + kind + message): the marker text itself
//! recurs every iteration, and only the timestamp distinguishes this
//! iteration's fence from the previous one's.

use log::debug;

use crate::config::HarnessConfig;
use crate::domain::entry::GcodeEntry;
use crate::error::{MoonbenchError, Result};
use crate::moonraker::{CommandPort, GcodeStore};

/// How many entries to read back when verifying marker placement. The marker
/// should be the newest entry; one extra covers an interleaved writer.
const PLACEMENT_WINDOW: usize = 2;

/// Submit the marker G-code and read it back from the log.
///
/// Waits the configured settle interval between submit and read; Moonraker
/// sometimes makes a just-written entry visible only to a later read. The
/// returned entry carries the server-side timestamp that makes it uniquely
/// locatable later.
pub fn place_marker<P>(printer: &P, cfg: &HarnessConfig) -> Result<GcodeEntry>
where
    P: CommandPort + GcodeStore,
{
    printer.run_gcode(&cfg.marker_gcode)?;

    let settle = cfg.settle_after_marker();
    if !settle.is_zero() {
        std::thread::sleep(settle);
    }

    let window = printer.recent_entries(PLACEMENT_WINDOW)?;
    debug!("placement window: {window:?}");

    match window.last() {
        Some(entry) if entry.is_command(&cfg.marker_gcode) => Ok(entry.clone()),
        _ => Err(MoonbenchError::MarkerNotFound {
            window: PLACEMENT_WINDOW,
        }),
    }
}

/// Index of `marker` in `window` by full structural equality, or `None`.
pub fn locate_marker(marker: &GcodeEntry, window: &[GcodeEntry]) -> Option<usize> {
    window.iter().position(|entry| entry == marker)
}
