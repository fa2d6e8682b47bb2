//! Scripted in-memory printer for tests.
//!
//! Appends every submitted command to an internal console log the way
//! Moonraker would, then appends whatever response lines the configured
//! responder produces for that command. `recent_entries` serves the last N
//! entries, so window-too-small behavior falls out naturally.

use std::cell::RefCell;

use crate::domain::entry::{EntryKind, GcodeEntry};
use crate::error::Result;
use crate::moonraker::client::{CommandPort, GcodeStore};

type Responder = Box<dyn Fn(&str) -> Vec<String>>;

/// In-memory stand-in for a Moonraker-connected printer.
pub struct MockPrinter {
    state: RefCell<State>,
    responder: Responder,
    /// When false, submitted commands are acknowledged but never appear in
    /// the log, like a store that drops entries faster than they are read
    record_commands: bool,
}

struct State {
    log: Vec<GcodeEntry>,
    clock: f64,
    sent: Vec<String>,
}

impl MockPrinter {
    /// A printer whose log faithfully records commands and the responder's
    /// output lines.
    pub fn new(responder: impl Fn(&str) -> Vec<String> + 'static) -> Self {
        Self {
            state: RefCell::new(State {
                log: Vec::new(),
                clock: 1_000_000.0,
                sent: Vec::new(),
            }),
            responder: Box::new(responder),
            record_commands: true,
        }
    }

    /// A printer whose log never contains submitted commands, so a marker
    /// can never be located.
    pub fn lossy(responder: impl Fn(&str) -> Vec<String> + 'static) -> Self {
        Self {
            record_commands: false,
            ..Self::new(responder)
        }
    }

    /// Every script submitted so far, in dispatch order.
    pub fn sent(&self) -> Vec<String> {
        self.state.borrow().sent.clone()
    }
}

impl CommandPort for MockPrinter {
    fn run_gcode(&self, script: &str) -> Result<()> {
        let responses = (self.responder)(script);
        let mut state = self.state.borrow_mut();
        state.sent.push(script.to_string());

        state.clock += 1.0;
        if self.record_commands {
            let time = state.clock;
            state.log.push(GcodeEntry {
                time,
                kind: EntryKind::Command,
                message: script.to_string(),
            });
        }

        for message in responses {
            state.clock += 0.001;
            let time = state.clock;
            state.log.push(GcodeEntry {
                time,
                kind: EntryKind::Response,
                message,
            });
        }
        Ok(())
    }
}

impl GcodeStore for MockPrinter {
    fn recent_entries(&self, count: usize) -> Result<Vec<GcodeEntry>> {
        let state = self.state.borrow();
        let start = state.log.len().saturating_sub(count);
        Ok(state.log[start..].to_vec())
    }
}
