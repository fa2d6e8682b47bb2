//! The test runner: N iterations of place marker, dispatch commands, read a
//! log window, slice the post-marker tail, extract one scalar.
//!
//! Strictly sequential by design. Command effects on physical state are
//! order-dependent, so each G-code is dispatched only after the previous one
//! is acknowledged, and iterations never overlap. Any failure aborts the
//! whole run; partially collected results are not salvaged, since an
//! incomplete sample would be statistically misleading.

use log::{debug, info};

use crate::config::HarnessConfig;
use crate::domain::test_type::TestType;
use crate::error::{MoonbenchError, Result};
use crate::moonraker::{CommandPort, GcodeStore};
use crate::runner::marker::{locate_marker, place_marker};

/// A completed (or in-progress) multi-iteration run.
#[derive(Debug, Clone)]
pub struct TestRun {
    pub test_type: TestType,
    pub iterations: u32,
    /// One scalar per completed iteration, in iteration order
    pub results: Vec<f64>,
}

/// Drives a printer through repeated iterations of one test type.
pub struct TestRunner<'a, P> {
    printer: &'a P,
    cfg: &'a HarnessConfig,
}

impl<'a, P> TestRunner<'a, P>
where
    P: CommandPort + GcodeStore,
{
    pub fn new(printer: &'a P, cfg: &'a HarnessConfig) -> Self {
        Self { printer, cfg }
    }

    /// Run `iterations` iterations of `test_type` and collect one scalar per
    /// iteration.
    pub fn run(&self, test_type: TestType, iterations: u32) -> Result<TestRun> {
        for gcode in &self.cfg.start_gcodes {
            self.printer.run_gcode(gcode)?;
        }

        let mut run = TestRun {
            test_type,
            iterations,
            results: Vec::with_capacity(iterations as usize),
        };

        let window_size = test_type.min_window();
        for iteration in 0..iterations {
            info!("iteration {}/{iterations}", iteration + 1);

            // Touch the store before fencing; nudges Moonraker to surface
            // entries still in flight from the previous iteration.
            let _ = self.printer.recent_entries(window_size)?;

            let marker = place_marker(self.printer, self.cfg)?;

            for command in test_type.commands(self.cfg) {
                self.printer.run_gcode(&command)?;
            }

            let window = self.printer.recent_entries(window_size)?;
            let marker_index = locate_marker(&marker, &window).ok_or(
                MoonbenchError::MarkerNotFound {
                    window: window_size,
                },
            )?;
            debug!("found marker at index {marker_index}");

            let tail = &window[marker_index + 1..];
            let value = test_type.extract(tail, self.cfg)?;
            println!("> Result: {value}");
            run.results.push(value);
        }

        for gcode in &self.cfg.end_gcodes {
            self.printer.run_gcode(gcode)?;
        }

        Ok(run)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::moonraker::MockPrinter;

    fn quiet_cfg() -> HarnessConfig {
        HarnessConfig {
            settle_after_marker_ms: 0,
            start_gcodes: vec!["G28".to_string()],
            ..HarnessConfig::default()
        }
    }

    const ACCURACY_LINE: &str = "// probe accuracy results: maximum 11.995491, \
        minimum 11.992991, range 0.002500, average 11.994658, median 11.995491, \
        standard deviation 0.001179";

    fn probe_responder(script: &str) -> Vec<String> {
        if script.starts_with("PROBE_ACCURACY") {
            vec!["// probe at 150.0,150.0".to_string(), ACCURACY_LINE.to_string()]
        } else {
            vec![]
        }
    }

    #[test]
    fn test_run_collects_one_result_per_iteration() {
        let printer = MockPrinter::new(probe_responder);
        let cfg = quiet_cfg();

        let run = TestRunner::new(&printer, &cfg)
            .run(TestType::ProbeAccuracy, 3)
            .unwrap();

        assert_eq!(run.results, vec![0.0025, 0.0025, 0.0025]);
        assert_eq!(run.iterations, 3);
    }

    #[test]
    fn test_run_dispatches_start_marker_commands_end() {
        let printer = MockPrinter::new(probe_responder);
        let cfg = HarnessConfig {
            end_gcodes: vec!["M84".to_string()],
            ..quiet_cfg()
        };

        TestRunner::new(&printer, &cfg)
            .run(TestType::ProbeAccuracy, 1)
            .unwrap();

        assert_eq!(
            printer.sent(),
            vec![
                "G28",
                "M117 Running Test",
                "PROBE_ACCURACY samples=3",
                "M84"
            ]
        );
    }

    #[test]
    fn test_run_aborts_with_zero_results_when_marker_never_lands() {
        let printer = MockPrinter::lossy(probe_responder);
        let cfg = quiet_cfg();

        let err = TestRunner::new(&printer, &cfg)
            .run(TestType::ProbeAccuracy, 5)
            .unwrap_err();

        assert!(matches!(err, MoonbenchError::MarkerNotFound { .. }));
    }

    #[test]
    fn test_run_marker_scrolled_out_of_window() {
        // ProbeAccuracy reads back only 10 entries; a chatty command pushes
        // the marker out of that window
        let printer = MockPrinter::new(|script| {
            if script.starts_with("PROBE_ACCURACY") {
                (0..12).map(|i| format!("// noise {i}")).collect()
            } else {
                vec![]
            }
        });
        let cfg = quiet_cfg();

        let err = TestRunner::new(&printer, &cfg)
            .run(TestType::ProbeAccuracy, 1)
            .unwrap_err();

        assert!(matches!(err, MoonbenchError::MarkerNotFound { window: 10 }));
    }

    #[test]
    fn test_run_extraction_error_propagates() {
        // Command acknowledged but the expected summary line never shows up
        let printer = MockPrinter::new(|_| vec![]);
        let cfg = quiet_cfg();

        let err = TestRunner::new(&printer, &cfg)
            .run(TestType::ProbeAccuracy, 1)
            .unwrap_err();

        assert!(matches!(
            err,
            MoonbenchError::UnexpectedMessageCount { .. }
        ));
    }

    #[test]
    fn test_tail_excludes_previous_iteration_output() {
        // Each iteration emits a decreasing retry count; last-line-wins must
        // see only the current iteration's lines
        let counter = std::cell::Cell::new(3);
        let printer = MockPrinter::new(move |script| {
            if script == "Z_TILT_ADJUST" {
                let n = counter.get();
                counter.set(n - 1);
                vec![format!("// Retries: {n}/5 Probed points range: 0.01")]
            } else {
                vec![]
            }
        });
        let cfg = quiet_cfg();

        let run = TestRunner::new(&printer, &cfg)
            .run(TestType::ZTiltAdjustNoReset, 3)
            .unwrap();

        assert_eq!(run.results, vec![3.0, 2.0, 1.0]);
    }
}
