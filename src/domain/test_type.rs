//! The closed set of supported test types.
//!
//! Each variant pairs the G-code sequence it dispatches with the extraction
//! logic that reduces the resulting console tail to one scalar, plus the
//! minimum log window that must be read back to still contain this
//! iteration's marker. Windows were chosen empirically against real printers
//! to exceed the line count the test's commands produce.

use clap::ValueEnum;
use log::info;
use rand::Rng;

use crate::config::HarnessConfig;
use crate::domain::entry::GcodeEntry;
use crate::domain::extract;
use crate::error::Result;

/// One category of repeatable printer measurement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum TestType {
    /// PROBE_ACCURACY with a few samples; measures probe repeatability
    ProbeAccuracy,
    /// Z_TILT_ADJUST with the bed left as the previous iteration ended
    ZTiltAdjustNoReset,
    /// Z_TILT_ADJUST after deliberately tilting one Z stepper a fixed amount
    ZTiltAdjustMoved,
    /// Z_TILT_ADJUST after tilting by a random distance within the
    /// configured range
    ZTiltAdjustMovedRandomized,
    /// QUAD_GANTRY_LEVEL with no intentional disturbance
    Qgl,
    /// QUAD_GANTRY_LEVEL after a fixed disturbance
    QglMoved,
    /// QUAD_GANTRY_LEVEL after a randomized disturbance
    QglMovedRandomized,
    /// Difference between two independently homed Z references (IDEX with a
    /// shared Z endstop)
    GetZOffset,
    /// Absolute Z stepper position after homing
    ZPosition,
}

impl TestType {
    /// Minimum number of log entries to read back per iteration.
    ///
    /// Leveling runs probe 3-5 points per location with up to 4 retries, so
    /// their windows are far larger than the probe test's.
    pub fn min_window(self) -> usize {
        match self {
            TestType::ProbeAccuracy => 10,
            TestType::ZTiltAdjustNoReset => 75,
            TestType::ZTiltAdjustMoved => 150,
            TestType::ZTiltAdjustMovedRandomized => 200,
            TestType::Qgl => 200,
            TestType::QglMoved => 200,
            TestType::QglMovedRandomized => 200,
            TestType::GetZOffset => 200,
            TestType::ZPosition => 200,
        }
    }

    /// Build the ordered G-code sequence for one iteration.
    ///
    /// Randomized variants draw a fresh move distance on every call, so each
    /// iteration disturbs the bed differently.
    pub fn commands(self, cfg: &HarnessConfig) -> Vec<String> {
        match self {
            TestType::ProbeAccuracy => vec!["PROBE_ACCURACY samples=3".to_string()],
            TestType::ZTiltAdjustNoReset => vec!["Z_TILT_ADJUST".to_string()],
            TestType::ZTiltAdjustMoved => vec![force_move(2.0), "Z_TILT_ADJUST".to_string()],
            TestType::ZTiltAdjustMovedRandomized => {
                vec![force_move(random_distance(cfg)), "Z_TILT_ADJUST".to_string()]
            }
            TestType::Qgl => vec!["QUAD_GANTRY_LEVEL".to_string()],
            TestType::QglMoved => vec![force_move(2.0), "QUAD_GANTRY_LEVEL".to_string()],
            TestType::QglMovedRandomized => {
                vec![force_move(random_distance(cfg)), "QUAD_GANTRY_LEVEL".to_string()]
            }
            TestType::GetZOffset => vec!["GET_Z_OFFSET".to_string()],
            TestType::ZPosition => vec![
                "G28 Z".to_string(),
                "M400".to_string(),
                "GET_POSITION".to_string(),
            ],
        }
    }

    /// Reduce the post-marker tail to this iteration's scalar.
    pub fn extract(self, tail: &[GcodeEntry], cfg: &HarnessConfig) -> Result<f64> {
        match self {
            TestType::ProbeAccuracy => extract::probe_accuracy_range(tail),
            TestType::ZTiltAdjustNoReset
            | TestType::ZTiltAdjustMoved
            | TestType::ZTiltAdjustMovedRandomized
            | TestType::Qgl
            | TestType::QglMoved
            | TestType::QglMovedRandomized => extract::final_retry_count(tail),
            TestType::GetZOffset => extract::stepper_z_offset(tail, cfg.microstep_size_mm),
            TestType::ZPosition => extract::stepper_z_position(tail, cfg.microstep_size_mm),
        }
    }
}

impl std::fmt::Display for TestType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // ValueEnum already defines the kebab-case CLI name; reuse it
        let value = self.to_possible_value().expect("no skipped variants");
        f.write_str(value.get_name())
    }
}

fn force_move(distance_mm: f64) -> String {
    format!("FORCE_MOVE STEPPER=stepper_z DISTANCE={distance_mm:.3} VELOCITY=40")
}

fn random_distance(cfg: &HarnessConfig) -> f64 {
    let distance = rand::rng().random_range(cfg.random_move_min_mm..=cfg.random_move_max_mm);
    info!("using random move distance: {distance:.3}");
    distance
}
