//! Per-test-type extraction of one scalar from a post-marker tail.
//!
//! Each function embodies the console format knowledge of one category of
//! Klipper output, plus the fixed reduction policy for collapsing multiple
//! matching lines into a single value. A matching line whose numeric field
//! fails to parse is a fatal error, never skipped: dropping a point would
//! corrupt the statistical sample downstream.

use log::debug;

use crate::domain::entry::GcodeEntry;
use crate::domain::summary::median;
use crate::error::{MoonbenchError, Result};

/// Extract the `range` field from each `PROBE_ACCURACY` summary line and
/// reduce to the median.
///
/// Sample line:
/// `// probe accuracy results: maximum 11.995491, minimum 11.992991,
/// range 0.002500, average 11.994658, median 11.995491, standard deviation
/// 0.001179`
///
/// The median guards against a stray repeated summary in the tail.
pub fn probe_accuracy_range(tail: &[GcodeEntry]) -> Result<f64> {
    let lines: Vec<&str> = tail
        .iter()
        .map(|e| e.message.as_str())
        .filter(|m| m.contains("probe accuracy results"))
        .collect();
    debug!("probe accuracy lines: {lines:?}");

    if lines.is_empty() {
        return Err(MoonbenchError::UnexpectedMessageCount {
            expected: 1,
            found: 0,
        });
    }

    let mut values = Vec::with_capacity(lines.len());
    for line in lines {
        values.push(parse_field_after(line, "range ")?);
    }
    Ok(median(&values))
}

/// Extract the retry count `a` from each `Retries: a/b` line and reduce to
/// the last value.
///
/// Sample line:
/// `// Retries: 0/3 Probed points range: 0.005000 tolerance: 0.010000`
///
/// Leveling emits one such line per attempt; the final line reflects
/// convergence, so last-value wins.
pub fn final_retry_count(tail: &[GcodeEntry]) -> Result<f64> {
    let lines: Vec<&str> = tail
        .iter()
        .map(|e| e.message.as_str())
        .filter(|m| m.contains("Retries:"))
        .collect();
    debug!("retry lines: {lines:?}");

    let mut retries = Vec::with_capacity(lines.len());
    for line in &lines {
        retries.push(parse_retries(line)?);
    }
    match retries.last() {
        Some(&last) => Ok(f64::from(last)),
        None => Err(MoonbenchError::UnexpectedMessageCount {
            expected: 1,
            found: 0,
        }),
    }
}

/// Extract `stepper_z` microstep counts from `GET_POSITION` status lines and
/// reduce to the difference of the two readings, scaled to millimeters.
///
/// Sample line:
/// `mcu: dual_carriage:-1 stepper_y:102 stepper_z:-11329 stepper_z1:-11329`
///
/// Exactly two lines are required: one per independently homed reference.
pub fn stepper_z_offset(tail: &[GcodeEntry], microstep_size_mm: f64) -> Result<f64> {
    let positions = stepper_z_counts(tail, 2)?;
    Ok(f64::from(positions[0] - positions[1]) * microstep_size_mm)
}

/// Extract the single `stepper_z` microstep count from a `GET_POSITION`
/// status line, scaled to millimeters.
pub fn stepper_z_position(tail: &[GcodeEntry], microstep_size_mm: f64) -> Result<f64> {
    let positions = stepper_z_counts(tail, 1)?;
    Ok(f64::from(positions[0]) * microstep_size_mm)
}

/// Collect `stepper_z` counts from every `mcu: ` line, requiring exactly
/// `expected` matches.
fn stepper_z_counts(tail: &[GcodeEntry], expected: usize) -> Result<Vec<i32>> {
    let lines: Vec<&str> = tail
        .iter()
        .map(|e| e.message.as_str())
        .filter(|m| m.contains("mcu: "))
        .collect();
    debug!("position lines: {lines:?}");

    if lines.len() != expected {
        return Err(MoonbenchError::UnexpectedMessageCount {
            expected,
            found: lines.len(),
        });
    }

    lines.iter().map(|line| parse_stepper_z(line)).collect()
}

/// Parse the float immediately following `field` in `line`, stopping at the
/// next comma.
fn parse_field_after(line: &str, field: &'static str) -> Result<f64> {
    let malformed = || MoonbenchError::MalformedLogLine {
        field: field.trim_end(),
        line: line.to_string(),
    };

    let rest = line.split(field).nth(1).ok_or_else(malformed)?;
    let number = rest.split(',').next().unwrap_or(rest).trim();
    number.parse().map_err(|_| malformed())
}

/// Parse the `a` of `Retries: a/b`.
fn parse_retries(line: &str) -> Result<i32> {
    let malformed = || MoonbenchError::MalformedLogLine {
        field: "Retries",
        line: line.to_string(),
    };

    let rest = line.split("Retries:").nth(1).ok_or_else(malformed)?;
    let count = rest.split('/').next().unwrap_or(rest).trim();
    count.parse().map_err(|_| malformed())
}

/// Parse the signed microstep count of `stepper_z:<count>`.
fn parse_stepper_z(line: &str) -> Result<i32> {
    let malformed = || MoonbenchError::MalformedLogLine {
        field: "stepper_z",
        line: line.to_string(),
    };

    let rest = line.split("stepper_z:").nth(1).ok_or_else(malformed)?;
    let count = rest.split_whitespace().next().ok_or_else(malformed)?;
    count.parse().map_err(|_| malformed())
}
