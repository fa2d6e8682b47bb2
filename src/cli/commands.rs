//! CLI argument definitions using clap.

use clap::Parser;
use std::path::PathBuf;

use crate::config::Config;
use crate::domain::TestType;
use crate::error::Result;

/// Run an automated, multi-iteration Klipper test via Moonraker
#[derive(Parser, Debug)]
#[command(name = "moonbench")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Printer address, whether IP or zeroconf - something like
    /// mainsailos.local
    pub printer: String,

    /// Test type to run
    #[arg(long, value_enum, default_value_t = TestType::ProbeAccuracy)]
    pub test_type: TestType,

    /// Number of test iterations
    #[arg(long, default_value_t = 1)]
    pub iterations: u32,

    /// Use more-verbose debug output
    #[arg(short, long)]
    pub verbose: bool,

    /// Show summary statistics after the run
    #[arg(long)]
    pub stats: bool,

    /// Write the raw result list as JSON when the run completes
    #[arg(long)]
    pub output: bool,

    /// Path at which to write output data
    #[arg(long, default_value = "results.json")]
    pub output_path: PathBuf,

    /// When jittering a leveling test, minimum move distance in mm
    /// (overrides config)
    #[arg(long)]
    pub random_move_min: Option<f64>,

    /// When jittering a leveling test, maximum move distance in mm
    /// (overrides config)
    #[arg(long)]
    pub random_move_max: Option<f64>,

    /// Quoted JSON list of G-codes to run before the first iteration
    /// (overrides config)
    #[arg(long)]
    pub start_gcodes: Option<String>,

    /// Quoted JSON list of G-codes to run after the last iteration
    /// (overrides config)
    #[arg(long)]
    pub end_gcodes: Option<String>,

    /// Optional config file path
    #[arg(short, long)]
    pub config: Option<PathBuf>,
}

impl Cli {
    /// Fold command-line overrides into a loaded config.
    pub fn apply_overrides(&self, config: &mut Config) -> Result<()> {
        if let Some(min) = self.random_move_min {
            config.harness.random_move_min_mm = min;
        }
        if let Some(max) = self.random_move_max {
            config.harness.random_move_max_mm = max;
        }
        if let Some(gcodes) = &self.start_gcodes {
            config.harness.start_gcodes = serde_json::from_str(gcodes)?;
        }
        if let Some(gcodes) = &self.end_gcodes {
            config.harness.end_gcodes = serde_json::from_str(gcodes)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_minimal_invocation() {
        let cli = Cli::try_parse_from(["moonbench", "mainsailos.local"]).unwrap();
        assert_eq!(cli.printer, "mainsailos.local");
        assert_eq!(cli.test_type, TestType::ProbeAccuracy);
        assert_eq!(cli.iterations, 1);
        assert!(!cli.verbose);
        assert!(!cli.stats);
        assert!(!cli.output);
        assert_eq!(cli.output_path, PathBuf::from("results.json"));
        assert!(cli.config.is_none());
    }

    #[test]
    fn test_cli_requires_printer() {
        assert!(Cli::try_parse_from(["moonbench"]).is_err());
    }

    #[test]
    fn test_cli_test_type_values() {
        let cli = Cli::try_parse_from([
            "moonbench",
            "printer.local",
            "--test-type",
            "z-tilt-adjust-moved-randomized",
        ])
        .unwrap();
        assert_eq!(cli.test_type, TestType::ZTiltAdjustMovedRandomized);

        let cli =
            Cli::try_parse_from(["moonbench", "printer.local", "--test-type", "qgl"]).unwrap();
        assert_eq!(cli.test_type, TestType::Qgl);

        assert!(
            Cli::try_parse_from(["moonbench", "printer.local", "--test-type", "bogus"]).is_err()
        );
    }

    #[test]
    fn test_cli_iterations_and_flags() {
        let cli = Cli::try_parse_from([
            "moonbench",
            "printer.local",
            "--iterations",
            "25",
            "--stats",
            "--output",
            "--output-path",
            "probe.json",
            "-v",
        ])
        .unwrap();
        assert_eq!(cli.iterations, 25);
        assert!(cli.stats);
        assert!(cli.output);
        assert!(cli.verbose);
        assert_eq!(cli.output_path, PathBuf::from("probe.json"));
    }

    #[test]
    fn test_cli_config_option() {
        let cli =
            Cli::try_parse_from(["moonbench", "printer.local", "-c", "/path/to/config.yml"])
                .unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("/path/to/config.yml")));
    }

    #[test]
    fn test_apply_overrides_move_range() {
        let cli = Cli::try_parse_from([
            "moonbench",
            "printer.local",
            "--random-move-min",
            "1.5",
            "--random-move-max",
            "3.5",
        ])
        .unwrap();

        let mut config = Config::default();
        cli.apply_overrides(&mut config).unwrap();
        assert_eq!(config.harness.random_move_min_mm, 1.5);
        assert_eq!(config.harness.random_move_max_mm, 3.5);
    }

    #[test]
    fn test_apply_overrides_gcode_lists() {
        let cli = Cli::try_parse_from([
            "moonbench",
            "printer.local",
            "--start-gcodes",
            r#"["G28", "Z_TILT_ADJUST"]"#,
            "--end-gcodes",
            r#"["M84"]"#,
        ])
        .unwrap();

        let mut config = Config::default();
        cli.apply_overrides(&mut config).unwrap();
        assert_eq!(
            config.harness.start_gcodes,
            vec!["G28".to_string(), "Z_TILT_ADJUST".to_string()]
        );
        assert_eq!(config.harness.end_gcodes, vec!["M84".to_string()]);
    }

    #[test]
    fn test_apply_overrides_rejects_bad_json() {
        let cli = Cli::try_parse_from([
            "moonbench",
            "printer.local",
            "--start-gcodes",
            "not json",
        ])
        .unwrap();

        let mut config = Config::default();
        assert!(cli.apply_overrides(&mut config).is_err());
    }

    #[test]
    fn test_apply_overrides_leaves_config_untouched_by_default() {
        let cli = Cli::try_parse_from(["moonbench", "printer.local"]).unwrap();
        let mut config = Config::default();
        cli.apply_overrides(&mut config).unwrap();
        assert_eq!(config.harness.start_gcodes, vec!["G28".to_string()]);
        assert_eq!(config.harness.random_move_min_mm, 2.0);
    }

    #[test]
    fn test_help_works() {
        // Verify help doesn't panic
        Cli::command().debug_assert();
    }

    #[test]
    fn test_version_flag() {
        let result = Cli::try_parse_from(["moonbench", "--version"]);
        // Version flag causes early exit with error (expected)
        assert!(result.is_err());
    }
}
