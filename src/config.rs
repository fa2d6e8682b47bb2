use eyre::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub log_level: Option<String>,
    pub http: HttpConfig,
    pub harness: HarnessConfig,
}

/// Timeouts for the Moonraker connection.
///
/// The connect timeout is short (the service answers immediately when up);
/// the read timeout is long, since a command is acknowledged only after the
/// printer finishes a potentially slow physical operation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    pub connect_timeout_ms: u64,
    pub read_timeout_ms: u64,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            connect_timeout_ms: 1_000,
            read_timeout_ms: 180_000,
        }
    }
}

impl HttpConfig {
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_millis(self.connect_timeout_ms)
    }

    pub fn read_timeout(&self) -> Duration {
        Duration::from_millis(self.read_timeout_ms)
    }
}

/// Knobs of the measurement harness itself, passed into the runner as one
/// immutable struct.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HarnessConfig {
    /// No-op command injected into the console log to fence an iteration
    pub marker_gcode: String,

    /// Wait between submitting the marker and reading it back. Best-effort
    /// workaround for a race where a just-written entry is not yet visible
    /// to the next gcode_store read; Moonraker does not document the timing.
    pub settle_after_marker_ms: u64,

    /// Physical size of one Z microstep, used to convert stepper counts to
    /// millimeters
    pub microstep_size_mm: f64,

    /// Range for the randomized FORCE_MOVE distance, in millimeters
    pub random_move_min_mm: f64,
    pub random_move_max_mm: f64,

    /// Run once before the first iteration
    pub start_gcodes: Vec<String>,

    /// Run once after the last iteration
    pub end_gcodes: Vec<String>,
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self {
            marker_gcode: "M117 Running Test".to_string(),
            settle_after_marker_ms: 1_000,
            microstep_size_mm: 0.0025,
            random_move_min_mm: 2.0,
            random_move_max_mm: 7.0,
            start_gcodes: vec!["G28".to_string()],
            end_gcodes: vec![],
        }
    }
}

impl HarnessConfig {
    pub fn settle_after_marker(&self) -> Duration {
        Duration::from_millis(self.settle_after_marker_ms)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_level: Some("info".to_string()),
            http: HttpConfig::default(),
            harness: HarnessConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration with fallback chain
    pub fn load(config_path: Option<&PathBuf>) -> Result<Self> {
        // If explicit config path provided, try to load it
        if let Some(path) = config_path {
            return Self::load_from_file(path)
                .context(format!("Failed to load config from {}", path.display()));
        }

        // Try primary location: ~/.config/<project>/<project>.yml
        if let Some(config_dir) = dirs::config_dir() {
            let project_name = env!("CARGO_PKG_NAME");
            let primary_config = config_dir
                .join(project_name)
                .join(format!("{}.yml", project_name));
            if primary_config.exists() {
                match Self::load_from_file(&primary_config) {
                    Ok(config) => return Ok(config),
                    Err(e) => {
                        log::warn!(
                            "Failed to load config from {}: {}",
                            primary_config.display(),
                            e
                        );
                    }
                }
            }
        }

        // Try fallback location: ./<project>.yml
        let project_name = env!("CARGO_PKG_NAME");
        let fallback_config = PathBuf::from(format!("{}.yml", project_name));
        if fallback_config.exists() {
            match Self::load_from_file(&fallback_config) {
                Ok(config) => return Ok(config),
                Err(e) => {
                    log::warn!(
                        "Failed to load config from {}: {}",
                        fallback_config.display(),
                        e
                    );
                }
            }
        }

        // No config file found, use defaults
        log::info!("No config file found, using defaults");
        Ok(Self::default())
    }

    fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(&path).context("Failed to read config file")?;

        let config: Self = serde_yaml::from_str(&content).context("Failed to parse config file")?;

        log::info!("Loaded config from: {}", path.as_ref().display());
        Ok(config)
    }
}
