//! Configuration loading traits and types.
//!
//! This module provides the TOML configuration of the greenhouse controller
//! and the generic loader used to read it.
//!
//! # Usage
//!
//! ```rust,no_run
//! use greenhouse_common::config::{ConfigLoader, ConfigError, GreenhouseConfig};
//! use std::path::Path;
//!
//! fn main() -> Result<(), ConfigError> {
//!     let mut config = GreenhouseConfig::load(Path::new("greenhouse.toml"))?;
//!     config.normalize();
//!     config.validate()?;
//!     println!("Service: {}", config.shared.service_name);
//!     Ok(())
//! }
//! ```

use crate::consts::{
    ADC_MAX, DEFAULT_BAUD, DEFAULT_COMMAND_POLL_MS, DEFAULT_CONSOLE_POLL_MS, DEFAULT_DEBOUNCE_MS,
    DEFAULT_MONITOR_PERIOD_MS, DEFAULT_SAMPLE_PERIOD_MS, DEFAULT_TELEMETRY_PERIOD_MS,
    DEFAULT_THRESHOLD_STEP,
};
use crate::hal::types::{Actuator, JoystickPins};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use thiserror::Error;
use tracing::warn;

/// Error type for configuration loading operations.
///
/// This enum represents all possible errors that can occur when loading
/// configuration files.
#[derive(Debug, Clone, Error)]
pub enum ConfigError {
    /// Configuration file not found at specified path.
    #[error("Configuration file not found")]
    FileNotFound,

    /// TOML parsing failed.
    #[error("Failed to parse configuration: {0}")]
    ParseError(String),

    /// Semantic validation failed.
    #[error("Configuration validation failed: {0}")]
    ValidationError(String),
}

/// Log level for application logging.
///
/// Uses lowercase serde values for TOML compatibility.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Most verbose, detailed tracing information.
    Trace,
    /// Debug information useful during development.
    Debug,
    /// General information about application operation.
    #[default]
    Info,
    /// Warning messages for potentially problematic situations.
    Warn,
    /// Error messages for serious problems.
    Error,
}

impl LogLevel {
    /// Directive string understood by `tracing_subscriber::EnvFilter`.
    pub const fn as_directive(self) -> &'static str {
        match self {
            Self::Trace => "trace",
            Self::Debug => "debug",
            Self::Info => "info",
            Self::Warn => "warn",
            Self::Error => "error",
        }
    }
}

/// Common configuration fields.
///
/// # TOML Example
///
/// ```toml
/// [shared]
/// log_level = "debug"
/// service_name = "greenhouse-east"
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SharedConfig {
    /// Logging verbosity level.
    #[serde(default)]
    pub log_level: LogLevel,

    /// Controller instance identifier.
    pub service_name: String,
}

impl SharedConfig {
    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::ValidationError` if:
    /// - `service_name` is empty
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.service_name.is_empty() {
            return Err(ConfigError::ValidationError(
                "service_name cannot be empty".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for SharedConfig {
    fn default() -> Self {
        Self {
            log_level: LogLevel::default(),
            service_name: "greenhouse".to_string(),
        }
    }
}

/// Trait for loading configuration from TOML files.
///
/// Blanket-implemented for any type implementing
/// `serde::de::DeserializeOwned`.
///
/// # Contract
///
/// - Returns `ConfigError::FileNotFound` if the file does not exist
/// - Returns `ConfigError::ParseError` if TOML syntax is invalid
pub trait ConfigLoader: Sized + serde::de::DeserializeOwned {
    /// Load configuration from a TOML file.
    fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                ConfigError::FileNotFound
            } else {
                ConfigError::ParseError(e.to_string())
            }
        })?;

        toml::from_str(&content).map_err(|e| ConfigError::ParseError(e.to_string()))
    }
}

// Blanket implementation for all types that implement DeserializeOwned.
impl<T: serde::de::DeserializeOwned> ConfigLoader for T {}

// ─── Sections ───────────────────────────────────────────────────────

/// Periods of the background threads, in milliseconds.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TimingConfig {
    pub sample_period_ms: u64,
    pub telemetry_period_ms: u64,
    pub monitor_period_ms: u64,
    pub command_poll_ms: u64,
}

impl TimingConfig {
    pub fn sample_period(&self) -> Duration {
        Duration::from_millis(self.sample_period_ms)
    }

    pub fn telemetry_period(&self) -> Duration {
        Duration::from_millis(self.telemetry_period_ms)
    }

    pub fn monitor_period(&self) -> Duration {
        Duration::from_millis(self.monitor_period_ms)
    }

    pub fn command_poll(&self) -> Duration {
        Duration::from_millis(self.command_poll_ms)
    }
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            sample_period_ms: DEFAULT_SAMPLE_PERIOD_MS,
            telemetry_period_ms: DEFAULT_TELEMETRY_PERIOD_MS,
            monitor_period_ms: DEFAULT_MONITOR_PERIOD_MS,
            command_poll_ms: DEFAULT_COMMAND_POLL_MS,
        }
    }
}

/// Threshold and pulse length of one actuator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActuatorConfig {
    /// Initial threshold (12-bit domain; larger values are clamped).
    #[serde(deserialize_with = "saturating_threshold")]
    pub threshold: u16,
    /// How long the output stays on per pulse.
    pub pulse_ms: u64,
}

/// Accept any integer for a threshold. Values outside `u16` saturate here;
/// [`GreenhouseConfig::normalize`] then clamps into the 12-bit domain.
fn saturating_threshold<'de, D>(deserializer: D) -> Result<u16, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let raw = i64::deserialize(deserializer)?;
    let value = raw.clamp(0, i64::from(u16::MAX)) as u16;
    if i64::from(value) != raw {
        warn!("threshold {} out of range, clamped to {}", raw, value);
    }
    Ok(value)
}

impl ActuatorConfig {
    pub fn pulse(&self) -> Duration {
        Duration::from_millis(self.pulse_ms)
    }

    fn default_heater() -> Self {
        Self {
            threshold: 1600,
            pulse_ms: 500,
        }
    }

    fn default_sprinkler() -> Self {
        Self {
            threshold: 5000,
            pulse_ms: 600,
        }
    }

    fn default_light() -> Self {
        Self {
            threshold: 4091,
            pulse_ms: 700,
        }
    }
}

/// Whether a controller keeps the environment lock across its pulse.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum PulseLock {
    /// The environment lock is held until the output is switched off again.
    /// Pulses are serialized and sampling stalls for the pulse duration.
    #[default]
    Hold,
    /// The environment lock is released after the re-check. Pulses are still
    /// serialized through a dedicated pulse lock; sampling continues.
    Release,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ActuationConfig {
    pub pulse_lock: PulseLock,
}

/// Operator console timing.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ConsoleConfig {
    /// Input sampling interval.
    pub poll_ms: u64,
    /// Minimum spacing between two accepted actions.
    pub debounce_ms: u64,
    /// Threshold change per Up/Down press.
    pub threshold_step: u16,
}

impl ConsoleConfig {
    pub fn poll(&self) -> Duration {
        Duration::from_millis(self.poll_ms)
    }
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self {
            poll_ms: DEFAULT_CONSOLE_POLL_MS,
            debounce_ms: DEFAULT_DEBOUNCE_MS,
            threshold_step: DEFAULT_THRESHOLD_STEP,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SerialConfig {
    pub baud: u32,
}

impl Default for SerialConfig {
    fn default() -> Self {
        Self { baud: DEFAULT_BAUD }
    }
}

// ─── GreenhouseConfig ───────────────────────────────────────────────

/// Complete controller configuration.
///
/// Every section is optional; an empty document yields the factory
/// defaults. Inside an actuator section both keys are required.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GreenhouseConfig {
    pub shared: SharedConfig,
    pub timing: TimingConfig,
    pub heater: ActuatorConfig,
    pub sprinkler: ActuatorConfig,
    pub light: ActuatorConfig,
    pub actuation: ActuationConfig,
    pub console: ConsoleConfig,
    pub joystick: JoystickPins,
    pub serial: SerialConfig,
}

impl Default for GreenhouseConfig {
    fn default() -> Self {
        Self {
            shared: SharedConfig::default(),
            timing: TimingConfig::default(),
            heater: ActuatorConfig::default_heater(),
            sprinkler: ActuatorConfig::default_sprinkler(),
            light: ActuatorConfig::default_light(),
            actuation: ActuationConfig::default(),
            console: ConsoleConfig::default(),
            joystick: JoystickPins::default(),
            serial: SerialConfig::default(),
        }
    }
}

impl GreenhouseConfig {
    /// Parse a configuration document.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|e| ConfigError::ParseError(e.to_string()))
    }

    /// Section for one actuator.
    pub fn actuator(&self, actuator: Actuator) -> &ActuatorConfig {
        match actuator {
            Actuator::Heater => &self.heater,
            Actuator::Sprinkler => &self.sprinkler,
            Actuator::Light => &self.light,
        }
    }

    fn actuator_mut(&mut self, actuator: Actuator) -> &mut ActuatorConfig {
        match actuator {
            Actuator::Heater => &mut self.heater,
            Actuator::Sprinkler => &mut self.sprinkler,
            Actuator::Light => &mut self.light,
        }
    }

    /// Clamp thresholds into the 12-bit domain. Out-of-range values are
    /// not an error.
    pub fn normalize(&mut self) {
        for actuator in Actuator::ALL {
            let cfg = self.actuator_mut(actuator);
            if cfg.threshold > ADC_MAX {
                warn!(
                    "{} threshold {} out of range, clamped to {}",
                    actuator, cfg.threshold, ADC_MAX
                );
                cfg.threshold = ADC_MAX;
            }
        }
    }

    /// Validate the configuration.
    ///
    /// # Validation Rules
    /// 1. `shared.service_name` non-empty
    /// 2. All periods and pulse durations > 0
    /// 3. `console.threshold_step` in 1..=4095
    /// 4. Joystick bit positions < 32 and pairwise distinct
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.shared.validate()?;

        let periods = [
            ("timing.sample_period_ms", self.timing.sample_period_ms),
            ("timing.telemetry_period_ms", self.timing.telemetry_period_ms),
            ("timing.monitor_period_ms", self.timing.monitor_period_ms),
            ("timing.command_poll_ms", self.timing.command_poll_ms),
            ("console.poll_ms", self.console.poll_ms),
            ("heater.pulse_ms", self.heater.pulse_ms),
            ("sprinkler.pulse_ms", self.sprinkler.pulse_ms),
            ("light.pulse_ms", self.light.pulse_ms),
        ];
        for (key, value) in periods {
            if value == 0 {
                return Err(ConfigError::ValidationError(format!(
                    "{key} must be greater than 0"
                )));
            }
        }

        if self.console.threshold_step == 0 || self.console.threshold_step > ADC_MAX {
            return Err(ConfigError::ValidationError(format!(
                "console.threshold_step must be in 1..={}, got {}",
                ADC_MAX, self.console.threshold_step
            )));
        }

        let lines = self.joystick.lines();
        for (i, (bit, _)) in lines.iter().enumerate() {
            if *bit >= 32 {
                return Err(ConfigError::ValidationError(format!(
                    "joystick bit {bit} outside a 32-bit port"
                )));
            }
            if lines[..i].iter().any(|(other, _)| other == bit) {
                return Err(ConfigError::ValidationError(format!(
                    "joystick bit {bit} assigned twice"
                )));
            }
        }

        Ok(())
    }
}
