//! Prelude module for common re-exports.
//!
//! ```rust
//! use greenhouse_common::prelude::*;
//! ```

// ─── Configuration ──────────────────────────────────────────────────
pub use crate::config::{
    ConfigError, ConfigLoader, GreenhouseConfig, LogLevel, PulseLock, SharedConfig,
};

// ─── System Constants ───────────────────────────────────────────────
pub use crate::consts::{ADC_MAX, ROW_HEIGHT};

// ─── Hardware ───────────────────────────────────────────────────────
pub use crate::hal::clock::{Clock, MonotonicClock};
pub use crate::hal::driver::{
    Display, HalDriver, HalError, InputDevice, OutputLines, Peripherals, SensorBus, SerialRx,
    SerialTx,
};
pub use crate::hal::types::{Actuator, Buttons, Color, Comparison, JoystickPins, SensorChannel};
