//! Greenhouse Common Library
//!
//! Shared constants, hardware capability traits and configuration loading
//! for all greenhouse workspace crates.
//!
//! # Module Structure
//!
//! - [`consts`] - Sensor range, timing defaults, display geometry
//! - [`hal`] - Driver trait, capability traits, value types, clocks
//! - [`config`] - Configuration loading traits and types
//! - [`prelude`] - Common re-exports for convenience

pub mod config;
pub mod consts;
pub mod hal;
pub mod prelude;

use static_assertions::const_assert;

const_assert!(consts::SENSOR_CHANNELS == consts::ACTUATOR_COUNT);
const_assert!(consts::COMMAND_LINE_MAX < consts::TELEMETRY_LINE_MAX);
