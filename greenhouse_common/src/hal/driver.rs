//! HAL driver trait, peripheral capabilities and error types.
//!
//! This module defines:
//! - `HalDriver` trait - Interface for pluggable hardware backends
//! - `HalError` enum - Error types for driver bring-up
//! - Capability traits consumed by the controller runtime
//!   (`SensorBus`, `OutputLines`, `InputDevice`, `Display`, `SerialTx`, `SerialRx`)
//! - `Peripherals` - The bundle a driver hands to the runtime
//! - `DriverFactory` type alias - Factory function type

use crate::config::GreenhouseConfig;
use crate::hal::clock::Clock;
use crate::hal::types::{Actuator, Color, SensorChannel};
use std::sync::Arc;
use thiserror::Error;

/// Error types for HAL operations.
#[derive(Debug, Clone, Error)]
pub enum HalError {
    /// Driver initialization failed
    #[error("Initialization failed: {0}")]
    InitFailed(String),

    /// Driver not found
    #[error("Driver not found: {0}")]
    DriverNotFound(String),

    /// Peripherals already handed out or never initialized
    #[error("Peripherals unavailable: {0}")]
    PeripheralUnavailable(String),
}

/// Factory function type for creating driver instances.
pub type DriverFactory = fn() -> Box<dyn HalDriver>;

// ─── Capabilities ───────────────────────────────────────────────────

/// Analog-to-digital converter behind the three sensor channels.
pub trait SensorBus: Send + Sync {
    /// Start a conversion on `channel` and block until it completes.
    ///
    /// There is no timeout: a converter that never signals completion
    /// blocks the caller forever.
    fn convert(&self, channel: SensorChannel) -> u16;
}

/// Active-high actuator output latch with read-back.
pub trait OutputLines: Send + Sync {
    /// Drive the line for `actuator` high (`true`) or low.
    fn set(&self, actuator: Actuator, on: bool);

    /// Read back the current line level.
    fn is_on(&self, actuator: Actuator) -> bool;

    /// Invert the line and return the new level.
    fn toggle(&self, actuator: Actuator) -> bool {
        let next = !self.is_on(actuator);
        self.set(actuator, next);
        next
    }
}

/// Polled five-way input device.
pub trait InputDevice: Send {
    /// Sample the raw port carrying the (active-low) joystick lines.
    fn read_port(&mut self) -> u32;
}

/// Text rendering primitives of the graphical display.
pub trait Display: Send {
    /// Fill the whole surface with the current background color.
    fn clear(&mut self);

    /// Set the text color for subsequent draws.
    fn set_foreground(&mut self, color: Color);

    /// Set the fill color for subsequent draws and clears.
    fn set_background(&mut self, color: Color);

    /// Draw `text` with its top-left corner at pixel (`x`, `y`).
    fn draw_string(&mut self, x: u32, y: u32, text: &str);
}

/// Byte-oriented serial transmitter.
pub trait SerialTx: Send {
    /// Transmit every byte, blocking until the transmitter accepted them.
    fn write_bytes(&mut self, bytes: &[u8]);
}

/// Byte-oriented serial receiver.
pub trait SerialRx: Send {
    /// Return the next received byte if one is ready, without blocking.
    fn read_byte(&mut self) -> Option<u8>;
}

/// Everything the controller runtime needs from a driver.
pub struct Peripherals {
    pub sensors: Arc<dyn SensorBus>,
    pub outputs: Arc<dyn OutputLines>,
    pub input: Box<dyn InputDevice>,
    pub display: Box<dyn Display>,
    pub serial_tx: Box<dyn SerialTx>,
    pub serial_rx: Box<dyn SerialRx>,
    pub clock: Arc<dyn Clock>,
}

// ─── Driver ─────────────────────────────────────────────────────────

/// Trait defining the interface for HAL drivers.
///
/// The runtime manages drivers through this trait, enabling pluggable
/// hardware backends (simulation, board support packages).
///
/// # Lifecycle
///
/// 1. `init()` - Called once with the loaded configuration
/// 2. `take_peripherals()` - Called once; hands the capability objects to the runtime
/// 3. `shutdown()` - Called after the runtime threads were joined
pub trait HalDriver: Send {
    /// Returns the driver's unique identifier (e.g., "simulation").
    fn name(&self) -> &'static str;

    /// Returns the driver's semantic version.
    fn version(&self) -> &'static str;

    /// Initialize the driver with the controller configuration.
    ///
    /// # Errors
    /// Return `HalError::InitFailed` if initialization cannot complete.
    fn init(&mut self, config: &GreenhouseConfig) -> Result<(), HalError>;

    /// Hand out the peripheral capabilities.
    ///
    /// # Errors
    /// Return `HalError::PeripheralUnavailable` when called before `init()`
    /// or a second time.
    fn take_peripherals(&mut self) -> Result<Peripherals, HalError>;

    /// Graceful shutdown of the driver. Outputs should be left low.
    fn shutdown(&mut self) -> Result<(), HalError>;
}
