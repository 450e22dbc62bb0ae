//! Simulation driver module.
//!
//! This module provides a software simulation driver for development and testing
//! without physical hardware.

mod clock;
mod display;
mod driver;
mod io;
mod plant;
mod serial;

pub use clock::VirtualClock;
pub use display::{DISPLAY_ROWS, DisplayProbe, DrawOp, RecordingDisplay};
pub use driver::{PlantMode, SerialMode, SimulationDriver, SimulationHandles};
pub use io::{JoystickHandle, LineEvent, OutputLatch, SimJoystick};
pub use plant::{PlantDynamics, SimulatedPlant};
pub use serial::{LoopbackRx, LoopbackTx, SerialHandle, StdinRx, StdoutTx, loopback};

use greenhouse_common::hal::driver::HalDriver;

/// Factory function to create a simulation driver instance.
pub fn create_driver() -> Box<dyn HalDriver> {
    Box::new(SimulationDriver::new())
}

/// Factory function for a simulation wired to stdin/stdout.
pub fn create_stdio_driver() -> Box<dyn HalDriver> {
    Box::new(SimulationDriver::with_stdio())
}
