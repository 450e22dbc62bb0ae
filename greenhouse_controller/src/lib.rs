//! # Greenhouse Controller Library
//!
//! Control core of an automated greenhouse: periodic sensor sampling,
//! threshold-triggered actuation pulses, a line-oriented serial command and
//! telemetry channel, and a joystick-driven operator console on a text
//! display.
//!
//! ## Threads
//!
//! A fixed set of ten threads shares one [`env::SharedEnvironment`]
//! (readings and thresholds behind a single lock). Each actuator has a
//! monitor that raises a capacity-1 [`signal::Signal`] and a controller that
//! re-checks the condition and pulses the output. See [`runtime`] for the
//! full table.
//!
//! ## Hardware
//!
//! All peripherals are reached through the capability traits of
//! `greenhouse_common::hal::driver`; `greenhouse_hal` supplies the drivers.

pub mod actuation;
pub mod command;
pub mod console;
pub mod env;
pub mod runtime;
pub mod sampler;
pub mod signal;
pub mod telemetry;

pub use runtime::{Greenhouse, RuntimeError};
