//! # Greenhouse HAL Library
//!
//! Hardware abstraction with a pluggable driver architecture.
//!
//! Drivers implement the `HalDriver` trait defined in
//! `greenhouse_common::hal::driver` and hand the controller runtime a
//! `Peripherals` bundle of capability objects.
//!
//! # Module Structure
//!
//! - [`driver_registry`] - Table of built-in backends, looked up by name
//! - [`drivers`] - HAL driver implementations
//!
//! # Architecture
//!
//! ```text
//! ┌───────────────────────────────────────────────────────────┐
//! │                   greenhouse_hal                          │
//! │  ┌──────────────────┐        ┌─────────────────────────┐  │
//! │  │ Driver Registry  │──────► │  HalDriver (trait obj)  │  │
//! │  └──────────────────┘        └───────────┬─────────────┘  │
//! │                                          │ take_peripherals
//! │                                          ▼                │
//! │                               ┌─────────────────────┐     │
//! │                               │     Peripherals     │     │
//! │                               └─────────────────────┘     │
//! └───────────────────────────────────────────────────────────┘
//! ```

pub mod driver_registry;
pub mod drivers;

// Re-export key types for convenience
pub use crate::driver_registry::DriverRegistry;
pub use crate::drivers::simulation::{SimulationDriver, SimulationHandles};
