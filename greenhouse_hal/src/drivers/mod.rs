//! HAL driver implementations.
//!
//! - [`simulation`] - Software simulation driver for development and testing
//!
//! A new backend implements `HalDriver` from `greenhouse_common::hal::driver`
//! and gets an entry in [`crate::driver_registry::BUILTIN_DRIVERS`].

pub mod simulation;
