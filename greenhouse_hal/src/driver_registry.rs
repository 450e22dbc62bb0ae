//! Built-in backend table.
//!
//! The controller ships a fixed set of drivers. The binary picks one by the
//! name given on the command line; nothing is registered at runtime.

use crate::drivers::simulation;
use greenhouse_common::hal::driver::{DriverFactory, HalDriver, HalError};

/// One selectable backend.
#[derive(Clone, Copy)]
pub struct DriverEntry {
    pub name: &'static str,
    /// One-line description for `--help` style listings.
    pub summary: &'static str,
    construct: DriverFactory,
}

impl DriverEntry {
    pub const fn new(name: &'static str, summary: &'static str, construct: DriverFactory) -> Self {
        Self {
            name,
            summary,
            construct,
        }
    }
}

/// Every driver compiled into this crate.
pub const BUILTIN_DRIVERS: &[DriverEntry] = &[
    DriverEntry::new(
        "simulation",
        "simulated plant, loopback serial",
        simulation::create_driver,
    ),
    DriverEntry::new(
        "simulation-stdio",
        "simulated plant, serial on stdin/stdout",
        simulation::create_stdio_driver,
    ),
];

/// Name lookup over a static driver table.
#[derive(Clone, Copy)]
pub struct DriverRegistry {
    table: &'static [DriverEntry],
}

impl DriverRegistry {
    /// Lookup over [`BUILTIN_DRIVERS`].
    pub const fn with_builtin_drivers() -> Self {
        Self::from_table(BUILTIN_DRIVERS)
    }

    pub const fn from_table(table: &'static [DriverEntry]) -> Self {
        Self { table }
    }

    pub fn entries(&self) -> &'static [DriverEntry] {
        self.table
    }

    /// Construct the driver called `name`.
    ///
    /// # Errors
    /// `HalError::DriverNotFound` naming the requested and the known drivers.
    pub fn create_driver(&self, name: &str) -> Result<Box<dyn HalDriver>, HalError> {
        match self.table.iter().find(|entry| entry.name == name) {
            Some(entry) => Ok((entry.construct)()),
            None => {
                let known: Vec<&str> = self.table.iter().map(|e| e.name).collect();
                Err(HalError::DriverNotFound(format!(
                    "'{name}' (known: {})",
                    known.join(", ")
                )))
            }
        }
    }
}

impl Default for DriverRegistry {
    fn default() -> Self {
        Self::with_builtin_drivers()
    }
}
