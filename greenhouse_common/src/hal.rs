//! Hardware abstraction types and capability traits.
//!
//! The controller runtime depends only on these interfaces; register-level
//! access lives in the drivers.

pub mod clock;
pub mod driver;
pub mod types;
