//! Simulation driver implementation.
//!
//! The `SimulationDriver` implements the `HalDriver` trait to provide a
//! software-emulated greenhouse: plant model behind the converter, output
//! latch, scripted joystick, recording display and a loopback or stdio
//! serial port.

use super::clock::VirtualClock;
use super::display::{DisplayProbe, RecordingDisplay};
use super::io::{JoystickHandle, OutputLatch, SimJoystick};
use super::plant::{PlantDynamics, SimulatedPlant};
use super::serial::{SerialHandle, StdinRx, StdoutTx, loopback};
use greenhouse_common::config::GreenhouseConfig;
use greenhouse_common::hal::clock::{Clock, MonotonicClock};
use greenhouse_common::hal::driver::{
    HalDriver, HalError, OutputLines, Peripherals, SerialRx, SerialTx,
};
use greenhouse_common::hal::types::Actuator;
use std::sync::Arc;
use tracing::{debug, info};

/// How the plant model evolves.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlantMode {
    /// Readings drift toward ambient and respond to the actuators.
    Dynamic(PlantDynamics),
    /// Readings stay at the given values until changed through the handle.
    Fixed([u16; 3]),
}

/// Where the serial port is wired.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SerialMode {
    Loopback,
    Stdio,
}

/// Test-side controls of an initialized simulation.
#[derive(Clone)]
pub struct SimulationHandles {
    pub outputs: Arc<OutputLatch>,
    pub plant: Arc<SimulatedPlant>,
    pub joystick: JoystickHandle,
    pub display: DisplayProbe,
    /// `None` when the port is wired to the standard streams.
    pub serial: Option<SerialHandle>,
}

/// Simulation driver implementing the HalDriver trait.
pub struct SimulationDriver {
    /// Driver name
    name: &'static str,
    /// Driver version
    version: &'static str,
    plant_mode: PlantMode,
    serial_mode: SerialMode,
    clock: Option<Arc<dyn Clock>>,
    handles: Option<SimulationHandles>,
    /// Built by `init()`, handed out once
    peripherals: Option<Peripherals>,
}

impl SimulationDriver {
    /// Create a new simulation driver with a dynamic plant and loopback serial.
    pub fn new() -> Self {
        Self {
            name: "simulation",
            version: env!("CARGO_PKG_VERSION"),
            plant_mode: PlantMode::Dynamic(PlantDynamics::default()),
            serial_mode: SerialMode::Loopback,
            clock: None,
            handles: None,
            peripherals: None,
        }
    }

    /// Simulation whose serial port is the process stdin/stdout.
    pub fn with_stdio() -> Self {
        Self {
            name: "simulation-stdio",
            serial_mode: SerialMode::Stdio,
            ..Self::new()
        }
    }

    /// Replace the plant model.
    pub fn plant(mut self, mode: PlantMode) -> Self {
        self.plant_mode = mode;
        self
    }

    /// Replace the monotonic clock, e.g. with a [`VirtualClock`].
    pub fn clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = Some(clock);
        self
    }

    /// Shorthand for a driver running on a fresh [`VirtualClock`].
    pub fn virtual_time(self) -> (Self, Arc<VirtualClock>) {
        let clock = Arc::new(VirtualClock::new());
        (self.clock(clock.clone()), clock)
    }

    /// Controls of the simulated hardware, available after `init()`.
    pub fn handles(&self) -> Option<SimulationHandles> {
        self.handles.clone()
    }

    fn serial(&self) -> Result<(Box<dyn SerialTx>, Box<dyn SerialRx>, Option<SerialHandle>), HalError> {
        match self.serial_mode {
            SerialMode::Loopback => {
                let (tx, rx, handle) = loopback();
                Ok((Box::new(tx), Box::new(rx), Some(handle)))
            }
            SerialMode::Stdio => {
                let rx = StdinRx::spawn()
                    .map_err(|e| HalError::InitFailed(format!("stdin reader: {e}")))?;
                Ok((Box::new(StdoutTx), Box::new(rx), None))
            }
        }
    }
}

impl Default for SimulationDriver {
    fn default() -> Self {
        Self::new()
    }
}

impl HalDriver for SimulationDriver {
    fn name(&self) -> &'static str {
        self.name
    }

    fn version(&self) -> &'static str {
        self.version
    }

    fn init(&mut self, config: &GreenhouseConfig) -> Result<(), HalError> {
        if self.handles.is_some() {
            return Err(HalError::InitFailed("driver already initialized".to_string()));
        }
        info!(
            "Initializing simulation driver (plant={:?}, serial={:?}, baud={})",
            self.plant_mode, self.serial_mode, config.serial.baud
        );

        let outputs = Arc::new(OutputLatch::new());
        let plant = Arc::new(match self.plant_mode {
            PlantMode::Dynamic(dynamics) => SimulatedPlant::dynamic(outputs.clone(), dynamics),
            PlantMode::Fixed(initial) => SimulatedPlant::fixed(outputs.clone(), initial),
        });
        let (joystick, joystick_handle) = SimJoystick::new(config.joystick);
        let (display, display_probe) = RecordingDisplay::new();
        let (serial_tx, serial_rx, serial_handle) = self.serial()?;
        let clock: Arc<dyn Clock> = match &self.clock {
            Some(clock) => Arc::clone(clock),
            None => Arc::new(MonotonicClock::new()),
        };

        self.handles = Some(SimulationHandles {
            outputs: outputs.clone(),
            plant: plant.clone(),
            joystick: joystick_handle,
            display: display_probe,
            serial: serial_handle,
        });
        self.peripherals = Some(Peripherals {
            sensors: plant,
            outputs,
            input: Box::new(joystick),
            display: Box::new(display),
            serial_tx,
            serial_rx,
            clock,
        });

        info!("Simulation driver initialized");
        Ok(())
    }

    fn take_peripherals(&mut self) -> Result<Peripherals, HalError> {
        self.peripherals.take().ok_or_else(|| {
            let reason = if self.handles.is_some() {
                "already taken"
            } else {
                "driver not initialized"
            };
            HalError::PeripheralUnavailable(reason.to_string())
        })
    }

    fn shutdown(&mut self) -> Result<(), HalError> {
        info!("Shutting down simulation driver");
        if let Some(handles) = &self.handles {
            for actuator in Actuator::ALL {
                handles.outputs.set(actuator, false);
            }
            debug!("All actuator lines driven low");
        }
        self.peripherals = None;
        Ok(())
    }
}
