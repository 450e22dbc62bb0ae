//! Shared rig for the end-to-end tests.

mod commands;
mod console;
mod lifecycle;
mod pulses;
mod telemetry;
mod thresholds;

use greenhouse_common::prelude::*;
use greenhouse_controller::Greenhouse;
use greenhouse_hal::drivers::simulation::{PlantMode, SimulationDriver, SimulationHandles};
use std::thread;
use std::time::{Duration, Instant};

/// Readings that keep every condition false under [`fast_config`].
pub const IDLE: [u16; 3] = [1000, 3000, 3000];

/// Short periods so scenarios settle within a fraction of a second.
/// Sprinkler and light thresholds sit below [`IDLE`].
pub fn fast_config() -> GreenhouseConfig {
    let mut config = GreenhouseConfig::default();
    config.timing.sample_period_ms = 5;
    config.timing.telemetry_period_ms = 20;
    config.timing.monitor_period_ms = 5;
    config.timing.command_poll_ms = 5;
    config.console.poll_ms = 5;
    config.heater.pulse_ms = 30;
    config.sprinkler.threshold = 1000;
    config.sprinkler.pulse_ms = 30;
    config.light.threshold = 1000;
    config.light.pulse_ms = 30;
    config
}

pub struct Running {
    pub greenhouse: Greenhouse,
    pub hw: SimulationHandles,
    driver: SimulationDriver,
}

impl Running {
    pub fn start(config: &GreenhouseConfig, readings: [u16; 3]) -> Self {
        let mut driver = SimulationDriver::new().plant(PlantMode::Fixed(readings));
        driver.init(config).unwrap();
        let hw = driver.handles().unwrap();
        let peripherals = driver.take_peripherals().unwrap();
        let greenhouse = Greenhouse::start(config, peripherals).unwrap();
        Self {
            greenhouse,
            hw,
            driver,
        }
    }

    pub fn stop(mut self) -> SimulationHandles {
        self.greenhouse.shutdown();
        self.driver.shutdown().unwrap();
        self.hw
    }
}

/// Poll `condition` until it holds or `timeout` passes.
pub fn wait_until(timeout: Duration, mut condition: impl FnMut() -> bool) -> bool {
    let deadline = Instant::now() + timeout;
    while Instant::now() < deadline {
        if condition() {
            return true;
        }
        thread::sleep(Duration::from_millis(2));
    }
    condition()
}
