//! Shared environment record.
//!
//! The three latest sensor readings and the three adjustable thresholds live
//! behind one exclusive lock. Every access to any of the six values goes
//! through [`SharedEnvironment::lock`]; writers clamp into the 12-bit domain
//! instead of failing.

use greenhouse_common::consts::ADC_MAX;
use greenhouse_common::hal::types::{Actuator, SensorChannel, clamp_adc};
use parking_lot::{Mutex, MutexGuard};

/// Contents of the shared environment. Only reachable through a lock guard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct EnvState {
    readings: [u16; 3],
    thresholds: [u16; 3],
}

impl EnvState {
    #[inline]
    pub fn reading(&self, channel: SensorChannel) -> u16 {
        self.readings[channel.index()]
    }

    /// Readings in channel order (temperature, moisture, light).
    #[inline]
    pub fn readings(&self) -> [u16; 3] {
        self.readings
    }

    pub fn set_reading(&mut self, channel: SensorChannel, value: u16) {
        self.readings[channel.index()] = value.min(ADC_MAX);
    }

    #[inline]
    pub fn threshold(&self, actuator: Actuator) -> u16 {
        self.thresholds[actuator.index()]
    }

    pub fn set_threshold(&mut self, actuator: Actuator, value: u16) {
        self.thresholds[actuator.index()] = value.min(ADC_MAX);
    }

    /// Move a threshold by `delta`, saturating at 0 and 4095. Returns the
    /// new value.
    pub fn adjust_threshold(&mut self, actuator: Actuator, delta: i32) -> u16 {
        let current = self.thresholds[actuator.index()] as i32;
        let next = clamp_adc(current.saturating_add(delta));
        self.thresholds[actuator.index()] = next;
        next
    }

    /// Whether `actuator`'s trigger condition holds for the stored values.
    #[inline]
    pub fn condition_holds(&self, actuator: Actuator) -> bool {
        actuator
            .comparison()
            .holds(self.reading(actuator.channel()), self.threshold(actuator))
    }
}

/// Lock-protected environment shared by every runtime thread.
#[derive(Debug, Default)]
pub struct SharedEnvironment {
    state: Mutex<EnvState>,
}

impl SharedEnvironment {
    /// Create with zeroed readings and the given thresholds (clamped).
    pub fn new(thresholds: [u16; 3]) -> Self {
        let mut state = EnvState::default();
        for actuator in Actuator::ALL {
            state.set_threshold(actuator, thresholds[actuator.index()]);
        }
        Self {
            state: Mutex::new(state),
        }
    }

    /// Acquire the environment lock, blocking until it is free.
    #[inline]
    pub fn lock(&self) -> MutexGuard<'_, EnvState> {
        self.state.lock()
    }

    /// Copy of the whole record, taken under the lock.
    pub fn snapshot(&self) -> EnvState {
        *self.state.lock()
    }

    /// Whether another thread currently holds the lock.
    pub fn is_locked(&self) -> bool {
        self.state.is_locked()
    }
}
