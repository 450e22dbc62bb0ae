//! Simulated greenhouse behind the analog-to-digital converter.
//!
//! Each conversion advances the channel by one step: readings relax toward
//! an ambient level and climb while the matching actuator is energized.
//! All values stay in the 12-bit domain.

use greenhouse_common::hal::driver::{OutputLines, SensorBus};
use greenhouse_common::hal::types::{Actuator, SensorChannel, clamp_adc};
use parking_lot::Mutex;
use std::sync::Arc;
use tracing::trace;

/// Per-channel model parameters, indexed by [`SensorChannel::index`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlantDynamics {
    /// Level each reading relaxes toward.
    pub ambient: [u16; 3],
    /// Change per conversion while relaxing.
    pub drift: [u16; 3],
    /// Increase per conversion while the actuator is on.
    pub gain: [u16; 3],
}

impl Default for PlantDynamics {
    fn default() -> Self {
        Self {
            ambient: [1500, 3000, 3600],
            drift: [2, 4, 8],
            gain: [12, 40, 60],
        }
    }
}

/// Sensor bus backed by a small plant model.
pub struct SimulatedPlant {
    outputs: Arc<dyn OutputLines>,
    readings: Mutex<[u16; 3]>,
    dynamics: Option<PlantDynamics>,
}

impl SimulatedPlant {
    /// Plant whose readings stay where they are put.
    pub fn fixed(outputs: Arc<dyn OutputLines>, initial: [u16; 3]) -> Self {
        Self {
            outputs,
            readings: Mutex::new(initial.map(|v| clamp_adc(v as i32))),
            dynamics: None,
        }
    }

    /// Plant that drifts and reacts to its actuators.
    pub fn dynamic(outputs: Arc<dyn OutputLines>, dynamics: PlantDynamics) -> Self {
        Self {
            outputs,
            readings: Mutex::new(dynamics.ambient),
            dynamics: Some(dynamics),
        }
    }

    /// Force the next reading of `channel`.
    pub fn set(&self, channel: SensorChannel, value: u16) {
        self.readings.lock()[channel.index()] = clamp_adc(value as i32);
    }

    /// Current value without running a conversion.
    pub fn peek(&self, channel: SensorChannel) -> u16 {
        self.readings.lock()[channel.index()]
    }

    fn actuator_for(channel: SensorChannel) -> Actuator {
        match channel {
            SensorChannel::Temperature => Actuator::Heater,
            SensorChannel::Moisture => Actuator::Sprinkler,
            SensorChannel::Light => Actuator::Light,
        }
    }

    fn step(&self, channel: SensorChannel, current: u16, dynamics: &PlantDynamics) -> u16 {
        let i = channel.index();
        let value = current as i32;
        let next = if self.outputs.is_on(Self::actuator_for(channel)) {
            value + dynamics.gain[i] as i32
        } else {
            let ambient = dynamics.ambient[i] as i32;
            let drift = dynamics.drift[i] as i32;
            if value > ambient {
                (value - drift).max(ambient)
            } else {
                (value + drift).min(ambient)
            }
        };
        clamp_adc(next)
    }
}

impl SensorBus for SimulatedPlant {
    fn convert(&self, channel: SensorChannel) -> u16 {
        let mut readings = self.readings.lock();
        let current = readings[channel.index()];
        let value = match &self.dynamics {
            Some(dynamics) => self.step(channel, current, dynamics),
            None => current,
        };
        readings[channel.index()] = value;
        trace!("ADC {:?} -> {}", channel, value);
        value
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::drivers::simulation::OutputLatch;

    #[test]
    fn test_fixed_plant_returns_set_values() {
        let latch = Arc::new(OutputLatch::new());
        let plant = SimulatedPlant::fixed(latch, [1650, 4000, 100]);
        assert_eq!(plant.convert(SensorChannel::Temperature), 1650);
        assert_eq!(plant.convert(SensorChannel::Moisture), 4000);
        plant.set(SensorChannel::Light, 9999);
        assert_eq!(plant.convert(SensorChannel::Light), 4095);
    }

    #[test]
    fn test_dynamic_plant_relaxes_toward_ambient() {
        let latch = Arc::new(OutputLatch::new());
        let dynamics = PlantDynamics::default();
        let plant = SimulatedPlant::dynamic(latch, dynamics);
        plant.set(SensorChannel::Temperature, 1503);

        assert_eq!(plant.convert(SensorChannel::Temperature), 1501);
        assert_eq!(plant.convert(SensorChannel::Temperature), 1500);
        assert_eq!(plant.convert(SensorChannel::Temperature), 1500);
    }

    #[test]
    fn test_dynamic_plant_rises_while_actuator_on() {
        let latch = Arc::new(OutputLatch::new());
        let plant = SimulatedPlant::dynamic(latch.clone(), PlantDynamics::default());
        plant.set(SensorChannel::Moisture, 4090);
        latch.set(Actuator::Sprinkler, true);

        assert_eq!(plant.convert(SensorChannel::Moisture), 4095);
        assert_eq!(plant.convert(SensorChannel::Moisture), 4095);
        assert_eq!(plant.peek(SensorChannel::Temperature), 1500);
    }
}
