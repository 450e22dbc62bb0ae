//! Periodic sensor sampling.

use crate::env::SharedEnvironment;
use crate::runtime::RunContext;
use greenhouse_common::hal::driver::SensorBus;
use greenhouse_common::hal::types::SensorChannel;
use std::time::Duration;
use tracing::{debug, trace};

/// Convert all three channels and store them, holding the environment lock
/// across the conversions.
pub fn sample_once(env: &SharedEnvironment, sensors: &dyn SensorBus) -> [u16; 3] {
    let mut state = env.lock();
    for channel in SensorChannel::ALL {
        state.set_reading(channel, sensors.convert(channel));
    }
    let readings = state.readings();
    drop(state);
    trace!(
        "sampled temp={} moist={} light={}",
        readings[0], readings[1], readings[2]
    );
    readings
}

/// Sampler thread body.
pub fn run(ctx: &RunContext, sensors: &dyn SensorBus, period: Duration) {
    debug!("sampler running, period {:?}", period);
    while ctx.is_running() {
        sample_once(&ctx.env, sensors);
        if !ctx.pace(period) {
            break;
        }
    }
    debug!("sampler stopped");
}

#[cfg(test)]
mod tests {
    use super::*;
    use greenhouse_common::hal::types::Actuator;
    use greenhouse_hal::drivers::simulation::{OutputLatch, SimulatedPlant};
    use std::sync::Arc;

    #[test]
    fn sample_once_stores_all_channels() {
        let plant = SimulatedPlant::fixed(Arc::new(OutputLatch::new()), [1650, 4000, 12]);
        let env = SharedEnvironment::new([1600, 4095, 4091]);

        assert_eq!(sample_once(&env, &plant), [1650, 4000, 12]);
        assert_eq!(env.snapshot().reading(SensorChannel::Moisture), 4000);

        plant.set(SensorChannel::Light, 300);
        sample_once(&env, &plant);
        assert_eq!(env.snapshot().reading(SensorChannel::Light), 300);
        assert_eq!(env.snapshot().threshold(Actuator::Heater), 1600);
    }
}
