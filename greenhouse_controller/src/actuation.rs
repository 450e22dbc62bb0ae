//! Threshold monitors and actuation controllers.
//!
//! One monitor/controller pair per [`Actuator`]. The monitor evaluates the
//! actuator's condition periodically and raises the pair's [`Signal`]; the
//! controller waits on the signal, re-checks the condition against the
//! current reading and, when it still holds, pulses the output.
//!
//! ## Lock discipline
//!
//! With [`PulseLock::Hold`] the controller keeps the environment lock from
//! the re-check until the output is switched off again. All pulses are
//! therefore serialized system-wide and sampling, monitoring and telemetry
//! stall for the pulse duration.
//!
//! With [`PulseLock::Release`] the environment lock is dropped after the
//! re-check. A separate pulse lock, shared by all controllers, still keeps at
//! most one actuator mid-pulse.

use crate::env::SharedEnvironment;
use crate::runtime::RunContext;
use crate::signal::Signal;
use greenhouse_common::config::{GreenhouseConfig, PulseLock};
use greenhouse_common::hal::clock::Clock;
use greenhouse_common::hal::driver::OutputLines;
use greenhouse_common::hal::types::Actuator;
use parking_lot::Mutex;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, trace};

/// Evaluate `actuator`'s condition under the lock and raise `signal` when it
/// holds. Returns whether the condition held.
pub fn monitor_once(env: &SharedEnvironment, actuator: Actuator, signal: &Signal) -> bool {
    let holds = env.lock().condition_holds(actuator);
    if holds && signal.raise() {
        trace!("{} signal raised", actuator);
    }
    holds
}

/// Monitor thread body.
pub fn run_monitor(ctx: &RunContext, actuator: Actuator, signal: &Signal, period: Duration) {
    debug!("{} monitor running, period {:?}", actuator, period);
    while ctx.is_running() {
        monitor_once(&ctx.env, actuator, signal);
        if !ctx.pace(period) {
            break;
        }
    }
    debug!("{} monitor stopped", actuator);
}

/// Result of one controller wake-up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PulseOutcome {
    /// Output was driven on for the pulse duration and off again.
    Fired,
    /// Condition no longer held at the re-check.
    Skipped,
}

/// Drives one actuator output in bounded pulses.
pub struct Controller {
    actuator: Actuator,
    pulse: Duration,
    mode: PulseLock,
    env: Arc<SharedEnvironment>,
    outputs: Arc<dyn OutputLines>,
    clock: Arc<dyn Clock>,
    /// Shared by all controllers; only taken in [`PulseLock::Release`] mode.
    pulse_lock: Arc<Mutex<()>>,
}

impl Controller {
    pub fn new(
        actuator: Actuator,
        pulse: Duration,
        mode: PulseLock,
        env: Arc<SharedEnvironment>,
        outputs: Arc<dyn OutputLines>,
        clock: Arc<dyn Clock>,
        pulse_lock: Arc<Mutex<()>>,
    ) -> Self {
        Self {
            actuator,
            pulse,
            mode,
            env,
            outputs,
            clock,
            pulse_lock,
        }
    }

    /// Build the three controllers described by `config`, sharing one
    /// pulse lock.
    pub fn for_config(
        config: &GreenhouseConfig,
        env: &Arc<SharedEnvironment>,
        outputs: &Arc<dyn OutputLines>,
        clock: &Arc<dyn Clock>,
    ) -> [Controller; 3] {
        let pulse_lock = Arc::new(Mutex::new(()));
        Actuator::ALL.map(|actuator| {
            Controller::new(
                actuator,
                config.actuator(actuator).pulse(),
                config.actuation.pulse_lock,
                Arc::clone(env),
                Arc::clone(outputs),
                Arc::clone(clock),
                Arc::clone(&pulse_lock),
            )
        })
    }

    pub fn actuator(&self) -> Actuator {
        self.actuator
    }

    /// Re-check the condition and pulse the output if it still holds.
    pub fn actuate(&self) -> PulseOutcome {
        match self.mode {
            PulseLock::Hold => {
                let state = self.env.lock();
                if !state.condition_holds(self.actuator) {
                    return self.skipped();
                }
                self.pulse_output();
                drop(state);
            }
            PulseLock::Release => {
                let _pulse = self.pulse_lock.lock();
                if !self.env.lock().condition_holds(self.actuator) {
                    return self.skipped();
                }
                self.pulse_output();
            }
        }
        PulseOutcome::Fired
    }

    /// Controller thread body. Returns when the signal is closed.
    pub fn run(&self, signal: &Signal) {
        debug!("{} controller running, pulse {:?}", self.actuator, self.pulse);
        while signal.wait() {
            self.actuate();
        }
        debug!("{} controller stopped", self.actuator);
    }

    fn pulse_output(&self) {
        debug!("{} on for {:?}", self.actuator, self.pulse);
        self.outputs.set(self.actuator, true);
        self.clock.sleep(self.pulse);
        self.outputs.set(self.actuator, false);
        debug!("{} off", self.actuator);
    }

    fn skipped(&self) -> PulseOutcome {
        debug!("{} pulse skipped, condition cleared", self.actuator);
        PulseOutcome::Skipped
    }
}
