//! Thread supervisor.
//!
//! `Greenhouse::start` builds the shared context from a configuration and a
//! driver's peripherals and spawns the fixed thread set:
//!
//! | Thread              | Body                               | Period            |
//! |---------------------|------------------------------------|-------------------|
//! | `sampler`           | [`sampler::run`]                   | `sample_period`   |
//! | `telemetry`         | [`telemetry::run`]                 | `telemetry_period`|
//! | `monitor-<name>` ×3 | [`actuation::run_monitor`]         | `monitor_period`  |
//! | `controller-<name>` ×3 | [`Controller::run`]             | signal-driven     |
//! | `command`           | [`CommandChannel::run`]            | `command_poll`    |
//! | `console`           | [`Console::run`]                   | `console.poll`    |
//!
//! No thread is created or destroyed while running. `shutdown` clears the
//! running flag, closes the signals and joins everything.

use crate::actuation::{self, Controller};
use crate::command::CommandChannel;
use crate::console::{Console, ConsoleIo, ConsoleSettings, SharedDisplay};
use crate::env::SharedEnvironment;
use crate::sampler;
use crate::signal::Signal;
use crate::telemetry;
use greenhouse_common::config::{ConfigError, GreenhouseConfig};
use greenhouse_common::hal::clock::Clock;
use greenhouse_common::hal::driver::{HalError, OutputLines, Peripherals};
use greenhouse_common::hal::types::Actuator;
use parking_lot::Mutex;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread::{self, JoinHandle};
use std::time::Duration;
use thiserror::Error;
use tracing::{info, warn};

/// Longest uninterrupted sleep of a periodic thread, so shutdown is noticed
/// promptly even with multi-second periods.
const PACE_SLICE: Duration = Duration::from_millis(50);

/// Startup errors. Running threads never report errors.
#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error("HAL error: {0}")]
    Hal(#[from] HalError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Failed to spawn thread '{name}': {source}")]
    Spawn {
        name: String,
        #[source]
        source: std::io::Error,
    },
}

/// State shared by every runtime thread.
#[derive(Clone)]
pub struct RunContext {
    pub env: Arc<SharedEnvironment>,
    pub clock: Arc<dyn Clock>,
    running: Arc<AtomicBool>,
}

impl RunContext {
    pub fn new(env: Arc<SharedEnvironment>, clock: Arc<dyn Clock>) -> Self {
        Self {
            env,
            clock,
            running: Arc::new(AtomicBool::new(true)),
        }
    }

    #[inline]
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    pub fn running_flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.running)
    }

    /// Sleep for `period` in short slices. Returns `false` as soon as the
    /// running flag is cleared.
    pub fn pace(&self, period: Duration) -> bool {
        let mut remaining = period;
        while !remaining.is_zero() {
            if !self.is_running() {
                return false;
            }
            let slice = remaining.min(PACE_SLICE);
            self.clock.sleep(slice);
            remaining -= slice;
        }
        self.is_running()
    }
}

/// The running controller.
pub struct Greenhouse {
    ctx: RunContext,
    outputs: Arc<dyn OutputLines>,
    signals: [Arc<Signal>; 3],
    threads: Vec<JoinHandle<()>>,
}

impl Greenhouse {
    /// Validate `config`, build the shared context and spawn all threads.
    pub fn start(config: &GreenhouseConfig, peripherals: Peripherals) -> Result<Self, RuntimeError> {
        let mut config = config.clone();
        config.normalize();
        config.validate()?;

        let Peripherals {
            sensors,
            outputs,
            input,
            display,
            mut serial_tx,
            serial_rx,
            clock,
        } = peripherals;

        let thresholds = Actuator::ALL.map(|a| config.actuator(a).threshold);
        let env = Arc::new(SharedEnvironment::new(thresholds));
        let ctx = RunContext::new(Arc::clone(&env), Arc::clone(&clock));
        let signals = Actuator::ALL.map(|_| Arc::new(Signal::new()));

        info!(
            "Starting greenhouse '{}': thresholds heater={} sprinkler={} light={}, pulse lock {:?}",
            config.shared.service_name,
            thresholds[0],
            thresholds[1],
            thresholds[2],
            config.actuation.pulse_lock
        );

        let mut greenhouse = Self {
            ctx: ctx.clone(),
            outputs: Arc::clone(&outputs),
            signals: signals.clone(),
            threads: Vec::with_capacity(10),
        };

        let timing = config.timing.clone();

        let c = ctx.clone();
        let period = timing.sample_period();
        greenhouse.spawn("sampler", move || sampler::run(&c, sensors.as_ref(), period))?;

        let c = ctx.clone();
        let period = timing.telemetry_period();
        greenhouse.spawn("telemetry", move || {
            telemetry::run(&c, serial_tx.as_mut(), period)
        })?;

        for actuator in Actuator::ALL {
            let c = ctx.clone();
            let signal = Arc::clone(&signals[actuator.index()]);
            let period = timing.monitor_period();
            greenhouse.spawn(&format!("monitor-{}", actuator.name()), move || {
                actuation::run_monitor(&c, actuator, &signal, period)
            })?;
        }

        let controllers = Controller::for_config(&config, &env, &outputs, &clock);
        for controller in controllers {
            let signal = Arc::clone(&signals[controller.actuator().index()]);
            let name = format!("controller-{}", controller.actuator().name());
            greenhouse.spawn(&name, move || controller.run(&signal))?;
        }

        let c = ctx.clone();
        let period = timing.command_poll();
        let mut channel = CommandChannel::new(serial_rx, Arc::clone(&outputs));
        greenhouse.spawn("command", move || channel.run(&c, period))?;

        let c = ctx.clone();
        let shared_display: SharedDisplay = Arc::new(Mutex::new(display));
        let io = ConsoleIo {
            input,
            display: shared_display,
            outputs: Arc::clone(&outputs),
            clock,
        };
        let mut console = Console::new(ConsoleSettings::from_config(&config), io, Arc::clone(&env));
        greenhouse.spawn("console", move || console.run(&c))?;

        info!("Greenhouse running with {} threads", greenhouse.threads.len());
        Ok(greenhouse)
    }

    fn spawn<F>(&mut self, name: &str, body: F) -> Result<(), RuntimeError>
    where
        F: FnOnce() + Send + 'static,
    {
        let handle = thread::Builder::new()
            .name(name.to_string())
            .spawn(body)
            .map_err(|source| RuntimeError::Spawn {
                name: name.to_string(),
                source,
            })?;
        self.threads.push(handle);
        Ok(())
    }

    pub fn environment(&self) -> Arc<SharedEnvironment> {
        Arc::clone(&self.ctx.env)
    }

    pub fn outputs(&self) -> Arc<dyn OutputLines> {
        Arc::clone(&self.outputs)
    }

    /// Monitor-to-controller signal of `actuator`.
    pub fn signal(&self, actuator: Actuator) -> Arc<Signal> {
        Arc::clone(&self.signals[actuator.index()])
    }

    /// Flag cleared by [`Greenhouse::shutdown`]; signal handlers may clear it
    /// directly.
    pub fn running_flag(&self) -> Arc<AtomicBool> {
        self.ctx.running_flag()
    }

    pub fn is_running(&self) -> bool {
        self.ctx.is_running()
    }

    pub fn thread_count(&self) -> usize {
        self.threads.len()
    }

    /// Block until the running flag is cleared.
    pub fn wait(&self) {
        while self.ctx.pace(Duration::from_millis(100)) {}
    }

    fn stop(&self) {
        self.ctx.running.store(false, Ordering::SeqCst);
        for signal in &self.signals {
            signal.close();
        }
    }

    /// Stop every thread and wait for it. A controller mid-pulse finishes
    /// its pulse first.
    pub fn shutdown(mut self) {
        info!("Shutdown requested");
        self.halt();
        info!("Greenhouse stopped");
    }

    /// Clear the flag, join whatever was spawned and drive every output low.
    /// Also runs when startup fails part way, through `Drop`.
    fn halt(&mut self) {
        self.stop();
        for handle in self.threads.drain(..) {
            let name = handle.thread().name().unwrap_or("?").to_string();
            if handle.join().is_err() {
                warn!("Thread '{}' panicked", name);
            }
        }
        for actuator in Actuator::ALL {
            self.outputs.set(actuator, false);
        }
    }
}

impl Drop for Greenhouse {
    fn drop(&mut self) {
        self.halt();
    }
}
