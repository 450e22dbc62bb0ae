//! Operator console.
//!
//! A finite-state machine over six screens driven by the five-way joystick.
//! [`Console::tick`] takes one input sample and runs the active screen's
//! step; the console thread calls it every poll interval.
//!
//! ```text
//!                 ┌──────────── center ────────────┐
//!                 ▼                                │
//!            ┌──────────┐  center on entry 0..4  ┌──┴───────────────┐
//!   start ──►│ MainMenu │───────────────────────►│ SensorView       │
//!            └──────────┘                        │ ActuatorControl  │
//!             up/down move                       │ Threshold(×3)    │
//!             the highlight                      └──────────────────┘
//! ```
//!
//! Every screen owns the debounce state while it is active; it is reset on
//! each transition. All drawing happens under the display lock, which is
//! never held across a sleep.

pub mod debounce;
pub mod render;
mod screens;

use crate::env::SharedEnvironment;
use crate::runtime::RunContext;
use debounce::Debouncer;
use greenhouse_common::config::GreenhouseConfig;
use greenhouse_common::hal::clock::Clock;
use greenhouse_common::hal::driver::{Display, InputDevice, OutputLines};
use greenhouse_common::hal::types::{Actuator, Buttons, JoystickPins};
use parking_lot::Mutex;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

/// Display shared behind its own lock.
pub type SharedDisplay = Arc<Mutex<Box<dyn Display>>>;

/// Index of the last main-menu entry ("Exit Menu").
pub const MENU_LAST: usize = render::MENU_ITEMS.len() - 1;

/// Active console screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    MainMenu,
    SensorView,
    ActuatorControl,
    Threshold(Actuator),
}

impl Screen {
    /// Screen opened by a main-menu entry. The last entry opens nothing.
    pub fn from_menu_index(index: usize) -> Option<Screen> {
        match index {
            0 => Some(Screen::SensorView),
            1 => Some(Screen::ActuatorControl),
            2 => Some(Screen::Threshold(Actuator::Heater)),
            3 => Some(Screen::Threshold(Actuator::Sprinkler)),
            4 => Some(Screen::Threshold(Actuator::Light)),
            _ => None,
        }
    }
}

/// Console tuning taken from the configuration.
#[derive(Debug, Clone, Copy)]
pub struct ConsoleSettings {
    pub poll: Duration,
    pub debounce_ms: u64,
    pub threshold_step: u16,
    pub pins: JoystickPins,
}

impl ConsoleSettings {
    pub fn from_config(config: &GreenhouseConfig) -> Self {
        Self {
            poll: config.console.poll(),
            debounce_ms: config.console.debounce_ms,
            threshold_step: config.console.threshold_step,
            pins: config.joystick,
        }
    }
}

impl Default for ConsoleSettings {
    fn default() -> Self {
        Self::from_config(&GreenhouseConfig::default())
    }
}

/// Devices the console drives.
pub struct ConsoleIo {
    pub input: Box<dyn InputDevice>,
    pub display: SharedDisplay,
    pub outputs: Arc<dyn OutputLines>,
    pub clock: Arc<dyn Clock>,
}

/// Console state, owned by the console thread.
pub struct Console {
    settings: ConsoleSettings,
    io: ConsoleIo,
    env: Arc<SharedEnvironment>,
    screen: Screen,
    menu_index: usize,
    actuator_index: usize,
    menu_drawn: bool,
    debouncer: Debouncer,
}

impl Console {
    pub fn new(settings: ConsoleSettings, io: ConsoleIo, env: Arc<SharedEnvironment>) -> Self {
        Self {
            debouncer: Debouncer::new(settings.debounce_ms),
            settings,
            io,
            env,
            screen: Screen::MainMenu,
            menu_index: 0,
            actuator_index: 0,
            menu_drawn: false,
        }
    }

    pub fn screen(&self) -> Screen {
        self.screen
    }

    /// Highlighted main-menu entry, 0..=5.
    pub fn menu_index(&self) -> usize {
        self.menu_index
    }

    /// Highlighted row of the actuator screen.
    pub fn selected_actuator(&self) -> Actuator {
        Actuator::from_index(self.actuator_index).unwrap_or(Actuator::Heater)
    }

    /// Take one input sample and advance the active screen.
    pub fn tick(&mut self) -> Screen {
        let sample = Buttons::from_port(self.io.input.read_port(), &self.settings.pins);
        let now = self.io.clock.now_ms();
        match self.screen {
            Screen::MainMenu => self.menu_step(sample, now),
            Screen::SensorView => self.sensor_step(sample, now),
            Screen::ActuatorControl => self.actuator_step(sample, now),
            Screen::Threshold(actuator) => self.threshold_step(actuator, sample, now),
        }
        self.screen
    }

    /// Console thread body.
    pub fn run(&mut self, ctx: &RunContext) {
        debug!("console running, poll {:?}", self.settings.poll);
        while ctx.is_running() {
            self.tick();
            if !ctx.pace(self.settings.poll) {
                break;
            }
        }
        debug!("console stopped on {:?}", self.screen);
    }

    fn with_display<R>(&self, draw: impl FnOnce(&mut dyn Display) -> R) -> R {
        let mut display = self.io.display.lock();
        draw(display.as_mut())
    }

    fn enter(&mut self, screen: Screen, held: Buttons) {
        debug!("console {:?} -> {:?}", self.screen, screen);
        self.screen = screen;
        self.debouncer.reset(held);
        match screen {
            Screen::MainMenu => self.draw_menu(),
            Screen::SensorView => self.with_display(render::clear),
            Screen::ActuatorControl => {
                self.actuator_index = 0;
                let states = self.output_states();
                let selected = self.selected_actuator();
                self.with_display(|d| render::actuator_full(d, selected, states));
            }
            Screen::Threshold(actuator) => {
                let value = self.env.lock().threshold(actuator);
                self.with_display(|d| render::threshold_full(d, actuator, value));
            }
        }
    }

    /// Leave a sub-screen: blank the surface and repaint the whole menu.
    fn leave(&mut self, held: Buttons) {
        self.with_display(render::clear);
        self.enter(Screen::MainMenu, held);
    }

    fn draw_menu(&mut self) {
        let selected = self.menu_index;
        self.with_display(|d| render::menu_full(d, selected));
        self.menu_drawn = true;
    }

    fn output_states(&self) -> [bool; 3] {
        Actuator::ALL.map(|a| self.io.outputs.is_on(a))
    }
}
