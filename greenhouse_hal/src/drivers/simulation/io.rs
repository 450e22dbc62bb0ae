//! Digital I/O simulation.
//!
//! - `OutputLatch` - Active-high actuator lines with an event history
//! - `SimJoystick` / `JoystickHandle` - Scripted active-low five-way input

use greenhouse_common::hal::driver::{InputDevice, OutputLines};
use greenhouse_common::hal::types::{Actuator, Buttons, JoystickPins};
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Instant;
use tracing::trace;

/// Oldest line events are dropped beyond this many entries.
const EVENT_HISTORY: usize = 1024;

/// One level change on an output line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineEvent {
    pub actuator: Actuator,
    pub on: bool,
    pub at: Instant,
}

/// Output latch for the three actuator lines.
///
/// Writes that do not change the level are not recorded.
#[derive(Debug, Default)]
pub struct OutputLatch {
    lines: [AtomicBool; 3],
    events: Mutex<VecDeque<LineEvent>>,
}

impl OutputLatch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the recorded level changes, oldest first.
    pub fn events(&self) -> Vec<LineEvent> {
        self.events.lock().iter().copied().collect()
    }

    /// Number of off→on transitions seen on `actuator`.
    pub fn rising_edges(&self, actuator: Actuator) -> usize {
        self.events
            .lock()
            .iter()
            .filter(|e| e.actuator == actuator && e.on)
            .count()
    }

    /// Forget the recorded history.
    pub fn clear_events(&self) {
        self.events.lock().clear();
    }
}

impl OutputLines for OutputLatch {
    fn set(&self, actuator: Actuator, on: bool) {
        // Level change and its record happen under one lock so the history
        // replays to the current levels.
        let mut events = self.events.lock();
        let previous = self.lines[actuator.index()].swap(on, Ordering::SeqCst);
        if previous != on {
            trace!("{} line {}", actuator, if on { "HIGH" } else { "LOW" });
            if events.len() == EVENT_HISTORY {
                events.pop_front();
            }
            events.push_back(LineEvent {
                actuator,
                on,
                at: Instant::now(),
            });
        }
    }

    fn is_on(&self, actuator: Actuator) -> bool {
        self.lines[actuator.index()].load(Ordering::SeqCst)
    }
}

// ─── Joystick ───────────────────────────────────────────────────────

#[derive(Debug, Default)]
struct JoystickState {
    /// Samples returned one per read before falling back to `held`.
    script: VecDeque<Buttons>,
    held: Buttons,
}

/// Simulated five-way joystick producing active-low port samples.
pub struct SimJoystick {
    pins: JoystickPins,
    state: Arc<Mutex<JoystickState>>,
}

/// Test-side handle controlling a [`SimJoystick`].
#[derive(Clone)]
pub struct JoystickHandle {
    state: Arc<Mutex<JoystickState>>,
}

impl SimJoystick {
    pub fn new(pins: JoystickPins) -> (Self, JoystickHandle) {
        let state = Arc::new(Mutex::new(JoystickState::default()));
        (
            Self {
                pins,
                state: Arc::clone(&state),
            },
            JoystickHandle { state },
        )
    }
}

impl InputDevice for SimJoystick {
    fn read_port(&mut self) -> u32 {
        let mut state = self.state.lock();
        let pressed = state.script.pop_front().unwrap_or(state.held);
        pressed.to_port(&self.pins)
    }
}

impl JoystickHandle {
    /// Queue samples returned by the next reads, one per read.
    pub fn script<I: IntoIterator<Item = Buttons>>(&self, samples: I) {
        self.state.lock().script.extend(samples);
    }

    /// Queue a press lasting `samples` reads followed by one released read.
    pub fn tap(&self, buttons: Buttons, samples: usize) {
        let mut state = self.state.lock();
        state.script.extend(std::iter::repeat_n(buttons, samples));
        state.script.push_back(Buttons::empty());
    }

    /// Directions reported once the script is exhausted.
    pub fn hold(&self, buttons: Buttons) {
        self.state.lock().held = buttons;
    }

    /// Scripted samples not yet consumed.
    pub fn pending(&self) -> usize {
        self.state.lock().script.len()
    }
}
