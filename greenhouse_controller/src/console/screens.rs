//! Per-screen input steps.

use super::{Console, MENU_LAST, Screen, render};
use greenhouse_common::hal::types::{Actuator, Buttons};
use tracing::debug;

const MENU_KEYS: Buttons = Buttons::UP.union(Buttons::DOWN).union(Buttons::CENTER);
const TOGGLE_KEYS: Buttons = Buttons::LEFT.union(Buttons::RIGHT);

impl Console {
    pub(super) fn menu_step(&mut self, sample: Buttons, now: u64) {
        if !self.menu_drawn {
            self.draw_menu();
        }
        let edges = self.debouncer.poll(sample, now, MENU_KEYS);
        let previous = self.menu_index;

        if edges.contains(Buttons::UP) {
            self.menu_index = self.menu_index.saturating_sub(1);
        } else if edges.contains(Buttons::DOWN) {
            self.menu_index = (self.menu_index + 1).min(MENU_LAST);
        } else if edges.contains(Buttons::CENTER) {
            match Screen::from_menu_index(self.menu_index) {
                Some(screen) => self.enter(screen, sample),
                None => debug!("menu exit entry selected"),
            }
            return;
        }

        if self.menu_index != previous {
            let selected = self.menu_index;
            self.with_display(|d| render::menu_highlight(d, previous, selected));
        }
    }

    pub(super) fn sensor_step(&mut self, sample: Buttons, now: u64) {
        self.with_display(|d| {
            // Display lock first, environment lock inside it.
            let readings = self.env.lock().readings();
            render::sensor_frame(d, readings);
        });
        if self.debouncer.poll(sample, now, Buttons::CENTER).contains(Buttons::CENTER) {
            self.leave(sample);
        }
    }

    pub(super) fn actuator_step(&mut self, sample: Buttons, now: u64) {
        let edges = self.debouncer.poll(sample, now, Buttons::all());
        let previous = self.actuator_index;

        if edges.contains(Buttons::UP) {
            self.actuator_index = self.actuator_index.saturating_sub(1);
        }
        if edges.contains(Buttons::DOWN) {
            self.actuator_index = (self.actuator_index + 1).min(Actuator::ALL.len() - 1);
        }
        let selected = self.selected_actuator();
        let toggled = edges.intersects(TOGGLE_KEYS);
        if toggled {
            let on = self.io.outputs.toggle(selected);
            debug!("console toggled {} {}", selected, if on { "ON" } else { "OFF" });
        }
        if edges.contains(Buttons::CENTER) {
            self.leave(sample);
            return;
        }

        let moved = self.actuator_index != previous;
        if moved || toggled {
            let states = self.output_states();
            self.with_display(|d| {
                if let Some(old) = Actuator::from_index(previous).filter(|_| moved) {
                    render::actuator_row(d, old, false, states[old.index()]);
                }
                render::actuator_row(d, selected, true, states[selected.index()]);
            });
        }
    }

    pub(super) fn threshold_step(&mut self, actuator: Actuator, sample: Buttons, now: u64) {
        let edges = self.debouncer.poll(sample, now, MENU_KEYS);
        let step = self.settings.threshold_step as i32;

        for (key, delta) in [(Buttons::UP, step), (Buttons::DOWN, -step)] {
            if edges.contains(key) {
                let value = self.env.lock().adjust_threshold(actuator, delta);
                debug!("{} threshold {}", actuator, value);
                self.with_display(|d| render::threshold_value(d, value));
            }
        }
        if edges.contains(Buttons::CENTER) {
            self.leave(sample);
        }
    }
}
