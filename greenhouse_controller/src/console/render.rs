//! Screen layouts.
//!
//! Text rows sit on a 24-pixel grid. Every function here expects the caller
//! to hold the display lock for the whole call and leaves the background
//! color set to white.

use core::fmt::{self, Write as _};
use greenhouse_common::consts::ROW_HEIGHT;
use greenhouse_common::hal::driver::Display;
use greenhouse_common::hal::types::{Actuator, Color, SensorChannel};

pub const MENU_TITLE: &str = "Greenhouse Menu";

pub const MENU_ITEMS: [&str; 6] = [
    "Show Sensors Data",
    "Manual Control",
    "Adjust Heater Thresh",
    "Adjust Sprinkler Thresh",
    "Adjust Light Thresh",
    "Exit Menu",
];

/// One full row of spaces, drawn to erase a row before repainting it.
pub const BLANK_ROW: &str = "                    ";

/// Menu entries start two rows below the title.
pub const MENU_FIRST_ROW: u32 = 2;
pub const ACTUATOR_FIRST_ROW: u32 = 2;
pub const THRESHOLD_VALUE_ROW: u32 = 4;
pub const SENSOR_FIRST_ROW: u32 = 4;

const HIGHLIGHT: Color = Color::GRAY;

type RowText = heapless::String<48>;

fn text(args: fmt::Arguments<'_>) -> RowText {
    let mut s = RowText::new();
    // Longest row is well under capacity.
    let _ = s.write_fmt(args);
    s
}

#[inline]
fn y(row: u32) -> u32 {
    row * ROW_HEIGHT
}

fn item_background(selected: bool) -> Color {
    if selected { HIGHLIGHT } else { Color::WHITE }
}

fn marker(selected: bool) -> &'static str {
    if selected { "> " } else { "" }
}

/// Blank the whole surface.
pub fn clear(d: &mut dyn Display) {
    d.set_background(Color::WHITE);
    d.clear();
}

// ─── Main menu ──────────────────────────────────────────────────────

pub fn menu_row(menu_index: usize) -> u32 {
    menu_index as u32 + MENU_FIRST_ROW
}

/// Repaint the title and every entry.
pub fn menu_full(d: &mut dyn Display, selected: usize) {
    clear(d);
    d.set_foreground(Color::BLUE);
    d.draw_string(0, y(0), MENU_TITLE);
    for (i, item) in MENU_ITEMS.iter().enumerate() {
        let is_selected = i == selected;
        d.set_background(item_background(is_selected));
        d.draw_string(0, y(menu_row(i)), &text(format_args!("{}{}", marker(is_selected), item)));
    }
    d.set_background(Color::WHITE);
}

/// Move the highlight: repaint only the previous and the new entry.
pub fn menu_highlight(d: &mut dyn Display, previous: usize, selected: usize) {
    d.set_foreground(Color::BLUE);
    for (index, is_selected) in [(previous, false), (selected, true)] {
        let row = y(menu_row(index));
        d.set_background(item_background(is_selected));
        d.draw_string(0, row, BLANK_ROW);
        d.draw_string(
            0,
            row,
            &text(format_args!("{}{}", marker(is_selected), MENU_ITEMS[index])),
        );
    }
    d.set_background(Color::WHITE);
}

// ─── Actuator control ───────────────────────────────────────────────

pub fn actuator_row_index(actuator: Actuator) -> u32 {
    actuator.index() as u32 + ACTUATOR_FIRST_ROW
}

pub fn actuator_full(d: &mut dyn Display, selected: Actuator, states: [bool; 3]) {
    clear(d);
    d.set_foreground(Color::BLUE);
    d.draw_string(0, y(0), "Actuators Control");
    for actuator in Actuator::ALL {
        actuator_row(d, actuator, actuator == selected, states[actuator.index()]);
    }
    d.set_foreground(Color::RED);
    d.draw_string(0, y(6), "Up/Dn:Select L/R:ON/OFF");
    d.draw_string(0, y(7), "Center:Exit");
}

/// Erase and repaint one actuator row.
pub fn actuator_row(d: &mut dyn Display, actuator: Actuator, selected: bool, on: bool) {
    let row = y(actuator_row_index(actuator));
    d.set_background(item_background(selected));
    d.draw_string(0, row, BLANK_ROW);
    d.set_foreground(Color::BLUE);
    d.draw_string(
        0,
        row,
        &text(format_args!(
            "{}{}: {}",
            marker(selected),
            actuator.label(),
            if on { "ON" } else { "OFF" }
        )),
    );
    d.set_background(Color::WHITE);
}

// ─── Sensor view ────────────────────────────────────────────────────

/// One refresh of the sensor view. The surface is cleared once on entry,
/// not here.
pub fn sensor_frame(d: &mut dyn Display, readings: [u16; 3]) {
    d.set_background(Color::WHITE);
    d.set_foreground(Color::BLACK);
    d.draw_string(0, y(3), BLANK_ROW);
    d.set_foreground(Color::BLUE);
    d.draw_string(0, y(1), "Display sensor Data");
    d.set_foreground(Color::BLACK);
    for (i, channel) in SensorChannel::ALL.into_iter().enumerate() {
        let row = y(SENSOR_FIRST_ROW + i as u32);
        d.draw_string(0, row, BLANK_ROW);
        d.draw_string(
            0,
            row,
            &text(format_args!("{}: {}", channel.label(), readings[channel.index()])),
        );
    }
    d.set_foreground(Color::RED);
    d.draw_string(0, y(7), "Press center to return");
}

// ─── Threshold adjustment ───────────────────────────────────────────

pub fn threshold_full(d: &mut dyn Display, actuator: Actuator, value: u16) {
    clear(d);
    d.set_foreground(Color::BLUE);
    d.draw_string(0, y(0), &text(format_args!("Set {} Threshold", actuator.label())));
    d.draw_string(0, y(2), "Use joystick Up/Down");
    d.draw_string(0, y(3), "to adjust value");
    d.set_foreground(Color::RED);
    d.draw_string(0, y(5), "Center to confirm");
    threshold_value(d, value);
}

/// Repaint only the numeric value row.
pub fn threshold_value(d: &mut dyn Display, value: u16) {
    let row = y(THRESHOLD_VALUE_ROW);
    d.set_background(Color::WHITE);
    d.set_foreground(Color::BLACK);
    d.draw_string(0, row, BLANK_ROW);
    d.draw_string(0, row, &text(format_args!("Threshold: {}", value)));
}
