//! Hardware-facing value types.
//!
//! This module defines the small vocabulary shared by the HAL drivers and the
//! controller runtime:
//! - `SensorChannel` - The three analog inputs
//! - `Actuator` - The three output lines and their control descriptors
//! - `Comparison` - Direction of a threshold test
//! - `Buttons` / `JoystickPins` - Five-way input decoding
//! - `Color` - 24-bit display colors

use crate::consts::ADC_MAX;
use bitflags::bitflags;
use core::fmt;
use serde::{Deserialize, Serialize};

/// Clamp any signed intermediate into the 12-bit sensor domain.
#[inline]
pub fn clamp_adc(value: i32) -> u16 {
    value.clamp(0, ADC_MAX as i32) as u16
}

// ─── SensorChannel ──────────────────────────────────────────────────

/// Analog input channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum SensorChannel {
    Temperature = 0,
    Moisture = 1,
    Light = 2,
}

impl SensorChannel {
    /// All channels in conversion order.
    pub const ALL: [SensorChannel; 3] = [Self::Temperature, Self::Moisture, Self::Light];

    /// Array slot of this channel.
    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Key used in the telemetry line.
    pub const fn telemetry_key(self) -> &'static str {
        match self {
            Self::Temperature => "TEMP",
            Self::Moisture => "MOIST",
            Self::Light => "LIGHT",
        }
    }

    /// Label used on the sensor screen.
    pub const fn label(self) -> &'static str {
        match self {
            Self::Temperature => "Temp",
            Self::Moisture => "Moist",
            Self::Light => "Light",
        }
    }
}

// ─── Comparison ─────────────────────────────────────────────────────

/// Direction of a threshold test.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Comparison {
    /// Fires when the reading is at or above the threshold.
    AtLeast,
    /// Fires when the reading is at or below the threshold.
    AtMost,
}

impl Comparison {
    /// Evaluate `reading <op> threshold`.
    #[inline]
    pub const fn holds(self, reading: u16, threshold: u16) -> bool {
        match self {
            Self::AtLeast => reading >= threshold,
            Self::AtMost => reading <= threshold,
        }
    }
}

// ─── Actuator ───────────────────────────────────────────────────────

/// Actuator output line identifier.
///
/// Each actuator is bound to exactly one sensor channel and comparison;
/// this replaces per-actuator copies of the monitor, controller and
/// threshold screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Actuator {
    Heater = 0,
    Sprinkler = 1,
    Light = 2,
}

impl Actuator {
    /// All actuators in display order.
    pub const ALL: [Actuator; 3] = [Self::Heater, Self::Sprinkler, Self::Light];

    /// Array slot of this actuator.
    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Inverse of [`Actuator::index`].
    pub const fn from_index(index: usize) -> Option<Self> {
        match index {
            0 => Some(Self::Heater),
            1 => Some(Self::Sprinkler),
            2 => Some(Self::Light),
            _ => None,
        }
    }

    /// Human-readable label.
    pub const fn label(self) -> &'static str {
        match self {
            Self::Heater => "Heater",
            Self::Sprinkler => "Sprinkler",
            Self::Light => "Light",
        }
    }

    /// Lowercase name used for thread names and config sections.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Heater => "heater",
            Self::Sprinkler => "sprinkler",
            Self::Light => "light",
        }
    }

    /// Token that names this actuator on the serial command line.
    pub const fn command_token(self) -> &'static str {
        match self {
            Self::Heater => "HEATER",
            Self::Sprinkler => "SPRINKLER",
            Self::Light => "LIGHT",
        }
    }

    /// Sensor channel that drives this actuator.
    pub const fn channel(self) -> SensorChannel {
        match self {
            Self::Heater => SensorChannel::Temperature,
            Self::Sprinkler => SensorChannel::Moisture,
            Self::Light => SensorChannel::Light,
        }
    }

    /// Heater fires when too warm a reading is seen; sprinkler and light
    /// fire when the soil is too dry or the house too dark.
    pub const fn comparison(self) -> Comparison {
        match self {
            Self::Heater => Comparison::AtLeast,
            Self::Sprinkler | Self::Light => Comparison::AtMost,
        }
    }
}

impl fmt::Display for Actuator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// ─── Buttons ────────────────────────────────────────────────────────

bitflags! {
    /// Pressed directions of the five-way input, active-high.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct Buttons: u8 {
        const UP = 0x01;
        const DOWN = 0x02;
        const CENTER = 0x04;
        const LEFT = 0x08;
        const RIGHT = 0x10;
    }
}

impl Buttons {
    /// Decode a raw port sample. Lines are active-low: a cleared bit is a
    /// pressed direction.
    pub fn from_port(port: u32, pins: &JoystickPins) -> Self {
        let mut pressed = Buttons::empty();
        for (bit, button) in pins.lines() {
            if port & (1u32 << bit) == 0 {
                pressed |= button;
            }
        }
        pressed
    }

    /// Encode pressed directions back into an active-low port sample with
    /// every other bit held high.
    pub fn to_port(self, pins: &JoystickPins) -> u32 {
        let mut port = u32::MAX;
        for (bit, button) in pins.lines() {
            if self.contains(button) {
                port &= !(1u32 << bit);
            }
        }
        port
    }

    /// Directions set now and clear in `previous`.
    #[inline]
    pub fn rising_since(self, previous: Buttons) -> Buttons {
        self & !previous
    }
}

/// Port bit positions of the five joystick lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct JoystickPins {
    pub up: u8,
    pub down: u8,
    pub center: u8,
    pub left: u8,
    pub right: u8,
}

impl JoystickPins {
    /// Pair every bit position with its direction.
    pub fn lines(&self) -> [(u8, Buttons); 5] {
        [
            (self.up, Buttons::UP),
            (self.down, Buttons::DOWN),
            (self.center, Buttons::CENTER),
            (self.left, Buttons::LEFT),
            (self.right, Buttons::RIGHT),
        ]
    }
}

impl Default for JoystickPins {
    fn default() -> Self {
        Self {
            up: 23,
            down: 25,
            center: 20,
            left: 24,
            right: 26,
        }
    }
}

// ─── Color ──────────────────────────────────────────────────────────

/// 24-bit RGB display color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Color(pub u32);

impl Color {
    pub const WHITE: Color = Color(0xFF_FFFF);
    pub const BLACK: Color = Color(0x00_0000);
    pub const BLUE: Color = Color(0x00_00FF);
    pub const RED: Color = Color(0xFF_0000);
    /// Background of a highlighted row.
    pub const GRAY: Color = Color(0xC0_C0C0);
}
