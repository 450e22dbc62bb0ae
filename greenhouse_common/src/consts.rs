//! System-wide constants for the greenhouse workspace.
//!
//! Single source of truth for sensor ranges, timing defaults and display
//! geometry. Imported by all crates.

/// Largest value a 12-bit conversion can produce.
pub const ADC_MAX: u16 = 4095;

/// Number of sensor channels (temperature, moisture, light).
pub const SENSOR_CHANNELS: usize = 3;

/// Number of actuator output lines (heater, sprinkler, light).
pub const ACTUATOR_COUNT: usize = 3;

/// Default sampling period of the sensor thread (ms).
pub const DEFAULT_SAMPLE_PERIOD_MS: u64 = 1000;

/// Default telemetry period (ms).
pub const DEFAULT_TELEMETRY_PERIOD_MS: u64 = 3000;

/// Default threshold evaluation period (ms).
pub const DEFAULT_MONITOR_PERIOD_MS: u64 = 1000;

/// Default serial receive poll interval (ms).
pub const DEFAULT_COMMAND_POLL_MS: u64 = 10;

/// Default console input poll interval (ms).
pub const DEFAULT_CONSOLE_POLL_MS: u64 = 20;

/// Minimum spacing between two accepted console actions (ms).
pub const DEFAULT_DEBOUNCE_MS: u64 = 100;

/// Threshold increment applied per Up/Down press.
pub const DEFAULT_THRESHOLD_STEP: u16 = 10;

/// Longest command line kept before a terminator is forced.
pub const COMMAND_LINE_MAX: usize = 63;

/// Capacity of one formatted telemetry line.
pub const TELEMETRY_LINE_MAX: usize = 64;

/// Pixel height of one text row.
pub const ROW_HEIGHT: u32 = 24;

/// Width of a blanked text row, in characters.
pub const ROW_CHARS: usize = 20;

/// Default serial line rate (informational; bring-up is external).
pub const DEFAULT_BAUD: u32 = 9600;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn constants_are_consistent() {
        assert_eq!(ADC_MAX, (1 << 12) - 1);
        assert_eq!(SENSOR_CHANNELS, ACTUATOR_COUNT);
        assert!(COMMAND_LINE_MAX < TELEMETRY_LINE_MAX);
        assert!(DEFAULT_DEBOUNCE_MS > DEFAULT_CONSOLE_POLL_MS);
        assert!(DEFAULT_TELEMETRY_PERIOD_MS >= DEFAULT_SAMPLE_PERIOD_MS);
    }
}
