//! Serial telemetry line.
//!
//! Format: `TEMP:<int>|MOIST:<int>|LIGHT:<int>\n`, raw readings, no padding.

use crate::env::{EnvState, SharedEnvironment};
use crate::runtime::RunContext;
use core::fmt::Write as _;
use greenhouse_common::consts::TELEMETRY_LINE_MAX;
use greenhouse_common::hal::driver::SerialTx;
use greenhouse_common::hal::types::SensorChannel;
use std::time::Duration;
use tracing::{debug, trace};

pub type TelemetryLine = heapless::String<TELEMETRY_LINE_MAX>;

/// Render the readings of `state` as one telemetry line.
pub fn format_line(state: &EnvState) -> TelemetryLine {
    let mut line = TelemetryLine::new();
    for (i, channel) in SensorChannel::ALL.into_iter().enumerate() {
        let sep = if i == 0 { "" } else { "|" };
        // Longest possible line is 32 bytes.
        let _ = write!(line, "{}{}:{}", sep, channel.telemetry_key(), state.reading(channel));
    }
    let _ = line.push('\n');
    line
}

/// Decoded telemetry line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TelemetryFrame {
    pub temperature: u16,
    pub moisture: u16,
    pub light: u16,
}

impl TelemetryFrame {
    /// Parse a line by splitting on `|` and `:`. The trailing newline is
    /// optional. Keys must appear in transmission order.
    pub fn parse(line: &str) -> Option<Self> {
        let mut values = [0u16; 3];
        let mut fields = line.trim_end_matches('\n').split('|');
        for (channel, slot) in SensorChannel::ALL.into_iter().zip(values.iter_mut()) {
            let (key, value) = fields.next()?.split_once(':')?;
            if key != channel.telemetry_key() {
                return None;
            }
            *slot = value.parse().ok()?;
        }
        if fields.next().is_some() {
            return None;
        }
        Some(Self {
            temperature: values[0],
            moisture: values[1],
            light: values[2],
        })
    }
}

/// Format under the environment lock, transmit after releasing it.
pub fn report_once(env: &SharedEnvironment, tx: &mut dyn SerialTx) {
    let line = {
        let state = env.lock();
        format_line(&state)
    };
    trace!("telemetry {}", line.trim_end());
    tx.write_bytes(line.as_bytes());
}

/// Telemetry thread body.
pub fn run(ctx: &RunContext, tx: &mut dyn SerialTx, period: Duration) {
    debug!("telemetry running, period {:?}", period);
    while ctx.is_running() {
        report_once(&ctx.env, tx);
        if !ctx.pace(period) {
            break;
        }
    }
    debug!("telemetry stopped");
}
