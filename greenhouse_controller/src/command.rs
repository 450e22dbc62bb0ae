//! Serial command channel.
//!
//! Bytes are assembled into lines of at most 63 bytes. A line ends at `\n`
//! or when a byte arrives while the buffer is full; in the latter case the
//! buffered bytes are processed as a line and the arriving byte is dropped.
//!
//! Only lines starting with `CMD:` are acted on. Each of the six tokens is
//! searched for independently and every one present is applied, in table
//! order, directly to the output lines. No lock shared with the actuation
//! controllers is taken and nothing is sent back.

use crate::runtime::RunContext;
use greenhouse_common::consts::COMMAND_LINE_MAX;
use greenhouse_common::hal::driver::{OutputLines, SerialRx};
use greenhouse_common::hal::types::Actuator;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, trace};

pub const COMMAND_PREFIX: &[u8] = b"CMD:";

pub type CommandLine = heapless::Vec<u8, COMMAND_LINE_MAX>;

/// One output override.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Command {
    pub actuator: Actuator,
    pub on: bool,
}

impl Command {
    /// Level suffix following the actuator token, `:ON` or `:OFF`.
    pub const fn suffix(self) -> &'static str {
        if self.on { ":ON" } else { ":OFF" }
    }

    /// Whether `line` carries this command's `<ACTUATOR>:<LEVEL>` token.
    fn found_in(self, line: &[u8]) -> bool {
        let name = self.actuator.command_token().as_bytes();
        let suffix = self.suffix().as_bytes();
        line.windows(name.len() + suffix.len())
            .any(|w| w.starts_with(name) && w.ends_with(suffix))
    }
}

/// Recognized commands in the order they are applied.
pub const COMMAND_TABLE: [Command; 6] = [
    Command { actuator: Actuator::Heater, on: true },
    Command { actuator: Actuator::Heater, on: false },
    Command { actuator: Actuator::Light, on: true },
    Command { actuator: Actuator::Light, on: false },
    Command { actuator: Actuator::Sprinkler, on: true },
    Command { actuator: Actuator::Sprinkler, on: false },
];

/// Accumulates received bytes into lines.
#[derive(Debug, Default)]
pub struct LineAssembler {
    buffer: CommandLine,
}

impl LineAssembler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed one byte; returns a completed line, if any. The terminator is
    /// not part of the line.
    pub fn push(&mut self, byte: u8) -> Option<CommandLine> {
        if byte == b'\n' || self.buffer.is_full() {
            return Some(core::mem::take(&mut self.buffer));
        }
        // Not full, checked above.
        let _ = self.buffer.push(byte);
        None
    }

    /// Bytes buffered for the line in progress.
    pub fn pending(&self) -> usize {
        self.buffer.len()
    }
}

/// Commands found in one line, in application order. Empty for lines
/// without the `CMD:` prefix.
pub fn parse_line(line: &[u8]) -> heapless::Vec<Command, 6> {
    let mut commands = heapless::Vec::new();
    if !line.starts_with(COMMAND_PREFIX) {
        return commands;
    }
    for command in COMMAND_TABLE {
        if command.found_in(line) {
            // Capacity equals the table length.
            let _ = commands.push(command);
        }
    }
    commands
}

/// Apply every command of `line` to the outputs. Returns how many applied.
pub fn apply_line(line: &[u8], outputs: &dyn OutputLines) -> usize {
    let commands = parse_line(line);
    if commands.is_empty() {
        trace!("ignored line {:?}", String::from_utf8_lossy(line));
    }
    for command in &commands {
        debug!(
            "command {} {}",
            command.actuator,
            if command.on { "ON" } else { "OFF" }
        );
        outputs.set(command.actuator, command.on);
    }
    commands.len()
}

/// Serial receive side: assembler plus the outputs it drives.
pub struct CommandChannel {
    rx: Box<dyn SerialRx>,
    outputs: Arc<dyn OutputLines>,
    assembler: LineAssembler,
}

impl CommandChannel {
    pub fn new(rx: Box<dyn SerialRx>, outputs: Arc<dyn OutputLines>) -> Self {
        Self {
            rx,
            outputs,
            assembler: LineAssembler::new(),
        }
    }

    /// Drain every byte currently available. Returns the number of lines
    /// completed.
    pub fn poll(&mut self) -> usize {
        let mut lines = 0;
        while let Some(byte) = self.rx.read_byte() {
            if let Some(line) = self.assembler.push(byte) {
                apply_line(&line, self.outputs.as_ref());
                lines += 1;
            }
        }
        lines
    }

    /// Command thread body.
    pub fn run(&mut self, ctx: &RunContext, period: Duration) {
        debug!("command channel running, poll {:?}", period);
        while ctx.is_running() {
            self.poll();
            if !ctx.pace(period) {
                break;
            }
        }
        debug!("command channel stopped");
    }
}
