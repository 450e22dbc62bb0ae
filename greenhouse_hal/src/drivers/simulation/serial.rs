//! Simulated serial port.
//!
//! - `LoopbackTx` / `LoopbackRx` - In-memory halves controlled through a `SerialHandle`
//! - `StdoutTx` / `StdinRx` - Bridge to the process standard streams

use greenhouse_common::hal::driver::{SerialRx, SerialTx};
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::io::{Read, Write};
use std::sync::Arc;
use std::sync::mpsc::{self, Receiver, TryRecvError};
use tracing::{debug, warn};

/// Untaken transmit bytes kept when nobody drains the port.
const TX_BACKLOG: usize = 64 * 1024;

#[derive(Debug, Default)]
struct Wire {
    transmitted: Vec<u8>,
    receive: VecDeque<u8>,
}

/// Transmit half of the loopback port.
pub struct LoopbackTx {
    wire: Arc<Mutex<Wire>>,
}

/// Receive half of the loopback port.
pub struct LoopbackRx {
    wire: Arc<Mutex<Wire>>,
}

/// Test-side handle of the loopback port.
#[derive(Clone)]
pub struct SerialHandle {
    wire: Arc<Mutex<Wire>>,
}

/// Create a connected loopback port.
pub fn loopback() -> (LoopbackTx, LoopbackRx, SerialHandle) {
    let wire = Arc::new(Mutex::new(Wire::default()));
    (
        LoopbackTx {
            wire: Arc::clone(&wire),
        },
        LoopbackRx {
            wire: Arc::clone(&wire),
        },
        SerialHandle { wire },
    )
}

impl SerialTx for LoopbackTx {
    fn write_bytes(&mut self, bytes: &[u8]) {
        let mut wire = self.wire.lock();
        wire.transmitted.extend_from_slice(bytes);
        if wire.transmitted.len() > TX_BACKLOG {
            // Drop whole lines from the front.
            let excess = wire.transmitted.len() - TX_BACKLOG;
            let cut = wire.transmitted[excess..]
                .iter()
                .position(|&b| b == b'\n')
                .map_or(wire.transmitted.len(), |i| excess + i + 1);
            wire.transmitted.drain(..cut);
        }
    }
}

impl SerialRx for LoopbackRx {
    fn read_byte(&mut self) -> Option<u8> {
        self.wire.lock().receive.pop_front()
    }
}

impl SerialHandle {
    /// Make `bytes` available to the receiver.
    pub fn inject(&self, bytes: &[u8]) {
        self.wire.lock().receive.extend(bytes.iter().copied());
    }

    /// Bytes injected but not yet read by the receiver.
    pub fn unread(&self) -> usize {
        self.wire.lock().receive.len()
    }

    /// Drain everything transmitted so far.
    pub fn take_output(&self) -> Vec<u8> {
        std::mem::take(&mut self.wire.lock().transmitted)
    }

    /// Drain the transmitted bytes and split them into complete lines.
    /// A trailing partial line is kept for the next call.
    pub fn take_lines(&self) -> Vec<String> {
        let mut wire = self.wire.lock();
        let Some(last_newline) = wire.transmitted.iter().rposition(|&b| b == b'\n') else {
            return Vec::new();
        };
        let rest = wire.transmitted.split_off(last_newline + 1);
        let complete = std::mem::replace(&mut wire.transmitted, rest);
        String::from_utf8_lossy(&complete)
            .lines()
            .map(str::to_string)
            .collect()
    }
}

// ─── Standard streams ───────────────────────────────────────────────

/// Transmitter writing to stdout.
pub struct StdoutTx;

impl SerialTx for StdoutTx {
    fn write_bytes(&mut self, bytes: &[u8]) {
        let mut out = std::io::stdout().lock();
        if let Err(e) = out.write_all(bytes).and_then(|_| out.flush()) {
            warn!("stdout write failed: {}", e);
        }
    }
}

/// Receiver fed from stdin by a reader thread started at bring-up.
pub struct StdinRx {
    bytes: Receiver<u8>,
}

impl StdinRx {
    pub fn spawn() -> std::io::Result<Self> {
        let (tx, rx) = mpsc::channel();
        std::thread::Builder::new()
            .name("stdin-reader".to_string())
            .spawn(move || {
                let stdin = std::io::stdin();
                for byte in stdin.lock().bytes() {
                    match byte {
                        Ok(b) => {
                            if tx.send(b).is_err() {
                                break;
                            }
                        }
                        Err(e) => {
                            warn!("stdin read failed: {}", e);
                            break;
                        }
                    }
                }
                debug!("stdin closed");
            })?;
        Ok(Self { bytes: rx })
    }
}

impl SerialRx for StdinRx {
    fn read_byte(&mut self) -> Option<u8> {
        match self.bytes.try_recv() {
            Ok(b) => Some(b),
            Err(TryRecvError::Empty | TryRecvError::Disconnected) => None,
        }
    }
}
