//! Recording text display.
//!
//! Keeps a row-addressed text buffer of what is currently visible and a log
//! of every primitive call, so redraw behavior can be asserted from tests.

use greenhouse_common::consts::ROW_HEIGHT;
use greenhouse_common::hal::driver::Display;
use greenhouse_common::hal::types::Color;
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::sync::Arc;
use tracing::trace;

/// Oldest draw operations are dropped beyond this many entries.
const DRAW_LOG: usize = 4096;

/// Rows of a 240-pixel-high panel.
pub const DISPLAY_ROWS: usize = 10;

/// One display primitive as observed by the driver.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DrawOp {
    Clear {
        background: Color,
    },
    Text {
        x: u32,
        y: u32,
        text: String,
        foreground: Color,
        background: Color,
    },
}

impl DrawOp {
    /// Text row the operation touched, if any.
    pub fn row(&self) -> Option<u32> {
        match self {
            DrawOp::Clear { .. } => None,
            DrawOp::Text { y, .. } => Some(y / ROW_HEIGHT),
        }
    }
}

#[derive(Debug)]
struct Surface {
    rows: Vec<String>,
    row_backgrounds: Vec<Color>,
    foreground: Color,
    background: Color,
    ops: VecDeque<DrawOp>,
}

impl Surface {
    fn new() -> Self {
        Self {
            rows: vec![String::new(); DISPLAY_ROWS],
            row_backgrounds: vec![Color::WHITE; DISPLAY_ROWS],
            foreground: Color::BLACK,
            background: Color::WHITE,
            ops: VecDeque::new(),
        }
    }

    fn record(&mut self, op: DrawOp) {
        if self.ops.len() == DRAW_LOG {
            self.ops.pop_front();
        }
        self.ops.push_back(op);
    }
}

/// Display that records instead of driving a panel.
pub struct RecordingDisplay {
    surface: Arc<Mutex<Surface>>,
}

/// Test-side view of a [`RecordingDisplay`].
#[derive(Clone)]
pub struct DisplayProbe {
    surface: Arc<Mutex<Surface>>,
}

impl RecordingDisplay {
    pub fn new() -> (Self, DisplayProbe) {
        let surface = Arc::new(Mutex::new(Surface::new()));
        (
            Self {
                surface: Arc::clone(&surface),
            },
            DisplayProbe { surface },
        )
    }
}

impl Display for RecordingDisplay {
    fn clear(&mut self) {
        let mut s = self.surface.lock();
        let background = s.background;
        s.rows.iter_mut().for_each(String::clear);
        s.row_backgrounds.iter_mut().for_each(|c| *c = background);
        s.record(DrawOp::Clear { background });
    }

    fn set_foreground(&mut self, color: Color) {
        self.surface.lock().foreground = color;
    }

    fn set_background(&mut self, color: Color) {
        self.surface.lock().background = color;
    }

    fn draw_string(&mut self, x: u32, y: u32, text: &str) {
        let mut s = self.surface.lock();
        let row = (y / ROW_HEIGHT) as usize;
        if row < DISPLAY_ROWS {
            // Fixed-width font: overwrite starting at the column of `x`.
            let column = (x / 16) as usize;
            let mut line: Vec<char> = s.rows[row].chars().collect();
            if line.len() < column + text.chars().count() {
                line.resize(column + text.chars().count(), ' ');
            }
            for (i, ch) in text.chars().enumerate() {
                line[column + i] = ch;
            }
            s.rows[row] = line.into_iter().collect::<String>().trim_end().to_string();
            let background = s.background;
            s.row_backgrounds[row] = background;
        }
        trace!("GLCD ({}, {}) {:?}", x, y, text);
        let (foreground, background) = (s.foreground, s.background);
        s.record(DrawOp::Text {
            x,
            y,
            text: text.to_string(),
            foreground,
            background,
        });
    }
}

impl DisplayProbe {
    /// All recorded operations since the last [`DisplayProbe::take_ops`].
    pub fn ops(&self) -> Vec<DrawOp> {
        self.surface.lock().ops.iter().cloned().collect()
    }

    /// Drain the recorded operations.
    pub fn take_ops(&self) -> Vec<DrawOp> {
        self.surface.lock().ops.drain(..).collect()
    }

    /// Visible text of one row, trailing blanks trimmed.
    pub fn row_text(&self, row: usize) -> String {
        self.surface
            .lock()
            .rows
            .get(row)
            .cloned()
            .unwrap_or_default()
    }

    /// Background color of the last draw on `row`.
    pub fn row_background(&self, row: usize) -> Color {
        self.surface
            .lock()
            .row_backgrounds
            .get(row)
            .copied()
            .unwrap_or(Color::WHITE)
    }

    /// Whole visible text, one line per row.
    pub fn screen(&self) -> Vec<String> {
        self.surface.lock().rows.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_draw_and_clear_are_recorded() {
        let (mut display, probe) = RecordingDisplay::new();
        display.set_background(Color::GRAY);
        display.draw_string(0, 48, "> Show Sensors Data");
        assert_eq!(probe.row_text(2), "> Show Sensors Data");
        assert_eq!(probe.row_background(2), Color::GRAY);

        display.set_background(Color::WHITE);
        display.clear();
        assert_eq!(probe.row_text(2), "");

        let ops = probe.take_ops();
        assert_eq!(ops.len(), 2);
        assert_eq!(ops[0].row(), Some(2));
        assert_eq!(
            ops[1],
            DrawOp::Clear {
                background: Color::WHITE
            }
        );
        assert!(probe.ops().is_empty());
    }

    #[test]
    fn test_blank_then_text_overwrites_row() {
        let (mut display, probe) = RecordingDisplay::new();
        display.draw_string(0, 96, "Threshold: 1600");
        display.draw_string(0, 96, "                    ");
        display.draw_string(0, 96, "Threshold: 990");
        assert_eq!(probe.row_text(4), "Threshold: 990");
    }
}
