//! Software-rendered window using `minifb`.
//!
//! Layout:
//!
//! ```text
//! ┌──────────────────────────────────────────────────┐
//! │                                                  │
//! │       composited effect frame (full window)      │
//! │                                                  │
//! │ status                                           │
//! │ key legend                                       │
//! └──────────────────────────────────────────────────┘
//! ```

use std::sync::mpsc::Sender;
use std::time::Duration;

use anyhow::{anyhow, Result};
use elemental_fx::{PowerMode, Viewport};
use minifb::{Key, KeyRepeat, MouseMode, Window, WindowOptions};

use crate::tracking::{SimInput, SimKey};

const BG_COLOR:    u32 = 0xFF000000;
const TEXT_BG:     u32 = 0xFF0F0A05;
const TEXT_COLOR:  u32 = 0xFFEEEEEE;
const HINT_COLOR:  u32 = 0xFF888888;
const ERROR_BG:    u32 = 0xFF2A0A0A;
const ERROR_COLOR: u32 = 0xFFFF6060;
/// Glyph cell including the 1px gap, before scaling.
const GLYPH_W: usize = 4;
const GLYPH_H: usize = 6;

/// What the user asked for this frame, independent of the hand source.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Control {
    SetMode(PowerMode),
    Clear,
    Quit,
}

// ════════════════════════════════════════════════════════════════════════════
// Visualizer
// ════════════════════════════════════════════════════════════════════════════

pub struct Visualizer {
    window: Window,
    buf:    Vec<u32>,
    width:  usize,
    height: usize,
    /// Present only when the hand simulator is the source.
    sim_tx: Option<Sender<SimInput>>,
}

impl Visualizer {
    pub fn new(viewport: Viewport, sim_tx: Option<Sender<SimInput>>) -> Result<Self> {
        let Viewport { width, height } = viewport;
        let mut window = Window::new(
            "Elemental Canvas",
            width, height,
            WindowOptions {
                resize: false,
                ..WindowOptions::default()
            },
        ).map_err(|e| anyhow!("failed to open window: {}", e))?;

        window.limit_update_rate(Some(Duration::from_millis(16))); // ~60fps

        Ok(Visualizer {
            window,
            buf: vec![BG_COLOR; width * height],
            width,
            height,
            sim_tx,
        })
    }

    /// Returns false when the window should close.
    pub fn is_open(&self) -> bool { self.window.is_open() }

    /// Poll keyboard and mouse.  Forwards simulator input (ending with a
    /// frame `Tick`) and returns the mode/clear/quit controls.
    pub fn poll_input(&mut self, timestamp_ms: f64) -> Vec<Control> {
        let mut controls = Vec::new();
        if !self.window.is_open() {
            controls.push(Control::Quit);
            return controls;
        }

        let one_shot = |k: Key| self.window.is_key_pressed(k, KeyRepeat::No);

        if one_shot(Key::Q) || one_shot(Key::Escape) {
            controls.push(Control::Quit);
        }
        for (key, mode) in [
            (Key::Key1, PowerMode::FireIce),
            (Key::Key2, PowerMode::Lightning),
            (Key::Key3, PowerMode::RedBlue),
        ] {
            if one_shot(key) {
                controls.push(Control::SetMode(mode));
            }
        }
        if one_shot(Key::C) {
            controls.push(Control::Clear);
        }

        if let Some(tx) = &self.sim_tx {
            let mut inputs = Vec::new();
            for (key, sim) in [(Key::L, SimKey::ToggleLeft), (Key::R, SimKey::ToggleRight)] {
                if one_shot(key) {
                    inputs.push(SimInput::KeyDown(sim));
                }
            }
            for (key, sim) in [(Key::Space, SimKey::Open), (Key::P, SimKey::Pinch)] {
                if one_shot(key) {
                    inputs.push(SimInput::KeyDown(sim));
                }
                if self.window.is_key_released(key) {
                    inputs.push(SimInput::KeyUp(sim));
                }
            }
            if let Some((mx, my)) = self.window.get_mouse_pos(MouseMode::Clamp) {
                inputs.push(SimInput::Pointer {
                    x: mx / self.width as f32,
                    y: my / self.height as f32,
                });
            }
            inputs.push(SimInput::Tick { timestamp_ms });

            for input in inputs {
                if tx.send(input).is_err() {
                    break;
                }
            }
        }

        controls
    }

    /// Show one composited frame with the status line and legend on top.
    pub fn present(&mut self, pixels: &[u32], status: &str) {
        if pixels.len() == self.buf.len() {
            self.buf.copy_from_slice(pixels);
        } else {
            self.buf.fill(BG_COLOR);
        }

        let legend = if self.sim_tx.is_some() {
            "1 fire-ice  2 lightning  3 red-blue  c clear  q quit   mouse move  space open  p pinch  l/r hands"
        } else {
            "1 fire-ice  2 lightning  3 red-blue  c clear  q quit"
        };
        let bar_h = GLYPH_H * 2 + 8;
        let bar_y = self.height.saturating_sub(bar_h);
        self.fill_rect(0, bar_y, self.width, bar_h, TEXT_BG);
        self.draw_label(status, 6, bar_y + 2, TEXT_COLOR);
        self.draw_label(legend, 6, bar_y + 2 + GLYPH_H + 2, HINT_COLOR);

        self.window.update_with_buffer(&self.buf, self.width, self.height).ok();
    }

    /// Blocking error screen. Returns when the user closes the window or
    /// presses a key.
    pub fn show_error(&mut self, reason: &str) {
        let (w, h) = (self.width, self.height);
        while self.window.is_open() {
            self.buf.fill(ERROR_BG);
            let y = h / 2;
            self.draw_label_scaled("hand tracking unavailable", 20, y.saturating_sub(30), ERROR_COLOR, 3);
            self.draw_label(reason, 20, y + 10, TEXT_COLOR);
            self.draw_label("press any key to exit", 20, y + 30, HINT_COLOR);
            self.window.update_with_buffer(&self.buf, w, h).ok();

            if !self.window.get_keys_pressed(KeyRepeat::No).is_empty() {
                break;
            }
        }
    }

    // ── Primitive drawing helpers ─────────────────────────────────────────

    fn fill_rect(&mut self, x: usize, y: usize, w: usize, h: usize, color: u32) {
        for row in y..(y + h).min(self.height) {
            for col in x..(x + w).min(self.width) {
                self.buf[row * self.width + col] = color;
            }
        }
    }

    fn set_pixel(&mut self, x: usize, y: usize, color: u32) {
        if x < self.width && y < self.height {
            self.buf[y * self.width + x] = color;
        }
    }

    fn draw_label(&mut self, text: &str, x: usize, y: usize, color: u32) {
        self.draw_label_scaled(text, x, y, color, 1);
    }

    /// 3×5 bitmap font, each pixel drawn as a `scale`×`scale` block.
    fn draw_label_scaled(&mut self, text: &str, x: usize, y: usize, color: u32, scale: usize) {
        let mut cx = x;
        for ch in text.chars() {
            if cx + GLYPH_W * scale > self.width { break; }
            for (row, &bits) in char_glyph(ch).iter().enumerate() {
                for col in 0..3usize {
                    if bits & (1 << (2 - col)) != 0 {
                        for sy in 0..scale {
                            for sx in 0..scale {
                                self.set_pixel(cx + col * scale + sx, y + row * scale + sy, color);
                            }
                        }
                    }
                }
            }
            cx += GLYPH_W * scale;
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// 3×5 bitmap font: lowercase, the mode digits and the legend punctuation
// ────────────────────────────────────────────────────────────────────────────

/// Rows top to bottom, bit 2 is the left column.
const GLYPHS: &[(char, [u8; 5])] = &[
    ('1', [0b010, 0b110, 0b010, 0b010, 0b111]),
    ('2', [0b111, 0b001, 0b111, 0b100, 0b111]),
    ('3', [0b111, 0b001, 0b011, 0b001, 0b111]),
    ('a', [0b010, 0b101, 0b111, 0b101, 0b101]),
    ('b', [0b110, 0b101, 0b110, 0b101, 0b110]),
    ('c', [0b011, 0b100, 0b100, 0b100, 0b011]),
    ('d', [0b110, 0b101, 0b101, 0b101, 0b110]),
    ('e', [0b111, 0b100, 0b110, 0b100, 0b111]),
    ('f', [0b111, 0b100, 0b110, 0b100, 0b100]),
    ('g', [0b011, 0b100, 0b101, 0b101, 0b011]),
    ('h', [0b101, 0b101, 0b111, 0b101, 0b101]),
    ('i', [0b111, 0b010, 0b010, 0b010, 0b111]),
    ('k', [0b101, 0b110, 0b100, 0b110, 0b101]),
    ('l', [0b100, 0b100, 0b100, 0b100, 0b111]),
    ('m', [0b101, 0b111, 0b111, 0b101, 0b101]),
    ('n', [0b110, 0b101, 0b101, 0b101, 0b101]),
    ('o', [0b010, 0b101, 0b101, 0b101, 0b010]),
    ('p', [0b110, 0b101, 0b110, 0b100, 0b100]),
    ('q', [0b010, 0b101, 0b101, 0b110, 0b011]),
    ('r', [0b110, 0b101, 0b110, 0b101, 0b101]),
    ('s', [0b011, 0b100, 0b010, 0b001, 0b110]),
    ('t', [0b111, 0b010, 0b010, 0b010, 0b010]),
    ('u', [0b101, 0b101, 0b101, 0b101, 0b111]),
    ('v', [0b101, 0b101, 0b101, 0b101, 0b010]),
    ('x', [0b101, 0b101, 0b010, 0b101, 0b101]),
    ('y', [0b101, 0b101, 0b010, 0b010, 0b010]),
    ('&', [0b010, 0b101, 0b010, 0b101, 0b011]),
    ('-', [0b000, 0b000, 0b111, 0b000, 0b000]),
    ('/', [0b001, 0b001, 0b010, 0b100, 0b100]),
    (':', [0b000, 0b010, 0b000, 0b010, 0b000]),
    ('.', [0b000, 0b000, 0b000, 0b000, 0b010]),
];

const BLANK:    [u8; 5] = [0; 5];
const UNKNOWN:  [u8; 5] = [0b000, 0b000, 0b010, 0b000, 0b000];

/// Case-folded lookup; anything outside the table draws as a centered dot.
fn char_glyph(c: char) -> [u8; 5] {
    if c == ' ' {
        return BLANK;
    }
    let c = c.to_ascii_lowercase();
    GLYPHS
        .iter()
        .find(|(g, _)| *g == c)
        .map_or(UNKNOWN, |&(_, rows)| rows)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_drawn_string_has_glyphs() {
        let texts = [
            "1 fire-ice  2 lightning  3 red-blue  c clear  q quit   mouse move  space open  p pinch  l/r hands",
            "mode: fire & ice  cleared",
            "mode: red & blue",
            "hand tracking unavailable",
            "press any key to exit",
        ];
        for ch in texts.iter().flat_map(|t| t.chars()) {
            if ch != ' ' {
                assert_ne!(char_glyph(ch), UNKNOWN, "missing glyph for {:?}", ch);
            }
        }
    }

    #[test]
    fn uppercase_folds_to_lowercase() {
        assert_eq!(char_glyph('Q'), char_glyph('q'));
        assert_ne!(char_glyph('q'), char_glyph('o'));
        assert_eq!(char_glyph('\u{1}'), UNKNOWN);
    }
}
