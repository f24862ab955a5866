//! Global lightning charge.

use crate::config::ChargeConfig;
use crate::mode::PowerMode;

/// Ambient electrical buildup shared by both hands, in `[0, 1]`.
///
/// Ramps up over roughly a dozen frames of open hands in lightning mode and
/// drains quickly otherwise.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ChargeLevel(f32);

impl ChargeLevel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn value(self) -> f32 {
        self.0
    }

    pub fn update(&mut self, mode: PowerMode, any_open: bool, cfg: &ChargeConfig) {
        let delta = match (mode, any_open) {
            (PowerMode::Lightning, true)  => cfg.rise,
            (PowerMode::Lightning, false) => -cfg.fall,
            _                             => -cfg.idle_fall,
        };
        self.0 = (self.0 + delta).clamp(0.0, 1.0);
    }
}
