//! Per-hand effect state.
//!
//! Intensity builds slowly while a hand is engaged and fades quickly when it
//! is not, which gives the effect a "charging" feel.  Surge is a short spike
//! on the frame a hand opens, used to launch particles harder.

use crate::config::{GestureConfig, HandConfig};
use crate::gesture::PinchTracker;
use crate::mode::PowerMode;

/// Classifier results for one hand in one frame.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct HandGesture {
    pub open:  bool,
    pub pinch: bool,
}

impl HandGesture {
    /// The closed-hand reading used for slots with no detection.
    pub const ABSENT: HandGesture = HandGesture { open: false, pinch: false };
}

/// Mutable state for one of the two hand slots.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct HandSlot {
    pub intensity: f32,
    pub surge:     f32,
    pub was_open:  bool,
    pub pinch:     PinchTracker,
    /// What [`PinchTracker::update`] returned this frame.  Unlike
    /// `pinch.active` it is false on a motion-rejected or absent frame even
    /// while the hold window is still open; pinch painting reads this one.
    pub pinching:  bool,
}

impl HandSlot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Integrate one frame of gesture input under `mode`.
    pub fn update(&mut self, gesture: HandGesture, mode: PowerMode, cfg: &HandConfig) {
        if mode.has_hand_effects() {
            if gesture.open || gesture.pinch {
                self.intensity += cfg.intensity_rise;
            } else {
                self.intensity -= cfg.intensity_fall;
            }
            if gesture.open && !self.was_open {
                self.surge = 1.0;
            }
        } else {
            self.intensity -= cfg.intensity_fall;
        }

        self.intensity = self.intensity.clamp(0.0, 1.0);
        self.surge = (self.surge * cfg.surge_decay).clamp(0.0, 1.0);
        if self.surge < cfg.surge_floor {
            self.surge = 0.0;
        }
        self.was_open = gesture.open;
        self.pinching = gesture.pinch;
    }

    /// Run the closed-hand branch for a frame in which this hand was not
    /// detected.
    pub fn update_absent(&mut self, mode: PowerMode, hand_cfg: &HandConfig, gesture_cfg: &GestureConfig) {
        self.pinch.release(gesture_cfg);
        self.update(HandGesture::ABSENT, mode, hand_cfg);
    }
}
