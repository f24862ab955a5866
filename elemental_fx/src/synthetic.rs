//! Synthetic hand poses.
//!
//! Produces plausible 21-point landmark sets for the keyboard/mouse hand
//! simulator and for tests.  Offsets are relative to the wrist in normalized
//! image units at `scale = 1.0` (y grows downward, so fingers point up).

use crate::landmarks::{Point, LANDMARK_COUNT};

/// Hand shapes the simulator can produce.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HandPose {
    /// All fingers extended.
    Open,
    /// All fingers curled toward the palm.
    Fist,
    /// Thumb and index tips touching, other fingers extended.
    Pinch,
}

const OPEN: [(f32, f32); LANDMARK_COUNT] = [
    (0.0, 0.0),
    // thumb
    (-0.040, -0.030), (-0.070, -0.060), (-0.090, -0.090), (-0.110, -0.120),
    // index
    (-0.030, -0.100), (-0.035, -0.150), (-0.040, -0.180), (-0.045, -0.210),
    // middle
    (0.000, -0.110), (0.000, -0.165), (0.000, -0.200), (0.000, -0.230),
    // ring
    (0.030, -0.100), (0.035, -0.150), (0.040, -0.180), (0.045, -0.205),
    // pinky
    (0.055, -0.085), (0.065, -0.120), (0.072, -0.145), (0.080, -0.170),
];

const FIST: [(f32, f32); LANDMARK_COUNT] = [
    (0.0, 0.0),
    (-0.040, -0.030), (-0.060, -0.055), (-0.045, -0.075), (-0.020, -0.080),
    (-0.030, -0.100), (-0.030, -0.130), (-0.030, -0.105), (-0.030, -0.090),
    (0.000, -0.110), (0.000, -0.140), (0.000, -0.115), (0.000, -0.100),
    (0.030, -0.100), (0.030, -0.130), (0.030, -0.105), (0.030, -0.090),
    (0.055, -0.085), (0.055, -0.115), (0.055, -0.090), (0.055, -0.075),
];

const PINCH: [(f32, f32); LANDMARK_COUNT] = [
    (0.0, 0.0),
    (-0.040, -0.030), (-0.070, -0.060), (-0.080, -0.100), (-0.065, -0.135),
    (-0.030, -0.100), (-0.035, -0.150), (-0.050, -0.160), (-0.060, -0.140),
    (0.000, -0.110), (0.000, -0.165), (0.000, -0.200), (0.000, -0.230),
    (0.030, -0.100), (0.035, -0.150), (0.040, -0.180), (0.045, -0.205),
    (0.055, -0.085), (0.065, -0.120), (0.072, -0.145), (0.080, -0.170),
];

/// Build a 21-point hand with its wrist at `wrist`.
pub fn synth_hand(pose: HandPose, wrist: Point, scale: f32) -> Vec<Point> {
    let template = match pose {
        HandPose::Open  => &OPEN,
        HandPose::Fist  => &FIST,
        HandPose::Pinch => &PINCH,
    };
    template
        .iter()
        .map(|&(dx, dy)| Point::new(wrist.x + dx * scale, wrist.y + dy * scale))
        .collect()
}
