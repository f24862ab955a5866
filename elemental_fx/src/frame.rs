//! Per-frame input from the hand-tracking provider.

use std::sync::Arc;

use crate::landmarks::{HandRecord, Handedness, Point};
use crate::raster::CameraFrame;

/// One provider callback: zero or more hand records plus the camera image
/// they were detected in.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TrackingFrame {
    pub hands:        Vec<HandRecord>,
    pub image:        Option<Arc<CameraFrame>>,
    /// Provider clock in milliseconds. Drives the warm-up window and glow
    /// flicker.
    pub timestamp_ms: f64,
}

impl TrackingFrame {
    /// A frame with no hands and no image.
    pub fn empty(timestamp_ms: f64) -> Self {
        TrackingFrame { timestamp_ms, ..Self::default() }
    }

    pub fn with_hand(mut self, handedness: Handedness, landmarks: Vec<Point>) -> Self {
        self.hands.push(HandRecord::new(handedness, landmarks));
        self
    }

    pub fn with_image(mut self, image: Arc<CameraFrame>) -> Self {
        self.image = Some(image);
        self
    }
}
