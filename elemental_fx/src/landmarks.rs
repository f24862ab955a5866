//! Hand landmark geometry.
//!
//! A tracked hand is 21 normalized points in the standard hand-landmark
//! layout:
//!
//! ```text
//!         8   12  16  20        tips
//!         7   11  15  19
//!     4   6   10  14  18        middle joints
//!     3   5 — 9 — 13— 17        finger bases
//!      2                 \
//!        1 ———————————— 0       wrist
//! ```
//!
//! The core never mutates landmarks; it validates them once per frame into a
//! [`Landmarks`] array and reads from that.

use std::ops::Index;

use serde::{Deserialize, Serialize};

use crate::error::FxError;

// ════════════════════════════════════════════════════════════════════════════
// Landmark indices
// ════════════════════════════════════════════════════════════════════════════

pub const LANDMARK_COUNT: usize = 21;

pub const WRIST:      usize = 0;
pub const THUMB_TIP:  usize = 4;
pub const INDEX_PIP:  usize = 6;
pub const INDEX_TIP:  usize = 8;
/// Base of the middle finger; used as the palm center.
pub const MIDDLE_MCP: usize = 9;
pub const MIDDLE_PIP: usize = 10;
pub const MIDDLE_TIP: usize = 12;
pub const RING_PIP:   usize = 14;
pub const RING_TIP:   usize = 16;
pub const PINKY_PIP:  usize = 18;
pub const PINKY_TIP:  usize = 20;

/// All five fingertips, thumb first.
pub const FINGERTIPS: [usize; 5] = [THUMB_TIP, INDEX_TIP, MIDDLE_TIP, RING_TIP, PINKY_TIP];

/// Bone segments of the hand drawing: finger chains, the palm chain across
/// the finger bases, and the wrist-to-pinky closing edge.
pub const HAND_SKELETON: [(usize, usize); 21] = [
    (0, 1),   (1, 2),   (2, 3),   (3, 4),
    (0, 5),   (5, 6),   (6, 7),   (7, 8),
    (5, 9),   (9, 10),  (10, 11), (11, 12),
    (9, 13),  (13, 14), (14, 15), (15, 16),
    (13, 17), (17, 18), (18, 19), (19, 20),
    (0, 17),
];

// ════════════════════════════════════════════════════════════════════════════
// Point
// ════════════════════════════════════════════════════════════════════════════

/// A 2D point. Landmarks use normalized `[0,1]` units; entities live in
/// viewport pixels.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const fn new(x: f32, y: f32) -> Self {
        Point { x, y }
    }

    pub fn distance(self, other: Point) -> f32 {
        (self.x - other.x).hypot(self.y - other.y)
    }

    pub fn midpoint(self, other: Point) -> Point {
        Point::new((self.x + other.x) * 0.5, (self.y + other.y) * 0.5)
    }

    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Handedness / HandRecord
// ════════════════════════════════════════════════════════════════════════════

/// Which hand a record belongs to, as labelled by the provider.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Handedness {
    Left,
    Right,
}

impl Handedness {
    pub const BOTH: [Handedness; 2] = [Handedness::Left, Handedness::Right];

    /// Slot index: 0 = left, 1 = right.
    pub fn slot(self) -> usize {
        match self {
            Handedness::Left  => 0,
            Handedness::Right => 1,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Handedness::Left  => "left",
            Handedness::Right => "right",
        }
    }
}

/// One hand as delivered by the tracking provider. Unvalidated.
#[derive(Clone, Debug, PartialEq)]
pub struct HandRecord {
    pub handedness: Handedness,
    pub landmarks:  Vec<Point>,
}

impl HandRecord {
    pub fn new(handedness: Handedness, landmarks: Vec<Point>) -> Self {
        HandRecord { handedness, landmarks }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Landmarks — validated 21-point set
// ════════════════════════════════════════════════════════════════════════════

/// Exactly 21 finite points.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Landmarks([Point; LANDMARK_COUNT]);

impl Landmarks {
    pub fn points(&self) -> &[Point; LANDMARK_COUNT] {
        &self.0
    }

    pub fn wrist(&self) -> Point {
        self.0[WRIST]
    }

    /// Palm center (middle finger base).
    pub fn palm(&self) -> Point {
        self.0[MIDDLE_MCP]
    }

    /// True when `tip` lies farther from the wrist than `pip`.
    pub fn is_extended(&self, tip: usize, pip: usize) -> bool {
        let wrist = self.wrist();
        self.0[tip].distance(wrist) > self.0[pip].distance(wrist)
    }
}

impl Index<usize> for Landmarks {
    type Output = Point;

    fn index(&self, i: usize) -> &Point {
        &self.0[i]
    }
}

impl TryFrom<&[Point]> for Landmarks {
    type Error = FxError;

    fn try_from(points: &[Point]) -> Result<Self, Self::Error> {
        let array: [Point; LANDMARK_COUNT] = points.try_into().map_err(|_| {
            FxError::MalformedLandmarks(format!(
                "expected {} points, got {}", LANDMARK_COUNT, points.len()
            ))
        })?;
        if let Some(i) = array.iter().position(|p| !p.is_finite()) {
            return Err(FxError::MalformedLandmarks(format!("point {} is not finite", i)));
        }
        Ok(Landmarks(array))
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Viewport
// ════════════════════════════════════════════════════════════════════════════

/// Output surface size in pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Viewport {
    pub width:  usize,
    pub height: usize,
}

impl Viewport {
    pub const fn new(width: usize, height: usize) -> Self {
        Viewport { width, height }
    }

    pub fn pixel_count(&self) -> usize {
        self.width * self.height
    }

    /// Map a normalized landmark into pixel space. With `mirror` the x axis
    /// is flipped so effects line up with a mirrored camera image.
    pub fn to_pixels(&self, p: Point, mirror: bool) -> Point {
        let x = if mirror { 1.0 - p.x } else { p.x };
        Point::new(x * self.width as f32, p.y * self.height as f32)
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════
