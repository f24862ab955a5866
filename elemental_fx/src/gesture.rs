//! Gesture classification from landmark geometry.
//!
//! * **Open hand** — stateless: at least three of the four non-thumb fingers
//!   have their tip farther from the wrist than their middle joint.
//! * **Pinch** — stateful per hand: thumb and index tips close relative to
//!   hand size, the remaining fingers mostly extended, and the wrist not
//!   moving fast.  A short hold window absorbs single-frame dropouts.

use tracing::trace;

use crate::config::GestureConfig;
use crate::landmarks::{
    Landmarks, Point, INDEX_PIP, INDEX_TIP, MIDDLE_MCP, MIDDLE_PIP, MIDDLE_TIP,
    PINKY_PIP, PINKY_TIP, RING_PIP, RING_TIP, THUMB_TIP, WRIST,
};

/// (tip, middle joint) pairs for index, middle, ring, pinky.
const FINGERS: [(usize, usize); 4] = [
    (INDEX_TIP,  INDEX_PIP),
    (MIDDLE_TIP, MIDDLE_PIP),
    (RING_TIP,   RING_PIP),
    (PINKY_TIP,  PINKY_PIP),
];

/// Number of non-thumb fingers whose tip is farther from the wrist than
/// their middle joint.
pub fn extended_fingers(lm: &Landmarks) -> usize {
    FINGERS.iter().filter(|&&(tip, pip)| lm.is_extended(tip, pip)).count()
}

/// Open-hand test with the stock threshold of 3 of 4 fingers.
pub fn is_open(lm: &Landmarks) -> bool {
    is_open_with(lm, &GestureConfig::default())
}

pub fn is_open_with(lm: &Landmarks, cfg: &GestureConfig) -> bool {
    extended_fingers(lm) >= cfg.open_min_fingers
}

/// Raw, single-frame pinch shape test; ignores motion and debounce.
pub fn pinch_shape(lm: &Landmarks, cfg: &GestureConfig) -> bool {
    let support = FINGERS[1..]
        .iter()
        .filter(|&&(tip, pip)| lm.is_extended(tip, pip))
        .count();
    if support < cfg.pinch_min_fingers {
        return false;
    }

    let gap       = lm[THUMB_TIP].distance(lm[INDEX_TIP]);
    let hand_size = lm[WRIST].distance(lm[MIDDLE_MCP]);
    gap < hand_size * cfg.pinch_ratio
}

// ════════════════════════════════════════════════════════════════════════════
// PinchTracker
// ════════════════════════════════════════════════════════════════════════════

/// Debounced pinch state for one hand.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PinchTracker {
    /// Frames left before an unrefreshed pinch releases.
    pub hold_frames: u32,
    pub active:      bool,
    /// Wrist position from the previous sample.
    pub last_wrist:  Option<Point>,
}

impl PinchTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed one frame of landmarks; returns whether the pinch is active.
    ///
    /// A sample whose wrist jumped more than `max_wrist_step` since the last
    /// one returns false; the hold window still ages but is not refreshed.
    pub fn update(&mut self, lm: &Landmarks, cfg: &GestureConfig) -> bool {
        let wrist = lm.wrist();
        let step  = self.last_wrist.map_or(0.0, |prev| wrist.distance(prev));
        self.last_wrist = Some(wrist);

        if step > cfg.max_wrist_step {
            trace!(step, "pinch sample rejected: wrist moving");
            self.debounce(false, cfg);
            return false;
        }

        self.debounce(pinch_shape(lm, cfg), cfg);
        self.active
    }

    /// The hand was not seen this frame: age the hold window and forget the
    /// wrist so re-entry is not mistaken for fast motion.
    pub fn release(&mut self, cfg: &GestureConfig) {
        self.last_wrist = None;
        self.debounce(false, cfg);
    }

    fn debounce(&mut self, raw: bool, cfg: &GestureConfig) {
        if raw {
            self.hold_frames = cfg.pinch_hold_frames;
            self.active      = true;
        } else {
            self.hold_frames = self.hold_frames.saturating_sub(1);
            if self.hold_frames == 0 {
                self.active = false;
            }
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;
    use crate::synthetic::{synth_hand, HandPose};

    fn hand(pose: HandPose, at: Point) -> Landmarks {
        Landmarks::try_from(synth_hand(pose, at, 1.0).as_slice()).unwrap()
    }

    fn at() -> Point { Point::new(0.5, 0.7) }

    #[test]
    fn open_hand_is_open() {
        assert!(is_open(&hand(HandPose::Open, at())));
        assert_eq!(extended_fingers(&hand(HandPose::Open, at())), 4);
    }

    #[test]
    fn fist_is_not_open() {
        assert!(!is_open(&hand(HandPose::Fist, at())));
        assert_eq!(extended_fingers(&hand(HandPose::Fist, at())), 0);
    }

    #[test]
    fn three_fingers_is_open_two_is_not() {
        let open = synth_hand(HandPose::Open, at(), 1.0);
        let fist = synth_hand(HandPose::Fist, at(), 1.0);

        // Curl the pinky only: 3 of 4 extended.
        let mut three = open.clone();
        for i in 17..=20 { three[i] = fist[i]; }
        let three = Landmarks::try_from(three.as_slice()).unwrap();
        assert_eq!(extended_fingers(&three), 3);
        assert!(is_open(&three));

        // Curl ring and pinky: 2 of 4.
        let mut two = open;
        for i in 13..=20 { two[i] = fist[i]; }
        let two = Landmarks::try_from(two.as_slice()).unwrap();
        assert_eq!(extended_fingers(&two), 2);
        assert!(!is_open(&two));
    }

    #[test]
    fn pinch_shape_detected() {
        let cfg = GestureConfig::default();
        assert!(pinch_shape(&hand(HandPose::Pinch, at()), &cfg));
        assert!(!pinch_shape(&hand(HandPose::Open, at()), &cfg));
    }

    #[test]
    fn closed_fist_never_pinches() {
        // Thumb touching a curled index is a fist, not a pinch.
        let cfg = GestureConfig::default();
        let mut pts = synth_hand(HandPose::Fist, at(), 1.0);
        pts[THUMB_TIP] = pts[INDEX_TIP];
        let lm = Landmarks::try_from(pts.as_slice()).unwrap();
        assert!(!pinch_shape(&lm, &cfg));
    }

    #[test]
    fn isolated_pinch_holds_for_five_frames() {
        let cfg = GestureConfig::default();
        let mut t = PinchTracker::new();
        let pinch = hand(HandPose::Pinch, at());
        let open  = hand(HandPose::Open, at());

        assert!(t.update(&pinch, &cfg));
        let held: Vec<bool> = (0..6).map(|_| t.update(&open, &cfg)).collect();
        assert_eq!(held, vec![true, true, true, true, false, false]);
        assert_eq!(t.hold_frames, 0);
    }

    #[test]
    fn fast_wrist_rejects_without_refresh() {
        let cfg = GestureConfig::default();
        let mut t = PinchTracker::new();
        assert!(t.update(&hand(HandPose::Pinch, Point::new(0.5, 0.7)), &cfg));
        // Let the hold window drain a little.
        t.update(&hand(HandPose::Open, Point::new(0.5, 0.7)), &cfg);
        let hold_before = t.hold_frames;

        let jumped = hand(HandPose::Pinch, Point::new(0.6, 0.7));
        assert!(!t.update(&jumped, &cfg));
        assert_eq!(t.hold_frames, hold_before - 1);
        assert_eq!(t.last_wrist, Some(jumped.wrist()));
    }

    #[test]
    fn hold_expires_while_wrist_keeps_moving() {
        let cfg = GestureConfig::default();
        let mut t = PinchTracker::new();
        assert!(t.update(&hand(HandPose::Pinch, Point::new(0.1, 0.7)), &cfg));

        // Fist sweeping right fast enough to be rejected every frame.
        for i in 1..=8 {
            let x = 0.1 + 0.08 * i as f32;
            assert!(!t.update(&hand(HandPose::Fist, Point::new(x, 0.7)), &cfg));
        }
        assert_eq!(t.hold_frames, 0);
        assert!(!t.active);

        // Once the hand stops, the stale pinch must not come back.
        let still = Point::new(0.1 + 0.08 * 8.0, 0.7);
        let after: Vec<bool> = (0..5).map(|_| t.update(&hand(HandPose::Fist, still), &cfg)).collect();
        assert_eq!(after, vec![false; 5]);
    }

    #[test]
    fn first_sample_has_no_motion() {
        let cfg = GestureConfig::default();
        let mut t = PinchTracker::new();
        assert!(t.update(&hand(HandPose::Pinch, Point::new(0.9, 0.9)), &cfg));
    }

    #[test]
    fn release_forgets_wrist_and_ages_hold() {
        let cfg = GestureConfig::default();
        let mut t = PinchTracker::new();
        t.update(&hand(HandPose::Pinch, at()), &cfg);
        t.release(&cfg);
        assert_eq!(t.last_wrist, None);
        assert_eq!(t.hold_frames, cfg.pinch_hold_frames - 1);
        assert!(t.active);
        // Re-entering far away is not a motion rejection.
        assert!(t.update(&hand(HandPose::Pinch, Point::new(0.1, 0.2)), &cfg));
    }

    #[test]
    fn never_active_without_raw_detection() {
        let cfg = GestureConfig::default();
        let mut t = PinchTracker::new();
        for _ in 0..10 {
            assert!(!t.update(&hand(HandPose::Open, at()), &cfg));
        }
    }
}
