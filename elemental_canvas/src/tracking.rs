//! Hand tracking: LeapMotion hardware or keyboard/mouse simulation.
//!
//! The public interface is [`SourceEvent`] delivered over a `mpsc` channel.
//! The render loop doesn't need to know whether frames came from real
//! hardware or the simulator; both produce [`TrackingFrame`]s in the
//! 21-landmark layout.

use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::Arc;
use std::thread;

use elemental_fx::synthetic::{synth_hand, HandPose};
use elemental_fx::{CameraFrame, Handedness, Point, TrackingFrame};
use tracing::{debug, warn};

// ════════════════════════════════════════════════════════════════════════════
// SourceEvent
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone, Debug, PartialEq)]
pub enum SourceEvent {
    /// One provider callback's worth of hands (and optionally an image).
    Frame(TrackingFrame),

    /// The provider could not start. Fatal; no retry.
    Failed(String),
}

// ════════════════════════════════════════════════════════════════════════════
// HandSource trait — unified interface for hw and sim
// ════════════════════════════════════════════════════════════════════════════

/// Anything that can deliver [`SourceEvent`]s over a channel.
pub trait HandSource: Send + 'static {
    fn run(self: Box<Self>, tx: Sender<SourceEvent>);
}

/// Spawn a hand source on its own thread and return the receiving end.
pub fn spawn_hand_source<H: HandSource>(source: H) -> Receiver<SourceEvent> {
    let (tx, rx) = mpsc::channel();
    thread::spawn(move || Box::new(source).run(tx));
    rx
}

// ════════════════════════════════════════════════════════════════════════════
// LeapHandSource — real hardware (feature = "leap")
// ════════════════════════════════════════════════════════════════════════════

/// Hand source backed by a real LeapMotion controller.
///
/// Requires the `leap` feature flag and the LeapC shared library installed.
///
/// # Projection
///
/// Each tracked hand's joints are dropped onto the 21-landmark layout
/// (wrist, then four joints per digit, thumb first) and projected from the
/// device's millimetre space onto the image plane:
///
/// * x: ±`REACH_MM` around the device maps to `[0, 1]`, flipped so the
///   mirrored display shows the user's right hand on the right.
/// * y: `FLOOR_MM`..`FLOOR_MM + 2·REACH_MM` above the device maps to `[1, 0]`.
#[cfg(feature = "leap")]
pub struct LeapHandSource;

#[cfg(feature = "leap")]
const REACH_MM: f32 = 200.0;
#[cfg(feature = "leap")]
const FLOOR_MM: f32 = 100.0;

#[cfg(feature = "leap")]
impl HandSource for LeapHandSource {
    fn run(self: Box<Self>, tx: Sender<SourceEvent>) {
        use leaprs::*;
        use std::time::Instant;

        let mut connection = match Connection::create(ConnectionConfig::default()) {
            Ok(c)  => c,
            Err(e) => {
                let _ = tx.send(SourceEvent::Failed(format!("LeapC connection: {:?}", e)));
                return;
            }
        };
        if let Err(e) = connection.open() {
            let _ = tx.send(SourceEvent::Failed(format!("LeapMotion device: {:?}", e)));
            return;
        }
        debug!("LeapMotion connection open");

        let started = Instant::now();
        loop {
            let msg = match connection.poll(100) {
                Ok(m)  => m,
                Err(_) => continue,
            };

            if let Event::Tracking(frame) = msg.event() {
                let mut out = TrackingFrame::empty(started.elapsed().as_secs_f64() * 1000.0);
                for hand in frame.hands() {
                    let handedness = if hand.hand_type() == HandType::Left {
                        Handedness::Left
                    } else {
                        Handedness::Right
                    };
                    let digits: Vec<_> = hand.digits().collect();
                    if digits.len() < 5 { continue; }

                    let project = |x: f32, y: f32| Point::new(
                        0.5 - x / (2.0 * REACH_MM),
                        1.0 - (y - FLOOR_MM) / (2.0 * REACH_MM),
                    );

                    let ib = digits[1].metacarpal().prev_joint();
                    let pb = digits[4].metacarpal().prev_joint();
                    let mut landmarks = Vec::with_capacity(21);
                    landmarks.push(project(ib.x, ib.y).midpoint(project(pb.x, pb.y)));
                    for digit in &digits {
                        let joints = [
                            digit.proximal().prev_joint(),
                            digit.intermediate().prev_joint(),
                            digit.distal().prev_joint(),
                            digit.distal().next_joint(),
                        ];
                        for j in joints.iter() {
                            landmarks.push(project(j.x, j.y));
                        }
                    }
                    out = out.with_hand(handedness, landmarks);
                }
                if tx.send(SourceEvent::Frame(out)).is_err() { return; }
            }
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// SimHandSource — keyboard/mouse simulation (always available)
// ════════════════════════════════════════════════════════════════════════════

/// Raw input event from the simulation window.
#[derive(Clone, Debug, PartialEq)]
pub enum SimInput {
    KeyDown(SimKey),
    KeyUp(SimKey),
    /// Cursor position, normalized to the window.
    Pointer { x: f32, y: f32 },
    /// The window is ready for a new video frame.
    Tick { timestamp_ms: f64 },
}

/// Simulated key codes (mapped from minifb Key).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SimKey {
    ToggleLeft,   // L
    ToggleRight,  // R
    Open,         // Space (held)
    Pinch,        // P (held)
}

/// Backdrop resolution of the simulated camera.
const CAM_W: usize = 160;
const CAM_H: usize = 120;

/// Hand size relative to the synthetic template.
const HAND_SCALE: f32 = 1.3;

/// Hand source driven by [`SimInput`] events (from the visualizer's window).
///
/// The cursor places the right palm; the left hand mirrors it across the
/// vertical center line.  Held keys set the pose of both hands; L/R take a
/// hand in or out of view.  A frame is produced for every `Tick`.
pub struct SimHandSource {
    rx:       Receiver<SimInput>,
    /// Match `SceneConfig::mirror_landmarks` so the palm lands under the
    /// cursor.
    mirror:   bool,
    pointer:  Point,
    left_on:  bool,
    right_on: bool,
    open:     bool,
    pinch:    bool,
    backdrop: Arc<CameraFrame>,
}

impl SimHandSource {
    pub fn new(rx: Receiver<SimInput>, mirror: bool) -> Self {
        SimHandSource {
            rx,
            mirror,
            pointer:  Point::new(0.7, 0.6),
            left_on:  true,
            right_on: true,
            open:     false,
            pinch:    false,
            backdrop: Arc::new(backdrop()),
        }
    }

    fn apply(&mut self, input: SimInput) -> Option<TrackingFrame> {
        match input {
            SimInput::KeyDown(SimKey::ToggleLeft)  => self.left_on  = !self.left_on,
            SimInput::KeyDown(SimKey::ToggleRight) => self.right_on = !self.right_on,
            SimInput::KeyDown(SimKey::Open)        => self.open  = true,
            SimInput::KeyUp(SimKey::Open)          => self.open  = false,
            SimInput::KeyDown(SimKey::Pinch)       => self.pinch = true,
            SimInput::KeyUp(SimKey::Pinch)         => self.pinch = false,
            SimInput::Pointer { x, y }             => self.pointer = Point::new(x, y),
            SimInput::Tick { timestamp_ms }        => return Some(self.frame(timestamp_ms)),
            SimInput::KeyUp(_)                     => {}
        }
        None
    }

    fn pose(&self) -> HandPose {
        if self.pinch {
            HandPose::Pinch
        } else if self.open {
            HandPose::Open
        } else {
            HandPose::Fist
        }
    }

    /// Build the frame the camera would have seen.
    pub fn frame(&self, timestamp_ms: f64) -> TrackingFrame {
        let pose = self.pose();
        let mut frame = TrackingFrame::empty(timestamp_ms).with_image(Arc::clone(&self.backdrop));

        // Screen x of each palm, then back into image coordinates.
        let to_image = |sx: f32| if self.mirror { 1.0 - sx } else { sx };
        let right_x = self.pointer.x;
        let left_x  = 1.0 - self.pointer.x;

        if self.right_on {
            frame = frame.with_hand(Handedness::Right, place(pose, to_image(right_x), self.pointer.y, false));
        }
        if self.left_on {
            frame = frame.with_hand(Handedness::Left, place(pose, to_image(left_x), self.pointer.y, true));
        }
        frame
    }
}

/// A hand whose palm center sits at `(x, y)`; `flip` mirrors it
/// left-to-right about the wrist.
fn place(pose: HandPose, x: f32, y: f32, flip: bool) -> Vec<Point> {
    let template = synth_hand(pose, Point::default(), HAND_SCALE);
    let palm = template[9];
    template
        .into_iter()
        .map(|p| {
            let dx = if flip { -(p.x - palm.x) } else { p.x - palm.x };
            Point::new(x + dx, y + (p.y - palm.y))
        })
        .collect()
}

/// A dim, warm room: vertical gradient with a darker floor band.
fn backdrop() -> CameraFrame {
    let mut pixels = Vec::with_capacity(CAM_W * CAM_H);
    for y in 0..CAM_H {
        let t = y as f32 / CAM_H as f32;
        let floor = if t > 0.75 { 0.6 } else { 1.0 };
        let r = ((70.0 - 30.0 * t) * floor) as u32;
        let g = ((60.0 - 25.0 * t) * floor) as u32;
        let b = ((55.0 - 15.0 * t) * floor) as u32;
        for x in 0..CAM_W {
            // Slight vignette toward the sides.
            let edge = (x as f32 / CAM_W as f32 - 0.5).abs();
            let v = 1.0 - edge * 0.5;
            let px = (((r as f32 * v) as u32) << 16) | (((g as f32 * v) as u32) << 8) | (b as f32 * v) as u32;
            pixels.push(0xFF000000 | px);
        }
    }
    CameraFrame::new(CAM_W, CAM_H, pixels)
}

impl HandSource for SimHandSource {
    fn run(mut self: Box<Self>, tx: Sender<SourceEvent>) {
        while let Ok(input) = self.rx.recv() {
            if let Some(frame) = self.apply(input) {
                if tx.send(SourceEvent::Frame(frame)).is_err() {
                    warn!("render loop gone; stopping hand simulator");
                    return;
                }
            }
        }
        debug!("hand simulator input closed");
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════
