//! A running effect session.
//!
//! `Session` ties a [`Simulation`] to a [`Canvas`] and a random source, and
//! is the only thing a host needs to hold: feed it every provider frame,
//! forward mode/clear signals, and present the returned buffer.

use tracing::{debug, info};

use crate::config::FxConfig;
use crate::frame::TrackingFrame;
use crate::landmarks::Viewport;
use crate::mode::PowerMode;
use crate::raster::Canvas;
use crate::render::FrameCommands;
use crate::rng::RandomSource;
use crate::sim::Simulation;

pub struct Session<R: RandomSource> {
    sim:    Simulation,
    canvas: Canvas,
    rng:    R,
    active: bool,
}

impl<R: RandomSource> Session<R> {
    pub fn start(config: FxConfig, viewport: Viewport, rng: R) -> Self {
        info!(width = viewport.width, height = viewport.height, "effect session started");
        Session {
            sim:    Simulation::new(config),
            canvas: Canvas::new(viewport),
            rng,
            active: true,
        }
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn simulation(&self) -> &Simulation {
        &self.sim
    }

    pub fn viewport(&self) -> Viewport {
        self.canvas.viewport()
    }

    /// The most recently composited frame.
    pub fn pixels(&self) -> &[u32] {
        self.canvas.pixels()
    }

    /// Output size for subsequent frames.
    pub fn resize(&mut self, viewport: Viewport) {
        if self.active && viewport != self.canvas.viewport() {
            self.canvas.resize(viewport);
        }
    }

    /// Simulate and composite one frame.  `None` after teardown.
    pub fn on_frame(&mut self, frame: &TrackingFrame) -> Option<&[u32]> {
        let commands = self.step(frame)?;
        self.canvas.draw(&commands, frame.image.as_deref());
        Some(self.canvas.pixels())
    }

    /// Simulate one frame without rasterizing it.
    pub fn step(&mut self, frame: &TrackingFrame) -> Option<FrameCommands> {
        if !self.active {
            return None;
        }
        Some(self.sim.step(frame, self.canvas.viewport(), &mut self.rng))
    }

    pub fn set_power_mode(&mut self, mode: PowerMode) {
        if self.active {
            self.sim.set_power_mode(mode);
        }
    }

    pub fn clear(&mut self) {
        if self.active {
            self.sim.clear();
        }
    }

    /// Stop the session.  Later calls are no-ops.
    pub fn teardown(&mut self) {
        if !self.active {
            return;
        }
        self.active = false;
        self.sim.clear();
        debug!(frames = self.sim.frame_count(), "effect session torn down");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use crate::landmarks::{Handedness, Point};
    use crate::raster::CameraFrame;
    use crate::rng::ScriptedRandom;
    use crate::synthetic::{synth_hand, HandPose};

    fn session() -> Session<ScriptedRandom> {
        Session::start(FxConfig::default(), Viewport::new(64, 48), ScriptedRandom::constant(0.0))
    }

    fn open(t: f64) -> TrackingFrame {
        TrackingFrame::empty(t)
            .with_hand(Handedness::Left, synth_hand(HandPose::Open, Point::new(0.5, 0.8), 1.0))
    }

    #[test]
    fn frame_returns_full_buffer() {
        let mut s = session();
        let buf = s.on_frame(&open(0.0)).unwrap();
        assert_eq!(buf.len(), 64 * 48);
    }

    #[test]
    fn effects_light_up_a_dark_frame() {
        let mut s = session();
        let buf = s.on_frame(&open(0.0)).unwrap().to_vec();
        assert!(buf.iter().any(|&p| p & 0x00FFFFFF != 0));
        let blank = session().on_frame(&TrackingFrame::empty(0.0)).unwrap().to_vec();
        assert!(blank.iter().all(|&p| p == 0xFF000000));
    }

    #[test]
    fn camera_image_is_composited() {
        let cam = Arc::new(CameraFrame::new(1, 1, vec![0xFF808080]));
        let mut s = session();
        let buf = s.on_frame(&TrackingFrame::empty(0.0).with_image(cam)).unwrap();
        // Multiply overlay darkens but does not black out the feed.
        let px = buf[0];
        assert!(px & 0xFF0000 > 0 && (px >> 16) & 0xFF < 0x80);
    }

    #[test]
    fn teardown_makes_later_calls_no_ops() {
        let mut s = session();
        s.on_frame(&open(0.0));
        s.teardown();
        assert!(!s.is_active());
        assert!(s.on_frame(&open(16.0)).is_none());
        s.set_power_mode(PowerMode::Lightning);
        assert_eq!(s.simulation().mode(), PowerMode::FireIce);
        s.clear();
        s.teardown();
        assert_eq!(s.simulation().frame_count(), 1);
        assert!(s.simulation().particles().is_empty());
    }

    #[test]
    fn resize_changes_buffer() {
        let mut s = session();
        s.resize(Viewport::new(10, 10));
        assert_eq!(s.on_frame(&open(0.0)).unwrap().len(), 100);
    }
}
