//! The per-frame simulation step.
//!
//! `Simulation` owns both hand slots, the global charge, the power mode and
//! the entity containers.  Each [`Simulation::step`] runs, in order:
//!
//! 1. camera background and darkening overlay
//! 2. hand classification and slot updates
//! 3. charge update, screen flash and bolt spawning
//! 4. per-hand glow, ambient particles and pinch painting
//! 5. particle physics, then bolt aging
//!
//! A malformed hand record skips 2–4 for the whole frame; 5 always runs so
//! existing entities keep fading.

use tracing::{debug, trace};

use crate::charge::ChargeLevel;
use crate::config::FxConfig;
use crate::error::Result;
use crate::frame::TrackingFrame;
use crate::gesture::is_open_with;
use crate::hand::{HandGesture, HandSlot};
use crate::landmarks::{
    Handedness, Landmarks, Point, Viewport, FINGERTIPS, HAND_SKELETON, INDEX_TIP, THUMB_TIP,
};
use crate::lightning::Bolts;
use crate::mode::PowerMode;
use crate::particle::{Emission, ParticleKind, Particles};
use crate::render::{BlendMode, ColorStop, DrawCommand, FrameCommands, Gradient, Rgba};
use crate::rng::RandomSource;

/// Validated landmarks per slot for one frame; `None` = not detected.
type Detected = [Option<Landmarks>; 2];

pub struct Simulation {
    config:        FxConfig,
    mode:          PowerMode,
    slots:         [HandSlot; 2],
    charge:        ChargeLevel,
    particles:     Particles,
    bolts:         Bolts,
    /// Timestamp of the first frame seen.
    session_start: Option<f64>,
    frames:        u64,
}

impl Simulation {
    pub fn new(config: FxConfig) -> Self {
        Simulation {
            config,
            mode:          PowerMode::default(),
            slots:         Default::default(),
            charge:        ChargeLevel::new(),
            particles:     Particles::new(),
            bolts:         Bolts::new(),
            session_start: None,
            frames:        0,
        }
    }

    // ── accessors ─────────────────────────────────────────────────────────

    pub fn config(&self) -> &FxConfig        { &self.config }
    pub fn mode(&self) -> PowerMode          { self.mode }
    pub fn charge(&self) -> f32              { self.charge.value() }
    pub fn particles(&self) -> &Particles    { &self.particles }
    pub fn bolts(&self) -> &Bolts            { &self.bolts }
    pub fn frame_count(&self) -> u64         { self.frames }

    pub fn hand(&self, hand: Handedness) -> &HandSlot {
        &self.slots[hand.slot()]
    }

    // ── controls ──────────────────────────────────────────────────────────

    /// Takes effect from the next frame.
    pub fn set_power_mode(&mut self, mode: PowerMode) {
        if mode != self.mode {
            debug!(from = %self.mode, to = %mode, "power mode changed");
        }
        self.mode = mode;
    }

    /// Drop every particle and bolt. Hand state and charge are untouched.
    pub fn clear(&mut self) {
        debug!(particles = self.particles.len(), bolts = self.bolts.len(), "clearing effects");
        self.particles.clear();
        self.bolts.clear();
    }

    // ── frame ─────────────────────────────────────────────────────────────

    /// Advance one frame and return its draw list.
    pub fn step(
        &mut self,
        frame:    &TrackingFrame,
        viewport: Viewport,
        rng:      &mut impl RandomSource,
    ) -> FrameCommands {
        let start = *self.session_start.get_or_insert(frame.timestamp_ms);
        self.frames += 1;

        let mut out = FrameCommands::new(viewport);
        out.push(DrawCommand::Camera);
        let [r, g, b, a] = self.config.scene.overlay;
        out.push(DrawCommand::Fill { color: Rgba { r, g, b, a }, blend: BlendMode::Multiply });

        match self.detect(frame) {
            Ok(hands) => {
                let gestures = self.classify(&hands);
                self.discharge(&hands, &gestures, viewport, rng, &mut out);
                let elapsed = frame.timestamp_ms - start;
                self.emit(&hands, frame.timestamp_ms, elapsed, viewport, rng, &mut out);
            }
            Err(err) => debug!(%err, "skipping hand detection for this frame"),
        }

        self.particles.advance(&mut out);
        self.bolts.advance(self.config.lightning.decay, &mut out);

        trace!(
            frame     = self.frames,
            particles = self.particles.len(),
            bolts     = self.bolts.len(),
            charge    = self.charge.value(),
            "step"
        );
        out
    }

    /// First record per handedness, at most `max_hands` hands accepted.
    /// Duplicates are skipped before they count against the cap.
    fn detect(&self, frame: &TrackingFrame) -> Result<Detected> {
        let mut hands: Detected = [None, None];
        let mut accepted = 0;
        for record in &frame.hands {
            if accepted == self.config.scene.max_hands {
                break;
            }
            let slot = record.handedness.slot();
            if hands[slot].is_some() {
                continue;
            }
            hands[slot] = Some(Landmarks::try_from(record.landmarks.as_slice())?);
            accepted += 1;
        }
        Ok(hands)
    }

    fn classify(&mut self, hands: &Detected) -> [HandGesture; 2] {
        let cfg = &self.config;
        let mut gestures = [HandGesture::ABSENT; 2];
        for (i, slot) in self.slots.iter_mut().enumerate() {
            match &hands[i] {
                Some(lm) => {
                    let gesture = HandGesture {
                        open:  is_open_with(lm, &cfg.gesture),
                        pinch: slot.pinch.update(lm, &cfg.gesture),
                    };
                    slot.update(gesture, self.mode, &cfg.hands);
                    gestures[i] = gesture;
                }
                None => slot.update_absent(self.mode, &cfg.hands, &cfg.gesture),
            }
        }
        gestures
    }

    /// Charge, flash and bolt spawning.
    fn discharge(
        &mut self,
        hands:    &Detected,
        gestures: &[HandGesture; 2],
        viewport: Viewport,
        rng:      &mut impl RandomSource,
        out:      &mut FrameCommands,
    ) {
        let any_open = gestures.iter().any(|g| g.open);
        self.charge.update(self.mode, any_open, &self.config.charge);

        let level = self.charge.value();
        let cfg   = &self.config.lightning;
        if level <= cfg.min_charge {
            return;
        }

        if rng.chance(cfg.flash_chance * level) {
            out.push(DrawCommand::Fill {
                color: Rgba::new(200, 220, 255, cfg.flash_alpha * level),
                blend: BlendMode::SourceOver,
            });
        }

        let mirror = self.config.scene.mirror_landmarks;
        for (lm, gesture) in hands.iter().zip(gestures) {
            let Some(lm) = lm else { continue };
            if !gesture.open {
                continue;
            }
            for &tip in FINGERTIPS.iter() {
                if rng.chance(cfg.tip_chance) {
                    self.bolts.spawn(viewport.to_pixels(lm[tip], mirror), level, cfg, rng);
                }
            }
            for &(a, b) in HAND_SKELETON.iter() {
                if rng.chance(cfg.bone_chance) {
                    let mid = lm[a].midpoint(lm[b]);
                    self.bolts.spawn(viewport.to_pixels(mid, mirror), level, cfg, rng);
                }
            }
        }
    }

    /// Glow, ambient particles and pinch painting for every engaged hand.
    fn emit(
        &mut self,
        hands:    &Detected,
        now_ms:   f64,
        elapsed:  f64,
        viewport: Viewport,
        rng:      &mut impl RandomSource,
        out:      &mut FrameCommands,
    ) {
        if !self.mode.has_hand_effects() {
            return;
        }
        let cfg    = &self.config;
        let mirror = cfg.scene.mirror_landmarks;
        let px     = |p: Point| viewport.to_pixels(p, mirror);

        for hand in Handedness::BOTH {
            let Some(lm) = &hands[hand.slot()] else { continue };
            let slot = &self.slots[hand.slot()];
            if slot.intensity <= cfg.scene.min_intensity {
                continue;
            }
            let kind = particle_kind(self.mode, hand);

            if self.mode == PowerMode::FireIce && slot.pinching && elapsed > cfg.scene.warmup_ms {
                let at = px(lm[THUMB_TIP].midpoint(lm[INDEX_TIP]));
                self.particles.spawn(at, kind, Emission::Drawing, slot, &cfg.particles, rng);
            }

            out.push(glow(self.mode, hand, px(lm.palm()), slot.intensity, now_ms));

            for &p in lm.points().iter() {
                self.particles.spawn(px(p), kind, Emission::Ambient, slot, &cfg.particles, rng);
            }
            if self.mode == PowerMode::FireIce {
                for &(a, b) in HAND_SKELETON.iter() {
                    let at = px(lm[a].midpoint(lm[b]));
                    self.particles.spawn(at, kind, Emission::Ambient, slot, &cfg.particles, rng);
                }
            }
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Per-mode palette
// ════════════════════════════════════════════════════════════════════════════

fn particle_kind(mode: PowerMode, hand: Handedness) -> ParticleKind {
    match (mode, hand) {
        (PowerMode::RedBlue, Handedness::Left)  => ParticleKind::Red,
        (PowerMode::RedBlue, Handedness::Right) => ParticleKind::Blue,
        (_, Handedness::Left)                   => ParticleKind::Fire,
        (_, Handedness::Right)                  => ParticleKind::Ice,
    }
}

/// Screen-blended palm glow. The left hand is larger and flickers faster.
fn glow(mode: PowerMode, hand: Handedness, center: Point, i: f32, now_ms: f64) -> DrawCommand {
    let (base, swing, rate) = match hand {
        Handedness::Left  => (550.0, 25.0, 0.02),
        Handedness::Right => (400.0, 20.0, 0.01),
    };
    let radius = base + swing * (now_ms * rate).sin() as f32;

    let (inner, outer) = match (mode, hand) {
        (PowerMode::RedBlue, Handedness::Left)  => (Rgba::new(255, 0, 0, 0.45 * i),    Rgba::new(200, 0, 0, 0.15 * i)),
        (PowerMode::RedBlue, Handedness::Right) => (Rgba::new(0, 0, 255, 0.4 * i),     Rgba::new(0, 50, 255, 0.1 * i)),
        (_, Handedness::Left)                   => (Rgba::new(255, 60, 0, 0.45 * i),   Rgba::new(255, 30, 0, 0.15 * i)),
        (_, Handedness::Right)                  => (Rgba::new(100, 200, 255, 0.4 * i), Rgba::new(0, 100, 255, 0.1 * i)),
    };

    DrawCommand::Glow {
        hand,
        center,
        radius,
        gradient: Gradient::new(&[
            ColorStop::new(0.0, inner),
            ColorStop::new(0.5, outer),
            ColorStop::new(1.0, Rgba::TRANSPARENT),
        ]),
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════
