//! Particle spawning, physics and culling.
//!
//! Ambient particles are gated by the emitting hand's intensity, so density
//! follows how engaged the hand is rather than a fixed count.  Painted
//! (pinch-drawing) particles always spawn, sit still, and fade slowly so a
//! stroke stays on screen.

use serde::{Deserialize, Serialize};

use crate::config::ParticleConfig;
use crate::hand::HandSlot;
use crate::landmarks::Point;
use crate::render::{ColorStop, DrawCommand, FrameCommands, Gradient, Rgba};
use crate::rng::RandomSource;

// ════════════════════════════════════════════════════════════════════════════
// ParticleKind
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ParticleKind {
    Fire,
    Ice,
    Red,
    Blue,
}

impl ParticleKind {
    /// Cool kinds rise more gently.
    pub fn is_cool(self) -> bool {
        matches!(self, ParticleKind::Ice | ParticleKind::Blue)
    }

    /// Radial color ramp at the given remaining life.
    pub fn gradient(self, life: f32) -> Gradient {
        let rim = ColorStop::new(1.0, Rgba::TRANSPARENT);
        match self {
            ParticleKind::Fire => Gradient::new(&[
                ColorStop::new(0.0, Rgba::new(255, 255, 220, life)),
                ColorStop::new(0.2, Rgba::new(255, 180, 0, life * 0.8)),
                ColorStop::new(0.5, Rgba::new(255, 40, 0, life * 0.4)),
                rim,
            ]),
            ParticleKind::Ice => Gradient::new(&[
                ColorStop::new(0.0, Rgba::new(255, 255, 255, life)),
                ColorStop::new(0.3, Rgba::new(180, 240, 255, life * 0.8)),
                ColorStop::new(0.6, Rgba::new(0, 150, 255, life * 0.4)),
                rim,
            ]),
            ParticleKind::Red => Gradient::new(&[
                ColorStop::new(0.0, Rgba::new(255, 200, 200, life)),
                ColorStop::new(0.3, Rgba::new(255, 0, 0, life * 0.8)),
                ColorStop::new(0.6, Rgba::new(100, 0, 0, life * 0.4)),
                rim,
            ]),
            ParticleKind::Blue => Gradient::new(&[
                ColorStop::new(0.0, Rgba::new(200, 200, 255, life)),
                ColorStop::new(0.3, Rgba::new(0, 0, 255, life * 0.8)),
                ColorStop::new(0.6, Rgba::new(0, 0, 100, life * 0.4)),
                rim,
            ]),
        }
    }
}

/// Whether a spawn is ambient emission or pinch painting.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Emission {
    Ambient,
    Drawing,
}

// ════════════════════════════════════════════════════════════════════════════
// Particle
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone, Debug, PartialEq)]
pub struct Particle {
    pub position:   Point,
    /// Pixels per frame.
    pub velocity:   Point,
    pub life:       f32,
    pub decay_rate: f32,
    pub radius:     f32,
    pub kind:       ParticleKind,
}

impl Particle {
    /// Advance one frame. Returns false once the particle has expired.
    pub fn tick(&mut self) -> bool {
        self.position.x += self.velocity.x;
        self.position.y += self.velocity.y;
        self.life -= self.decay_rate;
        self.life > 0.0
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Particles — the owned container
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone, Debug, Default)]
pub struct Particles {
    items: Vec<Particle>,
}

impl Particles {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Particle> {
        self.items.iter()
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Append particles at `at` (pixels) on behalf of `hand`.
    ///
    /// Ambient emission spawns one particle only if a uniform draw is at most
    /// the hand's intensity; drawing emission always spawns
    /// `cfg.drawing_count`.  Returns the number spawned.
    pub fn spawn(
        &mut self,
        at:       Point,
        kind:     ParticleKind,
        emission: Emission,
        hand:     &HandSlot,
        cfg:      &ParticleConfig,
        rng:      &mut impl RandomSource,
    ) -> usize {
        let drawing = emission == Emission::Drawing;
        if !drawing && rng.next_unit() > hand.intensity {
            return 0;
        }

        let count  = if drawing { cfg.drawing_count } else { 1 };
        let jitter = if drawing { cfg.drawing_jitter } else { cfg.ambient_jitter };
        for _ in 0..count {
            let x = at.x + (rng.next_unit() - 0.5) * jitter;
            let y = at.y + (rng.next_unit() - 0.5) * jitter;

            let velocity = if drawing {
                Point::default()
            } else {
                let vx = (rng.next_unit() - 0.5) * cfg.drift;
                let r  = rng.next_unit();
                let vy = if kind.is_cool() {
                    (-5.0 * r - 2.0) - hand.surge * 15.0
                } else {
                    (-10.0 * r - 4.0) - hand.surge * 20.0
                };
                Point::new(vx, vy)
            };

            let (min, span) = if drawing { cfg.drawing_radius } else { cfg.ambient_radius };
            let radius = min + rng.next_unit() * span;

            self.items.push(Particle {
                position:   Point::new(x, y),
                velocity,
                life:       1.0,
                decay_rate: if drawing { cfg.drawing_decay } else { cfg.ambient_decay },
                radius,
                kind,
            });
        }
        count
    }

    /// Physics and cull pass: integrate, age, drop the expired, and emit a
    /// draw for each survivor.
    pub fn advance(&mut self, out: &mut FrameCommands) {
        self.items.retain_mut(|p| {
            if !p.tick() {
                return false;
            }
            out.push(DrawCommand::Particle {
                kind:     p.kind,
                center:   p.position,
                radius:   p.radius,
                gradient: p.kind.gradient(p.life),
            });
            true
        });
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════
