//! Lightning bolts.
//!
//! A bolt is a jagged polyline generated once by a biased random walk and
//! never reshaped; only its life runs down.  Rendering fakes an electrical
//! glow by stroking the same path three times.

use std::sync::Arc;

use crate::config::LightningConfig;
use crate::landmarks::Point;
use crate::render::{BlendMode, DrawCommand, FrameCommands, Rgba};
use crate::rng::RandomSource;

/// Light cyan (`#E0FFFF`).
pub const BOLT_PALE: u32 = 0xE0FFFF;
/// Deep sky blue (`#00BFFF`).
pub const BOLT_DEEP: u32 = 0x00BFFF;
pub const BOLT_PALETTE: [u32; 2] = [BOLT_PALE, BOLT_DEEP];

/// One stroke of the layered bolt recipe.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BoltLayer {
    pub width: f32,
    /// Multiplier applied to the bolt's life for this layer's opacity.
    pub alpha: f32,
    pub blur:  f32,
    pub blend: BlendMode,
    /// Draw in white instead of the bolt color.
    pub white: bool,
}

/// Wide blurred glow, bright core, thin white center.
pub const BOLT_LAYERS: [BoltLayer; 3] = [
    BoltLayer { width: 20.0, alpha: 0.3, blur: 30.0, blend: BlendMode::Add,        white: false },
    BoltLayer { width: 8.0,  alpha: 0.6, blur: 0.0,  blend: BlendMode::Add,        white: false },
    BoltLayer { width: 2.0,  alpha: 1.0, blur: 0.0,  blend: BlendMode::SourceOver, white: true  },
];

#[derive(Clone, Debug, PartialEq)]
pub struct LightningBolt {
    pub points: Arc<[Point]>,
    pub life:   f32,
    /// Packed `0xRRGGBB`, one of [`BOLT_PALETTE`].
    pub color:  u32,
}

#[derive(Clone, Debug, Default)]
pub struct Bolts {
    items: Vec<LightningBolt>,
}

impl Bolts {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &LightningBolt> {
        self.items.iter()
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Maybe spawn a bolt at `origin` (pixels): only if a uniform draw is at
    /// most `charge`.  Returns whether one was added.
    pub fn spawn(
        &mut self,
        origin: Point,
        charge: f32,
        cfg:    &LightningConfig,
        rng:    &mut impl RandomSource,
    ) -> bool {
        if rng.next_unit() > charge {
            return false;
        }

        let mut path = Vec::with_capacity(cfg.points);
        let mut cursor = origin;
        for _ in 0..cfg.points {
            path.push(cursor);
            cursor.x += (rng.next_unit() - 0.5) * cfg.step;
            cursor.y += (rng.next_unit() - cfg.upward_bias) * cfg.step;
        }
        let color = if rng.next_unit() > 0.5 { BOLT_PALE } else { BOLT_DEEP };

        self.items.push(LightningBolt { points: path.into(), life: 1.0, color });
        true
    }

    /// Age every bolt by `decay`, drop the exhausted ones, and emit the
    /// three-layer stroke for each survivor.
    pub fn advance(&mut self, decay: f32, out: &mut FrameCommands) {
        self.items.retain_mut(|bolt| {
            bolt.life -= decay;
            if bolt.life <= 0.0 {
                return false;
            }
            if bolt.points.is_empty() {
                return true;
            }
            let color = Rgba::hex(bolt.color);
            for layer in BOLT_LAYERS.iter() {
                let base = if layer.white { Rgba::WHITE } else { color };
                out.push(DrawCommand::Stroke {
                    points: Arc::clone(&bolt.points),
                    width:  layer.width,
                    blur:   layer.blur,
                    color:  base.with_alpha(bolt.life * layer.alpha),
                    blend:  layer.blend,
                });
            }
            true
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::landmarks::Viewport;
    use crate::rng::ScriptedRandom;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn bolt_has_25_points_and_palette_color() {
        let cfg = LightningConfig::default();
        let mut rng = StdRng::seed_from_u64(42);
        let mut bolts = Bolts::new();
        for _ in 0..50 {
            bolts.spawn(Point::new(100.0, 100.0), 1.0, &cfg, &mut rng);
        }
        assert_eq!(bolts.len(), 50);
        for b in bolts.iter() {
            assert_eq!(b.points.len(), 25);
            assert_eq!(b.points[0], Point::new(100.0, 100.0));
            assert!(BOLT_PALETTE.contains(&b.color));
            assert_eq!(b.life, 1.0);
        }
    }

    #[test]
    fn gated_by_charge() {
        let cfg = LightningConfig::default();
        let mut bolts = Bolts::new();
        let mut r = ScriptedRandom::constant(0.6);
        assert!(!bolts.spawn(Point::default(), 0.5, &cfg, &mut r));
        assert!(bolts.is_empty());
    }

    #[test]
    fn walk_trends_upward() {
        // A draw of 0.5 is centered horizontally and 0.3 * step upward.
        let cfg = LightningConfig::default();
        let mut bolts = Bolts::new();
        bolts.spawn(Point::new(0.0, 0.0), 1.0, &cfg, &mut ScriptedRandom::constant(0.5));
        let b = bolts.iter().next().unwrap();
        let last = b.points[24];
        assert_eq!(last.x, 0.0);
        assert!((last.y - 24.0 * -24.0).abs() < 1e-3);
        assert_eq!(b.color, BOLT_DEEP);
    }

    #[test]
    fn advance_emits_three_strokes_then_expires() {
        let cfg = LightningConfig::default();
        let mut bolts = Bolts::new();
        bolts.spawn(Point::default(), 1.0, &cfg, &mut ScriptedRandom::constant(0.7));

        let mut frames = 0;
        while !bolts.is_empty() {
            let mut out = FrameCommands::new(Viewport::new(10, 10));
            bolts.advance(cfg.decay, &mut out);
            assert_eq!(out.stroke_count(), 3 * bolts.len());
            frames += 1;
            assert!(frames < 20);
        }
        // 1.0 in steps of 0.1 leaves a sliver of life on the tenth frame
        // or expires it, depending on rounding; either way it is gone by 11.
        assert!(frames == 10 || frames == 11);
    }

    #[test]
    fn layers_fade_with_life() {
        let cfg = LightningConfig::default();
        let mut bolts = Bolts::new();
        bolts.spawn(Point::default(), 1.0, &cfg, &mut ScriptedRandom::constant(0.7));
        let mut out = FrameCommands::new(Viewport::new(10, 10));
        bolts.advance(cfg.decay, &mut out);
        let alphas: Vec<f32> = out.commands.iter().map(|c| match c {
            DrawCommand::Stroke { color, .. } => color.a,
            _ => unreachable!(),
        }).collect();
        assert!((alphas[0] - 0.9 * 0.3).abs() < 1e-5);
        assert!((alphas[1] - 0.9 * 0.6).abs() < 1e-5);
        assert!((alphas[2] - 0.9).abs() < 1e-5);
    }
}
