//! Draw commands produced by one simulation step.
//!
//! The simulation never touches pixels.  It emits an ordered list of
//! [`DrawCommand`]s describing the layered recipe (camera, darkening
//! overlay, flash, glows, additive particles, triple-stroked bolts) and the
//! [`Canvas`](crate::raster::Canvas) rasterizes them.

use std::sync::Arc;

use crate::landmarks::{Handedness, Point, Viewport};
use crate::particle::ParticleKind;

// ════════════════════════════════════════════════════════════════════════════
// Color
// ════════════════════════════════════════════════════════════════════════════

/// Straight-alpha color: channels 0–255, alpha 0–1.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rgba {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Rgba {
    pub const TRANSPARENT: Rgba = Rgba { r: 0.0, g: 0.0, b: 0.0, a: 0.0 };
    pub const WHITE: Rgba = Rgba { r: 255.0, g: 255.0, b: 255.0, a: 1.0 };

    pub fn new(r: u8, g: u8, b: u8, a: f32) -> Self {
        Rgba { r: r as f32, g: g as f32, b: b as f32, a }
    }

    /// Opaque color from a packed `0xRRGGBB`.
    pub fn hex(rgb: u32) -> Self {
        Rgba::new((rgb >> 16) as u8, (rgb >> 8) as u8, rgb as u8, 1.0)
    }

    pub fn with_alpha(self, a: f32) -> Self {
        Rgba { a, ..self }
    }

    pub fn lerp(self, other: Rgba, t: f32) -> Rgba {
        let t = t.clamp(0.0, 1.0);
        let mix = |a: f32, b: f32| a + (b - a) * t;
        Rgba {
            r: mix(self.r, other.r),
            g: mix(self.g, other.g),
            b: mix(self.b, other.b),
            a: mix(self.a, other.a),
        }
    }
}

/// How a source color combines with what is already on the surface.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BlendMode {
    SourceOver,
    Multiply,
    Screen,
    /// Additive ("lighter"): overlapping draws brighten.
    Add,
}

// ════════════════════════════════════════════════════════════════════════════
// Gradient
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ColorStop {
    pub offset: f32,
    pub color:  Rgba,
}

impl ColorStop {
    pub const fn new(offset: f32, color: Rgba) -> Self {
        ColorStop { offset, color }
    }
}

const MAX_STOPS: usize = 4;

/// Radial gradient from center (`offset 0`) to rim (`offset 1`), at most four
/// stops in ascending offset order.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Gradient {
    stops: [ColorStop; MAX_STOPS],
    len:   usize,
}

impl Gradient {
    pub fn new(stops: &[ColorStop]) -> Self {
        let len = stops.len().min(MAX_STOPS);
        let mut arr = [ColorStop::new(1.0, Rgba::TRANSPARENT); MAX_STOPS];
        arr[..len].copy_from_slice(&stops[..len]);
        Gradient { stops: arr, len }
    }

    pub fn stops(&self) -> &[ColorStop] {
        &self.stops[..self.len]
    }

    /// Color at `t` in `[0, 1]`; clamps to the first/last stop outside them.
    pub fn sample(&self, t: f32) -> Rgba {
        let stops = self.stops();
        let Some(first) = stops.first() else { return Rgba::TRANSPARENT };
        if t <= first.offset {
            return first.color;
        }
        for pair in stops.windows(2) {
            let (a, b) = (pair[0], pair[1]);
            if t <= b.offset {
                let span = b.offset - a.offset;
                let local = if span > 0.0 { (t - a.offset) / span } else { 1.0 };
                return a.color.lerp(b.color, local);
            }
        }
        stops[stops.len() - 1].color
    }

    /// Alpha at the center; zero means the draw is invisible.
    pub fn peak_alpha(&self) -> f32 {
        self.stops().iter().map(|s| s.color.a).fold(0.0, f32::max)
    }
}

// ════════════════════════════════════════════════════════════════════════════
// DrawCommand
// ════════════════════════════════════════════════════════════════════════════

/// One layer of the composite, applied in order.
#[derive(Clone, Debug, PartialEq)]
pub enum DrawCommand {
    /// The camera frame, mirrored horizontally and scaled to the viewport.
    /// Clears to black when no frame is available.
    Camera,
    /// Full-surface fill.
    Fill { color: Rgba, blend: BlendMode },
    /// Screen-blended radial glow around a palm.
    Glow {
        hand:     Handedness,
        center:   Point,
        radius:   f32,
        gradient: Gradient,
    },
    /// Additive radial blob for one particle.
    Particle {
        kind:     ParticleKind,
        center:   Point,
        radius:   f32,
        gradient: Gradient,
    },
    /// Polyline stroke; `blur` widens it with a soft falloff.
    Stroke {
        points: Arc<[Point]>,
        width:  f32,
        blur:   f32,
        color:  Rgba,
        blend:  BlendMode,
    },
}

impl DrawCommand {
    pub fn blend(&self) -> BlendMode {
        match self {
            DrawCommand::Camera                => BlendMode::SourceOver,
            DrawCommand::Fill { blend, .. }    => *blend,
            DrawCommand::Glow { .. }           => BlendMode::Screen,
            DrawCommand::Particle { .. }       => BlendMode::Add,
            DrawCommand::Stroke { blend, .. }  => *blend,
        }
    }
}

/// Everything one frame draws, in painter's order.
#[derive(Clone, Debug, PartialEq)]
pub struct FrameCommands {
    pub viewport: Viewport,
    pub commands: Vec<DrawCommand>,
}

impl FrameCommands {
    pub fn new(viewport: Viewport) -> Self {
        FrameCommands { viewport, commands: Vec::new() }
    }

    pub fn push(&mut self, cmd: DrawCommand) {
        self.commands.push(cmd);
    }

    pub fn glows(&self) -> impl Iterator<Item = &DrawCommand> {
        self.commands.iter().filter(|c| matches!(c, DrawCommand::Glow { .. }))
    }

    pub fn particle_count(&self) -> usize {
        self.commands.iter().filter(|c| matches!(c, DrawCommand::Particle { .. })).count()
    }

    pub fn stroke_count(&self) -> usize {
        self.commands.iter().filter(|c| matches!(c, DrawCommand::Stroke { .. })).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_stop() -> Gradient {
        Gradient::new(&[
            ColorStop::new(0.0, Rgba::new(255, 0, 0, 1.0)),
            ColorStop::new(1.0, Rgba::TRANSPARENT),
        ])
    }

    #[test]
    fn gradient_endpoints() {
        let g = two_stop();
        assert_eq!(g.sample(0.0), Rgba::new(255, 0, 0, 1.0));
        assert_eq!(g.sample(1.0), Rgba::TRANSPARENT);
        assert_eq!(g.sample(2.0), Rgba::TRANSPARENT);
    }

    #[test]
    fn gradient_midpoint_interpolates() {
        let mid = two_stop().sample(0.5);
        assert!((mid.r - 127.5).abs() < 1e-3);
        assert!((mid.a - 0.5).abs() < 1e-6);
    }

    #[test]
    fn gradient_truncates_to_four_stops() {
        let stop = ColorStop::new(0.5, Rgba::WHITE);
        let g = Gradient::new(&[stop; 6]);
        assert_eq!(g.stops().len(), 4);
    }

    #[test]
    fn hex_unpacks_channels() {
        assert_eq!(Rgba::hex(0x00BFFF), Rgba::new(0, 191, 255, 1.0));
    }

    #[test]
    fn blends_by_variant() {
        let g = two_stop();
        let glow = DrawCommand::Glow {
            hand: Handedness::Left, center: Point::default(), radius: 1.0, gradient: g,
        };
        assert_eq!(glow.blend(), BlendMode::Screen);
        let p = DrawCommand::Particle {
            kind: ParticleKind::Fire, center: Point::default(), radius: 1.0, gradient: g,
        };
        assert_eq!(p.blend(), BlendMode::Add);
    }
}
