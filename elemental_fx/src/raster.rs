//! Software compositor.
//!
//! Rasterizes a [`FrameCommands`] list into a packed `0xAARRGGBB` buffer,
//! the same pixel format `minifb` presents.  The surface is always opaque;
//! blending works on straight-alpha sources over an opaque destination.

use crate::landmarks::{Point, Viewport};
use crate::render::{BlendMode, DrawCommand, FrameCommands, Gradient, Rgba};

const BLACK: u32 = 0xFF000000;

/// One camera image as delivered by the tracking provider.
#[derive(Clone, Debug, PartialEq)]
pub struct CameraFrame {
    pub width:  usize,
    pub height: usize,
    /// Row-major `0xAARRGGBB`.
    pub pixels: Vec<u32>,
}

impl CameraFrame {
    pub fn new(width: usize, height: usize, pixels: Vec<u32>) -> Self {
        debug_assert_eq!(pixels.len(), width * height);
        CameraFrame { width, height, pixels }
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0 || self.pixels.len() < self.width * self.height
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Canvas
// ════════════════════════════════════════════════════════════════════════════

pub struct Canvas {
    viewport: Viewport,
    buf:      Vec<u32>,
    /// Per-pixel coverage scratch for polyline strokes.
    coverage: Vec<f32>,
}

impl Canvas {
    pub fn new(viewport: Viewport) -> Self {
        Canvas {
            viewport,
            buf:      vec![BLACK; viewport.pixel_count()],
            coverage: Vec::new(),
        }
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn pixels(&self) -> &[u32] {
        &self.buf
    }

    pub fn pixel(&self, x: usize, y: usize) -> u32 {
        self.buf[y * self.viewport.width + x]
    }

    /// Match the surface to `viewport` and clear it.
    pub fn resize(&mut self, viewport: Viewport) {
        self.viewport = viewport;
        self.buf.clear();
        self.buf.resize(viewport.pixel_count(), BLACK);
    }

    /// Composite one frame.
    pub fn draw(&mut self, frame: &FrameCommands, camera: Option<&CameraFrame>) {
        self.resize(frame.viewport);
        for cmd in &frame.commands {
            match cmd {
                DrawCommand::Camera => self.draw_camera(camera),
                DrawCommand::Fill { color, blend } => self.fill(*color, *blend),
                DrawCommand::Glow { center, radius, gradient, .. }
                | DrawCommand::Particle { center, radius, gradient, .. } => {
                    self.radial(*center, *radius, gradient, cmd.blend());
                }
                DrawCommand::Stroke { points, width, blur, color, blend } => {
                    self.stroke(points, *width, *blur, *color, *blend);
                }
            }
        }
    }

    // ── Layers ────────────────────────────────────────────────────────────

    /// Camera image mirrored horizontally, nearest-neighbour scaled.
    fn draw_camera(&mut self, camera: Option<&CameraFrame>) {
        let Viewport { width, height } = self.viewport;
        let Some(cam) = camera.filter(|c| !c.is_empty()) else {
            self.buf.fill(BLACK);
            return;
        };
        for y in 0..height {
            let sy = y * cam.height / height.max(1);
            for x in 0..width {
                let sx = (width - 1 - x) * cam.width / width.max(1);
                self.buf[y * width + x] = BLACK | cam.pixels[sy * cam.width + sx];
            }
        }
    }

    fn fill(&mut self, color: Rgba, blend: BlendMode) {
        if color.a <= 0.0 {
            return;
        }
        for px in self.buf.iter_mut() {
            *px = blend_pixel(*px, color, color.a, blend);
        }
    }

    fn radial(&mut self, center: Point, radius: f32, gradient: &Gradient, blend: BlendMode) {
        if radius <= 0.0 || gradient.peak_alpha() <= 0.0 {
            return;
        }
        let Some((x0, y0, x1, y1)) = self.clip(center, center, radius) else { return };
        let width = self.viewport.width;
        for y in y0..y1 {
            let dy = y as f32 + 0.5 - center.y;
            for x in x0..x1 {
                let dx = x as f32 + 0.5 - center.x;
                let d = (dx * dx + dy * dy).sqrt();
                if d > radius {
                    continue;
                }
                let c = gradient.sample(d / radius);
                if c.a > 0.0 {
                    let i = y * width + x;
                    self.buf[i] = blend_pixel(self.buf[i], c, c.a, blend);
                }
            }
        }
    }

    /// Stroke a polyline.  Coverage is the max over all segments so joints
    /// are not blended twice.
    fn stroke(&mut self, points: &[Point], width: f32, blur: f32, color: Rgba, blend: BlendMode) {
        if points.is_empty() || color.a <= 0.0 {
            return;
        }
        let half  = width * 0.5;
        let reach = half + blur.max(1.0);

        let (mut lo, mut hi) = (points[0], points[0]);
        for p in points {
            lo = Point::new(lo.x.min(p.x), lo.y.min(p.y));
            hi = Point::new(hi.x.max(p.x), hi.y.max(p.y));
        }
        let Some((x0, y0, x1, y1)) = self.clip(lo, hi, reach) else { return };
        let bw = x1 - x0;
        self.coverage.clear();
        self.coverage.resize(bw * (y1 - y0), 0.0);

        let segments: Vec<(Point, Point)> = if points.len() == 1 {
            vec![(points[0], points[0])]
        } else {
            points.windows(2).map(|w| (w[0], w[1])).collect()
        };

        for &(a, b) in &segments {
            let sx0 = ((a.x.min(b.x) - reach).floor().max(x0 as f32)) as usize;
            let sy0 = ((a.y.min(b.y) - reach).floor().max(y0 as f32)) as usize;
            let sx1 = ((a.x.max(b.x) + reach).ceil().min(x1 as f32)).max(sx0 as f32) as usize;
            let sy1 = ((a.y.max(b.y) + reach).ceil().min(y1 as f32)).max(sy0 as f32) as usize;
            for y in sy0..sy1 {
                for x in sx0..sx1 {
                    let p = Point::new(x as f32 + 0.5, y as f32 + 0.5);
                    let cov = stroke_coverage(segment_distance(p, a, b), half, blur);
                    if cov > 0.0 {
                        let slot = &mut self.coverage[(y - y0) * bw + (x - x0)];
                        *slot = slot.max(cov);
                    }
                }
            }
        }

        let width_px = self.viewport.width;
        for y in y0..y1 {
            for x in x0..x1 {
                let cov = self.coverage[(y - y0) * bw + (x - x0)];
                if cov > 0.0 {
                    let i = y * width_px + x;
                    self.buf[i] = blend_pixel(self.buf[i], color, color.a * cov, blend);
                }
            }
        }
    }

    /// Pixel bounds of the box `lo..hi` grown by `pad`, clipped to the
    /// surface.  `None` when nothing is visible.
    fn clip(&self, lo: Point, hi: Point, pad: f32) -> Option<(usize, usize, usize, usize)> {
        let w = self.viewport.width as f32;
        let h = self.viewport.height as f32;
        let x0 = (lo.x - pad).floor().max(0.0);
        let y0 = (lo.y - pad).floor().max(0.0);
        let x1 = (hi.x + pad).ceil().min(w);
        let y1 = (hi.y + pad).ceil().min(h);
        if !(x0 < x1 && y0 < y1) {
            return None;
        }
        Some((x0 as usize, y0 as usize, x1 as usize, y1 as usize))
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Pixel math
// ════════════════════════════════════════════════════════════════════════════

fn segment_distance(p: Point, a: Point, b: Point) -> f32 {
    let (abx, aby) = (b.x - a.x, b.y - a.y);
    let len2 = abx * abx + aby * aby;
    let t = if len2 > 0.0 {
        (((p.x - a.x) * abx + (p.y - a.y) * aby) / len2).clamp(0.0, 1.0)
    } else {
        0.0
    };
    p.distance(Point::new(a.x + abx * t, a.y + aby * t))
}

/// Full inside the half-width, then a falloff over `blur` pixels (or a
/// one-pixel antialiased edge without blur).
fn stroke_coverage(dist: f32, half: f32, blur: f32) -> f32 {
    if dist <= half {
        return 1.0;
    }
    let edge = blur.max(1.0);
    let t = 1.0 - (dist - half) / edge;
    if t <= 0.0 {
        0.0
    } else if blur > 0.0 {
        t * t
    } else {
        t
    }
}

fn unpack(px: u32) -> [f32; 3] {
    [
        ((px >> 16) & 0xFF) as f32 / 255.0,
        ((px >> 8) & 0xFF) as f32 / 255.0,
        (px & 0xFF) as f32 / 255.0,
    ]
}

fn pack(c: [f32; 3]) -> u32 {
    let q = |v: f32| (v.clamp(0.0, 1.0) * 255.0 + 0.5) as u32;
    BLACK | (q(c[0]) << 16) | (q(c[1]) << 8) | q(c[2])
}

/// Blend `src` over the opaque pixel `dst` with coverage-adjusted `alpha`.
fn blend_pixel(dst: u32, src: Rgba, alpha: f32, mode: BlendMode) -> u32 {
    let a = alpha.clamp(0.0, 1.0);
    if a <= 0.0 {
        return dst;
    }
    let d = unpack(dst);
    let s = [src.r / 255.0, src.g / 255.0, src.b / 255.0];
    let mut out = [0.0f32; 3];
    for i in 0..3 {
        out[i] = match mode {
            BlendMode::SourceOver => s[i] * a + d[i] * (1.0 - a),
            BlendMode::Multiply   => d[i] * (1.0 - a + a * s[i]),
            BlendMode::Screen     => d[i] + a * s[i] * (1.0 - d[i]),
            BlendMode::Add        => d[i] + a * s[i],
        };
    }
    pack(out)
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════
