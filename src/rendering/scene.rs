//! Procedural loop scene used as the capture source.
//!
//! Every moving part completes a whole number of cycles per loop, so
//! `capture(t)` and `capture(t + loop_duration)` produce the same pixels.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::f32::consts::TAU;
use tiny_skia::{
    Color, FillRule, GradientStop, LinearGradient, Paint, PathBuilder, Pixmap, Point, Rect,
    SpreadMode, Transform,
};

use super::surface::RenderSurface;
use crate::error::CaptureError;
use crate::models::SceneConfig;

#[derive(Debug, Clone)]
struct Orbit {
    /// Orbit radius as a fraction of the shorter side
    radius: f32,
    /// Shape radius as a fraction of the shorter side
    size: f32,
    phase: f32,
    /// Revolutions per loop; never zero
    cycles: i32,
    /// Radial wobble cycles per loop
    wobble: i32,
    color: [u8; 3],
}

/// A seeded, exactly periodic 2D scene.
#[derive(Debug, Clone)]
pub struct LoopScene {
    width: u32,
    height: u32,
    loop_duration: f64,
    orbits: Vec<Orbit>,
    sky: [[u8; 3]; 2],
}

impl LoopScene {
    pub fn new(width: u32, height: u32, loop_duration: f64, seed: u64, shapes: usize) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);

        let orbits = (0..shapes)
            .map(|_| {
                let mut cycles = rng.gen_range(1..=3);
                if rng.gen_bool(0.5) {
                    cycles = -cycles;
                }
                Orbit {
                    radius: rng.gen_range(0.08..0.42),
                    size: rng.gen_range(0.03..0.11),
                    phase: rng.gen_range(0.0..TAU),
                    cycles,
                    wobble: rng.gen_range(0..=4),
                    color: [rng.gen(), rng.gen(), rng.gen()],
                }
            })
            .collect();

        let sky = [
            [rng.gen_range(0..64), rng.gen_range(0..64), rng.gen_range(32..128)],
            [rng.gen_range(96..255), rng.gen_range(32..160), rng.gen_range(64..200)],
        ];

        Self {
            width,
            height,
            loop_duration,
            orbits,
            sky,
        }
    }

    pub fn from_config(config: &SceneConfig, loop_duration: f64) -> Self {
        Self::new(
            config.width,
            config.height,
            loop_duration,
            config.seed,
            config.shapes,
        )
    }

    pub fn loop_duration(&self) -> f64 {
        self.loop_duration
    }

    /// Render the scene at `t` seconds.
    pub fn render(&self, t: f64) -> Result<Pixmap, CaptureError> {
        let mut pixmap = Pixmap::new(self.width, self.height).ok_or(CaptureError::Surface {
            width: self.width,
            height: self.height,
        })?;

        let phase = self.loop_phase(t);
        let w = self.width as f32;
        let h = self.height as f32;
        let short = w.min(h);

        // background gradient sweeps once around the frame per loop
        let angle = phase * TAU;
        let (dx, dy) = (angle.cos() * w * 0.5, angle.sin() * h * 0.5);
        let [a, b] = self.sky;
        let shader = LinearGradient::new(
            Point::from_xy(w * 0.5 - dx, h * 0.5 - dy),
            Point::from_xy(w * 0.5 + dx, h * 0.5 + dy),
            vec![
                GradientStop::new(0.0, Color::from_rgba8(a[0], a[1], a[2], 255)),
                GradientStop::new(1.0, Color::from_rgba8(b[0], b[1], b[2], 255)),
            ],
            SpreadMode::Pad,
            Transform::identity(),
        );
        match shader {
            Some(shader) => {
                let paint = Paint {
                    shader,
                    ..Default::default()
                };
                if let Some(rect) = Rect::from_xywh(0.0, 0.0, w, h) {
                    pixmap.fill_rect(rect, &paint, Transform::identity(), None);
                }
            }
            None => pixmap.fill(Color::from_rgba8(a[0], a[1], a[2], 255)),
        }

        let mut paint = Paint {
            anti_alias: true,
            ..Default::default()
        };
        for orbit in &self.orbits {
            let theta = orbit.phase + TAU * orbit.cycles as f32 * phase;
            let wobble = 1.0 + 0.25 * (TAU * orbit.wobble as f32 * phase + orbit.phase).sin();
            let r = orbit.radius * short * wobble;
            let cx = w * 0.5 + theta.cos() * r;
            let cy = h * 0.5 + theta.sin() * r;

            let [cr, cg, cb] = orbit.color;
            paint.set_color_rgba8(cr, cg, cb, 220);
            if let Some(path) = PathBuilder::from_circle(cx, cy, orbit.size * short) {
                pixmap.fill_path(&path, &paint, FillRule::Winding, Transform::identity(), None);
            }
        }

        Ok(pixmap)
    }

    /// Position within the loop, in [0, 1).
    fn loop_phase(&self, t: f64) -> f32 {
        if self.loop_duration <= 0.0 {
            return 0.0;
        }
        (t / self.loop_duration).rem_euclid(1.0) as f32
    }
}

impl RenderSurface for LoopScene {
    fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    fn capture(&mut self, t: f64) -> Result<Pixmap, CaptureError> {
        self.render(t)
    }
}
