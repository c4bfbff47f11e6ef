// waves.rs - Layered sine waves
//
// No per-pixel state: each frame the outline of every wave is computed
// analytically from the accumulated tick time. Time advances by a fixed
// step per tick, not by wall clock, so motion does not jitter with frame
// timing.

use super::{EffectKind, Simulator};
use crate::color::{ColorMode, Rgba};
use crate::perf::Budget;
use crate::render::{Paint, Point, Surface};
use std::f32::consts::{PI, TAU};

/// Horizontal distance between samples, in px.
pub const SAMPLE_STEP: f32 = 5.0;
/// Baseline of the back wave as a fraction of surface height.
const BASELINE: f32 = 0.6;
/// Extra downward offset per layer, in px.
const LAYER_SPREAD: f32 = 40.0;

const DARK: [Rgba; 3] = [
    Rgba::new(99, 102, 241, 0.4),
    Rgba::new(79, 70, 229, 0.35),
    Rgba::new(67, 56, 202, 0.3),
];
const LIGHT: [Rgba; 3] = [
    Rgba::new(20, 184, 166, 0.4),
    Rgba::new(13, 148, 136, 0.35),
    Rgba::new(15, 118, 110, 0.3),
];

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Wave {
    pub amplitude: f32,
    pub wavelength: f32,
    pub phase: f32,
    pub speed: f32,
    /// Wavelength as a share of surface width; reapplied on resize.
    pub width_share: f32,
}

impl Wave {
    /// Vertical displacement at `x` for tick time `time`.
    #[inline]
    pub fn offset_at(&self, x: f32, time: f32) -> f32 {
        self.amplitude * (x / self.wavelength * TAU + self.phase + time * self.speed).sin()
    }
}

pub struct WaveField {
    w: f32,
    h: f32,
    waves: [Wave; 3],
    time: f32,
    time_step: f32,
    mode: ColorMode,
    path: Vec<Point>,
}

impl WaveField {
    pub fn new(budget: &Budget, mode: ColorMode, w: f32, h: f32) -> Self {
        let wave = |amplitude, width_share: f32, speed, phase| Wave {
            amplitude,
            wavelength: w * width_share,
            phase,
            speed,
            width_share,
        };
        Self {
            w,
            h,
            waves: [
                wave(35.0, 0.4, 0.5, 0.0),
                wave(25.0, 0.6, 0.7, PI / 3.0),
                wave(20.0, 0.3, 0.9, PI / 1.5),
            ],
            time: 0.0,
            time_step: budget.wave_time_step,
            mode,
            path: Vec::new(),
        }
    }

    pub fn waves(&self) -> &[Wave] {
        &self.waves
    }

    pub fn time(&self) -> f32 {
        self.time
    }

    pub fn set_time(&mut self, time: f32) {
        self.time = time;
    }

    /// Resting line of layer `i`.
    pub fn baseline(&self, i: usize) -> f32 {
        self.h * BASELINE + i as f32 * LAYER_SPREAD
    }

    /// Surface y of layer `i` at `x` for the current time.
    pub fn sample(&self, i: usize, x: f32) -> f32 {
        self.baseline(i) + self.waves[i].offset_at(x, self.time)
    }

    /// Closed outline of layer `i`: start at the left baseline, follow the
    /// sampled curve across the width, then down to the bottom corners.
    pub fn outline_into(&self, i: usize, out: &mut Vec<Point>) {
        out.clear();
        out.push(Point::new(0.0, self.baseline(i)));
        let mut x = 0.0;
        while x < self.w {
            out.push(Point::new(x, self.sample(i, x)));
            x += SAMPLE_STEP;
        }
        out.push(Point::new(self.w, self.h));
        out.push(Point::new(0.0, self.h));
    }

    fn paint(&self, i: usize) -> Paint {
        let base = self.h * BASELINE;
        let amp = self.waves[i].amplitude;
        let color = self.mode.pick(DARK, LIGHT)[i % 3];
        Paint::VerticalGradient {
            top: base - amp,
            bottom: base + amp * 2.0,
            from: color,
            to: Rgba::TRANSPARENT,
        }
    }

    /// Back to front, layer 0 first.
    pub fn draw(&mut self, surface: &mut dyn Surface) {
        surface.clear();
        let mut path = std::mem::take(&mut self.path);
        for i in 0..self.waves.len() {
            self.outline_into(i, &mut path);
            surface.fill_polygon(&path, self.paint(i));
        }
        self.path = path;
    }
}

impl Simulator for WaveField {
    fn kind(&self) -> EffectKind {
        EffectKind::Waves
    }

    fn step(&mut self, surface: &mut dyn Surface, _elapsed_ms: f64) {
        self.time += self.time_step;
        self.draw(surface);
    }

    fn resize(&mut self, width: f32, height: f32) {
        self.w = width;
        self.h = height;
        for wave in &mut self.waves {
            wave.wavelength = width * wave.width_share;
        }
    }

    fn set_color_mode(&mut self, mode: ColorMode) {
        self.mode = mode;
    }

    fn entity_count(&self) -> usize {
        self.waves.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::perf::PerformanceTier;
    use crate::render::headless::{DrawCmd, RecordingSurface};

    fn field() -> WaveField {
        WaveField::new(&PerformanceTier::High.budget(), ColorMode::Dark, 800.0, 600.0)
    }

    #[test]
    fn sampling_is_pure() {
        let mut f = field();
        f.set_time(12.34);
        let a = f.sample(1, 217.0);
        let b = f.sample(1, 217.0);
        assert_eq!(a.to_bits(), b.to_bits());
    }

    #[test]
    fn sample_at_origin_uses_phase_only() {
        let f = field();
        assert_eq!(f.sample(0, 0.0), 360.0);
        let expected = 360.0 + LAYER_SPREAD + 25.0 * (PI / 3.0).sin();
        assert!((f.sample(1, 0.0) - expected).abs() < 1e-4);
    }

    #[test]
    fn time_advances_by_fixed_step() {
        let mut f = WaveField::new(&PerformanceTier::Low.budget(), ColorMode::Light, 100.0, 100.0);
        let mut s = RecordingSurface::new(100, 100);
        f.step(&mut s, 500.0);
        f.step(&mut s, 3.0);
        assert!((f.time() - 0.02).abs() < 1e-6);
    }

    #[test]
    fn outline_shape() {
        let f = field();
        let mut path = Vec::new();
        f.outline_into(2, &mut path);
        // start + 160 samples (0..800 step 5) + two bottom corners
        assert_eq!(path.len(), 1 + 160 + 2);
        assert_eq!(path[0], Point::new(0.0, f.baseline(2)));
        assert_eq!(path[path.len() - 2], Point::new(800.0, 600.0));
        assert_eq!(path[path.len() - 1], Point::new(0.0, 600.0));
        assert_eq!(path[2].x, SAMPLE_STEP);
    }

    #[test]
    fn draws_back_to_front() {
        let mut f = field();
        let mut s = RecordingSurface::new(800, 600);
        f.step(&mut s, 0.0);
        let starts: Vec<f32> = s
            .polygons()
            .map(|c| match c {
                DrawCmd::Polygon { points, .. } => points[0].y,
                _ => unreachable!(),
            })
            .collect();
        assert_eq!(starts, vec![360.0, 400.0, 440.0]);
    }

    #[test]
    fn resize_rescales_wavelengths() {
        let mut f = field();
        f.resize(1000.0, 500.0);
        let lengths: Vec<f32> = f.waves().iter().map(|w| w.wavelength).collect();
        assert_eq!(lengths, vec![400.0, 600.0, 300.0]);
        assert_eq!(f.baseline(0), 300.0);
    }
}
