// trails.rs - Glowing particles with fading trails ("stars")
//
// Fixed-size population: a particle whose age reaches its lifetime is
// re-rolled in place and its trail emptied, so the container never grows
// or shrinks. Trails are FIFO rings capped at each particle's length.

use super::{bounce, EffectKind, Rng, Simulator};
use crate::color::{ColorMode, Rgba};
use crate::perf::Budget;
use crate::render::{Blend, Glow, Paint, Point, Surface};
use std::collections::VecDeque;

const SPEED: f32 = 0.7;
const HUE_SPREAD: f32 = 40.0;
const SATURATION: f32 = 0.95;
const LIGHTNESS: f32 = 0.75;
const BASE_ALPHA: f32 = 0.9;
/// Random extra points added to the tier's base trail length.
const TRAIL_JITTER: f32 = 8.0;
const TRAIL_SCALE: f32 = 1.2;
const TRAIL_ALPHA: f32 = 0.9;
const HEAD_BOOST: f32 = 1.8;
const GLOW_SCALE: f32 = 2.5;
const GLOW_ALPHA: f32 = 0.3;
const GLOW_BLUR: f32 = 6.0;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TrailPoint {
    pub pos: Point,
    pub size: f32,
}

#[derive(Clone, Debug)]
pub struct Particle {
    pub pos: Point,
    pub vx: f32,
    pub vy: f32,
    pub size: f32,
    /// Hue relative to the color mode's base hue.
    pub hue_offset: f32,
    pub age: u32,
    pub max_life: u32,
    pub trail: VecDeque<TrailPoint>,
    pub trail_length: usize,
}

impl Particle {
    pub fn new(pos: Point, vx: f32, vy: f32, size: f32, max_life: u32, trail_length: usize) -> Self {
        Self {
            pos,
            vx,
            vy,
            size,
            hue_offset: 0.0,
            age: 0,
            max_life: max_life.max(1),
            trail: VecDeque::with_capacity(trail_length + 1),
            trail_length,
        }
    }

    fn random(rng: &mut Rng, w: f32, h: f32, base_length: usize) -> Self {
        let mut p = Self::new(
            Point::new(rng.range(0.0, w), rng.range(0.0, h)),
            rng.centered(SPEED),
            rng.centered(SPEED),
            rng.range(1.5, 5.0),
            rng.range(150.0, 450.0) as u32,
            base_length + (rng.next_f32() * TRAIL_JITTER) as usize,
        );
        p.hue_offset = rng.centered(HUE_SPREAD);
        p
    }

    /// Re-roll in place, keeping the trail's allocation.
    fn respawn(&mut self, rng: &mut Rng, w: f32, h: f32, base_length: usize) {
        let fresh = Self::random(rng, w, h, base_length);
        let mut trail = std::mem::take(&mut self.trail);
        trail.clear();
        *self = Self { trail, ..fresh };
    }

    /// Remaining life in [0, 1].
    pub fn life_fraction(&self) -> f32 {
        (1.0 - self.age as f32 / self.max_life as f32).max(0.0)
    }

    fn record(&mut self) {
        self.trail.push_back(TrailPoint { pos: self.pos, size: self.size * TRAIL_SCALE });
        while self.trail.len() > self.trail_length {
            self.trail.pop_front();
        }
    }
}

pub struct TrailField {
    w: f32,
    h: f32,
    particles: Vec<Particle>,
    base_length: usize,
    mode: ColorMode,
    rng: Rng,
}

impl TrailField {
    pub fn seeded(budget: &Budget, mode: ColorMode, w: f32, h: f32, rng: &mut Rng) -> Self {
        let particles = (0..budget.trail_particles)
            .map(|_| {
                let mut p = Particle::random(rng, w, h, budget.trail_length);
                // Stagger ages so the population does not recycle in lockstep.
                p.age = rng.range(0.0, p.max_life as f32) as u32;
                p
            })
            .collect();
        Self {
            w,
            h,
            particles,
            base_length: budget.trail_length,
            mode,
            rng: rng.fork(),
        }
    }

    pub fn from_particles(particles: Vec<Particle>, w: f32, h: f32, mode: ColorMode) -> Self {
        let base_length = particles.iter().map(|p| p.trail_length).min().unwrap_or(0);
        Self { w, h, particles, base_length, mode, rng: Rng::default() }
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    fn base_hue(&self) -> f32 {
        self.mode.pick(240.0, 180.0)
    }

    fn color(&self, p: &Particle, alpha: f32) -> Rgba {
        Rgba::from_hsla(self.base_hue() + p.hue_offset, SATURATION, LIGHTNESS, alpha)
    }

    fn draw_background(&self, surface: &mut dyn Surface) {
        let (from, to) = self.mode.pick(
            (Rgba::rgb(15, 23, 42), Rgba::rgb(30, 41, 59)),
            (Rgba::rgb(240, 249, 255), Rgba::rgb(224, 242, 254)),
        );
        let paint = Paint::VerticalGradient { top: 0.0, bottom: self.h, from, to };
        surface.fill_rect(Point::new(0.0, 0.0), self.w, self.h, paint);
    }

    fn draw_particle(&self, p: &Particle, surface: &mut dyn Surface) {
        let life = p.life_fraction();
        let len = p.trail.len() as f32;

        for (i, point) in p.trail.iter().enumerate() {
            let t = i as f32 / len;
            let radius = point.size * t;
            if radius <= 0.0 { continue; }
            let alpha = t * life * TRAIL_ALPHA;
            let glow = Glow { blur: radius * 3.0, color: self.color(p, alpha * 0.8) };
            surface.draw_circle(point.pos, radius, self.color(p, alpha), Some(glow));
        }

        let glow = Glow { blur: p.size * 6.0, color: self.color(p, BASE_ALPHA) };
        let alpha = (life * HEAD_BOOST).min(1.0);
        surface.draw_circle(p.pos, p.size, self.color(p, alpha), Some(glow));
    }

    /// Enlarged additive halos on every other particle, dark mode only.
    fn draw_glow_pass(&self, surface: &mut dyn Surface) {
        surface.set_blend(Blend::Additive { blur: GLOW_BLUR });
        for p in self.particles.iter().step_by(2) {
            surface.draw_circle(p.pos, p.size * GLOW_SCALE, self.color(p, GLOW_ALPHA), None);
        }
        surface.set_blend(Blend::Normal);
    }
}

impl Simulator for TrailField {
    fn kind(&self) -> EffectKind {
        EffectKind::Trails
    }

    fn step(&mut self, surface: &mut dyn Surface, _elapsed_ms: f64) {
        surface.clear();
        self.draw_background(surface);

        let (w, h) = (self.w, self.h);
        let mut particles = std::mem::take(&mut self.particles);
        for p in &mut particles {
            p.pos.x += p.vx;
            p.pos.y += p.vy;
            p.record();
            p.age += 1;

            self.draw_particle(p, surface);

            (p.pos.x, p.vx) = bounce(p.pos.x, p.vx, w);
            (p.pos.y, p.vy) = bounce(p.pos.y, p.vy, h);

            if p.age >= p.max_life {
                p.respawn(&mut self.rng, w, h, self.base_length);
            }
        }
        self.particles = particles;

        if self.mode.is_dark() {
            self.draw_glow_pass(surface);
        }
    }

    fn resize(&mut self, width: f32, height: f32) {
        self.w = width;
        self.h = height;
        for p in &mut self.particles {
            p.pos.x = p.pos.x.clamp(0.0, width.max(0.0));
            p.pos.y = p.pos.y.clamp(0.0, height.max(0.0));
        }
    }

    fn set_color_mode(&mut self, mode: ColorMode) {
        self.mode = mode;
    }

    fn entity_count(&self) -> usize {
        self.particles.len()
    }
}
