// render.rs - Drawing surface capability interface
//
// Simulators draw through `Surface` only, never through a concrete API.
// The canvas backend lives in `web::canvas`; `headless` records commands
// for tests and offline inspection.
//
// All coordinates are surface pixels, origin top-left, y down.

pub mod headless;

use crate::color::Rgba;
use crate::error::EngineError;

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    #[inline]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    #[inline]
    pub fn dist(self, o: Point) -> f32 {
        let (dx, dy) = (self.x - o.x, self.y - o.y);
        (dx * dx + dy * dy).sqrt()
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Paint {
    Solid(Rgba),
    /// Linear gradient along y, `from` at `top`, `to` at `bottom`.
    VerticalGradient { top: f32, bottom: f32, from: Rgba, to: Rgba },
}

/// Soft halo around a shape (canvas `shadowBlur`).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Glow {
    pub blur: f32,
    pub color: Rgba,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Stroke {
    pub width: f32,
    pub color: Rgba,
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub enum Blend {
    #[default]
    Normal,
    /// Additive compositing with a blur filter over everything drawn.
    Additive { blur: f32 },
}

pub trait Surface {
    fn size(&self) -> (u32, u32);

    /// Resize in place. Drawing state is reset, entity state is not touched.
    fn set_size(&mut self, width: u32, height: u32);

    /// Wipe the whole surface to transparent.
    fn clear(&mut self);

    fn fill_rect(&mut self, origin: Point, width: f32, height: f32, paint: Paint);

    fn draw_circle(&mut self, center: Point, radius: f32, fill: Rgba, glow: Option<Glow>);

    fn draw_line(&mut self, from: Point, to: Point, stroke: Stroke, glow: Option<Glow>);

    /// Fill a closed polygon (the last point joins the first).
    fn fill_polygon(&mut self, points: &[Point], paint: Paint);

    /// Axis-aligned square of side `size` rotated by `angle` radians about `center`.
    /// `fill` of `None` draws the outline only.
    fn draw_square(&mut self, center: Point, size: f32, angle: f32, fill: Option<Rgba>, stroke: Stroke);

    fn set_blend(&mut self, blend: Blend);
}

/// Produces surfaces sized to the current viewport.
pub trait SurfaceFactory {
    type Surface: Surface;

    fn viewport(&self) -> (u32, u32);

    fn create(&mut self, width: u32, height: u32) -> Result<Self::Surface, EngineError>;
}
