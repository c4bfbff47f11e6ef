// headless.rs - Recording surface
//
// Stores draw calls instead of rasterising them. `clear()` drops the
// previous frame, so `commands()` is always the frame being drawn.

use super::{Blend, Glow, Paint, Point, Stroke, Surface, SurfaceFactory};
use crate::color::Rgba;
use crate::error::EngineError;

#[derive(Clone, Debug, PartialEq)]
pub enum DrawCmd {
    Clear,
    Rect { origin: Point, width: f32, height: f32, paint: Paint },
    Circle { center: Point, radius: f32, fill: Rgba, glow: Option<Glow> },
    Line { from: Point, to: Point, stroke: Stroke, glow: Option<Glow> },
    Polygon { points: Vec<Point>, paint: Paint },
    Square { center: Point, size: f32, angle: f32, fill: Option<Rgba>, stroke: Stroke },
    Blend(Blend),
}

#[derive(Debug, Default)]
pub struct RecordingSurface {
    w: u32,
    h: u32,
    cmds: Vec<DrawCmd>,
}

impl RecordingSurface {
    pub fn new(w: u32, h: u32) -> Self {
        Self { w, h, cmds: Vec::new() }
    }

    pub fn commands(&self) -> &[DrawCmd] {
        &self.cmds
    }

    pub fn circles(&self) -> impl Iterator<Item = &DrawCmd> {
        self.cmds.iter().filter(|c| matches!(c, DrawCmd::Circle { .. }))
    }

    pub fn lines(&self) -> impl Iterator<Item = &DrawCmd> {
        self.cmds.iter().filter(|c| matches!(c, DrawCmd::Line { .. }))
    }

    pub fn polygons(&self) -> impl Iterator<Item = &DrawCmd> {
        self.cmds.iter().filter(|c| matches!(c, DrawCmd::Polygon { .. }))
    }

    pub fn squares(&self) -> impl Iterator<Item = &DrawCmd> {
        self.cmds.iter().filter(|c| matches!(c, DrawCmd::Square { .. }))
    }
}

impl Surface for RecordingSurface {
    fn size(&self) -> (u32, u32) {
        (self.w, self.h)
    }

    fn set_size(&mut self, width: u32, height: u32) {
        self.w = width;
        self.h = height;
    }

    fn clear(&mut self) {
        self.cmds.clear();
        self.cmds.push(DrawCmd::Clear);
    }

    fn fill_rect(&mut self, origin: Point, width: f32, height: f32, paint: Paint) {
        self.cmds.push(DrawCmd::Rect { origin, width, height, paint });
    }

    fn draw_circle(&mut self, center: Point, radius: f32, fill: Rgba, glow: Option<Glow>) {
        self.cmds.push(DrawCmd::Circle { center, radius, fill, glow });
    }

    fn draw_line(&mut self, from: Point, to: Point, stroke: Stroke, glow: Option<Glow>) {
        self.cmds.push(DrawCmd::Line { from, to, stroke, glow });
    }

    fn fill_polygon(&mut self, points: &[Point], paint: Paint) {
        self.cmds.push(DrawCmd::Polygon { points: points.to_vec(), paint });
    }

    fn draw_square(&mut self, center: Point, size: f32, angle: f32, fill: Option<Rgba>, stroke: Stroke) {
        self.cmds.push(DrawCmd::Square { center, size, angle, fill, stroke });
    }

    fn set_blend(&mut self, blend: Blend) {
        self.cmds.push(DrawCmd::Blend(blend));
    }
}

/// Hands out recording surfaces for a fixed viewport. `unavailable()`
/// simulates a host whose drawing context cannot be acquired.
#[derive(Debug)]
pub struct HeadlessFactory {
    viewport: (u32, u32),
    available: bool,
    created: usize,
}

impl HeadlessFactory {
    pub fn new(w: u32, h: u32) -> Self {
        Self { viewport: (w, h), available: true, created: 0 }
    }

    pub fn unavailable(w: u32, h: u32) -> Self {
        Self { available: false, ..Self::new(w, h) }
    }

    pub fn set_viewport(&mut self, w: u32, h: u32) {
        self.viewport = (w, h);
    }

    pub fn set_available(&mut self, available: bool) {
        self.available = available;
    }

    /// Surfaces handed out so far.
    pub fn created(&self) -> usize {
        self.created
    }
}

impl SurfaceFactory for HeadlessFactory {
    type Surface = RecordingSurface;

    fn viewport(&self) -> (u32, u32) {
        self.viewport
    }

    fn create(&mut self, width: u32, height: u32) -> Result<RecordingSurface, EngineError> {
        if !self.available {
            return Err(EngineError::SurfaceUnavailable("headless factory disabled".into()));
        }
        self.created += 1;
        Ok(RecordingSurface::new(width, height))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clear_starts_a_new_frame() {
        let mut s = RecordingSurface::new(10, 10);
        s.draw_circle(Point::new(1.0, 1.0), 2.0, Rgba::rgb(1, 2, 3), None);
        s.clear();
        s.draw_circle(Point::new(2.0, 2.0), 2.0, Rgba::rgb(1, 2, 3), None);
        assert_eq!(s.commands().len(), 2);
        assert_eq!(s.commands()[0], DrawCmd::Clear);
        assert_eq!(s.circles().count(), 1);
    }

    #[test]
    fn unavailable_factory_fails() {
        let mut f = HeadlessFactory::unavailable(100, 100);
        assert!(matches!(f.create(100, 100), Err(EngineError::SurfaceUnavailable(_))));
        assert_eq!(f.created(), 0);
    }
}
