// squares.rs - Rotating squares ("flow")
//
// Squares drift, spin and wrap toroidally: one that leaves an edge by more
// than half its side re-enters from the opposite edge.

use super::{EffectKind, Rng, Simulator};
use crate::color::{ColorMode, Rgba};
use crate::perf::Budget;
use crate::render::{Point, Stroke, Surface};

const SMALL_SHARE: f32 = 0.3;
const SPIN: f32 = 0.005;
const SPEED: f32 = 0.1;
const OUTLINE_SHARE: f32 = 0.5;

const DARK_FILL: [Rgba; 3] = [
    Rgba::new(99, 102, 241, 0.2),
    Rgba::new(79, 70, 229, 0.15),
    Rgba::new(67, 56, 202, 0.1),
];
const DARK_BORDER: [Rgba; 3] = [
    Rgba::new(139, 142, 245, 0.4),
    Rgba::new(119, 110, 233, 0.35),
    Rgba::new(107, 96, 212, 0.3),
];
const LIGHT_FILL: [Rgba; 3] = [
    Rgba::new(20, 184, 166, 0.2),
    Rgba::new(16, 148, 136, 0.15),
    Rgba::new(15, 118, 110, 0.1),
];
const LIGHT_BORDER: [Rgba; 3] = [
    Rgba::new(45, 212, 191, 0.4),
    Rgba::new(36, 168, 156, 0.35),
    Rgba::new(35, 138, 130, 0.3),
];

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Square {
    pub pos: Point,
    pub size: f32,
    /// Radians.
    pub angle: f32,
    /// Radians per tick.
    pub spin: f32,
    pub vx: f32,
    pub vy: f32,
    pub border_width: f32,
    /// Index into the active palette; survives color mode switches.
    pub palette_index: usize,
    pub border_only: bool,
}

impl Square {
    fn random(rng: &mut Rng, w: f32, h: f32) -> Self {
        let size = if rng.chance(SMALL_SHARE) {
            rng.range(20.0, 60.0)
        } else {
            rng.range(60.0, 140.0)
        };
        Self {
            pos: Point::new(rng.range(0.0, w), rng.range(0.0, h)),
            size,
            angle: rng.range(0.0, std::f32::consts::TAU),
            spin: rng.centered(SPIN),
            vx: rng.centered(SPEED),
            vy: rng.centered(SPEED),
            border_width: rng.range(1.0, 4.0),
            palette_index: rng.index(DARK_FILL.len()),
            border_only: rng.chance(OUTLINE_SHARE),
        }
    }
}

/// Wrap one axis: past `max + half` re-enters at `-half` and vice versa.
#[inline]
fn wrap(pos: f32, half: f32, max: f32) -> f32 {
    if pos < -half {
        max + half
    } else if pos > max + half {
        -half
    } else {
        pos
    }
}

pub struct SquareField {
    w: f32,
    h: f32,
    squares: Vec<Square>,
    mode: ColorMode,
    rng: Rng,
}

impl SquareField {
    pub fn seeded(budget: &Budget, mode: ColorMode, w: f32, h: f32, rng: &mut Rng) -> Self {
        let squares = (0..budget.square_count).map(|_| Square::random(rng, w, h)).collect();
        Self { w, h, squares, mode, rng: rng.fork() }
    }

    pub fn from_squares(squares: Vec<Square>, w: f32, h: f32, mode: ColorMode) -> Self {
        Self { w, h, squares, mode, rng: Rng::default() }
    }

    pub fn squares(&self) -> &[Square] {
        &self.squares
    }

    fn colors(&self, sq: &Square) -> (Rgba, Rgba) {
        let (fill, border) = self.mode.pick((&DARK_FILL, &DARK_BORDER), (&LIGHT_FILL, &LIGHT_BORDER));
        let i = sq.palette_index % fill.len();
        (fill[i], border[i])
    }
}

impl Simulator for SquareField {
    fn kind(&self) -> EffectKind {
        EffectKind::Squares
    }

    fn step(&mut self, surface: &mut dyn Surface, _elapsed_ms: f64) {
        surface.clear();
        let (w, h) = (self.w, self.h);
        for i in 0..self.squares.len() {
            let sq = &mut self.squares[i];
            sq.angle += sq.spin;
            sq.pos.x += sq.vx;
            sq.pos.y += sq.vy;
            let half = sq.size / 2.0;
            sq.pos.x = wrap(sq.pos.x, half, w);
            sq.pos.y = wrap(sq.pos.y, half, h);

            let sq = self.squares[i];
            let (fill, border) = self.colors(&sq);
            let stroke = Stroke { width: sq.border_width, color: border };
            surface.draw_square(sq.pos, sq.size, sq.angle, (!sq.border_only).then_some(fill), stroke);
        }
    }

    fn resize(&mut self, width: f32, height: f32) {
        self.w = width;
        self.h = height;
        for sq in &mut self.squares {
            if sq.pos.x > width { sq.pos.x = self.rng.range(0.0, width); }
            if sq.pos.y > height { sq.pos.y = self.rng.range(0.0, height); }
        }
    }

    fn set_color_mode(&mut self, mode: ColorMode) {
        self.mode = mode;
    }

    fn entity_count(&self) -> usize {
        self.squares.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::perf::PerformanceTier;
    use crate::render::headless::{DrawCmd, RecordingSurface};
    use pretty_assertions::assert_eq;

    fn square(x: f32, y: f32, size: f32, vx: f32, vy: f32) -> Square {
        Square {
            pos: Point::new(x, y),
            size,
            angle: 0.0,
            spin: 0.01,
            vx,
            vy,
            border_width: 2.0,
            palette_index: 1,
            border_only: false,
        }
    }

    #[test]
    fn wraps_past_right_edge() {
        // 840 + 1 > 800 + 40, so it re-enters at -40.
        let mut f = SquareField::from_squares(vec![square(840.0, 300.0, 80.0, 1.0, 0.0)], 800.0, 600.0, ColorMode::Dark);
        let mut s = RecordingSurface::new(800, 600);
        f.step(&mut s, 0.0);
        assert_eq!(f.squares()[0].pos, Point::new(-40.0, 300.0));
    }

    #[test]
    fn wraps_past_top_edge() {
        let mut f = SquareField::from_squares(vec![square(100.0, -20.0, 40.0, 0.0, -1.0)], 800.0, 600.0, ColorMode::Dark);
        let mut s = RecordingSurface::new(800, 600);
        f.step(&mut s, 0.0);
        assert_eq!(f.squares()[0].pos.y, 620.0);
    }

    #[test]
    fn within_margin_does_not_wrap() {
        assert_eq!(wrap(-10.0, 20.0, 100.0), -10.0);
        assert_eq!(wrap(115.0, 20.0, 100.0), 115.0);
        assert_eq!(wrap(121.0, 20.0, 100.0), -20.0);
        assert_eq!(wrap(-21.0, 20.0, 100.0), 120.0);
    }

    #[test]
    fn spin_accumulates() {
        let mut f = SquareField::from_squares(vec![square(100.0, 100.0, 40.0, 0.0, 0.0)], 800.0, 600.0, ColorMode::Dark);
        let mut s = RecordingSurface::new(800, 600);
        for _ in 0..3 {
            f.step(&mut s, 0.0);
        }
        assert!((f.squares()[0].angle - 0.03).abs() < 1e-6);
    }

    #[test]
    fn outline_only_has_no_fill() {
        let mut a = square(100.0, 100.0, 40.0, 0.0, 0.0);
        a.border_only = true;
        let b = square(200.0, 100.0, 40.0, 0.0, 0.0);
        let mut f = SquareField::from_squares(vec![a, b], 800.0, 600.0, ColorMode::Light);
        let mut s = RecordingSurface::new(800, 600);
        f.step(&mut s, 0.0);

        let fills: Vec<Option<Rgba>> = s
            .squares()
            .map(|c| match c {
                DrawCmd::Square { fill, .. } => *fill,
                _ => unreachable!(),
            })
            .collect();
        assert_eq!(fills, vec![None, Some(LIGHT_FILL[1])]);
    }

    #[test]
    fn mode_switch_keeps_palette_slot() {
        let mut f = SquareField::from_squares(vec![square(10.0, 10.0, 40.0, 0.0, 0.0)], 100.0, 100.0, ColorMode::Dark);
        assert_eq!(f.colors(&f.squares()[0]), (DARK_FILL[1], DARK_BORDER[1]));
        f.set_color_mode(ColorMode::Light);
        assert_eq!(f.colors(&f.squares()[0]), (LIGHT_FILL[1], LIGHT_BORDER[1]));
    }

    #[test]
    fn seeded_sizes_in_range() {
        let budget = PerformanceTier::High.budget();
        let f = SquareField::seeded(&budget, ColorMode::Dark, 1200.0, 800.0, &mut Rng::new(21));
        assert_eq!(f.entity_count(), 30);
        assert!(f.squares().iter().all(|s| (20.0..140.0).contains(&s.size)));
        assert!(f.squares().iter().all(|s| (1.0..4.0).contains(&s.border_width)));
        assert!(f.squares().iter().all(|s| s.spin.abs() <= SPIN));
    }

    #[test]
    fn resize_repositions_out_of_bounds() {
        let sq = square(700.0, 500.0, 40.0, 0.0, 0.0);
        let mut f = SquareField::from_squares(vec![sq], 800.0, 600.0, ColorMode::Dark);
        f.resize(300.0, 200.0);
        let p = f.squares()[0].pos;
        assert!(p.x <= 300.0 && p.y <= 200.0);
        assert_eq!(f.entity_count(), 1);
    }
}
