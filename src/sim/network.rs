// network.rs - Node network ("matrix")
//
// Nodes drift and bounce off the viewport edges. Links are a per-frame
// proximity query: they are rebuilt from node positions on every step and
// never carried over to the next one.

use super::{bounce, EffectKind, Rng, Simulator};
use crate::color::{ColorMode, Rgba};
use crate::perf::Budget;
use crate::render::{Glow, Point, Stroke, Surface};

const SMALL_NODE_SHARE: f32 = 0.7;
const NODE_SPEED: f32 = 0.3;
const NODE_GLOW: f32 = 2.0;
const LINK_WIDTH: f32 = 1.5;
const LINK_MIN_ALPHA: f32 = 0.2;
const LINK_MAX_ALPHA: f32 = 0.6;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Node {
    pub pos: Point,
    pub vx: f32,
    pub vy: f32,
    pub radius: f32,
}

/// Link from `from` to a later node `to` (scan order, so `from < to`).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Edge {
    pub from: usize,
    pub to: usize,
    pub distance: f32,
}

impl Edge {
    /// Closer pairs are more opaque.
    pub fn opacity(&self, threshold: f32) -> f32 {
        let closeness = (1.0 - self.distance / threshold).clamp(0.0, 1.0);
        LINK_MIN_ALPHA + (LINK_MAX_ALPHA - LINK_MIN_ALPHA) * closeness
    }
}

pub struct NetworkField {
    w: f32,
    h: f32,
    nodes: Vec<Node>,
    edges: Vec<Edge>,
    max_links: usize,
    span: f32,
    divisor: f32,
    threshold: f32,
    mode: ColorMode,
    rng: Rng,
}

impl NetworkField {
    pub fn seeded(budget: &Budget, mode: ColorMode, w: f32, h: f32, rng: &mut Rng) -> Self {
        let nodes = (0..budget.network_nodes)
            .map(|_| {
                let radius = if rng.chance(SMALL_NODE_SHARE) {
                    rng.range(1.0, 3.0)
                } else {
                    rng.range(3.0, 7.0)
                };
                Node {
                    pos: Point::new(rng.range(0.0, w), rng.range(0.0, h)),
                    vx: rng.centered(NODE_SPEED),
                    vy: rng.centered(NODE_SPEED),
                    radius,
                }
            })
            .collect();

        let mut field = Self::from_nodes(nodes, w, h, budget.network_links, 0.0, mode);
        field.span = budget.network_span;
        field.divisor = budget.network_divisor;
        field.threshold = field.range_for(w, h);
        field.rng = rng.fork();
        field
    }

    /// Explicit population, e.g. for replaying a fixed layout.
    pub fn from_nodes(nodes: Vec<Node>, w: f32, h: f32, max_links: usize, threshold: f32, mode: ColorMode) -> Self {
        Self {
            w,
            h,
            edges: Vec::with_capacity(nodes.len() * max_links),
            nodes,
            max_links,
            span: 1.0,
            divisor: 1.0,
            threshold,
            mode,
            rng: Rng::default(),
        }
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    /// Links found by the most recent step.
    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    pub fn threshold(&self) -> f32 {
        self.threshold
    }

    pub fn max_links(&self) -> usize {
        self.max_links
    }

    fn range_for(&self, w: f32, h: f32) -> f32 {
        w.max(h) * self.span / self.divisor
    }

    /// Move every node one tick, reflecting off the edges.
    pub fn advance(&mut self) {
        let (w, h) = (self.w, self.h);
        for n in &mut self.nodes {
            n.pos.x += n.vx;
            n.pos.y += n.vy;
            (n.pos.x, n.vx) = bounce(n.pos.x, n.vx, w);
            (n.pos.y, n.vy) = bounce(n.pos.y, n.vy, h);
        }
    }

    /// Rebuild the link set. Each node scans forward through the remaining
    /// nodes and keeps at most `max_links` that fall inside the threshold.
    pub fn relink(&mut self) {
        self.edges.clear();
        for i in 0..self.nodes.len() {
            let a = self.nodes[i].pos;
            let mut links = 0;
            for j in (i + 1)..self.nodes.len() {
                if links >= self.max_links { break; }
                let distance = a.dist(self.nodes[j].pos);
                if distance < self.threshold {
                    self.edges.push(Edge { from: i, to: j, distance });
                    links += 1;
                }
            }
        }
    }

    fn color(&self) -> Rgba {
        self.mode.pick(Rgba::new(139, 142, 245, 0.9), Rgba::new(45, 212, 191, 0.9))
    }

    pub fn draw(&self, surface: &mut dyn Surface) {
        surface.clear();

        let color = self.color();
        let glow = Some(Glow { blur: NODE_GLOW, color });
        for n in &self.nodes {
            surface.draw_circle(n.pos, n.radius, color, glow);
        }

        for e in &self.edges {
            let c = color.with_alpha(e.opacity(self.threshold));
            let stroke = Stroke { width: LINK_WIDTH, color: c };
            surface.draw_line(
                self.nodes[e.from].pos,
                self.nodes[e.to].pos,
                stroke,
                Some(Glow { blur: NODE_GLOW, color: c }),
            );
        }
    }
}

impl Simulator for NetworkField {
    fn kind(&self) -> EffectKind {
        EffectKind::Network
    }

    fn step(&mut self, surface: &mut dyn Surface, _elapsed_ms: f64) {
        self.advance();
        self.relink();
        self.draw(surface);
    }

    fn resize(&mut self, width: f32, height: f32) {
        self.w = width;
        self.h = height;
        self.threshold = self.range_for(width, height);
        for n in &mut self.nodes {
            if n.pos.x > width { n.pos.x = self.rng.range(0.0, width); }
            if n.pos.y > height { n.pos.y = self.rng.range(0.0, height); }
        }
    }

    fn set_color_mode(&mut self, mode: ColorMode) {
        self.mode = mode;
    }

    fn entity_count(&self) -> usize {
        self.nodes.len()
    }
}
