// canvas.rs - 2D canvas backend
//
// One <canvas> per activation, appended to the host container and removed
// again when the surface is dropped.

use crate::color::Rgba;
use crate::error::EngineError;
use crate::render::{Blend, Glow, Paint, Point, Stroke, Surface, SurfaceFactory};
use wasm_bindgen::JsCast;
use web_sys as web;

const CANVAS_STYLE: &str = "position:absolute;inset:0;width:100%;height:100%;pointer-events:none;z-index:0";

pub struct CanvasSurface {
    canvas: web::HtmlCanvasElement,
    ctx: web::CanvasRenderingContext2d,
    w: u32,
    h: u32,
}

impl CanvasSurface {
    fn apply_paint(&self, paint: Paint) {
        match paint {
            Paint::Solid(c) => self.ctx.set_fill_style_str(&c.to_css()),
            Paint::VerticalGradient { top, bottom, from, to } => {
                let g = self.ctx.create_linear_gradient(0.0, f64::from(top), 0.0, f64::from(bottom));
                // Stops only fail on offsets outside [0, 1] or bad color strings.
                let _ = g.add_color_stop(0.0, &from.to_css());
                let _ = g.add_color_stop(1.0, &to.to_css());
                self.ctx.set_fill_style_canvas_gradient(&g);
            }
        }
    }

    fn apply_glow(&self, glow: Option<Glow>) {
        match glow {
            Some(g) => {
                self.ctx.set_shadow_blur(f64::from(g.blur));
                self.ctx.set_shadow_color(&g.color.to_css());
            }
            None => self.ctx.set_shadow_blur(0.0),
        }
    }
}

impl Surface for CanvasSurface {
    fn size(&self) -> (u32, u32) {
        (self.w, self.h)
    }

    fn set_size(&mut self, width: u32, height: u32) {
        self.w = width;
        self.h = height;
        self.canvas.set_width(width);
        self.canvas.set_height(height);
    }

    fn clear(&mut self) {
        self.ctx.clear_rect(0.0, 0.0, f64::from(self.w), f64::from(self.h));
    }

    fn fill_rect(&mut self, origin: Point, width: f32, height: f32, paint: Paint) {
        self.apply_glow(None);
        self.apply_paint(paint);
        self.ctx.fill_rect(f64::from(origin.x), f64::from(origin.y), f64::from(width), f64::from(height));
    }

    fn draw_circle(&mut self, center: Point, radius: f32, fill: Rgba, glow: Option<Glow>) {
        self.apply_glow(glow);
        self.ctx.set_fill_style_str(&fill.to_css());
        self.ctx.begin_path();
        let _ = self.ctx.arc(f64::from(center.x), f64::from(center.y), f64::from(radius.max(0.0)), 0.0, std::f64::consts::TAU);
        self.ctx.fill();
    }

    fn draw_line(&mut self, from: Point, to: Point, stroke: Stroke, glow: Option<Glow>) {
        self.apply_glow(glow);
        self.ctx.set_stroke_style_str(&stroke.color.to_css());
        self.ctx.set_line_width(f64::from(stroke.width));
        self.ctx.begin_path();
        self.ctx.move_to(f64::from(from.x), f64::from(from.y));
        self.ctx.line_to(f64::from(to.x), f64::from(to.y));
        self.ctx.stroke();
    }

    fn fill_polygon(&mut self, points: &[Point], paint: Paint) {
        let Some((first, rest)) = points.split_first() else { return };
        self.apply_glow(None);
        self.apply_paint(paint);
        self.ctx.begin_path();
        self.ctx.move_to(f64::from(first.x), f64::from(first.y));
        for p in rest {
            self.ctx.line_to(f64::from(p.x), f64::from(p.y));
        }
        self.ctx.close_path();
        self.ctx.fill();
    }

    fn draw_square(&mut self, center: Point, size: f32, angle: f32, fill: Option<Rgba>, stroke: Stroke) {
        let half = f64::from(size) / 2.0;
        let side = f64::from(size);
        self.apply_glow(None);
        self.ctx.save();
        let _ = self.ctx.translate(f64::from(center.x), f64::from(center.y));
        let _ = self.ctx.rotate(f64::from(angle));
        self.ctx.begin_path();
        self.ctx.rect(-half, -half, side, side);
        if let Some(c) = fill {
            self.ctx.set_fill_style_str(&c.to_css());
            self.ctx.fill();
        }
        self.ctx.set_stroke_style_str(&stroke.color.to_css());
        self.ctx.set_line_width(f64::from(stroke.width));
        self.ctx.stroke();
        self.ctx.restore();
    }

    fn set_blend(&mut self, blend: Blend) {
        match blend {
            Blend::Normal => {
                let _ = self.ctx.set_global_composite_operation("source-over");
                self.ctx.set_filter("none");
            }
            Blend::Additive { blur } => {
                let _ = self.ctx.set_global_composite_operation("lighter");
                self.ctx.set_filter(&format!("blur({blur}px)"));
            }
        }
    }
}

impl Drop for CanvasSurface {
    fn drop(&mut self) {
        self.canvas.remove();
    }
}

/// Creates canvases inside the host container, sized to the window.
pub struct CanvasFactory {
    window: web::Window,
    document: web::Document,
    container: web::Element,
}

impl CanvasFactory {
    pub fn new(container: web::Element) -> Result<Self, EngineError> {
        let window = web::window().ok_or_else(|| EngineError::SurfaceUnavailable("no window".into()))?;
        let document = window
            .document()
            .ok_or_else(|| EngineError::SurfaceUnavailable("no document".into()))?;
        Ok(Self { window, document, container })
    }

    pub fn window(&self) -> &web::Window {
        &self.window
    }
}

fn js_dim(v: Result<wasm_bindgen::JsValue, wasm_bindgen::JsValue>) -> u32 {
    v.ok().and_then(|v| v.as_f64()).map_or(0, |d| d.max(0.0) as u32)
}

impl SurfaceFactory for CanvasFactory {
    type Surface = CanvasSurface;

    fn viewport(&self) -> (u32, u32) {
        (js_dim(self.window.inner_width()), js_dim(self.window.inner_height()))
    }

    fn create(&mut self, width: u32, height: u32) -> Result<CanvasSurface, EngineError> {
        let unavailable = |e: wasm_bindgen::JsValue| EngineError::SurfaceUnavailable(format!("{e:?}"));

        let canvas = self
            .document
            .create_element("canvas")
            .map_err(unavailable)?
            .dyn_into::<web::HtmlCanvasElement>()
            .map_err(|_| EngineError::SurfaceUnavailable("not a canvas element".into()))?;
        let ctx = canvas
            .get_context("2d")
            .map_err(unavailable)?
            .ok_or_else(|| EngineError::SurfaceUnavailable("2d context not supported".into()))?
            .dyn_into::<web::CanvasRenderingContext2d>()
            .map_err(|_| EngineError::SurfaceUnavailable("unexpected context type".into()))?;

        canvas.set_width(width);
        canvas.set_height(height);
        canvas.set_attribute("style", CANVAS_STYLE).map_err(unavailable)?;
        canvas.set_attribute("aria-hidden", "true").map_err(unavailable)?;
        self.container.append_child(&canvas).map_err(unavailable)?;

        Ok(CanvasSurface { canvas, ctx, w: width, h: height })
    }
}
