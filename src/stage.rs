// stage.rs - Effect selection and lifecycle
//
// A stage owns at most one running effect: the simulator, the surface it
// draws on and the render loop pacing it. They are created together by
// `activate` and dropped together by `deactivate`, so a surface never
// outlives its simulator and two effects can never step at once.

use crate::color::ColorMode;
use crate::error::EngineError;
use crate::frame::{Debounce, LoopHandle, RenderLoop};
use crate::options::DEFAULT_RESIZE_DEBOUNCE_MS;
use crate::perf::{Budget, PerformanceTier};
use crate::render::{Surface, SurfaceFactory};
use crate::sim::{self, EffectKind, Rng, Simulator};

struct Activation<S> {
    kind: EffectKind,
    mode: ColorMode,
    sim: Box<dyn Simulator>,
    surface: S,
    frames: RenderLoop,
}

pub struct Stage<F: SurfaceFactory> {
    factory: F,
    tier: PerformanceTier,
    budget: Budget,
    rng: Rng,
    resize_gate: Debounce,
    active: Option<Activation<F::Surface>>,
}

impl<F: SurfaceFactory> Stage<F> {
    pub fn new(factory: F, tier: PerformanceTier, seed: u32) -> Self {
        Self {
            factory,
            tier,
            budget: tier.budget(),
            rng: Rng::new(seed),
            resize_gate: Debounce::new(DEFAULT_RESIZE_DEBOUNCE_MS),
            active: None,
        }
    }

    /// Quiet period after the last viewport change before the surface follows it.
    pub fn with_resize_debounce(mut self, delay_ms: f64) -> Self {
        self.resize_gate = Debounce::new(delay_ms);
        self
    }

    pub fn tier(&self) -> PerformanceTier {
        self.tier
    }

    pub fn budget(&self) -> &Budget {
        &self.budget
    }

    pub fn factory(&self) -> &F {
        &self.factory
    }

    pub fn factory_mut(&mut self) -> &mut F {
        &mut self.factory
    }

    /// Tear down whatever runs and start `kind`. Returns whether an effect
    /// is running afterwards; failures are logged, never raised.
    pub fn activate(&mut self, kind: EffectKind, mode: ColorMode) -> bool {
        self.deactivate();
        match self.start(kind, mode) {
            Ok(()) => true,
            Err(err) => {
                log::warn!("{kind} not started: {err}");
                false
            }
        }
    }

    /// Like [`activate`](Self::activate) with a host-supplied effect name.
    /// An unknown name leaves nothing running.
    pub fn activate_named(&mut self, name: &str, mode: ColorMode) -> bool {
        match name.parse::<EffectKind>() {
            Ok(kind) => self.activate(kind, mode),
            Err(err) => {
                self.deactivate();
                log::warn!("{err}");
                false
            }
        }
    }

    fn start(&mut self, kind: EffectKind, mode: ColorMode) -> Result<(), EngineError> {
        let (width, height) = self.factory.viewport();
        if width == 0 || height == 0 {
            return Err(EngineError::EmptyViewport { width, height });
        }

        let surface = self.factory.create(width, height)?;
        let sim = sim::spawn(kind, mode, &self.budget, width as f32, height as f32, &mut self.rng);
        let frames = RenderLoop::start(self.budget.target_fps(kind));

        log::info!(
            "{kind} started ({mode:?}, {} tier, {width}x{height}, {} entities, {:.0}ms/frame)",
            self.tier.name(),
            sim.entity_count(),
            frames.interval_ms(),
        );
        self.active = Some(Activation { kind, mode, sim, surface, frames });
        Ok(())
    }

    /// Stop the loop and release the surface. Safe to call repeatedly.
    pub fn deactivate(&mut self) {
        self.resize_gate.cancel();
        if let Some(act) = self.active.take() {
            act.frames.stop();
            log::info!("{} stopped after {} frames", act.kind, act.frames.steps());
        }
    }

    /// One display callback at monotonic time `now_ms`. Applies a settled
    /// viewport change, then returns whether a simulation step ran.
    pub fn frame(&mut self, now_ms: f64) -> bool {
        if self.resize_gate.fire(now_ms) {
            let (width, height) = self.factory.viewport();
            self.resize(width, height);
        }
        let Some(act) = self.active.as_mut() else { return false };
        let Activation { sim, surface, frames, .. } = act;
        frames.pump(now_ms, |elapsed| sim.step(surface, elapsed))
    }

    /// Viewport changed. The population is kept; only the surface size and
    /// out-of-bounds entities change. No-op once the loop is stopped.
    pub fn resize(&mut self, width: u32, height: u32) {
        let Some(act) = self.active.as_mut() else { return };
        if !act.frames.is_live() { return; }
        act.surface.set_size(width, height);
        act.sim.resize(width as f32, height as f32);
        log::debug!("{} resized to {width}x{height}", act.kind);
    }

    /// The host saw a viewport change at `now_ms` (same clock as `frame`).
    /// The surface follows the viewport once changes stop for the debounce
    /// period, so the final size of a burst always lands.
    pub fn request_resize(&mut self, now_ms: f64) {
        if self.is_scheduling() {
            self.resize_gate.trigger(now_ms);
        }
    }

    pub fn resize_pending(&self) -> bool {
        self.resize_gate.is_pending()
    }

    pub fn set_color_mode(&mut self, mode: ColorMode) {
        let Some(act) = self.active.as_mut() else { return };
        if act.mode == mode { return; }
        act.mode = mode;
        act.sim.set_color_mode(mode);
        log::debug!("{} switched to {mode:?}", act.kind);
    }

    /// True while an effect is active and its loop has not been stopped.
    pub fn is_scheduling(&self) -> bool {
        self.active.as_ref().is_some_and(|a| a.frames.is_live())
    }

    pub fn active_effect(&self) -> Option<EffectKind> {
        self.active.as_ref().map(|a| a.kind)
    }

    pub fn color_mode(&self) -> Option<ColorMode> {
        self.active.as_ref().map(|a| a.mode)
    }

    /// Liveness handle of the running loop, for host callbacks that must
    /// check it before touching the stage.
    pub fn loop_handle(&self) -> Option<LoopHandle> {
        self.active.as_ref().map(|a| a.frames.handle())
    }

    pub fn surface(&self) -> Option<&F::Surface> {
        self.active.as_ref().map(|a| &a.surface)
    }

    pub fn steps(&self) -> u64 {
        self.active.as_ref().map_or(0, |a| a.frames.steps())
    }

    pub fn with_simulator<R>(&mut self, f: impl FnOnce(&mut dyn Simulator) -> R) -> Option<R> {
        self.active.as_mut().map(|a| f(a.sim.as_mut()))
    }
}

impl<F: SurfaceFactory> Drop for Stage<F> {
    fn drop(&mut self) {
        self.deactivate();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::headless::HeadlessFactory;

    fn stage() -> Stage<HeadlessFactory> {
        Stage::new(HeadlessFactory::new(640, 480), PerformanceTier::Low, 1)
    }

    #[test]
    fn activate_then_frame() {
        let mut s = stage();
        assert!(s.activate(EffectKind::Network, ColorMode::Dark));
        assert_eq!(s.active_effect(), Some(EffectKind::Network));
        assert!(s.is_scheduling());
        assert!(s.frame(0.0));
        assert!(!s.frame(10.0)); // 20 fps on low tier
        assert!(s.frame(50.0));
        assert_eq!(s.steps(), 2);
    }

    #[test]
    fn empty_viewport_is_a_no_op() {
        let mut s = Stage::new(HeadlessFactory::new(0, 480), PerformanceTier::High, 1);
        assert!(!s.activate(EffectKind::Waves, ColorMode::Light));
        assert!(!s.is_scheduling());
        assert_eq!(s.factory().created(), 0);
    }

    #[test]
    fn old_handle_dies_on_switch() {
        let mut s = stage();
        s.activate(EffectKind::Squares, ColorMode::Dark);
        let old = s.loop_handle().unwrap();
        s.activate(EffectKind::Trails, ColorMode::Dark);
        assert!(!old.is_live());
        assert!(s.loop_handle().unwrap().is_live());
    }

    #[test]
    fn color_mode_switch_keeps_effect() {
        let mut s = stage();
        s.activate(EffectKind::Trails, ColorMode::Dark);
        s.set_color_mode(ColorMode::Light);
        assert_eq!(s.color_mode(), Some(ColorMode::Light));
        assert_eq!(s.active_effect(), Some(EffectKind::Trails));
        assert_eq!(s.with_simulator(|sim| sim.entity_count()), Some(25));
    }

    #[test]
    fn resize_after_stop_is_ignored() {
        let mut s = stage();
        s.activate(EffectKind::Squares, ColorMode::Dark);
        s.loop_handle().unwrap().stop();
        s.resize(100, 100);
        assert_eq!(s.surface().unwrap().size(), (640, 480));
        assert!(!s.frame(1000.0));
    }

    #[test]
    fn resize_request_dropped_on_teardown() {
        let mut s = stage();
        s.activate(EffectKind::Waves, ColorMode::Dark);
        s.request_resize(0.0);
        assert!(s.resize_pending());
        s.deactivate();
        assert!(!s.resize_pending());

        s.request_resize(10.0);
        assert!(!s.resize_pending());
    }
}
