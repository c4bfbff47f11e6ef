// web/ - Browser host glue (wasm32 only)

mod animation;
mod canvas;

use crate::color::ColorMode;
use crate::error::EngineError;
use crate::options::EngineOptions;
use crate::perf::{self, PerformanceTier};
use crate::stage::Stage;
use animation::AnimationHandle;
use canvas::CanvasFactory;
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::prelude::*;
use web_sys as web;

/// Route panics and `log` output to the browser console. Safe to call
/// more than once.
#[wasm_bindgen(js_name = initLogging)]
pub fn init_logging() {
    console_error_panic_hook::set_once();
    console_log::init_with_level(log::Level::Info).ok();
}

#[wasm_bindgen(start)]
pub fn start() {
    init_logging();
}

fn probe_tier() -> PerformanceTier {
    let Some(window) = web::window() else { return PerformanceTier::default() };
    let nav = window.navigator();
    let agent = nav.user_agent().ok();
    let cores = nav.hardware_concurrency();
    let cores = (cores.is_finite() && cores >= 1.0).then_some(cores as u32);
    let tier = perf::detect(agent.as_deref(), cores);
    log::info!("performance tier: {} (cores: {cores:?})", tier.name());
    tier
}

#[wasm_bindgen(js_name = detectPerformanceTier)]
pub fn detect_performance_tier() -> String {
    probe_tier().name().to_owned()
}

fn random_seed() -> u32 {
    (js_sys::Math::random() * f64::from(u32::MAX)) as u32
}

/// Backdrop animation mounted inside a host element. When no drawing
/// surface can be acquired the engine is inert: every call is a no-op and
/// `isRunning` stays false.
#[wasm_bindgen]
pub struct BackdropEngine {
    stage: Option<Rc<RefCell<Stage<CanvasFactory>>>>,
    animation: Option<AnimationHandle>,
    tier: PerformanceTier,
}

impl BackdropEngine {
    fn mount(factory: Result<CanvasFactory, EngineError>, opts: &EngineOptions) -> Self {
        let tier = opts.tier.unwrap_or_else(probe_tier);
        let stage = match factory {
            Ok(factory) => {
                let seed = opts.seed.unwrap_or_else(random_seed);
                let stage = Stage::new(factory, tier, seed).with_resize_debounce(opts.resize_debounce_ms);
                Some(Rc::new(RefCell::new(stage)))
            }
            Err(err) => {
                log::warn!("backdrop disabled: {err}");
                None
            }
        };
        Self { stage, animation: None, tier }
    }

    fn start_effect(&mut self, effect: &str, mode: ColorMode) -> bool {
        self.stop();
        let Some(stage) = &self.stage else { return false };
        if !stage.borrow_mut().activate_named(effect, mode) {
            return false;
        }
        self.animation = AnimationHandle::start(stage.clone());
        self.animation.is_some()
    }
}

#[wasm_bindgen]
impl BackdropEngine {
    /// `options` is an optional JSON object, see `EngineOptions`. The
    /// configured effect is started right away.
    #[wasm_bindgen(constructor)]
    pub fn new(container: web::Element, options: Option<String>) -> BackdropEngine {
        let opts = EngineOptions::from_json_or_default(options.as_deref());
        let mut engine = Self::mount(CanvasFactory::new(container), &opts);
        engine.start_effect(&opts.effect, opts.color_mode());
        engine
    }

    /// Switch to `effect`, tearing down the current one first. Returns
    /// whether an effect is running afterwards.
    pub fn activate(&mut self, effect: &str, dark: bool) -> bool {
        self.start_effect(effect, ColorMode::from_dark(dark))
    }

    #[wasm_bindgen(js_name = setDark)]
    pub fn set_dark(&mut self, dark: bool) {
        let Some(stage) = &self.stage else { return };
        if let Ok(mut s) = stage.try_borrow_mut() {
            s.set_color_mode(ColorMode::from_dark(dark));
        }
    }

    /// Unmount. Idempotent.
    pub fn stop(&mut self) {
        if let Some(mut anim) = self.animation.take() {
            anim.stop();
        }
    }

    #[wasm_bindgen(getter, js_name = isRunning)]
    pub fn is_running(&self) -> bool {
        self.animation.as_ref().is_some_and(AnimationHandle::is_running)
    }

    #[wasm_bindgen(getter)]
    pub fn effect(&self) -> Option<String> {
        let s = self.stage.as_ref()?.try_borrow().ok()?;
        s.active_effect().map(|k| k.name().to_owned())
    }

    #[wasm_bindgen(getter)]
    pub fn tier(&self) -> String {
        self.tier.name().to_owned()
    }
}

impl Drop for BackdropEngine {
    fn drop(&mut self) {
        self.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wasm_bindgen_test::wasm_bindgen_test;

    fn inert() -> BackdropEngine {
        let opts = EngineOptions::from_json_or_default(Some(r#"{"tier":"low"}"#));
        BackdropEngine::mount(Err(EngineError::SurfaceUnavailable("no 2d context".into())), &opts)
    }

    #[wasm_bindgen_test]
    fn missing_surface_gives_inert_engine() {
        let mut engine = inert();
        assert!(!engine.is_running());
        assert_eq!(engine.effect(), None);
        assert_eq!(engine.tier(), "low");

        assert!(!engine.activate("waves", true));
        engine.set_dark(false);
        engine.stop();
        engine.stop();
        assert!(!engine.is_running());
    }
}
