use wasm_bindgen::prelude::*;

pub mod color;
pub mod error;
pub mod frame;
pub mod options;
pub mod perf;
pub mod render;
pub mod sim;
pub mod stage;

#[cfg(target_arch = "wasm32")]
mod web;

pub use color::{ColorMode, Rgba};
pub use error::EngineError;
pub use frame::{Debounce, FrameThrottle, LoopHandle, RenderLoop};
pub use options::EngineOptions;
pub use perf::{Budget, PerformanceTier};
pub use render::{Surface, SurfaceFactory};
pub use sim::{EffectKind, Simulator};
pub use stage::Stage;

#[cfg(target_arch = "wasm32")]
pub use web::*;

// ============================================================================
// HOST EXPORTS - Target independent
// ============================================================================

/// Algorithm listing for an effect name, for display next to the backdrop.
#[wasm_bindgen(js_name = animationSource)]
pub fn animation_source(effect: &str) -> Option<String> {
    effect.parse::<EffectKind>().ok().map(|k| k.source_listing().to_owned())
}

/// Canonical effect names, in control panel order.
#[wasm_bindgen(js_name = effectNames)]
pub fn effect_names() -> Vec<String> {
    EffectKind::ALL.iter().map(|k| k.name().to_owned()).collect()
}

/// Flat page backdrop behind the canvas, as a CSS color.
#[wasm_bindgen(js_name = backdropColor)]
pub fn backdrop_color(dark: bool) -> String {
    ColorMode::from_dark(dark).backdrop().to_css()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn listing_lookup_by_alias() {
        assert_eq!(animation_source("flow"), animation_source("squares"));
        assert!(animation_source("matrix").is_some_and(|s| s.contains("threshold")));
        assert_eq!(animation_source("plasma"), None);
    }

    #[test]
    fn effect_names_in_panel_order() {
        assert_eq!(effect_names(), ["squares", "matrix", "waves", "stars"]);
    }

    #[test]
    fn backdrop_css() {
        assert_eq!(backdrop_color(true), "rgba(17, 24, 39, 1)");
        assert_eq!(backdrop_color(false), "rgba(240, 249, 255, 1)");
    }
}
