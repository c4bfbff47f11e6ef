// options.rs - Host-supplied engine configuration
//
// Parsed from a JSON object handed over by the page, e.g.
//   {"effect": "waves", "dark": false, "tier": "low", "seed": 42}
// Every field is optional.

use crate::color::ColorMode;
use crate::error::EngineError;
use crate::perf::PerformanceTier;
use crate::sim::EffectKind;
use serde::Deserialize;

pub const DEFAULT_RESIZE_DEBOUNCE_MS: f64 = 200.0;

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EngineOptions {
    /// Initial effect name; unknown names start nothing.
    pub effect: String,
    pub dark: bool,
    /// Forces a tier instead of probing the device.
    pub tier: Option<PerformanceTier>,
    pub seed: Option<u32>,
    pub resize_debounce_ms: f64,
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self {
            effect: EffectKind::default().name().to_owned(),
            dark: true,
            tier: None,
            seed: None,
            resize_debounce_ms: DEFAULT_RESIZE_DEBOUNCE_MS,
        }
    }
}

impl EngineOptions {
    /// Blank input means defaults.
    pub fn from_json(json: &str) -> Result<Self, EngineError> {
        if json.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_json::from_str(json)?)
    }

    /// Like [`from_json`](Self::from_json) but falls back to defaults on bad input.
    pub fn from_json_or_default(json: Option<&str>) -> Self {
        let Some(json) = json else { return Self::default() };
        match Self::from_json(json) {
            Ok(opts) => opts,
            Err(err) => {
                log::warn!("{err}; using default options");
                Self::default()
            }
        }
    }

    pub fn color_mode(&self) -> ColorMode {
        ColorMode::from_dark(self.dark)
    }
}
