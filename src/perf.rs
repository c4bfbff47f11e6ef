// perf.rs - Device capability heuristic and per-tier budgets
//
// One-shot classification of the runtime into Low/High. The heuristic is
// coarse on purpose: mobile user agents and machines reporting fewer than
// four logical cores get the light budget, everything else the full one.

use crate::sim::EffectKind;
use serde::Deserialize;

const MOBILE_SIGNATURES: [&str; 8] = [
    "android", "webos", "iphone", "ipad", "ipod", "blackberry", "iemobile", "opera mini",
];

const MIN_CORES: u32 = 4;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PerformanceTier {
    Low,
    #[default]
    High,
}

/// Classify the runtime. Missing signals fall back to `High`.
///
/// `logical_cores` of `Some(0)` is treated the same as `None`; browsers
/// that hide `hardwareConcurrency` report zero.
pub fn detect(user_agent: Option<&str>, logical_cores: Option<u32>) -> PerformanceTier {
    if user_agent.is_some_and(is_mobile) {
        return PerformanceTier::Low;
    }
    match logical_cores {
        Some(n) if n > 0 && n < MIN_CORES => PerformanceTier::Low,
        _ => PerformanceTier::High,
    }
}

pub fn is_mobile(user_agent: &str) -> bool {
    let ua = user_agent.to_ascii_lowercase();
    MOBILE_SIGNATURES.iter().any(|sig| ua.contains(sig))
}

/// Entity counts and frame-rate targets for one tier.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Budget {
    pub network_nodes: usize,
    pub network_links: usize,
    /// Connection range is `max(w, h) * span / divisor`.
    pub network_span: f32,
    pub network_divisor: f32,
    pub network_fps: f32,

    pub wave_fps: f32,
    pub wave_time_step: f32,

    pub trail_particles: usize,
    pub trail_length: usize,
    pub trail_fps: f32,

    pub square_count: usize,
    pub square_fps: f32,
}

impl PerformanceTier {
    pub fn budget(self) -> Budget {
        match self {
            Self::Low => Budget {
                network_nodes: 30,
                network_links: 3,
                network_span: 1.0,
                network_divisor: 7.0,
                network_fps: 20.0,
                wave_fps: 24.0,
                wave_time_step: 0.01,
                trail_particles: 25,
                trail_length: 12,
                trail_fps: 24.0,
                square_count: 15,
                square_fps: 24.0,
            },
            Self::High => Budget {
                network_nodes: 60,
                network_links: 5,
                network_span: 1.2,
                network_divisor: 5.0,
                network_fps: 40.0,
                wave_fps: 40.0,
                wave_time_step: 0.02,
                trail_particles: 50,
                trail_length: 20,
                trail_fps: 45.0,
                square_count: 30,
                square_fps: 60.0,
            },
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::High => "high",
        }
    }
}

impl Budget {
    pub fn target_fps(&self, kind: EffectKind) -> f32 {
        match kind {
            EffectKind::Network => self.network_fps,
            EffectKind::Waves => self.wave_fps,
            EffectKind::Trails => self.trail_fps,
            EffectKind::Squares => self.square_fps,
        }
    }
}
