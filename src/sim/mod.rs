// sim/ - Backdrop effect simulators
//
// One module per effect. Each owns its entity set, mutates it once per
// admitted frame and draws through `Surface`. Entities live exactly as
// long as the simulator; nothing is shared between effects.

mod listing;
mod network;
mod squares;
mod trails;
mod waves;

pub use network::{Edge, Node, NetworkField};
pub use squares::{Square, SquareField};
pub use trails::{Particle, TrailField, TrailPoint};
pub use waves::{Wave, WaveField};

use crate::color::ColorMode;
use crate::error::EngineError;
use crate::perf::Budget;
use crate::render::Surface;
use std::fmt;
use std::str::FromStr;

/// The closed set of backdrop effects the host can select.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum EffectKind {
    /// Drifting nodes joined by proximity links ("matrix").
    Network,
    /// Layered sine-wave fills.
    Waves,
    /// Glowing particles with fading trails ("stars").
    Trails,
    /// Slowly rotating squares ("flow").
    #[default]
    Squares,
}

impl EffectKind {
    /// Control panel order.
    pub const ALL: [EffectKind; 4] = [Self::Squares, Self::Network, Self::Waves, Self::Trails];

    /// Canonical host-facing name.
    pub fn name(self) -> &'static str {
        match self {
            Self::Network => "matrix",
            Self::Waves => "waves",
            Self::Trails => "stars",
            Self::Squares => "squares",
        }
    }

    /// Display listing of the effect's generation algorithm.
    pub fn source_listing(self) -> &'static str {
        listing::source(self)
    }
}

impl FromStr for EffectKind {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "matrix" | "network" => Ok(Self::Network),
            "waves" => Ok(Self::Waves),
            "stars" | "particles" | "trails" => Ok(Self::Trails),
            "flow" | "squares" => Ok(Self::Squares),
            _ => Err(EngineError::UnknownEffect(s.to_owned())),
        }
    }
}

impl fmt::Display for EffectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Per-frame contract shared by every effect.
pub trait Simulator {
    fn kind(&self) -> EffectKind;

    /// Advance one tick and draw it. `elapsed_ms` is the wall time since
    /// the previous step (0 on the first one).
    fn step(&mut self, surface: &mut dyn Surface, elapsed_ms: f64);

    /// Viewport changed. Entities are kept; out-of-bounds ones may be moved back in.
    fn resize(&mut self, width: f32, height: f32);

    /// Re-derive palettes in place.
    fn set_color_mode(&mut self, mode: ColorMode);

    fn entity_count(&self) -> usize;
}

/// Build and seed the simulator for `kind`.
pub fn spawn(
    kind: EffectKind,
    mode: ColorMode,
    budget: &Budget,
    width: f32,
    height: f32,
    rng: &mut Rng,
) -> Box<dyn Simulator> {
    match kind {
        EffectKind::Network => Box::new(NetworkField::seeded(budget, mode, width, height, rng)),
        EffectKind::Waves => Box::new(WaveField::new(budget, mode, width, height)),
        EffectKind::Trails => Box::new(TrailField::seeded(budget, mode, width, height, rng)),
        EffectKind::Squares => Box::new(SquareField::seeded(budget, mode, width, height, rng)),
    }
}

// ============================================================================
// RNG (xorshift32)
// ============================================================================

pub const DEFAULT_SEED: u32 = 0xDEAD_BEEF;

#[derive(Clone, Debug)]
pub struct Rng(u32);

impl Rng {
    /// Zero would lock xorshift at zero forever; it is remapped.
    pub fn new(seed: u32) -> Self {
        Self(if seed == 0 { DEFAULT_SEED } else { seed })
    }

    /// Uniform in [0, 1).
    #[inline(always)]
    pub fn next_f32(&mut self) -> f32 {
        self.0 ^= self.0 << 13;
        self.0 ^= self.0 >> 17;
        self.0 ^= self.0 << 5;
        (self.0 >> 8) as f32 * (1.0 / 16_777_216.0)
    }

    /// Uniform in [lo, hi).
    #[inline]
    pub fn range(&mut self, lo: f32, hi: f32) -> f32 {
        lo + self.next_f32() * (hi - lo)
    }

    /// Uniform in (-half, half).
    #[inline]
    pub fn centered(&mut self, half: f32) -> f32 {
        (self.next_f32() - 0.5) * 2.0 * half
    }

    #[inline]
    pub fn chance(&mut self, p: f32) -> bool {
        self.next_f32() < p
    }

    #[inline]
    pub fn index(&mut self, len: usize) -> usize {
        ((self.next_f32() * len as f32) as usize).min(len.saturating_sub(1))
    }

    /// Independent generator derived from this one's next state.
    pub fn fork(&mut self) -> Rng {
        self.next_f32();
        Rng::new(self.0.rotate_left(7) ^ 0x9E37_79B9)
    }
}

impl Default for Rng {
    fn default() -> Self {
        Self::new(DEFAULT_SEED)
    }
}

/// Reflect-and-clamp on one axis. Returns the new (position, velocity).
#[inline]
pub(crate) fn bounce(pos: f32, vel: f32, max: f32) -> (f32, f32) {
    if pos < 0.0 || pos > max {
        (pos.clamp(0.0, max.max(0.0)), -vel)
    } else {
        (pos, vel)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::perf::PerformanceTier;

    #[test]
    fn parse_names_and_aliases() {
        assert_eq!("matrix".parse::<EffectKind>().unwrap(), EffectKind::Network);
        assert_eq!(" Waves ".parse::<EffectKind>().unwrap(), EffectKind::Waves);
        assert_eq!("stars".parse::<EffectKind>().unwrap(), EffectKind::Trails);
        assert_eq!("particles".parse::<EffectKind>().unwrap(), EffectKind::Trails);
        assert_eq!("flow".parse::<EffectKind>().unwrap(), EffectKind::Squares);
        assert_eq!("SQUARES".parse::<EffectKind>().unwrap(), EffectKind::Squares);
        assert!(matches!("plasma".parse::<EffectKind>(), Err(EngineError::UnknownEffect(_))));
    }

    #[test]
    fn canonical_names_round_trip() {
        for kind in EffectKind::ALL {
            assert_eq!(kind.name().parse::<EffectKind>().unwrap(), kind);
            assert_eq!(kind.to_string(), kind.name());
        }
    }

    #[test]
    fn rng_stays_in_unit_range() {
        let mut rng = Rng::new(1);
        for _ in 0..10_000 {
            let v = rng.next_f32();
            assert!((0.0..1.0).contains(&v));
        }
    }

    #[test]
    fn rng_zero_seed_is_usable() {
        let mut rng = Rng::new(0);
        let a = rng.next_f32();
        let b = rng.next_f32();
        assert_ne!(a, b);
    }

    #[test]
    fn rng_index_in_bounds() {
        let mut rng = Rng::new(99);
        for _ in 0..1000 {
            assert!(rng.index(3) < 3);
        }
    }

    #[test]
    fn bounce_reflects_and_clamps() {
        assert_eq!(bounce(-2.0, -1.0, 100.0), (0.0, 1.0));
        assert_eq!(bounce(101.0, 1.5, 100.0), (100.0, -1.5));
        assert_eq!(bounce(50.0, 1.0, 100.0), (50.0, 1.0));
    }

    #[test]
    fn spawn_matches_kind() {
        let budget = PerformanceTier::Low.budget();
        let mut rng = Rng::default();
        for kind in EffectKind::ALL {
            let sim = spawn(kind, ColorMode::Dark, &budget, 800.0, 600.0, &mut rng);
            assert_eq!(sim.kind(), kind);
        }
    }

    #[test]
    fn every_effect_has_a_listing() {
        for kind in EffectKind::ALL {
            assert!(!kind.source_listing().is_empty());
        }
    }
}
