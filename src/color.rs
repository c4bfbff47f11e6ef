// color.rs - Colors and light/dark palette selection
//
// Colors are kept as 8-bit RGB plus a float alpha so they map 1:1 onto
// CSS `rgba()` strings for the canvas backend.

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: f32,
}

impl Rgba {
    pub const TRANSPARENT: Rgba = Rgba::new(0, 0, 0, 0.0);

    pub const fn new(r: u8, g: u8, b: u8, a: f32) -> Self {
        Self { r, g, b, a }
    }

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    /// HSL to RGB. Hue in degrees (wraps), saturation and lightness in [0, 1].
    pub fn from_hsla(h: f32, s: f32, l: f32, a: f32) -> Self {
        let h = h.rem_euclid(360.0) / 60.0;
        let s = s.clamp(0.0, 1.0);
        let l = l.clamp(0.0, 1.0);

        let c = (1.0 - (2.0 * l - 1.0).abs()) * s;
        let x = c * (1.0 - (h % 2.0 - 1.0).abs());
        let (r, g, b) = match h as u32 {
            0 => (c, x, 0.0),
            1 => (x, c, 0.0),
            2 => (0.0, c, x),
            3 => (0.0, x, c),
            4 => (x, 0.0, c),
            _ => (c, 0.0, x),
        };
        let m = l - c / 2.0;
        let ch = |v: f32| ((v + m) * 255.0).round().clamp(0.0, 255.0) as u8;

        Self::new(ch(r), ch(g), ch(b), a.clamp(0.0, 1.0))
    }

    pub fn with_alpha(self, a: f32) -> Self {
        Self { a: a.clamp(0.0, 1.0), ..self }
    }

    /// CSS `rgba(r, g, b, a)` string.
    pub fn to_css(self) -> String {
        format!("rgba({}, {}, {}, {})", self.r, self.g, self.b, self.a)
    }
}

/// Light or dark theme, owned by the host.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum ColorMode {
    Light,
    #[default]
    Dark,
}

impl ColorMode {
    pub fn from_dark(dark: bool) -> Self {
        if dark { Self::Dark } else { Self::Light }
    }

    pub fn is_dark(self) -> bool {
        self == Self::Dark
    }

    /// Pick the dark or light variant.
    #[inline]
    pub fn pick<T>(self, dark: T, light: T) -> T {
        match self {
            Self::Dark => dark,
            Self::Light => light,
        }
    }

    /// Flat page backdrop behind every effect; belongs in the host's stylesheet.
    pub fn backdrop(self) -> Rgba {
        self.pick(Rgba::rgb(17, 24, 39), Rgba::rgb(240, 249, 255))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn hsl_primaries() {
        assert_eq!(Rgba::from_hsla(0.0, 1.0, 0.5, 1.0), Rgba::rgb(255, 0, 0));
        assert_eq!(Rgba::from_hsla(120.0, 1.0, 0.5, 1.0), Rgba::rgb(0, 255, 0));
        assert_eq!(Rgba::from_hsla(240.0, 1.0, 0.5, 1.0), Rgba::rgb(0, 0, 255));
    }

    #[test]
    fn hue_wraps_around() {
        assert_eq!(Rgba::from_hsla(-120.0, 1.0, 0.5, 1.0), Rgba::from_hsla(240.0, 1.0, 0.5, 1.0));
        assert_eq!(Rgba::from_hsla(480.0, 1.0, 0.5, 1.0), Rgba::from_hsla(120.0, 1.0, 0.5, 1.0));
    }

    #[test]
    fn css_string() {
        assert_eq!(Rgba::new(139, 142, 245, 0.5).to_css(), "rgba(139, 142, 245, 0.5)");
    }

    #[test]
    fn alpha_is_clamped() {
        assert_eq!(Rgba::rgb(1, 2, 3).with_alpha(1.8).a, 1.0);
        assert_eq!(Rgba::rgb(1, 2, 3).with_alpha(-0.2).a, 0.0);
    }

    #[test]
    fn mode_from_flag() {
        assert!(ColorMode::from_dark(true).is_dark());
        assert_eq!(ColorMode::from_dark(false), ColorMode::Light);
        assert_eq!(ColorMode::Light.pick(1, 2), 2);
    }
}
