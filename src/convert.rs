//! Each color space is modeled with its own type. Conversions between spaces
//! go through the canonical gamma encoded sRGB model, except for a few
//! direct edges between the unbounded spaces.
//!
//! Alpha is never touched by a conversion.
//!
//! NOTE: Converting into a bounded space (`rgb`, `RGB`, hex) clamps the
//!       components. The unbounded spaces (XYZ, LMS, Oklab) convert between
//!       each other directly so out of gamut values survive those hops.
//!
//! ```rust
//! use huespread::models::{Oklab, Srgb};
//! let blue = Oklab::from(
//!     Srgb::new(0.0, 0.0, 1.0)
//!         .to_linear_light()      // convert to srgb-linear.
//!         .to_xyz()               // convert to xyz-d65.
//!         .to_lms(),              // convert to the cone response basis.
//! );
//! ```

use crate::{
    color::{Color, Component, Components, Space},
    models::{Hsl, Hsv, Lms, Model, Oklab, Srgb, SrgbLinear, Xyz},
};

impl Color {
    /// Convert this color from its current color space/notation to the
    /// specified color space/notation.
    pub fn to_space(&self, space: Space) -> Self {
        use Space as S;

        if self.space == space {
            return self.clone();
        }

        if self.space.model() == space.model() {
            return match space {
                S::Hex => self.quantized(),
                _ => self.retag(space),
            };
        }

        // Handle direct conversions.
        let direct = match (self.space.model(), space.model()) {
            (S::Xyz, S::Lms) => Some(self.as_model::<Xyz>().to_lms().to_color(self.alpha)),
            (S::Lms, S::Xyz) => Some(self.as_model::<Lms>().to_xyz().to_color(self.alpha)),
            (S::Lms, S::Oklab) => Some(Oklab::from(self.as_model::<Lms>()).to_color(self.alpha)),
            (S::Oklab, S::Lms) => Some(self.as_model::<Oklab>().to_lms().to_color(self.alpha)),
            (S::Xyz, S::Oklab) => {
                Some(Oklab::from(self.as_model::<Xyz>().to_lms()).to_color(self.alpha))
            }
            (S::Oklab, S::Xyz) => {
                Some(self.as_model::<Oklab>().to_lms().to_xyz().to_color(self.alpha))
            }
            _ => None,
        };

        let model = match direct {
            Some(color) => color,
            None => {
                let srgb = self.to_srgb();
                match space {
                    S::Hex | S::Rgb8 | S::Rgba8 => srgb
                        .clamped()
                        .to_color(self.alpha)
                        .scaled(Space::Rgb8, 255.0),
                    S::Rgb | S::Rgba => srgb.clamped().to_color(self.alpha),
                    S::Hsl | S::Hsla => srgb.to_hsl().to_color(self.alpha),
                    S::Hsv | S::Hsva => srgb.to_hsv().to_color(self.alpha),
                    S::Xyz | S::Xyza => srgb.to_linear_light().to_xyz().to_color(self.alpha),
                    S::Lms | S::Lmsa => srgb
                        .to_linear_light()
                        .to_xyz()
                        .to_lms()
                        .to_color(self.alpha),
                    S::Oklab | S::Oklaba => Oklab::from(srgb.to_linear_light().to_xyz().to_lms())
                        .to_color(self.alpha),
                }
            }
        };

        model.to_space(space)
    }

    /// Convert the components of this color to the canonical gamma encoded
    /// sRGB model. Results from the unbounded spaces are clamped.
    pub(crate) fn to_srgb(&self) -> Srgb {
        use Space as S;

        match self.space {
            S::Hex | S::Rgb8 | S::Rgba8 => self.components.map(|v| v / 255.0).into(),
            S::Rgb | S::Rgba => self.as_model::<Srgb>(),
            S::Hsl | S::Hsla => self.as_model::<Hsl>().to_srgb(),
            S::Hsv | S::Hsva => self.as_model::<Hsv>().to_srgb(),
            S::Xyz | S::Xyza => SrgbLinear::from(self.as_model::<Xyz>())
                .to_gamma_encoded()
                .clamped(),
            S::Lms | S::Lmsa => SrgbLinear::from(self.as_model::<Lms>().to_xyz())
                .to_gamma_encoded()
                .clamped(),
            S::Oklab | S::Oklaba => SrgbLinear::from(self.as_model::<Oklab>().to_lms().to_xyz())
                .to_gamma_encoded()
                .clamped(),
        }
    }

    fn scaled(&self, space: Space, factor: Component) -> Self {
        Color::new(space, self.components.map(|v| v * factor), self.alpha)
    }

    /// Hex digits only hold whole bytes, including the alpha byte.
    fn quantized(&self) -> Self {
        let quantize = |v: Component| v.clamp(0.0, 255.0).round();
        Color::new(
            Space::Hex,
            self.components.map(quantize),
            quantize(self.alpha * 255.0) / 255.0,
        )
    }
}

impl Srgb {
    /// Convert a color specified in the sRGB color space to the HSL notation.
    pub fn to_hsl(&self) -> Hsl {
        util::rgb_to_hsl(&self.to_components()).into()
    }

    /// Convert a color specified in the sRGB color space to the HSV notation.
    pub fn to_hsv(&self) -> Hsv {
        util::rgb_to_hsv(&self.to_components()).into()
    }
}

impl Hsl {
    /// Convert this color from the HSL notation to the sRGB color space.
    pub fn to_srgb(&self) -> Srgb {
        util::hsl_to_rgb(&self.to_components()).into()
    }
}

impl Hsv {
    /// Convert this color from the HSV notation to the sRGB color space.
    pub fn to_srgb(&self) -> Srgb {
        util::hsv_to_rgb(&self.to_components()).into()
    }
}

impl Xyz {
    /// Convert to the linear cone response basis.
    pub fn to_lms(&self) -> Lms {
        Lms::from(*self)
    }
}

mod util {
    use crate::{
        color::{Component, Components},
        math::{almost_zero, normalize_hue},
    };

    /// Calculate the hue from RGB components and return it along with the min
    /// and max RGB values. Achromatic colors get a hue of 0.
    fn rgb_to_hue_with_min_max(from: &Components) -> (Component, Component, Component) {
        let Components(red, green, blue) = *from;

        let max = red.max(green).max(blue);
        let min = red.min(green).min(blue);

        let delta = max - min;

        let hue = if !almost_zero(delta) {
            60.0 * if max == red {
                (green - blue) / delta + if green < blue { 6.0 } else { 0.0 }
            } else if max == green {
                (blue - red) / delta + 2.0
            } else {
                (red - green) / delta + 4.0
            }
        } else {
            0.0
        };

        (hue, min, max)
    }

    /// Convert from RGB notation to HSL notation.
    pub fn rgb_to_hsl(from: &Components) -> Components {
        let (hue, min, max) = rgb_to_hue_with_min_max(from);

        let lightness = (min + max) / 2.0;
        let delta = max - min;

        let saturation =
            if almost_zero(delta) || almost_zero(lightness) || almost_zero(1.0 - lightness) {
                0.0
            } else {
                (max - lightness) / lightness.min(1.0 - lightness)
            };

        Components(hue, saturation, lightness)
    }

    /// Convert from HSL notation to RGB notation.
    pub fn hsl_to_rgb(from: &Components) -> Components {
        let Components(hue, saturation, lightness) = *from;

        if saturation <= 0.0 {
            return Components(lightness, lightness, lightness);
        }

        let hue = normalize_hue(hue);
        let a = saturation * lightness.min(1.0 - lightness);
        let f = |n: Component| {
            let k = (n + hue / 30.0) % 12.0;
            lightness - a * (k - 3.0).min(9.0 - k).clamp(-1.0, 1.0)
        };

        Components(f(0.0), f(8.0), f(4.0))
    }

    /// Convert from RGB notation to HSV notation.
    pub fn rgb_to_hsv(from: &Components) -> Components {
        let (hue, min, max) = rgb_to_hue_with_min_max(from);

        let saturation = if almost_zero(max) {
            0.0
        } else {
            (max - min) / max
        };

        Components(hue, saturation, max)
    }

    /// Convert from HSV notation to RGB notation.
    pub fn hsv_to_rgb(from: &Components) -> Components {
        let Components(hue, saturation, value) = *from;

        let hue = normalize_hue(hue);
        let f = |n: Component| {
            let k = (n + hue / 60.0) % 6.0;
            value - value * saturation * k.min(4.0 - k).clamp(0.0, 1.0)
        };

        Components(f(5.0), f(3.0), f(1.0))
    }
}
