//! Simulate how a color is perceived with dichromatic vision.
//!
//! Colors are projected onto a cone response basis taken directly from gamma
//! encoded sRGB (Viénot, Brettel & Mollon), one cone axis is replaced by a
//! combination of the other two, and the result is projected back.
//! <https://github.com/tsarjak/Simulate-Correct-ColorBlindness>
//!
//! Severities between 0 and 1 blend linearly between normal vision and the
//! full projection: `M(s) = (1 - s) * I + s * M_full`. When more than one
//! type is given they are applied in sequence: protanopia, then
//! deuteranopia, then tritanopia.

use crate::{
    color::{Color, Component, Components, Space},
    math::{transform, transform_3x3, Transform},
};

#[rustfmt::skip]
#[allow(clippy::excessive_precision)]
const RGB_TO_LMS: Transform = transform_3x3(
    17.8824,   3.45565,  0.0299566,
    43.5161,  27.1554,   0.184309,
     4.11935,  3.86714,  1.46709,
);

#[rustfmt::skip]
#[allow(clippy::excessive_precision)]
const LMS_TO_RGB: Transform = transform_3x3(
     0.0809444479049769,  -0.0102485335146068,  -0.000365296937861049,
    -0.130504409160321,    0.0540193266359988,  -0.00412161468587628,
     0.116721066439603,   -0.113614708214043,    0.693511404860859,
);

/// Severities of the three kinds of dichromacy, each in `0..=1`.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Profile {
    /// Missing or anomalous long wavelength cones.
    pub protanopia: Component,
    /// Missing or anomalous medium wavelength cones.
    pub deuteranopia: Component,
    /// Missing or anomalous short wavelength cones.
    pub tritanopia: Component,
}

impl Profile {
    /// Normal color vision.
    pub const NORMAL: Profile = Profile::new_unchecked(0.0, 0.0, 0.0);
    /// Full protanopia.
    pub const PROTANOPIA: Profile = Profile::new_unchecked(1.0, 0.0, 0.0);
    /// Full deuteranopia.
    pub const DEUTERANOPIA: Profile = Profile::new_unchecked(0.0, 1.0, 0.0);
    /// Full tritanopia.
    pub const TRITANOPIA: Profile = Profile::new_unchecked(0.0, 0.0, 1.0);

    const fn new_unchecked(
        protanopia: Component,
        deuteranopia: Component,
        tritanopia: Component,
    ) -> Self {
        Self {
            protanopia,
            deuteranopia,
            tritanopia,
        }
    }

    /// Create a new profile. Severities are clamped into `0..=1`.
    pub fn new(protanopia: Component, deuteranopia: Component, tritanopia: Component) -> Self {
        Self::new_unchecked(
            protanopia.clamp(0.0, 1.0),
            deuteranopia.clamp(0.0, 1.0),
            tritanopia.clamp(0.0, 1.0),
        )
    }

    /// The battery of full dichromacies used when scoring palettes.
    pub fn battery() -> Vec<Profile> {
        vec![Self::PROTANOPIA, Self::DEUTERANOPIA, Self::TRITANOPIA]
    }

    /// Returns true if the profile leaves colors unchanged.
    pub fn is_normal(&self) -> bool {
        self.protanopia == 0.0 && self.deuteranopia == 0.0 && self.tritanopia == 0.0
    }

    /// The matrix that maps gamma encoded sRGB onto its simulated
    /// counterpart.
    fn matrix(&self) -> Transform {
        let p = self.protanopia;
        let d = self.deuteranopia;
        let t = self.tritanopia;

        #[rustfmt::skip]
        let protan = transform_3x3(
            1.0 - p,           0.0, 0.0,
            2.02344 * p,       1.0, 0.0,
            -2.52581 * p,      0.0, 1.0,
        );
        #[rustfmt::skip]
        let deutan = transform_3x3(
            1.0, 0.494207 * d, 0.0,
            0.0, 1.0 - d,      0.0,
            0.0, 1.24827 * d,  1.0,
        );
        #[rustfmt::skip]
        let tritan = transform_3x3(
            1.0, 0.0, -0.395913 * t,
            0.0, 1.0,  0.801109 * t,
            0.0, 0.0,  1.0 - t,
        );

        RGB_TO_LMS
            .then(&protan)
            .then(&deutan)
            .then(&tritan)
            .then(&LMS_TO_RGB)
    }

    /// Simulate gamma encoded sRGB components. The result is clamped into
    /// `0..=1`.
    pub(crate) fn apply(&self, rgb: Components) -> Components {
        if self.is_normal() {
            return rgb;
        }
        transform(&self.matrix(), rgb).map(|v| v.clamp(0.0, 1.0))
    }
}

/// Simulate the color as perceived with the given profile. The result is in
/// the space of the input color.
pub fn simulate(color: &Color, profile: Profile) -> Color {
    if profile.is_normal() {
        return color.clone();
    }

    let rgb = profile.apply(color.to_srgb().to_components());
    Color::new(Space::Rgb, rgb, color.alpha).to_space(color.space)
}

/// Simulate the color with the given severities of protanopia, deuteranopia
/// and tritanopia.
pub fn simulate_colorblind(
    color: &Color,
    protanopia: Component,
    deuteranopia: Component,
    tritanopia: Component,
) -> Color {
    simulate(color, Profile::new(protanopia, deuteranopia, tritanopia))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assert_component_eq;

    #[test]
    fn zero_severity_is_identity() {
        let samples = [
            "#df928e".parse::<Color>().unwrap(),
            Color::new(Space::Oklab, Components(0.7, 0.4, -0.3), 0.5),
            Color::new(Space::Hsl, Components(400.0, 0.5, 0.5), 1.0),
        ];
        for color in samples {
            assert_eq!(simulate_colorblind(&color, 0.0, 0.0, 0.0), color);
        }
    }

    #[test]
    fn full_dichromacies() {
        let red = simulate(&Color::rgb(1.0, 0.0, 0.0), Profile::PROTANOPIA);
        assert_component_eq!(red.components.0, 0.112382, 1.0e-4);
        assert_component_eq!(red.components.1, 0.112383, 1.0e-4);
        assert_component_eq!(red.components.2, 0.004006, 1.0e-4);

        let green = simulate(&Color::rgb(0.0, 1.0, 0.0), Profile::DEUTERANOPIA);
        assert_component_eq!(green.components.0, 0.707252, 1.0e-4);
        assert_component_eq!(green.components.1, 0.707249, 1.0e-4);
        assert_component_eq!(green.components.2, 0.022337, 1.0e-4);

        let blue = simulate(&Color::rgb(0.0, 0.0, 1.0), Profile::TRITANOPIA);
        assert_component_eq!(blue.components.0, 0.0, 1.0e-4);
        assert_component_eq!(blue.components.1, 0.0, 1.0e-4);
        assert_component_eq!(blue.components.2, 1.0, 1.0e-4);
    }

    #[test]
    fn partial_severity_blends() {
        let red = simulate_colorblind(&Color::rgb(1.0, 0.0, 0.0), 0.5, 0.0, 0.0);
        assert_component_eq!(red.components.0, 0.556191, 1.0e-4);
        assert_component_eq!(red.components.1, 0.056192, 1.0e-4);
        assert_component_eq!(red.components.2, 0.002003, 1.0e-4);
    }

    #[test]
    fn full_projection_is_idempotent() {
        let color = Color::rgb(0.2, 0.6, 0.4);
        let once = simulate(&color, Profile::PROTANOPIA);
        let twice = simulate(&once, Profile::PROTANOPIA);
        assert_component_eq!(once.components.0, twice.components.0, 1.0e-6);
        assert_component_eq!(once.components.1, twice.components.1, 1.0e-6);
        assert_component_eq!(once.components.2, twice.components.2, 1.0e-6);
    }

    #[test]
    fn output_keeps_space_and_alpha() {
        let color = Color::new(Space::Hsla, Components(120.0, 0.8, 0.4), 0.3);
        let simulated = simulate_colorblind(&color, 0.0, 1.0, 0.0);
        assert_eq!(simulated.space, Space::Hsla);
        assert_eq!(simulated.alpha, 0.3);

        let hex = "#3c4f76".parse::<Color>().unwrap();
        let simulated = simulate_colorblind(&hex, 1.0, 1.0, 1.0);
        assert_eq!(simulated.space, Space::Hex);
        assert!(simulated.in_gamut());
    }

    #[test]
    fn severities_are_clamped() {
        assert_eq!(Profile::new(2.0, -1.0, 0.5), Profile::new(1.0, 0.0, 0.5));
    }
}
