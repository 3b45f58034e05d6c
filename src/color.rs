//! A [`Color`] represents a color that was specified in any of the supported
//! color spaces.

use std::ops::{Add, Mul, Sub};

use bitflags::bitflags;

/// A 64-bit floating point value that all components are stored as.
pub type Component = f64;

/// Represent the three components that describe any color.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Components(pub Component, pub Component, pub Component);

impl Components {
    /// Return new components with each component mapped with the given
    /// function.
    pub fn map(&self, f: impl Fn(Component) -> Component) -> Self {
        Self(f(self.0), f(self.1), f(self.2))
    }

    /// Squared euclidean length of the components taken as a vector.
    pub fn length_squared(&self) -> Component {
        self.0 * self.0 + self.1 * self.1 + self.2 * self.2
    }

    /// Euclidean length of the components taken as a vector.
    pub fn length(&self) -> Component {
        self.length_squared().sqrt()
    }

    /// Return the components as an array.
    pub fn to_array(&self) -> [Component; 3] {
        [self.0, self.1, self.2]
    }
}

impl From<[Component; 3]> for Components {
    fn from(value: [Component; 3]) -> Self {
        Self(value[0], value[1], value[2])
    }
}

impl Add for Components {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Self(self.0 + rhs.0, self.1 + rhs.1, self.2 + rhs.2)
    }
}

impl Sub for Components {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        Self(self.0 - rhs.0, self.1 - rhs.1, self.2 - rhs.2)
    }
}

impl Mul<Component> for Components {
    type Output = Self;

    fn mul(self, rhs: Component) -> Self::Output {
        self.map(|v| v * rhs)
    }
}

impl std::fmt::Display for Components {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {}, {})", self.0, self.1, self.2)
    }
}

bitflags! {
    /// Synthetic anchor colors added to an optimization to frame contrast.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
    pub struct Anchors : u8 {
        /// Pure black, `rgb(0, 0, 0)`.
        const BLACK = 1 << 0;
        /// Pure white, `rgb(1, 1, 1)`.
        const WHITE = 1 << 1;
    }
}

impl Anchors {
    /// The anchor colors in canonical form, black first.
    pub fn colors(&self) -> Vec<Color> {
        let mut colors = Vec::with_capacity(2);
        if self.contains(Anchors::BLACK) {
            colors.push(Color::new(Space::Rgb, Components(0.0, 0.0, 0.0), 1.0));
        }
        if self.contains(Anchors::WHITE) {
            colors.push(Color::new(Space::Rgb, Components(1.0, 1.0, 1.0), 1.0));
        }
        colors
    }
}

/// The closed set of color spaces and notations a [`Color`] can be tagged
/// with.
///
/// The alpha bearing variants expose a fourth channel. Every color carries
/// an alpha value regardless, so converting between the two forms of a
/// space never loses it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Space {
    /// Hexadecimal notation, `#rrggbb` or `#rrggbbaa`. Components are stored
    /// as integers in `0..=255`.
    Hex = 0,
    /// sRGB with components in `0..=255` (`RGB(...)`).
    Rgb8 = 1,
    /// sRGB with components and alpha in `0..=255` (`RGBA(...)`).
    Rgba8 = 2,
    /// sRGB with components in `0..=1` (`rgb(...)`). The canonical space.
    Rgb = 3,
    /// sRGB with components and alpha in `0..=1` (`rgba(...)`).
    Rgba = 4,
    /// Hue (degrees), saturation, lightness.
    Hsl = 5,
    /// [`Space::Hsl`] with alpha.
    Hsla = 6,
    /// Hue (degrees), saturation, value.
    Hsv = 7,
    /// [`Space::Hsv`] with alpha.
    Hsva = 8,
    /// CIE-XYZ with a D65 white point.
    Xyz = 9,
    /// [`Space::Xyz`] with alpha.
    Xyza = 10,
    /// The Oklab perceptual space.
    Oklab = 11,
    /// [`Space::Oklab`] with alpha.
    Oklaba = 12,
    /// The linear cone response basis underlying Oklab.
    Lms = 13,
    /// [`Space::Lms`] with alpha.
    Lmsa = 14,
}

impl Space {
    /// Every supported space.
    pub const ALL: [Space; 15] = [
        Space::Hex,
        Space::Rgb8,
        Space::Rgba8,
        Space::Rgb,
        Space::Rgba,
        Space::Hsl,
        Space::Hsla,
        Space::Hsv,
        Space::Hsva,
        Space::Xyz,
        Space::Xyza,
        Space::Oklab,
        Space::Oklaba,
        Space::Lms,
        Space::Lmsa,
    ];

    /// Returns true if the space exposes an alpha channel.
    pub fn has_alpha(&self) -> bool {
        matches!(
            self,
            Space::Rgba8 | Space::Rgba | Space::Hsla | Space::Hsva | Space::Xyza | Space::Oklaba | Space::Lmsa
        )
    }

    /// The underlying model of this space, with the alpha variants folded
    /// onto their opaque counterpart. [`Space::Hex`] folds onto
    /// [`Space::Rgb8`].
    pub fn model(&self) -> Space {
        match self {
            Space::Hex | Space::Rgb8 | Space::Rgba8 => Space::Rgb8,
            Space::Rgb | Space::Rgba => Space::Rgb,
            Space::Hsl | Space::Hsla => Space::Hsl,
            Space::Hsv | Space::Hsva => Space::Hsv,
            Space::Xyz | Space::Xyza => Space::Xyz,
            Space::Oklab | Space::Oklaba => Space::Oklab,
            Space::Lms | Space::Lmsa => Space::Lms,
        }
    }

    /// Number of channels exposed by [`Color::values`].
    pub fn channels(&self) -> usize {
        if self.has_alpha() {
            4
        } else {
            3
        }
    }
}

/// Implemented by models that map onto a single [`Space`].
pub trait HasSpace {
    /// The space of the model.
    const SPACE: Space;
}

/// Struct that can hold a color of any color space.
#[derive(Clone, Debug, PartialEq)]
pub struct Color {
    /// The three components that make up any color.
    pub components: Components,
    /// The alpha component of the color, always in `0..=1`.
    pub alpha: Component,
    /// The color space in which the components are set.
    pub space: Space,
}

impl Color {
    /// Create a new [`Color`] tagged with the given space.
    /// ```rust
    /// use huespread::{Color, Components, Space};
    /// let c = Color::new(Space::Oklab, Components(0.5, 0.1, -0.1), 1.0);
    /// ```
    pub fn new(space: Space, components: Components, alpha: Component) -> Self {
        Self {
            components,
            alpha,
            space,
        }
    }

    /// Create an opaque color in the canonical `rgb` space.
    pub fn rgb(red: Component, green: Component, blue: Component) -> Self {
        Self::new(Space::Rgb, Components(red, green, blue), 1.0)
    }

    /// Create a color from the channel values as exposed by the space: three
    /// values, or four for alpha bearing spaces. For [`Space::Rgba8`] the
    /// alpha value is in `0..=255`.
    pub fn from_values(space: Space, values: &[Component]) -> crate::Result<Self> {
        if values.len() != space.channels() {
            return Err(crate::Error::Parse(format!(
                "{:?} takes {} values, got {}",
                space,
                space.channels(),
                values.len()
            )));
        }

        let components = Components(values[0], values[1], values[2]);
        let alpha = match (space, values.get(3)) {
            (Space::Rgba8, Some(alpha)) => alpha / 255.0,
            (_, Some(alpha)) => *alpha,
            (_, None) => 1.0,
        };

        Ok(match space {
            // Hex digits only hold whole bytes.
            Space::Hex => Self::new(Space::Rgb8, components, alpha).to_space(Space::Hex),
            _ => Self::new(space, components, alpha),
        })
    }

    /// The channel values as exposed by the space: three values, or four for
    /// alpha bearing spaces.
    pub fn values(&self) -> Vec<Component> {
        let mut values = self.components.to_array().to_vec();
        if self.space.has_alpha() {
            values.push(match self.space {
                Space::Rgba8 => self.alpha * 255.0,
                _ => self.alpha,
            });
        }
        values
    }

    /// Interpret the components of this color as the given model.
    pub fn as_model<T: From<Components>>(&self) -> T {
        T::from(self.components)
    }

    /// Return the same components tagged with another space of the same
    /// model.
    pub(crate) fn retag(&self, space: Space) -> Self {
        debug_assert_eq!(self.space.model(), space.model());
        Self::new(space, self.components, self.alpha)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_color_with_correct_components() {
        let c = Color::new(Space::Rgb, Components(0.1, 0.2, 0.3), 0.4);
        assert_eq!(c.components, Components(0.1, 0.2, 0.3));
        assert_eq!(c.alpha, 0.4);
        assert_eq!(c.space, Space::Rgb);
    }

    #[test]
    fn values_expose_alpha_only_for_alpha_spaces() {
        let c = Color::new(Space::Oklab, Components(0.5, 0.1, 0.2), 0.25);
        assert_eq!(c.values(), vec![0.5, 0.1, 0.2]);

        let c = c.retag(Space::Oklaba);
        assert_eq!(c.values(), vec![0.5, 0.1, 0.2, 0.25]);

        let c = Color::new(Space::Rgba8, Components(255.0, 0.0, 0.0), 0.5);
        assert_eq!(c.values(), vec![255.0, 0.0, 0.0, 127.5]);
    }

    #[test]
    fn from_values_checks_channel_count() {
        assert!(Color::from_values(Space::Hsl, &[120.0, 0.5, 0.5]).is_ok());
        assert!(Color::from_values(Space::Hsl, &[120.0, 0.5, 0.5, 1.0]).is_err());
        assert!(Color::from_values(Space::Hsla, &[120.0, 0.5]).is_err());

        let c = Color::from_values(Space::Rgba8, &[10.0, 20.0, 30.0, 51.0]).unwrap();
        assert_eq!(c.alpha, 0.2);
        let c = Color::from_values(Space::Xyz, &[0.2, 0.3, 0.4]).unwrap();
        assert_eq!(c.alpha, 1.0);
    }

    #[test]
    fn anchors_are_black_then_white() {
        assert!(Anchors::empty().colors().is_empty());
        let colors = Anchors::all().colors();
        assert_eq!(colors.len(), 2);
        assert_eq!(colors[0].components, Components(0.0, 0.0, 0.0));
        assert_eq!(colors[1].components, Components(1.0, 1.0, 1.0));
        assert_eq!(Anchors::WHITE.colors()[0].components, Components(1.0, 1.0, 1.0));
    }

    #[test]
    fn every_space_folds_onto_an_opaque_model() {
        for space in Space::ALL {
            assert!(!space.model().has_alpha());
            assert_eq!(space.model().model(), space.model());
        }
    }
}
