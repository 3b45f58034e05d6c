//! Gamut limits of the bounded spaces and perceptual distance.

use crate::{
    color::{Color, Component, Components, Space},
    math::normalize_hue,
};

#[allow(clippy::manual_range_contains)]
fn in_range(value: Component, max: Component) -> bool {
    value >= 0.0 && value <= max
}

impl Color {
    /// Return a color with each of the components clipped into the range of
    /// its space. Spaces without gamut limits (XYZ, LMS, Oklab) are returned
    /// unchanged. Clipping twice is the same as clipping once.
    /// NOTE: This is a lossy operation.
    pub fn clip(&self) -> Color {
        let Components(c0, c1, c2) = self.components;
        let components = match self.space {
            Space::Rgb | Space::Rgba => self.components.map(|v| v.clamp(0.0, 1.0)),
            Space::Rgb8 | Space::Rgba8 => self.components.map(|v| v.clamp(0.0, 255.0)),
            Space::Hex => self.components.map(|v| v.clamp(0.0, 255.0).round()),
            Space::Hsl | Space::Hsla | Space::Hsv | Space::Hsva => {
                Components(normalize_hue(c0), c1.clamp(0.0, 1.0), c2.clamp(0.0, 1.0))
            }
            Space::Xyz | Space::Xyza | Space::Oklab | Space::Oklaba | Space::Lms | Space::Lmsa => {
                self.components
            }
        };

        Color::new(self.space, components, self.alpha.clamp(0.0, 1.0))
    }

    /// Returns true if the color is within its gamut limits.
    ///
    /// `Hsl` and `Hsv` are checked on their own ranges, which always land
    /// inside sRGB.
    pub fn in_gamut(&self) -> bool {
        let Components(c0, c1, c2) = self.components;
        match self.space {
            Space::Rgb | Space::Rgba => in_range(c0, 1.0) && in_range(c1, 1.0) && in_range(c2, 1.0),
            Space::Hex | Space::Rgb8 | Space::Rgba8 => {
                in_range(c0, 255.0) && in_range(c1, 255.0) && in_range(c2, 255.0)
            }
            Space::Hsl | Space::Hsla | Space::Hsv | Space::Hsva => {
                in_range(c1, 1.0) && in_range(c2, 1.0)
            }
            Space::Xyz | Space::Xyza | Space::Oklab | Space::Oklaba | Space::Lms | Space::Lmsa => {
                true
            }
        }
    }

    /// Euclidean distance between two colors measured in the given space.
    /// With [`Space::Oklab`] this is deltaE OK.
    pub fn distance(&self, other: &Color, space: Space) -> Component {
        let a = self.to_space(space);
        let b = other.to_space(space);
        (a.components - b.components).length()
    }
}
