//! Models are structs that represent a color in a specified color space or
//! form. They give a type safe path between the spaces of a [`Color`].

use crate::color::{Color, Component, Components, HasSpace};

mod hsl;
mod hsv;
mod oklab;
mod rgb;
mod xyz;

pub use hsl::Hsl;
pub use hsv::Hsv;
pub use oklab::{Lms, Oklab};
pub use rgb::{Srgb, SrgbLinear};
pub use xyz::Xyz;

/// A trait implemented for color models that can be converted to a generic
/// [`Color`].
pub trait Model: HasSpace + Into<Components> + Copy {
    /// Convert a model to a generic [`Color`] in the model's space.
    fn to_color(self, alpha: Component) -> Color {
        Color::new(Self::SPACE, self.into(), alpha)
    }
}

impl<T: HasSpace + Into<Components> + Copy> Model for T {}
