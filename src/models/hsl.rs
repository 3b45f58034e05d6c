//! Model a color with the HSL notation in the sRGB color space.

use crate::color::{Component, HasSpace, Space};

huespread_macros::gen_model! {
    /// A color specified with the HSL notation in the sRGB color space.
    pub struct Hsl {
        /// The hue component of the color, in degrees.
        pub hue: Component,
        /// The saturation component of the color.
        pub saturation: Component,
        /// The lightness component of the color.
        pub lightness: Component,
    }
}

impl HasSpace for Hsl {
    const SPACE: Space = Space::Hsl;
}

#[cfg(test)]
mod tests {
    use crate::color::Components;
    use crate::models::{Hsl, Model};
    use crate::Space;

    #[test]
    fn to_color() {
        let model = Hsl::new(0.1, 0.2, 0.3);
        let color = model.to_color(0.4);
        assert_eq!(model.hue, color.components.0);
        assert_eq!(model.saturation, color.components.1);
        assert_eq!(model.lightness, color.components.2);
        assert_eq!(color.alpha, 0.4);
        assert_eq!(color.space, Space::Hsl);
        assert_eq!(Hsl::from(Components(0.1, 0.2, 0.3)), model);
    }
}
