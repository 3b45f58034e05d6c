//! Model a color in the CIE-XYZ color space.

use crate::color::{Component, HasSpace, Space};

huespread_macros::gen_model! {
    /// A color in the CIE-XYZ color space with a D65 white point reference.
    pub struct Xyz {
        /// The X component of the color.
        pub x: Component,
        /// The Y component of the color.
        pub y: Component,
        /// The Z component of the color.
        pub z: Component,
    }
}

impl HasSpace for Xyz {
    const SPACE: Space = Space::Xyz;
}
