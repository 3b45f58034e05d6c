//! Models for the Oklab perceptual space and the linear cone response basis
//! it is built on.
//! <https://bottosson.github.io/posts/oklab/>

use crate::{
    color::{Component, HasSpace, Space},
    math::{transform, transform_3x3, Transform},
    models::xyz::Xyz,
};

huespread_macros::gen_model! {
    /// Linear long/medium/short cone responses.
    pub struct Lms {
        /// Long wavelength response.
        pub long: Component,
        /// Medium wavelength response.
        pub medium: Component,
        /// Short wavelength response.
        pub short: Component,
    }
}

impl HasSpace for Lms {
    const SPACE: Space = Space::Lms;
}

impl From<Xyz> for Lms {
    fn from(value: Xyz) -> Self {
        #[rustfmt::skip]
        #[allow(clippy::excessive_precision)]
        const XYZ_TO_LMS: Transform = transform_3x3(
             0.8189330101, 0.0329845436, 0.0482003018,
             0.3618667424, 0.9293118715, 0.2643662691,
            -0.1288597137, 0.0361456387, 0.6338517070,
        );

        transform(&XYZ_TO_LMS, value.to_components()).into()
    }
}

impl Lms {
    /// Convert the cone responses back to CIE-XYZ.
    pub fn to_xyz(&self) -> Xyz {
        #[rustfmt::skip]
        #[allow(clippy::excessive_precision)]
        const LMS_TO_XYZ: Transform = transform_3x3(
             1.2270138511, -0.0405801784, -0.0763812845,
            -0.5577999807,  1.1122568696, -0.4214819784,
             0.2812561490, -0.0716766787,  1.5861632204,
        );

        transform(&LMS_TO_XYZ, self.to_components()).into()
    }
}

huespread_macros::gen_model! {
    /// A color in the Oklab color space.
    pub struct Oklab {
        /// The perceived lightness.
        pub lightness: Component,
        /// Green/red axis.
        pub a: Component,
        /// Blue/yellow axis.
        pub b: Component,
    }
}

impl HasSpace for Oklab {
    const SPACE: Space = Space::Oklab;
}

impl From<Lms> for Oklab {
    fn from(value: Lms) -> Self {
        #[rustfmt::skip]
        #[allow(clippy::excessive_precision)]
        const LMS_TO_OKLAB: Transform = transform_3x3(
             0.2104542553,  1.9779984951,  0.0259040371,
             0.7936177850, -2.4285922050,  0.7827717662,
            -0.0040720468,  0.4505937099, -0.8086757660,
        );

        let lms = value.to_components().map(|v| v.cbrt());
        transform(&LMS_TO_OKLAB, lms).into()
    }
}

impl Oklab {
    /// Undo the cube root nonlinearity and return the linear cone responses.
    pub fn to_lms(&self) -> Lms {
        #[rustfmt::skip]
        #[allow(clippy::excessive_precision)]
        const OKLAB_TO_LMS: Transform = transform_3x3(
            1.0,           1.0,           1.0,
            0.3963377774, -0.1055613458, -0.0894841775,
            0.2158037573, -0.0638541728, -1.2914855480,
        );

        let lms = transform(&OKLAB_TO_LMS, self.to_components());
        lms.map(|v| v * v * v).into()
    }

    /// Euclidean distance to another Oklab color (deltaE OK).
    pub fn distance(&self, other: &Oklab) -> Component {
        (self.to_components() - other.to_components()).length()
    }
}
