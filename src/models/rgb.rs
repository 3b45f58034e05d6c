//! Model a color in the sRGB color space.

use crate::{
    color::{Component, HasSpace, Space},
    math::{transform, transform_3x3, Transform},
    models::xyz::Xyz,
};

huespread_macros::gen_model! {
    /// A color specified in the sRGB color space with gamma encoding.
    pub struct Srgb {
        /// The red component of the color.
        pub red: Component,
        /// The green component of the color.
        pub green: Component,
        /// The blue component of the color.
        pub blue: Component,
    }
}

impl HasSpace for Srgb {
    const SPACE: Space = Space::Rgb;
}

huespread_macros::gen_model! {
    /// A color specified in the sRGB color space with no gamma encoding.
    pub struct SrgbLinear {
        /// The red component of the color.
        pub red: Component,
        /// The green component of the color.
        pub green: Component,
        /// The blue component of the color.
        pub blue: Component,
    }
}

impl Srgb {
    /// Convert this model from gamma encoded to linear light.
    pub fn to_linear_light(&self) -> SrgbLinear {
        self.to_components()
            .map(|value| {
                let abs = value.abs();

                if abs < 0.04045 {
                    value / 12.92
                } else {
                    value.signum() * ((abs + 0.055) / 1.055).powf(2.4)
                }
            })
            .into()
    }

    /// Clamp every component into `0..=1`.
    pub fn clamped(&self) -> Srgb {
        self.to_components().map(|v| v.clamp(0.0, 1.0)).into()
    }
}

impl SrgbLinear {
    /// Convert this model from linear light to gamma encoded.
    pub fn to_gamma_encoded(&self) -> Srgb {
        self.to_components()
            .map(|value| {
                let abs = value.abs();

                if abs > 0.0031308 {
                    value.signum() * (1.055 * abs.powf(1.0 / 2.4) - 0.055)
                } else {
                    12.92 * value
                }
            })
            .into()
    }

    /// Convert to CIE-XYZ with the sRGB primaries.
    pub fn to_xyz(&self) -> Xyz {
        #[rustfmt::skip]
        #[allow(clippy::excessive_precision)]
        const TO_XYZ: Transform = transform_3x3(
            0.4123907992659595,  0.21263900587151036, 0.01933081871559185,
            0.35758433938387796, 0.7151686787677559,  0.11919477979462599,
            0.1804807884018343,  0.07219231536073371, 0.9505321522496606,
        );

        transform(&TO_XYZ, self.to_components()).into()
    }
}

impl From<Xyz> for SrgbLinear {
    fn from(value: Xyz) -> Self {
        #[rustfmt::skip]
        #[allow(clippy::excessive_precision)]
        const FROM_XYZ: Transform = transform_3x3(
             3.2409699419045213, -0.9692436362808798,  0.05563007969699361,
            -1.5373831775700935,  1.8759675015077206, -0.20397695888897657,
            -0.4986107602930033,  0.04155505740717561, 1.0569715142428786,
        );

        transform(&FROM_XYZ, value.to_components()).into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assert_component_eq;

    #[test]
    fn gamma_round_trip() {
        for v in [0.0, 0.02, 0.04045, 0.2, 0.5, 0.9, 1.0] {
            let srgb = Srgb::new(v, v, v);
            let back = srgb.to_linear_light().to_gamma_encoded();
            assert_component_eq!(back.red, v);
        }
    }

    #[test]
    fn white_maps_onto_d65() {
        let xyz = Srgb::new(1.0, 1.0, 1.0).to_linear_light().to_xyz();
        assert_component_eq!(xyz.x, 0.9504559270516716);
        assert_component_eq!(xyz.y, 1.0);
        assert_component_eq!(xyz.z, 1.0890577507598784);
    }

    #[test]
    fn clamped_is_idempotent() {
        let srgb = Srgb::new(-0.2, 0.5, 1.7);
        assert_eq!(srgb.clamped(), Srgb::new(0.0, 0.5, 1.0));
        assert_eq!(srgb.clamped().clamped(), srgb.clamped());
    }
}
