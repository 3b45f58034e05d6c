//! Mixing, gradients and ordering of colors.

use crate::{
    color::{Color, Component, Components, Space},
    math::lerp,
};

/// The space used for interpolation when the caller has no preference.
pub const DEFAULT_INTERPOLATION_SPACE: Space = Space::Oklab;

impl Color {
    /// Linearly interpolate from this color to another in the color space
    /// specified using `t` as the progress between them. The result is in the
    /// space of this color.
    pub fn mix(&self, other: &Self, t: Component, space: Space) -> Color {
        let left = self.to_space(space);
        let right = other.to_space(space);

        let Components(l0, l1, l2) = left.components;
        let Components(r0, r1, r2) = right.components;

        Color::new(
            space,
            Components(lerp(l0, r0, t), lerp(l1, r1, t), lerp(l2, r2, t)),
            lerp(left.alpha, right.alpha, t),
        )
        .to_space(self.space)
    }
}

/// Return `steps` colors evenly spaced from `a` to `b`, both included.
pub fn interpolate(a: &Color, b: &Color, steps: usize, space: Space) -> Vec<Color> {
    match steps {
        0 => vec![],
        1 => vec![a.clone()],
        _ => (0..steps)
            .map(|i| a.mix(b, i as Component / (steps - 1) as Component, space))
            .collect(),
    }
}

/// Return `steps` colors along the piecewise linear path through `colors`.
/// The input colors are spread uniformly along the path, the first and last
/// are included. Results are in the space of the first color.
pub fn interpolate_series(colors: &[Color], steps: usize, space: Space) -> Vec<Color> {
    let Some(first) = colors.first() else {
        return vec![];
    };
    if colors.len() == 1 || steps < 2 {
        return vec![first.clone(); steps];
    }

    let segments = (colors.len() - 1) as Component;
    (0..steps)
        .map(|i| {
            let position = segments * i as Component / (steps - 1) as Component;
            let index = (position.floor() as usize).min(colors.len() - 2);
            let t = position - index as Component;
            colors[index]
                .mix(&colors[index + 1], t, space)
                .to_space(first.space)
        })
        .collect()
}

/// Sort colors by their HSV hue. Colors with equal hue keep their order.
pub fn hue_sort(colors: &[Color]) -> Vec<Color> {
    let mut keyed = colors
        .iter()
        .map(|color| (color.to_space(Space::Hsv).components.0, color.clone()))
        .collect::<Vec<_>>();
    keyed.sort_by(|(a, _), (b, _)| a.total_cmp(b));
    keyed.into_iter().map(|(_, color)| color).collect()
}
