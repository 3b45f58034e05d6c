//! Score a set of colors for how far apart they are, both for normal vision
//! and for each simulated dichromacy, against how far they moved from where
//! they started.
//!
//! ```text
//! diversity = (1 - c) * normal + c * mean(colorblind)
//! score     = (1 - w) * diversity - w * fidelity
//! ```
//!
//! `normal` and each `colorblind` entry are soft minima over the distance of
//! every unordered pair in one view, `fidelity` is the summed squared
//! displacement in `rgb` of the colors that are allowed to move.

use crate::{
    color::{Color, Component, Components, Space},
    colorblind::Profile,
    error::{Error, Result},
};

/// Settings for the diversity term.
#[derive(Clone, Debug, PartialEq)]
pub struct ObjectiveConfig {
    /// The space in which pairwise distances are measured.
    pub metric_space: Space,
    /// Simulated views scored in addition to normal vision.
    pub profiles: Vec<Profile>,
    /// Share of the diversity term given to the simulated views (1) rather
    /// than to normal vision (0). Ignored when there are no profiles.
    pub colorblind_weight: Component,
    /// Temperature of the soft minimum. Smaller values approach the hard
    /// minimum.
    pub softness: Component,
}

impl Default for ObjectiveConfig {
    fn default() -> Self {
        Self {
            metric_space: Space::Oklab,
            profiles: Profile::battery(),
            colorblind_weight: 0.5,
            softness: 0.01,
        }
    }
}

impl ObjectiveConfig {
    pub(crate) fn validate(&self) -> Result<()> {
        if !(self.softness > 0.0) {
            return Err(Error::InvalidArgument(format!(
                "softness must be positive, got {}",
                self.softness
            )));
        }
        if !(0.0..=1.0).contains(&self.colorblind_weight) {
            return Err(Error::InvalidArgument(format!(
                "colorblind weight must be in 0..=1, got {}",
                self.colorblind_weight
            )));
        }
        Ok(())
    }

    /// Soft minimum of the pairwise distances of the points as seen with
    /// `profile`, measured in the metric space.
    fn view(&self, points: &[Components], profile: Profile) -> Component {
        let projected = points
            .iter()
            .map(|rgb| {
                Color::new(Space::Rgb, profile.apply(*rgb), 1.0)
                    .to_space(self.metric_space)
                    .components
            })
            .collect::<Vec<_>>();
        soft_min(&pair_distances(&projected), self.softness)
    }

    pub(crate) fn diversity(&self, points: &[Components]) -> Component {
        let c = self.colorblind_weight;
        if self.profiles.is_empty() {
            return self.view(points, Profile::NORMAL);
        }

        let normal = if c < 1.0 {
            self.view(points, Profile::NORMAL)
        } else {
            0.0
        };
        let colorblind = if c > 0.0 {
            self.profiles
                .iter()
                .map(|profile| self.view(points, *profile))
                .sum::<Component>()
                / self.profiles.len() as Component
        } else {
            0.0
        };
        (1.0 - c) * normal + c * colorblind
    }

    /// Hard minimum of the pairwise distances under normal vision.
    pub(crate) fn separation(&self, points: &[Components]) -> Component {
        let projected = points
            .iter()
            .map(|rgb| Color::new(Space::Rgb, *rgb, 1.0).to_space(self.metric_space).components)
            .collect::<Vec<_>>();
        pair_distances(&projected)
            .into_iter()
            .reduce(Component::min)
            .unwrap_or(0.0)
    }
}

/// Euclidean distance of every unordered pair.
fn pair_distances(points: &[Components]) -> Vec<Component> {
    let mut distances = Vec::with_capacity(points.len() * points.len().saturating_sub(1) / 2);
    for (i, a) in points.iter().enumerate() {
        for b in &points[i + 1..] {
            distances.push((*a - *b).length());
        }
    }
    distances
}

/// `-t * ln(sum(exp(-d / t)))`, shifted by the hard minimum so the
/// exponentials can not underflow. Zero when there are no distances.
pub(crate) fn soft_min(distances: &[Component], softness: Component) -> Component {
    let Some(min) = distances.iter().copied().reduce(Component::min) else {
        return 0.0;
    };
    let sum = distances
        .iter()
        .map(|d| (-(d - min) / softness).exp())
        .sum::<Component>();
    min - softness * sum.ln()
}

/// The objective the optimizer maximizes.
///
/// Candidates are given in `rgb` components, in the same order as the
/// originals. Entries marked frozen never contribute to the fidelity term.
pub struct Objective<'a> {
    config: &'a ObjectiveConfig,
    originals: Vec<Components>,
    frozen: Vec<bool>,
    change_weight: Component,
}

impl<'a> Objective<'a> {
    /// Build an objective around the starting colors.
    pub fn new(
        config: &'a ObjectiveConfig,
        originals: &[Color],
        frozen: &[bool],
        change_weight: Component,
    ) -> Result<Self> {
        if frozen.len() != originals.len() {
            return Err(Error::Constraint {
                mask: frozen.len(),
                colors: originals.len(),
            });
        }
        if !(0.0..=1.0).contains(&change_weight) {
            return Err(Error::InvalidArgument(format!(
                "change weight must be in 0..=1, got {change_weight}"
            )));
        }
        config.validate()?;

        Ok(Self {
            config,
            originals: originals.iter().map(canonical_rgb).collect(),
            frozen: frozen.to_vec(),
            change_weight,
        })
    }

    /// Score candidate colors. Higher is better.
    pub fn score(&self, candidates: &[Color]) -> Component {
        let points = candidates.iter().map(canonical_rgb).collect::<Vec<_>>();
        self.score_rgb(&points)
    }

    pub(crate) fn score_rgb(&self, points: &[Components]) -> Component {
        let w = self.change_weight;
        let diversity = if w < 1.0 {
            self.config.diversity(points)
        } else {
            0.0
        };
        (1.0 - w) * diversity - w * self.fidelity(points)
    }

    fn fidelity(&self, points: &[Components]) -> Component {
        points
            .iter()
            .zip(&self.originals)
            .zip(&self.frozen)
            .filter(|(_, frozen)| !**frozen)
            .map(|((point, original), _)| (*point - *original).length_squared())
            .sum()
    }
}

/// The gamma encoded sRGB components of a color, clamped into `0..=1`.
pub(crate) fn canonical_rgb(color: &Color) -> Components {
    color.to_srgb().clamped().to_components()
}

/// The smallest OKLAB distance between any two colors. Zero when there are
/// fewer than two colors.
pub fn min_distance(colors: &[Color]) -> Component {
    let points = colors
        .iter()
        .map(|color| color.to_space(Space::Oklab).components)
        .collect::<Vec<_>>();
    pair_distances(&points)
        .into_iter()
        .reduce(Component::min)
        .unwrap_or(0.0)
}

/// The mean of [`min_distance`] over the colors as seen with each profile.
pub fn colorblind_score(colors: &[Color], profiles: &[Profile]) -> Component {
    if profiles.is_empty() {
        return 0.0;
    }
    let total = profiles
        .iter()
        .map(|profile| {
            let simulated = colors
                .iter()
                .map(|color| crate::colorblind::simulate(color, *profile))
                .collect::<Vec<_>>();
            min_distance(&simulated)
        })
        .sum::<Component>();
    total / profiles.len() as Component
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assert_component_eq;

    #[test]
    fn soft_min_approaches_min() {
        assert_eq!(soft_min(&[], 0.01), 0.0);
        assert_component_eq!(soft_min(&[0.3], 0.01), 0.3);

        let distances = [0.2, 0.5, 0.9];
        let soft = soft_min(&distances, 0.001);
        assert!(soft <= 0.2);
        assert_component_eq!(soft, 0.2, 1.0e-6);

        // Two equal distances lower the soft minimum by t * ln(2).
        assert_component_eq!(soft_min(&[0.2, 0.2], 0.01), 0.2 - 0.01 * 2.0f64.ln());
    }

    #[test]
    fn black_and_white_are_one_apart() {
        let colors = [Color::rgb(0.0, 0.0, 0.0), Color::rgb(1.0, 1.0, 1.0)];
        assert_component_eq!(min_distance(&colors), 1.0, 1.0e-3);
        assert_component_eq!(
            colorblind_score(&colors, &Profile::battery()),
            1.0,
            1.0e-3
        );
        assert_eq!(min_distance(&colors[..1]), 0.0);
    }

    #[test]
    fn colorblind_score_sees_confusion() {
        // Red and green are far apart for normal vision but close together
        // for a deuteranope.
        let colors = [Color::rgb(0.8, 0.3, 0.2), Color::rgb(0.45, 0.5, 0.1)];
        let normal = min_distance(&colors);
        let deutan = colorblind_score(&colors, &[Profile::DEUTERANOPIA]);
        assert!(deutan < normal);
    }

    #[test]
    fn colorblind_weight_picks_the_views() {
        // Far apart for normal vision, close together for a deuteranope.
        let points = [Components(0.8, 0.3, 0.2), Components(0.45, 0.5, 0.1)];
        let colors = points.map(|p| Color::new(Space::Rgb, p, 1.0));

        let normal_only = ObjectiveConfig {
            colorblind_weight: 0.0,
            ..Default::default()
        };
        let no_profiles = ObjectiveConfig {
            profiles: vec![],
            ..Default::default()
        };
        assert_component_eq!(normal_only.diversity(&points), min_distance(&colors));
        assert_component_eq!(no_profiles.diversity(&points), min_distance(&colors));

        let deutan_only = ObjectiveConfig {
            profiles: vec![Profile::DEUTERANOPIA],
            colorblind_weight: 1.0,
            ..Default::default()
        };
        assert_component_eq!(
            deutan_only.diversity(&points),
            colorblind_score(&colors, &[Profile::DEUTERANOPIA])
        );
        assert!(deutan_only.diversity(&points) < normal_only.diversity(&points));

        let halfway = ObjectiveConfig {
            profiles: vec![Profile::DEUTERANOPIA],
            ..Default::default()
        };
        assert_component_eq!(
            halfway.diversity(&points),
            0.5 * normal_only.diversity(&points) + 0.5 * deutan_only.diversity(&points)
        );
    }

    #[test]
    fn separation_is_the_normal_view_minimum() {
        let config = ObjectiveConfig::default();
        let points = [
            Components(0.0, 0.0, 0.0),
            Components(1.0, 1.0, 1.0),
            Components(0.5, 0.5, 0.5),
        ];
        let colors = points.map(|p| Color::new(Space::Rgb, p, 1.0));
        assert_component_eq!(config.separation(&points), min_distance(&colors));
        assert_eq!(config.separation(&points[..1]), 0.0);
    }

    #[test]
    fn change_weight_trades_diversity_against_fidelity() {
        let config = ObjectiveConfig::default();
        let originals = [Color::rgb(0.2, 0.2, 0.2), Color::rgb(0.8, 0.8, 0.8)];
        let moved = [Color::rgb(0.0, 0.0, 0.0), Color::rgb(1.0, 1.0, 1.0)];
        let frozen = [false, false];

        let diversity_only = Objective::new(&config, &originals, &frozen, 0.0).unwrap();
        assert!(diversity_only.score(&moved) > diversity_only.score(&originals));

        let fidelity_only = Objective::new(&config, &originals, &frozen, 1.0).unwrap();
        assert_eq!(fidelity_only.score(&originals), 0.0);
        assert_component_eq!(fidelity_only.score(&moved), -0.24);
    }

    #[test]
    fn frozen_colors_do_not_count_towards_fidelity() {
        let config = ObjectiveConfig::default();
        let originals = [Color::rgb(0.2, 0.2, 0.2), Color::rgb(0.8, 0.8, 0.8)];
        let moved = [Color::rgb(0.0, 0.0, 0.0), Color::rgb(0.8, 0.8, 0.8)];

        let objective = Objective::new(&config, &originals, &[true, false], 1.0).unwrap();
        assert_eq!(objective.score(&moved), 0.0);
    }

    #[test]
    fn rejects_bad_arguments() {
        let config = ObjectiveConfig::default();
        let originals = [Color::rgb(0.2, 0.2, 0.2)];
        assert_eq!(
            Objective::new(&config, &originals, &[true, false], 0.5).err(),
            Some(Error::Constraint { mask: 2, colors: 1 })
        );
        assert!(matches!(
            Objective::new(&config, &originals, &[false], 1.5),
            Err(Error::InvalidArgument(_))
        ));

        let config = ObjectiveConfig {
            softness: 0.0,
            ..Default::default()
        };
        assert!(Objective::new(&config, &originals, &[false], 0.5).is_err());

        let config = ObjectiveConfig {
            colorblind_weight: 1.5,
            ..Default::default()
        };
        assert!(matches!(
            Objective::new(&config, &originals, &[false], 0.5),
            Err(Error::InvalidArgument(_))
        ));
    }
}
