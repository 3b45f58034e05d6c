//! Grow palettes: draw random colors, extend an existing palette, or add
//! colors in batches while everything already chosen stays frozen.

use rand::{rngs::StdRng, Rng, SeedableRng};

use crate::{
    color::{Anchors, Color, Component, Components, Space},
    error::{Error, Result},
    objective::ObjectiveConfig,
    optimize::{optimize_palette_with, OptimizeOptions},
};

/// How new colors are placed before they are optimized.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Seeding {
    /// Uniformly over the `rgb` cube.
    #[default]
    Random,
    /// Along the principal axis of the existing colors in Oklab, filling the
    /// widest gaps first. Falls back to [`Seeding::Random`] with fewer than
    /// two existing colors.
    DominantAxis,
}

/// Settings shared by the palette growing operations.
#[derive(Clone, Debug, PartialEq)]
pub struct GrowthOptions {
    /// Trade-off between diversity (0) and keeping the new colors where they
    /// were seeded (1).
    pub change_weight: Component,
    /// Synthetic frozen colors included in the objective.
    pub anchors: Anchors,
    /// Append the anchors to the result.
    pub keep_anchors: bool,
    /// Space of the returned colors. When unset, input colors are returned as
    /// given and new colors take the space of the first input color, or `rgb`
    /// when there is none.
    pub output_space: Option<Space>,
    /// Placement of new colors.
    pub seeding: Seeding,
    /// Settings for the diversity term.
    pub objective: ObjectiveConfig,
    /// Upper bound on iterations of every optimizer run.
    pub max_iterations: usize,
    /// Convergence tolerance of every optimizer run.
    pub tolerance: Component,
    /// Seed for [`GrowthOptions::rng`].
    pub seed: u64,
}

impl Default for GrowthOptions {
    fn default() -> Self {
        let optimize = OptimizeOptions::default();
        Self {
            change_weight: optimize.change_weight,
            anchors: Anchors::empty(),
            keep_anchors: false,
            output_space: None,
            seeding: Seeding::default(),
            objective: optimize.objective,
            max_iterations: optimize.max_iterations,
            tolerance: optimize.tolerance,
            seed: 0,
        }
    }
}

impl GrowthOptions {
    /// A generator seeded from [`GrowthOptions::seed`].
    pub fn rng(&self) -> StdRng {
        StdRng::seed_from_u64(self.seed)
    }

    /// Optimizer settings for one growth step. Anchors are never kept in
    /// intermediate results.
    fn optimize_options(&self, mask: Vec<bool>) -> OptimizeOptions {
        OptimizeOptions {
            change_weight: self.change_weight,
            mask: Some(mask),
            anchors: self.anchors,
            keep_anchors: false,
            output_space: Some(Space::Rgb),
            objective: self.objective.clone(),
            max_iterations: self.max_iterations,
            tolerance: self.tolerance,
            ..Default::default()
        }
    }

    /// Convert grown colors into the output space, `default_space` when none
    /// is set, and append the anchors if they are kept.
    fn finish(&self, colors: Vec<Color>, default_space: Space) -> Vec<Color> {
        let output_space = self.output_space.unwrap_or(default_space);
        let mut colors = colors
            .into_iter()
            .map(|color| color.to_space(output_space))
            .collect::<Vec<_>>();
        if self.keep_anchors {
            colors.extend(
                self.anchors
                    .colors()
                    .iter()
                    .map(|anchor| anchor.to_space(output_space)),
            );
        }
        colors
    }
}

fn random_color<R: Rng + ?Sized>(rng: &mut R) -> Color {
    Color::rgb(rng.gen(), rng.gen(), rng.gen())
}

/// Draw `n` uniform random colors and optimize them.
pub fn random_colors<R: Rng + ?Sized>(
    n: usize,
    options: &GrowthOptions,
    rng: &mut R,
) -> Result<Vec<Color>> {
    let colors = (0..n).map(|_| random_color(rng)).collect::<Vec<_>>();
    let optimized = optimize_palette_with(&colors, &options.optimize_options(vec![false; n]), rng)?;
    Ok(options.finish(optimized.colors, Space::Rgb))
}

/// Freeze `colors` and append new colors until there are `target` of them.
pub fn extend_colors<R: Rng + ?Sized>(
    colors: &[Color],
    target: usize,
    options: &GrowthOptions,
    rng: &mut R,
) -> Result<Vec<Color>> {
    if target <= colors.len() {
        return Err(Error::InvalidArgument(format!(
            "cannot extend {} colors to {target}",
            colors.len()
        )));
    }

    let default_space = colors.first().map_or(Space::Rgb, |color| color.space);
    let extended = extend(colors, target, options, rng)?;

    // The inputs come back as given unless an output space is asked for.
    let mut result = colors
        .iter()
        .map(|color| match options.output_space {
            Some(space) => color.to_space(space),
            None => color.clone(),
        })
        .collect::<Vec<_>>();
    result.extend(options.finish(
        extended.into_iter().skip(colors.len()).collect(),
        default_space,
    ));
    Ok(result)
}

/// Optimize `start` random colors, then keep adding batches of `increment`
/// colors with everything chosen so far frozen, until there are `total`.
/// The last batch is truncated to land on `total`.
pub fn random_incremental_colors<R: Rng + ?Sized>(
    total: usize,
    start: usize,
    increment: usize,
    options: &GrowthOptions,
    rng: &mut R,
) -> Result<Vec<Color>> {
    if start > total {
        return Err(Error::InvalidArgument(format!(
            "start ({start}) is larger than total ({total})"
        )));
    }
    if increment == 0 {
        return Err(Error::InvalidArgument(
            "increment must be at least 1".to_string(),
        ));
    }

    let initial = (0..start).map(|_| random_color(rng)).collect::<Vec<_>>();
    let mut colors = optimize_palette_with(
        &initial,
        &options.optimize_options(vec![false; start]),
        rng,
    )?
    .colors;

    while colors.len() < total {
        let target = (colors.len() + increment).min(total);
        tracing::debug!(from = colors.len(), to = target, "Growing palette");
        colors = extend(&colors, target, options, rng)?;
    }

    Ok(options.finish(colors, Space::Rgb))
}

/// Seed and optimize new colors. Results are in `rgb`.
fn extend<R: Rng + ?Sized>(
    colors: &[Color],
    target: usize,
    options: &GrowthOptions,
    rng: &mut R,
) -> Result<Vec<Color>> {
    let count = target - colors.len();
    let seeded = match options.seeding {
        Seeding::DominantAxis if colors.len() >= 2 => dominant_axis::seed(colors, count),
        Seeding::DominantAxis => {
            tracing::debug!(
                colors = colors.len(),
                "Too few colors for a dominant axis, seeding randomly"
            );
            (0..count).map(|_| random_color(rng)).collect()
        }
        Seeding::Random => (0..count).map(|_| random_color(rng)).collect(),
    };

    let mut all = colors.to_vec();
    all.extend(seeded);

    let mut mask = vec![true; colors.len()];
    mask.resize(target, false);

    Ok(optimize_palette_with(&all, &options.optimize_options(mask), rng)?.colors)
}

/// Place new colors along the principal axis of a palette in Oklab.
mod dominant_axis {
    use super::*;

    /// The part of Oklab new colors may be placed in.
    const LOWER: Components = Components(0.0, -0.5, -0.5);
    const UPPER: Components = Components(1.0, 0.5, 0.5);

    fn dot(a: Components, b: Components) -> Component {
        a.0 * b.0 + a.1 * b.1 + a.2 * b.2
    }

    /// Principal eigenvector of the covariance of the points by power
    /// iteration. Degenerate sets fall back to the lightness axis.
    fn principal_axis(points: &[Components], mean: Components) -> Components {
        let mut covariance = [[0.0; 3]; 3];
        for point in points {
            let d = (*point - mean).to_array();
            for (i, row) in covariance.iter_mut().enumerate() {
                for (j, cell) in row.iter_mut().enumerate() {
                    *cell += d[i] * d[j];
                }
            }
        }

        let fallback = Components(1.0, 0.0, 0.0);
        let mut axis = Components(1.0, 1.0, 1.0) * (1.0 / (3.0 as Component).sqrt());
        for _ in 0..64 {
            let next = Components(
                dot(covariance[0].into(), axis),
                dot(covariance[1].into(), axis),
                dot(covariance[2].into(), axis),
            );
            let length = next.length();
            if length < 1.0e-12 {
                return fallback;
            }
            axis = next * (1.0 / length);
        }
        axis
    }

    /// The range of `t` for which `mean + t * axis` stays inside the box.
    fn range(mean: Components, axis: Components) -> (Component, Component) {
        let mut low = Component::NEG_INFINITY;
        let mut high = Component::INFINITY;
        for ((m, a), (lower, upper)) in mean
            .to_array()
            .into_iter()
            .zip(axis.to_array())
            .zip(LOWER.to_array().into_iter().zip(UPPER.to_array()))
        {
            if a.abs() < 1.0e-12 {
                continue;
            }
            let t0 = (lower - m) / a;
            let t1 = (upper - m) / a;
            low = low.max(t0.min(t1));
            high = high.min(t0.max(t1));
        }
        (low, high)
    }

    pub fn seed(colors: &[Color], count: usize) -> Vec<Color> {
        let points = colors
            .iter()
            // Through the clamped hub so the mean stays inside the box.
            .map(|color| color.to_space(Space::Rgb).to_space(Space::Oklab).components)
            .collect::<Vec<_>>();
        let mean = points
            .iter()
            .fold(Components(0.0, 0.0, 0.0), |sum, p| sum + *p)
            * (1.0 / points.len() as Component);
        let axis = principal_axis(&points, mean);
        let (low, high) = range(mean, axis);

        let mut positions = points
            .iter()
            .map(|p| dot(*p - mean, axis).clamp(low, high))
            .collect::<Vec<_>>();
        positions.push(low);
        positions.push(high);

        let mut seeded = Vec::with_capacity(count);
        for _ in 0..count {
            positions.sort_by(|a, b| a.total_cmp(b));
            let (start, width) = positions
                .windows(2)
                .map(|w| (w[0], w[1] - w[0]))
                .fold((low, Component::NEG_INFINITY), |best, gap| {
                    if gap.1 > best.1 {
                        gap
                    } else {
                        best
                    }
                });
            let t = start + width / 2.0;
            positions.push(t);

            let p = mean + axis * t;
            let clamped = Components(
                p.0.clamp(LOWER.0, UPPER.0),
                p.1.clamp(LOWER.1, UPPER.1),
                p.2.clamp(LOWER.2, UPPER.2),
            );
            seeded.push(Color::new(Space::Oklab, clamped, 1.0).to_space(Space::Rgb));
        }
        seeded
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{assert_component_eq, objective::min_distance};

    fn palette(literals: &[&str]) -> Vec<Color> {
        literals.iter().map(|l| l.parse().unwrap()).collect()
    }

    #[test]
    fn random_colors_are_reproducible() {
        let options = GrowthOptions {
            seed: 3,
            ..Default::default()
        };
        let a = random_colors(8, &options, &mut options.rng()).unwrap();
        let b = random_colors(8, &options, &mut options.rng()).unwrap();
        assert_eq!(a.len(), 8);
        assert_eq!(a, b);
        assert!(a.iter().all(|c| c.space == Space::Rgb && c.in_gamut()));

        assert!(random_colors(0, &options, &mut options.rng())
            .unwrap()
            .is_empty());
    }

    #[test]
    fn extend_keeps_the_inputs() {
        let colors = palette(&["#df928e", "#f4b942", "#3c4f76"]);
        let options = GrowthOptions::default();
        let extended = extend_colors(&colors, 8, &options, &mut options.rng()).unwrap();
        assert_eq!(extended.len(), 8);
        assert_eq!(&extended[..3], &colors[..]);
        assert!(extended.iter().all(|c| c.space == Space::Hex));
    }

    #[test]
    fn extend_keeps_inputs_of_any_space() {
        let colors = vec![
            "#df928e".parse::<Color>().unwrap(),
            Color::new(Space::Oklab, Components(0.5, 0.1, -0.1), 1.0),
            "#3c4f76".parse::<Color>().unwrap(),
        ];
        let options = GrowthOptions::default();
        let extended = extend_colors(&colors, 5, &options, &mut options.rng()).unwrap();
        assert_eq!(&extended[..3], &colors[..]);
        assert!(extended[3..].iter().all(|c| c.space == Space::Hex));

        let options = GrowthOptions {
            output_space: Some(Space::Rgb),
            ..Default::default()
        };
        let extended = extend_colors(&colors, 5, &options, &mut options.rng()).unwrap();
        assert_eq!(extended[1], colors[1].to_space(Space::Rgb));
        assert!(extended.iter().all(|c| c.space == Space::Rgb));
    }

    #[test]
    fn extend_needs_a_larger_target() {
        let colors = palette(&["#df928e", "#f4b942", "#3c4f76"]);
        let options = GrowthOptions::default();
        for target in [0, 2, 3] {
            assert!(matches!(
                extend_colors(&colors, target, &options, &mut options.rng()),
                Err(Error::InvalidArgument(_))
            ));
        }
    }

    #[test]
    fn dominant_axis_fills_the_widest_gap() {
        let colors = vec![Color::rgb(0.1, 0.1, 0.1), Color::rgb(0.9, 0.9, 0.9)];
        let options = GrowthOptions {
            seeding: Seeding::DominantAxis,
            change_weight: 1.0,
            ..Default::default()
        };
        let extended = extend_colors(&colors, 3, &options, &mut options.rng()).unwrap();
        let new = &extended[2];
        assert_component_eq!(new.components.0, new.components.1, 1.0e-3);
        assert_component_eq!(new.components.1, new.components.2, 1.0e-3);
        assert!(new.components.0 > 0.1 && new.components.0 < 0.9);
    }

    #[test]
    fn dominant_axis_falls_back_to_random() {
        let colors = vec![Color::rgb(0.5, 0.5, 0.5)];
        let options = GrowthOptions {
            seeding: Seeding::DominantAxis,
            ..Default::default()
        };
        let extended = extend_colors(&colors, 3, &options, &mut options.rng()).unwrap();
        assert_eq!(extended.len(), 3);
        assert_eq!(extended[0], colors[0]);
    }

    #[test]
    fn incremental_batches_reach_the_total() {
        let options = GrowthOptions::default();
        let colors = random_incremental_colors(12, 4, 1, &options, &mut options.rng()).unwrap();
        assert_eq!(colors.len(), 12);

        // 3 + 3 + 1
        let colors = random_incremental_colors(7, 3, 3, &options, &mut options.rng()).unwrap();
        assert_eq!(colors.len(), 7);

        let colors = random_incremental_colors(4, 4, 2, &options, &mut options.rng()).unwrap();
        assert_eq!(colors.len(), 4);
    }

    #[test]
    fn incremental_rejects_bad_batches() {
        let options = GrowthOptions::default();
        assert!(matches!(
            random_incremental_colors(4, 5, 1, &options, &mut options.rng()),
            Err(Error::InvalidArgument(_))
        ));
        assert!(matches!(
            random_incremental_colors(8, 4, 0, &options, &mut options.rng()),
            Err(Error::InvalidArgument(_))
        ));
    }

    #[test]
    fn incremental_colors_are_spread_apart() {
        let options = GrowthOptions::default();
        let seeds = 10;
        let mut grown = 0.0;
        let mut baseline = 0.0;
        for seed in 0..seeds {
            let mut rng = StdRng::seed_from_u64(seed);
            let colors = random_incremental_colors(12, 4, 1, &options, &mut rng).unwrap();
            grown += min_distance(&colors[..5]);

            let mut other = StdRng::seed_from_u64(1000 + seed);
            let mut naive = colors[..4].to_vec();
            naive.push(random_color(&mut other));
            baseline += min_distance(&naive);
        }
        assert!(grown > baseline, "grown {grown}, baseline {baseline}");
    }

    #[test]
    fn anchors_are_kept_on_request() {
        let options = GrowthOptions {
            anchors: Anchors::all(),
            keep_anchors: true,
            output_space: Some(Space::Hex),
            ..Default::default()
        };
        let colors = random_colors(3, &options, &mut options.rng()).unwrap();
        assert_eq!(colors.len(), 5);
        assert_eq!(colors[3].to_string(), "#000000");
        assert_eq!(colors[4].to_string(), "#ffffff");
    }
}
