//! Spread the unfrozen colors of a palette apart by maximizing the
//! [`Objective`](crate::objective::Objective).
//!
//! Every free `rgb` channel is optimized through a logistic
//! reparametrization, so the search space is unbounded while the colors stay
//! inside the gamut. Frozen colors and anchors are fixed points the free
//! colors are pushed away from.

use rand::{rngs::StdRng, Rng, SeedableRng};

use crate::{
    color::{Anchors, Color, Component, Components, Space},
    error::{Error, Result},
    math::{logit, sigmoid},
    objective::{canonical_rgb, Objective, ObjectiveConfig},
};

/// Free channels start this far inside the gamut so the logit stays finite.
const LATENT_MARGIN: Component = 1.0e-3;

/// Settings for [`optimize_palette`].
#[derive(Clone, Debug, PartialEq)]
pub struct OptimizeOptions {
    /// Trade-off between diversity (0) and keeping the colors where they are
    /// (1).
    pub change_weight: Component,
    /// Colors marked `true` are returned exactly as given. `None` leaves every
    /// color free.
    pub mask: Option<Vec<bool>>,
    /// Synthetic frozen colors included in the objective.
    pub anchors: Anchors,
    /// Append the anchors to the result.
    pub keep_anchors: bool,
    /// Space of the returned colors. When unset, frozen colors keep their own
    /// space and the others take the space of the first color.
    pub output_space: Option<Space>,
    /// Settings for the diversity term.
    pub objective: ObjectiveConfig,
    /// Upper bound on optimizer iterations.
    pub max_iterations: usize,
    /// Stop once an iteration improves the score by less than this.
    pub tolerance: Component,
    /// Magnitude of the random perturbation applied to the starting point.
    pub jitter: Component,
    /// Seed for [`optimize_palette`].
    pub seed: u64,
}

impl Default for OptimizeOptions {
    fn default() -> Self {
        Self {
            change_weight: 0.1,
            mask: None,
            anchors: Anchors::empty(),
            keep_anchors: false,
            output_space: None,
            objective: ObjectiveConfig::default(),
            max_iterations: 200,
            tolerance: 1.0e-9,
            jitter: 1.0e-3,
            seed: 0,
        }
    }
}

/// The result of an optimization.
#[derive(Clone, Debug, PartialEq)]
pub struct Optimized {
    /// The optimized colors, in input order, followed by the anchors when
    /// they are kept.
    pub colors: Vec<Color>,
    /// Final value of the objective.
    pub score: Component,
    /// Number of optimizer iterations that ran.
    pub iterations: usize,
    /// False if the iteration budget ran out first.
    pub converged: bool,
}

/// Optimize a palette with a generator seeded from `options.seed`.
pub fn optimize_palette(colors: &[Color], options: &OptimizeOptions) -> Result<Optimized> {
    let mut rng = StdRng::seed_from_u64(options.seed);
    optimize_palette_with(colors, options, &mut rng)
}

/// Optimize a palette, drawing the starting jitter from `rng`.
pub fn optimize_palette_with<R: Rng + ?Sized>(
    colors: &[Color],
    options: &OptimizeOptions,
    rng: &mut R,
) -> Result<Optimized> {
    let frozen = match &options.mask {
        Some(mask) if mask.len() != colors.len() => {
            return Err(Error::Constraint {
                mask: mask.len(),
                colors: colors.len(),
            })
        }
        Some(mask) => mask.clone(),
        None => vec![false; colors.len()],
    };
    if !(options.jitter >= 0.0) || !(options.tolerance >= 0.0) {
        return Err(Error::InvalidArgument(
            "jitter and tolerance must not be negative".to_string(),
        ));
    }

    let Some(first) = colors.first() else {
        return Ok(Optimized {
            colors: vec![],
            score: 0.0,
            iterations: 0,
            converged: true,
        });
    };
    // Anchors join the objective as frozen colors after the inputs.
    let anchors = options.anchors.colors();
    let mut originals = colors.to_vec();
    originals.extend(anchors.iter().cloned());
    let mut all_frozen = frozen.clone();
    all_frozen.extend(anchors.iter().map(|_| true));

    let objective = Objective::new(
        &options.objective,
        &originals,
        &all_frozen,
        options.change_weight,
    )?;

    let base = originals.iter().map(canonical_rgb).collect::<Vec<_>>();
    let free = (0..colors.len()).filter(|i| !frozen[*i]).collect::<Vec<_>>();

    let decode = |x: &[Component]| {
        let mut points = base.clone();
        for (slot, index) in free.iter().enumerate() {
            let c = &x[slot * 3..slot * 3 + 3];
            points[*index] = Components(sigmoid(c[0]), sigmoid(c[1]), sigmoid(c[2]));
        }
        points
    };

    let (mut points, mut score, iterations, converged) = if free.is_empty()
        || options.change_weight >= 1.0
    {
        (base.clone(), objective.score_rgb(&base), 0, true)
    } else {
        let mut x0 = Vec::with_capacity(free.len() * 3);
        for index in &free {
            for v in base[*index].to_array() {
                x0.push(logit(v.clamp(LATENT_MARGIN, 1.0 - LATENT_MARGIN)));
            }
        }
        if options.jitter > 0.0 {
            for v in x0.iter_mut() {
                *v += rng.gen_range(-options.jitter..=options.jitter);
            }
        }

        tracing::debug!(
            colors = colors.len(),
            free = free.len(),
            anchors = anchors.len(),
            dimension = x0.len(),
            "Optimizing palette"
        );

        let minimum = bfgs::minimize(
            |x| -objective.score_rgb(&decode(x)),
            x0,
            &bfgs::Settings {
                max_iterations: options.max_iterations,
                tolerance: options.tolerance,
                ..Default::default()
            },
        );

        (
            decode(&minimum.x),
            -minimum.value,
            minimum.iterations,
            minimum.converged,
        )
    };

    // The result is never less separated under normal vision than the input.
    let before = options.objective.separation(&base[..colors.len()]);
    let after = options.objective.separation(&points[..colors.len()]);
    if after < before {
        tracing::debug!(before, after, "Optimization reduced separation, keeping the input");
        points = base.clone();
        score = objective.score_rgb(&base);
    }

    if converged {
        tracing::debug!(iterations, score, "Palette optimization converged");
    } else {
        tracing::warn!(
            iterations,
            score,
            "Palette optimization stopped at the iteration limit before converging"
        );
    }

    // Frozen colors keep their own space unless one is asked for.
    let free_space = options.output_space.unwrap_or(first.space);
    let mut result = colors
        .iter()
        .zip(&points)
        .zip(&frozen)
        .map(|((color, point), frozen)| match (*frozen, options.output_space) {
            (true, None) => color.clone(),
            (true, Some(space)) => color.to_space(space),
            (false, _) => Color::new(Space::Rgb, *point, color.alpha).to_space(free_space),
        })
        .collect::<Vec<_>>();
    if options.keep_anchors {
        result.extend(anchors.iter().map(|anchor| anchor.to_space(free_space)));
    }

    Ok(Optimized {
        colors: result,
        score,
        iterations,
        converged,
    })
}

/// Quasi-Newton minimization with numerical gradients.
mod bfgs {
    use crate::color::Component;

    /// Step used for central differences.
    const DIFFERENCE_STEP: Component = 1.0e-6;
    /// Sufficient decrease constant of the Armijo condition.
    const ARMIJO: Component = 1.0e-4;
    const MAX_HALVINGS: usize = 40;

    pub struct Settings {
        pub max_iterations: usize,
        pub tolerance: Component,
        pub gradient_tolerance: Component,
        pub max_step: Component,
    }

    impl Default for Settings {
        fn default() -> Self {
            Self {
                max_iterations: 200,
                tolerance: 1.0e-9,
                gradient_tolerance: 1.0e-7,
                max_step: 2.0,
            }
        }
    }

    pub struct Minimum {
        pub x: Vec<Component>,
        pub value: Component,
        pub iterations: usize,
        pub converged: bool,
    }

    fn dot(a: &[Component], b: &[Component]) -> Component {
        a.iter().zip(b).map(|(a, b)| a * b).sum()
    }

    fn identity(n: usize) -> Vec<Component> {
        let mut m = vec![0.0; n * n];
        for i in 0..n {
            m[i * n + i] = 1.0;
        }
        m
    }

    /// `m * v` for a square row major matrix.
    fn mul(m: &[Component], v: &[Component]) -> Vec<Component> {
        m.chunks(v.len()).map(|row| dot(row, v)).collect()
    }

    fn gradient(f: &impl Fn(&[Component]) -> Component, x: &[Component]) -> Vec<Component> {
        let mut shifted = x.to_vec();
        (0..x.len())
            .map(|i| {
                shifted[i] = x[i] + DIFFERENCE_STEP;
                let forward = f(&shifted);
                shifted[i] = x[i] - DIFFERENCE_STEP;
                let backward = f(&shifted);
                shifted[i] = x[i];
                (forward - backward) / (2.0 * DIFFERENCE_STEP)
            })
            .collect()
    }

    /// Backtracking until the Armijo condition holds.
    fn line_search(
        f: &impl Fn(&[Component]) -> Component,
        x: &[Component],
        fx: Component,
        direction: &[Component],
        slope: Component,
    ) -> Option<(Vec<Component>, Component)> {
        let mut alpha = 1.0;
        for _ in 0..MAX_HALVINGS {
            let candidate = x
                .iter()
                .zip(direction)
                .map(|(x, p)| x + alpha * p)
                .collect::<Vec<_>>();
            let value = f(&candidate);
            if value <= fx + ARMIJO * alpha * slope {
                return Some((candidate, value));
            }
            alpha *= 0.5;
        }
        None
    }

    /// Inverse Hessian update:
    /// `H + (s.y + y.Hy) ss^T / (s.y)^2 - (Hy s^T + s (Hy)^T) / s.y`.
    fn update(h: &mut [Component], s: &[Component], y: &[Component], sy: Component) {
        let n = s.len();
        let hy = mul(h, y);
        let yhy = dot(y, &hy);
        let scale = (sy + yhy) / (sy * sy);
        for i in 0..n {
            for j in 0..n {
                h[i * n + j] += scale * s[i] * s[j] - (hy[i] * s[j] + s[i] * hy[j]) / sy;
            }
        }
    }

    pub fn minimize(
        f: impl Fn(&[Component]) -> Component,
        x0: Vec<Component>,
        settings: &Settings,
    ) -> Minimum {
        let n = x0.len();
        let mut x = x0;
        let mut value = f(&x);
        let mut g = gradient(&f, &x);
        let mut h = identity(n);
        let mut fresh = true;
        let mut iterations = 0;
        let mut converged = n == 0;

        while !converged && iterations < settings.max_iterations {
            if g.iter().all(|v| v.abs() < settings.gradient_tolerance) {
                converged = true;
                break;
            }

            let mut direction = mul(&h, &g).into_iter().map(|v| -v).collect::<Vec<_>>();
            if dot(&direction, &g) >= 0.0 {
                h = identity(n);
                fresh = true;
                direction = g.iter().map(|v| -v).collect();
            }
            let length = dot(&direction, &direction).sqrt();
            if length > settings.max_step {
                let scale = settings.max_step / length;
                direction.iter_mut().for_each(|v| *v *= scale);
            }
            let slope = dot(&direction, &g);

            iterations += 1;
            let Some((next, next_value)) = line_search(&f, &x, value, &direction, slope) else {
                if fresh {
                    // Not even steepest descent makes progress.
                    converged = true;
                } else {
                    h = identity(n);
                    fresh = true;
                }
                continue;
            };

            let next_g = gradient(&f, &next);
            let s = next.iter().zip(&x).map(|(a, b)| a - b).collect::<Vec<_>>();
            let y = next_g.iter().zip(&g).map(|(a, b)| a - b).collect::<Vec<_>>();
            let improvement = value - next_value;

            x = next;
            value = next_value;
            g = next_g;

            let sy = dot(&s, &y);
            if sy > 1.0e-12 {
                update(&mut h, &s, &y, sy);
                fresh = false;
            } else {
                h = identity(n);
                fresh = true;
            }

            tracing::trace!(iterations, value, improvement, "BFGS step");

            if improvement < settings.tolerance {
                converged = true;
            }
        }

        Minimum {
            x,
            value,
            iterations,
            converged,
        }
    }

}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::objective::min_distance;

    fn palette(literals: &[&str]) -> Vec<Color> {
        literals.iter().map(|l| l.parse().unwrap()).collect()
    }

    fn random_rgb(rng: &mut StdRng, n: usize) -> Vec<Color> {
        (0..n)
            .map(|_| Color::rgb(rng.gen(), rng.gen(), rng.gen()))
            .collect()
    }

    #[test]
    fn frozen_colors_are_returned_exactly() {
        let colors = palette(&["#df928e", "#f4b942", "#3c4f76", "#4b7f52"]);
        let options = OptimizeOptions {
            mask: Some(vec![true, false, true, false]),
            ..Default::default()
        };
        let result = optimize_palette(&colors, &options).unwrap();
        assert_eq!(result.colors.len(), 4);
        assert_eq!(result.colors[0], colors[0]);
        assert_eq!(result.colors[2], colors[2]);
        assert!(result.colors.iter().all(|c| c.space == Space::Hex));
    }

    #[test]
    fn mask_must_match_colors() {
        let colors = palette(&["#df928e", "#f4b942", "#3c4f76"]);
        let options = OptimizeOptions {
            mask: Some(vec![true, false]),
            ..Default::default()
        };
        assert_eq!(
            optimize_palette(&colors, &options),
            Err(Error::Constraint { mask: 2, colors: 3 })
        );
    }

    #[test]
    fn change_weight_must_be_a_fraction() {
        let colors = palette(&["#df928e", "#f4b942"]);
        let options = OptimizeOptions {
            change_weight: -0.1,
            ..Default::default()
        };
        assert!(matches!(
            optimize_palette(&colors, &options),
            Err(Error::InvalidArgument(_))
        ));
    }

    #[test]
    fn full_change_weight_is_identity() {
        let colors = palette(&["#df928e", "#f4b942", "#3c4f76"]);
        let options = OptimizeOptions {
            change_weight: 1.0,
            ..Default::default()
        };
        let result = optimize_palette(&colors, &options).unwrap();
        assert_eq!(result.colors, colors);
        assert!(result.converged);
    }

    #[test]
    fn high_change_weight_moves_colors_little() {
        let colors = palette(&["#df928e", "#f4b942", "#3c4f76"]);
        let options = OptimizeOptions {
            change_weight: 0.95,
            output_space: Some(Space::Rgb),
            ..Default::default()
        };
        let result = optimize_palette(&colors, &options).unwrap();

        for (before, after) in colors.iter().zip(&result.colors) {
            let moved = (before.to_space(Space::Rgb).components - after.components).length();
            assert!(moved < 0.1, "moved {moved}");
        }
        assert!(min_distance(&result.colors) >= min_distance(&colors) - 1.0e-9);
    }

    #[test]
    fn frozen_colors_keep_their_space() {
        let colors = vec![
            "#df928e".parse::<Color>().unwrap(),
            Color::new(Space::Oklab, Components(0.5, 0.1, -0.1), 1.0),
            "#3c4f76".parse::<Color>().unwrap(),
        ];
        let options = OptimizeOptions {
            mask: Some(vec![false, true, false]),
            ..Default::default()
        };
        let result = optimize_palette(&colors, &options).unwrap();
        assert_eq!(result.colors[1], colors[1]);
        assert_eq!(result.colors[0].space, Space::Hex);
        assert_eq!(result.colors[2].space, Space::Hex);

        let options = OptimizeOptions {
            output_space: Some(Space::Rgb),
            ..options
        };
        let result = optimize_palette(&colors, &options).unwrap();
        assert!(result.colors.iter().all(|c| c.space == Space::Rgb));
        let expected = colors[1].to_space(Space::Rgb);
        assert_eq!(result.colors[1], expected);
    }

    #[test]
    fn optimization_spreads_colors_apart() {
        let mut rng = StdRng::seed_from_u64(7);
        let trials = 100;
        let mut improved = 0;
        for seed in 0..trials {
            let colors = random_rgb(&mut rng, 5);
            let options = OptimizeOptions {
                change_weight: 0.5,
                seed,
                ..Default::default()
            };
            let result = optimize_palette(&colors, &options).unwrap();
            if min_distance(&result.colors) >= min_distance(&colors) {
                improved += 1;
            }
        }
        assert!(improved >= 95, "improved {improved} of {trials}");
    }

    #[test]
    fn same_seed_same_result() {
        let colors = palette(&["#df928e", "#f4b942", "#3c4f76", "#4b7f52"]);
        let options = OptimizeOptions {
            seed: 42,
            ..Default::default()
        };
        let a = optimize_palette(&colors, &options).unwrap();
        let b = optimize_palette(&colors, &options).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn anchors_are_appended_when_kept() {
        let colors = palette(&["#df928e", "#f4b942"]);
        let options = OptimizeOptions {
            anchors: Anchors::all(),
            keep_anchors: true,
            output_space: Some(Space::Rgb8),
            ..Default::default()
        };
        let result = optimize_palette(&colors, &options).unwrap();
        assert_eq!(result.colors.len(), 4);
        assert_eq!(result.colors[2].components, Components(0.0, 0.0, 0.0));
        assert_eq!(result.colors[3].components, Components(255.0, 255.0, 255.0));

        let options = OptimizeOptions {
            anchors: Anchors::all(),
            ..Default::default()
        };
        assert_eq!(optimize_palette(&colors, &options).unwrap().colors.len(), 2);
    }

    #[test]
    fn alpha_passes_through() {
        let colors = vec![
            Color::new(Space::Rgba, Components(0.2, 0.3, 0.4), 0.25),
            Color::new(Space::Rgba, Components(0.25, 0.3, 0.4), 0.75),
        ];
        let result = optimize_palette(&colors, &OptimizeOptions::default()).unwrap();
        assert_eq!(result.colors[0].alpha, 0.25);
        assert_eq!(result.colors[1].alpha, 0.75);
        assert!(result.colors.iter().all(Color::in_gamut));
    }

    #[test]
    fn empty_input() {
        let result = optimize_palette(&[], &OptimizeOptions::default()).unwrap();
        assert!(result.colors.is_empty());
        assert!(result.converged);
    }
}
