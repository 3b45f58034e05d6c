use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use huespread::{
    extend_colors, interpolate, optimize_palette, random_colors, random_incremental_colors,
    simulate_colorblind, Anchors, Color, GrowthOptions, ObjectiveConfig, OptimizeOptions, Seeding,
    Space,
};

#[derive(Parser)]
#[command(name = "huespread")]
#[command(about = "Generate color palettes that stay distinguishable for color blind viewers")]
struct Cli {
    /// Log more (-v debug, -vv trace). RUST_LOG takes precedence.
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert colors to another space
    Convert {
        /// Target space (HEX, RGB, RGBA, rgb, rgba, HSL, HSV, XYZ, LMS, OKLAB, ...)
        #[arg(short, long)]
        space: String,

        /// Color literals (#rrggbb, RGB(r,g,b), rgb(r,g,b), ...)
        #[arg(required = true)]
        colors: Vec<String>,
    },
    /// Show colors as seen with a dichromacy
    Simulate {
        /// Protanopia severity (0-1)
        #[arg(short, long, default_value_t = 0.0)]
        protanopia: f64,

        /// Deuteranopia severity (0-1)
        #[arg(short, long, default_value_t = 0.0)]
        deuteranopia: f64,

        /// Tritanopia severity (0-1)
        #[arg(short, long, default_value_t = 0.0)]
        tritanopia: f64,

        /// Color literals
        #[arg(required = true)]
        colors: Vec<String>,
    },
    /// Spread the colors of a palette apart
    Optimize {
        /// Indices of colors that must not change (e.g. "0,2")
        #[arg(long, value_delimiter = ',')]
        freeze: Vec<usize>,

        #[command(flatten)]
        tuning: Tuning,

        /// Color literals
        #[arg(required = true)]
        colors: Vec<String>,
    },
    /// Generate a palette of random, optimized colors
    Random {
        /// Number of colors
        count: usize,

        #[command(flatten)]
        tuning: Tuning,
    },
    /// Add colors to an existing palette
    Extend {
        /// Total number of colors in the result
        #[arg(short = 'n', long)]
        total: usize,

        /// Place new colors along the dominant axis of the palette
        #[arg(long)]
        dominant_axis: bool,

        #[command(flatten)]
        tuning: Tuning,

        /// Color literals
        #[arg(required = true)]
        colors: Vec<String>,
    },
    /// Grow a random palette in batches
    Incremental {
        /// Total number of colors
        total: usize,

        /// Number of colors optimized from scratch
        #[arg(long, default_value_t = 4)]
        start: usize,

        /// Number of colors added per batch
        #[arg(long, default_value_t = 1)]
        increment: usize,

        #[command(flatten)]
        tuning: Tuning,
    },
    /// Interpolate between two colors
    Gradient {
        /// Number of colors, both ends included
        #[arg(short = 'n', long, default_value_t = 5)]
        steps: usize,

        /// Interpolation space
        #[arg(long, default_value = "OKLAB")]
        through: String,

        from: String,
        to: String,
    },
}

/// Optimizer settings shared by the generating commands.
#[derive(Args)]
struct Tuning {
    /// Trade-off between diversity (0) and keeping colors in place (1)
    #[arg(short = 'w', long, default_value_t = 0.1)]
    change_weight: f64,

    /// Share of the diversity score given to color blind views (0-1)
    #[arg(short = 'c', long, default_value_t = 0.5)]
    colorblind_weight: f64,

    /// Push colors away from black
    #[arg(long)]
    black: bool,

    /// Push colors away from white
    #[arg(long)]
    white: bool,

    /// Print the anchors after the colors
    #[arg(long)]
    keep_anchors: bool,

    /// Output space, defaults to the space of the first input color
    #[arg(short, long)]
    space: Option<String>,

    /// Random seed
    #[arg(long, default_value_t = 0)]
    seed: u64,

    /// Optimizer iteration limit
    #[arg(long, default_value_t = 200)]
    max_iterations: usize,
}

impl Tuning {
    fn anchors(&self) -> Anchors {
        let mut anchors = Anchors::empty();
        anchors.set(Anchors::BLACK, self.black);
        anchors.set(Anchors::WHITE, self.white);
        anchors
    }

    fn objective(&self) -> ObjectiveConfig {
        ObjectiveConfig {
            colorblind_weight: self.colorblind_weight,
            ..Default::default()
        }
    }

    fn output_space(&self) -> Result<Option<Space>> {
        self.space
            .as_deref()
            .map(|space| space.parse::<Space>())
            .transpose()
            .context("Invalid output space")
    }

    fn growth(&self, seeding: Seeding) -> Result<GrowthOptions> {
        Ok(GrowthOptions {
            change_weight: self.change_weight,
            anchors: self.anchors(),
            keep_anchors: self.keep_anchors,
            output_space: self.output_space()?,
            seeding,
            objective: self.objective(),
            max_iterations: self.max_iterations,
            seed: self.seed,
            ..Default::default()
        })
    }
}

fn parse_colors(literals: &[String]) -> Result<Vec<Color>> {
    literals
        .iter()
        .map(|literal| {
            literal
                .parse::<Color>()
                .with_context(|| format!("Invalid color '{literal}'"))
        })
        .collect()
}

fn print(colors: &[Color]) {
    for color in colors {
        println!("{color}");
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_level = match cli.verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| format!("huespread={default_level}").into()),
        )
        .with(tracing_subscriber::fmt::layer().without_time().with_writer(std::io::stderr))
        .init();

    match cli.command {
        Commands::Convert { space, colors } => {
            let space = space.parse::<Space>().context("Invalid target space")?;
            let colors = parse_colors(&colors)?;
            print(&colors.iter().map(|c| c.to_space(space)).collect::<Vec<_>>());
        }
        Commands::Simulate {
            protanopia,
            deuteranopia,
            tritanopia,
            colors,
        } => {
            let colors = parse_colors(&colors)?;
            let simulated = colors
                .iter()
                .map(|c| simulate_colorblind(c, protanopia, deuteranopia, tritanopia))
                .collect::<Vec<_>>();
            print(&simulated);
        }
        Commands::Optimize {
            freeze,
            tuning,
            colors,
        } => {
            let colors = parse_colors(&colors)?;
            let mut mask = vec![false; colors.len()];
            for index in freeze {
                let count = colors.len();
                *mask.get_mut(index).with_context(|| {
                    format!("Cannot freeze color {index}, there are only {count}")
                })? = true;
            }
            let options = OptimizeOptions {
                change_weight: tuning.change_weight,
                mask: Some(mask),
                anchors: tuning.anchors(),
                keep_anchors: tuning.keep_anchors,
                output_space: tuning.output_space()?,
                objective: tuning.objective(),
                max_iterations: tuning.max_iterations,
                seed: tuning.seed,
                ..Default::default()
            };
            let optimized = optimize_palette(&colors, &options).context("Optimization failed")?;
            tracing::info!(
                score = optimized.score,
                iterations = optimized.iterations,
                converged = optimized.converged,
                "Optimized palette"
            );
            print(&optimized.colors);
        }
        Commands::Random { count, tuning } => {
            let options = tuning.growth(Seeding::Random)?;
            print(&random_colors(count, &options, &mut options.rng())?);
        }
        Commands::Extend {
            total,
            dominant_axis,
            tuning,
            colors,
        } => {
            let colors = parse_colors(&colors)?;
            let seeding = if dominant_axis {
                Seeding::DominantAxis
            } else {
                Seeding::Random
            };
            let options = tuning.growth(seeding)?;
            let extended = extend_colors(&colors, total, &options, &mut options.rng())
                .context("Could not extend palette")?;
            print(&extended);
        }
        Commands::Incremental {
            total,
            start,
            increment,
            tuning,
        } => {
            let options = tuning.growth(Seeding::Random)?;
            let colors =
                random_incremental_colors(total, start, increment, &options, &mut options.rng())
                    .context("Could not grow palette")?;
            print(&colors);
        }
        Commands::Gradient {
            steps,
            through,
            from,
            to,
        } => {
            let through = through.parse::<Space>().context("Invalid interpolation space")?;
            let colors = parse_colors(&[from, to])?;
            print(&interpolate(&colors[0], &colors[1], steps, through));
        }
    }

    Ok(())
}
