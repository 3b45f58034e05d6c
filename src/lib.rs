//! huespread generates and refines color palettes that stay distinguishable
//! for color typical and color blind viewers alike.
//!
//! ```rust
//! use huespread::{extend_colors, Color, GrowthOptions};
//!
//! let colors = ["#df928e", "#f4b942", "#3c4f76"]
//!     .iter()
//!     .map(|literal| literal.parse::<Color>())
//!     .collect::<Result<Vec<_>, _>>()
//!     .unwrap();
//! let options = GrowthOptions::default();
//! let extended = extend_colors(&colors, 6, &options, &mut options.rng()).unwrap();
//! assert_eq!(extended.len(), 6);
//! assert_eq!(&extended[..3], &colors[..]);
//! ```

#![deny(missing_docs)]

mod color;
pub mod colorblind;
mod convert;
mod error;
mod gamut;
pub mod grow;
mod interpolate;
mod math;
pub mod models;
pub mod objective;
pub mod optimize;
mod palette;
mod parse;


pub use color::{Anchors, Color, Component, Components, HasSpace, Space};
pub use colorblind::{simulate, simulate_colorblind, Profile};
pub use error::{Error, Result};
pub use grow::{extend_colors, random_colors, random_incremental_colors, GrowthOptions, Seeding};
pub use interpolate::{hue_sort, interpolate, interpolate_series, DEFAULT_INTERPOLATION_SPACE};
pub use objective::{colorblind_score, min_distance, ObjectiveConfig};
pub use optimize::{optimize_palette, optimize_palette_with, OptimizeOptions, Optimized};
pub use palette::Palette;
pub use parse::convert_color;
